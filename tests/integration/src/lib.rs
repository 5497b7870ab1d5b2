//! Integration test crate — all tests live in `tests/`.
