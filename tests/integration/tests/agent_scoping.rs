//! Integration test: Multi-tenant agent resolution through the public
//! crate surface: role scoping, credential requirements, and the admin
//! capability.

use trellis_agent::{AgentError, AgentResolver, CallerIdentity};
use trellis_core::{AgentEndpoints, Role};

fn endpoints() -> AgentEndpoints {
    AgentEndpoints {
        governance_url: "http://governance.agents.internal:8021".into(),
        ecosystem_url: "http://ecosystem.agents.internal:8031".into(),
        member_url: "http://member.agents.internal:8041".into(),
        default_api_key: Some("process-default".into()),
    }
}

fn caller(role: Role) -> CallerIdentity {
    CallerIdentity {
        role,
        api_key: Some("caller-key".into()),
        auth_token: role.is_delegated().then(|| "tenant.jwt".to_string()),
        admin: false,
    }
}

#[test]
fn test_every_role_resolves_to_its_table_entry() {
    let resolver = AgentResolver::new(endpoints());
    let expected = [
        (Role::Governance, "http://governance.agents.internal:8021"),
        (Role::Ecosystem, "http://ecosystem.agents.internal:8031"),
        (Role::Member, "http://member.agents.internal:8041"),
    ];
    for (role, url) in expected {
        let handle = resolver.resolve(&caller(role)).expect("resolves");
        assert_eq!(handle.agent().base_url(), url);
        assert!(handle.admin().is_none());
    }
}

#[test]
fn test_delegated_roles_fail_fast_without_token() {
    let resolver = AgentResolver::new(endpoints());
    for role in [Role::Ecosystem, Role::Member] {
        let result = resolver.resolve(&CallerIdentity {
            auth_token: None,
            ..caller(role)
        });
        assert!(
            matches!(result, Err(AgentError::MissingToken(r)) if r == role),
            "role {role} must require a tenant token"
        );
    }
}

#[test]
fn test_governance_resolves_without_token() {
    let resolver = AgentResolver::new(endpoints());
    let handle = resolver.resolve(&caller(Role::Governance)).unwrap();
    assert_eq!(
        handle.agent().base_url(),
        "http://governance.agents.internal:8021"
    );
}

#[test]
fn test_governance_requires_its_own_key() {
    // The process-wide default key applies to delegated roles only.
    let resolver = AgentResolver::new(endpoints());
    let result = resolver.resolve(&CallerIdentity {
        api_key: None,
        ..caller(Role::Governance)
    });
    assert!(matches!(
        result,
        Err(AgentError::MissingApiKey(Role::Governance))
    ));

    let handle = resolver
        .resolve(&CallerIdentity {
            api_key: None,
            ..caller(Role::Member)
        })
        .expect("default key substituted for delegated role");
    assert_eq!(
        handle.agent().base_url(),
        "http://member.agents.internal:8041"
    );
}

#[test]
fn test_admin_capability_spans_plain_and_tenant_apis() {
    let resolver = AgentResolver::new(endpoints());
    let handle = resolver
        .resolve(&CallerIdentity {
            admin: true,
            ..caller(Role::Governance)
        })
        .unwrap();

    // Both capabilities, both scoped to the governance base URL.
    assert_eq!(
        handle.agent().base_url(),
        "http://governance.agents.internal:8021"
    );
    assert_eq!(
        handle.admin().expect("admin capability").base_url(),
        "http://governance.agents.internal:8021/multitenancy"
    );
}

#[test]
fn test_resolution_is_per_request() {
    // Two resolutions yield independent handles; dropping one does not
    // disturb the other.
    let resolver = AgentResolver::new(endpoints());
    let first = resolver.resolve(&caller(Role::Member)).unwrap();
    let second = resolver.resolve(&caller(Role::Member)).unwrap();
    drop(first);
    assert_eq!(
        second.agent().base_url(),
        "http://member.agents.internal:8041"
    );
}
