//! Cross-cutting tests: access resolution through sessions, fallback to the
//! server default, and concurrent access to node state.

use std::sync::{Arc, Barrier};
use std::thread;

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use uanode_types::{
    AccessLevel, AttributeId, DataValue, NodeId, PermissionType, QualifiedName, Reference,
    RolePermission, StatusCode, Variant,
};

use crate::{Node, RequestContext, Server, VariableAttributes, VariableNode};

fn role(name: &str) -> NodeId {
    NodeId::string(1, name)
}

fn variable(table: Vec<RolePermission>, level: AccessLevel) -> VariableNode {
    let attrs = VariableAttributes::new(
        NodeId::string(1, "Mixer.Level"),
        QualifiedName::new(1, "Level"),
        NodeId::numeric(0, 11),
    )
    .with_role_permissions(table)
    .with_access_level(level);
    VariableNode::new(attrs, vec![], DataValue::new(0.0f64), false)
}

fn session_ctx(server: &Arc<Server>, roles: &[&str]) -> RequestContext {
    let roles = roles.iter().map(|r| role(r)).collect();
    RequestContext::for_session(server.create_session(roles))
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn read_only_grant_narrows_read_write_node() {
    let server = Arc::new(Server::with_default_role_permissions(vec![]));
    let node = variable(
        vec![RolePermission::new(role("R"), PermissionType::READ)],
        AccessLevel::CURRENT_READ | AccessLevel::CURRENT_WRITE,
    );

    let ctx = session_ctx(&server, &["R"]);
    assert_eq!(node.user_access_level(&ctx), AccessLevel::CURRENT_READ);
}

#[test]
fn full_grant_keeps_base_level_unchanged() {
    let server = Arc::new(Server::with_default_role_permissions(vec![]));
    let base = AccessLevel::CURRENT_READ | AccessLevel::HISTORY_READ;
    let node = variable(
        vec![RolePermission::new(
            role("R"),
            PermissionType::READ | PermissionType::WRITE | PermissionType::READ_HISTORY,
        )],
        base,
    );

    // Q has no entry in the table.
    let ctx = session_ctx(&server, &["R", "Q"]);
    assert_eq!(node.user_access_level(&ctx), base);
}

#[test]
fn empty_node_table_falls_back_to_server_default() {
    let permissive = Arc::new(Server::with_default_role_permissions(vec![RolePermission::new(
        role("R"),
        PermissionType::READ | PermissionType::WRITE,
    )]));
    let restrictive = Arc::new(Server::with_default_role_permissions(vec![
        RolePermission::new(role("R"), PermissionType::BROWSE),
    ]));

    let base = AccessLevel::CURRENT_READ | AccessLevel::CURRENT_WRITE;
    let deferring = variable(vec![], base);

    let a = session_ctx(&permissive, &["R"]);
    let b = session_ctx(&restrictive, &["R"]);

    assert_eq!(deferring.user_access_level(&a), base);
    assert_eq!(deferring.user_access_level(&b), AccessLevel::NONE);
    assert_eq!(
        deferring.user_role_permissions(&a),
        permissive.role_permissions().to_vec()
    );
    assert_eq!(
        deferring.user_role_permissions(&b),
        restrictive.role_permissions().to_vec()
    );

    // A node with its own table ignores both defaults.
    let own = variable(
        vec![RolePermission::new(role("R"), PermissionType::READ)],
        base,
    );
    assert_eq!(own.user_access_level(&a), AccessLevel::CURRENT_READ);
    assert_eq!(own.user_access_level(&b), AccessLevel::CURRENT_READ);
    assert_eq!(own.user_role_permissions(&a), own.user_role_permissions(&b));
}

#[test]
fn standard_default_table_applies_to_well_known_roles() {
    use uanode_rbac::WellKnownRole;

    let server = Arc::new(Server::new(&uanode_config::UanodeConfig::default()));
    let node = variable(vec![], AccessLevel::CURRENT_READ | AccessLevel::CURRENT_WRITE);

    let anonymous =
        RequestContext::for_session(server.create_session(vec![WellKnownRole::Anonymous.into()]));
    let operator =
        RequestContext::for_session(server.create_session(vec![WellKnownRole::Operator.into()]));

    assert_eq!(node.user_access_level(&anonymous), AccessLevel::CURRENT_READ);
    assert_eq!(
        node.user_access_level(&operator),
        AccessLevel::CURRENT_READ | AccessLevel::CURRENT_WRITE
    );
}

#[test]
fn missing_session_fails_closed_through_service() {
    let node = variable(vec![], AccessLevel::CURRENT_READ);
    let ctx = RequestContext::background();

    let dv = crate::service::read(
        &ctx,
        &node,
        &uanode_types::ReadValueId::new(node.node_id().clone(), AttributeId::UserAccessLevel),
    );
    assert_eq!(dv.value, Variant::Byte(0));

    let dv = crate::service::read(
        &ctx,
        &node,
        &uanode_types::ReadValueId::new(node.node_id().clone(), AttributeId::UserRolePermissions),
    );
    assert_eq!(dv.value, Variant::Array(vec![]));

    let dv = crate::service::read(
        &ctx,
        &node,
        &uanode_types::ReadValueId::new(node.node_id().clone(), AttributeId::RolePermissions),
    );
    assert_eq!(dv.status, StatusCode::BAD_USER_ACCESS_DENIED);
}

// ============================================================================
// Attribute ids
// ============================================================================

#[test]
fn exactly_fifteen_attribute_ids_are_valid() {
    let node = variable(vec![], AccessLevel::CURRENT_READ);
    let valid: Vec<u32> = (0..=64).filter(|id| node.is_attribute_id_valid(*id)).collect();
    assert_eq!(
        valid,
        vec![1, 2, 3, 4, 5, 13, 14, 15, 16, 17, 18, 19, 20, 24, 25]
    );
}

// ============================================================================
// Concurrency
// ============================================================================

#[test]
fn concurrent_value_access_never_tears() {
    let a = DataValue::new(Variant::from(vec![1i64; 64]))
        .with_status(StatusCode::GOOD)
        .with_source_timestamp(Utc.timestamp_opt(1_000, 0).unwrap());
    let b = DataValue::new(Variant::from(vec![2i64; 64]))
        .with_status(StatusCode::BAD_NOT_READABLE)
        .with_source_timestamp(Utc.timestamp_opt(2_000, 0).unwrap());

    let node = Arc::new(variable(vec![], AccessLevel::CURRENT_READ));
    node.set_value(a.clone());

    let writers: Vec<_> = [a.clone(), b.clone()]
        .into_iter()
        .map(|dv| {
            let node = Arc::clone(&node);
            thread::spawn(move || {
                for _ in 0..500 {
                    node.set_value(dv.clone());
                }
            })
        })
        .collect();

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let node = Arc::clone(&node);
            let (a, b) = (a.clone(), b.clone());
            thread::spawn(move || {
                for _ in 0..500 {
                    let seen = node.value();
                    assert!(seen == a || seen == b, "torn read: {seen:?}");
                }
            })
        })
        .collect();

    for handle in writers.into_iter().chain(readers) {
        handle.join().unwrap();
    }
}

#[test]
fn concurrent_set_references_keeps_one_list_whole() {
    let list_a: Vec<Reference> = (0..50)
        .map(|i| Reference::new(NodeId::numeric(0, 47), false, NodeId::numeric(1, i)))
        .collect();
    let list_b: Vec<Reference> = (0..30)
        .map(|i| Reference::new(NodeId::numeric(0, 35), true, NodeId::numeric(2, i)))
        .collect();

    for _ in 0..20 {
        let node = Arc::new(variable(vec![], AccessLevel::CURRENT_READ));
        let barrier = Arc::new(Barrier::new(2));

        let handles: Vec<_> = [list_a.clone(), list_b.clone()]
            .into_iter()
            .map(|list| {
                let node = Arc::clone(&node);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    node.set_references(list);
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let result = node.references();
        assert!(result == list_a || result == list_b);
    }
}

#[test]
fn getters_are_stable_between_writes() {
    let server = Arc::new(Server::with_default_role_permissions(vec![]));
    let node = variable(
        vec![RolePermission::new(role("R"), PermissionType::READ)],
        AccessLevel::CURRENT_READ,
    );
    node.set_value(DataValue::new(3.5f64));
    let ctx = session_ctx(&server, &["R"]);

    assert_eq!(node.value(), node.value());
    assert_eq!(node.references(), node.references());
    assert_eq!(node.historizing(), node.historizing());
    assert_eq!(node.user_access_level(&ctx), node.user_access_level(&ctx));
    assert_eq!(
        node.user_role_permissions(&ctx),
        node.user_role_permissions(&ctx)
    );
}

// ============================================================================
// Property-Based Tests
// ============================================================================

fn arb_role() -> impl Strategy<Value = NodeId> {
    (0u32..5).prop_map(|n| NodeId::numeric(1, n))
}

fn arb_table() -> impl Strategy<Value = Vec<RolePermission>> {
    prop::collection::vec(
        (arb_role(), any::<u32>())
            .prop_map(|(r, bits)| RolePermission::new(r, PermissionType::from_bits(bits))),
        0..6,
    )
}

fn arb_node(table: Vec<RolePermission>, base: u8) -> VariableNode {
    variable(table, AccessLevel::from_bits(base))
}

proptest! {
    /// Property: the user access level is always a sub-mask of the base level
    #[test]
    fn prop_user_access_level_is_sub_mask(
        base in any::<u8>(),
        node_table in arb_table(),
        server_table in arb_table(),
        roles in prop::collection::vec(arb_role(), 0..4),
    ) {
        let server = Arc::new(Server::with_default_role_permissions(server_table));
        let node = arb_node(node_table, base);
        let ctx = RequestContext::for_session(server.create_session(roles));

        let effective = node.user_access_level(&ctx);
        prop_assert_eq!(effective & node.access_level(), effective);
    }

    /// Property: without a session, nothing is visible and nothing is permitted
    #[test]
    fn prop_no_session_is_zero(base in any::<u8>(), node_table in arb_table()) {
        let node = arb_node(node_table, base);
        let ctx = RequestContext::background();

        prop_assert_eq!(node.user_access_level(&ctx), AccessLevel::NONE);
        prop_assert!(node.user_role_permissions(&ctx).is_empty());
    }

    /// Property: visible entries all belong to the caller's roles and come from the governing table
    #[test]
    fn prop_visible_entries_match_roles(
        node_table in arb_table(),
        server_table in arb_table(),
        roles in prop::collection::vec(arb_role(), 0..4),
    ) {
        let server = Arc::new(Server::with_default_role_permissions(server_table.clone()));
        let node = arb_node(node_table.clone(), 0xff);
        let ctx = RequestContext::for_session(server.create_session(roles.clone()));

        let governing = if node_table.is_empty() { &server_table } else { &node_table };
        for entry in node.user_role_permissions(&ctx) {
            prop_assert!(roles.contains(&entry.role_id));
            prop_assert!(governing.contains(&entry));
        }
    }

    /// Property: attribute validity agrees with the fixed supported set for every u32
    #[test]
    fn prop_attribute_validity(id in any::<u32>()) {
        const SUPPORTED: [u32; 15] = [1, 2, 3, 4, 5, 13, 14, 15, 16, 17, 18, 19, 20, 24, 25];
        let node = arb_node(vec![], 0);
        prop_assert_eq!(node.is_attribute_id_valid(id), SUPPORTED.contains(&id));
    }
}
