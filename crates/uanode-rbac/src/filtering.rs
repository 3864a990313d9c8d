//! Role-permission table resolution and filtering.
//!
//! A node's own table, when non-empty, replaces the server-wide default
//! entirely. The two are never merged.

use uanode_types::{NodeId, PermissionType, RolePermission};

/// Picks the table that governs a node.
///
/// Returns `node_table` unless it is empty, in which case `server_default`
/// applies. An empty node table means "not configured", not "no access".
pub fn resolve_role_permissions<'a>(
    node_table: &'a [RolePermission],
    server_default: &'a [RolePermission],
) -> &'a [RolePermission] {
    if node_table.is_empty() {
        server_default
    } else {
        node_table
    }
}

/// Returns the entries of `table` that apply to any of `roles`.
///
/// Table order is preserved. Several entries for the same role are all kept.
pub fn filter_role_permissions(table: &[RolePermission], roles: &[NodeId]) -> Vec<RolePermission> {
    matching_entries(table, roles).cloned().collect()
}

/// ORs together the permissions of every entry that applies to `roles`.
pub fn effective_permissions(table: &[RolePermission], roles: &[NodeId]) -> PermissionType {
    matching_entries(table, roles).fold(PermissionType::NONE, |acc, rp| acc | rp.permissions)
}

pub(crate) fn matching_entries<'a>(
    table: &'a [RolePermission],
    roles: &'a [NodeId],
) -> impl Iterator<Item = &'a RolePermission> + 'a {
    table.iter().filter(move |rp| roles.contains(&rp.role_id))
}
