//! The interface shared by every node class.

use uanode_types::{LocalizedText, NodeClass, NodeId, QualifiedName, Reference, RolePermission};

use crate::context::RequestContext;

/// An addressable entity in the address space.
///
/// Identity getters read immutable data and never block. `references` and
/// `set_references` go through the node's lock; there is no incremental
/// add or remove, so a read-modify-write from two callers can lose an
/// update.
pub trait Node: Send + Sync {
    fn node_id(&self) -> &NodeId;

    fn node_class(&self) -> NodeClass;

    fn browse_name(&self) -> &QualifiedName;

    fn display_name(&self) -> &LocalizedText;

    fn description(&self) -> &LocalizedText;

    /// The node's own role-permission table, unfiltered.
    ///
    /// Empty when the node defers to the server default. This is the
    /// administrative view; client-facing reads go through
    /// [`Node::user_role_permissions`] or a permission check.
    fn role_permissions(&self) -> &[RolePermission];

    /// The entries of the governing table that apply to the caller.
    ///
    /// Empty when `ctx` carries no session.
    fn user_role_permissions(&self, ctx: &RequestContext) -> Vec<RolePermission>;

    fn references(&self) -> Vec<Reference>;

    fn set_references(&self, references: Vec<Reference>);

    /// Whether `attribute_id` names an attribute this node class supports.
    fn is_attribute_id_valid(&self, attribute_id: u32) -> bool;
}
