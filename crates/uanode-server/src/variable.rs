//! Variable nodes.
//!
//! A [`VariableNode`] is split in two:
//! - [`VariableAttributes`]: identity, security configuration, and access
//!   metadata. Fixed at construction and read without locking.
//! - `VariableState`: references, current value, historizing flag, and the
//!   optional value handlers. Guarded by a single reader/writer lock.
//!
//! Readers take the shared lock and clone out; writers take the exclusive
//! lock and replace a field whole, so no reader can observe a partial
//! update. Handlers are cloned out of the lock before they run, which lets a
//! handler call back into the node.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;
use uanode_rbac::{
    effective_permissions, filter_role_permissions, mask_access_level, resolve_role_permissions,
};
use uanode_types::{
    AccessLevel, AttributeId, DataValue, LocalizedText, NodeClass, NodeId, PermissionType,
    QualifiedName, ReadValueId, Reference, RolePermission, StatusCode, WriteValue,
};

use crate::context::RequestContext;
use crate::node::Node;
use crate::session::Session;

/// Custom read path for a variable's value.
pub type ReadValueHandler = Arc<dyn Fn(&RequestContext, &ReadValueId) -> DataValue + Send + Sync>;

/// Custom write path for a variable's value.
pub type WriteValueHandler = Arc<dyn Fn(&RequestContext, &WriteValue) -> StatusCode + Send + Sync>;

/// Scalar value rank.
pub const VALUE_RANK_SCALAR: i32 = -1;

/// The attributes a variable node supports.
const SUPPORTED_ATTRIBUTES: [AttributeId; 15] = [
    AttributeId::NodeId,
    AttributeId::NodeClass,
    AttributeId::BrowseName,
    AttributeId::DisplayName,
    AttributeId::Description,
    AttributeId::RolePermissions,
    AttributeId::UserRolePermissions,
    AttributeId::Value,
    AttributeId::DataType,
    AttributeId::ValueRank,
    AttributeId::ArrayDimensions,
    AttributeId::AccessLevel,
    AttributeId::UserAccessLevel,
    AttributeId::MinimumSamplingInterval,
    AttributeId::Historizing,
];

// ============================================================================
// Immutable attributes
// ============================================================================

/// Construction-time attributes of a variable.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableAttributes {
    pub node_id: NodeId,
    pub browse_name: QualifiedName,
    pub display_name: LocalizedText,
    pub description: LocalizedText,
    /// Empty defers to the server default table.
    pub role_permissions: Vec<RolePermission>,
    /// Reserved; not consulted when resolving access.
    pub access_restrictions: u16,
    /// Upper bound on what any user may do with the value.
    pub access_level: AccessLevel,
    pub minimum_sampling_interval: f64,
    pub data_type: NodeId,
    pub value_rank: i32,
    pub array_dimensions: Vec<u32>,
}

impl VariableAttributes {
    /// Creates attributes for a readable scalar variable.
    ///
    /// The display name defaults to the browse name.
    pub fn new(node_id: NodeId, browse_name: QualifiedName, data_type: NodeId) -> Self {
        let display_name = LocalizedText::invariant(browse_name.name.clone());
        Self {
            node_id,
            browse_name,
            display_name,
            description: LocalizedText::default(),
            role_permissions: Vec::new(),
            access_restrictions: 0,
            access_level: AccessLevel::CURRENT_READ,
            minimum_sampling_interval: 0.0,
            data_type,
            value_rank: VALUE_RANK_SCALAR,
            array_dimensions: Vec::new(),
        }
    }

    pub fn with_display_name(mut self, display_name: LocalizedText) -> Self {
        self.display_name = display_name;
        self
    }

    pub fn with_description(mut self, description: LocalizedText) -> Self {
        self.description = description;
        self
    }

    pub fn with_role_permissions(mut self, role_permissions: Vec<RolePermission>) -> Self {
        self.role_permissions = role_permissions;
        self
    }

    pub fn with_access_level(mut self, access_level: AccessLevel) -> Self {
        self.access_level = access_level;
        self
    }

    pub fn with_minimum_sampling_interval(mut self, interval_ms: f64) -> Self {
        self.minimum_sampling_interval = interval_ms;
        self
    }

    pub fn with_value_rank(mut self, value_rank: i32, array_dimensions: Vec<u32>) -> Self {
        self.value_rank = value_rank;
        self.array_dimensions = array_dimensions;
        self
    }
}

// ============================================================================
// Mutable state
// ============================================================================

struct VariableState {
    references: Vec<Reference>,
    value: DataValue,
    historizing: bool,
    read_value_handler: Option<ReadValueHandler>,
    write_value_handler: Option<WriteValueHandler>,
}

// ============================================================================
// VariableNode
// ============================================================================

/// A node holding one data point.
pub struct VariableNode {
    attributes: VariableAttributes,
    state: RwLock<VariableState>,
}

impl VariableNode {
    pub fn new(
        attributes: VariableAttributes,
        references: Vec<Reference>,
        value: DataValue,
        historizing: bool,
    ) -> Self {
        Self {
            attributes,
            state: RwLock::new(VariableState {
                references,
                value,
                historizing,
                read_value_handler: None,
                write_value_handler: None,
            }),
        }
    }

    pub fn attributes(&self) -> &VariableAttributes {
        &self.attributes
    }

    pub fn data_type(&self) -> &NodeId {
        &self.attributes.data_type
    }

    pub fn value_rank(&self) -> i32 {
        self.attributes.value_rank
    }

    pub fn array_dimensions(&self) -> &[u32] {
        &self.attributes.array_dimensions
    }

    pub fn access_level(&self) -> AccessLevel {
        self.attributes.access_level
    }

    pub fn access_restrictions(&self) -> u16 {
        self.attributes.access_restrictions
    }

    pub fn minimum_sampling_interval(&self) -> f64 {
        self.attributes.minimum_sampling_interval
    }

    pub fn value(&self) -> DataValue {
        self.read_state().value.clone()
    }

    /// Replaces the current value.
    ///
    /// The value is not checked against `data_type` or `value_rank`.
    pub fn set_value(&self, value: DataValue) {
        self.write_state().value = value;
    }

    pub fn historizing(&self) -> bool {
        self.read_state().historizing
    }

    pub fn set_historizing(&self, historizing: bool) {
        self.write_state().historizing = historizing;
    }

    /// Installs a custom read path. `None` restores the stored value path.
    pub fn set_read_value_handler(&self, handler: Option<ReadValueHandler>) {
        self.write_state().read_value_handler = handler;
    }

    /// Installs a custom write path. `None` restores the stored value path.
    pub fn set_write_value_handler(&self, handler: Option<WriteValueHandler>) {
        self.write_state().write_value_handler = handler;
    }

    pub fn read_value_handler(&self) -> Option<ReadValueHandler> {
        self.read_state().read_value_handler.clone()
    }

    pub fn write_value_handler(&self) -> Option<WriteValueHandler> {
        self.read_state().write_value_handler.clone()
    }

    /// The access level narrowed to what the caller's roles permit.
    ///
    /// Zero when `ctx` carries no session, whatever the base level.
    pub fn user_access_level(&self, ctx: &RequestContext) -> AccessLevel {
        let Some(session) = ctx.session() else {
            debug!(node_id = %self.attributes.node_id, "no session; user access level is zero");
            return AccessLevel::NONE;
        };
        mask_access_level(
            self.attributes.access_level,
            self.governing_table(session),
            session.user_roles(),
        )
    }

    /// Every permission the caller's roles hold on this node.
    ///
    /// Empty when `ctx` carries no session.
    pub fn user_permissions(&self, ctx: &RequestContext) -> PermissionType {
        match ctx.session() {
            Some(session) => {
                effective_permissions(self.governing_table(session), session.user_roles())
            }
            None => PermissionType::NONE,
        }
    }

    /// Whether a variable node supports `attribute_id`.
    pub fn supports_attribute(attribute_id: u32) -> bool {
        AttributeId::try_from(attribute_id).is_ok_and(|id| SUPPORTED_ATTRIBUTES.contains(&id))
    }

    fn governing_table<'a>(&'a self, session: &'a Session) -> &'a [RolePermission] {
        resolve_role_permissions(
            &self.attributes.role_permissions,
            session.server().role_permissions(),
        )
    }

    // A panic while holding the lock cannot leave a field half-written:
    // every write is a single assignment. Recover the guard instead of
    // propagating the poison.
    fn read_state(&self) -> RwLockReadGuard<'_, VariableState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, VariableState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Node for VariableNode {
    fn node_id(&self) -> &NodeId {
        &self.attributes.node_id
    }

    fn node_class(&self) -> NodeClass {
        NodeClass::Variable
    }

    fn browse_name(&self) -> &QualifiedName {
        &self.attributes.browse_name
    }

    fn display_name(&self) -> &LocalizedText {
        &self.attributes.display_name
    }

    fn description(&self) -> &LocalizedText {
        &self.attributes.description
    }

    fn role_permissions(&self) -> &[RolePermission] {
        &self.attributes.role_permissions
    }

    fn user_role_permissions(&self, ctx: &RequestContext) -> Vec<RolePermission> {
        let Some(session) = ctx.session() else {
            debug!(node_id = %self.attributes.node_id, "no session; no role permissions visible");
            return Vec::new();
        };
        filter_role_permissions(self.governing_table(session), session.user_roles())
    }

    fn references(&self) -> Vec<Reference> {
        self.read_state().references.clone()
    }

    fn set_references(&self, references: Vec<Reference>) {
        self.write_state().references = references;
    }

    fn is_attribute_id_valid(&self, attribute_id: u32) -> bool {
        Self::supports_attribute(attribute_id)
    }
}

impl fmt::Debug for VariableNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.read_state();
        f.debug_struct("VariableNode")
            .field("attributes", &self.attributes)
            .field("references", &state.references)
            .field("value", &state.value)
            .field("historizing", &state.historizing)
            .field("read_value_handler", &state.read_value_handler.is_some())
            .field("write_value_handler", &state.write_value_handler.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::Server;
    use test_case::test_case;
    use uanode_types::Variant;

    fn node(table: Vec<RolePermission>, level: AccessLevel) -> VariableNode {
        let attrs = VariableAttributes::new(
            NodeId::string(2, "Line3.Temperature"),
            QualifiedName::new(2, "Temperature"),
            NodeId::numeric(0, 11),
        )
        .with_role_permissions(table)
        .with_access_level(level);
        VariableNode::new(attrs, vec![], DataValue::new(21.5f64), false)
    }

    fn operator() -> NodeId {
        NodeId::string(2, "Operator")
    }

    #[test]
    fn test_construction_defaults() {
        let n = node(vec![], AccessLevel::CURRENT_READ);
        assert_eq!(n.node_class(), NodeClass::Variable);
        assert_eq!(n.display_name().text, "Temperature");
        assert_eq!(n.value_rank(), VALUE_RANK_SCALAR);
        assert!(n.array_dimensions().is_empty());
        assert_eq!(n.access_restrictions(), 0);
        assert!(n.role_permissions().is_empty());
        assert!(!n.historizing());
        assert!(n.read_value_handler().is_none());
        assert!(n.write_value_handler().is_none());
    }

    #[test]
    fn test_value_round_trip() {
        let n = node(vec![], AccessLevel::CURRENT_READ);
        assert_eq!(n.value().value, Variant::Double(21.5));

        n.set_value(DataValue::new(22.0f64));
        assert_eq!(n.value().value, Variant::Double(22.0));
        assert_eq!(n.value(), n.value());
    }

    #[test]
    fn test_historizing_and_references() {
        let n = node(vec![], AccessLevel::CURRENT_READ);
        n.set_historizing(true);
        assert!(n.historizing());

        let refs = vec![Reference::new(
            NodeId::numeric(0, 40),
            false,
            NodeId::numeric(0, 63),
        )];
        n.set_references(refs.clone());
        assert_eq!(n.references(), refs);
    }

    #[test]
    fn test_handlers_install_and_clear() {
        let n = node(vec![], AccessLevel::CURRENT_READ);
        n.set_read_value_handler(Some(Arc::new(|_: &RequestContext, _: &ReadValueId| {
            DataValue::new(1i32)
        })));
        n.set_write_value_handler(Some(Arc::new(|_: &RequestContext, _: &WriteValue| {
            StatusCode::GOOD
        })));
        assert!(n.read_value_handler().is_some());
        assert!(n.write_value_handler().is_some());

        n.set_read_value_handler(None);
        n.set_write_value_handler(None);
        assert!(n.read_value_handler().is_none());
        assert!(n.write_value_handler().is_none());
    }

    #[test]
    fn test_handler_may_reenter_node() {
        let n = Arc::new(node(vec![], AccessLevel::CURRENT_READ));
        let inner = Arc::clone(&n);
        n.set_read_value_handler(Some(Arc::new(move |_: &RequestContext, _: &ReadValueId| {
            // Takes the write lock; would deadlock if the handler ran under the read lock.
            inner.set_historizing(true);
            inner.value()
        })));

        let handler = n.read_value_handler().unwrap();
        let ctx = RequestContext::background();
        let dv = handler(&ctx, &ReadValueId::new(n.node_id().clone(), AttributeId::Value));
        assert_eq!(dv.value, Variant::Double(21.5));
        assert!(n.historizing());
    }

    #[test]
    fn test_no_session_fails_closed() {
        let n = node(
            vec![RolePermission::new(operator(), PermissionType::READ)],
            AccessLevel::CURRENT_READ | AccessLevel::CURRENT_WRITE,
        );
        let ctx = RequestContext::background();
        assert_eq!(n.user_access_level(&ctx), AccessLevel::NONE);
        assert!(n.user_role_permissions(&ctx).is_empty());
        assert_eq!(n.user_permissions(&ctx), PermissionType::NONE);
        // The raw table is still there for administrative callers.
        assert_eq!(n.role_permissions().len(), 1);
    }

    #[test]
    fn test_node_table_takes_precedence() {
        let server = Arc::new(Server::with_default_role_permissions(vec![RolePermission::new(
            operator(),
            PermissionType::READ | PermissionType::WRITE,
        )]));
        let n = node(
            vec![RolePermission::new(operator(), PermissionType::READ)],
            AccessLevel::CURRENT_READ | AccessLevel::CURRENT_WRITE,
        );
        let ctx = RequestContext::for_session(server.create_session(vec![operator()]));

        assert_eq!(n.user_access_level(&ctx), AccessLevel::CURRENT_READ);
        assert_eq!(
            n.user_role_permissions(&ctx),
            vec![RolePermission::new(operator(), PermissionType::READ)]
        );
    }

    #[test_case(0, false ; "zero")]
    #[test_case(1, true ; "node id")]
    #[test_case(6, false ; "write mask")]
    #[test_case(12, false ; "event notifier")]
    #[test_case(13, true ; "value")]
    #[test_case(20, true ; "historizing")]
    #[test_case(21, false ; "executable")]
    #[test_case(24, true ; "role permissions")]
    #[test_case(25, true ; "user role permissions")]
    #[test_case(26, false ; "access restrictions")]
    #[test_case(27, false ; "access level ex")]
    #[test_case(28, false ; "past the end")]
    #[test_case(u32::MAX, false ; "max")]
    fn test_is_attribute_id_valid(id: u32, expected: bool) {
        let n = node(vec![], AccessLevel::CURRENT_READ);
        assert_eq!(n.is_attribute_id_valid(id), expected);
    }

    #[test]
    fn test_debug_hides_handlers() {
        let n = node(vec![], AccessLevel::CURRENT_READ);
        n.set_read_value_handler(Some(Arc::new(|_: &RequestContext, _: &ReadValueId| {
            DataValue::default()
        })));
        let text = format!("{n:?}");
        assert!(text.contains("read_value_handler: true"));
        assert!(text.contains("write_value_handler: false"));
    }
}
