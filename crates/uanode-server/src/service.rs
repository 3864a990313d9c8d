//! Attribute read and write dispatch for variable nodes.
//!
//! This is the consumer of the node contract: it rejects unsupported
//! attribute ids before anything else runs, gates the value on the caller's
//! effective access level, and routes to a custom handler when one is
//! installed. Failures are reported as status codes, never as errors.

use chrono::Utc;
use tracing::debug;
use uanode_types::{
    AccessLevel, AttributeId, DataValue, NodeId, PermissionType, ReadValueId, StatusCode,
    Variant, WriteValue,
};

use crate::context::RequestContext;
use crate::node::Node;
use crate::variable::VariableNode;

/// Reads one attribute of `node` on behalf of the caller in `ctx`.
pub fn read(ctx: &RequestContext, node: &VariableNode, request: &ReadValueId) -> DataValue {
    let attribute = match check_target(node, &request.node_id, request.attribute_id) {
        Ok(attribute) => attribute,
        Err(status) => return DataValue::from_status(status),
    };

    match attribute {
        AttributeId::Value => read_value(ctx, node, request),
        AttributeId::RolePermissions => {
            if !node
                .user_permissions(ctx)
                .contains(PermissionType::READ_ROLE_PERMISSIONS)
            {
                return denied(node.node_id(), attribute);
            }
            stamped(Variant::from(node.role_permissions().to_vec()))
        }
        AttributeId::UserRolePermissions => {
            stamped(Variant::from(node.user_role_permissions(ctx)))
        }
        AttributeId::DataType => stamped(node.data_type().clone().into()),
        AttributeId::ValueRank => stamped(node.value_rank().into()),
        AttributeId::ArrayDimensions => stamped(node.array_dimensions().to_vec().into()),
        AttributeId::AccessLevel => stamped(node.access_level().bits().into()),
        AttributeId::UserAccessLevel => stamped(node.user_access_level(ctx).bits().into()),
        AttributeId::MinimumSamplingInterval => {
            stamped(node.minimum_sampling_interval().into())
        }
        AttributeId::Historizing => stamped(node.historizing().into()),
        other => match read_identity(node, other) {
            Some(value) => stamped(value),
            None => DataValue::from_status(StatusCode::BAD_ATTRIBUTE_ID_INVALID),
        },
    }
}

/// Writes one attribute of `node` on behalf of the caller in `ctx`.
///
/// Only `Value` and `Historizing` are writable.
pub fn write(ctx: &RequestContext, node: &VariableNode, request: &WriteValue) -> StatusCode {
    let attribute = match check_target(node, &request.node_id, request.attribute_id) {
        Ok(attribute) => attribute,
        Err(status) => return status,
    };

    match attribute {
        AttributeId::Value => {
            if !node.access_level().contains(AccessLevel::CURRENT_WRITE) {
                return StatusCode::BAD_NOT_WRITABLE;
            }
            if !node
                .user_access_level(ctx)
                .contains(AccessLevel::CURRENT_WRITE)
            {
                debug!(node_id = %node.node_id(), ?attribute, "write denied by role permissions");
                return StatusCode::BAD_USER_ACCESS_DENIED;
            }
            match node.write_value_handler() {
                Some(handler) => handler(ctx, request),
                None => {
                    node.set_value(request.value.clone());
                    StatusCode::GOOD
                }
            }
        }
        AttributeId::Historizing => {
            if !node
                .user_permissions(ctx)
                .contains(PermissionType::WRITE_HISTORIZING)
            {
                debug!(node_id = %node.node_id(), ?attribute, "write denied by role permissions");
                return StatusCode::BAD_USER_ACCESS_DENIED;
            }
            match request.value.value {
                Variant::Boolean(historizing) => {
                    node.set_historizing(historizing);
                    StatusCode::GOOD
                }
                _ => StatusCode::BAD_TYPE_MISMATCH,
            }
        }
        _ => StatusCode::BAD_NOT_WRITABLE,
    }
}

fn check_target(
    node: &VariableNode,
    node_id: &NodeId,
    attribute_id: u32,
) -> Result<AttributeId, StatusCode> {
    if node_id != node.node_id() {
        return Err(StatusCode::BAD_NODE_ID_UNKNOWN);
    }
    if !node.is_attribute_id_valid(attribute_id) {
        return Err(StatusCode::BAD_ATTRIBUTE_ID_INVALID);
    }
    AttributeId::try_from(attribute_id).map_err(|_| StatusCode::BAD_ATTRIBUTE_ID_INVALID)
}

fn read_value(ctx: &RequestContext, node: &VariableNode, request: &ReadValueId) -> DataValue {
    if !node.access_level().contains(AccessLevel::CURRENT_READ) {
        return DataValue::from_status(StatusCode::BAD_NOT_READABLE);
    }
    if !node
        .user_access_level(ctx)
        .contains(AccessLevel::CURRENT_READ)
    {
        return denied(node.node_id(), AttributeId::Value);
    }
    match node.read_value_handler() {
        Some(handler) => handler(ctx, request),
        None => node.value(),
    }
}

/// Attributes every node class carries.
fn read_identity(node: &dyn Node, attribute: AttributeId) -> Option<Variant> {
    let value = match attribute {
        AttributeId::NodeId => node.node_id().clone().into(),
        AttributeId::NodeClass => Variant::Int32(u32::from(node.node_class()).cast_signed()),
        AttributeId::BrowseName => node.browse_name().clone().into(),
        AttributeId::DisplayName => node.display_name().clone().into(),
        AttributeId::Description => node.description().clone().into(),
        _ => return None,
    };
    Some(value)
}

fn stamped(value: Variant) -> DataValue {
    DataValue::new(value).with_server_timestamp(Utc::now())
}

fn denied(node_id: &NodeId, attribute: AttributeId) -> DataValue {
    debug!(%node_id, ?attribute, "read denied by role permissions");
    DataValue::from_status(StatusCode::BAD_USER_ACCESS_DENIED)
}
