//! Standard role-permission tables.
//!
//! Servers that configure no default table fall back to
//! [`StandardPolicies::default_role_permissions`].

use uanode_types::{PermissionType, RolePermission};

use crate::roles::WellKnownRole;

const VIEW: PermissionType = PermissionType::from_bits(
    PermissionType::BROWSE.bits()
        | PermissionType::READ.bits()
        | PermissionType::READ_HISTORY.bits()
        | PermissionType::RECEIVE_EVENTS.bits(),
);

const OPERATE: PermissionType = PermissionType::from_bits(
    VIEW.bits() | PermissionType::WRITE.bits() | PermissionType::CALL.bits(),
);

const CONFIGURE: PermissionType = PermissionType::from_bits(
    OPERATE.bits()
        | PermissionType::READ_ROLE_PERMISSIONS.bits()
        | PermissionType::WRITE_ATTRIBUTE.bits()
        | PermissionType::WRITE_HISTORIZING.bits()
        | PermissionType::ADD_REFERENCE.bits()
        | PermissionType::REMOVE_REFERENCE.bits()
        | PermissionType::ADD_NODE.bits()
        | PermissionType::DELETE_NODE.bits(),
);

const EVERYTHING: PermissionType = PermissionType::from_bits(
    CONFIGURE.bits()
        | PermissionType::WRITE_ROLE_PERMISSIONS.bits()
        | PermissionType::DELETE_HISTORY.bits()
        | PermissionType::INSERT_HISTORY.bits()
        | PermissionType::MODIFY_HISTORY.bits(),
);

/// Pre-defined permission sets for the well-known roles.
pub struct StandardPolicies;

impl StandardPolicies {
    /// Permissions the built-in default table grants `role`.
    pub fn permissions_for(role: WellKnownRole) -> PermissionType {
        match role {
            WellKnownRole::Anonymous
            | WellKnownRole::AuthenticatedUser
            | WellKnownRole::Observer => VIEW,
            WellKnownRole::Operator | WellKnownRole::Supervisor => OPERATE,
            WellKnownRole::Engineer => OPERATE | PermissionType::WRITE_HISTORIZING,
            WellKnownRole::ConfigureAdmin => CONFIGURE,
            WellKnownRole::SecurityAdmin => EVERYTHING,
        }
    }

    /// One entry per well-known role.
    pub fn default_role_permissions() -> Vec<RolePermission> {
        WellKnownRole::ALL
            .into_iter()
            .map(|role| RolePermission::new(role.node_id(), Self::permissions_for(role)))
            .collect()
    }
}
