//! Access-level masking.
//!
//! Narrows a variable's base [`AccessLevel`] to what a caller's roles
//! actually permit. Only three bits are governed by role permissions:
//!
//! | Access-level bit | Required permission |
//! |------------------|---------------------|
//! | `CURRENT_READ`   | `READ`              |
//! | `CURRENT_WRITE`  | `WRITE`             |
//! | `HISTORY_READ`   | `READ_HISTORY`      |
//!
//! Every other bit of the base mask passes through. The result is always a
//! sub-mask of the base: masking can only remove bits.

use tracing::trace;
use uanode_types::{AccessLevel, NodeId, PermissionType, RolePermission};

use crate::filtering::matching_entries;

/// Capabilities granted to a set of roles by a role-permission table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoleGrants {
    pub current_read: bool,
    pub current_write: bool,
    pub history_read: bool,
}

impl RoleGrants {
    /// Scans every entry matching one of `roles`.
    ///
    /// One matching entry is enough to grant a capability; grants from
    /// several entries accumulate.
    pub fn collect(table: &[RolePermission], roles: &[NodeId]) -> Self {
        matching_entries(table, roles).fold(Self::default(), |mut grants, rp| {
            grants.current_read |= rp.permissions.contains(PermissionType::READ);
            grants.current_write |= rp.permissions.contains(PermissionType::WRITE);
            grants.history_read |= rp.permissions.contains(PermissionType::READ_HISTORY);
            grants
        })
    }

    /// Clears each governed bit of `base` that these grants do not cover.
    pub fn apply(self, base: AccessLevel) -> AccessLevel {
        let mut level = base;
        if !self.current_read {
            level.remove(AccessLevel::CURRENT_READ);
        }
        if !self.current_write {
            level.remove(AccessLevel::CURRENT_WRITE);
        }
        if !self.history_read {
            level.remove(AccessLevel::HISTORY_READ);
        }

        debug_assert!(level.is_subset_of(base));
        if level != base {
            trace!(
                base = base.bits(),
                effective = level.bits(),
                grants = ?self,
                "access level narrowed by role permissions"
            );
        }
        level
    }
}

/// Computes the effective access level of `base` for `roles` under `table`.
pub fn mask_access_level(
    base: AccessLevel,
    table: &[RolePermission],
    roles: &[NodeId],
) -> AccessLevel {
    RoleGrants::collect(table, roles).apply(base)
}
