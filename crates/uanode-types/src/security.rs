//! Security value types: permission and access-level bitmasks.
//!
//! [`PermissionType`] is granted to a role by a [`RolePermission`] entry.
//! [`AccessLevel`] describes what can be done with a variable's value,
//! independent of who is asking.

use std::fmt::{self, Display};
use std::ops::{BitAnd, BitOr, BitOrAssign, Not};

use serde::{Deserialize, Serialize};

use crate::NodeId;

// ============================================================================
// PermissionType
// ============================================================================

/// Bitmask of permissions granted to a role on a node.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PermissionType(u32);

impl PermissionType {
    pub const NONE: PermissionType = PermissionType(0);
    pub const BROWSE: PermissionType = PermissionType(0x0000_0001);
    pub const READ_ROLE_PERMISSIONS: PermissionType = PermissionType(0x0000_0002);
    pub const WRITE_ATTRIBUTE: PermissionType = PermissionType(0x0000_0004);
    pub const WRITE_ROLE_PERMISSIONS: PermissionType = PermissionType(0x0000_0008);
    pub const WRITE_HISTORIZING: PermissionType = PermissionType(0x0000_0010);
    pub const READ: PermissionType = PermissionType(0x0000_0020);
    pub const WRITE: PermissionType = PermissionType(0x0000_0040);
    pub const READ_HISTORY: PermissionType = PermissionType(0x0000_0080);
    pub const INSERT_HISTORY: PermissionType = PermissionType(0x0000_0100);
    pub const MODIFY_HISTORY: PermissionType = PermissionType(0x0000_0200);
    pub const DELETE_HISTORY: PermissionType = PermissionType(0x0000_0400);
    pub const RECEIVE_EVENTS: PermissionType = PermissionType(0x0000_0800);
    pub const CALL: PermissionType = PermissionType(0x0000_1000);
    pub const ADD_REFERENCE: PermissionType = PermissionType(0x0000_2000);
    pub const REMOVE_REFERENCE: PermissionType = PermissionType(0x0000_4000);
    pub const DELETE_NODE: PermissionType = PermissionType(0x0000_8000);
    pub const ADD_NODE: PermissionType = PermissionType(0x0001_0000);

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns whether every bit of `other` is set in `self`.
    pub const fn contains(self, other: PermissionType) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns whether any bit of `other` is set in `self`.
    pub const fn intersects(self, other: PermissionType) -> bool {
        self.0 & other.0 != 0
    }
}

impl BitOr for PermissionType {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for PermissionType {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for PermissionType {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self(self.0 & rhs.0)
    }
}

impl Display for PermissionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

/// A single named permission, as written in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Permission {
    Browse,
    ReadRolePermissions,
    WriteAttribute,
    WriteRolePermissions,
    WriteHistorizing,
    Read,
    Write,
    ReadHistory,
    InsertHistory,
    ModifyHistory,
    DeleteHistory,
    ReceiveEvents,
    Call,
    AddReference,
    RemoveReference,
    DeleteNode,
    AddNode,
}

impl Permission {
    /// Returns the bit this permission occupies in a [`PermissionType`].
    pub const fn bit(self) -> PermissionType {
        match self {
            Permission::Browse => PermissionType::BROWSE,
            Permission::ReadRolePermissions => PermissionType::READ_ROLE_PERMISSIONS,
            Permission::WriteAttribute => PermissionType::WRITE_ATTRIBUTE,
            Permission::WriteRolePermissions => PermissionType::WRITE_ROLE_PERMISSIONS,
            Permission::WriteHistorizing => PermissionType::WRITE_HISTORIZING,
            Permission::Read => PermissionType::READ,
            Permission::Write => PermissionType::WRITE,
            Permission::ReadHistory => PermissionType::READ_HISTORY,
            Permission::InsertHistory => PermissionType::INSERT_HISTORY,
            Permission::ModifyHistory => PermissionType::MODIFY_HISTORY,
            Permission::DeleteHistory => PermissionType::DELETE_HISTORY,
            Permission::ReceiveEvents => PermissionType::RECEIVE_EVENTS,
            Permission::Call => PermissionType::CALL,
            Permission::AddReference => PermissionType::ADD_REFERENCE,
            Permission::RemoveReference => PermissionType::REMOVE_REFERENCE,
            Permission::DeleteNode => PermissionType::DELETE_NODE,
            Permission::AddNode => PermissionType::ADD_NODE,
        }
    }
}

impl From<Permission> for PermissionType {
    fn from(permission: Permission) -> Self {
        permission.bit()
    }
}

impl FromIterator<Permission> for PermissionType {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        iter.into_iter()
            .fold(PermissionType::NONE, |acc, p| acc | p.bit())
    }
}

// ============================================================================
// AccessLevel
// ============================================================================

/// Bitmask of operations permitted on a variable's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessLevel(u8);

impl AccessLevel {
    pub const NONE: AccessLevel = AccessLevel(0);
    pub const CURRENT_READ: AccessLevel = AccessLevel(0x01);
    pub const CURRENT_WRITE: AccessLevel = AccessLevel(0x02);
    pub const HISTORY_READ: AccessLevel = AccessLevel(0x04);
    pub const HISTORY_WRITE: AccessLevel = AccessLevel(0x08);
    pub const SEMANTIC_CHANGE: AccessLevel = AccessLevel(0x10);
    pub const STATUS_WRITE: AccessLevel = AccessLevel(0x20);
    pub const TIMESTAMP_WRITE: AccessLevel = AccessLevel(0x40);

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns whether every bit of `other` is set in `self`.
    pub const fn contains(self, other: AccessLevel) -> bool {
        self.0 & other.0 == other.0
    }

    /// Clears the bits of `other` from `self`.
    pub fn remove(&mut self, other: AccessLevel) {
        self.0 &= !other.0;
    }

    /// Returns whether `self` has no bit outside `other`.
    pub const fn is_subset_of(self, other: AccessLevel) -> bool {
        self.0 & other.0 == self.0
    }
}

impl BitOr for AccessLevel {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitAnd for AccessLevel {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self(self.0 & rhs.0)
    }
}

impl Not for AccessLevel {
    type Output = Self;

    fn not(self) -> Self::Output {
        Self(!self.0)
    }
}

impl From<u8> for AccessLevel {
    fn from(bits: u8) -> Self {
        Self(bits)
    }
}

impl From<AccessLevel> for u8 {
    fn from(level: AccessLevel) -> Self {
        level.0
    }
}

// ============================================================================
// RolePermission
// ============================================================================

/// Pairs a role with the permissions it is granted on a node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RolePermission {
    pub role_id: NodeId,
    pub permissions: PermissionType,
}

impl RolePermission {
    pub fn new(role_id: NodeId, permissions: impl Into<PermissionType>) -> Self {
        Self {
            role_id,
            permissions: permissions.into(),
        }
    }
}
