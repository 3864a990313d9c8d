//! # uanode-rbac: Role-permission resolution
//!
//! Derives what a caller may see and do on a node from the caller's roles:
//! - **Table resolution**: a node's own role-permission table, or the
//!   server-wide default when the node has none
//! - **Role-permission filtering**: the entries visible to the caller
//! - **Access-level masking**: the value capabilities the caller can exercise
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────┐   ┌──────────────────────┐
//! │  Node table          │   │  Server default      │
//! └──────────┬───────────┘   └──────────┬───────────┘
//!            └────────────┬─────────────┘
//!                         ▼
//!            resolve_role_permissions
//!                         │
//!          ┌──────────────┴──────────────┐
//!          ▼                             ▼
//! filter_role_permissions        mask_access_level
//! (visible entries)              (effective AccessLevel)
//! ```
//!
//! Everything here is a pure function over borrowed data. Callers supply
//! the roles; deciding what to do when there is no caller at all is left
//! to the server layer.
//!
//! ## Examples
//!
//! ```
//! use uanode_rbac::{mask_access_level, resolve_role_permissions, WellKnownRole};
//! use uanode_types::{AccessLevel, PermissionType, RolePermission};
//!
//! let node_table = vec![RolePermission::new(
//!     WellKnownRole::Operator.node_id(),
//!     PermissionType::READ,
//! )];
//! let table = resolve_role_permissions(&node_table, &[]);
//!
//! let base = AccessLevel::CURRENT_READ | AccessLevel::CURRENT_WRITE;
//! let effective = mask_access_level(base, table, &[WellKnownRole::Operator.node_id()]);
//! assert_eq!(effective, AccessLevel::CURRENT_READ);
//! ```

pub mod filtering;
pub mod masking;
pub mod policy;
pub mod roles;

// Re-export commonly used types
pub use filtering::{effective_permissions, filter_role_permissions, resolve_role_permissions};
pub use masking::{RoleGrants, mask_access_level};
pub use policy::StandardPolicies;
pub use roles::WellKnownRole;
