//! # uanode-server: Variable nodes and per-session access
//!
//! This crate holds the server-side model of a single data point and the
//! logic that decides what each connected user may see or change on it.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  service::read / service::write                          │
//! │  (attribute id check → access check → handler or store)  │
//! └──────────────┬───────────────────────────────────────────┘
//!                │ &RequestContext ─── Option<Arc<Session>> ──→ Arc<Server>
//!                ▼                                               (default table)
//! ┌──────────────────────────────────────────────────────────┐
//! │  VariableNode                                            │
//! │  ├─ VariableAttributes   (immutable, lock-free reads)    │
//! │  └─ RwLock<VariableState> (value, references, handlers)  │
//! └──────────────┬───────────────────────────────────────────┘
//!                ▼
//!        uanode-rbac (resolve → filter / mask)
//! ```
//!
//! A request without a session fails closed: no visible role permissions
//! and a zero user access level.
//!
//! ## Usage
//!
//! ```
//! use std::sync::Arc;
//! use uanode_server::{Node, RequestContext, Server, VariableAttributes, VariableNode};
//! use uanode_types::{AccessLevel, DataValue, NodeId, PermissionType, QualifiedName, RolePermission};
//!
//! let operator = NodeId::string(2, "Operator");
//! let server = Arc::new(Server::with_default_role_permissions(vec![RolePermission::new(
//!     operator.clone(),
//!     PermissionType::READ,
//! )]));
//!
//! let attrs = VariableAttributes::new(
//!     NodeId::string(2, "Boiler.Temperature"),
//!     QualifiedName::new(2, "Temperature"),
//!     NodeId::numeric(0, 11),
//! )
//! .with_access_level(AccessLevel::CURRENT_READ | AccessLevel::CURRENT_WRITE);
//! let node = VariableNode::new(attrs, vec![], DataValue::new(71.3f64), false);
//!
//! let ctx = RequestContext::for_session(server.create_session(vec![operator]));
//! assert_eq!(node.user_access_level(&ctx), AccessLevel::CURRENT_READ);
//! assert_eq!(node.user_role_permissions(&ctx).len(), 1);
//! ```

pub mod context;
pub mod node;
pub mod server;
pub mod service;
pub mod session;
#[cfg(test)]
mod tests;
pub mod variable;

pub use context::RequestContext;
pub use node::Node;
pub use server::Server;
pub use session::{Session, SessionId};
pub use variable::{
    ReadValueHandler, VALUE_RANK_SCALAR, VariableAttributes, VariableNode, WriteValueHandler,
};
