//! Client sessions.

use std::fmt::{self, Display};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uanode_types::NodeId;
use uuid::Uuid;

use crate::server::Server;

/// Unique identifier for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One connected, authenticated user and the roles granted to them.
///
/// The role set is fixed for the life of the session.
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    user_roles: Vec<NodeId>,
    server: Arc<Server>,
}

impl Session {
    pub fn new(server: Arc<Server>, user_roles: Vec<NodeId>) -> Self {
        Self {
            id: SessionId::new(),
            user_roles,
            server,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn user_roles(&self) -> &[NodeId] {
        &self.user_roles
    }

    /// The server that owns this session.
    pub fn server(&self) -> &Server {
        &self.server
    }
}
