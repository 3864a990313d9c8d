//! Server-wide state consulted by node operations.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tracing::{debug, info};
use uanode_config::{ServerInfoConfig, UanodeConfig};
use uanode_rbac::StandardPolicies;
use uanode_types::{NodeId, RolePermission};

use crate::session::Session;

/// The owning server of a set of sessions.
///
/// Holds the default role-permission table that governs every node without
/// a table of its own. The table is fixed at construction.
#[derive(Debug)]
pub struct Server {
    info: ServerInfoConfig,
    default_role_permissions: Vec<RolePermission>,
}

impl Server {
    /// Creates a server from configuration.
    ///
    /// When the configuration names no default role permissions the
    /// built-in standard table is used.
    pub fn new(config: &UanodeConfig) -> Self {
        let mut default_role_permissions = config.default_role_permissions();
        if default_role_permissions.is_empty() {
            debug!("no default role permissions configured; using standard table");
            default_role_permissions = StandardPolicies::default_role_permissions();
        }

        info!(
            application_name = %config.server.application_name,
            application_uri = %config.server.application_uri,
            default_roles = default_role_permissions.len(),
            "server configured"
        );

        Self {
            info: config.server.clone(),
            default_role_permissions,
        }
    }

    /// Creates a server with an explicit default table, taken verbatim.
    pub fn with_default_role_permissions(default_role_permissions: Vec<RolePermission>) -> Self {
        Self {
            info: ServerInfoConfig::default(),
            default_role_permissions,
        }
    }

    /// Loads layered configuration for `project_dir` and builds a server.
    pub fn load_from_dir(project_dir: impl AsRef<Path>) -> anyhow::Result<Self> {
        let project_dir = project_dir.as_ref();
        let config = UanodeConfig::load_from_dir(project_dir).with_context(|| {
            format!("Failed to load server configuration from {}", project_dir.display())
        })?;
        Ok(Self::new(&config))
    }

    /// Builds a server from a single TOML file, skipping layering and env overrides.
    pub fn load_from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let config = UanodeConfig::from_toml_file(path).with_context(|| {
            format!("Failed to load server configuration file {}", path.display())
        })?;
        Ok(Self::new(&config))
    }

    pub fn info(&self) -> &ServerInfoConfig {
        &self.info
    }

    /// The server-wide default role-permission table.
    pub fn role_permissions(&self) -> &[RolePermission] {
        &self.default_role_permissions
    }

    /// Opens a session for a user holding `user_roles`.
    pub fn create_session(self: &Arc<Self>, user_roles: Vec<NodeId>) -> Arc<Session> {
        let session = Session::new(Arc::clone(self), user_roles);
        debug!(
            session_id = %session.id(),
            roles = session.user_roles().len(),
            "session created"
        );
        Arc::new(session)
    }
}
