//! Configuration management for uanode
//!
//! Provides hierarchical configuration loading from multiple sources:
//! 1. Environment variables (UANODE_* prefix, highest precedence)
//! 2. uanode.local.toml (gitignored, local overrides)
//! 3. uanode.toml (git-tracked, project config)
//! 4. ~/.config/uanode/config.toml (user defaults)
//! 5. Built-in defaults (lowest precedence)
//!
//! ```toml
//! [server]
//! application_name = "Boiler Line 3"
//!
//! [[security.default_role_permissions]]
//! role = "i=15656"
//! permissions = ["browse", "read", "read-history"]
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use uanode_types::{NodeId, Permission, PermissionType, RolePermission};

mod error;
mod loader;
mod paths;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use paths::Paths;

/// Main uanode configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UanodeConfig {
    pub server: ServerInfoConfig,
    pub security: SecurityConfig,
}

/// Identity the server advertises to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerInfoConfig {
    pub application_name: String,
    pub application_uri: String,
    pub product_uri: String,
}

impl Default for ServerInfoConfig {
    fn default() -> Self {
        Self {
            application_name: "uanode-server".to_string(),
            application_uri: "urn:localhost:uanode".to_string(),
            product_uri: "urn:uanode".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Server-wide role permissions, used for every node that has no table
    /// of its own. Empty means the built-in standard table.
    pub default_role_permissions: Vec<RolePermissionConfig>,
}

/// One role-permission entry as written in a config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePermissionConfig {
    pub role: NodeId,
    #[serde(default)]
    pub permissions: Vec<Permission>,
}

impl RolePermissionConfig {
    pub fn to_role_permission(&self) -> RolePermission {
        let permissions: PermissionType = self.permissions.iter().copied().collect();
        RolePermission::new(self.role.clone(), permissions)
    }
}

impl UanodeConfig {
    /// Load configuration from default locations
    pub fn load() -> anyhow::Result<Self> {
        ConfigLoader::new().load()
    }

    /// Load configuration from specific project directory
    pub fn load_from_dir(project_dir: impl AsRef<Path>) -> anyhow::Result<Self> {
        ConfigLoader::new().with_project_dir(project_dir).load()
    }

    /// Parse a single TOML file, without layering or environment overrides
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&text).map_err(|source| ConfigError::ParseError {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// The configured default table, converted to permission bitmasks.
    ///
    /// Empty when the config leaves the choice to the server.
    pub fn default_role_permissions(&self) -> Vec<RolePermission> {
        self.security
            .default_role_permissions
            .iter()
            .map(RolePermissionConfig::to_role_permission)
            .collect()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.application_name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "server.application_name must not be empty".to_string(),
            ));
        }

        if let Some(entry) = self
            .security
            .default_role_permissions
            .iter()
            .find(|entry| entry.role.is_null())
        {
            return Err(ConfigError::ValidationError(format!(
                "security.default_role_permissions entry has a null role: {entry:?}"
            )));
        }

        Ok(())
    }
}
