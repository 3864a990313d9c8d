#![allow(clippy::match_same_arms)]
//! Well-known roles.
//!
//! Servers may define their own roles as arbitrary node ids. The protocol
//! reserves eight well-known roles in namespace 0; these are the roles the
//! built-in default table grants permissions to.

use serde::{Deserialize, Serialize};
use uanode_types::NodeId;

/// A role defined by the base information model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WellKnownRole {
    /// Sessions that supplied no user identity.
    Anonymous,
    /// Any session with a validated user identity.
    AuthenticatedUser,
    /// May browse and read live and historical data.
    Observer,
    /// May additionally write live values and call methods.
    Operator,
    /// May change the configuration of the underlying process.
    Engineer,
    /// May browse, read, write, and call on behalf of operators.
    Supervisor,
    /// May change non-security configuration of the server.
    ConfigureAdmin,
    /// May change security configuration, including role permissions.
    SecurityAdmin,
}

impl WellKnownRole {
    pub const ALL: [WellKnownRole; 8] = [
        WellKnownRole::Anonymous,
        WellKnownRole::AuthenticatedUser,
        WellKnownRole::Observer,
        WellKnownRole::Operator,
        WellKnownRole::Engineer,
        WellKnownRole::Supervisor,
        WellKnownRole::ConfigureAdmin,
        WellKnownRole::SecurityAdmin,
    ];

    /// Numeric identifier of the role object in namespace 0.
    pub const fn numeric_id(self) -> u32 {
        match self {
            WellKnownRole::Anonymous => 15644,
            WellKnownRole::AuthenticatedUser => 15656,
            WellKnownRole::Observer => 15668,
            WellKnownRole::Operator => 15680,
            WellKnownRole::Engineer => 16036,
            WellKnownRole::Supervisor => 15692,
            WellKnownRole::ConfigureAdmin => 15716,
            WellKnownRole::SecurityAdmin => 15704,
        }
    }

    pub fn node_id(self) -> NodeId {
        NodeId::numeric(0, self.numeric_id())
    }

    /// Looks up the well-known role a node id names, if any.
    pub fn from_node_id(id: &NodeId) -> Option<Self> {
        if id.namespace() != 0 {
            return None;
        }
        Self::ALL.into_iter().find(|role| role.node_id() == *id)
    }
}

impl From<WellKnownRole> for NodeId {
    fn from(role: WellKnownRole) -> Self {
        role.node_id()
    }
}
