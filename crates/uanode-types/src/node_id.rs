//! Node identifiers.
//!
//! A [`NodeId`] names a node within a server's address space. It pairs a
//! namespace index with one of four identifier kinds. The text form follows
//! the protocol convention:
//!
//! ```text
//! ns=2;s=Boiler.Temperature
//! i=15656                      (namespace 0 may be omitted)
//! ns=1;g=72962b91-fa75-4ae6-8d28-b404dc7daf63
//! ns=3;b=AQID                  (base64)
//! ```

use std::fmt::{self, Display};
use std::str::FromStr;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::NodeIdParseError;

/// The identifier part of a [`NodeId`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identifier {
    Numeric(u32),
    String(String),
    Guid(Uuid),
    Opaque(Bytes),
}

/// Unique identifier for a node in the address space.
///
/// Serialized through its text form so configuration files can name roles
/// and nodes as `"ns=2;s=Pump1"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NodeId {
    namespace: u16,
    identifier: Identifier,
}

impl NodeId {
    /// The null node id (`ns=0;i=0`).
    pub const NULL: NodeId = NodeId {
        namespace: 0,
        identifier: Identifier::Numeric(0),
    };

    pub fn new(namespace: u16, identifier: Identifier) -> Self {
        Self {
            namespace,
            identifier,
        }
    }

    pub fn numeric(namespace: u16, value: u32) -> Self {
        Self::new(namespace, Identifier::Numeric(value))
    }

    pub fn string(namespace: u16, value: impl Into<String>) -> Self {
        Self::new(namespace, Identifier::String(value.into()))
    }

    pub fn guid(namespace: u16, value: Uuid) -> Self {
        Self::new(namespace, Identifier::Guid(value))
    }

    pub fn opaque(namespace: u16, value: impl Into<Bytes>) -> Self {
        Self::new(namespace, Identifier::Opaque(value.into()))
    }

    pub fn namespace(&self) -> u16 {
        self.namespace
    }

    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    /// Returns whether this is the null node id.
    pub fn is_null(&self) -> bool {
        *self == Self::NULL
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::NULL
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace != 0 {
            write!(f, "ns={};", self.namespace)?;
        }
        match &self.identifier {
            Identifier::Numeric(v) => write!(f, "i={v}"),
            Identifier::String(v) => write!(f, "s={v}"),
            Identifier::Guid(v) => write!(f, "g={v}"),
            Identifier::Opaque(v) => write!(f, "b={}", STANDARD.encode(v)),
        }
    }
}

impl FromStr for NodeId {
    type Err = NodeIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (namespace, rest) = match s.strip_prefix("ns=") {
            Some(tail) => {
                let (ns, rest) = tail
                    .split_once(';')
                    .ok_or_else(|| NodeIdParseError::MissingIdentifier(s.to_string()))?;
                let ns = ns
                    .parse::<u16>()
                    .map_err(|_| NodeIdParseError::InvalidNamespace(ns.to_string()))?;
                (ns, rest)
            }
            None => (0, s),
        };

        if rest.is_empty() {
            return Err(NodeIdParseError::MissingIdentifier(s.to_string()));
        }

        let identifier = match rest.split_at_checked(2) {
            Some(("i=", body)) => body
                .parse::<u32>()
                .map(Identifier::Numeric)
                .map_err(|_| NodeIdParseError::InvalidIdentifier {
                    kind: "numeric",
                    value: body.to_string(),
                })?,
            Some(("s=", body)) => Identifier::String(body.to_string()),
            Some(("g=", body)) => Uuid::parse_str(body).map(Identifier::Guid).map_err(|_| {
                NodeIdParseError::InvalidIdentifier {
                    kind: "guid",
                    value: body.to_string(),
                }
            })?,
            Some(("b=", body)) => STANDARD
                .decode(body)
                .map(|raw| Identifier::Opaque(Bytes::from(raw)))
                .map_err(|_| NodeIdParseError::InvalidIdentifier {
                    kind: "opaque",
                    value: body.to_string(),
                })?,
            _ => return Err(NodeIdParseError::UnknownIdentifierType(s.to_string())),
        };

        Ok(Self {
            namespace,
            identifier,
        })
    }
}

impl TryFrom<String> for NodeId {
    type Error = NodeIdParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<NodeId> for String {
    fn from(id: NodeId) -> Self {
        id.to_string()
    }
}

impl From<u32> for NodeId {
    fn from(value: u32) -> Self {
        Self::numeric(0, value)
    }
}
