//! Error types for value parsing and conversion.

use thiserror::Error;

/// Error returned when a [`NodeId`](crate::NodeId) cannot be parsed from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NodeIdParseError {
    /// The input had a namespace prefix but no identifier.
    #[error("node id is missing an identifier: {0:?}")]
    MissingIdentifier(String),

    /// The `ns=` component was not a valid `u16`.
    #[error("invalid namespace index: {0:?}")]
    InvalidNamespace(String),

    /// The identifier prefix was not one of `i=`, `s=`, `g=`, `b=`.
    #[error("unknown identifier type in {0:?}")]
    UnknownIdentifierType(String),

    /// The identifier body did not parse for its declared type.
    #[error("invalid {kind} identifier: {value:?}")]
    InvalidIdentifier { kind: &'static str, value: String },
}

/// Error returned when a numeric attribute id is not defined by the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown attribute id: {0}")]
pub struct UnknownAttributeId(pub u32);
