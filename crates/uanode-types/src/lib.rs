//! # uanode-types: Core value types for `uanode`
//!
//! This crate contains the value types exchanged between the address space,
//! the access resolver, and the service layer:
//! - Identity ([`NodeId`], [`QualifiedName`], [`LocalizedText`], [`NodeClass`])
//! - Attributes ([`AttributeId`])
//! - Values ([`Variant`], [`VariantType`], [`DataValue`], [`StatusCode`])
//! - Graph edges ([`Reference`])
//! - Service requests ([`ReadValueId`], [`WriteValue`])
//! - Security ([`PermissionType`], [`Permission`], [`AccessLevel`], [`RolePermission`])
//!
//! None of these types carry behavior beyond construction, comparison, and
//! conversion. Encoding to the wire lives elsewhere.

use std::fmt::{self, Display};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

mod error;
mod node_id;
mod security;
mod variant;

pub use error::{NodeIdParseError, UnknownAttributeId};
pub use node_id::{Identifier, NodeId};
pub use security::{AccessLevel, Permission, PermissionType, RolePermission};
pub use variant::{Variant, VariantType};

// ============================================================================
// Node classes
// ============================================================================

/// Class of a node in the address space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u32)]
pub enum NodeClass {
    #[default]
    Unspecified = 0,
    Object = 1,
    Variable = 2,
    Method = 4,
    ObjectType = 8,
    VariableType = 16,
    ReferenceType = 32,
    DataType = 64,
    View = 128,
}

impl From<NodeClass> for u32 {
    fn from(class: NodeClass) -> Self {
        class as u32
    }
}

// ============================================================================
// Attribute ids
// ============================================================================

/// Identifier of a node attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum AttributeId {
    NodeId = 1,
    NodeClass = 2,
    BrowseName = 3,
    DisplayName = 4,
    Description = 5,
    WriteMask = 6,
    UserWriteMask = 7,
    IsAbstract = 8,
    Symmetric = 9,
    InverseName = 10,
    ContainsNoLoops = 11,
    EventNotifier = 12,
    Value = 13,
    DataType = 14,
    ValueRank = 15,
    ArrayDimensions = 16,
    AccessLevel = 17,
    UserAccessLevel = 18,
    MinimumSamplingInterval = 19,
    Historizing = 20,
    Executable = 21,
    UserExecutable = 22,
    DataTypeDefinition = 23,
    RolePermissions = 24,
    UserRolePermissions = 25,
    AccessRestrictions = 26,
    AccessLevelEx = 27,
}

impl AttributeId {
    /// Every attribute id, in numeric order.
    pub const ALL: [AttributeId; 27] = [
        AttributeId::NodeId,
        AttributeId::NodeClass,
        AttributeId::BrowseName,
        AttributeId::DisplayName,
        AttributeId::Description,
        AttributeId::WriteMask,
        AttributeId::UserWriteMask,
        AttributeId::IsAbstract,
        AttributeId::Symmetric,
        AttributeId::InverseName,
        AttributeId::ContainsNoLoops,
        AttributeId::EventNotifier,
        AttributeId::Value,
        AttributeId::DataType,
        AttributeId::ValueRank,
        AttributeId::ArrayDimensions,
        AttributeId::AccessLevel,
        AttributeId::UserAccessLevel,
        AttributeId::MinimumSamplingInterval,
        AttributeId::Historizing,
        AttributeId::Executable,
        AttributeId::UserExecutable,
        AttributeId::DataTypeDefinition,
        AttributeId::RolePermissions,
        AttributeId::UserRolePermissions,
        AttributeId::AccessRestrictions,
        AttributeId::AccessLevelEx,
    ];

    pub const fn as_u32(self) -> u32 {
        self as u32
    }
}

impl TryFrom<u32> for AttributeId {
    type Error = UnknownAttributeId;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        // Ids are dense from 1.
        match value {
            1..=27 => Ok(Self::ALL[(value - 1) as usize]),
            _ => Err(UnknownAttributeId(value)),
        }
    }
}

impl From<AttributeId> for u32 {
    fn from(id: AttributeId) -> Self {
        id.as_u32()
    }
}

// ============================================================================
// Names and text
// ============================================================================

/// A name qualified by a namespace index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct QualifiedName {
    pub namespace_index: u16,
    pub name: String,
}

impl QualifiedName {
    pub fn new(namespace_index: u16, name: impl Into<String>) -> Self {
        Self {
            namespace_index,
            name: name.into(),
        }
    }
}

impl Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace_index, self.name)
    }
}

/// Human-readable text with an optional locale.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct LocalizedText {
    pub locale: String,
    pub text: String,
}

impl LocalizedText {
    pub fn new(text: impl Into<String>, locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            text: text.into(),
        }
    }

    /// Text with no locale.
    pub fn invariant(text: impl Into<String>) -> Self {
        Self::new(text, "")
    }
}

// ============================================================================
// Status codes
// ============================================================================

/// Result code attached to values and service results.
///
/// The top two bits carry severity: `00` good, `01` uncertain, `10` bad.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct StatusCode(u32);

impl StatusCode {
    pub const GOOD: StatusCode = StatusCode(0);
    pub const BAD_USER_ACCESS_DENIED: StatusCode = StatusCode(0x801F_0000);
    pub const BAD_NODE_ID_UNKNOWN: StatusCode = StatusCode(0x8034_0000);
    pub const BAD_ATTRIBUTE_ID_INVALID: StatusCode = StatusCode(0x8035_0000);
    pub const BAD_NOT_READABLE: StatusCode = StatusCode(0x803A_0000);
    pub const BAD_NOT_WRITABLE: StatusCode = StatusCode(0x803B_0000);
    pub const BAD_WRITE_NOT_SUPPORTED: StatusCode = StatusCode(0x8073_0000);
    pub const BAD_TYPE_MISMATCH: StatusCode = StatusCode(0x8074_0000);

    const SEVERITY_MASK: u32 = 0xC000_0000;
    const SEVERITY_BAD: u32 = 0x8000_0000;
    const SEVERITY_UNCERTAIN: u32 = 0x4000_0000;

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn is_good(self) -> bool {
        self.0 & Self::SEVERITY_MASK == 0
    }

    pub const fn is_uncertain(self) -> bool {
        self.0 & Self::SEVERITY_MASK == Self::SEVERITY_UNCERTAIN
    }

    pub const fn is_bad(self) -> bool {
        self.0 & Self::SEVERITY_MASK == Self::SEVERITY_BAD
    }

    /// Symbolic name for the codes this crate defines.
    pub fn name(self) -> Option<&'static str> {
        let name = match self {
            Self::GOOD => "Good",
            Self::BAD_USER_ACCESS_DENIED => "BadUserAccessDenied",
            Self::BAD_NODE_ID_UNKNOWN => "BadNodeIdUnknown",
            Self::BAD_ATTRIBUTE_ID_INVALID => "BadAttributeIdInvalid",
            Self::BAD_NOT_READABLE => "BadNotReadable",
            Self::BAD_NOT_WRITABLE => "BadNotWritable",
            Self::BAD_WRITE_NOT_SUPPORTED => "BadWriteNotSupported",
            Self::BAD_TYPE_MISMATCH => "BadTypeMismatch",
            _ => return None,
        };
        Some(name)
    }
}

impl Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{name} ({:#010x})", self.0),
            None => write!(f, "{:#010x}", self.0),
        }
    }
}

// ============================================================================
// DataValue
// ============================================================================

/// A value bundled with its status and timestamps.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DataValue {
    pub value: Variant,
    pub status: StatusCode,
    pub source_timestamp: Option<DateTime<Utc>>,
    pub server_timestamp: Option<DateTime<Utc>>,
}

impl DataValue {
    /// Creates a Good value with no timestamps.
    pub fn new(value: impl Into<Variant>) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }

    /// Creates a valueless result carrying only a status.
    pub fn from_status(status: StatusCode) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn with_source_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.source_timestamp = Some(timestamp);
        self
    }

    pub fn with_server_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.server_timestamp = Some(timestamp);
        self
    }
}

// ============================================================================
// References
// ============================================================================

/// A typed, directed edge from one node to another.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reference {
    pub reference_type_id: NodeId,
    pub is_inverse: bool,
    pub target_id: NodeId,
}

impl Reference {
    pub fn new(reference_type_id: NodeId, is_inverse: bool, target_id: NodeId) -> Self {
        Self {
            reference_type_id,
            is_inverse,
            target_id,
        }
    }
}

// ============================================================================
// Service requests
// ============================================================================

/// Identifies one attribute of one node to read.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReadValueId {
    pub node_id: NodeId,
    pub attribute_id: u32,
    pub index_range: Option<String>,
}

impl ReadValueId {
    pub fn new(node_id: NodeId, attribute_id: impl Into<u32>) -> Self {
        Self {
            node_id,
            attribute_id: attribute_id.into(),
            index_range: None,
        }
    }
}

/// A value to write to one attribute of one node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WriteValue {
    pub node_id: NodeId,
    pub attribute_id: u32,
    pub index_range: Option<String>,
    pub value: DataValue,
}

impl WriteValue {
    pub fn new(node_id: NodeId, attribute_id: impl Into<u32>, value: DataValue) -> Self {
        Self {
            node_id,
            attribute_id: attribute_id.into(),
            index_range: None,
            value,
        }
    }
}
