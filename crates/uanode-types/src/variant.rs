//! Variant values.
//!
//! A [`Variant`] holds one value (or an array of values) of a built-in
//! protocol type. [`VariantType`] carries the protocol type tags in wire
//! order so the encoding layer can map between the two.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::security::RolePermission;
use crate::{LocalizedText, NodeId, QualifiedName, StatusCode};

/// Built-in type tags, in protocol order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum VariantType {
    Null = 0,
    Boolean,
    SByte,
    Byte,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float,
    Double,
    String,
    DateTime,
    Guid,
    ByteString,
    XmlElement,
    NodeId,
    ExpandedNodeId,
    StatusCode,
    QualifiedName,
    LocalizedText,
    ExtensionObject,
    DataValue,
    Variant,
    DiagnosticInfo,
}

impl From<VariantType> for u8 {
    fn from(value: VariantType) -> Self {
        value as u8
    }
}

/// A single value or array of built-in protocol values.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Variant {
    #[default]
    Null,
    Boolean(bool),
    SByte(i8),
    Byte(u8),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Float(f32),
    Double(f64),
    String(String),
    DateTime(DateTime<Utc>),
    Guid(Uuid),
    ByteString(Bytes),
    NodeId(NodeId),
    StatusCode(StatusCode),
    QualifiedName(QualifiedName),
    LocalizedText(LocalizedText),
    /// Structured role-permission entry, carried as an extension object.
    RolePermission(RolePermission),
    /// Single-dimension array. Elements are expected to share one type.
    Array(Vec<Variant>),
}

impl Variant {
    /// Returns the built-in type tag of this value.
    ///
    /// Arrays report the tag of their elements; an empty array reports `Null`.
    pub fn variant_type(&self) -> VariantType {
        match self {
            Variant::Null => VariantType::Null,
            Variant::Boolean(_) => VariantType::Boolean,
            Variant::SByte(_) => VariantType::SByte,
            Variant::Byte(_) => VariantType::Byte,
            Variant::Int16(_) => VariantType::Int16,
            Variant::UInt16(_) => VariantType::UInt16,
            Variant::Int32(_) => VariantType::Int32,
            Variant::UInt32(_) => VariantType::UInt32,
            Variant::Int64(_) => VariantType::Int64,
            Variant::UInt64(_) => VariantType::UInt64,
            Variant::Float(_) => VariantType::Float,
            Variant::Double(_) => VariantType::Double,
            Variant::String(_) => VariantType::String,
            Variant::DateTime(_) => VariantType::DateTime,
            Variant::Guid(_) => VariantType::Guid,
            Variant::ByteString(_) => VariantType::ByteString,
            Variant::NodeId(_) => VariantType::NodeId,
            Variant::StatusCode(_) => VariantType::StatusCode,
            Variant::QualifiedName(_) => VariantType::QualifiedName,
            Variant::LocalizedText(_) => VariantType::LocalizedText,
            Variant::RolePermission(_) => VariantType::ExtensionObject,
            Variant::Array(items) => items
                .first()
                .map_or(VariantType::Null, Variant::variant_type),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Variant::Null)
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Variant::Array(_))
    }
}

macro_rules! impl_from_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Variant {
                fn from(value: $ty) -> Self {
                    Variant::$variant(value)
                }
            }
        )*
    };
}

impl_from_scalar! {
    bool => Boolean,
    i8 => SByte,
    u8 => Byte,
    i16 => Int16,
    u16 => UInt16,
    i32 => Int32,
    u32 => UInt32,
    i64 => Int64,
    u64 => UInt64,
    f32 => Float,
    f64 => Double,
    String => String,
    DateTime<Utc> => DateTime,
    Uuid => Guid,
    Bytes => ByteString,
    NodeId => NodeId,
    StatusCode => StatusCode,
    QualifiedName => QualifiedName,
    LocalizedText => LocalizedText,
    RolePermission => RolePermission,
}

impl From<&str> for Variant {
    fn from(value: &str) -> Self {
        Variant::String(value.to_string())
    }
}

impl<T: Into<Variant>> From<Vec<T>> for Variant {
    fn from(values: Vec<T>) -> Self {
        Variant::Array(values.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::security::PermissionType;

    #[test]
    fn test_type_tags_follow_protocol_order() {
        assert_eq!(u8::from(VariantType::Null), 0);
        assert_eq!(u8::from(VariantType::Boolean), 1);
        assert_eq!(u8::from(VariantType::String), 12);
        assert_eq!(u8::from(VariantType::NodeId), 17);
        assert_eq!(u8::from(VariantType::ExtensionObject), 22);
        assert_eq!(u8::from(VariantType::DiagnosticInfo), 25);
    }

    #[test]
    fn test_variant_type() {
        assert_eq!(Variant::from(true).variant_type(), VariantType::Boolean);
        assert_eq!(Variant::from(1.5f64).variant_type(), VariantType::Double);
        assert_eq!(Variant::from("x").variant_type(), VariantType::String);
        assert_eq!(Variant::Null.variant_type(), VariantType::Null);

        let rp = RolePermission::new(NodeId::numeric(0, 15656), PermissionType::READ);
        assert_eq!(
            Variant::from(rp).variant_type(),
            VariantType::ExtensionObject
        );
    }

    #[test]
    fn test_array_reports_element_type() {
        let dims = Variant::from(vec![2u32, 3u32]);
        assert!(dims.is_array());
        assert_eq!(dims.variant_type(), VariantType::UInt32);
        assert_eq!(Variant::Array(vec![]).variant_type(), VariantType::Null);
    }
}
