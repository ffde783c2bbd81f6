use std::fmt::Display;

use derive_more::From;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// The declared type of a stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    Bool,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    String,
    Uuid,
    ByteArray,
    List,
}

impl Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            DataType::Bool => "bool",
            DataType::Byte => "byte",
            DataType::Short => "short",
            DataType::Int => "int",
            DataType::Long => "long",
            DataType::Float => "float",
            DataType::Double => "double",
            DataType::String => "string",
            DataType::Uuid => "uuid",
            DataType::ByteArray => "byte array",
            DataType::List => "list",
        })
    }
}

/// A value that can be attached to a game object.
#[derive(Debug, Clone, PartialEq, From, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum DataValue {
    Bool(bool),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    Uuid(Uuid),
    ByteArray(Vec<u8>),
    List(Vec<DataValue>),
}

impl DataValue {
    pub fn data_type(&self) -> DataType {
        match self {
            DataValue::Bool(_) => DataType::Bool,
            DataValue::Byte(_) => DataType::Byte,
            DataValue::Short(_) => DataType::Short,
            DataValue::Int(_) => DataType::Int,
            DataValue::Long(_) => DataType::Long,
            DataValue::Float(_) => DataType::Float,
            DataValue::Double(_) => DataType::Double,
            DataValue::String(_) => DataType::String,
            DataValue::Uuid(_) => DataType::Uuid,
            DataValue::ByteArray(_) => DataType::ByteArray,
            DataValue::List(_) => DataType::List,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DataValue::String(string) => Some(string),
            _ => None,
        }
    }
}

impl From<&str> for DataValue {
    fn from(value: &str) -> Self {
        DataValue::String(value.to_owned())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("expected a {expected} value, found a {found} value")]
pub struct DataTypeMismatch {
    pub expected: DataType,
    pub found: DataType,
}

macro_rules! impl_try_from_value {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl TryFrom<&DataValue> for $ty {
                type Error = DataTypeMismatch;

                fn try_from(value: &DataValue) -> Result<Self, Self::Error> {
                    match value {
                        DataValue::$variant(inner) => Ok(inner.clone()),
                        other => Err(DataTypeMismatch {
                            expected: DataType::$variant,
                            found: other.data_type(),
                        }),
                    }
                }
            }
        )*
    };
}

impl_try_from_value! {
    Bool => bool,
    Byte => i8,
    Short => i16,
    Int => i32,
    Long => i64,
    Float => f32,
    Double => f64,
    String => String,
    Uuid => Uuid,
    ByteArray => Vec<u8>,
    List => Vec<DataValue>,
}

impl<'a> TryFrom<&'a DataValue> for &'a str {
    type Error = DataTypeMismatch;

    fn try_from(value: &'a DataValue) -> Result<Self, Self::Error> {
        value.as_str().ok_or(DataTypeMismatch {
            expected: DataType::String,
            found: value.data_type(),
        })
    }
}
