//! Primitive type catalog

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A primitive scalar type understood natively by every target language.
///
/// The set is closed and language independent. Each variant is identified by
/// its canonical lowercase name (`uint8`, `float32`, `string`, ...), which is
/// also the spelling used in schema documents and language descriptor files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    // Unsigned
    Uint8,
    Uint16,
    Uint32,
    Uint64,

    // Signed
    Int8,
    Int16,
    Int32,
    Int64,

    // Float
    Float32,
    Float64,

    // Text and logic
    Char,
    String,
    Bool,
}

impl DataType {
    /// Every catalog entry, in declaration order
    pub const ALL: [DataType; 13] = [
        DataType::Uint8,
        DataType::Uint16,
        DataType::Uint32,
        DataType::Uint64,
        DataType::Int8,
        DataType::Int16,
        DataType::Int32,
        DataType::Int64,
        DataType::Float32,
        DataType::Float64,
        DataType::Char,
        DataType::String,
        DataType::Bool,
    ];

    /// Canonical catalog name
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Uint8 => "uint8",
            DataType::Uint16 => "uint16",
            DataType::Uint32 => "uint32",
            DataType::Uint64 => "uint64",
            DataType::Int8 => "int8",
            DataType::Int16 => "int16",
            DataType::Int32 => "int32",
            DataType::Int64 => "int64",
            DataType::Float32 => "float32",
            DataType::Float64 => "float64",
            DataType::Char => "char",
            DataType::String => "string",
            DataType::Bool => "bool",
        }
    }

    /// Look up a catalog entry by its canonical name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|ty| ty.as_str() == name)
    }

    /// Whether the type is an integer of either signedness
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            DataType::Uint8
                | DataType::Uint16
                | DataType::Uint32
                | DataType::Uint64
                | DataType::Int8
                | DataType::Int16
                | DataType::Int32
                | DataType::Int64
        )
    }

    /// Whether the type is a floating-point number
    pub fn is_float(&self) -> bool {
        matches!(self, DataType::Float32 | DataType::Float64)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a name is not part of the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDataType(pub String);

impl fmt::Display for UnknownDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a primitive type", self.0)
    }
}

impl std::error::Error for UnknownDataType {}

impl FromStr for DataType {
    type Err = UnknownDataType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| UnknownDataType(s.to_string()))
    }
}
