//! Runtime value kinds.
//!
//! The declaration order matters: every kind before `Dynamic` is a
//! primitive that can take part in equality checks.

use std::fmt;
use std::str::FromStr;

/// The kind tag of a runtime value, as written in type annotations.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub enum ValueKind {
    Interface,
    Invalid,
    Boolean,
    String,
    Int32,
    Int64,
    Float,
    Double,
    Callable,
    Uninitialized,
    Dynamic,
    Void,
    Object,
}

impl ValueKind {
    /// Source-level name, as printed in signatures and type mismatch messages.
    pub const fn name(self) -> &'static str {
        match self {
            ValueKind::Interface => "Interface",
            ValueKind::Invalid => "Invalid",
            ValueKind::Boolean => "Boolean",
            ValueKind::String => "String",
            ValueKind::Int32 => "Integer",
            ValueKind::Int64 => "LongInteger",
            ValueKind::Float => "Float",
            ValueKind::Double => "Double",
            ValueKind::Callable => "Function",
            ValueKind::Uninitialized => "<uninitialized>",
            ValueKind::Dynamic => "Dynamic",
            ValueKind::Void => "Void",
            ValueKind::Object => "Object",
        }
    }

    /// Case-insensitive lookup by source-level name.
    pub fn from_name(name: &str) -> Option<ValueKind> {
        let kind = match name.to_ascii_lowercase().as_str() {
            "interface" => ValueKind::Interface,
            "invalid" => ValueKind::Invalid,
            "boolean" => ValueKind::Boolean,
            "string" => ValueKind::String,
            "integer" => ValueKind::Int32,
            "longinteger" => ValueKind::Int64,
            "float" => ValueKind::Float,
            "double" => ValueKind::Double,
            "function" => ValueKind::Callable,
            "dynamic" => ValueKind::Dynamic,
            "void" => ValueKind::Void,
            "<uninitialized>" => ValueKind::Uninitialized,
            "object" => ValueKind::Object,
            _ => return None,
        };
        Some(kind)
    }

    /// Kinds that compare by value in `=`/`<>`.
    #[inline]
    pub fn is_comparable_primitive(self) -> bool {
        self < ValueKind::Dynamic
    }

    #[inline]
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            ValueKind::Int32 | ValueKind::Int64 | ValueKind::Float | ValueKind::Double
        )
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned by `ValueKind::from_str` for names that are not value kinds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValueKindParseError(pub String);

impl fmt::Display for ValueKindParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown value kind `{}`", self.0)
    }
}

impl std::error::Error for ValueKindParseError {}

impl FromStr for ValueKind {
    type Err = ValueKindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ValueKind::from_name(s).ok_or_else(|| ValueKindParseError(s.to_string()))
    }
}
