//! Error types for register configuration, field access and text entry.

use std::fmt;

/// Errors produced when configuring a [crate::register::Register] or building a
/// [crate::field::Field]. The rejected operation leaves all state unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Register width is not one of 8, 16 or 32 bits.
    InvalidConfiguration(u32),
    /// Field endpoints are reversed or outside the register, given in display numbering.
    InvalidBitRange { start: i64, end: i64 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidConfiguration(bits) => {
                write!(f, "bit length must be 8, 16 or 32, got {bits}")
            }
            ConfigError::InvalidBitRange { start, end } => {
                write!(f, "invalid bit range {start}:{end}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors produced when reading or writing a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    /// The field's bits no longer fit inside the register's current bit length.
    FieldOutOfRange,
    /// The value does not fit into the field.
    ValueTooLarge { value: u64, max: u64 },
}

impl fmt::Display for AccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessError::FieldOutOfRange => {
                write!(f, "field is not within its register's bit length")
            }
            AccessError::ValueTooLarge { value, max } => {
                write!(f, "value {value:#X} cannot fit into field (max {max:#X})")
            }
        }
    }
}

impl std::error::Error for AccessError {}

/// Errors produced when parsing user-entered text into a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Character not allowed for the radix.
    InvalidDigit(char),
    /// Text is longer than the widest value the container can display.
    TooLong { len: usize, max: usize },
    /// Parsed value exceeds the container's maximum.
    Overflow,
    /// The parsed value was rejected by the target.
    Access(AccessError),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::InvalidDigit(c) => write!(f, "invalid digit '{c}'"),
            ParseError::TooLong { len, max } => {
                write!(f, "text is {len} characters long, at most {max} allowed")
            }
            ParseError::Overflow => write!(f, "value exceeds maximum"),
            ParseError::Access(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ParseError {}

impl From<AccessError> for ParseError {
    fn from(value: AccessError) -> Self {
        ParseError::Access(value)
    }
}

/// Errors produced when loading a persisted field layout.
#[cfg(feature = "serde")]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// Input is not a valid layout document.
    Json(String),
    /// Layout names a width or field the model rejects.
    Config(ConfigError),
}

#[cfg(feature = "serde")]
impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutError::Json(msg) => write!(f, "malformed layout: {msg}"),
            LayoutError::Config(err) => write!(f, "rejected layout: {err}"),
        }
    }
}

#[cfg(feature = "serde")]
impl std::error::Error for LayoutError {}

#[cfg(feature = "serde")]
impl From<ConfigError> for LayoutError {
    fn from(value: ConfigError) -> Self {
        LayoutError::Config(value)
    }
}

#[cfg(feature = "serde")]
impl From<serde_json::Error> for LayoutError {
    fn from(value: serde_json::Error) -> Self {
        LayoutError::Json(value.to_string())
    }
}
