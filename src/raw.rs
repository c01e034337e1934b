//! The raw value types a wrapper can carry across framework boundaries.
//!
//! The collaborators (JSON codec, parameter conversion, persistence,
//! query predicates, document mapping) all move values between their raw
//! and wrapped forms. The set of raw types is closed: strings, 32-bit and
//! 64-bit integers, and UUIDs. Dispatch over that set is a plain `match`
//! on [`RawKind`] rather than a trait-object hierarchy.

use std::fmt;
use std::num::ParseIntError;

#[cfg(feature = "uuid")]
use uuid::Uuid;

mod private {
    pub trait Sealed {}

    impl Sealed for String {}
    impl Sealed for i32 {}
    impl Sealed for i64 {}
    #[cfg(feature = "uuid")]
    impl Sealed for uuid::Uuid {}
}

/// The wire-level kind of a raw value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RawKind {
    /// A textual value, carried as a JSON string.
    Text,
    /// A 32-bit signed integer, carried as a JSON number.
    Int,
    /// A 64-bit signed integer, carried as a JSON number.
    Long,
    /// A 128-bit UUID, carried as its canonical textual form.
    #[cfg(feature = "uuid")]
    Uuid,
}

impl fmt::Display for RawKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RawKind::Text => "string",
            RawKind::Int => "32-bit integer",
            RawKind::Long => "64-bit integer",
            #[cfg(feature = "uuid")]
            RawKind::Uuid => "UUID",
        };
        f.write_str(name)
    }
}

/// A type-erased raw value.
///
/// Used where wrappers with different value types meet at runtime, such
/// as query predicates. `Display` renders a SQL-style literal: quoted for
/// text and UUIDs, bare for numbers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RawLiteral {
    Text(String),
    Int(i32),
    Long(i64),
    #[cfg(feature = "uuid")]
    Uuid(Uuid),
}

impl RawLiteral {
    /// Returns the kind of this literal.
    pub fn kind(&self) -> RawKind {
        match self {
            RawLiteral::Text(_) => RawKind::Text,
            RawLiteral::Int(_) => RawKind::Int,
            RawLiteral::Long(_) => RawKind::Long,
            #[cfg(feature = "uuid")]
            RawLiteral::Uuid(_) => RawKind::Uuid,
        }
    }
}

impl fmt::Display for RawLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawLiteral::Text(text) => {
                write!(f, "'{}'", text.replace('\'', "''"))
            }
            RawLiteral::Int(n) => write!(f, "{}", n),
            RawLiteral::Long(n) => write!(f, "{}", n),
            #[cfg(feature = "uuid")]
            RawLiteral::Uuid(uuid) => write!(f, "'{}'", uuid),
        }
    }
}

/// A raw value type usable as the payload of a wrapper at a framework
/// boundary.
///
/// The trait is sealed; the implementations are `String`, `i32`, `i64`,
/// and (with the `uuid` feature) [`Uuid`]. The core wrapper itself places
/// no such restriction on its value type; only the collaborators do.
pub trait RawValue:
    private::Sealed
    + Clone
    + Ord
    + std::hash::Hash
    + fmt::Debug
    + fmt::Display
    + Send
    + Sync
    + 'static
{
    /// The dispatch kind for this type.
    const KIND: RawKind;

    /// Parses a textual representation of this type.
    ///
    /// Strings pass through unchanged; integers and UUIDs use their
    /// standard textual parse. A failure carries the offending text.
    fn parse_text(text: &str) -> Result<Self, TextParseError>;

    /// Erases this value into a [`RawLiteral`].
    fn into_literal(self) -> RawLiteral;

    /// Recovers this type from a literal of the matching kind.
    fn from_literal(literal: RawLiteral) -> Option<Self>;
}

impl RawValue for String {
    const KIND: RawKind = RawKind::Text;

    fn parse_text(text: &str) -> Result<Self, TextParseError> {
        Ok(text.to_string())
    }

    fn into_literal(self) -> RawLiteral {
        RawLiteral::Text(self)
    }

    fn from_literal(literal: RawLiteral) -> Option<Self> {
        match literal {
            RawLiteral::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl RawValue for i32 {
    const KIND: RawKind = RawKind::Int;

    fn parse_text(text: &str) -> Result<Self, TextParseError> {
        text.parse().map_err(|source| TextParseError::Int {
            text: text.to_string(),
            source,
        })
    }

    fn into_literal(self) -> RawLiteral {
        RawLiteral::Int(self)
    }

    fn from_literal(literal: RawLiteral) -> Option<Self> {
        match literal {
            RawLiteral::Int(n) => Some(n),
            _ => None,
        }
    }
}

impl RawValue for i64 {
    const KIND: RawKind = RawKind::Long;

    fn parse_text(text: &str) -> Result<Self, TextParseError> {
        text.parse().map_err(|source| TextParseError::Long {
            text: text.to_string(),
            source,
        })
    }

    fn into_literal(self) -> RawLiteral {
        RawLiteral::Long(self)
    }

    fn from_literal(literal: RawLiteral) -> Option<Self> {
        match literal {
            RawLiteral::Long(n) => Some(n),
            _ => None,
        }
    }
}

#[cfg(feature = "uuid")]
impl RawValue for Uuid {
    const KIND: RawKind = RawKind::Uuid;

    fn parse_text(text: &str) -> Result<Self, TextParseError> {
        Uuid::parse_str(text).map_err(|source| TextParseError::Uuid {
            text: text.to_string(),
            source,
        })
    }

    fn into_literal(self) -> RawLiteral {
        RawLiteral::Uuid(self)
    }

    fn from_literal(literal: RawLiteral) -> Option<Self> {
        match literal {
            RawLiteral::Uuid(uuid) => Some(uuid),
            _ => None,
        }
    }
}

/// A textual value failed to parse as the expected raw type.
#[derive(Debug)]
pub enum TextParseError {
    /// The text is not a valid 32-bit integer.
    Int {
        /// The offending text.
        text: String,
        /// The underlying parse error.
        source: ParseIntError,
    },
    /// The text is not a valid 64-bit integer.
    Long {
        /// The offending text.
        text: String,
        /// The underlying parse error.
        source: ParseIntError,
    },
    /// The text is not a valid UUID.
    #[cfg(feature = "uuid")]
    Uuid {
        /// The offending text.
        text: String,
        /// The underlying parse error.
        source: uuid::Error,
    },
}

impl TextParseError {
    /// The kind the text was expected to parse as.
    pub fn expected(&self) -> RawKind {
        match self {
            TextParseError::Int { .. } => RawKind::Int,
            TextParseError::Long { .. } => RawKind::Long,
            #[cfg(feature = "uuid")]
            TextParseError::Uuid { .. } => RawKind::Uuid,
        }
    }

    /// The offending text.
    pub fn text(&self) -> &str {
        match self {
            TextParseError::Int { text, .. } => text,
            TextParseError::Long { text, .. } => text,
            #[cfg(feature = "uuid")]
            TextParseError::Uuid { text, .. } => text,
        }
    }
}

impl fmt::Display for TextParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextParseError::Int { text, source } => {
                write!(f, "invalid 32-bit integer `{}`: {}", text, source)
            }
            TextParseError::Long { text, source } => {
                write!(f, "invalid 64-bit integer `{}`: {}", text, source)
            }
            #[cfg(feature = "uuid")]
            TextParseError::Uuid { text, source } => {
                write!(f, "invalid UUID `{}`: {}", text, source)
            }
        }
    }
}

impl std::error::Error for TextParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TextParseError::Int { source, .. } => Some(source),
            TextParseError::Long { source, .. } => Some(source),
            #[cfg(feature = "uuid")]
            TextParseError::Uuid { source, .. } => Some(source),
        }
    }
}
