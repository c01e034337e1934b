//! Conversion of textual parameters into typed wrappers.
//!
//! Web-style parameter binding hands over a raw text value and a declared
//! target wrapper type. The text is parsed per the wrapper's raw kind
//! (string passthrough, integer and UUID textual parse) and the wrapper
//! constructed. A parse failure is a conversion error carrying the
//! parameter name and offending text; an absent value is `Ok(None)` from
//! [`from_opt_text`] and never conflated with a failure.

use std::fmt;
use std::str::FromStr;

use crate::{RawKind, RawValue, TextParseError, TypedValue, Wrapper};

impl<V: RawValue, M: 'static> FromStr for TypedValue<V, M> {
    type Err = TextParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        V::parse_text(s).map(TypedValue::new)
    }
}

/// Parses a text value into the wrapper type `W`.
///
/// # Examples
///
/// ```
/// use typed_values::{convert, TypedInt};
///
/// struct Page;
///
/// let page: TypedInt<Page> = convert::from_text("3").unwrap();
/// assert_eq!(*page.value(), 3);
/// assert!(convert::from_text::<TypedInt<Page>>("three").is_err());
/// ```
pub fn from_text<W: Wrapper>(text: &str) -> Result<W, ConvertError> {
    parse_with(None, text)
}

/// Parses a text value into `W`, attaching the parameter name to any
/// error for diagnosis.
pub fn from_text_named<W: Wrapper>(
    param: &str,
    text: &str,
) -> Result<W, ConvertError> {
    parse_with(Some(param), text)
}

/// Parses an optional text value into an optional wrapper.
///
/// An absent value yields `Ok(None)`. Only a present-but-unparsable value
/// is an error, keeping absence distinct from mismatch.
///
/// # Examples
///
/// ```
/// use typed_values::{convert, TypedInt};
///
/// struct Page;
///
/// assert!(convert::from_opt_text::<TypedInt<Page>>(None).unwrap().is_none());
/// assert!(convert::from_opt_text::<TypedInt<Page>>(Some("7")).unwrap().is_some());
/// assert!(convert::from_opt_text::<TypedInt<Page>>(Some("x")).is_err());
/// ```
pub fn from_opt_text<W: Wrapper>(
    text: Option<&str>,
) -> Result<Option<W>, ConvertError> {
    text.map(|text| parse_with(None, text)).transpose()
}

fn parse_with<W: Wrapper>(
    param: Option<&str>,
    text: &str,
) -> Result<W, ConvertError> {
    let raw = W::Value::parse_text(text).map_err(|source| ConvertError {
        param: param.map(str::to_string),
        source,
    })?;
    Ok(W::from_raw(raw))
}

/// A textual parameter did not parse as the declared wrapper's raw type.
#[derive(Debug)]
pub struct ConvertError {
    param: Option<String>,
    source: TextParseError,
}

impl ConvertError {
    /// The parameter name, when known.
    pub fn param(&self) -> Option<&str> {
        self.param.as_deref()
    }

    /// The raw kind the parameter was expected to parse as.
    pub fn expected(&self) -> RawKind {
        self.source.expected()
    }

    /// The offending text.
    pub fn text(&self) -> &str {
        self.source.text()
    }
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.param {
            Some(param) => write!(f, "parameter `{}`: {}", param, self.source),
            None => write!(f, "{}", self.source),
        }
    }
}

impl std::error::Error for ConvertError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}
