//! Mapping of typed wrappers into search-index documents.
//!
//! A [`DocMapping`] declares, per document field, the raw kind, the
//! marker type, and the container shape. Declarations are validated when
//! the mapping is built, not when documents flow: unordered-set and
//! fixed-size-array containers are rejected (only order-preserving
//! sequences are supported), as are declarations whose marker type could
//! not be resolved. Data-time failures carry the field name and the
//! offending value.
//!
//! The raw-value representation is identical to the JSON codec's:
//! strings and UUIDs as strings, integers as numbers, markers never
//! written.

use std::collections::HashMap;
use std::fmt;

use serde_json::{Map, Value};

use crate::codec::{json_to_raw, raw_to_json};
use crate::{RawKind, RawValue, TypeHandle, Wrapper};

/// The container shape a document field is declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    /// A single wrapper value.
    Singular,
    /// An order-preserving sequence of wrapper values.
    Sequence,
    /// An unordered collection. Not supported: rejected at build time.
    Set,
    /// A fixed-size array. Not supported: rejected at build time.
    FixedArray,
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Container::Singular => "singular field",
            Container::Sequence => "sequence",
            Container::Set => "unordered set",
            Container::FixedArray => "fixed-size array",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
struct FieldSpec {
    kind: RawKind,
    container: Container,
    marker: Option<TypeHandle>,
}

/// Builder for a [`DocMapping`].
///
/// Collects field declarations; [`build`](DocMappingBuilder::build)
/// validates them all at once so configuration mistakes surface at
/// definition time.
#[derive(Debug, Default)]
pub struct DocMappingBuilder {
    fields: Vec<(String, FieldSpec)>,
}

impl DocMappingBuilder {
    /// Declares a field holding the wrapper type `W`.
    pub fn field<W: Wrapper>(mut self, name: &str, container: Container) -> Self {
        self.fields.push((
            name.to_string(),
            FieldSpec {
                kind: W::Value::KIND,
                container,
                marker: Some(W::handle()),
            },
        ));
        self
    }

    /// Declares a field whose marker type could not be statically
    /// resolved (a wildcard or unbounded declaration in the host
    /// mapping). Always rejected by [`build`](DocMappingBuilder::build);
    /// it exists so such declarations fail at definition time with a
    /// precise error instead of misbehaving later.
    pub fn field_unresolved(
        mut self,
        name: &str,
        kind: RawKind,
        container: Container,
    ) -> Self {
        self.fields.push((
            name.to_string(),
            FieldSpec {
                kind,
                container,
                marker: None,
            },
        ));
        self
    }

    /// Validates the declarations and produces the mapping.
    ///
    /// Rejects duplicate field names, `Set` and `FixedArray` containers,
    /// and unresolved markers.
    pub fn build(self) -> Result<DocMapping, MappingError> {
        let mut fields = HashMap::new();
        for (name, spec) in self.fields {
            match spec.container {
                Container::Set | Container::FixedArray => {
                    return Err(MappingError::UnsupportedContainer {
                        field: name,
                        container: spec.container,
                    });
                }
                Container::Singular | Container::Sequence => {}
            }
            if spec.marker.is_none() {
                return Err(MappingError::UnresolvedMarker { field: name });
            }
            if fields.insert(name.clone(), spec).is_some() {
                return Err(MappingError::DuplicateField { field: name });
            }
        }
        Ok(DocMapping { fields })
    }
}

/// A validated document mapping.
///
/// # Examples
///
/// ```
/// use serde_json::{json, Map};
/// use typed_values::document::{Container, DocMapping};
/// use typed_values::{TypedLong, TypedString};
///
/// struct Product;
/// struct Tag;
///
/// let mapping = DocMapping::builder()
///     .field::<TypedLong<Product>>("product_id", Container::Singular)
///     .field::<TypedString<Tag>>("tags", Container::Sequence)
///     .build()
///     .unwrap();
///
/// let mut doc = Map::new();
/// mapping.write(&mut doc, "product_id", &TypedLong::<Product>::of(7)).unwrap();
/// let tags = vec![TypedString::<Tag>::of("new"), TypedString::<Tag>::of("sale")];
/// mapping.write_seq(&mut doc, "tags", &tags).unwrap();
///
/// assert_eq!(doc["product_id"], json!(7));
/// assert_eq!(doc["tags"], json!(["new", "sale"]));
///
/// let back: TypedLong<Product> = mapping.read(&doc, "product_id").unwrap();
/// assert_eq!(*back.value(), 7);
/// ```
#[derive(Debug)]
pub struct DocMapping {
    fields: HashMap<String, FieldSpec>,
}

impl DocMapping {
    /// Starts a new mapping declaration.
    pub fn builder() -> DocMappingBuilder {
        DocMappingBuilder::default()
    }

    /// Writes a singular wrapper field into the document.
    pub fn write<W: Wrapper>(
        &self,
        doc: &mut Map<String, Value>,
        field: &str,
        wrapper: &W,
    ) -> Result<(), DocError> {
        self.checked_spec::<W>(field, Container::Singular)?;
        doc.insert(field.to_string(), raw_to_json(wrapper.raw()));
        Ok(())
    }

    /// Writes a sequence field into the document, preserving order.
    pub fn write_seq<'a, W, I>(
        &self,
        doc: &mut Map<String, Value>,
        field: &str,
        wrappers: I,
    ) -> Result<(), DocError>
    where
        W: Wrapper + 'a,
        I: IntoIterator<Item = &'a W>,
    {
        self.checked_spec::<W>(field, Container::Sequence)?;
        let items: Vec<Value> = wrappers
            .into_iter()
            .map(|wrapper| raw_to_json(wrapper.raw()))
            .collect();
        doc.insert(field.to_string(), Value::Array(items));
        Ok(())
    }

    /// Reads a singular wrapper field from the document.
    pub fn read<W: Wrapper>(
        &self,
        doc: &Map<String, Value>,
        field: &str,
    ) -> Result<W, DocError> {
        self.read_opt(doc, field)?.ok_or_else(|| DocError::Missing {
            field: field.to_string(),
        })
    }

    /// Reads a singular wrapper field that may be absent or null.
    pub fn read_opt<W: Wrapper>(
        &self,
        doc: &Map<String, Value>,
        field: &str,
    ) -> Result<Option<W>, DocError> {
        self.checked_spec::<W>(field, Container::Singular)?;
        match doc.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => self.decode_value(field, value).map(Some),
        }
    }

    /// Reads a sequence field from the document, preserving order.
    pub fn read_seq<W: Wrapper>(
        &self,
        doc: &Map<String, Value>,
        field: &str,
    ) -> Result<Vec<W>, DocError> {
        self.checked_spec::<W>(field, Container::Sequence)?;
        let Some(value) = doc.get(field) else {
            return Err(DocError::Missing {
                field: field.to_string(),
            });
        };
        let Value::Array(items) = value else {
            return Err(DocError::Mismatch {
                field: field.to_string(),
                expected: W::Value::KIND,
                found: "non-array value".to_string(),
            });
        };
        items
            .iter()
            .map(|item| self.decode_value(field, item))
            .collect()
    }

    fn decode_value<W: Wrapper>(
        &self,
        field: &str,
        value: &Value,
    ) -> Result<W, DocError> {
        let raw: W::Value =
            json_to_raw(value).map_err(|(expected, found)| DocError::Mismatch {
                field: field.to_string(),
                expected,
                found,
            })?;
        Ok(W::from_raw(raw))
    }

    fn checked_spec<W: Wrapper>(
        &self,
        field: &str,
        container: Container,
    ) -> Result<(), DocError> {
        let spec = self.fields.get(field).ok_or_else(|| DocError::UnknownField {
            field: field.to_string(),
        })?;
        if spec.kind != W::Value::KIND {
            return Err(DocError::KindMismatch {
                field: field.to_string(),
                declared: spec.kind,
                actual: W::Value::KIND,
            });
        }
        if spec.marker != Some(W::handle()) {
            return Err(DocError::MarkerMismatch {
                field: field.to_string(),
            });
        }
        if spec.container != container {
            return Err(DocError::ContainerMismatch {
                field: field.to_string(),
                declared: spec.container,
            });
        }
        Ok(())
    }
}

/// A mapping declaration was invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    /// The declared container shape is not supported.
    UnsupportedContainer {
        /// The offending field.
        field: String,
        /// The rejected container shape.
        container: Container,
    },
    /// The field's marker type could not be resolved.
    UnresolvedMarker {
        /// The offending field.
        field: String,
    },
    /// The field name was declared more than once.
    DuplicateField {
        /// The offending field.
        field: String,
    },
}

impl fmt::Display for MappingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MappingError::UnsupportedContainer { field, container } => {
                write!(
                    f,
                    "field `{}`: {} containers are not supported; use an order-preserving sequence",
                    field, container
                )
            }
            MappingError::UnresolvedMarker { field } => {
                write!(
                    f,
                    "field `{}`: marker type cannot be resolved from the declaration",
                    field
                )
            }
            MappingError::DuplicateField { field } => {
                write!(f, "field `{}` is declared twice", field)
            }
        }
    }
}

impl std::error::Error for MappingError {}

/// A document read or write failed against a validated mapping.
#[derive(Debug)]
pub enum DocError {
    /// The field is not declared in the mapping.
    UnknownField { field: String },
    /// The wrapper's raw kind differs from the declared kind.
    KindMismatch {
        field: String,
        declared: RawKind,
        actual: RawKind,
    },
    /// The wrapper's marker differs from the declared marker.
    MarkerMismatch { field: String },
    /// The declared container shape does not match the operation.
    ContainerMismatch { field: String, declared: Container },
    /// The field is absent from the document.
    Missing { field: String },
    /// The stored value does not have the declared raw shape.
    Mismatch {
        field: String,
        expected: RawKind,
        found: String,
    },
}

impl fmt::Display for DocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocError::UnknownField { field } => {
                write!(f, "field `{}` is not declared in the mapping", field)
            }
            DocError::KindMismatch {
                field,
                declared,
                actual,
            } => write!(
                f,
                "field `{}` is declared as {} but the wrapper holds {}",
                field, declared, actual
            ),
            DocError::MarkerMismatch { field } => write!(
                f,
                "field `{}` is declared for a different marker type",
                field
            ),
            DocError::ContainerMismatch { field, declared } => write!(
                f,
                "field `{}` is declared as a {}",
                field, declared
            ),
            DocError::Missing { field } => {
                write!(f, "field `{}` is absent from the document", field)
            }
            DocError::Mismatch {
                field,
                expected,
                found,
            } => write!(
                f,
                "field `{}`: expected {}, found {}",
                field, expected, found
            ),
        }
    }
}

impl std::error::Error for DocError {}
