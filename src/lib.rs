//! Typed Values: compile-time marker tags for primitive domain values.
//!
//! This crate wraps a primitive value (string, 32/64-bit integer, or
//! UUID) together with a phantom marker type, so that values intended for
//! different purposes cannot be interchanged even though they share the
//! same underlying representation. A `TypedValue<String, User>` and a
//! `TypedValue<String, Product>` holding the same string are different
//! types to the compiler and unequal values at runtime.
//!
//! # Basic Usage
//!
//! ```rust
//! use typed_values::{marker_type, TypedValue};
//!
//! marker_type!(pub UserId: String);
//! marker_type!(pub ProductId: String);
//!
//! let user = UserId::of("id-123");
//! let product = ProductId::of("id-123");
//!
//! // Same raw value, different markers: never interchangeable.
//! assert_ne!(user, product);
//! assert_eq!(user, UserId::of("id-123"));
//!
//! // Ordering is by value first, so sorting is natural.
//! let mut ids = vec![UserId::of("z"), UserId::of("a"), UserId::of("m")];
//! ids.sort();
//! assert_eq!(TypedValue::raw_values(ids), vec!["a", "m", "z"]);
//! ```
//!
//! # Identity Semantics
//!
//! - Equality requires equal values **and** the exact same marker type.
//!   Marker relationships are never consulted; there is no subtype-aware
//!   matching anywhere in the crate.
//! - Hashing covers the value only, so a wrapper hashes exactly like its
//!   raw value.
//! - Ordering compares values first and breaks ties deterministically on
//!   the marker's [`TypeHandle`], which never depends on type names.
//!
//! # JSON Feature
//!
//! With the `json` feature (default), wrappers serialize transparently as
//! their raw value and a registry-backed [`JsonCodec`] decodes custom
//! wrapper types through their own constructors:
//!
//! ```rust
//! use serde_json::json;
//! use typed_values::{JsonCodec, TypedLong};
//!
//! struct Order;
//!
//! let codec = JsonCodec::new();
//! let id = TypedLong::<Order>::of(42);
//! assert_eq!(codec.encode(&id), json!(42));
//! let back: TypedLong<Order> = codec.decode(&json!(42)).unwrap();
//! assert_eq!(back, id);
//! ```
//!
//! Custom wrapper types register against the process-wide codec during
//! startup, before its first use (requires the `json` feature):
//!
//! ```rust,ignore
//! use typed_values::{register_wrapper, TYPED_JSON};
//!
//! register_wrapper::<AccountNumber, _, _>(AccountNumber::checked)?;
//!
//! // First access locks registration for good.
//! let binding = TYPED_JSON.get();
//! let codec = binding.as_ref().unwrap();
//! ```
//!
//! # UUID Feature
//!
//! The `uuid` feature (default) provides [`TypedUuid`]. Builds without a
//! native UUID type should disable it and carry the canonical textual
//! form in a [`TypedString`] instead:
//!
//! ```toml
//! [dependencies]
//! typed-values = { version = "0.4", default-features = false, features = ["json"] }
//! ```

mod type_handle;
pub use type_handle::TypeHandle;

mod typed_value;
pub use typed_value::TypedValue;

mod specializations;
#[cfg(feature = "uuid")]
pub use specializations::TypedUuid;
pub use specializations::{TypedInt, TypedLong, TypedString};

mod raw;
pub use raw::{RawKind, RawLiteral, RawValue, TextParseError};

mod wrapper;
pub use wrapper::Wrapper;

mod registry;
pub use registry::{ConstructError, RegistryError, WrapperRegistry};

mod markers;

pub mod convert;
pub use convert::ConvertError;

pub mod persist;

pub mod query;
pub use query::Predicate;

#[cfg(feature = "json")]
mod codec;
#[cfg(feature = "json")]
pub use codec::{CodecError, JsonCodec, LazyJsonCodec, TYPED_JSON, register_wrapper};

#[cfg(feature = "json")]
pub mod document;

// Used by the expansion of `marker_type!`.
#[doc(hidden)]
pub use paste::paste as __paste;
