//! JSON serialization of typed wrappers.
//!
//! A wrapper serializes as its raw value in that value's native JSON
//! shape: strings and UUIDs as JSON strings, 32- and 64-bit integers as
//! JSON numbers. The marker type is never written to the wire; on read it
//! comes from the statically declared target type.
//!
//! Two layers are provided:
//!
//! - Transparent [`serde`] impls on [`TypedValue`], for wrappers embedded
//!   in ordinary serde-derived structures.
//! - [`JsonCodec`], which decodes through a [`WrapperRegistry`] so that
//!   registered custom wrapper types are built by their own (possibly
//!   validating) constructors.
//!
//! A process-wide codec is available as [`TYPED_JSON`]. Custom wrappers
//! are registered against it with [`register_wrapper`] **before first
//! use**; the first access locks registration permanently.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, Once};

use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};
use serde_json::Value;

use crate::registry::ConstructError;
use crate::{RawKind, RawLiteral, RawValue, RegistryError, TypedValue, Wrapper, WrapperRegistry};

/// Serializes as the raw value only; the marker is never on the wire.
impl<V: Serialize, M> Serialize for TypedValue<V, M> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value().serialize(serializer)
    }
}

/// Deserializes the raw value and attaches the marker declared by the
/// target type at the call site.
impl<'de, V: Deserialize<'de>, M: 'static> Deserialize<'de> for TypedValue<V, M> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        V::deserialize(deserializer).map(TypedValue::new)
    }
}

/// Renders a raw value in its native JSON shape.
pub(crate) fn raw_to_json<V: RawValue>(value: &V) -> Value {
    match value.clone().into_literal() {
        RawLiteral::Text(text) => Value::String(text),
        RawLiteral::Int(n) => Value::Number(n.into()),
        RawLiteral::Long(n) => Value::Number(n.into()),
        #[cfg(feature = "uuid")]
        RawLiteral::Uuid(uuid) => Value::String(uuid.to_string()),
    }
}

/// Reads a raw value out of a JSON value, rejecting any shape other than
/// the one native to `V`.
pub(crate) fn json_to_raw<V: RawValue>(value: &Value) -> Result<V, (RawKind, String)> {
    let mismatch = || (V::KIND, describe(value));
    let literal = match (V::KIND, value) {
        (RawKind::Text, Value::String(text)) => RawLiteral::Text(text.clone()),
        (RawKind::Int, Value::Number(number)) => {
            let n = number
                .as_i64()
                .and_then(|n| i32::try_from(n).ok())
                .ok_or_else(mismatch)?;
            RawLiteral::Int(n)
        }
        (RawKind::Long, Value::Number(number)) => {
            RawLiteral::Long(number.as_i64().ok_or_else(mismatch)?)
        }
        #[cfg(feature = "uuid")]
        (RawKind::Uuid, Value::String(text)) => RawLiteral::Uuid(
            uuid::Uuid::parse_str(text).map_err(|_| mismatch())?,
        ),
        _ => return Err(mismatch()),
    };
    V::from_literal(literal).ok_or_else(mismatch)
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("boolean ({})", b),
        Value::Number(n) => format!("number ({})", n),
        Value::String(s) => format!("string (\"{}\")", s),
        Value::Array(_) => "array".to_string(),
        Value::Object(_) => "object".to_string(),
    }
}

/// A JSON codec for typed wrappers, backed by a [`WrapperRegistry`].
///
/// Encoding always writes the raw value. Decoding parses the raw value
/// for the declared wrapper type, then builds the wrapper: through its
/// registered custom constructor when one exists, otherwise through
/// [`Wrapper::from_raw`].
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use typed_values::{JsonCodec, TypedLong};
///
/// struct Order;
///
/// let codec = JsonCodec::new();
/// let id = TypedLong::<Order>::of(42);
///
/// assert_eq!(codec.encode(&id), json!(42));
/// let back: TypedLong<Order> = codec.decode(&json!(42)).unwrap();
/// assert_eq!(back, id);
/// ```
#[derive(Debug, Default)]
pub struct JsonCodec {
    registry: WrapperRegistry,
}

impl JsonCodec {
    /// Creates a codec with no custom wrapper registrations.
    pub fn new() -> Self {
        Self {
            registry: WrapperRegistry::new(),
        }
    }

    /// Creates a codec decoding through the given registry.
    pub fn with_registry(registry: WrapperRegistry) -> Self {
        Self { registry }
    }

    /// Returns the codec's registry.
    pub fn registry(&self) -> &WrapperRegistry {
        &self.registry
    }

    /// Encodes a wrapper as its raw value.
    pub fn encode<W: Wrapper>(&self, wrapper: &W) -> Value {
        raw_to_json(wrapper.raw())
    }

    /// Encodes a sequence of wrappers, preserving order.
    pub fn encode_seq<'a, W, I>(&self, wrappers: I) -> Value
    where
        W: Wrapper + 'a,
        I: IntoIterator<Item = &'a W>,
    {
        Value::Array(
            wrappers
                .into_iter()
                .map(|wrapper| self.encode(wrapper))
                .collect(),
        )
    }

    /// Decodes a wrapper from a JSON value.
    pub fn decode<W: Wrapper>(&self, value: &Value) -> Result<W, CodecError> {
        self.decode_inner(None, value)
    }

    /// Decodes a wrapper from a JSON value, attaching the field name to
    /// any error for diagnosis.
    pub fn decode_field<W: Wrapper>(
        &self,
        field: &str,
        value: &Value,
    ) -> Result<W, CodecError> {
        self.decode_inner(Some(field), value)
    }

    /// Decodes a JSON array into wrappers, preserving order.
    pub fn decode_seq<W: Wrapper>(
        &self,
        field: &str,
        value: &Value,
    ) -> Result<Vec<W>, CodecError> {
        let Value::Array(items) = value else {
            return Err(CodecError::Mismatch {
                field: Some(field.to_string()),
                expected: W::Value::KIND,
                found: describe(value),
            });
        };
        items
            .iter()
            .map(|item| self.decode_inner(Some(field), item))
            .collect()
    }

    fn decode_inner<W: Wrapper>(
        &self,
        field: Option<&str>,
        value: &Value,
    ) -> Result<W, CodecError> {
        let raw: W::Value =
            json_to_raw(value).map_err(|(expected, found)| CodecError::Mismatch {
                field: field.map(str::to_string),
                expected,
                found,
            })?;
        match self.registry.construct::<W>(raw.clone()) {
            Some(result) => result.map_err(|source| CodecError::Constructor {
                field: field.map(str::to_string),
                source,
            }),
            None => Ok(W::from_raw(raw)),
        }
    }
}

/// A JSON value could not be decoded into a wrapper.
#[derive(Debug)]
pub enum CodecError {
    /// The JSON value does not have the shape of the expected raw type.
    Mismatch {
        /// The field being decoded, when known.
        field: Option<String>,
        /// The raw kind the declared wrapper type expects.
        expected: RawKind,
        /// A description of the offending JSON value.
        found: String,
    },
    /// The registered custom constructor rejected the raw value.
    Constructor {
        /// The field being decoded, when known.
        field: Option<String>,
        /// The wrapped constructor failure, with full context.
        source: ConstructError,
    },
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::Mismatch {
                field,
                expected,
                found,
            } => {
                if let Some(field) = field {
                    write!(
                        f,
                        "field `{}`: expected {}, found {}",
                        field, expected, found
                    )
                } else {
                    write!(f, "expected {}, found {}", expected, found)
                }
            }
            CodecError::Constructor { field, source } => {
                if let Some(field) = field {
                    write!(f, "field `{}`: {}", field, source)
                } else {
                    write!(f, "{}", source)
                }
            }
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CodecError::Mismatch { .. } => None,
            CodecError::Constructor { source, .. } => Some(source),
        }
    }
}

/// A lazily initialized singleton holding the process-wide [`JsonCodec`].
///
/// The codec is created on first access, at which point the pending
/// registrations made with [`register_wrapper`] are absorbed and
/// registration is locked. Subsequent accesses reuse the same instance.
#[doc(hidden)]
#[derive(Debug)]
pub struct LazyJsonCodec {
    init: Once,
    data: Mutex<Option<JsonCodec>>,
}

impl LazyJsonCodec {
    /// Gets the process-wide codec, initializing it if necessary.
    ///
    /// Initialization happens exactly once, even under concurrent first
    /// access.
    pub fn get(&self) -> std::sync::MutexGuard<'_, Option<JsonCodec>> {
        self.init.call_once(|| {
            let codec = JsonCodec::with_registry(take_and_lock_pending());
            *self.data.lock().unwrap() = Some(codec);
        });
        self.data.lock().unwrap()
    }
}

/// The process-wide JSON codec.
///
/// Custom wrapper types must be registered with [`register_wrapper`]
/// before the first access; afterwards registration is rejected.
///
/// # Examples
///
/// ```rust,ignore
/// use typed_values::TYPED_JSON;
///
/// let binding = TYPED_JSON.get();
/// let codec = binding.as_ref().unwrap();
/// let id: TypedLong<Order> = codec.decode(&serde_json::json!(7))?;
/// ```
pub static TYPED_JSON: LazyJsonCodec = LazyJsonCodec {
    init: Once::new(),
    data: Mutex::new(None),
};

// Registrations pending until the global codec is first used
static PENDING_REGISTRY: Mutex<Option<WrapperRegistry>> = Mutex::new(None);
static REGISTRY_LOCKED: AtomicBool = AtomicBool::new(false);

/// Registers a custom wrapper constructor with the process-wide codec.
///
/// Must be called **before** the first access to [`TYPED_JSON`]. Once the
/// codec has been accessed, registration is locked and this returns
/// [`RegistryError::Locked`]. Built-in wrappers and duplicate
/// registrations are rejected exactly as by
/// [`WrapperRegistry::register`].
///
/// # Examples
///
/// ```rust,ignore
/// use typed_values::{register_wrapper, TYPED_JSON};
///
/// // During startup, before any use of TYPED_JSON:
/// register_wrapper::<AccountNumber, _, _>(AccountNumber::checked)?;
///
/// // From here on the registration set is fixed.
/// let binding = TYPED_JSON.get();
/// ```
pub fn register_wrapper<W, F, E>(construct: F) -> Result<(), RegistryError>
where
    W: Wrapper,
    F: Fn(W::Value) -> Result<W, E> + Send + Sync + 'static,
    E: std::error::Error + Send + Sync + 'static,
{
    if REGISTRY_LOCKED.load(Ordering::SeqCst) {
        return Err(RegistryError::Locked);
    }
    let mut guard = PENDING_REGISTRY.lock().unwrap();
    guard
        .get_or_insert_with(WrapperRegistry::new)
        .register::<W, F, E>(construct)
}

/// Takes the pending registrations, locking registration for good.
fn take_and_lock_pending() -> WrapperRegistry {
    REGISTRY_LOCKED.store(true, Ordering::SeqCst);
    PENDING_REGISTRY.lock().unwrap().take().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use std::fmt;

    use serde_json::json;

    use super::{CodecError, JsonCodec};
    use crate::{RawKind, TypedInt, TypedLong, TypedString, Wrapper, WrapperRegistry};

    struct Order;
    struct Customer;

    #[test]
    fn test_encode_shapes() {
        let codec = JsonCodec::new();
        assert_eq!(
            codec.encode(&TypedString::<Order>::of("o-1")),
            json!("o-1")
        );
        assert_eq!(codec.encode(&TypedInt::<Order>::of(5)), json!(5));
        assert_eq!(
            codec.encode(&TypedLong::<Order>::of(1 << 40)),
            json!(1_i64 << 40)
        );
    }

    #[cfg(feature = "uuid")]
    #[test]
    fn test_uuid_encodes_as_canonical_string() {
        use crate::TypedUuid;

        let codec = JsonCodec::new();
        let uuid =
            uuid::Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap();
        assert_eq!(
            codec.encode(&TypedUuid::<Order>::of(uuid)),
            json!("550e8400-e29b-41d4-a716-446655440000")
        );
    }

    #[test]
    fn test_decode_round_trip() {
        let codec = JsonCodec::new();
        let id = TypedString::<Order>::of("o-9");
        let back: TypedString<Order> = codec.decode(&codec.encode(&id)).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_decode_keeps_markers_apart() {
        let codec = JsonCodec::new();
        let order: TypedString<Order> = codec.decode(&json!("x")).unwrap();
        let customer: TypedString<Customer> = codec.decode(&json!("x")).unwrap();
        assert_ne!(order, customer);
    }

    #[test]
    fn test_decode_mismatch_carries_field_name() {
        let codec = JsonCodec::new();
        let err = codec
            .decode_field::<TypedInt<Order>>("order_id", &json!("not a number"))
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("order_id"));
        assert!(message.contains("not a number"));
        assert!(matches!(
            err,
            CodecError::Mismatch {
                expected: RawKind::Int,
                ..
            }
        ));
    }

    #[test]
    fn test_long_value_is_not_an_int() {
        let codec = JsonCodec::new();
        let err = codec
            .decode::<TypedInt<Order>>(&json!(3_000_000_000_i64))
            .unwrap_err();
        assert!(matches!(err, CodecError::Mismatch { .. }));
        // The same value decodes fine as a long
        let long: TypedLong<Order> =
            codec.decode(&json!(3_000_000_000_i64)).unwrap();
        assert_eq!(*long.value(), 3_000_000_000);
    }

    #[test]
    fn test_fractional_number_is_a_mismatch() {
        let codec = JsonCodec::new();
        assert!(codec.decode::<TypedLong<Order>>(&json!(1.5)).is_err());
    }

    #[derive(Debug)]
    struct OrderRef(TypedString<Order>);

    impl Wrapper for OrderRef {
        type Value = String;
        type Marker = Order;

        fn from_typed(inner: TypedString<Order>) -> Self {
            OrderRef(inner)
        }

        fn typed(&self) -> &TypedString<Order> {
            &self.0
        }

        fn into_typed(self) -> TypedString<Order> {
            self.0
        }
    }

    #[derive(Debug)]
    struct MissingPrefix;

    impl fmt::Display for MissingPrefix {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "order refs start with ord-")
        }
    }

    impl std::error::Error for MissingPrefix {}

    fn checked_registry() -> WrapperRegistry {
        let mut registry = WrapperRegistry::new();
        registry
            .register::<OrderRef, _, MissingPrefix>(|raw| {
                if raw.starts_with("ord-") {
                    Ok(OrderRef::from_raw(raw))
                } else {
                    Err(MissingPrefix)
                }
            })
            .unwrap();
        registry
    }

    #[test]
    fn test_registered_constructor_builds_custom_type() {
        let codec = JsonCodec::with_registry(checked_registry());
        let order_ref: OrderRef = codec.decode(&json!("ord-12")).unwrap();
        assert_eq!(order_ref.raw(), "ord-12");
    }

    #[test]
    fn test_constructor_failure_is_reported_with_context() {
        let codec = JsonCodec::with_registry(checked_registry());
        let err = codec
            .decode_field::<OrderRef>("order_ref", &json!("12"))
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("order_ref"));
        assert!(message.contains("OrderRef"));
        assert!(message.contains("12"));
    }

    #[test]
    fn test_decode_seq_preserves_order() {
        let codec = JsonCodec::new();
        let ids: Vec<TypedInt<Order>> = codec
            .decode_seq("ids", &json!([3, 1, 2]))
            .unwrap();
        let raw: Vec<i32> = ids.iter().map(|id| *id.value()).collect();
        assert_eq!(raw, vec![3, 1, 2]);
    }

    #[test]
    fn test_decode_seq_rejects_non_array() {
        let codec = JsonCodec::new();
        assert!(
            codec
                .decode_seq::<TypedInt<Order>>("ids", &json!(1))
                .is_err()
        );
    }

    #[test]
    fn test_encode_seq_preserves_order() {
        let codec = JsonCodec::new();
        let ids = vec![
            TypedInt::<Order>::of(3),
            TypedInt::<Order>::of(1),
        ];
        assert_eq!(codec.encode_seq(&ids), json!([3, 1]));
    }

    #[test]
    fn test_serde_impls_are_transparent() {
        let id = TypedString::<Order>::of("o-1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"o-1\"");
        let back: TypedString<Order> =
            serde_json::from_str("\"o-1\"").unwrap();
        assert_eq!(back, id);
    }
}
