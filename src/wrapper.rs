use crate::{RawValue, TypeHandle, TypedValue};

/// A type that wraps a [`TypedValue`] over one of the raw value types.
///
/// Every collaborator (JSON codec, parameter conversion, persistence
/// helpers, query predicates, document mapping) accepts any `Wrapper`.
/// [`TypedValue`] itself implements the trait for each raw value type;
/// those implementations are the *built-in* wrappers and report
/// [`BUILTIN`](Wrapper::BUILTIN) as true.
///
/// A caller-defined newtype over a `TypedValue` implements this trait to
/// take part in the collaborators. Such a custom wrapper may validate in
/// its own constructor; the core never does.
///
/// # Examples
///
/// ```
/// use typed_values::{TypedString, Wrapper};
///
/// struct Sku;
/// struct SkuCode(TypedString<Sku>);
///
/// impl Wrapper for SkuCode {
///     type Value = String;
///     type Marker = Sku;
///
///     fn from_typed(inner: TypedString<Sku>) -> Self {
///         SkuCode(inner)
///     }
///
///     fn typed(&self) -> &TypedString<Sku> {
///         &self.0
///     }
///
///     fn into_typed(self) -> TypedString<Sku> {
///         self.0
///     }
/// }
///
/// let code = SkuCode::from_raw("sku-1".to_string());
/// assert_eq!(code.raw(), "sku-1");
/// assert!(!SkuCode::BUILTIN);
/// assert!(TypedString::<Sku>::BUILTIN);
/// ```
pub trait Wrapper: Sized + 'static {
    /// The raw value type carried by the wrapper.
    type Value: RawValue;

    /// The marker type distinguishing this wrapper's purpose.
    type Marker: 'static;

    /// True for the built-in [`TypedValue`] wrappers, false for custom
    /// wrapper types. Built-ins cannot be re-registered with a custom
    /// constructor.
    const BUILTIN: bool = false;

    /// Wraps an already-constructed typed value.
    fn from_typed(inner: TypedValue<Self::Value, Self::Marker>) -> Self;

    /// Borrows the underlying typed value.
    fn typed(&self) -> &TypedValue<Self::Value, Self::Marker>;

    /// Consumes the wrapper and returns the underlying typed value.
    fn into_typed(self) -> TypedValue<Self::Value, Self::Marker>;

    /// Constructs the wrapper from a raw value.
    fn from_raw(value: Self::Value) -> Self {
        Self::from_typed(TypedValue::new(value))
    }

    /// Borrows the raw value.
    fn raw(&self) -> &Self::Value {
        self.typed().value()
    }

    /// Consumes the wrapper and returns the raw value.
    fn into_raw(self) -> Self::Value {
        self.into_typed().into_value()
    }

    /// Returns the handle for this wrapper's marker type.
    fn handle() -> TypeHandle {
        TypeHandle::of::<Self::Marker>()
    }

    /// Returns the wrapper type's name, for diagnostics.
    fn wrapper_name() -> &'static str {
        std::any::type_name::<Self>()
    }
}

impl<V: RawValue, M: 'static> Wrapper for TypedValue<V, M> {
    type Value = V;
    type Marker = M;

    const BUILTIN: bool = true;

    fn from_typed(inner: TypedValue<V, M>) -> Self {
        inner
    }

    fn typed(&self) -> &TypedValue<V, M> {
        self
    }

    fn into_typed(self) -> TypedValue<V, M> {
        self
    }
}
