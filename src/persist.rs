//! Symmetric wrapper/column conversions for persistence layers.
//!
//! A persistence mapping needs two directions: wrapper to raw column
//! value on the way in, and raw column value to wrapper (with the marker
//! fixed at mapping-definition time) on the way out.
//!
//! Identifier columns get special treatment: many persistence frameworks
//! forbid conversion logic on primary-key columns. The supported pattern
//! is to persist the raw primitive as the actual column and expose a
//! computed, non-persisted typed accessor beside it, captured by
//! [`TypedIdentified`]:
//!
//! ```
//! use typed_values::TypedLong;
//! use typed_values::persist::TypedIdentified;
//!
//! struct Order;
//!
//! struct OrderRow {
//!     // The persisted primary-key column stays a plain i64.
//!     id: i64,
//!     total_cents: i64,
//! }
//!
//! impl TypedIdentified for OrderRow {
//!     type Id = TypedLong<Order>;
//!
//!     fn typed_id(&self) -> TypedLong<Order> {
//!         TypedLong::of(self.id)
//!     }
//! }
//!
//! let row = OrderRow { id: 42, total_cents: 1999 };
//! assert_eq!(*row.typed_id().value(), 42);
//! # let _ = row.total_cents;
//! ```

use crate::Wrapper;

/// Converts a wrapper into its raw column value.
pub fn into_column<W: Wrapper>(wrapper: W) -> W::Value {
    wrapper.into_raw()
}

/// Returns a wrapper's raw column value, cloning it.
pub fn to_column<W: Wrapper>(wrapper: &W) -> W::Value {
    wrapper.raw().clone()
}

/// Rebuilds a wrapper from a raw column value.
///
/// The marker comes from the wrapper type declared at the mapping site,
/// never from the stored data.
///
/// # Examples
///
/// ```
/// use typed_values::{persist, TypedString};
///
/// struct Customer;
///
/// let id: TypedString<Customer> = persist::from_column("c-7".to_string());
/// assert_eq!(persist::to_column(&id), "c-7");
/// ```
pub fn from_column<W: Wrapper>(raw: W::Value) -> W {
    W::from_raw(raw)
}

/// Rebuilds a wrapper from a nullable column.
///
/// `None` stays `None`; no error path exists here.
pub fn from_nullable_column<W: Wrapper>(raw: Option<W::Value>) -> Option<W> {
    raw.map(W::from_raw)
}

/// Projects a sequence of wrappers to their raw column values,
/// preserving order. Useful for binding id lists.
pub fn to_columns<'a, W, I>(wrappers: I) -> Vec<W::Value>
where
    W: Wrapper + 'a,
    I: IntoIterator<Item = &'a W>,
{
    wrappers.into_iter().map(to_column).collect()
}

/// An entity that persists a raw identifier column and exposes a
/// computed typed accessor beside it.
pub trait TypedIdentified {
    /// The typed form of the identifier.
    type Id: Wrapper;

    /// Returns the identifier in its typed form.
    fn typed_id(&self) -> Self::Id;
}
