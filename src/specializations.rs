//! Fixed-value-type aliases of [`TypedValue`] for the four raw types.
//!
//! These exist purely for ergonomics at call sites and in signatures; they
//! add no semantics beyond constraining the value type.

use crate::TypedValue;

#[cfg(feature = "uuid")]
use uuid::Uuid;

/// A string-valued typed wrapper.
///
/// # Examples
///
/// ```
/// use typed_values::TypedString;
///
/// struct User;
///
/// let id = TypedString::<User>::of("user-123");
/// assert_eq!(id.value(), "user-123");
/// ```
pub type TypedString<M> = TypedValue<String, M>;

/// A 32-bit-integer-valued typed wrapper.
pub type TypedInt<M> = TypedValue<i32, M>;

/// A 64-bit-integer-valued typed wrapper.
pub type TypedLong<M> = TypedValue<i64, M>;

/// A UUID-valued typed wrapper.
///
/// Only available with the `uuid` feature. Builds without it should carry
/// the UUID's canonical textual form in a [`TypedString`] instead.
#[cfg(feature = "uuid")]
pub type TypedUuid<M> = TypedValue<Uuid, M>;

impl<M: 'static> TypedValue<String, M> {
    /// Wraps a string value.
    pub fn of(value: impl Into<String>) -> Self {
        Self::new(value.into())
    }
}

impl<M: 'static> TypedValue<i32, M> {
    /// Wraps a 32-bit integer value.
    pub fn of(value: i32) -> Self {
        Self::new(value)
    }
}

impl<M: 'static> TypedValue<i64, M> {
    /// Wraps a 64-bit integer value.
    pub fn of(value: i64) -> Self {
        Self::new(value)
    }
}

#[cfg(feature = "uuid")]
impl<M: 'static> TypedValue<Uuid, M> {
    /// Wraps a UUID value.
    pub fn of(value: Uuid) -> Self {
        Self::new(value)
    }

    /// Wraps a freshly generated random (version 4) UUID.
    ///
    /// # Examples
    ///
    /// ```
    /// use typed_values::TypedUuid;
    ///
    /// struct Session;
    ///
    /// let id = TypedUuid::<Session>::random();
    /// assert!(!id.value().is_nil());
    /// ```
    pub fn random() -> Self {
        Self::new(Uuid::new_v4())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Account;
    struct Invoice;

    #[test]
    fn test_of_constructors() {
        let s = TypedString::<Account>::of("acct-1");
        assert_eq!(s.value(), "acct-1");

        let i = TypedInt::<Account>::of(3);
        assert_eq!(*i.value(), 3);

        let l = TypedLong::<Account>::of(1 << 40);
        assert_eq!(*l.value(), 1 << 40);
    }

    #[test]
    fn test_specializations_share_base_semantics() {
        let a = TypedInt::<Account>::of(5);
        let b = TypedInt::<Invoice>::of(5);
        assert_ne!(a, b);
        assert!(a.is_about::<Account>());
        assert!(!a.is_about::<Invoice>());
    }

    #[cfg(feature = "uuid")]
    #[test]
    fn test_uuid_specialization() {
        let a = TypedUuid::<Account>::random();
        let b = TypedUuid::<Account>::random();
        assert_ne!(a, b);
        assert_eq!(a, TypedUuid::<Account>::of(*a.value()));
    }
}
