use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use crate::TypeHandle;

/// A primitive value tagged with a compile-time marker type.
///
/// `TypedValue<V, M>` pairs a value of type `V` with a marker type `M` so
/// that values meant for different purposes cannot be interchanged, even
/// when they share the same underlying representation. The marker carries
/// no data; at runtime the wrapper holds the value and a [`TypeHandle`]
/// for `M`.
///
/// # Identity
///
/// - Two wrappers are equal iff their values are equal **and** their
///   handles denote the exact same marker type. Marker relationships are
///   never consulted; only identical handles match.
/// - Hashing covers the value only. Two wrappers with equal values but
///   different markers share a hash yet compare unequal, which satisfies
///   the `Hash`/`Eq` contract.
/// - Ordering compares values first and breaks ties on the handle's
///   deterministic order, so sorting is reproducible even across markers.
///
/// Wrappers are immutable and freely shareable across threads.
///
/// # Examples
///
/// ```
/// use typed_values::TypedValue;
///
/// struct User;
/// struct Product;
///
/// let user_id = TypedValue::<String, User>::new("id-123".to_string());
/// let product_id = TypedValue::<String, Product>::new("id-123".to_string());
///
/// // Same raw value, different markers: never equal.
/// assert_ne!(user_id, product_id);
/// assert_eq!(user_id, TypedValue::<String, User>::new("id-123".to_string()));
/// ```
pub struct TypedValue<V, M> {
    value: V,
    handle: TypeHandle,
    // fn-pointer phantom keeps the wrapper Send + Sync with no bounds on M
    marker: PhantomData<fn() -> M>,
}

impl<V, M: 'static> TypedValue<V, M> {
    /// Wraps `value` with the marker type `M`.
    ///
    /// The marker is the explicit type argument at the call site; the
    /// runtime handle is derived from it. Construction is total: no
    /// validation is performed here. A wrapper newtype that wants
    /// validation performs it in its own constructor.
    ///
    /// # Examples
    ///
    /// ```
    /// use typed_values::TypedValue;
    ///
    /// struct Order;
    ///
    /// let id = TypedValue::<i64, Order>::new(42);
    /// assert_eq!(*id.value(), 42);
    /// ```
    pub fn new(value: V) -> Self {
        Self {
            value,
            handle: TypeHandle::of::<M>(),
            marker: PhantomData,
        }
    }

    /// Wraps a value that may be absent.
    ///
    /// Returns `None` for `None`, otherwise behaves as [`new`](Self::new).
    ///
    /// # Examples
    ///
    /// ```
    /// use typed_values::TypedValue;
    ///
    /// struct Order;
    ///
    /// assert!(TypedValue::<i64, Order>::new_opt(None).is_none());
    /// let id = TypedValue::<i64, Order>::new_opt(Some(7)).unwrap();
    /// assert_eq!(*id.value(), 7);
    /// ```
    pub fn new_opt(value: Option<V>) -> Option<Self> {
        value.map(Self::new)
    }

    /// Returns a reusable constructor closure for bulk mapping.
    ///
    /// The handle is computed once and captured; the returned closure is
    /// pure and may be called any number of times.
    ///
    /// # Examples
    ///
    /// ```
    /// use typed_values::TypedValue;
    ///
    /// struct User;
    ///
    /// let make = TypedValue::<i64, User>::factory();
    /// let ids: Vec<_> = vec![1, 2, 3].into_iter().map(make).collect();
    /// assert_eq!(ids.len(), 3);
    /// assert_eq!(*ids[0].value(), 1);
    /// ```
    pub fn factory() -> impl Fn(V) -> Self {
        let handle = TypeHandle::of::<M>();
        move |value| Self {
            value,
            handle,
            marker: PhantomData,
        }
    }
}

impl<V, M> TypedValue<V, M> {
    /// Returns the wrapped value.
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Consumes the wrapper and returns the wrapped value.
    pub fn into_value(self) -> V {
        self.value
    }

    /// Returns the handle for the marker type.
    pub fn type_handle(&self) -> TypeHandle {
        self.handle
    }

    /// Returns true iff the marker type is exactly `M2`.
    ///
    /// This is a single handle-equality check. It is intentionally never
    /// true for any type other than the wrapper's own marker, whatever
    /// relationship the two types may have.
    ///
    /// # Examples
    ///
    /// ```
    /// use typed_values::TypedValue;
    ///
    /// struct Person;
    /// struct Employee;
    ///
    /// let id = TypedValue::<i64, Employee>::new(9);
    /// assert!(id.is_about::<Employee>());
    /// assert!(!id.is_about::<Person>());
    /// ```
    pub fn is_about<M2: 'static>(&self) -> bool {
        self.handle == TypeHandle::of::<M2>()
    }

    /// Reinterprets the wrapper as tagged with `M2` iff the marker type is
    /// exactly `M2`.
    ///
    /// This is a checked narrowing: at runtime the (value, handle) pair is
    /// unchanged, only the static type label moves. Any other `M2` yields
    /// `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use typed_values::TypedValue;
    ///
    /// struct Person;
    /// struct Employee;
    ///
    /// let id = TypedValue::<i64, Employee>::new(9);
    /// assert!(id.cast::<Employee>().is_some());
    /// assert!(TypedValue::<i64, Employee>::new(9).cast::<Person>().is_none());
    /// ```
    pub fn cast<M2: 'static>(self) -> Option<TypedValue<V, M2>> {
        if self.is_about::<M2>() {
            Some(TypedValue {
                value: self.value,
                handle: self.handle,
                marker: PhantomData,
            })
        } else {
            None
        }
    }

    /// Extracts the raw values from a collection of wrappers.
    ///
    /// Preserves input order and does not deduplicate.
    ///
    /// # Examples
    ///
    /// ```
    /// use typed_values::TypedValue;
    ///
    /// struct Tag;
    ///
    /// let make = TypedValue::<i64, Tag>::factory();
    /// let wrapped = vec![make(3), make(1), make(3)];
    /// assert_eq!(TypedValue::raw_values(wrapped), vec![3, 1, 3]);
    /// ```
    pub fn raw_values<I>(wrappers: I) -> Vec<V>
    where
        I: IntoIterator<Item = Self>,
    {
        wrappers.into_iter().map(|wrapper| wrapper.value).collect()
    }
}

impl<V: Clone, M> Clone for TypedValue<V, M> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            handle: self.handle,
            marker: PhantomData,
        }
    }
}

impl<V: Copy, M> Copy for TypedValue<V, M> {}

impl<V: PartialEq, M, M2> PartialEq<TypedValue<V, M2>> for TypedValue<V, M> {
    fn eq(&self, other: &TypedValue<V, M2>) -> bool {
        self.value == other.value && self.handle == other.handle
    }
}

impl<V: Eq, M> Eq for TypedValue<V, M> {}

/// Hashes the value only. The handle is deliberately excluded so that a
/// wrapper hashes identically to its raw value.
impl<V: Hash, M> Hash for TypedValue<V, M> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<V: Ord, M, M2> PartialOrd<TypedValue<V, M2>> for TypedValue<V, M> {
    fn partial_cmp(&self, other: &TypedValue<V, M2>) -> Option<Ordering> {
        Some(
            self.value
                .cmp(&other.value)
                .then_with(|| self.handle.cmp(&other.handle)),
        )
    }
}

impl<V: Ord, M> Ord for TypedValue<V, M> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value
            .cmp(&other.value)
            .then_with(|| self.handle.cmp(&other.handle))
    }
}

impl<V: fmt::Display, M> fmt::Display for TypedValue<V, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.handle.display_name(), self.value)
    }
}

impl<V: fmt::Debug, M> fmt::Debug for TypedValue<V, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:?})", self.handle.display_name(), self.value)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    use super::TypedValue;

    struct User;
    struct Product;
    struct Person;
    struct Employee;

    fn hash_of<T: Hash>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_equal_value_equal_marker() {
        let a = TypedValue::<String, User>::new("user-123".to_string());
        let b = TypedValue::<String, User>::new("user-123".to_string());
        assert_eq!(a, b);
        assert_eq!(b, a);
    }

    #[test]
    fn test_equal_value_different_marker() {
        let user = TypedValue::<String, User>::new("user-123".to_string());
        let product =
            TypedValue::<String, Product>::new("user-123".to_string());
        assert_ne!(user, product);
        assert_ne!(product, user);
    }

    #[test]
    fn test_different_value_same_marker() {
        let a = TypedValue::<String, User>::new("a".to_string());
        let b = TypedValue::<String, User>::new("b".to_string());
        assert_ne!(a, b);
    }

    #[test]
    fn test_related_markers_never_match() {
        let employee = TypedValue::<i64, Employee>::new(5);
        let person = TypedValue::<i64, Person>::new(5);
        assert_ne!(employee, person);
        assert!(!employee.is_about::<Person>());
        assert!(employee.is_about::<Employee>());
    }

    #[test]
    fn test_hash_matches_raw_value() {
        let wrapped = TypedValue::<i64, User>::new(77);
        assert_eq!(hash_of(&wrapped), hash_of(&77i64));
    }

    #[test]
    fn test_hash_ignores_marker() {
        let user = TypedValue::<i64, User>::new(77);
        let product = TypedValue::<i64, Product>::new(77);
        assert_eq!(hash_of(&user), hash_of(&product));
        assert_ne!(user, product);
    }

    #[test]
    fn test_usable_as_set_element() {
        let mut set = HashSet::new();
        set.insert(TypedValue::<i64, User>::new(1));
        set.insert(TypedValue::<i64, User>::new(1));
        set.insert(TypedValue::<i64, User>::new(2));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_sort_by_value() {
        let make = TypedValue::<String, User>::factory();
        let mut ids =
            vec![make("z".to_string()), make("a".to_string()), make("m".to_string())];
        ids.sort();
        let sorted = TypedValue::raw_values(ids);
        assert_eq!(sorted, vec!["a", "m", "z"]);
    }

    #[test]
    fn test_tie_break_is_marker_order() {
        let user = TypedValue::<i64, User>::new(10);
        let product = TypedValue::<i64, Product>::new(10);
        let forward = user.partial_cmp(&product).unwrap();
        let backward = product.partial_cmp(&user).unwrap();
        assert_eq!(forward, backward.reverse());
        assert_eq!(
            forward,
            user.type_handle().cmp(&product.type_handle())
        );
        // Reproducible across repeated comparisons
        for _ in 0..10 {
            assert_eq!(user.partial_cmp(&product).unwrap(), forward);
        }
    }

    #[test]
    fn test_ordering_consistent_with_equality() {
        let a = TypedValue::<i64, User>::new(10);
        let b = TypedValue::<i64, User>::new(10);
        assert_eq!(a.cmp(&b), std::cmp::Ordering::Equal);
        assert_eq!(a, b);
    }

    #[test]
    fn test_new_opt() {
        assert!(TypedValue::<String, User>::new_opt(None).is_none());
        let id =
            TypedValue::<String, User>::new_opt(Some("x".to_string())).unwrap();
        assert_eq!(id.value(), "x");
    }

    #[test]
    fn test_factory_is_reusable() {
        let make = TypedValue::<i64, User>::factory();
        let a = make(1);
        let b = make(1);
        assert_eq!(a, b);
        assert_eq!(a.type_handle(), b.type_handle());
    }

    #[test]
    fn test_cast_exact_marker_only() {
        let id = TypedValue::<i64, Employee>::new(9);
        let same = id.cast::<Employee>().unwrap();
        assert_eq!(*same.value(), 9);
        assert_eq!(same.type_handle(), TypedValue::<i64, Employee>::new(9).type_handle());

        let id = TypedValue::<i64, Employee>::new(9);
        assert!(id.cast::<Person>().is_none());
        let id = TypedValue::<i64, Employee>::new(9);
        assert!(id.cast::<User>().is_none());
    }

    #[test]
    fn test_cast_preserves_runtime_pair() {
        let id = TypedValue::<i64, User>::new(3);
        let handle = id.type_handle();
        let cast = id.cast::<User>().unwrap();
        assert_eq!(cast.type_handle(), handle);
        assert_eq!(*cast.value(), 3);
    }

    #[test]
    fn test_raw_values_preserves_order_and_duplicates() {
        let make = TypedValue::<i64, User>::factory();
        let values = TypedValue::raw_values(vec![make(3), make(1), make(3)]);
        assert_eq!(values, vec![3, 1, 3]);
    }

    #[test]
    fn test_display_renders_marker_and_value() {
        let id = TypedValue::<i64, User>::new(42);
        assert_eq!(id.to_string(), "User(42)");
    }

    #[test]
    fn test_debug_quotes_strings() {
        let id = TypedValue::<String, User>::new("abc".to_string());
        assert_eq!(format!("{:?}", id), "User(\"abc\")");
    }

    #[test]
    fn test_shareable_across_threads() {
        let id = TypedValue::<String, User>::new("shared".to_string());
        let handle = std::thread::spawn(move || id.value().clone());
        assert_eq!(handle.join().unwrap(), "shared");
    }
}
