/// Declares a marker type together with its wrapper alias.
///
/// One invocation expands to a zero-sized marker struct named
/// `<Alias>Marker` and a type alias binding it to the specialization for
/// the given raw type. The raw type is one of `String`, `i32`, `i64`, or
/// `Uuid` (the latter requires the `uuid` feature).
///
/// Markers do not have to be declared this way; any `'static` type can
/// serve as a marker. The macro only removes the boilerplate of the
/// common one-marker-one-alias case.
///
/// # Examples
///
/// ```
/// use typed_values::marker_type;
///
/// marker_type!(pub UserId: String);
/// marker_type!(pub OrderId: i64);
///
/// let user = UserId::of("user-123");
/// let order = OrderId::of(42);
///
/// assert_eq!(user.value(), "user-123");
/// assert!(user.is_about::<UserIdMarker>());
/// assert!(!order.is_about::<UserIdMarker>());
/// ```
#[macro_export]
macro_rules! marker_type {
    ($(#[$meta:meta])* $vis:vis $alias:ident: String) => {
        $crate::marker_type!(@declare $(#[$meta])* ($vis) $alias, TypedString);
    };
    ($(#[$meta:meta])* $vis:vis $alias:ident: i32) => {
        $crate::marker_type!(@declare $(#[$meta])* ($vis) $alias, TypedInt);
    };
    ($(#[$meta:meta])* $vis:vis $alias:ident: i64) => {
        $crate::marker_type!(@declare $(#[$meta])* ($vis) $alias, TypedLong);
    };
    ($(#[$meta:meta])* $vis:vis $alias:ident: Uuid) => {
        $crate::marker_type!(@declare $(#[$meta])* ($vis) $alias, TypedUuid);
    };
    (@declare $(#[$meta:meta])* ($vis:vis) $alias:ident, $wrapper:ident) => {
        $crate::__paste! {
            #[doc = concat!("Marker type for [`", stringify!($alias), "`].")]
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
            $vis struct [<$alias Marker>];

            $(#[$meta])*
            $vis type $alias = $crate::$wrapper<[<$alias Marker>]>;
        }
    };
}

#[cfg(test)]
mod tests {
    marker_type!(CustomerId: String);
    marker_type!(QuantityTag: i32);
    marker_type!(LedgerId: i64);
    #[cfg(feature = "uuid")]
    marker_type!(SessionId: Uuid);

    #[test]
    fn test_macro_declares_marker_and_alias() {
        let id = CustomerId::of("c-9");
        assert_eq!(id.value(), "c-9");
        assert!(id.is_about::<CustomerIdMarker>());
    }

    #[test]
    fn test_macro_markers_are_distinct() {
        let quantity = QuantityTag::of(3);
        let ledger = LedgerId::of(3);
        assert!(!quantity.is_about::<LedgerIdMarker>());
        assert!(!ledger.is_about::<QuantityTagMarker>());
    }

    #[cfg(feature = "uuid")]
    #[test]
    fn test_macro_uuid_alias() {
        let id = SessionId::random();
        assert!(id.is_about::<SessionIdMarker>());
    }
}
