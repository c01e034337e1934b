use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::error::Error;
use std::fmt;

use crate::{RawKind, RawValue, Wrapper};

type BoxError = Box<dyn Error + Send + Sync>;

type ConstructorFn<W> =
    Box<dyn Fn(<W as Wrapper>::Value) -> Result<W, BoxError> + Send + Sync>;

/// A registered custom wrapper type.
struct Registration {
    wrapper_name: &'static str,
    marker_name: String,
    kind: RawKind,
    /// Holds a `ConstructorFn<W>` for the wrapper type this entry is
    /// keyed by.
    construct: Box<dyn Any + Send + Sync>,
}

/// A store of custom wrapper constructors.
///
/// The JSON codec consults a `WrapperRegistry` when decoding: a wrapper
/// type with a registered constructor is built through that constructor
/// (which may validate and fail); anything else takes the default
/// [`Wrapper::from_raw`] path.
///
/// Built-in wrappers cannot be registered, and a wrapper type can be
/// registered at most once.
///
/// # Examples
///
/// ```
/// use typed_values::{TypedString, Wrapper, WrapperRegistry};
///
/// struct Part;
/// struct PartNumber(TypedString<Part>);
///
/// impl Wrapper for PartNumber {
///     type Value = String;
///     type Marker = Part;
///     fn from_typed(inner: TypedString<Part>) -> Self { PartNumber(inner) }
///     fn typed(&self) -> &TypedString<Part> { &self.0 }
///     fn into_typed(self) -> TypedString<Part> { self.0 }
/// }
///
/// let mut registry = WrapperRegistry::new();
/// registry
///     .register::<PartNumber, _, std::convert::Infallible>(|raw| {
///         Ok(PartNumber::from_raw(raw))
///     })
///     .unwrap();
/// assert!(registry.is_registered::<PartNumber>());
///
/// let part: PartNumber = registry
///     .construct("pn-400".to_string())
///     .expect("registered")
///     .expect("constructor succeeded");
/// assert_eq!(part.raw(), "pn-400");
/// ```
#[derive(Default)]
pub struct WrapperRegistry {
    registrations: HashMap<TypeId, Registration>,
}

impl WrapperRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            registrations: HashMap::new(),
        }
    }

    /// Registers a constructor for the custom wrapper type `W`.
    ///
    /// The constructor may validate and fail; a failure surfaced during
    /// construction is wrapped with the wrapper name, marker name, and
    /// offending raw value.
    ///
    /// Returns [`RegistryError::Builtin`] when `W` is one of the built-in
    /// wrappers and [`RegistryError::Duplicate`] when `W` has already
    /// been registered.
    pub fn register<W, F, E>(&mut self, construct: F) -> Result<(), RegistryError>
    where
        W: Wrapper,
        F: Fn(W::Value) -> Result<W, E> + Send + Sync + 'static,
        E: Error + Send + Sync + 'static,
    {
        if W::BUILTIN {
            return Err(RegistryError::Builtin {
                wrapper: W::wrapper_name(),
            });
        }
        let key = TypeId::of::<W>();
        if self.registrations.contains_key(&key) {
            return Err(RegistryError::Duplicate {
                wrapper: W::wrapper_name(),
            });
        }

        let boxed: ConstructorFn<W> = Box::new(move |raw| {
            construct(raw).map_err(|e| Box::new(e) as BoxError)
        });
        self.registrations.insert(
            key,
            Registration {
                wrapper_name: W::wrapper_name(),
                marker_name: W::handle().display_name(),
                kind: W::Value::KIND,
                construct: Box::new(boxed),
            },
        );
        Ok(())
    }

    /// Constructs `W` from a raw value through its registered
    /// constructor.
    ///
    /// Returns `None` when `W` is not registered; the caller then falls
    /// back to default construction. A constructor failure is reported as
    /// a [`ConstructError`] naming the wrapper, its marker, and the raw
    /// value it rejected.
    pub fn construct<W: Wrapper>(
        &self,
        value: W::Value,
    ) -> Option<Result<W, ConstructError>> {
        let registration = self.registrations.get(&TypeId::of::<W>())?;
        let construct = registration
            .construct
            .downcast_ref::<ConstructorFn<W>>()?;
        let shown = value.to_string();
        Some(construct(value).map_err(|source| ConstructError {
            wrapper: registration.wrapper_name,
            marker: registration.marker_name.clone(),
            value: shown,
            source,
        }))
    }

    /// Returns true if `W` has a registered constructor.
    pub fn is_registered<W: Wrapper>(&self) -> bool {
        self.registrations.contains_key(&TypeId::of::<W>())
    }

    /// Returns the raw kind a registered wrapper was declared with, if
    /// registered.
    pub fn registered_kind<W: Wrapper>(&self) -> Option<RawKind> {
        self.registrations
            .get(&TypeId::of::<W>())
            .map(|registration| registration.kind)
    }

    /// Returns the number of registered wrapper types.
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    /// Returns true if no wrapper types are registered.
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }
}

impl fmt::Debug for WrapperRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self
            .registrations
            .values()
            .map(|registration| registration.wrapper_name)
            .collect();
        names.sort_unstable();
        f.debug_tuple("WrapperRegistry").field(&names).finish()
    }
}

/// A registration was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The wrapper is one of the built-ins, which are not overridable.
    Builtin {
        /// The rejected wrapper type's name.
        wrapper: &'static str,
    },
    /// The wrapper type has already been registered.
    Duplicate {
        /// The rejected wrapper type's name.
        wrapper: &'static str,
    },
    /// Registration was attempted after the global codec was first used.
    Locked,
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::Builtin { wrapper } => {
                write!(f, "cannot register built-in wrapper type {}", wrapper)
            }
            RegistryError::Duplicate { wrapper } => {
                write!(f, "wrapper type {} is already registered", wrapper)
            }
            RegistryError::Locked => {
                write!(
                    f,
                    "cannot register wrapper types after the codec has been used"
                )
            }
        }
    }
}

impl std::error::Error for RegistryError {}

/// A registered custom constructor failed.
///
/// Carries the wrapper type, its marker, and the raw value the
/// constructor rejected, so the low-level failure never propagates bare.
#[derive(Debug)]
pub struct ConstructError {
    wrapper: &'static str,
    marker: String,
    value: String,
    source: BoxError,
}

impl ConstructError {
    /// The wrapper type whose constructor failed.
    pub fn wrapper(&self) -> &str {
        self.wrapper
    }

    /// The raw value, as displayed, that the constructor rejected.
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for ConstructError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "constructor for wrapper {} (marker {}) rejected value `{}`: {}",
            self.wrapper, self.marker, self.value, self.source
        )
    }
}

impl std::error::Error for ConstructError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.source.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;
    use std::fmt;

    use super::{RegistryError, WrapperRegistry};
    use crate::{RawKind, TypedString, Wrapper};

    struct Part;

    #[derive(Debug)]
    struct PartNumber(TypedString<Part>);

    impl Wrapper for PartNumber {
        type Value = String;
        type Marker = Part;

        fn from_typed(inner: TypedString<Part>) -> Self {
            PartNumber(inner)
        }

        fn typed(&self) -> &TypedString<Part> {
            &self.0
        }

        fn into_typed(self) -> TypedString<Part> {
            self.0
        }
    }

    #[derive(Debug)]
    struct BadPrefix;

    impl fmt::Display for BadPrefix {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "part numbers must start with pn-")
        }
    }

    impl std::error::Error for BadPrefix {}

    fn checked_part(raw: String) -> Result<PartNumber, BadPrefix> {
        if raw.starts_with("pn-") {
            Ok(PartNumber::from_raw(raw))
        } else {
            Err(BadPrefix)
        }
    }

    #[test]
    fn test_register_and_construct() {
        let mut registry = WrapperRegistry::new();
        registry.register::<PartNumber, _, BadPrefix>(checked_part).unwrap();

        assert!(registry.is_registered::<PartNumber>());
        assert_eq!(
            registry.registered_kind::<PartNumber>(),
            Some(RawKind::Text)
        );

        let part: PartNumber = registry
            .construct("pn-77".to_string())
            .unwrap()
            .unwrap();
        assert_eq!(part.raw(), "pn-77");
    }

    #[test]
    fn test_constructor_failure_is_wrapped_with_context() {
        let mut registry = WrapperRegistry::new();
        registry.register::<PartNumber, _, BadPrefix>(checked_part).unwrap();

        let err = registry
            .construct::<PartNumber>("bogus".to_string())
            .unwrap()
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("PartNumber"));
        assert!(message.contains("bogus"));
        assert!(message.contains("pn-"));
        assert_eq!(err.value(), "bogus");
    }

    #[test]
    fn test_unregistered_wrapper_returns_none() {
        let registry = WrapperRegistry::new();
        assert!(registry.construct::<PartNumber>("pn-1".to_string()).is_none());
        assert!(!registry.is_registered::<PartNumber>());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_builtin_registration_is_rejected() {
        let mut registry = WrapperRegistry::new();
        let err = registry
            .register::<TypedString<Part>, _, Infallible>(|raw| {
                Ok(TypedString::of(raw))
            })
            .unwrap_err();
        assert!(matches!(err, RegistryError::Builtin { .. }));
    }

    #[test]
    fn test_duplicate_registration_is_rejected() {
        let mut registry = WrapperRegistry::new();
        registry.register::<PartNumber, _, BadPrefix>(checked_part).unwrap();
        let err = registry
            .register::<PartNumber, _, BadPrefix>(checked_part)
            .unwrap_err();
        assert!(matches!(err, RegistryError::Duplicate { .. }));
        assert_eq!(registry.len(), 1);
    }
}
