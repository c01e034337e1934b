use std::any::TypeId;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{DefaultHasher, Hash, Hasher};

/// An opaque identity token for a marker type.
///
/// A `TypeHandle` stands in for a marker type at runtime. It supports exact
/// equality, hashing, and a deterministic relative ordering without relying
/// on type names, which keeps behavior identical on targets where names
/// cannot be recovered.
///
/// Two handles are equal iff they denote the exact same marker type. There
/// is no notion of one handle being a subtype of another: a handle for a
/// type never matches a handle for any other type, related or not.
///
/// Ordering compares the handle's numeric fingerprint first and falls back
/// to the underlying [`TypeId`] order when fingerprints collide. The result
/// is deterministic within a binary but not promised stable across builds.
/// Names never participate in equality or ordering; they are kept only for
/// [`display_name`](TypeHandle::display_name).
///
/// # Examples
///
/// ```
/// use typed_values::TypeHandle;
///
/// struct User;
/// struct Product;
///
/// let user = TypeHandle::of::<User>();
/// assert_eq!(user, TypeHandle::of::<User>());
/// assert_ne!(user, TypeHandle::of::<Product>());
/// ```
#[derive(Clone, Copy)]
pub struct TypeHandle {
    id: TypeId,
    fingerprint: u64,
    label: &'static str,
}

impl TypeHandle {
    /// Returns the handle for the marker type `M`.
    ///
    /// Handles for the same type are interchangeable: every call with the
    /// same `M` yields an equal handle with the same fingerprint.
    ///
    /// # Examples
    ///
    /// ```
    /// use typed_values::TypeHandle;
    ///
    /// struct Order;
    ///
    /// let a = TypeHandle::of::<Order>();
    /// let b = TypeHandle::of::<Order>();
    /// assert_eq!(a, b);
    /// assert_eq!(a.fingerprint(), b.fingerprint());
    /// ```
    pub fn of<M: 'static>() -> Self {
        let id = TypeId::of::<M>();
        let mut hasher = DefaultHasher::new();
        id.hash(&mut hasher);
        Self {
            id,
            fingerprint: hasher.finish(),
            label: std::any::type_name::<M>(),
        }
    }

    /// Returns the numeric fingerprint used as the ordering tie-break.
    ///
    /// The fingerprint is deterministic for a given binary. It is not a
    /// portable identifier: recompiling may assign different fingerprints.
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    /// Returns a best-effort human-readable name for the marker type.
    ///
    /// Module paths are stripped, so `my_crate::markers::User` renders as
    /// `User`. Intended for logs and diagnostics only; the rendering is not
    /// a stable contract.
    ///
    /// # Examples
    ///
    /// ```
    /// use typed_values::TypeHandle;
    ///
    /// struct Invoice;
    ///
    /// assert_eq!(TypeHandle::of::<Invoice>().display_name(), "Invoice");
    /// ```
    pub fn display_name(&self) -> String {
        short_name(self.label)
    }
}

/// Strips module paths from every segment of a type name, preserving
/// generic argument brackets.
fn short_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut segment = String::new();
    for ch in full.chars() {
        match ch {
            '<' | '>' | ',' | ' ' | '(' | ')' | '[' | ']' | ';' => {
                out.push_str(segment.rsplit("::").next().unwrap_or(&segment));
                segment.clear();
                out.push(ch);
            }
            _ => segment.push(ch),
        }
    }
    out.push_str(segment.rsplit("::").next().unwrap_or(&segment));
    out
}

impl PartialEq for TypeHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeHandle {}

impl Hash for TypeHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Ord for TypeHandle {
    fn cmp(&self, other: &Self) -> Ordering {
        self.fingerprint
            .cmp(&other.fingerprint)
            .then_with(|| self.id.cmp(&other.id))
    }
}

impl PartialOrd for TypeHandle {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeHandle({})", self.display_name())
    }
}

impl fmt::Display for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}
