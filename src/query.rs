//! Predicate builders for query integrations.
//!
//! Each builder accepts wrapper instances (or collections of them) over a
//! column path, unwraps the raw values, and produces a [`Predicate`] the
//! host query layer can translate. The `Display` rendering is a SQL-style
//! fragment intended for diagnostics and tests, not for execution.

use std::fmt;

use crate::{RawLiteral, RawValue, Wrapper};

/// A predicate over a column path, holding type-erased raw values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// The column equals the value.
    Eq { path: String, value: RawLiteral },
    /// The column differs from the value.
    Ne { path: String, value: RawLiteral },
    /// The column's value is one of the listed values, tested in order.
    In {
        path: String,
        values: Vec<RawLiteral>,
    },
    /// The column's value is none of the listed values.
    NotIn {
        path: String,
        values: Vec<RawLiteral>,
    },
    /// The column is null.
    IsNull { path: String },
    /// The column is not null.
    NotNull { path: String },
}

impl Predicate {
    /// Returns the column path the predicate applies to.
    pub fn path(&self) -> &str {
        match self {
            Predicate::Eq { path, .. }
            | Predicate::Ne { path, .. }
            | Predicate::In { path, .. }
            | Predicate::NotIn { path, .. }
            | Predicate::IsNull { path }
            | Predicate::NotNull { path } => path,
        }
    }
}

/// Builds an equality predicate from a wrapper's raw value.
///
/// # Examples
///
/// ```
/// use typed_values::{query, TypedString};
///
/// struct User;
///
/// let id = TypedString::<User>::of("u-1");
/// let predicate = query::eq("user_id", &id);
/// assert_eq!(predicate.to_string(), "user_id = 'u-1'");
/// ```
pub fn eq<W: Wrapper>(path: &str, wrapper: &W) -> Predicate {
    Predicate::Eq {
        path: path.to_string(),
        value: wrapper.raw().clone().into_literal(),
    }
}

/// Builds an inequality predicate from a wrapper's raw value.
pub fn ne<W: Wrapper>(path: &str, wrapper: &W) -> Predicate {
    Predicate::Ne {
        path: path.to_string(),
        value: wrapper.raw().clone().into_literal(),
    }
}

/// Builds a set-membership predicate, preserving input order.
///
/// # Examples
///
/// ```
/// use typed_values::{query, TypedInt};
///
/// struct Status;
///
/// let open = TypedInt::<Status>::of(1);
/// let held = TypedInt::<Status>::of(4);
/// let predicate = query::in_list("status", [&open, &held]);
/// assert_eq!(predicate.to_string(), "status IN (1, 4)");
/// ```
pub fn in_list<'a, W, I>(path: &str, wrappers: I) -> Predicate
where
    W: Wrapper + 'a,
    I: IntoIterator<Item = &'a W>,
{
    Predicate::In {
        path: path.to_string(),
        values: literals(wrappers),
    }
}

/// Builds a negated set-membership predicate, preserving input order.
pub fn not_in<'a, W, I>(path: &str, wrappers: I) -> Predicate
where
    W: Wrapper + 'a,
    I: IntoIterator<Item = &'a W>,
{
    Predicate::NotIn {
        path: path.to_string(),
        values: literals(wrappers),
    }
}

/// Builds a null-check predicate.
pub fn is_null(path: &str) -> Predicate {
    Predicate::IsNull {
        path: path.to_string(),
    }
}

/// Builds a not-null-check predicate.
pub fn not_null(path: &str) -> Predicate {
    Predicate::NotNull {
        path: path.to_string(),
    }
}

fn literals<'a, W, I>(wrappers: I) -> Vec<RawLiteral>
where
    W: Wrapper + 'a,
    I: IntoIterator<Item = &'a W>,
{
    wrappers
        .into_iter()
        .map(|wrapper| wrapper.raw().clone().into_literal())
        .collect()
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Eq { path, value } => write!(f, "{} = {}", path, value),
            Predicate::Ne { path, value } => {
                write!(f, "{} <> {}", path, value)
            }
            Predicate::In { path, values } => {
                write!(f, "{} IN (", path)?;
                render_list(f, values)?;
                write!(f, ")")
            }
            Predicate::NotIn { path, values } => {
                write!(f, "{} NOT IN (", path)?;
                render_list(f, values)?;
                write!(f, ")")
            }
            Predicate::IsNull { path } => write!(f, "{} IS NULL", path),
            Predicate::NotNull { path } => write!(f, "{} IS NOT NULL", path),
        }
    }
}

fn render_list(f: &mut fmt::Formatter<'_>, values: &[RawLiteral]) -> fmt::Result {
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", value)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RawLiteral, TypedInt, TypedString};

    struct User;
    struct Status;

    #[test]
    fn test_eq_and_ne() {
        let id = TypedString::<User>::of("u-1");
        assert_eq!(eq("user_id", &id).to_string(), "user_id = 'u-1'");
        assert_eq!(ne("user_id", &id).to_string(), "user_id <> 'u-1'");
    }

    #[test]
    fn test_eq_extracts_raw_value() {
        let id = TypedString::<User>::of("u-1");
        let predicate = eq("user_id", &id);
        assert_eq!(
            predicate,
            Predicate::Eq {
                path: "user_id".to_string(),
                value: RawLiteral::Text("u-1".to_string()),
            }
        );
    }

    #[test]
    fn test_in_list_preserves_order() {
        let make = TypedInt::<Status>::factory();
        let values = vec![make(4), make(1), make(4)];
        let predicate = in_list("status", &values);
        assert_eq!(predicate.to_string(), "status IN (4, 1, 4)");
    }

    #[test]
    fn test_empty_in_list() {
        let values: Vec<TypedInt<Status>> = Vec::new();
        assert_eq!(in_list("status", &values).to_string(), "status IN ()");
    }

    #[test]
    fn test_not_in() {
        let make = TypedInt::<Status>::factory();
        let values = vec![make(2), make(3)];
        assert_eq!(
            not_in("status", &values).to_string(),
            "status NOT IN (2, 3)"
        );
    }

    #[test]
    fn test_null_checks() {
        assert_eq!(is_null("deleted_at").to_string(), "deleted_at IS NULL");
        assert_eq!(
            not_null("deleted_at").to_string(),
            "deleted_at IS NOT NULL"
        );
        assert_eq!(is_null("deleted_at").path(), "deleted_at");
    }

    #[test]
    fn test_text_literal_is_escaped() {
        let id = TypedString::<User>::of("o'brien");
        assert_eq!(eq("name", &id).to_string(), "name = 'o''brien'");
    }
}
