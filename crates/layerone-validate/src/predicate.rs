//! Opaque value predicates

use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// A pure test over one JSON value.
///
/// Predicates are shared between threads by every clone of a bound rule set,
/// so the wrapped function must be `Send + Sync` and should not keep state.
///
/// ```rust,ignore
/// let positive = Predicate::named("positive", |v| v.as_i64().is_some_and(|n| n > 0));
/// assert!(positive.test(&json!(3)));
/// ```
#[derive(Clone)]
pub struct Predicate {
    name: Arc<str>,
    test: Arc<dyn Fn(&Value) -> bool + Send + Sync>,
}

impl Predicate {
    /// Wrap a function under a name used in logs and `Debug` output.
    pub fn named<F>(name: impl Into<Arc<str>>, test: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            test: Arc::new(test),
        }
    }

    /// Name of the predicate
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Evaluate the predicate against a value.
    pub fn test(&self, value: &Value) -> bool {
        (self.test)(value)
    }
}

impl<F> From<F> for Predicate
where
    F: Fn(&Value) -> bool + Send + Sync + 'static,
{
    fn from(test: F) -> Self {
        Self::named("<fn>", test)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Predicate({})", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn closures_convert_into_predicates() {
        let p: Predicate = (|v: &Value| v.is_string()).into();
        assert!(p.test(&json!("vik")));
        assert!(!p.test(&json!(3)));
        assert_eq!(p.name(), "<fn>");
    }

    #[test]
    fn clones_share_the_function() {
        let p = Predicate::named("is_null", Value::is_null);
        let q = p.clone();
        assert!(q.test(&Value::Null));
        assert_eq!(format!("{:?}", q), "Predicate(is_null)");
    }
}
