//! One field's validation contract

use crate::predicate::Predicate;

/// Validation contract of a single field.
///
/// A rule names the field (`prop`) and optionally carries a type predicate,
/// a business predicate and the optional flag. Build it fluently:
///
/// ```rust,ignore
/// use layerone_validate::{predicates, Rule};
///
/// let id = Rule::new("id")
///     .of_type(predicates::is_number)
///     .biz(predicates::is_positive_integer);
/// let nickname = Rule::new("nickname").of_type(predicates::is_string).optional();
/// ```
#[derive(Debug, Clone)]
pub struct Rule {
    /// Field name looked up in the request source
    pub prop: String,
    /// Shape test applied to each item
    pub ty: Option<Predicate>,
    /// Business test applied to the whole value or to each item
    pub biz: Option<Predicate>,
    /// Whether the field may be absent
    pub optional: bool,
}

impl Rule {
    /// Create a required rule for `prop` with no predicates.
    pub fn new(prop: impl Into<String>) -> Self {
        Self {
            prop: prop.into(),
            ty: None,
            biz: None,
            optional: false,
        }
    }

    /// Set the type predicate.
    pub fn of_type(mut self, predicate: impl Into<Predicate>) -> Self {
        self.ty = Some(predicate.into());
        self
    }

    /// Set the business predicate.
    pub fn biz(mut self, predicate: impl Into<Predicate>) -> Self {
        self.biz = Some(predicate.into());
        self
    }

    /// Mark the field as optional.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Set the optional flag explicitly.
    pub fn with_optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }
}
