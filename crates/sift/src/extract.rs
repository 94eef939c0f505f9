//! Value extraction and the type-admission policy.
//!
//! Both primitive items and properties of structured items go through the
//! same two steps: [`admit`] decides whether a value is comparable under the
//! active strictness and turns it into a string, then [`FoldedQuery::found_in`]
//! performs the case-folded substring test.

use std::borrow::Cow;

use crate::value::Value;

/// Applies the admission policy to a value.
///
/// - strict: only strings are admitted.
/// - loose: strings, numbers and booleans are admitted; numbers and
///   booleans are stringified through their `Display` form.
///
/// Everything else (null, nested, missing) yields `None`, which never
/// matches.
pub fn admit<'a>(value: &Value<'a>, strict: bool) -> Option<Cow<'a, str>> {
    match (value, strict) {
        (Value::String(s), _) => Some(Cow::Borrowed(*s)),
        (Value::Number(n), false) => Some(Cow::Owned(n.to_string())),
        (Value::Bool(b), false) => Some(Cow::Owned(b.to_string())),
        _ => None,
    }
}

/// Case folding applied to both sides of every comparison.
pub fn fold(s: &str) -> String {
    s.to_lowercase()
}

/// A query folded once, up front, for one pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldedQuery(String);

impl FoldedQuery {
    /// Folds the raw query.
    pub fn new(raw: &str) -> Self {
        FoldedQuery(fold(raw))
    }

    /// The folded query text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the folded candidate contains the folded query.
    pub fn found_in(&self, candidate: &str) -> bool {
        fold(candidate).contains(self.0.as_str())
    }

    /// Admits `value` under `strict` and tests it. "No value" is `false`.
    pub fn matches(&self, value: &Value<'_>, strict: bool) -> bool {
        admit(value, strict).is_some_and(|candidate| self.found_in(&candidate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Number;

    #[test]
    fn strict_admits_only_strings() {
        assert_eq!(admit(&Value::String("a"), true).as_deref(), Some("a"));
        assert_eq!(admit(&Value::Number(Number::I64(1)), true), None);
        assert_eq!(admit(&Value::Bool(true), true), None);
    }

    #[test]
    fn loose_stringifies_numbers_and_booleans() {
        assert_eq!(
            admit(&Value::Number(Number::I64(42)), false).as_deref(),
            Some("42")
        );
        assert_eq!(
            admit(&Value::Number(Number::F64(1.5)), false).as_deref(),
            Some("1.5")
        );
        assert_eq!(admit(&Value::Bool(false), false).as_deref(), Some("false"));
    }

    #[test]
    fn non_scalars_are_never_admitted() {
        for strict in [true, false] {
            assert_eq!(admit(&Value::Null, strict), None);
            assert_eq!(admit(&Value::Nested, strict), None);
            assert_eq!(admit(&Value::None, strict), None);
        }
    }

    #[test]
    fn folding_is_case_insensitive() {
        let query = FoldedQuery::new("AN");
        assert_eq!(query.as_str(), "an");
        assert!(query.found_in("Banana"));
        assert!(query.found_in("ANNA"));
        assert!(!query.found_in("Bob"));
    }

    #[test]
    fn folding_handles_non_ascii() {
        let query = FoldedQuery::new("ÉCOLE");
        assert!(query.found_in("Grande école"));
    }

    #[test]
    fn matches_combines_admission_and_substring() {
        let query = FoldedQuery::new("1");
        assert!(query.matches(&Value::Number(Number::I64(10)), false));
        assert!(!query.matches(&Value::Number(Number::I64(10)), true));
        assert!(query.matches(&Value::String("v1"), true));
        assert!(!query.matches(&Value::None, false));
    }
}
