//! Filter strategies and their resolution.
//!
//! A [`FilterBy`] is the caller's configuration: which part of each item the
//! query is matched against. It is resolved once per pass into a [`Pass`],
//! which is what the evaluator actually runs.

use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use crate::error::{Result, SiftError};
use crate::extract::FoldedQuery;
use crate::value::Value;

/// Custom per-property matcher: `(property value, raw query, item) -> bool`.
pub type MatchFn<T> = Rc<dyn Fn(&Value<'_>, &str, &T) -> bool>;

/// Whole-query predicate: `(raw query, item) -> bool`.
pub type PredicateFn<T> = Rc<dyn Fn(&str, &T) -> bool>;

/// One entry of a [`FilterBy::Matchers`] list.
pub enum Matcher<T> {
    /// Case-folded substring test against a named property.
    Property(String),
    /// Free-form test of a named property.
    ///
    /// The matcher receives the property's value, the raw (unfolded) query
    /// and the whole item. Its answer is used as-is.
    Custom { name: String, matcher: MatchFn<T> },
}

impl<T> Matcher<T> {
    /// Creates a property matcher.
    pub fn property(name: impl Into<String>) -> Self {
        Matcher::Property(name.into())
    }

    /// Creates a custom matcher for property `name`.
    pub fn custom<F>(name: impl Into<String>, matcher: F) -> Self
    where
        F: Fn(&Value<'_>, &str, &T) -> bool + 'static,
    {
        Matcher::Custom {
            name: name.into(),
            matcher: Rc::new(matcher),
        }
    }

    /// The property this matcher reads.
    pub fn name(&self) -> &str {
        match self {
            Matcher::Property(name) | Matcher::Custom { name, .. } => name,
        }
    }
}

impl<T> Clone for Matcher<T> {
    fn clone(&self) -> Self {
        match self {
            Matcher::Property(name) => Matcher::Property(name.clone()),
            Matcher::Custom { name, matcher } => Matcher::Custom {
                name: name.clone(),
                matcher: Rc::clone(matcher),
            },
        }
    }
}

impl<T> fmt::Debug for Matcher<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::Property(name) => f.debug_tuple("Property").field(name).finish(),
            Matcher::Custom { name, .. } => f
                .debug_struct("Custom")
                .field("name", name)
                .finish_non_exhaustive(),
        }
    }
}

impl<T> From<&str> for Matcher<T> {
    fn from(name: &str) -> Self {
        Matcher::Property(name.to_string())
    }
}

impl<T> From<String> for Matcher<T> {
    fn from(name: String) -> Self {
        Matcher::Property(name)
    }
}

/// How the query is matched against items.
///
/// # Example
///
/// ```
/// use sift::{FilterBy, Matcher};
/// use serde_json::Value as Json;
///
/// let by_name: FilterBy<Json> = FilterBy::property("name");
///
/// let by_name_or_tag: FilterBy<Json> = FilterBy::matchers([
///     Matcher::property("name"),
///     Matcher::custom("tags", |_, query, item: &Json| {
///         item["tags"]
///             .as_array()
///             .is_some_and(|tags| tags.iter().any(|t| t == query))
///     }),
/// ]);
///
/// let parsed: FilterBy<Json> = "name,email".parse().unwrap();
/// assert_eq!(parsed.kind(), "matchers");
/// ```
pub enum FilterBy<T> {
    /// Scan every property of structured items.
    None,
    /// Match a single named property.
    Property(String),
    /// Match if any entry matches, in order, stopping at the first success.
    Matchers(Vec<Matcher<T>>),
    /// Replace all built-in matching with a whole-query predicate.
    ///
    /// The predicate receives the raw query and every item regardless of
    /// shape; strictness is ignored. It is *not* consulted for an empty
    /// query, which keeps every item.
    Predicate(PredicateFn<T>),
}

impl<T> FilterBy<T> {
    /// Creates a single-property strategy.
    pub fn property(name: impl Into<String>) -> Self {
        FilterBy::Property(name.into())
    }

    /// Creates a matcher-list strategy.
    pub fn matchers<I, M>(matchers: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<Matcher<T>>,
    {
        FilterBy::Matchers(matchers.into_iter().map(Into::into).collect())
    }

    /// Creates a whole-query predicate strategy.
    pub fn predicate<F>(predicate: F) -> Self
    where
        F: Fn(&str, &T) -> bool + 'static,
    {
        FilterBy::Predicate(Rc::new(predicate))
    }

    /// Builds a strategy from a list of property names.
    ///
    /// No names gives [`FilterBy::None`], one gives [`FilterBy::Property`],
    /// several give [`FilterBy::Matchers`]. Names are trimmed but otherwise
    /// kept whole, so a name may contain a comma. Empty and repeated names
    /// are rejected.
    pub fn from_names<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut list = Vec::new();
        for (position, raw) in names.into_iter().enumerate() {
            let name = raw.as_ref().trim();
            if name.is_empty() {
                return Err(SiftError::EmptyPropertyName { position });
            }
            if !seen.insert(name.to_string()) {
                return Err(SiftError::DuplicateProperty {
                    name: name.to_string(),
                });
            }
            list.push(name.to_string());
        }

        Ok(match list.len() {
            0 => FilterBy::None,
            1 => FilterBy::Property(list.remove(0)),
            _ => FilterBy::Matchers(list.into_iter().map(Matcher::Property).collect()),
        })
    }

    /// Property names this strategy reads, in order. Predicates read none.
    pub fn property_names(&self) -> Vec<&str> {
        match self {
            FilterBy::None | FilterBy::Predicate(_) => Vec::new(),
            FilterBy::Property(name) => vec![name.as_str()],
            FilterBy::Matchers(list) => list.iter().map(Matcher::name).collect(),
        }
    }

    /// Short name of the variant, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            FilterBy::None => "none",
            FilterBy::Property(_) => "property",
            FilterBy::Matchers(_) => "matchers",
            FilterBy::Predicate(_) => "predicate",
        }
    }
}

impl<T> Default for FilterBy<T> {
    fn default() -> Self {
        FilterBy::None
    }
}

impl<T> Clone for FilterBy<T> {
    fn clone(&self) -> Self {
        match self {
            FilterBy::None => FilterBy::None,
            FilterBy::Property(name) => FilterBy::Property(name.clone()),
            FilterBy::Matchers(list) => FilterBy::Matchers(list.clone()),
            FilterBy::Predicate(predicate) => FilterBy::Predicate(Rc::clone(predicate)),
        }
    }
}

impl<T> fmt::Debug for FilterBy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterBy::None => f.write_str("None"),
            FilterBy::Property(name) => f.debug_tuple("Property").field(name).finish(),
            FilterBy::Matchers(list) => f.debug_tuple("Matchers").field(list).finish(),
            FilterBy::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

impl<T> From<&str> for FilterBy<T> {
    fn from(name: &str) -> Self {
        FilterBy::Property(name.to_string())
    }
}

impl<T> From<String> for FilterBy<T> {
    fn from(name: String) -> Self {
        FilterBy::Property(name)
    }
}

impl<T> From<Vec<Matcher<T>>> for FilterBy<T> {
    fn from(list: Vec<Matcher<T>>) -> Self {
        FilterBy::Matchers(list)
    }
}

/// Parses a comma-separated property list.
///
/// - `""` (or only whitespace) → [`FilterBy::None`]
/// - `"name"` → [`FilterBy::Property`]
/// - `"name, email"` → [`FilterBy::Matchers`] of property matchers
///
/// Names are trimmed. Empty and repeated names are rejected.
impl<T> FromStr for FilterBy<T> {
    type Err = SiftError;

    fn from_str(spec: &str) -> Result<Self> {
        if spec.trim().is_empty() {
            return Ok(FilterBy::None);
        }
        FilterBy::from_names(spec.split(','))
    }
}

/// A strategy resolved for one pass.
pub enum Pass<'f, T> {
    /// The query is empty: every item is kept.
    Everything,
    /// A whole-query predicate decides every item.
    Predicate {
        raw_query: &'f str,
        predicate: &'f PredicateFn<T>,
    },
    /// Built-in, shape-dispatched matching.
    PerItem(PerItem<'f, T>),
}

/// Per-item strategies. There is no predicate here: it was taken out when
/// the pass was resolved.
pub enum ItemStrategy<'f, T> {
    AllProperties,
    Property(&'f str),
    Matchers(&'f [Matcher<T>]),
}

/// Everything the evaluator needs for the built-in matching path.
pub struct PerItem<'f, T> {
    pub raw_query: &'f str,
    pub query: FoldedQuery,
    pub strict: bool,
    pub strategy: ItemStrategy<'f, T>,
}

/// Resolves a strategy for one pass.
///
/// The empty-query check happens first, so an empty query keeps everything
/// even when a predicate is configured.
pub fn resolve<'f, T>(query: &'f str, filter_by: &'f FilterBy<T>, strict: bool) -> Pass<'f, T> {
    if is_empty_query(query) {
        return Pass::Everything;
    }

    let strategy = match filter_by {
        FilterBy::Predicate(predicate) => {
            return Pass::Predicate {
                raw_query: query,
                predicate,
            }
        }
        FilterBy::None => ItemStrategy::AllProperties,
        FilterBy::Property(name) => ItemStrategy::Property(name),
        FilterBy::Matchers(list) => ItemStrategy::Matchers(list),
    };

    Pass::PerItem(PerItem {
        raw_query: query,
        query: FoldedQuery::new(query),
        strict,
        strategy,
    })
}

/// Returns `true` if `query` means "no filtering".
///
/// Only the empty string qualifies; whitespace is a searchable substring.
pub fn is_empty_query(query: &str) -> bool {
    query.is_empty()
}
