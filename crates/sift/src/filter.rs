//! Filter builder and executor.
//!
//! [`Filter`] bundles a query with its strategy and strictness and runs
//! passes over slices. The free function [`filter`] is the one-shot form.

use tracing::debug;

use crate::item::{Filterable, ItemKind};
use crate::strategy::{resolve, FilterBy, ItemStrategy, Matcher, Pass, PerItem};

/// A query, a strategy and a strictness flag, ready to run.
///
/// # Example
///
/// ```
/// use sift::{Filter, FilterBy};
/// use serde_json::json;
///
/// let people = vec![json!({"name": "Ann"}), json!({"name": "Bob"})];
///
/// let results = Filter::new("an").by(FilterBy::property("name")).filter(&people);
/// assert_eq!(results, vec![&json!({"name": "Ann"})]);
/// ```
#[derive(Debug, Clone)]
pub struct Filter<T> {
    query: String,
    filter_by: FilterBy<T>,
    strict: bool,
}

impl<T> Filter<T> {
    /// Creates a loose filter with no strategy.
    pub fn new(query: impl Into<String>) -> Self {
        Filter {
            query: query.into(),
            filter_by: FilterBy::None,
            strict: false,
        }
    }

    /// Sets the strategy.
    pub fn by(mut self, filter_by: impl Into<FilterBy<T>>) -> Self {
        self.filter_by = filter_by.into();
        self
    }

    /// Sets strictness.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// The raw query.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// The configured strategy.
    pub fn filter_by(&self) -> &FilterBy<T> {
        &self.filter_by
    }

    /// Whether strict admission is on.
    pub fn is_strict(&self) -> bool {
        self.strict
    }
}

impl<T: Filterable> Filter<T> {
    /// Tests if a single item matches.
    pub fn matches(&self, item: &T) -> bool {
        match resolve(&self.query, &self.filter_by, self.strict) {
            Pass::Everything => true,
            Pass::Predicate {
                raw_query,
                predicate,
            } => predicate(raw_query, item),
            Pass::PerItem(pass) => matches_item(&pass, item),
        }
    }

    /// Filters a slice, returning references to matching items in their
    /// original order.
    pub fn filter<'a>(&self, items: &'a [T]) -> Vec<&'a T> {
        self.positions(items).into_iter().map(|i| &items[i]).collect()
    }

    /// Filters and clones matching items.
    pub fn filter_cloned(&self, items: &[T]) -> Vec<T>
    where
        T: Clone,
    {
        self.filter(items).into_iter().cloned().collect()
    }

    /// Counts matching items.
    pub fn count(&self, items: &[T]) -> usize {
        self.positions(items).len()
    }

    /// Returns the indices of matching items, ascending.
    pub fn positions(&self, items: &[T]) -> Vec<usize> {
        positions(&self.query, items, &self.filter_by, self.strict)
    }
}

/// Filters `items` against `query`.
///
/// An empty query returns every item without consulting `filter_by` or
/// `strict`.
///
/// ```
/// use sift::{filter, FilterBy};
/// use serde_json::json;
///
/// let items = vec![json!("Apple"), json!("banana"), json!(42), json!(true)];
/// let results = filter("an", &items, &FilterBy::None, false);
/// assert_eq!(results, vec![&json!("banana")]);
/// ```
pub fn filter<'a, T: Filterable>(
    query: &str,
    items: &'a [T],
    filter_by: &FilterBy<T>,
    strict: bool,
) -> Vec<&'a T> {
    positions(query, items, filter_by, strict)
        .into_iter()
        .map(|i| &items[i])
        .collect()
}

/// Runs one full pass and returns the indices of matching items.
pub fn positions<T: Filterable>(
    query: &str,
    items: &[T],
    filter_by: &FilterBy<T>,
    strict: bool,
) -> Vec<usize> {
    let kept: Vec<usize> = match resolve(query, filter_by, strict) {
        Pass::Everything => (0..items.len()).collect(),
        Pass::Predicate {
            raw_query,
            predicate,
        } => indices_where(items, |item| predicate(raw_query, item)),
        Pass::PerItem(pass) => indices_where(items, |item| matches_item(&pass, item)),
    };

    debug!(
        query_len = query.len(),
        strategy = filter_by.kind(),
        strict,
        items = items.len(),
        kept = kept.len(),
        "filter pass"
    );

    kept
}

fn indices_where<T>(items: &[T], mut keep: impl FnMut(&T) -> bool) -> Vec<usize> {
    items
        .iter()
        .enumerate()
        .filter_map(|(i, item)| keep(item).then_some(i))
        .collect()
}

/// Built-in matching for one item. The item's shape decides first; the
/// strategy is only consulted for structured items.
fn matches_item<T: Filterable>(pass: &PerItem<'_, T>, item: &T) -> bool {
    match item.item_kind() {
        ItemKind::Primitive(value) => pass.query.matches(&value, pass.strict),
        ItemKind::Structured => matches_structured(pass, item),
        ItemKind::Sequence | ItemKind::Null => false,
    }
}

fn matches_structured<T: Filterable>(pass: &PerItem<'_, T>, item: &T) -> bool {
    let property_matches = |name: &str| pass.query.matches(&item.property(name), pass.strict);

    match &pass.strategy {
        ItemStrategy::AllProperties => item
            .properties()
            .any(|(_, value)| pass.query.matches(&value, pass.strict)),
        ItemStrategy::Property(name) => property_matches(*name),
        ItemStrategy::Matchers(list) => list.iter().any(|entry| match entry {
            Matcher::Property(name) => property_matches(name.as_str()),
            Matcher::Custom { name, matcher } => {
                matcher(&item.property(name), pass.raw_query, item)
            }
        }),
    }
}
