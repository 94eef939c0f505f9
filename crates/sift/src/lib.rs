//! Sift - reactive, query-driven filtering for in-memory collections.
//!
//! Given a collection and a live search string, sift keeps the subset of
//! items that contain the query, case-insensitively. It supports:
//!
//! - Primitive items (strings, numbers, booleans) and structured items
//!   (anything that implements [`Filterable`], including `serde_json::Value`)
//! - Pluggable strategies: scan all properties, one property, an ordered
//!   list of properties and custom matchers, or a whole-query predicate
//! - A strict mode that only compares strings
//! - Reactive views that recompute whenever a [`Signal`] input changes
//!
//! # Quick Start
//!
//! ```rust
//! use sift::{filter, FilterBy};
//! use serde_json::json;
//!
//! let people = vec![
//!     json!({"name": "Ann", "city": "Oslo"}),
//!     json!({"name": "Bob", "city": "Bergen"}),
//! ];
//!
//! // Any property
//! assert_eq!(filter("BERG", &people, &FilterBy::None, false).len(), 1);
//!
//! // One property
//! let by_name = FilterBy::property("name");
//! assert_eq!(filter("an", &people, &by_name, false), vec![&people[0]]);
//!
//! // An empty query keeps everything
//! assert_eq!(filter("", &people, &by_name, true).len(), 2);
//! ```
//!
//! # Matching Semantics
//!
//! ```text
//! empty query           → every item, in order (nothing else is consulted)
//! FilterBy::Predicate   → predicate(raw query, item), for every item
//! primitive item        → folded(item) contains folded(query)
//! structured item       → None:       any property matches
//!                         Property:   that property matches
//!                         Matchers:   any entry matches (in order, first hit wins)
//! list / null item      → never
//! ```
//!
//! A value is only compared when admitted:
//!
//! | Value | loose | strict |
//! |-------|-------|--------|
//! | string | yes | yes |
//! | number | yes, via `Display` | no |
//! | bool | yes, `"true"` / `"false"` | no |
//! | null, nested, missing | no | no |
//!
//! Custom matchers and predicates get the raw query and decide on their own.
//! A panic inside one propagates to the caller.
//!
//! The empty-query short-circuit also skips [`FilterBy::Predicate`]: a
//! predicate can never reject items while the query is empty.

mod error;
mod extract;
mod filter;
mod item;
mod reactive;
mod strategy;
mod value;

// Re-export public API
pub use error::{Result, SiftError};
pub use extract::{admit, fold, FoldedQuery};
pub use filter::{filter, positions, Filter};
pub use item::{Filterable, ItemKind, Properties};
pub use reactive::{FilteredView, FilteredViewBuilder, Signal, Source, Subscription};
pub use strategy::{is_empty_query, FilterBy, MatchFn, Matcher, PredicateFn};
pub use value::{Number, Value};
