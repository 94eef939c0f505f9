//! Reactive inputs and the recomputing [`FilteredView`].
//!
//! Everything here is single-threaded: handles are `Rc<RefCell<_>>` and
//! notification is synchronous. Setting a [`Signal`] runs every subscriber
//! before `set` returns, so a [`FilteredView`] reading that signal has
//! already recomputed by the time the caller continues.
//!
//! # Example
//!
//! ```
//! use sift::{FilterBy, FilteredView, Signal};
//! use serde_json::json;
//!
//! let query = Signal::new(String::new());
//! let view = FilteredView::new(
//!     vec![json!({"name": "Ann"}), json!({"name": "Bob"})],
//!     query.clone(),
//!     FilterBy::property("name"),
//!     false,
//! );
//! assert_eq!(view.len(), 2);
//!
//! query.set("bo".to_string());
//! assert_eq!(view.results(), vec![json!({"name": "Bob"})]);
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::trace;

use crate::filter::positions;
use crate::item::Filterable;
use crate::strategy::FilterBy;

type Callback = Rc<dyn Fn()>;

/// Subscriber list shared by a signal (or view) and its subscriptions.
#[derive(Default)]
struct Listeners {
    next_id: Cell<u64>,
    entries: RefCell<Vec<(u64, Callback)>>,
}

impl Listeners {
    fn add(self: &Rc<Self>, callback: Callback) -> Subscription {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.entries.borrow_mut().push((id, callback));
        Subscription {
            listeners: Rc::downgrade(self),
            id,
        }
    }

    fn remove(&self, id: u64) {
        self.entries.borrow_mut().retain(|(entry, _)| *entry != id);
    }

    fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Runs every callback registered at the time of the call. Callbacks may
    /// subscribe or unsubscribe while running.
    fn notify(&self) {
        let snapshot: Vec<Callback> = self
            .entries
            .borrow()
            .iter()
            .map(|(_, callback)| Rc::clone(callback))
            .collect();
        for callback in snapshot {
            callback();
        }
    }
}

/// Handle returned by `subscribe`. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    listeners: Weak<Listeners>,
    id: u64,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.remove(self.id);
        }
    }
}

/// A live cell.
///
/// Clones share the same cell. Every [`set`](Signal::set) or
/// [`update`](Signal::update) notifies subscribers, whether or not the value
/// actually changed. Do not set a signal from inside one of its own reads
/// ([`with`](Signal::with)); that is a `RefCell` double borrow.
pub struct Signal<T> {
    value: Rc<RefCell<T>>,
    listeners: Rc<Listeners>,
}

impl<T> Signal<T> {
    /// Creates a signal holding `value`.
    pub fn new(value: T) -> Self {
        Signal {
            value: Rc::new(RefCell::new(value)),
            listeners: Rc::new(Listeners::default()),
        }
    }

    /// Returns a clone of the current value.
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.value.borrow().clone()
    }

    /// Reads the current value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.value.borrow())
    }

    /// Replaces the value and notifies subscribers.
    pub fn set(&self, value: T) {
        *self.value.borrow_mut() = value;
        self.listeners.notify();
    }

    /// Mutates the value in place and notifies subscribers.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        f(&mut self.value.borrow_mut());
        self.listeners.notify();
    }

    /// Registers a callback run after every change.
    pub fn subscribe(&self, callback: impl Fn() + 'static) -> Subscription {
        self.listeners.add(Rc::new(callback))
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Signal {
            value: Rc::clone(&self.value),
            listeners: Rc::clone(&self.listeners),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("value", &self.value.borrow())
            .field("subscribers", &self.listeners.len())
            .finish()
    }
}

/// An input that is either a plain value or a live [`Signal`].
///
/// Both are read at the moment of use. Only signals trigger recomputation.
#[derive(Debug, Clone)]
pub enum Source<T> {
    /// A fixed value.
    Value(T),
    /// A live cell.
    Signal(Signal<T>),
}

impl<T> Source<T> {
    /// Returns a clone of the current value.
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        match self {
            Source::Value(value) => value.clone(),
            Source::Signal(signal) => signal.get(),
        }
    }

    /// Reads the current value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        match self {
            Source::Value(value) => f(value),
            Source::Signal(signal) => signal.with(f),
        }
    }

    /// The underlying signal, if this input is live.
    pub fn as_signal(&self) -> Option<&Signal<T>> {
        match self {
            Source::Value(_) => None,
            Source::Signal(signal) => Some(signal),
        }
    }
}

impl<T> From<T> for Source<T> {
    fn from(value: T) -> Self {
        Source::Value(value)
    }
}

impl<T> From<Signal<T>> for Source<T> {
    fn from(signal: Signal<T>) -> Self {
        Source::Signal(signal)
    }
}

impl<T> From<&Signal<T>> for Source<T> {
    fn from(signal: &Signal<T>) -> Self {
        Source::Signal(signal.clone())
    }
}

impl From<&str> for Source<String> {
    fn from(value: &str) -> Self {
        Source::Value(value.to_string())
    }
}

impl<T> From<&str> for Source<FilterBy<T>> {
    fn from(name: &str) -> Self {
        Source::Value(FilterBy::property(name))
    }
}

struct ViewInner<T> {
    items: RefCell<Vec<T>>,
    query: Source<String>,
    filter_by: Source<FilterBy<T>>,
    strict: Source<bool>,
    positions: RefCell<Vec<usize>>,
    generation: Cell<u64>,
    listeners: Rc<Listeners>,
}

impl<T: Filterable> ViewInner<T> {
    fn recompute(&self) {
        let kept = {
            let items = self.items.borrow();
            let strict = self.strict.get();
            self.query.with(|query| {
                self.filter_by
                    .with(|filter_by| positions(query, &items, filter_by, strict))
            })
        };
        *self.positions.borrow_mut() = kept;

        let generation = self.generation.get() + 1;
        self.generation.set(generation);
        trace!(generation, "filtered view recomputed");

        self.listeners.notify();
    }
}

/// The live result of filtering a collection.
///
/// Holds the items and three inputs (query, strategy, strictness). Every
/// input given as a [`Signal`] is subscribed to; each change recomputes the
/// whole result from scratch, synchronously, then notifies the view's own
/// subscribers. Dropping the view unsubscribes it from its signals.
pub struct FilteredView<T> {
    inner: Rc<ViewInner<T>>,
    _subscriptions: Vec<Subscription>,
}

impl<T: Filterable + 'static> FilteredView<T> {
    /// Creates a view and runs the first pass.
    pub fn new(
        items: Vec<T>,
        query: impl Into<Source<String>>,
        filter_by: impl Into<Source<FilterBy<T>>>,
        strict: impl Into<Source<bool>>,
    ) -> Self {
        let inner = Rc::new(ViewInner {
            items: RefCell::new(items),
            query: query.into(),
            filter_by: filter_by.into(),
            strict: strict.into(),
            positions: RefCell::new(Vec::new()),
            generation: Cell::new(0),
            listeners: Rc::new(Listeners::default()),
        });

        let mut subscriptions = Vec::new();
        if let Some(signal) = inner.query.as_signal() {
            subscriptions.push(signal.subscribe(recompute_on_change(&inner)));
        }
        if let Some(signal) = inner.filter_by.as_signal() {
            subscriptions.push(signal.subscribe(recompute_on_change(&inner)));
        }
        if let Some(signal) = inner.strict.as_signal() {
            subscriptions.push(signal.subscribe(recompute_on_change(&inner)));
        }
        trace!(live_inputs = subscriptions.len(), "filtered view subscribed");

        inner.recompute();

        FilteredView {
            inner,
            _subscriptions: subscriptions,
        }
    }

    /// Starts a builder with a loose, unfiltered configuration.
    pub fn builder(items: Vec<T>) -> FilteredViewBuilder<T> {
        FilteredViewBuilder {
            items,
            query: Source::Value(String::new()),
            filter_by: Source::Value(FilterBy::None),
            strict: Source::Value(false),
        }
    }

    /// Swaps the collection and recomputes.
    pub fn replace_items(&self, items: Vec<T>) {
        *self.inner.items.borrow_mut() = items;
        self.inner.recompute();
    }

    /// Recomputes with the current inputs, e.g. after a plain input's
    /// underlying data is known to be stale.
    pub fn refresh(&self) {
        self.inner.recompute();
    }
}

impl<T> FilteredView<T> {
    /// Clones the matching items, in original order.
    pub fn results(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.with_results(|results| results.iter().map(|item| (*item).clone()).collect())
    }

    /// Reads the matching items without cloning them.
    pub fn with_results<R>(&self, f: impl FnOnce(&[&T]) -> R) -> R {
        let items = self.inner.items.borrow();
        let positions = self.inner.positions.borrow();
        let results: Vec<&T> = positions.iter().map(|&i| &items[i]).collect();
        f(&results)
    }

    /// Indices of the matching items, ascending.
    pub fn positions(&self) -> Vec<usize> {
        self.inner.positions.borrow().clone()
    }

    /// Number of matching items.
    pub fn len(&self) -> usize {
        self.inner.positions.borrow().len()
    }

    /// Returns `true` if nothing matches.
    pub fn is_empty(&self) -> bool {
        self.inner.positions.borrow().is_empty()
    }

    /// Number of completed passes, including the initial one.
    pub fn generation(&self) -> u64 {
        self.inner.generation.get()
    }

    /// Registers a callback run after every recomputation.
    pub fn subscribe(&self, callback: impl Fn() + 'static) -> Subscription {
        self.inner.listeners.add(Rc::new(callback))
    }
}

impl<T> fmt::Debug for FilteredView<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilteredView")
            .field("items", &self.inner.items.borrow().len())
            .field("matching", &self.inner.positions.borrow().len())
            .field("generation", &self.inner.generation.get())
            .finish()
    }
}

fn recompute_on_change<T: Filterable + 'static>(inner: &Rc<ViewInner<T>>) -> impl Fn() + 'static {
    let weak = Rc::downgrade(inner);
    move || {
        if let Some(inner) = weak.upgrade() {
            inner.recompute();
        }
    }
}

/// Builder for [`FilteredView`].
pub struct FilteredViewBuilder<T> {
    items: Vec<T>,
    query: Source<String>,
    filter_by: Source<FilterBy<T>>,
    strict: Source<bool>,
}

impl<T: Filterable + 'static> FilteredViewBuilder<T> {
    /// Sets the query input.
    pub fn query(mut self, query: impl Into<Source<String>>) -> Self {
        self.query = query.into();
        self
    }

    /// Sets the strategy input.
    pub fn by(mut self, filter_by: impl Into<Source<FilterBy<T>>>) -> Self {
        self.filter_by = filter_by.into();
        self
    }

    /// Sets the strictness input.
    pub fn strict(mut self, strict: impl Into<Source<bool>>) -> Self {
        self.strict = strict.into();
        self
    }

    /// Builds the view and runs the first pass.
    pub fn build(self) -> FilteredView<T> {
        FilteredView::new(self.items, self.query, self.filter_by, self.strict)
    }
}
