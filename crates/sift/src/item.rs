//! Item shapes and the [`Filterable`] trait.
//!
//! The engine never inspects items directly. It asks each item for its
//! [`ItemKind`] once per pass and, for structured items, reads properties
//! through [`Filterable::property`] and [`Filterable::properties`].

use std::collections::{BTreeMap, HashMap};

use crate::value::{Number, Value};

/// Shape of an item, derived once per item per pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ItemKind<'a> {
    /// A string, number or boolean. The wrapped value is always one of
    /// [`Value::String`], [`Value::Number`] or [`Value::Bool`].
    Primitive(Value<'a>),
    /// A mapping from property names to values.
    Structured,
    /// A list. Lists never match at the top level.
    Sequence,
    /// A null item. Never matches.
    Null,
}

impl<'a> ItemKind<'a> {
    /// The [`Value`] an item of this shape presents when it is itself read
    /// as a property of an enclosing item.
    pub fn as_value(self) -> Value<'a> {
        match self {
            ItemKind::Primitive(value) => value,
            ItemKind::Structured | ItemKind::Sequence => Value::Nested,
            ItemKind::Null => Value::Null,
        }
    }
}

/// Iterator over the own properties of a structured item.
pub type Properties<'a> = Box<dyn Iterator<Item = (&'a str, Value<'a>)> + 'a>;

/// Trait for types that can be filtered.
///
/// Implementations exist for `serde_json::Value` (feature `json`), strings,
/// booleans, numeric primitives, string-keyed maps and references. Implement
/// it by hand for your own record types.
///
/// # Manual Implementation
///
/// ```
/// use sift::{Filterable, ItemKind, Number, Properties, Value};
///
/// struct Contact {
///     name: String,
///     age: u8,
/// }
///
/// impl Filterable for Contact {
///     fn item_kind(&self) -> ItemKind<'_> {
///         ItemKind::Structured
///     }
///
///     fn property(&self, name: &str) -> Value<'_> {
///         match name {
///             "name" => Value::String(&self.name),
///             "age" => Value::Number(Number::U64(self.age as u64)),
///             _ => Value::None,
///         }
///     }
///
///     fn properties(&self) -> Properties<'_> {
///         Box::new(
///             [("name", self.property("name")), ("age", self.property("age"))].into_iter(),
///         )
///     }
/// }
/// ```
pub trait Filterable {
    /// Returns the shape of this item.
    fn item_kind(&self) -> ItemKind<'_>;

    /// Reads a named property.
    ///
    /// Returns [`Value::None`] when the property does not exist or the item
    /// is not structured.
    fn property(&self, _name: &str) -> Value<'_> {
        Value::None
    }

    /// Iterates over every own property of a structured item.
    ///
    /// Non-structured items yield nothing.
    fn properties(&self) -> Properties<'_> {
        Box::new(std::iter::empty())
    }
}

impl<T: Filterable + ?Sized> Filterable for &T {
    fn item_kind(&self) -> ItemKind<'_> {
        (**self).item_kind()
    }

    fn property(&self, name: &str) -> Value<'_> {
        (**self).property(name)
    }

    fn properties(&self) -> Properties<'_> {
        (**self).properties()
    }
}

impl<T: Filterable + ?Sized> Filterable for Box<T> {
    fn item_kind(&self) -> ItemKind<'_> {
        (**self).item_kind()
    }

    fn property(&self, name: &str) -> Value<'_> {
        (**self).property(name)
    }

    fn properties(&self) -> Properties<'_> {
        (**self).properties()
    }
}

impl<T: Filterable> Filterable for Option<T> {
    fn item_kind(&self) -> ItemKind<'_> {
        match self {
            Some(inner) => inner.item_kind(),
            None => ItemKind::Null,
        }
    }

    fn property(&self, name: &str) -> Value<'_> {
        match self {
            Some(inner) => inner.property(name),
            None => Value::None,
        }
    }

    fn properties(&self) -> Properties<'_> {
        match self {
            Some(inner) => inner.properties(),
            None => Box::new(std::iter::empty()),
        }
    }
}

impl Filterable for str {
    fn item_kind(&self) -> ItemKind<'_> {
        ItemKind::Primitive(Value::String(self))
    }
}

impl Filterable for String {
    fn item_kind(&self) -> ItemKind<'_> {
        ItemKind::Primitive(Value::String(self))
    }
}

impl Filterable for bool {
    fn item_kind(&self) -> ItemKind<'_> {
        ItemKind::Primitive(Value::Bool(*self))
    }
}

macro_rules! filterable_number {
    ($($ty:ty),+) => {
        $(
            impl Filterable for $ty {
                fn item_kind(&self) -> ItemKind<'_> {
                    ItemKind::Primitive(Value::Number(Number::from(*self)))
                }
            }
        )+
    };
}

filterable_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl<T> Filterable for Vec<T> {
    fn item_kind(&self) -> ItemKind<'_> {
        ItemKind::Sequence
    }
}

impl<V: Filterable> Filterable for BTreeMap<String, V> {
    fn item_kind(&self) -> ItemKind<'_> {
        ItemKind::Structured
    }

    fn property(&self, name: &str) -> Value<'_> {
        self.get(name)
            .map_or(Value::None, |value| value.item_kind().as_value())
    }

    fn properties(&self) -> Properties<'_> {
        Box::new(
            self.iter()
                .map(|(name, value)| (name.as_str(), value.item_kind().as_value())),
        )
    }
}

impl<V: Filterable, S: std::hash::BuildHasher> Filterable for HashMap<String, V, S> {
    fn item_kind(&self) -> ItemKind<'_> {
        ItemKind::Structured
    }

    fn property(&self, name: &str) -> Value<'_> {
        self.get(name)
            .map_or(Value::None, |value| value.item_kind().as_value())
    }

    fn properties(&self) -> Properties<'_> {
        Box::new(
            self.iter()
                .map(|(name, value)| (name.as_str(), value.item_kind().as_value())),
        )
    }
}

#[cfg(feature = "json")]
mod json {
    use serde_json::Value as Json;

    use super::{Filterable, ItemKind, Properties};
    use crate::value::{Number, Value};

    fn json_number(n: &serde_json::Number) -> Number {
        if let Some(i) = n.as_i64() {
            Number::I64(i)
        } else if let Some(u) = n.as_u64() {
            Number::U64(u)
        } else {
            Number::F64(n.as_f64().unwrap_or(f64::NAN))
        }
    }

    impl Filterable for Json {
        fn item_kind(&self) -> ItemKind<'_> {
            match self {
                Json::String(s) => ItemKind::Primitive(Value::String(s)),
                Json::Number(n) => ItemKind::Primitive(Value::Number(json_number(n))),
                Json::Bool(b) => ItemKind::Primitive(Value::Bool(*b)),
                Json::Object(_) => ItemKind::Structured,
                Json::Array(_) => ItemKind::Sequence,
                Json::Null => ItemKind::Null,
            }
        }

        fn property(&self, name: &str) -> Value<'_> {
            match self {
                Json::Object(map) => map
                    .get(name)
                    .map_or(Value::None, |value| value.item_kind().as_value()),
                _ => Value::None,
            }
        }

        fn properties(&self) -> Properties<'_> {
            match self {
                Json::Object(map) => Box::new(
                    map.iter()
                        .map(|(name, value)| (name.as_str(), value.item_kind().as_value())),
                ),
                _ => Box::new(std::iter::empty()),
            }
        }
    }
}
