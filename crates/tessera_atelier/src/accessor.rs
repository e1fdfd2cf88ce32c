//! Indifferent data access.
//!
//! Binding reads values through two small capabilities instead of concrete
//! types:
//!
//! - [`Datum`]: one record, answering "what is the value for this key?"
//! - [`DataSet`]: an ordered set of records, where a lone record counts as a
//!   set of one.
//!
//! Maps, JSON values and closure-backed records all implement [`Datum`], so
//! callers can bind whichever shape they already have.

use std::borrow::{Borrow, Cow};
use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;
use std::hash::{BuildHasher, Hash};
use std::rc::Rc;

use serde_json::{Map, Value};

use crate::errors::{BindingError, BindingResult};

/// A record that can be asked for the display value of a key
pub trait Datum {
    /// Value for `key`, already coerced to its display form
    fn lookup(&self, key: &str) -> Option<Cow<'_, str>>;
}

/// Resolve `key` on `datum`, failing with [`BindingError::KeyNotFound`].
///
/// The key is tried as given, then with `_` and `-` swapped, so
/// `full_name` also finds a `full-name` field and vice versa.
pub fn fetch<'d, D: Datum + ?Sized>(datum: &'d D, key: &str) -> BindingResult<Cow<'d, str>> {
    if let Some(value) = datum.lookup(key) {
        return Ok(value);
    }
    if let Some(alternate) = alternate_spelling(key) {
        if let Some(value) = datum.lookup(&alternate) {
            return Ok(value);
        }
    }
    Err(BindingError::KeyNotFound { key: key.into() })
}

fn alternate_spelling(key: &str) -> Option<String> {
    if key.contains('_') {
        Some(key.replace('_', "-"))
    } else if key.contains('-') {
        Some(key.replace('-', "_"))
    } else {
        None
    }
}

/// Display form of a JSON value: strings verbatim, `null` as empty text,
/// nested structures as compact JSON.
pub fn display_value(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s),
        Value::Null => Cow::Borrowed(""),
        Value::Bool(b) => Cow::Owned(b.to_string()),
        Value::Number(n) => Cow::Owned(n.to_string()),
        other => Cow::Owned(other.to_string()),
    }
}

impl Datum for Value {
    fn lookup(&self, key: &str) -> Option<Cow<'_, str>> {
        match self {
            Value::Object(map) => map.lookup(key),
            Value::Array(items) => key
                .parse::<usize>()
                .ok()
                .and_then(|i| items.get(i))
                .map(display_value),
            _ => None,
        }
    }
}

impl Datum for Map<String, Value> {
    fn lookup(&self, key: &str) -> Option<Cow<'_, str>> {
        self.get(key).map(display_value)
    }
}

impl<K, V, S> Datum for HashMap<K, V, S>
where
    K: Borrow<str> + Eq + Hash,
    V: Display,
    S: BuildHasher,
{
    fn lookup(&self, key: &str) -> Option<Cow<'_, str>> {
        self.get(key).map(|v| Cow::Owned(v.to_string()))
    }
}

impl<K, V> Datum for BTreeMap<K, V>
where
    K: Borrow<str> + Ord,
    V: Display,
{
    fn lookup(&self, key: &str) -> Option<Cow<'_, str>> {
        self.get(key).map(|v| Cow::Owned(v.to_string()))
    }
}

impl<T: Datum + ?Sized> Datum for &T {
    fn lookup(&self, key: &str) -> Option<Cow<'_, str>> {
        (**self).lookup(key)
    }
}

impl<T: Datum + ?Sized> Datum for Box<T> {
    fn lookup(&self, key: &str) -> Option<Cow<'_, str>> {
        (**self).lookup(key)
    }
}

impl<T: Datum + ?Sized> Datum for Rc<T> {
    fn lookup(&self, key: &str) -> Option<Cow<'_, str>> {
        (**self).lookup(key)
    }
}

/// Record backed by a lookup closure, for objects that expose fields
/// through a single "get by name" operation.
///
/// ```
/// use tessera_atelier::{fetch, Record};
///
/// let contact = Record::new(|key: &str| match key {
///     "email" => Some("b@x".to_string()),
///     _ => None,
/// });
/// assert_eq!(fetch(&contact, "email").unwrap(), "b@x");
/// assert!(fetch(&contact, "phone").is_err());
/// ```
pub struct Record<F>(F);

impl<F> Record<F>
where
    F: Fn(&str) -> Option<String>,
{
    pub fn new(lookup: F) -> Self {
        Self(lookup)
    }
}

impl<F> Datum for Record<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn lookup(&self, key: &str) -> Option<Cow<'_, str>> {
        (self.0)(key).map(Cow::Owned)
    }
}

/// An ordered set of data items
pub trait DataSet {
    type Item: ?Sized;

    fn len(&self) -> usize;

    fn get(&self, index: usize) -> Option<&Self::Item>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> DataSet for [T] {
    type Item = T;

    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    fn get(&self, index: usize) -> Option<&T> {
        <[T]>::get(self, index)
    }
}

impl<T> DataSet for Vec<T> {
    type Item = T;

    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }
}

impl<T, const N: usize> DataSet for [T; N] {
    type Item = T;

    fn len(&self) -> usize {
        N
    }

    fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }
}

/// A JSON array is a sequence; any other JSON value is a single record.
impl DataSet for Value {
    type Item = Value;

    fn len(&self) -> usize {
        match self {
            Value::Array(items) => items.len(),
            _ => 1,
        }
    }

    fn get(&self, index: usize) -> Option<&Value> {
        match self {
            Value::Array(items) => items.get(index),
            _ => (index == 0).then_some(self),
        }
    }
}

impl<D: DataSet + ?Sized> DataSet for &D {
    type Item = D::Item;

    fn len(&self) -> usize {
        (**self).len()
    }

    fn get(&self, index: usize) -> Option<&D::Item> {
        (**self).get(index)
    }
}

/// Wraps one record so it can be used where a data set is expected
#[derive(Debug, Clone, PartialEq)]
pub struct Single<T>(pub T);

impl<T> DataSet for Single<T> {
    type Item = T;

    fn len(&self) -> usize {
        1
    }

    fn get(&self, index: usize) -> Option<&T> {
        (index == 0).then_some(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tessera_carton::FxHashMap;

    struct Contact {
        full_name: &'static str,
        email: &'static str,
    }

    impl Datum for Contact {
        fn lookup(&self, key: &str) -> Option<Cow<'_, str>> {
            match key {
                "full_name" => Some(Cow::Borrowed(self.full_name)),
                "email" => Some(Cow::Borrowed(self.email)),
                _ => None,
            }
        }
    }

    #[test]
    fn test_fetch_from_json_object() {
        let data = json!({ "full_name": "A", "age": 42, "admin": true, "note": null });
        assert_eq!(fetch(&data, "full_name").unwrap(), "A");
        assert_eq!(fetch(&data, "age").unwrap(), "42");
        assert_eq!(fetch(&data, "admin").unwrap(), "true");
        assert_eq!(fetch(&data, "note").unwrap(), "");
    }

    #[test]
    fn test_fetch_nested_json_as_text() {
        let data = json!({ "tags": ["a", "b"] });
        assert_eq!(fetch(&data, "tags").unwrap(), r#"["a","b"]"#);
    }

    #[test]
    fn test_fetch_missing_key() {
        let data = json!({ "full_name": "A" });
        assert_eq!(
            fetch(&data, "email"),
            Err(BindingError::KeyNotFound {
                key: "email".into()
            })
        );
        assert!(fetch(&json!("scalar"), "email").is_err());
    }

    #[test]
    fn test_fetch_swaps_separators() {
        let data = json!({ "full-name": "Kebab", "last_name": "Snake" });
        assert_eq!(fetch(&data, "full_name").unwrap(), "Kebab");
        assert_eq!(fetch(&data, "last-name").unwrap(), "Snake");
    }

    #[test]
    fn test_fetch_from_maps() {
        let mut hash: HashMap<&str, &str> = HashMap::new();
        hash.insert("email", "b@x");
        assert_eq!(fetch(&hash, "email").unwrap(), "b@x");

        let mut fx: FxHashMap<String, u32> = FxHashMap::default();
        fx.insert("count".to_string(), 3);
        assert_eq!(fetch(&fx, "count").unwrap(), "3");

        let tree: BTreeMap<String, String> =
            [("title".to_string(), "Hi".to_string())].into_iter().collect();
        assert_eq!(fetch(&tree, "title").unwrap(), "Hi");
    }

    #[test]
    fn test_fetch_from_record_object() {
        let contact = Contact {
            full_name: "A",
            email: "b@x",
        };
        assert_eq!(fetch(&contact, "full_name").unwrap(), "A");
        assert_eq!(fetch(&Box::new(contact), "email").unwrap(), "b@x");
    }

    #[test]
    fn test_json_data_set() {
        let list = json!([{ "a": 1 }, { "a": 2 }]);
        assert_eq!(DataSet::len(&list), 2);
        assert_eq!(list.get(1), Some(&json!({ "a": 2 })));

        let one = json!({ "a": 1 });
        assert_eq!(DataSet::len(&one), 1);
        assert_eq!(DataSet::get(&one, 0), Some(&one));
        assert_eq!(DataSet::get(&one, 1), None);

        let empty = json!([]);
        assert!(DataSet::is_empty(&empty));
    }

    #[test]
    fn test_slice_and_single_data_sets() {
        let items = vec![1, 2, 3];
        assert_eq!(DataSet::len(&items), 3);
        assert_eq!(DataSet::get(items.as_slice(), 2), Some(&3));

        let single = Single("only");
        assert_eq!(single.len(), 1);
        assert_eq!(single.get(0), Some(&"only"));
        assert_eq!(single.get(1), None);
    }
}
