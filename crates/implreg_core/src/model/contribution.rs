//! Contribution payload model.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Borrow;
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// Name of the library (crate) an entry list is filed under.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LibraryKey(String);

impl LibraryKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for LibraryKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for LibraryKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for LibraryKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Display for LibraryKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One pre-rendered implementor description.
///
/// The generator emits each entry as a JSON array whose first element is the
/// rendered markup. The value is kept verbatim so later generator revisions
/// that append extra fields survive a decode/render cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImplementorEntry(Value);

impl ImplementorEntry {
    /// Builds an entry in the generator's `[markup]` shape.
    pub fn new(markup: impl Into<String>) -> Self {
        Self(Value::Array(vec![Value::String(markup.into())]))
    }

    /// Wraps a raw generator value without looking at it.
    pub fn from_raw(value: Value) -> Self {
        Self(value)
    }

    /// Returns the rendered markup, when the entry carries one.
    pub fn markup(&self) -> Option<&str> {
        match &self.0 {
            Value::String(text) => Some(text.as_str()),
            Value::Array(parts) => parts.first().and_then(Value::as_str),
            _ => None,
        }
    }

    pub fn as_raw(&self) -> &Value {
        &self.0
    }
}

/// Payload one fragment registers: library key to ordered entries.
///
/// Keys are kept sorted; order across keys carries no meaning. Inserting a
/// key twice keeps the later entry list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Contribution {
    libraries: BTreeMap<LibraryKey, Vec<ImplementorEntry>>,
}

impl Contribution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Files `entries` under `library`, returning the list it replaced.
    pub fn insert(
        &mut self,
        library: impl Into<LibraryKey>,
        entries: Vec<ImplementorEntry>,
    ) -> Option<Vec<ImplementorEntry>> {
        self.libraries.insert(library.into(), entries)
    }

    /// Builder form of [`Contribution::insert`].
    pub fn with(mut self, library: impl Into<LibraryKey>, entries: Vec<ImplementorEntry>) -> Self {
        self.insert(library, entries);
        self
    }

    pub fn get(&self, library: &str) -> Option<&[ImplementorEntry]> {
        self.libraries.get(library).map(Vec::as_slice)
    }

    pub fn contains_library(&self, library: &str) -> bool {
        self.libraries.contains_key(library)
    }

    /// Returns library keys in sorted order.
    pub fn libraries(&self) -> impl Iterator<Item = &LibraryKey> {
        self.libraries.keys()
    }

    pub fn len(&self) -> usize {
        self.libraries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.libraries.is_empty()
    }

    /// Total number of entries across all libraries.
    pub fn entry_count(&self) -> usize {
        self.libraries.values().map(Vec::len).sum()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, LibraryKey, Vec<ImplementorEntry>> {
        self.libraries.iter()
    }
}

impl<K: Into<LibraryKey>> FromIterator<(K, Vec<ImplementorEntry>)> for Contribution {
    fn from_iter<T: IntoIterator<Item = (K, Vec<ImplementorEntry>)>>(iter: T) -> Self {
        let mut contribution = Self::new();
        for (library, entries) in iter {
            contribution.insert(library, entries);
        }
        contribution
    }
}

impl IntoIterator for Contribution {
    type Item = (LibraryKey, Vec<ImplementorEntry>);
    type IntoIter = btree_map::IntoIter<LibraryKey, Vec<ImplementorEntry>>;

    fn into_iter(self) -> Self::IntoIter {
        self.libraries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Contribution {
    type Item = (&'a LibraryKey, &'a Vec<ImplementorEntry>);
    type IntoIter = btree_map::Iter<'a, LibraryKey, Vec<ImplementorEntry>>;

    fn into_iter(self) -> Self::IntoIter {
        self.libraries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::{Contribution, ImplementorEntry, LibraryKey};
    use serde_json::json;

    #[test]
    fn later_insert_for_same_library_wins() {
        let mut contribution = Contribution::new();
        contribution.insert("liba", vec![ImplementorEntry::new("e1")]);
        let replaced = contribution.insert("liba", vec![ImplementorEntry::new("e2")]);

        assert_eq!(replaced, Some(vec![ImplementorEntry::new("e1")]));
        assert_eq!(contribution.len(), 1);
        assert_eq!(
            contribution.get("liba"),
            Some(&[ImplementorEntry::new("e2")][..])
        );
    }

    #[test]
    fn entry_markup_reads_first_string_only() {
        let entry = ImplementorEntry::from_raw(json!(["impl Display for Foo", true, []]));
        assert_eq!(entry.markup(), Some("impl Display for Foo"));

        let bare = ImplementorEntry::from_raw(json!("impl Error for Bar"));
        assert_eq!(bare.markup(), Some("impl Error for Bar"));

        let opaque = ImplementorEntry::from_raw(json!({"unexpected": 1}));
        assert_eq!(opaque.markup(), None);
        assert_eq!(opaque.as_raw(), &json!({"unexpected": 1}));
        assert_eq!(ImplementorEntry::new("impl A").as_raw(), &json!(["impl A"]));
    }

    #[test]
    fn entry_order_within_library_is_preserved() {
        let contribution = Contribution::new().with(
            "liba",
            vec![
                ImplementorEntry::new("z"),
                ImplementorEntry::new("a"),
                ImplementorEntry::new("m"),
            ],
        );

        let markups: Vec<_> = contribution
            .get("liba")
            .expect("library present")
            .iter()
            .filter_map(ImplementorEntry::markup)
            .collect();
        assert_eq!(markups, vec!["z", "a", "m"]);
    }

    #[test]
    fn deserializing_duplicate_keys_keeps_last() {
        let contribution: Contribution =
            serde_json::from_str(r#"{"liba":[["e1"]],"liba":[["e2"]]}"#)
                .expect("payload should parse");
        assert_eq!(
            contribution.get("liba"),
            Some(&[ImplementorEntry::new("e2")][..])
        );
    }

    #[test]
    fn counts_entries_and_libraries() {
        let contribution: Contribution = [
            ("liba", vec![ImplementorEntry::new("e1"), ImplementorEntry::new("e2")]),
            ("libb", vec![]),
        ]
        .into_iter()
        .collect();

        assert_eq!(contribution.len(), 2);
        assert_eq!(contribution.entry_count(), 2);
        assert!(contribution.contains_library("libb"));
        let keys: Vec<&LibraryKey> = contribution.libraries().collect();
        assert_eq!(keys, vec![&LibraryKey::new("liba"), &LibraryKey::new("libb")]);
    }
}
