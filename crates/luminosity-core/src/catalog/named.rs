use crate::storage::models::NamedObjectRow;
use ahash::AHashMap;
use serde::Serialize;

/// An interned name from the catalog, such as a lens or camera model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedObject {
    pub id: i64,
    pub name: String,
}

/// A list of named objects which stays unique by name when merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NamedObjectSet(Vec<NamedObject>);

impl NamedObjectSet {
    /// Builds a set from catalog rows, keeping their order. A missing name
    /// becomes the empty string.
    pub fn from_rows(rows: Vec<NamedObjectRow>) -> Self {
        NamedObjectSet(
            rows.into_iter()
                .map(|row| NamedObject {
                    id: row.id,
                    name: row.name.unwrap_or_default(),
                })
                .collect(),
        )
    }

    /// Merges two sets by name. When both sides hold the same name the
    /// entry from `self` is kept, so the first-seen id wins. The result is
    /// sorted by name.
    pub fn merge(&self, other: &NamedObjectSet) -> NamedObjectSet {
        let mut by_name: AHashMap<&str, &NamedObject> = AHashMap::with_capacity(self.0.len());
        for object in self.0.iter().chain(&other.0) {
            by_name.entry(object.name.as_str()).or_insert(object);
        }

        let mut merged: Vec<NamedObject> = by_name.into_iter().map(|(_, o)| o.clone()).collect();
        merged.sort_by(|a, b| a.name.cmp(&b.name));
        NamedObjectSet(merged)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NamedObject> {
        self.0.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.0.iter().map(|o| o.name.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&NamedObject> {
        self.0.iter().find(|o| o.name == name)
    }
}

impl From<Vec<NamedObject>> for NamedObjectSet {
    fn from(objects: Vec<NamedObject>) -> Self {
        NamedObjectSet(objects)
    }
}

impl<'a> IntoIterator for &'a NamedObjectSet {
    type Item = &'a NamedObject;
    type IntoIter = std::slice::Iter<'a, NamedObject>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
