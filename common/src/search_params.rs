//! Parameters sent to the external search service's advanced search.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};


/// One facet value. Everything is text on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Text(String),
    List(Vec<String>),
    Nested(BTreeMap<String, String>),
}

impl ParamValue {
    pub fn text(value: impl ToString) -> Self {
        ParamValue::Text(value.to_string())
    }

    pub fn list<T: ToString>(values: impl IntoIterator<Item = T>) -> Self {
        ParamValue::List(values.into_iter().map(|v| v.to_string()).collect())
    }

    pub fn nested(key: impl Into<String>, value: impl Into<String>) -> Self {
        ParamValue::Nested(BTreeMap::from([(key.into(), value.into())]))
    }
}


/// Facet name to value mapping, assembled from disjoint sub-maps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct SearchParameters(BTreeMap<String, ParamValue>);

impl SearchParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(key: impl Into<String>, value: ParamValue) -> Self {
        Self(BTreeMap::from([(key.into(), value)]))
    }

    /// Merges another sub-map in. Sub-maps never share keys; a collision
    /// would silently drop an earlier facet.
    pub fn merge(mut self, other: SearchParameters) -> Self {
        for (key, value) in other.0 {
            debug_assert!(!self.0.contains_key(&key), "duplicate search parameter: {key}");
            self.0.insert(key, value);
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Flattens into query-string pairs using bracket notation:
    /// `topics[]=1`, `public_timestamp[before]=2013-01-01`.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for (key, value) in self.0.iter() {
            match value {
                ParamValue::Text(text) => pairs.push((key.clone(), text.clone())),
                ParamValue::List(items) => {
                    for item in items {
                        pairs.push((format!("{key}[]"), item.clone()));
                    }
                }
                ParamValue::Nested(map) => {
                    for (sub_key, sub_value) in map {
                        pairs.push((format!("{key}[{sub_key}]"), sub_value.clone()));
                    }
                }
            }
        }
        pairs
    }
}
