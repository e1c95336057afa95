use indexmap::IndexMap;

/// Finalized `key → output value` mapping, serialized in insertion order.
pub type Mapping = IndexMap<String, String>;

/// Write-once table of translation keys and their output values.
///
/// The first value stored for a key is kept for the lifetime of the table;
/// later lookups of the same key always return it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyTable {
    entries: Mapping,
}

impl KeyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the stored value for `key`, computing and storing it first if absent.
    ///
    /// `make_value` only runs for keys that are not yet present.
    pub fn get_or_insert_with<F>(&mut self, key: &str, make_value: F) -> &str
    where
        F: FnOnce() -> String,
    {
        self.entries
            .entry(key.to_string())
            .or_insert_with(make_value)
            .as_str()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_mapping(self) -> Mapping {
        self.entries
    }
}
