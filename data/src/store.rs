use std::collections::{HashMap, HashSet};

use crate::{Data, DataType, DataValue};

#[derive(Debug, Clone, PartialEq)]
struct Entry {
    value: DataValue,
    data_type: DataType,
}

/// [`Data`] backed by a hash map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataImpl {
    entries: HashMap<String, Entry>,
}

impl DataImpl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DataValue, DataType)> {
        self.entries
            .iter()
            .map(|(key, entry)| (key.as_str(), &entry.value, entry.data_type))
    }
}

impl Data for DataImpl {
    fn set_typed(&mut self, key: &str, value: Option<DataValue>, data_type: DataType) {
        match value {
            Some(value) => {
                self.entries
                    .insert(key.to_owned(), Entry { value, data_type });
            }
            None => {
                self.entries.remove(key);
            }
        }
    }

    fn remove(&mut self, key: &str) -> Option<DataValue> {
        self.entries.remove(key).map(|entry| entry.value)
    }

    fn get(&self, key: &str) -> Option<&DataValue> {
        self.entries.get(key).map(|entry| &entry.value)
    }

    fn data_type(&self, key: &str) -> Option<DataType> {
        self.entries.get(key).map(|entry| entry.data_type)
    }

    fn has_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    fn keys(&self) -> HashSet<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn copy(&self) -> Box<dyn Data> {
        Box::new(self.clone())
    }
}
