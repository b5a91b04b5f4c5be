use super::{Collections, DocumentStore, RecordIter, StoreError};
use crate::value::Record;

/// A store that keeps every collection in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    collections: Collections,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collections_ref(&self) -> &Collections {
        &self.collections
    }

    pub(crate) fn replace(&mut self, collections: Collections) {
        self.collections = collections;
    }
}

impl DocumentStore for MemoryStore {
    fn collections(&self) -> Vec<String> {
        self.collections.keys().cloned().collect()
    }

    fn records<'a>(&'a self, collection: &str) -> RecordIter<'a> {
        match self.collections.get(collection) {
            Some(records) => Box::new(records.iter().map(|(id, record)| (id.as_str(), record))),
            None => Box::new(std::iter::empty()),
        }
    }

    fn get(&self, collection: &str, id: &str) -> Option<&Record> {
        self.collections.get(collection)?.get(id)
    }

    fn put(&mut self, collection: &str, id: &str, record: Record) {
        self.collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), record);
    }

    fn remove(&mut self, collection: &str, id: &str) -> Option<Record> {
        let records = self.collections.get_mut(collection)?;
        let removed = records.remove(id);
        if records.is_empty() {
            self.collections.remove(collection);
        }
        removed
    }

    fn reload(&mut self) -> Result<(), StoreError> {
        Ok(())
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn record(name: &str) -> Record {
        Record::from([("name".to_string(), Value::from(name))])
    }

    #[test]
    fn test_put_get_and_enumerate() {
        let mut store = MemoryStore::new();
        store.put("users", "b", record("Bob"));
        store.put("users", "a", record("Alice"));

        assert_eq!(store.collections(), vec!["users".to_string()]);
        assert_eq!(store.get("users", "a"), Some(&record("Alice")));
        let ids: Vec<&str> = store.records("users").map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(store.records("missing").count(), 0);
    }

    #[test]
    fn test_removing_last_record_drops_collection() {
        let mut store = MemoryStore::new();
        store.put("users", "a", record("Alice"));

        assert_eq!(store.remove("users", "a"), Some(record("Alice")));
        assert!(store.collections().is_empty());
        assert_eq!(store.remove("users", "a"), None);
    }
}
