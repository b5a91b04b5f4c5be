//! Named collections of schema-less records addressed by generated ids.
//!
//! [`Database`] implements the collection bookkeeping on top of any
//! [`DocumentStore`]. Queries are full scans: the expression is tokenized once
//! and evaluated against every record of the collection.

mod error;
mod file;
mod memory;

pub use error::StoreError;
pub use file::{DEFAULT_INDENT, JsonFileStore};
pub use memory::MemoryStore;

use crate::query::{Query, QueryOptions};
use crate::value::{Record, Value};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use tracing::debug;
use uuid::Uuid;

/// Collection name to id-keyed records
pub type Collections = BTreeMap<String, BTreeMap<String, Record>>;

/// `(id, record)` pairs of one collection
pub type RecordIter<'a> = Box<dyn Iterator<Item = (&'a str, &'a Record)> + 'a>;

/// Storage backend for [`Database`]
pub trait DocumentStore {
    /// Names of all non-empty collections
    fn collections(&self) -> Vec<String>;

    /// Enumerate `(id, record)` pairs of a collection; empty when it does not exist
    fn records<'a>(&'a self, collection: &str) -> RecordIter<'a>;

    fn get(&self, collection: &str, id: &str) -> Option<&Record>;

    /// Store `record` under `id`, replacing any previous record
    fn put(&mut self, collection: &str, id: &str, record: Record);

    /// Remove a record. A collection left empty is dropped.
    fn remove(&mut self, collection: &str, id: &str) -> Option<Record>;

    /// Discard in-memory state and read it again from the backing medium
    fn reload(&mut self) -> Result<(), StoreError>;

    /// Persist the current state
    fn flush(&mut self) -> Result<(), StoreError>;
}

/// A record returned to callers, carrying its id
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Record,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: Record) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// The fields with `id` injected. A stored field named `id` takes precedence.
    pub fn to_record(&self) -> Record {
        let mut record = Record::from([("id".to_string(), Value::Str(self.id.clone()))]);
        record.extend(self.fields.iter().map(|(k, v)| (k.clone(), v.clone())));
        record
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_record().serialize(serializer)
    }
}

pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

/// Collection-level operations over a [`DocumentStore`]
#[derive(Debug)]
pub struct Database<S> {
    store: S,
    query_options: QueryOptions,
}

impl Database<JsonFileStore> {
    /// Open a JSON file backed database with the default indent
    pub fn open(path: impl Into<std::path::PathBuf>) -> Result<Self, StoreError> {
        Ok(Self::new(JsonFileStore::open(path)?))
    }
}

impl Database<MemoryStore> {
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }
}

impl<S: DocumentStore> Database<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            query_options: QueryOptions::default(),
        }
    }

    pub fn with_query_options(mut self, options: QueryOptions) -> Self {
        self.query_options = options;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Re-read the backing store
    pub fn reload(&mut self) -> Result<(), StoreError> {
        self.store.reload()
    }

    /// Add a record under a freshly generated id
    pub fn create(&mut self, collection: &str, record: Record) -> Result<String, StoreError> {
        let id = generate_id();
        self.store.put(collection, &id, record);
        self.store.flush()?;
        debug!(collection, id = %id, "created record");
        Ok(id)
    }

    pub fn create_many(
        &mut self,
        collection: &str,
        records: Vec<Record>,
    ) -> Result<Vec<String>, StoreError> {
        let ids: Vec<String> = records
            .into_iter()
            .map(|record| {
                let id = generate_id();
                self.store.put(collection, &id, record);
                id
            })
            .collect();
        self.store.flush()?;
        debug!(collection, count = ids.len(), "created records");
        Ok(ids)
    }

    /// Add a record under a caller-chosen id; fails if the id is taken
    pub fn insert(&mut self, collection: &str, id: &str, record: Record) -> Result<(), StoreError> {
        if self.store.get(collection, id).is_some() {
            return Err(StoreError::DuplicateId {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }
        self.store.put(collection, id, record);
        self.store.flush()?;
        debug!(collection, id, "inserted record");
        Ok(())
    }

    /// Insert records under caller-chosen ids.
    ///
    /// Returns one flag per record: `true` if inserted, `false` if the id was
    /// already taken and the record skipped.
    pub fn insert_many(
        &mut self,
        collection: &str,
        ids: &[String],
        records: Vec<Record>,
    ) -> Result<Vec<bool>, StoreError> {
        if ids.len() != records.len() {
            return Err(StoreError::LengthMismatch {
                ids: ids.len(),
                records: records.len(),
            });
        }

        let mut inserted = Vec::with_capacity(ids.len());
        for (id, record) in ids.iter().zip(records) {
            if self.store.get(collection, id).is_some() {
                inserted.push(false);
            } else {
                self.store.put(collection, id, record);
                inserted.push(true);
            }
        }
        self.store.flush()?;
        debug!(
            collection,
            inserted = inserted.iter().filter(|ok| **ok).count(),
            skipped = inserted.iter().filter(|ok| !**ok).count(),
            "inserted records"
        );
        Ok(inserted)
    }

    pub fn read(&self, collection: &str, id: &str) -> Option<Record> {
        self.store.get(collection, id).cloned()
    }

    pub fn read_all(&self, collection: &str) -> Vec<Document> {
        self.store
            .records(collection)
            .map(|(id, record)| Document::new(id, record.clone()))
            .collect()
    }

    /// Records of `collection` matching a query expression
    pub fn read_where(&self, collection: &str, expression: &str) -> Vec<Document> {
        let query = Query::with_options(expression, self.query_options);
        let documents: Vec<Document> = query
            .filter(self.store.records(collection))
            .into_iter()
            .map(|(id, record)| Document::new(id, record.clone()))
            .collect();
        debug!(
            collection,
            query = query.source(),
            tokens = query.tokens().len(),
            matched = documents.len(),
            "scanned collection"
        );
        documents
    }

    /// Merge `updates` into an existing record. Returns `false` if it does not exist.
    pub fn update(
        &mut self,
        collection: &str,
        id: &str,
        updates: Record,
    ) -> Result<bool, StoreError> {
        let Some(mut record) = self.store.get(collection, id).cloned() else {
            return Ok(false);
        };
        record.extend(updates);
        self.store.put(collection, id, record);
        self.store.flush()?;
        debug!(collection, id, "updated record");
        Ok(true)
    }

    /// Remove a record. Returns `false` if it does not exist.
    pub fn delete(&mut self, collection: &str, id: &str) -> Result<bool, StoreError> {
        if self.store.remove(collection, id).is_none() {
            return Ok(false);
        }
        self.store.flush()?;
        debug!(collection, id, "deleted record");
        Ok(true)
    }

    pub fn list_collections(&self) -> Vec<String> {
        self.store.collections()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(json: serde_json::Value) -> Record {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_document_injects_id() {
        let doc = Document::new("u1", record(json!({"name": "Alice"})));
        assert_eq!(
            serde_json::to_value(&doc).unwrap(),
            json!({"id": "u1", "name": "Alice"})
        );
    }

    #[test]
    fn test_stored_id_field_wins() {
        let doc = Document::new("u1", record(json!({"id": "custom"})));
        assert_eq!(doc.to_record()["id"], Value::from("custom"));
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let mut db = Database::in_memory();
        let a = db.create("users", Record::new()).unwrap();
        let b = db.create("users", Record::new()).unwrap();
        assert_ne!(a, b);
        assert_eq!(a.len(), 36);
    }
}
