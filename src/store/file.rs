use super::{Collections, DocumentStore, MemoryStore, RecordIter, StoreError};
use crate::value::Record;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const DEFAULT_INDENT: usize = 4;

/// A store persisted as one pretty-printed JSON document.
///
/// The whole tree is read on [`reload`](DocumentStore::reload) and rewritten
/// on every [`flush`](DocumentStore::flush). Writes are not atomic.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    indent: usize,
    tree: MemoryStore,
}

impl JsonFileStore {
    /// Open the database at `path`, creating an empty file if none exists
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        Self::open_with_indent(path, DEFAULT_INDENT)
    }

    pub fn open_with_indent(path: impl Into<PathBuf>, indent: usize) -> Result<Self, StoreError> {
        let mut store = Self {
            path: path.into(),
            indent,
            tree: MemoryStore::new(),
        };
        store.reload()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }

    fn encode(&self) -> Result<Vec<u8>, StoreError> {
        let indent = " ".repeat(self.indent);
        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(indent.as_bytes());
        let mut ser = Serializer::with_formatter(&mut buf, formatter);
        self.tree.collections_ref().serialize(&mut ser)?;
        Ok(buf)
    }
}

impl DocumentStore for JsonFileStore {
    fn collections(&self) -> Vec<String> {
        self.tree.collections()
    }

    fn records<'a>(&'a self, collection: &str) -> RecordIter<'a> {
        self.tree.records(collection)
    }

    fn get(&self, collection: &str, id: &str) -> Option<&Record> {
        self.tree.get(collection, id)
    }

    fn put(&mut self, collection: &str, id: &str, record: Record) {
        self.tree.put(collection, id, record);
    }

    fn remove(&mut self, collection: &str, id: &str) -> Option<Record> {
        self.tree.remove(collection, id)
    }

    fn reload(&mut self) -> Result<(), StoreError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "database file missing, starting empty");
            self.tree.replace(Collections::new());
            return self.flush();
        }

        let raw = fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        let collections = match serde_json::from_str::<Collections>(&raw) {
            Ok(collections) => collections,
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "database file is not a valid document tree, starting empty"
                );
                Collections::new()
            }
        };

        debug!(
            path = %self.path.display(),
            collections = collections.len(),
            "loaded database"
        );
        self.tree.replace(collections);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        let body = self.encode()?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        fs::write(&self.path, body).map_err(|e| self.io_error(e))?;

        debug!(path = %self.path.display(), "flushed database");
        Ok(())
    }
}
