use thiserror::Error;

/// Errors surfaced by the store layer
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to access database file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize database: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(
        "Record ids and records must have the same number of elements (got {ids} and {records})"
    )]
    LengthMismatch { ids: usize, records: usize },

    #[error("Record '{id}' already exists in collection '{collection}'")]
    DuplicateId { collection: String, id: String },
}
