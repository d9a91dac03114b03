use thiserror::Error;

/// Key-value persistence errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage I/O failed for '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("stored value for '{key}' is not valid JSON: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode value for '{0}'")]
    Encode(String, #[source] serde_json::Error),

    #[error("invalid storage key: {0}")]
    InvalidKey(String),
}
