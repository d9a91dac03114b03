use thiserror::Error;

use super::MockupError;

/// Asset listing and upload failures
#[derive(Error, Debug)]
pub enum AssetError {
    #[error("unsupported manifest format: {0}")]
    UnsupportedFormat(String),

    #[error("failed to read asset manifest {path}: {source}")]
    Manifest {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed asset row {row}: {message}")]
    MalformedRow { row: usize, message: String },

    #[error("asset row {row} references an unknown layer: {source}")]
    UnknownLayer {
        row: usize,
        #[source]
        source: MockupError,
    },

    #[error("asset request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("asset endpoint returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid asset endpoint: {0}")]
    Endpoint(#[from] url::ParseError),

    #[error("upload rejected: {0}")]
    UploadRejected(String),

    #[error("upload failed: {0}")]
    Upload(#[source] std::io::Error),
}

impl AssetError {
    /// Short reason suitable for a failed fetch/upload outcome
    pub fn reason(&self) -> String {
        self.to_string()
    }
}
