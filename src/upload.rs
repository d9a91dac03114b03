//! Upload collaborator: stores a customer-supplied file and hands back its URL.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::errors::{AssetError, AssetResult};
use crate::registry::PrintAreaKey;

const ADDITIONAL_NOTE: &str = "additional_note";
const DEFAULT_EXTENSION: &str = "png";

/// Where an uploaded file belongs in the session
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UploadTarget {
    PrintArea(PrintAreaKey),
    AdditionalNote,
}

impl UploadTarget {
    /// Destination hint passed to the collaborator, used as the storage folder
    pub fn destination(&self) -> &'static str {
        match self {
            UploadTarget::PrintArea(key) => key.as_str(),
            UploadTarget::AdditionalNote => ADDITIONAL_NOTE,
        }
    }
}

impl Display for UploadTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.destination())
    }
}

impl std::str::FromStr for UploadTarget {
    type Err = crate::errors::MockupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == ADDITIONAL_NOTE {
            return Ok(UploadTarget::AdditionalNote);
        }
        s.parse().map(UploadTarget::PrintArea)
    }
}

#[async_trait]
pub trait UploadClient: Send + Sync {
    /// Store `bytes` and return the public URL of the stored object
    async fn upload(&self, bytes: &[u8], file_name: &str, target: UploadTarget)
        -> AssetResult<String>;
}

/// Extension of the uploaded file name, lowercased; `png` when there is none
pub fn file_extension(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty())
        .map(str::to_ascii_lowercase)
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
}

/// Writes uploads below a local directory served under `public_base_url`
pub struct LocalUploadStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalUploadStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn object_name(file_name: &str) -> String {
        format!(
            "{}.{}",
            chrono::Utc::now().timestamp_millis(),
            file_extension(file_name)
        )
    }
}

#[async_trait]
impl UploadClient for LocalUploadStore {
    async fn upload(
        &self,
        bytes: &[u8],
        file_name: &str,
        target: UploadTarget,
    ) -> AssetResult<String> {
        if bytes.is_empty() {
            return Err(AssetError::UploadRejected(format!(
                "{} is empty",
                file_name
            )));
        }

        let object = Self::object_name(file_name);
        let folder = self.root.join(target.destination());
        tokio::fs::create_dir_all(&folder)
            .await
            .map_err(AssetError::Upload)?;
        let path = folder.join(&object);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(AssetError::Upload)?;
        debug!("Stored {} bytes at {}", bytes.len(), path.display());

        let url = format!(
            "{}/{}/{}",
            self.public_base_url,
            target.destination(),
            object
        );
        info!("Uploaded {} for {}", file_name, target);
        Ok(url)
    }
}
