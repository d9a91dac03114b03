//! Image assets for the mockup layers and the collaborators that list them.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use url::Url;

use crate::errors::{AssetError, AssetResult};
use crate::registry::LayerKey;

/// An externally stored image backing one layer. The URL is never fetched here;
/// it is either a mask shape or a ready-made image for the renderer.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ImageAsset {
    pub layer_key: LayerKey,
    #[serde(alias = "url")]
    pub image_url: String,
    #[serde(default)]
    pub label: Option<String>,
}

impl ImageAsset {
    pub fn new(layer_key: LayerKey, image_url: impl Into<String>) -> Self {
        Self {
            layer_key,
            image_url: image_url.into(),
            label: None,
        }
    }
}

/// Lookup from layer key to image URL. The first asset listed for a key wins.
#[derive(Clone, Debug, Default)]
pub struct AssetIndex {
    by_key: HashMap<LayerKey, String>,
}

impl AssetIndex {
    pub fn new(images: &[ImageAsset]) -> Self {
        let mut by_key = HashMap::new();
        for image in images {
            if by_key.contains_key(&image.layer_key) {
                debug!("Ignoring duplicate asset for layer {}", image.layer_key);
                continue;
            }
            by_key.insert(image.layer_key, image.image_url.clone());
        }
        Self { by_key }
    }

    pub fn get(&self, key: LayerKey) -> Option<&str> {
        self.by_key.get(&key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

/// Outcome of a single-shot asynchronous call
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FetchState<T> {
    Pending,
    Ready(T),
    Failed(String),
}

impl<T> FetchState<T> {
    pub fn from_result<E: std::fmt::Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => FetchState::Ready(value),
            Err(e) => FetchState::Failed(e.to_string()),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, FetchState::Pending)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            FetchState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&str> {
        match self {
            FetchState::Failed(reason) => Some(reason),
            _ => None,
        }
    }
}

impl FetchState<Vec<ImageAsset>> {
    /// Index of whatever is available; pending and failed fetches yield an empty index
    pub fn index(&self) -> AssetIndex {
        match self {
            FetchState::Ready(images) => AssetIndex::new(images),
            _ => AssetIndex::default(),
        }
    }
}

/// Source of the layer image list
#[async_trait]
pub trait AssetSource: Send + Sync {
    async fn list_images(&self) -> AssetResult<Vec<ImageAsset>>;
}

/// Run a listing and fold the result into a [`FetchState`]
pub async fn fetch_assets(source: &dyn AssetSource) -> FetchState<Vec<ImageAsset>> {
    match source.list_images().await {
        Ok(images) => {
            info!("Loaded {} mockup images", images.len());
            FetchState::Ready(images)
        }
        Err(e) => {
            warn!("Failed to load mockup images: {}", e);
            FetchState::Failed(e.reason())
        }
    }
}

/// Asset list stored in a local CSV or JSON manifest
pub struct ManifestAssetSource {
    path: PathBuf,
}

#[derive(Deserialize)]
struct ManifestRow {
    layer_key: String,
    #[serde(alias = "url")]
    image_url: String,
    #[serde(default)]
    label: Option<String>,
}

impl ManifestAssetSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_rows(&self) -> AssetResult<Vec<ManifestRow>> {
        let extension = self
            .path
            .extension()
            .and_then(OsStr::to_str)
            .unwrap_or("");

        let manifest_error = |source| AssetError::Manifest {
            path: self.path.display().to_string(),
            source,
        };

        match extension {
            "csv" => {
                let mut reader = csv::ReaderBuilder::new()
                    .has_headers(true)
                    .trim(csv::Trim::All)
                    .from_path(&self.path)
                    .map_err(|e| manifest_error(std::io::Error::other(e)))?;
                let mut rows = Vec::new();
                for (idx, record) in reader.deserialize::<ManifestRow>().enumerate() {
                    let row = record.map_err(|e| AssetError::MalformedRow {
                        row: idx + 1,
                        message: e.to_string(),
                    })?;
                    rows.push(row);
                }
                Ok(rows)
            }
            "json" => {
                let content = std::fs::read_to_string(&self.path).map_err(manifest_error)?;
                serde_json::from_str(&content).map_err(|e| AssetError::MalformedRow {
                    row: e.line(),
                    message: e.to_string(),
                })
            }
            other => Err(AssetError::UnsupportedFormat(other.to_string())),
        }
    }
}

fn rows_to_assets(rows: Vec<ManifestRow>) -> AssetResult<Vec<ImageAsset>> {
    rows.into_iter()
        .enumerate()
        .map(|(idx, row)| {
            let layer_key = row
                .layer_key
                .trim()
                .parse::<LayerKey>()
                .map_err(|source| AssetError::UnknownLayer {
                    row: idx + 1,
                    source,
                })?;
            if row.image_url.trim().is_empty() {
                return Err(AssetError::MalformedRow {
                    row: idx + 1,
                    message: format!("empty image_url for {}", layer_key),
                });
            }
            Ok(ImageAsset {
                layer_key,
                image_url: row.image_url,
                label: row.label.filter(|l| !l.is_empty()),
            })
        })
        .collect()
}

#[async_trait]
impl AssetSource for ManifestAssetSource {
    async fn list_images(&self) -> AssetResult<Vec<ImageAsset>> {
        debug!("Reading asset manifest {}", self.path.display());
        rows_to_assets(self.read_rows()?)
    }
}

/// Asset list served by a REST table endpoint (`mockup_images`)
pub struct RestAssetSource {
    client: reqwest::Client,
    endpoint: Url,
    api_key: Option<String>,
}

pub const MOCKUP_IMAGES_TABLE: &str = "mockup_images";

impl RestAssetSource {
    pub fn new(base_url: &str, api_key: Option<String>) -> AssetResult<Self> {
        let base = if base_url.ends_with('/') {
            Url::parse(base_url)?
        } else {
            Url::parse(&format!("{}/", base_url))?
        };
        let mut endpoint = base.join(MOCKUP_IMAGES_TABLE)?;
        endpoint
            .query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("order", "layer_key");
        Ok(Self {
            client: reqwest::Client::new(),
            endpoint,
            api_key,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl AssetSource for RestAssetSource {
    async fn list_images(&self) -> AssetResult<Vec<ImageAsset>> {
        debug!("Fetching mockup images from {}", self.endpoint);
        let mut request = self.client.get(self.endpoint.clone());
        if let Some(key) = &self.api_key {
            request = request
                .header("apikey", key)
                .header("Authorization", format!("Bearer {}", key));
        }
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AssetError::Status {
                status: status.as_u16(),
                body,
            });
        }
        let rows: Vec<ManifestRow> = response.json().await?;
        rows_to_assets(rows)
    }
}
