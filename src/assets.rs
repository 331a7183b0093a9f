//! Non-blocking asset loading
//!
//! Loads run on spawned tokio tasks and report back through a oneshot
//! channel. The frame loop polls an [`AssetHandle`] once per frame and never
//! waits on it.

use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::oneshot::{self, error::TryRecvError};
use tracing::debug;

/// Binary glTF magic, "glTF" little-endian
const GLB_MAGIC: &[u8; 4] = b"glTF";
/// Chunk type of the JSON chunk, "JSON" little-endian
const GLB_CHUNK_JSON: u32 = 0x4E4F_534A;
const GLB_HEADER_LEN: usize = 12;
const GLB_CHUNK_HEADER_LEN: usize = 8;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid model: {0}")]
    InvalidModel(String),
    #[error("Model JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unsupported asset type: {0}")]
    UnsupportedKind(String),
    #[error("Asset load cancelled")]
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Model,
    Texture,
    Font,
}

impl AssetKind {
    pub fn from_path(path: &Path) -> Result<Self, AssetError> {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "glb" => Ok(AssetKind::Model),
            "png" | "jpg" | "jpeg" => Ok(AssetKind::Texture),
            "json" | "ttf" | "otf" => Ok(AssetKind::Font),
            _ => Err(AssetError::UnsupportedKind(path.display().to_string())),
        }
    }
}

/// Summary of a validated binary glTF file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelInfo {
    pub version: u32,
    pub mesh_count: usize,
    pub node_count: usize,
    pub generator: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Asset {
    pub id: String,
    pub kind: AssetKind,
    pub bytes: Vec<u8>,
    /// Present for models
    pub model: Option<ModelInfo>,
}

impl Asset {
    pub fn decode(id: String, kind: AssetKind, bytes: Vec<u8>) -> Result<Self, AssetError> {
        let model = match kind {
            AssetKind::Model => Some(parse_glb(&bytes)?),
            AssetKind::Texture | AssetKind::Font => None,
        };
        Ok(Self {
            id,
            kind,
            bytes,
            model,
        })
    }
}

fn read_u32(bytes: &[u8], offset: usize) -> Option<u32> {
    let chunk = bytes.get(offset..offset + 4)?;
    Some(u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
}

/// Validate a binary glTF container and read its JSON chunk
pub fn parse_glb(bytes: &[u8]) -> Result<ModelInfo, AssetError> {
    if bytes.len() < GLB_HEADER_LEN || &bytes[0..4] != GLB_MAGIC {
        return Err(AssetError::InvalidModel("missing glTF magic".to_string()));
    }

    let version = read_u32(bytes, 4).unwrap_or(0);
    if version != 2 {
        return Err(AssetError::InvalidModel(format!(
            "unsupported glTF version {}",
            version
        )));
    }

    let declared_len = read_u32(bytes, 8).unwrap_or(0) as usize;
    if declared_len > bytes.len() {
        return Err(AssetError::InvalidModel(format!(
            "truncated file: header declares {} bytes, got {}",
            declared_len,
            bytes.len()
        )));
    }

    let chunk_len = read_u32(bytes, GLB_HEADER_LEN)
        .ok_or_else(|| AssetError::InvalidModel("missing JSON chunk".to_string()))?
        as usize;
    let chunk_type = read_u32(bytes, GLB_HEADER_LEN + 4)
        .ok_or_else(|| AssetError::InvalidModel("missing JSON chunk".to_string()))?;
    if chunk_type != GLB_CHUNK_JSON {
        return Err(AssetError::InvalidModel(
            "first chunk is not JSON".to_string(),
        ));
    }

    let start = GLB_HEADER_LEN + GLB_CHUNK_HEADER_LEN;
    let json = bytes
        .get(start..start + chunk_len)
        .ok_or_else(|| AssetError::InvalidModel("JSON chunk out of bounds".to_string()))?;
    let doc: Value = serde_json::from_slice(json)?;

    let count = |key: &str| doc.get(key).and_then(Value::as_array).map_or(0, Vec::len);

    Ok(ModelInfo {
        version,
        mesh_count: count("meshes"),
        node_count: count("nodes"),
        generator: doc
            .pointer("/asset/generator")
            .and_then(Value::as_str)
            .map(str::to_string),
    })
}

/// Write a glb container holding only a JSON chunk
pub fn encode_glb(json: &Value) -> Vec<u8> {
    let mut chunk = json.to_string().into_bytes();
    // Chunks are 4-byte aligned, JSON padded with spaces
    while chunk.len() % 4 != 0 {
        chunk.push(b' ');
    }

    let total = GLB_HEADER_LEN + GLB_CHUNK_HEADER_LEN + chunk.len();
    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(GLB_MAGIC);
    out.extend_from_slice(&2u32.to_le_bytes());
    out.extend_from_slice(&(total as u32).to_le_bytes());
    out.extend_from_slice(&(chunk.len() as u32).to_le_bytes());
    out.extend_from_slice(&GLB_CHUNK_JSON.to_le_bytes());
    out.extend_from_slice(&chunk);
    out
}

/// Result of polling an [`AssetHandle`]
#[derive(Debug)]
pub enum AssetStatus {
    Pending,
    Ready(Asset),
    Failed(AssetError),
}

/// Pending asset load
///
/// `Ready` and `Failed` are delivered once; poll again afterwards and the
/// handle reports `Failed(Cancelled)`.
#[derive(Debug)]
pub struct AssetHandle {
    id: String,
    rx: oneshot::Receiver<Result<Asset, AssetError>>,
}

impl AssetHandle {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn poll(&mut self) -> AssetStatus {
        match self.rx.try_recv() {
            Ok(Ok(asset)) => AssetStatus::Ready(asset),
            Ok(Err(e)) => AssetStatus::Failed(e),
            Err(TryRecvError::Empty) => AssetStatus::Pending,
            Err(TryRecvError::Closed) => AssetStatus::Failed(AssetError::Cancelled),
        }
    }
}

/// Loads assets relative to a root directory
#[derive(Debug, Clone)]
pub struct AssetLoader {
    root: PathBuf,
}

impl AssetLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Start loading `id` in the background. Must be called inside a tokio
    /// runtime.
    pub fn load(&self, id: &str) -> AssetHandle {
        let (tx, rx) = oneshot::channel();
        let path = self.root.join(id);
        let asset_id = id.to_string();

        debug!("Loading asset {} from {:?}", id, path);
        tokio::spawn(async move {
            let result = load_asset(asset_id, &path).await;
            // The receiver may already be gone if the scene was torn down
            let _ = tx.send(result);
        });

        AssetHandle {
            id: id.to_string(),
            rx,
        }
    }
}

async fn load_asset(id: String, path: &Path) -> Result<Asset, AssetError> {
    let kind = AssetKind::from_path(path)?;
    let bytes = tokio::fs::read(path).await?;
    Asset::decode(id, kind, bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    fn car_json() -> Value {
        json!({
            "asset": { "version": "2.0", "generator": "dune-drive test" },
            "meshes": [{ "primitives": [] }, { "primitives": [] }],
            "nodes": [{ "mesh": 0 }]
        })
    }

    async fn wait_for(handle: &mut AssetHandle) -> AssetStatus {
        for _ in 0..200 {
            match handle.poll() {
                AssetStatus::Pending => tokio::time::sleep(Duration::from_millis(5)).await,
                status => return status,
            }
        }
        panic!("asset {} never finished loading", handle.id());
    }

    #[test]
    fn test_parse_glb() {
        let info = parse_glb(&encode_glb(&car_json())).unwrap();
        assert_eq!(info.version, 2);
        assert_eq!(info.mesh_count, 2);
        assert_eq!(info.node_count, 1);
        assert_eq!(info.generator.as_deref(), Some("dune-drive test"));
    }

    #[test]
    fn test_encoded_glb_is_aligned() {
        let bytes = encode_glb(&json!({"asset": {"version": "2.0"}}));
        assert_eq!(bytes.len() % 4, 0);
        assert_eq!(read_u32(&bytes, 8), Some(bytes.len() as u32));
    }

    #[test]
    fn test_rejects_bad_magic() {
        let mut bytes = encode_glb(&car_json());
        bytes[0] = b'x';
        assert!(matches!(parse_glb(&bytes), Err(AssetError::InvalidModel(_))));
    }

    #[test]
    fn test_rejects_wrong_version() {
        let mut bytes = encode_glb(&car_json());
        bytes[4..8].copy_from_slice(&1u32.to_le_bytes());
        assert!(matches!(parse_glb(&bytes), Err(AssetError::InvalidModel(_))));
    }

    #[test]
    fn test_rejects_truncated_file() {
        let bytes = encode_glb(&car_json());
        let truncated = &bytes[..bytes.len() - 4];
        assert!(matches!(parse_glb(truncated), Err(AssetError::InvalidModel(_))));
    }

    #[test]
    fn test_kind_from_extension() {
        assert_eq!(AssetKind::from_path(Path::new("car.GLB")).unwrap(), AssetKind::Model);
        assert_eq!(AssetKind::from_path(Path::new("sand.jpg")).unwrap(), AssetKind::Texture);
        assert_eq!(
            AssetKind::from_path(Path::new("helvetiker.json")).unwrap(),
            AssetKind::Font
        );
        assert!(AssetKind::from_path(Path::new("car.fbx")).is_err());
    }

    #[tokio::test]
    async fn test_load_model_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("car.glb"), encode_glb(&car_json())).unwrap();

        let loader = AssetLoader::new(dir.path());
        let mut handle = loader.load("car.glb");

        match wait_for(&mut handle).await {
            AssetStatus::Ready(asset) => {
                assert_eq!(asset.id, "car.glb");
                assert_eq!(asset.kind, AssetKind::Model);
                assert_eq!(asset.model.unwrap().mesh_count, 2);
            }
            other => panic!("expected ready, got {:?}", other),
        }

        // Delivered once
        assert!(matches!(handle.poll(), AssetStatus::Failed(AssetError::Cancelled)));
    }

    #[tokio::test]
    async fn test_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let loader = AssetLoader::new(dir.path());
        let mut handle = loader.load("missing.glb");

        assert!(matches!(
            wait_for(&mut handle).await,
            AssetStatus::Failed(AssetError::Io(_))
        ));
    }

    #[tokio::test]
    async fn test_poll_does_not_block() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("sand.png"), [0u8; 16]).unwrap();
        let loader = AssetLoader::new(dir.path());
        let mut handle = loader.load("sand.png");

        // No await between spawn and poll: the task has not run yet
        assert!(matches!(handle.poll(), AssetStatus::Pending));
        assert!(matches!(wait_for(&mut handle).await, AssetStatus::Ready(_)));
    }
}
