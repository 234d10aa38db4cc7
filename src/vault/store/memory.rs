//! In-memory store implementations for testing. No persistence.
//!
//! All three doubles share their state behind `Arc<Mutex<..>>` and
//! implement `Clone`, so a test can hand a store to the service and keep
//! a handle for direct inspection. The index store and cloud client can
//! inject write failures to exercise the non-fatal error paths.

use super::cloud::{CloudAsset, CloudClient};
use super::{BlobLocation, BlobStore, IndexStore, PutMeta, StoredBlob};
use crate::catalog::Catalog;
use crate::error::{Result, VaultError};
use crate::model::{sanitize_filename, ResourceKind, StorageRef};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Blob store double mimicking the local-disk variant: deterministic
/// relative paths, idempotent delete.
#[derive(Clone, Default)]
pub struct MemoryBlobStore {
    state: Arc<Mutex<BlobState>>,
}

#[derive(Default)]
struct BlobState {
    objects: HashMap<String, Vec<u8>>,
    fail_puts: bool,
    fail_deletes: bool,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `put` fail, to exercise the upload abort path.
    pub fn fail_puts(&self, fail: bool) {
        self.state.lock().unwrap().fail_puts = fail;
    }

    /// Make every subsequent `delete` fail, to exercise the
    /// warning-downgrade path.
    pub fn fail_deletes(&self, fail: bool) {
        self.state.lock().unwrap().fail_deletes = fail;
    }

    pub fn blob_count(&self) -> usize {
        self.state.lock().unwrap().objects.len()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.state.lock().unwrap().objects.contains_key(path)
    }
}

impl BlobStore for MemoryBlobStore {
    fn put(&mut self, data: &[u8], meta: &PutMeta<'_>) -> Result<StoredBlob> {
        let mut state = self.state.lock().unwrap();
        if state.fail_puts {
            return Err(VaultError::BlobWrite("injected put failure".to_string()));
        }
        let path = format!(
            "files/{}/{}/{}__{}",
            meta.scope,
            meta.uploaded_at.format("%Y-%m"),
            meta.id.simple(),
            sanitize_filename(meta.original_name)
        );
        state.objects.insert(path.clone(), data.to_vec());
        Ok(StoredBlob {
            storage: StorageRef::Local { path },
            size_bytes: data.len() as u64,
        })
    }

    fn delete(&mut self, storage: &StorageRef) -> Result<()> {
        match storage {
            StorageRef::Local { path } => {
                let mut state = self.state.lock().unwrap();
                if state.fail_deletes {
                    return Err(VaultError::BlobDelete("injected delete failure".to_string()));
                }
                state.objects.remove(path);
                Ok(())
            }
            StorageRef::Remote { .. } => Err(VaultError::Store(
                "remote storage ref passed to the memory blob store".to_string(),
            )),
        }
    }

    fn readable(&self, storage: &StorageRef) -> Result<BlobLocation> {
        match storage {
            StorageRef::Local { path } => Ok(BlobLocation::Path(PathBuf::from(path))),
            StorageRef::Remote { .. } => Err(VaultError::Store(
                "remote storage ref passed to the memory blob store".to_string(),
            )),
        }
    }
}

/// Index store double holding the serialized document in memory, with
/// save-failure injection.
#[derive(Clone, Default)]
pub struct MemoryIndexStore {
    state: Arc<Mutex<IndexState>>,
}

#[derive(Default)]
struct IndexState {
    document: Option<String>,
    fail_saves: bool,
}

impl MemoryIndexStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_saves(&self, fail: bool) {
        self.state.lock().unwrap().fail_saves = fail;
    }

    /// The currently persisted document, if any.
    pub fn document(&self) -> Option<String> {
        self.state.lock().unwrap().document.clone()
    }
}

impl IndexStore for MemoryIndexStore {
    fn load(&mut self) -> Result<Catalog> {
        let document = self.state.lock().unwrap().document.clone();
        let Some(document) = document else {
            let empty = Catalog::new();
            let _ = self.save(&empty);
            return Ok(empty);
        };
        Ok(serde_json::from_str(&document).unwrap_or_default())
    }

    fn save(&mut self, catalog: &Catalog) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.fail_saves {
            return Err(VaultError::IndexSave("injected save failure".to_string()));
        }
        state.document = Some(serde_json::to_string_pretty(catalog)?);
        Ok(())
    }
}

/// Provider double for the remote stores: assets keyed by public id,
/// kind detected from the filename extension, unique names via a counter.
#[derive(Clone, Default)]
pub struct MemoryCloudClient {
    state: Arc<Mutex<CloudState>>,
}

#[derive(Default)]
struct CloudState {
    assets: HashMap<String, (ResourceKind, Vec<u8>)>,
    seq: u64,
    fail_writes: bool,
}

impl MemoryCloudClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent upload/overwrite fail.
    pub fn fail_writes(&self, fail: bool) {
        self.state.lock().unwrap().fail_writes = fail;
    }

    pub fn asset_count(&self) -> usize {
        self.state.lock().unwrap().assets.len()
    }

    fn detect_kind(filename: &str) -> ResourceKind {
        let ext = filename.rsplit('.').next().unwrap_or_default().to_lowercase();
        match ext.as_str() {
            "png" | "jpg" | "jpeg" | "gif" | "webp" => ResourceKind::Image,
            "mp4" | "mov" | "webm" => ResourceKind::Video,
            _ => ResourceKind::Raw,
        }
    }
}

impl CloudClient for MemoryCloudClient {
    fn upload(&self, data: &[u8], filename: &str, folder: &str) -> Result<CloudAsset> {
        let mut state = self.state.lock().unwrap();
        if state.fail_writes {
            return Err(VaultError::Store("injected upload failure".to_string()));
        }
        state.seq += 1;
        let kind = Self::detect_kind(filename);
        let stem = filename.split('.').next().unwrap_or(filename);
        let public_id = format!("{}/{}_{}", folder, stem, state.seq);
        let secure_url = format!("https://cdn.test/{}", public_id);
        let format = filename.rsplit_once('.').map(|(_, ext)| ext.to_string());
        state.assets.insert(public_id.clone(), (kind, data.to_vec()));

        Ok(CloudAsset {
            public_id,
            secure_url,
            bytes: data.len() as u64,
            resource_type: kind,
            format,
        })
    }

    fn overwrite_raw(&self, data: &[u8], public_id: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.fail_writes {
            return Err(VaultError::Store("injected overwrite failure".to_string()));
        }
        state
            .assets
            .insert(public_id.to_string(), (ResourceKind::Raw, data.to_vec()));
        Ok(())
    }

    fn destroy(&self, public_id: &str, _kind: ResourceKind) -> Result<()> {
        // Absent asset mirrors the provider's "not found" result, which
        // counts as success.
        self.state.lock().unwrap().assets.remove(public_id);
        Ok(())
    }

    fn fetch(&self, public_id: &str, _kind: ResourceKind) -> Result<Vec<u8>> {
        self.state
            .lock()
            .unwrap()
            .assets
            .get(public_id)
            .map(|(_, data)| data.clone())
            .ok_or_else(|| VaultError::Store(format!("asset not found: {}", public_id)))
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use crate::model::{upload_timestamp, FileRecord, StorageRef};
    use uuid::Uuid;

    pub fn sample_record(name: &str, scope: &str, tags: &[&str]) -> FileRecord {
        FileRecord {
            id: Uuid::new_v4(),
            scope: scope.to_string(),
            original_name: name.to_string(),
            uploaded_at: upload_timestamp(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            size_bytes: 42,
            storage: StorageRef::Local {
                path: format!("files/{}/2024-01/{}", scope, name),
            },
        }
    }
}
