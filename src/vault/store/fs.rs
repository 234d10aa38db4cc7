use super::{BlobLocation, BlobStore, IndexStore, PutMeta, StoredBlob};
use crate::catalog::Catalog;
use crate::error::{Result, VaultError};
use crate::model::{sanitize_filename, StorageRef};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const BLOB_DIR: &str = "files";
const INDEX_FILENAME: &str = "index.json";

/// Local-disk blob store rooted at the vault directory.
///
/// Blobs live at the deterministic relative path
/// `files/<scope>/<year>-<month>/<id>__<sanitized_name>`; the relative
/// path is what gets recorded in the catalog, so the vault root can move.
pub struct DiskBlobStore {
    root: PathBuf,
}

impl DiskBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn relative_path(meta: &PutMeta<'_>) -> String {
        format!(
            "{}/{}/{}/{}__{}",
            BLOB_DIR,
            meta.scope,
            meta.uploaded_at.format("%Y-%m"),
            meta.id.simple(),
            sanitize_filename(meta.original_name)
        )
    }
}

impl BlobStore for DiskBlobStore {
    fn put(&mut self, data: &[u8], meta: &PutMeta<'_>) -> Result<StoredBlob> {
        let rel = Self::relative_path(meta);
        let path = self.root.join(&rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| VaultError::BlobWrite(e.to_string()))?;
        }
        fs::write(&path, data).map_err(|e| VaultError::BlobWrite(e.to_string()))?;
        debug!(path = %path.display(), bytes = data.len(), "blob written");

        Ok(StoredBlob {
            storage: StorageRef::Local { path: rel },
            size_bytes: data.len() as u64,
        })
    }

    fn delete(&mut self, storage: &StorageRef) -> Result<()> {
        let rel = match storage {
            StorageRef::Local { path } => path,
            StorageRef::Remote { .. } => {
                return Err(VaultError::Store(
                    "remote storage ref passed to the local blob store".to_string(),
                ))
            }
        };
        match fs::remove_file(self.root.join(rel)) {
            Ok(()) => Ok(()),
            // Already gone counts as deleted.
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(VaultError::BlobDelete(e.to_string())),
        }
    }

    fn readable(&self, storage: &StorageRef) -> Result<BlobLocation> {
        match storage {
            StorageRef::Local { path } => Ok(BlobLocation::Path(self.root.join(path))),
            StorageRef::Remote { .. } => Err(VaultError::Store(
                "remote storage ref passed to the local blob store".to_string(),
            )),
        }
    }
}

/// Local index store: the catalog document at `<root>/index.json`.
///
/// Saves go through a temporary file followed by an atomic rename, so a
/// crash mid-write never leaves a half-written index behind.
pub struct FileIndexStore {
    path: PathBuf,
}

impl FileIndexStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            path: root.as_ref().join(INDEX_FILENAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Recovery path shared by the first-run and corrupt-index cases:
    /// persist an empty document so the store is reinitialized, but
    /// don't fail the load if that write fails too.
    fn bootstrap(&mut self) -> Catalog {
        let empty = Catalog::new();
        if let Err(e) = self.save(&empty) {
            warn!(error = %e, "could not bootstrap empty index");
        }
        empty
    }
}

impl IndexStore for FileIndexStore {
    fn load(&mut self) -> Result<Catalog> {
        if !self.path.exists() {
            return Ok(self.bootstrap());
        }

        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                let err = VaultError::IndexLoad(e.to_string());
                warn!(error = %err, path = %self.path.display(), "index unreadable, recovering empty");
                return Ok(self.bootstrap());
            }
        };
        match serde_json::from_str(&content) {
            Ok(catalog) => Ok(catalog),
            Err(e) => {
                let err = VaultError::IndexLoad(e.to_string());
                warn!(error = %err, path = %self.path.display(), "index unparsable, recovering empty");
                Ok(self.bootstrap())
            }
        }
    }

    fn save(&mut self, catalog: &Catalog) -> Result<()> {
        let content =
            serde_json::to_string_pretty(catalog).map_err(|e| VaultError::IndexSave(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| VaultError::IndexSave(e.to_string()))?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content).map_err(|e| VaultError::IndexSave(e.to_string()))?;
        fs::rename(&tmp, &self.path).map_err(|e| VaultError::IndexSave(e.to_string()))?;
        debug!(path = %self.path.display(), records = catalog.len(), "index saved");
        Ok(())
    }
}
