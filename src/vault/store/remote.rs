use super::cloud::CloudClient;
use super::{BlobLocation, BlobStore, IndexStore, PutMeta, StoredBlob};
use crate::catalog::Catalog;
use crate::error::{Result, VaultError};
use crate::model::{sanitize_filename, ResourceKind, StorageRef};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

const BLOB_FOLDER: &str = "vault";

/// Default public id of the remote index asset.
pub const DEFAULT_INDEX_PUBLIC_ID: &str = "filevault/index";

/// Blob store over the remote provider. Blobs are uploaded under
/// `vault/<scope>/<year>-<month>/` with provider-assigned unique names;
/// the catalog keeps the provider's public id, the direct URL, and the
/// detected resource kind.
pub struct RemoteBlobStore<C: CloudClient> {
    client: C,
}

impl<C: CloudClient> RemoteBlobStore<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }
}

impl<C: CloudClient> BlobStore for RemoteBlobStore<C> {
    fn put(&mut self, data: &[u8], meta: &PutMeta<'_>) -> Result<StoredBlob> {
        let folder = format!(
            "{}/{}/{}",
            BLOB_FOLDER,
            meta.scope,
            meta.uploaded_at.format("%Y-%m")
        );
        let asset = self
            .client
            .upload(data, &sanitize_filename(meta.original_name), &folder)
            .map_err(|e| VaultError::BlobWrite(e.to_string()))?;

        // The provider reports the stored byte count; fall back to the
        // input length when it omits one.
        let size_bytes = if asset.bytes > 0 {
            asset.bytes
        } else {
            data.len() as u64
        };

        Ok(StoredBlob {
            storage: StorageRef::Remote {
                public_id: asset.public_id,
                url: asset.secure_url,
                resource_type: asset.resource_type,
                format: asset.format,
            },
            size_bytes,
        })
    }

    fn delete(&mut self, storage: &StorageRef) -> Result<()> {
        match storage {
            StorageRef::Remote {
                public_id,
                resource_type,
                ..
            } => self.client.destroy(public_id, *resource_type).map_err(|e| match e {
                VaultError::BlobDelete(_) => e,
                other => VaultError::BlobDelete(other.to_string()),
            }),
            StorageRef::Local { .. } => Err(VaultError::Store(
                "local storage ref passed to the remote blob store".to_string(),
            )),
        }
    }

    fn readable(&self, storage: &StorageRef) -> Result<BlobLocation> {
        match storage {
            StorageRef::Remote { url, .. } => Ok(BlobLocation::Url(url.clone())),
            StorageRef::Local { .. } => Err(VaultError::Store(
                "local storage ref passed to the remote blob store".to_string(),
            )),
        }
    }
}

/// Index store keeping the catalog document as a raw asset at a fixed
/// public id, with an advisory local cache mirror.
///
/// The remote asset is authoritative; the cache is written after every
/// successful save for inspection and debugging but never read back as a
/// source of truth.
pub struct RemoteIndexStore<C: CloudClient> {
    client: C,
    public_id: String,
    cache_path: Option<PathBuf>,
}

impl<C: CloudClient> RemoteIndexStore<C> {
    pub fn new(client: C, public_id: impl Into<String>, cache_path: Option<PathBuf>) -> Self {
        Self {
            client,
            public_id: public_id.into(),
            cache_path,
        }
    }

    fn bootstrap(&mut self) -> Catalog {
        let empty = Catalog::new();
        if let Err(e) = self.save(&empty) {
            warn!(error = %e, "could not bootstrap remote index, continuing empty");
        }
        empty
    }

    fn mirror_to_cache(&self, content: &str) {
        let Some(path) = &self.cache_path else {
            return;
        };
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                warn!(error = %e, "could not create index cache directory");
                return;
            }
        }
        if let Err(e) = fs::write(path, content) {
            warn!(error = %e, path = %path.display(), "could not mirror index to cache");
        }
    }
}

impl<C: CloudClient> IndexStore for RemoteIndexStore<C> {
    fn load(&mut self) -> Result<Catalog> {
        let bytes = match self.client.fetch(&self.public_id, ResourceKind::Raw) {
            Ok(bytes) => bytes,
            Err(e) => {
                // First run or transient fetch failure: initialize an
                // empty index rather than raising to the caller.
                warn!(error = %e, public_id = %self.public_id, "remote index unavailable, bootstrapping");
                return Ok(self.bootstrap());
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(catalog) => Ok(catalog),
            Err(e) => {
                // Corrupt remote document: reinitialize it with an empty
                // index, same as when it is missing.
                let err = VaultError::IndexLoad(e.to_string());
                warn!(error = %err, public_id = %self.public_id, "remote index unparsable, recovering empty");
                Ok(self.bootstrap())
            }
        }
    }

    fn save(&mut self, catalog: &Catalog) -> Result<()> {
        let content = serde_json::to_string_pretty(catalog)
            .map_err(|e| VaultError::IndexSave(e.to_string()))?;
        self.client
            .overwrite_raw(content.as_bytes(), &self.public_id)
            .map_err(|e| VaultError::IndexSave(e.to_string()))?;
        debug!(public_id = %self.public_id, records = catalog.len(), "remote index saved");

        self.mirror_to_cache(&content);
        Ok(())
    }
}
