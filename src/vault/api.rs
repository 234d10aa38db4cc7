//! # API Facade
//!
//! [`VaultApi`] is the single entry point the presentation layer talks
//! to. It owns the in-memory catalog and the two stores, dispatches to
//! the command layer, and returns structured results — no stdout, no
//! terminal assumptions, no business logic of its own.
//!
//! ## Generic over both stores
//!
//! `VaultApi<B: BlobStore, I: IndexStore>` is selected once at startup:
//! - Local deployment: `VaultApi<DiskBlobStore, FileIndexStore>`
//! - Remote deployment: `VaultApi<RemoteBlobStore<_>, RemoteIndexStore<_>>`
//! - Tests: `VaultApi<MemoryBlobStore, MemoryIndexStore>`
//!
//! ## Catalog ownership
//!
//! The facade holds the catalog explicitly across calls; there is no
//! framework session state. [`VaultApi::reload`] discards the held
//! catalog and re-establishes it from the index store, which is the
//! recovery tool when the durable index was changed by another session.

use crate::catalog::{Catalog, ScopeFilter};
use crate::commands;
use crate::error::{Result, VaultError};
use crate::model::FileRecord;
use crate::store::{BlobLocation, BlobStore, IndexStore};
use uuid::Uuid;

pub struct VaultApi<B: BlobStore, I: IndexStore> {
    blobs: B,
    index: I,
    catalog: Catalog,
}

impl<B: BlobStore, I: IndexStore> VaultApi<B, I> {
    /// Open the vault: load the catalog from the index store (which
    /// bootstraps an empty one on first run).
    pub fn open(blobs: B, mut index: I) -> Result<Self> {
        let catalog = index.load()?;
        Ok(Self {
            blobs,
            index,
            catalog,
        })
    }

    pub fn upload(
        &mut self,
        data: &[u8],
        scope: &str,
        original_name: &str,
        tags_text: &str,
    ) -> Result<commands::CmdResult> {
        commands::upload::run(
            &mut self.blobs,
            &mut self.index,
            &mut self.catalog,
            commands::upload::UploadRequest {
                data,
                scope,
                original_name,
                tags_text,
            },
        )
    }

    pub fn delete(&mut self, id: &Uuid) -> Result<commands::CmdResult> {
        commands::delete::run(&mut self.blobs, &mut self.index, &mut self.catalog, id)
    }

    pub fn list(&self, scope: &ScopeFilter, query: &str) -> Result<commands::CmdResult> {
        commands::list::run(&self.catalog, scope, query)
    }

    pub fn scopes(&self) -> Vec<String> {
        self.catalog.scopes()
    }

    pub fn export_backup(&self) -> Result<commands::CmdResult> {
        commands::backup::run(&self.catalog)
    }

    /// Discard the held catalog and load a fresh one from the index
    /// store.
    pub fn reload(&mut self) -> Result<&Catalog> {
        self.catalog = self.index.load()?;
        Ok(&self.catalog)
    }

    /// Where to read a record's bytes from: a local path or a direct URL.
    pub fn resolve_readable(&self, id: &Uuid) -> Result<BlobLocation> {
        let record = self
            .catalog
            .get(id)
            .ok_or(VaultError::RecordNotFound(*id))?;
        self.blobs.readable(&record.storage)
    }

    pub fn record(&self, id: &Uuid) -> Option<&FileRecord> {
        self.catalog.get(id)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}
