//! # Storage Layer
//!
//! This module defines the two storage abstractions the vault is built
//! on. Blobs (file bytes) and the index document (metadata) are persisted
//! independently, each behind its own trait, so the two deployment
//! variants stay interchangeable.
//!
//! ## The two seams
//!
//! - [`BlobStore`]: stores, deletes, and locates raw file bytes addressed
//!   by an opaque [`StorageRef`].
//! - [`IndexStore`]: persists and loads the single catalog document that
//!   is the source of truth for metadata.
//!
//! ## Implementations
//!
//! - [`fs::DiskBlobStore`] / [`fs::FileIndexStore`]: local-disk variant.
//!   Blobs under `files/<scope>/<year>-<month>/`, index at `index.json`
//!   written with a temp-file-then-rename protocol so readers never see a
//!   half-written document.
//! - [`remote::RemoteBlobStore`] / [`remote::RemoteIndexStore`]:
//!   object-storage variant over a [`cloud::CloudClient`]. Blobs under
//!   `vault/<scope>/<year>-<month>/` with provider-assigned names; the
//!   index is a raw asset at a fixed public id, mirrored to an advisory
//!   local cache.
//! - [`memory::MemoryBlobStore`] / [`memory::MemoryIndexStore`]:
//!   in-process doubles for tests. No persistence.
//!
//! ## Consistency contract
//!
//! There is no transaction across the two stores. Uploads write the blob
//! first and persist the index second; deletes remove the blob
//! best-effort and persist the index regardless. The safe failure
//! direction is an orphaned blob, never a catalog record whose blob was
//! lost. Index writes are whole-document and last-write-wins.

use crate::catalog::Catalog;
use crate::error::Result;
use crate::model::StorageRef;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use uuid::Uuid;

pub mod cloud;
pub mod fs;
pub mod memory;
pub mod remote;

/// Everything a blob store needs to place an upload: the pre-generated
/// record id, the already-normalized scope, and the upload instant that
/// determines the `<year>-<month>` folder.
#[derive(Debug, Clone, Copy)]
pub struct PutMeta<'a> {
    pub id: Uuid,
    pub scope: &'a str,
    pub original_name: &'a str,
    pub uploaded_at: DateTime<Utc>,
}

/// Result of a successful blob write: where the bytes live and how many
/// there are (provider-reported for remote stores).
#[derive(Debug, Clone)]
pub struct StoredBlob {
    pub storage: StorageRef,
    pub size_bytes: u64,
}

/// A readable location for a stored blob: a local path to open directly,
/// or a direct URL to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlobLocation {
    Path(PathBuf),
    Url(String),
}

/// Abstract interface for blob storage.
pub trait BlobStore {
    /// Write the full byte buffer in one pass. Any failure here aborts
    /// the surrounding upload before the catalog is touched.
    fn put(&mut self, data: &[u8], meta: &PutMeta<'_>) -> Result<StoredBlob>;

    /// Delete a blob. "Already gone" counts as success; callers treat
    /// other failures as non-fatal warnings.
    fn delete(&mut self, storage: &StorageRef) -> Result<()>;

    /// Resolve a storage ref to something the caller can read.
    fn readable(&self, storage: &StorageRef) -> Result<BlobLocation>;
}

/// Abstract interface for index-document persistence.
pub trait IndexStore {
    /// Load the catalog. A backing store that has never been written
    /// yields an empty catalog and persists it as a side effect
    /// (self-healing bootstrap), rather than failing.
    fn load(&mut self) -> Result<Catalog>;

    /// Persist the whole catalog document. This is the only point that
    /// establishes a new durable baseline.
    fn save(&mut self, catalog: &Catalog) -> Result<()>;
}
