//! # Filevault Architecture
//!
//! Filevault is a **UI-agnostic file vault library**. There is no
//! database: the catalog of uploaded files is a single JSON document
//! ("the index") that is the source of truth, and the file bytes live in
//! a blob store beside it. The bundled `vault` CLI is just one client of
//! the library.
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (main.rs, args.rs)                               │
//! │  - Parses arguments, loads config/env, prints messages      │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - VaultApi<B, I>: owns the in-memory catalog               │
//! │  - Dispatches to commands, returns structured results       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - upload / delete / list / backup business logic           │
//! │  - Where the consistency protocol lives                     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - BlobStore + IndexStore traits                            │
//! │  - Disk/File (local), Remote over a CloudClient, Memory     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The Consistency Model
//!
//! Blobs and the index are persisted independently, without a
//! transaction. Uploads write the blob first and the index second;
//! deletes remove the catalog entry even when the blob delete fails.
//! The failure direction is always an orphaned blob, never an index
//! entry pointing at nothing. Index writes are whole-document,
//! last-write-wins, and atomic per document (temp-file rename locally,
//! single-asset overwrite remotely). See `store/` for the details.
//!
//! ## Module Overview
//!
//! - [`api`]: The facade — entry point for all operations
//! - [`commands`]: Business logic for each operation
//! - [`catalog`]: The in-memory, newest-first record collection
//! - [`store`]: Storage traits and the three implementations
//! - [`model`]: Core data types (`FileRecord`, `StorageRef`)
//! - [`config`]: Injected configuration
//! - [`error`]: Error types

pub mod api;
pub mod catalog;
pub mod commands;
pub mod config;
pub mod error;
pub mod model;
pub mod store;
