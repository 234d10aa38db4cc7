use crate::catalog::Catalog;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{normalize_scope, parse_tags, upload_timestamp, FileRecord};
use crate::store::{BlobStore, IndexStore, PutMeta};
use tracing::warn;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct UploadRequest<'a> {
    pub data: &'a [u8],
    pub scope: &'a str,
    pub original_name: &'a str,
    pub tags_text: &'a str,
}

/// Store a file: blob write first, catalog prepend second, index save
/// last. A failed blob write aborts before any catalog mutation; a
/// failed index save leaves the blob orphaned (warned, never rolled
/// back) and surfaces the error.
pub fn run<B: BlobStore, I: IndexStore>(
    blobs: &mut B,
    index: &mut I,
    catalog: &mut Catalog,
    req: UploadRequest<'_>,
) -> Result<CmdResult> {
    let scope = normalize_scope(req.scope);
    let id = Uuid::new_v4();
    let uploaded_at = upload_timestamp();

    let blob = blobs.put(
        req.data,
        &PutMeta {
            id,
            scope: &scope,
            original_name: req.original_name,
            uploaded_at,
        },
    )?;

    let record = FileRecord {
        id,
        scope,
        original_name: req.original_name.to_string(),
        uploaded_at,
        tags: parse_tags(req.tags_text),
        size_bytes: blob.size_bytes,
        storage: blob.storage,
    };

    catalog.insert(record.clone());
    if let Err(e) = index.save(catalog) {
        warn!(
            id = %record.id,
            location = record.storage.location(),
            error = %e,
            "index save failed after blob write, blob is orphaned"
        );
        return Err(e);
    }

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Stored {} in {} ({})",
        record.original_name, record.scope, record.id
    )));
    result.affected_records.push(record);
    Ok(result)
}
