use crate::catalog::Catalog;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::{BlobStore, IndexStore};
use tracing::warn;
use uuid::Uuid;

/// Delete a record by id. An absent id is a no-op success. The blob
/// delete is best-effort: a failure there is downgraded to a warning and
/// the catalog entry is removed regardless, because an orphaned blob is
/// preferable to a stuck index entry.
pub fn run<B: BlobStore, I: IndexStore>(
    blobs: &mut B,
    index: &mut I,
    catalog: &mut Catalog,
    id: &Uuid,
) -> Result<CmdResult> {
    let Some(record) = catalog.get(id).cloned() else {
        let mut result = CmdResult::default();
        result.add_message(CmdMessage::info(format!(
            "No record with id {}; nothing to delete.",
            id
        )));
        return Ok(result);
    };

    let mut result = CmdResult::default();
    if let Err(e) = blobs.delete(&record.storage) {
        warn!(
            id = %record.id,
            location = record.storage.location(),
            error = %e,
            "blob delete failed, removing catalog entry anyway"
        );
        result.add_message(CmdMessage::warning(format!(
            "Could not delete the stored file ({}); the catalog entry was removed anyway.",
            e
        )));
    }

    catalog.remove_by_id(id);
    index.save(catalog)?;

    result.add_message(CmdMessage::success(format!(
        "Deleted {} from {}",
        record.original_name, record.scope
    )));
    result.affected_records.push(record);
    Ok(result)
}
