use crate::catalog::Catalog;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, VaultError};
use crate::model::FileRecord;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::Write;

/// Produce the backup archive: a gzip-compressed tar with exactly two
/// entries, `index.json` (the canonical catalog document) and
/// `manifest.txt` (one pipe-separated line per record). Pure read-only
/// aggregation.
pub fn run(catalog: &Catalog) -> Result<CmdResult> {
    let mut buf = Vec::new();
    write_archive(&mut buf, catalog)?;

    let mut result = CmdResult::default().with_archive(buf);
    result.add_message(CmdMessage::success(format!(
        "Backup archive built ({} records)",
        catalog.len()
    )));
    Ok(result)
}

pub fn write_archive<W: Write>(writer: W, catalog: &Catalog) -> Result<()> {
    let enc = GzEncoder::new(writer, Compression::default());
    let mut tar = tar::Builder::new(enc);

    let index_json = serde_json::to_string_pretty(catalog)?;
    append_entry(&mut tar, "index.json", index_json.as_bytes())?;

    let manifest = catalog
        .files
        .iter()
        .map(manifest_line)
        .collect::<Vec<_>>()
        .join("\n");
    append_entry(&mut tar, "manifest.txt", manifest.as_bytes())?;

    tar.finish().map_err(VaultError::Io)?;
    Ok(())
}

/// One manifest line. Field order and the pipe delimiter are part of the
/// backup contract for downstream tooling:
/// `uploaded_at | scope | original_name | resource_kind | location`.
fn manifest_line(record: &FileRecord) -> String {
    format!(
        "{} | {} | {} | {} | {}",
        record.uploaded_at.format("%Y-%m-%dT%H:%M:%S"),
        record.scope,
        record.original_name,
        record.storage.kind_label(),
        record.storage.location()
    )
}

fn append_entry<W: Write>(tar: &mut tar::Builder<W>, name: &str, content: &[u8]) -> Result<()> {
    let mut header = tar::Header::new_gnu();
    header.set_size(content.len() as u64);
    header.set_mode(0o644);
    header.set_cksum();
    tar.append_data(&mut header, name, content)
        .map_err(VaultError::Io)?;
    Ok(())
}
