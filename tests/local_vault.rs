use assert_cmd::Command;
use filevault::api::VaultApi;
use filevault::catalog::{Catalog, ScopeFilter};
use filevault::store::fs::{DiskBlobStore, FileIndexStore};
use flate2::read::GzDecoder;
use predicates::prelude::*;
use std::fs;
use std::io::Read;
use std::path::Path;

fn vault(data_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("vault").unwrap();
    cmd.arg("--data-dir").arg(data_dir);
    cmd
}

fn read_index(data_dir: &Path) -> Catalog {
    let content = fs::read_to_string(data_dir.join("index.json")).unwrap();
    serde_json::from_str(&content).unwrap()
}

#[test]
fn upload_list_delete_through_the_binary() {
    let temp = tempfile::tempdir().unwrap();
    let data_dir = temp.path().join("vault");
    let sample = temp.path().join("report.txt");
    fs::write(&sample, b"0123456789").unwrap();

    vault(&data_dir)
        .arg("upload")
        .arg(&sample)
        .arg("--scope")
        .arg("Cliente A")
        .arg("--tags")
        .arg("facturas, enero")
        .assert()
        .success()
        .stdout(predicates::str::contains("Stored report.txt in cliente_a"));

    // The index documents the record; the blob sits at the deterministic
    // path recorded in it.
    let index = read_index(&data_dir);
    assert_eq!(index.len(), 1);
    let record = &index.files[0];
    assert_eq!(record.scope, "cliente_a");
    assert_eq!(record.size_bytes, 10);
    assert_eq!(record.tags, vec!["facturas", "enero"]);
    assert!(data_dir.join(record.storage.location()).exists());

    vault(&data_dir)
        .arg("list")
        .arg("--scope")
        .arg("cliente_a")
        .assert()
        .success()
        .stdout(predicates::str::contains("report.txt"));

    // Substring search over tags.
    vault(&data_dir)
        .arg("list")
        .arg("--query")
        .arg("ene")
        .assert()
        .success()
        .stdout(predicates::str::contains("report.txt"));

    vault(&data_dir)
        .arg("scopes")
        .assert()
        .success()
        .stdout(predicates::str::contains("cliente_a").and(predicates::str::contains("general")));

    vault(&data_dir)
        .arg("path")
        .arg(record.id.to_string())
        .assert()
        .success()
        .stdout(predicates::str::contains(record.storage.location()));

    vault(&data_dir)
        .arg("rm")
        .arg(record.id.to_string())
        .assert()
        .success()
        .stdout(predicates::str::contains("Deleted report.txt"));

    assert!(read_index(&data_dir).is_empty());
    assert!(!data_dir.join(record.storage.location()).exists());

    // Deleting again is a no-op, not an error.
    vault(&data_dir)
        .arg("rm")
        .arg(record.id.to_string())
        .assert()
        .success()
        .stdout(predicates::str::contains("nothing to delete"));
}

#[test]
fn list_scope_filter_is_normalized_like_upload() {
    let temp = tempfile::tempdir().unwrap();
    let data_dir = temp.path().join("vault");
    let sample = temp.path().join("contrato.pdf");
    fs::write(&sample, b"pdf").unwrap();

    vault(&data_dir)
        .arg("upload")
        .arg(&sample)
        .arg("--scope")
        .arg("Cliente A")
        .assert()
        .success();

    // The raw spelling that was given at upload time finds the file too.
    vault(&data_dir)
        .arg("list")
        .arg("--scope")
        .arg("Cliente A")
        .assert()
        .success()
        .stdout(predicates::str::contains("contrato.pdf"));
}

#[test]
fn listing_an_empty_vault_bootstraps_the_index() {
    let temp = tempfile::tempdir().unwrap();
    let data_dir = temp.path().join("vault");

    vault(&data_dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicates::str::contains("No files."));

    // Opening the vault persisted the empty document.
    assert!(read_index(&data_dir).is_empty());
}

#[test]
fn backup_archive_contains_index_and_manifest() {
    let temp = tempfile::tempdir().unwrap();
    let data_dir = temp.path().join("vault");
    let sample = temp.path().join("notas.md");
    fs::write(&sample, b"# notas").unwrap();

    vault(&data_dir).arg("upload").arg(&sample).assert().success();

    let out = temp.path().join("backup.tar.gz");
    vault(&data_dir)
        .arg("backup")
        .arg("--output")
        .arg(&out)
        .assert()
        .success();

    let mut tar = tar::Archive::new(GzDecoder::new(fs::File::open(&out).unwrap()));
    let mut entries = Vec::new();
    for entry in tar.entries().unwrap() {
        let mut entry = entry.unwrap();
        let name = entry.path().unwrap().to_string_lossy().into_owned();
        let mut content = String::new();
        entry.read_to_string(&mut content).unwrap();
        entries.push((name, content));
    }

    let names: Vec<_> = entries.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["index.json", "manifest.txt"]);

    let archived: Catalog = serde_json::from_str(&entries[0].1).unwrap();
    assert_eq!(archived, read_index(&data_dir));

    let manifest_fields: Vec<_> = entries[1].1.lines().next().unwrap().split(" | ").collect();
    assert_eq!(manifest_fields.len(), 5);
    assert_eq!(manifest_fields[1], "general");
    assert_eq!(manifest_fields[2], "notas.md");
}

#[test]
fn delete_survives_a_manually_removed_blob() {
    let temp = tempfile::tempdir().unwrap();
    let data_dir = temp.path().to_path_buf();

    let mut api = VaultApi::open(
        DiskBlobStore::new(&data_dir),
        FileIndexStore::new(&data_dir),
    )
    .unwrap();
    let record = api
        .upload(b"bytes", "general", "gone.txt", "")
        .unwrap()
        .affected_records
        .remove(0);

    // Someone removed the file behind the vault's back.
    fs::remove_file(data_dir.join(record.storage.location())).unwrap();

    let result = api.delete(&record.id).unwrap();
    assert!(!result.has_warnings());
    assert!(api.list(&ScopeFilter::All, "").unwrap().listed_records.is_empty());
    assert!(read_index(&data_dir).is_empty());
}
