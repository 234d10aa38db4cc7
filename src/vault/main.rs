use clap::Parser;
use colored::*;
use directories::ProjectDirs;
use filevault::api::VaultApi;
use filevault::catalog::ScopeFilter;
use filevault::commands::{CmdMessage, MessageLevel};
use filevault::config::{StorageMode, VaultConfig};
use filevault::error::{Result, VaultError};
use filevault::model::{normalize_scope, FileRecord};
use filevault::store::cloud::{CloudCredentials, HttpCloudClient};
use filevault::store::fs::{DiskBlobStore, FileIndexStore};
use filevault::store::remote::{RemoteBlobStore, RemoteIndexStore};
use filevault::store::{BlobLocation, BlobStore, IndexStore};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

mod args;
use args::{Cli, Commands};

const CREDENTIAL_ENV: &str = "CLOUDINARY_URL";
const INDEX_CACHE_FILENAME: &str = "index.cache.json";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("{} {}", "Error:".red(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let data_dir = resolve_data_dir(&cli)?;
    let mut config = VaultConfig::load(&data_dir)?;

    // The environment wins over the config file for credentials, so
    // secrets don't have to be written to disk.
    if let Ok(url) = std::env::var(CREDENTIAL_ENV) {
        if !url.trim().is_empty() {
            config.cloudinary_url = Some(url);
        }
    }

    // Config is handled before any store is wired: it must work even
    // when the remote credentials are absent or wrong.
    if let Some(Commands::Config { key, value }) = &cli.command {
        return handle_config(&data_dir, config, key.as_deref(), value.as_deref());
    }

    match config.mode {
        StorageMode::Local => {
            let api = VaultApi::open(
                DiskBlobStore::new(&data_dir),
                FileIndexStore::new(&data_dir),
            )?;
            dispatch(api, cli.command)
        }
        StorageMode::Remote => {
            let url = config.cloudinary_url.as_deref().ok_or_else(|| {
                VaultError::Config(format!(
                    "remote mode needs provider credentials; set {} or `vault config cloudinary-url ...`",
                    CREDENTIAL_ENV
                ))
            })?;
            let client = HttpCloudClient::new(CloudCredentials::from_url(url)?)?;
            let api = VaultApi::open(
                RemoteBlobStore::new(client.clone()),
                RemoteIndexStore::new(
                    client,
                    config.index_public_id.clone(),
                    Some(data_dir.join(INDEX_CACHE_FILENAME)),
                ),
            )?;
            dispatch(api, cli.command)
        }
    }
}

fn resolve_data_dir(cli: &Cli) -> Result<PathBuf> {
    if let Some(dir) = &cli.data_dir {
        return Ok(dir.clone());
    }
    let dirs = ProjectDirs::from("com", "filevault", "filevault")
        .ok_or_else(|| VaultError::Config("could not determine a data directory".into()))?;
    Ok(dirs.data_dir().to_path_buf())
}

fn dispatch<B: BlobStore, I: IndexStore>(
    mut api: VaultApi<B, I>,
    command: Option<Commands>,
) -> Result<()> {
    match command {
        Some(Commands::Upload { file, scope, tags }) => handle_upload(&mut api, file, scope, tags),
        Some(Commands::List { scope, query }) => handle_list(&api, scope, query),
        Some(Commands::Delete { id }) => handle_delete(&mut api, &id),
        Some(Commands::Scopes) => handle_scopes(&api),
        Some(Commands::Backup { output }) => handle_backup(&api, output),
        Some(Commands::Path { id }) => handle_path(&api, &id),
        Some(Commands::Config { .. }) => unreachable!("config is handled before store wiring"),
        None => handle_list(&api, None, None),
    }
}

fn handle_upload<B: BlobStore, I: IndexStore>(
    api: &mut VaultApi<B, I>,
    file: PathBuf,
    scope: Option<String>,
    tags: Option<String>,
) -> Result<()> {
    let data = fs::read(&file)?;
    let original_name = file
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| VaultError::Store(format!("not a readable file name: {}", file.display())))?;

    let result = api.upload(
        &data,
        scope.as_deref().unwrap_or_default(),
        original_name,
        tags.as_deref().unwrap_or_default(),
    )?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_list<B: BlobStore, I: IndexStore>(
    api: &VaultApi<B, I>,
    scope: Option<String>,
    query: Option<String>,
) -> Result<()> {
    // Normalize the same way upload does so "Cliente A" finds "cliente_a".
    let filter = match scope {
        Some(name) => ScopeFilter::Named(normalize_scope(&name)),
        None => ScopeFilter::All,
    };
    let result = api.list(&filter, query.as_deref().unwrap_or_default())?;

    if result.listed_records.is_empty() {
        println!("{}", "No files.".dimmed());
        return Ok(());
    }
    println!(
        "{}",
        format!(
            "Showing {} of {} files",
            result.listed_records.len(),
            api.catalog().len()
        )
        .dimmed()
    );
    for record in &result.listed_records {
        print_record(record);
    }
    Ok(())
}

fn handle_delete<B: BlobStore, I: IndexStore>(api: &mut VaultApi<B, I>, id: &str) -> Result<()> {
    let id = parse_id(id)?;
    let result = api.delete(&id)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_scopes<B: BlobStore, I: IndexStore>(api: &VaultApi<B, I>) -> Result<()> {
    for scope in api.scopes() {
        println!("{}", scope);
    }
    Ok(())
}

fn handle_backup<B: BlobStore, I: IndexStore>(
    api: &VaultApi<B, I>,
    output: Option<PathBuf>,
) -> Result<()> {
    let result = api.export_backup()?;
    let archive = result
        .archive
        .ok_or_else(|| VaultError::Store("backup produced no archive".into()))?;

    let path = output.unwrap_or_else(|| {
        PathBuf::from(format!(
            "vault-backup-{}.tar.gz",
            chrono::Utc::now().format("%Y-%m-%d_%H%M%S")
        ))
    });
    fs::write(&path, archive)?;

    print_messages(&result.messages);
    println!("{}", format!("Written to {}", path.display()).green());
    Ok(())
}

fn handle_path<B: BlobStore, I: IndexStore>(api: &VaultApi<B, I>, id: &str) -> Result<()> {
    let id = parse_id(id)?;
    match api.resolve_readable(&id)? {
        BlobLocation::Path(path) => println!("{}", path.display()),
        BlobLocation::Url(url) => println!("{}", url),
    }
    Ok(())
}

fn handle_config(
    data_dir: &Path,
    mut config: VaultConfig,
    key: Option<&str>,
    value: Option<&str>,
) -> Result<()> {
    match (key, value) {
        (None, _) => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        (Some(key), None) => {
            let value = config
                .get(key)
                .ok_or_else(|| VaultError::Config(format!("unknown config key: {}", key)))?;
            println!("{}", value);
        }
        (Some(key), Some(value)) => {
            config.set(key, value)?;
            config.save(data_dir)?;
            println!("{}", format!("{} = {}", key, value).green());
        }
    }
    Ok(())
}

fn parse_id(input: &str) -> Result<Uuid> {
    Uuid::parse_str(input.trim())
        .map_err(|_| VaultError::Store(format!("not a record id: {}", input)))
}

fn print_record(record: &FileRecord) {
    println!("{} {}", record.id.to_string().yellow(), record.original_name.bold());
    let tags = if record.tags.is_empty() {
        "-".to_string()
    } else {
        record.tags.join(", ")
    };
    println!(
        "  {}",
        format!(
            "scope: {} · uploaded: {} · size: {} · tags: {}",
            record.scope,
            record.uploaded_at.format("%Y-%m-%d %H:%M:%S"),
            human_size(record.size_bytes),
            tags
        )
        .dimmed()
    );
    println!("  {}", record.storage.location().dimmed());
}

fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

fn human_size(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut size = bytes as f64;
    for unit in ["KB", "MB", "GB"] {
        size /= 1024.0;
        if size < 1024.0 {
            return format!("{:.1} {}", size, unit);
        }
    }
    format!("{:.1} TB", size / 1024.0)
}
