use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "vault")]
#[command(about = "A small file vault with a JSON index", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Vault data directory (defaults to the platform data dir)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Upload a file into the vault
    #[command(alias = "up")]
    Upload {
        /// File to upload
        file: PathBuf,

        /// Folder / project scope (defaults to "general")
        #[arg(short, long)]
        scope: Option<String>,

        /// Comma-separated tags (e.g. "facturas, cliente_x, enero")
        #[arg(short, long)]
        tags: Option<String>,
    },

    /// List files, optionally filtered by scope and query
    #[command(alias = "ls")]
    List {
        /// Only show files in this scope
        #[arg(short, long)]
        scope: Option<String>,

        /// Match against name, tags, or scope (substring)
        #[arg(short, long)]
        query: Option<String>,
    },

    /// Delete a file by id
    #[command(alias = "rm")]
    Delete {
        /// Record id as shown by `vault list`
        id: String,
    },

    /// List the scopes present in the vault
    Scopes,

    /// Write a backup archive (index.json + manifest.txt)
    Backup {
        /// Output file (defaults to vault-backup-<timestamp>.tar.gz)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print where a file's bytes can be read from (path or URL)
    Path {
        /// Record id as shown by `vault list`
        id: String,
    },

    /// Get or set configuration
    Config {
        /// Configuration key (mode, index-public-id, cloudinary-url)
        key: Option<String>,

        /// Value to set (if omitted, prints the current value)
        value: Option<String>,
    },
}
