use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum VaultError {
    #[error("Record not found: {0}")]
    RecordNotFound(Uuid),

    #[error("Blob write failed: {0}")]
    BlobWrite(String),

    #[error("Blob delete failed: {0}")]
    BlobDelete(String),

    #[error("Index load failed: {0}")]
    IndexLoad(String),

    #[error("Index save failed: {0}")]
    IndexSave(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, VaultError>;
