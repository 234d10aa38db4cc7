use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub const DEFAULT_SCOPE: &str = "general";

/// Resource kind as detected by the remote provider at upload time.
///
/// The provider sorts everything it stores into one of three buckets;
/// deletes must be scoped by the same kind the asset was stored under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Image,
    Video,
    Raw,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Image => "image",
            ResourceKind::Video => "video",
            ResourceKind::Raw => "raw",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque pointer into the blob store.
///
/// Local blobs are addressed by a path relative to the vault root; remote
/// blobs carry the provider's persistent identifier plus the direct fetch
/// URL and the detected resource kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum StorageRef {
    Local {
        path: String,
    },
    Remote {
        public_id: String,
        url: String,
        resource_type: ResourceKind,
        format: Option<String>,
    },
}

impl StorageRef {
    /// Label for the manifest's resource-kind column. Local blobs have no
    /// provider-detected kind and report `file`.
    pub fn kind_label(&self) -> &str {
        match self {
            StorageRef::Local { .. } => "file",
            StorageRef::Remote { resource_type, .. } => resource_type.as_str(),
        }
    }

    /// The blob's location as a display string: relative path or direct URL.
    pub fn location(&self) -> &str {
        match self {
            StorageRef::Local { path } => path,
            StorageRef::Remote { url, .. } => url,
        }
    }
}

/// One uploaded file. Records are immutable after creation; the only
/// catalog mutations are prepend and removal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: Uuid,
    pub scope: String,
    pub original_name: String,
    pub uploaded_at: DateTime<Utc>,
    pub tags: Vec<String>,
    pub size_bytes: u64,
    pub storage: StorageRef,
}

impl FileRecord {
    /// Case-insensitive substring match over name, space-joined tags, and
    /// scope. An empty query matches everything.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        self.original_name.to_lowercase().contains(&query)
            || self.tags.join(" ").to_lowercase().contains(&query)
            || self.scope.to_lowercase().contains(&query)
    }
}

/// Current time truncated to whole seconds, the precision recorded for
/// `uploaded_at`.
pub fn upload_timestamp() -> DateTime<Utc> {
    let now = Utc::now();
    now.with_nanosecond(0).unwrap_or(now)
}

/// Replace anything outside `[A-Za-z0-9._-]` with underscores, spaces
/// included.
pub fn sanitize_filename(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Normalize a user-supplied scope to a non-empty, filesystem-and-URL-safe
/// token: trimmed, lowercased, sanitized, defaulting to `general`.
pub fn normalize_scope(input: &str) -> String {
    let scope = sanitize_filename(&input.trim().to_lowercase());
    if scope.is_empty() {
        DEFAULT_SCOPE.to_string()
    } else {
        scope
    }
}

/// Split comma-separated tag input, trimming and dropping empties. Order
/// is preserved for display.
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
