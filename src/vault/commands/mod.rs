use crate::model::FileRecord;

pub mod backup;
pub mod delete;
pub mod list;
pub mod upload;

#[derive(Debug, Clone)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// Structured result of a vault operation: the records it touched or
/// listed, produced archive bytes (backup only), and user-facing
/// messages. Warnings carry the non-fatal failures (a blob that could
/// not be deleted, an orphaned blob after a failed index save).
#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_records: Vec<FileRecord>,
    pub listed_records: Vec<FileRecord>,
    pub archive: Option<Vec<u8>>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_listed_records(mut self, records: Vec<FileRecord>) -> Self {
        self.listed_records = records;
        self
    }

    pub fn with_archive(mut self, archive: Vec<u8>) -> Self {
        self.archive = Some(archive);
        self
    }

    pub fn has_warnings(&self) -> bool {
        self.messages
            .iter()
            .any(|m| matches!(m.level, MessageLevel::Warning))
    }
}
