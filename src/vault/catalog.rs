//! The in-memory catalog: an ordered, newest-first sequence of
//! [`FileRecord`]s with pure insert/remove/query operations and no I/O.
//!
//! This is the working representation of the index document
//! (`{"files": [...]}`). The stores in [`crate::store`] persist and load
//! it; the commands in [`crate::commands`] mutate it. Newest-first order
//! is an invariant every mutation preserves.

use crate::model::{FileRecord, DEFAULT_SCOPE};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Scope filter for listings: either the "all scopes" sentinel or an
/// exact match on one normalized scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeFilter {
    All,
    Named(String),
}

impl ScopeFilter {
    fn accepts(&self, scope: &str) -> bool {
        match self {
            ScopeFilter::All => true,
            ScopeFilter::Named(name) => name == scope,
        }
    }
}

/// The catalog document. Serializes to the durable index form directly,
/// so save/load round-trips preserve record order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub files: Vec<FileRecord>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Prepend a record so the newest entry lists first.
    ///
    /// Duplicate ids should not occur given v4 generation; if one does,
    /// the newest insertion wins and the older record is dropped.
    pub fn insert(&mut self, record: FileRecord) {
        self.files.retain(|f| f.id != record.id);
        self.files.insert(0, record);
    }

    pub fn get(&self, id: &Uuid) -> Option<&FileRecord> {
        self.files.iter().find(|f| &f.id == id)
    }

    /// Remove every record with the given id (expected exactly one),
    /// preserving the relative order of the remainder. Returns whether
    /// anything was removed.
    pub fn remove_by_id(&mut self, id: &Uuid) -> bool {
        let before = self.files.len();
        self.files.retain(|f| &f.id != id);
        self.files.len() != before
    }

    /// Filter the catalog by scope and free-text query, preserving order.
    /// Matching is case-insensitive substring over the original name, the
    /// space-joined tags, and the scope.
    pub fn search(&self, scope: &ScopeFilter, query: &str) -> Vec<FileRecord> {
        self.files
            .iter()
            .filter(|f| scope.accepts(&f.scope) && f.matches(query))
            .cloned()
            .collect()
    }

    /// Distinct scopes currently present, always including the `general`
    /// baseline, sorted for stable display.
    pub fn scopes(&self) -> Vec<String> {
        let mut set: BTreeSet<String> = self.files.iter().map(|f| f.scope.clone()).collect();
        set.insert(DEFAULT_SCOPE.to_string());
        set.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{upload_timestamp, StorageRef};

    fn record(name: &str, scope: &str, tags: &[&str]) -> FileRecord {
        FileRecord {
            id: Uuid::new_v4(),
            scope: scope.to_string(),
            original_name: name.to_string(),
            uploaded_at: upload_timestamp(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            size_bytes: 10,
            storage: StorageRef::Local {
                path: format!("files/{}/{}", scope, name),
            },
        }
    }

    #[test]
    fn insert_prepends_newest_first() {
        let mut catalog = Catalog::new();
        catalog.insert(record("first.txt", "general", &[]));
        catalog.insert(record("second.txt", "general", &[]));

        assert_eq!(catalog.files[0].original_name, "second.txt");
        assert_eq!(catalog.files[1].original_name, "first.txt");
    }

    #[test]
    fn insert_duplicate_id_newest_wins() {
        let mut catalog = Catalog::new();
        let mut a = record("a.txt", "general", &[]);
        catalog.insert(a.clone());
        a.original_name = "a2.txt".into();
        catalog.insert(a.clone());

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.files[0].original_name, "a2.txt");
    }

    #[test]
    fn remove_preserves_order_of_remainder() {
        let mut catalog = Catalog::new();
        let a = record("a.txt", "general", &[]);
        let b = record("b.txt", "general", &[]);
        let c = record("c.txt", "general", &[]);
        catalog.insert(a.clone());
        catalog.insert(b.clone());
        catalog.insert(c.clone());

        assert!(catalog.remove_by_id(&b.id));
        let names: Vec<_> = catalog.files.iter().map(|f| f.original_name.as_str()).collect();
        assert_eq!(names, vec!["c.txt", "a.txt"]);
    }

    #[test]
    fn remove_missing_id_is_noop() {
        let mut catalog = Catalog::new();
        catalog.insert(record("a.txt", "general", &[]));
        let snapshot = catalog.clone();

        assert!(!catalog.remove_by_id(&Uuid::new_v4()));
        assert_eq!(catalog, snapshot);
    }

    #[test]
    fn search_filters_by_scope_and_query() {
        let mut catalog = Catalog::new();
        catalog.insert(record("report.txt", "cliente_a", &["facturas"]));
        catalog.insert(record("notes.md", "general", &["enero"]));

        let all = catalog.search(&ScopeFilter::All, "");
        assert_eq!(all.len(), 2);

        let scoped = catalog.search(&ScopeFilter::Named("cliente_a".into()), "");
        assert_eq!(scoped.len(), 1);
        assert_eq!(scoped[0].original_name, "report.txt");

        let by_tag = catalog.search(&ScopeFilter::All, "ene");
        assert_eq!(by_tag.len(), 1);
        assert_eq!(by_tag[0].original_name, "notes.md");

        let by_scope_text = catalog.search(&ScopeFilter::All, "GENERAL");
        assert_eq!(by_scope_text.len(), 1);
    }

    #[test]
    fn scopes_include_general_baseline_sorted() {
        let mut catalog = Catalog::new();
        assert_eq!(catalog.scopes(), vec!["general"]);

        catalog.insert(record("a.txt", "zeta", &[]));
        catalog.insert(record("b.txt", "alpha", &[]));
        assert_eq!(catalog.scopes(), vec!["alpha", "general", "zeta"]);
    }

    #[test]
    fn document_round_trips_order() {
        let mut catalog = Catalog::new();
        catalog.insert(record("a.txt", "general", &["t1"]));
        catalog.insert(record("b.txt", "cliente_a", &[]));

        let json = serde_json::to_string_pretty(&catalog).unwrap();
        let parsed: Catalog = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, catalog);

        let empty: Catalog = serde_json::from_str(r#"{"files": []}"#).unwrap();
        assert!(empty.is_empty());
    }
}
