use crate::catalog::{Catalog, ScopeFilter};
use crate::commands::CmdResult;
use crate::error::Result;

/// Read-only listing: delegate to the catalog's search, preserving the
/// newest-first order.
pub fn run(catalog: &Catalog, scope: &ScopeFilter, query: &str) -> Result<CmdResult> {
    Ok(CmdResult::default().with_listed_records(catalog.search(scope, query)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::sample_record;

    fn catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.insert(sample_record("informe.pdf", "cliente_a", &["facturas"]));
        catalog.insert(sample_record("foto.png", "general", &["enero", "fabric"]));
        catalog.insert(sample_record("notas.txt", "general", &[]));
        catalog
    }

    #[test]
    fn empty_query_lists_everything_newest_first() {
        let result = run(&catalog(), &ScopeFilter::All, "").unwrap();
        let names: Vec<_> = result
            .listed_records
            .iter()
            .map(|r| r.original_name.as_str())
            .collect();
        assert_eq!(names, vec!["notas.txt", "foto.png", "informe.pdf"]);
    }

    #[test]
    fn scope_filter_is_exact_match() {
        let result = run(&catalog(), &ScopeFilter::Named("cliente_a".into()), "").unwrap();
        assert_eq!(result.listed_records.len(), 1);
        assert_eq!(result.listed_records[0].original_name, "informe.pdf");

        // A near-miss scope matches nothing.
        let result = run(&catalog(), &ScopeFilter::Named("cliente".into()), "").unwrap();
        assert!(result.listed_records.is_empty());
    }

    #[test]
    fn query_is_case_insensitive_substring() {
        // "ene" hits the "enero" tag.
        let result = run(&catalog(), &ScopeFilter::All, "ene").unwrap();
        assert_eq!(result.listed_records.len(), 1);
        assert_eq!(result.listed_records[0].original_name, "foto.png");

        // "GENERAL" hits the scope, case-insensitively.
        let result = run(&catalog(), &ScopeFilter::All, "GENERAL").unwrap();
        assert_eq!(result.listed_records.len(), 2);

        // "ab" is a substring of the "fabric" tag, not a word match.
        let result = run(&catalog(), &ScopeFilter::All, "ab").unwrap();
        assert_eq!(result.listed_records.len(), 1);
    }

    #[test]
    fn scope_and_query_combine() {
        let result = run(&catalog(), &ScopeFilter::Named("general".into()), "foto").unwrap();
        assert_eq!(result.listed_records.len(), 1);
        assert_eq!(result.listed_records[0].original_name, "foto.png");
    }
}
