//! Case-insensitive name filter.
//!
//! # Invariants
//! - Input order is preserved.
//! - An empty search string matches every record.
//! - Matching is a substring test on lower-cased `razao_social`.

use crate::model::condominium::Condominium;

/// Returns references to the records whose `razao_social` contains `search`,
/// ignoring case.
pub fn filter_by_razao_social<'a>(
    condominiums: &'a [Condominium],
    search: &str,
) -> Vec<&'a Condominium> {
    let needle = search.to_lowercase();
    condominiums
        .iter()
        .filter(|condominium| condominium.matches_search(&needle))
        .collect()
}
