//! Candidate extraction from a list document
//!
//! The candidate list is a wiki-style document in which every entity appears as
//! `[[Name]]` or `[[Name|label]]`. File and category references are skipped.

use crate::entity::id::{CandidateSet, EntityId};
use regex::Regex;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

/// Namespaces that never name an entity
const EXCLUDED_PREFIXES: &[&str] = &["File:", "Category:"];

/// Result of scanning a list document
#[derive(Debug, Clone, Default)]
pub struct CandidateExtraction {
    /// The de-duplicated candidate set
    pub candidates: CandidateSet,

    /// Number of references matched, duplicates included
    pub total_matches: usize,

    /// Names that appeared more than once, sorted
    pub duplicates: Vec<EntityId>,
}

/// Extracts the candidate set from a list document
///
/// # Example
///
/// ```
/// use linkweave::entity::extract_candidates;
///
/// let doc = "* [[Johnny Cash]]\n* [[June Carter Cash|June]]\n[[File:Guitar.jpg]]";
/// let extraction = extract_candidates(doc);
/// assert_eq!(extraction.candidates.len(), 2);
/// assert!(extraction.candidates.contains_name("June_Carter_Cash"));
/// ```
pub fn extract_candidates(document: &str) -> CandidateExtraction {
    static CANDIDATE_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\[\[([^|\]]+)").expect("valid regex"));

    let mut counts: BTreeMap<EntityId, usize> = BTreeMap::new();
    let mut total_matches = 0;

    for caps in CANDIDATE_RE.captures_iter(document) {
        let target = &caps[1];
        if EXCLUDED_PREFIXES
            .iter()
            .any(|prefix| target.starts_with(prefix))
        {
            continue;
        }

        let id = EntityId::new(target);
        if id.is_empty() {
            continue;
        }

        total_matches += 1;
        *counts.entry(id).or_insert(0) += 1;
    }

    let duplicates = counts
        .iter()
        .filter(|(_, count)| **count > 1)
        .map(|(id, _)| id.clone())
        .collect();

    CandidateExtraction {
        candidates: counts.into_keys().collect(),
        total_matches,
        duplicates,
    }
}

/// Reads a list document from disk and extracts its candidates
pub fn load_candidates(path: &Path) -> std::io::Result<CandidateExtraction> {
    let document = std::fs::read_to_string(path)?;
    let extraction = extract_candidates(&document);

    tracing::info!(
        "Found {} entity references ({} unique) in {}",
        extraction.total_matches,
        extraction.candidates.len(),
        path.display()
    );
    if !extraction.duplicates.is_empty() {
        tracing::info!(
            "Found {} duplicate entity names",
            extraction.duplicates.len()
        );
        tracing::debug!("Duplicates: {:?}", extraction.duplicates);
    }

    Ok(extraction)
}
