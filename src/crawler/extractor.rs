//! Cross-reference extraction from fetched documents
//!
//! This module parses wiki markup to extract:
//! - References to other entities (from `[[Target]]` and `[[Target|label]]`)
//! - The content size of the document, counted in words

use crate::entity::EntityId;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// References and size extracted from one document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedLinks {
    /// Normalized reference targets, duplicates collapsed
    pub referenced_ids: HashSet<EntityId>,

    /// Number of whitespace-separated words in the document
    pub content_size: usize,
}

/// Extracts cross-references and the word count from document content
///
/// # Reference Rules
///
/// **Include:**
/// - `[[Target]]` and `[[Target|label]]`
///
/// **Exclude:**
/// - Any namespaced target such as `[[File:...]]`, `[[Category:...]]`
///   or `[[Help:...]]` (targets containing `:`)
/// - Unterminated references
///
/// References are not filtered against the candidate set here.
///
/// # Example
///
/// ```
/// use linkweave::crawler::extract_links;
///
/// let links = extract_links("Born in [[Arkansas]], toured with [[June Carter|June]].");
/// assert_eq!(links.referenced_ids.len(), 2);
/// assert_eq!(links.content_size, 7);
/// ```
pub fn extract_links(content: &str) -> ExtractedLinks {
    static LINK_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\[\[([^|\]]+)(\|[^\]]+)?\]\]").expect("valid regex"));

    let referenced_ids = LINK_RE
        .captures_iter(content)
        .map(|caps| caps.get(1).map_or("", |m| m.as_str()))
        .filter(|target| !target.contains(':'))
        .map(EntityId::new)
        .filter(|id| !id.is_empty())
        .collect();

    ExtractedLinks {
        referenced_ids,
        content_size: count_words(content),
    }
}

/// Counts whitespace-separated words
pub fn count_words(content: &str) -> usize {
    content.split_whitespace().count()
}
