//! Entity identifiers and the candidate set
//!
//! This module handles:
//! - Normalizing raw entity names into [`EntityId`] keys
//! - The fixed [`CandidateSet`] a run fetches from
//! - Extracting candidate names from a source document

mod candidates;
mod id;

pub use candidates::{extract_candidates, load_candidates, CandidateExtraction};
pub use id::{normalize_name, CandidateSet, EntityId};
