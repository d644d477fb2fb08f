//! Per-entity fetch outcomes
//!
//! Every entity admitted to a run produces exactly one [`FetchOutcome`],
//! whether it succeeded, exhausted its attempts, or was cancelled.

use crate::entity::EntityId;
use crate::FetchError;
use std::collections::HashSet;

/// Terminal result of one fetch unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The document was fetched and parsed
    Success {
        /// The entity that was fetched
        entity_id: EntityId,
        /// Normalized references found in the document (not yet filtered)
        referenced_ids: HashSet<EntityId>,
        /// Word count of the document
        content_size: usize,
        /// Attempts used, including the successful one
        attempts_made: u32,
    },

    /// Every attempt failed, or the unit was cancelled
    Failure {
        /// The entity that could not be fetched
        entity_id: EntityId,
        /// The error from the final attempt
        last_error: FetchError,
        /// Attempts that were started before giving up
        attempts_made: u32,
    },
}

impl FetchOutcome {
    pub fn entity_id(&self) -> &EntityId {
        match self {
            Self::Success { entity_id, .. } | Self::Failure { entity_id, .. } => entity_id,
        }
    }

    pub fn attempts_made(&self) -> u32 {
        match self {
            Self::Success { attempts_made, .. } | Self::Failure { attempts_made, .. } => {
                *attempts_made
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Returns true if the unit ended because the run was cancelled
    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            Self::Failure {
                last_error: FetchError::Cancelled,
                ..
            }
        )
    }
}
