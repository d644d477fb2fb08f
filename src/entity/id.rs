use serde::Serialize;
use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt;

/// Separator that replaces whitespace in entity names
pub const NAME_SEPARATOR: char = '_';

/// Normalizes a raw entity name
///
/// # Normalization Steps
///
/// 1. Trim leading and trailing whitespace
/// 2. Collapse each inner run of whitespace into a single `_`
///
/// Letter case is preserved; the remote service resolves case itself.
///
/// # Examples
///
/// ```
/// use linkweave::entity::normalize_name;
///
/// assert_eq!(normalize_name("  Johnny Cash "), "Johnny_Cash");
/// assert_eq!(normalize_name("Patsy_Cline"), "Patsy_Cline");
/// ```
pub fn normalize_name(raw: &str) -> String {
    let mut normalized = String::with_capacity(raw.len());
    for (i, word) in raw.split_whitespace().enumerate() {
        if i > 0 {
            normalized.push(NAME_SEPARATOR);
        }
        normalized.push_str(word);
    }
    normalized
}

/// Normalized identifier of an entity
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Creates an identifier from a raw name, normalizing it
    pub fn new(raw: &str) -> Self {
        Self(normalize_name(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for EntityId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EntityId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// The fixed set of entities a run fetches
///
/// Built once at startup and read-only afterwards. Membership is the filter
/// applied to references discovered in fetched documents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateSet {
    ids: HashSet<EntityId>,
}

impl CandidateSet {
    pub fn new(ids: HashSet<EntityId>) -> Self {
        Self { ids }
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.ids.contains(id)
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.ids.contains(name)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EntityId> {
        self.ids.iter()
    }

    /// Returns the identifiers in lexical order
    pub fn sorted(&self) -> Vec<&EntityId> {
        let mut ids: Vec<_> = self.ids.iter().collect();
        ids.sort();
        ids
    }
}

impl FromIterator<EntityId> for CandidateSet {
    fn from_iter<I: IntoIterator<Item = EntityId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().filter(|id| !id.is_empty()).collect(),
        }
    }
}

impl<'a> FromIterator<&'a str> for CandidateSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        iter.into_iter().map(EntityId::new).collect()
    }
}
