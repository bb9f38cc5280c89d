use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::error::{ModelError, ModelResult};

/// Opaque handle for one concrete version of a patch (typically a commit hash).
///
/// Cloning is a reference-count bump. Ordering is lexical and only used to make
/// output deterministic.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PatchId(Arc<str>);

impl PatchId {
    /// Parses an id. Empty strings and ids containing whitespace are rejected
    /// because the persisted stores are whitespace separated.
    pub fn parse(value: &str) -> ModelResult<Self> {
        if value.is_empty() {
            return Err(ModelError::EmptyPatchId);
        }
        if value.chars().any(char::is_whitespace) {
            return Err(ModelError::WhitespaceInPatchId {
                value: value.to_string(),
            });
        }
        Ok(Self(Arc::from(value)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PatchId({})", self.0)
    }
}

impl fmt::Display for PatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PatchId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PatchId {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PatchId> for String {
    fn from(id: PatchId) -> Self {
        id.0.to_string()
    }
}

impl AsRef<str> for PatchId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Unordered pair of distinct patch ids, stored as `(min, max)`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PairKey {
    low: PatchId,
    high: PatchId,
}

impl PairKey {
    pub fn new(a: PatchId, b: PatchId) -> ModelResult<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Ok(Self { low: a, high: b }),
            std::cmp::Ordering::Greater => Ok(Self { low: b, high: a }),
            std::cmp::Ordering::Equal => Err(ModelError::SelfPair {
                id: a.to_string(),
            }),
        }
    }

    pub fn of(a: &PatchId, b: &PatchId) -> ModelResult<Self> {
        Self::new(a.clone(), b.clone())
    }

    pub fn low(&self) -> &PatchId {
        &self.low
    }

    pub fn high(&self) -> &PatchId {
        &self.high
    }

    pub fn into_parts(self) -> (PatchId, PatchId) {
        (self.low, self.high)
    }

    pub fn contains(&self, id: &PatchId) -> bool {
        &self.low == id || &self.high == id
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.low, self.high)
    }
}

/// A scored comparison. `origin` is the patch whose stack produced the
/// comparison; the pair is not symmetric by construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScorePair {
    pub origin: PatchId,
    pub candidate: PatchId,
    pub score: f64,
}

impl ScorePair {
    pub fn new(origin: PatchId, candidate: PatchId, score: f64) -> Self {
        Self {
            origin,
            candidate,
            score,
        }
    }

    /// Unordered identity of this pair. Fails only for `origin == candidate`.
    pub fn key(&self) -> ModelResult<PairKey> {
        PairKey::of(&self.origin, &self.candidate)
    }
}
