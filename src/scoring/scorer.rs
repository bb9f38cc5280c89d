use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::model::PatchId;

use super::error::{ScoringError, ScoringResult};

/// Turns two patch ids into a similarity score (larger is more similar).
///
/// Implementations are invoked concurrently from every evaluation worker and
/// must not rely on external synchronization.
pub trait Scorer: Send + Sync {
    fn score(&self, origin: &PatchId, candidate: &PatchId) -> ScoringResult<f64>;

    /// Hint that `ids` are about to be scored in bulk. Default: no-op.
    fn precache(&self, _ids: &[PatchId]) {}

    /// Scores currently memoized. Always `0` for scorers without a cache.
    fn cached_scores(&self) -> u64 {
        0
    }
}

/// Scorer backed by a precomputed table.
///
/// The table is line oriented: `origin candidate score`, `#` comments allowed.
/// A lookup tries the requested direction first and falls back to the reverse
/// one, since most tables only hold one direction per pair.
#[derive(Debug, Clone, Default)]
pub struct TableScorer {
    scores: HashMap<(PatchId, PatchId), f64>,
}

impl TableScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, origin: PatchId, candidate: PatchId, score: f64) {
        self.scores.insert((origin, candidate), score);
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> ScoringResult<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file), path)
    }

    pub fn from_reader<R: BufRead>(reader: R, source: &Path) -> ScoringResult<Self> {
        let mut table = Self::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let malformed = |reason: String| ScoringError::MalformedTable {
                path: source.to_path_buf(),
                line: idx + 1,
                reason,
            };

            let fields: Vec<&str> = trimmed.split_whitespace().collect();
            let [origin, candidate, score] = fields.as_slice() else {
                return Err(malformed(format!("expected 3 fields, got {}", fields.len())));
            };
            let score: f64 = score
                .parse()
                .map_err(|_| malformed(format!("'{}' is not a number", score)))?;

            table.insert(PatchId::parse(origin)?, PatchId::parse(candidate)?, score);
        }

        debug!(path = %source.display(), entries = table.len(), "Loaded score table");
        Ok(table)
    }
}

impl Scorer for TableScorer {
    fn score(&self, origin: &PatchId, candidate: &PatchId) -> ScoringResult<f64> {
        self.scores
            .get(&(origin.clone(), candidate.clone()))
            .or_else(|| self.scores.get(&(candidate.clone(), origin.clone())))
            .copied()
            .ok_or_else(|| ScoringError::MissingScore {
                origin: origin.to_string(),
                candidate: candidate.to_string(),
            })
    }
}
