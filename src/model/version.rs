use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::{ModelError, ModelResult};

const RELEASE_CANDIDATE_LABEL: &str = "rc";

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum Suffix {
    /// `-rcN`: orders before the base release.
    ReleaseCandidate(u32),
    Base,
    /// `-rtN`, `-stableN`, ...: orders after the base release.
    Tagged { number: u32, label: String },
}

/// Release-line version such as `3.0`, `3.0-rc7`, `3.0.1-rt11`.
///
/// Numeric components compare numerically with trailing zeros ignored, so
/// `3.0 == 3.0.0`. Release candidates order before their base version; every
/// other suffix label orders after it.
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Version {
    raw: String,
    numbers: Vec<u32>,
    suffix: Suffix,
}

impl Version {
    pub fn parse(value: &str) -> ModelResult<Self> {
        let invalid = |reason: &str| ModelError::InvalidVersion {
            value: value.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = value.trim();
        let body = trimmed.strip_prefix('v').unwrap_or(trimmed);
        if body.is_empty() {
            return Err(invalid("empty"));
        }

        let (release, suffix) = match body.split_once('-') {
            Some((release, suffix)) => (release, Some(suffix)),
            None => (body, None),
        };

        let mut numbers = release
            .split('.')
            .map(|part| {
                part.parse::<u32>()
                    .map_err(|_| invalid(&format!("component '{}' is not a number", part)))
            })
            .collect::<ModelResult<Vec<u32>>>()?;
        while numbers.len() > 1 && numbers.last() == Some(&0) {
            numbers.pop();
        }

        let suffix = match suffix {
            None => Suffix::Base,
            Some(s) => Self::parse_suffix(s).ok_or_else(|| invalid("malformed suffix"))?,
        };

        Ok(Self {
            raw: trimmed.to_string(),
            numbers,
            suffix,
        })
    }

    fn parse_suffix(suffix: &str) -> Option<Suffix> {
        let split = suffix
            .find(|c: char| c.is_ascii_digit())
            .unwrap_or(suffix.len());
        let (label, digits) = suffix.split_at(split);
        if label.is_empty() || !label.chars().all(|c| c.is_ascii_alphabetic()) {
            return None;
        }
        let number = if digits.is_empty() {
            0
        } else {
            digits.parse::<u32>().ok()?
        };
        let label = label.to_ascii_lowercase();
        if label == RELEASE_CANDIDATE_LABEL {
            Some(Suffix::ReleaseCandidate(number))
        } else {
            Some(Suffix::Tagged { number, label })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn is_release_candidate(&self) -> bool {
        matches!(self.suffix, Suffix::ReleaseCandidate(_))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.numbers
            .cmp(&other.numbers)
            .then_with(|| self.suffix.cmp(&other.suffix))
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.numbers.hash(state);
        self.suffix.hash(state);
    }
}

impl fmt::Debug for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Version({})", self.raw)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for Version {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Version {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Version> for String {
    fn from(version: Version) -> Self {
        version.raw
    }
}

/// Inclusive bounds selecting which stacks act as origins in a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionRange {
    pub min: Option<Version>,
    pub max: Option<Version>,
}

impl VersionRange {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn new(min: Option<Version>, max: Option<Version>) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, version: &Version) -> bool {
        self.min.as_ref().is_none_or(|min| version >= min)
            && self.max.as_ref().is_none_or(|max| version <= max)
    }

    /// `false` when `min > max`, i.e. nothing can match.
    pub fn is_satisfiable(&self) -> bool {
        match (&self.min, &self.max) {
            (Some(min), Some(max)) => min <= max,
            _ => true,
        }
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lower = self.min.as_ref().map(Version::as_str).unwrap_or("*");
        let upper = self.max.as_ref().map(Version::as_str).unwrap_or("*");
        write!(f, "[{}, {}]", lower, upper)
    }
}
