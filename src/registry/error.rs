use thiserror::Error;

use crate::model::{ModelError, PairKey};

#[derive(Debug, Error)]
pub enum RegistryError {
    /// Loaded stores relate and reject the same pairs; needs manual repair.
    #[error("{} pair(s) are both related and rejected: {}", .pairs.len(), format_pairs(.pairs))]
    Conflict { pairs: Vec<PairKey> },

    #[error("merging {pair} would relate rejected pair {rejected}")]
    WouldRelateRejected { pair: PairKey, rejected: PairKey },

    #[error("cannot reject {pair}: already related")]
    AlreadyRelated { pair: PairKey },

    #[error("invalid pair: {0}")]
    Model(#[from] ModelError),
}

fn format_pairs(pairs: &[PairKey]) -> String {
    pairs
        .iter()
        .map(|p| format!("({})", p))
        .collect::<Vec<_>>()
        .join(", ")
}

pub type RegistryResult<T> = Result<T, RegistryError>;
