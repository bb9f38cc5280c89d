//! Patch-stack manifest: which patches belong to which release line.

mod error;


use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::info;

use crate::catalog::{ManifestCatalog, PatchDetails};
use crate::model::{PatchId, VersionedStack};

pub use error::{ManifestError, ManifestResult};

/// Supplier of the stacks a run works on.
pub trait StackSource {
    /// Stacks ordered by ascending version.
    fn list_versioned_stacks(&self) -> ManifestResult<Vec<VersionedStack>>;
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ManifestDocument {
    stacks: Vec<VersionedStack>,
    #[serde(default)]
    patches: HashMap<PatchId, PatchDetails>,
}

/// JSON manifest:
///
/// ```json
/// {
///   "stacks": [{ "version": "v5.10", "patches": ["<id>", "..."] }],
///   "patches": { "<id>": { "subject": "...", "author": "...", "body": "..." } }
/// }
/// ```
///
/// `patches` is optional and only feeds the prompt catalog.
#[derive(Debug, Clone)]
pub struct ManifestFile {
    path: PathBuf,
    stacks: Vec<VersionedStack>,
    details: HashMap<PatchId, PatchDetails>,
}

impl ManifestFile {
    pub fn load(path: impl AsRef<Path>) -> ManifestResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let manifest = Self::from_json(&text, path)?;
        info!(
            path = %path.display(),
            stacks = manifest.stacks.len(),
            patches = manifest.patch_count(),
            "Loaded manifest"
        );
        Ok(manifest)
    }

    pub fn from_json(text: &str, path: &Path) -> ManifestResult<Self> {
        let document: ManifestDocument =
            serde_json::from_str(text).map_err(|source| ManifestError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let mut seen = HashSet::new();
        for stack in &document.stacks {
            if !seen.insert(&stack.version) {
                return Err(ManifestError::DuplicateVersion {
                    version: stack.version.to_string(),
                });
            }
        }

        let mut stacks = document.stacks;
        stacks.sort_by(|a, b| a.version.cmp(&b.version));

        Ok(Self {
            path: path.to_path_buf(),
            stacks,
            details: document.patches,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn stacks(&self) -> &[VersionedStack] {
        &self.stacks
    }

    /// Total patch ids over all stacks, duplicates included.
    pub fn patch_count(&self) -> usize {
        self.stacks.iter().map(VersionedStack::len).sum()
    }

    /// Every distinct patch id over all stacks.
    pub fn patch_ids(&self) -> HashSet<PatchId> {
        self.stacks
            .iter()
            .flat_map(|stack| stack.patches.iter().cloned())
            .collect()
    }

    pub fn catalog(&self) -> ManifestCatalog {
        ManifestCatalog::new(self.details.clone())
    }
}

impl StackSource for ManifestFile {
    fn list_versioned_stacks(&self) -> ManifestResult<Vec<VersionedStack>> {
        Ok(self.stacks.clone())
    }
}
