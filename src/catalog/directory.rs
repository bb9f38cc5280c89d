use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::model::PatchId;

use super::error::{CatalogError, CatalogResult};
use super::{PatchCatalog, PatchDetails};

const PATCH_EXTENSION: &str = "patch";

/// Reads `<root>/<id>.patch` files.
#[derive(Debug, Clone)]
pub struct DirectoryCatalog {
    root: PathBuf,
}

impl DirectoryCatalog {
    pub fn open(root: impl Into<PathBuf>) -> CatalogResult<Self> {
        let root = root.into();
        fs::read_dir(&root).map_err(|source| CatalogError::Unreadable {
            path: root.clone(),
            source,
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Ids that would escape the root (separators, `..`) have no file.
    pub fn path_for(&self, id: &PatchId) -> CatalogResult<PathBuf> {
        let name = format!("{}.{}", id, PATCH_EXTENSION);
        let mut components = Path::new(&name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(self.root.join(name)),
            _ => Err(CatalogError::UnsafeId { id: id.to_string() }),
        }
    }

    pub fn load(&self, id: &PatchId) -> Option<PatchDetails> {
        let path = match self.path_for(id) {
            Ok(path) => path,
            Err(e) => {
                debug!(error = %e, "Skipping patch lookup");
                return None;
            }
        };
        match fs::read_to_string(&path) {
            Ok(text) => Some(PatchDetails::from_text(&text)),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Patch file unavailable");
                None
            }
        }
    }
}

impl PatchCatalog for DirectoryCatalog {
    fn describe(&self, id: &PatchId) -> Option<Arc<PatchDetails>> {
        self.load(id).map(Arc::new)
    }
}
