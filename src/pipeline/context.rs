use std::sync::Arc;

use crate::catalog::{CachedCatalog, DirectoryCatalog, ManifestCatalog, PatchCatalog};
use crate::config::{Config, ConfigError};
use crate::evaluation::WorkerPool;
use crate::manifest::ManifestFile;
use crate::model::VersionRange;
use crate::scoring::{CachedScorer, Scorer, TableScorer, Thresholds};

use super::error::PipelineResult;

/// Everything one run needs, built once and dropped at the end of the run.
#[derive(Clone)]
pub struct RunContext {
    pub thresholds: Thresholds,
    pub range: VersionRange,
    pub pool: WorkerPool,
    pub scorer: Arc<dyn Scorer>,
    pub catalog: Arc<dyn PatchCatalog>,
}

impl std::fmt::Debug for RunContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunContext")
            .field("thresholds", &self.thresholds)
            .field("range", &self.range)
            .field("pool", &self.pool)
            .finish_non_exhaustive()
    }
}

impl RunContext {
    pub fn new(thresholds: Thresholds, scorer: Arc<dyn Scorer>) -> Self {
        Self {
            thresholds,
            range: VersionRange::unbounded(),
            pool: WorkerPool::default(),
            scorer,
            catalog: Arc::new(ManifestCatalog::default()),
        }
    }

    pub fn with_range(mut self, range: VersionRange) -> Self {
        self.range = range;
        self
    }

    pub fn with_pool(mut self, pool: WorkerPool) -> Self {
        self.pool = pool;
        self
    }

    pub fn with_catalog(mut self, catalog: Arc<dyn PatchCatalog>) -> Self {
        self.catalog = catalog;
        self
    }

    /// Builds the context for a `run` from validated configuration. Patch
    /// details come from `PASTA_PATCH_DIR` when set, else from the manifest.
    pub fn from_config(config: &Config, manifest: &ManifestFile) -> PipelineResult<Self> {
        let Some(scores_path) = config.scores_path.as_ref() else {
            return Err(ConfigError::MissingSetting {
                name: "PASTA_SCORES",
            }
            .into());
        };
        let scorer = CachedScorer::with_capacity(
            TableScorer::from_file(scores_path)?,
            config.score_cache_capacity,
        );

        let catalog: Arc<dyn PatchCatalog> = match &config.patch_dir {
            Some(dir) => Arc::new(CachedCatalog::with_capacity(
                DirectoryCatalog::open(dir)?,
                config.catalog_capacity,
            )),
            None => Arc::new(manifest.catalog()),
        };

        Ok(Self::new(config.thresholds()?, Arc::new(scorer))
            .with_range(config.version_range())
            .with_pool(WorkerPool::new(config.workers))
            .with_catalog(catalog))
    }
}
