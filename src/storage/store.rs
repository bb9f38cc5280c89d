use std::fs;
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};

use rkyv::rancor::Error as RkyvError;
use rkyv::to_bytes;
use tracing::{debug, info, warn};

use crate::hashing::{DIGEST_LEN, content_digest, digest_hex};
use crate::model::{PairKey, PatchId};
use crate::registry::{DecisionState, EquivalenceRegistry, RejectionCache};

use super::atomic::write_atomic;
use super::error::{StorageError, StorageResult};
use super::mmap::MmapFileHandle;
use super::model::{ArchivedPairSnapshot, PairSnapshot, SNAPSHOT_FORMAT_VERSION, SnapshotPair};
use super::text::{parse_pairs, render_pairs};

const SIMILAR_STEM: &str = "similar-patches";
const REJECTED_STEM: &str = "false-positives";
const TEXT_EXTENSION: &str = "txt";
const SNAPSHOT_EXTENSION: &str = "rkyv";

const SIMILAR_HEADER: &str = "confirmed equivalent patch pairs (left right)";
const REJECTED_HEADER: &str = "confirmed distinct patch pairs (left right)";

/// File locations of both decision stores under one data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreLayout {
    root: PathBuf,
}

impl StoreLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn similar_text(&self) -> PathBuf {
        self.file(SIMILAR_STEM, TEXT_EXTENSION)
    }

    pub fn similar_snapshot(&self) -> PathBuf {
        self.file(SIMILAR_STEM, SNAPSHOT_EXTENSION)
    }

    pub fn rejected_text(&self) -> PathBuf {
        self.file(REJECTED_STEM, TEXT_EXTENSION)
    }

    pub fn rejected_snapshot(&self) -> PathBuf {
        self.file(REJECTED_STEM, SNAPSHOT_EXTENSION)
    }

    fn file(&self, stem: &str, extension: &str) -> PathBuf {
        self.root.join(format!("{}.{}", stem, extension))
    }

    pub fn ensure_root(&self) -> StorageResult<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(|_| StorageError::DataDirUnavailable {
                path: self.root.clone(),
            })?;
        }
        Ok(())
    }
}

/// A pair list stored twice: authoritative text plus a validated binary snapshot.
#[derive(Debug, Clone)]
pub struct PairStore {
    text_path: PathBuf,
    snapshot_path: PathBuf,
    header: &'static str,
}

impl PairStore {
    pub fn new(text_path: PathBuf, snapshot_path: PathBuf, header: &'static str) -> Self {
        Self {
            text_path,
            snapshot_path,
            header,
        }
    }

    pub fn text_path(&self) -> &Path {
        &self.text_path
    }

    pub fn snapshot_path(&self) -> &Path {
        &self.snapshot_path
    }

    /// Loads the stored pairs. Missing files mean an empty store.
    ///
    /// A snapshot is trusted only if it validates and was written from the
    /// current text bytes; otherwise the text is parsed. Without a text file a
    /// valid snapshot is used on its own.
    pub fn load(&self) -> StorageResult<Vec<PairKey>> {
        let text = read_optional(&self.text_path)?;
        let snapshot = self.read_snapshot();

        let Some(text) = text else {
            return match snapshot {
                Ok(Some((_, pairs))) => {
                    warn!(
                        path = %self.text_path.display(),
                        pairs = pairs.len(),
                        "Text store missing, using snapshot"
                    );
                    Ok(pairs)
                }
                Ok(None) => {
                    debug!(path = %self.text_path.display(), "No stored pairs, starting empty");
                    Ok(Vec::new())
                }
                Err(e) => Err(e),
            };
        };

        let digest = content_digest(&text);
        match snapshot {
            Ok(Some((stored, pairs))) if stored == digest => {
                debug!(
                    path = %self.snapshot_path.display(),
                    pairs = pairs.len(),
                    "Loaded pairs from snapshot"
                );
                return Ok(pairs);
            }
            Ok(Some(_)) => {
                info!(path = %self.snapshot_path.display(), "Snapshot is stale, parsing text store");
            }
            Ok(None) => {
                debug!(path = %self.snapshot_path.display(), "No snapshot, parsing text store");
            }
            Err(e) => {
                warn!(error = %e, "Snapshot invalid, parsing text store");
            }
        }

        let pairs = parse_pairs(Cursor::new(text), &self.text_path)?;
        debug!(path = %self.text_path.display(), pairs = pairs.len(), "Parsed text store");
        Ok(pairs)
    }

    /// Writes the text form, then a snapshot stamped with its digest.
    pub fn save(&self, pairs: &[PairKey]) -> StorageResult<()> {
        let text = render_pairs(self.header, pairs);
        write_atomic(&self.text_path, text.as_bytes())?;

        let digest = content_digest(text.as_bytes());
        let snapshot = PairSnapshot::new(
            digest,
            pairs
                .iter()
                .map(|pair| SnapshotPair {
                    low: pair.low().to_string(),
                    high: pair.high().to_string(),
                })
                .collect(),
        );
        let bytes = to_bytes::<RkyvError>(&snapshot)
            .map_err(|e| StorageError::Serialization(format!("{:?}", e)))?;
        write_atomic(&self.snapshot_path, &bytes)?;

        debug!(
            path = %self.text_path.display(),
            pairs = pairs.len(),
            digest = %digest_hex(&digest),
            "Saved pair store"
        );
        Ok(())
    }

    /// `Ok(None)` when no snapshot exists; an error when one exists but is unusable.
    fn read_snapshot(&self) -> StorageResult<Option<([u8; DIGEST_LEN], Vec<PairKey>)>> {
        if !self.snapshot_path.exists() {
            return Ok(None);
        }

        let unusable = |reason: String| StorageError::Snapshot {
            path: self.snapshot_path.clone(),
            reason,
        };

        let handle = MmapFileHandle::open(&self.snapshot_path).map_err(|e| unusable(e.to_string()))?;
        let archived = handle
            .access_archived::<ArchivedPairSnapshot>()
            .map_err(|e| unusable(e.to_string()))?;

        let version = archived.format_version.to_native();
        if version != SNAPSHOT_FORMAT_VERSION {
            return Err(unusable(format!(
                "format version {} (expected {})",
                version, SNAPSHOT_FORMAT_VERSION
            )));
        }

        let pairs = archived
            .pairs
            .iter()
            .map(|pair| {
                let low = PatchId::parse(pair.low.as_str())?;
                let high = PatchId::parse(pair.high.as_str())?;
                PairKey::new(low, high)
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| unusable(e.to_string()))?;

        Ok(Some((archived.source_digest, pairs)))
    }
}

fn read_optional(path: &Path) -> StorageResult<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Durable home of the Equivalence Registry and the Rejection Cache.
#[derive(Debug, Clone)]
pub struct DecisionStore {
    layout: StoreLayout,
    similar: PairStore,
    rejected: PairStore,
}

impl DecisionStore {
    /// Prepares the data directory. Nothing is read until [`load`](Self::load).
    pub fn open(layout: StoreLayout) -> StorageResult<Self> {
        layout.ensure_root()?;
        let similar = PairStore::new(
            layout.similar_text(),
            layout.similar_snapshot(),
            SIMILAR_HEADER,
        );
        let rejected = PairStore::new(
            layout.rejected_text(),
            layout.rejected_snapshot(),
            REJECTED_HEADER,
        );
        Ok(Self {
            layout,
            similar,
            rejected,
        })
    }

    pub fn layout(&self) -> &StoreLayout {
        &self.layout
    }

    /// Loads both stores and checks them against each other.
    pub fn load(&self) -> StorageResult<DecisionState> {
        let registry = EquivalenceRegistry::from_persisted_form(self.similar.load()?);
        let rejections = RejectionCache::from_persisted_form(self.rejected.load()?);

        info!(
            patches = registry.len(),
            edges = registry.edge_count(),
            rejected = rejections.len(),
            "Loaded decision stores"
        );

        Ok(DecisionState::new(registry, rejections)?)
    }

    pub fn flush(&self, state: &DecisionState) -> StorageResult<()> {
        self.similar.save(state.registry().to_persisted_form())?;
        self.rejected.save(state.rejections().to_persisted_form())?;
        Ok(())
    }
}
