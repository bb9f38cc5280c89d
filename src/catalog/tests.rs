use std::collections::HashMap;
use std::fs;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tempfile::TempDir;

use super::*;
use crate::model::PatchId;

fn pid(s: &str) -> PatchId {
    PatchId::parse(s).unwrap()
}

struct CountingCatalog {
    inner: ManifestCatalog,
    lookups: AtomicUsize,
}

impl PatchCatalog for CountingCatalog {
    fn describe(&self, id: &PatchId) -> Option<Arc<PatchDetails>> {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        self.inner.describe(id)
    }
}

fn details(subject: &str) -> PatchDetails {
    PatchDetails {
        subject: subject.to_string(),
        author: None,
        body: String::new(),
    }
}

#[test]
fn test_details_from_text() {
    let parsed = PatchDetails::from_text("\n\n  mm: fix leak  \nline one\nline two");
    assert_eq!(parsed.subject, "mm: fix leak");
    assert_eq!(parsed.body, "line one\nline two");

    assert_eq!(PatchDetails::from_text("").subject, "");
}

#[test]
fn test_manifest_catalog_lookup() {
    let catalog = ManifestCatalog::new(HashMap::from([(pid("a"), details("first"))]));
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.describe(&pid("a")).unwrap().subject, "first");
    assert!(catalog.describe(&pid("b")).is_none());
}

#[test]
fn test_directory_catalog_reads_patch_files() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("abc123.patch"), "sched: tweak\n\ndiff --git").unwrap();

    let catalog = DirectoryCatalog::open(dir.path()).unwrap();
    let found = catalog.describe(&pid("abc123")).unwrap();
    assert_eq!(found.subject, "sched: tweak");
    assert!(catalog.describe(&pid("missing")).is_none());
}

#[test]
fn test_directory_catalog_refuses_escaping_ids() {
    let dir = TempDir::new().unwrap();
    let catalog = DirectoryCatalog::open(dir.path()).unwrap();

    assert!(matches!(
        catalog.path_for(&pid("../secret")),
        Err(CatalogError::UnsafeId { .. })
    ));
    assert!(catalog.path_for(&pid("<msg@host>")).is_ok());
}

#[test]
fn test_directory_catalog_requires_existing_root() {
    let dir = TempDir::new().unwrap();
    let result = DirectoryCatalog::open(dir.path().join("absent"));
    assert!(matches!(result, Err(CatalogError::Unreadable { .. })));
}

#[test]
fn test_cached_catalog_hits_inner_once() {
    let inner = CountingCatalog {
        inner: ManifestCatalog::new(HashMap::from([(pid("a"), details("first"))])),
        lookups: AtomicUsize::new(0),
    };
    let cached = CachedCatalog::with_capacity(inner, 16);

    assert!(cached.describe(&pid("a")).is_some());
    assert!(cached.describe(&pid("a")).is_some());
    assert_eq!(cached.inner().lookups.load(Ordering::Relaxed), 1);

    // misses are retried
    assert!(cached.describe(&pid("b")).is_none());
    assert!(cached.describe(&pid("b")).is_none());
    assert_eq!(cached.inner().lookups.load(Ordering::Relaxed), 3);
}

#[test]
fn test_cached_catalog_precache() {
    let inner = CountingCatalog {
        inner: ManifestCatalog::new(HashMap::from([
            (pid("a"), details("first")),
            (pid("b"), details("second")),
        ])),
        lookups: AtomicUsize::new(0),
    };
    let cached = CachedCatalog::new(inner);

    cached.precache(&[pid("a"), pid("b"), pid("c")]);
    assert_eq!(cached.entry_count(), 2);

    assert_eq!(cached.describe(&pid("b")).unwrap().subject, "second");
    assert_eq!(cached.inner().lookups.load(Ordering::Relaxed), 3);
}
