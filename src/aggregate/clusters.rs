use std::collections::{BTreeSet, HashSet};

use serde::Serialize;

use crate::model::PatchId;
use crate::registry::EquivalenceRegistry;

/// One cluster split into downstream patches and upstream commits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitCluster {
    /// Position in [`split_clusters`] output; stable for a given registry.
    pub id: usize,
    pub downstream: BTreeSet<PatchId>,
    pub upstream: BTreeSet<PatchId>,
}

/// Splits every cluster by membership in `upstream`.
///
/// Ids of `upstream` or `downstream` that belong to no cluster follow as
/// singletons, sorted by id. An id listed in both sets counts as upstream.
pub fn split_clusters(
    registry: &EquivalenceRegistry,
    upstream: &HashSet<PatchId>,
    downstream: &HashSet<PatchId>,
) -> Vec<SplitCluster> {
    let mut split: Vec<SplitCluster> = registry
        .clusters()
        .into_iter()
        .map(|members| {
            let (up, down): (BTreeSet<PatchId>, BTreeSet<PatchId>) =
                members.into_iter().partition(|id| upstream.contains(id));
            (down, up)
        })
        .enumerate()
        .map(|(id, (downstream, upstream))| SplitCluster {
            id,
            downstream,
            upstream,
        })
        .collect();

    let mut loose: Vec<(&PatchId, bool)> = upstream
        .iter()
        .map(|id| (id, true))
        .chain(
            downstream
                .iter()
                .filter(|id| !upstream.contains(*id))
                .map(|id| (id, false)),
        )
        .filter(|(id, _)| registry.cluster_size(id) < 2)
        .collect();
    loose.sort();

    for (id, is_upstream) in loose {
        let single = BTreeSet::from([id.clone()]);
        let (downstream, upstream) = if is_upstream {
            (BTreeSet::new(), single)
        } else {
            (single, BTreeSet::new())
        };
        split.push(SplitCluster {
            id: split.len(),
            downstream,
            upstream,
        });
    }

    split
}

/// Clusters counted by how many downstream patch versions they hold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PatchVersionCounts {
    pub without_patches: usize,
    pub single_patch_version: usize,
    pub two_patch_versions: usize,
}

impl PatchVersionCounts {
    pub fn from_clusters(clusters: &[SplitCluster]) -> Self {
        Self {
            without_patches: with_patch_count(clusters, 0),
            single_patch_version: with_patch_count(clusters, 1),
            two_patch_versions: with_patch_count(clusters, 2),
        }
    }
}

/// Number of clusters with exactly `n` downstream patches.
pub fn with_patch_count(clusters: &[SplitCluster], n: usize) -> usize {
    clusters.iter().filter(|c| c.downstream.len() == n).count()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CommitCounts {
    /// Patch clusters that never made it upstream.
    pub clusters_without_commits: usize,
    /// Patch clusters that map to exactly one upstream commit.
    pub clusters_with_one_commit: usize,
}

impl CommitCounts {
    pub fn from_clusters(clusters: &[SplitCluster]) -> Self {
        Self {
            clusters_without_commits: clusters.iter().filter(|c| c.upstream.is_empty()).count(),
            clusters_with_one_commit: clusters
                .iter()
                .filter(|c| c.upstream.len() == 1 && !c.downstream.is_empty())
                .count(),
        }
    }
}
