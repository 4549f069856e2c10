//! Recursive splitter
//!
//! Applies the fixed-K partitioner recursively until every leaf group is
//! within the leaf size bound or the depth bound, then finalizes every leaf
//! exactly once. The leaves partition the input: every candidate index lands
//! in exactly one leaf.
//!
//! The size/depth guard runs at the entry of every recursion level, so a
//! group already within the leaf bound is kept whole without invoking the
//! partitioner at all. That covers the whole-event case (an event with fewer
//! candidates than the leaf bound produces a single leaf) and guarantees the
//! partitioner never sees a group smaller than its fan-out as long as the
//! leaf bound is at least the fan-out.

use rand::Rng;

use crate::candidate::PFCandidate;
use crate::cluster::Cluster;
use crate::error::SequencerError;
use crate::kmeans::KMeans;
use crate::SequencerResult;

/// Recursive K-way splitter with a leaf size bound and an optional depth
/// bound.
#[derive(Debug, Clone)]
pub struct HierarchicalOrdering {
    fan_out: usize,
    leaf_size: usize,
    max_depth: Option<u32>,
    kmeans: KMeans,
}

impl HierarchicalOrdering {
    /// Create a splitter with fan-out `fan_out`, leaf bound `leaf_size`, and
    /// `iterations` relaxation rounds per split. The depth bound starts
    /// disabled.
    pub fn new(fan_out: usize, leaf_size: usize, iterations: usize) -> Self {
        Self {
            fan_out,
            leaf_size,
            max_depth: None,
            kmeans: KMeans::new(fan_out, iterations),
        }
    }

    /// Bound the recursion to `depth` split levels. Depth 0 means the input
    /// is kept as a single leaf regardless of size.
    pub fn with_max_depth(mut self, depth: u32) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Fan-out per split
    pub fn fan_out(&self) -> usize {
        self.fan_out
    }

    /// Leaf size bound
    pub fn leaf_size(&self) -> usize {
        self.leaf_size
    }

    /// Split the whole event into finalized leaf clusters.
    pub fn fit<R: Rng>(
        &self,
        arena: &[PFCandidate],
        rng: &mut R,
    ) -> SequencerResult<Vec<Cluster>> {
        if arena.is_empty() {
            return Err(SequencerError::EmptyEvent);
        }

        let members: Vec<usize> = (0..arena.len()).collect();
        let mut leaves = Vec::new();
        self.split(arena, members, 0, rng, &mut leaves)?;

        for leaf in &mut leaves {
            leaf.finalize(arena);
        }
        Ok(leaves)
    }

    fn split<R: Rng>(
        &self,
        arena: &[PFCandidate],
        members: Vec<usize>,
        depth: u32,
        rng: &mut R,
        leaves: &mut Vec<Cluster>,
    ) -> SequencerResult<()> {
        let depth_reached = self.max_depth.map_or(false, |d| depth >= d);
        if members.len() <= self.leaf_size || depth_reached {
            leaves.push(Cluster::from_members(members));
            return Ok(());
        }

        let groups = self.kmeans.fit(arena, &members, rng)?;
        for group in groups {
            // a relaxation round can strand a centroid with nothing nearby
            if group.is_empty() {
                continue;
            }
            self.split(arena, group, depth + 1, rng, leaves)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn event(n: usize) -> Vec<PFCandidate> {
        (0..n)
            .map(|i| {
                let t = i as f32;
                PFCandidate::new(
                    100.0 - t,
                    -2.5 + 5.0 * t / n as f32,
                    -3.0 + 6.0 * (t * 0.37).fract(),
                    100.0,
                )
            })
            .collect()
    }

    fn assert_exact_partition(leaves: &[Cluster], n: usize) {
        let mut seen: Vec<usize> = leaves.iter().flat_map(|c| c.members().iter().copied()).collect();
        seen.sort_unstable();
        let expected: Vec<usize> = (0..n).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_leaves_partition_input_exactly() {
        let arena = event(137);
        let mut rng = StdRng::seed_from_u64(9);
        let leaves = HierarchicalOrdering::new(4, 10, 20).fit(&arena, &mut rng).unwrap();

        assert_exact_partition(&leaves, arena.len());
        assert!(leaves.iter().all(|c| !c.is_empty()));
    }

    #[test]
    fn test_small_event_is_a_single_leaf() {
        let arena = event(7);
        let mut rng = StdRng::seed_from_u64(1);
        let ordering = HierarchicalOrdering::new(4, 10, 20);
        assert_eq!(ordering.fan_out(), 4);
        assert_eq!(ordering.leaf_size(), 10);
        let leaves = ordering.fit(&arena, &mut rng).unwrap();

        assert_eq!(leaves.len(), 1);
        assert_eq!(leaves[0].len(), 7);
    }

    #[test]
    fn test_depth_zero_keeps_everything_together() {
        let arena = event(80);
        let mut rng = StdRng::seed_from_u64(2);
        let leaves = HierarchicalOrdering::new(4, 10, 20)
            .with_max_depth(0)
            .fit(&arena, &mut rng)
            .unwrap();

        assert_eq!(leaves.len(), 1);
        assert_eq!(leaves[0].len(), 80);
    }

    #[test]
    fn test_depth_one_splits_once() {
        let arena = event(80);
        let mut rng = StdRng::seed_from_u64(2);
        let leaves = HierarchicalOrdering::new(4, 10, 20)
            .with_max_depth(1)
            .fit(&arena, &mut rng)
            .unwrap();

        // one round of fan-out 4, no recursion into oversized children
        assert!(leaves.len() <= 4);
        assert_exact_partition(&leaves, arena.len());
    }

    #[test]
    fn test_leaves_are_finalized() {
        let arena = event(60);
        let mut rng = StdRng::seed_from_u64(17);
        let leaves = HierarchicalOrdering::new(4, 10, 20).fit(&arena, &mut rng).unwrap();

        for leaf in &leaves {
            assert!(leaf.sum_pt() > 0.0);
            let norm = (leaf.x() * leaf.x() + leaf.y() * leaf.y()).sqrt();
            assert!((norm - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_empty_event_is_an_error() {
        let arena: Vec<PFCandidate> = Vec::new();
        let mut rng = StdRng::seed_from_u64(0);
        let err = HierarchicalOrdering::new(4, 10, 20).fit(&arena, &mut rng).unwrap_err();
        assert!(matches!(err, SequencerError::EmptyEvent));
    }
}
