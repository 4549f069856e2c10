//! Tour building and flattening
//!
//! Once the splitter has produced finalized leaf clusters, the tour orders
//! them so that adjacent output positions correspond to adjacent detector
//! regions: start at the highest-pt cluster and greedily chain to the
//! spatially nearest remaining one. The flattener then walks the tour,
//! stamps every member with its cluster's index and aggregates, and resizes
//! the sequence to the fixed target length.

use crate::candidate::PFCandidate;
use crate::cluster::Cluster;

/// Squared (eta, phi) distance between two finalized clusters.
///
/// Phi is the angle recovered from each cluster's unit direction and the
/// difference is taken unwrapped, with no shortest-arc correction on the
/// circle. This matches the reference behavior; a wrapped distance would
/// change tours for clusters straddling +/- pi.
#[inline]
fn tour_distance2(a: &Cluster, b: &Cluster) -> f32 {
    (a.eta() - b.eta()).powi(2) + (a.phi() - b.phi()).powi(2)
}

/// Order leaf clusters into a greedy nearest-neighbor tour.
///
/// The tour is seeded at the cluster with the greatest total pt (stable sort,
/// so equal-pt clusters keep discovery order) and repeatedly appends the
/// remaining cluster closest to the last appended one, ties going to the
/// first-encountered index. O(n^2) in the number of leaves, which is small
/// relative to the number of candidates.
pub fn build_tour(mut clusters: Vec<Cluster>) -> Vec<Cluster> {
    if clusters.is_empty() {
        return clusters;
    }

    clusters.sort_by(|a, b| {
        b.sum_pt()
            .partial_cmp(&a.sum_pt())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut tour = Vec::with_capacity(clusters.len());
    let mut pool = clusters;
    tour.push(pool.remove(0));

    while !pool.is_empty() {
        let last = tour.last().expect("tour is seeded");
        let mut best = 0;
        let mut best_d2 = f32::INFINITY;
        for (j, candidate) in pool.iter().enumerate() {
            let d2 = tour_distance2(last, candidate);
            if d2 < best_d2 {
                best_d2 = d2;
                best = j;
            }
        }
        tour.push(pool.remove(best));
    }

    tour
}

/// Flatten the tour into a fixed-length sequence.
///
/// Members are stamped in place in the arena (cluster index is the cluster's
/// 0-based position in the tour, plus the cluster's spread and charged-pt
/// aggregates) and appended in tour-then-member order. The result is then
/// resized to `target_len`: shorter sequences are padded with default
/// candidates (zeroed, sentinel cluster index and vertex class), longer ones
/// are truncated from the tail, so the clusters visited last drop first.
pub fn flatten(tour: &[Cluster], arena: &mut [PFCandidate], target_len: usize) -> Vec<PFCandidate> {
    let mut out = Vec::with_capacity(target_len.max(arena.len()));

    for (tour_idx, cluster) in tour.iter().enumerate() {
        for &i in cluster.members() {
            let p = &mut arena[i];
            p.cluster_idx = tour_idx as i32;
            p.cluster_r = cluster.r();
            p.cluster_hardch_pt = cluster.hardch_pt();
            p.cluster_puch_pt = cluster.puch_pt();
            out.push(p.clone());
        }
    }

    out.resize(target_len, PFCandidate::default());
    out
}
