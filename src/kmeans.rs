//! Fixed-K Lloyd partitioner over the (eta, x, y) embedding
//!
//! Splits a set of candidates into exactly K spatial groups. Distances are
//! squared Euclidean in the 3-dimensional (eta, cos phi, sin phi) embedding,
//! which keeps the azimuth periodic without any wraparound bookkeeping.
//!
//! The relaxation runs a fixed number of rounds with no convergence test:
//! assignment to the nearest centroid (lowest index wins ties), then an
//! *unweighted* mean update with the (x, y) component renormalized to unit
//! length. The pt-weighted aggregates come later, in
//! [`Cluster::finalize`](crate::cluster::Cluster::finalize); the partitioner
//! deliberately treats every candidate equally.

use rand::Rng;

use crate::candidate::PFCandidate;
use crate::error::SequencerError;
use crate::SequencerResult;

/// Ephemeral (eta, x, y) representative point. Lives only for the duration
/// of one [`KMeans::fit`] call.
#[derive(Debug, Clone, Copy)]
struct Centroid {
    eta: f32,
    x: f32,
    y: f32,
}

impl Centroid {
    fn from_candidate(p: &PFCandidate) -> Self {
        Self {
            eta: p.eta,
            x: p.x,
            y: p.y,
        }
    }

    /// Squared Euclidean distance in the embedding space
    #[inline]
    fn distance2(&self, p: &PFCandidate) -> f32 {
        (self.eta - p.eta).powi(2) + (self.x - p.x).powi(2) + (self.y - p.y).powi(2)
    }
}

/// Fixed-K partitioner with a fixed iteration count.
#[derive(Debug, Clone)]
pub struct KMeans {
    k: usize,
    iterations: usize,
}

impl KMeans {
    /// Create a partitioner producing `k` groups after `iterations` rounds.
    pub fn new(k: usize, iterations: usize) -> Self {
        Self { k, iterations }
    }

    /// Number of groups produced per fit
    pub fn k(&self) -> usize {
        self.k
    }

    /// Partition `members` (indices into `arena`) into exactly K disjoint
    /// groups covering all inputs.
    ///
    /// Fails with [`SequencerError::TooFewParticles`] when fewer than K
    /// members are passed in; the distinct-seed sampling below could not
    /// terminate otherwise, and an input that small is a caller bug.
    pub fn fit<R: Rng>(
        &self,
        arena: &[PFCandidate],
        members: &[usize],
        rng: &mut R,
    ) -> SequencerResult<Vec<Vec<usize>>> {
        if members.len() < self.k {
            return Err(SequencerError::TooFewParticles {
                needed: self.k,
                got: members.len(),
            });
        }

        // Seed centroids from K distinct members, sampled uniformly with
        // rejection on duplicates.
        let mut seeds: Vec<usize> = Vec::with_capacity(self.k);
        let mut centroids: Vec<Centroid> = Vec::with_capacity(self.k);
        while seeds.len() < self.k {
            let pick = rng.gen_range(0..members.len());
            if !seeds.contains(&pick) {
                seeds.push(pick);
                centroids.push(Centroid::from_candidate(&arena[members[pick]]));
            }
        }

        let mut groups: Vec<Vec<usize>> = vec![Vec::new(); self.k];
        for _ in 0..self.iterations {
            self.assign(arena, members, &centroids, &mut groups);
            self.update(arena, members, &mut centroids, &groups, rng);
        }

        Ok(groups)
    }

    /// Assignment step: every member goes to its nearest centroid, ties to
    /// the lowest centroid index.
    fn assign(
        &self,
        arena: &[PFCandidate],
        members: &[usize],
        centroids: &[Centroid],
        groups: &mut [Vec<usize>],
    ) {
        for group in groups.iter_mut() {
            group.clear();
        }

        for &idx in members {
            let p = &arena[idx];
            let mut closest = 0;
            let mut closest_d2 = f32::INFINITY;
            for (i, c) in centroids.iter().enumerate() {
                let d2 = c.distance2(p);
                if d2 < closest_d2 {
                    closest_d2 = d2;
                    closest = i;
                }
            }
            groups[closest].push(idx);
        }
    }

    /// Update step: unweighted arithmetic mean of each group's (eta, x, y),
    /// with (x, y) renormalized to the unit circle. Eta stays as-is.
    ///
    /// A centroid stranded with no members is re-seeded from a uniformly
    /// sampled member instead of dividing by zero, so every round keeps K
    /// live, finite centroids.
    fn update<R: Rng>(
        &self,
        arena: &[PFCandidate],
        members: &[usize],
        centroids: &mut [Centroid],
        groups: &[Vec<usize>],
        rng: &mut R,
    ) {
        for (i, group) in groups.iter().enumerate() {
            if group.is_empty() {
                let pick = members[rng.gen_range(0..members.len())];
                centroids[i] = Centroid::from_candidate(&arena[pick]);
                continue;
            }

            let n = group.len() as f32;
            let mut eta_sum = 0.0;
            let mut x_sum = 0.0;
            let mut y_sum = 0.0;
            for &idx in group {
                let p = &arena[idx];
                eta_sum += p.eta;
                x_sum += p.x;
                y_sum += p.y;
            }

            let mut x = x_sum / n;
            let mut y = y_sum / n;
            let r = (x * x + y * y).sqrt();
            // opposite unit vectors can cancel exactly
            if r > 0.0 {
                x /= r;
                y /= r;
            }

            centroids[i] = Centroid {
                eta: eta_sum / n,
                x,
                y,
            };
        }
    }
}
