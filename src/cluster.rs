//! Cluster aggregates
//!
//! A [`Cluster`] is a non-owning group of candidates: member indices into the
//! event's candidate arena plus summary statistics computed by an explicit
//! [`finalize`](Cluster::finalize) step once membership is frozen. The
//! clustering engine only ever reassigns indices between groups; candidate
//! data is never copied during partitioning.

use serde::{Deserialize, Serialize};

use crate::candidate::{PFCandidate, VertexClass};

/// Recover the azimuth from a unit-circle embedding.
pub fn xy_to_phi(x: f32, y: f32) -> f32 {
    y.atan2(x)
}

/// A group of candidate references plus finalized summary statistics.
///
/// Aggregates are zero until [`finalize`](Cluster::finalize) runs; the
/// recursive splitter finalizes every leaf exactly once, after the full
/// recursion has returned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    members: Vec<usize>,
    sum_pt: f32,
    eta: f32,
    phi: f32,
    x: f32,
    y: f32,
    r: f32,
    hardch_pt: f32,
    puch_pt: f32,
}

impl Cluster {
    /// Wrap a frozen membership list.
    pub fn from_members(members: Vec<usize>) -> Self {
        Self {
            members,
            ..Self::default()
        }
    }

    /// Member indices into the event's candidate arena
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// True when the cluster has no members
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Total pt over members
    pub fn sum_pt(&self) -> f32 {
        self.sum_pt
    }

    /// pt-weighted mean eta
    pub fn eta(&self) -> f32 {
        self.eta
    }

    /// Azimuth of the pt-weighted mean direction
    pub fn phi(&self) -> f32 {
        self.phi
    }

    /// Unit-normalized mean direction, cos component
    pub fn x(&self) -> f32 {
        self.x
    }

    /// Unit-normalized mean direction, sin component
    pub fn y(&self) -> f32 {
        self.y
    }

    /// Worst-case spread: max over members of the squared (eta, x, y)
    /// displacement from the cluster mean. Not a physical angle.
    pub fn r(&self) -> f32 {
        self.r
    }

    /// pt sum over hard-scatter charged members
    pub fn hardch_pt(&self) -> f32 {
        self.hardch_pt
    }

    /// pt sum over pileup charged members
    pub fn puch_pt(&self) -> f32 {
        self.puch_pt
    }

    /// Compute the aggregates from the current membership.
    ///
    /// The mean direction is the pt-weighted sum of member (x, y),
    /// renormalized to unit length. A cluster whose total pt is zero falls
    /// back to unweighted means; a direction that still has no norm falls
    /// back to (1, 0). Leaves coming out of the splitter are never empty,
    /// but an empty cluster is a no-op here rather than a NaN factory.
    pub fn finalize(&mut self, arena: &[PFCandidate]) {
        if self.members.is_empty() {
            return;
        }

        let mut sum_pt = 0.0;
        let mut hardch_pt = 0.0;
        let mut puch_pt = 0.0;
        let mut eta_w = 0.0;
        let mut x_w = 0.0;
        let mut y_w = 0.0;

        for &i in &self.members {
            let p = &arena[i];
            sum_pt += p.pt;
            match p.vtx {
                VertexClass::Primary => hardch_pt += p.pt,
                VertexClass::Pileup => puch_pt += p.pt,
                VertexClass::Unassigned => {}
            }
            eta_w += p.pt * p.eta;
            x_w += p.pt * p.x;
            y_w += p.pt * p.y;
        }

        let (eta, mut x, mut y) = if sum_pt > 0.0 {
            (eta_w / sum_pt, x_w / sum_pt, y_w / sum_pt)
        } else {
            // zero-weight fallback: unweighted means keep the aggregates finite
            let n = self.members.len() as f32;
            let mut eta_sum = 0.0;
            let mut x_sum = 0.0;
            let mut y_sum = 0.0;
            for &i in &self.members {
                eta_sum += arena[i].eta;
                x_sum += arena[i].x;
                y_sum += arena[i].y;
            }
            (eta_sum / n, x_sum / n, y_sum / n)
        };

        let norm = (x * x + y * y).sqrt();
        if norm > 0.0 {
            x /= norm;
            y /= norm;
        } else {
            x = 1.0;
            y = 0.0;
        }

        let mut largest_dr = 0.0f32;
        for &i in &self.members {
            let p = &arena[i];
            let dr = (eta - p.eta).powi(2) + (x - p.x).powi(2) + (y - p.y).powi(2);
            if dr > largest_dr {
                largest_dr = dr;
            }
        }

        self.sum_pt = sum_pt;
        self.hardch_pt = hardch_pt;
        self.puch_pt = puch_pt;
        self.eta = eta;
        self.x = x;
        self.y = y;
        self.r = largest_dr;
        self.phi = xy_to_phi(x, y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::PFCandidate;

    #[test]
    fn test_sum_pt_and_weighted_eta() {
        // pt and eta chosen so the weighted mean is exact in f32
        let arena = vec![
            PFCandidate::new(3.0, 1.0, 0.0, 3.0),
            PFCandidate::new(1.0, -1.0, 0.0, 1.0),
        ];
        let mut c = Cluster::from_members(vec![0, 1]);
        c.finalize(&arena);

        assert_eq!(c.sum_pt(), 4.0);
        // (3*1 + 1*(-1)) / 4 = 0.5
        assert_eq!(c.eta(), 0.5);
    }

    #[test]
    fn test_direction_has_unit_norm() {
        let arena = vec![
            PFCandidate::new(5.0, 0.1, 0.3, 5.0),
            PFCandidate::new(2.0, 0.2, 1.1, 2.0),
            PFCandidate::new(1.0, 0.0, -0.4, 1.0),
        ];
        let mut c = Cluster::from_members(vec![0, 1, 2]);
        c.finalize(&arena);

        let norm = (c.x() * c.x() + c.y() * c.y()).sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
        assert!((c.phi() - c.y().atan2(c.x())).abs() < 1e-6);
    }

    #[test]
    fn test_singleton_radius_is_zero() {
        // exactly representable values so centroid == member bit-for-bit
        let arena = vec![PFCandidate::new(2.0, 0.5, 0.0, 2.0)];
        let mut c = Cluster::from_members(vec![0]);
        c.finalize(&arena);

        assert_eq!(c.r(), 0.0);
        assert_eq!(c.eta(), 0.5);
        assert_eq!(c.sum_pt(), 2.0);
    }

    #[test]
    fn test_vertex_class_pt_sums() {
        let arena = vec![
            PFCandidate::new(10.0, 0.0, 0.0, 10.0).with_identity(211.0, 1.0, 1.0), // primary
            PFCandidate::new(4.0, 0.0, 0.0, 4.0).with_identity(211.0, -1.0, 0.2), // pileup
            PFCandidate::new(3.0, 0.0, 0.0, 3.0).with_identity(22.0, 0.0, 1.0),   // neutral
        ];
        let mut c = Cluster::from_members(vec![0, 1, 2]);
        c.finalize(&arena);

        assert_eq!(c.hardch_pt(), 10.0);
        assert_eq!(c.puch_pt(), 4.0);
        assert_eq!(c.sum_pt(), 17.0);
    }

    #[test]
    fn test_zero_pt_cluster_is_finite() {
        let arena = vec![
            PFCandidate::new(0.0, 1.0, 0.0, 0.0),
            PFCandidate::new(0.0, 3.0, 0.0, 0.0),
        ];
        let mut c = Cluster::from_members(vec![0, 1]);
        c.finalize(&arena);

        assert!(c.eta().is_finite());
        assert!(c.x().is_finite() && c.y().is_finite());
        let norm = (c.x() * c.x() + c.y() * c.y()).sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
        // unweighted fallback
        assert_eq!(c.eta(), 2.0);
    }

    #[test]
    fn test_empty_cluster_finalize_is_noop() {
        let arena: Vec<PFCandidate> = Vec::new();
        let mut c = Cluster::from_members(Vec::new());
        c.finalize(&arena);
        assert_eq!(c.sum_pt(), 0.0);
        assert!(c.is_empty());
    }
}
