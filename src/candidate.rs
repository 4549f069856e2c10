//! Particle-flow candidate records
//!
//! A [`PFCandidate`] is one detector-reconstructed candidate: kinematics
//! (pt, eta, phi, energy), provenance (pileup weight, type code, hard-scatter
//! fraction, vertex association), and the cluster stamps that the sequencing
//! stage fills in after the event has been clustered.
//!
//! The azimuth is carried twice: as the angle `phi` and as its unit-circle
//! embedding `(x, y) = (cos phi, sin phi)`. The embedding is what the
//! clustering engine measures distances in, so it is derived once at
//! construction and never mutated independently of `phi`.

use serde::{Deserialize, Serialize};

/// Vertex association of a candidate.
///
/// Charged candidates are split by their hard-scatter fraction: a fraction of
/// exactly 1 means the track points at the primary vertex, anything else is
/// pileup. Neutral candidates carry no track and stay unassigned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VertexClass {
    /// Neutral candidate, no vertex association
    #[default]
    Unassigned,
    /// Charged, compatible with the hard-scatter vertex
    Primary,
    /// Charged, from a pileup vertex
    Pileup,
}

impl VertexClass {
    /// Derive the class from a charge indicator and the hard-scatter fraction.
    pub fn from_charge_hardfrac(charge: f32, hardfrac: f32) -> Self {
        if charge == 0.0 {
            Self::Unassigned
        } else if hardfrac == 1.0 {
            Self::Primary
        } else {
            Self::Pileup
        }
    }

    /// Numeric label used in the output arrays: -1 / 0 / 1.
    pub fn label(&self) -> f32 {
        match self {
            Self::Unassigned => -1.0,
            Self::Primary => 0.0,
            Self::Pileup => 1.0,
        }
    }
}

/// True for electron/muon type codes (|pdgid| 11 or 13).
pub fn is_lepton_pdgid(pdgid: f32) -> bool {
    let id = pdgid.abs();
    id == 11.0 || id == 13.0
}

/// One particle-flow candidate.
///
/// Created when an event is loaded; the `cluster_*` fields stay at their
/// sentinel values until the flattening stage stamps them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PFCandidate {
    /// Transverse momentum (>= 0)
    pub pt: f32,
    /// Pseudorapidity
    pub eta: f32,
    /// Azimuth, periodic with period 2 pi
    pub phi: f32,
    /// cos(phi), unit-circle embedding of the azimuth
    pub x: f32,
    /// sin(phi)
    pub y: f32,
    /// Energy
    pub e: f32,
    /// Pileup-discrimination weight
    pub puppi: f32,
    /// Particle type code
    pub pdgid: f32,
    /// Hard-scatter fraction weight
    pub hardfrac: f32,
    /// Vertex association
    pub vtx: VertexClass,
    /// Event-level pileup-vertex count
    pub npv: f32,
    /// Isolated-lepton flag
    pub isolep: bool,
    /// Position of the owning cluster in the tour, -1 until stamped
    pub cluster_idx: i32,
    /// Owning cluster's worst-case spread
    pub cluster_r: f32,
    /// Owning cluster's hard-scatter charged pt sum
    pub cluster_hardch_pt: f32,
    /// Owning cluster's pileup charged pt sum
    pub cluster_puch_pt: f32,
}

impl Default for PFCandidate {
    fn default() -> Self {
        Self {
            pt: 0.0,
            eta: 0.0,
            phi: 0.0,
            x: 1.0,
            y: 0.0,
            e: 0.0,
            puppi: 1.0,
            pdgid: 0.0,
            hardfrac: 1.0,
            vtx: VertexClass::Unassigned,
            npv: 0.0,
            isolep: false,
            cluster_idx: -1,
            cluster_r: 0.0,
            cluster_hardch_pt: 0.0,
            cluster_puch_pt: 0.0,
        }
    }
}

impl PFCandidate {
    /// Create a candidate from its kinematics. The unit-circle embedding is
    /// derived here and nowhere else.
    pub fn new(pt: f32, eta: f32, phi: f32, e: f32) -> Self {
        Self {
            pt,
            eta,
            phi,
            x: phi.cos(),
            y: phi.sin(),
            e,
            ..Self::default()
        }
    }

    /// Set the type code, charge indicator and hard-scatter fraction,
    /// deriving the vertex class.
    pub fn with_identity(mut self, pdgid: f32, charge: f32, hardfrac: f32) -> Self {
        self.pdgid = pdgid;
        self.hardfrac = hardfrac;
        self.vtx = VertexClass::from_charge_hardfrac(charge, hardfrac);
        self
    }

    /// Set the pileup-discrimination weight
    pub fn with_puppi(mut self, puppi: f32) -> Self {
        self.puppi = puppi;
        self
    }

    /// Set the event-level pileup-vertex count
    pub fn with_npv(mut self, npv: f32) -> Self {
        self.npv = npv;
        self
    }

    /// Isolated-lepton rule: electron/muon type code, pt above threshold,
    /// and pt exactly equal to one of the selected-lepton pts. The exact
    /// float comparison is the deciding rule; the selected pts are read from
    /// the same source as the candidate's, so a match is bit-for-bit.
    pub fn is_isolated_lepton(&self, pt_min: f32, selected_pts: &[f32]) -> bool {
        is_lepton_pdgid(self.pdgid) && self.pt > pt_min && selected_pts.iter().any(|&s| s == self.pt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_unit_circle_embedding() {
        for phi in [-PI, -1.3, 0.0, 0.05, 1.0, 3.0] {
            let p = PFCandidate::new(10.0, 0.5, phi, 12.0);
            assert!((p.x * p.x + p.y * p.y - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_vertex_class_derivation() {
        assert_eq!(VertexClass::from_charge_hardfrac(0.0, 1.0), VertexClass::Unassigned);
        assert_eq!(VertexClass::from_charge_hardfrac(1.0, 1.0), VertexClass::Primary);
        assert_eq!(VertexClass::from_charge_hardfrac(-1.0, 0.3), VertexClass::Pileup);
        assert_eq!(VertexClass::from_charge_hardfrac(0.0, 0.3), VertexClass::Unassigned);
    }

    #[test]
    fn test_vertex_class_labels() {
        assert_eq!(VertexClass::Unassigned.label(), -1.0);
        assert_eq!(VertexClass::Primary.label(), 0.0);
        assert_eq!(VertexClass::Pileup.label(), 1.0);
    }

    #[test]
    fn test_isolated_lepton_exact_match() {
        let p = PFCandidate::new(25.5, 0.0, 0.0, 25.5).with_identity(11.0, -1.0, 1.0);
        assert!(p.is_isolated_lepton(10.0, &[25.5, 40.0]));
        // close is not equal
        assert!(!p.is_isolated_lepton(10.0, &[25.51, 40.0]));
        // below threshold never matches
        let soft = PFCandidate::new(5.0, 0.0, 0.0, 5.0).with_identity(13.0, 1.0, 1.0);
        assert!(!soft.is_isolated_lepton(10.0, &[5.0]));
        // hadrons never match
        let pion = PFCandidate::new(25.5, 0.0, 0.0, 25.5).with_identity(211.0, 1.0, 1.0);
        assert!(!pion.is_isolated_lepton(10.0, &[25.5]));
    }

    #[test]
    fn test_default_is_padding_sentinel() {
        let p = PFCandidate::default();
        assert_eq!(p.cluster_idx, -1);
        assert_eq!(p.vtx, VertexClass::Unassigned);
        assert_eq!(p.pt, 0.0);
        assert!((p.x * p.x + p.y * p.y - 1.0).abs() < 1e-6);
    }
}
