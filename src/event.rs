//! Event input and output records
//!
//! The sequencer reads one [`EventInput`] per event (candidate scalars plus
//! the generator and lepton collections the observables stage consumes) and
//! writes one [`EventOutput`]: a struct-of-arrays with one fixed-length
//! column per candidate field, in tour-then-member order, plus the scalar
//! [`EventSummary`]. Reading and writing the surrounding storage format is
//! the caller's concern; these records only define the shape of the data.

use serde::{Deserialize, Serialize};

use crate::candidate::PFCandidate;
use crate::observables::{EventSummary, GenJet, GenParticle, RecoLepton, ZBoson, MISSING};

fn one() -> f32 {
    1.0
}

fn missing() -> f32 {
    MISSING
}

/// Scalars for one particle-flow candidate as read from the event source.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CandidateInput {
    pub pt: f32,
    pub eta: f32,
    pub phi: f32,
    pub e: f32,
    #[serde(default = "one")]
    pub puppi: f32,
    #[serde(default = "one")]
    pub hardfrac: f32,
    #[serde(default)]
    pub pdgid: f32,
    #[serde(default)]
    pub charge: f32,
}

impl Default for CandidateInput {
    fn default() -> Self {
        Self {
            pt: 0.0,
            eta: 0.0,
            phi: 0.0,
            e: 0.0,
            puppi: 1.0,
            hardfrac: 1.0,
            pdgid: 0.0,
            charge: 0.0,
        }
    }
}

/// One event as read from the event source.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EventInput {
    /// Pileup-vertex count, copied onto every candidate
    #[serde(default)]
    pub npv: f32,
    /// Particle-flow candidates
    pub candidates: Vec<CandidateInput>,
    /// Generator-level missing transverse energy
    #[serde(default = "missing")]
    pub gen_met: f32,
    #[serde(default = "missing")]
    pub gen_met_phi: f32,
    /// Generator particles feeding the recoil sum
    #[serde(default)]
    pub gen_particles: Vec<GenParticle>,
    /// Reconstructed electron collection, leading entry first
    #[serde(default)]
    pub electrons: Vec<RecoLepton>,
    /// Reconstructed muon collection, leading entry first
    #[serde(default)]
    pub muons: Vec<RecoLepton>,
    /// Generator jets, leading entry first
    #[serde(default)]
    pub gen_jets: Vec<GenJet>,
    /// Generator-level Z boson, when present
    #[serde(default)]
    pub gen_z: Option<ZBoson>,
}

impl Default for EventInput {
    fn default() -> Self {
        Self {
            npv: 0.0,
            candidates: Vec::new(),
            gen_met: MISSING,
            gen_met_phi: MISSING,
            gen_particles: Vec::new(),
            electrons: Vec::new(),
            muons: Vec::new(),
            gen_jets: Vec::new(),
            gen_z: None,
        }
    }
}

impl EventInput {
    /// Build the event-scoped candidate arena: derive the unit-circle
    /// embedding and vertex class, copy the pileup-vertex count, and set the
    /// isolated-lepton flag against the selected-lepton pt list.
    pub fn build_candidates(&self, lepton_pt_min: f32, selected_pts: &[f32]) -> Vec<PFCandidate> {
        self.candidates
            .iter()
            .map(|c| {
                let mut p = PFCandidate::new(c.pt, c.eta, c.phi, c.e)
                    .with_identity(c.pdgid, c.charge, c.hardfrac)
                    .with_puppi(c.puppi)
                    .with_npv(self.npv);
                p.isolep = p.is_isolated_lepton(lepton_pt_min, selected_pts);
                p
            })
            .collect()
    }
}

/// Fixed-length per-field arrays for one event, plus the scalar summary.
///
/// Every array has exactly the configured target length; entries past the
/// real candidates carry the default-candidate values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventOutput {
    pub pt: Vec<f32>,
    pub eta: Vec<f32>,
    pub phi: Vec<f32>,
    pub e: Vec<f32>,
    pub puppi: Vec<f32>,
    pub pdgid: Vec<f32>,
    pub hardfrac: Vec<f32>,
    pub cluster_idx: Vec<f32>,
    pub cluster_r: Vec<f32>,
    pub cluster_hardch_pt: Vec<f32>,
    pub cluster_puch_pt: Vec<f32>,
    pub vtxid: Vec<f32>,
    pub npv: Vec<f32>,
    pub isolep: Vec<f32>,
    pub summary: EventSummary,
}

impl EventOutput {
    /// Project a flattened sequence into per-field columns.
    pub fn from_sequence(particles: &[PFCandidate], summary: EventSummary) -> Self {
        fn fill<F: Fn(&PFCandidate) -> f32>(particles: &[PFCandidate], attr: F) -> Vec<f32> {
            particles.iter().map(attr).collect()
        }

        Self {
            pt: fill(particles, |p| p.pt),
            eta: fill(particles, |p| p.eta),
            phi: fill(particles, |p| p.phi),
            e: fill(particles, |p| p.e),
            puppi: fill(particles, |p| p.puppi),
            pdgid: fill(particles, |p| p.pdgid),
            hardfrac: fill(particles, |p| p.hardfrac),
            cluster_idx: fill(particles, |p| p.cluster_idx as f32),
            cluster_r: fill(particles, |p| p.cluster_r),
            cluster_hardch_pt: fill(particles, |p| p.cluster_hardch_pt),
            cluster_puch_pt: fill(particles, |p| p.cluster_puch_pt),
            vtxid: fill(particles, |p| p.vtx.label()),
            npv: fill(particles, |p| p.npv),
            isolep: fill(particles, |p| if p.isolep { 1.0 } else { 0.0 }),
            summary,
        }
    }

    /// Length of the per-field arrays
    pub fn len(&self) -> usize {
        self.pt.len()
    }

    /// True when the arrays are empty
    pub fn is_empty(&self) -> bool {
        self.pt.is_empty()
    }
}
