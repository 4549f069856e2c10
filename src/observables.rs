//! Event-level physics observables
//!
//! Scalar quantities computed alongside the clustering pass: the hadronic
//! recoil built from generator-level missing ET and the hard leptons, a
//! reconstructed Z candidate from the leading same-flavor opposite-charge
//! lepton pair, and the two leading generator jets. The pts of the paired Z
//! leptons double as the selected-lepton list consumed by the per-candidate
//! isolated-lepton flag.

use serde::{Deserialize, Serialize};

/// Electron mass in GeV
pub const ELECTRON_MASS: f32 = 0.00051099;
/// Muon mass in GeV
pub const MUON_MASS: f32 = 0.1057;

/// Sentinel for absent summary quantities
pub const MISSING: f32 = -99.0;

// ─────────────────────────────────────────────────────────────────────────────
// FOUR-VECTOR
// ─────────────────────────────────────────────────────────────────────────────

/// Cartesian four-momentum in natural units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FourVector {
    pub px: f32,
    pub py: f32,
    pub pz: f32,
    pub e: f32,
}

impl FourVector {
    /// The zero vector
    pub fn zero() -> Self {
        Self::default()
    }

    /// Build from collider kinematics and a mass hypothesis
    pub fn from_pt_eta_phi_m(pt: f32, eta: f32, phi: f32, m: f32) -> Self {
        let px = pt * phi.cos();
        let py = pt * phi.sin();
        let pz = pt * eta.sinh();
        let p2 = px * px + py * py + pz * pz;
        Self {
            px,
            py,
            pz,
            e: (m * m + p2).sqrt(),
        }
    }

    /// Transverse momentum
    pub fn pt(&self) -> f32 {
        (self.px * self.px + self.py * self.py).sqrt()
    }

    /// Azimuthal angle
    pub fn phi(&self) -> f32 {
        self.py.atan2(self.px)
    }

    /// Pseudorapidity; 0 for a vector with no transverse component
    pub fn eta(&self) -> f32 {
        let pt = self.pt();
        if pt > 0.0 {
            (self.pz / pt).asinh()
        } else {
            0.0
        }
    }

    /// Invariant mass; 0 for spacelike vectors
    pub fn mass(&self) -> f32 {
        let m2 = self.e * self.e - self.px * self.px - self.py * self.py - self.pz * self.pz;
        if m2 > 0.0 {
            m2.sqrt()
        } else {
            0.0
        }
    }
}

impl std::ops::Add for FourVector {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            px: self.px + other.px,
            py: self.py + other.py,
            pz: self.pz + other.pz,
            e: self.e + other.e,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// INPUT RECORDS
// ─────────────────────────────────────────────────────────────────────────────

/// Generator-level particle, used for the recoil sum
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenParticle {
    pub pt: f32,
    pub eta: f32,
    pub phi: f32,
    pub e: f32,
    pub pdgid: f32,
    /// True when the particle comes from a pileup interaction
    #[serde(default)]
    pub is_pileup: bool,
}

/// Reconstructed lepton (electron or muon collection entry)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RecoLepton {
    pub pt: f32,
    pub eta: f32,
    pub phi: f32,
    pub charge: f32,
}

/// Generator-level jet
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenJet {
    pub pt: f32,
    pub eta: f32,
    pub phi: f32,
    pub mass: f32,
}

/// Generator-level Z boson kinematics, passed through to the summary
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct ZBoson {
    pub pt: f32,
    pub eta: f32,
    pub phi: f32,
    pub mass: f32,
}

// ─────────────────────────────────────────────────────────────────────────────
// OBSERVABLE COMPUTATIONS
// ─────────────────────────────────────────────────────────────────────────────

/// Hadronic recoil: the gen-MET 2-vector plus the transverse vectors of the
/// hard (non-pileup) gen leptons above `pt_min`. Returns (magnitude, phi).
pub fn hadronic_recoil(
    gen_met: f32,
    gen_met_phi: f32,
    gen_particles: &[GenParticle],
    pt_min: f32,
) -> (f32, f32) {
    let mut ux = gen_met * gen_met_phi.cos();
    let mut uy = gen_met * gen_met_phi.sin();

    for g in gen_particles {
        let id = g.pdgid.abs();
        if !g.is_pileup && g.pt > pt_min && (id == 11.0 || id == 13.0) {
            ux += g.pt * g.phi.cos();
            uy += g.pt * g.phi.sin();
        }
    }

    ((ux * ux + uy * uy).sqrt(), uy.atan2(ux))
}

/// Result of the Z pairing: the dilepton four-vector (zero when no pair was
/// found) and the pts of every lepton that entered it. The pts feed the
/// per-candidate isolated-lepton match.
#[derive(Debug, Clone, Default)]
pub struct ZReconstruction {
    pub p4: FourVector,
    pub lepton_pts: Vec<f32>,
}

/// Pair the leading same-flavor opposite-charge leptons into a Z candidate.
///
/// The collection (electrons vs muons) is chosen by whichever has the harder
/// leading entry, and a collection only qualifies with at least two entries.
/// Within the chosen collection the first lepton above `pt_min` seeds the
/// charge, and the first later entry with the opposite charge above `pt_min`
/// completes the pair. Lepton masses use the physical values.
pub fn reconstruct_z(
    electrons: &[RecoLepton],
    muons: &[RecoLepton],
    pt_min: f32,
) -> ZReconstruction {
    let mut leading_pt = MISSING;
    let mut chosen: Option<(&[RecoLepton], f32)> = None;

    if electrons.len() > 1 {
        leading_pt = electrons[0].pt;
        chosen = Some((electrons, ELECTRON_MASS));
    }
    if muons.len() > 1 && muons[0].pt > leading_pt {
        chosen = Some((muons, MUON_MASS));
    }

    let Some((leptons, mass)) = chosen else {
        return ZReconstruction::default();
    };

    let mut reco = ZReconstruction::default();
    let mut seed_charge = 0.0f32;
    for l in leptons {
        if l.pt <= pt_min {
            continue;
        }
        if seed_charge == 0.0 {
            seed_charge = l.charge;
            reco.p4 = reco.p4 + FourVector::from_pt_eta_phi_m(l.pt, l.eta, l.phi, mass);
            reco.lepton_pts.push(l.pt);
        } else if l.charge == -seed_charge {
            reco.p4 = reco.p4 + FourVector::from_pt_eta_phi_m(l.pt, l.eta, l.phi, mass);
            reco.lepton_pts.push(l.pt);
            break;
        }
    }

    reco
}

// ─────────────────────────────────────────────────────────────────────────────
// EVENT SUMMARY
// ─────────────────────────────────────────────────────────────────────────────

/// Scalar per-event summary written next to the particle arrays.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EventSummary {
    pub gen_met: f32,
    pub gen_met_phi: f32,
    pub recoil_mag: f32,
    pub recoil_phi: f32,
    pub gen_z_pt: f32,
    pub gen_z_eta: f32,
    pub gen_z_phi: f32,
    pub gen_z_mass: f32,
    pub rec_z_pt: f32,
    pub rec_z_eta: f32,
    pub rec_z_phi: f32,
    pub rec_z_mass: f32,
    pub jet1_pt: f32,
    pub jet1_eta: f32,
    pub jet1_phi: f32,
    pub jet1_e: f32,
    pub jet2_pt: f32,
    pub jet2_eta: f32,
    pub jet2_phi: f32,
    pub jet2_e: f32,
}

impl Default for EventSummary {
    fn default() -> Self {
        Self {
            gen_met: MISSING,
            gen_met_phi: MISSING,
            recoil_mag: MISSING,
            recoil_phi: MISSING,
            gen_z_pt: MISSING,
            gen_z_eta: MISSING,
            gen_z_phi: MISSING,
            gen_z_mass: MISSING,
            rec_z_pt: MISSING,
            rec_z_eta: MISSING,
            rec_z_phi: MISSING,
            rec_z_mass: MISSING,
            jet1_pt: MISSING,
            jet1_eta: MISSING,
            jet1_phi: MISSING,
            jet1_e: MISSING,
            jet2_pt: MISSING,
            jet2_eta: MISSING,
            jet2_phi: MISSING,
            jet2_e: MISSING,
        }
    }
}

impl EventSummary {
    /// Fill the reconstructed-Z block from a pairing result
    pub fn set_rec_z(&mut self, z: &FourVector) {
        self.rec_z_pt = z.pt();
        self.rec_z_eta = z.eta();
        self.rec_z_phi = z.phi();
        self.rec_z_mass = z.mass();
    }

    /// Fill the gen-Z block
    pub fn set_gen_z(&mut self, z: &ZBoson) {
        self.gen_z_pt = z.pt;
        self.gen_z_eta = z.eta;
        self.gen_z_phi = z.phi;
        self.gen_z_mass = z.mass;
    }

    /// Fill the two leading-jet blocks from a jet list
    pub fn set_leading_jets(&mut self, jets: &[GenJet]) {
        if let Some(j) = jets.first() {
            let p4 = FourVector::from_pt_eta_phi_m(j.pt, j.eta, j.phi, j.mass);
            self.jet1_pt = p4.pt();
            self.jet1_eta = p4.eta();
            self.jet1_phi = p4.phi();
            self.jet1_e = p4.e;
        }
        if let Some(j) = jets.get(1) {
            let p4 = FourVector::from_pt_eta_phi_m(j.pt, j.eta, j.phi, j.mass);
            self.jet2_pt = p4.pt();
            self.jet2_eta = p4.eta();
            self.jet2_phi = p4.phi();
            self.jet2_e = p4.e;
        }
    }
}
