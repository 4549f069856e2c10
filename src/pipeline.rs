//! End-to-end event pipeline
//!
//! [`Sequencer`] wires the stages together for one event: observables, then
//! the candidate arena (sorted descending by pt), then the recursive split,
//! the greedy tour, and the flatten/pad step that yields the fixed-length
//! output columns.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::candidate::PFCandidate;
use crate::error::SequencerError;
use crate::event::{EventInput, EventOutput};
use crate::observables::{hadronic_recoil, reconstruct_z, EventSummary};
use crate::ordering::HierarchicalOrdering;
use crate::sequence::{build_tour, flatten};
use crate::SequencerResult;

/// Configuration surface of the sequencer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequencerConfig {
    /// Clusters per split
    pub fan_out: usize,
    /// Leaf size bound: groups at or below this size are not split further
    pub leaf_size: usize,
    /// Maximum recursion depth; `None` disables the bound
    pub max_depth: Option<u32>,
    /// Fixed output sequence length
    pub target_len: usize,
    /// Relaxation rounds per partitioner invocation
    pub kmeans_iters: usize,
    /// Isolated-lepton pt threshold
    pub lepton_pt_min: f32,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            fan_out: 4,
            leaf_size: 10,
            max_depth: None,
            target_len: 9000,
            kmeans_iters: 20,
            lepton_pt_min: 10.0,
        }
    }
}

impl SequencerConfig {
    /// Wider leaves: fewer, larger clusters for the same event
    pub fn coarse() -> Self {
        Self {
            leaf_size: 30,
            ..Self::default()
        }
    }

    /// Check the invariants the clustering stages rely on.
    ///
    /// `leaf_size >= fan_out` is what keeps the partitioner from ever seeing
    /// a group smaller than its fan-out.
    pub fn validate(&self) -> SequencerResult<()> {
        if self.fan_out < 2 {
            return Err(SequencerError::InvalidConfig(format!(
                "fan_out must be at least 2, got {}",
                self.fan_out
            )));
        }
        if self.leaf_size < self.fan_out {
            return Err(SequencerError::InvalidConfig(format!(
                "leaf_size ({}) must be at least fan_out ({})",
                self.leaf_size, self.fan_out
            )));
        }
        if self.target_len == 0 {
            return Err(SequencerError::InvalidConfig(
                "target_len must be positive".to_string(),
            ));
        }
        if self.kmeans_iters == 0 {
            return Err(SequencerError::InvalidConfig(
                "kmeans_iters must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// The per-event pipeline. Owns the splitter; the random generator is passed
/// in by the caller so seeding and reproducibility stay under caller control.
#[derive(Debug, Clone)]
pub struct Sequencer {
    config: SequencerConfig,
    ordering: HierarchicalOrdering,
}

impl Sequencer {
    /// Build a sequencer from a validated configuration.
    pub fn new(config: SequencerConfig) -> SequencerResult<Self> {
        config.validate()?;
        let mut ordering =
            HierarchicalOrdering::new(config.fan_out, config.leaf_size, config.kmeans_iters);
        if let Some(depth) = config.max_depth {
            ordering = ordering.with_max_depth(depth);
        }
        Ok(Self { config, ordering })
    }

    /// The active configuration
    pub fn config(&self) -> &SequencerConfig {
        &self.config
    }

    /// Process one event to completion.
    ///
    /// An event with no candidates still produces a full set of padded
    /// columns; the clustering stages only run when there is something to
    /// cluster.
    pub fn process_event<R: Rng>(
        &self,
        event: &EventInput,
        rng: &mut R,
    ) -> SequencerResult<EventOutput> {
        // event-level observables first; the Z pairing also yields the
        // selected-lepton pts the isolep flag matches against
        let mut summary = EventSummary::default();
        summary.gen_met = event.gen_met;
        summary.gen_met_phi = event.gen_met_phi;
        let (recoil_mag, recoil_phi) = hadronic_recoil(
            event.gen_met,
            event.gen_met_phi,
            &event.gen_particles,
            self.config.lepton_pt_min,
        );
        summary.recoil_mag = recoil_mag;
        summary.recoil_phi = recoil_phi;
        if let Some(z) = &event.gen_z {
            summary.set_gen_z(z);
        }
        let zreco = reconstruct_z(&event.electrons, &event.muons, self.config.lepton_pt_min);
        summary.set_rec_z(&zreco.p4);
        summary.set_leading_jets(&event.gen_jets);

        let mut particles =
            event.build_candidates(self.config.lepton_pt_min, &zreco.lepton_pts);
        if particles.is_empty() {
            let padding = vec![PFCandidate::default(); self.config.target_len];
            return Ok(EventOutput::from_sequence(&padding, summary));
        }

        // descending pt; stable, so equal-pt candidates keep input order
        particles.sort_by(|a, b| b.pt.partial_cmp(&a.pt).unwrap_or(std::cmp::Ordering::Equal));

        let leaves = self.ordering.fit(&particles, rng)?;
        let tour = build_tour(leaves);
        let sequence = flatten(&tour, &mut particles, self.config.target_len);

        Ok(EventOutput::from_sequence(&sequence, summary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::CandidateInput;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_config_defaults() {
        let config = SequencerConfig::default();
        assert_eq!(config.fan_out, 4);
        assert_eq!(config.leaf_size, 10);
        assert_eq!(config.max_depth, None);
        assert_eq!(config.target_len, 9000);
        assert_eq!(config.kmeans_iters, 20);
        assert_eq!(config.lepton_pt_min, 10.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_rejects_bad_values() {
        let mut config = SequencerConfig::default();
        config.fan_out = 1;
        assert!(config.validate().is_err());

        let mut config = SequencerConfig::default();
        config.leaf_size = 3; // below fan_out
        assert!(config.validate().is_err());

        let mut config = SequencerConfig::default();
        config.target_len = 0;
        assert!(config.validate().is_err());

        let mut config = SequencerConfig::default();
        config.kmeans_iters = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_serde_round_trip() {
        let config = SequencerConfig::coarse();
        let json = serde_json::to_string(&config).unwrap();
        let back: SequencerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
        assert_eq!(back.leaf_size, 30);
    }

    #[test]
    fn test_empty_event_yields_padded_columns() {
        let config = SequencerConfig {
            target_len: 16,
            ..SequencerConfig::default()
        };
        let sequencer = Sequencer::new(config).unwrap();
        let mut rng = StdRng::seed_from_u64(0);

        let out = sequencer.process_event(&EventInput::default(), &mut rng).unwrap();
        assert_eq!(out.len(), 16);
        assert!(out.pt.iter().all(|&v| v == 0.0));
        assert!(out.cluster_idx.iter().all(|&v| v == -1.0));
    }

    #[test]
    fn test_candidates_are_pt_sorted_before_clustering() {
        let config = SequencerConfig {
            target_len: 8,
            ..SequencerConfig::default()
        };
        let sequencer = Sequencer::new(config).unwrap();
        let mut rng = StdRng::seed_from_u64(1);

        let event = EventInput {
            candidates: vec![
                CandidateInput { pt: 5.0, eta: 0.0, phi: 0.0, e: 5.0, ..CandidateInput::default() },
                CandidateInput { pt: 50.0, eta: 0.0, phi: 0.1, e: 50.0, ..CandidateInput::default() },
                CandidateInput { pt: 20.0, eta: 0.0, phi: 0.2, e: 20.0, ..CandidateInput::default() },
            ],
            ..EventInput::default()
        };

        // 3 candidates <= leaf_size, so one cluster in input (sorted) order
        let out = sequencer.process_event(&event, &mut rng).unwrap();
        assert_eq!(&out.pt[..3], &[50.0, 20.0, 5.0]);
    }
}
