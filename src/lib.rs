//! # Particle-Flow Sequencer
//!
//! Converts a variable-length collection of detector-reconstructed
//! particle-flow candidates into a fixed-length, spatially-ordered sequence
//! for a fixed-input-shape consumer (e.g. a sequence model).
//!
//! ## Architecture
//!
//! ```text
//! PFCandidate list
//!       │  (sorted descending by pt)
//!       ▼
//! HierarchicalOrdering ──► KMeans on (eta, cos phi, sin phi), applied
//!       │                  recursively until every leaf is within the
//!       │                  size bound or the depth bound
//!       ▼
//! leaf Clusters (finalized: sum pt, weighted eta, unit direction,
//!       │        spread, hard/pileup charged pt)
//!       ▼
//! build_tour ──► greedy nearest-neighbor chain, seeded at the
//!       │        highest-pt cluster
//!       ▼
//! flatten ──► stamp cluster index + aggregates, pad or truncate to
//!       │     the fixed target length
//!       ▼
//! EventOutput (one fixed-length column per field + EventSummary)
//! ```
//!
//! Clustering never guarantees an optimal partition and the tour is a greedy
//! heuristic, not TSP-optimal. Output is reproducible only when the caller
//! seeds the generator it passes into [`Sequencer::process_event`].

pub mod candidate;
pub mod cluster;
pub mod error;
pub mod event;
pub mod kmeans;
pub mod observables;
pub mod ordering;
pub mod pipeline;
pub mod sequence;

pub use candidate::{is_lepton_pdgid, PFCandidate, VertexClass};
pub use cluster::{xy_to_phi, Cluster};
pub use error::SequencerError;
pub use event::{CandidateInput, EventInput, EventOutput};
pub use kmeans::KMeans;
pub use observables::{
    hadronic_recoil, reconstruct_z, EventSummary, FourVector, GenJet, GenParticle, RecoLepton,
    ZBoson, ZReconstruction,
};
pub use ordering::HierarchicalOrdering;
pub use pipeline::{Sequencer, SequencerConfig};
pub use sequence::{build_tour, flatten};

/// Result type for sequencer operations
pub type SequencerResult<T> = Result<T, SequencerError>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Cluster, EventInput, EventOutput, EventSummary, HierarchicalOrdering, KMeans, PFCandidate,
        Sequencer, SequencerConfig, SequencerError, SequencerResult, VertexClass,
    };
}
