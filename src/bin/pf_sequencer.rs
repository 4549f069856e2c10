//! # Particle-Flow Sequencer Binary
//!
//! Reads events as JSON lines, clusters and orders each event's candidates,
//! and writes fixed-length output records as JSON lines.
//!
//! ## Usage
//!
//! ```bash
//! # Default settings, entropy-seeded
//! cargo run --release --bin pf_sequencer -- events.jsonl sequences.jsonl
//!
//! # Reproducible run with custom clustering parameters
//! cargo run --release --bin pf_sequencer -- \
//!     events.jsonl sequences.jsonl \
//!     --seed 777 \
//!     --fan-out 4 --leaf-size 20 --target-len 9000
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

use pf_sequencer::prelude::*;

/// Particle-flow candidate sequencer
#[derive(Parser, Debug)]
#[command(name = "pf_sequencer")]
#[command(about = "Cluster and order particle-flow candidates into fixed-length sequences")]
struct Args {
    /// Input events, one JSON object per line
    input: String,

    /// Output path, one JSON object per line
    output: String,

    /// Random seed; omit for a non-reproducible entropy seed
    #[arg(long)]
    seed: Option<u64>,

    /// Clusters per split
    #[arg(long, default_value = "4")]
    fan_out: usize,

    /// Leaf size bound
    #[arg(long, default_value = "10")]
    leaf_size: usize,

    /// Maximum recursion depth (unbounded when omitted)
    #[arg(long)]
    max_depth: Option<u32>,

    /// Fixed output sequence length
    #[arg(long, default_value = "9000")]
    target_len: usize,

    /// Relaxation rounds per partitioner invocation
    #[arg(long, default_value = "20")]
    iters: usize,

    /// Isolated-lepton pt threshold
    #[arg(long, default_value = "10.0")]
    lepton_pt_min: f32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = SequencerConfig {
        fan_out: args.fan_out,
        leaf_size: args.leaf_size,
        max_depth: args.max_depth,
        target_len: args.target_len,
        kmeans_iters: args.iters,
        lepton_pt_min: args.lepton_pt_min,
    };
    let sequencer = Sequencer::new(config)?;

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    println!("Particle-Flow Sequencer v{}", pf_sequencer::VERSION);
    println!("[INFO] reading events from {}", args.input);

    let reader = BufReader::new(File::open(&args.input)?);
    let mut writer = BufWriter::new(File::create(&args.output)?);

    let mut n_events = 0usize;
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let event: EventInput = serde_json::from_str(&line)?;
        let output = sequencer.process_event(&event, &mut rng)?;
        serde_json::to_writer(&mut writer, &output)?;
        writeln!(writer)?;

        n_events += 1;
        if n_events % 500 == 0 {
            println!("[INFO] processed {} events", n_events);
        }
    }
    writer.flush()?;

    println!("[DONE] {} events -> {}", n_events, args.output);
    Ok(())
}
