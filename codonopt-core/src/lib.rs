//!
//! # Core library for `codonopt`
//!
//! Computes synonymous codon usage per transcript from nucleotide sequence
//! rows and derives the genome-wide optimal codon per amino acid, weighted
//! by transcript occurrence counts.
//!
//! Two paths produce the optimal-codon answer:
//! - the counting path: [BatchAccumulator] -> [normalize] /
//!   [genome_wide] + [optimal_codons] — the reference behavior;
//! - the ranking path: [TranscriptProfile] with per-amino-acid
//!   [UsageHeap]s — per-transcript, with documented semantic differences
//!   (rates are within-transcript fractions, optionally rescaled).
//!
//! ## Examples
//! ```rust
//! use codonopt_core::{BatchAccumulator, CodonTable, genome_wide, optimal_codons};
//!
//! let table = CodonTable::standard();
//! let mut batch = BatchAccumulator::new(&table);
//! batch.process_row("geneX", "ATGGCTGCTGCC");
//! batch.process_row("geneX", "ATGGCTTTT");
//!
//! let (stats, gene_counts) = batch.into_parts();
//! let optimal = optimal_codons(&genome_wide(&stats, &gene_counts));
//! assert_eq!(optimal.get(&'A').unwrap().to_string(), "GCT");
//! ```
//!

pub mod codon;
pub mod consts;
pub mod errors;
pub mod map;
pub mod optimality;
pub mod rank;
pub mod stats;
pub mod usage;

// Re-exports
pub use codon::{Codon, CodonTable};
pub use errors::CodonError;
pub use map::ChainedMap;
pub use optimality::{GenomeWide, genome_wide, optimal_codons};
pub use rank::{TranscriptProfile, UsageHeap};
pub use stats::{AminoAcid, BatchAccumulator, CodonStats, GeneCounts, TranscriptCounts};
pub use usage::{UsageMap, normalize};
