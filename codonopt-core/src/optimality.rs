use crate::codon::Codon;
use crate::consts::{AMINO_ACID_BUCKETS, CODON_BUCKETS};
use crate::map::ChainedMap;
use crate::stats::{AminoAcid, CodonStats, GeneCounts};

/// Genome-wide aggregate: amino acid -> codon -> summed weight.
pub type GenomeWide = ChainedMap<AminoAcid, ChainedMap<Codon, u64>>;

///
/// Fold every transcript's codon counts into a genome-wide total, weighting
/// each count by the transcript's occurrence count.
///
/// A transcript's codon evidence is trusted in proportion to how often it
/// was observed in the input: each count contributes `count * scale_factor`.
/// Transcripts with scale factor 0 are skipped entirely.
///
pub fn genome_wide(stats: &CodonStats, gene_counts: &GeneCounts) -> GenomeWide {
    let mut aggregate: GenomeWide = ChainedMap::with_buckets(AMINO_ACID_BUCKETS);

    for (transcript, transcript_counts) in stats.transcripts() {
        let scale_factor = gene_counts.scale_factor(transcript);
        if scale_factor == 0 {
            continue;
        }

        for (amino_acid, codon_counts) in transcript_counts.iter() {
            let weights = aggregate
                .get_or_insert_with(*amino_acid, || ChainedMap::with_buckets(CODON_BUCKETS));
            for (codon, count) in codon_counts.iter() {
                *weights.get_or_insert_with(*codon, || 0) += count * scale_factor;
            }
        }
    }

    aggregate
}

///
/// Select the codon with the highest aggregate weight for each amino acid.
///
/// Ties are broken toward the lexicographically smallest codon, so the
/// result does not depend on map iteration order.
///
pub fn optimal_codons(aggregate: &GenomeWide) -> ChainedMap<AminoAcid, Codon> {
    let mut optimal = ChainedMap::with_buckets(AMINO_ACID_BUCKETS);

    for (amino_acid, weights) in aggregate.iter() {
        let mut best: Option<(Codon, u64)> = None;
        for (codon, weight) in weights.iter() {
            best = match best {
                None => Some((*codon, *weight)),
                Some((_, best_weight)) if *weight > best_weight => Some((*codon, *weight)),
                Some((best_codon, best_weight)) if *weight == best_weight && *codon < best_codon => {
                    Some((*codon, *weight))
                }
                keep => keep,
            };
        }
        if let Some((codon, _)) = best {
            optimal.insert(*amino_acid, codon);
        }
    }

    optimal
}
