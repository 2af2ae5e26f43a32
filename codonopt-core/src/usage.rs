use crate::codon::Codon;
use crate::consts::{AMINO_ACID_BUCKETS, CODON_BUCKETS};
use crate::map::ChainedMap;
use crate::stats::{AminoAcid, CodonStats};

/// Normalized usage: transcript -> amino acid -> codon -> fraction in [0, 1].
pub type UsageMap = ChainedMap<String, ChainedMap<AminoAcid, ChainedMap<Codon, f64>>>;

///
/// Convert raw per-transcript codon counts into within-amino-acid relative
/// frequencies.
///
/// For each (transcript, amino acid), every codon count is divided by the
/// amino acid's total so the fractions sum to 1. An amino acid whose total
/// is 0 is omitted from the output entirely rather than divided by zero.
/// The accumulator itself is left untouched.
///
pub fn normalize(stats: &CodonStats) -> UsageMap {
    let mut usage: UsageMap = ChainedMap::new();

    for (transcript, transcript_counts) in stats.transcripts() {
        let mut by_amino_acid = ChainedMap::with_buckets(AMINO_ACID_BUCKETS);

        for (amino_acid, codon_counts) in transcript_counts.iter() {
            let total: u64 = codon_counts.iter().map(|(_, n)| *n).sum();
            if total == 0 {
                continue;
            }

            let mut fractions = ChainedMap::with_buckets(CODON_BUCKETS);
            for (codon, n) in codon_counts.iter() {
                fractions.insert(*codon, *n as f64 / total as f64);
            }
            by_amino_acid.insert(*amino_acid, fractions);
        }

        usage.insert(transcript.clone(), by_amino_acid);
    }

    usage
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn codon(s: &str) -> Codon {
        s.parse().unwrap()
    }

    #[rstest]
    fn test_fractions_sum_to_one() {
        let mut stats = CodonStats::new();
        for _ in 0..3 {
            stats.observe("geneX", 'A', codon("GCT"));
        }
        stats.observe("geneX", 'A', codon("GCC"));
        stats.observe("geneX", 'F', codon("TTT"));

        let usage = normalize(&stats);
        let alanine = usage.get("geneX").unwrap().get(&'A').unwrap();

        assert_eq!(alanine.get(&codon("GCT")), Some(&0.75));
        assert_eq!(alanine.get(&codon("GCC")), Some(&0.25));

        let sum: f64 = alanine.iter().map(|(_, f)| *f).sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[rstest]
    fn test_zero_total_amino_acid_is_skipped() {
        let mut stats = CodonStats::new();
        stats.observe("geneX", 'F', codon("TTT"));
        // a zero count can only enter through a merge; it must not divide
        stats.add("geneX", 'A', codon("GCT"), 0);

        let usage = normalize(&stats);
        let by_amino_acid = usage.get("geneX").unwrap();

        assert!(by_amino_acid.get(&'A').is_none());
        assert!(by_amino_acid.get(&'F').is_some());
    }

    #[rstest]
    fn test_normalize_does_not_mutate_counts() {
        let mut stats = CodonStats::new();
        stats.observe("geneX", 'A', codon("GCT"));

        let _ = normalize(&stats);

        let n = stats
            .transcript("geneX")
            .and_then(|t| t.get(&'A'))
            .and_then(|a| a.get(&codon("GCT")));
        assert_eq!(n, Some(&1));
    }
}
