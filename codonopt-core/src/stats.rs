use crate::codon::{Codon, CodonTable};
use crate::consts::{AMINO_ACID_BUCKETS, CODON_BUCKETS};
use crate::map::ChainedMap;

/// One-letter amino-acid symbol, or `*` for stop.
pub type AminoAcid = char;

/// Codon counts for a single transcript: amino acid -> codon -> count.
pub type TranscriptCounts = ChainedMap<AminoAcid, ChainedMap<Codon, u64>>;

///
/// The three-level accumulator at the heart of the analysis:
/// transcript -> amino acid -> codon -> observation count.
///
/// Ingestion is insert-or-increment only; levels are created lazily on the
/// first observation and counts never decrease. Once aggregation starts the
/// structure is read-only.
///
#[derive(Default)]
pub struct CodonStats {
    transcripts: ChainedMap<String, TranscriptCounts>,
}

impl CodonStats {
    pub fn new() -> Self {
        CodonStats {
            transcripts: ChainedMap::new(),
        }
    }

    /// Record one observed codon occurrence for a transcript.
    pub fn observe(&mut self, transcript: &str, amino_acid: AminoAcid, codon: Codon) {
        self.add(transcript, amino_acid, codon, 1);
    }

    pub(crate) fn add(&mut self, transcript: &str, amino_acid: AminoAcid, codon: Codon, n: u64) {
        let transcript_counts = self
            .transcripts
            .get_or_insert_with(transcript.to_owned(), || {
                ChainedMap::with_buckets(AMINO_ACID_BUCKETS)
            });
        let codon_counts = transcript_counts
            .get_or_insert_with(amino_acid, || ChainedMap::with_buckets(CODON_BUCKETS));
        *codon_counts.get_or_insert_with(codon, || 0) += n;
    }

    pub fn transcript(&self, id: &str) -> Option<&TranscriptCounts> {
        self.transcripts.get(id)
    }

    pub fn transcripts(&self) -> impl Iterator<Item = (&String, &TranscriptCounts)> {
        self.transcripts.iter()
    }

    pub fn n_transcripts(&self) -> usize {
        self.transcripts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transcripts.is_empty()
    }

    /// Fold another accumulator's counts into this one. The other
    /// accumulator must be complete; partial worker state is never merged.
    pub fn merge(&mut self, other: CodonStats) {
        for (transcript, transcript_counts) in other.transcripts {
            for (amino_acid, codon_counts) in transcript_counts {
                for (codon, n) in codon_counts {
                    self.add(&transcript, amino_acid, codon, n);
                }
            }
        }
    }
}

///
/// Occurrence tally per transcript: how many input rows named it. Used as
/// the weighting scale factor during genome-wide aggregation, independent
/// of how many codons each row's sequence yielded.
///
#[derive(Default)]
pub struct GeneCounts {
    counts: ChainedMap<String, u64>,
}

impl GeneCounts {
    pub fn new() -> Self {
        GeneCounts {
            counts: ChainedMap::new(),
        }
    }

    /// Record one input row naming this transcript.
    pub fn record(&mut self, transcript: &str) {
        *self.counts.get_or_insert_with(transcript.to_owned(), || 0) += 1;
    }

    /// 0 for a transcript never seen; never an error.
    pub fn scale_factor(&self, transcript: &str) -> u64 {
        self.counts.get(transcript).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &u64)> {
        self.counts.iter()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn merge(&mut self, other: GeneCounts) {
        for (transcript, n) in other.counts {
            *self.counts.get_or_insert_with(transcript, || 0) += n;
        }
    }
}

///
/// Owns the per-run mutable state for one ingestion batch: the nested codon
/// counts plus the gene occurrence tally, fed row by row.
///
/// A parallel driver gives each worker its own accumulator and merges the
/// completed results afterwards; the accumulator itself is single-threaded.
///
pub struct BatchAccumulator<'a> {
    table: &'a CodonTable,
    stats: CodonStats,
    gene_counts: GeneCounts,
}

impl<'a> BatchAccumulator<'a> {
    pub fn new(table: &'a CodonTable) -> Self {
        BatchAccumulator {
            table,
            stats: CodonStats::new(),
            gene_counts: GeneCounts::new(),
        }
    }

    ///
    /// Process one input row.
    ///
    /// The transcript's occurrence count is bumped exactly once per row,
    /// even when the sequence yields no valid codons. The sequence is
    /// trimmed, upper-cased, and chunked into non-overlapping codons from
    /// offset 0; a trailing 1-2 nucleotide fragment is discarded. Codons
    /// with no table entry are skipped, not counted, and never an error.
    ///
    pub fn process_row(&mut self, transcript_id: &str, sequence: &str) {
        let transcript_id = transcript_id.trim();
        let sequence = sequence.trim().to_ascii_uppercase();

        self.gene_counts.record(transcript_id);

        for chunk in sequence.as_bytes().chunks_exact(3) {
            let Ok(codon) = Codon::from_slice(chunk) else {
                continue;
            };
            if let Some(amino_acid) = self.table.translate(codon) {
                self.stats.observe(transcript_id, amino_acid, codon);
            }
        }
    }

    pub fn stats(&self) -> &CodonStats {
        &self.stats
    }

    pub fn gene_counts(&self) -> &GeneCounts {
        &self.gene_counts
    }

    /// Fold a completed accumulator into this one.
    pub fn merge(&mut self, other: BatchAccumulator<'_>) {
        self.stats.merge(other.stats);
        self.gene_counts.merge(other.gene_counts);
    }

    pub fn into_parts(self) -> (CodonStats, GeneCounts) {
        (self.stats, self.gene_counts)
    }
}
