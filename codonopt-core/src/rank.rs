use crate::codon::{Codon, CodonTable};
use crate::consts::{AMINO_ACID_BUCKETS, CODON_BUCKETS};
use crate::map::ChainedMap;
use crate::stats::AminoAcid;

///
/// A max-priority-queue over (usage rate, codon) pairs.
///
/// Invariant: every parent's rate is >= both children's rates. `insert`
/// restores it by sifting the new entry up; `extract_max` moves the last
/// entry to the root and sifts it down, swapping with the larger child
/// (left child on ties).
///
#[derive(Debug, Default)]
pub struct UsageHeap {
    entries: Vec<(f64, Codon)>,
}

impl UsageHeap {
    pub fn new() -> Self {
        UsageHeap {
            entries: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn insert(&mut self, codon: Codon, usage_rate: f64) {
        self.entries.push((usage_rate, codon));
        self.sift_up(self.entries.len() - 1);
    }

    /// Remove and return the entry with the highest rate, or `None` when
    /// the queue is empty.
    pub fn extract_max(&mut self) -> Option<(Codon, f64)> {
        let last = self.entries.pop()?;
        if self.entries.is_empty() {
            return Some((last.1, last.0));
        }
        let (rate, codon) = std::mem::replace(&mut self.entries[0], last);
        self.sift_down(0);
        Some((codon, rate))
    }

    ///
    /// Multiply every rate by `factor`, then renormalize so the rates sum
    /// to 1 again. Multiplying by a positive factor and dividing by a
    /// positive sum both preserve the ordering, so the heap invariant
    /// holds without re-sifting.
    ///
    pub fn rescale(&mut self, factor: f64) {
        for (rate, _) in self.entries.iter_mut() {
            *rate *= factor;
        }
        let total: f64 = self.entries.iter().map(|(rate, _)| rate).sum();
        if total > 0.0 {
            for (rate, _) in self.entries.iter_mut() {
                *rate /= total;
            }
        }
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.entries[parent].0 < self.entries[index].0 {
                self.entries.swap(parent, index);
                index = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        let size = self.entries.len();
        loop {
            let left = 2 * index + 1;
            let right = 2 * index + 2;
            let mut largest = index;

            if left < size && self.entries[left].0 > self.entries[largest].0 {
                largest = left;
            }
            if right < size && self.entries[right].0 > self.entries[largest].0 {
                largest = right;
            }
            if largest == index {
                break;
            }
            self.entries.swap(index, largest);
            index = largest;
        }
    }
}

///
/// The per-transcript ranking path: counts are scoped to one transcript in
/// isolation, usage rates go into one heap per amino acid, and the
/// transcript's optimal codon per amino acid is a single `extract_max`.
///
pub struct TranscriptProfile {
    gene_name: String,
    counts: ChainedMap<AminoAcid, ChainedMap<Codon, u64>>,
    totals: ChainedMap<AminoAcid, u64>,
    heaps: ChainedMap<AminoAcid, UsageHeap>,
}

impl TranscriptProfile {
    pub fn new(gene_name: impl Into<String>) -> Self {
        TranscriptProfile {
            gene_name: gene_name.into(),
            counts: ChainedMap::with_buckets(AMINO_ACID_BUCKETS),
            totals: ChainedMap::with_buckets(AMINO_ACID_BUCKETS),
            heaps: ChainedMap::with_buckets(AMINO_ACID_BUCKETS),
        }
    }

    pub fn gene_name(&self) -> &str {
        &self.gene_name
    }

    /// Chunk and translate a sequence, tallying codons for this transcript
    /// only. Same skipping rules as the batch accumulator.
    pub fn add_sequence(&mut self, table: &CodonTable, sequence: &str) {
        let sequence = sequence.trim().to_ascii_uppercase();
        for chunk in sequence.as_bytes().chunks_exact(3) {
            let Ok(codon) = Codon::from_slice(chunk) else {
                continue;
            };
            let Some(amino_acid) = table.translate(codon) else {
                continue;
            };
            let codon_counts = self
                .counts
                .get_or_insert_with(amino_acid, || ChainedMap::with_buckets(CODON_BUCKETS));
            *codon_counts.get_or_insert_with(codon, || 0) += 1;
            *self.totals.get_or_insert_with(amino_acid, || 0) += 1;
        }
    }

    /// Compute usage rates and fill one heap per amino acid. Call once,
    /// after all of the transcript's sequences have been added.
    pub fn build_heaps(&mut self) {
        for (amino_acid, codon_counts) in self.counts.iter() {
            let total = self.totals.get(amino_acid).copied().unwrap_or(0);
            if total == 0 {
                continue;
            }
            let mut heap = UsageHeap::new();
            for (codon, count) in codon_counts.iter() {
                heap.insert(*codon, *count as f64 / total as f64);
            }
            self.heaps.insert(*amino_acid, heap);
        }
    }

    ///
    /// Scale every heap's rates by the transcript's occurrence count, then
    /// renormalize each back into a distribution. Scale-then-renormalize is
    /// the canonical behavior here; plain scaling would leak the scale
    /// factor into the reported rates.
    ///
    pub fn rescale(&mut self, scale_factor: u64) {
        for amino_acid in self.heap_keys() {
            if let Some(heap) = self.heaps.get_mut(&amino_acid) {
                heap.rescale(scale_factor as f64);
            }
        }
    }

    fn heap_keys(&self) -> Vec<AminoAcid> {
        self.heaps.keys().copied().collect()
    }

    ///
    /// The optimal codon per amino acid for this transcript: one
    /// `extract_max` per heap. Amino acids whose heap is empty (already
    /// drained, or never built) are absent from the result.
    ///
    pub fn optimal_codons(&mut self) -> ChainedMap<AminoAcid, (Codon, f64)> {
        let mut optimal = ChainedMap::with_buckets(AMINO_ACID_BUCKETS);
        for amino_acid in self.heap_keys() {
            if let Some(heap) = self.heaps.get_mut(&amino_acid) {
                if let Some((codon, rate)) = heap.extract_max() {
                    optimal.insert(amino_acid, (codon, rate));
                }
            }
        }
        optimal
    }
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
    fn test_extraction_order() {
        let mut heap = UsageHeap::new();
        heap.insert(codon("AAA"), 0.2);
        heap.insert(codon("AAG"), 0.5);
        heap.insert(codon("AAC"), 0.3);

        assert_eq!(heap.extract_max(), Some((codon("AAG"), 0.5)));
        assert_eq!(heap.extract_max(), Some((codon("AAC"), 0.3)));
        assert_eq!(heap.extract_max(), Some((codon("AAA"), 0.2)));
        assert_eq!(heap.extract_max(), None);
    }

    #[rstest]
    fn test_empty_heap_extraction() {
        let mut heap = UsageHeap::new();
        assert!(heap.is_empty());
        assert_eq!(heap.extract_max(), None);
    }

    #[rstest]
    fn test_heap_invariant_under_interleaving() {
        let mut heap = UsageHeap::new();
        let rates = [0.05, 0.9, 0.3, 0.7, 0.1, 0.6, 0.2];
        for rate in rates {
            heap.insert(codon("ATG"), rate);
        }

        let mut extracted = Vec::new();
        while let Some((_, rate)) = heap.extract_max() {
            extracted.push(rate);
        }
        let mut sorted = rates.to_vec();
        sorted.sort_by(|a, b| b.partial_cmp(a).unwrap());
        assert_eq!(extracted, sorted);
    }

    #[rstest]
    fn test_rescale_renormalizes() {
        let mut heap = UsageHeap::new();
        heap.insert(codon("GCT"), 0.75);
        heap.insert(codon("GCC"), 0.25);

        heap.rescale(4.0);

        let mut total = 0.0;
        let mut first = None;
        while let Some((c, rate)) = heap.extract_max() {
            if first.is_none() {
                first = Some((c, rate));
            }
            total += rate;
        }
        // still a distribution, and the ranking is unchanged
        assert!((total - 1.0).abs() < 1e-9);
        assert_eq!(first, Some((codon("GCT"), 0.75)));
    }

    #[fixture]
    fn profile() -> TranscriptProfile {
        let table = CodonTable::standard();
        let mut profile = TranscriptProfile::new("geneX");
        profile.add_sequence(&table, "ATGGCTGCTGCC");
        profile.add_sequence(&table, "ATGGCTTTT");
        profile
    }

    #[rstest]
    fn test_profile_optimal_codons(mut profile: TranscriptProfile) {
        profile.build_heaps();
        let optimal = profile.optimal_codons();

        assert_eq!(optimal.get(&'A'), Some(&(codon("GCT"), 0.75)));
        assert_eq!(optimal.get(&'F'), Some(&(codon("TTT"), 1.0)));
        assert_eq!(optimal.get(&'M'), Some(&(codon("ATG"), 1.0)));
    }

    #[rstest]
    fn test_profile_rescale_preserves_ranking(mut profile: TranscriptProfile) {
        profile.build_heaps();
        profile.rescale(2);
        let optimal = profile.optimal_codons();

        let (best, rate) = *optimal.get(&'A').unwrap();
        assert_eq!(best, codon("GCT"));
        assert!((rate - 0.75).abs() < 1e-9);
    }

    #[rstest]
    fn test_profile_without_heaps_has_no_optimal_codons() {
        let mut profile = TranscriptProfile::new("geneX");
        let optimal = profile.optimal_codons();
        assert!(optimal.is_empty());
    }
}
