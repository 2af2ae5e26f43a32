/// Bucket count for top-level transcript maps. Input files commonly carry
/// tens of thousands of distinct gene names; this keeps chains short.
pub const DEFAULT_BUCKETS: usize = 1024;

/// Bucket count for per-transcript amino-acid maps (at most 21 keys).
pub const AMINO_ACID_BUCKETS: usize = 32;

/// Bucket count for per-amino-acid codon maps (at most 6 synonymous codons).
pub const CODON_BUCKETS: usize = 8;

/// Bucket count for the translation table (64 codons).
pub const TABLE_BUCKETS: usize = 128;

/// Amino-acid symbol used for the three stop codons.
pub const STOP_SYMBOL: char = '*';
