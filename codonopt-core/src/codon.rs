use std::fmt::{self, Display};
use std::str::FromStr;

use crate::consts::{STOP_SYMBOL, TABLE_BUCKETS};
use crate::errors::CodonError;
use crate::map::ChainedMap;

///
/// A single codon: three nucleotides over the DNA alphabet {A, C, G, T}.
///
/// Construction rejects any other byte, so ambiguity codes (N, R, Y, ...)
/// never enter the accumulators. Ordering is lexicographic over the bases,
/// which is what the optimal-codon tie-break relies on.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Codon([u8; 3]);

impl Codon {
    pub fn new(bases: [u8; 3]) -> Result<Self, CodonError> {
        for &base in &bases {
            match base {
                b'A' | b'C' | b'G' | b'T' => {}
                other => return Err(CodonError::InvalidBase(other as char)),
            }
        }
        Ok(Codon(bases))
    }

    pub fn from_slice(bases: &[u8]) -> Result<Self, CodonError> {
        let bases: [u8; 3] = bases
            .try_into()
            .map_err(|_| CodonError::InvalidLength(bases.len()))?;
        Self::new(bases)
    }

    pub fn bases(&self) -> [u8; 3] {
        self.0
    }
}

impl FromStr for Codon {
    type Err = CodonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_slice(s.to_ascii_uppercase().as_bytes())
    }
}

impl Display for Codon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &base in &self.0 {
            write!(f, "{}", base as char)?;
        }
        Ok(())
    }
}

// Standard genetic code (NCBI translation table 1). Stop codons map to '*'.
const STANDARD_CODE: [([u8; 3], char); 64] = [
    (*b"TTT", 'F'),
    (*b"TTC", 'F'),
    (*b"TTA", 'L'),
    (*b"TTG", 'L'),
    (*b"CTT", 'L'),
    (*b"CTC", 'L'),
    (*b"CTA", 'L'),
    (*b"CTG", 'L'),
    (*b"ATT", 'I'),
    (*b"ATC", 'I'),
    (*b"ATA", 'I'),
    (*b"ATG", 'M'),
    (*b"GTT", 'V'),
    (*b"GTC", 'V'),
    (*b"GTA", 'V'),
    (*b"GTG", 'V'),
    (*b"TCT", 'S'),
    (*b"TCC", 'S'),
    (*b"TCA", 'S'),
    (*b"TCG", 'S'),
    (*b"AGT", 'S'),
    (*b"AGC", 'S'),
    (*b"CCT", 'P'),
    (*b"CCC", 'P'),
    (*b"CCA", 'P'),
    (*b"CCG", 'P'),
    (*b"ACT", 'T'),
    (*b"ACC", 'T'),
    (*b"ACA", 'T'),
    (*b"ACG", 'T'),
    (*b"GCT", 'A'),
    (*b"GCC", 'A'),
    (*b"GCA", 'A'),
    (*b"GCG", 'A'),
    (*b"TAT", 'Y'),
    (*b"TAC", 'Y'),
    (*b"CAT", 'H'),
    (*b"CAC", 'H'),
    (*b"CAA", 'Q'),
    (*b"CAG", 'Q'),
    (*b"AAT", 'N'),
    (*b"AAC", 'N'),
    (*b"AAA", 'K'),
    (*b"AAG", 'K'),
    (*b"GAT", 'D'),
    (*b"GAC", 'D'),
    (*b"GAA", 'E'),
    (*b"GAG", 'E'),
    (*b"TGT", 'C'),
    (*b"TGC", 'C'),
    (*b"TGG", 'W'),
    (*b"CGT", 'R'),
    (*b"CGC", 'R'),
    (*b"CGA", 'R'),
    (*b"CGG", 'R'),
    (*b"AGA", 'R'),
    (*b"AGG", 'R'),
    (*b"GGT", 'G'),
    (*b"GGC", 'G'),
    (*b"GGA", 'G'),
    (*b"GGG", 'G'),
    (*b"TAA", '*'),
    (*b"TAG", '*'),
    (*b"TGA", '*'),
];

///
/// Lookup from codon to one-letter amino-acid symbol.
///
/// The table is sourced data, built once at construction and never mutated.
/// Codons without an entry have no translation and are skipped upstream.
///
pub struct CodonTable {
    entries: ChainedMap<Codon, char>,
}

impl CodonTable {
    /// The standard genetic code: 61 coding codons plus 3 stop codons.
    pub fn standard() -> Self {
        let mut entries = ChainedMap::with_buckets(TABLE_BUCKETS);
        for (bases, amino_acid) in STANDARD_CODE {
            entries.insert(Codon(bases), amino_acid);
        }
        CodonTable { entries }
    }

    pub fn translate(&self, codon: Codon) -> Option<char> {
        self.entries.get(&codon).copied()
    }

    pub fn is_stop(&self, codon: Codon) -> bool {
        self.translate(codon) == Some(STOP_SYMBOL)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    fn table() -> CodonTable {
        CodonTable::standard()
    }

    #[rstest]
    fn test_table_has_all_64_codons(table: CodonTable) {
        assert_eq!(table.len(), 64);
    }

    #[rstest]
    #[case("ATG", 'M')]
    #[case("TTT", 'F')]
    #[case("GCT", 'A')]
    #[case("GCC", 'A')]
    #[case("TGG", 'W')]
    #[case("AGA", 'R')]
    fn test_translate(table: CodonTable, #[case] codon: &str, #[case] expected: char) {
        let codon: Codon = codon.parse().unwrap();
        assert_eq!(table.translate(codon), Some(expected));
    }

    #[rstest]
    #[case("TAA")]
    #[case("TAG")]
    #[case("TGA")]
    fn test_stop_codons(table: CodonTable, #[case] codon: &str) {
        let codon: Codon = codon.parse().unwrap();
        assert_eq!(table.translate(codon), Some('*'));
        assert!(table.is_stop(codon));
    }

    #[rstest]
    fn test_ambiguity_codes_rejected() {
        assert_eq!(
            "ANN".parse::<Codon>(),
            Err(CodonError::InvalidBase('N'))
        );
        assert_eq!(
            "AT".parse::<Codon>(),
            Err(CodonError::InvalidLength(2))
        );
        assert_eq!(
            "ATGG".parse::<Codon>(),
            Err(CodonError::InvalidLength(4))
        );
    }

    #[rstest]
    fn test_lowercase_parses(table: CodonTable) {
        let codon: Codon = "atg".parse().unwrap();
        assert_eq!(table.translate(codon), Some('M'));
        assert_eq!(codon.to_string(), "ATG");
    }

    #[rstest]
    fn test_codon_ordering_is_lexicographic() {
        let gca: Codon = "GCA".parse().unwrap();
        let gct: Codon = "GCT".parse().unwrap();
        assert!(gca < gct);
    }
}
