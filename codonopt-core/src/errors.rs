use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CodonError {
    #[error("Codon must be exactly 3 nucleotides, got {0}")]
    InvalidLength(usize),

    #[error("Invalid nucleotide '{0}': only A, C, G, and T are supported")]
    InvalidBase(char),
}
