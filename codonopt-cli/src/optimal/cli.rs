use clap::{Arg, Command, arg};

pub const OPTIMAL_CMD: &str = "optimal";
pub const DEFAULT_OUT: &str = "optimal_codons.csv";

pub fn create_optimal_cli() -> Command {
    Command::new(OPTIMAL_CMD)
        .about("Derive the genome-wide optimal codon per amino acid, weighted by transcript occurrence counts.")
        .arg(Arg::new("csvs"))
        .arg(arg!(--output <output>))
}
