use clap::{Arg, Command, arg};

pub const USAGE_CMD: &str = "usage";
pub const DEFAULT_OUT: &str = "codon_usage.csv";

pub fn create_usage_cli() -> Command {
    Command::new(USAGE_CMD)
        .about("Compute per-transcript synonymous codon usage fractions from a folder of sequence CSVs.")
        .arg(Arg::new("csvs"))
        .arg(arg!(--output <output>))
}
