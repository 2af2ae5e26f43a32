use clap::{Arg, Command, arg};

pub const RANK_CMD: &str = "rank";
pub const DEFAULT_OUT_DIR: &str = "output_csvs";

pub fn create_rank_cli() -> Command {
    Command::new(RANK_CMD)
        .about("Rank codons per transcript with a max-priority-queue; one output file per input file.")
        .arg(Arg::new("csvs"))
        .arg(arg!(--"output-dir" <dir>))
        .arg(arg!(--scaled "Rescale usage rates by each transcript's occurrence count, then renormalize"))
}
