mod input;
mod optimal;
mod rank;
mod usage;

use anyhow::Result;
use clap::Command;

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const BIN_NAME: &str = "codonopt";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .about("Codon usage bias analysis: per-transcript usage fractions and genome-wide optimal codons from transcript sequence CSVs.")
        .subcommand_required(true)
        .subcommand(usage::cli::create_usage_cli())
        .subcommand(optimal::cli::create_optimal_cli())
        .subcommand(rank::cli::create_rank_cli())
}

fn main() -> Result<()> {
    let app = build_parser();
    let matches = app.get_matches();

    match matches.subcommand() {
        //
        // USAGE
        //
        Some((usage::cli::USAGE_CMD, matches)) => {
            usage::handlers::run_usage(matches)?;
        }

        //
        // OPTIMAL
        //
        Some((optimal::cli::OPTIMAL_CMD, matches)) => {
            optimal::handlers::run_optimal(matches)?;
        }

        //
        // RANK
        //
        Some((rank::cli::RANK_CMD, matches)) => {
            rank::handlers::run_rank(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}
