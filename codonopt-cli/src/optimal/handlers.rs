use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;

use codonopt_core::{CodonTable, genome_wide, optimal_codons};

use crate::input::{find_csv_files, process_files};

pub fn run_optimal(matches: &ArgMatches) -> Result<()> {
    let csvs = matches
        .get_one::<String>("csvs")
        .expect("A path to a folder of input CSV files is required.");

    let default_out = super::cli::DEFAULT_OUT.to_string();
    let output = matches.get_one::<String>("output").unwrap_or(&default_out);

    let table = CodonTable::standard();
    let files = find_csv_files(Path::new(csvs))?;
    let batch = process_files(&table, &files)?;
    let (stats, gene_counts) = batch.into_parts();

    let aggregate = genome_wide(&stats, &gene_counts);
    let optimal = optimal_codons(&aggregate);

    let mut rows: Vec<(char, String, u64)> = Vec::new();
    for (amino_acid, codon) in optimal.iter() {
        let weight = aggregate
            .get(amino_acid)
            .and_then(|weights| weights.get(codon))
            .copied()
            .unwrap_or(0);
        rows.push((*amino_acid, codon.to_string(), weight));
    }
    rows.sort();

    let mut writer = csv::Writer::from_path(output)
        .with_context(|| format!("Failed to create output file: {}", output))?;
    writer.write_record(["amino_acid", "optimal_codon", "weight"])?;
    for (amino_acid, codon, weight) in rows {
        writer.write_record([&amino_acid.to_string(), &codon, &weight.to_string()])?;
    }
    writer.flush()?;

    println!(
        "Wrote genome-wide optimal codons for {} amino acids to {}",
        optimal.len(),
        output
    );

    Ok(())
}
