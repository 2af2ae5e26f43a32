use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;

use codonopt_core::{CodonTable, normalize};

use crate::input::{find_csv_files, process_files};

pub fn run_usage(matches: &ArgMatches) -> Result<()> {
    let csvs = matches
        .get_one::<String>("csvs")
        .expect("A path to a folder of input CSV files is required.");

    let default_out = super::cli::DEFAULT_OUT.to_string();
    let output = matches.get_one::<String>("output").unwrap_or(&default_out);

    let table = CodonTable::standard();
    let files = find_csv_files(Path::new(csvs))?;
    let batch = process_files(&table, &files)?;
    let (stats, _gene_counts) = batch.into_parts();

    let usage = normalize(&stats);

    let mut rows: Vec<(String, char, String, f64)> = Vec::new();
    for (gene_name, by_amino_acid) in usage.iter() {
        for (amino_acid, fractions) in by_amino_acid.iter() {
            for (codon, fraction) in fractions.iter() {
                rows.push((gene_name.clone(), *amino_acid, codon.to_string(), *fraction));
            }
        }
    }
    rows.sort_by(|a, b| (&a.0, a.1, &a.2).cmp(&(&b.0, b.1, &b.2)));

    let mut writer = csv::Writer::from_path(output)
        .with_context(|| format!("Failed to create output file: {}", output))?;
    writer.write_record(["gene_name", "amino_acid", "codon", "usage"])?;
    for (gene_name, amino_acid, codon, fraction) in rows {
        writer.write_record([
            &gene_name,
            &amino_acid.to_string(),
            &codon,
            &format!("{:.4}", fraction),
        ])?;
    }
    writer.flush()?;

    println!(
        "Wrote codon usage for {} transcripts to {}",
        stats.n_transcripts(),
        output
    );

    Ok(())
}
