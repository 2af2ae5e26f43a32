use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use codonopt_core::{CodonTable, GeneCounts, TranscriptProfile};

use crate::input::{find_csv_files, read_rows};

#[derive(Serialize)]
struct RankRecord {
    gene_name: String,
    amino_acid: char,
    optimal_codon: String,
    usage_rate: String,
}

/// Strip `.csv` / `.csv.gz` from a file name.
fn file_stem(path: &Path) -> String {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    name.trim_end_matches(".gz")
        .trim_end_matches(".csv")
        .to_string()
}

pub fn run_rank(matches: &ArgMatches) -> Result<()> {
    let csvs = matches
        .get_one::<String>("csvs")
        .expect("A path to a folder of input CSV files is required.");

    let default_out_dir = super::cli::DEFAULT_OUT_DIR.to_string();
    let output_dir = matches
        .get_one::<String>("output-dir")
        .unwrap_or(&default_out_dir);
    let output_dir = Path::new(output_dir);

    let scaled = matches.get_flag("scaled");

    let table = CodonTable::standard();
    let files = find_csv_files(Path::new(csvs))?;

    fs::create_dir_all(output_dir).with_context(|| {
        format!(
            "There was an error creating the output directory: {:?}",
            output_dir
        )
    })?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed}] {msg} ({per_sec})")?
            .tick_strings(&["-", "\\", "|", "/"]),
    );
    spinner.set_message("Processing sequence files...");

    let mut processed_rows: u64 = 0;

    for file in &files {
        let rows = read_rows(file)?;

        let mut gene_counts = GeneCounts::new();
        let mut profiles: HashMap<String, TranscriptProfile> = HashMap::new();

        for row in rows {
            let gene_name = row.gene_name.trim().to_string();
            gene_counts.record(&gene_name);
            profiles
                .entry(gene_name.clone())
                .or_insert_with(|| TranscriptProfile::new(gene_name))
                .add_sequence(&table, &row.sequence);

            processed_rows += 1;
            if processed_rows % 10_000 == 0 {
                spinner.set_message(format!("Processed {} rows", processed_rows));
            }
            spinner.inc(1);
        }

        let mut records = Vec::new();
        for profile in profiles.values_mut() {
            profile.build_heaps();
            if scaled {
                let scale_factor = gene_counts.scale_factor(profile.gene_name());
                profile.rescale(scale_factor);
            }
            for (amino_acid, (codon, rate)) in profile.optimal_codons() {
                records.push(RankRecord {
                    gene_name: profile.gene_name().to_string(),
                    amino_acid,
                    optimal_codon: codon.to_string(),
                    usage_rate: format!("{:.4}", rate),
                });
            }
        }
        records.sort_by(|a, b| {
            (a.gene_name.as_str(), a.amino_acid).cmp(&(b.gene_name.as_str(), b.amino_acid))
        });

        let out_path = output_dir.join(format!("{}_optimal_codons.csv", file_stem(file)));
        let mut writer = csv::Writer::from_path(&out_path)
            .with_context(|| format!("Failed to create output file: {:?}", out_path))?;
        for record in records {
            writer.serialize(record)?;
        }
        writer.flush()?;
    }

    spinner.finish_with_message("Done!");
    println!(
        "Optimal codons for {} files written to {:?}",
        files.len(),
        output_dir
    );

    Ok(())
}
