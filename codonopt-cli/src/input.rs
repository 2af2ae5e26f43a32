use std::ffi::OsStr;
use std::fs;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use flate2::read::MultiGzDecoder;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Deserialize;

use codonopt_core::{BatchAccumulator, CodonTable};

/// One input row: a transcript identifier and its nucleotide sequence.
#[derive(Debug, Deserialize)]
pub struct InputRow {
    pub gene_name: String,
    pub sequence: String,
}

///
/// Get a reader for either a gzip'd or non-gzip'd file.
///
/// # Arguments
///
/// - path: path to the file to read
///
pub fn get_dynamic_reader(path: &Path) -> Result<BufReader<Box<dyn Read>>> {
    let is_gzipped = path.extension() == Some(OsStr::new("gz"));
    let file = File::open(path).with_context(|| format!("Failed to open file: {:?}", path))?;

    let file: Box<dyn Read> = match is_gzipped {
        true => Box::new(MultiGzDecoder::new(file)),
        false => Box::new(file),
    };

    let reader = BufReader::new(file);

    Ok(reader)
}

///
/// All `*.csv` / `*.csv.gz` files directly inside a directory, sorted so the
/// processing order is reproducible.
///
pub fn find_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("There was an error reading the input directory: {:?}", dir))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        let name = path.file_name().and_then(OsStr::to_str).unwrap_or_default();
        if name.ends_with(".csv") || name.ends_with(".csv.gz") {
            files.push(path);
        }
    }
    files.sort();

    if files.is_empty() {
        anyhow::bail!("No CSV files found in {:?}", dir);
    }

    Ok(files)
}

///
/// Read the `(gene_name, sequence)` rows of one CSV file. Rows that fail to
/// deserialize are reported and dropped here, before they reach the core.
///
pub fn read_rows(path: &Path) -> Result<Vec<InputRow>> {
    let reader = get_dynamic_reader(path)?;
    let mut csv_reader = csv::Reader::from_reader(reader);

    let mut rows = Vec::new();
    for result in csv_reader.deserialize() {
        match result {
            Ok(row) => rows.push(row),
            Err(e) => eprintln!("Warning: dropping malformed row in {:?}: {}", path, e),
        }
    }

    Ok(rows)
}

/// Accumulate one file's rows into a fresh, private accumulator.
pub fn process_file<'a>(table: &'a CodonTable, path: &Path) -> Result<BatchAccumulator<'a>> {
    let mut batch = BatchAccumulator::new(table);
    for row in read_rows(path)? {
        batch.process_row(&row.gene_name, &row.sequence);
    }
    Ok(batch)
}

///
/// Process a set of input files, one rayon worker per file. Each worker owns
/// a private accumulator; only complete per-file results are folded into the
/// merged state, after the parallel section.
///
pub fn process_files<'a>(table: &'a CodonTable, files: &[PathBuf]) -> Result<BatchAccumulator<'a>> {
    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} files ({eta})")?
            .progress_chars("##-"),
    );

    let partials: Vec<BatchAccumulator> = files
        .par_iter()
        .map(|file| {
            let batch = process_file(table, file)?;
            pb.inc(1);
            Ok(batch)
        })
        .collect::<Result<Vec<_>>>()?;

    pb.finish();

    let mut merged = BatchAccumulator::new(table);
    for partial in partials {
        merged.merge(partial);
    }

    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_sample_csv(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(body.as_bytes()).unwrap();
        path
    }

    #[fixture]
    fn sample_body() -> &'static str {
        "gene_name,sequence\ngeneX,ATGGCTGCTGCC\ngeneX,ATGGCTTTT\ngeneY,\"TTTAAA\"\n"
    }

    #[rstest]
    fn test_read_rows(sample_body: &str) {
        let dir = TempDir::new().unwrap();
        let path = write_sample_csv(dir.path(), "sample.csv", sample_body);

        let rows = read_rows(&path).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].gene_name, "geneX");
        assert_eq!(rows[2].sequence, "TTTAAA");
    }

    #[rstest]
    fn test_read_rows_gzipped(sample_body: &str) {
        use flate2::Compression;
        use flate2::write::GzEncoder;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sample.csv.gz");
        let file = File::create(&path).unwrap();
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder.write_all(sample_body.as_bytes()).unwrap();
        encoder.finish().unwrap();

        let rows = read_rows(&path).unwrap();
        assert_eq!(rows.len(), 3);
    }

    #[rstest]
    fn test_malformed_rows_dropped(sample_body: &str) {
        let dir = TempDir::new().unwrap();
        let body = format!("{}geneZ\n", sample_body);
        let path = write_sample_csv(dir.path(), "sample.csv", &body);

        // the field-count mismatch is dropped, not fatal
        let rows = read_rows(&path).unwrap();
        assert_eq!(rows.len(), 3);
    }

    #[rstest]
    fn test_find_csv_files_filters_and_sorts(sample_body: &str) {
        let dir = TempDir::new().unwrap();
        write_sample_csv(dir.path(), "b.csv", sample_body);
        write_sample_csv(dir.path(), "a.csv", sample_body);
        write_sample_csv(dir.path(), "notes.txt", "not a csv");

        let files = find_csv_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|f| f.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a.csv", "b.csv"]);
    }

    #[rstest]
    fn test_process_files_merges(sample_body: &str) {
        let dir = TempDir::new().unwrap();
        write_sample_csv(dir.path(), "a.csv", sample_body);
        write_sample_csv(dir.path(), "b.csv", sample_body);

        let table = CodonTable::standard();
        let files = find_csv_files(dir.path()).unwrap();
        let batch = process_files(&table, &files).unwrap();

        // geneX appears twice per file
        assert_eq!(batch.gene_counts().scale_factor("geneX"), 4);
        assert_eq!(batch.gene_counts().scale_factor("geneY"), 2);
    }
}
