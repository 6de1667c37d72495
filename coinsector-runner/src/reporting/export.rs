//! Combined dataset CSV export.
//!
//! Columns: `date`, then instruments in fetch order, then sectors in
//! definition order. Missing instrument values are empty cells.

use anyhow::{Context, Result};
use coinsector_core::CombinedDataset;
use std::io::Write;
use std::path::Path;

/// Serialize the dataset as CSV into any writer.
pub fn write_csv<W: Write>(writer: W, dataset: &CombinedDataset) -> Result<()> {
    let matrix = dataset.matrix();
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = Vec::with_capacity(matrix.n_cols() + 1);
    header.push("date");
    header.extend(matrix.column_names().iter().map(String::as_str));
    wtr.write_record(&header)?;

    let mut record = Vec::with_capacity(matrix.n_cols() + 1);
    for (row, date) in matrix.index().iter().enumerate() {
        record.clear();
        record.push(date.format("%Y-%m-%d").to_string());
        for col in 0..matrix.n_cols() {
            record.push(match matrix.get(row, col) {
                Some(v) => v.to_string(),
                None => String::new(),
            });
        }
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

/// The dataset as an in-memory CSV string.
pub fn dataset_csv(dataset: &CombinedDataset) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(&mut buf, dataset)?;
    String::from_utf8(buf).context("CSV output is not UTF-8")
}

/// Write the dataset CSV to `path`, creating parent directories.
pub fn write_dataset_csv(path: &Path, dataset: &CombinedDataset) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory {}", parent.display()))?;
    }
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create dataset CSV {}", path.display()))?;
    write_csv(file, dataset)
        .with_context(|| format!("Failed to write dataset CSV {}", path.display()))
}
