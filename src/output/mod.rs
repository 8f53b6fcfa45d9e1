//! CSV output sink and post-processing table utilities.

use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};

use crate::domain::RoadPointRecord;

/// Column order of a road-point table: road point (y, x), bearing, left
/// field point, right field point
pub const RECORD_HEADER: [&str; 7] = ["y", "x", "b", "x1", "y1", "x2", "y2"];

/// Fixed-point formatting, six decimals, never scientific notation
fn format_value(value: f64) -> String {
    format!("{:.6}", value)
}

/// Write one polygon's records as a CSV table
pub fn write_records(path: &Path, records: &[RoadPointRecord]) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).context(format!("Failed to create output file: {:?}", path))?;

    writer.write_record(RECORD_HEADER)?;
    for r in records {
        writer.write_record([
            format_value(r.lat),
            format_value(r.lon),
            format_value(r.bearing),
            format_value(r.left_lat),
            format_value(r.left_lon),
            format_value(r.right_lat),
            format_value(r.right_lon),
        ])?;
    }
    writer.flush()?;

    Ok(())
}

fn read_table(path: &Path) -> Result<(csv::StringRecord, Vec<csv::StringRecord>)> {
    let mut reader =
        csv::Reader::from_path(path).context(format!("Failed to read CSV file: {:?}", path))?;
    let headers = reader.headers()?.clone();
    let rows = reader
        .records()
        .collect::<Result<Vec<_>, _>>()
        .context("Failed to parse CSV rows")?;
    Ok((headers, rows))
}

fn write_table(path: &Path, headers: &csv::StringRecord, rows: &[csv::StringRecord]) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).context(format!("Failed to write CSV file: {:?}", path))?;
    writer.write_record(headers)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Keep every `stride`-th data row of a table, rewriting it in place.
/// Used to thin dense sampling output before downstream imagery requests.
pub fn thin_rows(path: &Path, stride: usize) -> Result<()> {
    if stride == 0 {
        bail!("stride must be at least 1");
    }

    let (headers, rows) = read_table(path)?;
    let kept: Vec<csv::StringRecord> = rows.into_iter().step_by(stride).collect();
    write_table(path, &headers, &kept)
}

/// Split a table into chunks of at most `chunk_size` data rows, written as
/// `<stem>-<i>.csv` in `out_dir`. The header is repeated in every chunk.
pub fn split_table(path: &Path, chunk_size: usize, out_dir: &Path) -> Result<Vec<PathBuf>> {
    if chunk_size == 0 {
        bail!("chunk size must be at least 1");
    }

    let (headers, rows) = read_table(path)?;
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("table");

    std::fs::create_dir_all(out_dir)
        .context(format!("Failed to create output directory: {:?}", out_dir))?;

    let mut written = Vec::new();
    for (i, chunk) in rows.chunks(chunk_size).enumerate() {
        let out_path = out_dir.join(format!("{}-{}.csv", stem, i));
        write_table(&out_path, &headers, chunk)?;
        written.push(out_path);
    }

    Ok(written)
}

/// Rename the first two columns of a table to `y`, `x`, in place
pub fn rename_coordinate_columns(path: &Path) -> Result<()> {
    let (headers, rows) = read_table(path)?;
    if headers.len() < 2 {
        bail!("table has fewer than 2 columns: {:?}", path);
    }

    let renamed: csv::StringRecord = headers
        .iter()
        .enumerate()
        .map(|(i, h)| match i {
            0 => "y",
            1 => "x",
            _ => h,
        })
        .collect();

    write_table(path, &renamed, &rows)
}
