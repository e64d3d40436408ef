// External crates
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use log::info;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

// Local modules
use crate::constants::{
    EXCHANGE_FIELD_COUNT, EXCHANGE_HEADER_LINES, RESHAPED_HEADER, RESHAPED_SUFFIX,
    RESHAPE_PROJECTION,
};
use crate::error::{ForecastError, Result};

/// Reader state while walking an exchange export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReshapeState {
    SkipHeader { remaining: usize },
    Emit,
}

/// Outcome of a file reshape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReshapeSummary {
    pub output_path: PathBuf,
    pub rows_written: usize,
}

/// Default output path: the input path with `_output.csv` appended
pub fn default_output_path(input: &Path) -> PathBuf {
    let mut name = input.as_os_str().to_os_string();
    name.push(RESHAPED_SUFFIX);
    PathBuf::from(name)
}

/// Projects one 9-field exchange record onto the `Date,Open,High,Low,Close,Adj Close` layout
pub fn project_record(record: &StringRecord, line: u64) -> Result<StringRecord> {
    if record.len() != EXCHANGE_FIELD_COUNT {
        return Err(ForecastError::MalformedRow {
            line,
            expected: EXCHANGE_FIELD_COUNT,
            found: record.len(),
        });
    }

    // Field count was checked above, so every index is in range
    Ok(RESHAPE_PROJECTION
        .iter()
        .map(|&idx| &record[idx])
        .collect::<StringRecord>())
}

// The csv reader skips empty lines, so every line is parsed on its own and a
// blank one becomes a record with no fields
fn parse_line(line: &str) -> Result<StringRecord> {
    let mut record = StringRecord::new();
    if line.is_empty() {
        return Ok(record);
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes());
    reader.read_record(&mut record)?;
    Ok(record)
}

/// Reads an exchange export and returns the reshaped data rows
///
/// The first two lines are discarded as headers, blank ones included. Every
/// remaining line must carry exactly nine fields; a blank data line is a
/// `MalformedRow` with zero fields.
pub fn reshape_rows<R: Read>(mut input: R) -> Result<Vec<StringRecord>> {
    let mut text = String::new();
    input.read_to_string(&mut text)?;

    let mut state = ReshapeState::SkipHeader {
        remaining: EXCHANGE_HEADER_LINES,
    };
    let mut rows = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let record = parse_line(line)?;
        match state {
            ReshapeState::SkipHeader { remaining } => {
                state = if remaining > 1 {
                    ReshapeState::SkipHeader {
                        remaining: remaining - 1,
                    }
                } else {
                    ReshapeState::Emit
                };
            }
            ReshapeState::Emit => {
                rows.push(project_record(&record, idx as u64 + 1)?);
            }
        }
    }

    Ok(rows)
}

/// Writes the fixed header followed by the reshaped rows
pub fn write_rows<W: Write>(output: W, rows: &[StringRecord]) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(output);
    writer.write_record(RESHAPED_HEADER)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Reshapes a stream; nothing reaches `output` unless the whole input is valid
///
/// # Returns
///
/// Returns the number of data rows written
pub fn reshape_records<R: Read, W: Write>(input: R, output: W) -> Result<usize> {
    let rows = reshape_rows(input)?;
    write_rows(output, &rows)?;
    Ok(rows.len())
}

/// Reshapes an exchange export file into the six-column daily layout
///
/// # Arguments
///
/// * `input` - Path to the exchange export
/// * `output` - Destination path; defaults to `<input>_output.csv`
///
/// # Returns
///
/// Returns a summary with the output path and the number of rows written
pub fn reshape_file(input: &Path, output: Option<&Path>) -> Result<ReshapeSummary> {
    if !input.exists() {
        return Err(ForecastError::FileNotFound(input.to_path_buf()));
    }

    let output_path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output_path(input));

    info!("Reshaping {} into {}", input.display(), output_path.display());

    let rows = reshape_rows(File::open(input)?)?;
    write_rows(File::create(&output_path)?, &rows)?;

    info!(
        "Data has been converted and saved to {} ({} rows)",
        output_path.display(),
        rows.len()
    );

    Ok(ReshapeSummary {
        output_path,
        rows_written: rows.len(),
    })
}
