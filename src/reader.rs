use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::rc::Rc;

use csv::{Position, ReaderBuilder, StringRecord};
use indexmap::IndexMap;
use log::{debug, info, warn};

use crate::error::{PipetreeError, Result};

/// Column name to field position, shared by every row of one input.
type HeaderIndex = Rc<IndexMap<String, usize>>;

/// A single data row of the usage export, addressed by header name.
#[derive(Debug, Clone)]
pub struct Row {
    line: u64,
    headers: HeaderIndex,
    values: StringRecord,
}

impl Row {
    /// Line of the input this row was read from (the header is line 1).
    pub fn line(&self) -> u64 {
        self.line
    }

    /// Looks up a column by its exact header name.
    ///
    /// # Errors
    ///
    /// Returns `MissingField` when the header does not name `column` or the
    /// row has no value at that position.
    pub fn get(&self, column: &'static str) -> Result<&str> {
        self.headers
            .get(column)
            .and_then(|&index| self.values.get(index))
            .ok_or(PipetreeError::MissingField {
                column,
                line: self.line,
            })
    }

    /// Owned copy of a column value.
    pub fn take(&self, column: &'static str) -> Result<String> {
        self.get(column).map(str::to_owned)
    }
}

/// Reads every row of a delimited usage export into memory.
///
/// # Errors
///
/// Returns `Input` if the file cannot be opened, or `Csv` if any record is
/// malformed (including rows whose field count differs from the header).
pub fn read_rows(path: &Path, delimiter: u8) -> Result<Vec<Row>> {
    debug!("Opening input: {}", path.display());

    let file = File::open(path).map_err(|source| PipetreeError::Input {
        path: path.to_path_buf(),
        source,
    })?;

    let rows = parse_rows(BufReader::new(file), delimiter)?;

    if rows.is_empty() {
        warn!("No data rows found in {}", path.display());
    } else {
        info!("Read {} rows from {}", rows.len(), path.display());
    }

    Ok(rows)
}

/// Parses delimited text with a header row into rows.
pub fn parse_rows<R: Read>(input: R, delimiter: u8) -> Result<Vec<Row>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .from_reader(input);

    // Repeated header names resolve to their last position.
    let headers: HeaderIndex = Rc::new(
        reader
            .headers()?
            .iter()
            .enumerate()
            .map(|(index, name)| (name.to_owned(), index))
            .collect(),
    );
    debug!("Input header has {} columns", headers.len());

    reader
        .records()
        .map(|result| {
            let values = result?;
            let line = values.position().map_or(0, Position::line);
            Ok(Row {
                line,
                headers: Rc::clone(&headers),
                values,
            })
        })
        .collect()
}
