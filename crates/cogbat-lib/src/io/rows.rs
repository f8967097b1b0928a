use crate::error::ParseError;
use csv::{ByteRecord, ReaderBuilder};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// One comma-split physical line of a task log.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRow {
    /// 1-based line number in the source file.
    pub line: usize,
    pub cells: Vec<String>,
}

impl LogRow {
    pub fn new<S: Into<String>>(line: usize, cells: impl IntoIterator<Item = S>) -> Self {
        Self {
            line,
            cells: cells.into_iter().map(Into::into).collect(),
        }
    }

    pub fn first(&self) -> &str {
        self.cell(0)
    }

    /// Cell at `idx`, or the empty string past the end of a short row.
    pub fn cell(&self, idx: usize) -> &str {
        self.cells.get(idx).map(String::as_str).unwrap_or("")
    }

    /// True when the first cell is empty or whitespace, the mark of a data row.
    pub fn is_data(&self) -> bool {
        self.first().trim().is_empty()
    }

    /// Short excerpt of the row for error messages.
    pub fn fragment(&self) -> String {
        const LIMIT: usize = 80;
        let joined = self.cells.join(",");
        if joined.chars().count() > LIMIT {
            let cut: String = joined.chars().take(LIMIT).collect();
            format!("{}...", cut)
        } else {
            joined
        }
    }

    pub(crate) fn bad_line(&self) -> ParseError {
        ParseError::BadLine {
            line: self.line,
            content: self.fragment(),
        }
    }
}

/// Split a log into rows. Logs have no header row and rows vary in length.
///
/// Cells are decoded lossily, so a stray non-UTF-8 byte becomes U+FFFD
/// instead of failing the file. Blank lines yield no row but still count
/// toward the line numbers.
pub fn read_rows<R: Read>(mut reader: R) -> Result<Vec<LogRow>, ParseError> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    let starts = line_starts(&bytes);

    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes.as_slice());
    let mut record = ByteRecord::new();
    let mut rows = Vec::new();
    while csv_reader.read_byte_record(&mut record)? {
        let offset = record.position().map_or(0, |pos| pos.byte() as usize);
        let line = line_at(&bytes, &starts, offset);
        let cells = record
            .iter()
            .map(|cell| String::from_utf8_lossy(cell).into_owned());
        rows.push(LogRow::new(line, cells));
    }
    Ok(rows)
}

/// Byte offsets where each physical line begins. `\r\n`, `\r` and `\n`
/// all end a line.
fn line_starts(bytes: &[u8]) -> Vec<usize> {
    let mut starts = vec![0];
    let mut idx = 0;
    while idx < bytes.len() {
        match bytes[idx] {
            b'\r' if bytes.get(idx + 1) == Some(&b'\n') => {
                idx += 2;
                starts.push(idx);
            }
            b'\r' | b'\n' => {
                idx += 1;
                starts.push(idx);
            }
            _ => idx += 1,
        }
    }
    starts
}

/// 1-based line of the first non-terminator byte at or after `offset`.
/// The reader reports a record's offset before any blank lines it skipped.
fn line_at(bytes: &[u8], starts: &[usize], offset: usize) -> usize {
    let offset = offset.min(bytes.len());
    let first = bytes[offset..]
        .iter()
        .position(|b| !matches!(b, b'\r' | b'\n'))
        .map_or(bytes.len(), |skip| offset + skip);
    match starts.binary_search(&first) {
        Ok(idx) => idx + 1,
        Err(idx) => idx,
    }
}

pub fn parse_rows(text: &str) -> Result<Vec<LogRow>, ParseError> {
    read_rows(text.as_bytes())
}

pub fn read_rows_from_path(path: &Path) -> Result<Vec<LogRow>, ParseError> {
    let file = File::open(path)?;
    read_rows(file)
}
