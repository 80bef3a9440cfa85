use std::path::Path;
use crate::error::MergeError;

///
/// An in-memory tabular extract - ordered headers and rows of text values.
///
/// Every value is text, including dates and codes, matching the source extracts' native
/// representation. Rows are always exactly as wide as the header row.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dataset {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Dataset {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let mut dataset = Self { headers, rows: Vec::with_capacity(rows.len()) };
        for row in rows {
            dataset.push_row(row);
        }
        dataset
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut [Vec<String>] {
        &mut self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn position(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }

    ///
    /// Append a row, padding or truncating it to the header width.
    ///
    pub fn push_row(&mut self, mut row: Vec<String>) {
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    pub fn retain_rows<F>(&mut self, f: F)
    where
        F: FnMut(&Vec<String>) -> bool {

        self.rows.retain(f);
    }

    ///
    /// Read a CSV extract into memory.
    ///
    /// Raw exports sometimes carry banner/title rows above the real header row. If any
    /// header_needles are given, leading rows are skipped until a row containing one of them
    /// (case-insensitive) is found - otherwise the first row is the header. Unnamed columns
    /// and entirely blank rows are dropped.
    ///
    pub fn read(path: &Path, header_needles: &[String]) -> Result<Self, MergeError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)
            .map_err(|source| MergeError::CannotOpenCsv { path: path.to_string_lossy().into(), source })?;

        let mut records: Vec<Vec<String>> = vec!();
        for result in rdr.records() {
            let record = result
                .map_err(|source| MergeError::CannotParseCsvRow { path: path.to_string_lossy().into(), source })?;
            records.push(record.iter().map(|field| field.to_string()).collect());
        }

        if records.is_empty() {
            return Ok(Self { headers: vec!(), rows: vec!() })
        }

        let header_idx = match header_needles.is_empty() {
            true => 0,
            false => {
                let needles: Vec<String> = header_needles.iter().map(|n| n.to_lowercase()).collect();
                records.iter()
                    .position(|row| row.iter().any(|cell| {
                        // Cells are tested individually - a needle must never match across
                        // cell boundaries.
                        let cell = cell.to_lowercase();
                        needles.iter().any(|needle| cell.contains(needle))
                    }))
                    .ok_or_else(|| MergeError::HeaderRowNotFound { path: path.to_string_lossy().into() })?
            },
        };

        // Keep only the named columns.
        let header_row = &records[header_idx];
        let keep: Vec<usize> = header_row.iter()
            .enumerate()
            .filter(|(_, header)| !header.trim().is_empty())
            .map(|(idx, _)| idx)
            .collect();
        let headers: Vec<String> = keep.iter().map(|&idx| header_row[idx].trim().to_string()).collect();

        let mut dataset = Self { headers, rows: vec!() };

        for row in &records[header_idx + 1..] {
            if row.iter().all(|value| value.trim().is_empty()) {
                continue
            }

            dataset.push_row(keep.iter().map(|&idx| row.get(idx).cloned().unwrap_or_default()).collect());
        }

        Ok(dataset)
    }

    ///
    /// Serialise the dataset back to a CSV file.
    ///
    pub fn write(&self, path: &Path) -> Result<(), MergeError> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(true)
            .quote_style(csv::QuoteStyle::Always)
            .from_path(path)
            .map_err(|source| MergeError::CannotOpenCsv { path: path.to_string_lossy().into(), source })?;

        writer.write_record(&self.headers)
            .map_err(|source| MergeError::CannotWriteCsvRow { path: path.to_string_lossy().into(), source })?;

        for row in &self.rows {
            writer.write_record(row)
                .map_err(|source| MergeError::CannotWriteCsvRow { path: path.to_string_lossy().into(), source })?;
        }

        writer.flush()?;
        Ok(())
    }
}
