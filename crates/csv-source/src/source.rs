//! Lazy, forward-only CSV row iterator.

use crate::error::{Result, SourceError};
use crate::record::RawRecord;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Reads a CSV file row by row.
///
/// The underlying reader is owned by the source and released when the source
/// is dropped, whether iteration ran to completion or stopped early.
pub struct RecordSource<R = File> {
    source_name: String,
    reader: csv::Reader<R>,
    headers: Vec<String>,
    buffer: csv::StringRecord,
    rows_read: u64,
    finished: bool,
}

impl RecordSource<File> {
    /// Open a CSV file and validate its header row.
    ///
    /// A header row missing a required column is an error even when no data
    /// rows follow it; a file with no bytes at all is an empty source.
    ///
    /// # Arguments
    /// * `path` - Path to the CSV file
    /// * `required_columns` - Header names that must be present
    pub fn open(path: impl AsRef<Path>, required_columns: &[&str]) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| SourceError::FileAccess {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file, path.display().to_string(), required_columns)
    }
}

impl<R: Read> RecordSource<R> {
    /// Wrap an arbitrary reader. `source_name` is only used in logs and errors.
    pub fn from_reader(
        reader: R,
        source_name: impl Into<String>,
        required_columns: &[&str],
    ) -> Result<Self> {
        let source_name = source_name.into();
        info!("Processing CSV from: {source_name}");

        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()
            .map_err(|source| SourceError::Csv {
                source_name: source_name.clone(),
                source,
            })?
            .iter()
            .map(|h| h.to_string())
            .collect();

        // A file without even a header line is treated as an empty feed.
        let finished = headers.is_empty();
        if finished {
            debug!("CSV source {source_name} has no header row");
        } else {
            debug!("CSV headers/columns: {headers:?}");
            for column in required_columns {
                if !headers.iter().any(|h| h == column) {
                    return Err(SourceError::MissingColumn {
                        source_name,
                        column: column.to_string(),
                        found: headers.join(", "),
                    });
                }
            }
        }

        Ok(Self {
            source_name,
            reader: csv_reader,
            headers,
            buffer: csv::StringRecord::new(),
            rows_read: 0,
            finished,
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// Number of data rows yielded so far.
    pub fn rows_read(&self) -> u64 {
        self.rows_read
    }

    fn current_record(&self) -> RawRecord {
        let line = self
            .buffer
            .position()
            .map(|p| p.line())
            .unwrap_or(self.rows_read + 1);

        let fields: HashMap<String, String> = self
            .headers
            .iter()
            .zip(self.buffer.iter())
            .map(|(name, value)| (name.clone(), value.to_string()))
            .collect();

        RawRecord::new(line, fields)
    }
}

impl<R: Read> Iterator for RecordSource<R> {
    type Item = Result<RawRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.reader.read_record(&mut self.buffer) {
            Ok(true) => {
                self.rows_read += 1;
                Some(Ok(self.current_record()))
            }
            Ok(false) => {
                self.finished = true;
                debug!(
                    "Reached end of {} after {} rows",
                    self.source_name, self.rows_read
                );
                None
            }
            Err(source) => {
                self.finished = true;
                Some(Err(SourceError::Csv {
                    source_name: self.source_name.clone(),
                    source,
                }))
            }
        }
    }
}
