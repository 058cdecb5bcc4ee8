use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::{Reader, ReaderBuilder, StringRecord};

use crate::errors::ExportError;

/// The exports are `;`-delimited and occasionally ragged at the tail of a
/// row, so the reader is flexible about field counts.
pub(crate) fn export_reader<R: Read>(input: R) -> Reader<R> {
    ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_reader(input)
}

pub(crate) fn open_export(path: &Path) -> Result<Reader<BufReader<File>>, ExportError> {
    let file = File::open(path).map_err(|source| ExportError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(export_reader(BufReader::new(file)))
}

/// Resolves column positions against the header row.
///
/// The export tool disambiguates duplicate headers by appending `...<n>`
/// (e.g. `Veldbezoek ID...23`), so a candidate matches either exactly or
/// with such a suffix.
pub(crate) struct HeaderMap {
    table: &'static str,
    columns: Vec<String>,
}

impl HeaderMap {
    pub(crate) fn new(table: &'static str, headers: &StringRecord) -> Self {
        Self {
            table,
            columns: headers.iter().map(|h| h.trim().to_string()).collect(),
        }
    }

    pub(crate) fn required(
        &self,
        candidates: &'static [&'static str],
    ) -> Result<usize, ExportError> {
        self.optional(candidates)
            .ok_or(ExportError::MissingColumn {
                table: self.table,
                candidates,
            })
    }

    pub(crate) fn optional(&self, candidates: &'static [&'static str]) -> Option<usize> {
        for candidate in candidates {
            if let Some(index) = self
                .columns
                .iter()
                .position(|header| column_matches(header, candidate))
            {
                return Some(index);
            }
        }
        None
    }
}

fn column_matches(header: &str, candidate: &str) -> bool {
    if header == candidate {
        return true;
    }
    match header.strip_prefix(candidate) {
        Some(rest) => match rest.strip_prefix("...") {
            Some(digits) => !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()),
            None => false,
        },
        None => false,
    }
}

pub(crate) fn clean_optional(record: &StringRecord, index: Option<usize>) -> Option<String> {
    index
        .and_then(|i| record.get(i))
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
}

pub(crate) fn csv_error(table: &'static str) -> impl Fn(csv::Error) -> ExportError {
    move |source| ExportError::Csv { table, source }
}
