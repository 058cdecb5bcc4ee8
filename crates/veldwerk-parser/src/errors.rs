use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{table} export CSV error: {source}")]
    Csv {
        table: &'static str,
        #[source]
        source: csv::Error,
    },

    #[error("{table} export is missing a required column; tried {candidates:?}")]
    MissingColumn {
        table: &'static str,
        candidates: &'static [&'static str],
    },

    #[error("{table} export did not contain any data rows")]
    EmptyTable { table: &'static str },
}
