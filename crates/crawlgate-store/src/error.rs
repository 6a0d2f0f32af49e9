use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("provenance log I/O error on {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("provenance record encoding error: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("malformed provenance record at line {line}: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0}")]
    Other(String),
}
