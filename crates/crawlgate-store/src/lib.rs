//! Storage layer: append-only NDJSON provenance log and pluggable sinks.

mod error;
pub use error::StoreError;

mod recorder;
pub use recorder::ProvenanceRecorder;

pub mod sink;
pub use sink::{DEFAULT_LOG_PATH, JsonlFileSink, LogSink, MemorySink, read_records};
