//! Per-URL pipeline: fetch → parse → resolve → record → report.

pub mod display;
pub mod gate;

pub use gate::{Gate, GateError};
