//! State module: shared exporter state.

pub mod exporter;

pub use exporter::{ExporterState, SharedState};
