//! Runtime module: boot, serve and shutdown of the exporter.

pub mod boot;
pub mod serve;
pub mod stop;
