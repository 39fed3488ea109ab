// Access log exporter: syslog access lines in, classified request metrics out.

// Core infrastructure
pub mod conf;
pub mod state;
pub mod metrics;

// Pipeline stages
pub mod input;
pub mod parser;
pub mod classify;
pub mod pipeline;

// Lifecycle
pub mod service;
pub mod web;
pub mod runtime;
