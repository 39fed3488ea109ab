/// Request classification
///
/// Derives stable metric labels from a tokenized access-log line.
///
/// # Pipeline
///
/// For each line, in order:
/// 1. custom user-agent rules (`rules.rs`, `user_agent.rs`)
/// 2. internal subnet filter (`subnet.rs`)
/// 3. cached fallback classification (`cache.rs`, `fallback.rs`)
/// 4. device type (`device.rs`)
/// 5. status, host, URI and duration (`request.rs`)
///
/// `engine.rs` composes the steps; none of them can fail a line.

pub mod cache;
pub mod device;
pub mod engine;
pub mod fake;
pub mod fallback;
pub mod model;
pub mod request;
pub mod rules;
pub mod subnet;
pub mod user_agent;

pub use cache::{CacheStats, ClassificationCache, ZeroCapacity};
pub use engine::ClassificationEngine;
pub use fallback::{UaParserClassifier, UserAgentClassifier};
pub use model::{ClassificationResult, ClassifyError, DeviceType, UaDetection, UaLabels};
pub use rules::{HostRule, Rules, UaMatcher, UriRule, UserAgentRule};
pub use subnet::InternalSubnets;
