//! Built-in self-checks

pub mod config;
pub mod engine;
pub mod queue;

pub use config::ConfigCheck;
pub use engine::EngineCheck;
pub use queue::QueueCheck;
