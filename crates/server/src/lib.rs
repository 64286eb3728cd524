//! Server crate for the talent-scout sourcing engine.
//!
//! This crate wires the components into runs:
//! - [`ParallelSearchExecutor`]: batched, concurrent strategy execution
//! - [`stages`]: sourcing, analysis and engagement stages
//! - [`AgentPipeline`]: the stages connected by channels
//! - [`RecruitingOrchestrator`]: long-lived resources and per-job runs

pub mod agent_pipeline;
pub mod config;
pub mod events;
pub mod executor;
pub mod orchestrator;
pub mod stages;

pub use agent_pipeline::{AgentPipeline, PipelineOutcome, SourcingError};
pub use config::{ConfigError, ScoutConfig};
pub use events::{BroadcastSink, EventEmitter, ProgressEvent, ProgressSink, Stage, TracingSink};
pub use executor::{ParallelSearchExecutor, SearchReport};
pub use orchestrator::RecruitingOrchestrator;
