//! Service modules for lyrics fetch orchestration
//!
//! Leaf-first: the normalizer and similarity ratio are pure text utilities,
//! the validator builds on them, the registry maps ids to fetch
//! capabilities, the two runners drive providers through the registry, and
//! the orchestrator picks a strategy and delegates.

pub mod match_validator;
pub mod normalizer;
pub mod orchestrator;
pub mod race_coordinator;
pub mod registry;
pub mod sequential_runner;
pub mod similarity;

pub use match_validator::MatchValidator;
pub use orchestrator::{FetchOrchestrator, Strategy};
pub use race_coordinator::RaceCoordinator;
pub use registry::FetcherRegistry;
pub use sequential_runner::SequentialRunner;
