//! Adaptive compression decision engine
//!
//! This crate turns raw content into a compression [`Decision`]: which algorithm
//! variant to use, with which tuned parameters, and which alternatives to try if
//! it fails. Decisions improve over time through a [`PerformanceLedger`] fed with
//! observed outcomes.
//!
//! # Features
//!
//! - **Hierarchical Selection**: family then variant, blending content heuristics
//!   with ledger history and epsilon-style exploration
//! - **Parameter Search**: grid, sampling, genetic and bandit strategies chosen by
//!   content complexity, with a deterministic heuristic fallback
//! - **Feedback Ledger**: thread-safe in-memory running statistics per content
//!   signature and variant
//! - **Codec Fallback**: drive any [`Codec`](adaptcomp_types::Codec) through the
//!   ranked candidates until one succeeds
//!
//! # Examples
//!
//! ```rust
//! use adaptcomp_engine::{DecisionOrchestrator, InMemoryLedger};
//! use adaptcomp_types::EngineConfig;
//! use std::sync::Arc;
//!
//! # fn example() -> adaptcomp_types::Result<()> {
//! let config = EngineConfig { seed: Some(7), ..EngineConfig::default() };
//! let engine = DecisionOrchestrator::new(config, Arc::new(InMemoryLedger::new()))?;
//! let decision = engine.decide(b"fn main() { println!(\"hello\"); }");
//! println!("{} with {:?}", decision.selected_variant, decision.parameters);
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod bounds;
pub mod engine;
pub mod ledger;
pub mod optimizer;
pub mod selector;
pub mod strategies;

pub use adaptcomp_types::{Decision, PerformanceLedger};
pub use bounds::BoundsTable;
pub use engine::{CompressionReport, DecisionOrchestrator};
pub use ledger::InMemoryLedger;
pub use optimizer::{Optimized, ParameterOptimizer};
pub use selector::{AlgorithmSelector, Selection};
pub use strategies::OptimizationTrial;

#[cfg(test)]
mod optimizer_tests;
