//! Core type system and error handling for adaptcomp
//!
//! This crate provides the foundational types, error handling, and shared data structures
//! used throughout the adaptcomp decision engine. It includes:
//!
//! - **Error handling**: A single error type with severity levels and retry hints
//! - **Core types**: Content profiles, algorithm families and variants, ledger keys
//! - **Parameters**: Tuned parameter sets and the bounds they must respect
//! - **Traits**: The `PerformanceLedger` and `Codec` collaborator boundaries
//! - **Configuration**: Validated configuration sections for every engine stage
//!
//! # Features
//!
//! - `serde`: Enable serialization support
//!
//! # Examples
//!
//! ```rust
//! use adaptcomp_types::{AlgorithmFamily, AlgorithmVariant};
//!
//! assert_eq!(AlgorithmVariant::Zstd.family(), AlgorithmFamily::Dictionary);
//! assert!(AlgorithmFamily::Lz77.variants().contains(&AlgorithmVariant::Gzip));
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod decision;
pub mod error;
pub mod parameters;
pub mod result;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use config::{EngineConfig, OptimizerConfig, Probability, ProfilerConfig, SelectorConfig};
pub use decision::{Alternative, CompressionOutcome, Decision, LedgerStats, SearchStrategy};
pub use error::{Error, ErrorKind, ErrorSeverity};
pub use parameters::{ParameterBounds, ParameterSpec, ParameterValue, Parameters};
pub use result::Result;
pub use traits::{Codec, PerformanceLedger};
pub use types::*;
