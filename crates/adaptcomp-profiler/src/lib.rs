//! Content profiling for adaptcomp
//!
//! This crate turns raw bytes into an eight-dimensional [`ContentProfile`] and a
//! content classification. Profiling is deterministic, performs no I/O and never
//! fails: empty input yields the all-zero profile classified as `Unknown`.
//!
//! # Examples
//!
//! ```rust
//! use adaptcomp_profiler::ContentProfiler;
//! use adaptcomp_types::ContentClass;
//!
//! let profiler = ContentProfiler::new();
//! let profile = profiler.profile(b"AAAAAAAAAAAAAAAA");
//! assert_eq!(profile.entropy(), 0.0);
//! assert_eq!(profile.class(), ContentClass::Text);
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod classify;
pub mod entropy;
pub mod language;
pub mod patterns;
pub mod structure;

pub use classify::{classify, Classification};

use adaptcomp_types::{ContentProfile, ProfilerConfig};
use tracing::debug;

/// Computes content profiles
#[derive(Debug, Clone, Default)]
pub struct ContentProfiler {
    config: ProfilerConfig,
}

impl ContentProfiler {
    /// Create a profiler with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a profiler with a custom configuration
    pub fn with_config(config: ProfilerConfig) -> Self {
        Self { config }
    }

    /// Get the profiler configuration
    pub fn config(&self) -> &ProfilerConfig {
        &self.config
    }

    /// Profile a content item
    pub fn profile(&self, content: &[u8]) -> ContentProfile {
        if content.is_empty() {
            return ContentProfile::zero();
        }

        // Entropy and redundancy cover the whole input; the rest scan a bounded prefix
        let sample = &content[..content.len().min(self.config.sample_limit.max(1))];
        let text = String::from_utf8_lossy(sample);

        let entropy = entropy::shannon_entropy(content);
        let redundancy = entropy::redundancy_ratio(content);
        let language_complexity = language::language_complexity(&text);
        let code_structure = structure::code_structure_density(&text);
        let semantic_density = language::semantic_density(&text);
        let pattern_frequency = patterns::pattern_frequency(sample);
        let potential = patterns::compression_potential(entropy, redundancy, pattern_frequency);
        let classification = classify(sample, &text);

        debug!(
            "Profiled {} bytes as {} (confidence {:.2}): entropy={:.3}, redundancy={:.3}, patterns={:.4}",
            content.len(),
            classification.class,
            classification.confidence,
            entropy,
            redundancy,
            pattern_frequency
        );

        ContentProfile::new(
            [
                entropy,
                language_complexity,
                code_structure,
                redundancy,
                semantic_density,
                pattern_frequency,
                potential,
                classification.confidence,
            ],
            classification.class,
            classification.language,
        )
    }
}
