//! Decision records and feedback statistics
//!
//! A [`Decision`] is the sole object the engine hands to its callers. After the
//! caller has run a codec, the observed [`CompressionOutcome`] flows back into
//! the ledger as [`LedgerStats`].

use crate::{AlgorithmVariant, ContentClass, ContentProfile, ContentSignature, Parameters};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

const MIB: f64 = 1024.0 * 1024.0;

/// Parameter search strategy that produced a decision's parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SearchStrategy {
    /// Exhaustive evaluation of a coarse grid
    GridSearch,
    /// Uniform random sampling within bounds
    IterativeSampling,
    /// Genetic algorithm
    Genetic,
    /// Epsilon-greedy multi-armed bandit
    Bandit,
    /// Deterministic fallback derived from the content profile
    Heuristic,
}

impl fmt::Display for SearchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SearchStrategy::GridSearch => "grid-search",
            SearchStrategy::IterativeSampling => "iterative-sampling",
            SearchStrategy::Genetic => "genetic",
            SearchStrategy::Bandit => "bandit",
            SearchStrategy::Heuristic => "heuristic",
        };
        f.write_str(name)
    }
}

/// A ranked fallback candidate
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Alternative {
    /// Candidate variant
    pub variant: AlgorithmVariant,
    /// Combined selection score (0-1)
    pub score: f64,
    /// Confidence, `min(score * 1.2, 1.0)`
    pub confidence: f64,
}

impl Alternative {
    /// Build an alternative, deriving its confidence from the score
    pub fn new(variant: AlgorithmVariant, score: f64) -> Self {
        Self {
            variant,
            score,
            confidence: (score * 1.2).min(1.0),
        }
    }
}

/// Output of one engine invocation
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Decision {
    /// Content profile, serialized flat as `profile`, `content_class` and `detected_language`
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub profile: ContentProfile,
    /// Ledger key of the content
    pub signature: ContentSignature,
    /// Selected variant
    pub selected_variant: AlgorithmVariant,
    /// Tuned parameters for the selected variant
    pub parameters: Parameters,
    /// Predicted selection score (0-1)
    pub predicted_score: f64,
    /// Strategy that produced the parameters
    pub strategy: SearchStrategy,
    /// Ranked fallback candidates, best first
    pub alternatives: Vec<Alternative>,
}

impl Decision {
    /// Content class of the decided content
    pub fn content_class(&self) -> ContentClass {
        self.profile.class()
    }

    /// Selected variant followed by the alternatives, in trial order
    pub fn candidates(&self) -> Vec<AlgorithmVariant> {
        std::iter::once(self.selected_variant)
            .chain(self.alternatives.iter().map(|alternative| alternative.variant))
            .collect()
    }
}

/// Running statistics for one (signature, variant) key
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LedgerStats {
    /// Average compressed/original size ratio
    pub avg_ratio: f64,
    /// Average compression time in seconds
    pub avg_time_secs: f64,
    /// Average quality score (0-1)
    pub avg_quality: f64,
    /// Number of recorded outcomes
    pub count: u64,
}

impl LedgerStats {
    /// Fold one observation into the running averages
    pub fn record(&mut self, ratio: f64, time_secs: f64, quality: f64) {
        self.count += 1;
        let n = self.count as f64;
        self.avg_ratio = (self.avg_ratio * (n - 1.0) + ratio) / n;
        self.avg_time_secs = (self.avg_time_secs * (n - 1.0) + time_secs) / n;
        self.avg_quality = (self.avg_quality * (n - 1.0) + quality) / n;
    }
}

/// Observed result of one codec invocation
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CompressionOutcome {
    /// Input size in bytes
    pub original_size: u64,
    /// Output size in bytes (0 on failure)
    pub compressed_size: u64,
    /// Wall-clock time spent in the codec
    pub elapsed: Duration,
    /// Whether the codec succeeded
    pub success: bool,
}

impl CompressionOutcome {
    /// A successful compression
    pub fn succeeded(original_size: u64, compressed_size: u64, elapsed: Duration) -> Self {
        Self {
            original_size,
            compressed_size,
            elapsed,
            success: true,
        }
    }

    /// A failed compression attempt
    pub fn failed(original_size: u64, elapsed: Duration) -> Self {
        Self {
            original_size,
            compressed_size: 0,
            elapsed,
            success: false,
        }
    }

    /// Compressed/original size ratio; 1.0 for empty input or failures
    pub fn ratio(&self) -> f64 {
        if self.original_size == 0 || !self.success {
            1.0
        } else {
            self.compressed_size as f64 / self.original_size as f64
        }
    }

    /// Derived quality score combining size reduction and throughput
    pub fn quality(&self) -> f64 {
        if !self.success {
            return 0.0;
        }

        let secs = self.elapsed.as_secs_f64();
        let secs_per_mib = if self.original_size == 0 {
            0.0
        } else {
            secs / (self.original_size as f64 / MIB)
        };
        let speed_score = 1.0 / (1.0 + secs_per_mib);

        (0.7 * (1.0 - self.ratio()) + 0.3 * speed_score).clamp(0.0, 1.0)
    }
}
