//! Configuration types for adaptcomp
//!
//! This module provides the configuration sections for every engine stage, with
//! validation and serialization support. File and environment loading lives in
//! the `adaptcomp-config` crate.

use crate::{Error, Result};

/// A probability in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "f64", into = "f64"))]
pub struct Probability(f64);

impl Probability {
    /// Never
    pub const ZERO: Probability = Probability(0.0);

    /// Create a new probability with validation
    pub fn new(value: f64) -> std::result::Result<Self, String> {
        if value.is_finite() && (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(format!("Probability {} must be within [0, 1]", value))
        }
    }

    /// Get the probability value
    pub fn get(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Probability {
    type Error = String;

    fn try_from(value: f64) -> std::result::Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Probability> for f64 {
    fn from(probability: Probability) -> Self {
        probability.0
    }
}

/// Content profiler configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProfilerConfig {
    /// Maximum prefix, in bytes, scanned by pattern and regex based metrics
    pub sample_limit: usize,
}

impl ProfilerConfig {
    /// Default sample limit (256KB)
    pub const DEFAULT_SAMPLE_LIMIT: usize = 256 * 1024;

    /// Validate the section
    pub fn validate(&self) -> Result<()> {
        if self.sample_limit < 64 {
            return Err(Error::config("Profiler sample limit must be at least 64 bytes"));
        }
        Ok(())
    }
}

impl Default for ProfilerConfig {
    fn default() -> Self {
        Self {
            sample_limit: Self::DEFAULT_SAMPLE_LIMIT,
        }
    }
}

/// Algorithm selector configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelectorConfig {
    /// Probability of picking a family uniformly at random
    pub family_exploration_rate: Probability,
    /// Probability of picking a variant uniformly at random
    pub variant_exploration_rate: Probability,
    /// Weight of the content-derived score in the blend
    pub content_weight: f64,
    /// Weight of the ledger-derived score in the blend
    pub history_weight: f64,
    /// Historical score assumed when the ledger has no data
    pub cold_start_score: f64,
    /// Number of ranked alternatives returned for fallback
    pub top_n: usize,
}

impl SelectorConfig {
    /// Same weights and table, with both exploration branches disabled
    pub fn without_exploration() -> Self {
        Self {
            family_exploration_rate: Probability::ZERO,
            variant_exploration_rate: Probability::ZERO,
            ..Self::default()
        }
    }

    /// Validate the section
    pub fn validate(&self) -> Result<()> {
        if !self.content_weight.is_finite() || !self.history_weight.is_finite() {
            return Err(Error::config("Selector weights must be finite"));
        }
        if self.content_weight < 0.0 || self.history_weight < 0.0 {
            return Err(Error::config("Selector weights must be non-negative"));
        }
        if (self.content_weight + self.history_weight - 1.0).abs() > 1e-6 {
            return Err(Error::config(
                "Selector content_weight and history_weight must sum to 1",
            ));
        }
        if !self.cold_start_score.is_finite() || !(0.0..=1.0).contains(&self.cold_start_score) {
            return Err(Error::config("Selector cold_start_score must be within [0, 1]"));
        }
        if self.top_n == 0 {
            return Err(Error::config("Selector top_n must be at least 1"));
        }
        Ok(())
    }
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            family_exploration_rate: Probability(0.10),
            variant_exploration_rate: Probability(0.15),
            content_weight: 0.7,
            history_weight: 0.3,
            cold_start_score: 0.5,
            top_n: 3,
        }
    }
}

/// Parameter optimizer configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptimizerConfig {
    /// Points per range parameter in grid search
    pub grid_points: usize,
    /// Candidates drawn by iterative sampling
    pub iterative_samples: usize,
    /// Genetic algorithm population size
    pub population_size: usize,
    /// Genetic algorithm generations
    pub generations: usize,
    /// Genetic algorithm tournament size
    pub tournament_size: usize,
    /// Per-parameter mutation probability
    pub mutation_rate: Probability,
    /// Number of bandit arms
    pub bandit_arms: usize,
    /// Number of bandit rounds
    pub bandit_rounds: usize,
    /// Bandit exploration probability
    pub bandit_epsilon: Probability,
    /// Half-width of the uniform measurement noise added to stochastic scores
    pub jitter: f64,
}

impl OptimizerConfig {
    /// Validate the section
    pub fn validate(&self) -> Result<()> {
        if self.grid_points < 2 {
            return Err(Error::config("Optimizer grid_points must be at least 2"));
        }
        if self.iterative_samples == 0
            || self.population_size == 0
            || self.generations == 0
            || self.bandit_arms == 0
            || self.bandit_rounds == 0
        {
            return Err(Error::config("Optimizer search budgets must be at least 1"));
        }
        if self.tournament_size == 0 || self.tournament_size > self.population_size {
            return Err(Error::config(
                "Optimizer tournament_size must be between 1 and population_size",
            ));
        }
        if !self.jitter.is_finite() || !(0.0..=0.5).contains(&self.jitter) {
            return Err(Error::config("Optimizer jitter must be within [0, 0.5]"));
        }
        Ok(())
    }
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            grid_points: 3,
            iterative_samples: 20,
            population_size: 20,
            generations: 10,
            tournament_size: 3,
            mutation_rate: Probability(0.10),
            bandit_arms: 10,
            bandit_rounds: 30,
            bandit_epsilon: Probability(0.10),
            jitter: 0.1,
        }
    }
}

/// Complete decision engine configuration
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineConfig {
    /// Fixed random seed; fresh OS entropy per decision when unset
    pub seed: Option<u64>,
    /// Profiler section
    pub profiler: ProfilerConfig,
    /// Selector section
    pub selector: SelectorConfig,
    /// Optimizer section
    pub optimizer: OptimizerConfig,
}

impl EngineConfig {
    /// Validate every section
    pub fn validate(&self) -> Result<()> {
        self.profiler.validate()?;
        self.selector.validate()?;
        self.optimizer.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(EngineConfig::default().validate().is_ok());
        assert!(SelectorConfig::without_exploration().validate().is_ok());
    }

    #[test]
    fn test_selector_weights_must_sum_to_one() {
        let config = SelectorConfig {
            content_weight: 0.5,
            ..SelectorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_selector_rejects_non_finite_weights() {
        let nan_weights = SelectorConfig {
            content_weight: f64::NAN,
            history_weight: f64::NAN,
            ..SelectorConfig::default()
        };
        assert!(nan_weights.validate().is_err());

        let nan_content = SelectorConfig {
            content_weight: f64::NAN,
            ..SelectorConfig::default()
        };
        assert!(nan_content.validate().is_err());

        let infinite = SelectorConfig {
            history_weight: f64::INFINITY,
            ..SelectorConfig::default()
        };
        assert!(infinite.validate().is_err());

        let nan_cold_start = SelectorConfig {
            cold_start_score: f64::NAN,
            ..SelectorConfig::default()
        };
        assert!(nan_cold_start.validate().is_err());
    }

    #[test]
    fn test_optimizer_rejects_non_finite_jitter() {
        for jitter in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let config = OptimizerConfig {
                jitter,
                ..OptimizerConfig::default()
            };
            assert!(config.validate().is_err());
        }
    }

    #[test]
    fn test_tournament_cannot_exceed_population() {
        let config = OptimizerConfig {
            tournament_size: 30,
            ..OptimizerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_probability_serde_rejects_out_of_range() {
        let parsed: std::result::Result<Probability, _> = serde_json::from_str("1.5");
        assert!(parsed.is_err());
        let parsed: Probability = serde_json::from_str("0.25").unwrap();
        assert_eq!(parsed.get(), 0.25);
    }
}
