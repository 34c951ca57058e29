//! Complexity-driven parameter optimization

use crate::strategies::{self, OptimizationTrial};
use adaptcomp_types::{
    parameters::LEVEL, AlgorithmVariant, ContentProfile, Error, OptimizerConfig,
    ParameterBounds, ParameterSpec, ParameterValue, Parameters, Result, SearchStrategy,
};
use rand::Rng;
use tracing::{debug, warn};

/// Tuned parameters produced by the optimizer
#[derive(Debug, Clone, PartialEq)]
pub struct Optimized {
    /// Parameters merged onto the base set and clamped to bounds
    pub parameters: Parameters,
    /// Noise-free score of the returned parameters
    pub score: f64,
    /// Strategy that produced them
    pub strategy: SearchStrategy,
}

/// Chooses a search strategy from content complexity and runs it
#[derive(Debug, Clone, Default)]
pub struct ParameterOptimizer {
    config: OptimizerConfig,
}

impl ParameterOptimizer {
    /// Create an optimizer with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an optimizer with a custom configuration
    pub fn with_config(config: OptimizerConfig) -> Self {
        Self { config }
    }

    /// Get the optimizer configuration
    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Mean of normalized entropy, language complexity, code structure and redundancy
    pub fn complexity(profile: &ContentProfile) -> f64 {
        let sum = profile.normalized_entropy()
            + profile.language_complexity()
            + profile.code_structure()
            + profile.redundancy();
        (sum / 4.0).clamp(0.0, 1.0)
    }

    /// Strategy for a complexity value
    pub fn strategy_for(complexity: f64) -> SearchStrategy {
        if complexity < 0.3 {
            SearchStrategy::GridSearch
        } else if complexity < 0.6 {
            SearchStrategy::IterativeSampling
        } else if complexity < 0.8 {
            SearchStrategy::Genetic
        } else {
            SearchStrategy::Bandit
        }
    }

    /// Tune parameters for a variant
    ///
    /// Never fails: empty bounds or a failing strategy fall back to the
    /// deterministic heuristic. The result only carries keys present in
    /// `base`, clamped to `bounds`.
    pub fn optimize<R: Rng + ?Sized>(
        &self,
        variant: AlgorithmVariant,
        profile: &ContentProfile,
        bounds: &ParameterBounds,
        base: &Parameters,
        rng: &mut R,
    ) -> Optimized {
        if bounds.is_empty() {
            debug!("No bounds for {}, using heuristic parameters", variant);
            return Self::heuristic(profile, bounds, base);
        }

        let strategy = Self::strategy_for(Self::complexity(profile));
        match self.search(strategy, bounds, rng) {
            Ok(trial) => {
                let parameters = merge(base, &trial.parameters, bounds);
                let score = strategies::score_parameters(&parameters, bounds);
                debug!(
                    "Optimized {} with {} (search score {:.3}, final {:.3})",
                    variant, strategy, trial.score, score
                );
                Optimized {
                    parameters,
                    score,
                    strategy,
                }
            }
            Err(e) => {
                warn!(
                    "{} failed for {}: {}, using heuristic parameters",
                    strategy, variant, e
                );
                Self::heuristic(profile, bounds, base)
            }
        }
    }

    fn search<R: Rng + ?Sized>(
        &self,
        strategy: SearchStrategy,
        bounds: &ParameterBounds,
        rng: &mut R,
    ) -> Result<OptimizationTrial> {
        bounds.validate()?;

        let trial = match strategy {
            SearchStrategy::GridSearch => strategies::grid_search(bounds, self.config.grid_points),
            SearchStrategy::IterativeSampling => {
                strategies::iterative_sampling(bounds, &self.config, rng)
            }
            SearchStrategy::Genetic => strategies::genetic(bounds, &self.config, rng),
            SearchStrategy::Bandit => strategies::bandit(bounds, &self.config, rng),
            SearchStrategy::Heuristic => None,
        };

        trial.ok_or_else(|| Error::optimization(format!("{} produced no candidates", strategy)))
    }

    /// Deterministic parameters derived from the profile alone
    pub fn heuristic(
        profile: &ContentProfile,
        bounds: &ParameterBounds,
        base: &Parameters,
    ) -> Optimized {
        let effort = if profile.compression_potential() > 0.7 {
            1.0
        } else if profile.compression_potential() > 0.4 || profile.entropy() > 6.0 {
            0.5
        } else {
            0.0
        };
        let window = if profile.pattern_frequency() > 0.5 {
            32_768
        } else {
            8192
        };

        let mut suggested = Parameters::new();
        if let Some(spec) = bounds.get(LEVEL) {
            suggested.insert(LEVEL.to_string(), effort_value(spec, effort));
        }
        suggested.insert("window_size".to_string(), ParameterValue::Int(window));
        suggested.insert("block_size".to_string(), ParameterValue::Int(4096));

        let parameters = merge(base, &suggested, bounds);
        Optimized {
            score: strategies::score_parameters(&parameters, bounds),
            parameters,
            strategy: SearchStrategy::Heuristic,
        }
    }
}

fn effort_value(spec: &ParameterSpec, effort: f64) -> ParameterValue {
    match spec {
        // Lowest, middle or highest choice
        ParameterSpec::Choice(values) => {
            let last = values.len().saturating_sub(1);
            let index = if effort >= 1.0 {
                last
            } else if effort > 0.0 {
                last / 2
            } else {
                0
            };
            ParameterValue::Choice(values.get(index).cloned().unwrap_or_default())
        }
        ParameterSpec::Range { .. } => spec.at_fraction(effort),
    }
}

/// Overwrite keys of `base` with `tuned` values, drop unknown keys, clamp to bounds
pub fn merge(base: &Parameters, tuned: &Parameters, bounds: &ParameterBounds) -> Parameters {
    let merged: Parameters = base
        .iter()
        .map(|(name, value)| {
            let value = tuned.get(name).unwrap_or(value).clone();
            (name.clone(), value)
        })
        .collect();
    bounds.clamp(&merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::BoundsTable;
    use adaptcomp_types::{ContentClass, PROFILE_DIMENSIONS};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rstest::rstest;

    fn profile(dims: [f64; PROFILE_DIMENSIONS]) -> ContentProfile {
        ContentProfile::new(dims, ContentClass::Text, None)
    }

    #[rstest]
    #[case(0.0, SearchStrategy::GridSearch)]
    #[case(0.299, SearchStrategy::GridSearch)]
    #[case(0.3, SearchStrategy::IterativeSampling)]
    #[case(0.6, SearchStrategy::Genetic)]
    #[case(0.8, SearchStrategy::Bandit)]
    #[case(1.0, SearchStrategy::Bandit)]
    fn test_strategy_thresholds(#[case] complexity: f64, #[case] expected: SearchStrategy) {
        assert_eq!(ParameterOptimizer::strategy_for(complexity), expected);
    }

    #[test]
    fn test_complexity() {
        let profile = profile([4.0, 0.5, 0.1, 0.9, 0.0, 0.0, 0.0, 0.0]);
        assert!((ParameterOptimizer::complexity(&profile) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_merge_keeps_base_keys_only() {
        let bounds = ParameterBounds::new().with("level", ParameterSpec::int(1, 9));
        let mut base = Parameters::new();
        base.insert("level".into(), ParameterValue::Int(5));
        base.insert("untouched".into(), ParameterValue::Int(1));
        let mut tuned = Parameters::new();
        tuned.insert("level".into(), ParameterValue::Int(30));
        tuned.insert("stray".into(), ParameterValue::Int(2));

        let merged = merge(&base, &tuned, &bounds);
        assert_eq!(merged["level"], ParameterValue::Int(9));
        assert_eq!(merged["untouched"], ParameterValue::Int(1));
        assert!(!merged.contains_key("stray"));
    }

    #[test]
    fn test_inverted_bounds_fall_back_to_heuristic() {
        let bounds = ParameterBounds::new()
            .with("level", ParameterSpec::int(9, 1))
            .with("window_size", ParameterSpec::int(512, 32_768));
        let mut base = Parameters::new();
        base.insert("level".into(), ParameterValue::Int(5));
        base.insert("window_size".into(), ParameterValue::Int(1024));

        let optimized = ParameterOptimizer::new().optimize(
            AlgorithmVariant::Gzip,
            &profile([2.0, 0.1, 0.0, 0.2, 0.0, 0.6, 0.2, 0.7]),
            &bounds,
            &base,
            &mut StdRng::seed_from_u64(1),
        );
        assert_eq!(optimized.strategy, SearchStrategy::Heuristic);
        // pattern frequency above 0.5 widens the window
        assert_eq!(optimized.parameters["window_size"], ParameterValue::Int(32_768));
    }

    #[rstest]
    #[case(0.9, 0.0, 9)]
    #[case(0.5, 0.0, 5)]
    #[case(0.1, 7.0, 5)]
    #[case(0.1, 2.0, 1)]
    fn test_heuristic_levels(#[case] potential: f64, #[case] entropy: f64, #[case] level: i64) {
        let table = BoundsTable::standard();
        let bounds = table.get(AlgorithmVariant::Gzip).unwrap();
        let base = table.default_parameters(AlgorithmVariant::Gzip);

        let optimized = ParameterOptimizer::heuristic(
            &profile([entropy, 0.0, 0.0, 0.0, 0.0, 0.0, potential, 0.0]),
            bounds,
            &base,
        );
        assert_eq!(optimized.parameters["level"], ParameterValue::Int(level));
        assert_eq!(optimized.parameters["window_size"], ParameterValue::Int(8192));
        assert_eq!(optimized.strategy, SearchStrategy::Heuristic);
    }

    #[test]
    fn test_heuristic_choice_levels() {
        let spec = ParameterSpec::choice(["fast", "balanced", "optimal", "maximum"]);
        assert_eq!(effort_value(&spec, 0.0), ParameterValue::Choice("fast".into()));
        assert_eq!(effort_value(&spec, 0.5), ParameterValue::Choice("balanced".into()));
        assert_eq!(effort_value(&spec, 1.0), ParameterValue::Choice("maximum".into()));
    }

    #[test]
    fn test_empty_bounds_use_heuristic() {
        let optimized = ParameterOptimizer::new().optimize(
            AlgorithmVariant::Zstd,
            &profile([5.0; PROFILE_DIMENSIONS]),
            &ParameterBounds::new(),
            &Parameters::new(),
            &mut StdRng::seed_from_u64(0),
        );
        assert_eq!(optimized.strategy, SearchStrategy::Heuristic);
        assert!(optimized.parameters.is_empty());
    }

    #[test]
    fn test_grid_search_is_repeatable() {
        let table = BoundsTable::standard();
        let bounds = table.get(AlgorithmVariant::Brotli).unwrap();
        let base = table.default_parameters(AlgorithmVariant::Brotli);
        let low = profile([1.0, 0.1, 0.0, 0.2, 0.1, 0.0, 0.1, 0.7]);
        let optimizer = ParameterOptimizer::new();

        let first = optimizer.optimize(
            AlgorithmVariant::Brotli,
            &low,
            bounds,
            &base,
            &mut StdRng::seed_from_u64(1),
        );
        let second = optimizer.optimize(
            AlgorithmVariant::Brotli,
            &low,
            bounds,
            &base,
            &mut StdRng::seed_from_u64(2),
        );
        assert_eq!(first.strategy, SearchStrategy::GridSearch);
        assert_eq!(first, second);
    }
}
