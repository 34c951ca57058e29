//! Parameter search strategies
//!
//! All strategies share one scoring function and run on fixed budgets. Grid
//! search scores without noise and is fully deterministic; the stochastic
//! strategies add uniform jitter to each evaluation and are deterministic for a
//! fixed RNG seed.

use adaptcomp_types::{
    parameters::LEVEL, OptimizerConfig, ParameterBounds, ParameterSpec, ParameterValue,
    Parameters,
};
use rand::Rng;

const WINDOW_SIZE: &str = "window_size";
const BLOCK_SIZE: &str = "block_size";
const WINDOW_SWEET_SPOT: (f64, f64) = (4096.0, 32_768.0);
const BLOCK_SWEET_SPOT: (f64, f64) = (1024.0, 8192.0);

/// One evaluated parameter set
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationTrial {
    /// Candidate parameters
    pub parameters: Parameters,
    /// Score (0-1)
    pub score: f64,
}

/// Noise-free score: `0.4 * level + 0.3 * window suitability + 0.3 * block suitability`
pub fn score_parameters(parameters: &Parameters, bounds: &ParameterBounds) -> f64 {
    let level = bounds
        .get(LEVEL)
        .zip(parameters.get(LEVEL))
        .and_then(|(spec, value)| spec.normalize(value))
        .unwrap_or(0.0);
    let window = suitability(parameters, bounds, WINDOW_SIZE, WINDOW_SWEET_SPOT);
    let block = suitability(parameters, bounds, BLOCK_SIZE, BLOCK_SWEET_SPOT);

    (0.4 * level + 0.3 * window + 0.3 * block).clamp(0.0, 1.0)
}

fn suitability(
    parameters: &Parameters,
    bounds: &ParameterBounds,
    name: &str,
    (low, high): (f64, f64),
) -> f64 {
    if bounds.get(name).is_none() {
        return 0.5;
    }
    match parameters.get(name).and_then(ParameterValue::as_f64) {
        Some(value) if value >= low && value <= high => 1.0,
        _ => 0.5,
    }
}

fn noisy_score<R: Rng + ?Sized>(
    parameters: &Parameters,
    bounds: &ParameterBounds,
    jitter: f64,
    rng: &mut R,
) -> f64 {
    let noise = if jitter > 0.0 {
        rng.gen_range(-jitter..=jitter)
    } else {
        0.0
    };
    (score_parameters(parameters, bounds) + noise).clamp(0.0, 1.0)
}

/// Draw one value uniformly within a spec
pub fn sample_value<R: Rng + ?Sized>(spec: &ParameterSpec, rng: &mut R) -> ParameterValue {
    match spec {
        ParameterSpec::Range { min, max, integer } => {
            if *integer {
                let (low, high) = (min.ceil() as i64, max.floor() as i64);
                if low >= high {
                    ParameterValue::Int(low)
                } else {
                    ParameterValue::Int(rng.gen_range(low..=high))
                }
            } else if min >= max {
                ParameterValue::Float(*min)
            } else {
                ParameterValue::Float(rng.gen_range(*min..=*max))
            }
        }
        ParameterSpec::Choice(values) => {
            let index = rng.gen_range(0..values.len().max(1));
            ParameterValue::Choice(values.get(index).cloned().unwrap_or_default())
        }
    }
}

/// Draw a full parameter set uniformly within bounds
pub fn sample_parameters<R: Rng + ?Sized>(bounds: &ParameterBounds, rng: &mut R) -> Parameters {
    bounds
        .iter()
        .map(|(name, spec)| (name.clone(), sample_value(spec, rng)))
        .collect()
}

fn first_best(trials: impl IntoIterator<Item = OptimizationTrial>) -> Option<OptimizationTrial> {
    trials.into_iter().fold(None, |best, trial| match best {
        Some(current) if trial.score <= current.score => Some(current),
        _ => Some(trial),
    })
}

/// Exhaustive search over `grid_points` values per range parameter
pub fn grid_search(bounds: &ParameterBounds, grid_points: usize) -> Option<OptimizationTrial> {
    let mut candidates: Vec<Parameters> = vec![Parameters::new()];
    for (name, spec) in bounds.iter() {
        let values = spec.grid(grid_points);
        candidates = candidates
            .into_iter()
            .flat_map(|partial| {
                values.iter().map(move |value| {
                    let mut next = partial.clone();
                    next.insert(name.clone(), value.clone());
                    next
                })
            })
            .collect();
    }

    first_best(candidates.into_iter().map(|parameters| OptimizationTrial {
        score: score_parameters(&parameters, bounds),
        parameters,
    }))
}

/// Best of `iterative_samples` uniform draws
pub fn iterative_sampling<R: Rng + ?Sized>(
    bounds: &ParameterBounds,
    config: &OptimizerConfig,
    rng: &mut R,
) -> Option<OptimizationTrial> {
    let mut best: Option<OptimizationTrial> = None;
    for _ in 0..config.iterative_samples {
        let parameters = sample_parameters(bounds, rng);
        let score = noisy_score(&parameters, bounds, config.jitter, rng);
        best = first_best(best.into_iter().chain(Some(OptimizationTrial { parameters, score })));
    }
    best
}

/// Genetic algorithm with tournament selection, uniform crossover and redraw mutation
pub fn genetic<R: Rng + ?Sized>(
    bounds: &ParameterBounds,
    config: &OptimizerConfig,
    rng: &mut R,
) -> Option<OptimizationTrial> {
    let evaluate = |parameters: Parameters, rng: &mut R| {
        let score = noisy_score(&parameters, bounds, config.jitter, rng);
        OptimizationTrial { parameters, score }
    };

    let mut population: Vec<OptimizationTrial> = (0..config.population_size)
        .map(|_| {
            let parameters = sample_parameters(bounds, rng);
            evaluate(parameters, rng)
        })
        .collect();
    if population.is_empty() {
        return None;
    }

    for _ in 0..config.generations {
        let mut offspring = Vec::with_capacity(population.len());
        for _ in 0..population.len() {
            let first = tournament(&population, config.tournament_size, rng);
            let second = tournament(&population, config.tournament_size, rng);

            let mut child = Parameters::new();
            for (name, spec) in bounds.iter() {
                let inherited = if rng.gen_bool(0.5) {
                    first.parameters.get(name)
                } else {
                    second.parameters.get(name)
                };
                let value = if rng.gen_bool(config.mutation_rate.get()) {
                    sample_value(spec, rng)
                } else {
                    inherited.cloned().unwrap_or_else(|| sample_value(spec, rng))
                };
                child.insert(name.clone(), value);
            }
            offspring.push(evaluate(child, rng));
        }
        population = offspring;
    }

    first_best(population)
}

fn tournament<'a, R: Rng + ?Sized>(
    population: &'a [OptimizationTrial],
    size: usize,
    rng: &mut R,
) -> &'a OptimizationTrial {
    let mut winner = &population[rng.gen_range(0..population.len())];
    for _ in 1..size.max(1) {
        let contender = &population[rng.gen_range(0..population.len())];
        if contender.score > winner.score {
            winner = contender;
        }
    }
    winner
}

/// Epsilon-greedy bandit over arms drawn up front
pub fn bandit<R: Rng + ?Sized>(
    bounds: &ParameterBounds,
    config: &OptimizerConfig,
    rng: &mut R,
) -> Option<OptimizationTrial> {
    let arms: Vec<Parameters> = (0..config.bandit_arms)
        .map(|_| sample_parameters(bounds, rng))
        .collect();
    if arms.is_empty() {
        return None;
    }

    let mut q_values = vec![0.0; arms.len()];
    let mut action_counts = vec![0u64; arms.len()];

    for _ in 0..config.bandit_rounds {
        let arm = if rng.gen_bool(config.bandit_epsilon.get()) {
            rng.gen_range(0..arms.len())
        } else {
            best_arm(&q_values)
        };

        let reward = noisy_score(&arms[arm], bounds, config.jitter, rng);
        action_counts[arm] += 1;
        q_values[arm] += (reward - q_values[arm]) / action_counts[arm] as f64;
    }

    let winner = best_arm(&q_values);
    Some(OptimizationTrial {
        parameters: arms[winner].clone(),
        score: q_values[winner],
    })
}

fn best_arm(q_values: &[f64]) -> usize {
    let mut best = 0;
    for (index, value) in q_values.iter().enumerate().skip(1) {
        if *value > q_values[best] {
            best = index;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::BoundsTable;
    use adaptcomp_types::{AlgorithmVariant, Probability};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn zstd_bounds() -> ParameterBounds {
        BoundsTable::standard()
            .get(AlgorithmVariant::Zstd)
            .cloned()
            .unwrap()
    }

    #[test]
    fn test_scoring() {
        let bounds = zstd_bounds();
        let mut parameters = Parameters::new();
        parameters.insert("level".into(), ParameterValue::Int(22));
        parameters.insert("window_size".into(), ParameterValue::Int(8192));
        parameters.insert("block_size".into(), ParameterValue::Int(4096));
        assert!((score_parameters(&parameters, &bounds) - 1.0).abs() < 1e-12);

        parameters.insert("level".into(), ParameterValue::Int(1));
        parameters.insert("window_size".into(), ParameterValue::Int(1024));
        assert!((score_parameters(&parameters, &bounds) - 0.45).abs() < 1e-12);
    }

    #[test]
    fn test_missing_window_and_block_score_half() {
        let bounds = ParameterBounds::new().with("level", ParameterSpec::int(1, 9));
        let mut parameters = Parameters::new();
        parameters.insert("level".into(), ParameterValue::Int(9));
        assert!((score_parameters(&parameters, &bounds) - 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_grid_search_is_deterministic() {
        let bounds = zstd_bounds();
        let first = grid_search(&bounds, 3).unwrap();
        let second = grid_search(&bounds, 3).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.parameters["level"], ParameterValue::Int(22));
        assert!(bounds.contains(&first.parameters));
    }

    #[test]
    fn test_grid_search_covers_choices() {
        let table = BoundsTable::standard();
        let bounds = table.get(AlgorithmVariant::ContentAware).unwrap();
        let best = grid_search(bounds, 3).unwrap();
        assert_eq!(
            best.parameters["level"],
            ParameterValue::Choice("maximum".into())
        );
    }

    #[test]
    fn test_stochastic_strategies_repeat_for_seed() {
        let bounds = zstd_bounds();
        let config = OptimizerConfig::default();

        type Strategy = fn(&ParameterBounds, &OptimizerConfig, &mut StdRng) -> Option<OptimizationTrial>;
        let strategies: [Strategy; 3] = [iterative_sampling, genetic, bandit];
        for strategy in strategies {
            let first = strategy(&bounds, &config, &mut StdRng::seed_from_u64(42)).unwrap();
            let second = strategy(&bounds, &config, &mut StdRng::seed_from_u64(42)).unwrap();
            assert_eq!(first, second);
            assert!(bounds.contains(&first.parameters));
            assert!((0.0..=1.0).contains(&first.score));
        }
    }

    #[test]
    fn test_bandit_without_exploration_still_plays() {
        let bounds = zstd_bounds();
        let config = OptimizerConfig {
            bandit_epsilon: Probability::ZERO,
            jitter: 0.0,
            ..OptimizerConfig::default()
        };
        let trial = bandit(&bounds, &config, &mut StdRng::seed_from_u64(5)).unwrap();
        assert!((trial.score - score_parameters(&trial.parameters, &bounds)).abs() < 1e-12);
    }

    #[test]
    fn test_empty_bounds() {
        let bounds = ParameterBounds::new();
        let trial = grid_search(&bounds, 3).unwrap();
        assert!(trial.parameters.is_empty());
    }
}
