//! Property tests for parameter optimization

use crate::bounds::BoundsTable;
use crate::optimizer::ParameterOptimizer;
use adaptcomp_types::{AlgorithmVariant, ContentClass, ContentProfile, SearchStrategy};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn profile_strategy() -> impl Strategy<Value = ContentProfile> {
    (
        0.0f64..=8.0,
        prop::array::uniform7(0.0f64..=1.0),
    )
        .prop_map(|(entropy, rest)| {
            let mut dims = [0.0; 8];
            dims[0] = entropy;
            dims[1..].copy_from_slice(&rest);
            ContentProfile::new(dims, ContentClass::Text, None)
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_optimize_stays_within_bounds(
        profile in profile_strategy(),
        index in 0usize..AlgorithmVariant::ALL.len(),
        seed in any::<u64>(),
    ) {
        let variant = AlgorithmVariant::ALL[index];
        let table = BoundsTable::standard();
        let bounds = table.get(variant).unwrap();
        let base = table.default_parameters(variant);

        let optimized = ParameterOptimizer::new().optimize(
            variant,
            &profile,
            bounds,
            &base,
            &mut StdRng::seed_from_u64(seed),
        );

        prop_assert!(bounds.contains(&optimized.parameters));
        prop_assert_eq!(
            optimized.parameters.keys().collect::<Vec<_>>(),
            base.keys().collect::<Vec<_>>()
        );
        prop_assert!((0.0..=1.0).contains(&optimized.score));
        prop_assert_ne!(optimized.strategy, SearchStrategy::Heuristic);
    }

    #[test]
    fn test_strategy_is_deterministic_for_seed(
        profile in profile_strategy(),
        seed in any::<u64>(),
    ) {
        let table = BoundsTable::standard();
        let bounds = table.get(AlgorithmVariant::Zstd).unwrap();
        let base = table.default_parameters(AlgorithmVariant::Zstd);
        let optimizer = ParameterOptimizer::new();

        let first = optimizer.optimize(
            AlgorithmVariant::Zstd, &profile, bounds, &base, &mut StdRng::seed_from_u64(seed),
        );
        let second = optimizer.optimize(
            AlgorithmVariant::Zstd, &profile, bounds, &base, &mut StdRng::seed_from_u64(seed),
        );
        prop_assert_eq!(first, second);
    }
}
