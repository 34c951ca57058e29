//! Per-variant parameter bounds

use adaptcomp_types::{AlgorithmVariant, Error, ParameterBounds, ParameterSpec, Parameters, Result};
use std::collections::BTreeMap;

/// Effort levels shared by the variants without a numeric level
pub const EFFORT_LEVELS: [&str; 4] = ["fast", "balanced", "optimal", "maximum"];

/// Parameter bounds for every variant
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundsTable {
    bounds: BTreeMap<AlgorithmVariant, ParameterBounds>,
}

impl BoundsTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard bounds for all ten variants
    pub fn standard() -> Self {
        let levels = || ParameterSpec::choice(EFFORT_LEVELS);
        let mut table = Self::new();

        table.insert(
            AlgorithmVariant::Gzip,
            ParameterBounds::new()
                .with("level", ParameterSpec::int(1, 9))
                .with("window_size", ParameterSpec::int(512, 32_768))
                .with("memory_level", ParameterSpec::int(1, 9)),
        );
        table.insert(
            AlgorithmVariant::Lzma,
            ParameterBounds::new()
                .with("level", ParameterSpec::int(0, 9))
                .with("window_size", ParameterSpec::int(4096, 67_108_864))
                .with("block_size", ParameterSpec::int(1024, 1_048_576)),
        );
        table.insert(
            AlgorithmVariant::Bzip2,
            ParameterBounds::new()
                .with("level", ParameterSpec::int(1, 9))
                .with("block_size", ParameterSpec::int(1024, 921_600)),
        );
        table.insert(
            AlgorithmVariant::Lz4,
            ParameterBounds::new()
                .with("level", ParameterSpec::int(1, 12))
                .with("block_size", ParameterSpec::int(1024, 4_194_304)),
        );
        table.insert(
            AlgorithmVariant::Zstd,
            ParameterBounds::new()
                .with("level", ParameterSpec::int(1, 22))
                .with("window_size", ParameterSpec::int(1024, 8_388_608))
                .with("block_size", ParameterSpec::int(1024, 131_072)),
        );
        table.insert(
            AlgorithmVariant::Brotli,
            ParameterBounds::new()
                .with("level", ParameterSpec::int(0, 11))
                .with("window_size", ParameterSpec::int(1024, 16_777_216))
                .with("block_size", ParameterSpec::int(1024, 65_536)),
        );
        table.insert(
            AlgorithmVariant::ContentAware,
            ParameterBounds::new()
                .with("level", levels())
                .with("window_size", ParameterSpec::int(4096, 65_536))
                .with("block_size", ParameterSpec::int(1024, 16_384)),
        );
        table.insert(
            AlgorithmVariant::Quantum,
            ParameterBounds::new()
                .with("level", levels())
                .with("superposition_depth", ParameterSpec::int(1, 8)),
        );
        table.insert(
            AlgorithmVariant::Neuromorphic,
            ParameterBounds::new()
                .with("level", levels())
                .with("learning_rate", ParameterSpec::float(0.001, 0.1)),
        );
        table.insert(
            AlgorithmVariant::Topological,
            ParameterBounds::new()
                .with("level", levels())
                .with("manifold_dim", ParameterSpec::int(2, 16))
                .with("block_size", ParameterSpec::int(1024, 8192)),
        );

        table
    }

    /// Add or replace a variant's bounds
    pub fn insert(&mut self, variant: AlgorithmVariant, bounds: ParameterBounds) {
        self.bounds.insert(variant, bounds);
    }

    /// Look up a variant's bounds
    pub fn get(&self, variant: AlgorithmVariant) -> Option<&ParameterBounds> {
        self.bounds.get(&variant)
    }

    /// Base parameters for a variant: range midpoints and the second choice
    pub fn default_parameters(&self, variant: AlgorithmVariant) -> Parameters {
        self.get(variant)
            .map(ParameterBounds::defaults)
            .unwrap_or_default()
    }

    /// Check that every variant has well-formed bounds declaring a level
    pub fn validate(&self) -> Result<()> {
        for variant in AlgorithmVariant::ALL {
            let bounds = self
                .get(variant)
                .ok_or_else(|| Error::invalid_bounds(variant.to_string(), "no bounds declared"))?;
            if !bounds.has_level() {
                return Err(Error::invalid_bounds(
                    variant.to_string(),
                    "missing mandatory level parameter",
                ));
            }
            bounds.validate()?;
        }
        Ok(())
    }
}
