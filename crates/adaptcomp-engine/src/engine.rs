//! Decision orchestration

use crate::bounds::BoundsTable;
use crate::optimizer::{Optimized, ParameterOptimizer};
use crate::selector::AlgorithmSelector;
use adaptcomp_profiler::ContentProfiler;
use adaptcomp_types::{
    AlgorithmVariant, Codec, CompressionOutcome, ContentProfile, ContentSignature, Decision,
    EngineConfig, Error, ParameterBounds, Parameters, PerformanceLedger, Result,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Result of driving a codec through a decision's candidates
#[derive(Debug, Clone)]
pub struct CompressionReport {
    /// Decision the candidates came from
    pub decision: Decision,
    /// Variant that produced the payload
    pub variant: AlgorithmVariant,
    /// Parameters the payload was produced with
    pub parameters: Parameters,
    /// Compressed payload
    pub payload: Vec<u8>,
    /// Observed outcome of the successful attempt
    pub outcome: CompressionOutcome,
    /// Candidates that failed before the successful one
    pub failures: Vec<(AlgorithmVariant, Error)>,
}

impl CompressionReport {
    /// Number of codec calls made, including the successful one
    pub fn attempts(&self) -> usize {
        self.failures.len() + 1
    }

    /// Whether the selected variant was not the one used
    pub fn fell_back(&self) -> bool {
        self.variant != self.decision.selected_variant
    }
}

/// Composes profiling, selection and parameter optimization into one call
pub struct DecisionOrchestrator {
    profiler: ContentProfiler,
    selector: AlgorithmSelector,
    optimizer: ParameterOptimizer,
    bounds: BoundsTable,
    ledger: Arc<dyn PerformanceLedger>,
    seed: Option<u64>,
}

impl std::fmt::Debug for DecisionOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecisionOrchestrator")
            .field("profiler", &self.profiler)
            .field("selector", &self.selector)
            .field("optimizer", &self.optimizer)
            .field("seed", &self.seed)
            .finish_non_exhaustive()
    }
}

impl DecisionOrchestrator {
    /// Create an orchestrator with the standard bounds table
    pub fn new(config: EngineConfig, ledger: Arc<dyn PerformanceLedger>) -> Result<Self> {
        Self::with_bounds(config, BoundsTable::standard(), ledger)
    }

    /// Create an orchestrator with a custom bounds table
    pub fn with_bounds(
        config: EngineConfig,
        bounds: BoundsTable,
        ledger: Arc<dyn PerformanceLedger>,
    ) -> Result<Self> {
        config.validate()?;
        bounds.validate()?;

        info!(
            "Decision orchestrator initialized (seed: {:?}, sample limit: {} bytes)",
            config.seed, config.profiler.sample_limit
        );

        Ok(Self {
            profiler: ContentProfiler::with_config(config.profiler),
            selector: AlgorithmSelector::with_config(config.selector),
            optimizer: ParameterOptimizer::with_config(config.optimizer),
            bounds,
            ledger,
            seed: config.seed,
        })
    }

    /// Shared handle to the ledger
    pub fn ledger(&self) -> Arc<dyn PerformanceLedger> {
        Arc::clone(&self.ledger)
    }

    /// Bounds table used for tuning
    pub fn bounds(&self) -> &BoundsTable {
        &self.bounds
    }

    /// Profile content without selecting anything
    pub fn profile(&self, content: &[u8]) -> ContentProfile {
        self.profiler.profile(content)
    }

    /// Per-call RNG, seeded from the configured seed mixed with a content hash
    fn rng(&self, content: &[u8]) -> StdRng {
        match self.seed {
            Some(seed) => {
                let mut hasher = DefaultHasher::new();
                content.hash(&mut hasher);
                StdRng::seed_from_u64(seed ^ hasher.finish())
            }
            None => StdRng::from_entropy(),
        }
    }

    /// Decide how to compress content
    ///
    /// With a configured seed the exploration and search draws depend on both
    /// the seed and the content: the same content always gets the same
    /// decision, while different items draw independently.
    pub fn decide(&self, content: &[u8]) -> Decision {
        self.decide_with_rng(content, &mut self.rng(content))
    }

    /// Decide how to compress content using the caller's RNG
    pub fn decide_with_rng<R: Rng + ?Sized>(&self, content: &[u8], rng: &mut R) -> Decision {
        let start_time = Instant::now();
        let profile = self.profiler.profile(content);
        let signature = ContentSignature::new(&profile, content.len());

        let selection = self
            .selector
            .select(&profile, &signature, self.ledger.as_ref(), rng);
        let tuned = self.tune(selection.variant, &profile, rng);

        info!(
            "Decided {} for {} ({} bytes): score {:.3}, strategy {}, {} alternatives in {:?}",
            selection.variant,
            signature,
            content.len(),
            selection.score,
            tuned.strategy,
            selection.alternatives.len(),
            start_time.elapsed()
        );

        Decision {
            profile,
            signature,
            selected_variant: selection.variant,
            parameters: tuned.parameters,
            predicted_score: selection.score,
            strategy: tuned.strategy,
            alternatives: selection.alternatives,
        }
    }

    /// Tune parameters for a variant starting from its default parameters
    pub fn tune<R: Rng + ?Sized>(
        &self,
        variant: AlgorithmVariant,
        profile: &ContentProfile,
        rng: &mut R,
    ) -> Optimized {
        let empty = ParameterBounds::new();
        let bounds = self.bounds.get(variant).unwrap_or(&empty);
        let base = self.bounds.default_parameters(variant);
        self.optimizer.optimize(variant, profile, bounds, &base, rng)
    }

    /// Feed the outcome of a decision's selected variant back into the ledger
    pub fn record(&self, decision: &Decision, outcome: &CompressionOutcome) {
        self.record_variant(&decision.signature, decision.selected_variant, outcome);
    }

    /// Feed an outcome for any variant back into the ledger
    ///
    /// Ledger failures are logged and dropped.
    pub fn record_variant(
        &self,
        signature: &ContentSignature,
        variant: AlgorithmVariant,
        outcome: &CompressionOutcome,
    ) {
        let result = self.ledger.update(
            signature,
            variant,
            outcome.ratio(),
            outcome.elapsed.as_secs_f64(),
            outcome.quality(),
        );
        if let Err(e) = result {
            warn!("Failed to record outcome for {} / {}: {}", signature, variant, e);
        }
    }

    /// Decide, then compress with the selected variant and each alternative in turn
    ///
    /// Gzip is tried last when no ranked candidate is Gzip, so a codec that
    /// cannot run any of them still gets the default. Every attempt is
    /// recorded in the ledger. Returns the last error when no attempt succeeds
    /// or a failure is not worth retrying.
    pub fn compress_with_fallback(
        &self,
        codec: &dyn Codec,
        content: &[u8],
    ) -> Result<CompressionReport> {
        let mut rng = self.rng(content);
        let decision = self.decide_with_rng(content, &mut rng);
        let original_size = content.len() as u64;
        let mut failures: Vec<(AlgorithmVariant, Error)> = Vec::new();

        let mut candidates = decision.candidates();
        if !candidates.contains(&AlgorithmVariant::Gzip) {
            candidates.push(AlgorithmVariant::Gzip);
        }

        for variant in candidates {
            let parameters = if variant == decision.selected_variant {
                decision.parameters.clone()
            } else {
                self.tune(variant, &decision.profile, &mut rng).parameters
            };

            let start_time = Instant::now();
            match codec.compress(content, variant, &parameters) {
                Ok(payload) => {
                    let outcome = CompressionOutcome::succeeded(
                        original_size,
                        payload.len() as u64,
                        start_time.elapsed(),
                    );
                    self.record_variant(&decision.signature, variant, &outcome);

                    info!(
                        "Compressed {} bytes to {} bytes with {} after {} failed attempt(s)",
                        original_size,
                        payload.len(),
                        variant,
                        failures.len()
                    );
                    return Ok(CompressionReport {
                        decision,
                        variant,
                        parameters,
                        payload,
                        outcome,
                        failures,
                    });
                }
                Err(e) => {
                    let outcome = CompressionOutcome::failed(original_size, start_time.elapsed());
                    self.record_variant(&decision.signature, variant, &outcome);

                    let retry = e.should_retry();
                    warn!("Compression with {} failed: {}", variant, e);
                    failures.push((variant, e));
                    if !retry {
                        break;
                    }
                    debug!("Trying next candidate");
                }
            }
        }

        Err(failures
            .pop()
            .map_or_else(|| Error::other("no candidate variants"), |(_, e)| e))
    }
}
