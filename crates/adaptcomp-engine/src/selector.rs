//! Hierarchical algorithm selection
//!
//! Selection runs in two levels. A family is chosen from the content class's
//! eligible families, then a variant within that family. At each level the
//! content-derived heuristic score is blended with the historical quality
//! recorded in the ledger. With a configured probability the choice is instead
//! made uniformly at random among the eligible candidates.

use adaptcomp_profiler::patterns::pattern_score;
use adaptcomp_types::{
    AlgorithmFamily, AlgorithmVariant, Alternative, ContentClass, ContentProfile,
    ContentSignature, PerformanceLedger, SelectorConfig,
};
use rand::Rng;
use tracing::debug;

/// Families eligible for a content class, in tie-breaking order
///
/// `Unknown` has no entry; selection falls back to LZ77 / Gzip for it.
pub fn eligible_families(class: ContentClass) -> &'static [AlgorithmFamily] {
    use AlgorithmFamily::{Advanced, Bwt, Dictionary, Lz77, Lz78, Ppm};

    match class {
        ContentClass::Text => &[Lz77, Lz78, Bwt, Ppm, Dictionary, Advanced],
        ContentClass::Code => &[Lz77, Ppm, Dictionary, Bwt],
        ContentClass::Binary => &[Lz77, Lz78, Advanced],
        ContentClass::Data => &[Dictionary, Lz77, Bwt, Ppm],
        ContentClass::Document => &[Ppm, Bwt, Dictionary, Lz77],
        ContentClass::Structured => &[Dictionary, Ppm, Lz77, Bwt],
        ContentClass::Unknown => &[],
    }
}

/// Content-derived heuristic score of a family (0-1)
pub fn family_content_score(family: AlgorithmFamily, profile: &ContentProfile) -> f64 {
    let e = profile.normalized_entropy();
    let pf = pattern_score(profile.pattern_frequency());
    let code = profile.code_structure();

    let score = match family {
        AlgorithmFamily::Lz77 => 0.6 * (1.0 - e) + 0.4 * pf,
        AlgorithmFamily::Lz78 => 0.5 * e + 0.3 * (1.0 - code) + 0.2 * pf,
        AlgorithmFamily::Bwt => 0.6 * (1.0 - e) + 0.4 * profile.redundancy(),
        AlgorithmFamily::Ppm => {
            0.5 * profile.semantic_density() + 0.3 * profile.language_complexity() + 0.2 * code
        }
        AlgorithmFamily::Dictionary => 0.4 * profile.semantic_density() + 0.3 * code + 0.3 * pf,
        AlgorithmFamily::Advanced => {
            0.4 * e + 0.4 * profile.compression_potential() + 0.2 * profile.confidence()
        }
    };
    score.clamp(0.0, 1.0)
}

/// Content-derived heuristic score of a variant (0-1)
pub fn variant_content_score(variant: AlgorithmVariant, profile: &ContentProfile) -> f64 {
    let e = profile.normalized_entropy();
    let pf = pattern_score(profile.pattern_frequency());
    let potential = profile.compression_potential();
    let language = profile.language_complexity();
    let code = profile.code_structure();
    let semantic = profile.semantic_density();
    let redundancy = profile.redundancy();

    let score = match variant {
        AlgorithmVariant::Gzip => 0.5 * (1.0 - e) + 0.3 * pf + 0.2 * (1.0 - potential),
        AlgorithmVariant::Lz4 => 0.6 * (1.0 - language) + 0.4 * (1.0 - potential),
        AlgorithmVariant::Lzma => 0.7 * potential + 0.3 * e,
        AlgorithmVariant::Bzip2 => 0.5 * redundancy + 0.5 * (1.0 - e),
        AlgorithmVariant::ContentAware => {
            0.5 * semantic + 0.3 * profile.confidence() + 0.2 * language
        }
        AlgorithmVariant::Zstd => 0.4 * potential + 0.3 * pf + 0.3 * code,
        AlgorithmVariant::Brotli => 0.5 * semantic + 0.3 * language + 0.2 * (1.0 - code),
        AlgorithmVariant::Quantum => 0.6 * e + 0.4 * (1.0 - redundancy),
        AlgorithmVariant::Neuromorphic => 0.5 * pf + 0.5 * language,
        AlgorithmVariant::Topological => 0.5 * code + 0.5 * potential,
    };
    score.clamp(0.0, 1.0)
}

/// Outcome of one selection
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// Selected variant
    pub variant: AlgorithmVariant,
    /// Family of the selected variant
    pub family: AlgorithmFamily,
    /// Combined score of the selected variant
    pub score: f64,
    /// `min(score * 1.2, 1.0)`
    pub confidence: f64,
    /// Best other variants across the eligible families, best first
    pub alternatives: Vec<Alternative>,
    /// Whether either level picked at random
    pub explored: bool,
}

/// Two-level family/variant selector
#[derive(Debug, Clone, Default)]
pub struct AlgorithmSelector {
    config: SelectorConfig,
}

impl AlgorithmSelector {
    /// Create a selector with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a selector with a custom configuration
    pub fn with_config(config: SelectorConfig) -> Self {
        Self { config }
    }

    /// Get the selector configuration
    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    fn blend(&self, content: f64, history: Option<f64>) -> f64 {
        let history = history.unwrap_or(self.config.cold_start_score);
        self.config.content_weight * content + self.config.history_weight * history
    }

    fn family_blend(
        &self,
        family: AlgorithmFamily,
        profile: &ContentProfile,
        signature: &ContentSignature,
        ledger: &dyn PerformanceLedger,
    ) -> f64 {
        self.blend(
            family_content_score(family, profile),
            ledger.family_quality(signature, family),
        )
    }

    fn variant_blend(
        &self,
        variant: AlgorithmVariant,
        profile: &ContentProfile,
        signature: &ContentSignature,
        ledger: &dyn PerformanceLedger,
    ) -> f64 {
        let history = ledger
            .get(signature, variant)
            .filter(|stats| stats.count > 0)
            .map(|stats| stats.avg_quality);
        self.blend(variant_content_score(variant, profile), history)
    }

    /// Select a variant for a profiled content item
    pub fn select<R: Rng + ?Sized>(
        &self,
        profile: &ContentProfile,
        signature: &ContentSignature,
        ledger: &dyn PerformanceLedger,
        rng: &mut R,
    ) -> Selection {
        let families = eligible_families(profile.class());
        if families.is_empty() {
            return self.fallback(profile, signature, ledger);
        }

        let family_scores: Vec<(AlgorithmFamily, f64)> = families
            .iter()
            .map(|&family| (family, self.family_blend(family, profile, signature, ledger)))
            .collect();
        let (family, family_explored) = pick(
            &family_scores,
            self.config.family_exploration_rate.get(),
            rng,
        );

        let variant_scores: Vec<(AlgorithmVariant, f64)> = family
            .variants()
            .iter()
            .map(|&variant| (variant, self.variant_blend(variant, profile, signature, ledger)))
            .collect();
        let (variant, variant_explored) = pick(
            &variant_scores,
            self.config.variant_exploration_rate.get(),
            rng,
        );

        let mut ranked: Vec<(AlgorithmVariant, f64)> = family_scores
            .iter()
            .flat_map(|&(candidate_family, family_score)| {
                candidate_family
                    .variants()
                    .iter()
                    .map(move |&candidate| (candidate, family_score))
            })
            .map(|(candidate, family_score)| {
                let variant_score = self.variant_blend(candidate, profile, signature, ledger);
                (candidate, (family_score + variant_score) / 2.0)
            })
            .collect();

        let score = ranked
            .iter()
            .find(|(candidate, _)| *candidate == variant)
            .map_or(0.0, |(_, score)| *score);

        ranked.retain(|(candidate, _)| *candidate != variant);
        // Stable sort keeps table order among equal scores
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        let alternatives: Vec<Alternative> = ranked
            .into_iter()
            .take(self.config.top_n)
            .map(|(candidate, candidate_score)| Alternative::new(candidate, candidate_score))
            .collect();

        debug!(
            "Selected {} / {} for {} (score {:.3}, explored: {})",
            family,
            variant,
            signature,
            score,
            family_explored || variant_explored
        );

        Selection {
            variant,
            family,
            score,
            confidence: (score * 1.2).min(1.0),
            alternatives,
            explored: family_explored || variant_explored,
        }
    }

    fn fallback(
        &self,
        profile: &ContentProfile,
        signature: &ContentSignature,
        ledger: &dyn PerformanceLedger,
    ) -> Selection {
        let family = AlgorithmFamily::Lz77;
        let variant = AlgorithmVariant::Gzip;
        let score = (self.family_blend(family, profile, signature, ledger)
            + self.variant_blend(variant, profile, signature, ledger))
            / 2.0;

        debug!(
            "No eligible families for class {}, using {} / {}",
            profile.class(),
            family,
            variant
        );

        Selection {
            variant,
            family,
            score,
            confidence: (score * 1.2).min(1.0),
            alternatives: Vec::new(),
            explored: false,
        }
    }
}

/// Explore uniformly with probability `rate`, otherwise take the first maximum
fn pick<T: Copy, R: Rng + ?Sized>(candidates: &[(T, f64)], rate: f64, rng: &mut R) -> (T, bool) {
    if candidates.len() > 1 && rng.gen_bool(rate) {
        let index = rng.gen_range(0..candidates.len());
        return (candidates[index].0, true);
    }

    let mut best = candidates[0];
    for &candidate in &candidates[1..] {
        if candidate.1 > best.1 {
            best = candidate;
        }
    }
    (best.0, false)
}
