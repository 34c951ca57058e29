//! Collaborator traits for the decision engine
//!
//! The engine consumes a [`PerformanceLedger`] for feedback and hands decisions to
//! callers that drive a [`Codec`]. Both are trait objects so in-memory, file-backed
//! or networked implementations can be swapped without touching the engine.

use crate::{
    AlgorithmFamily, AlgorithmVariant, ContentSignature, LedgerStats, Parameters, Result,
};

/// Store of historical (signature, variant) outcome statistics
///
/// Updates to one key must be serialized so the running averages stay exact under
/// concurrent writers; reads may be stale.
pub trait PerformanceLedger: Send + Sync {
    /// Look up statistics for a key
    fn get(&self, signature: &ContentSignature, variant: AlgorithmVariant) -> Option<LedgerStats>;

    /// Fold one observation into the key's running averages and return the new statistics
    fn update(
        &self,
        signature: &ContentSignature,
        variant: AlgorithmVariant,
        ratio: f64,
        time_secs: f64,
        quality: f64,
    ) -> Result<LedgerStats>;

    /// Mean quality over the family's variants that have data for this signature
    fn family_quality(
        &self,
        signature: &ContentSignature,
        family: AlgorithmFamily,
    ) -> Option<f64> {
        let qualities: Vec<f64> = family
            .variants()
            .iter()
            .filter_map(|variant| self.get(signature, *variant))
            .filter(|stats| stats.count > 0)
            .map(|stats| stats.avg_quality)
            .collect();

        if qualities.is_empty() {
            None
        } else {
            Some(qualities.iter().sum::<f64>() / qualities.len() as f64)
        }
    }
}

/// Byte-level codec over the closed variant enumeration
pub trait Codec: Send + Sync {
    /// Compress data with a variant and its tuned parameters
    fn compress(
        &self,
        data: &[u8],
        variant: AlgorithmVariant,
        parameters: &Parameters,
    ) -> Result<Vec<u8>>;

    /// Decompress data produced by [`Codec::compress`] with the same variant
    fn decompress(&self, data: &[u8], variant: AlgorithmVariant) -> Result<Vec<u8>>;

    /// Whether the codec implements a variant
    fn supports(&self, variant: AlgorithmVariant) -> bool;
}
