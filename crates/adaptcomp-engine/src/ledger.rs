//! In-memory performance ledger

use adaptcomp_types::{
    AlgorithmVariant, ContentSignature, Error, LedgerStats, PerformanceLedger, Result,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use tracing::{debug, info};

type LedgerKey = (ContentSignature, AlgorithmVariant);

/// Process-local ledger keyed by (signature, variant)
///
/// The map lock is held only to find or insert a key's cell; each cell has its
/// own mutex so writers to different keys never contend.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    entries: RwLock<HashMap<LedgerKey, Arc<Mutex<LedgerStats>>>>,
}

impl InMemoryLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys with recorded outcomes
    pub fn len(&self) -> usize {
        self.entries.read().map_or(0, |entries| entries.len())
    }

    /// Whether nothing has been recorded yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of every key's statistics
    pub fn snapshot(&self) -> Result<Vec<(ContentSignature, AlgorithmVariant, LedgerStats)>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| Error::ledger("ledger map lock poisoned"))?;

        let mut snapshot = Vec::with_capacity(entries.len());
        for ((signature, variant), cell) in entries.iter() {
            let stats = cell
                .lock()
                .map_err(|_| Error::ledger(format!("entry lock poisoned for {signature}/{variant}")))?;
            snapshot.push((*signature, *variant, *stats));
        }
        snapshot.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));
        Ok(snapshot)
    }

    fn cell(&self, key: LedgerKey) -> Result<Arc<Mutex<LedgerStats>>> {
        if let Some(cell) = self
            .entries
            .read()
            .map_err(|_| Error::ledger("ledger map lock poisoned"))?
            .get(&key)
        {
            return Ok(Arc::clone(cell));
        }

        let mut entries = self
            .entries
            .write()
            .map_err(|_| Error::ledger("ledger map lock poisoned"))?;
        Ok(Arc::clone(entries.entry(key).or_default()))
    }
}

impl PerformanceLedger for InMemoryLedger {
    fn get(&self, signature: &ContentSignature, variant: AlgorithmVariant) -> Option<LedgerStats> {
        let cell = self.entries.read().ok()?.get(&(*signature, variant)).cloned()?;
        let stats = cell.lock().ok().map(|stats| *stats);
        stats
    }

    fn update(
        &self,
        signature: &ContentSignature,
        variant: AlgorithmVariant,
        ratio: f64,
        time_secs: f64,
        quality: f64,
    ) -> Result<LedgerStats> {
        let cell = self.cell((*signature, variant))?;
        let mut stats = cell
            .lock()
            .map_err(|_| Error::ledger(format!("entry lock poisoned for {signature}/{variant}")))?;
        stats.record(ratio, time_secs, quality);

        debug!(
            "Ledger {}/{}: ratio {:.3}, time {:.4}s, quality {:.3}",
            signature, variant, ratio, time_secs, quality
        );
        info!(
            "Updated ledger for {} with {} (n={}, avg quality {:.3})",
            signature, variant, stats.count, stats.avg_quality
        );
        Ok(*stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adaptcomp_types::{AlgorithmFamily, ContentClass, ContentProfile};
    use std::thread;

    fn signature() -> ContentSignature {
        let profile = ContentProfile::new(
            [4.2, 0.3, 0.1, 0.6, 0.4, 0.2, 0.5, 0.7],
            ContentClass::Text,
            None,
        );
        ContentSignature::new(&profile, 4096)
    }

    #[test]
    fn test_empty_ledger() {
        let ledger = InMemoryLedger::new();
        assert!(ledger.is_empty());
        assert_eq!(ledger.get(&signature(), AlgorithmVariant::Zstd), None);
        assert_eq!(ledger.family_quality(&signature(), AlgorithmFamily::Dictionary), None);
    }

    #[test]
    fn test_sequential_mean() {
        let ledger = InMemoryLedger::new();
        let signature = signature();
        let qualities = [0.2, 0.4, 0.9, 0.5];

        for quality in qualities {
            ledger
                .update(&signature, AlgorithmVariant::Gzip, 0.5, 0.01, quality)
                .unwrap();
        }

        let stats = ledger.get(&signature, AlgorithmVariant::Gzip).unwrap();
        assert_eq!(stats.count, 4);
        assert!((stats.avg_quality - 0.5).abs() < 1e-12);
        assert!((stats.avg_ratio - 0.5).abs() < 1e-12);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_family_quality_averages_variants_with_data() {
        let ledger = InMemoryLedger::new();
        let signature = signature();
        ledger
            .update(&signature, AlgorithmVariant::Zstd, 0.3, 0.01, 0.8)
            .unwrap();
        ledger
            .update(&signature, AlgorithmVariant::Brotli, 0.3, 0.01, 0.4)
            .unwrap();

        let quality = ledger
            .family_quality(&signature, AlgorithmFamily::Dictionary)
            .unwrap();
        assert!((quality - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_concurrent_writers_to_one_key() {
        let ledger = InMemoryLedger::new();
        let signature = signature();
        let threads = 8;
        let per_thread = 250;

        thread::scope(|scope| {
            for worker in 0..threads {
                let ledger = &ledger;
                scope.spawn(move || {
                    let quality = if worker % 2 == 0 { 0.25 } else { 0.75 };
                    for _ in 0..per_thread {
                        ledger
                            .update(&signature, AlgorithmVariant::Lz4, 0.5, 0.001, quality)
                            .unwrap();
                    }
                });
            }
        });

        let stats = ledger.get(&signature, AlgorithmVariant::Lz4).unwrap();
        assert_eq!(stats.count, (threads * per_thread) as u64);
        assert!((stats.avg_quality - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_snapshot_is_sorted() {
        let ledger = InMemoryLedger::new();
        let signature = signature();
        for variant in [AlgorithmVariant::Zstd, AlgorithmVariant::Gzip] {
            ledger.update(&signature, variant, 0.5, 0.01, 0.5).unwrap();
        }

        let snapshot = ledger.snapshot().unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].1, AlgorithmVariant::Gzip);
        assert_eq!(snapshot[1].1, AlgorithmVariant::Zstd);
    }
}
