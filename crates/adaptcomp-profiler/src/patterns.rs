//! Repeated-substring detection

use std::collections::HashMap;

/// Window sizes scanned for recurring substrings
pub const WINDOW_SIZES: [usize; 5] = [2, 3, 4, 8, 16];

/// Distinct recurring substrings across all window sizes, over content length, capped at 1
pub fn pattern_frequency(data: &[u8]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }

    let significant: usize = WINDOW_SIZES
        .iter()
        .filter(|&&size| size <= data.len())
        .map(|&size| recurring_windows(data, size))
        .sum();

    (significant as f64 / data.len() as f64).min(1.0)
}

fn recurring_windows(data: &[u8], size: usize) -> usize {
    let mut counts: HashMap<&[u8], u32> = HashMap::with_capacity(data.len().min(1 << 16));
    for window in data.windows(size) {
        *counts.entry(window).or_insert(0) += 1;
    }
    counts.values().filter(|&&count| count > 1).count()
}

/// Scaled pattern score used throughout the engine: `min(frequency * 100, 1)`
pub fn pattern_score(pattern_frequency: f64) -> f64 {
    (pattern_frequency * 100.0).min(1.0)
}

/// `0.4 * entropy/8 + 0.4 * redundancy + 0.2 * pattern_score`, capped at 1
pub fn compression_potential(entropy: f64, redundancy: f64, pattern_frequency: f64) -> f64 {
    let score = 0.4 * (entropy / 8.0) + 0.4 * redundancy + 0.2 * pattern_score(pattern_frequency);
    score.clamp(0.0, 1.0)
}
