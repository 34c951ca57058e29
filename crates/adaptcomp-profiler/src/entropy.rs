//! Byte-level statistics

/// Shannon entropy of the byte distribution, in bits per byte (0-8)
pub fn shannon_entropy(data: &[u8]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }

    let counts = byte_counts(data);
    let len = data.len() as f64;
    let mut entropy = 0.0;

    for &count in &counts {
        if count > 0 {
            let p = count as f64 / len;
            entropy -= p * p.log2();
        }
    }

    entropy.clamp(0.0, 8.0)
}

/// `1 - unique_bytes / total_bytes`
pub fn redundancy_ratio(data: &[u8]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }

    let unique = byte_counts(data).iter().filter(|&&count| count > 0).count();
    1.0 - unique as f64 / data.len() as f64
}

/// Fraction of NUL and control bytes, excluding tab, newline and carriage return
pub fn control_ratio(data: &[u8]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }

    let control = data
        .iter()
        .filter(|&&b| (b < 0x20 && !matches!(b, b'\t' | b'\n' | b'\r')) || b == 0x7f)
        .count();
    control as f64 / data.len() as f64
}

fn byte_counts(data: &[u8]) -> [u64; 256] {
    let mut counts = [0u64; 256];
    for &byte in data {
        counts[byte as usize] += 1;
    }
    counts
}
