//! Code-structure density

use once_cell::sync::Lazy;
use regex::Regex;

const AVERAGE_LINE_WIDTH: usize = 80;

struct Construct {
    pattern: Regex,
    weight: f64,
}

static CONSTRUCTS: Lazy<Vec<Construct>> = Lazy::new(|| {
    [
        // Functions
        (r"\b(?:fn|def|function|func)\s+[A-Za-z_]\w*", 1.0),
        // Classes and types
        (
            r"\b(?:class|struct|enum|trait|interface|impl|type)\s+[A-Z]\w*",
            1.0,
        ),
        // Imports
        (
            r"(?m)^[ \t]*(?:use|import|from|package|#include|require)\b",
            1.0,
        ),
        // Comments
        (r"(?m)//|/\*|^[ \t]*#[ \t]", 0.5),
        // String literals
        (r#""[A-Za-z0-9_ .,:/-]{0,80}""#, 0.2),
    ]
    .into_iter()
    .map(|(pattern, weight)| Construct {
        pattern: Regex::new(pattern).expect("construct patterns are valid"),
        weight,
    })
    .collect()
});

/// Weighted construct count per effective line, boosted by brace nesting, capped at 1
pub fn code_structure_density(text: &str) -> f64 {
    if text.is_empty() {
        return 0.0;
    }

    let weighted: f64 = CONSTRUCTS
        .iter()
        .map(|construct| construct.pattern.find_iter(text).count() as f64 * construct.weight)
        .sum();
    if weighted == 0.0 {
        return 0.0;
    }

    let newlines = text.bytes().filter(|&b| b == b'\n').count();
    let effective_lines = (newlines + 1).max(text.len() / AVERAGE_LINE_WIDTH).max(1);
    let nesting = (max_brace_depth(text) as f64 / 10.0).min(1.0);

    (weighted / effective_lines as f64 * (1.0 + nesting)).min(1.0)
}

/// Deepest `{}` nesting; unmatched closers are ignored
pub fn max_brace_depth(text: &str) -> usize {
    let mut depth = 0usize;
    let mut deepest = 0usize;
    for c in text.chars() {
        match c {
            '{' => {
                depth += 1;
                deepest = deepest.max(depth);
            }
            '}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    deepest
}

#[cfg(test)]
mod tests {
    use super::*;

    const RUST_SOURCE: &str = r#"use std::collections::HashMap;

// Counts words
fn count(text: &str) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for word in text.split(" ") {
        *counts.entry(word.to_string()).or_insert(0) += 1;
    }
    counts
}

struct Counter {
    total: usize,
}
"#;

    #[test]
    fn test_plain_prose_has_no_structure() {
        let prose = "The quick brown fox jumps over the lazy dog.\nIt was not amused.";
        assert_eq!(code_structure_density(prose), 0.0);
        assert_eq!(code_structure_density(""), 0.0);
    }

    #[test]
    fn test_nesting_alone_is_not_structure() {
        assert_eq!(code_structure_density("{{{{{{{{}}}}}}}}"), 0.0);
    }

    #[test]
    fn test_source_code_scores_higher_than_prose() {
        let density = code_structure_density(RUST_SOURCE);
        assert!(density > 0.2, "density {density}");
        assert!(density <= 1.0);
    }

    #[test]
    fn test_brace_depth() {
        assert_eq!(max_brace_depth("{ { } { { } } }"), 3);
        assert_eq!(max_brace_depth("}}} {"), 1);
        assert_eq!(max_brace_depth("none"), 0);
    }
}
