//! Token-level text metrics

use std::collections::HashSet;

const BRACKETS: &[char] = &['(', ')', '[', ']', '{', '}', '<', '>'];
const OPERATORS: &[char] = &['+', '-', '*', '/', '=', '%', '&', '|', '^', '!', '~'];
const SENTENCE_BREAKS: &[char] = &['.', '!', '?', '\n'];

/// Maximal runs of alphanumeric or `_` characters
pub fn tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| !token.is_empty())
}

/// Weighted blend of token length, vocabulary richness, sentence length,
/// bracket density and operator density, clamped to 0-1
pub fn language_complexity(text: &str) -> f64 {
    let total_chars = text.chars().count();
    if total_chars == 0 {
        return 0.0;
    }

    let words: Vec<&str> = tokens(text).collect();
    let (avg_length, richness) = if words.is_empty() {
        (0.0, 0.0)
    } else {
        let total_length: usize = words.iter().map(|word| word.chars().count()).sum();
        let unique: HashSet<&str> = words.iter().copied().collect();
        (
            total_length as f64 / words.len() as f64,
            unique.len() as f64 / words.len() as f64,
        )
    };

    let sentence_lengths: Vec<usize> = text
        .split(SENTENCE_BREAKS)
        .map(|sentence| tokens(sentence).count())
        .filter(|&count| count > 0)
        .collect();
    let avg_sentence = if sentence_lengths.is_empty() {
        0.0
    } else {
        sentence_lengths.iter().sum::<usize>() as f64 / sentence_lengths.len() as f64
    };

    let brackets = text.chars().filter(|c| BRACKETS.contains(c)).count();
    let operators = text.chars().filter(|c| OPERATORS.contains(c)).count();

    let score = 0.2 * (avg_length / 10.0).min(1.0)
        + 0.3 * richness
        + 0.2 * (avg_sentence / 20.0).min(1.0)
        + 0.2 * (brackets as f64 / total_chars as f64 * 10.0).min(1.0)
        + 0.1 * (operators as f64 / total_chars as f64 * 10.0).min(1.0);

    score.clamp(0.0, 1.0)
}

/// Characters in tokens longer than two characters, over total characters
pub fn semantic_density(text: &str) -> f64 {
    let total_chars = text.chars().count();
    if total_chars == 0 {
        return 0.0;
    }

    let meaningful: usize = tokens(text)
        .map(|token| token.chars().count())
        .filter(|&length| length > 2)
        .sum();

    (meaningful as f64 / total_chars as f64).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_tokens() {
        let found: Vec<&str> = tokens("let snake_case = foo(bar, 42);").collect();
        assert_eq!(found, vec!["let", "snake_case", "foo", "bar", "42"]);
    }

    #[rstest]
    #[case("")]
    #[case("    \n\n  ")]
    fn test_blank_text(#[case] text: &str) {
        assert_eq!(semantic_density(text), 0.0);
        assert!(language_complexity(text) <= 0.2);
    }

    #[test]
    fn test_semantic_density() {
        // "hello" and "world" count, "a" and "of" do not
        let density = semantic_density("a hello of world");
        assert!((density - 10.0 / 16.0).abs() < 1e-12);
    }

    #[test]
    fn test_repetitive_text_is_simpler_than_prose() {
        let repetitive = "a a a a a a a a a a a a";
        let prose = "Compression engines characterize content, then select algorithms. \
                     Parameters are tuned (per variant) before encoding!";
        assert!(language_complexity(repetitive) < language_complexity(prose));
    }

    #[test]
    fn test_complexity_bounded() {
        let dense = "((([[[{{{<<<>>>}}}]]])))+-*/=%&|^!~".repeat(20);
        let complexity = language_complexity(&dense);
        assert!((0.0..=1.0).contains(&complexity));
    }
}
