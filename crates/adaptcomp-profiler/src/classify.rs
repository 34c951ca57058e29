//! Content classification by signature matching
//!
//! Signatures are evaluated in a fixed order: binary detection first (which
//! short-circuits), then structured formats, tabular data, source code and
//! documents. A signature counts only when its raw matches reach
//! [`required_matches`] for the sample length and its confidence reaches the
//! Text default. The candidate with the highest confidence wins, ties going to
//! the higher raw match count and then to evaluation order. Content no
//! signature qualifies for is Text.

use crate::entropy::control_ratio;
use adaptcomp_types::ContentClass;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// Minimum raw matches before a signature is considered
pub const MIN_MATCHES: usize = 2;

/// Sample bytes covered by each required match
pub const MATCH_SPAN: usize = 1024;

/// Control-byte ratio above which content is binary
pub const BINARY_THRESHOLD: f64 = 0.10;

/// Confidence assigned to unmatched printable content
pub const DEFAULT_TEXT_CONFIDENCE: f64 = 0.7;

const CSV_DELIMITERS: [char; 3] = [',', ';', '\t'];
const CSV_THRESHOLD: usize = 10;

/// Result of classifying one content item
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    /// Content class
    pub class: ContentClass,
    /// Classification confidence (0-1)
    pub confidence: f64,
    /// Detected programming language, for code
    pub language: Option<String>,
}

impl Classification {
    fn text() -> Self {
        Self {
            class: ContentClass::Text,
            confidence: DEFAULT_TEXT_CONFIDENCE,
            language: None,
        }
    }
}

struct Signature {
    class: ContentClass,
    language: Option<&'static str>,
    anchor: Option<Regex>,
    patterns: Vec<Regex>,
    threshold: usize,
}

impl Signature {
    fn new(
        class: ContentClass,
        language: Option<&'static str>,
        anchor: Option<&str>,
        patterns: &[&str],
        threshold: usize,
    ) -> Self {
        Self {
            class,
            language,
            anchor: anchor.map(compile),
            patterns: patterns.iter().copied().map(compile).collect(),
            threshold,
        }
    }

    fn matches(&self, text: &str) -> usize {
        if let Some(anchor) = &self.anchor {
            if !anchor.is_match(text) {
                return 0;
            }
        }
        self.patterns
            .iter()
            .map(|pattern| pattern.find_iter(text).count())
            .sum()
    }
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("signature patterns are valid")
}

const TAGS: &str = "html|head|body|div|p|span|h[1-6]|ul|ol|li|a|table|tr|td|title|section";

static STRUCTURED: Lazy<Vec<Signature>> = Lazy::new(|| {
    vec![
        // JSON
        Signature::new(
            ContentClass::Structured,
            None,
            Some(r"\A\s*[\[{]"),
            &[r#""[^"\n]{1,64}"\s*:"#],
            10,
        ),
        // XML
        Signature::new(
            ContentClass::Structured,
            None,
            Some(r"\A\s*<"),
            &[r"<\?xml", r"</[A-Za-z][\w:.-]*>", r"\bxmlns(?::\w+)?="],
            10,
        ),
        // YAML
        Signature::new(
            ContentClass::Structured,
            None,
            None,
            &[
                r"(?m)^---[ \t]*$",
                r"(?m)^[ \t]*[A-Za-z_][\w-]*:[ \t]+[^,;{(\s][^,;{(]*$",
            ],
            8,
        ),
    ]
});

static CODE: Lazy<Vec<Signature>> = Lazy::new(|| {
    vec![
        Signature::new(
            ContentClass::Code,
            Some("rust"),
            None,
            &[
                r"\bfn\s+\w+",
                r"\blet\s+(?:mut\s+)?\w+",
                r"\bimpl\b",
                r"\bpub\s+(?:fn|struct|enum|mod|use|trait|const)\b",
                r"\buse\s+\w+(?:::\w+)+",
                r"&(?:mut\s+)?self\b",
                r"\bmatch\s+\w+",
            ],
            10,
        ),
        Signature::new(
            ContentClass::Code,
            Some("python"),
            None,
            &[
                r"(?m)^[ \t]*def\s+\w+\s*\(",
                r"(?m)^[ \t]*(?:from\s+[\w.]+\s+)?import\s+\w",
                r"\bself\.",
                r"\b(?:None|True|False|elif)\b",
                r"__\w+__",
            ],
            10,
        ),
        Signature::new(
            ContentClass::Code,
            Some("javascript"),
            None,
            &[
                r"\bfunction\b",
                r"\b(?:const|let|var)\s+\w+\s*=",
                r"=>",
                r"\bconsole\.\w+",
                r"===|!==",
                r"\brequire\s*\(|\bexport\s+(?:default|const|function)\b",
            ],
            10,
        ),
        Signature::new(
            ContentClass::Code,
            Some("java"),
            None,
            &[
                r"\bpublic\s+(?:static\s+)?(?:class|void|final|interface)\b",
                r"\bSystem\.out\.",
                r"\bprivate\s+\w+",
                r"@Override\b",
                r"\bimport\s+java\.",
                r"\bnew\s+[A-Z]\w*\s*\(",
            ],
            10,
        ),
        Signature::new(
            ContentClass::Code,
            Some("c"),
            None,
            &[
                r#"#include\s*[<"]"#,
                r"\b(?:printf|malloc|free|sizeof)\s*\(",
                r"\btypedef\b",
                r"\bint\s+main\s*\(",
                r"\b(?:unsigned|void)\s+\**\w",
            ],
            10,
        ),
        Signature::new(
            ContentClass::Code,
            Some("go"),
            None,
            &[
                r"\bfunc\s+",
                r"(?m)^package\s+\w+",
                r":=",
                r"\bfmt\.\w+",
                r"\b(?:defer|chan)\b",
            ],
            10,
        ),
    ]
});

static DOCUMENT: Lazy<Vec<Signature>> = Lazy::new(|| {
    vec![
        // Markdown
        Signature::new(
            ContentClass::Document,
            None,
            None,
            &[
                r"(?m)^#{1,6}[ \t]+\S",
                r"(?m)^[ \t]*[-*+][ \t]+\S",
                r"\[[^\]\n]+\]\([^)\n]+\)",
            ],
            8,
        ),
        // HTML
        Signature::new(
            ContentClass::Document,
            None,
            None,
            &[
                r"(?i)<!DOCTYPE\s+html",
                format!(r"(?i)<(?:{TAGS})\b[^>]*>").as_str(),
                format!(r"(?i)</(?:{TAGS})>").as_str(),
            ],
            10,
        ),
        // LaTeX
        Signature::new(
            ContentClass::Document,
            None,
            None,
            &[
                r"\\(?:documentclass|usepackage|begin|end|section|subsection|chapter)\b",
                r"\\(?:textbf|emph|cite|ref|label)\{",
            ],
            8,
        ),
    ]
});

#[derive(Debug, Clone, Copy)]
struct Candidate {
    class: ContentClass,
    language: Option<&'static str>,
    matches: usize,
    confidence: f64,
}

impl Candidate {
    fn new(
        class: ContentClass,
        language: Option<&'static str>,
        matches: usize,
        threshold: usize,
        required: usize,
    ) -> Option<Self> {
        if matches < required {
            return None;
        }
        let confidence = signature_confidence(matches, threshold);
        // Tolerance keeps exact hits on the default (0.5 + 0.2) from rounding below it
        if confidence + 1e-9 < DEFAULT_TEXT_CONFIDENCE {
            return None;
        }
        Some(Self {
            class,
            language,
            matches,
            confidence,
        })
    }

    fn beats(&self, other: &Self) -> bool {
        self.confidence > other.confidence
            || (self.confidence == other.confidence && self.matches > other.matches)
    }
}

/// `min(0.5 + matches / (2 * threshold), 1)`
pub fn signature_confidence(matches: usize, threshold: usize) -> f64 {
    (0.5 + matches as f64 / (2.0 * threshold.max(1) as f64)).min(1.0)
}

/// Raw matches a signature needs in a sample of `len` bytes
///
/// One per started [`MATCH_SPAN`], never fewer than [`MIN_MATCHES`].
pub fn required_matches(len: usize) -> usize {
    len.div_ceil(MATCH_SPAN).max(MIN_MATCHES)
}

/// Classify content from its raw bytes and lossy text view
pub fn classify(bytes: &[u8], text: &str) -> Classification {
    if bytes.is_empty() {
        return Classification {
            class: ContentClass::Unknown,
            confidence: 0.0,
            language: None,
        };
    }

    let binary_ratio = control_ratio(bytes);
    if binary_ratio > BINARY_THRESHOLD {
        return Classification {
            class: ContentClass::Binary,
            confidence: (binary_ratio * 2.0).min(1.0),
            language: None,
        };
    }

    let required = required_matches(text.len());
    let structured = STRUCTURED
        .iter()
        .filter_map(|signature| evaluate(signature, text, required));
    let data = Candidate::new(
        ContentClass::Data,
        None,
        csv_matches(text),
        CSV_THRESHOLD,
        required,
    );
    let code = CODE
        .iter()
        .filter_map(|signature| evaluate(signature, text, required));
    let documents = DOCUMENT
        .iter()
        .filter_map(|signature| evaluate(signature, text, required));

    let best = structured
        .chain(data)
        .chain(code)
        .chain(documents)
        .fold(None::<Candidate>, |best, candidate| match best {
            Some(current) if !candidate.beats(&current) => Some(current),
            _ => Some(candidate),
        });

    best.map_or_else(Classification::text, |candidate| Classification {
        class: candidate.class,
        confidence: candidate.confidence,
        language: candidate.language.map(str::to_string),
    })
}

fn evaluate(signature: &Signature, text: &str, required: usize) -> Option<Candidate> {
    Candidate::new(
        signature.class,
        signature.language,
        signature.matches(text),
        signature.threshold,
        required,
    )
}

/// Lines sharing the most common non-zero delimiter count
///
/// Only counts when those lines make up at least half of the non-empty lines.
fn csv_matches(text: &str) -> usize {
    let lines: Vec<&str> = text.lines().filter(|line| !line.trim().is_empty()).collect();
    if lines.len() < MIN_MATCHES {
        return 0;
    }

    CSV_DELIMITERS
        .iter()
        .map(|&delimiter| {
            let mut histogram: HashMap<usize, usize> = HashMap::new();
            for line in &lines {
                let count = line.matches(delimiter).count();
                if count > 0 {
                    *histogram.entry(count).or_insert(0) += 1;
                }
            }
            let mode = histogram.values().copied().max().unwrap_or(0);
            if mode * 2 >= lines.len() {
                mode
            } else {
                0
            }
        })
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn classify_str(text: &str) -> Classification {
        classify(text.as_bytes(), text)
    }

    #[test]
    fn test_empty_is_unknown() {
        let classification = classify(b"", "");
        assert_eq!(classification.class, ContentClass::Unknown);
        assert_eq!(classification.confidence, 0.0);
    }

    #[test]
    fn test_binary_short_circuits() {
        let mut bytes = vec![0u8; 40];
        bytes.extend_from_slice(br#"{"key": "value", "other": 1}"#);
        let text = String::from_utf8_lossy(&bytes).into_owned();
        let classification = classify(&bytes, &text);

        assert_eq!(classification.class, ContentClass::Binary);
        assert_eq!(classification.confidence, 1.0);
    }

    #[test]
    fn test_plain_text_defaults() {
        let classification = classify_str("just a sentence about nothing in particular");
        assert_eq!(classification.class, ContentClass::Text);
        assert_eq!(classification.confidence, DEFAULT_TEXT_CONFIDENCE);
        assert_eq!(classification.language, None);
    }

    #[test]
    fn test_single_match_is_not_enough() {
        let classification = classify_str("one fn call in an otherwise plain sentence");
        assert_eq!(classification.class, ContentClass::Text);
    }

    #[rstest]
    #[case(r#"{"name": "adaptcomp", "version": "1.0", "license": "MIT", "tags": ["a", "b"]}"#, ContentClass::Structured)]
    #[case("<?xml version=\"1.0\"?>\n<root><item>1</item><item>2</item></root>", ContentClass::Structured)]
    #[case("---\nname: adaptcomp\nversion: 1.0\nlicense: MIT\n", ContentClass::Structured)]
    #[case("id,name,score\n1,alpha,0.5\n2,beta,0.7\n3,gamma,0.9\n", ContentClass::Data)]
    #[case("# Title\n\nSome intro.\n\n- first\n- second\n\nSee [docs](https://example.org).\n", ContentClass::Document)]
    #[case("<!DOCTYPE html>\n<html><body><div><p>Hello</p></div></body></html>", ContentClass::Document)]
    fn test_formats(#[case] text: &str, #[case] expected: ContentClass) {
        assert_eq!(classify_str(text).class, expected);
    }

    #[rstest]
    #[case(
        "use std::io;\n\npub fn main() {\n    let mut line = String::new();\n    let n = 3;\n    match n { _ => {} }\n}\n",
        "rust"
    )]
    #[case(
        "import os\nfrom sys import argv\n\ndef main():\n    if argv is None:\n        return False\n    self.value = True\n",
        "python"
    )]
    #[case(
        "const path = require('path');\nfunction run() {\n  let x = 1;\n  console.log(x === 1);\n}\n",
        "javascript"
    )]
    #[case(
        "package main\n\nimport \"fmt\"\n\nfunc main() {\n    x := 1\n    defer fmt.Println(x)\n}\n",
        "go"
    )]
    fn test_code_languages(#[case] source: &str, #[case] language: &str) {
        let classification = classify_str(source);
        assert_eq!(classification.class, ContentClass::Code);
        assert_eq!(classification.language.as_deref(), Some(language));
    }

    #[test]
    fn test_weak_signatures_stay_text() {
        // Two python keywords give 0.6, below the Text default
        let classification = classify_str(
            "It was True that None of the guests arrived early, so the hosts waited in the hall.",
        );
        assert_eq!(classification.class, ContentClass::Text);
        assert_eq!(classification.language, None);
    }

    #[test]
    fn test_sparse_matches_in_long_text_stay_text() {
        // Five go operators give 0.75, but 6 KiB of prose needs seven matches
        let mut text = "the quick brown fox jumps over the lazy dog ".repeat(140);
        for _ in 0..5 {
            text.push_str("a := b ");
        }
        assert_eq!(required_matches(text.len()), 7);
        assert_eq!(classify_str(&text).class, ContentClass::Text);
    }

    #[rstest]
    #[case(0, MIN_MATCHES)]
    #[case(100, MIN_MATCHES)]
    #[case(2048, 2)]
    #[case(2049, 3)]
    #[case(10_000, 10)]
    fn test_required_matches_scale_with_length(#[case] len: usize, #[case] required: usize) {
        assert_eq!(required_matches(len), required);
    }

    #[test]
    fn test_random_printable_is_text() {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        for seed in 0..50u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let text: String = (0..10_000)
                .map(|_| char::from(rng.gen_range(0x20u8..=0x7e)))
                .collect();
            let classification = classify_str(&text);
            assert_eq!(
                classification.class,
                ContentClass::Text,
                "seed {seed} classified as {:?} ({:?})",
                classification.class,
                classification.language
            );
        }
    }

    #[test]
    fn test_signature_confidence() {
        assert_eq!(signature_confidence(2, 10), 0.6);
        assert_eq!(signature_confidence(20, 10), 1.0);
        assert_eq!(signature_confidence(100, 10), 1.0);
    }
}
