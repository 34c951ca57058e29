//! Core data types for adaptcomp
//!
//! This module provides the content characterization types and the closed
//! algorithm enumerations the decision engine reasons about.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of dimensions in a content profile
pub const PROFILE_DIMENSIONS: usize = 8;

/// Maximum Shannon entropy of a byte stream, in bits per byte
pub const MAX_ENTROPY: f64 = 8.0;

/// Broad content classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ContentClass {
    /// Natural-language or otherwise unclassified printable text
    Text,
    /// Program source code
    Code,
    /// Binary data with many control or NUL bytes
    Binary,
    /// Tabular data such as CSV
    Data,
    /// Markup documents such as Markdown, HTML or LaTeX
    Document,
    /// Structured serialization formats such as JSON, XML or YAML
    Structured,
    /// Empty or degenerate input
    Unknown,
}

impl ContentClass {
    /// All content classes in declaration order
    pub const ALL: [ContentClass; 7] = [
        ContentClass::Text,
        ContentClass::Code,
        ContentClass::Binary,
        ContentClass::Data,
        ContentClass::Document,
        ContentClass::Structured,
        ContentClass::Unknown,
    ];

    /// Short lowercase name used in signatures and logs
    pub fn as_str(self) -> &'static str {
        match self {
            ContentClass::Text => "text",
            ContentClass::Code => "code",
            ContentClass::Binary => "binary",
            ContentClass::Data => "data",
            ContentClass::Document => "document",
            ContentClass::Structured => "structured",
            ContentClass::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ContentClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Class of compression technique
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AlgorithmFamily {
    /// Sliding-window dictionary coders
    Lz77,
    /// Explicit-dictionary LZ coders
    Lz78,
    /// Burrows-Wheeler transform coders
    Bwt,
    /// Prediction by partial matching
    Ppm,
    /// Static or trained dictionary coders
    Dictionary,
    /// Experimental techniques
    Advanced,
}

impl AlgorithmFamily {
    /// All families in declaration order
    pub const ALL: [AlgorithmFamily; 6] = [
        AlgorithmFamily::Lz77,
        AlgorithmFamily::Lz78,
        AlgorithmFamily::Bwt,
        AlgorithmFamily::Ppm,
        AlgorithmFamily::Dictionary,
        AlgorithmFamily::Advanced,
    ];

    /// Variants owned by this family
    pub fn variants(self) -> &'static [AlgorithmVariant] {
        match self {
            AlgorithmFamily::Lz77 => &[AlgorithmVariant::Gzip, AlgorithmVariant::Lz4],
            AlgorithmFamily::Lz78 => &[AlgorithmVariant::Lzma],
            AlgorithmFamily::Bwt => &[AlgorithmVariant::Bzip2],
            AlgorithmFamily::Ppm => &[AlgorithmVariant::ContentAware],
            AlgorithmFamily::Dictionary => &[AlgorithmVariant::Zstd, AlgorithmVariant::Brotli],
            AlgorithmFamily::Advanced => &[
                AlgorithmVariant::Quantum,
                AlgorithmVariant::Neuromorphic,
                AlgorithmVariant::Topological,
            ],
        }
    }
}

impl fmt::Display for AlgorithmFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AlgorithmFamily::Lz77 => "LZ77",
            AlgorithmFamily::Lz78 => "LZ78",
            AlgorithmFamily::Bwt => "BWT",
            AlgorithmFamily::Ppm => "PPM",
            AlgorithmFamily::Dictionary => "Dictionary",
            AlgorithmFamily::Advanced => "Advanced",
        };
        f.write_str(name)
    }
}

/// Concrete compression algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AlgorithmVariant {
    /// DEFLATE in a gzip wrapper
    Gzip,
    /// LZMA
    Lzma,
    /// bzip2
    Bzip2,
    /// LZ4 block format
    Lz4,
    /// Zstandard
    Zstd,
    /// Brotli
    Brotli,
    /// Context-modelling coder tuned by content class
    ContentAware,
    /// Experimental: quantum-inspired coder
    Quantum,
    /// Experimental: neuromorphic coder
    Neuromorphic,
    /// Experimental: topological coder
    Topological,
}

impl AlgorithmVariant {
    /// All variants in declaration order
    pub const ALL: [AlgorithmVariant; 10] = [
        AlgorithmVariant::Gzip,
        AlgorithmVariant::Lzma,
        AlgorithmVariant::Bzip2,
        AlgorithmVariant::Lz4,
        AlgorithmVariant::Zstd,
        AlgorithmVariant::Brotli,
        AlgorithmVariant::ContentAware,
        AlgorithmVariant::Quantum,
        AlgorithmVariant::Neuromorphic,
        AlgorithmVariant::Topological,
    ];

    /// Family that owns this variant
    pub fn family(self) -> AlgorithmFamily {
        match self {
            AlgorithmVariant::Gzip | AlgorithmVariant::Lz4 => AlgorithmFamily::Lz77,
            AlgorithmVariant::Lzma => AlgorithmFamily::Lz78,
            AlgorithmVariant::Bzip2 => AlgorithmFamily::Bwt,
            AlgorithmVariant::ContentAware => AlgorithmFamily::Ppm,
            AlgorithmVariant::Zstd | AlgorithmVariant::Brotli => AlgorithmFamily::Dictionary,
            AlgorithmVariant::Quantum
            | AlgorithmVariant::Neuromorphic
            | AlgorithmVariant::Topological => AlgorithmFamily::Advanced,
        }
    }

    /// Whether this is one of the experimental variants
    pub fn is_experimental(self) -> bool {
        self.family() == AlgorithmFamily::Advanced
    }

    /// Stable one-byte identifier used in framed containers
    pub fn id(self) -> u8 {
        match self {
            AlgorithmVariant::Gzip => 1,
            AlgorithmVariant::Lzma => 2,
            AlgorithmVariant::Bzip2 => 3,
            AlgorithmVariant::Lz4 => 4,
            AlgorithmVariant::Zstd => 5,
            AlgorithmVariant::Brotli => 6,
            AlgorithmVariant::ContentAware => 7,
            AlgorithmVariant::Quantum => 8,
            AlgorithmVariant::Neuromorphic => 9,
            AlgorithmVariant::Topological => 10,
        }
    }

    /// Convert an identifier back to a variant
    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|variant| variant.id() == id)
    }
}

impl fmt::Display for AlgorithmVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AlgorithmVariant::Gzip => "Gzip",
            AlgorithmVariant::Lzma => "Lzma",
            AlgorithmVariant::Bzip2 => "Bzip2",
            AlgorithmVariant::Lz4 => "Lz4",
            AlgorithmVariant::Zstd => "Zstd",
            AlgorithmVariant::Brotli => "Brotli",
            AlgorithmVariant::ContentAware => "ContentAware",
            AlgorithmVariant::Quantum => "Quantum",
            AlgorithmVariant::Neuromorphic => "Neuromorphic",
            AlgorithmVariant::Topological => "Topological",
        };
        f.write_str(name)
    }
}

/// Eight-dimensional characterization of a content item
///
/// The ordered dimensions are entropy (0-8), language complexity, code-structure
/// density, redundancy ratio, semantic density, pattern frequency, compression
/// potential and classification confidence (all 0-1). A profile is immutable once
/// built; out-of-range or non-finite inputs are clamped on construction.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ContentProfile {
    #[cfg_attr(feature = "serde", serde(rename = "profile"))]
    dimensions: [f64; PROFILE_DIMENSIONS],
    #[cfg_attr(feature = "serde", serde(rename = "content_class"))]
    class: ContentClass,
    #[cfg_attr(feature = "serde", serde(rename = "detected_language"))]
    language: Option<String>,
}

impl ContentProfile {
    /// Build a profile from its ordered dimensions
    pub fn new(
        dimensions: [f64; PROFILE_DIMENSIONS],
        class: ContentClass,
        language: Option<String>,
    ) -> Self {
        let mut clamped = [0.0; PROFILE_DIMENSIONS];
        for (index, value) in dimensions.iter().enumerate() {
            let upper = if index == 0 { MAX_ENTROPY } else { 1.0 };
            clamped[index] = if value.is_finite() {
                value.clamp(0.0, upper)
            } else {
                0.0
            };
        }

        Self {
            dimensions: clamped,
            class,
            language,
        }
    }

    /// The all-zero profile produced for empty content
    pub fn zero() -> Self {
        Self {
            dimensions: [0.0; PROFILE_DIMENSIONS],
            class: ContentClass::Unknown,
            language: None,
        }
    }

    /// Ordered profile vector
    pub fn as_array(&self) -> [f64; PROFILE_DIMENSIONS] {
        self.dimensions
    }

    /// Shannon entropy in bits per byte (0-8)
    pub fn entropy(&self) -> f64 {
        self.dimensions[0]
    }

    /// Entropy scaled to 0-1
    pub fn normalized_entropy(&self) -> f64 {
        self.dimensions[0] / MAX_ENTROPY
    }

    /// Language complexity
    pub fn language_complexity(&self) -> f64 {
        self.dimensions[1]
    }

    /// Code-structure density
    pub fn code_structure(&self) -> f64 {
        self.dimensions[2]
    }

    /// Redundancy ratio
    pub fn redundancy(&self) -> f64 {
        self.dimensions[3]
    }

    /// Semantic density
    pub fn semantic_density(&self) -> f64 {
        self.dimensions[4]
    }

    /// Pattern frequency
    pub fn pattern_frequency(&self) -> f64 {
        self.dimensions[5]
    }

    /// Compression-potential estimate
    pub fn compression_potential(&self) -> f64 {
        self.dimensions[6]
    }

    /// Classification confidence
    pub fn confidence(&self) -> f64 {
        self.dimensions[7]
    }

    /// Content classification
    pub fn class(&self) -> ContentClass {
        self.class
    }

    /// Detected programming language, when the content is code
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// Whether every dimension is zero
    pub fn is_zero(&self) -> bool {
        self.dimensions.iter().all(|value| *value == 0.0)
    }
}

/// Coarse size bucket used in content signatures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SizeClass {
    /// Zero bytes
    Empty,
    /// Below 1 KiB
    Tiny,
    /// Below 64 KiB
    Small,
    /// Below 1 MiB
    Medium,
    /// 1 MiB and above
    Large,
}

impl SizeClass {
    /// Bucket a content length
    pub fn from_len(len: usize) -> Self {
        match len {
            0 => SizeClass::Empty,
            1..=1023 => SizeClass::Tiny,
            1024..=65_535 => SizeClass::Small,
            65_536..=1_048_575 => SizeClass::Medium,
            _ => SizeClass::Large,
        }
    }

    /// Short lowercase name
    pub fn as_str(self) -> &'static str {
        match self {
            SizeClass::Empty => "empty",
            SizeClass::Tiny => "tiny",
            SizeClass::Small => "small",
            SizeClass::Medium => "medium",
            SizeClass::Large => "large",
        }
    }
}

/// Ledger key derived from a profile: class, whole-bit entropy bucket and size class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ContentSignature {
    /// Content class
    pub class: ContentClass,
    /// Entropy rounded down to whole bits (0-8)
    pub entropy_bucket: u8,
    /// Size bucket of the content
    pub size: SizeClass,
}

impl ContentSignature {
    /// Derive the signature of a profiled content item of `len` bytes
    pub fn new(profile: &ContentProfile, len: usize) -> Self {
        Self {
            class: profile.class(),
            entropy_bucket: profile.entropy().floor().clamp(0.0, MAX_ENTROPY) as u8,
            size: SizeClass::from_len(len),
        }
    }
}

impl fmt::Display for ContentSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/e{}/{}",
            self.class,
            self.entropy_bucket,
            self.size.as_str()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_variant_id_roundtrip() {
        for variant in AlgorithmVariant::ALL {
            assert_eq!(AlgorithmVariant::from_id(variant.id()), Some(variant));
        }
        assert_eq!(AlgorithmVariant::from_id(0), None);
        assert_eq!(AlgorithmVariant::from_id(200), None);
    }

    #[test]
    fn test_experimental_variants() {
        assert!(AlgorithmVariant::Quantum.is_experimental());
        assert!(AlgorithmVariant::Topological.is_experimental());
        assert!(!AlgorithmVariant::Zstd.is_experimental());
    }

    #[test]
    fn test_profile_clamps_dimensions() {
        let profile = ContentProfile::new(
            [9.5, 1.4, -0.2, 0.5, f64::NAN, 0.1, 2.0, 0.7],
            ContentClass::Text,
            None,
        );

        assert_eq!(profile.entropy(), 8.0);
        assert_eq!(profile.language_complexity(), 1.0);
        assert_eq!(profile.code_structure(), 0.0);
        assert_eq!(profile.semantic_density(), 0.0);
        assert_eq!(profile.compression_potential(), 1.0);
    }

    #[test]
    fn test_zero_profile() {
        let profile = ContentProfile::zero();
        assert!(profile.is_zero());
        assert_eq!(profile.class(), ContentClass::Unknown);
        assert_eq!(profile.language(), None);
    }

    #[rstest]
    #[case(0, SizeClass::Empty)]
    #[case(1, SizeClass::Tiny)]
    #[case(1023, SizeClass::Tiny)]
    #[case(1024, SizeClass::Small)]
    #[case(65_536, SizeClass::Medium)]
    #[case(1_048_576, SizeClass::Large)]
    fn test_size_class(#[case] len: usize, #[case] expected: SizeClass) {
        assert_eq!(SizeClass::from_len(len), expected);
    }

    #[test]
    fn test_signature_display() {
        let profile = ContentProfile::new(
            [6.4, 0.5, 0.1, 0.9, 0.4, 0.2, 0.8, 0.7],
            ContentClass::Text,
            None,
        );
        let signature = ContentSignature::new(&profile, 10_000);

        assert_eq!(signature.entropy_bucket, 6);
        assert_eq!(signature.to_string(), "text/e6/small");
    }
}
