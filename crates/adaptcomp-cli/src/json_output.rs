//! JSON output structures for the adaptcomp CLI

use adaptcomp_engine::CompressionReport;
use adaptcomp_types::{AlgorithmVariant, ContentClass, ContentProfile, Decision, Parameters};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Operation metadata shared by every JSON document
#[derive(Debug, Serialize, Deserialize)]
pub struct OperationMetadata {
    /// adaptcomp version
    pub version: String,
    /// Operation type
    pub operation: String,
    /// Input path
    pub input_path: String,
    /// Output path, if the operation writes one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<String>,
}

impl OperationMetadata {
    /// Metadata for an operation
    pub fn new(operation: &str, input_path: String, output_path: Option<String>) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            operation: operation.to_string(),
            input_path,
            output_path,
        }
    }
}

/// Content profile with named dimensions
#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileJson {
    /// Operation metadata
    pub metadata: OperationMetadata,
    /// Input size in bytes
    pub size_bytes: u64,
    /// Content class
    pub content_class: ContentClass,
    /// Detected programming language
    pub detected_language: Option<String>,
    /// Shannon entropy (0-8)
    pub entropy: f64,
    /// Language complexity (0-1)
    pub language_complexity: f64,
    /// Code-structure density (0-1)
    pub code_structure: f64,
    /// Redundancy ratio (0-1)
    pub redundancy: f64,
    /// Semantic density (0-1)
    pub semantic_density: f64,
    /// Pattern frequency (0-1)
    pub pattern_frequency: f64,
    /// Compression potential (0-1)
    pub compression_potential: f64,
    /// Classification confidence (0-1)
    pub confidence: f64,
}

impl ProfileJson {
    /// Build the document from a profile
    pub fn new(input_path: String, size_bytes: u64, profile: &ContentProfile) -> Self {
        Self {
            metadata: OperationMetadata::new("profile", input_path, None),
            size_bytes,
            content_class: profile.class(),
            detected_language: profile.language().map(str::to_string),
            entropy: profile.entropy(),
            language_complexity: profile.language_complexity(),
            code_structure: profile.code_structure(),
            redundancy: profile.redundancy(),
            semantic_density: profile.semantic_density(),
            pattern_frequency: profile.pattern_frequency(),
            compression_potential: profile.compression_potential(),
            confidence: profile.confidence(),
        }
    }
}

/// Decision document
#[derive(Debug, Serialize)]
pub struct DecisionJson<'a> {
    /// Operation metadata
    pub metadata: OperationMetadata,
    /// The decision itself
    pub decision: &'a Decision,
}

/// One failed candidate
#[derive(Debug, Serialize, Deserialize)]
pub struct FailedAttemptJson {
    /// Variant that failed
    pub variant: AlgorithmVariant,
    /// Failure message
    pub error: String,
}

/// Compression statistics
#[derive(Debug, Serialize, Deserialize)]
pub struct CompressionStatsJson {
    /// Input size in bytes
    pub original_bytes: u64,
    /// Codec payload size in bytes
    pub compressed_bytes: u64,
    /// Written container size in bytes, header included
    pub container_bytes: u64,
    /// compressed / original
    pub ratio: f64,
    /// Space saved in percent
    pub savings_percent: f64,
    /// Codec time in seconds
    pub duration_seconds: f64,
    /// Derived quality score (0-1)
    pub quality: f64,
}

/// Complete JSON output for a compression run
#[derive(Debug, Serialize)]
pub struct CompressionJson<'a> {
    /// Operation metadata
    pub metadata: OperationMetadata,
    /// Variant that produced the output
    pub variant: AlgorithmVariant,
    /// Parameters it was run with
    pub parameters: &'a Parameters,
    /// Whether a fallback candidate was used
    pub fell_back: bool,
    /// Candidates that failed first
    pub failed_attempts: Vec<FailedAttemptJson>,
    /// Size and timing
    pub stats: CompressionStatsJson,
    /// Decision the candidates came from
    pub decision: &'a Decision,
}

impl<'a> CompressionJson<'a> {
    /// Build the document from a compression report
    pub fn new(
        input_path: String,
        output_path: String,
        report: &'a CompressionReport,
        container_bytes: u64,
    ) -> Self {
        let outcome = &report.outcome;
        Self {
            metadata: OperationMetadata::new("compress", input_path, Some(output_path)),
            variant: report.variant,
            parameters: &report.parameters,
            fell_back: report.fell_back(),
            failed_attempts: report
                .failures
                .iter()
                .map(|(variant, error)| FailedAttemptJson {
                    variant: *variant,
                    error: error.to_string(),
                })
                .collect(),
            stats: CompressionStatsJson {
                original_bytes: outcome.original_size,
                compressed_bytes: outcome.compressed_size,
                container_bytes,
                ratio: outcome.ratio(),
                savings_percent: (1.0 - outcome.ratio()) * 100.0,
                duration_seconds: outcome.elapsed.as_secs_f64(),
                quality: outcome.quality(),
            },
            decision: &report.decision,
        }
    }
}

/// Complete JSON output for a decompression run
#[derive(Debug, Serialize, Deserialize)]
pub struct DecompressionJson {
    /// Operation metadata
    pub metadata: OperationMetadata,
    /// Variant read from the container header
    pub variant: AlgorithmVariant,
    /// Container size in bytes
    pub container_bytes: u64,
    /// Restored size in bytes
    pub restored_bytes: u64,
    /// Codec time in seconds
    pub duration_seconds: f64,
}

impl DecompressionJson {
    /// Build the document from a decompression run
    pub fn new(
        input_path: String,
        output_path: String,
        variant: AlgorithmVariant,
        container_bytes: u64,
        restored_bytes: u64,
        duration: Duration,
    ) -> Self {
        Self {
            metadata: OperationMetadata::new("decompress", input_path, Some(output_path)),
            variant,
            container_bytes,
            restored_bytes,
            duration_seconds: duration.as_secs_f64(),
        }
    }
}
