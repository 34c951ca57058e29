//! Display utilities for the adaptcomp CLI

use adaptcomp_engine::CompressionReport;
use adaptcomp_types::{AlgorithmVariant, ContentProfile, Decision, ParameterValue};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Display a content profile
pub fn display_profile(profile: &ContentProfile, size: u64) {
    println!();
    println!("{}", style("Content Profile:").bold().underlined());
    println!("  Size: {}", style(format_bytes(size)).cyan());
    println!("  Class: {}", style(profile.class()).cyan().bold());
    if let Some(language) = profile.language() {
        println!("  Language: {}", style(language).cyan());
    }
    println!(
        "  Entropy: {} bits/byte",
        style(format!("{:.3}", profile.entropy())).green()
    );

    let dimensions = [
        ("Language complexity", profile.language_complexity()),
        ("Code structure", profile.code_structure()),
        ("Redundancy", profile.redundancy()),
        ("Semantic density", profile.semantic_density()),
        ("Pattern frequency", profile.pattern_frequency()),
        ("Compression potential", profile.compression_potential()),
        ("Confidence", profile.confidence()),
    ];
    for (label, value) in dimensions {
        println!("  {}: {}", label, style(format!("{:.3}", value)).green());
    }
}

/// Display a decision with its alternatives
pub fn display_decision(decision: &Decision) {
    println!();
    println!("{}", style("Decision:").bold().underlined());
    println!(
        "  Content: {} ({})",
        style(decision.content_class()).cyan(),
        style(decision.signature).dim()
    );
    println!(
        "  Algorithm: {} / {}",
        style(decision.selected_variant.family()).cyan(),
        style(decision.selected_variant).cyan().bold()
    );
    println!(
        "  Predicted score: {}",
        style(format!("{:.3}", decision.predicted_score)).green()
    );
    println!("  Strategy: {}", style(decision.strategy).blue());

    if !decision.parameters.is_empty() {
        println!("  Parameters:");
        for (name, value) in &decision.parameters {
            println!("    {} = {}", name, style(format_parameter(value)).yellow());
        }
    }

    if !decision.alternatives.is_empty() {
        println!("  Alternatives:");
        for alternative in &decision.alternatives {
            println!(
                "    • {} {}",
                style(alternative.variant).cyan(),
                style(format!(
                    "(score {:.3}, confidence {:.3})",
                    alternative.score, alternative.confidence
                ))
                .dim()
            );
        }
    }
}

/// Display the result of a compression run
pub fn display_compression_report(report: &CompressionReport, container_bytes: u64) {
    let outcome = &report.outcome;

    println!();
    println!("{}", style("Compression Statistics:").bold().underlined());
    println!(
        "  Algorithm: {}{}",
        style(report.variant).cyan().bold(),
        if report.fell_back() {
            style(format!(" (fallback from {})", report.decision.selected_variant)).yellow()
        } else {
            style(String::new())
        }
    );
    for (variant, error) in &report.failures {
        println!("    {} {}: {}", style("✗").red(), variant, style(error).dim());
    }
    println!(
        "  Original size: {}",
        style(format_bytes(outcome.original_size)).green()
    );
    println!(
        "  Compressed size: {} ({} with header)",
        style(format_bytes(outcome.compressed_size)).green(),
        format_bytes(container_bytes)
    );

    let savings = (1.0 - outcome.ratio()) * 100.0;
    let savings_style = if savings >= 50.0 {
        style(format!("{:.1}%", savings)).green().bold()
    } else if savings > 0.0 {
        style(format!("{:.1}%", savings)).yellow().bold()
    } else {
        style(format!("{:.1}%", savings)).red().bold()
    };
    println!("  Ratio: {:.3} (saved {})", outcome.ratio(), savings_style);
    println!(
        "  Duration: {}",
        style(format_duration(outcome.elapsed)).blue()
    );
    println!("  Quality: {}", style(format!("{:.3}", outcome.quality())).blue());
}

/// Display the result of a decompression run
pub fn display_decompression(variant: AlgorithmVariant, container: u64, restored: u64, elapsed: Duration) {
    println!();
    println!("{}", style("Decompression Statistics:").bold().underlined());
    println!("  Algorithm: {}", style(variant).cyan().bold());
    println!("  Container size: {}", style(format_bytes(container)).green());
    println!("  Restored size: {}", style(format_bytes(restored)).green());
    println!("  Duration: {}", style(format_duration(elapsed)).blue());
}

/// Format a parameter value for display
pub fn format_parameter(value: &ParameterValue) -> String {
    match value {
        ParameterValue::Int(v) => v.to_string(),
        ParameterValue::Float(v) => format!("{:.4}", v),
        ParameterValue::Choice(v) => v.clone(),
    }
}

/// Format bytes in human-readable format
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    format!("{:.2} {}", size, UNITS[unit_index])
}

/// Format duration in human-readable format
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs < 1 {
        format!("{:.2}ms", duration.as_secs_f64() * 1000.0)
    } else if secs < 60 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

/// Display a success message with proper formatting
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green().bold(), style(message).green());
}

/// Display a warning message with proper formatting
pub fn display_warning(message: &str) {
    println!("{} {}", style("⚠").yellow().bold(), style(message).yellow());
}

/// Create a spinner for codec work
pub fn create_spinner(message: &str, quiet: bool) -> Option<ProgressBar> {
    if quiet {
        return None;
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(spinner_style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    Some(pb)
}
