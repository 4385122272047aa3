//! CLI output formatting for loading, single-image runs and batches.
//!
//! # Output Format
//!
//! ## Load
//!
//! ```text
//! Extracted 3 image(s) from ZIP
//!     001 beach.jpg (2.4 MB)
//!     002 dunes.png (880.0 KB)
//!     003 nested/pier.webp (312.5 KB)
//! ```
//!
//! ## Batch
//!
//! ```text
//! Compressing 3 image(s)
//!     001 beach.jpg → beach.jpg
//!         4032x3024 → 2016x1512, 2.4 MB → 301.2 KB (12.3%)
//!     002 dunes.png
//!         Error processing file: Failed to load image. The file might be corrupted or not a valid image.
//!     003 nested/pier.webp → nested/pier.webp
//!         1200x800 → 600x400, 312.5 KB → 41.0 KB (13.1%)
//!
//! Compressed 2 of 3 image(s); 1 failed
//!     Archive: out/compressed-images.zip (342.2 KB)
//! ```
//!
//! ## Single
//!
//! ```text
//! beach.jpg → compressed-beach.jpg
//!     4032x3024 → 2016x1512, 2.4 MB → 301.2 KB (12.3%)
//! ```
//!
//! # Architecture
//!
//! Each view has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure:
//! no I/O, no side effects.

use crate::batch::{BatchEvent, BatchReport};
use crate::imaging::Dimensions;
use crate::process::ProcessedImage;
use crate::source::LoadedSources;
use std::path::Path;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Human-readable byte count: `B`, `KB`, `MB` or `GB` with one decimal.
pub fn format_size(bytes: usize) -> String {
    const UNITS: [&str; 3] = ["KB", "MB", "GB"];
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}

/// Output size as a percentage of the original, one decimal.
fn format_ratio(original: usize, output: usize) -> String {
    if original == 0 {
        return "n/a".to_string();
    }
    format!("{:.1}%", output as f64 / original as f64 * 100.0)
}

/// `4032x3024 → 2016x1512, 2.4 MB → 301.2 KB (12.3%)`
fn transform_line(
    original_dimensions: Dimensions,
    dimensions: Dimensions,
    original_size: usize,
    output_size: usize,
) -> String {
    format!(
        "{} \u{2192} {}, {} \u{2192} {} ({})",
        original_dimensions,
        dimensions,
        format_size(original_size),
        format_size(output_size),
        format_ratio(original_size, output_size)
    )
}

// ============================================================================
// Loading
// ============================================================================

/// Format the load banner followed by one line per accepted image.
pub fn format_load_status(sources: &LoadedSources) -> Vec<String> {
    let mut lines = vec![sources.status_message()];
    for (i, image) in sources.images.iter().enumerate() {
        lines.push(format!(
            "{}{} {} ({})",
            indent(1),
            format_index(i + 1),
            image.name,
            format_size(image.size())
        ));
    }
    lines
}

pub fn print_load_status(sources: &LoadedSources) {
    for line in format_load_status(sources) {
        println!("{}", line);
    }
}

// ============================================================================
// Batch
// ============================================================================

/// Format a single batch progress event as display lines.
pub fn format_batch_event(event: &BatchEvent) -> Vec<String> {
    match event {
        BatchEvent::Started { total } => vec![format!("Compressing {} image(s)", total)],
        BatchEvent::ImageProcessed {
            index,
            name,
            archive_name,
            original_size,
            output_size,
            original_dimensions,
            dimensions,
        } => vec![
            format!(
                "{}{} {} \u{2192} {}",
                indent(1),
                format_index(*index),
                name,
                archive_name
            ),
            format!(
                "{}{}",
                indent(2),
                transform_line(
                    *original_dimensions,
                    *dimensions,
                    *original_size,
                    *output_size
                )
            ),
        ],
        BatchEvent::ImageFailed {
            index,
            name,
            message,
        } => vec![
            format!("{}{} {}", indent(1), format_index(*index), name),
            format!("{}{}", indent(2), message),
        ],
    }
}

/// Format the closing summary of a batch.
pub fn format_batch_summary(report: &BatchReport, archive_path: &Path, archive_size: usize) -> Vec<String> {
    let mut lines = vec![String::new(), report.status_message()];
    if !report.processed.is_empty() {
        lines.push(format!(
            "{}Archive: {} ({})",
            indent(1),
            archive_path.display(),
            format_size(archive_size)
        ));
    }
    lines
}

pub fn print_batch_summary(report: &BatchReport, archive_path: &Path, archive_size: usize) {
    for line in format_batch_summary(report, archive_path, archive_size) {
        println!("{}", line);
    }
}

// ============================================================================
// Single image
// ============================================================================

/// Format the result of compressing one image to `output_name`.
pub fn format_single_output(name: &str, output_name: &str, result: &ProcessedImage) -> Vec<String> {
    vec![
        format!("{} \u{2192} {}", name, output_name),
        format!(
            "{}{}",
            indent(1),
            transform_line(
                result.original_dimensions,
                result.dimensions,
                result.original_size,
                result.output.len()
            )
        ),
    ]
}

pub fn print_single_output(name: &str, output_name: &str, result: &ProcessedImage) {
    for line in format_single_output(name, output_name, result) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
