//! Batch runner: every image through the pipeline, one archive out.
//!
//! Images are processed strictly one after another. A failing image is
//! recorded in the [`BatchReport`] and reported as an event, then the run
//! moves on; only a failure to write the archive itself aborts the batch.
//!
//! Progress is streamed as [`BatchEvent`]s over an optional `mpsc` channel so
//! a front end can print while the batch runs.

use crate::archive::{ArchiveBuilder, ArchiveError};
use crate::imaging::{Dimensions, ImageBackend, OutputFormat, RustBackend, TransformOptions};
use crate::process::{ProcessError, process_with_backend};
use crate::source::SourceImage;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::sync::mpsc::Sender;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),
}

/// Batch-level settings that do not affect pixels.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchOptions {
    /// Swap each entry's extension for the output format's.
    pub rename_extensions: bool,
}

/// Progress events emitted while a batch runs.
#[derive(Debug, Clone)]
pub enum BatchEvent {
    Started {
        total: usize,
    },
    ImageProcessed {
        /// 1-based position in the batch.
        index: usize,
        name: String,
        archive_name: String,
        original_size: usize,
        output_size: usize,
        original_dimensions: Dimensions,
        dimensions: Dimensions,
    },
    ImageFailed {
        index: usize,
        name: String,
        message: String,
    },
}

/// One successfully archived image.
#[derive(Debug, Clone, Serialize)]
pub struct ReportEntry {
    pub name: String,
    pub archive_name: String,
    pub original_size: usize,
    pub output_size: usize,
    pub original_dimensions: Dimensions,
    pub dimensions: Dimensions,
    pub sha256: String,
}

/// One image that could not be processed.
#[derive(Debug, Clone, Serialize)]
pub struct ReportFailure {
    pub name: String,
    pub error: String,
    pub message: String,
}

/// Machine-readable summary of a batch, written as JSON on request.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub format: OutputFormat,
    pub quality: f32,
    pub scale_percent: u32,
    pub processed: Vec<ReportEntry>,
    pub failed: Vec<ReportFailure>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.processed.len() + self.failed.len()
    }

    pub fn status_message(&self) -> String {
        if self.total() == 0 {
            "No valid image files found".to_string()
        } else if self.failed.is_empty() {
            "All images compressed successfully".to_string()
        } else {
            format!(
                "Compressed {} of {} image(s); {} failed",
                self.processed.len(),
                self.total(),
                self.failed.len()
            )
        }
    }
}

/// A finished batch: archive bytes plus the report describing them.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub archive: Vec<u8>,
    pub report: BatchReport,
}

/// Run a batch with the default [`RustBackend`].
pub fn run_batch(
    images: &[SourceImage],
    options: &TransformOptions,
    batch: &BatchOptions,
    events: Option<Sender<BatchEvent>>,
) -> Result<BatchOutcome, BatchError> {
    run_batch_with_backend(&RustBackend::new(), images, options, batch, events)
}

/// Run a batch using a specific backend (allows testing with mock).
pub fn run_batch_with_backend(
    backend: &impl ImageBackend,
    images: &[SourceImage],
    options: &TransformOptions,
    batch: &BatchOptions,
    events: Option<Sender<BatchEvent>>,
) -> Result<BatchOutcome, BatchError> {
    let emit = |event: BatchEvent| {
        if let Some(tx) = &events {
            // Receiver gone means nobody is listening; keep working.
            let _ = tx.send(event);
        }
    };
    let rename_to = batch.rename_extensions.then_some(options.format);

    emit(BatchEvent::Started {
        total: images.len(),
    });

    let mut archive = ArchiveBuilder::new();
    let mut processed = Vec::new();
    let mut failed = Vec::new();

    for (i, source) in images.iter().enumerate() {
        let index = i + 1;
        match process_with_backend(backend, source, options) {
            Ok(result) => {
                let archive_name =
                    archive.add(&source.output_name(rename_to), &result.output.bytes)?;
                emit(BatchEvent::ImageProcessed {
                    index,
                    name: source.name.clone(),
                    archive_name: archive_name.clone(),
                    original_size: result.original_size,
                    output_size: result.output.len(),
                    original_dimensions: result.original_dimensions,
                    dimensions: result.dimensions,
                });
                processed.push(ReportEntry {
                    name: source.name.clone(),
                    archive_name,
                    original_size: result.original_size,
                    output_size: result.output.len(),
                    original_dimensions: result.original_dimensions,
                    dimensions: result.dimensions,
                    sha256: format!("{:x}", Sha256::digest(&result.output.bytes)),
                });
            }
            Err(err) => {
                warn!(name = %source.name, error = %err, "image failed");
                let message = err.status_message();
                emit(BatchEvent::ImageFailed {
                    index,
                    name: source.name.clone(),
                    message: message.clone(),
                });
                failed.push(failure_entry(&source.name, &err, message));
            }
        }
    }

    let archive = archive.finish()?;
    info!(
        processed = processed.len(),
        failed = failed.len(),
        archive_bytes = archive.len(),
        "batch finished"
    );

    Ok(BatchOutcome {
        archive,
        report: BatchReport {
            format: options.format,
            quality: options.quality.value(),
            scale_percent: options.scale.value(),
            processed,
            failed,
        },
    })
}

fn failure_entry(name: &str, err: &ProcessError, message: String) -> ReportFailure {
    ReportFailure {
        name: name.to_string(),
        error: err.to_string(),
        message,
    }
}
