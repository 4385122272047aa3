//! # imgpress
//!
//! A batch image editor. Load a set of images from a directory, a list of
//! files or a ZIP archive, push each one through the same transform pipeline,
//! and collect the results in a single ZIP.
//!
//! # Architecture: One Pipeline, Many Images
//!
//! Every image goes through the same fixed sequence of stages:
//!
//! ```text
//! decode → resize → crop → filter → watermark → copyright → encode
//! ```
//!
//! The options for a run are captured once in an immutable
//! [`TransformOptions`](imaging::TransformOptions) and applied identically to
//! every image. The batch runner walks the images strictly in order; an image
//! that fails is recorded and skipped, so one corrupt file never costs the
//! rest of the batch.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`source`] | Gathers input images from directories, files and ZIP archives |
//! | [`imaging`] | Pure-Rust raster stages and the encode/decode backend |
//! | [`process`] | One image through the full pipeline |
//! | [`batch`] | Sequential batch runner, progress events and JSON report |
//! | [`archive`] | In-memory ZIP writer with collision-safe entry names |
//! | [`config`] | `imgpress.toml` loading, layering and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Resize Before Crop
//!
//! Crop coordinates are interpreted in pixels of the *resized* image. Scaling
//! first means the user picks a crop against the image they will actually get,
//! and the crop window never has to be rescaled.
//!
//! ## Deterministic Output
//!
//! Text is drawn with an embedded 8x8 bitmap font and every stage is pure, so
//! the same source and options always produce the same bytes. The batch
//! report records a SHA-256 of each output, which makes regressions easy to
//! spot.
//!
//! ## Pure-Rust Imaging
//!
//! Decoding, resampling and encoding all go through the `image` crate. There
//! are no system libraries to install; the binary is self-contained.

pub mod archive;
pub mod batch;
pub mod config;
pub mod imaging;
pub mod output;
pub mod process;
pub mod source;

#[cfg(test)]
pub(crate) mod test_helpers;
