//! Image ingestion from directories, loose files and ZIP archives.
//!
//! Every source is reduced to a list of [`SourceImage`]s: a display name plus
//! the raw encoded bytes. Only names ending in one of the supported input
//! extensions (`.jpg`, `.jpeg`, `.png`, `.webp`, `.gif`, case-insensitive) are
//! kept; anything else is skipped silently, as are directory entries inside
//! archives.
//!
//! ## Naming
//!
//! | Origin | Name |
//! |---|---|
//! | Directory | path relative to the directory, `/`-separated |
//! | File | file name |
//! | ZIP entry | entry path as stored in the archive |
//!
//! Names are what the batch archive is keyed by, so they are kept verbatim.

use crate::imaging::{OutputFormat, supported_input_extensions};
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Archive read failed: {0}")]
    ArchiveReadFailed(String),
    #[error("Input not found: {0}")]
    NotFound(PathBuf),
}

impl SourceError {
    /// Banner text shown when ingestion fails.
    pub fn status_message(&self) -> String {
        match self {
            Self::ArchiveReadFailed(_) => "Error processing ZIP file. Please try again.".into(),
            Self::Io(_) => "Error reading directory contents. Please try again.".into(),
            Self::NotFound(path) => format!("Input not found: {}", path.display()),
        }
    }
}

/// One input image: its name and undecoded bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl SourceImage {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the name carries a supported image extension.
    pub fn is_supported(&self) -> bool {
        is_supported_name(&self.name)
    }

    /// Name for the processed output.
    ///
    /// With `rename_to`, the extension is swapped for the output format's;
    /// otherwise the original name is kept as-is.
    pub fn output_name(&self, rename_to: Option<OutputFormat>) -> String {
        match rename_to {
            None => self.name.clone(),
            Some(format) => {
                let stem = match self.name.rfind('.') {
                    Some(dot) if dot > 0 && !self.name[dot..].contains('/') => &self.name[..dot],
                    _ => self.name.as_str(),
                };
                format!("{stem}.{}", format.extension())
            }
        }
    }
}

/// Where a set of images came from. Picks the load status wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceOrigin {
    Directory,
    Files,
    Archive,
}

/// Images gathered from one or more inputs.
#[derive(Debug, Clone)]
pub struct LoadedSources {
    pub origin: SourceOrigin,
    pub images: Vec<SourceImage>,
}

impl LoadedSources {
    /// `Loaded N image(s)` style banner for this load.
    pub fn status_message(&self) -> String {
        let n = self.images.len();
        match (self.origin, n) {
            (SourceOrigin::Directory, 0) => "No image files found in selected directory".into(),
            (SourceOrigin::Archive, 0) => "No valid image files found in ZIP".into(),
            (SourceOrigin::Files, 0) => "No valid image files found".into(),
            (SourceOrigin::Archive, n) => format!("Extracted {n} image(s) from ZIP"),
            (_, n) => format!("Loaded {n} image(s)"),
        }
    }
}

/// Case-insensitive check of `name`'s extension against the supported inputs.
pub fn is_supported_name(name: &str) -> bool {
    let Some(dot) = name.rfind('.') else {
        return false;
    };
    let ext = name[dot + 1..].to_ascii_lowercase();
    supported_input_extensions().contains(&ext.as_str())
}

fn is_zip_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("zip"))
}

/// Read every supported image in `dir`, sorted by name.
///
/// Only the top level is read unless `recursive` is set.
pub fn from_directory(dir: &Path, recursive: bool) -> Result<Vec<SourceImage>, SourceError> {
    if !dir.is_dir() {
        return Err(SourceError::NotFound(dir.to_path_buf()));
    }
    let max_depth = if recursive { usize::MAX } else { 1 };

    let mut images = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(max_depth)
        .sort_by_file_name()
    {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry.path().strip_prefix(dir).unwrap_or(entry.path());
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        if !is_supported_name(&name) {
            tracing::debug!(%name, "skipping unsupported file");
            continue;
        }
        images.push(SourceImage::new(name, std::fs::read(entry.path())?));
    }
    Ok(images)
}

/// Read explicitly listed image files, skipping unsupported extensions.
pub fn from_files(paths: &[PathBuf]) -> Result<Vec<SourceImage>, SourceError> {
    let mut images = Vec::new();
    for path in paths {
        if !path.is_file() {
            return Err(SourceError::NotFound(path.clone()));
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if !is_supported_name(&name) {
            tracing::debug!(%name, "skipping unsupported file");
            continue;
        }
        images.push(SourceImage::new(name, std::fs::read(path)?));
    }
    Ok(images)
}

/// Largest single archive entry accepted, uncompressed.
pub const MAX_ENTRY_BYTES: u64 = 256 << 20;

/// Extract every supported image from an in-memory ZIP archive, in archive order.
///
/// Entries larger than [`MAX_ENTRY_BYTES`] fail the whole archive.
pub fn from_zip_bytes(bytes: &[u8]) -> Result<Vec<SourceImage>, SourceError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| SourceError::ArchiveReadFailed(e.to_string()))?;

    let mut images = Vec::new();
    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| SourceError::ArchiveReadFailed(e.to_string()))?;
        if entry.is_dir() {
            continue;
        }
        let name = entry.name().to_string();
        if !is_supported_name(&name) {
            tracing::debug!(%name, "skipping unsupported archive entry");
            continue;
        }
        // Declared sizes come from the archive and may lie.
        if entry.size() > MAX_ENTRY_BYTES {
            return Err(SourceError::ArchiveReadFailed(format!(
                "{name}: declared size {} exceeds {MAX_ENTRY_BYTES} bytes",
                entry.size()
            )));
        }
        let mut data = Vec::new();
        (&mut entry)
            .take(MAX_ENTRY_BYTES + 1)
            .read_to_end(&mut data)
            .map_err(|e| SourceError::ArchiveReadFailed(format!("{name}: {e}")))?;
        if data.len() as u64 > MAX_ENTRY_BYTES {
            return Err(SourceError::ArchiveReadFailed(format!(
                "{name}: entry exceeds {MAX_ENTRY_BYTES} bytes"
            )));
        }
        images.push(SourceImage::new(name, data));
    }
    Ok(images)
}

/// Read a ZIP archive from disk and extract its images.
pub fn from_zip_file(path: &Path) -> Result<Vec<SourceImage>, SourceError> {
    if !path.is_file() {
        return Err(SourceError::NotFound(path.to_path_buf()));
    }
    from_zip_bytes(&std::fs::read(path)?)
}

/// Gather images from a mix of directories, image files and `.zip` archives.
///
/// Inputs are read in the order given. The [`SourceOrigin`] is `Archive` or
/// `Directory` only when every input is of that kind.
pub fn collect_sources(inputs: &[PathBuf], recursive: bool) -> Result<LoadedSources, SourceError> {
    let mut images = Vec::new();
    let mut kinds = Vec::with_capacity(inputs.len());

    for input in inputs {
        if input.is_dir() {
            kinds.push(SourceOrigin::Directory);
            images.extend(from_directory(input, recursive)?);
        } else if is_zip_path(input) {
            kinds.push(SourceOrigin::Archive);
            images.extend(from_zip_file(input)?);
        } else {
            kinds.push(SourceOrigin::Files);
            images.extend(from_files(std::slice::from_ref(input))?);
        }
    }

    let origin = match kinds.first() {
        Some(&first) if kinds.iter().all(|k| *k == first) => first,
        _ => SourceOrigin::Files,
    };
    tracing::info!(count = images.len(), ?origin, "collected sources");
    Ok(LoadedSources { origin, images })
}
