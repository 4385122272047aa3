//! In-memory ZIP writer for batch output.
//!
//! Entries are deflated and written in insertion order. Each entry is keyed
//! by the caller's name; when a name repeats, later entries get a numeric
//! suffix before the extension (`photo.png`, `photo-2.png`, `photo-3.png`) so
//! no output is silently overwritten.

use std::collections::HashSet;
use std::io::{Cursor, Write};
use thiserror::Error;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Default download name for a finished batch.
pub const DEFAULT_ARCHIVE_NAME: &str = "compressed-images.zip";

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub struct ArchiveBuilder {
    zip: ZipWriter<Cursor<Vec<u8>>>,
    options: SimpleFileOptions,
    names: HashSet<String>,
}

impl ArchiveBuilder {
    pub fn new() -> Self {
        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
            options: SimpleFileOptions::default()
                .compression_method(zip::CompressionMethod::Deflated),
            names: HashSet::new(),
        }
    }

    /// Add one file. Returns the name it was stored under.
    pub fn add(&mut self, name: &str, bytes: &[u8]) -> Result<String, ArchiveError> {
        let stored = self.unique_name(name);
        self.zip.start_file(stored.as_str(), self.options)?;
        self.zip.write_all(bytes)?;
        Ok(stored)
    }

    /// Finalize the central directory and return the archive bytes.
    pub fn finish(self) -> Result<Vec<u8>, ArchiveError> {
        Ok(self.zip.finish()?.into_inner())
    }

    fn unique_name(&mut self, name: &str) -> String {
        if self.names.insert(name.to_string()) {
            return name.to_string();
        }
        let (stem, ext) = split_extension(name);
        let mut n = 2;
        loop {
            let candidate = format!("{stem}-{n}{ext}");
            if self.names.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}

impl Default for ArchiveBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Split `name` into `(stem, ".ext")`; the extension is empty when there is none.
fn split_extension(name: &str) -> (&str, &str) {
    let file_start = name.rfind('/').map_or(0, |i| i + 1);
    match name[file_start..].rfind('.') {
        Some(dot) if dot > 0 => name.split_at(file_start + dot),
        _ => (name, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::zip_names;
    use std::io::Read;

    #[test]
    fn entries_round_trip_through_zip_reader() {
        let mut builder = ArchiveBuilder::new();
        builder.add("a.png", b"alpha").unwrap();
        builder.add("dir/b.webp", b"bravo").unwrap();
        let bytes = builder.finish().unwrap();
        assert_eq!(zip_names(&bytes), vec!["a.png", "dir/b.webp"]);

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut content = String::new();
        archive
            .by_name("dir/b.webp")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "bravo");
    }

    #[test]
    fn duplicate_names_get_numeric_suffix() {
        let mut builder = ArchiveBuilder::new();
        assert_eq!(builder.add("photo.png", b"1").unwrap(), "photo.png");
        assert_eq!(builder.add("photo.png", b"2").unwrap(), "photo-2.png");
        assert_eq!(builder.add("photo.png", b"3").unwrap(), "photo-3.png");
        assert_eq!(builder.add("README", b"4").unwrap(), "README");
        assert_eq!(builder.add("README", b"5").unwrap(), "README-2");

        let names = zip_names(&builder.finish().unwrap());
        assert_eq!(
            names,
            vec!["photo.png", "photo-2.png", "photo-3.png", "README", "README-2"]
        );
    }

    #[test]
    fn empty_archive_is_still_valid() {
        let builder = ArchiveBuilder::new();
        let bytes = builder.finish().unwrap();
        assert_eq!(zip::ZipArchive::new(Cursor::new(bytes)).unwrap().len(), 0);
    }

    #[test]
    fn split_extension_ignores_dots_in_directories() {
        assert_eq!(split_extension("a.b/c"), ("a.b/c", ""));
        assert_eq!(split_extension("a.b/c.jpg"), ("a.b/c", ".jpg"));
        assert_eq!(split_extension(".hidden"), (".hidden", ""));
    }
}
