//! In-memory zip assembly for folder downloads.

use std::fmt;
use std::io::{Cursor, Write};

use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Permissions recorded for file entries.
const FILE_PERMISSIONS: u32 = 0o600;

/// Failure while building an archive.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    /// The zip writer rejected an entry or could not finish.
    #[error("Failed to write zip entry {name}: {source}")]
    Zip {
        /// The entry name.
        name: String,
        /// The underlying zip error.
        #[source]
        source: zip::result::ZipError,
    },

    /// Writing entry data failed.
    #[error("Failed to write zip entry {name}: {source}")]
    Io {
        /// The entry name.
        name: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Builds a stored (uncompressed) zip archive in memory.
///
/// Entries keep insertion order. Names ending in `/` become directory
/// entries, and empty names are skipped.
pub struct ArchiveBuilder {
    writer: ZipWriter<Cursor<Vec<u8>>>,
    entries: usize,
}

impl fmt::Debug for ArchiveBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArchiveBuilder")
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}

impl Default for ArchiveBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveBuilder {
    /// Start an empty archive.
    #[must_use]
    pub fn new() -> Self {
        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
            entries: 0,
        }
    }

    /// Number of entries written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
    }

    /// Whether no entries have been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    /// Append an entry.
    ///
    /// # Errors
    ///
    /// Fails when the zip writer rejects the entry.
    pub fn add_entry(&mut self, name: &str, data: &[u8]) -> Result<(), ArchiveError> {
        if name.is_empty() {
            debug!("skipping zip entry with empty name");
            return Ok(());
        }

        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        if name.ends_with('/') {
            self.writer
                .add_directory(name, options)
                .map_err(|source| ArchiveError::Zip {
                    name: name.to_owned(),
                    source,
                })?;
        } else {
            self.writer
                .start_file(name, options.unix_permissions(FILE_PERMISSIONS))
                .map_err(|source| ArchiveError::Zip {
                    name: name.to_owned(),
                    source,
                })?;
            self.writer
                .write_all(data)
                .map_err(|source| ArchiveError::Io {
                    name: name.to_owned(),
                    source,
                })?;
        }
        self.entries += 1;
        Ok(())
    }

    /// Finish the archive and return its bytes.
    ///
    /// # Errors
    ///
    /// Fails when the central directory cannot be written.
    pub fn finish(self) -> Result<Vec<u8>, ArchiveError> {
        let cursor = self.writer.finish().map_err(|source| ArchiveError::Zip {
            name: String::from("<central directory>"),
            source,
        })?;
        Ok(cursor.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use super::*;

    fn read_archive(bytes: Vec<u8>) -> zip::ZipArchive<Cursor<Vec<u8>>> {
        zip::ZipArchive::new(Cursor::new(bytes)).unwrap()
    }

    #[test]
    fn test_should_build_archive_in_insertion_order() {
        let mut builder = ArchiveBuilder::new();
        builder.add_entry("docs/b.txt", b"bee").unwrap();
        builder.add_entry("docs/a.txt", b"ay").unwrap();
        assert_eq!(builder.len(), 2);

        let mut archive = read_archive(builder.finish().unwrap());
        assert_eq!(archive.len(), 2);
        let names: Vec<_> = archive.file_names().map(str::to_owned).collect();
        assert!(names.contains(&"docs/a.txt".to_owned()));

        let mut first = archive.by_index(0).unwrap();
        assert_eq!(first.name(), "docs/b.txt");
        assert_eq!(first.compression(), CompressionMethod::Stored);
        let mut content = String::new();
        first.read_to_string(&mut content).unwrap();
        assert_eq!(content, "bee");
    }

    #[test]
    fn test_should_write_directory_entries() {
        let mut builder = ArchiveBuilder::new();
        builder.add_entry("docs/", b" ").unwrap();
        let mut archive = read_archive(builder.finish().unwrap());
        let entry = archive.by_index(0).unwrap();
        assert!(entry.is_dir());
        assert_eq!(entry.name(), "docs/");
        assert_eq!(entry.size(), 0);
    }

    #[test]
    fn test_should_skip_empty_names() {
        let mut builder = ArchiveBuilder::new();
        builder.add_entry("", b"x").unwrap();
        assert!(builder.is_empty());
        let archive = read_archive(builder.finish().unwrap());
        assert_eq!(archive.len(), 0);
    }
}
