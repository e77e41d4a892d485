use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::io::ReadAt;

use super::entry::Entry;

/// What to do when the output file already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overwrite {
    /// Skip the file and suggest `-o`.
    #[default]
    Ask,
    /// Skip the file silently.
    Never,
    /// Replace the file.
    Always,
}

#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    /// Directory the entry names are resolved against.
    pub dest: PathBuf,
    /// Drop the directory part of entry names.
    pub junk_paths: bool,
    pub overwrite: Overwrite,
}

/// Result of extracting a single entry.
#[derive(Debug, PartialEq, Eq)]
pub enum Extracted {
    Directory(PathBuf),
    File { path: PathBuf, bytes: u64 },
    Skipped { path: PathBuf, reason: SkipReason },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Exists,
    ExistsAsk,
    JunkedDirectory,
    /// The name resolves to the destination itself (`""`, `./`).
    EmptyName,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            SkipReason::Exists => "file exists",
            SkipReason::ExistsAsk => "use -o to overwrite",
            SkipReason::JunkedDirectory => "directory, paths junked",
            SkipReason::EmptyName => "empty name",
        })
    }
}

/// Writes scanned entries to the filesystem.
pub struct Extractor {
    options: ExtractOptions,
}

impl Extractor {
    pub fn new(options: ExtractOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Map an entry name to a path under the destination directory.
    ///
    /// Absolute names, drive prefixes and `..` components are rejected.
    /// Returns `None` when nothing is left to create (an empty name, or a
    /// directory with paths junked).
    pub fn output_path(&self, name: &str) -> Result<Option<PathBuf>> {
        if name.starts_with('/') || name.starts_with('\\') {
            return Err(Error::UnsafePath(name.to_string()));
        }

        let mut relative = PathBuf::new();
        for part in name.split(['/', '\\']) {
            match part {
                "" | "." => {}
                ".." => return Err(Error::UnsafePath(name.to_string())),
                _ if part.contains(':') => return Err(Error::UnsafePath(name.to_string())),
                _ => relative.push(part),
            }
        }

        if self.options.junk_paths {
            if name.ends_with('/') || name.ends_with('\\') {
                return Ok(None);
            }
            relative = match relative.file_name() {
                Some(file_name) => PathBuf::from(file_name),
                None => return Ok(None),
            };
        }

        if relative.as_os_str().is_empty() {
            return Ok(None);
        }
        Ok(Some(self.options.dest.join(relative)))
    }

    /// Create the directory or file an entry describes.
    pub fn extract<R: ReadAt + ?Sized + 'static>(&self, entry: &Entry<R>) -> Result<Extracted> {
        let Some(path) = self.output_path(entry.name())? else {
            let reason = if self.options.junk_paths {
                SkipReason::JunkedDirectory
            } else {
                SkipReason::EmptyName
            };
            return Ok(Extracted::Skipped {
                path: PathBuf::from(entry.name()),
                reason,
            });
        };

        if entry.is_directory() {
            if self.options.junk_paths {
                return Ok(Extracted::Skipped {
                    path,
                    reason: SkipReason::JunkedDirectory,
                });
            }
            fs::create_dir_all(&path)?;
            return Ok(Extracted::Directory(path));
        }

        if path.exists() {
            match self.options.overwrite {
                Overwrite::Never => {
                    return Ok(Extracted::Skipped {
                        path,
                        reason: SkipReason::Exists,
                    });
                }
                Overwrite::Ask => {
                    return Ok(Extracted::Skipped {
                        path,
                        reason: SkipReason::ExistsAsk,
                    });
                }
                Overwrite::Always => {}
            }
        }

        if !entry.is_supported() {
            return Err(Error::UnsupportedMethod(entry.header.compression_method));
        }
        let bytes = self.write_file(entry, &path)?;
        Ok(Extracted::File { path, bytes })
    }

    fn write_file<R: ReadAt + ?Sized + 'static>(&self, entry: &Entry<R>, path: &Path) -> Result<u64> {
        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut file = BufWriter::new(File::create(path)?);
        let bytes = entry.write_to(&mut file)?;
        file.flush()?;
        Ok(bytes)
    }
}
