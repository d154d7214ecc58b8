use crate::config::InputConfig;
use crate::error::{PunctalyzerError, Result};
use crate::scanner::file_filter::FileFilter;
use log::{debug, warn};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentFile {
    pub source_path: PathBuf,
    pub filename: String,
    pub extension: String,
    pub size: u64,
}

impl DocumentFile {
    pub fn new(source_path: PathBuf, size: u64) -> Self {
        // Non-UTF-8 names are rendered lossily.
        let filename = source_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let extension = source_path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        Self {
            source_path,
            filename,
            extension,
            size,
        }
    }

    pub fn display_path(&self) -> String {
        self.source_path.display().to_string()
    }

    pub fn format_size(&self) -> String {
        format_bytes(self.size)
    }
}

/// Turns command-line inputs into the ordered list of documents to analyse.
///
/// Files are kept in the order given. Each directory expands in place to the
/// supported documents below it, sorted by relative path.
pub struct DocumentScanner {
    filter: FileFilter,
    max_depth: usize,
}

impl DocumentScanner {
    pub fn new(config: &InputConfig) -> Self {
        Self {
            filter: FileFilter::new(config),
            max_depth: config.max_depth,
        }
    }

    pub fn collect<P: AsRef<Path>>(&self, inputs: &[P]) -> Result<Vec<DocumentFile>> {
        let mut documents = Vec::new();

        for input in inputs {
            let path = input.as_ref();

            if !path.exists() {
                return Err(PunctalyzerError::InvalidPath {
                    path: format!("{} does not exist", path.display()),
                });
            }

            if path.is_dir() {
                let found = self.scan_directory(path)?;
                debug!("{}: {} documents", path.display(), found.len());
                documents.extend(found);
            } else {
                documents.push(self.explicit_file(path)?);
            }
        }

        Ok(documents)
    }

    fn explicit_file(&self, path: &Path) -> Result<DocumentFile> {
        if !self.filter.has_supported_extension(path) {
            return Err(PunctalyzerError::UnsupportedFormat {
                extension: path
                    .extension()
                    .and_then(|e| e.to_str())
                    .map(|e| format!(".{}", e))
                    .unwrap_or_else(|| path.display().to_string()),
            });
        }

        let metadata = std::fs::metadata(path).map_err(|e| PunctalyzerError::Permission {
            path: format!("{}: {}", path.display(), e),
        })?;

        Ok(DocumentFile::new(path.to_path_buf(), metadata.len()))
    }

    pub fn scan_directory<P: AsRef<Path>>(&self, root: P) -> Result<Vec<DocumentFile>> {
        let root_path = root.as_ref();

        if !root_path.is_dir() {
            return Err(PunctalyzerError::InvalidPath {
                path: format!("{} is not a directory", root_path.display()),
            });
        }

        let mut documents = Vec::new();

        let walker = WalkDir::new(root_path)
            .max_depth(self.max_depth)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| self.should_traverse(e));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!("skipping unreadable entry: {}", err);
                    continue;
                }
            };

            if !entry.file_type().is_file() || !self.filter.is_document_file(entry.path()) {
                continue;
            }

            let size = match entry.metadata() {
                Ok(metadata) => metadata.len(),
                Err(err) => {
                    warn!("cannot stat {}: {}", entry.path().display(), err);
                    continue;
                }
            };

            if !self.filter.is_size_allowed(size) {
                warn!(
                    "skipping {} ({} exceeds the {} limit)",
                    entry.path().display(),
                    format_bytes(size),
                    format_bytes(self.filter.get_max_file_size())
                );
                continue;
            }

            documents.push(DocumentFile::new(entry.path().to_path_buf(), size));
        }

        // Sort by relative path for consistent output
        documents.sort_by(|a, b| {
            let a = a.source_path.strip_prefix(root_path).unwrap_or(&a.source_path);
            let b = b.source_path.strip_prefix(root_path).unwrap_or(&b.source_path);
            a.cmp(b)
        });

        Ok(documents)
    }

    fn should_traverse(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 || entry.file_type().is_file() {
            return true;
        }

        if entry.file_type().is_dir() {
            return self.filter.should_traverse_directory(entry.path());
        }

        true
    }

    pub fn get_statistics(&self, documents: &[DocumentFile]) -> ScanStatistics {
        let total_size = documents.iter().map(|d| d.size).sum();

        let (largest_file_size, largest_file_path) = documents
            .iter()
            .max_by_key(|d| d.size)
            .map(|d| (d.size, d.source_path.clone()))
            .unwrap_or((0, PathBuf::new()));

        ScanStatistics {
            total_files: documents.len(),
            total_size,
            largest_file_size,
            largest_file_path,
        }
    }
}

#[derive(Debug, Default)]
pub struct ScanStatistics {
    pub total_files: usize,
    pub total_size: u64,
    pub largest_file_size: u64,
    pub largest_file_path: PathBuf,
}

impl ScanStatistics {
    pub fn display_summary(&self) -> String {
        let mut summary = format!(
            "Scan Results:\n  Total documents: {}\n  Total size: {}\n",
            self.total_files,
            format_bytes(self.total_size)
        );

        if self.largest_file_size > 0 {
            summary.push_str(&format!(
                "  Largest document: {} ({})\n",
                self.largest_file_path.display(),
                format_bytes(self.largest_file_size)
            ));
        }

        summary
    }
}

pub(crate) fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}
