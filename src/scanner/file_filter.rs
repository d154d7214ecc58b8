use crate::config::InputConfig;
use log::warn;
use regex::Regex;
use std::path::Path;

pub struct FileFilter {
    extensions: Vec<String>,
    max_file_size: u64,
    exclude_dirs: Vec<String>,
    exclude_patterns: Vec<Regex>,
}

impl FileFilter {
    pub fn new(config: &InputConfig) -> Self {
        let exclude_patterns = config
            .exclude_patterns
            .iter()
            .filter_map(|pattern| match Regex::new(pattern) {
                Ok(regex) => Some(regex),
                Err(e) => {
                    warn!("ignoring invalid exclude pattern {:?}: {}", pattern, e);
                    None
                }
            })
            .collect();

        Self {
            extensions: config.extensions.iter().map(|e| e.to_lowercase()).collect(),
            max_file_size: config.max_file_size,
            exclude_dirs: config.exclude_dirs.clone(),
            exclude_patterns,
        }
    }

    /// Whether a file found while walking a directory should be analysed.
    pub fn is_document_file(&self, path: &Path) -> bool {
        let Some(filename) = path.file_name().map(|s| s.to_string_lossy()) else {
            return false;
        };

        // Word keeps "~$name.docx" owner files next to open documents.
        if filename.starts_with("~$") || filename.starts_with('.') {
            return false;
        }

        if self.matches_any_pattern(&filename) {
            return false;
        }

        self.has_supported_extension(path)
    }

    pub fn has_supported_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|s| s.to_str())
            .map(|ext| self.extensions.contains(&ext.to_lowercase()))
            .unwrap_or(false)
    }

    pub fn should_traverse_directory(&self, path: &Path) -> bool {
        if let Some(dir_name) = path.file_name().and_then(|s| s.to_str()) {
            let dir_name_lower = dir_name.to_lowercase();

            if self
                .exclude_dirs
                .iter()
                .any(|exclude| exclude.to_lowercase() == dir_name_lower)
            {
                return false;
            }

            if self.matches_any_pattern(&path.to_string_lossy()) {
                return false;
            }

            // Hidden directories
            if dir_name.starts_with('.') && dir_name != "." && dir_name != ".." {
                return false;
            }
        }

        true
    }

    pub fn is_size_allowed(&self, size: u64) -> bool {
        size <= self.max_file_size
    }

    pub fn matches_any_pattern(&self, text: &str) -> bool {
        self.exclude_patterns
            .iter()
            .any(|pattern| pattern.is_match(text))
    }

    pub fn get_max_file_size(&self) -> u64 {
        self.max_file_size
    }
}

impl Default for FileFilter {
    fn default() -> Self {
        Self::new(&InputConfig::default())
    }
}
