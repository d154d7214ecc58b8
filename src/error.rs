use thiserror::Error;

#[derive(Error, Debug)]
pub enum PunctalyzerError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to extract text from {filename}: {source}")]
    Extraction {
        filename: String,
        #[source]
        source: ExtractionError,
    },

    #[error("Unsupported document format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("Unknown punctuation category: {key}")]
    UnknownCategory { key: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Path validation failed: {path}")]
    InvalidPath { path: String },

    #[error("Output file already exists: {path}")]
    OutputExists { path: String },

    #[error("Permission denied: {path}")]
    Permission { path: String },

    #[error("CSV error: {message}")]
    Csv { message: String },

    #[error("Chart rendering failed: {message}")]
    Chart { message: String },

    #[error("No usable chart font found")]
    FontUnavailable { searched: Vec<String> },

    #[error("Image encoding failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("Operation was cancelled by user")]
    Cancelled,
}

/// Why the text of one document could not be extracted.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("cannot read file: {0}")]
    Read(#[from] std::io::Error),

    #[error("not a valid .docx archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("missing {part}")]
    MissingPart { part: String },

    #[error("cannot read {part}: {source}")]
    Part {
        part: String,
        source: std::io::Error,
    },

    #[error("invalid document: {message}")]
    Invalid { message: String },

    #[error("no extractor for '.{extension}' documents")]
    NoExtractor { extension: String },
}

pub type ExtractionResult<T> = std::result::Result<T, ExtractionError>;

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for PunctalyzerError {
    fn user_message(&self) -> String {
        match self {
            PunctalyzerError::Extraction { filename, source } => {
                format!("Could not read {}: {}", filename, source)
            }
            PunctalyzerError::UnsupportedFormat { extension } => {
                format!("Documents of type '{}' are not supported", extension)
            }
            PunctalyzerError::UnknownCategory { key } => {
                format!("Unknown punctuation category: {}", key)
            }
            PunctalyzerError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            PunctalyzerError::InvalidPath { path } => {
                format!("Invalid input path: {}", path)
            }
            PunctalyzerError::OutputExists { path } => {
                format!("Output file already exists: {}", path)
            }
            PunctalyzerError::Permission { path } => {
                format!("Permission denied accessing: {}", path)
            }
            PunctalyzerError::Csv { message } => {
                format!("CSV export failed: {}", message)
            }
            PunctalyzerError::Chart { message } => {
                format!("Could not draw the chart: {}", message)
            }
            PunctalyzerError::FontUnavailable { searched } => {
                if searched.is_empty() {
                    "No font available for chart text".to_string()
                } else {
                    format!(
                        "No font available for chart text (searched: {})",
                        searched.join(", ")
                    )
                }
            }
            PunctalyzerError::Cancelled => "Operation was cancelled by user".to_string(),
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            PunctalyzerError::Extraction { .. } => Some(
                "Check that the file is a valid .docx document (not .doc or a renamed file) and that it opens in a word processor.".to_string()
            ),
            PunctalyzerError::UnsupportedFormat { .. } => Some(
                "Only .docx documents can be analysed. Save other formats as .docx first.".to_string()
            ),
            PunctalyzerError::UnknownCategory { .. } => Some(
                "Run with --list-categories to see the valid category keys.".to_string()
            ),
            PunctalyzerError::Config { .. } => Some(
                "Check your configuration file syntax, or regenerate one with --generate-config.".to_string()
            ),
            PunctalyzerError::InvalidPath { .. } => Some(
                "Make sure every input is an existing .docx file or a directory containing them.".to_string()
            ),
            PunctalyzerError::OutputExists { .. } => Some(
                "Remove the existing file, choose a different directory with --output, or use --force to overwrite.".to_string()
            ),
            PunctalyzerError::Permission { .. } => Some(
                "Ensure you have the necessary read/write permissions for the target directory.".to_string()
            ),
            PunctalyzerError::FontUnavailable { .. } => Some(
                "Point --font (or chart.font_path in the config) at a TrueType font file, or use --no-chart.".to_string()
            ),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for PunctalyzerError {
    fn from(error: toml::de::Error) -> Self {
        PunctalyzerError::Config {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for PunctalyzerError {
    fn from(error: csv::Error) -> Self {
        PunctalyzerError::Csv {
            message: error.to_string(),
        }
    }
}

impl From<serde_json::Error> for PunctalyzerError {
    fn from(error: serde_json::Error) -> Self {
        PunctalyzerError::Config {
            message: format!("Failed to serialize report to JSON: {}", error),
        }
    }
}

pub type Result<T> = std::result::Result<T, PunctalyzerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_friendly_messages() {
        let error = PunctalyzerError::UnknownCategory {
            key: "tildes".to_string(),
        };
        assert!(error.user_message().contains("tildes"));
        assert!(error.suggestion().unwrap().contains("--list-categories"));
    }

    #[test]
    fn test_font_message_lists_search_paths() {
        let error = PunctalyzerError::FontUnavailable {
            searched: vec!["/a.ttf".to_string(), "/b.ttf".to_string()],
        };
        assert!(error.user_message().contains("/a.ttf, /b.ttf"));

        let bare = PunctalyzerError::FontUnavailable { searched: vec![] };
        assert_eq!(bare.user_message(), "No font available for chart text");
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_error = toml::from_str::<toml::Value>("not = [valid").unwrap_err();
        let error = PunctalyzerError::from(toml_error);
        assert!(matches!(error, PunctalyzerError::Config { .. }));
    }

    #[test]
    fn test_extraction_error_keeps_its_source() {
        let error = PunctalyzerError::Extraction {
            filename: "draft.docx".to_string(),
            source: ExtractionError::MissingPart {
                part: "word/document.xml".to_string(),
            },
        };
        assert_eq!(
            error.user_message(),
            "Could not read draft.docx: missing word/document.xml"
        );
        assert!(error.suggestion().unwrap().contains(".docx"));
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn test_cancelled_has_no_suggestion() {
        assert!(PunctalyzerError::Cancelled.suggestion().is_none());
    }
}
