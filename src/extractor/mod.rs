pub mod docx;
pub mod xml;

pub use docx::DocxExtractor;

use crate::error::ExtractionResult;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref PERIOD_RUN: Regex =
        Regex::new(r"(\s?\.\s?){2,}").expect("period run pattern is valid");
}

const ELLIPSIS: &str = "...";

/// Source of text blocks for one document format.
pub trait TextExtractor {
    fn name(&self) -> &'static str;

    /// Lower-case file extensions this extractor reads.
    fn extensions(&self) -> &'static [&'static str];

    /// Ordered text blocks of the document.
    fn extract_blocks(&self, data: &[u8]) -> ExtractionResult<Vec<String>>;

    fn supports(&self, extension: &str) -> bool {
        let extension = extension.to_lowercase();
        self.extensions().iter().any(|e| *e == extension)
    }
}

/// Available extractors, looked up by file extension.
pub struct ExtractorRegistry {
    extractors: Vec<Box<dyn TextExtractor>>,
}

impl ExtractorRegistry {
    pub fn new() -> Self {
        Self {
            extractors: vec![Box::new(DocxExtractor::new())],
        }
    }

    pub fn empty() -> Self {
        Self {
            extractors: Vec::new(),
        }
    }

    pub fn with_extractor(mut self, extractor: Box<dyn TextExtractor>) -> Self {
        self.extractors.push(extractor);
        self
    }

    pub fn for_extension(&self, extension: &str) -> Option<&dyn TextExtractor> {
        self.extractors
            .iter()
            .find(|e| e.supports(extension))
            .map(|e| e.as_ref())
    }

    pub fn supported_extensions(&self) -> Vec<String> {
        self.extractors
            .iter()
            .flat_map(|e| e.extensions().iter().map(|s| s.to_string()))
            .collect()
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Join blocks, each followed by one space, then normalize ellipses.
pub fn assemble_text<S: AsRef<str>>(blocks: &[S]) -> String {
    let mut content = String::new();
    for block in blocks {
        content.push_str(block.as_ref());
        content.push(' ');
    }
    normalize_ellipses(&content)
}

/// Collapse runs of two or more periods, each optionally padded by a single
/// whitespace character, into `...`.
pub fn normalize_ellipses(content: &str) -> String {
    PERIOD_RUN.replace_all(content, ELLIPSIS).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtractionError;

    #[test]
    fn test_spaced_periods_become_ellipsis() {
        assert_eq!(normalize_ellipses("Wait. . . what"), "Wait...what");
        assert_eq!(normalize_ellipses("Wait.. what"), "Wait...what");
        assert_eq!(normalize_ellipses("Wait..... what"), "Wait...what");
    }

    #[test]
    fn test_single_period_untouched() {
        assert_eq!(normalize_ellipses("One. Two."), "One. Two.");
    }

    #[test]
    fn test_assemble_adds_trailing_space_per_block() {
        assert_eq!(assemble_text(&["a", "b", ""]), "a b  ");
        assert_eq!(assemble_text::<&str>(&[]), "");
    }

    #[test]
    fn test_assemble_normalizes_across_blocks() {
        // "end." + " " + "." + " " collapses into one ellipsis.
        assert_eq!(assemble_text(&["end.", "."]), "end...");
    }

    #[test]
    fn test_registry_lookup() {
        let registry = ExtractorRegistry::new();
        assert!(registry.for_extension("docx").is_some());
        assert!(registry.for_extension("DOCX").is_some());
        assert!(registry.for_extension("doc").is_none());
        assert_eq!(registry.supported_extensions(), vec!["docx"]);
        assert!(ExtractorRegistry::empty().for_extension("docx").is_none());
    }

    struct LinesExtractor;

    impl TextExtractor for LinesExtractor {
        fn name(&self) -> &'static str {
            "lines"
        }

        fn extensions(&self) -> &'static [&'static str] {
            &["txt"]
        }

        fn extract_blocks(&self, data: &[u8]) -> ExtractionResult<Vec<String>> {
            let text = std::str::from_utf8(data).map_err(|e| ExtractionError::Invalid {
                message: e.to_string(),
            })?;
            Ok(text.lines().map(str::to_string).collect())
        }
    }

    #[test]
    fn test_registry_accepts_custom_extractor() {
        let registry = ExtractorRegistry::empty().with_extractor(Box::new(LinesExtractor));
        let extractor = registry.for_extension("txt").unwrap();
        assert_eq!(extractor.name(), "lines");
        let blocks = extractor.extract_blocks(b"one\ntwo").unwrap();
        assert_eq!(assemble_text(&blocks), "one two ");
    }
}
