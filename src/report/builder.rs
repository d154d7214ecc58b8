use crate::analysis::{count_punctuation, count_words, PunctuationCounts};
use crate::error::{ExtractionError, ExtractionResult, PunctalyzerError, Result, UserFriendlyError};
use crate::extractor::{assemble_text, ExtractorRegistry};
use crate::scanner::DocumentFile;
use crate::ui::GracefulShutdown;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::Serialize;
use std::time::{Duration, Instant};

/// One analysed document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentRecord {
    pub filename: String,
    pub word_count: usize,
    #[serde(flatten)]
    pub punctuation: PunctuationCounts,
}

impl DocumentRecord {
    /// Tally already-extracted text.
    pub fn from_text<S: Into<String>>(filename: S, content: &str) -> Self {
        Self {
            filename: filename.into(),
            word_count: count_words(content),
            punctuation: count_punctuation(content),
        }
    }
}

/// A document that could not be read.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentFailure {
    pub filename: String,
    pub reason: String,
}

impl DocumentFailure {
    /// Record an extraction error. Other errors keep their own message.
    pub fn from_error(filename: &str, error: &PunctalyzerError) -> Self {
        let reason = match error {
            PunctalyzerError::Extraction { source, .. } => source.to_string(),
            other => other.to_string(),
        };
        Self {
            filename: filename.to_string(),
            reason,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub records: Vec<DocumentRecord>,
    pub failures: Vec<DocumentFailure>,
    pub generated_at: DateTime<Utc>,
}

impl BatchReport {
    pub fn new(records: Vec<DocumentRecord>, failures: Vec<DocumentFailure>) -> Self {
        Self {
            records,
            failures,
            generated_at: Utc::now(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn documents_attempted(&self) -> usize {
        self.records.len() + self.failures.len()
    }

    pub fn total_words(&self) -> usize {
        self.records.iter().map(|r| r.word_count).sum()
    }
}

#[derive(Debug, Clone)]
pub struct AnalysisProgress {
    pub documents_processed: usize,
    pub total_documents: usize,
    pub current_document: Option<String>,
    pub start_time: Instant,
    pub failures: usize,
}

impl AnalysisProgress {
    pub fn new(total_documents: usize) -> Self {
        Self {
            documents_processed: 0,
            total_documents,
            current_document: None,
            start_time: Instant::now(),
            failures: 0,
        }
    }

    pub fn update(&mut self, filename: String, failed: bool) {
        self.documents_processed += 1;
        self.current_document = Some(filename);
        if failed {
            self.failures += 1;
        }
    }

    pub fn percentage(&self) -> f64 {
        if self.total_documents == 0 {
            0.0
        } else {
            (self.documents_processed as f64 / self.total_documents as f64) * 100.0
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Runs extraction and tallying over a batch, in input order.
///
/// A document that fails to extract is recorded as a failure and the batch
/// carries on.
pub struct ReportBuilder {
    registry: ExtractorRegistry,
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self {
            registry: ExtractorRegistry::new(),
        }
    }

    pub fn with_registry(registry: ExtractorRegistry) -> Self {
        Self { registry }
    }

    pub fn build(
        &self,
        documents: &[DocumentFile],
        progress_callback: Option<&dyn Fn(&AnalysisProgress)>,
        shutdown: Option<&GracefulShutdown>,
    ) -> Result<BatchReport> {
        let mut progress = AnalysisProgress::new(documents.len());
        let mut records = Vec::with_capacity(documents.len());
        let mut failures = Vec::new();

        for document in documents {
            if let Some(shutdown) = shutdown {
                shutdown.check_shutdown()?;
            }

            let outcome = std::fs::read(&document.source_path)
                .map_err(|e| PunctalyzerError::Extraction {
                    filename: document.filename.clone(),
                    source: e.into(),
                })
                .and_then(|data| self.analyze(&document.filename, &document.extension, &data));

            match outcome {
                Ok(record) => {
                    debug!(
                        "{}: {} words, {} punctuation marks",
                        record.filename,
                        record.word_count,
                        record.punctuation.total()
                    );
                    records.push(record);
                    progress.update(document.filename.clone(), false);
                }
                Err(error @ PunctalyzerError::Extraction { .. }) => {
                    warn!("skipping {}: {}", document.display_path(), error.user_message());
                    failures.push(DocumentFailure::from_error(&document.filename, &error));
                    progress.update(document.filename.clone(), true);
                }
                Err(error) => return Err(error),
            }

            if let Some(callback) = progress_callback {
                callback(&progress);
            }
        }

        info!(
            "analysed {} of {} documents in {:.2?}",
            records.len(),
            documents.len(),
            progress.elapsed()
        );

        Ok(BatchReport::new(records, failures))
    }

    /// Analyse one document's bytes.
    pub fn analyze(&self, filename: &str, extension: &str, data: &[u8]) -> Result<DocumentRecord> {
        let content = self
            .extract_text(extension, data)
            .map_err(|source| PunctalyzerError::Extraction {
                filename: filename.to_string(),
                source,
            })?;
        Ok(DocumentRecord::from_text(filename, &content))
    }

    fn extract_text(&self, extension: &str, data: &[u8]) -> ExtractionResult<String> {
        let extractor =
            self.registry
                .for_extension(extension)
                .ok_or_else(|| ExtractionError::NoExtractor {
                    extension: extension.to_string(),
                })?;

        let blocks = extractor.extract_blocks(data)?;
        Ok(assemble_text(&blocks))
    }
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Category;
    use crate::extractor::TextExtractor;
    use std::cell::RefCell;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    /// Plain UTF-8 text, one block per line.
    struct LinesExtractor;

    impl TextExtractor for LinesExtractor {
        fn name(&self) -> &'static str {
            "lines"
        }

        fn extensions(&self) -> &'static [&'static str] {
            &["txt"]
        }

        fn extract_blocks(&self, data: &[u8]) -> ExtractionResult<Vec<String>> {
            let text = std::str::from_utf8(data).map_err(|_| ExtractionError::Invalid {
                message: "not utf-8".to_string(),
            })?;
            Ok(text.lines().map(str::to_string).collect())
        }
    }

    fn builder() -> ReportBuilder {
        ReportBuilder::with_registry(ExtractorRegistry::empty().with_extractor(Box::new(LinesExtractor)))
    }

    fn write_doc(dir: &Path, name: &str, data: &[u8]) -> DocumentFile {
        let path = dir.join(name);
        fs::write(&path, data).unwrap();
        DocumentFile::new(path, data.len() as u64)
    }

    #[test]
    fn test_record_from_text() {
        let record = DocumentRecord::from_text("a.docx", "Hello... world. ");
        assert_eq!(record.word_count, 2);
        assert_eq!(record.punctuation.get(Category::Ellipses), 1);
        assert_eq!(record.punctuation.get(Category::FullStops), 3);
    }

    #[test]
    fn test_keeps_order_and_skips_failures() {
        let temp_dir = TempDir::new().unwrap();
        let documents = vec![
            write_doc(temp_dir.path(), "first.txt", b"One, two."),
            write_doc(temp_dir.path(), "broken.txt", &[0xff, 0xfe, 0x00]),
            write_doc(temp_dir.path(), "third.txt", b"Three? Four!"),
        ];

        let report = builder().build(&documents, None, None).unwrap();

        let names: Vec<&str> = report.records.iter().map(|r| r.filename.as_str()).collect();
        assert_eq!(names, vec!["first.txt", "third.txt"]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].filename, "broken.txt");
        assert_eq!(report.failures[0].reason, "invalid document: not utf-8");
        assert_eq!(report.documents_attempted(), 3);
        assert_eq!(report.total_words(), 4);
    }

    #[test]
    fn test_missing_file_is_a_failure() {
        let temp_dir = TempDir::new().unwrap();
        let gone = DocumentFile::new(temp_dir.path().join("gone.txt"), 0);

        let report = builder().build(&[gone], None, None).unwrap();
        assert!(report.is_empty());
        assert!(report.has_failures());
        assert!(report.failures[0].reason.starts_with("cannot read file"));
    }

    #[test]
    fn test_unknown_extension_is_a_failure() {
        let error = builder().analyze("x.odt", "odt", b"text").unwrap_err();
        assert!(matches!(
            &error,
            PunctalyzerError::Extraction {
                filename,
                source: ExtractionError::NoExtractor { extension },
            } if filename == "x.odt" && extension == "odt"
        ));

        let failure = DocumentFailure::from_error("x.odt", &error);
        assert_eq!(failure.reason, "no extractor for '.odt' documents");
    }

    #[test]
    fn test_failure_keeps_typed_source() {
        let error = builder()
            .analyze("broken.txt", "txt", &[0xff, 0xfe])
            .unwrap_err();
        let source = std::error::Error::source(&error)
            .and_then(|s| s.downcast_ref::<ExtractionError>())
            .unwrap();
        assert!(matches!(source, ExtractionError::Invalid { .. }));
        assert_eq!(
            error.user_message(),
            "Could not read broken.txt: invalid document: not utf-8"
        );
        assert!(error.suggestion().is_some());
    }

    #[test]
    fn test_progress_callback() {
        let temp_dir = TempDir::new().unwrap();
        let documents = vec![
            write_doc(temp_dir.path(), "a.txt", b"a"),
            write_doc(temp_dir.path(), "b.txt", b"b"),
        ];

        let seen = RefCell::new(Vec::new());
        let callback = |p: &AnalysisProgress| {
            seen.borrow_mut().push((p.documents_processed, p.percentage()));
        };

        builder().build(&documents, Some(&callback), None).unwrap();
        assert_eq!(seen.into_inner(), vec![(1, 50.0), (2, 100.0)]);
    }

    #[test]
    fn test_cancellation_between_documents() {
        let temp_dir = TempDir::new().unwrap();
        let documents = vec![write_doc(temp_dir.path(), "a.txt", b"a")];

        let shutdown = GracefulShutdown::new_for_test();
        shutdown.request_shutdown();

        let result = builder().build(&documents, None, Some(&shutdown));
        assert!(matches!(result, Err(PunctalyzerError::Cancelled)));
    }

    #[test]
    fn test_empty_batch() {
        let report = builder().build(&[], None, None).unwrap();
        assert!(report.is_empty());
        assert!(!report.has_failures());
    }

    #[test]
    fn test_record_json_is_flat_and_ordered() {
        let record = DocumentRecord::from_text("a.docx", "Hi, there.");
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.starts_with(r#"{"filename":"a.docx","word_count":2,"apostrophes":0,"#));
        assert!(json.ends_with(r#""vertical_bars":0}"#));
    }
}
