pub mod analysis;
pub mod chart;
pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod report;
pub mod scanner;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, OutputFormat};
pub use config::{ChartConfig, CliOverrides, Config, InputConfig, OutputConfig, ReportMode};
pub use error::{ExtractionError, PunctalyzerError, Result, UserFriendlyError};

// Core functionality re-exports
pub use analysis::{count_punctuation, count_words, Category, PunctuationCounts};
pub use chart::{ChartRenderer, ChartSelection, Figure};
pub use extractor::{ExtractorRegistry, TextExtractor};
pub use report::{BatchReport, DocumentFailure, DocumentRecord, ReportBuilder, WrittenArtifacts};
pub use scanner::{DocumentFile, DocumentScanner, FileFilter};
pub use ui::{GracefulShutdown, OutputFormatter, OutputMode, ProgressManager};

use report::{AnalysisProgress, ArtifactPlan, JsonReport, OutputManager};
use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use ui::output::ProgressAwareOutput;

/// Everything one run produced.
#[derive(Debug)]
pub struct AnalysisOutcome {
    pub report: BatchReport,
    pub figure: Option<Figure>,
    pub artifacts: WrittenArtifacts,
    pub duration: Duration,
}

impl AnalysisOutcome {
    fn empty(duration: Duration) -> Self {
        Self {
            report: BatchReport::new(Vec::new(), Vec::new()),
            figure: None,
            artifacts: WrittenArtifacts::default(),
            duration,
        }
    }
}

/// Main library interface: collect, analyse, report.
pub struct Punctalyzer {
    config: Config,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
    shutdown: GracefulShutdown,
    force_overwrite: bool,
}

impl Punctalyzer {
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Result<Self> {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(!quiet && output_mode == OutputMode::Human);
        let shutdown = GracefulShutdown::new()?;

        Ok(Self {
            config,
            output_formatter,
            progress_manager,
            shutdown,
            force_overwrite: false,
        })
    }

    /// Create an instance without installing a signal handler
    #[cfg(test)]
    pub fn new_for_test(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        Self {
            config,
            output_formatter: OutputFormatter::new(output_mode, verbose, quiet),
            progress_manager: ProgressManager::new(false),
            shutdown: GracefulShutdown::new_for_test(),
            force_overwrite: false,
        }
    }

    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        let output_mode = match cli_args.output_format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        };

        Ok(Self::new(config, output_mode, cli_args.verbose, cli_args.quiet)?
            .with_force_overwrite(cli_args.force))
    }

    pub fn with_force_overwrite(mut self, force: bool) -> Self {
        self.force_overwrite = force;
        self
    }

    /// Analyse every document named by `inputs` and write the configured
    /// artifacts. A batch with no documents writes nothing.
    pub fn analyze<P: AsRef<Path>>(&self, inputs: &[P]) -> Result<AnalysisOutcome> {
        let start_time = Instant::now();
        self.shutdown.check_shutdown()?;

        let documents = self.collect_documents(inputs)?;
        if documents.is_empty() {
            self.output_formatter
                .warning("No documents to analyse; nothing was written");
            return Ok(AnalysisOutcome::empty(start_time.elapsed()));
        }
        self.output_formatter
            .info(&format!("Found {} document(s)", documents.len()));

        let report = self.build_report(&documents)?;
        self.shutdown.check_shutdown()?;

        let full_report = self.config.output.mode == ReportMode::Full;
        if full_report {
            self.output_formatter.print_report_table(&report.records);
        }
        self.output_formatter.print_failures(&report.failures);

        if report.is_empty() {
            return Ok(AnalysisOutcome {
                report,
                figure: None,
                artifacts: WrittenArtifacts::default(),
                duration: start_time.elapsed(),
            });
        }

        let selection = self.config.selection()?;
        let figure = Figure::from_records(&report.records, &selection, &self.config.chart);
        if figure.is_none() {
            self.output_formatter
                .info("No punctuation categories selected; skipping the chart");
        }

        let plan = ArtifactPlan {
            csv: full_report,
            chart: figure.is_some(),
            json: self.config.output.write_json_report,
        };

        let font = self.config.chart.font_path.as_deref();
        if plan.chart {
            // Fail before anything is written
            chart::ensure_font(font)?;
        }

        let output_manager =
            OutputManager::new(&self.config.output).with_force_overwrite(self.force_overwrite);
        output_manager.initialize(&plan)?;

        let mut artifacts = WrittenArtifacts::default();
        if plan.csv {
            artifacts.csv = Some(output_manager.write_csv(&report.records)?);
        }
        if let Some(ref figure) = figure {
            let spinner = self.progress_manager.create_spinner("Drawing chart");
            let renderer = ChartRenderer::new(font);
            let written = output_manager.write_chart(figure, &renderer);
            spinner.finish_and_clear();
            let (png, svg) = written?;
            artifacts.png = Some(png);
            artifacts.svg = Some(svg);
        }
        if plan.json {
            let json = JsonReport::new(&report, &selection, figure.as_ref());
            artifacts.json = Some(output_manager.write_json_report(&json)?);
        }

        let duration = start_time.elapsed();
        self.output_formatter
            .print_run_summary(&report, &artifacts, duration);

        Ok(AnalysisOutcome {
            report,
            figure,
            artifacts,
            duration,
        })
    }

    /// List what would be analysed without reading any document.
    pub fn dry_run<P: AsRef<Path>>(&self, inputs: &[P]) -> Result<Vec<DocumentFile>> {
        let documents = self.collect_documents(inputs)?;
        self.output_formatter.print_dry_run(&documents, &self.config);
        Ok(documents)
    }

    fn collect_documents<P: AsRef<Path>>(&self, inputs: &[P]) -> Result<Vec<DocumentFile>> {
        self.output_formatter.start_operation("Collecting documents");

        let scanner = DocumentScanner::new(&self.config.input);
        let documents = scanner.collect(inputs)?;

        let stats = scanner.get_statistics(&documents);
        self.output_formatter.debug(&stats.display_summary());

        Ok(documents)
    }

    fn build_report(&self, documents: &[DocumentFile]) -> Result<BatchReport> {
        self.output_formatter.start_operation("Analysing punctuation");

        let progress_bar = self
            .progress_manager
            .create_document_progress(documents.len() as u64);
        let output = ProgressAwareOutput::new(&self.output_formatter, Some(&self.progress_manager));
        let failures_seen = Cell::new(0usize);

        let progress_callback = |progress: &AnalysisProgress| {
            ui::progress::update_document_progress(&progress_bar, progress);
            if progress.failures > failures_seen.get() {
                failures_seen.set(progress.failures);
                if let Some(ref current) = progress.current_document {
                    output.info(&format!("Could not read {}; skipping", current));
                }
            }
        };

        let builder = ReportBuilder::new();
        let report = builder.build(documents, Some(&progress_callback), Some(&self.shutdown));

        match report {
            Ok(report) => {
                ui::progress::finish_progress_with_summary(
                    &progress_bar,
                    &format!("Analysed {} document(s)", report.records.len()),
                    progress_bar.elapsed(),
                );
                Ok(report)
            }
            Err(e) => {
                progress_bar.abandon();
                Err(e)
            }
        }
    }

    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        std::fs::write(output_path.as_ref(), Config::create_sample_config())?;
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.shutdown.is_running()
    }

    pub fn request_shutdown(&self) {
        self.shutdown.request_shutdown();
    }

    pub fn handle_error(&self, error: &PunctalyzerError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}

/// Default output location for `--generate-config`.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("punctalyzer.toml")
}

pub fn version_info() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
