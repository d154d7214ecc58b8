use crate::analysis::Category;
use crate::config::{Config, ReportMode};
use crate::error::{PunctalyzerError, UserFriendlyError};
use crate::report::csv_export;
use crate::report::{BatchReport, DocumentFailure, DocumentRecord, WrittenArtifacts};
use crate::scanner::DocumentFile;
use console::{measure_text_width, pad_str, style, Alignment, Emoji, Term};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    Human,
    Json,
    Plain,
}

// Emojis with text fallbacks
static CROSS: Emoji = Emoji("❌ ", "✗ ");
static INFO: Emoji = Emoji("ℹ️  ", "i ");
static WARNING: Emoji = Emoji("⚠️  ", "! ");
static ROCKET: Emoji = Emoji("🚀 ", "> ");
static SPARKLES: Emoji = Emoji("✨ ", "* ");
static CHART: Emoji = Emoji("📊 ", "# ");

const ROW_LABEL_HEADER: &str = "Punctuation";
const WORD_COUNT_ROW: &str = "word_count";

pub struct OutputFormatter {
    mode: OutputMode,
    use_colors: bool,
    verbose_level: u8,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let use_colors = match mode {
            OutputMode::Human => Term::stdout().features().colors_supported() && !quiet,
            _ => false,
        };

        Self {
            mode,
            use_colors,
            verbose_level: if quiet { 0 } else { verbose },
            quiet,
        }
    }

    // Core messaging methods
    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Human => self.print_human_message(MessageType::Error, message),
            OutputMode::Json => self.print_json_message("error", message),
            OutputMode::Plain => eprintln!("ERROR: {}", message),
        }
    }

    pub fn warning(&self, message: &str) {
        if self.quiet {
            return;
        }
        match self.mode {
            OutputMode::Human => self.print_human_message(MessageType::Warning, message),
            OutputMode::Json => self.print_json_message("warning", message),
            OutputMode::Plain => eprintln!("WARNING: {}", message),
        }
    }

    pub fn info(&self, message: &str) {
        if self.should_show_message(1) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Info, message),
                OutputMode::Json => self.print_json_message("info", message),
                OutputMode::Plain => println!("INFO: {}", message),
            }
        }
    }

    pub fn debug(&self, message: &str) {
        if self.should_show_message(2) {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        println!("  {}", style(message).dim());
                    } else {
                        println!("  DEBUG: {}", message);
                    }
                }
                OutputMode::Json => self.print_json_message("debug", message),
                OutputMode::Plain => println!("DEBUG: {}", message),
            }
        }
    }

    pub fn start_operation(&self, operation: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        println!("{}{}", ROCKET, style(operation).bold());
                    } else {
                        println!("> {}", operation);
                    }
                }
                OutputMode::Json => self.print_json_message("operation_start", operation),
                OutputMode::Plain => println!("STARTING: {}", operation),
            }
        }
    }

    pub fn print_user_friendly_error(&self, error: &PunctalyzerError) {
        self.error(&error.user_message());

        if let Some(suggestion) = error.suggestion() {
            match self.mode {
                OutputMode::Human => {
                    eprintln!();
                    if self.use_colors {
                        eprintln!(
                            "{}{}",
                            INFO,
                            style(format!("Suggestion: {}", suggestion)).cyan()
                        );
                    } else {
                        eprintln!("Suggestion: {}", suggestion);
                    }
                }
                OutputMode::Json => {
                    self.print_json_object(&serde_json::json!({
                        "type": "suggestion",
                        "message": suggestion
                    }));
                }
                OutputMode::Plain => {
                    eprintln!("SUGGESTION: {}", suggestion);
                }
            }
        }
    }

    /// The per-document summary table, shown even in quiet mode.
    pub fn print_report_table(&self, records: &[DocumentRecord]) {
        if records.is_empty() {
            return;
        }

        match self.mode {
            OutputMode::Human => {
                println!();
                for (index, line) in render_table(records).iter().enumerate() {
                    if self.use_colors && index == 0 {
                        println!("{}", style(line).bold());
                    } else {
                        println!("{}", line);
                    }
                }
                println!();
            }
            OutputMode::Json => {
                self.print_json_object(&serde_json::json!({
                    "type": "table",
                    "documents": records
                }));
            }
            OutputMode::Plain => match csv_export::to_csv_string(records) {
                Ok(text) => print!("{}", text),
                Err(e) => self.error(&e.user_message()),
            },
        }
    }

    pub fn print_failures(&self, failures: &[DocumentFailure]) {
        if failures.is_empty() {
            return;
        }

        match self.mode {
            OutputMode::Json => {
                self.print_json_object(&serde_json::json!({
                    "type": "failures",
                    "failures": failures
                }));
            }
            OutputMode::Human => {
                self.print_human_message(
                    MessageType::Warning,
                    &format!("{} document(s) could not be read:", failures.len()),
                );
                for failure in failures {
                    eprintln!("  - {}: {}", failure.filename, failure.reason);
                }
            }
            OutputMode::Plain => {
                for failure in failures {
                    eprintln!("FAILED: {}: {}", failure.filename, failure.reason);
                }
            }
        }
    }

    pub fn print_run_summary(
        &self,
        report: &BatchReport,
        artifacts: &WrittenArtifacts,
        duration: Duration,
    ) {
        if self.quiet {
            return;
        }

        match self.mode {
            OutputMode::Human => self.print_human_summary(report, artifacts, duration),
            OutputMode::Json => {
                self.print_json_object(&serde_json::json!({
                    "type": "summary",
                    "documents_analysed": report.records.len(),
                    "documents_failed": report.failures.len(),
                    "total_words": report.total_words(),
                    "artifacts": artifacts,
                    "duration_ms": duration.as_millis() as u64,
                    "timestamp": report.generated_at.to_rfc3339()
                }));
            }
            OutputMode::Plain => {
                println!("COMPLETED: Punctuation analysis");
                println!("Documents analysed: {}", report.records.len());
                if report.has_failures() {
                    println!("Documents failed: {}", report.failures.len());
                }
                println!("Words: {}", report.total_words());
                for path in artifacts.paths() {
                    println!("Wrote: {}", path.display());
                }
                println!("Duration: {:?}", duration);
            }
        }
    }

    pub fn print_categories(&self) {
        match self.mode {
            OutputMode::Json => {
                let keys: Vec<&str> = Category::ALL.iter().map(|c| c.key()).collect();
                self.print_json_object(&serde_json::json!({
                    "type": "categories",
                    "categories": keys
                }));
            }
            _ => {
                for category in Category::ALL {
                    println!("{}", category.key());
                }
            }
        }
    }

    pub fn print_dry_run(&self, documents: &[DocumentFile], config: &Config) {
        let selection = config.chart.selection.join(", ");
        let mode = match config.output.mode {
            ReportMode::Full => "full",
            ReportMode::ChartOnly => "chart_only",
        };

        match self.mode {
            OutputMode::Json => {
                let files: Vec<serde_json::Value> = documents
                    .iter()
                    .map(|d| {
                        serde_json::json!({
                            "path": d.display_path(),
                            "size": d.size
                        })
                    })
                    .collect();
                self.print_json_object(&serde_json::json!({
                    "type": "dry_run",
                    "documents": files,
                    "output_directory": config.output.base_directory,
                    "mode": mode,
                    "selection": config.chart.selection,
                    "write_json_report": config.output.write_json_report
                }));
            }
            _ => {
                self.print_header("Dry Run");
                println!("Documents ({}):", documents.len());
                for document in documents {
                    println!("  {} ({})", document.display_path(), document.format_size());
                }
                println!();
                println!("Output directory: {}", config.output.base_directory.display());
                println!("Report mode:      {}", mode);
                println!(
                    "Chart categories: {}",
                    if selection.is_empty() { "(none)" } else { &selection }
                );
                println!(
                    "JSON report:      {}",
                    if config.output.write_json_report { "yes" } else { "no" }
                );
            }
        }
    }

    pub fn print_header(&self, title: &str) {
        if self.quiet {
            return;
        }

        match self.mode {
            OutputMode::Human => {
                println!();
                if self.use_colors {
                    println!("{} {}", SPARKLES, style(title).bold().cyan());
                } else {
                    println!("=== {} ===", title);
                }
                println!();
            }
            OutputMode::Json => {
                self.print_json_object(&serde_json::json!({
                    "type": "header",
                    "title": title
                }));
            }
            OutputMode::Plain => {
                println!("=== {} ===", title);
            }
        }
    }

    pub fn print_separator(&self) {
        if self.quiet {
            return;
        }

        match self.mode {
            OutputMode::Human => {
                if self.use_colors {
                    println!("{}", style("─".repeat(60)).dim());
                } else {
                    println!("{}", "-".repeat(60));
                }
            }
            OutputMode::Plain => {
                println!("{}", "-".repeat(60));
            }
            OutputMode::Json => {}
        }
    }

    fn should_show_message(&self, min_verbose_level: u8) -> bool {
        !self.quiet && self.verbose_level >= min_verbose_level
    }

    fn print_human_message(&self, msg_type: MessageType, message: &str) {
        if self.use_colors {
            let (emoji, styled) = match msg_type {
                MessageType::Error => (&CROSS, style(message).red().bold()),
                MessageType::Warning => (&WARNING, style(message).yellow().bold()),
                MessageType::Info => (&INFO, style(message).cyan()),
            };

            match msg_type {
                MessageType::Error | MessageType::Warning => eprintln!("{}{}", emoji, styled),
                _ => println!("{}{}", emoji, styled),
            }
        } else {
            let prefix = match msg_type {
                MessageType::Error => "✗",
                MessageType::Warning => "!",
                MessageType::Info => "i",
            };

            match msg_type {
                MessageType::Error | MessageType::Warning => eprintln!("{} {}", prefix, message),
                _ => println!("{} {}", prefix, message),
            }
        }
    }

    fn print_json_message(&self, level: &str, message: &str) {
        self.print_json_object(&serde_json::json!({
            "type": "message",
            "level": level,
            "message": message,
            "timestamp": chrono::Utc::now().to_rfc3339()
        }));
    }

    fn print_json_object(&self, obj: &serde_json::Value) {
        println!(
            "{}",
            serde_json::to_string(obj).unwrap_or_else(|_| "{}".to_string())
        );
    }

    fn print_human_summary(
        &self,
        report: &BatchReport,
        artifacts: &WrittenArtifacts,
        duration: Duration,
    ) {
        self.print_separator();

        let headline = if report.has_failures() {
            "Punctuation analysis finished with problems"
        } else {
            "Punctuation analysis completed!"
        };
        if self.use_colors {
            println!("{}{}", CHART, style(headline).green().bold());
        } else {
            println!("{}", headline);
        }

        println!();
        println!("  Documents analysed: {}", self.highlight(report.records.len()));
        if report.has_failures() {
            println!("  Documents failed:   {}", self.highlight(report.failures.len()));
        }
        println!("  Words counted:      {}", self.highlight(report.total_words()));
        println!(
            "  Time taken:         {}",
            self.highlight(crate::ui::progress::format_duration(duration))
        );

        let paths = artifacts.paths();
        if !paths.is_empty() {
            println!();
            println!("  Files written:");
            for path in paths {
                println!("    {}", path.display());
            }
        }

        self.print_separator();
    }

    fn highlight<T: std::fmt::Display>(&self, value: T) -> String {
        if self.use_colors {
            style(value).cyan().bold().to_string()
        } else {
            value.to_string()
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum MessageType {
    Error,
    Warning,
    Info,
}

/// Lay out records transposed: one row for the word count and one per
/// category, one right-aligned column per document.
pub fn render_table(records: &[DocumentRecord]) -> Vec<String> {
    let mut rows: Vec<(&str, Vec<usize>)> = Vec::with_capacity(Category::ALL.len() + 1);
    rows.push((
        WORD_COUNT_ROW,
        records.iter().map(|r| r.word_count).collect(),
    ));
    for category in Category::ALL {
        rows.push((
            category.key(),
            records.iter().map(|r| r.punctuation.get(category)).collect(),
        ));
    }

    let label_width = rows
        .iter()
        .map(|(label, _)| label.len())
        .chain(std::iter::once(ROW_LABEL_HEADER.len()))
        .max()
        .unwrap_or(0);

    let column_widths: Vec<usize> = records
        .iter()
        .enumerate()
        .map(|(col, record)| {
            rows.iter()
                .map(|(_, values)| values[col].to_string().len())
                .chain(std::iter::once(measure_text_width(&record.filename)))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut lines = Vec::with_capacity(rows.len() + 2);

    let mut header = pad_str(ROW_LABEL_HEADER, label_width, Alignment::Left, None).to_string();
    for (record, width) in records.iter().zip(&column_widths) {
        header.push_str("  ");
        header.push_str(&pad_str(&record.filename, *width, Alignment::Right, None));
    }
    lines.push(header.trim_end().to_string());

    let rule_width = label_width + column_widths.iter().map(|w| w + 2).sum::<usize>();
    lines.push("-".repeat(rule_width));

    for (label, values) in &rows {
        let mut line = pad_str(label, label_width, Alignment::Left, None).to_string();
        for (value, width) in values.iter().zip(&column_widths) {
            line.push_str("  ");
            line.push_str(&pad_str(&value.to_string(), *width, Alignment::Right, None));
        }
        lines.push(line);
    }

    lines
}

// Progress-aware output wrapper
pub struct ProgressAwareOutput<'a> {
    formatter: &'a OutputFormatter,
    progress_manager: Option<&'a crate::ui::ProgressManager>,
}

impl<'a> ProgressAwareOutput<'a> {
    pub fn new(
        formatter: &'a OutputFormatter,
        progress_manager: Option<&'a crate::ui::ProgressManager>,
    ) -> Self {
        Self {
            formatter,
            progress_manager,
        }
    }

    pub fn suspend_and_print<F>(&self, f: F)
    where
        F: FnOnce(&OutputFormatter),
    {
        if let Some(pm) = self.progress_manager {
            pm.suspend(|| f(self.formatter));
        } else {
            f(self.formatter);
        }
    }

    pub fn info(&self, message: &str) {
        self.suspend_and_print(|f| f.info(message));
    }
}
