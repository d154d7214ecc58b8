use crate::chart::ChartSelection;
use crate::config::{CliOverrides, Config};
use crate::error::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "punctalyzer")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Count punctuation in Word documents and chart the results")]
#[command(
    long_about = "Punctalyzer reads .docx documents, counts eighteen kinds of punctuation \
                  plus words in each one, prints a summary table, and writes a CSV file \
                  and a chart (bar chart for one document, line chart for several)."
)]
#[command(before_help = "📊 Punctalyzer - Punctuation Analysis Tool")]
#[command(after_help = "EXAMPLES:\n  \
    punctalyzer chapter1.docx\n  \
    punctalyzer novel/ --output novel-report\n  \
    punctalyzer a.docx b.docx --select commas,semicolons,em_dashes\n  \
    punctalyzer drafts/ --chart-only --font /usr/share/fonts/truetype/dejavu/DejaVuSans.ttf\n  \
    punctalyzer --list-categories")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Documents or directories to analyse, in order
    #[arg(required_unless_present_any = ["generate_config", "list_categories"])]
    pub inputs: Vec<PathBuf>,

    /// Output directory for the CSV, chart and JSON report
    #[arg(short, long, help = "Output directory (default: punctuation_report)")]
    pub output: Option<PathBuf>,

    /// Punctuation categories to chart (comma-separated)
    #[arg(
        short,
        long,
        value_delimiter = ',',
        help = "Categories to chart (e.g., commas,full_stops,question_marks)"
    )]
    pub select: Option<Vec<String>>,

    /// Do not draw a chart
    #[arg(long, conflicts_with_all = ["select", "chart_only"])]
    pub no_chart: bool,

    /// Only draw the chart; skip the table and CSV
    #[arg(long)]
    pub chart_only: bool,

    /// Do not write the JSON report
    #[arg(long)]
    pub no_json: bool,

    /// TrueType font used for chart text
    #[arg(long, help = "Font file for chart text (default: search system fonts)")]
    pub font: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Force overwrite of existing artifacts
    #[arg(long, help = "Overwrite existing CSV, chart and report files")]
    pub force: bool,

    /// Dry run (show what would be analysed without reading documents)
    #[arg(long, help = "List the documents that would be analysed and exit")]
    pub dry_run: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,

    /// List the punctuation category keys
    #[arg(long, help = "Print the punctuation category keys and exit")]
    pub list_categories: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        if let Some(ref keys) = self.select {
            // Surface unknown keys as such rather than as a config problem
            ChartSelection::from_keys(keys)?;
        }

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        CliOverrides::new()
            .with_output_dir(self.output.clone())
            .with_selection(self.select.clone())
            .with_no_chart(self.no_chart)
            .with_chart_only(self.chart_only)
            .with_no_json(self.no_json)
            .with_font_path(self.font.clone())
    }

    /// Default `log` filter for the chosen verbosity; `RUST_LOG` still wins.
    pub fn log_filter(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReportMode;
    use crate::error::PunctalyzerError;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["punctalyzer"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_inputs_in_order() {
        let cli = parse(&["b.docx", "dir", "a.docx"]);
        assert_eq!(
            cli.inputs,
            vec![
                PathBuf::from("b.docx"),
                PathBuf::from("dir"),
                PathBuf::from("a.docx")
            ]
        );
    }

    #[test]
    fn test_inputs_required_unless_standalone_action() {
        assert!(Cli::try_parse_from(["punctalyzer", "--force"]).is_err());
        assert!(Cli::try_parse_from(["punctalyzer", "--list-categories"]).is_ok());
        assert!(Cli::try_parse_from(["punctalyzer", "--generate-config"]).is_ok());
    }

    #[test]
    fn test_selection_flag() {
        let cli = parse(&["a.docx", "-s", "commas,em_dashes"]);
        assert_eq!(
            cli.select,
            Some(vec!["commas".to_string(), "em_dashes".to_string()])
        );
        assert!(Cli::try_parse_from(["punctalyzer", "a.docx", "--no-chart", "-s", "commas"]).is_err());
    }

    #[test]
    fn test_overrides_reach_config() {
        let cli = parse(&["a.docx", "--chart-only", "--no-json", "-o", "out", "-s", "hyphens"]);
        let config = cli.load_config().unwrap();

        assert_eq!(config.output.mode, ReportMode::ChartOnly);
        assert!(!config.output.write_json_report);
        assert_eq!(config.output.base_directory, PathBuf::from("out"));
        assert_eq!(config.chart.selection, vec!["hyphens"]);
    }

    #[test]
    fn test_unknown_selection_key() {
        let cli = parse(&["a.docx", "-s", "commas,tildes"]);
        assert!(matches!(
            cli.load_config(),
            Err(PunctalyzerError::UnknownCategory { .. })
        ));
    }

    #[test]
    fn test_log_filter_follows_verbosity() {
        assert_eq!(parse(&["a.docx"]).log_filter(), "warn");
        assert_eq!(parse(&["a.docx", "-v"]).log_filter(), "info");
        assert_eq!(parse(&["a.docx", "-vv"]).log_filter(), "debug");
        assert_eq!(parse(&["a.docx", "-vvvv"]).log_filter(), "trace");
        assert_eq!(parse(&["a.docx", "-q"]).log_filter(), "error");
    }
}
