use crate::chart::ChartSelection;
use crate::error::{PunctalyzerError, Result};
use crate::extractor::ExtractorRegistry;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG_FILES: &[&str] = &["punctalyzer.toml", ".punctalyzer.toml"];

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub input: InputConfig,
    pub output: OutputConfig,
    pub chart: ChartConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct InputConfig {
    pub extensions: Vec<String>,
    pub max_file_size: u64,
    pub exclude_dirs: Vec<String>,
    pub exclude_patterns: Vec<String>,
    pub max_depth: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportMode {
    /// Table, CSV and chart.
    Full,
    /// Chart only.
    ChartOnly,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    pub base_directory: PathBuf,
    pub csv_filename: String,
    pub png_filename: String,
    pub svg_filename: String,
    pub json_filename: String,
    pub write_json_report: bool,
    pub mode: ReportMode,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChartConfig {
    pub selection: Vec<String>,
    pub bar_size: [u32; 2],
    pub line_size: [u32; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_path: Option<PathBuf>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["docx".to_string()],
            max_file_size: 50 * 1024 * 1024, // 50MB
            exclude_dirs: vec![
                ".git".to_string(),
                "node_modules".to_string(),
                "punctuation_report".to_string(),
            ],
            exclude_patterns: vec![],
            max_depth: 5,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            base_directory: PathBuf::from("punctuation_report"),
            csv_filename: "punctuation_summary.csv".to_string(),
            png_filename: "punctuation_graph.png".to_string(),
            svg_filename: "punctuation_graph.svg".to_string(),
            json_filename: "punctuation_report.json".to_string(),
            write_json_report: true,
            mode: ReportMode::Full,
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            selection: ChartSelection::default().keys(),
            bar_size: [1000, 500],
            line_size: [1200, 600],
            font_path: None,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(PunctalyzerError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| PunctalyzerError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        toml::from_str(&content).map_err(|e| PunctalyzerError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                for default_path in DEFAULT_CONFIG_FILES {
                    if Path::new(default_path).exists() {
                        log::debug!("using configuration from {}", default_path);
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(ref output_dir) = cli_args.output_dir {
            self.output.base_directory = output_dir.clone();
        }

        if let Some(ref selection) = cli_args.selection {
            self.chart.selection = selection
                .iter()
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect();
        }

        if cli_args.no_chart {
            self.chart.selection.clear();
        }

        if cli_args.chart_only {
            self.output.mode = ReportMode::ChartOnly;
        }

        if cli_args.no_json {
            self.output.write_json_report = false;
        }

        if let Some(ref font) = cli_args.font_path {
            self.chart.font_path = Some(font.clone());
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.input.extensions.is_empty() {
            return Err(PunctalyzerError::Config {
                message: "At least one document extension must be specified".to_string(),
            });
        }

        let registry = ExtractorRegistry::new();
        for extension in &self.input.extensions {
            if registry.for_extension(extension).is_none() {
                return Err(PunctalyzerError::Config {
                    message: format!(
                        "No text extractor for '.{}' (supported: {})",
                        extension,
                        registry.supported_extensions().join(", ")
                    ),
                });
            }
        }

        if self.input.max_file_size == 0 {
            return Err(PunctalyzerError::Config {
                message: "Maximum file size must be greater than 0".to_string(),
            });
        }

        if self.input.max_depth == 0 {
            return Err(PunctalyzerError::Config {
                message: "Maximum directory depth must be greater than 0".to_string(),
            });
        }

        for (name, value) in [
            ("csv_filename", &self.output.csv_filename),
            ("png_filename", &self.output.png_filename),
            ("svg_filename", &self.output.svg_filename),
            ("json_filename", &self.output.json_filename),
        ] {
            if value.trim().is_empty() {
                return Err(PunctalyzerError::Config {
                    message: format!("output.{} must not be empty", name),
                });
            }
        }

        for (name, [width, height]) in [
            ("bar_size", self.chart.bar_size),
            ("line_size", self.chart.line_size),
        ] {
            if width == 0 || height == 0 {
                return Err(PunctalyzerError::Config {
                    message: format!("chart.{} must be greater than 0 in both dimensions", name),
                });
            }
        }

        ChartSelection::from_keys(&self.chart.selection).map_err(|e| {
            PunctalyzerError::Config {
                message: format!("chart.selection: {}", e),
            }
        })?;

        Ok(())
    }

    /// Chart selection parsed from the configured keys.
    pub fn selection(&self) -> Result<ChartSelection> {
        ChartSelection::from_keys(&self.chart.selection)
    }

    pub fn create_sample_config() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub output_dir: Option<PathBuf>,
    pub selection: Option<Vec<String>>,
    pub no_chart: bool,
    pub chart_only: bool,
    pub no_json: bool,
    pub font_path: Option<PathBuf>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output_dir(mut self, output_dir: Option<PathBuf>) -> Self {
        self.output_dir = output_dir;
        self
    }

    pub fn with_selection(mut self, selection: Option<Vec<String>>) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_no_chart(mut self, no_chart: bool) -> Self {
        self.no_chart = no_chart;
        self
    }

    pub fn with_chart_only(mut self, chart_only: bool) -> Self {
        self.chart_only = chart_only;
        self
    }

    pub fn with_no_json(mut self, no_json: bool) -> Self {
        self.no_json = no_json;
        self
    }

    pub fn with_font_path(mut self, font_path: Option<PathBuf>) -> Self {
        self.font_path = font_path;
        self
    }
}
