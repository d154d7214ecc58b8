use crate::chart::{ChartRenderer, ChartSelection, Figure};
use crate::config::OutputConfig;
use crate::error::{PunctalyzerError, Result};
use crate::report::csv_export;
use crate::report::{BatchReport, DocumentFailure, DocumentRecord};
use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Which artifacts a run is going to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArtifactPlan {
    pub csv: bool,
    pub chart: bool,
    pub json: bool,
}

impl ArtifactPlan {
    pub fn is_empty(&self) -> bool {
        !(self.csv || self.chart || self.json)
    }
}

/// Paths of the files actually written.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WrittenArtifacts {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub csv: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub png: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub svg: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json: Option<PathBuf>,
}

impl WrittenArtifacts {
    pub fn paths(&self) -> Vec<&Path> {
        [&self.csv, &self.png, &self.svg, &self.json]
            .into_iter()
            .filter_map(|p| p.as_deref())
            .collect()
    }
}

/// Contents of `punctuation_report.json`.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub generated_at: DateTime<Utc>,
    pub documents: &'a [DocumentRecord],
    pub failures: &'a [DocumentFailure],
    pub selection: Vec<String>,
    pub chart: Option<&'a Figure>,
}

impl<'a> JsonReport<'a> {
    pub fn new(report: &'a BatchReport, selection: &ChartSelection, chart: Option<&'a Figure>) -> Self {
        Self {
            generated_at: report.generated_at,
            documents: &report.records,
            failures: &report.failures,
            selection: selection.keys(),
            chart,
        }
    }
}

/// Writes report artifacts into the output directory.
pub struct OutputManager {
    output_directory: PathBuf,
    config: OutputConfig,
    force_overwrite: bool,
}

impl OutputManager {
    pub fn new(config: &OutputConfig) -> Self {
        Self {
            output_directory: config.base_directory.clone(),
            config: config.clone(),
            force_overwrite: false,
        }
    }

    pub fn with_force_overwrite(mut self, force: bool) -> Self {
        self.force_overwrite = force;
        self
    }

    pub fn get_output_directory(&self) -> &Path {
        &self.output_directory
    }

    pub fn csv_path(&self) -> PathBuf {
        self.output_directory.join(&self.config.csv_filename)
    }

    pub fn png_path(&self) -> PathBuf {
        self.output_directory.join(&self.config.png_filename)
    }

    pub fn svg_path(&self) -> PathBuf {
        self.output_directory.join(&self.config.svg_filename)
    }

    pub fn json_path(&self) -> PathBuf {
        self.output_directory.join(&self.config.json_filename)
    }

    pub fn planned_paths(&self, plan: &ArtifactPlan) -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if plan.csv {
            paths.push(self.csv_path());
        }
        if plan.chart {
            paths.push(self.png_path());
            paths.push(self.svg_path());
        }
        if plan.json {
            paths.push(self.json_path());
        }
        paths
    }

    /// Create the output directory and refuse to clobber existing artifacts
    /// unless forced. Nothing is written when any planned file already exists.
    pub fn initialize(&self, plan: &ArtifactPlan) -> Result<()> {
        if plan.is_empty() {
            return Ok(());
        }

        if self.output_directory.exists() && !self.output_directory.is_dir() {
            return Err(PunctalyzerError::InvalidPath {
                path: format!("{} is not a directory", self.output_directory.display()),
            });
        }

        if !self.force_overwrite {
            if let Some(existing) = self.planned_paths(plan).into_iter().find(|p| p.exists()) {
                return Err(PunctalyzerError::OutputExists {
                    path: existing.display().to_string(),
                });
            }
        }

        fs::create_dir_all(&self.output_directory).map_err(|e| PunctalyzerError::Permission {
            path: format!(
                "Cannot create output directory {}: {}",
                self.output_directory.display(),
                e
            ),
        })?;

        debug!("output directory ready: {}", self.output_directory.display());
        Ok(())
    }

    pub fn write_csv(&self, records: &[DocumentRecord]) -> Result<PathBuf> {
        let path = self.csv_path();
        csv_export::write_csv_file(&path, records)?;
        info!("wrote {}", path.display());
        Ok(path)
    }

    /// Render the figure once per surface and write both files.
    pub fn write_chart(&self, figure: &Figure, renderer: &ChartRenderer) -> Result<(PathBuf, PathBuf)> {
        let png_path = self.png_path();
        let svg_path = self.svg_path();

        let png = renderer.render_png(figure)?;
        let svg = renderer.render_svg(figure)?;

        fs::write(&png_path, png)?;
        fs::write(&svg_path, svg)?;
        info!("wrote {} and {}", png_path.display(), svg_path.display());

        Ok((png_path, svg_path))
    }

    pub fn write_json_report(&self, report: &JsonReport) -> Result<PathBuf> {
        let path = self.json_path();
        let json = serde_json::to_string_pretty(report)?;
        fs::write(&path, json)?;
        info!("wrote {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn manager_in(dir: &Path) -> OutputManager {
        let config = OutputConfig {
            base_directory: dir.join("out"),
            ..OutputConfig::default()
        };
        OutputManager::new(&config)
    }

    fn full_plan() -> ArtifactPlan {
        ArtifactPlan {
            csv: true,
            chart: true,
            json: true,
        }
    }

    fn sample_report() -> BatchReport {
        BatchReport::new(
            vec![DocumentRecord::from_text("a.docx", "Hi, there.")],
            vec![DocumentFailure {
                filename: "b.docx".to_string(),
                reason: "not a valid .docx archive".to_string(),
            }],
        )
    }

    #[test]
    fn test_artifact_paths() {
        let temp_dir = TempDir::new().unwrap();
        let manager = manager_in(temp_dir.path());

        let paths = manager.planned_paths(&full_plan());
        let names: Vec<String> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                "punctuation_summary.csv",
                "punctuation_graph.png",
                "punctuation_graph.svg",
                "punctuation_report.json"
            ]
        );
    }

    #[test]
    fn test_initialize_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let manager = manager_in(temp_dir.path());

        manager.initialize(&full_plan()).unwrap();
        assert!(manager.get_output_directory().is_dir());
    }

    #[test]
    fn test_empty_plan_touches_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let manager = manager_in(temp_dir.path());

        let plan = ArtifactPlan {
            csv: false,
            chart: false,
            json: false,
        };
        manager.initialize(&plan).unwrap();
        assert!(!manager.get_output_directory().exists());
    }

    #[test]
    fn test_existing_artifact_requires_force() {
        let temp_dir = TempDir::new().unwrap();
        let manager = manager_in(temp_dir.path());
        manager.initialize(&full_plan()).unwrap();
        fs::write(manager.csv_path(), "old").unwrap();

        let result = manager.initialize(&full_plan());
        assert!(matches!(result, Err(PunctalyzerError::OutputExists { .. })));

        // Only planned files count
        let chart_only = ArtifactPlan {
            csv: false,
            chart: true,
            json: false,
        };
        assert!(manager.initialize(&chart_only).is_ok());

        let forced = manager.with_force_overwrite(true);
        assert!(forced.initialize(&full_plan()).is_ok());
    }

    #[test]
    fn test_output_path_is_a_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("out"), "").unwrap();
        let manager = manager_in(temp_dir.path());

        let result = manager.initialize(&full_plan());
        assert!(matches!(result, Err(PunctalyzerError::InvalidPath { .. })));
    }

    #[test]
    fn test_write_csv_and_json() {
        let temp_dir = TempDir::new().unwrap();
        let manager = manager_in(temp_dir.path());
        manager.initialize(&full_plan()).unwrap();

        let report = sample_report();
        let csv_path = manager.write_csv(&report.records).unwrap();
        assert_eq!(csv_export::read_csv_file(&csv_path).unwrap(), report.records);

        let selection = ChartSelection::default();
        let json_path = manager
            .write_json_report(&JsonReport::new(&report, &selection, None))
            .unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(json_path).unwrap()).unwrap();

        assert_eq!(value["documents"][0]["filename"], "a.docx");
        assert_eq!(value["documents"][0]["commas"], 1);
        assert_eq!(value["failures"][0]["filename"], "b.docx");
        assert_eq!(value["selection"][1], "full_stops");
        assert!(value["chart"].is_null());
    }

    #[test]
    fn test_written_artifacts_paths() {
        let written = WrittenArtifacts {
            csv: Some(PathBuf::from("a.csv")),
            json: Some(PathBuf::from("r.json")),
            ..WrittenArtifacts::default()
        };
        assert_eq!(written.paths(), vec![Path::new("a.csv"), Path::new("r.json")]);
    }
}
