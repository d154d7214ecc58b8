pub mod builder;
pub mod csv_export;
pub mod output_manager;

pub use builder::{AnalysisProgress, BatchReport, DocumentFailure, DocumentRecord, ReportBuilder};
pub use output_manager::{ArtifactPlan, JsonReport, OutputManager, WrittenArtifacts};
