use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::dataset::DatasetPreview;
use crate::error::{Result, ResultExt};
use crate::pipeline::ProcessedDataset;
use crate::types::{CleaningSummary, DatasetProfile};
use crate::visuals::VisualizationPlan;

/// Everything recorded about one cleaning run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningReport {
    /// Local time the report was generated
    pub generated_at: String,
    /// Path (or label) of the uploaded input
    pub input_file: String,
    /// Path of the cleaned CSV, if one was written
    pub output_file: Option<String>,

    /// Profile of the upload before cleaning
    pub profile: DatasetProfile,
    /// What the cleaner did
    pub summary: CleaningSummary,
    /// First rows of the cleaned dataset
    pub preview: DatasetPreview,

    /// Chart data, when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visuals: Option<VisualizationPlan>,
}

/// Builds reports and writes them to disk.
pub struct ReportGenerator {
    output_dir: PathBuf,
}

impl ReportGenerator {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Build a report for a finished run.
    ///
    /// `profile` is the profile of the dataset as uploaded, taken before
    /// the pipeline ran.
    pub fn build_report(
        input_file: &str,
        output_file: Option<&str>,
        profile: DatasetProfile,
        processed: &ProcessedDataset,
        include_visuals: bool,
    ) -> CleaningReport {
        CleaningReport {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            input_file: input_file.to_string(),
            output_file: output_file.map(String::from),
            profile,
            summary: processed.summary.clone(),
            preview: processed.preview(),
            visuals: include_visuals.then(|| processed.visuals.clone()),
        }
    }

    /// Write a report to a JSON file.
    ///
    /// If `report_base_name` is "train", the file will be "train_report.json".
    pub fn write_report_to_file(
        &self,
        report: &CleaningReport,
        report_base_name: &str,
    ) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)
            .context(format!("Creating {}", self.output_dir.display()))?;

        let report_path = self
            .output_dir
            .join(format!("{}_report.json", report_base_name));
        let mut file = File::create(&report_path)
            .context(format!("Creating {}", report_path.display()))?;
        file.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;

        info!("Report saved: {}", report_path.display());

        Ok(report_path)
    }

    /// Write the chart data alone, as `<stem>_visuals.json`.
    pub fn write_visuals_to_file(
        &self,
        visuals: &VisualizationPlan,
        report_base_name: &str,
    ) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;

        let visuals_path = self
            .output_dir
            .join(format!("{}_visuals.json", report_base_name));
        fs::write(&visuals_path, serde_json::to_string_pretty(visuals)?)?;

        info!("Chart data saved: {}", visuals_path.display());

        Ok(visuals_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CleaningConfig;
    use crate::dataset::Dataset;
    use crate::io;
    use crate::pipeline::Pipeline;
    use crate::profiler::DataProfiler;

    fn run(bytes: &[u8]) -> (DatasetProfile, ProcessedDataset) {
        let config = CleaningConfig::default();
        let raw = Dataset::from_dataframe(&io::read_csv_bytes(bytes, &config).unwrap()).unwrap();
        let profile = DataProfiler::profile_dataset(&raw, &config);
        let processed = Pipeline::builder().build().unwrap().process_bytes(bytes).unwrap();
        (profile, processed)
    }

    #[test]
    fn test_build_report() {
        let (profile, processed) = run(b"x,c\n1,a\n2,\n3,a\n4,b\n,b\n");

        let report = ReportGenerator::build_report("data.csv", None, profile, &processed, false);

        assert_eq!(report.input_file, "data.csv");
        assert!(report.output_file.is_none());
        assert_eq!(report.profile.missing_cells, 2);
        assert_eq!(report.summary.missing_after, 0);
        assert_eq!(report.preview.columns, vec!["x", "c"]);
        assert!(report.visuals.is_none());
        // "YYYY-MM-DD HH:MM:SS"
        assert_eq!(report.generated_at.len(), 19);
    }

    #[test]
    fn test_write_report_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let (profile, processed) = run(b"x,y\n1,10\n2,20\n3,\n");
        let report = ReportGenerator::build_report(
            "data.csv",
            Some("cleaned_data.csv"),
            profile,
            &processed,
            true,
        );

        let generator = ReportGenerator::new(dir.path().join("out"));
        let path = generator.write_report_to_file(&report, "data").unwrap();

        assert_eq!(path.file_name().unwrap(), "data_report.json");
        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["output_file"], "cleaned_data.csv");
        assert_eq!(json["summary"]["missing_after"], 0);
        assert!(json["visuals"]["correlation"].is_object());
    }

    #[test]
    fn test_write_visuals_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let (_, processed) = run(b"x,c\n1,a\n2,b\n");

        let generator = ReportGenerator::new(dir.path());
        let path = generator.write_visuals_to_file(&processed.visuals, "data").unwrap();

        assert!(path.ends_with("data_visuals.json"));
        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["histograms"].as_array().unwrap().len(), 1);
        assert_eq!(json["bar_charts"].as_array().unwrap().len(), 1);
    }
}
