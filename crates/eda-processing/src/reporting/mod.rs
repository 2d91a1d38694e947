//! Report generation module.
//!
//! A [`CleaningReport`] gathers everything known about one run: the
//! profile of the upload, the cleaning summary, a preview of the cleaned
//! rows and optionally the chart data. It serves both the `--json` CLI
//! flag (printed to stdout) and `--emit-report` (written next to the
//! cleaned CSV).
//!
//! # Example
//!
//! ```rust,ignore
//! use eda_processing::reporting::ReportGenerator;
//!
//! let report = ReportGenerator::build_report(
//!     "data/train.csv",
//!     Some("outputs/cleaned_data.csv"),
//!     profile,
//!     &processed,
//!     true,
//! );
//!
//! println!("{}", serde_json::to_string_pretty(&report)?);
//!
//! let generator = ReportGenerator::new("outputs");
//! generator.write_report_to_file(&report, "train")?;
//! ```

mod generator;

pub use generator::{CleaningReport, ReportGenerator};
