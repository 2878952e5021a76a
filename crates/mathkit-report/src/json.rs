//! JSON report generation.
//!
//! [`JsonGenerator`] serializes a [`SessionReport`] either as compact
//! single-line JSON or pretty-printed with 2-space indentation.
//!
//! # Example
//!
//! ```rust
//! use mathkit_core::Workspace;
//! use mathkit_report::json::JsonGenerator;
//! use mathkit_report::SessionReport;
//!
//! let report = SessionReport::builder().blocks(&Workspace::default()).build();
//! let generator = JsonGenerator::new(&report);
//!
//! let compact = generator.generate().unwrap();
//! assert!(!compact.contains('\n'));
//!
//! // generator.write_to_file(Path::new("mathkit-session.json"), true).unwrap();
//! ```

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::{ReportError, Result, SessionReport};

/// JSON report generator.
pub struct JsonGenerator<'a> {
    report: &'a SessionReport,
}

impl<'a> JsonGenerator<'a> {
    /// Creates a new JSON generator for the given report.
    #[must_use]
    pub const fn new(report: &'a SessionReport) -> Self {
        Self { report }
    }

    /// Generates compact JSON output.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Serialization`] if JSON serialization fails.
    pub fn generate(&self) -> Result<String> {
        serde_json::to_string(self.report).map_err(ReportError::from)
    }

    /// Generates pretty-printed JSON output.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Serialization`] if JSON serialization fails.
    pub fn generate_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self.report).map_err(ReportError::from)
    }

    /// Writes the JSON report to `path`, creating or overwriting it.
    ///
    /// Parent directories must exist.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Serialization`] if JSON serialization fails.
    /// Returns [`ReportError::Io`] if file creation or writing fails.
    pub fn write_to_file(&self, path: &Path, pretty: bool) -> Result<()> {
        let json = if pretty {
            self.generate_pretty()?
        } else {
            self.generate()?
        };

        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use chrono::Utc;
    use mathkit_core::{Catalog, Machine, Workspace};

    use super::*;

    fn sample_report() -> SessionReport {
        let catalog = Catalog::standard();
        let machine = Machine::default()
            .add_operation("double")
            .add_operation("add2")
            .run_and_record(&catalog);

        SessionReport::builder()
            .title("json")
            .generated_at(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
            .machine(&machine, &catalog)
            .blocks(&Workspace::with_counts(402, 2, 0, 4, 0))
            .build()
    }

    #[test]
    fn test_generate_compact() {
        let json = JsonGenerator::new(&sample_report()).generate().unwrap();

        assert!(!json.contains('\n'));
        assert!(json.contains(r#""title":"json""#));
        assert!(json.contains(r#""parts":["Double","Add 2"]"#));
        assert!(json.contains(r#""comparison":"exact""#));
        assert!(json.contains(r#""generated_at":"2024-01-01T00:00:00Z""#));
    }

    #[test]
    fn test_generate_pretty_parses_back() {
        let report = sample_report();
        let json = JsonGenerator::new(&report).generate_pretty().unwrap();
        assert!(json.contains("\n  \"title\""));

        let parsed: SessionReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, report);
    }

    #[test]
    fn test_history_values_survive_serialization() {
        let json = JsonGenerator::new(&sample_report()).generate().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        let run = &value["machine"]["history"][0];
        assert_eq!(run["input"], 5.0);
        assert_eq!(run["result"], 12.0);
        assert_eq!(run["steps"][0]["operation"], "Start");
        assert_eq!(run["steps"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_omits_missing_sections() {
        let report = SessionReport::builder().title("bare").build();
        let json = JsonGenerator::new(&report).generate().unwrap();
        assert!(!json.contains("machine"));
        assert!(!json.contains("blocks"));
    }

    #[test]
    fn test_write_to_file() {
        let path = std::env::temp_dir().join(format!(
            "mathkit-report-{}.json",
            std::process::id()
        ));
        let report = sample_report();

        JsonGenerator::new(&report).write_to_file(&path, false).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        let parsed: SessionReport = serde_json::from_str(&contents).unwrap();
        assert_eq!(parsed.title, "json");

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_to_missing_dir_is_io_error() {
        let report = sample_report();
        let err = JsonGenerator::new(&report)
            .write_to_file(Path::new("/nonexistent/dir/report.json"), true)
            .unwrap_err();
        assert!(matches!(err, ReportError::Io(_)));
    }
}
