//! Writing a received plan to disk
//!
//! Three formats are supported: the full presented plan as JSON, a plain
//! text report and a CSV with one row per exercise.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::controller::ShownPlan;

pub mod csv;
pub mod json;
pub mod text;

/// Export format types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Text,
    Csv,
}

impl ExportFormat {
    pub fn from_str(s: &str) -> Result<Self, ExportError> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "text" | "txt" => Ok(ExportFormat::Text),
            "csv" => Ok(ExportFormat::Csv),
            _ => Err(ExportError::UnsupportedFormat(s.to_string())),
        }
    }

    /// Guess the format from a file extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ExportError> {
        let extension = path
            .as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| {
                ExportError::UnsupportedFormat(format!(
                    "cannot infer format of '{}' without an extension",
                    path.as_ref().display()
                ))
            })?;
        Self::from_str(extension)
    }

    /// Explicit format if given, otherwise the file extension
    pub fn resolve<P: AsRef<Path>>(explicit: Option<&str>, path: P) -> Result<Self, ExportError> {
        match explicit {
            Some(format) => Self::from_str(format),
            None => Self::from_path(path),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Text => "text",
            ExportFormat::Csv => "csv",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("CSV error: {0}")]
    CsvError(#[from] ::csv::Error),
}

/// Write `shown` to `output_path` in `format`
pub fn export_plan<P: AsRef<Path>>(
    shown: &ShownPlan,
    format: ExportFormat,
    output_path: P,
) -> Result<(), ExportError> {
    let output_path = output_path.as_ref();
    match format {
        ExportFormat::Json => json::export_plan(&shown.presented, output_path)?,
        ExportFormat::Text => text::export_plan(shown, output_path)?,
        ExportFormat::Csv => csv::export_exercises(&shown.presented.plan, output_path)?,
    }

    info!(format = %format, path = %output_path.display(), "Plan exported");
    Ok(())
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::bmi::classify;
    use crate::controller::ShownPlan;
    use crate::plan::fixtures::sample_plan;
    use crate::presenter::present;
    use chrono::{TimeZone, Utc};

    pub fn sample_shown_plan() -> ShownPlan {
        ShownPlan {
            presented: present(sample_plan()).unwrap(),
            bmi: classify(70.0, 170.0).ok(),
            received_at: Utc.with_ymd_and_hms(2024, 9, 2, 18, 30, 0).unwrap(),
        }
    }
}
