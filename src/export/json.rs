use super::ExportError;
use crate::presenter::PresentedPlan;
use std::io::Write;
use std::path::Path;

/// Export the presented plan, macro shares included, as pretty JSON
pub fn export_plan<P: AsRef<Path>>(
    presented: &PresentedPlan,
    output_path: P,
) -> Result<(), ExportError> {
    let json_data = serde_json::to_string_pretty(presented)
        .map_err(|e| ExportError::SerializationError(e.to_string()))?;

    let mut file = std::fs::File::create(output_path)?;
    file.write_all(json_data.as_bytes())?;

    Ok(())
}
