use super::ExportError;
use crate::plan::Plan;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
struct ExerciseRow<'a> {
    day: &'a str,
    workout_type: &'a str,
    exercise: &'a str,
    sets: u32,
    reps: &'a str,
    rest: &'a str,
    notes: &'a str,
}

/// Export the training schedule, one row per exercise
pub fn export_exercises<P: AsRef<Path>>(plan: &Plan, output_path: P) -> Result<(), ExportError> {
    let mut writer = ::csv::Writer::from_path(output_path)?;

    for day in &plan.training {
        for exercise in &day.exercises {
            writer.serialize(ExerciseRow {
                day: &day.day,
                workout_type: &day.workout_type,
                exercise: &exercise.name,
                sets: exercise.sets,
                reps: &exercise.reps,
                rest: &exercise.rest,
                notes: exercise.notes.as_deref().unwrap_or(""),
            })?;
        }
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::fixtures::sample_plan;
    use tempfile::NamedTempFile;

    #[test]
    fn test_export_exercises_csv() {
        let temp_file = NamedTempFile::new().unwrap();
        export_exercises(&sample_plan(), temp_file.path()).unwrap();

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "day,workout_type,exercise,sets,reps,rest,notes");
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], "Monday,Full Body A,Goblet squat,3,8-12,90s,Keep the chest up");
        assert_eq!(lines[3], "Wednesday,Full Body B,Romanian deadlift,3,8-10,2min,");
    }

    #[test]
    fn test_export_quotes_commas() {
        let mut plan = sample_plan();
        plan.training[0].exercises[0].notes = Some("Slow, controlled".to_string());

        let temp_file = NamedTempFile::new().unwrap();
        export_exercises(&plan, temp_file.path()).unwrap();

        let mut reader = ::csv::Reader::from_path(temp_file.path()).unwrap();
        let first = reader.records().next().unwrap().unwrap();
        assert_eq!(&first[6], "Slow, controlled");
    }
}
