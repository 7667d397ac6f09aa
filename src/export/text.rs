use super::ExportError;
use crate::controller::ShownPlan;
use std::io::Write;
use std::path::Path;

/// Export a plain-text report of the plan
pub fn export_plan<P: AsRef<Path>>(shown: &ShownPlan, output_path: P) -> Result<(), ExportError> {
    let mut file = std::fs::File::create(output_path)?;
    write_report(shown, &mut file)?;
    Ok(())
}

/// Write the report to any writer
pub fn write_report<W: Write>(shown: &ShownPlan, out: &mut W) -> std::io::Result<()> {
    let plan = &shown.presented.plan;
    let macros = &shown.presented.macros;
    let rule = "=".repeat(60);
    let thin_rule = "-".repeat(60);

    writeln!(out, "{}", rule)?;
    writeln!(out, "TRAINING AND NUTRITION PLAN")?;
    writeln!(out, "{}", rule)?;
    writeln!(out, "Prepared for: {}", plan.profile.name)?;
    writeln!(
        out,
        "Generated: {}",
        shown.received_at.format("%Y-%m-%d %H:%M:%S UTC")
    )?;
    writeln!(out)?;

    writeln!(out, "PROFILE")?;
    writeln!(out, "{}", thin_rule)?;
    let reading = shown.bmi_reading();
    writeln!(out, "BMI: {} ({})", reading.value, reading.category.label())?;
    writeln!(out, "Level: {}", plan.profile.fitness_level)?;
    writeln!(out, "Frequency: {} per week", plan.profile.weekly_frequency)?;
    writeln!(out, "Goal: {}", plan.profile.goal)?;
    writeln!(out)?;

    let nutrition = &plan.nutrition;
    writeln!(out, "NUTRITION")?;
    writeln!(out, "{}", thin_rule)?;
    writeln!(out, "Daily calories: {} kcal", nutrition.daily_calories)?;
    writeln!(
        out,
        "Protein: {} g ({}%)",
        nutrition.protein_grams, macros.protein_percent
    )?;
    writeln!(
        out,
        "Carbohydrates: {} g ({}%)",
        nutrition.carbohydrate_grams, macros.carbohydrate_percent
    )?;
    writeln!(out, "Fat: {} g ({}%)", nutrition.fat_grams, macros.fat_percent)?;
    writeln!(out, "Water: {:.1} L per day", nutrition.daily_water_liters)?;
    writeln!(out, "Sleep: {:.1} hours", nutrition.sleep_hours)?;
    writeln!(out, "Meals: {} per day", nutrition.meal_count)?;
    writeln!(out)?;

    writeln!(out, "TRAINING")?;
    writeln!(out, "{}", thin_rule)?;
    for day in &plan.training {
        writeln!(out, "{} - {}", day.day, day.workout_type)?;
        for exercise in &day.exercises {
            write!(
                out,
                "  * {}: {} x {}, rest {}",
                exercise.name, exercise.sets, exercise.reps, exercise.rest
            )?;
            if let Some(notes) = &exercise.notes {
                write!(out, " ({})", notes)?;
            }
            writeln!(out)?;
        }
        writeln!(out)?;
    }

    if !plan.tips.is_empty() {
        writeln!(out, "TIPS")?;
        writeln!(out, "{}", thin_rule)?;
        for tip in &plan.tips {
            writeln!(out, "  - {}", tip)?;
        }
    }

    Ok(())
}
