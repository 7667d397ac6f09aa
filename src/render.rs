//! Terminal views: the profile form, the BMI bar and the results page
//!
//! Every function returns a `String` so callers decide where it goes.

use colored::*;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::fmt::Write as _;
use tabled::{settings::Style, Table, Tabled};

use crate::bmi::{self, bar_segments, BmiCategory, BmiReading};
use crate::controller::{FormController, Phase, ShownPlan};
use crate::injury::{zone_options, zone_prompt, InjuryType};
use crate::plan::TrainingDay;
use crate::profile::{Choice, ProfileField, ProfileModel};

/// Width of the BMI bar in terminal columns
pub const BAR_WIDTH: usize = 50;

/// Color used for a BMI category everywhere it is shown
pub fn category_color(category: BmiCategory) -> Color {
    match category {
        BmiCategory::Underweight | BmiCategory::Overweight => Color::Yellow,
        BmiCategory::Normal => Color::Green,
        BmiCategory::Obese => Color::Red,
    }
}

/// One-line description of a training split label
pub fn workout_type_hint(label: &str) -> &'static str {
    let label = label.to_lowercase();
    if label.contains("full body") {
        "Works every major muscle group in one session"
    } else if label.contains("upper") {
        "Chest, back, shoulders and arms"
    } else if label.contains("lower") {
        "Quadriceps, hamstrings, glutes and calves"
    } else if label.contains("push") {
        "Chest, shoulders and triceps"
    } else if label.contains("pull") {
        "Back, rear delts and biceps"
    } else if label.contains("legs") || label.contains("leg") {
        "Leg-focused session"
    } else {
        "Session tailored to your goal"
    }
}

/// The BMI bar with a marker over `value`
pub fn bmi_bar(value: Decimal) -> String {
    let segments = bar_segments();
    let column_span = dec!(100) / Decimal::from(BAR_WIDTH);
    let marker = (bmi::position(value) / column_span)
        .floor()
        .to_usize()
        .unwrap_or(0)
        .min(BAR_WIDTH - 1);

    let mut out = String::new();
    let _ = writeln!(out, "{}{}", " ".repeat(marker), "▼".bold());

    for column in 0..BAR_WIDTH {
        let midpoint = (Decimal::from(column) + dec!(0.5)) * column_span;
        let category = segments
            .iter()
            .find(|segment| midpoint < segment.end())
            .map(|segment| segment.category)
            .unwrap_or(BmiCategory::Obese);
        out.push_str(&"█".color(category_color(category)).to_string());
    }
    out.push('\n');

    let _ = write!(out, "{:<18}{:<13}{:<10}{:>9}", "18.5", "25", "30", "40+");
    out
}

/// BMI value, category and bar
pub fn render_bmi(reading: &BmiReading) -> String {
    let color = category_color(reading.category);
    format!(
        "BMI {} {}\n{}",
        reading.value.to_string().color(color).bold(),
        format!("({})", reading.category.label()).color(color),
        bmi_bar(reading.value)
    )
}

fn field_value(profile: &ProfileModel, field: ProfileField) -> String {
    match field {
        ProfileField::Name => profile.name.clone(),
        ProfileField::Age => profile.age.to_string(),
        ProfileField::Sex => profile.sex.label().to_string(),
        ProfileField::WeightKg => format!("{} kg", profile.weight_kg),
        ProfileField::HeightCm => format!("{} cm", profile.height_cm),
        ProfileField::FitnessLevel => profile.fitness_level.label().to_string(),
        ProfileField::Goal => profile.goal.label().to_string(),
        ProfileField::WeeklyFrequency => format!("{} days/week", profile.weekly_frequency),
        ProfileField::EquipmentAccess => profile.equipment_access.label().to_string(),
        ProfileField::InjuryType => profile.injury.kind().label().to_string(),
        ProfileField::InjuryZone => profile.injury.zone().label().to_string(),
    }
}

/// The profile form with live BMI, zone choices, field errors and the last
/// failure message
pub fn render_form(controller: &FormController) -> String {
    let profile = controller.profile();
    let errors = controller.validation_errors();
    let mut out = String::new();

    let _ = writeln!(out, "{}", "Your profile".bold().underline());
    for field in ProfileField::ALL {
        let value = field_value(profile, field);
        let line = format!("  {:<18} {}", format!("{}:", field.label()), value);
        match errors.as_ref().and_then(|e| e.for_field(field.as_str())) {
            Some(error) => {
                let _ = writeln!(out, "{}  {}", line, format!("! {}", error.reason).red());
            }
            None => {
                let _ = writeln!(out, "{}", line);
            }
        }
    }

    let injury_type = profile.injury.kind();
    if injury_type != InjuryType::None {
        let options = zone_options(injury_type)
            .iter()
            .map(|zone| zone.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(out, "  {} options: {}", zone_prompt(injury_type), options.dimmed());
    }

    let _ = writeln!(out);
    match controller.bmi() {
        Ok(reading) => {
            let _ = writeln!(out, "{}", render_bmi(&reading));
        }
        Err(_) => {
            let _ = writeln!(out, "{}", "BMI unavailable until weight and height are set".dimmed());
        }
    }

    match controller.phase() {
        Phase::Failed(message) => {
            let _ = writeln!(out, "\n{} {}", "Error:".red().bold(), message);
        }
        Phase::Submitting => {
            let _ = writeln!(out, "\n{}", "Generating your plan...".cyan());
        }
        _ => {}
    }

    out
}

#[derive(Tabled)]
struct CardRow {
    #[tabled(rename = "")]
    label: &'static str,
    #[tabled(rename = "")]
    value: String,
}

#[derive(Tabled)]
struct ExerciseRow<'a> {
    #[tabled(rename = "Exercise")]
    name: &'a str,
    #[tabled(rename = "Sets")]
    sets: u32,
    #[tabled(rename = "Reps")]
    reps: &'a str,
    #[tabled(rename = "Rest")]
    rest: &'a str,
    #[tabled(rename = "Notes")]
    notes: &'a str,
}

fn render_day(day: &TrainingDay) -> String {
    let rows: Vec<ExerciseRow<'_>> = day
        .exercises
        .iter()
        .map(|exercise| ExerciseRow {
            name: &exercise.name,
            sets: exercise.sets,
            reps: &exercise.reps,
            rest: &exercise.rest,
            notes: exercise.notes.as_deref().unwrap_or(""),
        })
        .collect();

    format!(
        "{} {}\n{}\n{}",
        day.day.bold(),
        format!("- {}", day.workout_type).cyan(),
        workout_type_hint(&day.workout_type).dimmed(),
        Table::new(rows).with(Style::rounded())
    )
}

/// The full results page for a received plan
pub fn render_results(shown: &ShownPlan) -> String {
    let plan = &shown.presented.plan;
    let macros = &shown.presented.macros;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{}",
        format!("Hello, {}! Here is your personalized plan.", plan.profile.name)
            .green()
            .bold()
    );
    let _ = writeln!(out);

    let reading = shown.bmi_reading();
    let cards = vec![
        CardRow {
            label: "BMI",
            value: reading.value.to_string(),
        },
        CardRow {
            label: "Category",
            value: reading.category.label().to_string(),
        },
        CardRow {
            label: "Level",
            value: plan.profile.fitness_level.clone(),
        },
        CardRow {
            label: "Frequency",
            value: plan.profile.weekly_frequency.clone(),
        },
        CardRow {
            label: "Goal",
            value: plan.profile.goal.clone(),
        },
    ];
    let _ = writeln!(out, "{}", Table::new(cards).with(Style::rounded()));
    let _ = writeln!(
        out,
        "{}",
        reading
            .category
            .label()
            .color(category_color(reading.category))
            .bold()
    );
    let _ = writeln!(out, "{}", bmi_bar(reading.value));
    let _ = writeln!(out);

    let nutrition = &plan.nutrition;
    let _ = writeln!(out, "{}", "Nutrition".bold().underline());
    let nutrition_rows = vec![
        CardRow {
            label: "Calories",
            value: format!("{} kcal", nutrition.daily_calories),
        },
        CardRow {
            label: "Protein",
            value: format!("{} g ({}%)", nutrition.protein_grams, macros.protein_percent),
        },
        CardRow {
            label: "Carbohydrates",
            value: format!(
                "{} g ({}%)",
                nutrition.carbohydrate_grams, macros.carbohydrate_percent
            ),
        },
        CardRow {
            label: "Fat",
            value: format!("{} g ({}%)", nutrition.fat_grams, macros.fat_percent),
        },
        CardRow {
            label: "Water",
            value: format!("{:.1} L", nutrition.daily_water_liters),
        },
        CardRow {
            label: "Sleep",
            value: format!("{:.1} h", nutrition.sleep_hours),
        },
        CardRow {
            label: "Meals",
            value: nutrition.meal_count.to_string(),
        },
    ];
    let _ = writeln!(out, "{}", Table::new(nutrition_rows).with(Style::rounded()));
    let _ = writeln!(out);

    let _ = writeln!(out, "{}", "Training".bold().underline());
    for day in &plan.training {
        let _ = writeln!(out, "{}\n", render_day(day));
    }

    if !plan.tips.is_empty() {
        let _ = writeln!(out, "{}", "Tips".bold().underline());
        for tip in &plan.tips {
            let _ = writeln!(out, "  • {}", tip);
        }
    }

    out
}
