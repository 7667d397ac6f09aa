use serde::{Deserialize, Serialize};

/// Profile echo computed by the recommendation service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub name: String,
    /// BMI rounded to one decimal
    pub bmi: f64,
    pub bmi_category: String,
    pub fitness_level: String,
    /// e.g. "3x"
    pub weekly_frequency: String,
    pub goal: String,
}

/// Daily nutrition targets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionPlan {
    pub daily_calories: i64,
    pub daily_water_liters: f64,
    pub sleep_hours: f64,
    pub meal_count: u32,
    pub protein_grams: u32,
    pub carbohydrate_grams: u32,
    pub fat_grams: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub name: String,
    pub sets: u32,
    /// Free text, e.g. "8-12"
    pub reps: String,
    /// Free text, e.g. "90s"
    pub rest: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// One training day of the weekly plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingDay {
    pub day: String,
    pub workout_type: String,
    pub exercises: Vec<Exercise>,
}

/// Recommendation returned by the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub profile: ProfileSummary,
    pub nutrition: NutritionPlan,
    pub training: Vec<TrainingDay>,
    pub tips: Vec<String>,
}

impl Plan {
    pub fn exercise_count(&self) -> usize {
        self.training.iter().map(|day| day.exercises.len()).sum()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn sample_plan() -> Plan {
        Plan {
            profile: ProfileSummary {
                name: "Ana".to_string(),
                bmi: 24.2,
                bmi_category: "Normal weight".to_string(),
                fitness_level: "Novice".to_string(),
                weekly_frequency: "3x".to_string(),
                goal: "Gain muscle".to_string(),
            },
            nutrition: NutritionPlan {
                daily_calories: 2500,
                daily_water_liters: 2.5,
                sleep_hours: 8.0,
                meal_count: 4,
                protein_grams: 150,
                carbohydrate_grams: 300,
                fat_grams: 70,
            },
            training: vec![
                TrainingDay {
                    day: "Monday".to_string(),
                    workout_type: "Full Body A".to_string(),
                    exercises: vec![
                        Exercise {
                            name: "Goblet squat".to_string(),
                            sets: 3,
                            reps: "8-12".to_string(),
                            rest: "90s".to_string(),
                            notes: Some("Keep the chest up".to_string()),
                        },
                        Exercise {
                            name: "Push-up".to_string(),
                            sets: 3,
                            reps: "10-15".to_string(),
                            rest: "60s".to_string(),
                            notes: None,
                        },
                    ],
                },
                TrainingDay {
                    day: "Wednesday".to_string(),
                    workout_type: "Full Body B".to_string(),
                    exercises: vec![Exercise {
                        name: "Romanian deadlift".to_string(),
                        sets: 3,
                        reps: "8-10".to_string(),
                        rest: "2min".to_string(),
                        notes: None,
                    }],
                },
            ],
            tips: vec![
                "Drink water throughout the day".to_string(),
                "Sleep at least 7 hours".to_string(),
            ],
        }
    }
}
