//! Display-ready view of a received plan
//!
//! The only derived quantities are the macronutrient shares of the daily
//! calorie target; everything else is handed to the renderer untouched.

use serde::{Deserialize, Serialize};

use crate::error::{FitPlanError, Result};
use crate::plan::Plan;

pub const PROTEIN_KCAL_PER_GRAM: u32 = 4;
pub const CARBOHYDRATE_KCAL_PER_GRAM: u32 = 4;
pub const FAT_KCAL_PER_GRAM: u32 = 9;

/// Share of daily calories per macronutrient, in whole percent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroShares {
    pub protein_percent: i64,
    pub carbohydrate_percent: i64,
    pub fat_percent: i64,
}

/// A plan together with its derived display values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresentedPlan {
    pub plan: Plan,
    pub macros: MacroShares,
}

/// Derive display values for `plan`.
///
/// Fails with `InvalidInput` if the plan's daily calories are not positive.
pub fn present(plan: Plan) -> Result<PresentedPlan> {
    let calories = plan.nutrition.daily_calories;
    let macros = MacroShares {
        protein_percent: percent_share(
            plan.nutrition.protein_grams,
            PROTEIN_KCAL_PER_GRAM,
            calories,
        )?,
        carbohydrate_percent: percent_share(
            plan.nutrition.carbohydrate_grams,
            CARBOHYDRATE_KCAL_PER_GRAM,
            calories,
        )?,
        fat_percent: percent_share(plan.nutrition.fat_grams, FAT_KCAL_PER_GRAM, calories)?,
    };

    Ok(PresentedPlan { plan, macros })
}

/// `round(grams * kcal_per_gram / daily_calories * 100)`, rounding halves up.
///
/// Computed in integers so shares that land exactly on .5 round the same
/// way every time.
pub fn percent_share(grams: u32, kcal_per_gram: u32, daily_calories: i64) -> Result<i64> {
    if daily_calories <= 0 {
        return Err(FitPlanError::invalid_input(
            "macro share",
            format!("daily calories must be positive, got {}", daily_calories),
        ));
    }

    let scaled_kcal = i64::from(grams) * i64::from(kcal_per_gram) * 100;
    Ok((2 * scaled_kcal + daily_calories) / (2 * daily_calories))
}
