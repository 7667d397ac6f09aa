use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{FitPlanError, Result};

/// BMI above which the bar marker no longer moves
pub const BAR_CEILING_BMI: Decimal = dec!(40);

/// WHO adult BMI categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    /// Category for an already rounded BMI value
    ///
    /// - Underweight: < 18.5
    /// - Normal: 18.5 - 24.9
    /// - Overweight: 25.0 - 29.9
    /// - Obese: >= 30.0
    pub fn from_bmi(bmi: Decimal) -> Self {
        if bmi < dec!(18.5) {
            BmiCategory::Underweight
        } else if bmi < dec!(25) {
            BmiCategory::Normal
        } else if bmi < dec!(30) {
            BmiCategory::Overweight
        } else {
            BmiCategory::Obese
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal weight",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A classified BMI value, rounded to one decimal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BmiReading {
    pub value: Decimal,
    pub category: BmiCategory,
}

impl BmiReading {
    /// Marker position of this reading on the 0-100 bar
    pub fn position(&self) -> Decimal {
        position(self.value)
    }
}

/// Compute and classify BMI from weight in kilograms and height in centimeters.
///
/// `bmi = weight_kg / (height_cm / 100)^2`, rounded half away from zero to
/// one decimal. The category is taken from the rounded value.
pub fn classify(weight_kg: f64, height_cm: f64) -> Result<BmiReading> {
    if !height_cm.is_finite() || height_cm <= 0.0 {
        return Err(FitPlanError::invalid_input(
            "BMI",
            format!("height must be a positive number of centimeters, got {}", height_cm),
        ));
    }
    if !weight_kg.is_finite() || weight_kg < 0.0 {
        return Err(FitPlanError::invalid_input(
            "BMI",
            format!("weight must be a non-negative number of kilograms, got {}", weight_kg),
        ));
    }

    let weight = Decimal::from_f64(weight_kg)
        .ok_or_else(|| FitPlanError::invalid_input("BMI", "weight out of range"))?;
    let height_m = Decimal::from_f64(height_cm)
        .ok_or_else(|| FitPlanError::invalid_input("BMI", "height out of range"))?
        / dec!(100);

    let raw = height_m
        .checked_mul(height_m)
        .and_then(|squared| weight.checked_div(squared))
        .ok_or_else(|| FitPlanError::invalid_input("BMI", "height too small to divide by"))?;

    let value = raw.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);

    Ok(BmiReading {
        value,
        category: BmiCategory::from_bmi(value),
    })
}

/// One colored band of the BMI bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarSegment {
    pub category: BmiCategory,
    /// Left edge on the 0-100 scale
    pub start: Decimal,
    pub width: Decimal,
}

impl BarSegment {
    pub fn end(&self) -> Decimal {
        self.start + self.width
    }
}

/// The four bands of the BMI bar; widths sum to 100
pub fn bar_segments() -> [BarSegment; 4] {
    [
        BarSegment {
            category: BmiCategory::Underweight,
            start: dec!(0),
            width: dec!(18.5),
        },
        BarSegment {
            category: BmiCategory::Normal,
            start: dec!(18.5),
            width: dec!(24.9),
        },
        BarSegment {
            category: BmiCategory::Overweight,
            start: dec!(43.4),
            width: dec!(20.0),
        },
        BarSegment {
            category: BmiCategory::Obese,
            start: dec!(63.4),
            width: dec!(36.6),
        },
    ]
}

/// Position of a BMI value on the 0-100 bar.
///
/// Each category interval is stretched linearly over its band. The obese
/// band covers BMI 30 to [`BAR_CEILING_BMI`]; anything above sits at 100.
pub fn position(bmi: Decimal) -> Decimal {
    let bmi = bmi.max(Decimal::ZERO);

    let percent = if bmi < dec!(18.5) {
        (bmi / dec!(18.5)) * dec!(18.5)
    } else if bmi < dec!(25) {
        dec!(18.5) + ((bmi - dec!(18.5)) / dec!(6.5)) * dec!(24.9)
    } else if bmi < dec!(30) {
        dec!(43.4) + ((bmi - dec!(25)) / dec!(5)) * dec!(20.0)
    } else {
        let progress = ((bmi - dec!(30)) / (BAR_CEILING_BMI - dec!(30))).min(Decimal::ONE);
        dec!(63.4) + progress * dec!(36.6)
    };

    percent.clamp(Decimal::ZERO, dec!(100))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_classify_reference_profile() {
        // 70 / 1.7^2 = 24.22
        let reading = classify(70.0, 170.0).unwrap();
        assert_eq!(reading.value, dec!(24.2));
        assert_eq!(reading.category, BmiCategory::Normal);
    }

    #[test]
    fn test_classify_category_boundaries() {
        // 53.5 / 1.7^2 = 18.51 -> 18.5
        assert_eq!(classify(53.5, 170.0).unwrap().category, BmiCategory::Normal);
        // 53.4 / 1.7^2 = 18.48 -> 18.5, classified on the rounded value
        assert_eq!(classify(53.4, 170.0).unwrap().value, dec!(18.5));
        assert_eq!(classify(50.0, 170.0).unwrap().category, BmiCategory::Underweight);
        assert_eq!(classify(80.0, 170.0).unwrap().category, BmiCategory::Overweight);
        assert_eq!(classify(100.0, 170.0).unwrap().category, BmiCategory::Obese);
        // 25.0 exactly: 72.25 / 1.7^2
        assert_eq!(classify(72.25, 170.0).unwrap().value, dec!(25.0));
        assert_eq!(classify(72.25, 170.0).unwrap().category, BmiCategory::Overweight);
    }

    #[test]
    fn test_classify_rounds_half_away_from_zero() {
        // 24.25 exactly: 24.25 kg at 100 cm
        assert_eq!(classify(24.25, 100.0).unwrap().value, dec!(24.3));
        assert_eq!(classify(24.35, 100.0).unwrap().value, dec!(24.4));
    }

    #[test]
    fn test_classify_rejects_bad_height() {
        assert!(matches!(
            classify(70.0, 0.0),
            Err(FitPlanError::InvalidInput { .. })
        ));
        assert!(classify(70.0, -170.0).is_err());
        assert!(classify(70.0, f64::NAN).is_err());
        assert!(classify(f64::INFINITY, 170.0).is_err());
    }

    #[test]
    fn test_position_reference_points() {
        assert_eq!(position(dec!(22.0)).round_dp(1), dec!(31.9));
        assert_eq!(position(dec!(35.0)), dec!(81.7));
        assert_eq!(position(dec!(50.0)), position(dec!(40.0)));
        assert_eq!(position(dec!(40.0)), dec!(100));
        assert_eq!(position(dec!(18.5)), dec!(18.5));
        assert_eq!(position(dec!(25)), dec!(43.4));
        assert_eq!(position(dec!(30)), dec!(63.4));
        assert_eq!(position(dec!(-4)), Decimal::ZERO);
    }

    #[test]
    fn test_bar_segments_cover_scale() {
        let segments = bar_segments();
        let total: Decimal = segments.iter().map(|s| s.width).sum();
        assert_eq!(total, dec!(100));

        for pair in segments.windows(2) {
            assert_eq!(pair[0].end(), pair[1].start);
        }
        assert_eq!(segments[3].end(), dec!(100));
    }

    proptest! {
        #[test]
        fn test_underweight_stays_in_first_band(tenths in 0i64..185) {
            let bmi = Decimal::new(tenths, 1);
            prop_assert_eq!(BmiCategory::from_bmi(bmi), BmiCategory::Underweight);
            let pos = position(bmi);
            prop_assert!(pos >= Decimal::ZERO && pos < dec!(18.5));
        }

        #[test]
        fn test_position_bounded_and_monotonic(a in 0i64..1000, b in 0i64..1000) {
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            let low_pos = position(Decimal::new(low, 1));
            let high_pos = position(Decimal::new(high, 1));
            prop_assert!(low_pos >= Decimal::ZERO && high_pos <= dec!(100));
            prop_assert!(low_pos <= high_pos);
        }

        #[test]
        fn test_classify_matches_position_band(weight in 30.0f64..200.0, height in 140.0f64..210.0) {
            let reading = classify(weight, height).unwrap();
            let pos = reading.position();
            let segment = bar_segments()
                .into_iter()
                .find(|s| s.category == reading.category)
                .unwrap();
            prop_assert!(pos >= segment.start);
            prop_assert!(pos <= segment.end());
        }
    }
}
