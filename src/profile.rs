use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{FieldError, ValidationErrors};
use crate::injury::{Injury, InjuryType, InjuryZone};

/// A closed set of literal values a form field can take.
///
/// `as_str` is the wire value sent to the recommendation service,
/// `label` is what the form shows.
pub trait Choice: Sized + Copy + 'static {
    /// Profile field this choice belongs to, used in error messages
    const FIELD: &'static str;
    const ALL: &'static [Self];

    fn as_str(self) -> &'static str;

    fn label(self) -> &'static str;

    /// Case-insensitive parse; `-` and spaces are read as `_`
    fn parse(raw: &str) -> Result<Self, FieldError> {
        let key = raw.trim().to_lowercase().replace(['-', ' '], "_");
        Self::ALL
            .iter()
            .copied()
            .find(|choice| choice.as_str() == key)
            .ok_or_else(|| {
                let expected = Self::ALL
                    .iter()
                    .map(|choice| choice.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                FieldError::new(
                    Self::FIELD,
                    format!("unknown value '{}', expected one of: {}", raw.trim(), expected),
                )
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    #[default]
    Male,
    Female,
}

/// Self-reported training experience
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitnessLevel {
    /// Less than 6 months of training
    #[default]
    Novice,
    /// 6 months to 2 years
    Intermediate,
    /// More than 2 years
    Advanced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    #[default]
    GainMuscle,
    LoseFat,
    Maintain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentAccess {
    #[default]
    FullGym,
    Bodyweight,
    HomeTraining,
}

/// Everything the user enters on the form.
///
/// This is also the outbound request body: field names and enum values are
/// serialized exactly as the recommendation service expects them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileModel {
    pub name: String,
    pub age: u32,
    pub sex: Sex,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub fitness_level: FitnessLevel,
    pub goal: Goal,
    /// Training days per week, 1 to 7
    pub weekly_frequency: u8,
    pub equipment_access: EquipmentAccess,
    #[serde(default)]
    pub injury: Injury,
}

impl Default for ProfileModel {
    fn default() -> Self {
        ProfileModel {
            name: String::new(),
            age: 25,
            sex: Sex::Male,
            weight_kg: 70.0,
            height_cm: 170.0,
            fitness_level: FitnessLevel::Novice,
            goal: Goal::GainMuscle,
            weekly_frequency: 3,
            equipment_access: EquipmentAccess::FullGym,
            injury: Injury::none(),
        }
    }
}

impl ProfileModel {
    /// Check every field constraint, collecting all violations
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.name.trim().is_empty() {
            errors.push(FieldError::new(ProfileField::Name.as_str(), "must not be empty"));
        }

        if !(self.weight_kg.is_finite() && self.weight_kg > 0.0) {
            errors.push(FieldError::new(
                ProfileField::WeightKg.as_str(),
                "must be greater than zero",
            ));
        }

        if !(self.height_cm.is_finite() && self.height_cm > 0.0) {
            errors.push(FieldError::new(
                ProfileField::HeightCm.as_str(),
                "must be greater than zero",
            ));
        }

        if !(1..=7).contains(&self.weekly_frequency) {
            errors.push(FieldError::new(
                ProfileField::WeeklyFrequency.as_str(),
                "must be between 1 and 7 days",
            ));
        }

        if let Err(e) = self.injury.validate() {
            errors.push(e);
        }

        errors.into_result()
    }

    /// Assign one field. Only the controller edits a live profile.
    pub(crate) fn apply(&mut self, edit: ProfileEdit) -> Result<(), FieldError> {
        match edit {
            ProfileEdit::Name(name) => self.name = name,
            ProfileEdit::Age(age) => self.age = age,
            ProfileEdit::Sex(sex) => self.sex = sex,
            ProfileEdit::WeightKg(weight) => self.weight_kg = weight,
            ProfileEdit::HeightCm(height) => self.height_cm = height,
            ProfileEdit::FitnessLevel(level) => self.fitness_level = level,
            ProfileEdit::Goal(goal) => self.goal = goal,
            ProfileEdit::WeeklyFrequency(days) => self.weekly_frequency = days,
            ProfileEdit::EquipmentAccess(access) => self.equipment_access = access,
            ProfileEdit::InjuryType(kind) => {
                self.injury.change_type(kind);
            }
            ProfileEdit::InjuryZone(zone) => self.injury.select_zone(zone)?,
        }
        Ok(())
    }
}

/// Addressable form fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileField {
    Name,
    Age,
    Sex,
    WeightKg,
    HeightCm,
    FitnessLevel,
    Goal,
    WeeklyFrequency,
    EquipmentAccess,
    InjuryType,
    InjuryZone,
}

impl ProfileField {
    pub const ALL: [ProfileField; 11] = [
        ProfileField::Name,
        ProfileField::Age,
        ProfileField::Sex,
        ProfileField::WeightKg,
        ProfileField::HeightCm,
        ProfileField::FitnessLevel,
        ProfileField::Goal,
        ProfileField::WeeklyFrequency,
        ProfileField::EquipmentAccess,
        ProfileField::InjuryType,
        ProfileField::InjuryZone,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ProfileField::Name => "name",
            ProfileField::Age => "age",
            ProfileField::Sex => "sex",
            ProfileField::WeightKg => "weight_kg",
            ProfileField::HeightCm => "height_cm",
            ProfileField::FitnessLevel => "fitness_level",
            ProfileField::Goal => "goal",
            ProfileField::WeeklyFrequency => "weekly_frequency",
            ProfileField::EquipmentAccess => "equipment_access",
            ProfileField::InjuryType => "injury.type",
            ProfileField::InjuryZone => "injury.zone",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ProfileField::Name => "Name",
            ProfileField::Age => "Age",
            ProfileField::Sex => "Sex",
            ProfileField::WeightKg => "Weight (kg)",
            ProfileField::HeightCm => "Height (cm)",
            ProfileField::FitnessLevel => "Fitness level",
            ProfileField::Goal => "Goal",
            ProfileField::WeeklyFrequency => "Days per week",
            ProfileField::EquipmentAccess => "Equipment",
            ProfileField::InjuryType => "Injury",
            ProfileField::InjuryZone => "Injury zone",
        }
    }
}

impl fmt::Display for ProfileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProfileField {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "name" => Ok(ProfileField::Name),
            "age" => Ok(ProfileField::Age),
            "sex" => Ok(ProfileField::Sex),
            "weight" | "weight_kg" => Ok(ProfileField::WeightKg),
            "height" | "height_cm" => Ok(ProfileField::HeightCm),
            "level" | "fitness_level" => Ok(ProfileField::FitnessLevel),
            "goal" => Ok(ProfileField::Goal),
            "frequency" | "weekly_frequency" => Ok(ProfileField::WeeklyFrequency),
            "equipment" | "equipment_access" => Ok(ProfileField::EquipmentAccess),
            "injury" | "injury.type" | "injury_type" => Ok(ProfileField::InjuryType),
            "zone" | "injury.zone" | "injury_zone" => Ok(ProfileField::InjuryZone),
            other => Err(FieldError::new(other, "unknown field")),
        }
    }
}

/// One field assignment coming from the form
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileEdit {
    Name(String),
    Age(u32),
    Sex(Sex),
    WeightKg(f64),
    HeightCm(f64),
    FitnessLevel(FitnessLevel),
    Goal(Goal),
    WeeklyFrequency(u8),
    EquipmentAccess(EquipmentAccess),
    InjuryType(InjuryType),
    InjuryZone(InjuryZone),
}

impl ProfileEdit {
    pub fn field(&self) -> ProfileField {
        match self {
            ProfileEdit::Name(_) => ProfileField::Name,
            ProfileEdit::Age(_) => ProfileField::Age,
            ProfileEdit::Sex(_) => ProfileField::Sex,
            ProfileEdit::WeightKg(_) => ProfileField::WeightKg,
            ProfileEdit::HeightCm(_) => ProfileField::HeightCm,
            ProfileEdit::FitnessLevel(_) => ProfileField::FitnessLevel,
            ProfileEdit::Goal(_) => ProfileField::Goal,
            ProfileEdit::WeeklyFrequency(_) => ProfileField::WeeklyFrequency,
            ProfileEdit::EquipmentAccess(_) => ProfileField::EquipmentAccess,
            ProfileEdit::InjuryType(_) => ProfileField::InjuryType,
            ProfileEdit::InjuryZone(_) => ProfileField::InjuryZone,
        }
    }

    /// Build an edit from raw text typed into a field.
    ///
    /// Numbers that fail to parse become zero so typing never blocks;
    /// zero is then caught by validation on submit. Choice fields must
    /// name a known value.
    pub fn from_text(field: ProfileField, raw: &str) -> Result<Self, FieldError> {
        let text = raw.trim();
        let edit = match field {
            ProfileField::Name => ProfileEdit::Name(raw.to_string()),
            ProfileField::Age => ProfileEdit::Age(text.parse().unwrap_or(0)),
            ProfileField::Sex => ProfileEdit::Sex(Sex::parse(text)?),
            ProfileField::WeightKg => ProfileEdit::WeightKg(parse_real(text)),
            ProfileField::HeightCm => ProfileEdit::HeightCm(parse_real(text)),
            ProfileField::FitnessLevel => ProfileEdit::FitnessLevel(FitnessLevel::parse(text)?),
            ProfileField::Goal => ProfileEdit::Goal(Goal::parse(text)?),
            ProfileField::WeeklyFrequency => {
                ProfileEdit::WeeklyFrequency(text.parse().unwrap_or(0))
            }
            ProfileField::EquipmentAccess => {
                ProfileEdit::EquipmentAccess(EquipmentAccess::parse(text)?)
            }
            ProfileField::InjuryType => ProfileEdit::InjuryType(InjuryType::parse(text)?),
            ProfileField::InjuryZone => ProfileEdit::InjuryZone(InjuryZone::parse(text)?),
        };
        Ok(edit)
    }
}

fn parse_real(text: &str) -> f64 {
    text.replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

impl Choice for Sex {
    const FIELD: &'static str = "sex";
    const ALL: &'static [Self] = &[Sex::Male, Sex::Female];

    fn as_str(self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Sex::Male => "Male",
            Sex::Female => "Female",
        }
    }
}

impl Choice for FitnessLevel {
    const FIELD: &'static str = "fitness_level";
    const ALL: &'static [Self] = &[
        FitnessLevel::Novice,
        FitnessLevel::Intermediate,
        FitnessLevel::Advanced,
    ];

    fn as_str(self) -> &'static str {
        match self {
            FitnessLevel::Novice => "novice",
            FitnessLevel::Intermediate => "intermediate",
            FitnessLevel::Advanced => "advanced",
        }
    }

    fn label(self) -> &'static str {
        match self {
            FitnessLevel::Novice => "Novice (< 6 months)",
            FitnessLevel::Intermediate => "Intermediate (6 months - 2 years)",
            FitnessLevel::Advanced => "Advanced (> 2 years)",
        }
    }
}

impl Choice for Goal {
    const FIELD: &'static str = "goal";
    const ALL: &'static [Self] = &[Goal::GainMuscle, Goal::LoseFat, Goal::Maintain];

    fn as_str(self) -> &'static str {
        match self {
            Goal::GainMuscle => "gain_muscle",
            Goal::LoseFat => "lose_fat",
            Goal::Maintain => "maintain",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Goal::GainMuscle => "Gain muscle",
            Goal::LoseFat => "Lose fat",
            Goal::Maintain => "Maintain",
        }
    }
}

impl Choice for EquipmentAccess {
    const FIELD: &'static str = "equipment_access";
    const ALL: &'static [Self] = &[
        EquipmentAccess::FullGym,
        EquipmentAccess::Bodyweight,
        EquipmentAccess::HomeTraining,
    ];

    fn as_str(self) -> &'static str {
        match self {
            EquipmentAccess::FullGym => "full_gym",
            EquipmentAccess::Bodyweight => "bodyweight",
            EquipmentAccess::HomeTraining => "home_training",
        }
    }

    fn label(self) -> &'static str {
        match self {
            EquipmentAccess::FullGym => "Full gym",
            EquipmentAccess::Bodyweight => "Bodyweight",
            EquipmentAccess::HomeTraining => "Home training",
        }
    }
}

macro_rules! choice_text_impls {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }

            impl FromStr for $ty {
                type Err = FieldError;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    <$ty as Choice>::parse(s)
                }
            }
        )*
    };
}

choice_text_impls!(Sex, FitnessLevel, Goal, EquipmentAccess);

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_profile() -> ProfileModel {
        ProfileModel {
            name: "Ana".to_string(),
            ..ProfileModel::default()
        }
    }

    #[test]
    fn test_defaults() {
        let profile = ProfileModel::default();
        assert_eq!(profile.age, 25);
        assert_eq!(profile.weekly_frequency, 3);
        assert_eq!(profile.injury, Injury::none());

        // Only the empty name blocks a default profile
        let errors = profile.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.for_field("name").is_some());
    }

    #[test]
    fn test_validation_collects_every_field() {
        let mut profile = valid_profile();
        assert!(profile.validate().is_ok());

        profile.weight_kg = 0.0;
        profile.height_cm = -3.0;
        profile.weekly_frequency = 8;
        profile.name = "   ".to_string();

        let errors = profile.validate().unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.for_field("weight_kg").is_some());
        assert!(errors.for_field("height_cm").is_some());
        assert!(errors.for_field("weekly_frequency").is_some());
    }

    #[test]
    fn test_validation_requires_injury_zone() {
        let mut profile = valid_profile();
        profile.apply(ProfileEdit::InjuryType(InjuryType::Fracture)).unwrap();

        let errors = profile.validate().unwrap_err();
        assert!(errors.for_field("injury.zone").is_some());

        profile.apply(ProfileEdit::InjuryZone(InjuryZone::Wrist)).unwrap();
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn test_from_text_degrades_numbers_to_zero() {
        assert_eq!(
            ProfileEdit::from_text(ProfileField::Age, "abc").unwrap(),
            ProfileEdit::Age(0)
        );
        assert_eq!(
            ProfileEdit::from_text(ProfileField::WeightKg, "").unwrap(),
            ProfileEdit::WeightKg(0.0)
        );
        assert_eq!(
            ProfileEdit::from_text(ProfileField::HeightCm, "172,5").unwrap(),
            ProfileEdit::HeightCm(172.5)
        );
        assert_eq!(
            ProfileEdit::from_text(ProfileField::WeeklyFrequency, "99999").unwrap(),
            ProfileEdit::WeeklyFrequency(0)
        );
        assert!(ProfileEdit::from_text(ProfileField::Goal, "get huge").is_err());
    }

    #[test]
    fn test_field_aliases() {
        assert_eq!("weight".parse::<ProfileField>().unwrap(), ProfileField::WeightKg);
        assert_eq!("injury-zone".parse::<ProfileField>().unwrap(), ProfileField::InjuryZone);
        assert!("shoe_size".parse::<ProfileField>().is_err());
        for field in ProfileField::ALL {
            assert_eq!(field.as_str().parse::<ProfileField>().unwrap(), field);
        }
    }

    #[test]
    fn test_request_body_shape() {
        let mut profile = valid_profile();
        profile.apply(ProfileEdit::Goal(Goal::LoseFat)).unwrap();
        profile.apply(ProfileEdit::InjuryType(InjuryType::Tear)).unwrap();
        profile.apply(ProfileEdit::InjuryZone(InjuryZone::Calves)).unwrap();

        let body = serde_json::to_value(&profile).unwrap();
        assert_eq!(body["name"], "Ana");
        assert_eq!(body["goal"], "lose_fat");
        assert_eq!(body["fitness_level"], "novice");
        assert_eq!(body["equipment_access"], "full_gym");
        assert_eq!(body["weekly_frequency"], 3);
        assert_eq!(body["injury"]["type"], "tear");
        assert_eq!(body["injury"]["zone"], "calves");
    }

    #[test]
    fn test_choice_parse() {
        assert_eq!("Home Training".parse::<EquipmentAccess>().unwrap(), EquipmentAccess::HomeTraining);
        assert_eq!("gain-muscle".parse::<Goal>().unwrap(), Goal::GainMuscle);
        let err = "robot".parse::<Sex>().unwrap_err();
        assert_eq!(err.field, "sex");
        assert!(err.reason.contains("male, female"));
    }
}
