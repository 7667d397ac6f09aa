//! Injury type and zone selection
//!
//! Every injury type belongs to one [`InjuryCategory`], and the category alone
//! decides which zones may be selected. [`resolve`] reconciles a previously
//! chosen zone when the type changes; the form's zone options come from
//! [`zone_options`] and nowhere else.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::FieldError;
use crate::profile::Choice;

/// Kind of injury reported by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InjuryType {
    #[default]
    None,
    Injury,
    Fracture,
    Fissure,
    Tear,
    Discomfort,
    Pain,
}

/// Coarse grouping that determines the permitted zone vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InjuryCategory {
    None,
    /// injury, fracture, fissure: joints and regions
    Structural,
    /// tear: muscles
    MuscularTear,
    /// discomfort, pain: muscles and joints
    PainOrDiscomfort,
}

/// Body zone affected by the injury
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InjuryZone {
    #[default]
    None,
    // joints and regions
    Shoulder,
    Elbow,
    Wrist,
    LowerBack,
    Hip,
    Knee,
    Ankle,
    // muscles
    Biceps,
    Triceps,
    Pectoral,
    Lats,
    Deltoid,
    Quadriceps,
    Hamstrings,
    Calves,
}

pub const JOINT_ZONES: [InjuryZone; 7] = [
    InjuryZone::Shoulder,
    InjuryZone::Elbow,
    InjuryZone::Wrist,
    InjuryZone::LowerBack,
    InjuryZone::Hip,
    InjuryZone::Knee,
    InjuryZone::Ankle,
];

pub const MUSCLE_ZONES: [InjuryZone; 8] = [
    InjuryZone::Biceps,
    InjuryZone::Triceps,
    InjuryZone::Pectoral,
    InjuryZone::Lats,
    InjuryZone::Deltoid,
    InjuryZone::Quadriceps,
    InjuryZone::Hamstrings,
    InjuryZone::Calves,
];

/// Muscles first, then joints, the order the form lists them in
const PAIN_ZONES: [InjuryZone; 15] = [
    InjuryZone::Biceps,
    InjuryZone::Triceps,
    InjuryZone::Pectoral,
    InjuryZone::Lats,
    InjuryZone::Deltoid,
    InjuryZone::Quadriceps,
    InjuryZone::Hamstrings,
    InjuryZone::Calves,
    InjuryZone::Shoulder,
    InjuryZone::Elbow,
    InjuryZone::Wrist,
    InjuryZone::LowerBack,
    InjuryZone::Hip,
    InjuryZone::Knee,
    InjuryZone::Ankle,
];

const NO_INJURY_ZONES: [InjuryZone; 1] = [InjuryZone::None];

impl InjuryType {
    pub fn category(self) -> InjuryCategory {
        match self {
            InjuryType::None => InjuryCategory::None,
            InjuryType::Injury | InjuryType::Fracture | InjuryType::Fissure => {
                InjuryCategory::Structural
            }
            InjuryType::Tear => InjuryCategory::MuscularTear,
            InjuryType::Discomfort | InjuryType::Pain => InjuryCategory::PainOrDiscomfort,
        }
    }
}

impl InjuryCategory {
    pub fn permitted_zones(self) -> &'static [InjuryZone] {
        match self {
            InjuryCategory::None => &NO_INJURY_ZONES,
            InjuryCategory::Structural => &JOINT_ZONES,
            InjuryCategory::MuscularTear => &MUSCLE_ZONES,
            InjuryCategory::PainOrDiscomfort => &PAIN_ZONES,
        }
    }

    pub fn accepts(self, zone: InjuryZone) -> bool {
        self.permitted_zones().contains(&zone)
    }
}

/// Zone to keep after the injury type changes to `new_type`.
///
/// The previous zone survives if the new type's category permits it,
/// otherwise the selection falls back to [`InjuryZone::None`].
pub fn resolve(previous_zone: InjuryZone, new_type: InjuryType) -> InjuryZone {
    if new_type.category().accepts(previous_zone) {
        previous_zone
    } else {
        InjuryZone::None
    }
}

/// Options the zone selector offers for `injury_type`.
///
/// Empty for [`InjuryType::None`]: the selector is disabled and the zone
/// is pinned to `none`.
pub fn zone_options(injury_type: InjuryType) -> &'static [InjuryZone] {
    match injury_type.category() {
        InjuryCategory::None => &[],
        category => category.permitted_zones(),
    }
}

/// Label for the zone selector
pub fn zone_prompt(injury_type: InjuryType) -> &'static str {
    match injury_type.category() {
        InjuryCategory::MuscularTear => "Affected muscle",
        _ => "Affected area",
    }
}

/// Injury type plus zone, always consistent with each other.
///
/// The zone is either `none` (nothing selected yet) or one of the zones
/// permitted for the type; with type `none` it is always `none`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawInjury")]
pub struct Injury {
    #[serde(rename = "type")]
    kind: InjuryType,
    zone: InjuryZone,
}

#[derive(Deserialize)]
struct RawInjury {
    #[serde(rename = "type", default)]
    kind: InjuryType,
    #[serde(default)]
    zone: InjuryZone,
}

impl TryFrom<RawInjury> for Injury {
    type Error = FieldError;

    fn try_from(raw: RawInjury) -> Result<Self, Self::Error> {
        Injury::new(raw.kind, raw.zone)
    }
}

impl Injury {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn new(kind: InjuryType, zone: InjuryZone) -> Result<Self, FieldError> {
        let mut injury = Injury {
            kind,
            zone: InjuryZone::None,
        };
        injury.select_zone(zone)?;
        Ok(injury)
    }

    pub fn kind(&self) -> InjuryType {
        self.kind
    }

    pub fn zone(&self) -> InjuryZone {
        self.zone
    }

    pub fn category(&self) -> InjuryCategory {
        self.kind.category()
    }

    /// Switch the injury type, reconciling the zone. Returns whether the
    /// type actually changed; re-selecting the same type is a no-op.
    pub fn change_type(&mut self, new_type: InjuryType) -> bool {
        if new_type == self.kind {
            return false;
        }
        self.zone = resolve(self.zone, new_type);
        self.kind = new_type;
        true
    }

    /// Select a zone. `none` clears the selection; anything else must be
    /// permitted for the current type.
    pub fn select_zone(&mut self, zone: InjuryZone) -> Result<(), FieldError> {
        if zone != InjuryZone::None && !self.category().accepts(zone) {
            return Err(FieldError::new(
                "injury.zone",
                format!(
                    "'{}' is not a valid zone for injury type '{}'",
                    zone, self.kind
                ),
            ));
        }
        self.zone = zone;
        Ok(())
    }

    /// An injury type other than `none` needs a zone before submission
    pub fn validate(&self) -> Result<(), FieldError> {
        if self.kind != InjuryType::None && self.zone == InjuryZone::None {
            return Err(FieldError::new(
                "injury.zone",
                format!("select the {} for this injury", zone_prompt(self.kind).to_lowercase()),
            ));
        }
        Ok(())
    }
}

impl Choice for InjuryType {
    const FIELD: &'static str = "injury.type";
    const ALL: &'static [Self] = &[
        InjuryType::None,
        InjuryType::Injury,
        InjuryType::Fracture,
        InjuryType::Fissure,
        InjuryType::Tear,
        InjuryType::Discomfort,
        InjuryType::Pain,
    ];

    fn as_str(self) -> &'static str {
        match self {
            InjuryType::None => "none",
            InjuryType::Injury => "injury",
            InjuryType::Fracture => "fracture",
            InjuryType::Fissure => "fissure",
            InjuryType::Tear => "tear",
            InjuryType::Discomfort => "discomfort",
            InjuryType::Pain => "pain",
        }
    }

    fn label(self) -> &'static str {
        match self {
            InjuryType::None => "None",
            InjuryType::Injury => "Injury",
            InjuryType::Fracture => "Fracture",
            InjuryType::Fissure => "Fissure",
            InjuryType::Tear => "Muscle tear",
            InjuryType::Discomfort => "Discomfort",
            InjuryType::Pain => "Pain",
        }
    }
}

impl Choice for InjuryZone {
    const FIELD: &'static str = "injury.zone";
    const ALL: &'static [Self] = &[
        InjuryZone::None,
        InjuryZone::Shoulder,
        InjuryZone::Elbow,
        InjuryZone::Wrist,
        InjuryZone::LowerBack,
        InjuryZone::Hip,
        InjuryZone::Knee,
        InjuryZone::Ankle,
        InjuryZone::Biceps,
        InjuryZone::Triceps,
        InjuryZone::Pectoral,
        InjuryZone::Lats,
        InjuryZone::Deltoid,
        InjuryZone::Quadriceps,
        InjuryZone::Hamstrings,
        InjuryZone::Calves,
    ];

    fn as_str(self) -> &'static str {
        match self {
            InjuryZone::None => "none",
            InjuryZone::Shoulder => "shoulder",
            InjuryZone::Elbow => "elbow",
            InjuryZone::Wrist => "wrist",
            InjuryZone::LowerBack => "lower_back",
            InjuryZone::Hip => "hip",
            InjuryZone::Knee => "knee",
            InjuryZone::Ankle => "ankle",
            InjuryZone::Biceps => "biceps",
            InjuryZone::Triceps => "triceps",
            InjuryZone::Pectoral => "pectoral",
            InjuryZone::Lats => "lats",
            InjuryZone::Deltoid => "deltoid",
            InjuryZone::Quadriceps => "quadriceps",
            InjuryZone::Hamstrings => "hamstrings",
            InjuryZone::Calves => "calves",
        }
    }

    fn label(self) -> &'static str {
        match self {
            InjuryZone::None => "None",
            InjuryZone::Shoulder => "Shoulder",
            InjuryZone::Elbow => "Elbow",
            InjuryZone::Wrist => "Wrist",
            InjuryZone::LowerBack => "Lower back",
            InjuryZone::Hip => "Hip",
            InjuryZone::Knee => "Knee",
            InjuryZone::Ankle => "Ankle",
            InjuryZone::Biceps => "Biceps",
            InjuryZone::Triceps => "Triceps",
            InjuryZone::Pectoral => "Pectoral",
            InjuryZone::Lats => "Lats",
            InjuryZone::Deltoid => "Deltoid",
            InjuryZone::Quadriceps => "Quadriceps",
            InjuryZone::Hamstrings => "Hamstrings",
            InjuryZone::Calves => "Calves",
        }
    }
}

impl fmt::Display for InjuryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for InjuryZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InjuryType {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl FromStr for InjuryZone {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
