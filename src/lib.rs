// Library interface for fitplan
// The binary and the integration tests both build on these modules

pub mod bmi;
pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod export;
pub mod injury;
pub mod logging;
pub mod plan;
pub mod presenter;
pub mod profile;
pub mod render;
pub mod session;

// Re-export commonly used types for convenience
pub use bmi::{classify, BmiCategory, BmiReading};
pub use client::{HttpRecommendationClient, RecommendationClient};
pub use config::AppConfig;
pub use controller::{FormController, Phase, ShownPlan, SubmitTicket};
pub use error::{FieldError, FitPlanError, Result, TransportError, ValidationErrors};
pub use export::{ExportError, ExportFormat};
pub use injury::{Injury, InjuryCategory, InjuryType, InjuryZone};
pub use logging::{LogConfig, LogFormat, LogLevel};
pub use plan::Plan;
pub use presenter::{present, MacroShares, PresentedPlan};
pub use profile::{Choice, ProfileEdit, ProfileField, ProfileModel};
