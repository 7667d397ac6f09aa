//! Form state machine
//!
//! [`FormController`] is the only owner of the live [`ProfileModel`]. It
//! moves between editing, submitting, showing a plan and failed, and it
//! guarantees at most one recommendation request is outstanding.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::VecDeque;
use std::fmt;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::bmi::{self, BmiCategory, BmiReading};
use crate::client::RecommendationClient;
use crate::error::{FitPlanError, Result, TransportError, ValidationErrors};
use crate::plan::Plan;
use crate::presenter::{present, PresentedPlan};
use crate::profile::{ProfileEdit, ProfileField, ProfileModel};

/// A plan on screen, with the time it arrived
#[derive(Debug, Clone, PartialEq)]
pub struct ShownPlan {
    pub presented: PresentedPlan,
    /// Computed locally from the submitted weight and height
    pub bmi: Option<BmiReading>,
    pub received_at: DateTime<Utc>,
}

impl ShownPlan {
    /// BMI to display: the local reading, or the service's echo when the
    /// local one is unavailable
    pub fn bmi_reading(&self) -> BmiReading {
        self.bmi.unwrap_or_else(|| {
            let value = Decimal::from_f64(self.presented.plan.profile.bmi)
                .unwrap_or_default()
                .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
            BmiReading {
                value,
                category: BmiCategory::from_bmi(value),
            }
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Editing,
    Submitting,
    Showing(Box<ShownPlan>),
    Failed(String),
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Editing => "editing",
            Phase::Submitting => "submitting",
            Phase::Showing(_) => "showing results",
            Phase::Failed(_) => "failed",
        }
    }

    /// The profile form is visible and editable
    pub fn is_form_visible(&self) -> bool {
        matches!(self, Phase::Editing | Phase::Failed(_))
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Handle for the one in-flight request.
///
/// Carries a snapshot of the profile taken when the request began, so
/// edits queued while submitting never leak into the payload.
#[derive(Debug)]
pub struct SubmitTicket {
    id: u64,
    request: ProfileModel,
}

impl SubmitTicket {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn request(&self) -> &ProfileModel {
        &self.request
    }
}

#[derive(Debug)]
pub struct FormController {
    session_id: Uuid,
    profile: ProfileModel,
    revision: u64,
    phase: Phase,
    queued_edits: VecDeque<ProfileEdit>,
    pending: Option<u64>,
    next_ticket: u64,
}

impl Default for FormController {
    fn default() -> Self {
        Self::new()
    }
}

impl FormController {
    pub fn new() -> Self {
        Self::with_profile(ProfileModel::default())
    }

    pub fn with_profile(profile: ProfileModel) -> Self {
        let session_id = Uuid::new_v4();
        debug!(session = %session_id, "Form session started");
        Self {
            session_id,
            profile,
            revision: 0,
            phase: Phase::Editing,
            queued_edits: VecDeque::new(),
            pending: None,
            next_ticket: 1,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn profile(&self) -> &ProfileModel {
        &self.profile
    }

    /// Number of accepted edits so far
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Requests started but not yet completed (0 or 1)
    pub fn pending_requests(&self) -> usize {
        usize::from(self.pending.is_some())
    }

    pub fn queued_edits(&self) -> usize {
        self.queued_edits.len()
    }

    pub fn shown_plan(&self) -> Option<&ShownPlan> {
        match &self.phase {
            Phase::Showing(shown) => Some(shown),
            _ => None,
        }
    }

    pub fn failure_message(&self) -> Option<&str> {
        match &self.phase {
            Phase::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Outstanding field errors for the current profile, if any
    pub fn validation_errors(&self) -> Option<ValidationErrors> {
        self.profile.validate().err()
    }

    /// Live BMI for the current weight and height
    pub fn bmi(&self) -> Result<BmiReading> {
        bmi::classify(self.profile.weight_kg, self.profile.height_cm)
    }

    /// Apply one field edit.
    ///
    /// While a request is in flight the edit is queued and applied once the
    /// request completes. A rejected zone leaves the profile unchanged.
    pub fn apply(&mut self, edit: ProfileEdit) -> Result<()> {
        match self.phase {
            Phase::Submitting => {
                debug!(
                    session = %self.session_id,
                    field = %edit.field(),
                    "Edit queued while submitting"
                );
                self.queued_edits.push_back(edit);
                Ok(())
            }
            Phase::Showing(_) => Err(self.phase_error("edit the profile")),
            Phase::Editing | Phase::Failed(_) => self.apply_now(edit),
        }
    }

    /// Parse free text for `field` and apply it
    pub fn apply_text(&mut self, field: ProfileField, raw: &str) -> Result<()> {
        let edit = ProfileEdit::from_text(field, raw).map_err(ValidationErrors::from)?;
        self.apply(edit)
    }

    fn apply_now(&mut self, edit: ProfileEdit) -> Result<()> {
        let field = edit.field();
        self.profile.apply(edit).map_err(ValidationErrors::from)?;
        self.revision += 1;
        debug!(
            session = %self.session_id,
            revision = self.revision,
            field = %field,
            "Profile updated"
        );
        Ok(())
    }

    /// Start a submission.
    ///
    /// Returns `Ok(None)` when a request is already in flight. Validation
    /// failures leave the phase untouched.
    pub fn begin_submit(&mut self) -> Result<Option<SubmitTicket>> {
        match self.phase {
            Phase::Submitting => {
                debug!(session = %self.session_id, "Submit ignored, request already pending");
                return Ok(None);
            }
            Phase::Showing(_) => return Err(self.phase_error("submit")),
            Phase::Editing | Phase::Failed(_) => {}
        }

        self.profile.validate()?;

        let id = self.next_ticket;
        self.next_ticket += 1;
        self.pending = Some(id);
        self.phase = Phase::Submitting;

        info!(
            session = %self.session_id,
            revision = self.revision,
            ticket = id,
            "Submitting profile"
        );

        Ok(Some(SubmitTicket {
            id,
            request: self.profile.clone(),
        }))
    }

    /// Finish the submission identified by `ticket` with the service outcome.
    ///
    /// A plan that cannot be presented counts as a service failure. Edits
    /// queued during the request are applied afterwards, in order.
    pub fn complete_submit(
        &mut self,
        ticket: SubmitTicket,
        outcome: std::result::Result<Plan, TransportError>,
    ) -> Result<&Phase> {
        if self.pending != Some(ticket.id) {
            return Err(self.phase_error("complete a submission that is not pending"));
        }
        self.pending = None;

        let presented = outcome.and_then(|plan| {
            present(plan).map_err(|e| TransportError::ContractViolation(e.to_string()))
        });

        self.phase = match presented {
            Ok(presented) => {
                info!(
                    session = %self.session_id,
                    ticket = ticket.id,
                    exercises = presented.plan.exercise_count(),
                    "Plan received"
                );
                Phase::Showing(Box::new(ShownPlan {
                    presented,
                    bmi: bmi::classify(ticket.request.weight_kg, ticket.request.height_cm).ok(),
                    received_at: Utc::now(),
                }))
            }
            Err(e) => {
                let error = FitPlanError::from(e);
                warn!(
                    session = %self.session_id,
                    ticket = ticket.id,
                    error = %error,
                    "Submission failed"
                );
                Phase::Failed(error.user_message())
            }
        };

        self.drain_queued_edits();
        Ok(&self.phase)
    }

    fn drain_queued_edits(&mut self) {
        while let Some(edit) = self.queued_edits.pop_front() {
            let field = edit.field();
            if let Err(e) = self.apply_now(edit) {
                warn!(
                    session = %self.session_id,
                    field = %field,
                    error = %e,
                    "Queued edit rejected"
                );
            }
        }
    }

    /// Validate, call `client` and record the outcome
    pub async fn submit<C>(&mut self, client: &C) -> Result<&Phase>
    where
        C: RecommendationClient + ?Sized,
    {
        let Some(ticket) = self.begin_submit()? else {
            return Ok(&self.phase);
        };
        let outcome = client.recommend(ticket.request()).await;
        self.complete_submit(ticket, outcome)
    }

    /// Leave the results view; the profile is kept, the plan dropped
    pub fn reset(&mut self) -> Result<()> {
        if !matches!(self.phase, Phase::Showing(_)) {
            return Err(self.phase_error("return to the form"));
        }
        self.phase = Phase::Editing;
        debug!(session = %self.session_id, "Returned to form");
        Ok(())
    }

    fn phase_error(&self, action: &str) -> FitPlanError {
        FitPlanError::Phase {
            phase: self.phase.name().to_string(),
            action: action.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::injury::{InjuryType, InjuryZone};
    use crate::plan::fixtures::sample_plan;
    use crate::profile::Goal;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeClient {
        outcome: std::result::Result<Plan, TransportError>,
        calls: AtomicUsize,
    }

    impl FakeClient {
        fn ok() -> Self {
            Self {
                outcome: Ok(sample_plan()),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing(error: TransportError) -> Self {
            Self {
                outcome: Err(error),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl RecommendationClient for FakeClient {
        async fn recommend(
            &self,
            _profile: &ProfileModel,
        ) -> std::result::Result<Plan, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome.clone()
        }
    }

    fn named_controller() -> FormController {
        let mut controller = FormController::new();
        controller.apply(ProfileEdit::Name("Ana".to_string())).unwrap();
        controller
    }

    #[test]
    fn test_edits_bump_revision() {
        let mut controller = named_controller();
        controller.apply_text(ProfileField::WeightKg, "72,5").unwrap();
        assert_eq!(controller.profile().weight_kg, 72.5);
        assert_eq!(controller.revision(), 2);
    }

    #[test]
    fn test_injury_type_change_resolves_zone() {
        let mut controller = named_controller();
        controller.apply(ProfileEdit::InjuryType(InjuryType::Tear)).unwrap();
        controller.apply(ProfileEdit::InjuryZone(InjuryZone::Biceps)).unwrap();

        controller.apply(ProfileEdit::InjuryType(InjuryType::Pain)).unwrap();
        assert_eq!(controller.profile().injury.zone(), InjuryZone::Biceps);

        controller.apply(ProfileEdit::InjuryType(InjuryType::Fracture)).unwrap();
        assert_eq!(controller.profile().injury.zone(), InjuryZone::None);
    }

    #[test]
    fn test_rejected_zone_leaves_profile_unchanged() {
        let mut controller = named_controller();
        controller.apply(ProfileEdit::InjuryType(InjuryType::Fracture)).unwrap();
        controller.apply(ProfileEdit::InjuryZone(InjuryZone::Knee)).unwrap();
        let before = controller.profile().clone();
        let revision = controller.revision();

        let err = controller
            .apply(ProfileEdit::InjuryZone(InjuryZone::Biceps))
            .unwrap_err();
        assert!(matches!(err, FitPlanError::Validation(_)));
        assert_eq!(controller.profile(), &before);
        assert_eq!(controller.revision(), revision);
    }

    #[test]
    fn test_invalid_profile_blocks_submit() {
        let mut controller = FormController::new();
        let err = controller.begin_submit().unwrap_err();
        match err {
            FitPlanError::Validation(errors) => assert!(errors.for_field("name").is_some()),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(controller.phase(), &Phase::Editing);
        assert_eq!(controller.pending_requests(), 0);
    }

    #[test]
    fn test_missing_zone_blocks_submit() {
        let mut controller = named_controller();
        controller.apply(ProfileEdit::InjuryType(InjuryType::Tear)).unwrap();
        let errors = controller.validation_errors().unwrap();
        assert!(errors.for_field("injury.zone").is_some());
        assert!(controller.begin_submit().is_err());
    }

    #[test]
    fn test_second_submit_is_noop() {
        let mut controller = named_controller();
        let ticket = controller.begin_submit().unwrap().unwrap();
        assert_eq!(controller.phase(), &Phase::Submitting);
        assert_eq!(controller.pending_requests(), 1);

        assert!(controller.begin_submit().unwrap().is_none());
        assert!(controller.begin_submit().unwrap().is_none());
        assert_eq!(controller.pending_requests(), 1);

        controller.complete_submit(ticket, Ok(sample_plan())).unwrap();
        assert_eq!(controller.pending_requests(), 0);
        assert!(controller.shown_plan().is_some());
    }

    #[test]
    fn test_edits_while_submitting_are_queued() {
        let mut controller = named_controller();
        let ticket = controller.begin_submit().unwrap().unwrap();

        controller.apply(ProfileEdit::Goal(Goal::LoseFat)).unwrap();
        controller.apply(ProfileEdit::WeeklyFrequency(5)).unwrap();
        assert_eq!(controller.queued_edits(), 2);
        assert_eq!(controller.profile().goal, Goal::GainMuscle);
        assert_eq!(ticket.request().goal, Goal::GainMuscle);

        controller
            .complete_submit(ticket, Err(TransportError::Malformed("eof".into())))
            .unwrap();
        assert_eq!(controller.queued_edits(), 0);
        assert_eq!(controller.profile().goal, Goal::LoseFat);
        assert_eq!(controller.profile().weekly_frequency, 5);
    }

    #[test]
    fn test_failure_keeps_inputs_and_allows_edits() {
        let mut controller = named_controller();
        let ticket = controller.begin_submit().unwrap().unwrap();
        controller
            .complete_submit(
                ticket,
                Err(TransportError::Status {
                    status: 500,
                    detail: Some("rules engine failed".to_string()),
                }),
            )
            .unwrap();

        assert_eq!(controller.failure_message(), Some("rules engine failed"));
        assert_eq!(controller.profile().name, "Ana");

        controller.apply(ProfileEdit::Age(31)).unwrap();
        assert_eq!(controller.failure_message(), Some("rules engine failed"));

        controller.begin_submit().unwrap().unwrap();
        assert!(controller.failure_message().is_none());
    }

    #[test]
    fn test_unpresentable_plan_fails_instead_of_showing() {
        let mut controller = named_controller();
        let ticket = controller.begin_submit().unwrap().unwrap();
        let mut plan = sample_plan();
        plan.nutrition.daily_calories = 0;

        controller.complete_submit(ticket, Ok(plan)).unwrap();
        assert_eq!(
            controller.failure_message(),
            Some("The recommendation service returned an invalid plan.")
        );
    }

    #[test]
    fn test_showing_rejects_edits_and_reset_returns_to_form() {
        let mut controller = named_controller();
        let ticket = controller.begin_submit().unwrap().unwrap();
        controller.complete_submit(ticket, Ok(sample_plan())).unwrap();

        let err = controller.apply(ProfileEdit::Age(40)).unwrap_err();
        assert!(matches!(err, FitPlanError::Phase { .. }));
        assert!(controller.begin_submit().is_err());

        controller.reset().unwrap();
        assert_eq!(controller.phase(), &Phase::Editing);
        assert_eq!(controller.profile().name, "Ana");
        assert!(controller.reset().is_err());
    }

    #[tokio::test]
    async fn test_submit_with_client() {
        let client = FakeClient::ok();
        let mut controller = named_controller();

        let phase = controller.submit(&client).await.unwrap();
        assert!(matches!(phase, Phase::Showing(_)));
        assert_eq!(client.calls.load(Ordering::SeqCst), 1);

        let shown = controller.shown_plan().unwrap();
        assert_eq!(shown.presented.macros.protein_percent, 24);
        assert_eq!(shown.bmi.map(|r| r.category), Some(bmi::BmiCategory::Normal));
    }

    #[tokio::test]
    async fn test_submit_network_failure() {
        let client = FakeClient::failing(TransportError::Network {
            url: "http://localhost:8000/api/recommendations".to_string(),
            reason: "connection refused".to_string(),
        });
        let mut controller = named_controller();

        controller.submit(&client).await.unwrap();
        let message = controller.failure_message().unwrap();
        assert!(message.contains("Could not reach"));
        assert_eq!(controller.pending_requests(), 0);
    }
}
