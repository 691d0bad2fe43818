//! Wizard navigation controller.
//!
//! Orchestrates the step transitions of one wizard kind: advance behind the
//! validation gate, unconditional retreat, confirm-gated cancellation and the
//! direct jump used when resuming a saved draft. Every rejection is an
//! ordinary outcome value - navigation never returns an error for user input,
//! and the session always stays in a well-defined, resumable state.

use crate::core::plan::WizardPlan;
use crate::core::session::SessionStore;
use crate::core::validator;

/// A navigation request from the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NavAction {
    /// Advance past the current step (validation-gated)
    Next,
    /// Go back one step (never validated)
    Previous,
    /// Cancel the wizard; destroys the session only once confirmed
    Cancel {
        /// Whether the user already confirmed the cancellation
        confirmed: bool,
    },
    /// Jump straight to a step, bypassing validation (draft resume)
    Jump(u32),
}

/// What a navigation request resolved to. The bot layer turns these into
/// user-facing messages and step prompts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NavOutcome {
    /// Show the given step
    Render(u32),
    /// Advance refused: the current step is missing required fields
    Blocked {
        /// The step the user stays on
        step: u32,
        /// Unsatisfied rules, in plan order
        missing: Vec<String>,
    },
    /// Retreat refused: already at the first step
    AtFirstStep,
    /// The final step was completed; the coordinator's finalize runs next
    Completed,
    /// Cancellation needs an explicit confirmation before anything is lost
    ConfirmCancel,
    /// The session was destroyed
    Cancelled,
    /// The user has no active session for this wizard
    NoSession,
    /// The requested step is outside the plan (configuration error)
    StepNotDefined(u32),
}

/// Navigation over one (plan, store) pair. Cheap to construct per request;
/// the coordinator builds one on demand.
pub struct NavigationController<'a> {
    plan: &'a WizardPlan,
    store: &'a SessionStore,
}

impl<'a> NavigationController<'a> {
    /// Creates a controller for the given plan and session store.
    #[must_use]
    pub const fn new(plan: &'a WizardPlan, store: &'a SessionStore) -> Self {
        Self { plan, store }
    }

    /// Dispatches a navigation action.
    pub async fn navigate(&self, user_id: u64, action: NavAction) -> NavOutcome {
        match action {
            NavAction::Next => self.advance(user_id).await,
            NavAction::Previous => self.retreat(user_id).await,
            NavAction::Cancel { confirmed } => self.cancel(user_id, confirmed).await,
            NavAction::Jump(step) => self.jump_to(user_id, step).await,
        }
    }

    /// Validates the current step and moves forward on success. At the last
    /// step a successful validation yields [`NavOutcome::Completed`] and the
    /// session is left intact for the finalize handoff.
    pub async fn advance(&self, user_id: u64) -> NavOutcome {
        let Some(session) = self.store.snapshot(user_id).await else {
            return NavOutcome::NoSession;
        };

        let current = session.step;
        if self.plan.step(current).is_none() {
            tracing::warn!(
                user_id,
                kind = %self.plan.kind(),
                step = current,
                "session points at a step outside the plan"
            );
            return NavOutcome::StepNotDefined(current);
        }

        let validation = validator::validate_step(self.plan, current, &session.data);
        if !validation.ok {
            return NavOutcome::Blocked {
                step: current,
                missing: validation.missing,
            };
        }

        if current >= self.plan.total_steps() {
            return NavOutcome::Completed;
        }

        self.store.set_step(user_id, current + 1).await;
        NavOutcome::Render(current + 1)
    }

    /// Moves back one step. Never validates: a user may always retreat to
    /// revisit earlier input, regardless of the current step's completeness.
    pub async fn retreat(&self, user_id: u64) -> NavOutcome {
        let Some(current) = self.store.current_step(user_id).await else {
            return NavOutcome::NoSession;
        };

        if current <= 1 {
            return NavOutcome::AtFirstStep;
        }

        self.store.set_step(user_id, current - 1).await;
        NavOutcome::Render(current - 1)
    }

    /// Cancels the wizard. The first request only asks for confirmation;
    /// the session is destroyed only when `confirmed` is set, so a stray
    /// click cannot throw away a half-finished form.
    pub async fn cancel(&self, user_id: u64, confirmed: bool) -> NavOutcome {
        if !self.store.exists(user_id).await {
            return NavOutcome::NoSession;
        }

        if !confirmed {
            return NavOutcome::ConfirmCancel;
        }

        self.store.delete(user_id).await;
        NavOutcome::Cancelled
    }

    /// Sets the step directly, bypassing validation. Used when a saved draft
    /// re-enters the wizard at its first incomplete step.
    pub async fn jump_to(&self, user_id: u64, step: u32) -> NavOutcome {
        if self.plan.step(step).is_none() {
            tracing::warn!(
                user_id,
                kind = %self.plan.kind(),
                step,
                "jump to a step outside the plan"
            );
            return NavOutcome::StepNotDefined(step);
        }

        if !self.store.exists(user_id).await {
            return NavOutcome::NoSession;
        }

        self.store.set_step(user_id, step).await;
        NavOutcome::Render(step)
    }
}
