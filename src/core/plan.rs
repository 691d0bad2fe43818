//! Wizard step plans.
//!
//! A plan is the ordered table of steps for one wizard kind: step number,
//! display name and the declarative field rules that gate forward navigation.
//! Plans are built once at startup from literal tables and checked for
//! contiguity there, so a malformed table is caught at init time instead of
//! surfacing as a runtime hole. Step lookup by number still fails gracefully
//! (`None`) because navigation treats an out-of-range step as a reportable
//! condition, not a crash.

use crate::core::field::FieldValue;
use crate::core::session::WizardKind;
use crate::errors::{Error, Result};
use std::collections::BTreeMap;

/// Presence requirement for one step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldRule {
    /// The named field must be present and non-empty.
    Required(&'static str),
    /// At least one of the named fields must be present and non-empty.
    /// Used where a step offers alternative inputs (free-text track vs.
    /// saved track list).
    AnyOf(&'static [&'static str]),
}

impl FieldRule {
    /// Whether the rule is satisfied by the given form data.
    #[must_use]
    pub fn is_satisfied(&self, data: &BTreeMap<String, FieldValue>) -> bool {
        let provided = |name: &str| data.get(name).is_some_and(|v| !v.is_empty());
        match self {
            Self::Required(name) => provided(name),
            Self::AnyOf(names) => names.iter().any(|name| provided(name)),
        }
    }

    /// The field name(s) to report when the rule is unsatisfied.
    /// Alternatives are joined as `a|b` so the user sees the whole choice.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Required(name) => (*name).to_string(),
            Self::AnyOf(names) => names.join("|"),
        }
    }
}

/// One step of a wizard: position, display name and gate rules.
#[derive(Clone, Debug)]
pub struct StepDefinition {
    /// Position in the sequence, 1-based and contiguous
    pub number: u32,
    /// Short name used in prompts and logs
    pub name: &'static str,
    /// Rules that must hold before advancing past this step
    pub rules: &'static [FieldRule],
}

/// The full ordered step table for one wizard kind.
#[derive(Clone, Debug)]
pub struct WizardPlan {
    kind: WizardKind,
    steps: Vec<StepDefinition>,
}

impl WizardPlan {
    /// Builds a plan, verifying the step table is non-empty and numbered
    /// contiguously from 1.
    pub fn new(kind: WizardKind, steps: Vec<StepDefinition>) -> Result<Self> {
        if steps.is_empty() {
            return Err(Error::Config {
                message: format!("{kind} wizard plan has no steps"),
            });
        }
        for (index, step) in steps.iter().enumerate() {
            let expected = u32::try_from(index).map_err(|_| Error::Config {
                message: format!("{kind} wizard plan is too large"),
            })? + 1;
            if step.number != expected {
                return Err(Error::Config {
                    message: format!(
                        "{kind} wizard plan step {} is out of sequence (expected {expected})",
                        step.number
                    ),
                });
            }
        }
        Ok(Self { kind, steps })
    }

    /// The wizard kind this plan belongs to.
    #[must_use]
    pub const fn kind(&self) -> WizardKind {
        self.kind
    }

    /// Number of steps in the sequence.
    #[must_use]
    pub fn total_steps(&self) -> u32 {
        // Plans are non-empty and contiguous by construction.
        u32::try_from(self.steps.len()).unwrap_or(u32::MAX)
    }

    /// Looks up a step by number. `None` for anything outside the table;
    /// callers surface that as a "step not defined" notice.
    #[must_use]
    pub fn step(&self, number: u32) -> Option<&StepDefinition> {
        if number == 0 {
            return None;
        }
        self.steps.get(number as usize - 1)
    }

    /// Iterates the steps in order.
    pub fn steps(&self) -> impl Iterator<Item = &StepDefinition> {
        self.steps.iter()
    }
}

/// The event creation wizard: title, type, track, vehicles, technical
/// settings, rules, final review. Track and vehicles each accept either a
/// free-text entry or a saved list reference.
pub fn event_creation_plan() -> Result<WizardPlan> {
    WizardPlan::new(
        WizardKind::EventCreation,
        vec![
            StepDefinition {
                number: 1,
                name: "title",
                rules: &[FieldRule::Required("title")],
            },
            StepDefinition {
                number: 2,
                name: "event type",
                rules: &[FieldRule::Required("event_type")],
            },
            StepDefinition {
                number: 3,
                name: "track",
                rules: &[FieldRule::AnyOf(&["track_name", "track_list_id"])],
            },
            StepDefinition {
                number: 4,
                name: "vehicles",
                rules: &[FieldRule::AnyOf(&["vehicle_text", "vehicle_list_id"])],
            },
            StepDefinition {
                number: 5,
                name: "settings",
                rules: &[
                    FieldRule::Required("race_time"),
                    FieldRule::Required("event_datetime_utc"),
                ],
            },
            StepDefinition {
                number: 6,
                name: "rules",
                rules: &[],
            },
            StepDefinition {
                number: 7,
                name: "finalize",
                rules: &[],
            },
        ],
    )
}

/// The scheduler wizard: event name, publication date, registration window,
/// reminders, final confirmation. Registration and reminders are optional,
/// so only the first two steps gate.
pub fn scheduler_plan() -> Result<WizardPlan> {
    WizardPlan::new(
        WizardKind::Scheduler,
        vec![
            StepDefinition {
                number: 1,
                name: "name",
                rules: &[FieldRule::Required("title")],
            },
            StepDefinition {
                number: 2,
                name: "publish date",
                rules: &[FieldRule::Required("publish_datetime_utc")],
            },
            StepDefinition {
                number: 3,
                name: "registration",
                rules: &[],
            },
            StepDefinition {
                number: 4,
                name: "reminders",
                rules: &[],
            },
            StepDefinition {
                number: 5,
                name: "finalize",
                rules: &[],
            },
        ],
    )
}
