//! Structural step validation.
//!
//! Decides whether a session's accumulated data satisfies the requirements to
//! leave a step. The check is purely presence-based: a field counts as missing
//! when it is absent, an empty string or an empty list. Semantic checks (does
//! the date parse, is the title unique) happen at capture time in the input
//! handlers, never here - the navigation gate stays cheap and predictable.

use crate::core::field::FieldValue;
use crate::core::plan::WizardPlan;
use std::collections::BTreeMap;

/// Result of validating one step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepValidation {
    /// Whether every rule of the step holds
    pub ok: bool,
    /// Unsatisfied rules, in plan order; `a|b` entries are any-of groups
    pub missing: Vec<String>,
}

impl StepValidation {
    fn valid() -> Self {
        Self {
            ok: true,
            missing: Vec::new(),
        }
    }
}

/// Validates the given step against the session data.
///
/// Steps with no rules (and steps outside the plan, which navigation reports
/// separately) are trivially valid.
#[must_use]
pub fn validate_step(
    plan: &WizardPlan,
    step_number: u32,
    data: &BTreeMap<String, FieldValue>,
) -> StepValidation {
    let Some(step) = plan.step(step_number) else {
        return StepValidation::valid();
    };

    let missing: Vec<String> = step
        .rules
        .iter()
        .filter(|rule| !rule.is_satisfied(data))
        .map(crate::core::plan::FieldRule::describe)
        .collect();

    StepValidation {
        ok: missing.is_empty(),
        missing,
    }
}

/// Entry-point resolution for resuming a wizard over pre-populated data:
/// walks the steps in order and returns the first whose rules are not yet
/// satisfied. When every gated step is already satisfied the caller lands on
/// the final step (review), not past the end.
#[must_use]
pub fn first_incomplete_step(plan: &WizardPlan, data: &BTreeMap<String, FieldValue>) -> u32 {
    for step in plan.steps() {
        if !validate_step(plan, step.number, data).ok {
            return step.number;
        }
    }
    plan.total_steps()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::plan::{FieldRule, StepDefinition, WizardPlan, event_creation_plan};
    use crate::core::session::WizardKind;
    use chrono::Utc;

    fn text(value: &str) -> FieldValue {
        FieldValue::from(value)
    }

    #[test]
    fn test_missing_required_field_reported() {
        let plan = event_creation_plan().unwrap();
        let data = BTreeMap::new();

        let result = validate_step(&plan, 1, &data);
        assert!(!result.ok);
        assert_eq!(result.missing, vec!["title".to_string()]);
    }

    #[test]
    fn test_empty_string_counts_as_missing() {
        let plan = event_creation_plan().unwrap();
        let mut data = BTreeMap::new();
        data.insert("title".to_string(), text(""));

        assert!(!validate_step(&plan, 1, &data).ok);

        data.insert("title".to_string(), text("Spa GT3 Night"));
        assert!(validate_step(&plan, 1, &data).ok);
    }

    #[test]
    fn test_step_without_rules_is_trivially_valid() {
        let plan = event_creation_plan().unwrap();
        let data = BTreeMap::new();

        // Step 6 (rules) and step 7 (finalize) have no gate.
        assert!(validate_step(&plan, 6, &data).ok);
        assert!(validate_step(&plan, 7, &data).ok);
    }

    #[test]
    fn test_any_of_group_reported_as_one_entry() {
        let plan = event_creation_plan().unwrap();
        let data = BTreeMap::new();

        let result = validate_step(&plan, 3, &data);
        assert_eq!(result.missing, vec!["track_name|track_list_id".to_string()]);

        let mut data = BTreeMap::new();
        data.insert("track_list_id".to_string(), FieldValue::Integer(4));
        assert!(validate_step(&plan, 3, &data).ok);
    }

    #[test]
    fn test_multiple_missing_fields_in_plan_order() {
        let plan = event_creation_plan().unwrap();
        let mut data = BTreeMap::new();
        data.insert("race_time".to_string(), FieldValue::Integer(45));

        let result = validate_step(&plan, 5, &data);
        assert_eq!(result.missing, vec!["event_datetime_utc".to_string()]);

        data.insert("event_datetime_utc".to_string(), FieldValue::from(Utc::now()));
        assert!(validate_step(&plan, 5, &data).ok);
    }

    #[test]
    fn test_entry_point_skips_satisfied_steps() {
        // Mirrors resuming a saved draft: title and timezone already known,
        // publish date still missing, so the wizard enters at step 3.
        let plan = WizardPlan::new(
            WizardKind::Scheduler,
            vec![
                StepDefinition {
                    number: 1,
                    name: "title",
                    rules: &[FieldRule::Required("title")],
                },
                StepDefinition {
                    number: 2,
                    name: "timezone",
                    rules: &[FieldRule::Required("timezone")],
                },
                StepDefinition {
                    number: 3,
                    name: "publish date",
                    rules: &[FieldRule::Required("publish_datetime_utc")],
                },
                StepDefinition {
                    number: 4,
                    name: "registration",
                    rules: &[],
                },
                StepDefinition {
                    number: 5,
                    name: "finalize",
                    rules: &[],
                },
            ],
        )
        .unwrap();

        let mut data = BTreeMap::new();
        data.insert("title".to_string(), text("Nordschleife Enduro"));
        data.insert("timezone".to_string(), text("Europe/Madrid"));

        assert_eq!(first_incomplete_step(&plan, &data), 3);
    }

    #[test]
    fn test_entry_point_on_empty_data_is_step_one() {
        let plan = event_creation_plan().unwrap();
        assert_eq!(first_incomplete_step(&plan, &BTreeMap::new()), 1);
    }

    #[test]
    fn test_entry_point_with_all_fields_lands_on_final_step() {
        let plan = event_creation_plan().unwrap();
        let mut data = BTreeMap::new();
        data.insert("title".to_string(), text("Spa GT3 Night"));
        data.insert("event_type".to_string(), text("standard"));
        data.insert("track_name".to_string(), text("Spa-Francorchamps"));
        data.insert("vehicle_text".to_string(), text("GT3 class"));
        data.insert("race_time".to_string(), FieldValue::Integer(45));
        data.insert("event_datetime_utc".to_string(), FieldValue::from(Utc::now()));

        assert_eq!(first_incomplete_step(&plan, &data), 7);
    }
}
