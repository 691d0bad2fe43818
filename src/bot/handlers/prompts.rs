//! Step prompt rendering.
//!
//! Turns wizard plan positions and navigation outcomes into the text the bot
//! sends back. The engine itself never formats user-facing strings; this is
//! the single place step numbers become instructions.

use crate::core::field::FieldValue;
use crate::core::navigation::NavOutcome;
use crate::core::plan::WizardPlan;
use crate::core::session::WizardKind;
use std::collections::BTreeMap;
use std::fmt::Write;

/// Formats the `Step x/y` header shown above every prompt.
#[must_use]
pub fn step_header(step: u32, total: u32, name: &str) -> String {
    format!("📍 **Step {step}/{total} — {name}**")
}

/// The instruction text for a step of either wizard.
#[must_use]
pub fn step_prompt(plan: &WizardPlan, step_number: u32) -> String {
    let total = plan.total_steps();
    let Some(step) = plan.step(step_number) else {
        return format!("⚠️ Step {step_number} is not part of this wizard.");
    };

    let instruction = match (plan.kind(), step.number) {
        (WizardKind::EventCreation, 1) => "Set the event title with `/event title`.",
        (WizardKind::EventCreation, 2) => {
            "Pick the event type with `/event kind` (standard, league, tournament or championship)."
        }
        (WizardKind::EventCreation, 3) => {
            "Choose the track with `/event track` — free text or a saved track list id."
        }
        (WizardKind::EventCreation, 4) => {
            "Choose the vehicles with `/event vehicles` — free text or a saved vehicle list id."
        }
        (WizardKind::EventCreation, 5) => {
            "Configure the sessions with `/event settings` (race length and start time are required)."
        }
        (WizardKind::EventCreation, 6) => {
            "Optionally add rules and a regulation link with `/event rules`."
        }
        (WizardKind::EventCreation, 7) => {
            "Review the summary, then `/event publish`, `/event draft`, `/event schedule` or `/event archive`."
        }
        (WizardKind::Scheduler, 1) => "Confirm the event name with `/schedule name`.",
        (WizardKind::Scheduler, 2) => {
            "Set the publication date with `/schedule publish` — now, or a future date and time."
        }
        (WizardKind::Scheduler, 3) => {
            "Optionally set the registration window with `/schedule registration`."
        }
        (WizardKind::Scheduler, 4) => {
            "Optionally pick reminders with `/schedule reminders` (e.g. 2880, 1440, 180 minutes)."
        }
        (WizardKind::Scheduler, 5) => {
            "Review the schedule, then `/schedule confirm` to queue the event."
        }
        _ => "Follow the wizard prompts to continue.",
    };

    format!("{}\n{instruction}", step_header(step.number, total, step.name))
}

/// Renders a navigation outcome as a reply. `Completed` gets the finalize
/// hint; the caller handles finalize itself.
#[must_use]
pub fn render_outcome(plan: &WizardPlan, outcome: &NavOutcome) -> String {
    match outcome {
        NavOutcome::Render(step) => step_prompt(plan, *step),
        NavOutcome::Blocked { step, missing } => {
            let mut message = format!(
                "⚠️ You can't continue yet — step {step} is missing required data:\n"
            );
            for field in missing {
                let _ = writeln!(&mut message, "❌ `{field}`");
            }
            message
        }
        NavOutcome::AtFirstStep => "⚠️ You are already at the first step of the wizard.".to_string(),
        NavOutcome::Completed => {
            "✅ All steps are complete. Pick a finalize action to save the event.".to_string()
        }
        NavOutcome::ConfirmCancel => {
            "⚠️ Cancelling will discard everything you've entered. Run the cancel command again with `confirm: True` to proceed.".to_string()
        }
        NavOutcome::Cancelled => "🛑 Wizard cancelled. All session data has been discarded.".to_string(),
        NavOutcome::NoSession => "⚠️ You have no active wizard. Start one first.".to_string(),
        NavOutcome::StepNotDefined(step) => {
            format!("❌ Step {step} is not defined for this wizard. This has been logged.")
        }
    }
}

/// Renders the final-review summary of an event session.
#[must_use]
pub fn event_summary(data: &BTreeMap<String, FieldValue>) -> String {
    let text = |key: &str| {
        data.get(key)
            .and_then(FieldValue::as_text)
            .unwrap_or("N/A")
            .to_string()
    };
    let int = |key: &str| {
        data.get(key)
            .and_then(FieldValue::as_integer)
            .map_or_else(|| "N/A".to_string(), |n| n.to_string())
    };
    let date = |key: &str| {
        data.get(key)
            .and_then(FieldValue::as_timestamp)
            .map_or_else(
                || "N/A".to_string(),
                |ts| ts.format("%Y-%m-%d %H:%M UTC").to_string(),
            )
    };

    let mut summary = format!("📋 **Event summary: {}**\n", text("title"));
    let _ = writeln!(&mut summary, "🧩 Type: {}", text("event_type"));
    let _ = writeln!(&mut summary, "🏁 Track: {}", text("track_name"));
    let _ = writeln!(&mut summary, "🏎️ Vehicles: {}", text("vehicle_text"));
    let _ = writeln!(&mut summary, "🕓 Date: {}", date("event_datetime_utc"));
    let _ = writeln!(&mut summary, "🌍 Timezone: {}", text("timezone"));
    let _ = writeln!(&mut summary, "⏱️ Race length: {} min", int("race_time"));
    let _ = writeln!(&mut summary, "🌤️ Weather: {}", text("weather"));
    let _ = writeln!(&mut summary, "🔧 Assists: {}", text("assists"));
    summary.push_str("Check everything before publishing or saving the event.");
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::plan::{event_creation_plan, scheduler_plan};

    #[test]
    fn test_step_prompt_includes_header_and_instruction() {
        let plan = event_creation_plan().unwrap();
        let prompt = step_prompt(&plan, 3);
        assert!(prompt.contains("Step 3/7"));
        assert!(prompt.contains("/event track"));
    }

    #[test]
    fn test_out_of_range_prompt_degrades_gracefully() {
        let plan = scheduler_plan().unwrap();
        assert!(step_prompt(&plan, 42).contains("not part of this wizard"));
    }

    #[test]
    fn test_blocked_outcome_lists_missing_fields() {
        let plan = event_creation_plan().unwrap();
        let rendered = render_outcome(
            &plan,
            &NavOutcome::Blocked {
                step: 3,
                missing: vec!["track_name|track_list_id".to_string()],
            },
        );
        assert!(rendered.contains("step 3"));
        assert!(rendered.contains("track_name|track_list_id"));
    }

    #[test]
    fn test_summary_handles_missing_fields() {
        let summary = event_summary(&BTreeMap::new());
        assert!(summary.contains("N/A"));
    }
}
