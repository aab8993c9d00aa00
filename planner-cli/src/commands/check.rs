use anyhow::Result;
use owo_colors::OwoColorize;
use planner_core::{EventDefinition, PlannerError};

use crate::render::pluralize;

/// Validate every stored event. Invalid events are still shown by `expand`,
/// but only once and without their recurrence.
pub fn run(events: &[EventDefinition]) -> Result<()> {
    let problems = invalid_events(events);

    if problems.is_empty() {
        println!(
            "{}",
            format!("{} {} OK", events.len(), pluralize("event", events.len())).green()
        );
        return Ok(());
    }

    for (event, err) in &problems {
        println!("  {} {} {}", "✗".red(), event.title, format!("[{}]", event.id).dimmed());
        println!("    {}", err);
    }

    anyhow::bail!(
        "{} of {} {} invalid",
        problems.len(),
        events.len(),
        pluralize("event", events.len())
    )
}

fn invalid_events(events: &[EventDefinition]) -> Vec<(&EventDefinition, PlannerError)> {
    events
        .iter()
        .filter_map(|event| event.validate().err().map(|err| (event, err)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use planner_core::{CustomRecurrence, RecurrencePattern, RecurrenceUnit, RuleError};

    fn event(id: &str) -> EventDefinition {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        EventDefinition::new(id, "Event", start, start + Duration::hours(1))
    }

    #[test]
    fn valid_events_pass() {
        let events = vec![event("a"), event("b")];

        assert!(invalid_events(&events).is_empty());
        assert!(run(&events).is_ok());
    }

    #[test]
    fn flags_zero_interval() {
        let mut broken = event("broken");
        broken.is_recurring = true;
        broken.recurring_pattern = RecurrencePattern::Custom;
        broken.custom_recurring = Some(CustomRecurrence::every(0, RecurrenceUnit::Days));
        let events = vec![event("fine"), broken];

        let problems = invalid_events(&events);
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].0.id, "broken");
        assert!(matches!(
            problems[0].1,
            PlannerError::InvalidRule(RuleError::NonPositiveInterval(0))
        ));
        assert!(run(&events).is_err());
    }
}
