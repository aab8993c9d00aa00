use anyhow::Result;
use owo_colors::OwoColorize;
use planner_core::{Cadence, EventDefinition, InstanceId, slot_start};

use crate::store::EventStore;

/// Cancel a single occurrence of a recurring event and save it.
pub fn run(store: &EventStore, id: &str) -> Result<()> {
    let mut events = store.load()?;

    let (title, ordinal) = cancel_in(&mut events, id)?;

    store.save(&events)?;

    println!(
        "{}",
        format!("  Cancelled occurrence #{} of {}", ordinal, title).green()
    );
    println!("{}", format!("  Saved {}", store.path().display()).dimmed());

    Ok(())
}

/// Record a cancellation for the occurrence named by `id`.
///
/// Only occurrences the event actually generates can be cancelled. Returns
/// the event title and the cancelled ordinal.
fn cancel_in(events: &mut [EventDefinition], id: &str) -> Result<(String, u32)> {
    if events.iter().any(|event| event.id == id) {
        anyhow::bail!(
            "'{}' is an event, not an occurrence. Pass an occurrence id such as {}_0",
            id,
            id
        );
    }

    let Some(instance) = InstanceId::parse(id) else {
        anyhow::bail!("'{}' is not an occurrence id", id);
    };

    let Some(event) = events
        .iter_mut()
        .find(|event| event.id == instance.original_id)
    else {
        anyhow::bail!("No event matches '{}'", instance.original_id);
    };

    match event.rule().validate() {
        Err(err) => anyhow::bail!(
            "'{}' has an invalid recurrence rule ({}), so it has no occurrences to cancel",
            event.id,
            err
        ),
        Ok((Cadence::Once, _)) => anyhow::bail!("'{}' does not repeat", event.id),
        Ok(_) => {}
    }

    if slot_start(event, instance.ordinal).is_none() {
        anyhow::bail!(
            "'{}' ends before occurrence #{}",
            event.id,
            instance.ordinal
        );
    }

    event.cancel_occurrence(instance.ordinal);

    Ok((event.title.clone(), instance.ordinal))
}
