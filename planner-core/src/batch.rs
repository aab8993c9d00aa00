//! Expansion of a whole event list for a calendar window.

use tracing::debug;

use crate::event::{EventDefinition, Occurrence};
use crate::generator::generate;
use crate::window::Window;

/// Expand every event for `window`, concatenated in input order.
///
/// Each event's own occurrences are chronological, but the result as a whole
/// is NOT sorted across events. Use [`sort_chronologically`] for that.
pub fn expand_all(events: &[EventDefinition], window: &Window) -> Vec<Occurrence> {
    let occurrences: Vec<Occurrence> = events
        .iter()
        .flat_map(|event| generate(event, window))
        .collect();

    debug!(
        events = events.len(),
        occurrences = occurrences.len(),
        window_start = %window.start,
        window_end = %window.end,
        "Expanded events"
    );

    occurrences
}

/// Stable sort by start time across events.
pub fn sort_chronologically(occurrences: &mut [Occurrence]) {
    occurrences.sort_by_key(|occurrence| occurrence.start);
}
