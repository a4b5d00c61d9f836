//! Arrival-time reconstruction for an ordered itinerary.
//!
//! Visitation is modeled as strictly sequential: the arrival time at stop
//! `i` is the start of day plus every visit duration before it. Travel
//! time between stops is not part of the model.

use crate::model::Location;

const MINUTES_PER_HOUR: u32 = 60;
const HOURS_PER_DAY: u32 = 24;

/// How to render an arrival time that runs past midnight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClockPolicy {
    /// Hour component keeps counting past 24 (`25:30`).
    #[default]
    Continuous,
    /// Hour component wraps at 24 for multi-day display (`01:30`).
    WrapMidnight,
}

/// Exclusive prefix sums of visit durations.
///
/// The offset at index `i` is the total minutes spent at stops before `i`,
/// so the first stop is always at offset zero. Empty input yields empty
/// output.
pub fn arrival_offsets(durations: &[u32]) -> Vec<u32> {
    let mut offsets = Vec::with_capacity(durations.len());
    let mut elapsed = 0;
    for duration in durations {
        offsets.push(elapsed);
        elapsed += duration;
    }
    offsets
}

/// Format an absolute minute count as zero-padded `HH:MM`.
pub fn format_clock(total_minutes: u32, policy: ClockPolicy) -> String {
    let mut hours = total_minutes / MINUTES_PER_HOUR;
    if policy == ClockPolicy::WrapMidnight {
        hours %= HOURS_PER_DAY;
    }
    format!("{:02}:{:02}", hours, total_minutes % MINUTES_PER_HOUR)
}

/// Arrival clock labels for each stop of an itinerary, in visitation order.
pub fn arrival_labels(start_hour: u32, itinerary: &[Location], policy: ClockPolicy) -> Vec<String> {
    let durations: Vec<u32> = itinerary.iter().map(|loc| loc.time_visit).collect();
    arrival_offsets(&durations)
        .into_iter()
        .map(|offset| format_clock(start_hour * MINUTES_PER_HOUR + offset, policy))
        .collect()
}
