//! Shared data shapes for the planning client.
//!
//! These mirror the optimization engine's JSON exactly; everything else in
//! the crate consumes them. Locations and results are immutable once
//! received from the engine.

use serde::{Deserialize, Serialize};

/// Category of a point of interest.
///
/// The catalog uses a fixed set; `Other` absorbs values this client does
/// not know so a catalog refresh never fails to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Food,
    History,
    Culture,
    Nature,
    Beach,
    Entertainment,
    #[serde(other)]
    Other,
}

/// Visiting pace requested from the optimizer.
///
/// Trades stop count against dwell time on the engine side; the client
/// only passes it through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pace {
    Fast,
    #[default]
    Normal,
    Slow,
}

/// A point of interest as served by the location catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Unique within a city's catalog.
    pub id: u32,
    pub name: String,
    pub city: String,
    /// Entry price, non-negative currency amount.
    pub price: f64,
    pub category: Category,
    /// Minutes spent at this location.
    pub time_visit: u32,
    pub rating: f64,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    /// Location coordinates as (lat, lng).
    pub fn coords(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }
}

/// An optimized itinerary returned by the engine.
///
/// `itinerary` order is visitation order, not id or geographic order, and
/// must never be re-sorted by the display layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItineraryResult {
    pub itinerary: Vec<Location>,
    /// Sum of constituent prices, computed by the engine.
    pub total_cost: f64,
    pub total_duration_minutes: u32,
    pub location_count: usize,
}

impl ItineraryResult {
    /// Whether the engine-reported count matches the itinerary length.
    pub fn count_consistent(&self) -> bool {
        self.location_count == self.itinerary.len()
    }
}

/// The parameters that produced a result. Immutable once issued.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripQuery {
    pub city: String,
    pub budget: f64,
    /// Hour of day, 0-23.
    pub start_time: u32,
    pub end_time: u32,
    pub pace: Pace,
    #[serde(default)]
    pub start_point_id: Option<u32>,
    #[serde(default)]
    pub must_visit_ids: Vec<u32>,
}

/// One past optimize invocation: query, result, and creation instant.
///
/// `timestamp` is epoch milliseconds and doubles as the entry's unique key
/// within the history cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub query: TripQuery,
    pub result: ItineraryResult,
    pub timestamp: u64,
}
