//! Test fixtures for trip-planner.
//!
//! Provides realistic test data including:
//! - Real Hanoi / Danang points of interest (from OpenStreetMap)
//! - A builder for ad-hoc catalog locations

pub mod vietnam_locations;

pub use vietnam_locations::*;
