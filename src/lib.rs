//! trip-planner client core
//!
//! Presentation and history-management core for a trip-itinerary planning
//! client: reconstructs a temporal schedule from an ordered itinerary,
//! keeps a bounded persistent cache of past queries, and derives the map
//! viewport and route geometry for whichever itinerary is on display.
//! Route optimization itself is an external HTTP service; only its
//! request/response contract lives here.

pub mod model;
pub mod timeline;
pub mod map;
pub mod storage;
pub mod history;
pub mod engine;
pub mod session;
