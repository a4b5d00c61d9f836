//! Map state derived from the active itinerary.
//!
//! The viewport and route geometry are recomputed in full whenever the
//! displayed itinerary changes. Itineraries are small (bounded by the trip
//! time window), so there is no incremental update path.

use serde::{Deserialize, Serialize};

use crate::model::Location;

/// Margin added around the fitted viewport, in degrees.
pub const VIEWPORT_MARGIN_DEG: f64 = 0.01;

/// Default map center when nothing better is known (Hanoi).
pub const DEFAULT_CENTER: (f64, f64) = (21.0285, 105.8542);

/// Default map centers for the known catalog cities.
pub fn city_center(city: &str) -> Option<(f64, f64)> {
    match city.to_ascii_lowercase().as_str() {
        "hanoi" => Some((21.0285, 105.8542)),
        "danang" => Some((16.0544, 108.2022)),
        _ => None,
    }
}

/// A latitude/longitude bounding box with a rendering margin applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    pub fn center(&self) -> (f64, f64) {
        (
            (self.south + self.north) / 2.0,
            (self.west + self.east) / 2.0,
        )
    }
}

/// Fit a viewport around every location, expanded by `margin` degrees.
///
/// An empty slice degenerates to a point box around `default_center`; a
/// single location degenerates to a point box around that location.
pub fn viewport(locations: &[Location], default_center: (f64, f64), margin: f64) -> Bounds {
    let mut points = locations.iter().map(Location::coords);

    let Some((first_lat, first_lng)) = points.next() else {
        return Bounds {
            south: default_center.0 - margin,
            west: default_center.1 - margin,
            north: default_center.0 + margin,
            east: default_center.1 + margin,
        };
    };

    let mut south = first_lat;
    let mut north = first_lat;
    let mut west = first_lng;
    let mut east = first_lng;
    for (lat, lng) in points {
        south = south.min(lat);
        north = north.max(lat);
        west = west.min(lng);
        east = east.max(lng);
    }

    Bounds {
        south: south - margin,
        west: west - margin,
        north: north + margin,
        east: east + margin,
    }
}

/// A route geometry as decoded coordinate points in visitation order.
///
/// Stores latitude/longitude pairs directly for internal processing.
/// Encoding to a map widget's own line format happens at the rendering
/// boundary, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutePath {
    points: Vec<(f64, f64)>,
}

impl RoutePath {
    /// Project an itinerary into connective geometry.
    ///
    /// A route is only drawn between two or more locations; under that the
    /// path is empty.
    pub fn from_itinerary(itinerary: &[Location]) -> Self {
        if itinerary.len() < 2 {
            return Self { points: Vec::new() };
        }
        Self {
            points: itinerary.iter().map(Location::coords).collect(),
        }
    }

    /// Returns a reference to the coordinate points.
    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    /// Consumes the path and returns the owned coordinate points.
    pub fn into_points(self) -> Vec<(f64, f64)> {
        self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Viewport and route geometry for the itinerary currently on display.
#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    pub bounds: Bounds,
    pub route: RoutePath,
}

impl MapView {
    /// Full recompute from the active itinerary.
    pub fn sync(itinerary: &[Location], default_center: (f64, f64)) -> Self {
        Self {
            bounds: viewport(itinerary, default_center, VIEWPORT_MARGIN_DEG),
            route: RoutePath::from_itinerary(itinerary),
        }
    }
}
