//! Real Hanoi / Danang points of interest for realistic test fixtures.
//!
//! Coordinates sourced from OpenStreetMap; prices are plausible VND entry
//! fees and durations are typical visit lengths.

use trip_planner::model::{Category, Location};

pub fn location(
    id: u32,
    name: &str,
    city: &str,
    price: f64,
    category: Category,
    time_visit: u32,
    rating: f64,
    lat: f64,
    lng: f64,
) -> Location {
    Location {
        id,
        name: name.to_string(),
        city: city.to_string(),
        price,
        category,
        time_visit,
        rating,
        lat,
        lng,
    }
}

// ============================================================================
// Hanoi
// ============================================================================

pub fn hanoi() -> Vec<Location> {
    vec![
        location(
            1,
            "Hoan Kiem Lake",
            "Hanoi",
            0.0,
            Category::Nature,
            60,
            4.6,
            21.0287,
            105.8524,
        ),
        location(
            2,
            "Temple of Literature",
            "Hanoi",
            30_000.0,
            Category::History,
            90,
            4.5,
            21.0293,
            105.8354,
        ),
        location(
            3,
            "Hoa Lo Prison Relic",
            "Hanoi",
            30_000.0,
            Category::History,
            75,
            4.4,
            21.0253,
            105.8464,
        ),
        location(
            4,
            "Thang Long Water Puppet Theatre",
            "Hanoi",
            100_000.0,
            Category::Culture,
            60,
            4.3,
            21.0318,
            105.8533,
        ),
        location(
            5,
            "Pho Bat Dan",
            "Hanoi",
            50_000.0,
            Category::Food,
            45,
            4.5,
            21.0339,
            105.8466,
        ),
        location(
            6,
            "West Lake",
            "Hanoi",
            0.0,
            Category::Nature,
            90,
            4.2,
            21.0587,
            105.8230,
        ),
    ]
}

// ============================================================================
// Danang
// ============================================================================

pub fn danang() -> Vec<Location> {
    vec![
        location(
            11,
            "My Khe Beach",
            "Danang",
            0.0,
            Category::Beach,
            120,
            4.6,
            16.0610,
            108.2469,
        ),
        location(
            12,
            "Marble Mountains",
            "Danang",
            40_000.0,
            Category::Nature,
            120,
            4.5,
            16.0039,
            108.2631,
        ),
        location(
            13,
            "Dragon Bridge",
            "Danang",
            0.0,
            Category::Entertainment,
            30,
            4.4,
            16.0614,
            108.2272,
        ),
        location(
            14,
            "Han Market",
            "Danang",
            20_000.0,
            Category::Food,
            60,
            4.1,
            16.0678,
            108.2240,
        ),
        location(
            15,
            "Linh Ung Pagoda",
            "Danang",
            0.0,
            Category::Culture,
            90,
            4.7,
            16.1004,
            108.2780,
        ),
    ]
}
