//! Route builders with realistic leg/step structure.

use route_planner::geo::Coordinate;
use route_planner::polyline::Polyline;
use route_planner::route::{Leg, Maneuver, Route, Step, TurnModifier, TurnType};

pub fn coord(lat: f64, lng: f64) -> Coordinate {
    Coordinate::new(lat, lng)
}

fn step(
    distance: f64,
    duration: f64,
    name: &str,
    turn: TurnType,
    modifier: Option<TurnModifier>,
    geometry: Vec<Coordinate>,
) -> Step {
    let location = geometry.first().copied().unwrap_or(Coordinate::new(0.0, 0.0));
    Step {
        distance,
        duration,
        name: name.to_string(),
        travel_mode: "cycling".to_string(),
        geometry: Polyline::new(geometry),
        maneuver: Maneuver {
            instruction: None,
            turn,
            modifier,
            location,
        },
    }
}

/// Single-leg route from `from` to `to`: depart, one left turn at the
/// midpoint, arrive. Totals are consistent with the step sums and the
/// step geometries stitch into the overview geometry.
pub fn sample_route(from: Coordinate, to: Coordinate) -> Route {
    let mid = coord((from.lat + to.lat) / 2.0, (from.lng + to.lng) / 2.0);

    let steps = vec![
        step(
            800.0,
            160.0,
            "Valencia St",
            TurnType::Depart,
            None,
            vec![from, mid],
        ),
        step(
            400.0,
            80.0,
            "Market St",
            TurnType::Turn,
            Some(TurnModifier::Left),
            vec![mid, to],
        ),
        step(0.0, 0.0, "", TurnType::Arrive, None, vec![to]),
    ];

    Route {
        distance: 1200.0,
        duration: 240.0,
        geometry: Polyline::new(vec![from, mid, to]),
        legs: vec![Leg {
            distance: 1200.0,
            duration: 240.0,
            summary: "Valencia St, Market St".to_string(),
            steps,
        }],
    }
}

/// A longer alternative for the same endpoints, detouring north.
pub fn alternative_route(from: Coordinate, to: Coordinate) -> Route {
    let via = coord(
        (from.lat + to.lat) / 2.0 + 0.01,
        (from.lng + to.lng) / 2.0,
    );

    let steps = vec![
        step(
            900.0,
            200.0,
            "Folsom St",
            TurnType::Depart,
            None,
            vec![from, via],
        ),
        step(
            600.0,
            100.0,
            "Harrison St",
            TurnType::Turn,
            Some(TurnModifier::Right),
            vec![via, to],
        ),
        step(0.0, 0.0, "", TurnType::Arrive, None, vec![to]),
    ];

    Route {
        distance: 1500.0,
        duration: 300.0,
        geometry: Polyline::new(vec![from, via, to]),
        legs: vec![Leg {
            distance: 1500.0,
            duration: 300.0,
            summary: "Folsom St, Harrison St".to_string(),
            steps,
        }],
    }
}
