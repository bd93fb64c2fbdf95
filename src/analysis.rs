//! Route quality analysis: path-type breakdown, safety scoring, and
//! elevation statistics.

use serde::{Deserialize, Serialize};

use crate::route::{Route, Step};

/// Spacing between elevation samples in meters.
pub const SAMPLE_INTERVAL_M: f64 = 10.0;

/// How suitable a stretch of road is for cycling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathClass {
    /// Dedicated cycling infrastructure.
    DedicatedPath,
    /// Quiet residential or tertiary streets.
    QuietRoad,
    /// Busier roads that still accommodate cyclists.
    SharedRoad,
    /// Everything else.
    Regular,
}

impl PathClass {
    /// Classifies a step from its travel mode and road name.
    pub fn of(step: &Step) -> Self {
        let mode = step.travel_mode.to_lowercase();
        let name = step.name.to_lowercase();

        if mode.contains("cycleway") || name.contains("bike") || name.contains("trail") {
            Self::DedicatedPath
        } else if mode.contains("residential") || mode.contains("tertiary") {
            Self::QuietRoad
        } else if mode.contains("secondary") || mode.contains("primary") {
            Self::SharedRoad
        } else {
            Self::Regular
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::DedicatedPath => "Dedicated bike path",
            Self::QuietRoad => "Bike-friendly road",
            Self::SharedRoad => "Shared road with bike accommodation",
            Self::Regular => "Regular road",
        }
    }

    /// Display color, hex RGB.
    pub fn color(&self) -> &'static str {
        match self {
            Self::DedicatedPath => "#22c55e",
            Self::QuietRoad => "#3b82f6",
            Self::SharedRoad => "#eab308",
            Self::Regular => "#ef4444",
        }
    }

    /// Safety weight in `[0, 1]`.
    pub fn safety_score(&self) -> f64 {
        match self {
            Self::DedicatedPath => 1.0,
            Self::QuietRoad => 0.8,
            Self::SharedRoad => 0.6,
            Self::Regular => 0.4,
        }
    }

    const ALL: [Self; 4] = [
        Self::DedicatedPath,
        Self::QuietRoad,
        Self::SharedRoad,
        Self::Regular,
    ];
}

/// Distance share of one path class within a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathShare {
    pub class: PathClass,
    /// Meters of the route in this class.
    pub distance: f64,
    /// Share of the route distance, 0 to 100.
    pub percentage: f64,
}

/// Path-type composition and distance-weighted safety score of a
/// route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteBreakdown {
    /// Non-empty classes, in fixed class order.
    pub shares: Vec<PathShare>,
    /// Distance-weighted mean of per-class safety, in `[0, 1]`.
    pub safety_score: f64,
}

impl RouteBreakdown {
    pub fn analyze(route: &Route) -> Self {
        let mut class_distance = [0.0f64; PathClass::ALL.len()];
        let mut weighted_safety = 0.0;

        for leg in &route.legs {
            for step in &leg.steps {
                let class = PathClass::of(step);
                let slot = PathClass::ALL.iter().position(|c| *c == class).unwrap();
                class_distance[slot] += step.distance;
                weighted_safety += class.safety_score() * step.distance;
            }
        }

        if route.distance <= 0.0 {
            return Self {
                shares: Vec::new(),
                safety_score: 0.0,
            };
        }

        let shares = PathClass::ALL
            .iter()
            .zip(class_distance)
            .filter(|(_, distance)| *distance > 0.0)
            .map(|(class, distance)| PathShare {
                class: *class,
                distance,
                percentage: distance / route.distance * 100.0,
            })
            .collect();

        Self {
            shares,
            safety_score: weighted_safety / route.distance,
        }
    }
}

/// Climb statistics derived from elevation samples taken at
/// [`SAMPLE_INTERVAL_M`] spacing along a route.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ElevationStats {
    /// Total meters climbed.
    pub total_ascent: f64,
    /// Total meters descended.
    pub total_descent: f64,
    /// Steepest gradient magnitude, percent.
    pub max_gradient: f64,
    /// Mean gradient magnitude, percent.
    pub average_gradient: f64,
}

impl ElevationStats {
    /// Computes stats over consecutive sample pairs. Fewer than two
    /// samples yields all zeros.
    pub fn from_samples(samples: &[f64]) -> Self {
        if samples.len() < 2 {
            return Self::default();
        }

        let mut stats = Self::default();
        let mut gradient_total = 0.0;

        for pair in samples.windows(2) {
            let diff = pair[1] - pair[0];
            if diff > 0.0 {
                stats.total_ascent += diff;
            } else {
                stats.total_descent += diff.abs();
            }

            let gradient = (diff / SAMPLE_INTERVAL_M * 100.0).abs();
            stats.max_gradient = stats.max_gradient.max(gradient);
            gradient_total += gradient;
        }

        stats.average_gradient = gradient_total / (samples.len() - 1) as f64;
        stats
    }
}
