//! Domain model for computed routes.
//!
//! A route is an overview geometry plus per-leg detail; a leg is the
//! stretch between two consecutive waypoints and carries the turn
//! steps for that stretch. All distances are meters, all durations
//! seconds.

use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;
use crate::polyline::Polyline;

/// A computed route between an ordered set of waypoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Total distance in meters.
    pub distance: f64,
    /// Total travel time in seconds.
    pub duration: f64,
    /// Overview geometry for the whole route.
    pub geometry: Polyline,
    /// One leg per consecutive waypoint pair.
    pub legs: Vec<Leg>,
}

/// The stretch of a route between two consecutive waypoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leg {
    pub distance: f64,
    pub duration: f64,
    /// Short road-name summary, empty when the provider gives none.
    pub summary: String,
    pub steps: Vec<Step>,
}

/// A single turn instruction within a leg.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub distance: f64,
    pub duration: f64,
    /// Road or path name, empty for unnamed ways.
    pub name: String,
    /// Provider travel mode for this step, e.g. `cycling`.
    pub travel_mode: String,
    pub geometry: Polyline,
    pub maneuver: Maneuver,
}

/// What to do at the start of a step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Maneuver {
    /// Provider-rendered instruction text, if any.
    pub instruction: Option<String>,
    pub turn: TurnType,
    pub modifier: Option<TurnModifier>,
    /// Where the maneuver happens.
    pub location: Coordinate,
}

/// Maneuver category as reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnType {
    Depart,
    Arrive,
    Turn,
    Continue,
    Merge,
    Fork,
    EndOfRoad,
    Roundabout,
    NewName,
    /// Anything this crate has no special rendering for.
    Other,
}

impl TurnType {
    /// Maps the provider's maneuver type string. Unknown strings fall
    /// back to [`TurnType::Other`] rather than failing the decode.
    pub fn from_wire(raw: &str) -> Self {
        match raw {
            "depart" => Self::Depart,
            "arrive" => Self::Arrive,
            "turn" => Self::Turn,
            "continue" => Self::Continue,
            "merge" => Self::Merge,
            "fork" => Self::Fork,
            "end of road" => Self::EndOfRoad,
            "roundabout" | "rotary" => Self::Roundabout,
            "new name" => Self::NewName,
            _ => Self::Other,
        }
    }
}

/// Direction qualifier attached to a maneuver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnModifier {
    Uturn,
    SharpLeft,
    Left,
    SlightLeft,
    Straight,
    SlightRight,
    Right,
    SharpRight,
}

impl TurnModifier {
    /// Maps the provider's modifier string; unknown values are `None`.
    pub fn from_wire(raw: &str) -> Option<Self> {
        match raw {
            "uturn" => Some(Self::Uturn),
            "sharp left" => Some(Self::SharpLeft),
            "left" => Some(Self::Left),
            "slight left" => Some(Self::SlightLeft),
            "straight" => Some(Self::Straight),
            "slight right" => Some(Self::SlightRight),
            "right" => Some(Self::Right),
            "sharp right" => Some(Self::SharpRight),
            _ => None,
        }
    }
}

/// Position of a step within a route: leg index, then step index
/// within that leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepRef {
    pub leg: usize,
    pub step: usize,
}

impl Route {
    /// Sum of leg distances. Matches `distance` up to provider
    /// rounding.
    pub fn legs_distance(&self) -> f64 {
        self.legs.iter().map(|leg| leg.distance).sum()
    }

    /// Sum of leg durations.
    pub fn legs_duration(&self) -> f64 {
        self.legs.iter().map(|leg| leg.duration).sum()
    }

    /// Looks up a step by position; `None` when either index is out
    /// of range.
    pub fn step(&self, at: StepRef) -> Option<&Step> {
        self.legs.get(at.leg)?.steps.get(at.step)
    }
}

impl Leg {
    /// Reconstructs the leg geometry by stitching its step geometries
    /// together.
    pub fn stitched_geometry(&self) -> Polyline {
        Polyline::concat(self.steps.iter().map(|step| &step.geometry))
    }
}
