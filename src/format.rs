//! Human-readable rendering of distances, durations, and turn
//! instructions.

use serde::{Deserialize, Serialize};

use crate::route::{Step, TurnModifier, TurnType};

/// Unit system for distance display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

/// Formats a distance in meters.
///
/// Metric shows kilometers at one decimal from 1000 m up, whole meters
/// below. Imperial shows miles at one decimal from 1 mi up, whole feet
/// below.
pub fn format_distance(meters: f64, units: Units) -> String {
    match units {
        Units::Metric => {
            if meters >= 1000.0 {
                format!("{:.1} km", meters / 1000.0)
            } else {
                format!("{} m", meters.round() as i64)
            }
        }
        Units::Imperial => {
            let miles = meters * 0.000_621_371;
            if miles >= 1.0 {
                format!("{:.1} mi", miles)
            } else {
                format!("{} ft", (meters * 3.28084).round() as i64)
            }
        }
    }
}

/// Formats a duration in seconds as `1h 5m` or `5m`. Partial minutes
/// are floored.
pub fn format_duration(seconds: f64) -> String {
    let hours = (seconds / 3600.0).floor() as i64;
    let minutes = ((seconds % 3600.0) / 60.0).floor() as i64;

    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

/// Instruction text for a step.
///
/// Prefers the provider's own instruction (with runs of whitespace
/// collapsed); composes one from the maneuver when the provider gave
/// none.
pub fn step_instruction(step: &Step) -> String {
    if let Some(raw) = &step.maneuver.instruction {
        let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        if !collapsed.is_empty() {
            return collapsed;
        }
    }
    compose_instruction(step)
}

fn compose_instruction(step: &Step) -> String {
    let name = step.name.trim();
    match step.maneuver.turn {
        TurnType::Depart => {
            if name.is_empty() {
                "Start".to_string()
            } else {
                format!("Start on {}", name)
            }
        }
        TurnType::Arrive => "Arrive at your destination".to_string(),
        _ => {
            let action = match step.maneuver.modifier {
                Some(TurnModifier::Uturn) => "Make a U-turn",
                Some(TurnModifier::SharpLeft) => "Turn sharp left",
                Some(TurnModifier::Left) => "Turn left",
                Some(TurnModifier::SlightLeft) => "Keep slightly left",
                Some(TurnModifier::Straight) | None => "Continue",
                Some(TurnModifier::SlightRight) => "Keep slightly right",
                Some(TurnModifier::Right) => "Turn right",
                Some(TurnModifier::SharpRight) => "Turn sharp right",
            };
            if name.is_empty() {
                action.to_string()
            } else {
                format!("{} onto {}", action, name)
            }
        }
    }
}
