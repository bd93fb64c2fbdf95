//! Routing preferences and their provider query mapping.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How strongly the route should avoid or seek climbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HillPreference {
    #[default]
    None,
    Avoid,
    Prefer,
}

/// Overall character of the requested route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RouteCharacter {
    #[default]
    Balanced,
    Fastest,
    Quietest,
}

/// Surface constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Surface {
    #[default]
    Any,
    Paved,
}

/// Travel profile used for routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TravelMode {
    #[default]
    Cycling,
    Walking,
}

impl TravelMode {
    /// Provider profile segment for the route URL.
    pub fn profile(&self) -> &'static str {
        match self {
            Self::Cycling => "cycling",
            Self::Walking => "walking",
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.profile())
    }
}

/// User routing preferences, mapped onto provider query parameters at
/// request time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoutePreferences {
    pub hills: HillPreference,
    pub character: RouteCharacter,
    pub surface: Surface,
}

impl RoutePreferences {
    /// Extra query parameters this preference set adds to a directions
    /// request. Defaults add nothing, so a stock provider that rejects
    /// unknown parameters still works.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();

        let mut exclusions: Vec<&str> = Vec::new();
        if self.surface == Surface::Paved {
            exclusions.push("unpaved");
        }
        if self.character == RouteCharacter::Quietest {
            exclusions.push("primary");
        }
        if !exclusions.is_empty() {
            params.push(("exclude", exclusions.join(",")));
        }

        match self.hills {
            HillPreference::Avoid => params.push(("avoid_steep", "true".to_string())),
            HillPreference::Prefer => params.push(("avoid_steep", "false".to_string())),
            HillPreference::None => {}
        }

        if self.character == RouteCharacter::Fastest {
            params.push(("continue_straight", "true".to_string()));
        }

        params
    }
}
