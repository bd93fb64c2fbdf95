//! route-planner core
//!
//! Interaction core for click-to-route planning: collect waypoints,
//! fetch directions with alternatives, draw and highlight them on a
//! map surface, reset. Rendering and HTTP backends plug in through
//! the traits module.

pub mod traits;
pub mod planner;
pub mod session;
pub mod search;
pub mod map_view;
pub mod directions;
pub mod geocoding;
pub mod osrm_data;
pub mod geo;
pub mod polyline;
pub mod route;
pub mod prefs;
pub mod format;
pub mod analysis;
