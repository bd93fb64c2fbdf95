//! Test fixtures for route-planner.
//!
//! Provides a recording map surface, route builders, and scripted
//! providers shared across the test binaries.

#[allow(dead_code)]
pub mod providers;
#[allow(dead_code)]
pub mod routes;
#[allow(dead_code)]
pub mod surface;
