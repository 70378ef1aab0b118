//! SafeRoute CLI - command line tools for the route safety engine.
//!
//! Binaries:
//! - score_routes: rank route geometries from a file against a catalog
//! - generate_catalog: write a seeded synthetic catalog
//! - plan_route: ask a running server for ranked routes between two places

pub mod client;
pub mod report;

pub use client::{PlanResponse, SafeRouteClient};
pub use report::format_routes;
