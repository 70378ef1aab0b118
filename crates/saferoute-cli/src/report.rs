//! Plain-text comparison tables.

use saferoute_core::models::ScoredRoute;
use std::fmt::Write;

/// Render routes (in the order given) as an aligned table.
pub fn format_routes(routes: &[ScoredRoute]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<4} {:>4} {:>5}  {:<36} {:>9} {:>9}",
        "TAG", "RANK", "SCORE", "VERDICT", "DIST(km)", "TIME(min)"
    );
    for route in routes {
        let marker = if route.recommended { "  <- recommended" } else { "" };
        let _ = writeln!(
            out,
            "{:<4} {:>4} {:>5}  {:<36} {:>9.2} {:>9.1}{}",
            route.tag,
            route.rank,
            route.score,
            route.verdict_label,
            route.distance_km,
            route.duration_min,
            marker
        );
    }
    out
}
