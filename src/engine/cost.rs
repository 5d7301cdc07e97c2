//! Time-dependent edge cost (spec §4.4), grounded in the teacher's
//! `IsochroneRouter` bearing/distance helpers and the original
//! `cost_function.py`.

use super::craft::Craft;
use super::environment::EnvSample;
use super::geo_math::{angle_diff, bearing_deg, distance_nm};
use super::location::Location;

/// Boat speeds below this are treated as a stall (spec §4.4 step 5):
/// short-circuits a divide-by-near-zero and models an irrecoverable stall.
pub const MIN_SPEED_KN: f64 = 0.3;

/// Travel time between two nodes, or `None` for an infeasible edge
/// (speed below cutoff, or predicted failure probability above the
/// craft's tolerance). `None` is this crate's +inf sentinel.
///
/// `lifetime_hours` is the elapsed time since departure from the grid's
/// origin (spec §4.4 input list); the current failure model does not
/// consume it directly, but it is threaded through so alternative or
/// future failure models keyed on craft age can be dropped in without
/// changing the solver's call shape.
pub fn edge_cost_hours(
    from: &Location,
    to: &Location,
    env: &EnvSample,
    craft: &Craft,
    _lifetime_hours: f64,
) -> Option<f64> {
    let dist = distance_nm(from, to);
    let bearing = bearing_deg(from, to);

    let twa_rel = angle_diff(bearing, env.twd).abs();
    let wd_rel = angle_diff(bearing, env.wd).abs();

    let v = craft.speed_at(twa_rel, env.tws);
    if v < MIN_SPEED_KN {
        return None;
    }

    if craft.p_fail(env.tws, twa_rel, env.wh, wd_rel) > craft.reliability_tolerance() {
        return None;
    }

    Some(dist / v)
}
