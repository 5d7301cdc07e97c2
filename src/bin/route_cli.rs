use std::time::Instant;

use chrono::Utc;
use sail_isochrone::engine::craft::Craft;
use sail_isochrone::engine::environment::Environment;
use sail_isochrone::engine::field::{EnvironmentField, InterpolationMode};
use sail_isochrone::engine::solver;
use sail_isochrone::{FailureModel, Location, Polar, RoaringLandMask, Route, SolveConfig};

/// Builds a flat, uniform environment field for the demo run: real
/// deployments load gridded forecasts through `crate::adapters` instead.
fn uniform_field(value: f64) -> EnvironmentField {
    EnvironmentField::new(
        vec![-180.0, 180.0],
        vec![-90.0, 90.0],
        vec![0, 1_000_000_000],
        vec![value; 8],
        InterpolationMode::Nearest,
    )
    .expect("uniform demo field is well-formed")
}

fn main() {
    env_logger::init();
    println!("--- Isochrone Route Solver CLI ---");

    let start = Location::new(-5.0, 48.0); // off Brittany
    let finish = Location::new(-10.0, 40.0); // towards the Azores

    println!("Loading polar...");
    let polar = sail_isochrone::adapters::polar_csv::load_polar_csv("data/first_40.csv", 1.0)
        .unwrap_or_else(|err| {
            println!("falling back to a flat demo polar ({err})");
            Polar::new(vec![0.0, 180.0], vec![0.0, 40.0], vec![vec![0.0, 8.0], vec![0.0, 8.0]], 1.0)
                .expect("flat demo polar is well-formed")
        });
    let craft = Craft::new(polar, FailureModel::default(), 0.8).expect("demo craft is well-formed");

    let config = SolveConfig::new(24, 9, 8000.0, Utc::now(), InterpolationMode::Nearest).expect("demo config is valid");

    let land_mask = RoaringLandMask::empty();
    let route = Route::new_from_config(start, finish, craft, &land_mask, &config).expect("route builds");

    let environment = Environment::new(
        uniform_field(18.0),  // wind speed, kn
        uniform_field(10.0),  // wind direction, deg
        uniform_field(190.0), // wave direction, deg
        uniform_field(1.5),   // wave height, m
        uniform_field(8.0),   // wave period, s
    )
    .expect("demo environment is well-formed");

    let t0 = Instant::now();
    let result = solver::solve(&route, &environment, &config).expect("solve does not fail fatally");
    println!("solved in {:?}", t0.elapsed());

    match result.journey_time {
        sail_isochrone::JourneyTime::Arrived(t) => {
            println!("arrived at {t}, passing through {} nodes", result.path.len());
        }
        sail_isochrone::JourneyTime::VoyageFailed => {
            println!("voyage failed: no feasible route under the reliability tolerance");
        }
    }
}
