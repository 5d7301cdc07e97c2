//! Bundles the five environmental fields the cost function needs (spec
//! §6): wind speed/direction, wave height/direction/period.

use chrono::{DateTime, Utc};

use crate::error::{Result, RoutingError};

use super::field::EnvironmentField;
use super::location::Location;

/// A single-point sample of the environment, as consumed by the cost
/// function (spec §4.4).
#[derive(Debug, Clone, Copy)]
pub struct EnvSample {
    /// True wind speed, knots.
    pub tws: f64,
    /// True wind direction, degrees (0 = N, clockwise).
    pub twd: f64,
    /// Wave direction, degrees.
    pub wd: f64,
    /// Significant wave height, meters.
    pub wh: f64,
    /// Wave period, seconds.
    pub wp: f64,
}

pub struct Environment {
    wind_speed: EnvironmentField,
    wind_dir: EnvironmentField,
    wave_dir: EnvironmentField,
    wave_height: EnvironmentField,
    wave_period: EnvironmentField,
}

impl Environment {
    pub fn new(
        wind_speed: EnvironmentField,
        wind_dir: EnvironmentField,
        wave_dir: EnvironmentField,
        wave_height: EnvironmentField,
        wave_period: EnvironmentField,
    ) -> Result<Self> {
        let mode = wind_speed.mode();
        let all_same = [&wind_dir, &wave_dir, &wave_height, &wave_period]
            .iter()
            .all(|f| f.mode() == mode);
        if !all_same {
            return Err(RoutingError::InconsistentInterpolationMode);
        }
        Ok(Self { wind_speed, wind_dir, wave_dir, wave_height, wave_period })
    }

    /// The interpolation mode shared by all five fields (enforced in `new`).
    pub fn mode(&self) -> super::field::InterpolationMode {
        self.wind_speed.mode()
    }

    pub fn sample(&self, loc: &Location, t: DateTime<Utc>) -> EnvSample {
        EnvSample {
            tws: self.wind_speed.at(loc, t),
            twd: self.wind_dir.at(loc, t),
            wd: self.wave_dir.at(loc, t),
            wh: self.wave_height.at(loc, t),
            wp: self.wave_period.at(loc, t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::field::InterpolationMode;
    use chrono::TimeZone;

    fn flat(value: f64, mode: InterpolationMode) -> EnvironmentField {
        EnvironmentField::new(vec![-1.0, 1.0], vec![-1.0, 1.0], vec![0, 10], vec![value; 8], mode).unwrap()
    }

    #[test]
    fn sample_reads_all_five_fields() {
        let env = Environment::new(
            flat(15.0, InterpolationMode::Nearest),
            flat(270.0, InterpolationMode::Nearest),
            flat(200.0, InterpolationMode::Nearest),
            flat(1.0, InterpolationMode::Nearest),
            flat(8.0, InterpolationMode::Nearest),
        )
        .unwrap();
        let t = Utc.timestamp_opt(0, 0).unwrap();
        let s = env.sample(&Location::new(0.0, 0.0), t);
        assert_eq!((s.tws, s.twd, s.wd, s.wh, s.wp), (15.0, 270.0, 200.0, 1.0, 8.0));
    }

    #[test]
    fn rejects_mixed_interpolation_modes() {
        let err = Environment::new(
            flat(1.0, InterpolationMode::Nearest),
            flat(1.0, InterpolationMode::Trilinear),
            flat(1.0, InterpolationMode::Nearest),
            flat(1.0, InterpolationMode::Nearest),
            flat(1.0, InterpolationMode::Nearest),
        );
        assert!(err.is_err());
    }
}
