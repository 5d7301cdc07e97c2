//! The craft aggregate (spec §9 design note): a single struct bundling
//! `Polar`, `FailureModel`, and the reliability tolerance, replacing the
//! dynamic-dispatch craft objects of the original implementation. The
//! solver only ever calls `speed_at` and `p_fail`, so no trait object is
//! needed.

use super::failure::FailureModel;
use super::polar::Polar;
use crate::error::{Result, RoutingError};

#[derive(Debug, Clone)]
pub struct Craft {
    polar: Polar,
    failure_model: FailureModel,
    reliability_tolerance: f64,
}

impl Craft {
    pub fn new(polar: Polar, failure_model: FailureModel, reliability_tolerance: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&reliability_tolerance) {
            return Err(RoutingError::OutOfUnitRange(reliability_tolerance));
        }
        Ok(Self { polar, failure_model, reliability_tolerance })
    }

    pub fn speed_at(&self, twa_rel: f64, tws: f64) -> f64 {
        self.polar.speed_at(twa_rel, tws)
    }

    pub fn p_fail(&self, tws: f64, twa_rel: f64, wh: f64, wd_rel: f64) -> f64 {
        self.failure_model.p_fail(tws, twa_rel, wh, wd_rel)
    }

    pub fn reliability_tolerance(&self) -> f64 {
        self.reliability_tolerance
    }

    pub fn polar(&self) -> &Polar {
        &self.polar
    }
}
