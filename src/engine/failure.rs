//! Discrete Bayesian failure model (spec §3, §4.3, §6 CPTs).
//!
//! The network {TWS_hi, TWA_lo, WH_hi, WD_lo} -> {WindCond, WaveCond} ->
//! Fail is singly connected and entirely binary, so per spec §9 the
//! marginal `P(Fail=1 | TWS_hi, TWA_lo, WH_hi, WD_lo)` reduces to a
//! 16-entry lookup computed once at construction from the CPTs below —
//! no Bayesian-network crate is pulled in for this.

use crate::error::{Result, RoutingError};

/// `P(node=1 | parents)` for a two-parent binary CPT, keyed
/// `table[(parent_a as usize) << 1 | parent_b as usize]`.
#[derive(Debug, Clone, Copy)]
struct Cpt2 {
    table: [f64; 4],
}

impl Cpt2 {
    fn new(p00: f64, p01: f64, p10: f64, p11: f64) -> Self {
        Self { table: [p00, p01, p10, p11] }
    }

    fn p(&self, a: bool, b: bool) -> f64 {
        self.table[((a as usize) << 1) | (b as usize)]
    }
}

/// Thresholds used to binarize the continuous environmental inputs
/// (spec §3). `TWS_hi` defaults to 25 kn per the spec §9 open-question
/// resolution; `twa_lo` is retained only to document that it is always
/// false (the predicate in the source is dead once `twa_rel` has already
/// been restricted to `[0, 180]` by an `abs()`), not recomputed per call.
#[derive(Debug, Clone, Copy)]
pub struct FailureThresholds {
    pub tws_hi_kn: f64,
    pub wh_hi_m: f64,
    pub wd_lo_deg: f64,
}

impl Default for FailureThresholds {
    fn default() -> Self {
        Self { tws_hi_kn: 25.0, wh_hi_m: 3.0, wd_lo_deg: 60.0 }
    }
}

/// Precomputed craft-failure probability lookup.
#[derive(Debug, Clone)]
pub struct FailureModel {
    thresholds: FailureThresholds,
    /// `lut[tws_hi][wh_hi][wd_lo]`, TWA_lo folded in as always-false.
    lut: [[[f64; 2]; 2]; 2],
}

impl FailureModel {
    /// Builds the model from the authoritative CPTs in spec §6.
    pub fn new(thresholds: FailureThresholds) -> Result<Self> {
        if thresholds.tws_hi_kn <= 0.0 || thresholds.wh_hi_m <= 0.0 {
            return Err(RoutingError::MalformedTable(
                "failure model thresholds must be positive".into(),
            ));
        }
        let wind_cond = Cpt2::new(0.0, 0.9, 0.9, 1.0); // parents (TWA_lo, TWS_hi)
        let wave_cond = Cpt2::new(0.0, 0.9, 0.9, 1.0); // parents (WH_hi, WD_lo)
        let fail = Cpt2::new(0.0, 0.9, 0.9, 1.0); // parents (WaveCond, WindCond)

        // TWA_lo is structurally always false (spec §9): `|relative wind
        // angle| < 0` never holds once the absolute value has been taken.
        const TWA_LO: bool = false;

        let mut lut = [[[0.0_f64; 2]; 2]; 2];
        for tws_hi in [false, true] {
            let p_wind = wind_cond.p(TWA_LO, tws_hi);
            for wh_hi in [false, true] {
                for wd_lo in [false, true] {
                    let p_wave = wave_cond.p(wh_hi, wd_lo);
                    // Marginalize the two intermediate binary nodes.
                    let p_fail = (1.0 - p_wind) * (1.0 - p_wave) * fail.p(false, false)
                        + (1.0 - p_wind) * p_wave * fail.p(true, false)
                        + p_wind * (1.0 - p_wave) * fail.p(false, true)
                        + p_wind * p_wave * fail.p(true, true);
                    lut[tws_hi as usize][wh_hi as usize][wd_lo as usize] = p_fail;
                }
            }
        }

        Ok(Self { thresholds, lut })
    }

    /// Probability of craft failure given the environment at an edge.
    ///
    /// `twa_rel` is accepted for interface symmetry with spec §4.3 but is
    /// never consulted: TWA_lo is always false (see `new`).
    pub fn p_fail(&self, tws: f64, _twa_rel: f64, wh: f64, wd_rel: f64) -> f64 {
        let tws_hi = tws > self.thresholds.tws_hi_kn;
        let wh_hi = wh > self.thresholds.wh_hi_m;
        let wd_lo = wd_rel < self.thresholds.wd_lo_deg;
        self.lut[tws_hi as usize][wh_hi as usize][wd_lo as usize]
    }
}

impl Default for FailureModel {
    fn default() -> Self {
        Self::new(FailureThresholds::default()).expect("default thresholds are valid")
    }
}
