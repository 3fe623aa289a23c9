//! Closure statistics and consistency checks of a propagated traverse.

use crate::compute::CorrectionLedger;
use crate::config::Tolerances;
use crate::store::{PointId, Traverse, TraverseError};
use serde::{Serialize, Deserialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckStatus {
    Passed,
    Failed,
    /// A reading or elevation needed by the check is absent.
    Incomplete,
}

/// Cross-check of one mid-sight against the next anchor:
/// `H(M) + (m - v) = H(W)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MidSightCheck {
    pub mid: PointId,
    pub mid_label: String,
    pub anchor: PointId,
    pub anchor_label: String,
    pub mid_elevation: Option<f64>,
    pub anchor_elevation: Option<f64>,
    pub mid_sight: Option<f64>,
    pub fore_sight: Option<f64>,
    /// `m - v`
    pub height_difference: Option<f64>,
    pub expected_elevation: Option<f64>,
    /// `expected - actual` elevation of the anchor.
    pub deviation: Option<f64>,
    pub status: CheckStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub sum_back_sight: f64,
    pub sum_fore_sight: f64,
    pub delta_h_measured: f64,
    /// Absent when either endpoint elevation is missing.
    pub delta_h_expected: Option<f64>,
    pub closure_error: Option<f64>,
    pub allowable_error: f64,
    pub closure_ok: bool,
    pub sum_delta_h: f64,
    pub sum_delta_h_matches_expected: bool,
    pub mid_sight_checks: Vec<MidSightCheck>,
    pub total_correction_mm: i64,
    /// Advisory: the ledger distributes exactly the closure error.
    pub corrections_complete: bool,
}

impl Evaluation {
    /// True when no mid-sight check failed. Incomplete checks do not count.
    pub fn mid_sights_consistent(&self) -> bool {
        self.mid_sight_checks.iter().all(|c| c.status != CheckStatus::Failed)
    }
}

/// `k * sqrt(L)`; a non-positive (or NaN) length allows no error at all.
pub fn allowable_error(path_length_km: f64, coefficient_m: f64) -> f64 {
    if path_length_km > 0.0 {
        coefficient_m * path_length_km.sqrt()
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    tolerances: Tolerances,
}

impl Evaluator {
    pub fn new() -> Self { Self::default() }

    pub fn with_tolerances(tolerances: Tolerances) -> Self {
        Self { tolerances }
    }

    pub fn tolerances(&self) -> &Tolerances { &self.tolerances }

    /// Evaluates a propagated traverse.
    ///
    /// Only endpoints and change points enter the sums: the line is closed
    /// without its mid-sights, which are verified separately.
    pub fn evaluate(&self, traverse: &Traverse, ledger: &CorrectionLedger) -> Result<Evaluation, TraverseError> {
        let len = traverse.len();
        if len < 2 {
            tracing::warn!(points = len, "insufficient data for evaluation");
            return Err(TraverseError::InsufficientData { points: len });
        }
        let tol = &self.tolerances;
        let points = traverse.points();

        let (mut sum_back_sight, mut sum_fore_sight, mut sum_delta_h) = (0.0, 0.0, 0.0);
        for p in points.iter().filter(|p| p.is_anchor()) {
            sum_back_sight += p.back_sight.unwrap_or(0.0);
            sum_fore_sight += p.fore_sight.unwrap_or(0.0);
            sum_delta_h += p.delta_h.unwrap_or(0.0);
        }
        let delta_h_measured = sum_back_sight - sum_fore_sight;

        let delta_h_expected = traverse
            .end_elevation()
            .zip(traverse.start_elevation())
            .map(|(end, start)| end - start);
        let closure_error = delta_h_expected.map(|expected| expected - delta_h_measured);

        let allowable_error = allowable_error(traverse.path_length_km, tol.allowable_coefficient_m);
        let closure_ok = closure_error.map_or(false, |v| v.abs() <= allowable_error);

        let sum_delta_h_matches_expected = delta_h_expected
            .map_or(false, |expected| (sum_delta_h - expected).abs() <= tol.height_epsilon_m);

        let total_correction_mm = ledger.total_mm();
        let corrections_complete = closure_error.map_or(false, |v| {
            (v * 1000.0 - total_correction_mm as f64).abs() < tol.correction_epsilon_mm
        });

        let mid_sight_checks = self.check_mid_sights(traverse);

        tracing::debug!(
            points = len,
            delta_h_measured,
            ?closure_error,
            allowable_error,
            closure_ok,
            "evaluated traverse"
        );

        Ok(Evaluation {
            sum_back_sight,
            sum_fore_sight,
            delta_h_measured,
            delta_h_expected,
            closure_error,
            allowable_error,
            closure_ok,
            sum_delta_h,
            sum_delta_h_matches_expected,
            mid_sight_checks,
            total_correction_mm,
            corrections_complete,
        })
    }

    /// One check per mid-sight that is followed by an anchor.
    fn check_mid_sights(&self, traverse: &Traverse) -> Vec<MidSightCheck> {
        let points = traverse.points();

        // next_anchor[i]: nearest anchor strictly after i.
        let mut next_anchor = vec![None; points.len()];
        let mut upcoming = None;
        for i in (0..points.len()).rev() {
            next_anchor[i] = upcoming;
            if points[i].is_anchor() {
                upcoming = Some(i);
            }
        }

        let mut checks = Vec::new();
        for (i, mid) in points.iter().enumerate().skip(1) {
            if !mid.is_mid_sight() {
                continue;
            }
            let Some(j) = next_anchor[i] else { continue };
            let anchor = &points[j];

            let height_difference = mid.mid_sight.zip(anchor.fore_sight).map(|(m, v)| m - v);
            let expected_elevation = mid.elevation.zip(height_difference).map(|(h, d)| h + d);
            let deviation = expected_elevation.zip(anchor.elevation).map(|(e, h)| e - h);
            let status = match deviation {
                Some(d) if d.abs() <= self.tolerances.height_epsilon_m => CheckStatus::Passed,
                Some(_) => CheckStatus::Failed,
                None => CheckStatus::Incomplete,
            };

            checks.push(MidSightCheck {
                mid: mid.id,
                mid_label: mid.label.clone(),
                anchor: anchor.id,
                anchor_label: anchor.label.clone(),
                mid_elevation: mid.elevation,
                anchor_elevation: anchor.elevation,
                mid_sight: mid.mid_sight,
                fore_sight: anchor.fore_sight,
                height_difference,
                expected_elevation,
                deviation,
                status,
            });
        }
        checks
    }
}

/// Evaluates with the default tolerances.
pub fn evaluate(traverse: &Traverse, ledger: &CorrectionLedger) -> Result<Evaluation, TraverseError> {
    Evaluator::new().evaluate(traverse, ledger)
}
