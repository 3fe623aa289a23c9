use crate::analysis::{CheckStatus, Evaluation};
use crate::compute::CorrectionLedger;
use crate::store::Traverse;
use std::fmt::Write;

const ABSENT: &str = "—";

/// Renders the point table, the closure summary and the mid-sight proofs.
/// Absent values print as an em dash; meters use three decimals.
pub fn format_report(traverse: &Traverse, evaluation: &Evaluation, ledger: &CorrectionLedger) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "LEVELING TRAVERSE ({} points, L = {:.3} km)", traverse.len(), traverse.path_length_km);
    let _ = writeln!(out, "--------------------------------------------------------------------------");
    let _ = writeln!(
        out,
        "{:<8}{:>10}{:>10}{:>10}{:>10}{:>12}{:>8}  {}",
        "Point", "r", "m", "v", "dh", "H", "corr", "Note"
    );
    for p in traverse.points() {
        let corr = ledger.get(p.id);
        let corr_str = if corr == 0 { String::new() } else { format!("{:+}", corr) };
        let _ = writeln!(
            out,
            "{:<8}{:>10}{:>10}{:>10}{:>10}{:>12}{:>8}  {}",
            p.label,
            meters(p.back_sight),
            meters(p.mid_sight),
            meters(p.fore_sight),
            meters(p.delta_h),
            meters(p.elevation),
            corr_str,
            p.note
        );
    }
    let _ = writeln!(out, "--------------------------------------------------------------------------");

    let e = evaluation;
    let _ = writeln!(out, "Sum r:             {:.3} m", e.sum_back_sight);
    let _ = writeln!(out, "Sum v:             {:.3} m", e.sum_fore_sight);
    let _ = writeln!(out, "Sum dh:            {:.3} m", e.sum_delta_h);
    let _ = writeln!(out, "dh measured:       {:.3} m", e.delta_h_measured);
    let _ = writeln!(out, "dh expected:       {} m", meters(e.delta_h_expected));
    let _ = writeln!(out, "Closure error v:   {} m", meters(e.closure_error));
    let _ = writeln!(out, "Allowable v_zul:   {:.3} m", e.allowable_error);
    let _ = writeln!(out, "Corrections:       {:+} mm", e.total_correction_mm);
    let _ = writeln!(out);
    let _ = writeln!(out, "[{}] |v| <= v_zul", mark(e.closure_ok));
    let _ = writeln!(out, "[{}] Sum dh = dh expected", mark(e.sum_delta_h_matches_expected));
    let _ = writeln!(out, "[{}] Corrections distribute v", mark(e.corrections_complete));
    let _ = writeln!(out, "[{}] Mid-sight proofs", mark(e.mid_sights_consistent()));

    // Proof: H(M) + (m - v) = H(W)
    for check in &e.mid_sight_checks {
        let status = match check.status {
            CheckStatus::Passed => "ok",
            CheckStatus::Failed => "FAILED",
            CheckStatus::Incomplete => "incomplete",
        };
        let _ = writeln!(
            out,
            "    {} -> {}: {} + ({} - {}) = {} vs {} [{}]",
            check.mid_label,
            check.anchor_label,
            meters(check.mid_elevation),
            meters(check.mid_sight),
            meters(check.fore_sight),
            meters(check.expected_elevation),
            meters(check.anchor_elevation),
            status
        );
    }

    out
}

fn meters(value: Option<f64>) -> String {
    value.map_or_else(|| ABSENT.to_string(), |v| format!("{:.3}", v))
}

fn mark(ok: bool) -> &'static str {
    if ok { "x" } else { " " }
}
