//! A synchronous, single-threaded height propagation engine.
use crate::compute::ledger::CorrectionLedger;
use crate::compute::resolver;
use crate::store::{Role, Traverse};

/// Derives `delta_h` and `elevation` for every point of a copy of `traverse`.
///
/// Runs three passes in order, each reading the previous one's output:
/// 1. **Delta h**: every point from index 1 is resolved against its anchor.
/// 2. **Anchors**: endpoints and change points chain off the last anchor,
///    skipping intervening mid-sights. The closing endpoint keeps its
///    authoritative elevation.
/// 3. **Mid-sights**: each mid-sight chains off its direct predecessor,
///    which may itself be a mid-sight.
///
/// The input is never modified. Derived values whose inputs are missing are
/// reset to `None`.
pub fn propagate(traverse: &Traverse, start_elevation: f64, ledger: &CorrectionLedger) -> Traverse {
    run(traverse, Some(start_elevation), ledger)
}

/// Like [`propagate`], seeded with the first point's own elevation.
///
/// Without a start elevation every anchor and mid-sight elevation stays
/// `None`; delta h values are still resolved.
pub fn propagate_from_start(traverse: &Traverse, ledger: &CorrectionLedger) -> Traverse {
    let start = traverse.start_elevation();
    if start.is_none() {
        tracing::debug!("no start elevation, elevations stay unresolved");
    }
    run(traverse, start, ledger)
}

fn run(traverse: &Traverse, start_elevation: Option<f64>, ledger: &CorrectionLedger) -> Traverse {
    let mut out = traverse.clone();
    let len = out.len();
    tracing::debug!(points = len, corrections = ledger.len(), "propagating heights");
    if len == 0 {
        return out;
    }

    let points = out.points_mut();
    points[0].elevation = start_elevation;
    points[0].delta_h = None;

    // 1. Delta h pass
    let mut anchor = points[0].is_anchor().then_some(0);
    for i in 1..len {
        let delta_h = resolver::resolve_at(points, i, anchor, ledger);
        if delta_h.is_none() {
            tracing::trace!(index = i, label = %points[i].label, "delta h unresolved");
        }
        points[i].delta_h = delta_h;
        if points[i].is_anchor() {
            anchor = Some(i);
        }
    }

    // 2. Anchor pass
    let mut last_anchor = 0;
    for i in 1..len {
        if !points[i].is_anchor() {
            continue;
        }
        let is_closing_endpoint = i + 1 == len && points[i].role == Some(Role::Endpoint);
        if !is_closing_endpoint {
            points[i].elevation = points[last_anchor]
                .elevation
                .zip(points[i].delta_h)
                .map(|(base, dh)| base + dh);
        }
        last_anchor = i;
    }

    // 3. Mid-sight pass
    for i in 1..len {
        match points[i].role {
            Some(Role::MidSight) => {
                points[i].elevation = points[i - 1]
                    .elevation
                    .zip(points[i].delta_h)
                    .map(|(base, dh)| base + dh);
            }
            None => points[i].elevation = None,
            _ => {}
        }
    }

    out
}
