//! Resolution of a single point's height difference.

use crate::compute::ledger::CorrectionLedger;
use crate::store::{Point, Role, Traverse};

/// Computes the signed height difference (meters) of the point at `index`.
///
/// Returns `None` for the opening endpoint, for unclassified points, when no
/// anchor precedes the point, or when a required reading is absent. A `None`
/// here never affects the resolution of any other point.
pub fn resolve_delta_h(traverse: &Traverse, index: usize, ledger: &CorrectionLedger) -> Option<f64> {
    let points = traverse.points();
    if index == 0 || index >= points.len() {
        return None;
    }
    resolve_at(points, index, preceding_anchor(points, index), ledger)
}

/// Index of the nearest endpoint or change point before `index`.
pub fn preceding_anchor(points: &[Point], index: usize) -> Option<usize> {
    points.get(..index)?.iter().rposition(Point::is_anchor)
}

/// The anchor's back-sight with its ledger correction applied.
#[inline(always)]
pub fn corrected_back_sight(anchor: &Point, ledger: &CorrectionLedger) -> Option<f64> {
    anchor.back_sight.map(|b| b + ledger.meters(anchor.id))
}

/// Resolution with the preceding anchor already known. The propagator tracks
/// the anchor while walking so the full pass stays linear.
pub(crate) fn resolve_at(
    points: &[Point],
    index: usize,
    anchor: Option<usize>,
    ledger: &CorrectionLedger,
) -> Option<f64> {
    let current = points.get(index)?;
    let anchor = points.get(anchor?)?;

    match current.role? {
        Role::Endpoint | Role::ChangePoint => {
            Some(corrected_back_sight(anchor, ledger)? - current.fore_sight?)
        }
        Role::MidSight => {
            let previous = points.get(index.checked_sub(1)?)?;
            match previous.role? {
                Role::Endpoint | Role::ChangePoint => {
                    Some(corrected_back_sight(previous, ledger)? - current.mid_sight?)
                }
                // Chained mid-sights share the anchor's instrument height, so
                // no correction enters this step.
                Role::MidSight => Some(previous.mid_sight? - current.mid_sight?),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{PointId, Reading};

    fn close(actual: Option<f64>, expected: f64) {
        let value = actual.expect("expected a resolved delta h");
        assert!((value - expected).abs() < 1e-9, "{} != {}", value, expected);
    }

    /// MB1(b=1.234) W1(b=1.5, f=0.8) M1(m=1.2) M2(m=1.7) MB2(f=1.1)
    fn line() -> (Traverse, [PointId; 5]) {
        let mut t = Traverse::new("MB1", 100.0, "MB2", 100.834, 1.0);
        let mb1 = t.points()[0].id;
        let w1 = t.insert_before_end(Role::ChangePoint).unwrap();
        let m1 = t.insert_before_end(Role::MidSight).unwrap();
        let m2 = t.insert_before_end(Role::MidSight).unwrap();
        let mb2 = t.points()[4].id;

        t.set_reading(mb1, Reading::BackSight, Some(1.234)).unwrap();
        t.set_reading(w1, Reading::BackSight, Some(1.5)).unwrap();
        t.set_reading(w1, Reading::ForeSight, Some(0.8)).unwrap();
        t.set_reading(m1, Reading::MidSight, Some(1.2)).unwrap();
        t.set_reading(m2, Reading::MidSight, Some(1.7)).unwrap();
        t.set_reading(mb2, Reading::ForeSight, Some(1.1)).unwrap();
        (t, [mb1, w1, m1, m2, mb2])
    }

    #[test]
    fn test_each_rule() {
        let (t, _) = line();
        let ledger = CorrectionLedger::new();

        assert_eq!(resolve_delta_h(&t, 0, &ledger), None);
        close(resolve_delta_h(&t, 1, &ledger), 0.434); // anchor back - fore
        close(resolve_delta_h(&t, 2, &ledger), 0.3); // anchor back - mid
        close(resolve_delta_h(&t, 3, &ledger), -0.5); // previous mid - mid
        close(resolve_delta_h(&t, 4, &ledger), 0.4); // skips mid-sights back to W1
        assert_eq!(resolve_delta_h(&t, 5, &ledger), None);
    }

    #[test]
    fn test_correction_applies_to_anchor_back_sight_only() {
        let (t, [_, w1, ..]) = line();
        let mut ledger = CorrectionLedger::new();
        ledger.increment(w1);

        close(resolve_delta_h(&t, 1, &ledger), 0.434); // W1's own delta h is unchanged
        close(resolve_delta_h(&t, 2, &ledger), 0.301);
        close(resolve_delta_h(&t, 3, &ledger), -0.5); // chained step takes no correction
        close(resolve_delta_h(&t, 4, &ledger), 0.401);
    }

    #[test]
    fn test_missing_reading_is_local() {
        let (mut t, [_, _, m1, ..]) = line();
        t.set_reading(m1, Reading::MidSight, None).unwrap();
        let ledger = CorrectionLedger::new();

        assert_eq!(resolve_delta_h(&t, 2, &ledger), None);
        assert_eq!(resolve_delta_h(&t, 3, &ledger), None);
        close(resolve_delta_h(&t, 4, &ledger), 0.4);
    }

    #[test]
    fn test_unclassified_and_anchorless_points() {
        let mut first = Point::new(PointId(0), "P1", None);
        first.back_sight = Some(1.0);
        let mut second = Point::new(PointId(1), "W1", Some(Role::ChangePoint));
        second.fore_sight = Some(0.5);
        let mut third = Point::new(PointId(2), "??", None);
        third.fore_sight = Some(0.5);
        let t = Traverse::from_points(vec![first, second, third], 1.0);
        let ledger = CorrectionLedger::new();

        assert_eq!(resolve_delta_h(&t, 1, &ledger), None);
        assert_eq!(resolve_delta_h(&t, 2, &ledger), None);
    }

    #[test]
    fn test_preceding_anchor() {
        let (t, _) = line();
        assert_eq!(preceding_anchor(t.points(), 0), None);
        assert_eq!(preceding_anchor(t.points(), 3), Some(1));
        assert_eq!(preceding_anchor(t.points(), 4), Some(1));
    }
}
