//! ledger.rs
//! Sparse millimeter corrections keyed by point identity.

use crate::store::{PointId, Traverse};
use serde::{Serialize, Deserialize};
use std::collections::BTreeMap;

/// Size of one user correction step in millimeters.
pub const CORRECTION_STEP_MM: i32 = 1;

/// Accumulated back-sight corrections. Absence of an entry means zero, and
/// entries that return to zero are removed.
///
/// Keys are [`PointId`]s, so relabeling and reordering leave every correction
/// attached to the point it was made on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectionLedger {
    entries: BTreeMap<PointId, i32>,
}

impl CorrectionLedger {
    pub fn new() -> Self { Self::default() }

    #[inline(always)]
    pub fn get(&self, id: PointId) -> i32 {
        self.entries.get(&id).copied().unwrap_or(0)
    }

    /// The correction for `id` converted to meters.
    #[inline(always)]
    pub fn meters(&self, id: PointId) -> f64 {
        f64::from(self.get(id)) / 1000.0
    }

    pub fn adjust(&mut self, id: PointId, delta_mm: i32) -> i32 {
        let value = self.get(id).saturating_add(delta_mm);
        self.set(id, value);
        tracing::debug!(%id, delta_mm, value, "adjusted correction");
        value
    }

    pub fn increment(&mut self, id: PointId) -> i32 {
        self.adjust(id, CORRECTION_STEP_MM)
    }

    pub fn decrement(&mut self, id: PointId) -> i32 {
        self.adjust(id, -CORRECTION_STEP_MM)
    }

    pub fn set(&mut self, id: PointId, value_mm: i32) {
        if value_mm == 0 {
            self.entries.remove(&id);
        } else {
            self.entries.insert(id, value_mm);
        }
    }

    pub fn reset(&mut self) {
        self.entries.clear();
    }

    /// Sum of all corrections in millimeters.
    pub fn total_mm(&self) -> i64 {
        self.entries.values().map(|&v| i64::from(v)).sum()
    }

    pub fn len(&self) -> usize { self.entries.len() }
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = (PointId, i32)> + '_ {
        self.entries.iter().map(|(&id, &v)| (id, v))
    }

    /// Drops entries for identities that no longer exist in `traverse`.
    /// Returns the number of entries removed.
    pub fn prune(&mut self, traverse: &Traverse) -> usize {
        let before = self.entries.len();
        self.entries.retain(|id, _| traverse.index_of(*id).is_some());
        before - self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Role;

    #[test]
    fn test_absent_is_zero() {
        let ledger = CorrectionLedger::new();
        assert_eq!(ledger.get(PointId(7)), 0);
        assert_eq!(ledger.meters(PointId(7)), 0.0);
        assert_eq!(ledger.total_mm(), 0);
    }

    #[test]
    fn test_increment_decrement_and_zero_removal() {
        let mut ledger = CorrectionLedger::new();
        let id = PointId(3);
        assert_eq!(ledger.increment(id), 1);
        assert_eq!(ledger.increment(id), 2);
        assert_eq!(ledger.decrement(id), 1);
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.decrement(id), 0);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_total_and_reset() {
        let mut ledger = CorrectionLedger::new();
        ledger.adjust(PointId(1), 3);
        ledger.adjust(PointId(2), -5);
        assert_eq!(ledger.total_mm(), -2);
        assert!((ledger.meters(PointId(2)) + 0.005).abs() < 1e-12);

        ledger.reset();
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_prune_drops_removed_points() {
        let mut t = Traverse::new("MB1", 100.0, "MB2", 100.0, 1.0);
        let a = t.insert_before_end(Role::ChangePoint).unwrap();
        let b = t.insert_before_end(Role::ChangePoint).unwrap();

        let mut ledger = CorrectionLedger::new();
        ledger.increment(a);
        ledger.increment(b);
        t.remove(a).unwrap();

        assert_eq!(ledger.prune(&t), 1);
        assert_eq!(ledger.get(a), 0);
        assert_eq!(ledger.get(b), 1);
    }
}
