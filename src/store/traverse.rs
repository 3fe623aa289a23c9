//! traverse.rs
//! Owned point sequence with stable identity allocation and structural edits.

use super::error::TraverseError;
use super::types::{Point, PointId, Reading, Role};
use crate::analysis::{classify, renumber};
use serde::{Serialize, Deserialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Traverse {
    points: Vec<Point>,
    /// Measured line length used for the allowable closure error.
    pub path_length_km: f64,
    // Next identity to hand out. Serialized so identities stay unique after a reload.
    /// `None` once every `u32` identity has been handed out.
    next_id: Option<u32>,
}

impl Traverse {
    /// Creates the minimal line: an opening and a closing endpoint with their
    /// authoritative elevations.
    pub fn new(
        start_label: impl Into<String>,
        start_elevation: f64,
        end_label: impl Into<String>,
        end_elevation: f64,
        path_length_km: f64,
    ) -> Self {
        let mut start = Point::new(PointId(0), start_label, Some(Role::Endpoint));
        start.elevation = Some(start_elevation);
        let mut end = Point::new(PointId(1), end_label, Some(Role::Endpoint));
        end.elevation = Some(end_elevation);
        Self { points: vec![start, end], path_length_km, next_id: Some(2) }
    }

    /// Wraps an already ordered sequence. Identities are taken as given; the
    /// allocator resumes after the largest one.
    pub fn from_points(points: Vec<Point>, path_length_km: f64) -> Self {
        let next_id = points
            .iter()
            .try_fold(0u32, |next, p| p.id.0.checked_add(1).map(|after| next.max(after)));
        Self { points, path_length_km, next_id }
    }

    pub fn points(&self) -> &[Point] { &self.points }
    pub fn len(&self) -> usize { self.points.len() }
    pub fn is_empty(&self) -> bool { self.points.is_empty() }
    pub fn get(&self, index: usize) -> Option<&Point> { self.points.get(index) }

    pub(crate) fn points_mut(&mut self) -> &mut [Point] { &mut self.points }

    pub fn index_of(&self, id: PointId) -> Option<usize> {
        self.points.iter().position(|p| p.id == id)
    }

    pub fn point(&self, id: PointId) -> Option<&Point> {
        self.points.iter().find(|p| p.id == id)
    }

    pub fn start_elevation(&self) -> Option<f64> {
        self.points.first().and_then(|p| p.elevation)
    }

    pub fn end_elevation(&self) -> Option<f64> {
        if self.points.len() < 2 { return None; }
        self.points.last().and_then(|p| p.elevation)
    }

    pub fn set_start_elevation(&mut self, elevation: Option<f64>) {
        if let Some(first) = self.points.first_mut() {
            first.elevation = elevation;
        }
    }

    pub fn set_end_elevation(&mut self, elevation: Option<f64>) {
        if self.points.len() < 2 { return; }
        if let Some(last) = self.points.last_mut() {
            last.elevation = elevation;
        }
    }

    fn allocate_id(&mut self) -> Result<PointId, TraverseError> {
        let id = self.next_id.ok_or(TraverseError::IdentitiesExhausted)?;
        self.next_id = id.checked_add(1);
        Ok(PointId(id))
    }

    fn require_index(&self, id: PointId) -> Result<usize, TraverseError> {
        self.index_of(id).ok_or(TraverseError::UnknownPoint(id))
    }

    fn is_fixed_slot(&self, index: usize) -> bool {
        index == 0 || index + 1 >= self.points.len()
    }

    // --- Structural edits (each one renumbers) ---

    /// Appends a new interior point directly before the closing endpoint.
    pub fn insert_before_end(&mut self, role: Role) -> Result<PointId, TraverseError> {
        let index = self.points.len().saturating_sub(1).max(1);
        self.insert_at(index, role)
    }

    /// Inserts a new interior point so that it ends up at `index`.
    pub fn insert_at(&mut self, index: usize, role: Role) -> Result<PointId, TraverseError> {
        if role == Role::Endpoint {
            return Err(TraverseError::InvalidRole { role });
        }
        let len = self.points.len();
        if index > len {
            return Err(TraverseError::IndexOutOfBounds { index, len });
        }
        if index == 0 || (len >= 2 && index == len) {
            return Err(TraverseError::EndpointLocked { index });
        }

        let id = self.allocate_id()?;
        self.points.insert(index, Point::new(id, role.label_prefix(), Some(role)));
        renumber::relabel(&mut self.points);
        tracing::debug!(%id, index, ?role, "inserted point");
        Ok(id)
    }

    /// Removes an interior point. The two endpoints are fixed.
    pub fn remove(&mut self, id: PointId) -> Result<Point, TraverseError> {
        let index = self.require_index(id)?;
        if self.is_fixed_slot(index) {
            return Err(TraverseError::EndpointLocked { index });
        }
        let removed = self.points.remove(index);
        renumber::relabel(&mut self.points);
        Ok(removed)
    }

    /// Moves an interior point to another interior slot.
    pub fn move_point(&mut self, from: usize, to: usize) -> Result<(), TraverseError> {
        let len = self.points.len();
        for index in [from, to] {
            if index >= len {
                return Err(TraverseError::IndexOutOfBounds { index, len });
            }
            if self.is_fixed_slot(index) {
                return Err(TraverseError::EndpointLocked { index });
            }
        }
        if from == to {
            return Ok(());
        }
        let point = self.points.remove(from);
        self.points.insert(to, point);
        renumber::relabel(&mut self.points);
        Ok(())
    }

    /// Switches an interior point between change point and mid-sight.
    /// Readings are kept; the classifier decides which of them are used.
    pub fn set_role(&mut self, id: PointId, role: Role) -> Result<(), TraverseError> {
        let index = self.require_index(id)?;
        if self.is_fixed_slot(index) {
            return Err(TraverseError::EndpointLocked { index });
        }
        if role == Role::Endpoint {
            return Err(TraverseError::InvalidRole { role });
        }
        self.points[index].role = Some(role);
        self.points[index].label = role.label_prefix().to_string();
        renumber::relabel(&mut self.points);
        Ok(())
    }

    // --- Field edits ---

    /// Writes one rod reading, honouring the editability rules of the point's role.
    pub fn set_reading(
        &mut self,
        id: PointId,
        reading: Reading,
        value: Option<f64>,
    ) -> Result<(), TraverseError> {
        let index = self.require_index(id)?;
        let class = classify::classify(self, index)
            .ok_or(TraverseError::IndexOutOfBounds { index, len: self.points.len() })?;
        if !class.is_editable(reading) {
            return Err(TraverseError::ReadingNotEditable {
                label: self.points[index].label.clone(),
                reading,
            });
        }
        *self.points[index].reading_mut(reading) = value;
        Ok(())
    }

    pub fn set_note(&mut self, id: PointId, note: impl Into<String>) -> Result<(), TraverseError> {
        let index = self.require_index(id)?;
        self.points[index].note = note.into();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line() -> Traverse {
        Traverse::new("MB1", 100.0, "MB2", 100.5, 1.0)
    }

    #[test]
    fn test_new_line_has_fixed_endpoints() {
        let t = line();
        assert_eq!(t.len(), 2);
        assert_eq!(t.start_elevation(), Some(100.0));
        assert_eq!(t.end_elevation(), Some(100.5));
        assert_eq!(t.points()[0].role, Some(Role::Endpoint));
        assert_eq!(t.points()[1].role, Some(Role::Endpoint));
    }

    #[test]
    fn test_from_points_with_largest_identity_refuses_to_allocate() {
        let points = vec![
            Point::new(PointId(0), "MB1", Some(Role::Endpoint)),
            Point::new(PointId(u32::MAX), "MB2", Some(Role::Endpoint)),
        ];
        let mut t = Traverse::from_points(points, 1.0);
        assert!(matches!(
            t.insert_before_end(Role::ChangePoint),
            Err(TraverseError::IdentitiesExhausted)
        ));
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn test_from_points_resumes_after_largest_identity() {
        let points = vec![
            Point::new(PointId(4), "MB1", Some(Role::Endpoint)),
            Point::new(PointId(9), "MB2", Some(Role::Endpoint)),
        ];
        let mut t = Traverse::from_points(points, 1.0);
        assert_eq!(t.insert_before_end(Role::ChangePoint).unwrap(), PointId(10));
    }

    #[test]
    fn test_insert_before_end_relabels() {
        let mut t = line();
        let w = t.insert_before_end(Role::ChangePoint).unwrap();
        let m = t.insert_before_end(Role::MidSight).unwrap();
        let w2 = t.insert_before_end(Role::ChangePoint).unwrap();

        let labels: Vec<&str> = t.points().iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["MB1", "W1", "M1", "W2", "MB2"]);
        assert_eq!(t.point(w).unwrap().label, "W1");
        assert_eq!(t.point(m).unwrap().label, "M1");
        assert_eq!(t.point(w2).unwrap().label, "W2");
    }

    #[test]
    fn test_identities_are_never_reused() {
        let mut t = line();
        let a = t.insert_before_end(Role::ChangePoint).unwrap();
        t.remove(a).unwrap();
        let b = t.insert_before_end(Role::ChangePoint).unwrap();
        assert_ne!(a, b);
        assert_eq!(t.point(b).unwrap().label, "W1");
    }

    #[test]
    fn test_endpoints_are_locked() {
        let mut t = line();
        t.insert_before_end(Role::ChangePoint).unwrap();
        let start = t.points()[0].id;
        let end = t.points()[2].id;

        assert!(matches!(t.remove(start), Err(TraverseError::EndpointLocked { index: 0 })));
        assert!(matches!(t.remove(end), Err(TraverseError::EndpointLocked { index: 2 })));
        assert!(matches!(t.move_point(1, 0), Err(TraverseError::EndpointLocked { index: 0 })));
        assert!(matches!(t.insert_at(0, Role::MidSight), Err(TraverseError::EndpointLocked { .. })));
        assert!(matches!(t.insert_before_end(Role::Endpoint), Err(TraverseError::InvalidRole { .. })));
    }

    #[test]
    fn test_move_point_renumbers_but_keeps_identity() {
        let mut t = line();
        let w1 = t.insert_before_end(Role::ChangePoint).unwrap();
        let w2 = t.insert_before_end(Role::ChangePoint).unwrap();
        t.move_point(2, 1).unwrap();

        assert_eq!(t.point(w2).unwrap().label, "W1");
        assert_eq!(t.point(w1).unwrap().label, "W2");
        assert_eq!(t.index_of(w2), Some(1));
    }

    #[test]
    fn test_set_reading_respects_editability() {
        let mut t = line();
        let start = t.points()[0].id;
        let m = t.insert_before_end(Role::MidSight).unwrap();

        t.set_reading(start, Reading::BackSight, Some(1.234)).unwrap();
        t.set_reading(m, Reading::MidSight, Some(1.8)).unwrap();

        let err = t.set_reading(start, Reading::ForeSight, Some(1.0)).unwrap_err();
        assert!(err.to_string().contains("fore-sight"), "Msg: {}", err);
        assert!(matches!(
            t.set_reading(m, Reading::BackSight, Some(1.0)),
            Err(TraverseError::ReadingNotEditable { .. })
        ));
        assert_eq!(t.points()[0].back_sight, Some(1.234));
    }

    #[test]
    fn test_set_role_switches_prefix() {
        let mut t = line();
        let a = t.insert_before_end(Role::ChangePoint).unwrap();
        let b = t.insert_before_end(Role::ChangePoint).unwrap();
        t.set_role(a, Role::MidSight).unwrap();

        assert_eq!(t.point(a).unwrap().label, "M1");
        assert_eq!(t.point(b).unwrap().label, "W1");
    }

    #[test]
    fn test_unknown_point() {
        let mut t = line();
        assert!(matches!(t.remove(PointId(99)), Err(TraverseError::UnknownPoint(PointId(99)))));
    }
}
