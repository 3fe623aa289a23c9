//! Point classification and the field editability rules that follow from it.

use crate::store::{Point, Position, Reading, Role, Traverse};
use smallvec::{smallvec, SmallVec};

/// The role of a point together with where it sits in the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// `None` for points whose label carried no recognised prefix.
    pub role: Option<Role>,
    pub position: Position,
}

impl Classification {
    pub fn of(point: &Point, index: usize, len: usize) -> Self {
        Self { role: point.role, position: Position::of(index, len) }
    }

    #[inline(always)]
    pub fn is_anchor(&self) -> bool {
        self.role.map_or(false, Role::is_anchor)
    }

    /// True for the endpoint whose elevation is authoritative input.
    pub fn is_closing_endpoint(&self) -> bool {
        self.role == Some(Role::Endpoint) && self.position == Position::Last
    }

    /// Readings the user may enter for this point.
    ///
    /// Unclassified points, and endpoints misplaced in the interior, accept
    /// every reading. That leniency is intended: a half-typed label must not
    /// lock the row.
    pub fn editable(&self) -> SmallVec<[Reading; 3]> {
        match (self.role, self.position) {
            (Some(Role::Endpoint), Position::First) => smallvec![Reading::BackSight],
            (Some(Role::Endpoint), Position::Last) => smallvec![Reading::ForeSight],
            (Some(Role::ChangePoint), _) => smallvec![Reading::BackSight, Reading::ForeSight],
            (Some(Role::MidSight), _) => smallvec![Reading::MidSight],
            _ => smallvec![Reading::BackSight, Reading::MidSight, Reading::ForeSight],
        }
    }

    pub fn is_editable(&self, reading: Reading) -> bool {
        self.editable().contains(&reading)
    }
}

pub fn classify(traverse: &Traverse, index: usize) -> Option<Classification> {
    traverse
        .get(index)
        .map(|p| Classification::of(p, index, traverse.len()))
}

/// Proposes the role of the next row inserted before the closing endpoint:
/// a mid-sight after a change point, a change point otherwise.
pub fn suggest_next_role(traverse: &Traverse) -> Role {
    let previous = traverse.len().checked_sub(2).and_then(|i| traverse.get(i));
    match previous.and_then(|p| p.role) {
        Some(Role::ChangePoint) => Role::MidSight,
        _ => Role::ChangePoint,
    }
}
