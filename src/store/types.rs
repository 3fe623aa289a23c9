use serde::{Serialize, Deserialize};
use std::fmt;

/// Stable identity of a point, assigned by the owning [`Traverse`](super::Traverse)
/// at creation and never changed by relabeling or reordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct PointId(pub u32);

impl PointId {
    #[inline(always)]
    pub fn get(&self) -> u32 { self.0 }
}

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Line terminus with an externally surveyed elevation.
    Endpoint,
    /// Instrument relocation point, read backward and forward.
    ChangePoint,
    /// Intermediate target read without relocating the instrument.
    MidSight,
}

impl Role {
    /// Endpoints and change points carry the height backbone of the line.
    #[inline(always)]
    pub fn is_anchor(self) -> bool {
        matches!(self, Role::Endpoint | Role::ChangePoint)
    }

    /// Parses the label prefix used by field books: `MB`, `W`, `M`.
    /// The `MB` check must come before `M`.
    pub fn from_label(label: &str) -> Option<Self> {
        if label.starts_with("MB") {
            Some(Role::Endpoint)
        } else if label.starts_with('W') {
            Some(Role::ChangePoint)
        } else if label.starts_with('M') {
            Some(Role::MidSight)
        } else {
            None
        }
    }

    pub fn label_prefix(self) -> &'static str {
        match self {
            Role::Endpoint => "MB",
            Role::ChangePoint => "W",
            Role::MidSight => "M",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    First,
    Interior,
    Last,
}

impl Position {
    pub fn of(index: usize, len: usize) -> Self {
        if index == 0 {
            Position::First
        } else if index + 1 == len {
            Position::Last
        } else {
            Position::Interior
        }
    }
}

/// Names one of the three rod-reading fields of a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Reading {
    BackSight,
    MidSight,
    ForeSight,
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Reading::BackSight => "back-sight",
            Reading::MidSight => "mid-sight",
            Reading::ForeSight => "fore-sight",
        };
        f.write_str(name)
    }
}

/// One row of the traverse. Readings and derived values are in meters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub id: PointId,
    pub label: String,
    /// `None` marks a point whose legacy label carried no known prefix.
    pub role: Option<Role>,
    pub back_sight: Option<f64>,
    pub mid_sight: Option<f64>,
    pub fore_sight: Option<f64>,
    /// Derived by the propagator.
    pub delta_h: Option<f64>,
    /// Derived, except on the first and last endpoint where it is authoritative.
    pub elevation: Option<f64>,
    #[serde(default)]
    pub note: String,
}

impl Point {
    pub fn new(id: PointId, label: impl Into<String>, role: Option<Role>) -> Self {
        Self {
            id,
            label: label.into(),
            role,
            back_sight: None,
            mid_sight: None,
            fore_sight: None,
            delta_h: None,
            elevation: None,
            note: String::new(),
        }
    }

    #[inline(always)]
    pub fn is_anchor(&self) -> bool {
        self.role.map_or(false, Role::is_anchor)
    }

    #[inline(always)]
    pub fn is_mid_sight(&self) -> bool {
        self.role == Some(Role::MidSight)
    }

    pub fn reading(&self, reading: Reading) -> Option<f64> {
        match reading {
            Reading::BackSight => self.back_sight,
            Reading::MidSight => self.mid_sight,
            Reading::ForeSight => self.fore_sight,
        }
    }

    pub(crate) fn reading_mut(&mut self, reading: Reading) -> &mut Option<f64> {
        match reading {
            Reading::BackSight => &mut self.back_sight,
            Reading::MidSight => &mut self.mid_sight,
            Reading::ForeSight => &mut self.fore_sight,
        }
    }
}
