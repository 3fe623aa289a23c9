//! Conversion between label-keyed records and the identity-keyed engine types.
//!
//! Older records key corrections either by display label (`"W2"`) or by row
//! index (`"3"`). Both forms are resolved to [`PointId`]s once, on import, so
//! the engine never sees a label or an index as a correction key.

use super::error::TraverseError;
use super::traverse::Traverse;
use super::types::{Point, PointId, Role};
use crate::compute::CorrectionLedger;
use serde::{Serialize, Deserialize};
use std::collections::BTreeMap;
use std::io::Read;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyPoint {
    pub label: String,
    pub back_sight: Option<f64>,
    pub mid_sight: Option<f64>,
    pub fore_sight: Option<f64>,
    pub delta_h: Option<f64>,
    pub elevation: Option<f64>,
    #[serde(default)]
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyRecord {
    pub points: Vec<LegacyPoint>,
    pub path_length_km: f64,
    #[serde(default)]
    pub corrections: BTreeMap<String, i32>,
}

pub fn read_record<R: Read>(reader: R) -> Result<LegacyRecord, TraverseError> {
    Ok(serde_json::from_reader(reader)?)
}

pub fn from_json(json: &str) -> Result<LegacyRecord, TraverseError> {
    Ok(serde_json::from_str(json)?)
}

pub fn to_json(record: &LegacyRecord) -> Result<String, TraverseError> {
    Ok(serde_json::to_string_pretty(record)?)
}

/// Builds a traverse and its ledger from a label-keyed record.
///
/// Points receive identities in row order. A numeric correction key is a row
/// index; any other key is matched against labels. Keys matching neither are
/// dropped, and when two keys land on the same point the later one wins.
pub fn import(record: &LegacyRecord) -> (Traverse, CorrectionLedger) {
    let points: Vec<Point> = record
        .points
        .iter()
        .enumerate()
        .map(|(i, lp)| Point {
            id: PointId(i as u32),
            label: lp.label.clone(),
            role: Role::from_label(&lp.label),
            back_sight: lp.back_sight,
            mid_sight: lp.mid_sight,
            fore_sight: lp.fore_sight,
            delta_h: lp.delta_h,
            elevation: lp.elevation,
            note: lp.note.clone(),
        })
        .collect();

    let mut ledger = CorrectionLedger::new();
    for (key, &value) in &record.corrections {
        let target = match key.parse::<usize>() {
            Ok(index) => points.get(index),
            Err(_) => points.iter().find(|p| &p.label == key),
        };
        match target {
            Some(point) => ledger.set(point.id, value),
            None => tracing::warn!(key = %key, value, "dropping correction with no matching point"),
        }
    }

    (Traverse::from_points(points, record.path_length_km), ledger)
}

/// Writes a traverse back into the label-keyed shape, keying corrections by
/// the current display labels.
pub fn export(traverse: &Traverse, ledger: &CorrectionLedger) -> LegacyRecord {
    let points = traverse
        .points()
        .iter()
        .map(|p| LegacyPoint {
            label: p.label.clone(),
            back_sight: p.back_sight,
            mid_sight: p.mid_sight,
            fore_sight: p.fore_sight,
            delta_h: p.delta_h,
            elevation: p.elevation,
            note: p.note.clone(),
        })
        .collect();

    let corrections = ledger
        .iter()
        .filter_map(|(id, value)| traverse.point(id).map(|p| (p.label.clone(), value)))
        .collect();

    LegacyRecord { points, path_length_km: traverse.path_length_km, corrections }
}
