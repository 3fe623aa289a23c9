use crate::analysis::{suggest_next_role, Evaluation, Evaluator};
use crate::compute::{propagate_from_start, CorrectionLedger};
use crate::config::Tolerances;
use crate::display::format_report;
use crate::store::{legacy, PointId, Reading, Role, Traverse, TraverseError};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

fn to_py_err(e: TraverseError) -> PyErr {
    PyValueError::new_err(e.to_string())
}

fn json_err(e: serde_json::Error) -> PyErr {
    PyValueError::new_err(e.to_string())
}

fn parse_role(name: &str) -> PyResult<Role> {
    match name {
        "change_point" | "W" => Ok(Role::ChangePoint),
        "mid_sight" | "M" => Ok(Role::MidSight),
        _ => Err(PyValueError::new_err(format!("Invalid role '{}'", name))),
    }
}

fn parse_reading(name: &str) -> PyResult<Reading> {
    match name {
        "back_sight" => Ok(Reading::BackSight),
        "mid_sight" => Ok(Reading::MidSight),
        "fore_sight" => Ok(Reading::ForeSight),
        _ => Err(PyValueError::new_err(format!("Invalid reading '{}'", name))),
    }
}

#[pyfunction]
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// A traverse together with its corrections. Every query recomputes from the
/// raw readings; nothing derived is cached between calls.
#[pyclass(name = "_Traverse")]
#[derive(Debug, Clone)]
pub struct PyTraverse {
    traverse: Traverse,
    ledger: CorrectionLedger,
    tolerances: Tolerances,
}

impl PyTraverse {
    fn propagated(&self) -> Traverse {
        propagate_from_start(&self.traverse, &self.ledger)
    }

    fn evaluation(&self, propagated: &Traverse) -> PyResult<Evaluation> {
        Evaluator::with_tolerances(self.tolerances)
            .evaluate(propagated, &self.ledger)
            .map_err(to_py_err)
    }
}

#[pymethods]
impl PyTraverse {
    #[new]
    pub fn new(
        start_label: String,
        start_elevation: f64,
        end_label: String,
        end_elevation: f64,
        path_length_km: f64,
    ) -> Self {
        Self {
            traverse: Traverse::new(start_label, start_elevation, end_label, end_elevation, path_length_km),
            ledger: CorrectionLedger::new(),
            tolerances: Tolerances::default(),
        }
    }

    #[staticmethod]
    pub fn from_legacy_json(json: &str) -> PyResult<Self> {
        let record = legacy::from_json(json).map_err(to_py_err)?;
        let (traverse, ledger) = legacy::import(&record);
        Ok(Self { traverse, ledger, tolerances: Tolerances::default() })
    }

    pub fn to_legacy_json(&self) -> PyResult<String> {
        legacy::to_json(&legacy::export(&self.propagated(), &self.ledger)).map_err(to_py_err)
    }

    pub fn set_tolerances_json(&mut self, json: &str) -> PyResult<()> {
        self.tolerances = Tolerances::from_json(json).map_err(to_py_err)?;
        Ok(())
    }

    pub fn set_path_length_km(&mut self, km: f64) {
        self.traverse.path_length_km = km;
    }

    pub fn set_end_elevation(&mut self, elevation: Option<f64>) {
        self.traverse.set_end_elevation(elevation);
    }

    pub fn suggested_role(&self) -> &'static str {
        match suggest_next_role(&self.traverse) {
            Role::MidSight => "mid_sight",
            _ => "change_point",
        }
    }

    pub fn insert_point(&mut self, role: &str) -> PyResult<u32> {
        let role = parse_role(role)?;
        self.traverse.insert_before_end(role).map(|id| id.get()).map_err(to_py_err)
    }

    pub fn remove_point(&mut self, id: u32) -> PyResult<()> {
        self.traverse.remove(PointId(id)).map_err(to_py_err)?;
        self.ledger.prune(&self.traverse);
        Ok(())
    }

    pub fn move_point(&mut self, from: usize, to: usize) -> PyResult<()> {
        self.traverse.move_point(from, to).map_err(to_py_err)
    }

    #[pyo3(signature = (id, reading, value=None))]
    pub fn set_reading(&mut self, id: u32, reading: &str, value: Option<f64>) -> PyResult<()> {
        let reading = parse_reading(reading)?;
        self.traverse.set_reading(PointId(id), reading, value).map_err(to_py_err)
    }

    pub fn increment_correction(&mut self, id: u32) -> i32 {
        self.ledger.increment(PointId(id))
    }

    pub fn decrement_correction(&mut self, id: u32) -> i32 {
        self.ledger.decrement(PointId(id))
    }

    pub fn reset_corrections(&mut self) {
        self.ledger.reset();
    }

    /// The propagated point list as JSON.
    pub fn points_json(&self) -> PyResult<String> {
        serde_json::to_string(self.propagated().points()).map_err(json_err)
    }

    pub fn evaluate_json(&self) -> PyResult<String> {
        let propagated = self.propagated();
        let evaluation = self.evaluation(&propagated)?;
        serde_json::to_string(&evaluation).map_err(json_err)
    }

    pub fn report(&self) -> PyResult<String> {
        let propagated = self.propagated();
        let evaluation = self.evaluation(&propagated)?;
        Ok(format_report(&propagated, &evaluation, &self.ledger))
    }
}
