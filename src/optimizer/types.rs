use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::error::{DispatchError, Result};

/// Values of `onOff` above this are read as "running". Absorbs the
/// integrality tolerance of branch-and-bound solvers.
pub const ON_THRESHOLD: f64 = 0.5;

/// Decision variable families of the dispatch model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, AsRefStr)]
pub enum VariableKind {
    #[strum(serialize = "gridPower")]
    GridPower,
    #[strum(serialize = "windPower")]
    WindPower,
    #[strum(serialize = "onOff")]
    OnOff,
}

impl VariableKind {
    pub const ALL: [VariableKind; 3] = [
        VariableKind::GridPower,
        VariableKind::WindPower,
        VariableKind::OnOff,
    ];
}

/// Identifies one decision variable: its family and its period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VariableKey {
    pub kind: VariableKind,
    pub period: usize,
}

impl VariableKey {
    pub fn new(kind: VariableKind, period: usize) -> Self {
        Self { kind, period }
    }
}

impl fmt::Display for VariableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.as_ref(), self.period)
    }
}

/// Outcome of handing a model to the solving engine.
///
/// Serialised with the labels existing clients match on, so "Not Solved"
/// keeps its space.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
pub enum SolveStatus {
    Optimal,
    #[serde(rename = "Not Solved")]
    #[strum(serialize = "Not Solved")]
    NotSolved,
    Infeasible,
    Unbounded,
    Undefined,
    #[serde(rename = "Timed Out")]
    #[strum(serialize = "Timed Out")]
    TimedOut,
}

impl SolveStatus {
    pub fn is_optimal(&self) -> bool {
        matches!(self, SolveStatus::Optimal)
    }
}

/// Raw solver output: a status plus one value per decision variable.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveResult {
    pub status: SolveStatus,
    pub values: BTreeMap<VariableKey, f64>,
}

impl SolveResult {
    /// A result that carries a status but no variable values.
    pub fn without_values(status: SolveStatus) -> Self {
        Self {
            status,
            values: BTreeMap::new(),
        }
    }

    /// Reshapes the solver values into one dispatch per period.
    ///
    /// Every key must name a period below `periods`. With `strict` set every
    /// variable of every period must be present; otherwise absent values are
    /// read as zero.
    pub fn to_dispatch(&self, periods: usize, strict: bool) -> Result<Vec<Dispatch>> {
        if let Some(key) = self.values.keys().find(|k| k.period >= periods) {
            return Err(DispatchError::UnmappedVariable { key: *key });
        }

        (0..periods)
            .map(|period| -> Result<Dispatch> {
                let read = |kind| {
                    let key = VariableKey::new(kind, period);
                    match self.values.get(&key) {
                        Some(value) => Ok(*value),
                        None if strict => Err(DispatchError::MissingVariable { key }),
                        None => Ok(0.0),
                    }
                };
                Ok(Dispatch {
                    grid_power: read(VariableKind::GridPower)?,
                    wind_power: read(VariableKind::WindPower)?,
                    on: read(VariableKind::OnOff)? > ON_THRESHOLD,
                })
            })
            .collect()
    }
}

/// Electricity drawn in one period and whether the electrolyser runs.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Dispatch {
    /// MWh from the grid
    pub grid_power: f64,
    /// MWh from renewables
    pub wind_power: f64,
    pub on: bool,
}

impl Dispatch {
    pub fn total_power(&self) -> f64 {
        self.grid_power + self.wind_power
    }
}
