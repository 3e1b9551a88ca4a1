use serde::{Deserialize, Serialize};

use crate::optimizer::SolveStatus;

/// A quantity split by the electricity source that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SourceSplit {
    pub wind: f64,
    pub grid: f64,
    pub total: f64,
}

impl SourceSplit {
    pub fn new(wind: f64, grid: f64) -> Self {
        Self {
            wind,
            grid,
            total: wind + grid,
        }
    }
}

/// Economic and storage outcome of following a dispatch for one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodOutcome {
    pub electricity_usage: SourceSplit,
    pub electricity_cost: SourceSplit,
    pub electricity_cost_cumulative: SourceSplit,
    pub hydrogen_produced: SourceSplit,
    pub hydrogen_in_storage: f64,
    pub electrolyser_on: bool,
}

/// Both scenarios for one period, keyed by the forecast timestamp.
///
/// `optimal` is `None` when the solve did not reach optimality and the
/// planner was configured to refuse partial plans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationRow {
    pub timestamp: String,
    pub optimal: Option<PeriodOutcome>,
    pub hypothetical_wind_only: PeriodOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputUnits {
    pub electricity_usage: String,
    pub electricity_cost: String,
    pub electricity_cost_cumulative: String,
    pub hydrogen_produced: String,
    pub hydrogen_in_storage: String,
    pub electrolyser_on: Option<String>,
}

impl Default for OutputUnits {
    fn default() -> Self {
        Self {
            electricity_usage: "MWh".to_string(),
            electricity_cost: "£".to_string(),
            electricity_cost_cumulative: "£".to_string(),
            hydrogen_produced: "m^3".to_string(),
            hydrogen_in_storage: "m^3".to_string(),
            electrolyser_on: None,
        }
    }
}

/// Response body of an optimisation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationOutput {
    pub simulations: Vec<SimulationRow>,
    pub status_of_optimal_model: SolveStatus,
    pub units: OutputUnits,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_units_serialize_with_null_electrolyser() {
        let json = serde_json::to_value(OutputUnits::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "electricityUsage": "MWh",
                "electricityCost": "£",
                "electricityCostCumulative": "£",
                "hydrogenProduced": "m^3",
                "hydrogenInStorage": "m^3",
                "electrolyserOn": null
            })
        );
    }

    #[test]
    fn test_source_split_total() {
        let split = SourceSplit::new(1.5, 2.0);
        assert_eq!(split.total, 3.5);
    }
}
