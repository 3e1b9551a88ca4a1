use serde::{Deserialize, Serialize};
use validator::Validate;

use super::ModelConfiguration;
use crate::error::{DispatchError, Result};

/// Forecast for a single period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ForecastItem {
    /// Opaque identifier of the period, echoed back in the output
    pub timestamp: String,
    /// MWh available from renewables during the period
    #[validate(range(min = 0.0))]
    pub renewable_generation: f64,
    /// m^3 of hydrogen drawn from storage during the period
    #[validate(range(min = 0.0))]
    pub hydrogen_demand: f64,
    /// £/MWh
    pub grid_price: f64,
    /// £/MWh
    pub renewable_price: f64,
}

/// Body of an optimisation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct OptimisationRequest {
    #[validate(nested)]
    pub config: ModelConfiguration,
    #[validate(length(min = 1))]
    #[validate(nested)]
    pub forecasts: Vec<ForecastItem>,
}

/// A request whose configuration and forecast passed every precondition.
///
/// Everything downstream (model builder, heuristic, assembler) takes this
/// instead of the raw request so the checks cannot be skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanningProblem {
    config: ModelConfiguration,
    forecasts: Vec<ForecastItem>,
}

impl PlanningProblem {
    pub fn new(request: OptimisationRequest) -> Result<Self> {
        let OptimisationRequest { config, forecasts } = request;

        if forecasts.len() != config.periods() {
            return Err(DispatchError::PeriodMismatch {
                periods: config.periods(),
                forecasts: forecasts.len(),
            });
        }
        config.check()?;

        if let Some((i, item)) = forecasts.iter().enumerate().find(|(_, f)| {
            ![
                f.renewable_generation,
                f.hydrogen_demand,
                f.grid_price,
                f.renewable_price,
            ]
            .iter()
            .all(|v| v.is_finite())
        }) {
            return Err(DispatchError::DegenerateConfiguration(format!(
                "forecast {i} ({}) has a non-finite value",
                item.timestamp
            )));
        }

        Ok(Self { config, forecasts })
    }

    pub fn config(&self) -> &ModelConfiguration {
        &self.config
    }

    pub fn forecasts(&self) -> &[ForecastItem] {
        &self.forecasts
    }

    pub fn periods(&self) -> usize {
        self.forecasts.len()
    }

    /// Running total of hydrogen demand, one entry per period.
    pub fn cumulative_demand(&self) -> Vec<f64> {
        self.forecasts
            .iter()
            .scan(0.0, |total, f| {
                *total += f.hydrogen_demand;
                Some(*total)
            })
            .collect()
    }
}
