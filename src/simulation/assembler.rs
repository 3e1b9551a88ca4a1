//! # Outcome Assembler
//!
//! Replays a dispatch plan against the forecast and reports, per period,
//! what it costs and where it leaves the hydrogen tank.
//!
//! ## Ledger
//!
//! The fold carries three running values, seeded from the configuration:
//!
//! - storage level (m^3), starting at `initialStorage`
//! - cumulative renewable cost (£), starting at 0
//! - cumulative grid cost (£), starting at 0
//!
//! Per period:
//!
//! - cost = power (MWh) * periodDuration * price
//! - hydrogen = power * productionFactor
//! - storage += hydrogen - demand, clamped at `maxStorage`
//!
//! Hydrogen that does not fit in the tank is dropped. The storage level is
//! not floored; a plan that overdraws the tank reports a negative level.

use crate::domain::{ForecastItem, ModelConfiguration, PeriodOutcome, PlanningProblem, SourceSplit};
use crate::optimizer::Dispatch;

/// Running state of one scenario.
#[derive(Debug, Clone)]
pub struct StorageLedger {
    period_duration: f64,
    production_factor: f64,
    max_storage: f64,
    storage: f64,
    wind_cost: f64,
    grid_cost: f64,
}

impl StorageLedger {
    pub fn new(config: &ModelConfiguration) -> Self {
        Self {
            period_duration: config.period_duration(),
            production_factor: config.production_factor(),
            max_storage: config.storage.max_storage,
            storage: config.storage.initial_storage,
            wind_cost: 0.0,
            grid_cost: 0.0,
        }
    }

    /// Advances the ledger by one period.
    pub fn step(&mut self, dispatch: &Dispatch, forecast: &ForecastItem) -> PeriodOutcome {
        let wind_cost = dispatch.wind_power * self.period_duration * forecast.renewable_price;
        let grid_cost = dispatch.grid_power * self.period_duration * forecast.grid_price;
        self.wind_cost += wind_cost;
        self.grid_cost += grid_cost;

        let hydrogen_produced = SourceSplit::new(
            dispatch.wind_power * self.production_factor,
            dispatch.grid_power * self.production_factor,
        );

        self.storage += hydrogen_produced.total - forecast.hydrogen_demand;
        let excess = self.storage - self.max_storage;
        if excess > 0.0 {
            tracing::trace!(excess, "hydrogen above tank capacity discarded");
            self.storage = self.max_storage;
        }

        PeriodOutcome {
            electricity_usage: SourceSplit::new(dispatch.wind_power, dispatch.grid_power),
            electricity_cost: SourceSplit::new(wind_cost, grid_cost),
            electricity_cost_cumulative: SourceSplit::new(self.wind_cost, self.grid_cost),
            hydrogen_produced,
            hydrogen_in_storage: self.storage,
            electrolyser_on: dispatch.on,
        }
    }
}

/// Folds a dispatch plan over the forecast, in period order.
///
/// `dispatch` holds one entry per forecast period.
pub fn assemble_outcomes(problem: &PlanningProblem, dispatch: &[Dispatch]) -> Vec<PeriodOutcome> {
    debug_assert_eq!(dispatch.len(), problem.periods());

    let mut ledger = StorageLedger::new(problem.config());
    dispatch
        .iter()
        .zip(problem.forecasts())
        .map(|(d, f)| ledger.step(d, f))
        .collect()
}
