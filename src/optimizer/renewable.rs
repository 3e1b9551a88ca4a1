use serde::{Deserialize, Serialize};

use super::Dispatch;
use crate::domain::PlanningProblem;

/// How the renewable-only baseline caps production per period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenewableCap {
    /// Production is the smaller of renewable supply and electrolyser capacity.
    #[default]
    Electrolyser,
    /// Production is the larger of the two, ignoring the electrolyser limit.
    /// Kept for comparison with previously published baseline figures.
    Uncapped,
}

/// Baseline plan that runs the electrolyser all the time on renewable power
/// only, without consulting the solver.
///
/// Storage limits are not considered here; the outcome assembler discards
/// whatever would overflow the tank.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxRenewableDispatcher {
    cap: RenewableCap,
}

impl MaxRenewableDispatcher {
    pub fn new(cap: RenewableCap) -> Self {
        Self { cap }
    }

    pub fn dispatch(&self, problem: &PlanningProblem) -> Vec<Dispatch> {
        let cfg = problem.config();
        let production_factor = cfg.production_factor();
        let max_production = cfg.max_production_per_period();

        problem
            .forecasts()
            .iter()
            .map(|forecast| {
                let renewable_production = forecast.renewable_generation * production_factor;
                let production = match self.cap {
                    RenewableCap::Electrolyser => renewable_production.min(max_production),
                    RenewableCap::Uncapped => renewable_production.max(max_production),
                };
                Dispatch {
                    grid_power: 0.0,
                    wind_power: production / production_factor,
                    on: true,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::forecast::tests::flat_forecast;
    use crate::domain::plant::tests::sample_config;
    use crate::domain::OptimisationRequest;

    fn problem_with_generation(generation: &[f64]) -> PlanningProblem {
        let mut forecasts = flat_forecast(generation.len());
        for (f, g) in forecasts.iter_mut().zip(generation) {
            f.renewable_generation = *g;
        }
        PlanningProblem::new(OptimisationRequest {
            config: sample_config(generation.len()),
            forecasts,
        })
        .unwrap()
    }

    #[test]
    fn test_capped_by_electrolyser() {
        // max consumption is 10 MWh per period
        let problem = problem_with_generation(&[4.0, 25.0, 0.0]);
        let plan = MaxRenewableDispatcher::default().dispatch(&problem);

        let wind: Vec<f64> = plan.iter().map(|d| d.wind_power).collect();
        assert_eq!(wind, vec![4.0, 10.0, 0.0]);
        assert!(plan.iter().all(|d| d.grid_power == 0.0 && d.on));
    }

    #[test]
    fn test_uncapped_takes_larger_limit() {
        let problem = problem_with_generation(&[4.0, 25.0]);
        let plan = MaxRenewableDispatcher::new(RenewableCap::Uncapped).dispatch(&problem);

        let wind: Vec<f64> = plan.iter().map(|d| d.wind_power).collect();
        assert_eq!(wind, vec![10.0, 25.0]);
    }

    #[test]
    fn test_cap_deserializes_snake_case() {
        let cap: RenewableCap = serde_json::from_str("\"uncapped\"").unwrap();
        assert_eq!(cap, RenewableCap::Uncapped);
    }
}
