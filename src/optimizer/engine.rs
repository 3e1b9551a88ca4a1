//! Solving engine seam.
//!
//! The planner only needs "give me values for these variables and tell me
//! how it went". [`MicroLpEngine`] answers that with good_lp's pure-Rust
//! microlp backend (simplex plus branch-and-bound for the binaries).

use good_lp::solvers::microlp::microlp;
use good_lp::{ResolutionError, Solution, SolverModel};

use super::strategies::DispatchModel;
use super::{SolveResult, SolveStatus};

/// Solves a dispatch model. Blocking; callers run it off the async executor.
#[cfg_attr(test, mockall::automock)]
pub trait SolvingEngine: Send + Sync {
    fn solve(&self, model: DispatchModel) -> SolveResult;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MicroLpEngine;

impl SolvingEngine for MicroLpEngine {
    fn solve(&self, model: DispatchModel) -> SolveResult {
        let keyed = model.keyed_variables();
        let (variables, objective, constraints) = model.into_parts();

        let mut problem = variables.minimise(objective).using(microlp);
        for tagged in constraints {
            problem = problem.with(tagged.constraint);
        }

        match problem.solve() {
            Ok(solution) => SolveResult {
                status: SolveStatus::Optimal,
                values: keyed
                    .into_iter()
                    .map(|(key, var)| (key, solution.value(var)))
                    .collect(),
            },
            Err(ResolutionError::Infeasible) => SolveResult::without_values(SolveStatus::Infeasible),
            Err(ResolutionError::Unbounded) => SolveResult::without_values(SolveStatus::Unbounded),
            Err(other) => {
                tracing::warn!(error = %other, "solver gave up without a classified status");
                SolveResult::without_values(SolveStatus::Undefined)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::forecast::tests::flat_forecast;
    use crate::domain::plant::tests::sample_config;
    use crate::domain::{OptimisationRequest, PlanningProblem};
    use crate::optimizer::MilpModelBuilder;

    fn solve(request: OptimisationRequest) -> SolveResult {
        let problem = PlanningProblem::new(request).unwrap();
        let model = MilpModelBuilder::default().build(&problem).unwrap();
        MicroLpEngine.solve(model)
    }

    #[test]
    fn test_flat_forecast_with_floor_at_start_level_refills_demand() {
        let mut config = sample_config(6);
        config.storage.min_storage_set_point = config.storage.initial_storage;

        let result = solve(OptimisationRequest {
            config,
            forecasts: flat_forecast(6),
        });
        assert_eq!(result.status, SolveStatus::Optimal);
        assert_eq!(result.values.len(), 18);

        // the floor forces every period's 100 m^3 back in, 5 MWh at 20 m^3/MWh
        let dispatch = result.to_dispatch(6, true).unwrap();
        let consumed: f64 = dispatch.iter().map(|d| d.total_power()).sum();
        assert!((consumed - 30.0).abs() < 1e-6, "consumed {consumed}");

        // renewable is cheaper, so all of it is used
        for d in &dispatch {
            assert!((d.wind_power - 3.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_slack_floor_lets_plan_draw_down_storage() {
        let config = sample_config(6);
        let floor = config.storage.min_storage_set_point;
        let initial = config.storage.initial_storage;

        let result = solve(OptimisationRequest {
            config,
            forecasts: flat_forecast(6),
        });
        assert_eq!(result.status, SolveStatus::Optimal);

        // the final ceiling caps consumption at the demand; it is not a target
        let dispatch = result.to_dispatch(6, true).unwrap();
        let consumed: f64 = dispatch.iter().map(|d| d.total_power()).sum();
        assert!(consumed <= 30.0 + 1e-6, "consumed {consumed}");

        let end_storage = initial - 600.0 + consumed * 20.0;
        assert!(end_storage >= floor - 1e-6);
        assert!(end_storage <= initial + 1e-6);
    }

    #[test]
    fn test_unreachable_demand_is_infeasible() {
        let mut config = sample_config(1);
        config.storage.initial_storage = 0.0;
        config.storage.min_storage_set_point = 0.0;
        let mut forecasts = flat_forecast(1);
        // needs 50 MWh, electrolyser can take 10 per period
        forecasts[0].hydrogen_demand = 1000.0;

        let result = solve(OptimisationRequest { config, forecasts });
        assert_eq!(result.status, SolveStatus::Infeasible);
        assert!(result.values.is_empty());
    }
}
