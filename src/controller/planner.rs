use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tracing::{info, instrument, warn};

use crate::domain::{
    OptimisationRequest, OutputUnits, PeriodOutcome, PlanningProblem, SimulationOutput,
    SimulationRow,
};
use crate::error::{DispatchError, Result};
use crate::optimizer::{
    DispatchModel, MaxRenewableDispatcher, MicroLpEngine, MilpModelBuilder, RenewableCap, SolveResult,
    SolveStatus, SolvingEngine, DEFAULT_BIG_M_FACTOR,
};
use crate::simulation::assemble_outcomes;

/// What to report for the optimal scenario when the solve is not `Optimal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NonOptimalPolicy {
    /// Leave `optimal` empty and report only the status.
    #[default]
    Refuse,
    /// Assemble whatever values the engine attached, reading absent ones as 0.
    BestEffort,
}

#[derive(Debug, Clone)]
pub struct PlannerSettings {
    pub solve_timeout: Duration,
    pub big_m_factor: f64,
    pub non_optimal_policy: NonOptimalPolicy,
    pub renewable_cap: RenewableCap,
    /// Solves allowed on the blocking pool at once, abandoned ones included.
    pub max_concurrent_solves: usize,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            solve_timeout: Duration::from_secs(30),
            big_m_factor: DEFAULT_BIG_M_FACTOR,
            non_optimal_policy: NonOptimalPolicy::default(),
            renewable_cap: RenewableCap::default(),
            max_concurrent_solves: 4,
        }
    }
}

/// Runs one optimisation request end to end: preconditions, model build,
/// bounded solve, renewable baseline, and outcome assembly.
pub struct HydrogenPlanner {
    engine: Arc<dyn SolvingEngine>,
    builder: MilpModelBuilder,
    baseline: MaxRenewableDispatcher,
    solve_permits: Arc<Semaphore>,
    solve_timeout: Duration,
    non_optimal_policy: NonOptimalPolicy,
}

impl HydrogenPlanner {
    pub fn new(engine: Arc<dyn SolvingEngine>, settings: PlannerSettings) -> Result<Self> {
        if settings.max_concurrent_solves == 0 {
            return Err(DispatchError::DegenerateConfiguration(
                "max_concurrent_solves must be at least 1".into(),
            ));
        }
        Ok(Self {
            engine,
            builder: MilpModelBuilder::new(settings.big_m_factor)?,
            baseline: MaxRenewableDispatcher::new(settings.renewable_cap),
            solve_permits: Arc::new(Semaphore::new(settings.max_concurrent_solves)),
            solve_timeout: settings.solve_timeout,
            non_optimal_policy: settings.non_optimal_policy,
        })
    }

    /// Planner backed by the bundled microlp engine.
    pub fn with_default_engine(settings: PlannerSettings) -> Result<Self> {
        Self::new(Arc::new(MicroLpEngine), settings)
    }

    #[instrument(
        name = "plan",
        skip_all,
        fields(run_id = %uuid::Uuid::new_v4(), periods = request.config.periods())
    )]
    pub async fn plan(&self, request: OptimisationRequest) -> Result<SimulationOutput> {
        let problem = PlanningProblem::new(request)?;
        let model = self.builder.build(&problem)?;

        let started = Instant::now();
        let solved = self.solve(model).await?;
        let solve_ms = started.elapsed().as_millis() as u64;

        if solved.status.is_optimal() {
            info!(status = %solved.status, solve_ms, "dispatch model solved");
        } else {
            warn!(
                status = %solved.status,
                solve_ms,
                policy = ?self.non_optimal_policy,
                "dispatch model not solved to optimality"
            );
        }

        let optimal = self.optimal_outcomes(&problem, &solved)?;
        let hypothetical = assemble_outcomes(&problem, &self.baseline.dispatch(&problem));

        let simulations = problem
            .forecasts()
            .iter()
            .zip(hypothetical)
            .enumerate()
            .map(|(i, (forecast, hypothetical_wind_only))| SimulationRow {
                timestamp: forecast.timestamp.clone(),
                optimal: optimal.as_ref().map(|o| o[i].clone()),
                hypothetical_wind_only,
            })
            .collect();

        Ok(SimulationOutput {
            simulations,
            status_of_optimal_model: solved.status,
            units: OutputUnits::default(),
        })
    }

    /// Hands the model to the engine on the blocking pool, bounded by the
    /// solve timeout. Waiting for a solve slot counts against the timeout.
    ///
    /// An expired solve keeps running in the background and its result is
    /// dropped. It keeps its slot until the engine returns, so abandoned
    /// solves cannot pile up on the blocking pool.
    async fn solve(&self, model: DispatchModel) -> Result<SolveResult> {
        let engine = Arc::clone(&self.engine);
        let permits = Arc::clone(&self.solve_permits);

        let bounded = async move {
            let permit = permits
                .acquire_owned()
                .await
                .map_err(|e| DispatchError::SolverTask(e.to_string()))?;
            let task = tokio::task::spawn_blocking(move || {
                let _permit = permit;
                engine.solve(model)
            });
            Ok::<_, DispatchError>(task.await)
        };

        match tokio::time::timeout(self.solve_timeout, bounded).await {
            Ok(Ok(Ok(result))) => Ok(result),
            Ok(Ok(Err(e))) if e.is_panic() => Err(DispatchError::SolverTask(e.to_string())),
            Ok(Ok(Err(_))) => Ok(SolveResult::without_values(SolveStatus::NotSolved)),
            Ok(Err(e)) => Err(e),
            Err(_) => {
                warn!(
                    timeout_ms = self.solve_timeout.as_millis() as u64,
                    available_slots = self.solve_permits.available_permits(),
                    "solve timed out"
                );
                Ok(SolveResult::without_values(SolveStatus::TimedOut))
            }
        }
    }

    fn optimal_outcomes(
        &self,
        problem: &PlanningProblem,
        solved: &SolveResult,
    ) -> Result<Option<Vec<PeriodOutcome>>> {
        let strict = match (solved.status.is_optimal(), self.non_optimal_policy) {
            (true, _) => true,
            (false, NonOptimalPolicy::BestEffort) => false,
            (false, NonOptimalPolicy::Refuse) => return Ok(None),
        };
        let dispatch = solved.to_dispatch(problem.periods(), strict)?;
        Ok(Some(assemble_outcomes(problem, &dispatch)))
    }
}
