pub mod planner;

use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use crate::config::Config;

pub use planner::{HydrogenPlanner, NonOptimalPolicy, PlannerSettings};

#[derive(Clone)]
pub struct AppState {
    pub cfg: Config,
    pub planner: Arc<HydrogenPlanner>,
}

impl AppState {
    pub fn new(cfg: Config) -> Result<Self> {
        let planner = Arc::new(HydrogenPlanner::with_default_engine(
            cfg.optimiser.planner_settings(),
        )?);

        info!(
            solve_timeout_secs = cfg.optimiser.solve_timeout_secs,
            big_m_factor = cfg.optimiser.big_m_factor,
            non_optimal_policy = ?cfg.optimiser.non_optimal_policy,
            renewable_cap = ?cfg.optimiser.renewable_cap,
            "planner ready"
        );

        Ok(Self { cfg, planner })
    }
}
