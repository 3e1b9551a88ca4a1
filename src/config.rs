use anyhow::Result;
use figment::{providers::{Env, Format, Toml}, Figment};
use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;

use crate::controller::{NonOptimalPolicy, PlannerSettings};
use crate::optimizer::{RenewableCap, DEFAULT_BIG_M_FACTOR};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub optimiser: OptimiserConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
    pub enable_cors: bool,
    pub cors_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            request_timeout_secs: 60,
            enable_cors: false,
            cors_origin: "http://localhost:3000".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OptimiserConfig {
    pub solve_timeout_secs: u64,
    pub big_m_factor: f64,
    pub non_optimal_policy: NonOptimalPolicy,
    pub renewable_cap: RenewableCap,
    pub max_concurrent_solves: usize,
}

impl Default for OptimiserConfig {
    fn default() -> Self {
        Self {
            solve_timeout_secs: 30,
            big_m_factor: DEFAULT_BIG_M_FACTOR,
            non_optimal_policy: NonOptimalPolicy::default(),
            renewable_cap: RenewableCap::default(),
            max_concurrent_solves: 4,
        }
    }
}

impl OptimiserConfig {
    pub fn planner_settings(&self) -> PlannerSettings {
        PlannerSettings {
            solve_timeout: Duration::from_secs(self.solve_timeout_secs),
            big_m_factor: self.big_m_factor,
            non_optimal_policy: self.non_optimal_policy,
            renewable_cap: self.renewable_cap,
            max_concurrent_solves: self.max_concurrent_solves,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let figment = Figment::new()
            .merge(Toml::file("config/default.toml"))
            .merge(Env::prefixed("H2__").split("__"));
        let cfg: Config = figment.extract()?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.request_timeout_secs == 0 {
            anyhow::bail!("server.request_timeout_secs must be greater than 0");
        }
        if self.optimiser.solve_timeout_secs == 0 {
            anyhow::bail!("optimiser.solve_timeout_secs must be greater than 0");
        }
        if self.optimiser.max_concurrent_solves == 0 {
            anyhow::bail!("optimiser.max_concurrent_solves must be greater than 0");
        }
        if !self.optimiser.big_m_factor.is_finite() || self.optimiser.big_m_factor < 1.0 {
            anyhow::bail!(
                "optimiser.big_m_factor must be at least 1, got {}",
                self.optimiser.big_m_factor
            );
        }
        Ok(())
    }
}
