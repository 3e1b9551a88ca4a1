//! MILP (Mixed-Integer Linear Programming) dispatch model
//!
//! Builds the hydrogen production problem for one planning horizon. Per
//! period the model decides how much grid and renewable electricity the
//! electrolyser draws and whether it runs at all.
//!
//! The formulation considers:
//! - Renewable availability per period
//! - Electrolyser throughput (max consumption per period)
//! - Storage floor and ceiling as bounds on cumulative consumption
//! - Final ceiling: the horizon cannot end above the starting storage level
//! - Minimum production rate while running, big-M on/off linkage
//! - Ramp limits between adjacent periods
//!
//! The objective sums `power * price` per period without the period
//! duration. Reported costs do include it; with a uniform duration both rank
//! plans identically.

use std::collections::BTreeMap;

use good_lp::{constraint, variable, Constraint, Expression, ProblemVariables, Variable};
use strum::AsRefStr;

use crate::domain::PlanningProblem;
use crate::error::{DispatchError, Result};
use crate::optimizer::constraints::{max_elec_for_storage_ceiling, min_elec_for_storage_floor};
use crate::optimizer::{VariableKey, VariableKind};

/// Multiplier applied to the max consumption per period to get the big-M
/// constant. M has to exceed any feasible combined draw or the on/off
/// linkage stops binding.
pub const DEFAULT_BIG_M_FACTOR: f64 = 10.0;

/// Constraint families, in the order they are added for each period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, AsRefStr)]
pub enum ConstraintKind {
    /// windPower <= renewable generation
    MaxWindAvailable,
    /// grid + wind <= max consumption per period
    MaxConsumption,
    /// cumulative consumption keeps storage above the set point
    StorageFloor,
    /// cumulative consumption keeps storage below capacity
    StorageCeiling,
    /// running implies at least the minimum production rate
    MinProductionRate,
    /// any consumption forces onOff to 1
    OnOffLink,
    RampDown,
    RampUp,
}

/// Decision variables of one period.
#[derive(Debug, Clone, Copy)]
pub struct PeriodVariables {
    pub grid_power: Variable,
    pub wind_power: Variable,
    pub on_off: Variable,
}

impl PeriodVariables {
    pub fn get(&self, kind: VariableKind) -> Variable {
        match kind {
            VariableKind::GridPower => self.grid_power,
            VariableKind::WindPower => self.wind_power,
            VariableKind::OnOff => self.on_off,
        }
    }

    fn total_power(&self) -> Expression {
        self.grid_power + self.wind_power
    }
}

/// A constraint together with the family and period it came from.
pub struct TaggedConstraint {
    pub kind: ConstraintKind,
    pub period: usize,
    pub constraint: Constraint,
}

/// A fully built dispatch model, ready to hand to a solving engine.
pub struct DispatchModel {
    variables: ProblemVariables,
    periods: Vec<PeriodVariables>,
    objective: Expression,
    constraints: Vec<TaggedConstraint>,
}

impl std::fmt::Debug for DispatchModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchModel")
            .field("periods", &self.periods.len())
            .field("constraints", &self.summary())
            .finish()
    }
}

impl DispatchModel {
    pub fn periods(&self) -> usize {
        self.periods.len()
    }

    pub fn constraints(&self) -> &[TaggedConstraint] {
        &self.constraints
    }

    /// Number of constraints per family.
    pub fn summary(&self) -> BTreeMap<ConstraintKind, usize> {
        let mut counts = BTreeMap::new();
        for c in &self.constraints {
            *counts.entry(c.kind).or_insert(0) += 1;
        }
        counts
    }

    /// Every decision variable with its structured key, in period order.
    pub fn keyed_variables(&self) -> Vec<(VariableKey, Variable)> {
        self.periods
            .iter()
            .enumerate()
            .flat_map(|(i, p)| {
                VariableKind::ALL.map(|kind| (VariableKey::new(kind, i), p.get(kind)))
            })
            .collect()
    }

    /// Splits the model into what a solver backend consumes.
    pub fn into_parts(self) -> (ProblemVariables, Expression, Vec<TaggedConstraint>) {
        (self.variables, self.objective, self.constraints)
    }
}

/// Builds [`DispatchModel`]s for planning problems.
#[derive(Debug, Clone)]
pub struct MilpModelBuilder {
    big_m_factor: f64,
}

impl Default for MilpModelBuilder {
    fn default() -> Self {
        Self {
            big_m_factor: DEFAULT_BIG_M_FACTOR,
        }
    }
}

impl MilpModelBuilder {
    pub fn new(big_m_factor: f64) -> Result<Self> {
        if !big_m_factor.is_finite() || big_m_factor < 1.0 {
            return Err(DispatchError::DegenerateConfiguration(format!(
                "big-M factor must be at least 1, got {big_m_factor}"
            )));
        }
        Ok(Self { big_m_factor })
    }

    pub fn big_m_factor(&self) -> f64 {
        self.big_m_factor
    }

    pub fn build(&self, problem: &PlanningProblem) -> Result<DispatchModel> {
        let cfg = problem.config();
        let forecasts = problem.forecasts();
        let n_periods = problem.periods();

        let initial_storage = cfg.storage.initial_storage;
        let production_factor = cfg.production_factor();
        let max_consumption = cfg.max_consumption_per_period();
        let min_consumption = cfg.min_elec_consumption();
        let max_power_change = cfg.max_power_change_per_period();
        let big_m = max_consumption * self.big_m_factor;

        // gridPower[i], windPower[i] in MWh, onOff[i] binary
        let mut variables = ProblemVariables::new();
        let periods: Vec<PeriodVariables> = (0..n_periods)
            .map(|i| PeriodVariables {
                grid_power: variables.add(variable().min(0.0).name(format!("gridPower{i}"))),
                wind_power: variables.add(variable().min(0.0).name(format!("windPower{i}"))),
                on_off: variables.add(variable().binary().name(format!("onOff{i}"))),
            })
            .collect();

        let objective: Expression = periods
            .iter()
            .zip(forecasts)
            .map(|(p, f)| f.grid_price * p.grid_power + f.renewable_price * p.wind_power)
            .sum();

        let mut constraints = Vec::with_capacity(n_periods * 8);
        let mut push = |kind, period, constraint| {
            constraints.push(TaggedConstraint {
                kind,
                period,
                constraint,
            })
        };

        let cumulative_demand = problem.cumulative_demand();
        let mut cumulative_consumption = Expression::from(0.0);

        for (i, (p, forecast)) in periods.iter().zip(forecasts).enumerate() {
            let total = p.total_power();
            cumulative_consumption += total.clone();
            let final_period = i + 1 == n_periods;

            push(
                ConstraintKind::MaxWindAvailable,
                i,
                constraint!(p.wind_power <= forecast.renewable_generation),
            );

            push(
                ConstraintKind::MaxConsumption,
                i,
                constraint!(total.clone() <= max_consumption),
            );

            let floor = min_elec_for_storage_floor(
                initial_storage,
                cumulative_demand[i],
                cfg.storage.min_storage_set_point,
                production_factor,
            )?;
            push(
                ConstraintKind::StorageFloor,
                i,
                constraint!(cumulative_consumption.clone() >= floor),
            );

            let ceiling = max_elec_for_storage_ceiling(
                initial_storage,
                cumulative_demand[i],
                cfg.storage.max_storage,
                production_factor,
                final_period,
            )?;
            push(
                ConstraintKind::StorageCeiling,
                i,
                constraint!(cumulative_consumption.clone() <= ceiling),
            );

            push(
                ConstraintKind::MinProductionRate,
                i,
                constraint!(total.clone() - min_consumption * p.on_off >= 0.0),
            );

            push(
                ConstraintKind::OnOffLink,
                i,
                constraint!(total.clone() - big_m * p.on_off <= 0.0),
            );

            // No data past the horizon, so the last period has no ramp pair
            if let Some(next) = periods.get(i + 1) {
                let change = total - next.total_power();
                push(
                    ConstraintKind::RampDown,
                    i,
                    constraint!(change.clone() <= max_power_change),
                );
                push(
                    ConstraintKind::RampUp,
                    i,
                    constraint!(change >= -max_power_change),
                );
            }
        }

        tracing::debug!(
            periods = n_periods,
            constraints = constraints.len(),
            big_m,
            "dispatch model built"
        );

        Ok(DispatchModel {
            variables,
            periods,
            objective,
            constraints,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::forecast::tests::flat_forecast;
    use crate::domain::plant::tests::sample_config;
    use crate::domain::OptimisationRequest;

    fn problem(periods: usize) -> PlanningProblem {
        PlanningProblem::new(OptimisationRequest {
            config: sample_config(periods),
            forecasts: flat_forecast(periods),
        })
        .unwrap()
    }

    #[test]
    fn test_constraint_counts_per_family() {
        let model = MilpModelBuilder::default().build(&problem(24)).unwrap();
        let summary = model.summary();

        for kind in [
            ConstraintKind::MaxWindAvailable,
            ConstraintKind::MaxConsumption,
            ConstraintKind::StorageFloor,
            ConstraintKind::StorageCeiling,
            ConstraintKind::MinProductionRate,
            ConstraintKind::OnOffLink,
        ] {
            assert_eq!(summary[&kind], 24, "{}", kind.as_ref());
        }
        assert_eq!(summary[&ConstraintKind::RampDown], 23);
        assert_eq!(summary[&ConstraintKind::RampUp], 23);
        assert_eq!(model.constraints().len(), 6 * 24 + 2 * 23);
    }

    #[test]
    fn test_single_period_has_no_ramp() {
        let model = MilpModelBuilder::default().build(&problem(1)).unwrap();
        let summary = model.summary();
        assert!(!summary.contains_key(&ConstraintKind::RampDown));
        assert!(!summary.contains_key(&ConstraintKind::RampUp));
        assert_eq!(model.constraints().len(), 6);
    }

    #[test]
    fn test_keyed_variables_cover_every_period() {
        let model = MilpModelBuilder::default().build(&problem(3)).unwrap();
        let keys: Vec<String> = model
            .keyed_variables()
            .iter()
            .map(|(k, _)| k.to_string())
            .collect();
        assert_eq!(keys.len(), 9);
        assert_eq!(keys[0], "gridPower0");
        assert_eq!(keys[8], "onOff2");
    }

    #[test]
    fn test_constraints_tagged_in_period_order() {
        let model = MilpModelBuilder::default().build(&problem(4)).unwrap();
        let periods: Vec<usize> = model.constraints().iter().map(|c| c.period).collect();
        assert!(periods.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_big_m_factor_must_cover_max_draw() {
        assert!(MilpModelBuilder::new(0.5).is_err());
        assert!(MilpModelBuilder::new(f64::NAN).is_err());
        assert_eq!(MilpModelBuilder::new(4.0).unwrap().big_m_factor(), 4.0);
    }
}
