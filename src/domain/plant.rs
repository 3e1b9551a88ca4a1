use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{DispatchError, Result};

/// Planning horizon: how many periods and how long each one lasts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RangeConfiguration {
    #[validate(range(min = 1))]
    pub periods: usize,
    /// Hours
    #[validate(range(exclusive_min = 0.0))]
    pub period_duration: f64,
}

/// Electrolyser throughput and ramping limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductionLimitsConfiguration {
    /// m^3 per hour
    #[validate(range(min = 0.0))]
    pub max_production_ph: f64,
    /// m^3 of hydrogen per MWh consumed
    #[validate(range(exclusive_min = 0.0))]
    pub production_factor: f64,
    /// MWh per hour
    #[validate(range(min = 0.0))]
    pub max_power_change_ph: f64,
    /// Fraction of the electrolyser maximum (0.15 = 15%)
    #[validate(range(min = 0.0, max = 1.0))]
    pub min_production_rate: f64,
}

/// Hydrogen tank levels, all in m^3.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StorageConfiguration {
    #[validate(range(min = 0.0))]
    pub initial_storage: f64,
    #[validate(range(min = 0.0))]
    pub max_storage: f64,
    pub min_storage_set_point: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ModelConfiguration {
    #[validate(nested)]
    pub range: RangeConfiguration,
    #[validate(nested)]
    pub production_limits: ProductionLimitsConfiguration,
    #[validate(nested)]
    pub storage: StorageConfiguration,
}

impl ModelConfiguration {
    pub fn periods(&self) -> usize {
        self.range.periods
    }

    pub fn period_duration(&self) -> f64 {
        self.range.period_duration
    }

    pub fn production_factor(&self) -> f64 {
        self.production_limits.production_factor
    }

    /// Hydrogen the electrolyser can make in one period (m^3).
    pub fn max_production_per_period(&self) -> f64 {
        self.production_limits.max_production_ph * self.range.period_duration
    }

    /// Electricity the electrolyser can draw in one period (MWh).
    pub fn max_consumption_per_period(&self) -> f64 {
        self.max_production_per_period() / self.production_limits.production_factor
    }

    /// Electricity drawn at the minimum production rate (MWh per period).
    pub fn min_elec_consumption(&self) -> f64 {
        self.max_consumption_per_period() * self.production_limits.min_production_rate
    }

    /// Largest allowed change in electricity draw between adjacent periods (MWh).
    pub fn max_power_change_per_period(&self) -> f64 {
        self.production_limits.max_power_change_ph * self.range.period_duration
    }

    /// Checks the invariants the model builder divides or bounds by.
    ///
    /// Runs regardless of whether the transport layer validated the payload.
    pub fn check(&self) -> Result<()> {
        let fields = [
            ("periodDuration", self.range.period_duration),
            ("maxProductionPh", self.production_limits.max_production_ph),
            ("productionFactor", self.production_limits.production_factor),
            ("maxPowerChangePh", self.production_limits.max_power_change_ph),
            ("minProductionRate", self.production_limits.min_production_rate),
            ("initialStorage", self.storage.initial_storage),
            ("maxStorage", self.storage.max_storage),
            ("minStorageSetPoint", self.storage.min_storage_set_point),
        ];
        if let Some((name, value)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(degenerate(format!("{name} must be finite, got {value}")));
        }

        if self.range.periods == 0 {
            return Err(degenerate("periods must be at least 1".into()));
        }
        if self.range.period_duration <= 0.0 {
            return Err(degenerate(format!(
                "periodDuration must be positive, got {}",
                self.range.period_duration
            )));
        }
        if self.production_limits.production_factor <= 0.0 {
            return Err(degenerate(format!(
                "productionFactor must be positive, got {}",
                self.production_limits.production_factor
            )));
        }
        if self.production_limits.max_production_ph < 0.0 {
            return Err(degenerate("maxProductionPh must not be negative".into()));
        }
        if self.production_limits.max_power_change_ph < 0.0 {
            return Err(degenerate("maxPowerChangePh must not be negative".into()));
        }
        if !(0.0..=1.0).contains(&self.production_limits.min_production_rate) {
            return Err(degenerate(format!(
                "minProductionRate must be within [0, 1], got {}",
                self.production_limits.min_production_rate
            )));
        }
        if self.storage.min_storage_set_point > self.storage.max_storage {
            return Err(degenerate(format!(
                "minStorageSetPoint {} exceeds maxStorage {}",
                self.storage.min_storage_set_point, self.storage.max_storage
            )));
        }
        Ok(())
    }
}

fn degenerate(message: String) -> DispatchError {
    DispatchError::DegenerateConfiguration(message)
}
