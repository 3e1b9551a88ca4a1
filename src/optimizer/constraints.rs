//! Storage-derived bounds on cumulative electricity consumption.
//!
//! Both helpers translate a hydrogen level (m^3) into the electricity (MWh)
//! the electrolyser must have consumed by the end of a period.

use crate::error::{DispatchError, Result};

/// Electricity that must have been consumed so far to keep storage at or
/// above `min_storage_set_point`, given `cumulative_demand` drawn since the
/// start. Never negative.
pub fn min_elec_for_storage_floor(
    storage_at_start: f64,
    cumulative_demand: f64,
    min_storage_set_point: f64,
    production_factor: f64,
) -> Result<f64> {
    ensure_production_factor(production_factor)?;

    let storage_without_production = storage_at_start - cumulative_demand;
    let shortfall = min_storage_set_point - storage_without_production;
    Ok((shortfall / production_factor).max(0.0))
}

/// Electricity that may have been consumed so far without overfilling the
/// tank.
///
/// On the final period the bound caps the total at the demand, so the plan
/// cannot end above the storage level it started from. It only ends exactly
/// there when the storage floor forces it, e.g. with `minStorageSetPoint`
/// equal to the initial storage.
pub fn max_elec_for_storage_ceiling(
    storage_at_start: f64,
    cumulative_demand: f64,
    max_storage: f64,
    production_factor: f64,
    final_period: bool,
) -> Result<f64> {
    ensure_production_factor(production_factor)?;

    let bound = if final_period {
        cumulative_demand / production_factor
    } else {
        (max_storage - storage_at_start + cumulative_demand) / production_factor
    };
    Ok(bound)
}

fn ensure_production_factor(production_factor: f64) -> Result<()> {
    if production_factor > 0.0 && production_factor.is_finite() {
        Ok(())
    } else {
        Err(DispatchError::DegenerateConfiguration(format!(
            "productionFactor must be positive and finite, got {production_factor}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_elec_needed_from_empty_storage() {
        // 100 m^3 demand plus 10 m^3 floor, nothing in the tank
        assert_eq!(min_elec_for_storage_floor(0.0, 100.0, 10.0, 1.0).unwrap(), 110.0);
    }

    #[test]
    fn test_no_elec_needed_when_storage_covers_demand() {
        assert_eq!(min_elec_for_storage_floor(500.0, 100.0, 10.0, 1.0).unwrap(), 0.0);
    }

    #[test]
    fn test_no_elec_needed_without_demand() {
        assert_eq!(min_elec_for_storage_floor(500.0, 0.0, 10.0, 1.0).unwrap(), 0.0);
    }

    #[test]
    fn test_production_factor_scales_result() {
        assert_eq!(min_elec_for_storage_floor(0.0, 100.0, 0.0, 20.0).unwrap(), 5.0);
    }

    #[test]
    fn test_zero_production_factor_is_rejected() {
        assert!(matches!(
            min_elec_for_storage_floor(0.0, 100.0, 10.0, 0.0),
            Err(DispatchError::DegenerateConfiguration(_))
        ));
        assert!(max_elec_for_storage_ceiling(0.0, 100.0, 10.0, 0.0, false).is_err());
    }

    #[test]
    fn test_ceiling_intermediate_and_final() {
        // room for 1000 m^3 plus what has been drawn
        assert_eq!(
            max_elec_for_storage_ceiling(1000.0, 200.0, 2000.0, 20.0, false).unwrap(),
            60.0
        );
        assert_eq!(
            max_elec_for_storage_ceiling(1000.0, 200.0, 2000.0, 20.0, true).unwrap(),
            10.0
        );
    }

    #[test]
    fn test_final_ceiling_meets_floor_only_at_start_level() {
        // 1000 m^3 in the tank, 600 m^3 drawn over the horizon
        let ceiling = max_elec_for_storage_ceiling(1000.0, 600.0, 2000.0, 20.0, true).unwrap();

        let slack_floor = min_elec_for_storage_floor(1000.0, 600.0, 200.0, 20.0).unwrap();
        assert_eq!(slack_floor, 0.0);
        assert!(slack_floor < ceiling);

        let tight_floor = min_elec_for_storage_floor(1000.0, 600.0, 1000.0, 20.0).unwrap();
        assert_eq!(tight_floor, ceiling);
    }

    proptest! {
        #[test]
        fn prop_floor_is_never_negative(
            start in 0.0f64..1e5,
            demand in 0.0f64..1e5,
            floor in 0.0f64..1e5,
            factor in 0.1f64..100.0,
        ) {
            let elec = min_elec_for_storage_floor(start, demand, floor, factor).unwrap();
            prop_assert!(elec >= 0.0);
        }

        #[test]
        fn prop_floor_grows_with_demand(
            start in 0.0f64..1e4,
            demand in 0.0f64..1e4,
            extra in 0.0f64..1e4,
            floor in 0.0f64..1e4,
            factor in 0.1f64..100.0,
        ) {
            let before = min_elec_for_storage_floor(start, demand, floor, factor).unwrap();
            let after = min_elec_for_storage_floor(start, demand + extra, floor, factor).unwrap();
            prop_assert!(after >= before);
        }
    }
}
