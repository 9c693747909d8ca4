#![deny(warnings)]

//! Core domain models and invariants for the bioreactor cost engine.
//!
//! This crate defines the serializable process configuration read by the
//! calculators, with validation helpers that guarantee the invariants the
//! cost model depends on (positive output, non-negative rates, bounded
//! ratios).

pub mod money;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Culture media consumption and price.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MediaInputs {
    /// Media price in USD per liter (>= 0).
    pub price_per_l: Decimal,
    /// Working volumes of media consumed per batch, including feeds (>= 0).
    pub volumes_per_batch: Decimal,
}

/// Raw materials other than media (the "Raw Materials" category).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawMaterialInputs {
    /// Price in USD per kg (>= 0).
    pub price_per_kg: Decimal,
    /// Mass consumed per batch in kg (>= 0).
    pub kg_per_batch: Decimal,
}

/// Staffing level and cost of the operating crew.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LaborInputs {
    /// Full-time equivalents assigned to the process (>= 0).
    pub headcount_fte: Decimal,
    /// Annual base wage per FTE in USD (>= 0).
    pub annual_wage: Decimal,
    /// Share of paid time charged to this process, in [0, 1].
    pub utilization: Decimal,
    /// Benefits and payroll taxes as a fraction of wages (>= 0).
    #[serde(default)]
    pub fringe_rate: Decimal,
    /// Live relative labor setting in percent; 0 is the unperturbed baseline.
    /// Must be >= -100.
    #[serde(default)]
    pub adjustment_pct: Decimal,
}

/// Waste disposal.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WasteInputs {
    /// Disposal cost in USD per liter (>= 0).
    pub disposal_cost_per_l: Decimal,
    /// Liters of waste per batch (>= 0).
    pub waste_l_per_batch: Decimal,
}

/// Facility charges.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FacilityInputs {
    /// Facility build-out cost in USD, amortized linearly (>= 0).
    pub capital_cost: Decimal,
    /// Amortization period in years; must be > 0 when capital_cost > 0.
    pub amortization_years: u32,
    /// Annual maintenance, insurance and rent in USD (>= 0).
    #[serde(default)]
    pub annual_maintenance: Decimal,
    /// Fraction of labor cost allocated to facility overhead, in [0, 1].
    #[serde(default)]
    pub labor_overhead_allocation: Decimal,
}

/// Single-use consumables (bags, filters, probes).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConsumableInputs {
    /// Consumables cost per batch in USD (>= 0).
    pub cost_per_batch: Decimal,
}

/// Energy and utilities.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UtilityInputs {
    /// Blended utility price in USD per kWh (>= 0).
    pub price_per_kwh: Decimal,
    /// Energy drawn per batch in kWh (>= 0).
    pub kwh_per_batch: Decimal,
}

/// Straight-line depreciation of process equipment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DepreciationSchedule {
    /// Installed equipment cost in USD (>= 0).
    pub equipment_cost: Decimal,
    /// Residual value at end of life in USD, in [0, equipment_cost].
    #[serde(default)]
    pub salvage_value: Decimal,
    /// Useful life in years; must be > 0 when the depreciable base is > 0.
    pub useful_life_years: u32,
}

/// Process configuration of one bioreactor train.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BioreactorConfig {
    /// Batches run per year.
    pub batches_per_year: u32,
    /// Working volume of the vessel in liters (>= 0).
    pub working_volume_l: Decimal,
    /// Annual product output in kg (> 0).
    pub output_mass_kg_per_year: Decimal,
    pub media: MediaInputs,
    pub raw_materials: RawMaterialInputs,
    pub labor: LaborInputs,
    pub waste: WasteInputs,
    pub facility: FacilityInputs,
    pub consumables: ConsumableInputs,
    pub utilities: UtilityInputs,
    pub depreciation: DepreciationSchedule,
}

/// Validation errors for configuration invariants.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Monetary rates and quantities must be non-negative.
    #[error("{0} must not be negative")]
    Negative(&'static str),
    /// Output mass must be strictly positive.
    #[error("{0} must be greater than zero")]
    NonPositive(&'static str),
    /// Ratio or percentage outside its allowed range.
    #[error("{0} is out of range")]
    OutOfRange(&'static str),
    /// A non-zero amount is spread over a zero-length period.
    #[error("{0} must be greater than zero for a non-zero amount")]
    ZeroPeriod(&'static str),
    /// Intermediate amount exceeds the representable range.
    #[error("arithmetic overflow while computing {0}")]
    Overflow(&'static str),
}

fn non_negative(field: &'static str, value: Decimal) -> Result<(), ValidationError> {
    if value < Decimal::ZERO {
        return Err(ValidationError::Negative(field));
    }
    Ok(())
}

fn unit_interval(field: &'static str, value: Decimal) -> Result<(), ValidationError> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(ValidationError::OutOfRange(field));
    }
    Ok(())
}

/// Validate labor inputs.
pub fn validate_labor(l: &LaborInputs) -> Result<(), ValidationError> {
    non_negative("labor.headcount_fte", l.headcount_fte)?;
    non_negative("labor.annual_wage", l.annual_wage)?;
    non_negative("labor.fringe_rate", l.fringe_rate)?;
    unit_interval("labor.utilization", l.utilization)?;
    if l.adjustment_pct < -Decimal::ONE_HUNDRED {
        return Err(ValidationError::OutOfRange("labor.adjustment_pct"));
    }
    Ok(())
}

/// Validate facility inputs.
pub fn validate_facility(f: &FacilityInputs) -> Result<(), ValidationError> {
    non_negative("facility.capital_cost", f.capital_cost)?;
    non_negative("facility.annual_maintenance", f.annual_maintenance)?;
    unit_interval(
        "facility.labor_overhead_allocation",
        f.labor_overhead_allocation,
    )?;
    if f.amortization_years == 0 && f.capital_cost > Decimal::ZERO {
        return Err(ValidationError::ZeroPeriod("facility.amortization_years"));
    }
    Ok(())
}

/// Validate a depreciation schedule.
pub fn validate_depreciation(d: &DepreciationSchedule) -> Result<(), ValidationError> {
    non_negative("depreciation.equipment_cost", d.equipment_cost)?;
    non_negative("depreciation.salvage_value", d.salvage_value)?;
    if d.salvage_value > d.equipment_cost {
        return Err(ValidationError::OutOfRange("depreciation.salvage_value"));
    }
    if d.useful_life_years == 0 && d.equipment_cost > d.salvage_value {
        return Err(ValidationError::ZeroPeriod("depreciation.useful_life_years"));
    }
    Ok(())
}

/// Validate the whole configuration. Zero rates are accepted; negative
/// values are rejected, never clamped.
pub fn validate_config(c: &BioreactorConfig) -> Result<(), ValidationError> {
    if c.output_mass_kg_per_year <= Decimal::ZERO {
        return Err(ValidationError::NonPositive("output_mass_kg_per_year"));
    }
    non_negative("working_volume_l", c.working_volume_l)?;
    non_negative("media.price_per_l", c.media.price_per_l)?;
    non_negative("media.volumes_per_batch", c.media.volumes_per_batch)?;
    non_negative("raw_materials.price_per_kg", c.raw_materials.price_per_kg)?;
    non_negative("raw_materials.kg_per_batch", c.raw_materials.kg_per_batch)?;
    validate_labor(&c.labor)?;
    non_negative("waste.disposal_cost_per_l", c.waste.disposal_cost_per_l)?;
    non_negative("waste.waste_l_per_batch", c.waste.waste_l_per_batch)?;
    validate_facility(&c.facility)?;
    non_negative("consumables.cost_per_batch", c.consumables.cost_per_batch)?;
    non_negative("utilities.price_per_kwh", c.utilities.price_per_kwh)?;
    non_negative("utilities.kwh_per_batch", c.utilities.kwh_per_batch)?;
    validate_depreciation(&c.depreciation)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn config() -> BioreactorConfig {
        BioreactorConfig {
            batches_per_year: 20,
            working_volume_l: Decimal::new(2000, 0),
            output_mass_kg_per_year: Decimal::new(1500, 0),
            media: MediaInputs {
                price_per_l: Decimal::new(150, 2),
                volumes_per_batch: Decimal::new(3, 0),
            },
            raw_materials: RawMaterialInputs {
                price_per_kg: Decimal::new(40, 0),
                kg_per_batch: Decimal::new(25, 0),
            },
            labor: LaborInputs {
                headcount_fte: Decimal::new(6, 0),
                annual_wage: Decimal::new(70_000, 0),
                utilization: Decimal::new(8, 1),
                fringe_rate: Decimal::new(3, 1),
                adjustment_pct: Decimal::ZERO,
            },
            waste: WasteInputs {
                disposal_cost_per_l: Decimal::new(5, 2),
                waste_l_per_batch: Decimal::new(6000, 0),
            },
            facility: FacilityInputs {
                capital_cost: Decimal::new(3_000_000, 0),
                amortization_years: 20,
                annual_maintenance: Decimal::new(40_000, 0),
                labor_overhead_allocation: Decimal::ZERO,
            },
            consumables: ConsumableInputs {
                cost_per_batch: Decimal::new(4_500, 0),
            },
            utilities: UtilityInputs {
                price_per_kwh: Decimal::new(12, 2),
                kwh_per_batch: Decimal::new(18_000, 0),
            },
            depreciation: DepreciationSchedule {
                equipment_cost: Decimal::new(1_200_000, 0),
                salvage_value: Decimal::new(200_000, 0),
                useful_life_years: 10,
            },
        }
    }

    #[test]
    fn valid_config_passes() {
        validate_config(&config()).unwrap();
    }

    #[test]
    fn zero_output_mass_is_rejected() {
        let mut c = config();
        c.output_mass_kg_per_year = Decimal::ZERO;
        assert_eq!(
            validate_config(&c),
            Err(ValidationError::NonPositive("output_mass_kg_per_year"))
        );
        c.output_mass_kg_per_year = Decimal::new(-1, 0);
        assert!(validate_config(&c).is_err());
    }

    #[test]
    fn negative_rate_is_rejected_not_clamped() {
        let mut c = config();
        c.utilities.price_per_kwh = Decimal::new(-1, 2);
        assert_eq!(
            validate_config(&c),
            Err(ValidationError::Negative("utilities.price_per_kwh"))
        );
    }

    #[test]
    fn zero_rates_are_valid() {
        let mut c = config();
        c.media.price_per_l = Decimal::ZERO;
        c.consumables.cost_per_batch = Decimal::ZERO;
        c.labor.headcount_fte = Decimal::ZERO;
        validate_config(&c).unwrap();
    }

    #[test]
    fn periods_must_cover_nonzero_amounts() {
        let mut c = config();
        c.facility.amortization_years = 0;
        assert_eq!(
            validate_config(&c),
            Err(ValidationError::ZeroPeriod("facility.amortization_years"))
        );
        c.facility.capital_cost = Decimal::ZERO;
        validate_config(&c).unwrap();

        c.depreciation.useful_life_years = 0;
        assert!(validate_config(&c).is_err());
        c.depreciation.salvage_value = c.depreciation.equipment_cost;
        validate_config(&c).unwrap();
    }

    #[test]
    fn salvage_above_cost_is_rejected() {
        let mut c = config();
        c.depreciation.salvage_value = Decimal::new(2_000_000, 0);
        assert_eq!(
            validate_config(&c),
            Err(ValidationError::OutOfRange("depreciation.salvage_value"))
        );
    }

    #[test]
    fn labor_adjustment_floor() {
        let mut c = config();
        c.labor.adjustment_pct = Decimal::new(-100, 0);
        validate_config(&c).unwrap();
        c.labor.adjustment_pct = Decimal::new(-101, 0);
        assert_eq!(
            validate_config(&c),
            Err(ValidationError::OutOfRange("labor.adjustment_pct"))
        );
    }

    #[test]
    fn serde_roundtrip_config() {
        let c = config();
        let s = serde_json::to_string(&c).unwrap();
        let back: BioreactorConfig = serde_json::from_str(&s).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn yaml_accepts_plain_numbers_and_defaults() {
        let yaml = r#"
batches_per_year: 10
working_volume_l: 1000
output_mass_kg_per_year: 250.5
media: { price_per_l: 1.25, volumes_per_batch: 2 }
raw_materials: { price_per_kg: 30, kg_per_batch: 10 }
labor: { headcount_fte: 4, annual_wage: 65000, utilization: 1 }
waste: { disposal_cost_per_l: 0.1, waste_l_per_batch: 3000 }
facility: { capital_cost: 0, amortization_years: 0 }
consumables: { cost_per_batch: 2000 }
utilities: { price_per_kwh: 0.1, kwh_per_batch: 9000 }
depreciation: { equipment_cost: 500000, useful_life_years: 10 }
"#;
        let c: BioreactorConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(c.output_mass_kg_per_year, Decimal::new(2505, 1));
        assert_eq!(c.labor.adjustment_pct, Decimal::ZERO);
        assert_eq!(c.labor.fringe_rate, Decimal::ZERO);
        assert_eq!(c.depreciation.salvage_value, Decimal::ZERO);
        validate_config(&c).unwrap();
    }

    proptest! {
        #[test]
        fn non_negative_inputs_validate(price in 0i64..1_000_000,
                                        mass in 1i64..10_000_000,
                                        util in 0i64..=100) {
            let mut c = config();
            c.media.price_per_l = Decimal::new(price, 2);
            c.output_mass_kg_per_year = Decimal::new(mass, 1);
            c.labor.utilization = Decimal::new(util, 2);
            prop_assert!(validate_config(&c).is_ok());
        }

        #[test]
        fn any_negative_wage_is_rejected(cents in 1i64..100_000_000) {
            let mut c = config();
            c.labor.annual_wage = Decimal::new(-cents, 2);
            prop_assert_eq!(
                validate_config(&c),
                Err(ValidationError::Negative("labor.annual_wage"))
            );
        }
    }
}
