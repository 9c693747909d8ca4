use bio_core::*;
use rust_decimal::Decimal;
use serde::Deserialize;

/// Category amounts in whole USD for [`flat_config`].
pub struct Flat {
    pub media: i64,
    pub other_materials: i64,
    pub labor: i64,
    pub waste: i64,
    pub facility: i64,
    pub consumables: i64,
    pub utilities: i64,
    pub output_mass: i64,
    pub depreciation: i64,
}

/// A one-batch configuration whose categories come out exactly as given.
pub fn flat_config(f: &Flat) -> BioreactorConfig {
    let d = |v: i64| Decimal::new(v, 0);
    BioreactorConfig {
        batches_per_year: 1,
        working_volume_l: Decimal::ONE,
        output_mass_kg_per_year: d(f.output_mass),
        media: MediaInputs {
            price_per_l: d(f.media),
            volumes_per_batch: Decimal::ONE,
        },
        raw_materials: RawMaterialInputs {
            price_per_kg: d(f.other_materials),
            kg_per_batch: Decimal::ONE,
        },
        labor: LaborInputs {
            headcount_fte: Decimal::ONE,
            annual_wage: d(f.labor),
            utilization: Decimal::ONE,
            fringe_rate: Decimal::ZERO,
            adjustment_pct: Decimal::ZERO,
        },
        waste: WasteInputs {
            disposal_cost_per_l: d(f.waste),
            waste_l_per_batch: Decimal::ONE,
        },
        facility: FacilityInputs {
            capital_cost: Decimal::ZERO,
            amortization_years: 0,
            annual_maintenance: d(f.facility),
            labor_overhead_allocation: Decimal::ZERO,
        },
        consumables: ConsumableInputs {
            cost_per_batch: d(f.consumables),
        },
        utilities: UtilityInputs {
            price_per_kwh: d(f.utilities),
            kwh_per_batch: Decimal::ONE,
        },
        depreciation: DepreciationSchedule {
            equipment_cost: d(f.depreciation),
            salvage_value: Decimal::ZERO,
            useful_life_years: 1,
        },
    }
}

/// Reference plant used in the worked example.
pub fn reference() -> BioreactorConfig {
    flat_config(&Flat {
        media: 100_000,
        other_materials: 50_000,
        labor: 80_000,
        waste: 5_000,
        facility: 20_000,
        consumables: 15_000,
        utilities: 10_000,
        output_mass: 1_000,
        depreciation: 30_000,
    })
}

#[derive(Deserialize)]
struct ScenarioFile {
    config: BioreactorConfig,
}

/// The bundled multi-batch plant, which exercises every rate.
pub fn pilot_plant() -> BioreactorConfig {
    let text = include_str!("../../../assets/scenarios/pilot-plant.yaml");
    match serde_yaml::from_str::<ScenarioFile>(text) {
        Ok(f) => f.config,
        Err(e) => panic!("bundled scenario does not parse: {e}"),
    }
}
