use bio_core::{
    validate_config, BioreactorConfig, DepreciationSchedule, LaborInputs, ValidationError,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::CostError;

/// Named cost categories, in the order the breakdown chart shows them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostCategory {
    Media,
    OtherMaterials,
    Labor,
    Waste,
    Facility,
    Consumables,
    Utilities,
}

impl CostCategory {
    pub const ALL: [CostCategory; 7] = [
        CostCategory::Media,
        CostCategory::OtherMaterials,
        CostCategory::Labor,
        CostCategory::Waste,
        CostCategory::Facility,
        CostCategory::Consumables,
        CostCategory::Utilities,
    ];

    /// Display label used on the chart axis.
    pub fn label(self) -> &'static str {
        match self {
            CostCategory::Media => "Media",
            CostCategory::OtherMaterials => "Raw Materials",
            CostCategory::Labor => "Labor",
            CostCategory::Waste => "Waste",
            CostCategory::Facility => "Facility",
            CostCategory::Consumables => "Consumables",
            CostCategory::Utilities => "Utilities",
        }
    }
}

/// Annualized production cost split into categories, with derived COGS.
///
/// Built only by [`compute_breakdown`]; `total_cost` is the exact sum of
/// the seven category fields.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub media: Decimal,
    pub other_materials: Decimal,
    pub labor: Decimal,
    pub waste: Decimal,
    pub facility: Decimal,
    pub consumables: Decimal,
    pub utilities: Decimal,
    /// Part of `facility` allocated from labor.
    pub labor_linked_overhead: Decimal,
    pub total_cost: Decimal,
    /// Straight-line annual depreciation of process equipment.
    pub depreciation_charge: Decimal,
    pub output_mass_kg: Decimal,
    /// USD per kg, excluding depreciation.
    pub cogs_per_kg: Decimal,
    /// USD per kg, including depreciation.
    pub cogs_with_depreciation: Decimal,
}

impl CostBreakdown {
    /// Amount booked to one category.
    pub fn amount(&self, category: CostCategory) -> Decimal {
        match category {
            CostCategory::Media => self.media,
            CostCategory::OtherMaterials => self.other_materials,
            CostCategory::Labor => self.labor,
            CostCategory::Waste => self.waste,
            CostCategory::Facility => self.facility,
            CostCategory::Consumables => self.consumables,
            CostCategory::Utilities => self.utilities,
        }
    }

    /// Category amounts in chart order.
    pub fn categories(&self) -> [(CostCategory, Decimal); 7] {
        CostCategory::ALL.map(|c| (c, self.amount(c)))
    }

    /// Cost that moves with the labor input: the labor category plus the
    /// overhead allocated from it.
    pub fn labor_affected_cost(&self) -> Decimal {
        self.labor + self.labor_linked_overhead
    }
}

fn product(field: &'static str, factors: &[Decimal]) -> Result<Decimal, ValidationError> {
    factors.iter().try_fold(Decimal::ONE, |acc, f| {
        acc.checked_mul(*f).ok_or(ValidationError::Overflow(field))
    })
}

fn sum(field: &'static str, terms: &[Decimal]) -> Result<Decimal, ValidationError> {
    terms.iter().try_fold(Decimal::ZERO, |acc, t| {
        acc.checked_add(*t).ok_or(ValidationError::Overflow(field))
    })
}

fn per_kg(field: &'static str, amount: Decimal, mass: Decimal) -> Result<Decimal, ValidationError> {
    amount
        .checked_div(mass)
        .ok_or(ValidationError::Overflow(field))
}

// Zero periods are only valid with zero amounts; validation enforces that.
fn per_year(amount: Decimal, years: u32) -> Decimal {
    if years == 0 {
        return Decimal::ZERO;
    }
    amount / Decimal::from(years)
}

/// Annual labor cost: FTE x wage x utilization x (1 + fringe), scaled by
/// the live relative adjustment.
pub fn labor_cost(labor: &LaborInputs) -> Result<Decimal, CostError> {
    let fringe = sum("labor", &[Decimal::ONE, labor.fringe_rate])?;
    let cost = product(
        "labor",
        &[
            labor.headcount_fte,
            labor.annual_wage,
            labor.utilization,
            fringe,
            adjustment_factor(labor.adjustment_pct)?,
        ],
    )?;
    Ok(cost)
}

/// `1 + pct / 100`, the multiplier a relative percentage applies.
pub(crate) fn adjustment_factor(pct: Decimal) -> Result<Decimal, ValidationError> {
    sum("labor", &[Decimal::ONE, pct / Decimal::ONE_HUNDRED])
}

fn depreciation_charge(d: &DepreciationSchedule) -> Decimal {
    per_year(d.equipment_cost - d.salvage_value, d.useful_life_years)
}

/// Decompose annual production cost into categories and derive per-kg COGS.
///
/// Pure: identical input yields bit-identical output. Fails with
/// [`CostError::InvalidConfiguration`] on a non-positive output mass or any
/// negative rate, before dividing.
///
/// Example:
/// let b = compute_breakdown(&config)?;
/// assert_eq!(b.total_cost, b.categories().iter().map(|(_, v)| *v).sum());
pub fn compute_breakdown(config: &BioreactorConfig) -> Result<CostBreakdown, CostError> {
    validate_config(config)?;
    let batches = Decimal::from(config.batches_per_year);

    let media = product(
        "media",
        &[
            config.media.price_per_l,
            config.working_volume_l,
            config.media.volumes_per_batch,
            batches,
        ],
    )?;
    let other_materials = product(
        "other_materials",
        &[
            config.raw_materials.price_per_kg,
            config.raw_materials.kg_per_batch,
            batches,
        ],
    )?;
    let labor = labor_cost(&config.labor)?;
    let waste = product(
        "waste",
        &[
            config.waste.disposal_cost_per_l,
            config.waste.waste_l_per_batch,
            batches,
        ],
    )?;
    let labor_linked_overhead = product(
        "facility",
        &[labor, config.facility.labor_overhead_allocation],
    )?;
    let facility = sum(
        "facility",
        &[
            per_year(
                config.facility.capital_cost,
                config.facility.amortization_years,
            ),
            config.facility.annual_maintenance,
            labor_linked_overhead,
        ],
    )?;
    let consumables = product(
        "consumables",
        &[config.consumables.cost_per_batch, batches],
    )?;
    let utilities = product(
        "utilities",
        &[
            config.utilities.price_per_kwh,
            config.utilities.kwh_per_batch,
            batches,
        ],
    )?;

    let total_cost = sum(
        "total_cost",
        &[
            media,
            other_materials,
            labor,
            waste,
            facility,
            consumables,
            utilities,
        ],
    )?;
    let depreciation_charge = depreciation_charge(&config.depreciation);
    let mass = config.output_mass_kg_per_year;
    let cogs_per_kg = per_kg("cogs_per_kg", total_cost, mass)?;
    let cogs_with_depreciation = per_kg(
        "cogs_with_depreciation",
        sum("cogs_with_depreciation", &[total_cost, depreciation_charge])?,
        mass,
    )?;

    debug!(
        total_cost = %total_cost,
        depreciation = %depreciation_charge,
        cogs_with_depreciation = %cogs_with_depreciation,
        "computed cost breakdown"
    );

    Ok(CostBreakdown {
        media,
        other_materials,
        labor,
        waste,
        facility,
        consumables,
        utilities,
        labor_linked_overhead,
        total_cost,
        depreciation_charge,
        output_mass_kg: mass,
        cogs_per_kg,
        cogs_with_depreciation,
    })
}
