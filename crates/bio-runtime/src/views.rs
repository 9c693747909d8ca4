//! Chart-ready data derived from a snapshot.

use bio_core::money::{format_millions_axis, format_usd, percentage_label, to_millions};
use bio_econ::{CostBreakdown, LaborSensitivityTable};
use rust_decimal::Decimal;
use serde::Serialize;

/// Horizontal bar chart of the cost breakdown.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CostChartData {
    pub labels: Vec<&'static str>,
    /// Category amounts in USD millions.
    pub values_millions: Vec<Decimal>,
    /// Whole-dollar tooltip per bar, e.g. `$90,000`.
    pub tooltips: Vec<String>,
    /// e.g. `COGS: $310.00/kg`.
    pub cogs_headline: String,
}

impl CostChartData {
    pub fn from_breakdown(b: &CostBreakdown) -> Self {
        let categories = b.categories();
        Self {
            labels: categories.iter().map(|(c, _)| c.label()).collect(),
            values_millions: categories.iter().map(|(_, v)| to_millions(*v)).collect(),
            tooltips: categories.iter().map(|(_, v)| format_usd(*v, 0)).collect(),
            cogs_headline: format!("COGS: {}/kg", format_usd(b.cogs_with_depreciation, 2)),
        }
    }
}

/// Bar chart of annual labor cost per relative change.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LaborChartData {
    /// `-20%`, `0%`, `+10%`, ...
    pub labels: Vec<String>,
    pub values_millions: Vec<Decimal>,
    /// e.g. `Annual Cost: $0.08M`.
    pub tooltips: Vec<String>,
    pub footnote: String,
}

impl LaborChartData {
    pub fn from_table(t: &LaborSensitivityTable) -> Self {
        let mut labels = Vec::with_capacity(t.len());
        let mut values_millions = Vec::with_capacity(t.len());
        let mut tooltips = Vec::with_capacity(t.len());
        for s in t.iter() {
            labels.push(percentage_label(s.relative_percentage));
            values_millions.push(to_millions(s.total_annual_cost));
            tooltips.push(format!(
                "Annual Cost: {}",
                format_millions_axis(s.total_annual_cost)
            ));
        }
        Self {
            labels,
            values_millions,
            tooltips,
            footnote: format!(
                "Showing costs for current labor cost setting of {}%",
                t.current_percentage
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::pilot_plant;
    use crate::CalculationContext;

    #[test]
    fn cost_chart_matches_breakdown() {
        let ctx = CalculationContext::init(pilot_plant()).unwrap();
        let chart = CostChartData::from_breakdown(&ctx.cost_breakdown());
        assert_eq!(chart.labels.len(), 7);
        assert_eq!(chart.labels[1], "Raw Materials");
        assert_eq!(chart.values_millions[0], Decimal::new(9, 2));
        assert_eq!(chart.tooltips[2], "$530,400");
        // (1,203,800 + 150,000) / 1,800 kg
        assert_eq!(chart.cogs_headline, "COGS: $752.11/kg");
    }

    #[test]
    fn labor_chart_labels_and_scale() {
        let ctx = CalculationContext::init(pilot_plant()).unwrap();
        let chart = LaborChartData::from_table(&ctx.labor_sensitivity_table());
        assert_eq!(chart.labels, ["-20%", "-10%", "0%", "+10%", "+20%"]);
        assert_eq!(chart.values_millions[2], Decimal::new(60_996, 5));
        assert_eq!(chart.tooltips[2], "Annual Cost: $0.61M");
        assert_eq!(
            chart.footnote,
            "Showing costs for current labor cost setting of 0%"
        );
    }
}
