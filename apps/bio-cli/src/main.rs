#![deny(warnings)]

//! Headless CLI: computes the cost-breakdown and labor-sensitivity dashboards
//! for a bioreactor scenario and prints them as text or JSON.

use anyhow::{bail, Context, Result};
use bio_core::money::{format_millions_axis, format_usd};
use bio_core::*;
use bio_econ::{CostBreakdown, LaborSensitivityTable};
use bio_runtime::views::{CostChartData, LaborChartData};
use bio_runtime::{CalculationContext, ContextSettings, Scenario};
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: bio-cli [--scenario <file.yaml>] [--deltas -20,-10,0,10,20] [--json]";

#[derive(Debug, Default, PartialEq)]
struct Args {
    scenario: Option<PathBuf>,
    deltas: Option<Vec<i32>>,
    json: bool,
}

fn parse_deltas(list: &str) -> Result<Vec<i32>> {
    list.split(',')
        .map(|p| {
            p.trim()
                .parse::<i32>()
                .with_context(|| format!("invalid delta {p:?}"))
        })
        .collect()
}

fn parse_args<I: Iterator<Item = String>>(mut it: I) -> Result<Args> {
    let mut args = Args::default();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--scenario" => {
                let path = it.next().context("--scenario needs a path")?;
                args.scenario = Some(PathBuf::from(path));
            }
            "--deltas" => {
                let list = it.next().context("--deltas needs a list")?;
                args.deltas = Some(parse_deltas(&list)?);
            }
            "--json" => args.json = true,
            other => bail!("unknown argument {other:?}\n{USAGE}"),
        }
    }
    Ok(args)
}

fn reference_config() -> BioreactorConfig {
    BioreactorConfig {
        batches_per_year: 12,
        working_volume_l: Decimal::new(10_000, 0),
        output_mass_kg_per_year: Decimal::new(6_000, 0),
        media: MediaInputs {
            price_per_l: Decimal::new(95, 2),
            volumes_per_batch: Decimal::new(12, 1),
        },
        raw_materials: RawMaterialInputs {
            price_per_kg: Decimal::new(35, 0),
            kg_per_batch: Decimal::new(120, 0),
        },
        labor: LaborInputs {
            headcount_fte: Decimal::new(12, 0),
            annual_wage: Decimal::new(72_000, 0),
            utilization: Decimal::new(85, 2),
            fringe_rate: Decimal::new(28, 2),
            adjustment_pct: Decimal::ZERO,
        },
        waste: WasteInputs {
            disposal_cost_per_l: Decimal::new(6, 2),
            waste_l_per_batch: Decimal::new(14_000, 0),
        },
        facility: FacilityInputs {
            capital_cost: Decimal::new(12_000_000, 0),
            amortization_years: 25,
            annual_maintenance: Decimal::new(180_000, 0),
            labor_overhead_allocation: Decimal::new(10, 2),
        },
        consumables: ConsumableInputs {
            cost_per_batch: Decimal::new(18_500, 0),
        },
        utilities: UtilityInputs {
            price_per_kwh: Decimal::new(10, 2),
            kwh_per_batch: Decimal::new(95_000, 0),
        },
        depreciation: DepreciationSchedule {
            equipment_cost: Decimal::new(9_000_000, 0),
            salvage_value: Decimal::new(900_000, 0),
            useful_life_years: 15,
        },
    }
}

fn load_scenario(args: &Args) -> Result<Scenario> {
    let mut scenario = match &args.scenario {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading scenario {}", path.display()))?;
            Scenario::from_yaml_str(&text)
                .with_context(|| format!("parsing scenario {}", path.display()))?
        }
        None => Scenario {
            config: reference_config(),
            settings: ContextSettings::default(),
        },
    };
    if let Some(deltas) = &args.deltas {
        scenario.settings.deltas = deltas.clone();
    }
    Ok(scenario)
}

#[derive(Serialize)]
struct Report<'a> {
    breakdown: &'a CostBreakdown,
    labor_table: &'a LaborSensitivityTable,
    cost_chart: CostChartData,
    labor_chart: LaborChartData,
}

fn print_text(b: &CostBreakdown, t: &LaborSensitivityTable) {
    println!("Cost Breakdown (annual)");
    for (category, amount) in b.categories() {
        println!(
            "  {:<14} {:>16} {:>10}",
            category.label(),
            format_usd(amount, 0),
            format_millions_axis(amount)
        );
    }
    println!("  {:<14} {:>16}", "Total", format_usd(b.total_cost, 0));
    println!(
        "  {:<14} {:>16}",
        "Depreciation",
        format_usd(b.depreciation_charge, 0)
    );
    println!("  COGS: {}/kg", format_usd(b.cogs_with_depreciation, 2));
    println!();

    let chart = LaborChartData::from_table(t);
    println!("Total Annual Labor Cost ({:?} lever)", t.lever);
    for (label, s) in chart.labels.iter().zip(t.iter()) {
        let marker = if s.relative_percentage == t.current_percentage {
            "*"
        } else {
            " "
        };
        println!(
            "{marker} {:>6} {:>10} {:>16}",
            label,
            format_millions_axis(s.total_annual_cost),
            format_usd(s.total_annual_cost, 0)
        );
    }
    println!("  {}", chart.footnote);
}

fn main() -> Result<()> {
    // Logs go to stderr so --json output stays machine-readable.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args(std::env::args().skip(1))?;
    info!(scenario = ?args.scenario, deltas = ?args.deltas, json = args.json, "starting CLI");

    let scenario = load_scenario(&args)?;
    let ctx = CalculationContext::init_with(scenario.config, scenario.settings)
        .context("computing cost dashboards")?;
    let snap = ctx.snapshot();

    if args.json {
        let report = Report {
            breakdown: &snap.breakdown,
            labor_table: &snap.labor_table,
            cost_chart: CostChartData::from_breakdown(&snap.breakdown),
            labor_chart: LaborChartData::from_table(&snap.labor_table),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_text(&snap.breakdown, &snap.labor_table);
    }

    ctx.teardown();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn parses_flags() {
        let a = args(&["--scenario", "plant.yaml", "--deltas", "-10, 0,25", "--json"]).unwrap();
        assert_eq!(a.scenario, Some(PathBuf::from("plant.yaml")));
        assert_eq!(a.deltas, Some(vec![-10, 0, 25]));
        assert!(a.json);
        assert_eq!(args(&[]).unwrap(), Args::default());
    }

    #[test]
    fn rejects_bad_input() {
        assert!(args(&["--deltas", "5,x"]).is_err());
        assert!(args(&["--scenario"]).is_err());
        assert!(args(&["--verbose"]).is_err());
    }

    #[test]
    fn reference_config_is_valid() {
        validate_config(&reference_config()).unwrap();
        let scenario = load_scenario(&Args {
            deltas: Some(vec![0, 50]),
            ..Args::default()
        })
        .unwrap();
        assert_eq!(scenario.settings.deltas, vec![0, 50]);
        let ctx = CalculationContext::init_with(scenario.config, scenario.settings).unwrap();
        assert_eq!(ctx.labor_sensitivity_table().len(), 2);
    }

    #[test]
    fn bundled_scenario_loads_from_disk() {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../../assets/scenarios/pilot-plant.yaml");
        let scenario = load_scenario(&Args {
            scenario: Some(path),
            ..Args::default()
        })
        .unwrap();
        assert_eq!(scenario.config.batches_per_year, 24);
    }

    #[test]
    fn missing_scenario_reports_path() {
        let err = load_scenario(&Args {
            scenario: Some(PathBuf::from("/nonexistent/plant.yaml")),
            ..Args::default()
        })
        .unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/plant.yaml"));
    }
}
