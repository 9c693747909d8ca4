use bio_core::{BioreactorConfig, ValidationError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::breakdown::adjustment_factor;
use crate::{compute_breakdown, CostError, ScenarioSetIssue};

/// Relative staffing-level deltas shown on the labor chart by default.
pub const DEFAULT_DELTAS: [i32; 5] = [-20, -10, 0, 10, 20];

/// Which labor input a delta perturbs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaborLever {
    /// Scale the annual wage per FTE.
    #[default]
    Wage,
    /// Scale the number of FTEs.
    Headcount,
}

/// How the live labor setting is mapped onto the delta set when it does
/// not land exactly on one of the deltas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurrentPercentagePolicy {
    /// Closest delta; ties go to the smaller magnitude, then the lower value.
    #[default]
    Nearest,
    /// Largest delta not above the setting, else the smallest delta.
    AtOrBelow,
    /// Smallest delta not below the setting, else the largest delta.
    AtOrAbove,
}

/// Options for [`compute_labor_sensitivity_with`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensitivityOptions {
    pub lever: LaborLever,
    pub current_policy: CurrentPercentagePolicy,
}

/// Result for one relative delta.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LaborScenario {
    pub relative_percentage: i32,
    /// Effective FTEs in this scenario.
    pub headcount_fte: Decimal,
    /// Effective annual wage per FTE in this scenario.
    pub annual_wage: Decimal,
    /// Labor-affected annual cost: labor plus labor-linked overhead.
    pub total_annual_cost: Decimal,
    /// Total cost recomputed end-to-end for the scenario.
    pub total_cost: Decimal,
    pub cogs_with_depreciation: Decimal,
}

/// Annual labor cost across relative staffing-level perturbations.
///
/// `results` holds exactly one entry per value of `relative_percentages`,
/// which is sorted ascending and unique. Serialized map keys are the
/// percentage strings (`"-10"`, `"20"`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LaborSensitivityTable {
    pub relative_percentages: Vec<i32>,
    pub results: BTreeMap<i32, LaborScenario>,
    /// Delta matching the live labor setting; always in `relative_percentages`.
    pub current_percentage: i32,
    /// Whether the live setting landed exactly on `current_percentage`.
    pub exact_match: bool,
    /// Labor-affected cost of the live configuration.
    pub live_total_annual_cost: Decimal,
    pub lever: LaborLever,
}

impl LaborSensitivityTable {
    /// String key used by chart consumers for a delta.
    pub fn key(pct: i32) -> String {
        pct.to_string()
    }

    /// Exact lookup by numeric delta.
    pub fn result(&self, pct: i32) -> Option<&LaborScenario> {
        self.results.get(&pct)
    }

    /// Lookup by string key, e.g. `"20"` or `"-10"`.
    pub fn result_by_key(&self, key: &str) -> Option<&LaborScenario> {
        key.trim().parse::<i32>().ok().and_then(|p| self.result(p))
    }

    /// Scenario the live configuration maps to.
    pub fn current(&self) -> Option<&LaborScenario> {
        self.result(self.current_percentage)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Scenarios in ascending delta order.
    pub fn iter(&self) -> impl Iterator<Item = &LaborScenario> {
        self.results.values()
    }
}

fn normalize_deltas(deltas: &[i32]) -> Result<Vec<i32>, CostError> {
    if deltas.is_empty() {
        return Err(CostError::InvalidScenarioSet(ScenarioSetIssue::Empty));
    }
    let mut sorted = deltas.to_vec();
    sorted.sort_unstable();
    if sorted[0] < -100 {
        return Err(CostError::InvalidScenarioSet(ScenarioSetIssue::BelowFloor(
            sorted[0],
        )));
    }
    if let Some(w) = sorted.windows(2).find(|w| w[0] == w[1]) {
        return Err(CostError::InvalidScenarioSet(ScenarioSetIssue::Duplicate(
            w[0],
        )));
    }
    Ok(sorted)
}

fn scale(pct: i32) -> Decimal {
    (Decimal::from(pct) + Decimal::ONE_HUNDRED) / Decimal::ONE_HUNDRED
}

// The wage lever reuses the live adjustment multiplier, so a scenario whose
// delta equals the live setting is computed by the identical expression.
fn scenario_config(
    live: &BioreactorConfig,
    pct: i32,
    lever: LaborLever,
) -> Result<BioreactorConfig, CostError> {
    let mut cfg = live.clone();
    match lever {
        LaborLever::Wage => {
            cfg.labor.adjustment_pct = Decimal::from(pct);
        }
        LaborLever::Headcount => {
            cfg.labor.adjustment_pct = Decimal::ZERO;
            cfg.labor.headcount_fte = cfg
                .labor
                .headcount_fte
                .checked_mul(scale(pct))
                .ok_or(ValidationError::Overflow("labor.headcount_fte"))?;
        }
    }
    Ok(cfg)
}

/// Pick the delta the live labor setting corresponds to.
///
/// An exact match always wins and is reported with `true`. Otherwise the
/// policy decides. Fails with [`ScenarioSetIssue::Empty`] for an empty delta
/// set, and with an overflow of `labor.adjustment_pct` when the setting is
/// too far from a delta for `Nearest` to measure the distance.
pub fn select_current_percentage(
    sorted_deltas: &[i32],
    setting: Decimal,
    policy: CurrentPercentagePolicy,
) -> Result<(i32, bool), CostError> {
    if sorted_deltas.is_empty() {
        return Err(CostError::InvalidScenarioSet(ScenarioSetIssue::Empty));
    }
    if let Some(&d) = sorted_deltas.iter().find(|&&d| Decimal::from(d) == setting) {
        return Ok((d, true));
    }
    let first = sorted_deltas[0];
    let last = sorted_deltas[sorted_deltas.len() - 1];
    let chosen = match policy {
        CurrentPercentagePolicy::Nearest => {
            let distance = |d: i32| {
                Decimal::from(d)
                    .checked_sub(setting)
                    .map(|v| v.abs())
                    .ok_or(ValidationError::Overflow("labor.adjustment_pct"))
            };
            let mut best = (first, distance(first)?);
            for &d in &sorted_deltas[1..] {
                let dist = distance(d)?;
                let closer = dist
                    .cmp(&best.1)
                    .then(d.unsigned_abs().cmp(&best.0.unsigned_abs()))
                    .then(d.cmp(&best.0));
                if closer.is_lt() {
                    best = (d, dist);
                }
            }
            best.0
        }
        CurrentPercentagePolicy::AtOrBelow => sorted_deltas
            .iter()
            .copied()
            .filter(|d| Decimal::from(*d) <= setting)
            .max()
            .unwrap_or(first),
        CurrentPercentagePolicy::AtOrAbove => sorted_deltas
            .iter()
            .copied()
            .find(|d| Decimal::from(*d) >= setting)
            .unwrap_or(last),
    };
    Ok((chosen, false))
}

/// Labor sensitivity with default options (wage lever, nearest policy).
pub fn compute_labor_sensitivity(
    config: &BioreactorConfig,
    deltas: &[i32],
) -> Result<LaborSensitivityTable, CostError> {
    compute_labor_sensitivity_with(config, deltas, &SensitivityOptions::default())
}

/// Compute total annual labor cost at each relative delta.
///
/// Each scenario holds every field but the perturbed lever fixed and runs
/// through [`compute_breakdown`] end-to-end, so overhead allocated from
/// labor moves with it. Deltas may arrive in any order; they must be
/// non-empty, unique and >= -100.
pub fn compute_labor_sensitivity_with(
    config: &BioreactorConfig,
    deltas: &[i32],
    options: &SensitivityOptions,
) -> Result<LaborSensitivityTable, CostError> {
    let relative_percentages = normalize_deltas(deltas)?;
    let live = compute_breakdown(config)?;

    let mut results = BTreeMap::new();
    for &pct in &relative_percentages {
        let cfg = scenario_config(config, pct, options.lever)?;
        let b = compute_breakdown(&cfg)?;
        let annual_wage = cfg
            .labor
            .annual_wage
            .checked_mul(adjustment_factor(cfg.labor.adjustment_pct)?)
            .ok_or(ValidationError::Overflow("labor.annual_wage"))?;
        results.insert(
            pct,
            LaborScenario {
                relative_percentage: pct,
                headcount_fte: cfg.labor.headcount_fte,
                annual_wage,
                total_annual_cost: b.labor_affected_cost(),
                total_cost: b.total_cost,
                cogs_with_depreciation: b.cogs_with_depreciation,
            },
        );
    }

    let (current_percentage, exact_match) = select_current_percentage(
        &relative_percentages,
        config.labor.adjustment_pct,
        options.current_policy,
    )?;

    debug!(
        scenarios = results.len(),
        current_percentage,
        exact_match,
        "computed labor sensitivity"
    );

    Ok(LaborSensitivityTable {
        relative_percentages,
        results,
        current_percentage,
        exact_match,
        live_total_annual_cost: live.labor_affected_cost(),
        lever: options.lever,
    })
}
