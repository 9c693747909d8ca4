use bio_core::BioreactorConfig;
use serde::{Deserialize, Serialize};

use crate::ContextSettings;

/// A process configuration together with the recalculation settings, as
/// stored in scenario YAML files.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub config: BioreactorConfig,
    #[serde(default)]
    pub settings: ContextSettings,
}

impl Scenario {
    pub fn from_yaml_str(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bio_econ::{CurrentPercentagePolicy, LaborLever, DEFAULT_DELTAS};

    #[test]
    fn bundled_scenario_parses() {
        let s = Scenario::from_yaml_str(crate::testing::PILOT_PLANT_YAML).unwrap();
        assert_eq!(s.config.batches_per_year, 24);
        assert_eq!(s.settings.deltas, DEFAULT_DELTAS.to_vec());
        assert_eq!(s.settings.sensitivity.lever, LaborLever::Wage);
        assert_eq!(
            s.settings.sensitivity.current_policy,
            CurrentPercentagePolicy::Nearest
        );
        bio_core::validate_config(&s.config).unwrap();
    }

    #[test]
    fn settings_default_when_omitted() {
        let text = crate::testing::PILOT_PLANT_YAML
            .split("\nsettings:")
            .next()
            .unwrap();
        let s = Scenario::from_yaml_str(text).unwrap();
        assert_eq!(s.settings, ContextSettings::default());
    }

    #[test]
    fn policy_and_lever_parse_from_snake_case() {
        let text = crate::testing::PILOT_PLANT_YAML.replace(
            "lever: wage\n    current_policy: nearest",
            "lever: headcount\n    current_policy: at_or_below",
        );
        let s = Scenario::from_yaml_str(&text).unwrap();
        assert_eq!(s.settings.sensitivity.lever, LaborLever::Headcount);
        assert_eq!(
            s.settings.sensitivity.current_policy,
            CurrentPercentagePolicy::AtOrBelow
        );
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        assert!(Scenario::from_yaml_str("config: [1, 2").is_err());
    }
}
