use bio_core::BioreactorConfig;

use crate::Scenario;

pub const PILOT_PLANT_YAML: &str = include_str!("../../../assets/scenarios/pilot-plant.yaml");

pub fn pilot_plant() -> BioreactorConfig {
    match Scenario::from_yaml_str(PILOT_PLANT_YAML) {
        Ok(s) => s.config,
        Err(e) => panic!("bundled scenario does not parse: {e}"),
    }
}
