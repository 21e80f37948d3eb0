use std::fs::File;
use std::io::BufReader;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::fov::{FovError, ViewCone};
use crate::models::{FloatType, HexOffset};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Config {
    // Level geometry
    pub width: usize,
    pub height: usize,

    // Regression seeds, inclusive
    pub seed_start: u64,
    pub seed_end: u64,

    // Cellular automata
    pub initial_wall_ratio: FloatType,
    pub floor_threshold: usize,
    pub wall_threshold: usize,
    pub smoothing_iterations: usize,

    // View cone, disabled unless both are set
    pub fov_angle: Option<FloatType>,
    pub facing: Option<HexOffset>,

    // Step-through
    pub step_pause: bool,

    // Output
    pub report_path: Option<String>,
}

impl Config {
    pub fn default() -> Self {
        Self {
            // Level geometry
            width: 25,
            height: 25,

            // Regression seeds
            seed_start: 0,
            seed_end: 255,

            // Cellular automata
            initial_wall_ratio: 0.45,
            floor_threshold: 4,
            wall_threshold: 5,
            smoothing_iterations: 5,

            // View cone
            fov_angle: None,
            facing: None,

            // Step-through
            step_pause: true,

            // Output
            report_path: None,
        }
    }

    /// View cone when both the angle and the facing are configured
    pub fn view_cone(&self) -> Result<Option<ViewCone>, FovError> {
        match (self.fov_angle, self.facing) {
            (Some(aperture), Some(facing)) => ViewCone::new(aperture, facing).map(Some),
            _ => Ok(None),
        }
    }

    fn read_yaml_file(filepath: &str) -> Result<Value> {
        let file = File::open(filepath).with_context(|| format!("Cannot open file {}", filepath))?;
        let reader = BufReader::new(file);
        serde_yaml::from_reader(reader).with_context(|| format!("Failed to read file {}", filepath))
    }

    pub fn patch_from_yaml_file(&mut self, filepath: &str) -> Result<()> {
        self.patch(&Self::read_yaml_file(filepath)?)
    }

    pub fn patch(&mut self, values: &Value) -> Result<()> {
        let mut config: Value = serde_json::to_value(&self).context("Failed to serialize config")?;
        match values {
            Value::Object(values_map) => {
                // Iterate over all key-value pairs in the provided values and update the config
                for (key, value) in values_map.iter() {
                    // The key is like a file path. A key at top level starts with /
                    let root_key = format!("/{}", key);
                    if let Some(config_value) = config.pointer_mut(&root_key) {
                        *config_value = value.clone();
                    } else {
                        log::warn!("Ignoring unknown config key {}", key);
                    }
                }
            }
            Value::Null => {}
            _ => bail!("Cannot patch Config as JSON is not an Object"),
        }
        // Update the config object
        *self = serde_json::from_value(config).context("Failed to deserialize patched config")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn patch_overrides_known_keys() {
        let mut config = Config::default();
        config
            .patch(&json!({
                "width": 51,
                "initial_wall_ratio": 0.5,
                "facing": {"x": 1, "y": 1},
                "no_such_key": true
            }))
            .unwrap();
        assert_eq!(51, config.width);
        assert_eq!(25, config.height);
        assert_eq!(0.5, config.initial_wall_ratio);
        assert_eq!(Some(HexOffset::new(1, 1)), config.facing);
    }

    #[test]
    fn view_cone_needs_angle_and_facing() {
        let mut config = Config::default();
        assert_eq!(Ok(None), config.view_cone());
        config.fov_angle = Some(std::f64::consts::PI);
        assert_eq!(Ok(None), config.view_cone());
        config.facing = Some(HexOffset::new(0, 1));
        assert!(config.view_cone().unwrap().is_some());
        config.facing = Some(HexOffset::new(2, 1));
        assert!(config.view_cone().is_err());
    }

    #[test]
    fn patch_rejects_bad_values() {
        let mut config = Config::default();
        assert!(config.patch(&json!([1, 2])).is_err());
        assert!(config.patch(&json!({"width": "wide"})).is_err());
    }

    #[test]
    fn patch_from_yaml() {
        let path = std::env::temp_dir().join(format!("hexfov-config-{}.yml", std::process::id()));
        std::fs::write(&path, "seed_start: 3\nseed_end: 9\nstep_pause: false\nfov_angle: 2.5\n")
            .unwrap();
        let mut config = Config::default();
        config.patch_from_yaml_file(path.to_str().unwrap()).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(3, config.seed_start);
        assert_eq!(9, config.seed_end);
        assert!(!config.step_pause);
        assert_eq!(Some(2.5), config.fov_angle);
        assert_eq!(25, config.width);
        assert!(config.patch_from_yaml_file("/nonexistent/hexfov.yml").is_err());
    }
}
