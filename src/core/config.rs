//! Simulation configuration with documented defaults
//!
//! Values come from three layers, later ones winning: the built-in defaults
//! below, an optional TOML file, and `Parameter` directives embedded in the
//! scene stream.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SimError};

/// Configuration for one simulation run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    // === TIME ===
    /// Duration of one tick in seconds (`DT`)
    pub dt: f64,

    /// Number of ticks to run before reporting (`EvalSteps`)
    pub eval_steps: u64,

    /// Evaluate the neural network only on ticks divisible by this (`NetworkUpdate`)
    ///
    /// At 1 the network runs every tick. Larger values hold motor commands
    /// at zero on the skipped ticks, since actuators decay when undriven.
    pub network_update_interval: u64,

    // === PHYSICS ===
    /// Gravity vector (`GravityX`, `GravityY`, `GravityZ`)
    pub gravity: [f64; 3],

    /// Maximum contact points generated per accepted geom pair (`nContacts`)
    pub contacts_per_pair: usize,

    /// Coulomb friction for contacts (`Friction`); negative means unbounded
    pub friction: f64,

    // === PRESENTATION ===
    // Stored for front ends. The headless core never reads them.
    pub camera_position: [f64; 3],
    pub camera_hpr: [f64; 3],
    pub camera_tracking: bool,
    pub camera_body: i64,
    pub draw_joints: bool,

    /// Parameters with no dedicated field, kept verbatim
    pub extra: BTreeMap<String, f64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            dt: 0.01,
            eval_steps: 200,
            network_update_interval: 1,

            gravity: [0.0, 0.0, -9.8],
            contacts_per_pair: 10,
            friction: -1.0,

            camera_position: [0.0, -5.0, 2.0],
            camera_hpr: [90.0, -10.0, 0.0],
            camera_tracking: false,
            camera_body: 0,
            draw_joints: false,

            extra: BTreeMap::new(),
        }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a config from a TOML file; missing keys keep their defaults
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply a named `Parameter` directive
    ///
    /// Unknown names are not an error: they land in `extra` so downstream
    /// tools can still read them back.
    pub fn set_parameter(&mut self, name: &str, value: f64) -> Result<()> {
        match name {
            "DT" => self.dt = value,
            "EvalSteps" => self.eval_steps = count(name, value)?,
            "NetworkUpdate" => self.network_update_interval = count(name, value)?,
            "GravityX" => self.gravity[0] = value,
            "GravityY" => self.gravity[1] = value,
            "GravityZ" => self.gravity[2] = value,
            "nContacts" => self.contacts_per_pair = count(name, value)? as usize,
            "Friction" => self.friction = value,
            "CameraX" => self.camera_position[0] = value,
            "CameraY" => self.camera_position[1] = value,
            "CameraZ" => self.camera_position[2] = value,
            "CameraH" => self.camera_hpr[0] = value,
            "CameraP" => self.camera_hpr[1] = value,
            "CameraR" => self.camera_hpr[2] = value,
            "CameraTracking" => self.camera_tracking = value != 0.0,
            "CameraBody" => self.camera_body = value as i64,
            "DrawJoints" => self.draw_joints = value != 0.0,
            _ => {
                self.extra.insert(name.to_string(), value);
            }
        }
        tracing::debug!(parameter = name, value, "Parameter set");
        Ok(())
    }

    /// Contact friction, `None` when unbounded
    pub fn friction_coefficient(&self) -> Option<f64> {
        (self.friction >= 0.0).then_some(self.friction)
    }

    /// Whether the network is evaluated on `tick`
    pub fn evaluates_network(&self, tick: u64) -> bool {
        tick % self.network_update_interval.max(1) == 0
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.dt <= 0.0 || !self.dt.is_finite() {
            return Err(SimError::InvalidConfig(format!(
                "dt ({}) must be a positive finite number",
                self.dt
            )));
        }

        if self.eval_steps == 0 {
            return Err(SimError::InvalidConfig("eval_steps must be at least 1".into()));
        }

        if self.network_update_interval == 0 {
            return Err(SimError::InvalidConfig(
                "network_update_interval must be at least 1".into(),
            ));
        }

        if self.contacts_per_pair == 0 {
            return Err(SimError::InvalidConfig(
                "contacts_per_pair must be at least 1".into(),
            ));
        }

        Ok(())
    }
}

/// Integer-valued parameters arrive as floats on the wire
fn count(name: &str, value: f64) -> Result<u64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value as u64)
    } else {
        Err(SimError::InvalidConfig(format!(
            "{} must be a non-negative count, got {}",
            name, value
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.eval_steps, 200);
        assert!((config.dt - 0.01).abs() < 1e-12);
        assert_eq!(config.friction_coefficient(), None);
    }

    #[test]
    fn test_set_parameter_known_and_unknown() {
        let mut config = SimulationConfig::new();
        config.set_parameter("EvalSteps", 50.0).unwrap();
        config.set_parameter("GravityZ", -1.0).unwrap();
        config.set_parameter("Friction", 0.5).unwrap();
        config.set_parameter("Wind", 3.0).unwrap();

        assert_eq!(config.eval_steps, 50);
        assert_eq!(config.gravity, [0.0, 0.0, -1.0]);
        assert_eq!(config.friction_coefficient(), Some(0.5));
        assert_eq!(config.extra.get("Wind"), Some(&3.0));
    }

    #[test]
    fn test_negative_count_rejected() {
        let mut config = SimulationConfig::new();
        assert!(config.set_parameter("EvalSteps", -3.0).is_err());
    }

    #[test]
    fn test_zero_steps_invalid() {
        let mut config = SimulationConfig::new();
        config.set_parameter("EvalSteps", 0.0).unwrap();
        assert!(matches!(config.validate(), Err(SimError::InvalidConfig(_))));
    }

    #[test]
    fn test_network_interval() {
        let mut config = SimulationConfig::new();
        config.set_parameter("NetworkUpdate", 3.0).unwrap();
        assert!(config.evaluates_network(0));
        assert!(!config.evaluates_network(1));
        assert!(config.evaluates_network(6));
    }

    #[test]
    fn test_toml_overrides_defaults() {
        let config = SimulationConfig::from_toml_str("dt = 0.02\neval_steps = 10\n").unwrap();
        assert!((config.dt - 0.02).abs() < 1e-12);
        assert_eq!(config.eval_steps, 10);
        assert_eq!(config.contacts_per_pair, 10);
    }
}
