//! End-of-run output

use std::fmt;

use serde::Serialize;

use crate::core::error::Result;
use crate::sensor::SensorReport;

/// Ticks executed and every sensor's recorded history
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub ticks: u64,
    pub sensors: Vec<SensorReport>,
}

impl RunReport {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Single line: tick count, then each sensor's handle followed by its values
impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ticks)?;
        for sensor in &self.sensors {
            write!(f, " {}", sensor.handle.0)?;
            for value in &sensor.values {
                write!(f, " {}", value)?;
            }
        }
        Ok(())
    }
}
