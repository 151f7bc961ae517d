//! Buffered-input actuators
//!
//! A motor neuron stages a value with [`Actuator::set_next_input`]; the
//! actuator phase applies it once and then clears the stage, so an actuator
//! nobody drives this tick acts on zero rather than repeating a stale command.

pub mod joint_motor;
pub mod thruster;

use crate::core::error::Result;
use crate::core::types::Handle;
use crate::simulation::context::{BindContext, StepContext};

pub use joint_motor::{ControlMode, JointMotor, MotorAxis};
pub use thruster::Thruster;

/// How a normalized input turns into physical effort
#[derive(Debug, Clone, PartialEq)]
pub enum Drive {
    Joint(JointMotor),
    Thruster(Thruster),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Actuator {
    last_input: f64,
    next_input: f64,
    pub drive: Drive,
}

impl Actuator {
    pub fn new(drive: Drive) -> Self {
        Self {
            last_input: 0.0,
            next_input: 0.0,
            drive,
        }
    }

    /// Stage a value for the next actuation; nominally in [-1, 1]
    pub fn set_next_input(&mut self, value: f64) {
        self.next_input = value;
    }

    pub fn next_input(&self) -> f64 {
        self.next_input
    }

    /// The value applied by the most recent actuation
    pub fn last_input(&self) -> f64 {
        self.last_input
    }

    pub fn type_name(&self) -> &'static str {
        match &self.drive {
            Drive::Joint(motor) => motor.type_name(),
            Drive::Thruster(_) => "ThrusterActuator",
        }
    }

    pub fn bind(&mut self, handle: Handle, ctx: &mut BindContext) -> Result<()> {
        match &mut self.drive {
            Drive::Joint(motor) => motor.bind(handle, ctx),
            Drive::Thruster(thruster) => thruster.bind(handle, ctx),
        }
    }

    /// Actuate with the staged input, then decay the stage to zero
    pub fn step(&mut self, handle: Handle, ctx: &mut StepContext) -> Result<()> {
        let input = self.next_input;
        match &mut self.drive {
            Drive::Joint(motor) => motor.actuate(handle, input, ctx)?,
            Drive::Thruster(thruster) => thruster.actuate(handle, input, ctx)?,
        }
        self.last_input = input;
        self.next_input = 0.0;
        Ok(())
    }
}
