//! Motors driving a hinge or slider joint

use std::str::FromStr;

use crate::core::error::{Result, SimError};
use crate::core::types::Handle;
use crate::input::FieldSource;
use crate::physics::JointId;
use crate::simulation::context::{BindContext, StepContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotorAxis {
    /// Hinge joint, `RotaryActuator`
    Rotary,
    /// Slider joint, `LinearActuator`
    Linear,
}

/// How the normalized input is read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlMode {
    /// Input scales directly into a target rate
    Velocity,
    /// Input maps onto the stop range; the rate chases the positional error
    Positional,
}

impl FromStr for ControlMode {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "velocity" => Ok(ControlMode::Velocity),
            "positional" => Ok(ControlMode::Positional),
            other => Err(SimError::invalid(
                "Control Scheme",
                format!("expected \"velocity\" or \"positional\", got {:?}", other),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct JointMotor {
    pub joint: Handle,
    pub axis: MotorAxis,
    /// `None` is unbounded
    pub max_force: Option<f64>,
    pub speed: f64,
    pub control: ControlMode,
    bound: Option<JointId>,
}

impl JointMotor {
    pub fn new(
        joint: Handle,
        axis: MotorAxis,
        max_force: Option<f64>,
        speed: f64,
        control: ControlMode,
    ) -> Self {
        Self {
            joint,
            axis,
            max_force,
            speed,
            control,
            bound: None,
        }
    }

    /// Joint, max force (negative is unbounded), speed, control scheme
    pub fn declare(axis: MotorAxis, src: &mut dyn FieldSource) -> Result<Self> {
        let joint = src.handle("Joint ID")?;
        let max_force = src.float("Max Force")?;
        let speed = src.float("Speed")?;
        let control = src.string("Control Scheme")?.parse()?;
        let max_force = (max_force >= 0.0).then_some(max_force);
        Ok(Self::new(joint, axis, max_force, speed, control))
    }

    pub fn type_name(&self) -> &'static str {
        match self.axis {
            MotorAxis::Rotary => "RotaryActuator",
            MotorAxis::Linear => "LinearActuator",
        }
    }

    pub fn bind(&mut self, handle: Handle, ctx: &mut BindContext) -> Result<()> {
        let joint = ctx.joint(self.joint)?;
        let fits = match self.axis {
            MotorAxis::Rotary => joint.is_hinge(),
            MotorAxis::Linear => joint.is_slider(),
        };
        if !fits {
            return Err(SimError::WrongKind {
                handle: self.joint,
                expected: match self.axis {
                    MotorAxis::Rotary => "hinge joint",
                    MotorAxis::Linear => "slider joint",
                },
                found: joint.kind.name(),
            });
        }
        let id = joint.require_joint(self.joint)?;
        ctx.engine.set_joint_max_force(id, self.max_force);
        tracing::debug!(%handle, joint = %self.joint, "Bound joint motor");
        self.bound = Some(id);
        Ok(())
    }

    /// Target rate for a normalized input
    pub fn target_rate(&self, input: f64, position: f64, low: f64, high: f64, world_first: bool) -> f64 {
        match self.control {
            ControlMode::Velocity => self.speed * input,
            ControlMode::Positional => {
                let target = (input + 1.0) / 2.0 * (high - low) + low;
                let sign = if self.axis == MotorAxis::Rotary && world_first {
                    -1.0
                } else {
                    1.0
                };
                self.speed * (target - position) * sign
            }
        }
    }

    pub fn actuate(&mut self, handle: Handle, input: f64, ctx: &mut StepContext) -> Result<()> {
        let id = self.bound.ok_or(SimError::Unbound(handle))?;
        let reading = ctx.engine.joint_reading(id);
        let rate = self.target_rate(
            input,
            reading.position,
            reading.low_stop,
            reading.high_stop,
            reading.first_is_world,
        );
        ctx.engine.set_joint_motor(id, rate);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::TokenReader;

    fn motor(axis: MotorAxis, control: ControlMode) -> JointMotor {
        JointMotor::new(Handle(0), axis, None, 2.0, control)
    }

    #[test]
    fn test_velocity_mode_scales_input() {
        let m = motor(MotorAxis::Linear, ControlMode::Velocity);
        assert_eq!(m.target_rate(0.5, 9.0, -1.0, 1.0, false), 1.0);
    }

    #[test]
    fn test_positional_mode_chases_target() {
        let m = motor(MotorAxis::Linear, ControlMode::Positional);
        // input 1 maps to the high stop
        assert!((m.target_rate(1.0, 0.25, -0.5, 0.5, false) - 0.5).abs() < 1e-12);
        // input -1 maps to the low stop
        assert!((m.target_rate(-1.0, 0.0, -0.5, 0.5, false) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_rotary_positional_flips_against_world() {
        let m = motor(MotorAxis::Rotary, ControlMode::Positional);
        let attached = m.target_rate(1.0, 0.0, -1.0, 1.0, false);
        let grounded = m.target_rate(1.0, 0.0, -1.0, 1.0, true);
        assert_eq!(attached, -grounded);
        let slider = motor(MotorAxis::Linear, ControlMode::Positional);
        assert_eq!(slider.target_rate(1.0, 0.0, -1.0, 1.0, true), attached);
    }

    #[test]
    fn test_declare_negative_force_is_unbounded() {
        let mut src = TokenReader::new("4\n-1\n3.0\npositional\n".as_bytes());
        let m = JointMotor::declare(MotorAxis::Rotary, &mut src).unwrap();
        assert_eq!(m.joint, Handle(4));
        assert_eq!(m.max_force, None);
        assert_eq!(m.control, ControlMode::Positional);
    }

    #[test]
    fn test_unknown_control_scheme_rejected() {
        let mut src = TokenReader::new("4\n10\n3.0\ntorque\n".as_bytes());
        assert!(matches!(
            JointMotor::declare(MotorAxis::Linear, &mut src),
            Err(SimError::InvalidField { .. })
        ));
    }
}
