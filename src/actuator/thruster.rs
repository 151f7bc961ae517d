//! Body-mounted thrusters

use crate::core::error::{Result, SimError};
use crate::core::types::{DQuat, DVec3, Handle};
use crate::input::FieldSource;
use crate::physics::BodyId;
use crate::simulation::context::{BindContext, StepContext};

#[derive(Debug, Clone, PartialEq)]
struct Mount {
    body: BodyId,
    /// Body orientation when the thruster was bound
    initial: DQuat,
}

/// Pushes a body along a direction that turns with it
///
/// The direction is given in world coordinates at bind time and follows the
/// body's rotation from then on.
#[derive(Debug, Clone, PartialEq)]
pub struct Thruster {
    pub body: Handle,
    pub low_force: f64,
    pub high_force: f64,
    pub direction: DVec3,
    mount: Option<Mount>,
}

impl Thruster {
    pub fn new(body: Handle, low_force: f64, high_force: f64, direction: DVec3) -> Self {
        Self {
            body,
            low_force,
            high_force,
            direction,
            mount: None,
        }
    }

    pub fn declare(src: &mut dyn FieldSource) -> Result<Self> {
        let body = src.handle("Body ID")?;
        let low_force = src.float("Low Force")?;
        let high_force = src.float("High Force")?;
        let direction = src.vec3("Thruster Direction")?;
        Ok(Self::new(body, low_force, high_force, direction))
    }

    /// Force magnitude for an input in [-1, 1]
    pub fn magnitude(&self, input: f64) -> f64 {
        (input + 1.0) / 2.0 * (self.high_force - self.low_force) + self.low_force
    }

    pub fn bind(&mut self, handle: Handle, ctx: &mut BindContext) -> Result<()> {
        let body = ctx.body_id(self.body)?;
        let initial = ctx.engine.body_orientation(body);
        tracing::debug!(%handle, body = %self.body, "Bound thruster");
        self.mount = Some(Mount { body, initial });
        Ok(())
    }

    /// Push along the rotated direction, scaled by the tick length
    pub fn actuate(&mut self, handle: Handle, input: f64, ctx: &mut StepContext) -> Result<()> {
        let mount = self.mount.as_ref().ok_or(SimError::Unbound(handle))?;
        let current = ctx.engine.body_orientation(mount.body);
        let direction = current * mount.initial.inverse() * self.direction;
        let force = direction * self.magnitude(input) * ctx.dt;
        ctx.engine.add_force(mount.body, force);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magnitude_spans_low_to_high() {
        let thruster = Thruster::new(Handle(0), 2.0, 10.0, DVec3::Z);
        assert_eq!(thruster.magnitude(-1.0), 2.0);
        assert_eq!(thruster.magnitude(0.0), 6.0);
        assert_eq!(thruster.magnitude(1.0), 10.0);
    }
}
