//! Mechanical joints between two bodies or a body and the world

use crate::core::error::{Result, SimError};
use crate::core::types::{BodyRef, DVec3, Handle};
use crate::input::FieldSource;
use crate::physics::{JointId, JointKind, JointSpec, PhysicsEngine};
use crate::simulation::context::BindContext;

#[derive(Debug, Clone, PartialEq)]
pub struct Joint {
    pub first: BodyRef,
    pub second: BodyRef,
    pub kind: JointKind,
    pub low_stop: f64,
    pub high_stop: f64,
    id: Option<JointId>,
}

impl Joint {
    pub fn new(first: BodyRef, second: BodyRef, kind: JointKind) -> Self {
        Self {
            first,
            second,
            kind,
            low_stop: f64::NEG_INFINITY,
            high_stop: f64::INFINITY,
            id: None,
        }
    }

    pub fn with_stops(mut self, low: f64, high: f64) -> Self {
        self.low_stop = low;
        self.high_stop = high;
        self
    }

    /// `HingeJoint`, `SliderJoint`, `BallAndSocketJoint`, `UniversalJoint`
    pub fn declare(type_name: &str, src: &mut dyn FieldSource) -> Result<Self> {
        let first = src.body_ref("Body 1")?;
        let second = src.body_ref("Body 2")?;
        let joint = match type_name {
            "HingeJoint" => {
                let anchor = src.vec3("Hinge Anchor")?;
                let axis = src.vec3("Hinge Axis")?;
                let (low, high) = (src.float("Low Stop")?, src.float("High Stop")?);
                Self::new(first, second, JointKind::Hinge { anchor, axis }).with_stops(low, high)
            }
            "SliderJoint" => {
                let axis = src.vec3("Slider Axis")?;
                let (low, high) = (src.float("Low Stop")?, src.float("High Stop")?);
                Self::new(first, second, JointKind::Slider { axis }).with_stops(low, high)
            }
            "BallAndSocketJoint" => {
                let anchor = src.vec3("Ball and Socket Anchor")?;
                Self::new(first, second, JointKind::Ball { anchor })
            }
            "UniversalJoint" => {
                let anchor = src.vec3("Universal Anchor")?;
                let axis1 = src.vec3("Universal Axis 1")?;
                let axis2 = src.vec3("Universal Axis 2")?;
                Self::new(
                    first,
                    second,
                    JointKind::Universal {
                        anchor,
                        axis1,
                        axis2,
                    },
                )
            }
            other => return Err(SimError::UnknownEntityType(other.to_string())),
        };
        if joint.low_stop > joint.high_stop {
            return Err(SimError::invalid(
                "Low Stop",
                format!(
                    "low stop {} exceeds high stop {}",
                    joint.low_stop, joint.high_stop
                ),
            ));
        }
        Ok(joint)
    }

    pub fn joint_id(&self) -> Option<JointId> {
        self.id
    }

    pub fn require_joint(&self, handle: Handle) -> Result<JointId> {
        self.id.ok_or(SimError::Unbound(handle))
    }

    pub fn is_hinge(&self) -> bool {
        matches!(self.kind, JointKind::Hinge { .. })
    }

    pub fn is_slider(&self) -> bool {
        matches!(self.kind, JointKind::Slider { .. })
    }

    /// Hinge angle or slider offset; other joints report zero
    pub fn proprioception(&self, engine: &dyn PhysicsEngine) -> f64 {
        match (self.id, self.kind) {
            (Some(id), JointKind::Hinge { .. } | JointKind::Slider { .. }) => {
                engine.joint_reading(id).position
            }
            _ => 0.0,
        }
    }

    pub fn bind(&mut self, handle: Handle, ctx: &mut BindContext) -> Result<()> {
        let first = ctx.body_ref(self.first)?;
        let second = ctx.body_ref(self.second)?;
        let id = ctx.engine.create_joint(JointSpec {
            first,
            second,
            kind: self.kind,
            low_stop: self.low_stop,
            high_stop: self.high_stop,
        });
        tracing::debug!(%handle, %id, kind = self.kind.name(), "Bound joint");
        self.id = Some(id);
        Ok(())
    }
}

/// Unit axis or +Z when degenerate
pub(crate) fn axis_or_z(axis: DVec3) -> DVec3 {
    axis.try_normalize().unwrap_or(DVec3::Z)
}
