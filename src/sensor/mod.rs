//! Time-series sensors
//!
//! Every sensor samples once per tick during the sense phase and appends the
//! sample to its history. The history is never cleared during a run; it is
//! what the end-of-run report prints.

use serde::Serialize;

use crate::core::error::{Result, SimError};
use crate::core::types::Handle;
use crate::input::FieldSource;
use crate::physics::BodyId;
use crate::simulation::context::{BindContext, StepContext};

/// Which ray reading a [`Probe::Ray`] sensor reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RayChannel {
    Distance,
    /// Color component 0 (red), 1 (green) or 2 (blue)
    Color(usize),
}

/// What a sensor measures; handles are resolved to engine ids at bind
#[derive(Debug, Clone, PartialEq)]
pub enum Probe {
    /// 1 if the body was in the contact ledger, else 0
    Touch { body: Handle },
    Position {
        body: Handle,
        axis: usize,
        id: Option<BodyId>,
    },
    DistanceTo {
        source: Handle,
        target: Handle,
        ids: Option<(BodyId, BodyId)>,
    },
    /// Hinge angle or slider offset; zero for other joints
    Proprioceptive { joint: Handle },
    Ray { ray: Handle, channel: RayChannel },
    IsSeen { body: Handle },
    /// Sum of inverse-square distances to every light source
    Light { body: Handle, id: Option<BodyId> },
    /// Orientation component in w, x, y, z order
    Quaternion {
        body: Handle,
        component: usize,
        id: Option<BodyId>,
    },
}

impl Probe {
    pub fn type_name(&self) -> &'static str {
        match self {
            Probe::Touch { .. } => "TouchSensor",
            Probe::Position { .. } => "PositionSensor",
            Probe::DistanceTo { .. } => "DistanceToSensor",
            Probe::Proprioceptive { .. } => "ProprioceptiveSensor",
            Probe::Ray { .. } => "RaySensor",
            Probe::IsSeen { .. } => "IsSeenSensor",
            Probe::Light { .. } => "LightSensor",
            Probe::Quaternion { .. } => "QuaternionSensor",
        }
    }
}

/// Full history of one sensor, as printed at the end of a run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorReport {
    pub handle: Handle,
    pub kind: &'static str,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sensor {
    pub probe: Probe,
    current: f64,
    history: Vec<f64>,
}

fn bounded_index(field: &str, value: usize, limit: usize) -> Result<usize> {
    if value < limit {
        Ok(value)
    } else {
        Err(SimError::invalid(
            field,
            format!("{} is out of range 0..{}", value, limit),
        ))
    }
}

impl Sensor {
    pub fn new(probe: Probe) -> Self {
        Self {
            probe,
            current: 0.0,
            history: Vec::new(),
        }
    }

    pub fn declare(type_name: &str, src: &mut dyn FieldSource) -> Result<Self> {
        let probe = match type_name {
            "TouchSensor" => Probe::Touch {
                body: src.handle("Body ID")?,
            },
            "PositionSensor" => Probe::Position {
                body: src.handle("Body ID")?,
                axis: bounded_index("Which Dimension", src.count("Which Dimension")?, 3)?,
                id: None,
            },
            "DistanceToSensor" => Probe::DistanceTo {
                source: src.handle("Body ID")?,
                target: src.handle("Target ID")?,
                ids: None,
            },
            "ProprioceptiveSensor" => Probe::Proprioceptive {
                joint: src.handle("Joint ID")?,
            },
            "RaySensor" => {
                let ray = src.handle("Ray ID")?;
                let channel = match bounded_index("Which Sense", src.count("Which Sense")?, 4)? {
                    0 => RayChannel::Distance,
                    n => RayChannel::Color(n - 1),
                };
                Probe::Ray { ray, channel }
            }
            "IsSeenSensor" => Probe::IsSeen {
                body: src.handle("Body ID")?,
            },
            "LightSensor" => Probe::Light {
                body: src.handle("Body ID")?,
                id: None,
            },
            "QuaternionSensor" => Probe::Quaternion {
                body: src.handle("Body ID")?,
                component: bounded_index("Which Dimension", src.count("Which Dimension")?, 4)?,
                id: None,
            },
            other => return Err(SimError::UnknownEntityType(other.to_string())),
        };
        Ok(Self::new(probe))
    }

    /// Latest sample
    pub fn current(&self) -> f64 {
        self.current
    }

    pub fn history(&self) -> &[f64] {
        &self.history
    }

    pub fn type_name(&self) -> &'static str {
        self.probe.type_name()
    }

    pub fn report(&self, handle: Handle) -> SensorReport {
        SensorReport {
            handle,
            kind: self.type_name(),
            values: self.history.clone(),
        }
    }

    pub fn bind(&mut self, handle: Handle, ctx: &mut BindContext) -> Result<()> {
        match &mut self.probe {
            Probe::Touch { body } | Probe::IsSeen { body } => {
                ctx.body(*body)?;
            }
            Probe::Position { body, id, .. }
            | Probe::Light { body, id }
            | Probe::Quaternion { body, id, .. } => {
                *id = Some(ctx.body_id(*body)?);
            }
            Probe::DistanceTo {
                source,
                target,
                ids,
            } => {
                *ids = Some((ctx.body_id(*source)?, ctx.body_id(*target)?));
            }
            Probe::Proprioceptive { joint } => {
                ctx.joint(*joint)?.require_joint(*joint)?;
            }
            Probe::Ray { ray, .. } => {
                ctx.ray(*ray)?;
            }
        }
        tracing::debug!(%handle, kind = self.probe.type_name(), "Bound sensor");
        Ok(())
    }

    /// Compute this tick's value from world state
    pub fn sense(&self, handle: Handle, ctx: &mut StepContext) -> Result<f64> {
        let unbound = || SimError::Unbound(handle);
        let value = match &self.probe {
            Probe::Touch { body } => {
                if ctx.ledger.touched(*body) {
                    1.0
                } else {
                    0.0
                }
            }
            Probe::Position { axis, id, .. } => {
                let id = id.ok_or_else(unbound)?;
                ctx.engine.body_position(id)[*axis]
            }
            Probe::DistanceTo { ids, .. } => {
                let (source, target) = ids.ok_or_else(unbound)?;
                ctx.engine
                    .body_position(source)
                    .distance(ctx.engine.body_position(target))
            }
            Probe::Proprioceptive { joint } => {
                let joint = ctx.joint(*joint)?.clone();
                joint.proprioception(&*ctx.engine)
            }
            Probe::Ray { ray, channel } => {
                let ray = ctx.ray(*ray)?;
                match channel {
                    RayChannel::Distance => ray.distance(),
                    RayChannel::Color(index) => ray.color_component(*index),
                }
            }
            Probe::IsSeen { body } => {
                if ctx.body(*body)?.is_seen() {
                    1.0
                } else {
                    0.0
                }
            }
            Probe::Light { id, .. } => {
                let id = id.ok_or_else(unbound)?;
                let here = ctx.engine.body_position(id);
                ctx.lights
                    .iter()
                    .map(|light| here.distance_squared(ctx.engine.body_position(light.body)))
                    .filter(|distance_sq| *distance_sq > 0.0)
                    .map(|distance_sq| 1.0 / distance_sq)
                    .sum()
            }
            Probe::Quaternion { component, id, .. } => {
                let id = id.ok_or_else(unbound)?;
                let q = ctx.engine.body_orientation(id);
                [q.w, q.x, q.y, q.z][*component]
            }
        };
        Ok(value)
    }

    /// Sample and append to the history
    pub fn step(&mut self, handle: Handle, ctx: &mut StepContext) -> Result<()> {
        let value = self.sense(handle, ctx)?;
        self.current = value;
        self.history.push(value);
        Ok(())
    }
}
