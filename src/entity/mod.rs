//! Entities: every simulated object the registry owns
//!
//! [`Entity`] is a closed sum over the concrete kinds. Each variant is
//! declared from input, bound once against the engine and earlier entities,
//! then stepped in its kind's pipeline phase.

pub mod body;
pub mod factory;
pub mod joint;
pub mod ray;
pub mod spring;
pub mod terrain;

use crate::actuator::Actuator;
use crate::core::error::Result;
use crate::core::types::{EntityKind, Handle};
use crate::network::{Neuron, Synapse};
use crate::physics::JointKind;
use crate::sensor::{Sensor, SensorReport};
use crate::simulation::context::{BindContext, StepContext};

pub use body::{GeomDecl, RigidBody};
pub use factory::{declare_entity, ENTITY_TYPES};
pub use joint::Joint;
pub use ray::Ray;
pub use spring::{Spring, SpringLaw};
pub use terrain::HeightMap;

#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Body(RigidBody),
    HeightMap(HeightMap),
    Ray(Ray),
    Joint(Joint),
    Spring(Spring),
    Actuator(Actuator),
    Sensor(Sensor),
    Neuron(Neuron),
    Synapse(Synapse),
}

impl Entity {
    /// Pipeline partition this entity belongs to
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Body(_) | Entity::Ray(_) => EntityKind::Body,
            Entity::HeightMap(_) => EntityKind::Plain,
            Entity::Joint(_) | Entity::Spring(_) => EntityKind::Joint,
            Entity::Actuator(_) => EntityKind::Actuator,
            Entity::Sensor(_) => EntityKind::Sensor,
            Entity::Neuron(_) => EntityKind::Neuron,
            Entity::Synapse(_) => EntityKind::Synapse,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Entity::Body(_) => "RigidBody",
            Entity::HeightMap(_) => "HeightMap",
            Entity::Ray(_) => "Ray",
            Entity::Joint(joint) => match joint.kind {
                JointKind::Hinge { .. } => "HingeJoint",
                JointKind::Slider { .. } => "SliderJoint",
                JointKind::Ball { .. } => "BallAndSocketJoint",
                JointKind::Universal { .. } => "UniversalJoint",
            },
            Entity::Spring(spring) => match spring.law {
                SpringLaw::PointMass { .. } => "PointMassSpringJoint",
                SpringLaw::Linear { .. } => "LinearSpringJoint",
                SpringLaw::Hinge { .. } => "HingeSpringJoint",
            },
            Entity::Actuator(actuator) => actuator.type_name(),
            Entity::Sensor(sensor) => sensor.type_name(),
            Entity::Neuron(neuron) => neuron.type_name(),
            Entity::Synapse(_) => "Synapse",
        }
    }

    pub fn bind(&mut self, handle: Handle, ctx: &mut BindContext) -> Result<()> {
        match self {
            Entity::Body(body) => body.bind(handle, ctx),
            Entity::HeightMap(map) => map.bind(handle, ctx),
            Entity::Ray(ray) => ray.bind(handle, ctx),
            Entity::Joint(joint) => joint.bind(handle, ctx),
            Entity::Spring(spring) => spring.bind(handle, ctx),
            Entity::Actuator(actuator) => actuator.bind(handle, ctx),
            Entity::Sensor(sensor) => sensor.bind(handle, ctx),
            Entity::Neuron(neuron) => neuron.bind(handle, ctx),
            Entity::Synapse(synapse) => synapse.bind(handle, ctx),
        }
    }

    /// Advance one tick
    pub fn step(&mut self, handle: Handle, ctx: &mut StepContext) -> Result<()> {
        match self {
            Entity::Body(body) => body.step(handle, ctx),
            Entity::Ray(ray) => {
                ray.reset();
                Ok(())
            }
            Entity::Spring(spring) => spring.step(handle, ctx),
            Entity::Actuator(actuator) => actuator.step(handle, ctx),
            Entity::Sensor(sensor) => sensor.step(handle, ctx),
            Entity::Neuron(neuron) => neuron.step(handle, ctx).map(|_| ()),
            Entity::HeightMap(_) | Entity::Joint(_) | Entity::Synapse(_) => Ok(()),
        }
    }

    /// End-of-run self-description; only sensors have one
    pub fn report(&self, handle: Handle) -> Option<SensorReport> {
        match self {
            Entity::Sensor(sensor) => Some(sensor.report(handle)),
            _ => None,
        }
    }

    pub fn as_body(&self) -> Option<&RigidBody> {
        match self {
            Entity::Body(body) => Some(body),
            _ => None,
        }
    }

    pub fn as_body_mut(&mut self) -> Option<&mut RigidBody> {
        match self {
            Entity::Body(body) => Some(body),
            _ => None,
        }
    }

    pub fn as_ray_mut(&mut self) -> Option<&mut Ray> {
        match self {
            Entity::Ray(ray) => Some(ray),
            _ => None,
        }
    }

    pub fn as_joint_mut(&mut self) -> Option<&mut Joint> {
        match self {
            Entity::Joint(joint) => Some(joint),
            _ => None,
        }
    }

    pub fn as_neuron(&self) -> Option<&Neuron> {
        match self {
            Entity::Neuron(neuron) => Some(neuron),
            _ => None,
        }
    }

    pub fn as_neuron_mut(&mut self) -> Option<&mut Neuron> {
        match self {
            Entity::Neuron(neuron) => Some(neuron),
            _ => None,
        }
    }

    pub fn as_sensor(&self) -> Option<&Sensor> {
        match self {
            Entity::Sensor(sensor) => Some(sensor),
            _ => None,
        }
    }

    pub fn as_sensor_mut(&mut self) -> Option<&mut Sensor> {
        match self {
            Entity::Sensor(sensor) => Some(sensor),
            _ => None,
        }
    }

    pub fn as_actuator(&self) -> Option<&Actuator> {
        match self {
            Entity::Actuator(actuator) => Some(actuator),
            _ => None,
        }
    }

    pub fn as_actuator_mut(&mut self) -> Option<&mut Actuator> {
        match self {
            Entity::Actuator(actuator) => Some(actuator),
            _ => None,
        }
    }
}

impl From<RigidBody> for Entity {
    fn from(body: RigidBody) -> Self {
        Entity::Body(body)
    }
}

impl From<HeightMap> for Entity {
    fn from(map: HeightMap) -> Self {
        Entity::HeightMap(map)
    }
}

impl From<Ray> for Entity {
    fn from(ray: Ray) -> Self {
        Entity::Ray(ray)
    }
}

impl From<Joint> for Entity {
    fn from(joint: Joint) -> Self {
        Entity::Joint(joint)
    }
}

impl From<Spring> for Entity {
    fn from(spring: Spring) -> Self {
        Entity::Spring(spring)
    }
}

impl From<Actuator> for Entity {
    fn from(actuator: Actuator) -> Self {
        Entity::Actuator(actuator)
    }
}

impl From<Sensor> for Entity {
    fn from(sensor: Sensor) -> Self {
        Entity::Sensor(sensor)
    }
}

impl From<Neuron> for Entity {
    fn from(neuron: Neuron) -> Self {
        Entity::Neuron(neuron)
    }
}

impl From<Synapse> for Entity {
    fn from(synapse: Synapse) -> Self {
        Entity::Synapse(synapse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::DVec3;
    use crate::physics::HeightField;

    #[test]
    fn test_conversions_pick_matching_variant() {
        let law = SpringLaw::PointMass { resting_length: 1.0 };
        let spring = Spring::new(Handle(0), Handle(1), 1.0, 0.0, law);
        let ray = Ray::new(Handle(0), DVec3::ZERO, DVec3::X, 2.0);
        let map = HeightMap::new(
            DVec3::ZERO,
            HeightField {
                columns: 2,
                rows: 2,
                heights: vec![0.0; 4],
                width: 1.0,
                depth: 1.0,
                scale: 1.0,
                offset: 0.0,
                thickness: 0.1,
                wrap: false,
            },
        );

        let spring = Entity::from(spring);
        assert_eq!(spring.kind(), EntityKind::Joint);
        assert_eq!(spring.type_name(), "PointMassSpringJoint");
        let ray = Entity::from(ray);
        assert_eq!(ray.kind(), EntityKind::Body);
        assert!(matches!(ray, Entity::Ray(_)));
        assert_eq!(Entity::from(map).kind(), EntityKind::Plain);
    }
}
