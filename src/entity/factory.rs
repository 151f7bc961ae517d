//! Name-to-constructor table for `Entity` directives

use crate::actuator::{Actuator, Drive, JointMotor, MotorAxis, Thruster};
use crate::core::error::{Result, SimError};
use crate::entity::{Entity, HeightMap, Joint, Ray, RigidBody, Spring};
use crate::input::FieldSource;
use crate::network::{Neuron, Synapse};
use crate::sensor::Sensor;

type Constructor = fn(&str, &mut dyn FieldSource) -> Result<Entity>;

fn primitive_body(name: &str, src: &mut dyn FieldSource) -> Result<Entity> {
    Ok(Entity::Body(RigidBody::declare_primitive(name, src)?))
}

fn composite_body(_: &str, src: &mut dyn FieldSource) -> Result<Entity> {
    Ok(Entity::Body(RigidBody::declare_composite(src)?))
}

fn height_map(_: &str, src: &mut dyn FieldSource) -> Result<Entity> {
    Ok(Entity::HeightMap(HeightMap::declare(src)?))
}

fn ray(_: &str, src: &mut dyn FieldSource) -> Result<Entity> {
    Ok(Entity::Ray(Ray::declare(src)?))
}

fn joint(name: &str, src: &mut dyn FieldSource) -> Result<Entity> {
    Ok(Entity::Joint(Joint::declare(name, src)?))
}

fn spring(name: &str, src: &mut dyn FieldSource) -> Result<Entity> {
    Ok(Entity::Spring(Spring::declare(name, src)?))
}

fn rotary_actuator(_: &str, src: &mut dyn FieldSource) -> Result<Entity> {
    let motor = JointMotor::declare(MotorAxis::Rotary, src)?;
    Ok(Entity::Actuator(Actuator::new(Drive::Joint(motor))))
}

fn linear_actuator(_: &str, src: &mut dyn FieldSource) -> Result<Entity> {
    let motor = JointMotor::declare(MotorAxis::Linear, src)?;
    Ok(Entity::Actuator(Actuator::new(Drive::Joint(motor))))
}

fn thruster(_: &str, src: &mut dyn FieldSource) -> Result<Entity> {
    Ok(Entity::Actuator(Actuator::new(Drive::Thruster(
        Thruster::declare(src)?,
    ))))
}

fn sensor(name: &str, src: &mut dyn FieldSource) -> Result<Entity> {
    Ok(Entity::Sensor(Sensor::declare(name, src)?))
}

fn neuron(name: &str, src: &mut dyn FieldSource) -> Result<Entity> {
    Ok(Entity::Neuron(Neuron::declare(name, src)?))
}

fn synapse(_: &str, src: &mut dyn FieldSource) -> Result<Entity> {
    Ok(Entity::Synapse(Synapse::declare(src)?))
}

/// Every type name accepted after `Entity`
pub const ENTITY_TYPES: &[(&str, Constructor)] = &[
    // bodies
    ("Box", primitive_body),
    ("Cylinder", primitive_body),
    ("Sphere", primitive_body),
    ("Composite", composite_body),
    ("HeightMap", height_map),
    ("Ray", ray),
    // joints
    ("HingeJoint", joint),
    ("SliderJoint", joint),
    ("BallAndSocketJoint", joint),
    ("UniversalJoint", joint),
    ("PointMassSpringJoint", spring),
    ("LinearSpringJoint", spring),
    ("HingeSpringJoint", spring),
    // actuators
    ("RotaryActuator", rotary_actuator),
    ("LinearActuator", linear_actuator),
    ("ThrusterActuator", thruster),
    // sensors
    ("DistanceToSensor", sensor),
    ("IsSeenSensor", sensor),
    ("LightSensor", sensor),
    ("PositionSensor", sensor),
    ("ProprioceptiveSensor", sensor),
    ("QuaternionSensor", sensor),
    ("RaySensor", sensor),
    ("TouchSensor", sensor),
    // network
    ("BiasNeuron", neuron),
    ("HiddenNeuron", neuron),
    ("MotorNeuron", neuron),
    ("SensorNeuron", neuron),
    ("UserNeuron", neuron),
    ("Synapse", synapse),
];

/// Construct an entity by type name, reading its fields from `src`
pub fn declare_entity(type_name: &str, src: &mut dyn FieldSource) -> Result<Entity> {
    let constructor = ENTITY_TYPES
        .iter()
        .find(|(name, _)| *name == type_name)
        .map(|(_, constructor)| *constructor)
        .ok_or_else(|| SimError::UnknownEntityType(type_name.to_string()))?;
    constructor(type_name, src)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::EntityKind;
    use crate::input::TokenReader;

    #[test]
    fn test_type_names_unique() {
        let mut names: Vec<&str> = ENTITY_TYPES.iter().map(|(name, _)| *name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), ENTITY_TYPES.len());
    }

    #[test]
    fn test_declare_box() {
        let text = "0 0 1\n0 0 1\n1 1 1\n2.0\n1 0 0\nNone\nA\n";
        let mut src = TokenReader::new(text.as_bytes());
        let entity = declare_entity("Box", &mut src).unwrap();
        assert_eq!(entity.kind(), EntityKind::Body);
        let body = entity.as_body().unwrap();
        assert_eq!(body.group, "A");
        assert_eq!(body.space, "None");
        assert!((body.total_mass() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_unknown_type() {
        let mut src = TokenReader::new("".as_bytes());
        assert!(matches!(
            declare_entity("Wheel", &mut src),
            Err(SimError::UnknownEntityType(name)) if name == "Wheel"
        ));
    }

    #[test]
    fn test_kinds_by_type() {
        let mut src = TokenReader::new("1.0\n".as_bytes());
        assert_eq!(declare_entity("BiasNeuron", &mut src).unwrap().kind(), EntityKind::Neuron);
        let mut src = TokenReader::new("0 1 0.5\n".as_bytes());
        assert_eq!(declare_entity("Synapse", &mut src).unwrap().kind(), EntityKind::Synapse);
        let mut src = TokenReader::new("0 1 1.0 1.0 0.0\n".as_bytes());
        assert_eq!(
            declare_entity("PointMassSpringJoint", &mut src).unwrap().kind(),
            EntityKind::Joint
        );
    }
}
