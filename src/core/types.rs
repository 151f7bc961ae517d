//! Core type definitions used throughout the codebase

use derive_more::Display;
use serde::{Deserialize, Serialize};

pub use glam::{DQuat, DVec3};

/// Stable handle of a registered entity
///
/// Handles are assigned in registration order and equal the entity's index
/// in the registry. They are never reused.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display,
)]
#[display(fmt = "#{}", _0)]
pub struct Handle(pub u32);

impl Handle {
    pub fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Simulation tick counter
pub type Tick = u64;

/// Kind tag partitioning the registry into pipeline phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum EntityKind {
    Plain,
    Actuator,
    Joint,
    Neuron,
    Synapse,
    Body,
    Sensor,
}

impl EntityKind {
    pub const COUNT: usize = 7;

    pub const ALL: [EntityKind; Self::COUNT] = [
        EntityKind::Plain,
        EntityKind::Actuator,
        EntityKind::Joint,
        EntityKind::Neuron,
        EntityKind::Synapse,
        EntityKind::Body,
        EntityKind::Sensor,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// A joint endpoint: either a declared body or the static world (`-1` in input)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyRef {
    World,
    Body(Handle),
}

/// Rotation carrying +Z onto `direction`
///
/// A zero direction yields the identity, as does +Z itself.
pub fn rotation_from_z_axis(direction: DVec3) -> DQuat {
    match direction.try_normalize() {
        Some(unit) => DQuat::from_rotation_arc(DVec3::Z, unit),
        None => DQuat::IDENTITY,
    }
}
