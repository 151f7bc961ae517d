//! Creature Sim - headless physics creature simulator
//!
//! A scene is a flat list of entities (bodies, joints, springs, actuators,
//! sensors, neurons and synapses) read from a declarative stream, bound
//! against a physics engine, then stepped tick by tick through a fixed
//! pipeline: sense, think, act, simulate.

pub mod actuator;
pub mod collision;
pub mod core;
pub mod entity;
pub mod input;
pub mod network;
pub mod physics;
pub mod sensor;
pub mod simulation;
