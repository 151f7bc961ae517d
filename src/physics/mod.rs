//! Physics engine boundary
//!
//! Entities own no dynamics state of their own. They hold opaque ids handed
//! out by a [`PhysicsEngine`] at bind time and read or push through the trait
//! during their step. The engine advances once per tick, after every entity
//! has stepped.

pub mod sandbox;

use derive_more::Display;

use crate::core::types::{DQuat, DVec3};

pub use sandbox::SandboxWorld;

/// Slip applied to both friction directions of every contact
pub const CONTACT_SLIP: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
#[display(fmt = "body:{}", _0)]
pub struct BodyId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
#[display(fmt = "geom:{}", _0)]
pub struct GeomId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
#[display(fmt = "joint:{}", _0)]
pub struct JointId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
#[display(fmt = "space:{}", _0)]
pub struct SpaceId(pub u32);

/// Collision geometry
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Box { sides: DVec3 },
    /// Aligned with the local Z axis; `capped` turns it into a capsule
    Cylinder { length: f64, radius: f64, capped: bool },
    Sphere { radius: f64 },
    /// Half-space `normal · p <= offset`
    Plane { normal: DVec3, offset: f64 },
    HeightField(HeightField),
    /// Cast along the local +Z axis
    Ray { length: f64 },
}

impl Shape {
    pub fn name(&self) -> &'static str {
        match self {
            Shape::Box { .. } => "box",
            Shape::Cylinder { .. } => "cylinder",
            Shape::Sphere { .. } => "sphere",
            Shape::Plane { .. } => "plane",
            Shape::HeightField(_) => "heightfield",
            Shape::Ray { .. } => "ray",
        }
    }

    /// Solid volume; zero for planes, terrain and rays
    pub fn volume(&self) -> f64 {
        use std::f64::consts::PI;
        match self {
            Shape::Box { sides } => sides.x * sides.y * sides.z,
            Shape::Cylinder {
                length,
                radius,
                capped,
            } => {
                let barrel = PI * radius * radius * length;
                if *capped {
                    barrel + 4.0 / 3.0 * PI * radius.powi(3)
                } else {
                    barrel
                }
            }
            Shape::Sphere { radius } => 4.0 / 3.0 * PI * radius.powi(3),
            Shape::Plane { .. } | Shape::HeightField(_) | Shape::Ray { .. } => 0.0,
        }
    }

    /// Radius of a sphere around the geom origin enclosing the shape
    ///
    /// Unbounded for planes and terrain.
    pub fn bounding_radius(&self) -> f64 {
        match self {
            Shape::Box { sides } => (*sides * 0.5).length(),
            Shape::Cylinder {
                length,
                radius,
                capped,
            } => {
                if *capped {
                    length * 0.5 + radius
                } else {
                    (length * length * 0.25 + radius * radius).sqrt()
                }
            }
            Shape::Sphere { radius } => *radius,
            Shape::Ray { length } => *length,
            Shape::Plane { .. } | Shape::HeightField(_) => f64::INFINITY,
        }
    }
}

/// Regular grid of terrain samples centered on the geom origin, Z up
#[derive(Debug, Clone, PartialEq)]
pub struct HeightField {
    /// Samples along X
    pub columns: usize,
    /// Samples along Y
    pub rows: usize,
    /// Row-major: `heights[row * columns + column]`
    pub heights: Vec<f64>,
    pub width: f64,
    pub depth: f64,
    pub scale: f64,
    pub offset: f64,
    pub thickness: f64,
    pub wrap: bool,
}

impl HeightField {
    /// Terrain height at local `(x, y)`, bilinearly interpolated
    ///
    /// Returns `None` off the grid unless the field wraps.
    pub fn height_at(&self, x: f64, y: f64) -> Option<f64> {
        if self.columns < 2 || self.rows < 2 {
            return None;
        }
        let u = (x / self.width + 0.5) * (self.columns - 1) as f64;
        let v = (y / self.depth + 0.5) * (self.rows - 1) as f64;
        let (u, v) = if self.wrap {
            (
                u.rem_euclid((self.columns - 1) as f64),
                v.rem_euclid((self.rows - 1) as f64),
            )
        } else if u < 0.0 || v < 0.0 || u > (self.columns - 1) as f64 || v > (self.rows - 1) as f64
        {
            return None;
        } else {
            (u, v)
        };

        let c0 = (u.floor() as usize).min(self.columns - 2);
        let r0 = (v.floor() as usize).min(self.rows - 2);
        let fu = u - c0 as f64;
        let fv = v - r0 as f64;
        let sample = |c: usize, r: usize| self.heights[r * self.columns + c];

        let near = sample(c0, r0) * (1.0 - fu) + sample(c0 + 1, r0) * fu;
        let far = sample(c0, r0 + 1) * (1.0 - fu) + sample(c0 + 1, r0 + 1) * fu;
        Some((near * (1.0 - fv) + far * fv) * self.scale + self.offset)
    }
}

/// Joint geometry, all vectors in world coordinates at creation time
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JointKind {
    Hinge { anchor: DVec3, axis: DVec3 },
    Slider { axis: DVec3 },
    Ball { anchor: DVec3 },
    Universal {
        anchor: DVec3,
        axis1: DVec3,
        axis2: DVec3,
    },
}

impl JointKind {
    pub fn name(&self) -> &'static str {
        match self {
            JointKind::Hinge { .. } => "hinge",
            JointKind::Slider { .. } => "slider",
            JointKind::Ball { .. } => "ball",
            JointKind::Universal { .. } => "universal",
        }
    }
}

/// Everything an engine needs to create a joint
///
/// A `None` side attaches to the static world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointSpec {
    pub first: Option<BodyId>,
    pub second: Option<BodyId>,
    pub kind: JointKind,
    pub low_stop: f64,
    pub high_stop: f64,
}

/// Read-only snapshot of a joint's internal state
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct JointReading {
    /// Hinge angle, slider offset, or first universal angle
    ///
    /// A slider offset grows as the second body moves away from the first
    /// along the axis.
    pub position: f64,
    pub rate: f64,
    /// Second universal angle
    pub position2: f64,
    pub rate2: f64,
    pub low_stop: f64,
    pub high_stop: f64,
    /// The first side of the joint is the static world
    pub first_is_world: bool,
}

/// One contact point between two geoms
///
/// `normal` points from the second geom toward the first; `depth` is the
/// penetration, or the distance along the ray for ray hits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactPoint {
    pub first: GeomId,
    pub second: GeomId,
    pub position: DVec3,
    pub normal: DVec3,
    pub depth: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceParams {
    /// `None` means unbounded friction
    pub friction: Option<f64>,
    pub slip: f64,
}

/// The operations entities and the collision boundary consume from a
/// rigid-body engine
pub trait PhysicsEngine {
    // === SPACES ===
    fn top_space(&self) -> SpaceId;
    fn create_space(&mut self, parent: SpaceId) -> SpaceId;
    fn set_gravity(&mut self, gravity: DVec3);

    // === BODIES ===
    fn create_body(&mut self, position: DVec3, orientation: DQuat) -> BodyId;
    fn set_body_pose(&mut self, body: BodyId, position: DVec3, orientation: DQuat);
    fn set_body_mass(&mut self, body: BodyId, mass: f64);
    fn body_mass(&self, body: BodyId) -> f64;
    fn body_position(&self, body: BodyId) -> DVec3;
    fn body_orientation(&self, body: BodyId) -> DQuat;
    fn body_velocity(&self, body: BodyId) -> DVec3;
    fn add_force(&mut self, body: BodyId, force: DVec3);

    // === GEOMS ===
    fn create_geom(&mut self, space: SpaceId, shape: Shape) -> GeomId;
    /// Place a static geom in world coordinates
    fn place_geom(&mut self, geom: GeomId, position: DVec3, orientation: DQuat);
    /// Attach a geom to a body at a world pose; the offset is kept from then on
    fn attach_geom(&mut self, geom: GeomId, body: BodyId, position: DVec3, orientation: DQuat);
    fn geom_body(&self, geom: GeomId) -> Option<BodyId>;

    // === JOINTS ===
    fn create_joint(&mut self, spec: JointSpec) -> JointId;
    fn set_joint_motor(&mut self, joint: JointId, velocity: f64);
    /// `None` is unbounded; zero disables the motor
    fn set_joint_max_force(&mut self, joint: JointId, max_force: Option<f64>);
    /// Hinge torque or slider force along the joint's single axis
    fn add_joint_force(&mut self, joint: JointId, force: f64);
    fn add_joint_torques(&mut self, joint: JointId, first: f64, second: f64);
    fn joint_reading(&self, joint: JointId) -> JointReading;
    fn are_connected(&self, a: BodyId, b: BodyId) -> bool;

    // === COLLISION ===
    /// Broad phase: geom pairs whose bounds overlap
    fn candidate_pairs(&self) -> Vec<(GeomId, GeomId)>;
    /// Narrow phase: at most `max_contacts` points between two geoms
    fn collide(&self, a: GeomId, b: GeomId, max_contacts: usize) -> Vec<ContactPoint>;
    /// Queue a contact constraint for the next advance
    fn add_contact(&mut self, contact: ContactPoint, surface: SurfaceParams);

    /// Step global dynamics by `dt` and drop the queued contacts
    fn advance(&mut self, dt: f64);
}
