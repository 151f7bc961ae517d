//! Rigid bodies built from one or more primitive geoms

use std::collections::BTreeMap;

use crate::core::error::{Result, SimError};
use crate::core::types::{rotation_from_z_axis, DQuat, DVec3, Handle, Tick};
use crate::input::FieldSource;
use crate::physics::{BodyId, GeomId, Shape};
use crate::simulation::context::{BindContext, GeomOwner, GeomTag, LightSource, StepContext};

/// One primitive geom as declared, in world coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct GeomDecl {
    pub shape: Shape,
    pub position: DVec3,
    /// Direction the geom's local Z axis points to
    pub orientation: DVec3,
    pub density: f64,
    pub color: [f64; 3],
}

impl GeomDecl {
    /// Read a geom by primitive name: position, orientation, dimensions,
    /// density, color
    pub fn declare(name: &str, src: &mut dyn FieldSource) -> Result<Self> {
        let position = src.vec3("Position")?;
        let orientation = src.vec3("Orientation")?;
        let shape = match name {
            "Box" => Shape::Box {
                sides: src.vec3("Sides")?,
            },
            "Cylinder" => Shape::Cylinder {
                length: src.float("Length")?,
                radius: src.float("Radius")?,
                capped: src.flag("Capped")?,
            },
            "Sphere" => Shape::Sphere {
                radius: src.float("Radius")?,
            },
            other => return Err(SimError::UnknownGeom(other.to_string())),
        };
        let density = src.float("Density")?;
        let color = src.vec3("Color")?.to_array();
        Ok(Self {
            shape,
            position,
            orientation,
            density,
            color,
        })
    }

    pub fn mass(&self) -> f64 {
        self.density * self.shape.volume()
    }

    pub fn rotation(&self) -> DQuat {
        rotation_from_z_axis(self.orientation)
    }
}

#[derive(Debug, Clone, PartialEq)]
struct BoundBody {
    body: BodyId,
    geoms: Vec<GeomId>,
}

/// A dynamic body with a collision group
#[derive(Debug, Clone, PartialEq)]
pub struct RigidBody {
    pub space: String,
    pub group: String,
    geoms: Vec<GeomDecl>,
    /// Summed impulses keyed by the tick they fire on
    impulses: BTreeMap<Tick, DVec3>,
    light_intensity: f64,
    is_seen: bool,
    bound: Option<BoundBody>,
}

impl RigidBody {
    pub fn new(space: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            space: space.into(),
            group: group.into(),
            geoms: Vec::new(),
            impulses: BTreeMap::new(),
            light_intensity: 0.0,
            is_seen: false,
            bound: None,
        }
    }

    pub fn with_geom(geom: GeomDecl, space: impl Into<String>, group: impl Into<String>) -> Self {
        let mut body = Self::new(space, group);
        body.geoms.push(geom);
        body
    }

    /// `Box`, `Cylinder`, `Sphere`: one geom then space and group
    pub fn declare_primitive(name: &str, src: &mut dyn FieldSource) -> Result<Self> {
        let geom = GeomDecl::declare(name, src)?;
        let space = src.string("Space")?;
        let group = src.string("Collision Group")?;
        Ok(Self::with_geom(geom, space, group))
    }

    /// `Composite`: space and group only; geoms arrive through `Add`
    pub fn declare_composite(src: &mut dyn FieldSource) -> Result<Self> {
        let space = src.string("Space")?;
        let group = src.string("Collision Group")?;
        Ok(Self::new(space, group))
    }

    /// Read one `Add` payload: `Geom`, `Impulse` or `Light`
    pub fn read_addition(&mut self, handle: Handle, src: &mut dyn FieldSource) -> Result<()> {
        let addition = src.string("Addition")?;
        match addition.as_str() {
            "Geom" => {
                let name = src.string("Geom")?;
                self.add_geom(GeomDecl::declare(&name, src)?);
            }
            "Impulse" => {
                let tick = src.int("Time")?;
                let tick = Tick::try_from(tick)
                    .map_err(|_| SimError::invalid("Time", format!("negative tick {}", tick)))?;
                let force = src.vec3("Direction")?;
                self.add_impulse(tick, force);
            }
            "Light" => {
                let intensity = src.float("Intensity")?;
                self.set_light(intensity);
            }
            _ => {
                return Err(SimError::UnknownAddition {
                    handle,
                    name: addition.clone(),
                })
            }
        }
        Ok(())
    }

    pub fn add_geom(&mut self, geom: GeomDecl) {
        self.geoms.push(geom);
    }

    /// Impulses on the same tick accumulate
    pub fn add_impulse(&mut self, tick: Tick, impulse: DVec3) {
        *self.impulses.entry(tick).or_insert(DVec3::ZERO) += impulse;
    }

    pub fn set_light(&mut self, intensity: f64) {
        self.light_intensity = intensity;
    }

    pub fn light_intensity(&self) -> f64 {
        self.light_intensity
    }

    pub fn geoms(&self) -> &[GeomDecl] {
        &self.geoms
    }

    pub fn impulse_at(&self, tick: Tick) -> Option<DVec3> {
        self.impulses.get(&tick).copied()
    }

    pub fn body_id(&self) -> Option<BodyId> {
        self.bound.as_ref().map(|bound| bound.body)
    }

    pub fn require_body(&self, handle: Handle) -> Result<BodyId> {
        self.body_id().ok_or(SimError::Unbound(handle))
    }

    pub fn geom_ids(&self) -> &[GeomId] {
        self.bound.as_ref().map_or(&[], |bound| bound.geoms.as_slice())
    }

    /// Whether a ray hit this body during the last physics advance
    pub fn is_seen(&self) -> bool {
        self.is_seen
    }

    pub fn mark_seen(&mut self) {
        self.is_seen = true;
    }

    pub fn total_mass(&self) -> f64 {
        self.geoms.iter().map(GeomDecl::mass).sum()
    }

    /// Density-weighted center of the geoms
    pub fn center_of_mass(&self) -> DVec3 {
        let total = self.total_mass();
        if total > 0.0 {
            self.geoms
                .iter()
                .map(|geom| geom.position * geom.mass())
                .sum::<DVec3>()
                / total
        } else {
            let count = self.geoms.len().max(1) as f64;
            self.geoms.iter().map(|geom| geom.position).sum::<DVec3>() / count
        }
    }

    pub fn bind(&mut self, handle: Handle, ctx: &mut BindContext) -> Result<()> {
        let (position, orientation) = match self.geoms.as_slice() {
            [] => {
                return Err(SimError::invalid(
                    "Composite",
                    format!("body {} has no geoms", handle),
                ))
            }
            [single] => (single.position, single.rotation()),
            _ => (self.center_of_mass(), DQuat::IDENTITY),
        };

        let space = ctx.space(&self.space);
        let body = ctx.engine.create_body(position, orientation);
        ctx.engine.set_body_mass(body, self.total_mass());

        let mut geom_ids = Vec::with_capacity(self.geoms.len());
        for decl in &self.geoms {
            let geom = ctx.engine.create_geom(space, decl.shape.clone());
            ctx.engine
                .attach_geom(geom, body, decl.position, decl.rotation());
            ctx.tag_geom(
                geom,
                GeomTag {
                    owner: GeomOwner::Body(handle),
                    group: Some(self.group.clone()),
                    color: decl.color,
                },
            );
            geom_ids.push(geom);
        }

        if self.light_intensity > 0.0 {
            ctx.add_light(LightSource {
                handle,
                body,
                intensity: self.light_intensity,
            });
        }

        tracing::debug!(
            %handle,
            %body,
            geoms = geom_ids.len(),
            group = %self.group,
            "Bound rigid body"
        );
        self.bound = Some(BoundBody {
            body,
            geoms: geom_ids,
        });
        Ok(())
    }

    /// Apply this tick's impulse as a force over one tick and clear the
    /// seen flag for the coming collision pass
    pub fn step(&mut self, handle: Handle, ctx: &mut StepContext) -> Result<()> {
        let body = self.require_body(handle)?;
        if let Some(impulse) = self.impulse_at(ctx.tick) {
            ctx.engine.add_force(body, impulse / ctx.dt);
        }
        self.is_seen = false;
        Ok(())
    }
}
