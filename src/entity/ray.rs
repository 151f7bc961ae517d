//! Distance and color probes cast from a body

use crate::core::error::Result;
use crate::core::types::{rotation_from_z_axis, DVec3, Handle};
use crate::input::FieldSource;
use crate::physics::{GeomId, Shape};
use crate::simulation::context::{BindContext, GeomOwner, GeomTag};

#[derive(Debug, Clone, PartialEq)]
pub struct Ray {
    pub body: Handle,
    pub position: DVec3,
    pub direction: DVec3,
    pub length: f64,
    distance: f64,
    /// RGB plus an alpha that is 1 only while something is hit
    color: [f64; 4],
    geom: Option<GeomId>,
}

impl Ray {
    pub fn new(body: Handle, position: DVec3, direction: DVec3, length: f64) -> Self {
        Self {
            body,
            position,
            direction,
            length,
            distance: length,
            color: [0.0; 4],
            geom: None,
        }
    }

    pub fn declare(src: &mut dyn FieldSource) -> Result<Self> {
        let body = src.handle("Body ID")?;
        let position = src.vec3("Ray Position")?;
        let direction = src.vec3("Ray Orientation")?;
        let length = src.float("Length")?;
        Ok(Self::new(body, position, direction, length))
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn color_component(&self, index: usize) -> f64 {
        self.color.get(index).copied().unwrap_or(0.0)
    }

    pub fn geom_id(&self) -> Option<GeomId> {
        self.geom
    }

    /// Keep the closest hit of this tick
    pub fn record_hit(&mut self, distance: f64, color: [f64; 3]) {
        if distance < self.distance {
            self.distance = distance;
            self.color = [color[0], color[1], color[2], 1.0];
        }
    }

    pub fn bind(&mut self, handle: Handle, ctx: &mut BindContext) -> Result<()> {
        let body = ctx.body_id(self.body)?;
        let space = ctx.engine.top_space();
        let geom = ctx.engine.create_geom(
            space,
            Shape::Ray {
                length: self.length,
            },
        );
        ctx.engine
            .attach_geom(geom, body, self.position, rotation_from_z_axis(self.direction));
        ctx.tag_geom(
            geom,
            GeomTag {
                owner: GeomOwner::Ray(handle),
                group: None,
                color: [0.0; 3],
            },
        );
        self.geom = Some(geom);
        self.reset();
        Ok(())
    }

    /// Back to full length and no color, ready for the next collision pass
    pub fn reset(&mut self) {
        self.distance = self.length;
        self.color = [0.0; 4];
    }
}
