//! Static height-field terrain

use crate::core::error::{Result, SimError};
use crate::core::types::{DQuat, DVec3, Handle};
use crate::input::FieldSource;
use crate::physics::{GeomId, HeightField, Shape};
use crate::simulation::context::{BindContext, GeomTag};

/// Terrain patch; static geometry that collides with every group
#[derive(Debug, Clone, PartialEq)]
pub struct HeightMap {
    pub position: DVec3,
    pub field: HeightField,
    geom: Option<GeomId>,
}

impl HeightMap {
    pub fn new(position: DVec3, field: HeightField) -> Self {
        Self {
            position,
            field,
            geom: None,
        }
    }

    /// Position, rows (M), columns (N), M·N heights, real width and depth,
    /// scale, offset, thickness, wrap
    pub fn declare(src: &mut dyn FieldSource) -> Result<Self> {
        let position = src.vec3("Position")?;
        let rows = src.count("M")?;
        let columns = src.count("N")?;
        if rows < 2 || columns < 2 {
            return Err(SimError::invalid(
                "Height Data",
                format!("need at least 2x2 samples, got {}x{}", rows, columns),
            ));
        }
        let samples = rows.checked_mul(columns).ok_or_else(|| {
            SimError::invalid(
                "Height Data",
                format!("{}x{} samples do not fit in memory", rows, columns),
            )
        })?;
        let heights = src.floats(samples, "Height Data")?;
        let width = src.float("Real Dimension")?;
        let depth = src.float("Real Dimension")?;
        let field = HeightField {
            columns,
            rows,
            heights,
            width,
            depth,
            scale: src.float("Scale")?,
            offset: src.float("Offset")?,
            thickness: src.float("Thickness")?,
            wrap: src.flag("Wrap")?,
        };
        Ok(Self::new(position, field))
    }

    pub fn geom_id(&self) -> Option<GeomId> {
        self.geom
    }

    pub fn bind(&mut self, handle: Handle, ctx: &mut BindContext) -> Result<()> {
        let space = ctx.engine.top_space();
        let geom = ctx
            .engine
            .create_geom(space, Shape::HeightField(self.field.clone()));
        ctx.engine.place_geom(geom, self.position, DQuat::IDENTITY);
        ctx.tag_geom(geom, GeomTag::fixed());
        tracing::debug!(%handle, %geom, "Bound height map");
        self.geom = Some(geom);
        Ok(())
    }
}
