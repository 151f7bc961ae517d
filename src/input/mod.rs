//! Declarative scene input
//!
//! Entities read their fields through [`FieldSource`], so they never see the
//! wire format. [`reader::TokenReader`] is the line-oriented implementation
//! and [`loader`] drives the directive stream into an environment.

pub mod loader;
pub mod reader;

use crate::core::error::{Result, SimError};
use crate::core::types::{BodyRef, DVec3, Handle};

pub use loader::{load_scene, SceneSummary};
pub use reader::TokenReader;

/// Typed field access over a declaration stream
pub trait FieldSource {
    /// A whole-line string field
    fn string(&mut self, field: &str) -> Result<String>;

    fn float(&mut self, field: &str) -> Result<f64>;

    fn int(&mut self, field: &str) -> Result<i64>;

    fn vec3(&mut self, field: &str) -> Result<DVec3> {
        Ok(DVec3::new(
            self.float(field)?,
            self.float(field)?,
            self.float(field)?,
        ))
    }

    fn floats(&mut self, count: usize, field: &str) -> Result<Vec<f64>> {
        (0..count).map(|_| self.float(field)).collect()
    }

    fn flag(&mut self, field: &str) -> Result<bool> {
        Ok(self.int(field)? != 0)
    }

    fn count(&mut self, field: &str) -> Result<usize> {
        let value = self.int(field)?;
        usize::try_from(value)
            .map_err(|_| SimError::invalid(field, format!("expected a count, got {}", value)))
    }

    /// A reference to another entity; negative values never name one
    fn handle(&mut self, field: &str) -> Result<Handle> {
        let raw = self.int(field)?;
        if raw < 0 || raw > u32::MAX as i64 {
            return Err(SimError::DanglingHandle(raw));
        }
        Ok(Handle(raw as u32))
    }

    /// A joint endpoint, where `-1` is the static world
    fn body_ref(&mut self, field: &str) -> Result<BodyRef> {
        match self.int(field)? {
            -1 => Ok(BodyRef::World),
            raw if raw < 0 || raw > u32::MAX as i64 => Err(SimError::DanglingHandle(raw)),
            raw => Ok(BodyRef::Body(Handle(raw as u32))),
        }
    }
}
