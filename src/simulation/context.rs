//! Views handed to entities while they bind and step
//!
//! Both contexts split the registry around the entity being visited, so an
//! entity can reach other entities by handle without aliasing itself. At
//! bind time only earlier entities are visible.

use ahash::AHashMap;

use crate::actuator::Actuator;
use crate::collision::ContactLedger;
use crate::core::error::{Result, SimError};
use crate::core::types::{BodyRef, Handle, Tick};
use crate::entity::{Entity, Joint, Ray, RigidBody};
use crate::network::Neuron;
use crate::physics::{BodyId, GeomId, PhysicsEngine, SpaceId};
use crate::sensor::Sensor;

/// Names that resolve to the top-level space
pub const TOP_SPACE_NAMES: [&str; 2] = ["None", "default"];

/// Named collision spaces, created on first use
#[derive(Debug, Clone, Default)]
pub struct SpaceTable {
    named: AHashMap<String, SpaceId>,
}

impl SpaceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_create(&mut self, engine: &mut dyn PhysicsEngine, name: &str) -> SpaceId {
        if TOP_SPACE_NAMES.contains(&name) {
            return engine.top_space();
        }
        if let Some(space) = self.named.get(name) {
            return *space;
        }
        let top = engine.top_space();
        let space = engine.create_space(top);
        tracing::debug!(name, %space, "Created collision space");
        self.named.insert(name.to_string(), space);
        space
    }

    pub fn get(&self, name: &str) -> Option<SpaceId> {
        self.named.get(name).copied()
    }

    /// Number of named spaces created so far
    pub fn len(&self) -> usize {
        self.named.len()
    }

    pub fn is_empty(&self) -> bool {
        self.named.is_empty()
    }
}

/// Who a geom belongs to, as seen by the collision boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeomOwner {
    /// Ground plane and terrain: no handle, always collides
    Static,
    Body(Handle),
    Ray(Handle),
}

impl GeomOwner {
    pub fn handle(self) -> Option<Handle> {
        match self {
            GeomOwner::Static => None,
            GeomOwner::Body(handle) | GeomOwner::Ray(handle) => Some(handle),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeomTag {
    pub owner: GeomOwner,
    /// Collision group; `None` for static geometry and rays
    pub group: Option<String>,
    pub color: [f64; 3],
}

impl GeomTag {
    pub fn fixed() -> Self {
        Self {
            owner: GeomOwner::Static,
            group: None,
            color: [0.0; 3],
        }
    }
}

/// A body that emits light for light sensors
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSource {
    pub handle: Handle,
    pub body: BodyId,
    pub intensity: f64,
}

/// Registry-owned tables that binding writes into
#[derive(Debug, Clone, Default)]
pub struct SceneTables {
    pub spaces: SpaceTable,
    pub geoms: AHashMap<GeomId, GeomTag>,
    pub lights: Vec<LightSource>,
}

/// Typed downcasts shared by both contexts
fn expect_kind<'e, T>(
    entity: &'e mut Entity,
    handle: Handle,
    expected: &'static str,
    pick: impl FnOnce(&'e mut Entity) -> Option<&'e mut T>,
) -> Result<&'e mut T> {
    let found = entity.type_name();
    pick(entity).ok_or(SimError::WrongKind {
        handle,
        expected,
        found,
    })
}

pub struct BindContext<'a> {
    pub engine: &'a mut dyn PhysicsEngine,
    pub tables: &'a mut SceneTables,
    earlier: &'a mut [Entity],
    registered: usize,
    current: Handle,
}

impl<'a> BindContext<'a> {
    pub fn new(
        engine: &'a mut dyn PhysicsEngine,
        tables: &'a mut SceneTables,
        earlier: &'a mut [Entity],
        registered: usize,
    ) -> Self {
        let current = Handle::new(earlier.len());
        Self {
            engine,
            tables,
            earlier,
            registered,
            current,
        }
    }

    /// The entity being bound
    pub fn current(&self) -> Handle {
        self.current
    }

    pub fn space(&mut self, name: &str) -> SpaceId {
        self.tables.spaces.get_or_create(&mut *self.engine, name)
    }

    pub fn tag_geom(&mut self, geom: GeomId, tag: GeomTag) {
        self.tables.geoms.insert(geom, tag);
    }

    pub fn add_light(&mut self, light: LightSource) {
        self.tables.lights.push(light);
    }

    /// Resolve a reference made by the current entity
    ///
    /// Out-of-range handles are dangling; handles at or after the current
    /// one are forward references.
    pub fn resolve(&mut self, handle: Handle) -> Result<&mut Entity> {
        if handle.index() >= self.registered {
            return Err(SimError::DanglingHandle(handle.0 as i64));
        }
        if handle.index() >= self.earlier.len() {
            return Err(SimError::ForwardReference {
                referrer: self.current,
                target: handle,
            });
        }
        Ok(&mut self.earlier[handle.index()])
    }

    pub fn body(&mut self, handle: Handle) -> Result<&mut RigidBody> {
        expect_kind(self.resolve(handle)?, handle, "rigid body", Entity::as_body_mut)
    }

    pub fn body_id(&mut self, handle: Handle) -> Result<BodyId> {
        self.body(handle)?.require_body(handle)
    }

    /// `None` for the static world
    pub fn body_ref(&mut self, body: BodyRef) -> Result<Option<BodyId>> {
        match body {
            BodyRef::World => Ok(None),
            BodyRef::Body(handle) => self.body_id(handle).map(Some),
        }
    }

    pub fn joint(&mut self, handle: Handle) -> Result<&mut Joint> {
        expect_kind(self.resolve(handle)?, handle, "joint", Entity::as_joint_mut)
    }

    pub fn ray(&mut self, handle: Handle) -> Result<&mut Ray> {
        expect_kind(self.resolve(handle)?, handle, "ray", Entity::as_ray_mut)
    }

    pub fn neuron(&mut self, handle: Handle) -> Result<&mut Neuron> {
        expect_kind(self.resolve(handle)?, handle, "neuron", Entity::as_neuron_mut)
    }

    pub fn sensor(&mut self, handle: Handle) -> Result<&mut Sensor> {
        expect_kind(self.resolve(handle)?, handle, "sensor", Entity::as_sensor_mut)
    }

    pub fn actuator(&mut self, handle: Handle) -> Result<&mut Actuator> {
        expect_kind(self.resolve(handle)?, handle, "actuator", Entity::as_actuator_mut)
    }
}

/// Per-visit view for [`Entity::step`]
pub struct StepContext<'a> {
    pub tick: Tick,
    pub dt: f64,
    pub engine: &'a mut dyn PhysicsEngine,
    pub ledger: &'a ContactLedger,
    pub lights: &'a [LightSource],
    before: &'a mut [Entity],
    after: &'a mut [Entity],
    current: Handle,
}

impl<'a> StepContext<'a> {
    pub fn new(
        tick: Tick,
        dt: f64,
        engine: &'a mut dyn PhysicsEngine,
        ledger: &'a ContactLedger,
        lights: &'a [LightSource],
        before: &'a mut [Entity],
        after: &'a mut [Entity],
    ) -> Self {
        let current = Handle::new(before.len());
        Self {
            tick,
            dt,
            engine,
            ledger,
            lights,
            before,
            after,
            current,
        }
    }

    pub fn current(&self) -> Handle {
        self.current
    }

    /// Another entity; the one being stepped is not reachable through here
    pub fn entity_mut(&mut self, handle: Handle) -> Result<&mut Entity> {
        let index = handle.index();
        let split = self.before.len();
        let entity = if index < split {
            self.before.get_mut(index)
        } else if index == split {
            return Err(SimError::invalid(
                "handle",
                format!("{} cannot reach itself through the step context", handle),
            ));
        } else {
            self.after.get_mut(index - split - 1)
        };
        entity.ok_or(SimError::DanglingHandle(handle.0 as i64))
    }

    pub fn body(&mut self, handle: Handle) -> Result<&mut RigidBody> {
        expect_kind(self.entity_mut(handle)?, handle, "rigid body", Entity::as_body_mut)
    }

    pub fn joint(&mut self, handle: Handle) -> Result<&mut Joint> {
        expect_kind(self.entity_mut(handle)?, handle, "joint", Entity::as_joint_mut)
    }

    pub fn ray(&mut self, handle: Handle) -> Result<&mut Ray> {
        expect_kind(self.entity_mut(handle)?, handle, "ray", Entity::as_ray_mut)
    }

    pub fn neuron(&mut self, handle: Handle) -> Result<&mut Neuron> {
        expect_kind(self.entity_mut(handle)?, handle, "neuron", Entity::as_neuron_mut)
    }

    pub fn sensor(&mut self, handle: Handle) -> Result<&mut Sensor> {
        expect_kind(self.entity_mut(handle)?, handle, "sensor", Entity::as_sensor_mut)
    }

    pub fn actuator(&mut self, handle: Handle) -> Result<&mut Actuator> {
        expect_kind(self.entity_mut(handle)?, handle, "actuator", Entity::as_actuator_mut)
    }
}
