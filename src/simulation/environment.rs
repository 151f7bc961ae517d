//! The entity registry
//!
//! Entities live in one arena in registration order; a [`Handle`] is the
//! arena index. Each entity is also listed under its [`EntityKind`] so the
//! step pipeline can visit one kind at a time.

use crate::collision::{CollisionPolicy, ContactLedger};
use crate::core::error::{Result, SimError};
use crate::core::types::{EntityKind, Handle, Tick};
use crate::entity::Entity;
use crate::input::FieldSource;
use crate::physics::{GeomId, PhysicsEngine, SpaceId};
use crate::sensor::SensorReport;
use crate::simulation::context::{BindContext, GeomTag, SceneTables, StepContext};

/// Kinds visited each tick, in order; the neuron pass is repeated
const SENSE: [EntityKind; 1] = [EntityKind::Sensor];
const ACT: [EntityKind; 3] = [EntityKind::Actuator, EntityKind::Joint, EntityKind::Body];

#[derive(Debug, Default)]
pub struct Environment {
    entities: Vec<Entity>,
    by_kind: [Vec<Handle>; EntityKind::COUNT],
    tables: SceneTables,
    ledger: ContactLedger,
    policy: CollisionPolicy,
    bound: bool,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entity; its handle is its registration index
    pub fn register(&mut self, entity: impl Into<Entity>) -> Handle {
        let entity = entity.into();
        let handle = Handle::new(self.entities.len());
        let kind = entity.kind();
        tracing::debug!(%handle, kind = ?kind, type_name = entity.type_name(), "Registered entity");
        self.by_kind[kind.index()].push(handle);
        self.entities.push(entity);
        handle
    }

    pub fn resolve(&self, handle: Handle) -> Result<&Entity> {
        self.entities
            .get(handle.index())
            .ok_or(SimError::DanglingHandle(handle.0 as i64))
    }

    pub fn resolve_mut(&mut self, handle: Handle) -> Result<&mut Entity> {
        self.entities
            .get_mut(handle.index())
            .ok_or(SimError::DanglingHandle(handle.0 as i64))
    }

    /// Handles of one kind, in registration order
    pub fn handles(&self, kind: EntityKind) -> &[Handle] {
        &self.by_kind[kind.index()]
    }

    pub fn entities(&self) -> impl Iterator<Item = (Handle, &Entity)> {
        self.entities
            .iter()
            .enumerate()
            .map(|(index, entity)| (Handle::new(index), entity))
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn is_bound(&self) -> bool {
        self.bound
    }

    pub fn get_or_create_space(&mut self, engine: &mut dyn PhysicsEngine, name: &str) -> SpaceId {
        self.tables.spaces.get_or_create(engine, name)
    }

    pub fn tag_geom(&mut self, geom: GeomId, tag: GeomTag) {
        self.tables.geoms.insert(geom, tag);
    }

    pub fn geom_tag(&self, geom: GeomId) -> Option<&GeomTag> {
        self.tables.geoms.get(&geom)
    }

    pub fn tables(&self) -> &SceneTables {
        &self.tables
    }

    /// Apply an `Add` payload to an already registered body
    pub fn add_to_body(&mut self, handle: Handle, src: &mut dyn FieldSource) -> Result<()> {
        let entity = self.resolve_mut(handle)?;
        let found = entity.type_name();
        let body = entity.as_body_mut().ok_or(SimError::WrongKind {
            handle,
            expected: "rigid body",
            found,
        })?;
        body.read_addition(handle, src)
    }

    /// Bind every entity in registration order
    ///
    /// Each entity sees only the entities before it; references to later
    /// handles fail with [`SimError::ForwardReference`].
    pub fn bind_all(&mut self, engine: &mut dyn PhysicsEngine) -> Result<()> {
        let registered = self.entities.len();
        for index in 0..registered {
            let handle = Handle::new(index);
            let (earlier, rest) = self.entities.split_at_mut(index);
            let Some(entity) = rest.first_mut() else {
                break;
            };
            let mut ctx = BindContext::new(&mut *engine, &mut self.tables, earlier, registered);
            entity.bind(handle, &mut ctx).map_err(|err| {
                tracing::error!(%handle, error = %err, "Bind failed");
                err
            })?;
        }
        self.bound = true;
        tracing::info!(
            entities = registered,
            geoms = self.tables.geoms.len(),
            spaces = self.tables.spaces.len(),
            lights = self.tables.lights.len(),
            "Bound environment"
        );
        Ok(())
    }

    /// One pipeline pass: sensors, neurons twice, actuators, joints, bodies
    pub fn step(
        &mut self,
        tick: Tick,
        dt: f64,
        evaluate_network: bool,
        engine: &mut dyn PhysicsEngine,
    ) -> Result<()> {
        self.step_kinds(&SENSE, tick, dt, engine)?;
        if evaluate_network {
            self.step_kinds(&[EntityKind::Neuron, EntityKind::Neuron], tick, dt, engine)?;
        }
        self.step_kinds(&ACT, tick, dt, engine)
    }

    fn step_kinds(
        &mut self,
        kinds: &[EntityKind],
        tick: Tick,
        dt: f64,
        engine: &mut dyn PhysicsEngine,
    ) -> Result<()> {
        for kind in kinds {
            for position in 0..self.by_kind[kind.index()].len() {
                let handle = self.by_kind[kind.index()][position];
                self.visit(handle, tick, dt, engine, |entity, ctx| entity.step(handle, ctx))?;
            }
        }
        Ok(())
    }

    /// Run `f` on one entity with every other entity reachable by handle
    fn visit<F>(
        &mut self,
        handle: Handle,
        tick: Tick,
        dt: f64,
        engine: &mut dyn PhysicsEngine,
        f: F,
    ) -> Result<()>
    where
        F: FnOnce(&mut Entity, &mut StepContext) -> Result<()>,
    {
        let (before, rest) = self.entities.split_at_mut(handle.index());
        let (current, after) = rest
            .split_first_mut()
            .ok_or(SimError::DanglingHandle(handle.0 as i64))?;
        let mut ctx = StepContext::new(
            tick,
            dt,
            engine,
            &self.ledger,
            &self.tables.lights,
            before,
            after,
        );
        f(current, &mut ctx)
    }

    /// Fire every neuron without updating any
    pub fn fire_network(&mut self, tick: Tick, engine: &mut dyn PhysicsEngine) -> Result<()> {
        for position in 0..self.by_kind[EntityKind::Neuron.index()].len() {
            let handle = self.by_kind[EntityKind::Neuron.index()][position];
            self.visit(handle, tick, 0.0, engine, |entity, ctx| match entity.as_neuron_mut() {
                Some(neuron) => neuron.fire(handle, ctx),
                None => Ok(()),
            })?;
        }
        Ok(())
    }

    /// Update every neuron from what it has received
    pub fn update_network(&mut self, tick: Tick, engine: &mut dyn PhysicsEngine) -> Result<()> {
        for position in 0..self.by_kind[EntityKind::Neuron.index()].len() {
            let handle = self.by_kind[EntityKind::Neuron.index()][position];
            self.visit(handle, tick, 0.0, engine, |entity, ctx| match entity.as_neuron_mut() {
                Some(neuron) => neuron.update(ctx),
                None => Ok(()),
            })?;
        }
        Ok(())
    }

    pub fn clear_contact_ledger(&mut self) {
        self.ledger.clear();
    }

    /// Record a touching pair; `None` is static geometry
    pub fn record_contact(&mut self, a: Option<Handle>, b: Option<Handle>) -> bool {
        self.ledger.record(a, b)
    }

    pub fn ledger(&self) -> &ContactLedger {
        &self.ledger
    }

    pub fn policy(&self) -> &CollisionPolicy {
        &self.policy
    }

    pub fn policy_mut(&mut self) -> &mut CollisionPolicy {
        &mut self.policy
    }

    /// Every sensor's history, in registration order
    pub fn sensor_reports(&self) -> Vec<SensorReport> {
        self.handles(EntityKind::Sensor)
            .iter()
            .filter_map(|handle| self.entities.get(handle.index())?.report(*handle))
            .collect()
    }
}
