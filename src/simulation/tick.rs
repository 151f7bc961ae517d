//! The simulation driver
//!
//! One tick runs, in order:
//! 1. the environment pipeline (sensors, network, actuators, joints, bodies)
//! 2. the collision pass, after clearing last tick's contact ledger
//! 3. the physics integrator
//! 4. the tick counter

use crate::core::config::SimulationConfig;
use crate::core::error::Result;
use crate::core::types::{DQuat, DVec3, Tick};
use crate::physics::{PhysicsEngine, SandboxWorld, Shape, SurfaceParams, CONTACT_SLIP};
use crate::simulation::context::GeomTag;
use crate::simulation::contacts::{resolve_contacts, ContactStats};
use crate::simulation::environment::Environment;
use crate::simulation::report::RunReport;

pub struct Simulation<E: PhysicsEngine = SandboxWorld> {
    pub config: SimulationConfig,
    pub environment: Environment,
    pub engine: E,
    tick: Tick,
    stop_requested: bool,
    last_contacts: ContactStats,
}

impl Simulation<SandboxWorld> {
    /// A simulation on the built-in deterministic engine
    pub fn with_sandbox(config: SimulationConfig, environment: Environment) -> Result<Self> {
        Self::new(config, environment, SandboxWorld::new())
    }
}

impl<E: PhysicsEngine> Simulation<E> {
    pub fn new(config: SimulationConfig, environment: Environment, engine: E) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            environment,
            engine,
            tick: 0,
            stop_requested: false,
            last_contacts: ContactStats::default(),
        })
    }

    pub fn tick(&self) -> Tick {
        self.tick
    }

    /// Counters from the most recent collision pass
    pub fn last_contacts(&self) -> ContactStats {
        self.last_contacts
    }

    /// Set up the world and bind every entity
    ///
    /// Applies gravity, lays the static ground plane at z = 0, then binds
    /// entities in registration order.
    pub fn bind(&mut self) -> Result<()> {
        self.engine.set_gravity(DVec3::from_array(self.config.gravity));
        let top = self.engine.top_space();
        let ground = self.engine.create_geom(
            top,
            Shape::Plane {
                normal: DVec3::Z,
                offset: 0.0,
            },
        );
        self.engine.place_geom(ground, DVec3::ZERO, DQuat::IDENTITY);
        self.environment.tag_geom(ground, GeomTag::fixed());
        self.environment.bind_all(&mut self.engine)
    }

    /// Advance one tick
    pub fn advance(&mut self) -> Result<()> {
        let tick = self.tick;
        let dt = self.config.dt;
        self.environment.step(
            tick,
            dt,
            self.config.evaluates_network(tick),
            &mut self.engine,
        )?;

        self.environment.clear_contact_ledger();
        let surface = SurfaceParams {
            friction: self.config.friction_coefficient(),
            slip: CONTACT_SLIP,
        };
        self.last_contacts = resolve_contacts(
            &mut self.environment,
            &mut self.engine,
            self.config.contacts_per_pair,
            surface,
        )?;
        tracing::trace!(tick, stats = ?self.last_contacts, "Collision pass");

        self.engine.advance(dt);
        self.tick += 1;
        Ok(())
    }

    /// Ask [`Simulation::run`] to finish after the current tick
    pub fn stop(&mut self) {
        self.stop_requested = true;
    }

    pub fn is_stopped(&self) -> bool {
        self.stop_requested
    }

    /// Advance until `eval_steps` ticks have run or a stop is requested
    pub fn run(&mut self) -> Result<RunReport> {
        if !self.environment.is_bound() {
            self.bind()?;
        }
        tracing::info!(
            eval_steps = self.config.eval_steps,
            dt = self.config.dt,
            entities = self.environment.len(),
            "Starting run"
        );
        while self.tick < self.config.eval_steps && !self.stop_requested {
            self.advance()?;
        }
        tracing::info!(ticks = self.tick, "Run finished");
        Ok(self.report())
    }

    pub fn report(&self) -> RunReport {
        RunReport {
            ticks: self.tick,
            sensors: self.environment.sensor_reports(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{EntityKind, Handle};
    use crate::entity::{GeomDecl, RigidBody};
    use crate::sensor::{Probe, Sensor};

    fn sphere(z: f64, group: &str) -> RigidBody {
        RigidBody::with_geom(
            GeomDecl {
                shape: Shape::Sphere { radius: 0.5 },
                position: DVec3::new(0.0, 0.0, z),
                orientation: DVec3::Z,
                density: 1.0,
                color: [0.0, 0.0, 1.0],
            },
            "None",
            group,
        )
    }

    fn short_config(eval_steps: u64) -> SimulationConfig {
        SimulationConfig {
            eval_steps,
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn test_tick_advances_counter() {
        let mut sim = Simulation::with_sandbox(short_config(5), Environment::new()).unwrap();
        sim.bind().unwrap();
        assert_eq!(sim.tick(), 0);
        sim.advance().unwrap();
        assert_eq!(sim.tick(), 1);
    }

    #[test]
    fn test_run_stops_at_eval_steps() {
        let mut sim = Simulation::with_sandbox(short_config(7), Environment::new()).unwrap();
        let report = sim.run().unwrap();
        assert_eq!(report.ticks, 7);
        assert!(report.sensors.is_empty());
    }

    #[test]
    fn test_stop_before_run() {
        let mut sim = Simulation::with_sandbox(short_config(7), Environment::new()).unwrap();
        sim.stop();
        let report = sim.run().unwrap();
        assert_eq!(report.ticks, 0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SimulationConfig {
            dt: 0.0,
            ..SimulationConfig::default()
        };
        assert!(Simulation::with_sandbox(config, Environment::new()).is_err());
    }

    #[test]
    fn test_resting_body_touches_ground() {
        let mut env = Environment::new();
        let body = env.register(sphere(0.45, "A"));
        env.register(Sensor::new(Probe::Touch { body }));
        let mut sim = Simulation::with_sandbox(short_config(3), env).unwrap();
        let report = sim.run().unwrap();

        // The first sample is taken before any collision pass
        assert_eq!(report.sensors[0].values, vec![0.0, 1.0, 1.0]);
        assert!(sim.last_contacts().contacts > 0);
    }

    #[test]
    fn test_falling_body_moves_down() {
        let mut env = Environment::new();
        env.register(sphere(5.0, "A"));
        let mut sim = Simulation::with_sandbox(short_config(10), env).unwrap();
        sim.run().unwrap();
        let id = sim
            .environment
            .resolve(Handle(0))
            .unwrap()
            .as_body()
            .unwrap()
            .body_id()
            .unwrap();
        assert!(sim.engine.body_position(id).z < 5.0);
        assert_eq!(sim.environment.handles(EntityKind::Body).len(), 1);
    }
}
