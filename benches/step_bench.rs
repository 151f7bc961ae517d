use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use creature_sim::actuator::{Actuator, ControlMode, Drive, JointMotor, MotorAxis};
use creature_sim::core::config::SimulationConfig;
use creature_sim::core::types::{BodyRef, DVec3, Handle};
use creature_sim::entity::{GeomDecl, Joint, RigidBody};
use creature_sim::network::{Neuron, NeuronRole, Synapse};
use creature_sim::physics::{JointKind, Shape};
use creature_sim::sensor::{Probe, Sensor};
use creature_sim::simulation::{Environment, Simulation};

fn segment(x: f64) -> RigidBody {
    RigidBody::with_geom(
        GeomDecl {
            shape: Shape::Box {
                sides: DVec3::new(0.9, 0.3, 0.3),
            },
            position: DVec3::new(x, 0.0, 0.3),
            orientation: DVec3::Z,
            density: 1.0,
            color: [0.6, 0.6, 0.6],
        },
        "None",
        "Creature",
    )
}

/// A chain of hinged segments, each hinge driven by a motor neuron fed from
/// a touch sensor and a shared hidden layer
fn creature(segments: usize) -> Environment {
    let mut env = Environment::new();
    let bodies: Vec<Handle> = (0..segments)
        .map(|i| env.register(segment(i as f64)))
        .collect();
    let mut actuators = Vec::new();
    for pair in bodies.windows(2) {
        let hinge = env.register(Joint::new(
            BodyRef::Body(pair[0]),
            BodyRef::Body(pair[1]),
            JointKind::Hinge {
                anchor: DVec3::new(pair[0].0 as f64 + 0.5, 0.0, 0.3),
                axis: DVec3::Y,
            },
        ));
        actuators.push(env.register(Actuator::new(Drive::Joint(JointMotor::new(
            hinge,
            MotorAxis::Rotary,
            Some(10.0),
            2.0,
            ControlMode::Positional,
        )))));
    }
    let sensors: Vec<Handle> = bodies
        .iter()
        .map(|body| env.register(Sensor::new(Probe::Touch { body: *body })))
        .collect();
    let inputs: Vec<Handle> = sensors
        .iter()
        .map(|sensor| env.register(Neuron::new(NeuronRole::Sensor { sensor: *sensor }, 0.0)))
        .collect();
    let hidden: Vec<Handle> = (0..segments)
        .map(|_| env.register(Neuron::hidden(0.5, 1.0, 0.1)))
        .collect();
    let motors: Vec<Handle> = actuators
        .iter()
        .map(|actuator| env.register(Neuron::motor(*actuator, 0.5, 1.0, 0.0)))
        .collect();
    for (i, input) in inputs.iter().enumerate() {
        for (j, target) in hidden.iter().enumerate() {
            env.register(Synapse::new(*input, *target, if i == j { 1.0 } else { -0.2 }));
        }
    }
    for (i, source) in hidden.iter().enumerate() {
        env.register(Synapse::new(*source, hidden[(i + 1) % hidden.len()], 0.7));
        for motor in &motors {
            env.register(Synapse::new(*source, *motor, 0.3));
        }
    }
    env
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    for segments in [4_usize, 16, 64] {
        group.bench_function(format!("segments{}_100_ticks", segments), |b| {
            b.iter_batched(
                || {
                    let config = SimulationConfig {
                        eval_steps: 100,
                        ..SimulationConfig::default()
                    };
                    let mut sim = Simulation::with_sandbox(config, creature(segments))
                        .expect("valid config");
                    sim.bind().expect("scene binds");
                    sim
                },
                |mut sim| sim.run().expect("run completes"),
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
