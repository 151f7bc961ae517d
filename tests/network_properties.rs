//! Property tests for the neural network and actuator protocols

use creature_sim::actuator::{Actuator, Drive, Thruster};
use creature_sim::core::error::SimError;
use creature_sim::core::types::{DVec3, EntityKind, Handle};
use creature_sim::entity::{GeomDecl, RigidBody};
use creature_sim::network::{Neuron, NeuronRole, Synapse};
use creature_sim::physics::{SandboxWorld, Shape};
use creature_sim::simulation::Environment;
use proptest::prelude::*;

#[derive(Debug, Clone)]
struct Graph {
    /// (alpha, tau, starting value) per hidden neuron
    hidden: Vec<(f64, f64, f64)>,
    /// (source, target, weight); index 0 is the bias neuron
    edges: Vec<(usize, usize, f64)>,
}

prop_compose! {
    fn arb_graph(max_hidden: usize)(count in 1..max_hidden)(
        hidden in prop::collection::vec((-1.0f64..1.0, -2.0f64..2.0, -1.0f64..1.0), count),
        edges in prop::collection::vec((0..=count, 1..=count, -2.0f64..2.0), 0..count * 3)
    ) -> Graph {
        Graph { hidden, edges }
    }
}

/// Bias neuron at handle 0, hidden neurons after it, then the synapses
fn build(graph: &Graph) -> (Environment, SandboxWorld) {
    let mut env = Environment::new();
    let mut engine = SandboxWorld::new();
    env.register(Neuron::bias(0.75));
    for (alpha, tau, start) in &graph.hidden {
        env.register(Neuron::hidden(*alpha, *tau, *start));
    }
    for (source, target, weight) in &graph.edges {
        env.register(Synapse::new(Handle::new(*source), Handle::new(*target), *weight));
    }
    env.bind_all(&mut engine).unwrap();
    (env, engine)
}

fn activations(env: &Environment) -> Vec<f64> {
    env.handles(EntityKind::Neuron)
        .iter()
        .map(|handle| env.resolve(*handle).unwrap().as_neuron().unwrap().activation())
        .collect()
}

/// User neuron at 0 replaying `values`, then a chain of `depth` hidden
/// neurons joined by unit synapses
fn chain(values: Vec<f64>, depth: usize) -> (Environment, SandboxWorld) {
    let mut env = Environment::new();
    let mut engine = SandboxWorld::new();
    env.register(Neuron::new(NeuronRole::User { values, cursor: 0 }, 0.0));
    for _ in 0..depth {
        env.register(Neuron::hidden(0.0, 1.0, 0.0));
    }
    for hop in 0..depth {
        env.register(Synapse::new(Handle::new(hop), Handle::new(hop + 1), 1.0));
    }
    env.bind_all(&mut engine).unwrap();
    (env, engine)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_double_call_matches_fire_then_update(graph in arb_graph(6), ticks in 1u64..8) {
        let (mut scheduled, mut engine_a) = build(&graph);
        let (mut manual, mut engine_b) = build(&graph);
        for tick in 0..ticks {
            scheduled.step(tick, 0.01, true, &mut engine_a).unwrap();
            manual.fire_network(tick, &mut engine_b).unwrap();
            manual.update_network(tick, &mut engine_b).unwrap();
            prop_assert_eq!(activations(&scheduled), activations(&manual));
        }
    }

    #[test]
    fn prop_signal_moves_one_hop_per_tick(inject in 0usize..5, depth in 1usize..5) {
        let mut values = vec![0.0; inject + depth + 2];
        values[inject] = 1.0;
        let (mut env, mut engine) = chain(values, depth);

        for tick in 0..(inject + depth + 1) {
            env.step(tick as u64, 0.01, true, &mut engine).unwrap();
            let all = activations(&env);
            for hop in 1..=depth {
                if tick < inject + hop {
                    prop_assert_eq!(all[hop], 0.0, "hop {} moved early at tick {}", hop, tick);
                } else if tick == inject + hop {
                    prop_assert!(all[hop] != 0.0, "hop {} silent at tick {}", hop, tick);
                }
            }
        }
    }

    #[test]
    fn prop_actuator_decays_to_zero(staged in prop::collection::vec(prop::option::of(-1.0f64..1.0), 1..12)) {
        let mut env = Environment::new();
        let mut engine = SandboxWorld::new();
        let body = env.register(RigidBody::with_geom(
            GeomDecl {
                shape: Shape::Sphere { radius: 0.5 },
                position: DVec3::new(0.0, 0.0, 5.0),
                orientation: DVec3::Z,
                density: 1.0,
                color: [0.0; 3],
            },
            "None",
            "A",
        ));
        let actuator = env.register(Actuator::new(Drive::Thruster(Thruster::new(
            body,
            -1.0,
            1.0,
            DVec3::Z,
        ))));
        env.bind_all(&mut engine).unwrap();

        for (tick, value) in staged.iter().enumerate() {
            if let Some(value) = value {
                env.resolve_mut(actuator)
                    .unwrap()
                    .as_actuator_mut()
                    .unwrap()
                    .set_next_input(*value);
            }
            env.step(tick as u64, 0.01, true, &mut engine).unwrap();
            let state = env.resolve(actuator).unwrap().as_actuator().unwrap();
            prop_assert_eq!(state.last_input(), value.unwrap_or(0.0));
            prop_assert_eq!(state.next_input(), 0.0);
        }
    }
}

#[test]
fn test_neuron_without_synapses_still_fires() {
    let mut env = Environment::new();
    let mut engine = SandboxWorld::new();
    let lonely = env.register(Neuron::hidden(0.5, 1.0, 0.2));
    env.bind_all(&mut engine).unwrap();
    env.step(4, 0.01, true, &mut engine).unwrap();
    let neuron = env.resolve(lonely).unwrap().as_neuron().unwrap();
    assert_eq!(neuron.last_fired(), Some(4));
    assert!((neuron.activation() - 0.1_f64.tanh()).abs() < 1e-12);
}

#[test]
fn test_self_loop_feeds_back() {
    let mut env = Environment::new();
    let mut engine = SandboxWorld::new();
    let neuron = env.register(Neuron::hidden(0.0, 1.0, 0.5));
    env.register(Synapse::new(neuron, neuron, 2.0));
    env.bind_all(&mut engine).unwrap();
    env.step(0, 0.01, true, &mut engine).unwrap();
    let activation = env.resolve(neuron).unwrap().as_neuron().unwrap().activation();
    assert!((activation - 1.0_f64.tanh()).abs() < 1e-12);
}

#[test]
fn test_synapse_into_input_neuron_rejected() {
    let mut env = Environment::new();
    let mut engine = SandboxWorld::new();
    let hidden = env.register(Neuron::hidden(0.0, 1.0, 0.0));
    let bias = env.register(Neuron::bias(1.0));
    env.register(Synapse::new(hidden, bias, 1.0));
    assert!(env.bind_all(&mut engine).is_err());
}

#[test]
fn test_user_neuron_without_values_rejected_at_bind() {
    let mut env = Environment::new();
    let mut engine = SandboxWorld::new();
    env.register(Neuron::new(
        NeuronRole::User {
            values: Vec::new(),
            cursor: 0,
        },
        0.0,
    ));
    assert!(matches!(
        env.bind_all(&mut engine),
        Err(SimError::InvalidField { field, .. }) if field == "Value Inputs"
    ));
}
