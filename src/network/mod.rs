//! Continuous-time recurrent neural network
//!
//! The registry visits every neuron twice per evaluated tick without telling
//! it which visit this is. Each neuron keeps the tick of its last fire; the
//! first visit of a tick fires (pushes the current activation through every
//! outgoing synapse), the second integrates what arrived. Any graph, cyclic
//! or not, is evaluated this way with one tick of delay per synaptic hop.

pub mod neuron;
pub mod synapse;

pub use neuron::{Edge, Neuron, NeuronRole, Visit};
pub use synapse::Synapse;
