use crate::core::error::{Result, SimError};
use crate::core::types::{Handle, Tick};
use crate::input::FieldSource;
use crate::simulation::context::{BindContext, StepContext};

/// Outgoing connection recorded on the source neuron at bind time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub synapse: Handle,
    pub target: Handle,
    pub weight: f64,
}

/// Which half of the double-call protocol a visit performed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    Fire,
    Update,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NeuronRole {
    /// Constant output
    Bias { value: f64 },
    /// Mirrors a sensor's latest sample
    Sensor { sensor: Handle },
    /// Replays a fixed sequence, looping
    User { values: Vec<f64>, cursor: usize },
    Hidden { alpha: f64, tau: f64 },
    /// Hidden dynamics plus driving an actuator
    Motor { actuator: Handle, alpha: f64, tau: f64 },
}

impl NeuronRole {
    pub fn type_name(&self) -> &'static str {
        match self {
            NeuronRole::Bias { .. } => "BiasNeuron",
            NeuronRole::Sensor { .. } => "SensorNeuron",
            NeuronRole::User { .. } => "UserNeuron",
            NeuronRole::Hidden { .. } => "HiddenNeuron",
            NeuronRole::Motor { .. } => "MotorNeuron",
        }
    }

    /// Hidden and motor neurons integrate synaptic input; input neurons do not
    pub fn is_targetable(&self) -> bool {
        matches!(self, NeuronRole::Hidden { .. } | NeuronRole::Motor { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Neuron {
    pub role: NeuronRole,
    activation: f64,
    /// Weighted input received since the last update
    accumulator: f64,
    last_fired: Option<Tick>,
    outgoing: Vec<Edge>,
}

impl Neuron {
    pub fn new(role: NeuronRole, activation: f64) -> Self {
        Self {
            role,
            activation,
            accumulator: 0.0,
            last_fired: None,
            outgoing: Vec::new(),
        }
    }

    pub fn bias(value: f64) -> Self {
        Self::new(NeuronRole::Bias { value }, value)
    }

    pub fn hidden(alpha: f64, tau: f64, starting_value: f64) -> Self {
        Self::new(NeuronRole::Hidden { alpha, tau }, starting_value)
    }

    pub fn motor(actuator: Handle, alpha: f64, tau: f64, starting_value: f64) -> Self {
        Self::new(
            NeuronRole::Motor {
                actuator,
                alpha,
                tau,
            },
            starting_value,
        )
    }

    pub fn declare(type_name: &str, src: &mut dyn FieldSource) -> Result<Self> {
        match type_name {
            "BiasNeuron" => Ok(Self::bias(src.float("Bias Value")?)),
            "SensorNeuron" => Ok(Self::new(
                NeuronRole::Sensor {
                    sensor: src.handle("Sensor ID")?,
                },
                0.0,
            )),
            "UserNeuron" => {
                let count = src.count("Size of Input")?;
                if count == 0 {
                    return Err(SimError::invalid("Size of Input", "needs at least one value"));
                }
                let values = src.floats(count, "Value Inputs")?;
                Ok(Self::new(NeuronRole::User { values, cursor: 0 }, 0.0))
            }
            "HiddenNeuron" => {
                let alpha = src.float("Alpha")?;
                let tau = src.float("Tau")?;
                let start = src.float("Starting Value")?;
                Ok(Self::hidden(alpha, tau, start))
            }
            "MotorNeuron" => {
                let actuator = src.handle("Motor ID")?;
                let alpha = src.float("Alpha")?;
                let tau = src.float("Tau")?;
                let start = src.float("Starting Value")?;
                Ok(Self::motor(actuator, alpha, tau, start))
            }
            other => Err(SimError::UnknownEntityType(other.to_string())),
        }
    }

    pub fn activation(&self) -> f64 {
        self.activation
    }

    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    pub fn last_fired(&self) -> Option<Tick> {
        self.last_fired
    }

    pub fn outgoing(&self) -> &[Edge] {
        &self.outgoing
    }

    pub fn type_name(&self) -> &'static str {
        self.role.type_name()
    }

    pub fn connect(&mut self, edge: Edge) {
        self.outgoing.push(edge);
    }

    /// Add weighted input from a firing source
    pub fn receive(&mut self, signal: f64) {
        self.accumulator += signal;
    }

    /// Check that the neurons this one reads from or drives exist
    pub fn bind(&mut self, handle: Handle, ctx: &mut BindContext) -> Result<()> {
        match &self.role {
            NeuronRole::Sensor { sensor } => {
                ctx.sensor(*sensor)?;
            }
            NeuronRole::Motor { actuator, .. } => {
                ctx.actuator(*actuator)?;
            }
            NeuronRole::User { values, .. } if values.is_empty() => {
                return Err(SimError::invalid("Value Inputs", "user neuron has no values"));
            }
            NeuronRole::Bias { .. } | NeuronRole::User { .. } | NeuronRole::Hidden { .. } => {}
        }
        tracing::debug!(%handle, kind = self.type_name(), "Bound neuron");
        Ok(())
    }

    /// One scheduler visit: fire on the first visit of a tick, update on the
    /// second
    pub fn step(&mut self, handle: Handle, ctx: &mut StepContext) -> Result<Visit> {
        if self.last_fired == Some(ctx.tick) {
            self.update(ctx)?;
            Ok(Visit::Update)
        } else {
            self.fire(handle, ctx)?;
            self.last_fired = Some(ctx.tick);
            Ok(Visit::Fire)
        }
    }

    /// Push the current activation through every outgoing synapse
    pub fn fire(&mut self, handle: Handle, ctx: &mut StepContext) -> Result<()> {
        let mut feedback = 0.0;
        for edge in &self.outgoing {
            let signal = self.activation * edge.weight;
            if edge.target == handle {
                feedback += signal;
            } else {
                ctx.neuron(edge.target)?.receive(signal);
            }
        }
        self.accumulator += feedback;
        Ok(())
    }

    /// Integrate received input into a new activation
    pub fn update(&mut self, ctx: &mut StepContext) -> Result<()> {
        let accumulated = std::mem::take(&mut self.accumulator);
        match &mut self.role {
            NeuronRole::Bias { value } => self.activation = *value,
            NeuronRole::Sensor { sensor } => self.activation = ctx.sensor(*sensor)?.current(),
            NeuronRole::User { values, cursor } => {
                let index = cursor
                    .checked_rem(values.len())
                    .ok_or_else(|| SimError::invalid("Value Inputs", "user neuron has no values"))?;
                self.activation = values[index];
                *cursor = (index + 1) % values.len();
            }
            NeuronRole::Hidden { alpha, tau } => {
                self.activation = (*alpha * self.activation + *tau * accumulated).tanh();
            }
            NeuronRole::Motor {
                actuator,
                alpha,
                tau,
            } => {
                self.activation = (*alpha * self.activation + *tau * accumulated).tanh();
                ctx.actuator(*actuator)?.set_next_input(self.activation);
            }
        }
        Ok(())
    }
}
