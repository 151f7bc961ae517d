use crate::core::error::{Result, SimError};
use crate::core::types::Handle;
use crate::input::FieldSource;
use crate::network::Edge;
use crate::simulation::context::BindContext;

/// Immutable weighted edge between two neurons
///
/// Binding records the edge on the source neuron; the synapse itself is
/// never stepped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Synapse {
    pub source: Handle,
    pub target: Handle,
    pub weight: f64,
}

impl Synapse {
    pub fn new(source: Handle, target: Handle, weight: f64) -> Self {
        Self {
            source,
            target,
            weight,
        }
    }

    pub fn declare(src: &mut dyn FieldSource) -> Result<Self> {
        let source = src.handle("Source Neuron")?;
        let target = src.handle("Target Neuron")?;
        let weight = src.float("Weight")?;
        Ok(Self::new(source, target, weight))
    }

    pub fn bind(&mut self, handle: Handle, ctx: &mut BindContext) -> Result<()> {
        let target = ctx.neuron(self.target)?;
        if !target.role.is_targetable() {
            return Err(SimError::WrongKind {
                handle: self.target,
                expected: "hidden or motor neuron",
                found: target.type_name(),
            });
        }
        ctx.neuron(self.source)?.connect(Edge {
            synapse: handle,
            target: self.target,
            weight: self.weight,
        });
        Ok(())
    }
}
