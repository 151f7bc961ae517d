//! Directive stream driver
//!
//! Reads `Parameter`, `Entity`, `Add` and `AssignCollision` directives until
//! the `Done` sentinel. Entities are registered in the order they appear;
//! nothing is bound here.

use std::io::BufRead;

use crate::core::config::SimulationConfig;
use crate::core::error::{Result, SimError};
use crate::entity::declare_entity;
use crate::input::reader::TokenReader;
use crate::input::FieldSource;
use crate::simulation::Environment;

/// What a scene stream contained
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SceneSummary {
    pub entities: usize,
    pub parameters: usize,
    pub additions: usize,
    pub collision_rules: usize,
}

/// Consume a scene stream through its `Done` sentinel
pub fn load_scene<R: BufRead>(
    reader: &mut TokenReader<R>,
    env: &mut Environment,
    config: &mut SimulationConfig,
) -> Result<SceneSummary> {
    let mut summary = SceneSummary::default();
    loop {
        let directive = reader
            .next_line()?
            .ok_or_else(|| SimError::UnexpectedEndOfInput("Done".to_string()))?;
        match directive.as_str() {
            "Done" => break,
            "Parameter" => {
                let name = reader.string("Parameter Name")?;
                let value = reader.float("Parameter Value")?;
                config.set_parameter(&name, value)?;
                tracing::debug!(name = %name, value, "Set parameter");
                summary.parameters += 1;
            }
            "Entity" => {
                let type_name = reader.string("Entity Type")?;
                let entity = declare_entity(&type_name, reader).map_err(|err| {
                    tracing::error!(line = reader.line(), type_name = %type_name, "Bad declaration");
                    err
                })?;
                env.register(entity);
                summary.entities += 1;
            }
            "Add" => {
                let handle = reader.handle("Entity ID")?;
                env.add_to_body(handle, reader)?;
                tracing::debug!(%handle, "Applied addition");
                summary.additions += 1;
            }
            "AssignCollision" => {
                let first = reader.string("Collision Group 1")?;
                let second = reader.string("Collision Group 2")?;
                env.policy_mut().allow(&first, &second);
                summary.collision_rules += 1;
            }
            other => {
                tracing::error!(line = reader.line(), directive = other, "Unknown directive");
                return Err(SimError::UnknownDirective(other.to_string()));
            }
        }
    }
    tracing::info!(
        entities = summary.entities,
        parameters = summary.parameters,
        additions = summary.additions,
        collision_rules = summary.collision_rules,
        "Scene loaded"
    );
    Ok(summary)
}
