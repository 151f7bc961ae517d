//! Registry, pipeline and the per-tick driver

pub mod contacts;
pub mod context;
pub mod environment;
pub mod report;
pub mod tick;

pub use contacts::{resolve_contacts, ContactStats};
pub use context::{BindContext, GeomOwner, GeomTag, LightSource, SceneTables, StepContext};
pub use environment::Environment;
pub use report::RunReport;
pub use tick::Simulation;
