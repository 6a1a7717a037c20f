//! Built-in pipeline phases, in execution order.

mod flush;
mod load;
mod project;
mod validate;
mod walk;

pub use flush::FlushAggregatesPhase;
pub use load::{LoadGlobalsPhase, LoadPlatformPhase};
pub use project::{ProjectScriptsPhase, ProjectTemplatesPhase};
pub use validate::ValidateModelPhase;
pub use walk::WalkModelPhase;
