pub mod dispatcher;
pub mod orchestrator;
pub mod stages;

pub use dispatcher::{Dispatcher, JobHandle, DEFAULT_WORKERS};
pub use orchestrator::Orchestrator;
