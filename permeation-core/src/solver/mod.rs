pub mod command;
pub mod engine;

pub use command::CommandEngine;
pub use engine::{flux_at, standard_exports, SolverInvoker, TransportEngine};
