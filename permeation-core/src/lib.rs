pub mod analysis;
pub mod constants;
pub mod error;
pub mod grid;
pub mod logger;
pub mod model;
pub mod physics;
pub mod properties;
pub mod regime;
pub mod solver;
