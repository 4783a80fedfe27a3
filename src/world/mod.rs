pub mod config;
pub mod solver;

pub use config::SolverConfig;
pub use solver::{BodyHandle, Solver};
