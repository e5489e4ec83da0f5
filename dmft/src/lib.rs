//! Dynamical mean field theory for the Hubbard model on the square lattice
//! with a static Hartree impurity solver.

pub mod app;
pub mod config;
pub mod dmft_impl;
pub mod error;
pub mod io;
pub mod model;
pub mod self_consistency;
pub mod solver_impl;
pub mod tail;

pub use dmft_impl::{run_dmft, ConvergencePolicy, DmftLoop, DmftParams, DmftSolution};
pub use error::DmftError;
pub use model::Model;
pub use self_consistency::{LatticeIntegration, SelfConsistencyStep, StepOutput};
pub use solver_impl::{HartreeSolver, ImpuritySolver};
