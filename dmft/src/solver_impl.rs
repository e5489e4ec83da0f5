//! Impurity solvers
//!
//! This module provides the `ImpuritySolver` trait and the static Hartree
//! solver used by the self-consistency loop.

use crate::error::{check_length, checked_inv, Result};
use crate::model::Model;
use nalgebra::DVector;
use num_complex::Complex64;
use tracing::debug;

/// Maps a model (hybridization plus interaction) to an impurity Green's function.
pub trait ImpuritySolver {
    /// Impurity self-energy at every Matsubara frequency of the model.
    fn self_energy(&self, model: &Model) -> DVector<Complex64>;

    /// Impurity Green's function `G_imp[n] = 1/(iω_n - Δ[n] - Σ[n])`.
    fn solve(&self, model: &Model) -> Result<DVector<Complex64>> {
        let sigma = self.self_energy(model);
        check_length("self-energy", model.n_freq(), sigma.len())?;
        check_length("hybridization", model.n_freq(), model.hybridization().len())?;

        let hyb = model.hybridization();
        let g_imp = (0..model.n_freq())
            .map(|n| checked_inv(model.iw(n) - hyb[n] - sigma[n], "impurity Green's function", n))
            .collect::<Result<Vec<_>>>()?;

        if let Some(g0) = g_imp.first() {
            debug!("Impurity Green's function at lowest frequency: {:.6}", g0);
        }
        Ok(DVector::from_vec(g_imp))
    }
}

/// Static Hartree approximation: the self-energy is `U/2` at every frequency,
/// exact for the Hubbard impurity at half filling to first order in `U`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HartreeSolver;

impl HartreeSolver {
    pub fn new() -> Self {
        HartreeSolver
    }
}

impl ImpuritySolver for HartreeSolver {
    fn self_energy(&self, model: &Model) -> DVector<Complex64> {
        DVector::from_element(model.n_freq(), model.hartree_self_energy())
    }
}

#[cfg(test)]
mod tests;
