//! The single-band Hubbard model seen by the impurity at one iteration.

use crate::error::{check_length, Result};
use lattice::{MatsubaraGrid, SquareLattice};
use nalgebra::DVector;
use num_complex::Complex64;

/// Hubbard model on the square lattice together with the current hybridization.
///
/// A fresh `Model` is built every iteration from the hybridization of the
/// previous one; nothing else carries over.
#[derive(Debug, Clone)]
pub struct Model {
    pub lattice: SquareLattice,
    pub interaction: f64,
    grid: MatsubaraGrid,
    hybridization: DVector<Complex64>,
}

impl Model {
    pub fn new(
        lattice: SquareLattice,
        interaction: f64,
        grid: MatsubaraGrid,
        hybridization: DVector<Complex64>,
    ) -> Result<Self> {
        check_length("hybridization", grid.len(), hybridization.len())?;
        Ok(Model {
            lattice,
            interaction,
            grid,
            hybridization,
        })
    }

    /// Model with zero hybridization, the starting point of the loop.
    pub fn decoupled(lattice: SquareLattice, interaction: f64, grid: MatsubaraGrid) -> Self {
        let hybridization = DVector::zeros(grid.len());
        Model {
            lattice,
            interaction,
            grid,
            hybridization,
        }
    }

    pub fn hopping(&self) -> f64 {
        self.lattice.hopping
    }

    pub fn beta(&self) -> f64 {
        self.grid.beta()
    }

    pub fn n_freq(&self) -> usize {
        self.grid.len()
    }

    pub fn grid(&self) -> &MatsubaraGrid {
        &self.grid
    }

    pub fn iw(&self, n: usize) -> Complex64 {
        self.grid.iw(n)
    }

    pub fn hybridization(&self) -> &DVector<Complex64> {
        &self.hybridization
    }

    /// Static Hartree self-energy at half filling, `U/2` at every frequency.
    pub fn hartree_self_energy(&self) -> Complex64 {
        Complex64::new(self.interaction / 2.0, 0.0)
    }
}
