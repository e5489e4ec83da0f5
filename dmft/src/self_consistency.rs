//! The DMFT self-consistency condition.
//!
//! Given the impurity Green's function, the step backs out the impurity
//! self-energy, averages the lattice Green's function with that local
//! self-energy over the Brillouin zone, and inverts the impurity Dyson
//! equation for the new hybridization:
//!
//! ```text
//! Σ[n]     = iω_n - Δ[n] - 1/G_imp[n]
//! G_loc[n] = (1/(2π)^2) ∫∫ dk [iω_n - ε(k) - Σ[n]]^{-1}
//! Δ'[n]    = iω_n - 1/G_loc[n] - Σ[n]
//! ```
//!
//! The Brillouin-zone average uses the trapezoid rule on a uniform periodic
//! k-grid. The frequencies are independent of each other and are processed
//! in parallel.

use crate::error::{check_length, checked_inv, DmftError, Result};
use crate::model::Model;
use lattice::{periodic_average_2d, Dispersion, Estimate, KGrid, MatsubaraGrid};
use nalgebra::DVector;
use num_complex::Complex64;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How the Brillouin-zone integral of the lattice Green's function is evaluated.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum LatticeIntegration {
    /// Reuse dispersion samples stored in a `KGrid` for every frequency.
    #[default]
    Cached,
    /// Run the full two-dimensional quadrature per frequency, evaluating the
    /// dispersion at every sample point.
    Direct,
}

/// Everything produced by one application of the self-consistency condition.
#[derive(Debug, Clone)]
pub struct StepOutput {
    pub self_energy: DVector<Complex64>,
    pub lattice_greens_function: DVector<Complex64>,
    pub hybridization: DVector<Complex64>,
    /// Quadrature error estimate of the lattice Green's function
    pub quadrature_error: f64,
}

pub struct SelfConsistencyStep<'a, D: Dispersion> {
    dispersion: &'a D,
    kgrid: &'a KGrid,
    integration: LatticeIntegration,
}

impl<'a, D: Dispersion> SelfConsistencyStep<'a, D> {
    /// `kgrid` must sample `dispersion`; its resolution is also used by the
    /// direct quadrature so both strategies see the same points.
    pub fn new(dispersion: &'a D, kgrid: &'a KGrid) -> Self {
        SelfConsistencyStep {
            dispersion,
            kgrid,
            integration: LatticeIntegration::Cached,
        }
    }

    pub fn with_integration(mut self, integration: LatticeIntegration) -> Self {
        self.integration = integration;
        self
    }

    pub fn integration(&self) -> LatticeIntegration {
        self.integration
    }

    /// `Σ[n] = iω_n - Δ[n] - 1/G_imp[n]`
    pub fn extract_self_energy(
        &self,
        model: &Model,
        g_imp: &DVector<Complex64>,
    ) -> Result<DVector<Complex64>> {
        check_length("impurity Green's function", model.n_freq(), g_imp.len())?;
        let hyb = model.hybridization();

        let sigma = (0..model.n_freq())
            .map(|n| {
                let g_inv = checked_inv(g_imp[n], "self-energy", n)?;
                Ok(model.iw(n) - hyb[n] - g_inv)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(DVector::from_vec(sigma))
    }

    /// Brillouin-zone average of `[iω_n - ε(k) - Σ[n]]^{-1}` for every frequency.
    pub fn lattice_greens_function(
        &self,
        grid: &MatsubaraGrid,
        self_energy: &DVector<Complex64>,
    ) -> Result<DVector<Complex64>> {
        Ok(self.lattice_greens_function_estimate(grid, self_energy)?.0)
    }

    /// Lattice Green's function together with `max_n |G(k) - G(k/2)|`, the
    /// difference to the same average over every other k-point.
    pub fn lattice_greens_function_estimate(
        &self,
        grid: &MatsubaraGrid,
        self_energy: &DVector<Complex64>,
    ) -> Result<(DVector<Complex64>, f64)> {
        check_length("self-energy", grid.len(), self_energy.len())?;

        let estimates = (0..grid.len())
            .into_par_iter()
            .map(|n| {
                let z = grid.iw(n) - self_energy[n];
                // a real z inside the band puts a pole on the integration domain
                if z.im == 0.0 && self.dispersion.contains(z.re) {
                    return Err(DmftError::SingularDenominator {
                        quantity: "lattice Green's function",
                        index: n,
                    });
                }
                Ok(self.brillouin_zone_average(z))
            })
            .collect::<Result<Vec<_>>>()?;

        let error = estimates
            .iter()
            .map(|e| (e.value - e.coarse).norm())
            .fold(0.0, f64::max);
        let g_loc = DVector::from_iterator(estimates.len(), estimates.iter().map(|e| e.value));
        Ok((g_loc, error))
    }

    fn brillouin_zone_average(&self, z: Complex64) -> Estimate<Complex64> {
        match self.integration {
            LatticeIntegration::Cached => self.kgrid.average_with_estimate(|e| (z - e).inv()),
            LatticeIntegration::Direct => periodic_average_2d(
                |kx, ky| (z - self.dispersion.energy(kx, ky)).inv(),
                self.kgrid.subdivisions(),
            ),
        }
    }

    /// `Δ'[n] = iω_n - 1/G_loc[n] - Σ[n]`
    pub fn update_hybridization(
        &self,
        grid: &MatsubaraGrid,
        self_energy: &DVector<Complex64>,
        g_loc: &DVector<Complex64>,
    ) -> Result<DVector<Complex64>> {
        check_length("self-energy", grid.len(), self_energy.len())?;
        check_length("lattice Green's function", grid.len(), g_loc.len())?;

        let hyb = (0..grid.len())
            .map(|n| {
                let g_inv = checked_inv(g_loc[n], "hybridization", n)?;
                Ok(grid.iw(n) - g_inv - self_energy[n])
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(DVector::from_vec(hyb))
    }

    pub fn run(&self, model: &Model, g_imp: &DVector<Complex64>) -> Result<StepOutput> {
        let self_energy = self.extract_self_energy(model, g_imp)?;
        let (lattice_greens_function, quadrature_error) =
            self.lattice_greens_function_estimate(model.grid(), &self_energy)?;
        let hybridization =
            self.update_hybridization(model.grid(), &self_energy, &lattice_greens_function)?;

        debug!(
            "Self-consistency step ({:?}): Σ(iω_0) = {:.6}, Δ(iω_0) = {:.6}",
            self.integration,
            self_energy.get(0).copied().unwrap_or_default(),
            hybridization.get(0).copied().unwrap_or_default()
        );

        Ok(StepOutput {
            self_energy,
            lattice_greens_function,
            hybridization,
            quadrature_error,
        })
    }
}
