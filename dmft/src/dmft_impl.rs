//! DMFT self-consistency loop
//!
//! The loop starts from a vanishing hybridization and alternates the impurity
//! solver with the lattice self-consistency condition. The hybridization is
//! the only quantity carried from one iteration to the next, apart from the
//! k-grid, which is refined whenever the Brillouin-zone quadrature misses
//! its tolerance and then kept for later iterations.

use crate::error::{DmftError, Result};
use crate::model::Model;
use crate::self_consistency::{LatticeIntegration, SelfConsistencyStep, StepOutput};
use crate::solver_impl::{HartreeSolver, ImpuritySolver};
use lattice::{KGrid, MatsubaraGrid, SquareLattice};
use nalgebra::DVector;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// When the loop stops.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ConvergencePolicy {
    /// Always run exactly this many iterations.
    FixedIterations(usize),
    /// Stop once `max_n |Δ_new - Δ_old| < tolerance`, or after `max_iterations`.
    Threshold { tolerance: f64, max_iterations: usize },
}

impl ConvergencePolicy {
    pub fn max_iterations(&self) -> usize {
        match *self {
            ConvergencePolicy::FixedIterations(n) => n,
            ConvergencePolicy::Threshold { max_iterations, .. } => max_iterations,
        }
    }

    /// Whether `residual` allows the loop to stop before `max_iterations`.
    pub fn is_converged(&self, residual: f64) -> bool {
        match *self {
            ConvergencePolicy::FixedIterations(_) => false,
            ConvergencePolicy::Threshold { tolerance, .. } => residual < tolerance,
        }
    }
}

/// Validated parameters of a DMFT run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DmftParams {
    pub hopping: f64,
    pub beta: f64,
    pub interaction: f64,
    pub n_freq: usize,
    /// Initial k-points per Brillouin-zone direction
    pub k_points: usize,
    /// Largest k-grid resolution the refinement may reach
    pub k_points_max: usize,
    /// Bound on `max_n |G_loc(k) - G_loc(k/2)|` that stops the refinement
    pub k_tolerance: f64,
    /// Weight of the new hybridization in the linear update, in (0, 1]
    pub mixing: f64,
    pub policy: ConvergencePolicy,
    pub integration: LatticeIntegration,
}

impl Default for DmftParams {
    fn default() -> Self {
        DmftParams {
            hopping: -1.0,
            beta: 10.0,
            interaction: 0.0,
            n_freq: 200,
            k_points: 128,
            k_points_max: 4096,
            k_tolerance: 1e-6,
            mixing: 1.0,
            policy: ConvergencePolicy::FixedIterations(5),
            integration: LatticeIntegration::Cached,
        }
    }
}

impl DmftParams {
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(DmftError::InvalidParameter(msg));

        if self.n_freq == 0 {
            return invalid("n_freq must be positive".to_string());
        }
        if !(self.beta > 0.0) {
            return invalid(format!("beta must be positive, got {}", self.beta));
        }
        if !(self.interaction >= 0.0) {
            return invalid(format!(
                "interaction must be non-negative, got {}",
                self.interaction
            ));
        }
        if !self.hopping.is_finite() {
            return invalid(format!("hopping must be finite, got {}", self.hopping));
        }
        if self.k_points < 4 {
            return invalid(format!("k_points must be at least 4, got {}", self.k_points));
        }
        if self.k_points_max < self.k_points {
            return invalid(format!(
                "k_points_max ({}) is below k_points ({})",
                self.k_points_max, self.k_points
            ));
        }
        if !(self.k_tolerance > 0.0) {
            return invalid(format!("k_tolerance must be positive, got {}", self.k_tolerance));
        }
        if !(self.mixing > 0.0 && self.mixing <= 1.0) {
            return invalid(format!("mixing must lie in (0, 1], got {}", self.mixing));
        }
        if self.policy.max_iterations() == 0 {
            return invalid("the number of iterations must be positive".to_string());
        }
        if let ConvergencePolicy::Threshold { tolerance, .. } = self.policy {
            if !(tolerance > 0.0) {
                return invalid(format!(
                    "convergence threshold must be positive, got {}",
                    tolerance
                ));
            }
        }
        Ok(())
    }
}

/// Result of a DMFT run.
#[derive(Debug, Clone)]
pub struct DmftSolution {
    /// Matsubara frequencies `ω_n = (2n+1)π/β`
    pub frequencies: Vec<f64>,
    pub hybridization: DVector<Complex64>,
    pub self_energy: DVector<Complex64>,
    pub impurity_greens_function: DVector<Complex64>,
    pub lattice_greens_function: DVector<Complex64>,
    pub iterations: usize,
    /// `max_n |Δ_new - Δ_old|` after every iteration
    pub residuals: Vec<f64>,
    pub converged: bool,
    /// k-points per direction of the final Brillouin-zone grid
    pub k_points: usize,
    /// Quadrature error estimate of the final lattice Green's function
    pub quadrature_error: f64,
}

pub struct DmftLoop<S: ImpuritySolver> {
    params: DmftParams,
    solver: S,
    lattice: SquareLattice,
    grid: MatsubaraGrid,
    kgrid: KGrid,
    hybridization: DVector<Complex64>,
    residuals: Vec<f64>,
}

impl<S: ImpuritySolver> DmftLoop<S> {
    pub fn new(params: DmftParams, solver: S) -> Result<Self> {
        params.validate()?;

        let lattice = SquareLattice::new(params.hopping);
        let grid = MatsubaraGrid::new(params.beta, params.n_freq);
        let kgrid = KGrid::new(&lattice, params.k_points);
        info!(
            "DMFT setup: t = {}, beta = {}, U = {}, {} Matsubara frequencies, {} k-points",
            params.hopping,
            params.beta,
            params.interaction,
            grid.len(),
            kgrid.len()
        );

        Ok(DmftLoop {
            hybridization: DVector::zeros(grid.len()),
            params,
            solver,
            lattice,
            grid,
            kgrid,
            residuals: Vec::new(),
        })
    }

    pub fn params(&self) -> &DmftParams {
        &self.params
    }

    pub fn kgrid(&self) -> &KGrid {
        &self.kgrid
    }

    pub fn hybridization(&self) -> &DVector<Complex64> {
        &self.hybridization
    }

    pub fn iteration(&self) -> usize {
        self.residuals.len()
    }

    /// Start from `hybridization` instead of zero.
    pub fn set_initial_hybridization(&mut self, hybridization: DVector<Complex64>) -> Result<()> {
        crate::error::check_length("hybridization", self.grid.len(), hybridization.len())?;
        self.hybridization = hybridization;
        Ok(())
    }

    fn model(&self) -> Result<Model> {
        Model::new(
            self.lattice,
            self.params.interaction,
            self.grid.clone(),
            self.hybridization.clone(),
        )
    }

    fn step(&self) -> SelfConsistencyStep<'_, SquareLattice> {
        SelfConsistencyStep::new(&self.lattice, &self.kgrid)
            .with_integration(self.params.integration)
    }

    /// Apply the self-consistency condition, doubling the k-grid resolution
    /// until the quadrature error estimate is within `k_tolerance`.
    fn self_consistency(
        &mut self,
        model: &Model,
        g_imp: &DVector<Complex64>,
    ) -> Result<StepOutput> {
        loop {
            let output = self.step().run(model, g_imp)?;
            let error = output.quadrature_error;
            if error <= self.params.k_tolerance {
                return Ok(output);
            }

            let subdivisions = self.kgrid.subdivisions();
            if 2 * subdivisions > self.params.k_points_max {
                warn!(
                    "Quadrature error {:.3e} exceeds {:.1e} at the {}x{} k-grid limit",
                    error, self.params.k_tolerance, subdivisions, subdivisions
                );
                return Ok(output);
            }

            self.kgrid = self.kgrid.refined(&self.lattice);
            info!(
                "Quadrature error {:.3e} on {}x{} k-points, refining to {}x{}",
                error,
                subdivisions,
                subdivisions,
                self.kgrid.subdivisions(),
                self.kgrid.subdivisions()
            );
        }
    }

    /// One DMFT cycle. Returns the residual of the hybridization update.
    pub fn iterate(&mut self) -> Result<f64> {
        let model = self.model()?;
        let g_imp = self.solver.solve(&model)?;
        let output = self.self_consistency(&model, &g_imp)?;

        let residual = (&output.hybridization - &self.hybridization)
            .iter()
            .map(|d| d.norm())
            .fold(0.0, f64::max);

        self.hybridization = self.mix(output.hybridization);
        self.residuals.push(residual);

        info!("DMFT iteration {:>3}: residual = {:.6e}", self.iteration(), residual);
        Ok(residual)
    }

    fn mix(&self, new: DVector<Complex64>) -> DVector<Complex64> {
        let alpha = self.params.mixing;
        if alpha == 1.0 {
            new
        } else {
            &self.hybridization * Complex64::new(1.0 - alpha, 0.0)
                + new * Complex64::new(alpha, 0.0)
        }
    }

    /// Iterate until the convergence policy is satisfied.
    pub fn run(&mut self) -> Result<DmftSolution> {
        let policy = self.params.policy;
        let mut converged = false;

        while self.iteration() < policy.max_iterations() {
            let residual = self.iterate()?;
            if policy.is_converged(residual) {
                converged = true;
                info!("DMFT converged after {} iterations", self.iteration());
                break;
            }
        }

        // quantities consistent with the final hybridization
        let model = self.model()?;
        let impurity_greens_function = self.solver.solve(&model)?;
        let step = self.self_consistency(&model, &impurity_greens_function)?;

        Ok(DmftSolution {
            frequencies: self.grid.frequencies().to_vec(),
            iterations: self.iteration(),
            hybridization: self.hybridization.clone(),
            self_energy: step.self_energy,
            impurity_greens_function,
            lattice_greens_function: step.lattice_greens_function,
            residuals: self.residuals.clone(),
            converged,
            k_points: self.kgrid.subdivisions(),
            quadrature_error: step.quadrature_error,
        })
    }
}

/// Run the Hartree DMFT loop for `params`.
pub fn run_dmft(params: &DmftParams) -> Result<DmftSolution> {
    let mut dmft = DmftLoop::new(params.clone(), HartreeSolver)?;
    dmft.run()
}
