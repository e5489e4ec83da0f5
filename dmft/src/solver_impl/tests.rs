//! Tests for impurity solvers

use super::{HartreeSolver, ImpuritySolver};
use crate::error::DmftError;
use crate::model::Model;
use approx::assert_relative_eq;
use lattice::{MatsubaraGrid, SquareLattice};
use nalgebra::DVector;
use num_complex::Complex64;

fn model_with(interaction: f64, hybridization: DVector<Complex64>) -> Model {
    let grid = MatsubaraGrid::new(10.0, hybridization.len());
    Model::new(SquareLattice::default(), interaction, grid, hybridization).unwrap()
}

// Solver returning a self-energy of the wrong size
struct TruncatingSolver;

impl ImpuritySolver for TruncatingSolver {
    fn self_energy(&self, model: &Model) -> DVector<Complex64> {
        DVector::zeros(model.n_freq().saturating_sub(1))
    }
}

#[test]
fn test_zero_interaction_has_zero_self_energy() {
    let model = model_with(0.0, DVector::zeros(16));
    let sigma = HartreeSolver.self_energy(&model);
    assert_eq!(sigma.len(), 16);
    assert!(sigma.iter().all(|s| *s == Complex64::new(0.0, 0.0)));
}

#[test]
fn test_zero_interaction_gives_free_greens_function() {
    let hyb = DVector::from_fn(12, |n, _| Complex64::new(0.1 * n as f64, -0.05));
    let model = model_with(0.0, hyb.clone());
    let g = HartreeSolver.solve(&model).unwrap();

    for n in 0..12 {
        let expected = (model.iw(n) - hyb[n]).inv();
        assert_eq!(g[n], expected);
    }
}

#[test]
fn test_hartree_self_energy_is_half_interaction() {
    let model = model_with(3.0, DVector::zeros(5));
    let sigma = HartreeSolver::new().self_energy(&model);
    for s in sigma.iter() {
        assert_eq!(*s, Complex64::new(1.5, 0.0));
    }
}

#[test]
fn test_greens_function_with_interaction() {
    let model = model_with(2.0, DVector::zeros(4));
    let g = HartreeSolver.solve(&model).unwrap();
    for n in 0..4 {
        let expected = (model.iw(n) - 1.0).inv();
        assert_relative_eq!(g[n].re, expected.re, epsilon = 1e-14);
        assert_relative_eq!(g[n].im, expected.im, epsilon = 1e-14);
        // Im G < 0 on the positive Matsubara axis
        assert!(g[n].im < 0.0);
    }
}

#[test]
fn test_single_frequency() {
    let model = model_with(0.0, DVector::zeros(1));
    let g = HartreeSolver.solve(&model).unwrap();
    assert_eq!(g.len(), 1);
}

#[test]
fn test_self_energy_length_is_checked() {
    let model = model_with(0.0, DVector::zeros(6));
    let result = TruncatingSolver.solve(&model);
    assert!(matches!(
        result,
        Err(DmftError::LengthMismatch {
            expected: 6,
            found: 5,
            ..
        })
    ));
}

#[test]
fn test_singular_denominator_is_reported() {
    // Δ[0] = iω_0 makes the first denominator vanish exactly
    let grid = MatsubaraGrid::new(10.0, 3);
    let mut hyb: DVector<Complex64> = DVector::zeros(3);
    hyb[0] = grid.iw(0);
    let model = Model::new(SquareLattice::default(), 0.0, grid, hyb).unwrap();

    assert_eq!(
        HartreeSolver.solve(&model),
        Err(DmftError::SingularDenominator {
            quantity: "impurity Green's function",
            index: 0
        })
    );
}
