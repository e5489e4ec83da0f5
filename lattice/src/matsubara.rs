use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Fermionic Matsubara frequency `ω_n = (2n+1)π/β`.
pub fn fermionic_frequency(n: usize, beta: f64) -> f64 {
    (2 * n + 1) as f64 * PI / beta
}

/// The first `n_freq` non-negative fermionic Matsubara frequencies at inverse temperature `beta`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatsubaraGrid {
    beta: f64,
    frequencies: Vec<f64>,
}

impl MatsubaraGrid {
    pub fn new(beta: f64, n_freq: usize) -> Self {
        let frequencies = (0..n_freq).map(|n| fermionic_frequency(n, beta)).collect();
        MatsubaraGrid { beta, frequencies }
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    pub fn frequency(&self, n: usize) -> f64 {
        self.frequencies[n]
    }

    /// `iω_n` as a complex number.
    pub fn iw(&self, n: usize) -> Complex64 {
        Complex64::new(0.0, self.frequencies[n])
    }

    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    pub fn iter(&self) -> impl Iterator<Item = Complex64> + '_ {
        self.frequencies.iter().map(|&w| Complex64::new(0.0, w))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_frequencies() {
        let grid = MatsubaraGrid::new(10.0, 3);
        assert_eq!(grid.len(), 3);
        assert_relative_eq!(grid.frequency(0), PI / 10.0);
        assert_relative_eq!(grid.frequency(2), 5.0 * PI / 10.0);
        assert_eq!(grid.iw(1), Complex64::new(0.0, 3.0 * PI / 10.0));
    }

    #[test]
    fn test_frequencies_are_positive_and_odd() {
        let beta = 4.0;
        let grid = MatsubaraGrid::new(beta, 50);
        for (n, w) in grid.frequencies().iter().enumerate() {
            assert!(*w > 0.0);
            assert_relative_eq!(w * beta / PI, (2 * n + 1) as f64, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_iter_matches_iw() {
        let grid = MatsubaraGrid::new(2.0, 5);
        for (n, iw) in grid.iter().enumerate() {
            assert_eq!(iw, grid.iw(n));
            assert_eq!(iw.re, 0.0);
        }
    }
}
