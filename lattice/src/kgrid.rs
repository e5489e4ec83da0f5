//! Cached Brillouin-zone sampling.
//!
//! The band energy does not depend on frequency, so the dispersion is sampled
//! once on a uniform periodic grid over `[-π, π) x [-π, π)` and every
//! Brillouin-zone average afterwards is a trapezoid sum over the stored
//! energies.

use crate::dispersion::Dispersion;
use crate::helper::{combine_rows, even_subdivisions, periodic_nodes, row_sums, Estimate};
use itertools::iproduct;
use std::iter::Sum;
use std::ops::Mul;

/// Band energies on a uniform `n` x `n` k-grid, stored row by row.
#[derive(Debug, Clone)]
pub struct KGrid {
    subdivisions: usize,
    energies: Vec<f64>,
}

/// Brillouin-zone averages `<ε>` and `<ε²>`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandMoments {
    pub mean: f64,
    pub second: f64,
}

impl BandMoments {
    /// Variance of the band energy, the coefficient of the `1/iω` tail of the hybridization.
    pub fn first_moment(&self) -> f64 {
        self.second - self.mean * self.mean
    }
}

impl KGrid {
    /// Sample `dispersion` with `subdivisions` points per direction
    /// (at least 4, rounded up to an even number).
    pub fn new<D: Dispersion + ?Sized>(dispersion: &D, subdivisions: usize) -> Self {
        let n = even_subdivisions(subdivisions.max(4));
        let nodes = periodic_nodes(n);

        let energies = iproduct!(nodes.iter(), nodes.iter())
            .map(|(&kx, &ky)| dispersion.energy(kx, ky))
            .collect();

        KGrid {
            subdivisions: n,
            energies,
        }
    }

    /// The same band sampled at twice the resolution.
    pub fn refined<D: Dispersion + ?Sized>(&self, dispersion: &D) -> Self {
        KGrid::new(dispersion, 2 * self.subdivisions)
    }

    pub fn subdivisions(&self) -> usize {
        self.subdivisions
    }

    pub fn len(&self) -> usize {
        self.energies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.energies.is_empty()
    }

    pub fn energies(&self) -> &[f64] {
        &self.energies
    }

    /// Weight of every sample in a Brillouin-zone average.
    pub fn weight(&self) -> f64 {
        1.0 / self.len() as f64
    }

    /// Brillouin-zone average `(1/(2π)^2) ∫∫ f(ε(k)) dk` of a function of the band energy.
    pub fn average<T, F>(&self, f: F) -> T
    where
        F: Fn(f64) -> T,
        T: Sum<T> + Mul<f64, Output = T>,
    {
        self.energies.iter().map(|&e| f(e)).sum::<T>() * self.weight()
    }

    /// Like `average`, also returning the average over the half-resolution
    /// grid formed by every other k-point.
    pub fn average_with_estimate<T, F>(&self, f: F) -> Estimate<T>
    where
        F: Fn(f64) -> T,
        T: Copy + Sum<T> + Mul<f64, Output = T>,
    {
        let n = self.subdivisions;
        let rows = self
            .energies
            .chunks(n)
            .enumerate()
            .map(|(i, row)| {
                let samples: Vec<T> = row.iter().map(|&e| f(e)).collect();
                row_sums(i, &samples)
            })
            .collect();
        combine_rows(rows, n)
    }

    pub fn moments(&self) -> BandMoments {
        BandMoments {
            mean: self.average(|e| e),
            second: self.average(|e| e * e),
        }
    }
}
