use libm::cos;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// Nearest-neighbour tight-binding energy on the square lattice,
/// `ε(kx, ky) = -2t (cos kx + cos ky)`.
pub fn square_lattice_dispersion(kx: f64, ky: f64, t: f64) -> f64 {
    -2.0 * t * (cos(kx) + cos(ky))
}

/// A single band on a two-dimensional lattice.
pub trait Dispersion: Sync {
    /// Band energy at wavevector `(kx, ky)`, components in radians.
    fn energy(&self, kx: f64, ky: f64) -> f64;

    fn energy_at(&self, k: &Vector2<f64>) -> f64 {
        self.energy(k.x, k.y)
    }

    /// Lowest and highest band energy over the Brillouin zone.
    fn band_edges(&self) -> (f64, f64);

    fn half_bandwidth(&self) -> f64 {
        let (lower, upper) = self.band_edges();
        0.5 * (upper - lower)
    }

    /// Whether a real energy lies inside the band.
    fn contains(&self, energy: f64) -> bool {
        let (lower, upper) = self.band_edges();
        (lower..=upper).contains(&energy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SquareLattice {
    pub hopping: f64,
}

impl SquareLattice {
    pub fn new(hopping: f64) -> Self {
        SquareLattice { hopping }
    }
}

impl Default for SquareLattice {
    fn default() -> Self {
        SquareLattice { hopping: -1.0 }
    }
}

impl Dispersion for SquareLattice {
    fn energy(&self, kx: f64, ky: f64) -> f64 {
        square_lattice_dispersion(kx, ky, self.hopping)
    }

    fn band_edges(&self) -> (f64, f64) {
        let w = 4.0 * self.hopping.abs();
        (-w, w)
    }
}
