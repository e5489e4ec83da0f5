//! Numerical building blocks for lattice Green's function calculations:
//! band dispersions, Matsubara frequency grids and Brillouin-zone quadrature.

pub mod dispersion;
pub mod helper;
pub mod kgrid;
pub mod matsubara;

mod helper_test;

pub use dispersion::{square_lattice_dispersion, Dispersion, SquareLattice};
pub use helper::{periodic_average_2d, Estimate};
pub use kgrid::{BandMoments, KGrid};
pub use matsubara::{fermionic_frequency, MatsubaraGrid};
