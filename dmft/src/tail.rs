//! High-frequency tail of the hybridization function.
//!
//! For large `ω_n` the hybridization behaves as `Δ(iω) ≈ M1/(iω)` with
//! `M1 = <ε²> - <ε>²` the variance of the band, so `ω_n Im Δ(iω_n) → -M1`.

use crate::dmft_impl::DmftSolution;
use lattice::KGrid;
use tracing::warn;

/// Tolerance on the band centre `<ε>` below which it counts as zero.
const BAND_CENTRE_TOLERANCE: f64 = 1e-10;

/// First moment `M1` of the hybridization for the band sampled by `kgrid`.
pub fn hybridization_first_moment(kgrid: &KGrid) -> f64 {
    let moments = kgrid.moments();
    if moments.mean.abs() > BAND_CENTRE_TOLERANCE {
        warn!(
            "Band centre <ε> = {:.3e} does not vanish, the tail is not centred",
            moments.mean
        );
    }
    moments.first_moment()
}

/// `|ω Im Δ(iω) + M1|` at the highest frequency of the solution.
pub fn tail_deviation(solution: &DmftSolution, first_moment: f64) -> Option<f64> {
    let w = *solution.frequencies.last()?;
    let hyb = solution.hybridization.iter().last()?;
    Some((w * hyb.im + first_moment).abs())
}
