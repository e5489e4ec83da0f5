use crate::dmft_impl::{DmftParams, DmftSolution};
use crate::tail::{hybridization_first_moment, tail_deviation};
use lattice::KGrid;
use tracing::info;

const SHOWN_FREQUENCIES: usize = 5;

/// Log the outcome of a run. `kgrid` is the final grid of the loop.
pub fn report_summary(params: &DmftParams, kgrid: &KGrid, solution: &DmftSolution) {
    info!("\nDMFT calculation finished.");
    info!(
        "Iterations: {} ({})",
        solution.iterations,
        if solution.converged {
            "converged"
        } else {
            "iteration limit reached"
        }
    );
    for (i, residual) in solution.residuals.iter().enumerate() {
        info!("  Iteration {:>3}: residual {:.6e}", i + 1, residual);
    }

    info!("\nLowest Matsubara frequencies:");
    for n in 0..solution.frequencies.len().min(SHOWN_FREQUENCIES) {
        info!(
            "  n = {:>3}  w = {:>10.6}  Delta = {:+.8} {:+.8}i  Sigma = {:+.8} {:+.8}i",
            n,
            solution.frequencies[n],
            solution.hybridization[n].re,
            solution.hybridization[n].im,
            solution.self_energy[n].re,
            solution.self_energy[n].im
        );
    }

    info!(
        "\nBrillouin zone: {}x{} k-points (started from {}), quadrature error {:.3e}",
        solution.k_points, solution.k_points, params.k_points, solution.quadrature_error
    );
    let first_moment = hybridization_first_moment(kgrid);
    info!("\nHybridization first moment <e^2> - <e>^2: {:.10}", first_moment);
    if let Some(deviation) = tail_deviation(solution, first_moment) {
        info!("High-frequency tail |w Im Delta + M1|: {:.6e}", deviation);
    }
}
