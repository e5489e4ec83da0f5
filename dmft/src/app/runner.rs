use crate::dmft_impl::{DmftLoop, DmftSolution};
use crate::solver_impl::ImpuritySolver;
use color_eyre::eyre::Result;
use tracing::info;

pub fn run_calculation<S: ImpuritySolver>(dmft: &mut DmftLoop<S>) -> Result<DmftSolution> {
    let params = dmft.params();
    info!("Policy: {:?}, mixing = {}", params.policy, params.mixing);
    info!(
        "Brillouin-zone integration: {:?}, k-grid tolerance {:.1e} up to {} points per direction",
        params.integration, params.k_tolerance, params.k_points_max
    );

    info!("\nStarting DMFT cycle...\n");
    let solution = dmft.run()?;
    Ok(solution)
}
