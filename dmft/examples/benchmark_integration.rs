// Benchmark comparing the cached and direct Brillouin-zone integration

use dmft::{run_dmft, ConvergencePolicy, DmftParams, LatticeIntegration};
use std::time::Instant;

fn benchmark(integration: LatticeIntegration, params: &DmftParams) -> f64 {
    let params = DmftParams {
        integration,
        ..params.clone()
    };

    let start = Instant::now();
    let solution = run_dmft(&params).expect("DMFT run failed");
    let elapsed = start.elapsed();

    println!(
        "{:?}: {} iterations on {}x{} k-points in {:.3?}, Delta(iw_0) = {:.10}",
        integration,
        solution.iterations,
        solution.k_points,
        solution.k_points,
        elapsed,
        solution.hybridization[0]
    );
    elapsed.as_secs_f64()
}

fn main() {
    println!("=== Brillouin-zone integration benchmark ===");

    let params = DmftParams {
        n_freq: 100,
        k_points: 96,
        policy: ConvergencePolicy::FixedIterations(3),
        ..DmftParams::default()
    };
    println!(
        "n_freq = {}, k_points = {}, threads = {}",
        params.n_freq,
        params.k_points,
        rayon::current_num_threads()
    );

    let cached = benchmark(LatticeIntegration::Cached, &params);
    let direct = benchmark(LatticeIntegration::Direct, &params);

    println!("Speed-up from caching dispersion samples: {:.2}x", direct / cached);
}
