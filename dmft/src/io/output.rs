//! Output formatting and logging utilities

use crate::dmft_impl::DmftSolution;
use color_eyre::eyre::{Result, WrapErr};
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;
use tracing_subscriber::{
    fmt::format::Writer, fmt::layer, fmt::time::FormatTime, layer::SubscriberExt,
    util::SubscriberInitExt, Registry,
};

/// Wall-clock `HH:MM:SS` (UTC) log timestamps
struct SecondPrecisionTimer;

impl FormatTime for SecondPrecisionTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        let total_seconds = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        let hours = (total_seconds / 3600) % 24;
        let minutes = (total_seconds / 60) % 60;
        let seconds = total_seconds % 60;

        write!(w, "{:02}:{:02}:{:02}", hours, minutes, seconds)
    }
}

/// Install the tracing subscriber, writing either to `output_path` or stdout
pub fn setup_output(output_path: Option<&String>) -> Result<()> {
    let timed = layer().with_timer(SecondPrecisionTimer);
    match output_path {
        Some(path) => {
            let log = File::create(path)
                .wrap_err_with(|| format!("Could not create output file: {}", path))?;
            let file_layer = timed.with_writer(log).with_ansi(false);
            Registry::default().with(file_layer).try_init()?;
            info!("Output will be written to: {}", path);
        }
        None => {
            let stdout_layer = timed.with_writer(std::io::stdout).with_ansi(true);
            Registry::default().with(stdout_layer).try_init()?;
            info!("Output will be printed to stdout");
        }
    }
    Ok(())
}

/// Write the hybridization table `n  ω_n  Re Δ  Im Δ` to a writer
pub fn write_hybridization<W: Write>(writer: &mut W, solution: &DmftSolution) -> Result<()> {
    writeln!(
        writer,
        "# {:>5} {:>16} {:>20} {:>20}",
        "n", "omega_n", "Re Delta", "Im Delta"
    )?;
    for (n, (w, hyb)) in solution
        .frequencies
        .iter()
        .zip(solution.hybridization.iter())
        .enumerate()
    {
        writeln!(
            writer,
            "  {:>5} {:>16.8} {:>20.12e} {:>20.12e}",
            n, w, hyb.re, hyb.im
        )?;
    }
    Ok(())
}

pub fn write_results_file(path: &str, solution: &DmftSolution) -> Result<()> {
    let file =
        File::create(path).wrap_err_with(|| format!("Unable to create results file: {}", path))?;
    let mut writer = BufWriter::new(file);
    write_hybridization(&mut writer, solution)?;
    writer.flush()?;
    info!("Hybridization written to: {}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::DVector;
    use num_complex::Complex64;

    #[test]
    fn test_write_hybridization() {
        let solution = DmftSolution {
            frequencies: vec![0.5, 1.5],
            hybridization: DVector::from_vec(vec![
                Complex64::new(0.0, -1.25),
                Complex64::new(0.0, -0.5),
            ]),
            self_energy: DVector::zeros(2),
            impurity_greens_function: DVector::zeros(2),
            lattice_greens_function: DVector::zeros(2),
            iterations: 1,
            residuals: vec![1.25],
            converged: false,
            k_points: 16,
            quadrature_error: 0.0,
        };

        let mut buffer = Vec::new();
        write_hybridization(&mut buffer, &solution).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with('#'));
        let fields: Vec<f64> = lines[2]
            .split_whitespace()
            .map(|f| f.parse().unwrap())
            .collect();
        assert_eq!(fields, vec![1.0, 1.5, 0.0, -0.5]);
    }

    #[test]
    fn test_unwritable_log_file_is_an_error() {
        let path = std::env::temp_dir()
            .join("dmft-missing-directory")
            .join("run.log")
            .to_string_lossy()
            .into_owned();
        let err = setup_output(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("Could not create output file"));
    }
}
