//! Configuration management for DMFT calculations
//!
//! This module provides structures for parsing YAML configuration files
//! and command-line arguments for DMFT calculations.

use crate::dmft_impl::{ConvergencePolicy, DmftParams};
use crate::error::Result;
use crate::self_consistency::LatticeIntegration;
use clap::Parser;
use serde::{Deserialize, Serialize};

/// Command-line arguments for DMFT calculations
#[derive(Parser, Debug, Default)]
#[command(name = "dmft")]
#[command(
    about = "Hartree DMFT solver for the Hubbard model on the square lattice",
    long_about = None
)]
pub struct Args {
    /// Path to the YAML configuration file (defaults are used without one)
    #[arg(short, long)]
    pub config_file: Option<String>,

    /// Log file path (optional, logs go to stdout otherwise)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Number of Matsubara frequencies (overrides config file)
    #[arg(long)]
    pub n_freq: Option<usize>,

    /// Inverse temperature (overrides config file)
    #[arg(long)]
    pub beta: Option<f64>,

    /// Nearest-neighbour hopping (overrides config file)
    #[arg(long, allow_hyphen_values = true)]
    pub hopping: Option<f64>,

    /// Hubbard interaction U (overrides config file)
    #[arg(long)]
    pub interaction: Option<f64>,

    /// Number of DMFT iterations, or the iteration limit with a threshold
    #[arg(long)]
    pub iter_max: Option<usize>,

    /// Stop once the hybridization changes by less than this
    #[arg(long)]
    pub convergence_threshold: Option<f64>,

    /// Hybridization mixing factor (0.0 to 1.0, overrides config file)
    #[arg(long)]
    pub mixing: Option<f64>,

    /// Initial k-points per Brillouin-zone direction
    #[arg(long)]
    pub k_points: Option<usize>,

    /// Largest k-grid resolution reached by refinement
    #[arg(long)]
    pub k_points_max: Option<usize>,

    /// Quadrature error estimate below which the k-grid is not refined
    #[arg(long)]
    pub k_tolerance: Option<f64>,

    /// Brillouin-zone integration strategy
    #[arg(long, value_enum)]
    pub integration: Option<LatticeIntegration>,

    /// Write the final hybridization table to this file
    #[arg(long)]
    pub results: Option<String>,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Hubbard model parameters
    #[serde(default)]
    pub model: ModelConfig,

    /// DMFT loop parameters
    #[serde(default)]
    pub solver: SolverConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,
}

/// Hubbard model parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Nearest-neighbour hopping amplitude t
    #[serde(default)]
    pub hopping: Option<f64>,

    /// Inverse temperature β
    #[serde(default)]
    pub beta: Option<f64>,

    /// On-site interaction U
    #[serde(default)]
    pub interaction: Option<f64>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        ModelConfig {
            hopping: Some(-1.0),
            beta: Some(10.0),
            interaction: Some(0.0),
        }
    }
}

impl ModelConfig {
    /// Apply default values to any missing fields
    pub fn with_defaults(mut self) -> Self {
        let defaults = ModelConfig::default();
        if self.hopping.is_none() {
            self.hopping = defaults.hopping;
        }
        if self.beta.is_none() {
            self.beta = defaults.beta;
        }
        if self.interaction.is_none() {
            self.interaction = defaults.interaction;
        }
        self
    }
}

/// DMFT loop parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Number of Matsubara frequencies
    #[serde(default)]
    pub n_freq: Option<usize>,

    /// Number of iterations (limit when a threshold is set)
    #[serde(default)]
    pub iter_max: Option<usize>,

    /// Residual below which the loop stops early
    /// Leave unset to always run `iter_max` iterations
    #[serde(default)]
    pub convergence_threshold: Option<f64>,

    /// Weight of the new hybridization in each update
    #[serde(default)]
    pub mixing: Option<f64>,

    /// Initial k-points per Brillouin-zone direction
    #[serde(default)]
    pub k_points: Option<usize>,

    /// The k-grid is doubled up to this resolution while the quadrature
    /// error estimate exceeds `k_tolerance`
    #[serde(default)]
    pub k_points_max: Option<usize>,

    #[serde(default)]
    pub k_tolerance: Option<f64>,

    /// "cached" or "direct"
    #[serde(default)]
    pub integration: Option<LatticeIntegration>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            n_freq: Some(200),
            iter_max: Some(5),
            convergence_threshold: None,
            mixing: Some(1.0),
            k_points: Some(128),
            k_points_max: Some(4096),
            k_tolerance: Some(1e-6),
            integration: Some(LatticeIntegration::Cached),
        }
    }
}

impl SolverConfig {
    /// Apply default values to any missing fields
    pub fn with_defaults(mut self) -> Self {
        let defaults = SolverConfig::default();
        if self.n_freq.is_none() {
            self.n_freq = defaults.n_freq;
        }
        if self.iter_max.is_none() {
            self.iter_max = defaults.iter_max;
        }
        if self.mixing.is_none() {
            self.mixing = defaults.mixing;
        }
        if self.k_points.is_none() {
            self.k_points = defaults.k_points;
        }
        if self.k_points_max.is_none() {
            self.k_points_max = defaults.k_points_max;
        }
        if self.k_tolerance.is_none() {
            self.k_tolerance = defaults.k_tolerance;
        }
        if self.integration.is_none() {
            self.integration = defaults.integration;
        }
        self
    }

    pub fn convergence_policy(&self) -> ConvergencePolicy {
        let iter_max = self.iter_max.unwrap_or(5);
        match self.convergence_threshold {
            Some(tolerance) => ConvergencePolicy::Threshold {
                tolerance,
                max_iterations: iter_max,
            },
            None => ConvergencePolicy::FixedIterations(iter_max),
        }
    }
}

/// Output settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// File receiving the final hybridization table (optional)
    #[serde(default)]
    pub results_file: Option<String>,
}

impl Config {
    /// Apply default values to any missing configuration fields
    pub fn with_defaults(mut self) -> Self {
        self.model = self.model.with_defaults();
        self.solver = self.solver.with_defaults();
        self
    }

    /// Command-line values take precedence over the file
    pub fn merge_args(mut self, args: &Args) -> Self {
        self.model.hopping = args.hopping.or(self.model.hopping);
        self.model.beta = args.beta.or(self.model.beta);
        self.model.interaction = args.interaction.or(self.model.interaction);
        self.solver.n_freq = args.n_freq.or(self.solver.n_freq);
        self.solver.iter_max = args.iter_max.or(self.solver.iter_max);
        self.solver.convergence_threshold = args
            .convergence_threshold
            .or(self.solver.convergence_threshold);
        self.solver.mixing = args.mixing.or(self.solver.mixing);
        self.solver.k_points = args.k_points.or(self.solver.k_points);
        self.solver.k_points_max = args.k_points_max.or(self.solver.k_points_max);
        self.solver.k_tolerance = args.k_tolerance.or(self.solver.k_tolerance);
        self.solver.integration = args.integration.or(self.solver.integration);
        self.output.results_file = args.results.clone().or(self.output.results_file);
        self
    }

    /// Build validated run parameters, falling back to defaults for unset fields
    pub fn to_params(&self) -> Result<DmftParams> {
        let defaults = DmftParams::default();
        let params = DmftParams {
            hopping: self.model.hopping.unwrap_or(defaults.hopping),
            beta: self.model.beta.unwrap_or(defaults.beta),
            interaction: self.model.interaction.unwrap_or(defaults.interaction),
            n_freq: self.solver.n_freq.unwrap_or(defaults.n_freq),
            k_points: self.solver.k_points.unwrap_or(defaults.k_points),
            k_points_max: self.solver.k_points_max.unwrap_or(defaults.k_points_max),
            k_tolerance: self.solver.k_tolerance.unwrap_or(defaults.k_tolerance),
            mixing: self.solver.mixing.unwrap_or(defaults.mixing),
            policy: self.solver.convergence_policy(),
            integration: self.solver.integration.unwrap_or(defaults.integration),
        };
        params.validate()?;
        Ok(params)
    }
}
