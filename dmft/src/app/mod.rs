mod report;
mod runner;

pub use report::report_summary;
pub use runner::run_calculation;

use crate::config::{Args, Config};
use crate::dmft_impl::DmftLoop;
use crate::io::{setup_output, write_results_file};
use crate::solver_impl::HartreeSolver;
use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use std::fs;
use tracing::info;

pub struct DmftApplication {
    args: Args,
    config: Config,
}

impl DmftApplication {
    pub fn from_cli() -> Result<Self> {
        let args = Args::parse();
        let config = load_config(&args)?;
        Ok(Self { args, config })
    }

    pub fn run(self) -> Result<()> {
        setup_output(self.args.output.as_ref())?;
        info!("Configuration loaded:\n{:?}", self.config);

        let params = self
            .config
            .to_params()
            .wrap_err("Invalid DMFT parameters")?;
        let mut dmft = DmftLoop::new(params, HartreeSolver)?;
        let solution = run_calculation(&mut dmft)?;
        report_summary(dmft.params(), dmft.kgrid(), &solution);

        if let Some(path) = self.config.output.results_file.as_deref() {
            write_results_file(path, &solution)?;
        }
        Ok(())
    }
}

fn load_config(args: &Args) -> Result<Config> {
    let config = match &args.config_file {
        Some(path) => {
            let config_content = fs::read_to_string(path)
                .wrap_err_with(|| format!("Unable to read configuration file: {}", path))?;
            serde_yml::from_str::<Config>(&config_content)
                .wrap_err("Failed to parse configuration file")?
        }
        None => Config::default(),
    };

    Ok(config.with_defaults().merge_args(args))
}
