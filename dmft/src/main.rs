//! DMFT Calculation Command-Line Interface
//!
//! This is the main entry point for running DMFT calculations with YAML configuration.

use color_eyre::eyre::Result;
use dmft::app::DmftApplication;

fn main() -> Result<()> {
    color_eyre::install()?;
    DmftApplication::from_cli()?.run()
}
