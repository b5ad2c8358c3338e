use antlrgen_pipeline::{HttpFetcher, SystemRunner};
use clap::Args;
use eyre::Result;

use super::{GlobalArgs, InputArgs, load_config};
use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct GenerateCommand {
    #[command(flatten)]
    pub inputs: InputArgs,
}

impl GenerateCommand {
    pub fn run(&self, global: &GlobalArgs) -> Result<()> {
        let (config, _) = load_config(global, &self.inputs);

        let report = ops::generate(&config, &SystemRunner, &HttpFetcher::new())?;

        report.render(&mut TerminalOutput::new());
        Ok(())
    }
}
