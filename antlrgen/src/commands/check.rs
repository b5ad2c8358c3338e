use clap::Args;
use eyre::{Context, Result};

use super::{GlobalArgs, InputArgs, load_config};
use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct CheckCommand {
    #[command(flatten)]
    pub inputs: InputArgs,

    /// Print the resolved plan as JSON
    #[arg(long)]
    pub json: bool,
}

impl CheckCommand {
    /// Run the check command
    pub fn run(&self, global: &GlobalArgs) -> Result<()> {
        let (config, settings_path) = load_config(global, &self.inputs);

        let report = ops::check(&config, settings_path);

        if self.json {
            let json =
                serde_json::to_string_pretty(&report.plan).wrap_err("Failed to serialize plan")?;
            println!("{json}");
        } else {
            report.render(&mut TerminalOutput::new());
        }

        if report.has_missing_sources() {
            std::process::exit(1);
        }
        Ok(())
    }
}
