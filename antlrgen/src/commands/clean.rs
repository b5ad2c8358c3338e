use clap::Args;
use eyre::Result;

use super::{GlobalArgs, UnwrapOrExit};
use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct CleanCommand {
    /// Also remove the downloaded tool archive
    #[arg(long)]
    pub all: bool,

    /// Preview what would be deleted without actually deleting
    #[arg(long)]
    pub dry_run: bool,
}

impl CleanCommand {
    pub fn run(&self, global: &GlobalArgs) -> Result<()> {
        let workspace = global.workspace().unwrap_or_exit();
        let settings = global.settings(&workspace).unwrap_or_exit();

        let report = ops::clean(
            &workspace,
            settings.settings(),
            ops::clean::CleanOptions {
                all: self.all,
                dry_run: self.dry_run,
            },
        )?;

        report.render(&mut TerminalOutput::new());
        Ok(())
    }
}
