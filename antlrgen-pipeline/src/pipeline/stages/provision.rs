//! Provision stage - makes sure a Java runtime is available.

use crate::{
    Error, Result,
    pipeline::{RunContext, Stage},
    plan::{java_probe, provision_commands},
};

/// Stage that installs the JDK through the system package manager and then
/// checks that `java` starts.
///
/// With `jdk.install = false` only the probe runs, for hosts that already
/// ship a runtime.
pub struct ProvisionStage;

impl Stage for ProvisionStage {
    fn name(&self) -> &'static str {
        "provision"
    }

    fn description(&self) -> &'static str {
        "Install the Java runtime"
    }

    fn run(&self, ctx: &mut RunContext<'_>) -> Result<()> {
        let config = ctx.config;
        let jdk = &config.settings.jdk;

        for command in provision_commands(jdk) {
            let output = ctx.run_command(&command)?;
            if !output.success() {
                return Err(Error::Provision {
                    command: command.to_string(),
                    reason: format!("exited with {}", output.status_text()),
                    stdout: output.stdout,
                    stderr: output.stderr,
                });
            }
        }

        let probe = java_probe(jdk);
        let output = ctx.run_command(&probe)?;
        if !output.success() {
            return Err(Error::Provision {
                command: probe.to_string(),
                reason: format!("exited with {}", output.status_text()),
                stdout: output.stdout,
                stderr: output.stderr,
            });
        }

        // `java -version` reports on stderr.
        if let Some(banner) = output.stderr.lines().map(str::trim).find(|l| !l.is_empty()) {
            let message = format!("using {banner}");
            ctx.add_info(self.name(), message);
        }
        Ok(())
    }
}
