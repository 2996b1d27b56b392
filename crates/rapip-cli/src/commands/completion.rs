use anyhow::Result;
use clap::Command;
use clap_complete::{Shell, generate};
use std::io::{self, Write};

/// Write the completion script for `cmd` to `out`
pub fn write_completions(shell: Shell, cmd: &mut Command, out: &mut dyn Write) {
    let bin_name = cmd.get_name().to_string();
    tracing::debug!("Generating {} completions for {}", shell, bin_name);
    generate(shell, cmd, bin_name, out);
}

pub fn execute(shell: Shell, cmd: &mut Command) -> Result<()> {
    let mut stdout = io::stdout().lock();
    write_completions(shell, cmd, &mut stdout);
    stdout.flush()?;
    Ok(())
}
