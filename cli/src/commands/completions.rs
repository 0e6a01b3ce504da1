//! `pagecraft completions <SHELL>`.

use std::io::{self, Write};

use clap::CommandFactory as _;
use clap_complete::Shell;

use crate::cli::Cli;

/// Print the completion script for `shell` to stdout.
pub fn generate_completions(shell: Shell) {
    let mut stdout = io::stdout();
    write_completions(shell, &mut stdout);
    stdout.flush().ok();
}

/// Write the completion script for `shell` into `out`.
pub fn write_completions(shell: Shell, out: &mut dyn Write) {
    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_owned();
    clap_complete::generate(shell, &mut cmd, bin_name, out);
}
