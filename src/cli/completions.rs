use clap::Command;
use clap_complete::{generate, Shell};
use std::io;

/// Print completions for `shell` to stdout
pub fn run(shell: Shell, cmd: &mut Command) {
    let name = cmd.get_name().to_string();
    generate(shell, cmd, name, &mut io::stdout());
}
