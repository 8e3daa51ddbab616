// Subcommands of the `nct` binary

pub mod completions;
pub mod env_cmd;
pub mod pin;
pub mod probe;
pub mod validate;
