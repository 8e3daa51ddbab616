// Library interface for the NGINX container test harness
// Used by the `nct` binary and by the container suites under tests/

pub mod cli;
pub mod clock;
pub mod config;
pub mod container;
pub mod dockerfile;
pub mod engine;
pub mod errors;
pub mod logging;
pub mod matching;
pub mod probe;
