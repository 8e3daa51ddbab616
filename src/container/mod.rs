// Container lifecycle orchestration over a ContainerEngine

pub mod handle;
pub mod orchestrator;

pub use handle::{BuildRequest, BuildSource, ContainerHandle, ContainerState};
pub use orchestrator::Orchestrator;

/// Split a flag string such as `"-e NGINX_LOG_TO_VOLUME=y --user 10001"`
/// into engine arguments. Quoting is not interpreted.
pub fn split_args(args: &str) -> Vec<String> {
    args.split_whitespace().map(str::to_string).collect()
}
