// Container engine adapter that shells out to podman/docker and s2i.
// Every invocation uses an explicit argument vector, never `sh -c`.

use crate::config::Settings;
use crate::engine::inspect::parse_ip_address;
use crate::engine::{ContainerEngine, EngineKind};
use crate::errors::{NctError, Result};
use std::path::Path;
use std::process::{Command, Output};
use tracing::debug;

/// s2i always builds from local images only
pub const S2I_PULL_POLICY: &str = "--pull-policy=never";

/// Drives a container engine through its command line
#[derive(Debug, Clone)]
pub struct CliEngine {
    kind: EngineKind,
    s2i: String,
}

impl CliEngine {
    pub fn new(kind: EngineKind) -> Self {
        Self {
            kind,
            s2i: "s2i".to_string(),
        }
    }

    /// Engine named in settings, or whichever is installed
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let kind = match &settings.engine {
            Some(name) => name.parse()?,
            None => EngineKind::detect()?,
        };

        Ok(Self {
            kind,
            s2i: settings.s2i.clone(),
        })
    }

    /// Check that the engine binary answers `--version`
    pub fn is_available(&self) -> bool {
        Command::new(self.kind.as_str())
            .arg("--version")
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    fn output(&self, program: &str, args: &[String]) -> Result<Output> {
        debug!(program, ?args, "running");
        Command::new(program).args(args).output().map_err(|e| {
            NctError::Engine(format!("Failed to execute {}: {}", program, e))
        })
    }

    fn engine_output(&self, args: &[String]) -> Result<Output> {
        self.output(self.kind.as_str(), args)
    }

    /// Run the engine and return stdout, mapping a nonzero exit through `on_failure`
    fn checked(&self, args: &[String], on_failure: fn(String) -> NctError) -> Result<String> {
        let output = self.engine_output(args)?;
        if !output.status.success() {
            return Err(on_failure(failure_message(self.kind.as_str(), args, &output)));
        }
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

impl ContainerEngine for CliEngine {
    fn kind(&self) -> EngineKind {
        self.kind
    }

    fn build(&self, dockerfile: &Path, context: &Path, tag: &str, args: &[String]) -> Result<()> {
        let args = build_command_args(dockerfile, context, tag, args);
        self.checked(&args, NctError::Build)?;
        Ok(())
    }

    fn s2i_build(
        &self,
        app_path: &Path,
        base_image: &str,
        dest_image: &str,
        args: &[String],
    ) -> Result<()> {
        // s2i writes a Dockerfile plus the injected sources; the engine builds it
        let work_dir = tempfile::TempDir::new()?;
        let dockerfile = work_dir.path().join("Dockerfile");

        let s2i_args = s2i_build_command_args(app_path, base_image, dest_image, &dockerfile, args);
        let output = self.output(&self.s2i, &s2i_args)?;
        if !output.status.success() {
            return Err(NctError::Build(failure_message(&self.s2i, &s2i_args, &output)));
        }

        self.build(&dockerfile, work_dir.path(), dest_image, &[])
    }

    fn run(&self, image: &str, cid_file: &Path, args: &[String]) -> Result<()> {
        let args = run_command_args(image, cid_file, args);
        self.checked(&args, NctError::Run)?;
        Ok(())
    }

    fn run_rm(&self, image: &str, command: Option<&str>) -> Result<String> {
        let args = run_rm_command_args(image, command);
        self.checked(&args, NctError::Run)
    }

    fn inspect_ip(&self, container_id: &str) -> Result<String> {
        let args = vec!["inspect".to_string(), container_id.to_string()];
        let json = self.checked(&args, NctError::Lookup)?;
        parse_ip_address(&json, container_id)
    }

    fn logs(&self, container_id: &str) -> Result<String> {
        let args = vec!["logs".to_string(), container_id.to_string()];
        let output = self.engine_output(&args)?;
        if !output.status.success() {
            return Err(NctError::Lookup(failure_message(
                self.kind.as_str(),
                &args,
                &output,
            )));
        }

        // nginx logs access lines to stdout and errors to stderr
        let mut logs = String::from_utf8_lossy(&output.stdout).to_string();
        logs.push_str(&String::from_utf8_lossy(&output.stderr));
        Ok(logs)
    }

    fn exec(&self, container_id: &str, command: &str) -> Result<String> {
        let args = exec_command_args(container_id, command);
        self.checked(&args, NctError::Run)
    }

    fn remove_container(&self, container_id: &str) -> Result<()> {
        let args = vec!["rm".to_string(), "-f".to_string(), container_id.to_string()];
        self.checked(&args, NctError::Engine)?;
        Ok(())
    }

    fn remove_image(&self, image: &str) -> Result<()> {
        let args = vec!["rmi".to_string(), "-f".to_string(), image.to_string()];
        self.checked(&args, NctError::Engine)?;
        Ok(())
    }

    fn image_exists(&self, image: &str) -> bool {
        let args = vec![
            "image".to_string(),
            "inspect".to_string(),
            image.to_string(),
        ];
        self.engine_output(&args)
            .map(|output| output.status.success())
            .unwrap_or(false)
    }
}

fn failure_message(program: &str, args: &[String], output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!(
        "`{} {}` exited with {}: {}",
        program,
        args.join(" "),
        output
            .status
            .code()
            .map(|c| c.to_string())
            .unwrap_or_else(|| "signal".to_string()),
        stderr.trim()
    )
}

/// `build -f <dockerfile> -t <tag> [args] <context>`
pub fn build_command_args(dockerfile: &Path, context: &Path, tag: &str, extra: &[String]) -> Vec<String> {
    let mut args = vec![
        "build".to_string(),
        "-f".to_string(),
        dockerfile.to_string_lossy().to_string(),
        "-t".to_string(),
        tag.to_string(),
    ];
    args.extend_from_slice(extra);
    args.push(context.to_string_lossy().to_string());
    args
}

/// `build --pull-policy=never [args] <app> <base> <dest> --as-dockerfile <dockerfile>`
pub fn s2i_build_command_args(
    app_path: &Path,
    base_image: &str,
    dest_image: &str,
    dockerfile: &Path,
    extra: &[String],
) -> Vec<String> {
    let mut args = vec!["build".to_string(), S2I_PULL_POLICY.to_string()];
    args.extend(
        extra
            .iter()
            .filter(|arg| !arg.starts_with("--pull-policy"))
            .cloned(),
    );
    args.push(app_path.to_string_lossy().to_string());
    args.push(base_image.to_string());
    args.push(dest_image.to_string());
    args.push("--as-dockerfile".to_string());
    args.push(dockerfile.to_string_lossy().to_string());
    args
}

/// `run --cidfile=<cid_file> -d [args] <image>`
pub fn run_command_args(image: &str, cid_file: &Path, extra: &[String]) -> Vec<String> {
    let mut args = vec![
        "run".to_string(),
        format!("--cidfile={}", cid_file.display()),
        "-d".to_string(),
    ];
    args.extend_from_slice(extra);
    args.push(image.to_string());
    args
}

/// `run --rm <image> [/bin/bash -c <command>]`
pub fn run_rm_command_args(image: &str, command: Option<&str>) -> Vec<String> {
    let mut args = vec!["run".to_string(), "--rm".to_string(), image.to_string()];
    if let Some(command) = command {
        args.push("/bin/bash".to_string());
        args.push("-c".to_string());
        args.push(command.to_string());
    }
    args
}

/// `exec <id> /bin/bash -c <command>`
pub fn exec_command_args(container_id: &str, command: &str) -> Vec<String> {
    vec![
        "exec".to_string(),
        container_id.to_string(),
        "/bin/bash".to_string(),
        "-c".to_string(),
        command.to_string(),
    ]
}
