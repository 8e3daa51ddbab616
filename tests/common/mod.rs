/// Common test utilities for nginx-container-tests integration tests
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Directory holding the example Dockerfiles and test applications
#[allow(dead_code)]
pub fn test_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("test")
}

/// Path of an example Dockerfile under test/examples
#[allow(dead_code)]
pub fn example_dockerfile(name: &str) -> PathBuf {
    test_dir().join("examples").join(name)
}

/// A scratch directory for Dockerfiles written by a test
#[allow(dead_code)]
pub struct TestWorkspace {
    pub temp_dir: TempDir,
}

impl TestWorkspace {
    #[allow(dead_code)]
    pub fn new() -> Self {
        TestWorkspace {
            temp_dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    #[allow(dead_code)]
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write `content` to `name` inside the workspace
    #[allow(dead_code)]
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        std::fs::write(&path, content).expect("Failed to write file");
        path
    }

    #[allow(dead_code)]
    pub fn read(&self, name: &str) -> String {
        std::fs::read_to_string(self.temp_dir.path().join(name)).expect("Failed to read file")
    }

    /// Run the nct binary inside the workspace
    #[allow(dead_code)]
    pub fn nct(&self, args: &[&str]) -> CommandResult {
        self.nct_with_env(args, &[])
    }

    /// Run the nct binary with extra environment variables
    #[allow(dead_code)]
    pub fn nct_with_env(&self, args: &[&str], env: &[(&str, &str)]) -> CommandResult {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_nct"));
        cmd.args(args)
            .current_dir(self.temp_dir.path())
            .env_remove("IMAGE_NAME")
            .env_remove("VERSION")
            .env_remove("TARGET")
            .env_remove("NCT_CONFIG")
            .env_remove("RUST_LOG");
        for (key, value) in env {
            cmd.env(key, value);
        }

        let output = cmd.output().expect("Failed to execute nct command");

        CommandResult {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            exit_code: output.status.code(),
        }
    }
}

/// Result of running a command
pub struct CommandResult {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
    pub exit_code: Option<i32>,
}

impl CommandResult {
    /// Assert the command succeeded
    #[allow(dead_code)]
    pub fn assert_success(&self) {
        if !self.success {
            panic!(
                "Command failed:\nstdout: {}\nstderr: {}\nexit code: {:?}",
                self.stdout, self.stderr, self.exit_code
            );
        }
    }

    /// Assert the command failed
    #[allow(dead_code)]
    pub fn assert_failure(&self) {
        if self.success {
            panic!(
                "Command succeeded when it should have failed:\nstdout: {}\nstderr: {}",
                self.stdout, self.stderr
            );
        }
    }

    /// Assert stdout contains text
    #[allow(dead_code)]
    pub fn assert_stdout_contains(&self, text: &str) {
        assert!(
            self.stdout.contains(text),
            "stdout does not contain '{}'\nstdout: {}",
            text,
            self.stdout
        );
    }

    /// Assert stderr contains text
    #[allow(dead_code)]
    pub fn assert_stderr_contains(&self, text: &str) {
        assert!(
            self.stderr.contains(text),
            "stderr does not contain '{}'\nstderr: {}",
            text,
            self.stderr
        );
    }
}

/// Configuration and engine for the container suites.
///
/// The environment is checked once per test binary. A missing IMAGE_NAME,
/// VERSION or TARGET, an unusable engine, or an IMAGE_NAME that was never
/// built exits the whole binary with status 1 instead of failing each test
/// on its own.
#[cfg(feature = "container-tests")]
#[allow(dead_code)]
pub mod suite {
    use nginx_container_tests::config::{Settings, TestConfig};
    use nginx_container_tests::container::Orchestrator;
    use nginx_container_tests::engine::{CliEngine, ContainerEngine};
    use nginx_container_tests::probe::HttpProber;
    use std::fmt::Display;
    use std::process;
    use std::sync::OnceLock;

    static SUITE: OnceLock<Suite> = OnceLock::new();

    pub struct Suite {
        pub config: TestConfig,
        pub settings: Settings,
    }

    fn abort(reason: impl Display) -> ! {
        eprintln!("container suites cannot run: {}", reason);
        process::exit(1);
    }

    impl Suite {
        pub fn load() -> &'static Suite {
            SUITE.get_or_init(|| {
                let _ = nginx_container_tests::logging::init_tracing(0);
                let config = TestConfig::from_env().unwrap_or_else(|e| abort(e));
                let settings = Settings::from_env().unwrap_or_else(|e| abort(e));

                let engine = CliEngine::from_settings(&settings).unwrap_or_else(|e| abort(e));
                if !engine.is_available() {
                    abort(format!("{} does not respond", engine.kind()));
                }
                if !engine.image_exists(&config.image_name) {
                    abort(format!(
                        "image {} for version {} on {} does not exist",
                        config.image_name, config.version, config.target
                    ));
                }

                Suite { config, settings }
            })
        }

        pub fn orchestrator(&self) -> Orchestrator<'_, CliEngine> {
            let engine = CliEngine::from_settings(&self.settings).expect("No container engine");
            Orchestrator::new(engine, &self.config, &self.settings)
                .expect("Failed to create orchestrator")
        }

        pub fn prober(&self) -> HttpProber {
            let timeout = self.settings.probe_timeout().expect("Invalid probe timeout");
            HttpProber::new(timeout).expect("Failed to create HTTP client")
        }

        pub fn port(&self) -> u16 {
            self.settings.default_port
        }
    }
}
