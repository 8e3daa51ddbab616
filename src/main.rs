use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use nginx_container_tests::cli;
use nginx_container_tests::config::parse_duration;
use nginx_container_tests::dockerfile::{NGINX_ENV_PREFIX, NGINX_VARIABLE};
use nginx_container_tests::logging;
use nginx_container_tests::probe::Probe;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "nct")]
#[command(about = "Test helpers for the NGINX S2I container image", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pin the NGINX version in a Dockerfile
    Pin {
        /// Dockerfile to read
        dockerfile: PathBuf,
        /// Version to pin
        version: String,
        /// Write here instead of a new temp file
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Line prefix of the version declaration
        #[arg(long, default_value = NGINX_ENV_PREFIX)]
        prefix: String,
        /// Variable whose references are replaced
        #[arg(long, default_value = NGINX_VARIABLE)]
        variable: String,
    },
    /// Check a Dockerfile's basic structure
    Validate {
        dockerfile: PathBuf,
    },
    /// Send one GET request and check the response
    Probe {
        /// Container address (IP or host name)
        address: String,
        #[arg(short, long)]
        port: Option<u16>,
        #[arg(long, default_value = "/")]
        path: String,
        /// Host header to send
        #[arg(long)]
        host: Option<String>,
        /// Expected HTTP status
        #[arg(long)]
        expect_code: Option<u16>,
        /// Text the body must contain
        #[arg(long)]
        expect_output: Option<String>,
        /// Request timeout ("10s", "1m")
        #[arg(long, default_value = "10s")]
        timeout: String,
    },
    /// Show the image configuration read from the environment
    Env,
    /// Generate shell completions
    Completions {
        shell: Shell,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose).context("failed to initialize logging")?;

    match cli.command {
        Commands::Pin {
            dockerfile,
            version,
            output,
            prefix,
            variable,
        } => cli::pin::run(&dockerfile, &version, output.as_deref(), &prefix, &variable)
            .with_context(|| format!("failed to pin {}", dockerfile.display()))?,
        Commands::Validate { dockerfile } => {
            if !cli::validate::run(&dockerfile)? {
                std::process::exit(1);
            }
        }
        Commands::Probe {
            address,
            port,
            path,
            host,
            expect_code,
            expect_output,
            timeout,
        } => {
            let timeout = parse_duration(&timeout)?;
            let mut request = Probe::new(&address).path(&path);
            request.port = port;
            request.host = host;
            request.expected_code = expect_code;
            request.expected_output = expect_output;

            if !cli::probe::run(&request, timeout)? {
                std::process::exit(1);
            }
        }
        Commands::Env => cli::env_cmd::run().context("configuration is incomplete")?,
        Commands::Completions { shell } => cli::completions::run(shell, &mut Cli::command()),
    }

    Ok(())
}
