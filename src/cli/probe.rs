// Probe command: one HTTP check from the shell
use crate::errors::Result;
use crate::probe::{HttpProber, Probe};
use colored::Colorize;
use std::time::Duration;

/// Run `request` and report; returns whether it passed
pub fn run(request: &Probe, timeout: Duration) -> Result<bool> {
    let prober = HttpProber::new(timeout)?;
    let url = request.url();

    match prober.fetch(request) {
        Ok(result) if result.satisfies(request) => {
            println!("{} GET {} -> {}", "✓".green().bold(), url, result.status);
            Ok(true)
        }
        Ok(result) => {
            println!("{} GET {} -> {}", "✗".red().bold(), url, result.status);
            if let Some(code) = request.expected_code {
                println!("  expected status {}", code);
            }
            if let Some(output) = &request.expected_output {
                println!("  expected body containing '{}'", output);
            }
            Ok(false)
        }
        Err(e) => {
            println!("{} {}", "✗".red().bold(), e);
            Ok(false)
        }
    }
}
