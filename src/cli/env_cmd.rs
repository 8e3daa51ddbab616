// Env command: show the configuration the suites would run with
use crate::config::{Settings, TestConfig, SETTINGS_ENV};
use crate::engine::{CliEngine, ContainerEngine};
use crate::errors::Result;
use colored::Colorize;

pub fn run() -> Result<()> {
    let config = TestConfig::from_env()?;
    let settings = Settings::from_env()?;

    println!("{}", "Image under test".bold());
    println!("  IMAGE_NAME  {}", config.image_name.cyan());
    println!("  repository  {}", config.image_repository());
    println!("  tag         {}", config.image_tag());
    println!("  VERSION     {}", config.version.cyan());
    println!("  TARGET      {}", config.target.cyan());
    println!();
    println!("{} ({})", "Harness settings".bold(), SETTINGS_ENV);
    println!(
        "  engine         {}",
        settings.engine.as_deref().unwrap_or("auto-detect")
    );
    println!("  s2i            {}", settings.s2i);
    println!("  wait_timeout   {}", settings.wait_timeout);
    println!("  poll_interval  {}ms", settings.poll_interval_ms);
    println!("  probe_timeout  {}", settings.probe_timeout);
    println!("  default_port   {}", settings.default_port);
    println!();
    println!("{}", "Container engine".bold());
    match CliEngine::from_settings(&settings) {
        Ok(engine) if engine.is_available() => {
            println!("  engine      {} {}", engine.kind().as_str().cyan(), "✓".green());
            let image_state = if engine.image_exists(&config.image_name) {
                "present".green()
            } else {
                "missing".red()
            };
            println!("  IMAGE_NAME  {}", image_state);
        }
        Ok(engine) => println!("  engine      {} {}", engine.kind().as_str(), "✗ not responding".red()),
        Err(e) => println!("  engine      {}", format!("✗ {}", e).red()),
    }

    Ok(())
}
