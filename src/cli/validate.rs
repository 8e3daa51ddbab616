use crate::dockerfile::DockerfileEditor;
use crate::errors::Result;
use colored::Colorize;
use std::path::Path;

/// Check the structure of a Dockerfile; returns whether it passed
pub fn run(dockerfile: &Path) -> Result<bool> {
    let editor = DockerfileEditor::open(dockerfile)?;
    let valid = editor.is_valid();

    if valid {
        println!("{} {} is valid", "✓".green().bold(), dockerfile.display());
    } else {
        println!(
            "{} {} is missing FROM or uses an unknown instruction",
            "✗".red().bold(),
            dockerfile.display()
        );
    }

    Ok(valid)
}
