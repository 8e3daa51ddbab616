// Pin command: rewrite the NGINX version in a Dockerfile
use crate::dockerfile::{DockerfileEditor, SubstitutionRule};
use crate::errors::Result;
use colored::Colorize;
use std::path::Path;

/// Pin `version` in `dockerfile`. Without `output` the result goes to a
/// fresh temp file whose path is printed on stdout.
pub fn run(
    dockerfile: &Path,
    version: &str,
    output: Option<&Path>,
    prefix: &str,
    variable: &str,
) -> Result<()> {
    let mut editor = DockerfileEditor::open(dockerfile)?;
    editor.apply(&SubstitutionRule::new(prefix, Some(variable), version));

    if !editor.is_valid() {
        eprintln!(
            "{} {} does not look like a valid Dockerfile",
            "⚠".yellow(),
            dockerfile.display()
        );
    }

    match output {
        Some(path) => {
            editor.write_to(path)?;
            eprintln!(
                "{} Processed {} -> {} with version {}",
                "✓".green().bold(),
                dockerfile.display(),
                path.display(),
                version.cyan()
            );
        }
        None => {
            let path = editor.create_temp_dockerfile()?;
            println!("{}", path.display());
        }
    }

    Ok(())
}
