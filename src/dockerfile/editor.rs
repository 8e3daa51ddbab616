use crate::dockerfile::substitution::{
    substitute_env_declaration, substitute_variable_references, SubstitutionRule,
};
use crate::dockerfile::validation::validate_structure;
use crate::errors::{NctError, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Dockerfile text together with the path it was read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DockerfileDocument {
    pub path: PathBuf,
    pub content: String,
}

impl DockerfileDocument {
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.content.lines()
    }
}

/// Rewrites a Dockerfile in memory; nothing touches disk until
/// `write_to` or `create_temp_dockerfile` is called
#[derive(Debug, Clone)]
pub struct DockerfileEditor {
    document: DockerfileDocument,
}

impl DockerfileEditor {
    /// Read the Dockerfile at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(NctError::DockerfileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Ok(Self {
            document: DockerfileDocument {
                path: path.to_path_buf(),
                content,
            },
        })
    }

    pub fn document(&self) -> &DockerfileDocument {
        &self.document
    }

    pub fn content(&self) -> &str {
        &self.document.content
    }

    /// Rewrite lines starting with `instruction_prefix` to `<prefix>=<version>`
    pub fn update_env(&mut self, instruction_prefix: &str, version: &str) -> &mut Self {
        self.document.content =
            substitute_env_declaration(&self.document.content, instruction_prefix, version);
        self
    }

    /// Replace references to `variable` with `version`
    pub fn update_variable(&mut self, variable: &str, version: &str) -> &mut Self {
        self.document.content =
            substitute_variable_references(&self.document.content, variable, version);
        self
    }

    pub fn apply(&mut self, rule: &SubstitutionRule) -> &mut Self {
        self.document.content = rule.apply(&self.document.content);
        self
    }

    pub fn is_valid(&self) -> bool {
        validate_structure(&self.document.content)
    }

    /// Write the current content to `output`
    pub fn write_to(&self, output: impl AsRef<Path>) -> Result<()> {
        fs::write(output.as_ref(), &self.document.content)?;
        Ok(())
    }

    /// Write the current content to a fresh temp file; the caller deletes it
    pub fn create_temp_dockerfile(&self) -> Result<PathBuf> {
        let path = materialize_to_temp_file(&self.document.content)?;
        debug!(
            source = %self.document.path.display(),
            temp = %path.display(),
            "materialized dockerfile"
        );
        Ok(path)
    }
}

/// Write `content` to a uniquely named temp file and return its path.
/// The file outlives this call; deleting it is up to the caller.
pub fn materialize_to_temp_file(content: &str) -> Result<PathBuf> {
    let mut file = tempfile::Builder::new()
        .prefix("nginx_test_")
        .suffix(".dockerfile")
        .tempfile()?;
    file.write_all(content.as_bytes())?;
    file.flush()?;

    let (_, path) = file.keep().map_err(|e| NctError::Io(e.error))?;
    Ok(path)
}

/// Read `input`, pin the NGINX version, and write the result to `output`
pub fn pin_version_in_file(input: &Path, version: &str, output: &Path) -> Result<()> {
    let mut editor = DockerfileEditor::open(input)?;
    editor.apply(&SubstitutionRule::nginx_version(version));
    editor.write_to(output)
}
