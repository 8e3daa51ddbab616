// Version pinning for Dockerfiles: line-anchored ENV rewrite plus
// global placeholder replacement

/// Instruction prefix the NGINX Dockerfiles declare their version with
pub const NGINX_ENV_PREFIX: &str = "ENV NGINX_VERSION";

/// Variable the NGINX Dockerfiles reference the version through
pub const NGINX_VARIABLE: &str = "NGINX_VERSION";

/// A line prefix to rewrite and, optionally, a variable whose references
/// should be replaced by the same value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstitutionRule {
    pub instruction_prefix: String,
    pub variable: Option<String>,
    pub value: String,
}

impl SubstitutionRule {
    pub fn new(instruction_prefix: &str, variable: Option<&str>, value: &str) -> Self {
        Self {
            instruction_prefix: instruction_prefix.to_string(),
            variable: variable.map(str::to_string),
            value: value.to_string(),
        }
    }

    /// Pin `ENV NGINX_VERSION` and every `$NGINX_VERSION` reference
    pub fn nginx_version(version: &str) -> Self {
        Self::new(NGINX_ENV_PREFIX, Some(NGINX_VARIABLE), version)
    }

    /// Apply the rule. Applying it again to the result changes nothing.
    pub fn apply(&self, content: &str) -> String {
        let content = substitute_env_declaration(content, &self.instruction_prefix, &self.value);
        match &self.variable {
            Some(variable) => substitute_variable_references(&content, variable, &self.value),
            None => content,
        }
    }
}

/// Replace every line starting with `instruction_prefix` by
/// `<instruction_prefix>=<version>`, keeping the line terminator.
/// Content without a matching line is returned unchanged.
pub fn substitute_env_declaration(content: &str, instruction_prefix: &str, version: &str) -> String {
    if instruction_prefix.is_empty() {
        return content.to_string();
    }

    let replacement = format!("{}={}", instruction_prefix, version);
    let mut out = String::with_capacity(content.len());

    for line in content.split_inclusive('\n') {
        if !line.starts_with(instruction_prefix) {
            out.push_str(line);
            continue;
        }

        let terminator = if line.ends_with("\r\n") {
            "\r\n"
        } else if line.ends_with('\n') {
            "\n"
        } else {
            ""
        };
        out.push_str(&replacement);
        out.push_str(terminator);
    }

    out
}

/// Replace every `${variable}` and `$variable` reference with `version`.
/// Plain text substitution, no environment expansion.
pub fn substitute_variable_references(content: &str, variable: &str, version: &str) -> String {
    if variable.is_empty() {
        return content.to_string();
    }

    content
        .replace(&format!("${{{}}}", variable), version)
        .replace(&format!("${}", variable), version)
}
