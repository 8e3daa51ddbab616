/// Instructions a Dockerfile line may start with
pub const INSTRUCTIONS: [&str; 17] = [
    "FROM",
    "RUN",
    "CMD",
    "LABEL",
    "EXPOSE",
    "ENV",
    "ADD",
    "COPY",
    "ENTRYPOINT",
    "VOLUME",
    "USER",
    "WORKDIR",
    "ARG",
    "ONBUILD",
    "STOPSIGNAL",
    "HEALTHCHECK",
    "SHELL",
];

pub fn is_instruction(token: &str) -> bool {
    let upper = token.to_uppercase();
    INSTRUCTIONS.contains(&upper.as_str())
}

/// Basic structural check: at least one FROM, and every instruction line
/// starts with a known instruction. Never fails, only reports.
///
/// Blank lines and `#` comments are skipped. Lines continuing a previous
/// line that ended in `\` are arguments, not instructions.
pub fn validate_structure(content: &str) -> bool {
    let mut has_from = false;
    let mut continuation = false;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let continues = line.ends_with('\\');
        if continuation {
            continuation = continues;
            continue;
        }
        continuation = continues;

        let Some(token) = line.split_whitespace().next() else {
            continue;
        };
        if !is_instruction(token) {
            return false;
        }
        if token.eq_ignore_ascii_case("FROM") {
            has_from = true;
        }
    }

    has_from
}
