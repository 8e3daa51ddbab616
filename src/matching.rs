// Checks over captured container output (logs, config files, `nginx -v`)

use crate::errors::Result;
use regex::Regex;

/// Whether `pattern` matches anywhere in `text`
pub fn check_regexp_output(pattern: &str, text: &str) -> Result<bool> {
    let regex = Regex::new(pattern)?;
    Ok(regex.is_match(text))
}

/// `nginx -v` output for `version`; nginx prints e.g. `nginx version: nginx/1.24.0`
pub fn starts_with_version(output: &str, version: &str) -> bool {
    output
        .trim_start()
        .starts_with(&format!("nginx version: nginx/{}", version))
}
