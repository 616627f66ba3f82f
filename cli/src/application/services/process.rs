//! Exit status handling for captured external commands.
//!
//! Imports only from `crate::domain`.

use std::process::Output;

use crate::domain::CommandError;

/// Turn a non-zero exit into a [`CommandError`] carrying the captured output.
///
/// # Errors
///
/// Returns a [`CommandError`] if the command did not exit successfully.
pub fn ensure_success(program: &str, args: &[&str], output: Output) -> Result<Output, CommandError> {
    if output.status.success() {
        return Ok(output);
    }
    let mut captured = String::from_utf8_lossy(&output.stderr).into_owned();
    let stdout = String::from_utf8_lossy(&output.stdout);
    if !stdout.trim().is_empty() {
        if !captured.trim().is_empty() {
            captured.push('\n');
        }
        captured.push_str(&stdout);
    }
    Err(CommandError {
        program: program.to_string(),
        args: args.join(" "),
        code: output.status.code(),
        output: captured,
    })
}

/// Non-empty, trimmed lines of captured stdout.
#[must_use]
pub fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
