//! Command implementations

pub mod composer;
pub mod down;
pub mod exec;
pub mod init;
pub mod logs;
pub mod pause;
pub mod resources;
pub mod restart;
pub mod resume;
pub mod setup;
pub mod setup_https;
pub mod ssh;
pub mod start;
pub mod status;
pub mod stop;
pub mod version;

use std::process::{ExitCode, ExitStatus};

/// Exit code mirroring a child's exit status. Signals map to 1.
#[must_use]
pub fn exit_code(status: ExitStatus) -> ExitCode {
    let code = status.code().unwrap_or(1);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    ExitCode::from(code as u8)
}
