//! CLI command handlers. Each command is in its own file.

mod checksum;
mod completions;
mod install;
mod verify;

pub use checksum::run_checksum;
pub use completions::{run_completions, run_man};
pub use install::{run_install, InstallArgs};
pub use verify::run_verify;
