//! CLI module.
//!
//! The dispatcher runs early in main(), before any task is started:
//!
//! ```ignore
//! use arena_dashboard::cli::{parse_args, run_cli_command};
//!
//! let command = parse_args(std::env::args())?;
//! let overrides = match run_cli_command(command) {
//!     Some(overrides) => overrides,
//!     None => return Ok(()),
//! };
//! ```

pub mod args;
pub mod version;

pub use args::{parse_args, CliCommand, CliOverrides, USAGE};
pub use version::{handle_version_command, VERSION};

/// Run a CLI command if applicable.
///
/// # Returns
///
/// * `Some(overrides)` - the dashboard should run with these overrides
/// * `None` - the command was handled (help printed)
///
/// # Note
///
/// The `Version` command never returns as it calls `std::process::exit(0)`.
pub fn run_cli_command(command: CliCommand) -> Option<CliOverrides> {
    match command {
        CliCommand::Version => {
            // This function never returns (calls exit)
            handle_version_command();
        }
        CliCommand::Help => {
            println!("{}", USAGE);
            None
        }
        CliCommand::Run(overrides) => Some(overrides),
    }
}
