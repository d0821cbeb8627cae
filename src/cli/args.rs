//! Command-line argument parsing.
//!
//! Flags override the environment-derived [`DashboardConfig`].

use std::net::SocketAddr;

use crate::config::DashboardConfig;
use crate::error::DashboardError;

/// Overrides collected from the command line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliOverrides {
    pub backend: Option<String>,
    pub listen: Option<SocketAddr>,
    pub secure_only: bool,
}

impl CliOverrides {
    /// Apply the overrides on top of `config`.
    pub fn apply(&self, config: DashboardConfig) -> DashboardConfig {
        let mut config = config;
        if let Some(backend) = &self.backend {
            config = config.with_backend(backend.clone());
        }
        if let Some(listen) = self.listen {
            config = config.with_listen(listen);
        }
        if self.secure_only {
            config = config.with_secure_only(true);
        }
        config
    }
}

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Run the dashboard (default)
    Run(CliOverrides),
}

/// Usage text for `--help`.
pub const USAGE: &str = "\
Usage: arena-dashboard [OPTIONS]

Options:
  --backend <HOST:PORT>  Arena proxy to poll and subscribe to
  --listen <ADDR>        Address for the local dashboard page
  --secure-only          Refuse plain ws:// status sockets
  -V, --version          Print version
  -h, --help             Print this help";

/// Parse command-line arguments and return the appropriate command.
///
/// # Examples
///
/// ```
/// use arena_dashboard::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["arena-dashboard".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()).unwrap(), CliCommand::Version);
/// ```
pub fn parse_args<I>(args: I) -> Result<CliCommand, DashboardError>
where
    I: Iterator<Item = String>,
{
    let mut overrides = CliOverrides::default();
    // Skip the program name
    let mut args = args.skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--version" | "-V" => return Ok(CliCommand::Version),
            "--help" | "-h" => return Ok(CliCommand::Help),
            "--secure-only" => overrides.secure_only = true,
            "--backend" => overrides.backend = Some(value_for(&arg, args.next())?),
            "--listen" => {
                let value = value_for(&arg, args.next())?;
                let addr = value.parse().map_err(|e| {
                    DashboardError::Config(format!("--listen {:?}: {}", value, e))
                })?;
                overrides.listen = Some(addr);
            }
            other => {
                return Err(DashboardError::Config(format!(
                    "unknown argument {:?}",
                    other
                )))
            }
        }
    }
    Ok(CliCommand::Run(overrides))
}

fn value_for(flag: &str, value: Option<String>) -> Result<String, DashboardError> {
    value
        .filter(|v| !v.starts_with("--"))
        .ok_or_else(|| DashboardError::Config(format!("{} needs a value", flag)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<CliCommand, DashboardError> {
        let mut all = vec!["arena-dashboard".to_string()];
        all.extend(args.iter().map(|a| a.to_string()));
        parse_args(all.into_iter())
    }

    #[test]
    fn test_parse_version_flag() {
        assert_eq!(parse(&["--version"]).unwrap(), CliCommand::Version);
        assert_eq!(parse(&["-V"]).unwrap(), CliCommand::Version);
    }

    #[test]
    fn test_parse_help_flag() {
        assert_eq!(parse(&["-h"]).unwrap(), CliCommand::Help);
    }

    #[test]
    fn test_parse_no_args() {
        assert_eq!(
            parse(&[]).unwrap(),
            CliCommand::Run(CliOverrides::default())
        );
    }

    #[test]
    fn test_parse_overrides() {
        let command = parse(&[
            "--backend",
            "10.0.0.5:8765",
            "--listen",
            "0.0.0.0:9000",
            "--secure-only",
        ])
        .unwrap();

        let CliCommand::Run(overrides) = command else {
            panic!("expected run");
        };
        assert_eq!(overrides.backend.as_deref(), Some("10.0.0.5:8765"));
        assert_eq!(overrides.listen, Some("0.0.0.0:9000".parse().unwrap()));
        assert!(overrides.secure_only);

        let config = overrides.apply(DashboardConfig::default());
        assert_eq!(config.backend, "10.0.0.5:8765");
        assert_eq!(config.listen.port(), 9000);
        assert!(config.secure_only);
    }

    #[test]
    fn test_missing_value_is_an_error() {
        assert!(parse(&["--backend"]).is_err());
        assert!(parse(&["--backend", "--secure-only"]).is_err());
    }

    #[test]
    fn test_bad_listen_address() {
        assert!(matches!(
            parse(&["--listen", "nowhere"]),
            Err(DashboardError::Config(_))
        ));
    }

    #[test]
    fn test_parse_unknown_flag() {
        assert!(parse(&["--unknown"]).is_err());
    }
}
