//! CLI module for the users API

pub mod serve;

use clap::{Parser, Subcommand};

/// Users API - user records with login autosuggest
#[derive(Parser)]
#[command(name = "users-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server (default)
    Serve,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_is_optional() {
        let cli = Cli::try_parse_from(["users-api"]).unwrap();
        assert!(cli.command.is_none());

        let cli = Cli::try_parse_from(["users-api", "serve"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Serve)));
    }

    #[test]
    fn test_unknown_command_is_rejected() {
        assert!(Cli::try_parse_from(["users-api", "migrate"]).is_err());
    }
}
