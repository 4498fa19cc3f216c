//! Command-line argument parsing

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "kvlinker", version, about = "URL shortener with per-link hit statistics")]
pub struct Args {
    /// Path to the TOML configuration file
    #[arg(short = 'c', long = "config", value_name = "PATH")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Print a sample configuration, or write it to `output`
    GenerateConfig {
        #[arg(value_name = "OUTPUT")]
        output: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config_short_flag() {
        let args = Args::parse_from(["kvlinker", "-c", "custom.toml"]);
        assert_eq!(args.config.as_deref(), Some("custom.toml"));
        assert_eq!(args.command, None);
    }

    #[test]
    fn test_parse_config_long_equals() {
        let args = Args::parse_from(["kvlinker", "--config=custom.toml", "serve"]);
        assert_eq!(args.config.as_deref(), Some("custom.toml"));
        assert_eq!(args.command, Some(Command::Serve));
    }

    #[test]
    fn test_parse_generate_config() {
        let args = Args::parse_from(["kvlinker", "generate-config", "out.toml"]);
        assert_eq!(
            args.command,
            Some(Command::GenerateConfig {
                output: Some("out.toml".to_string())
            })
        );
    }

    #[test]
    fn test_parse_no_arguments() {
        let args = Args::parse_from(["kvlinker"]);
        assert!(args.config.is_none());
        assert!(args.command.is_none());
    }
}
