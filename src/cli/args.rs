//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Quire static blog generator CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Output directory path (relative to project root)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// Content directory path (relative to project root)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub content: Option<PathBuf>,

    /// Config file path (default: quire.toml)
    #[arg(short = 'C', long, default_value = "quire.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Build the site once
    #[command(visible_alias = "b")]
    Build {
        #[command(flatten)]
        build_args: BuildArgs,
    },

    /// Start development server with live reload
    #[command(visible_alias = "s")]
    Serve {
        #[command(flatten)]
        build_args: BuildArgs,

        /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
        #[arg(short, long)]
        interface: Option<std::net::IpAddr>,

        /// Port number to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Enable file watching for auto-rebuild
        #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
        watch: Option<bool>,
    },

    /// Listen for build_complete events and run a reload command
    #[command(visible_alias = "l")]
    Listen {
        /// WebSocket endpoint (default: built from [reload])
        #[arg(short, long, value_hint = clap::ValueHint::Url)]
        url: Option<String>,

        /// Shell command run on reload (QUIRE_RELOAD_FORCE is set to 1 or 0)
        #[arg(short, long)]
        exec: Option<String>,
    },
}

/// Shared build arguments for Build and Serve commands
#[derive(clap::Args, Debug, Clone)]
pub struct BuildArgs {
    /// Clean output directory completely before building
    #[arg(long)]
    pub clean: bool,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve() {
        let cli = Cli::try_parse_from(["quire", "serve", "-p", "8000", "--watch=false"]).unwrap();
        match cli.command {
            Commands::Serve { port, watch, .. } => {
                assert_eq!(port, Some(8000));
                assert_eq!(watch, Some(false));
            }
            _ => panic!("expected serve"),
        }
        assert_eq!(cli.config, PathBuf::from("quire.toml"));
    }

    #[test]
    fn test_parse_build_flags() {
        let cli = Cli::try_parse_from(["quire", "-o", "dist", "build", "--clean", "-V"]).unwrap();
        assert_eq!(cli.output, Some(PathBuf::from("dist")));
        let Commands::Build { build_args } = cli.command else {
            panic!("expected build");
        };
        assert!(build_args.clean);
        assert!(build_args.verbose);
    }

    #[test]
    fn test_parse_listen() {
        let cli = Cli::try_parse_from([
            "quire",
            "listen",
            "--url",
            "ws://localhost:6000/ws",
            "--exec",
            "true",
        ])
        .unwrap();
        let Commands::Listen { url, exec } = cli.command else {
            panic!("expected listen");
        };
        assert_eq!(url.as_deref(), Some("ws://localhost:6000/ws"));
        assert_eq!(exec.as_deref(), Some("true"));
    }
}
