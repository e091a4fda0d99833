use crate::validator::formatter::OutputFormat;
use clap::builder::BoolishValueParser;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "kube-aegis")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Validate Kubernetes manifests against structural rules")]
#[command(long_about = "Loads Kubernetes resource manifests (YAML), checks required fields, known kinds and metadata, and reports pass/fail with a list of findings. Never contacts a cluster.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate manifest files, directories or standard input
    Validate {
        /// Files or directories to validate ("-" reads standard input)
        #[arg(value_name = "PATH", required = true)]
        paths: Vec<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, env = "KUBE_AEGIS_FORMAT")]
        format: Option<OutputFormat>,

        /// Treat warnings as failures
        #[arg(long, env = "STRICT_VALIDATION", value_parser = BoolishValueParser::new())]
        strict: bool,
    },

    /// Show a detailed validation view of a single manifest file
    Analyze {
        /// Manifest file to analyze
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Treat warnings as failures
        #[arg(long, env = "STRICT_VALIDATION", value_parser = BoolishValueParser::new())]
        strict: bool,
    },

    /// Fill in defaults for missing required fields
    Fix {
        /// Manifest file to fix ("-" reads standard input)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Overwrite the file instead of printing the result
        #[arg(short, long)]
        write: bool,

        /// Namespace for objects that declare none
        #[arg(long, env = "KUBERNETES_NAMESPACE")]
        namespace: Option<String>,
    },

    /// List the built-in validation rules
    Rules {
        /// Output rules as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the effective configuration
    Config,

    /// Report tool health and version
    Health {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// Initialize logging based on verbosity level
    pub fn init_logging(&self) {
        if self.quiet {
            return;
        }

        let level = match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };

        env_logger::Builder::from_default_env()
            .filter_level(level)
            .init();
    }
}
