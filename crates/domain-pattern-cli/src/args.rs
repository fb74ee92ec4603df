use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use domain_pattern_core::SymbolAlphabet;

#[derive(Parser)]
#[command(name = "domain-pattern")]
#[command(about = "Group domain lists into files by label character pattern")]
#[command(version)]
pub struct Cli {
    /// Verbose output (debug logging to stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet output (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Base directory for discovery and config (default: $DOMAIN_PATTERN_BASE or current directory)
    #[arg(long, global = true)]
    pub base_dir: Option<PathBuf>,

    /// Symbol alphabet for patterns (overrides config)
    #[arg(long, global = true, value_enum)]
    pub alphabet: Option<AlphabetArg>,

    /// Remove stale bucket files from output directories before writing
    #[arg(long, global = true)]
    pub clean: bool,

    /// Print reports as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Input domain list (requires --output)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output directory (requires --input)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also group the input by its status column into <output>/by-status
    #[arg(long)]
    pub by_status: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum AlphabetArg {
    /// A, B, ... continuing past Z by code point
    Literal,
    /// A-Z, a-z, 0-9
    Alphanumeric,
}

impl From<AlphabetArg> for SymbolAlphabet {
    fn from(arg: AlphabetArg) -> Self {
        match arg {
            AlphabetArg::Literal => SymbolAlphabet::Literal,
            AlphabetArg::Alphanumeric => SymbolAlphabet::Alphanumeric,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the pattern of each domain label
    Pattern {
        /// Domains or bare labels (e.g., google.com, abab)
        #[arg(required = true)]
        domains: Vec<String>,
    },

    /// Group a status-tagged list by status only
    Status {
        /// Input list (`<domain> <STATUS> [reason...]` per line)
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory (files go to <output>/by-status)
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g., pattern.alphabet)
        key: String,
    },

    /// Set a config value
    Set {
        /// Config key (e.g., discovery.output_dir)
        key: String,

        /// Value to set
        value: String,
    },

    /// List all config values
    List,

    /// Show config file path
    Path,

    /// Initialize config file with defaults
    Init,
}
