//! Clap derive structures for the `idatlas` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// idatlas: explore digital-identity scheme support per country
#[derive(Debug, Parser)]
#[command(
    name = "idatlas",
    version,
    about = "Explore which digital-identity schemes are supported per country",
    long_about = "Filters the identity-scheme dataset along assurance level, scheme type,\n\
        region, and first-issuance year, and renders the derived views:\n\
        region-grouped country lists, per-country detail, and coverage counts.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Configuration file (defaults to the platform config path)
    #[arg(long, env = "IDATLAS_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding schemes.json, countries.json, and years.json
    /// (overrides the configured data locations)
    #[arg(long, short = 'd', env = "IDATLAS_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "IDATLAS_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Shared filter flags ──────────────────────────────────────────────

/// The four filter dimensions, shared by every query command. Omitting a
/// flag leaves its dimension unrestricted.
#[derive(Debug, Args, Default)]
pub struct FilterOpts {
    /// Assurance level to include (repeatable; OR semantics)
    #[arg(long = "loa", value_name = "LEVEL")]
    pub levels: Vec<u8>,

    /// Scheme type code to include (repeatable; OR semantics)
    #[arg(long = "type", value_name = "CODE")]
    pub type_codes: Vec<u32>,

    /// Region label to include (repeatable; OR semantics)
    #[arg(long = "region", value_name = "REGION")]
    pub regions: Vec<String>,

    /// Inclusive first-issuance year cutoff
    #[arg(long = "year", value_name = "YEAR")]
    pub year: Option<u16>,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Region-grouped country list under the active filters
    #[command(alias = "c")]
    Countries(CountriesArgs),

    /// Identity schemes matching the active filters
    #[command(alias = "s")]
    Schemes(SchemesArgs),

    /// Per-country detail: every matching scheme with its properties
    Detail(DetailArgs),

    /// Count of (scheme, country) support pairs under the active filters
    Coverage(CoverageArgs),

    /// Known first-issuance years and scheme counts per year
    Years,

    /// Inspect or create the configuration file
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Write a config file populated with the built-in defaults
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Display the resolved configuration (defaults, file, environment)
    Show,

    /// Print the configuration file path
    Path,
}

#[derive(Debug, Args)]
pub struct CountriesArgs {
    #[command(flatten)]
    pub filter: FilterOpts,
}

#[derive(Debug, Args)]
pub struct SchemesArgs {
    #[command(flatten)]
    pub filter: FilterOpts,
}

#[derive(Debug, Args)]
pub struct DetailArgs {
    /// ISO alpha-2 country code (case-insensitive)
    pub code: String,

    #[command(flatten)]
    pub filter: FilterOpts,
}

#[derive(Debug, Args)]
pub struct CoverageArgs {
    #[command(flatten)]
    pub filter: FilterOpts,
}
