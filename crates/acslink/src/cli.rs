//! Clap derive structures for the `acslink` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// acslink -- subscriber Wi-Fi provisioning through a TR-069 ACS
#[derive(Debug, Parser)]
#[command(
    name = "acslink",
    version,
    about = "Read and change subscriber Wi-Fi settings through a TR-069 ACS",
    long_about = "Resolves a subscriber's hardware MAC address to the CPE managed by a\n\
        TR-069 Auto Configuration Server, reads its Wi-Fi configuration and\n\
        connected stations, and queues SSID/passphrase changes as ACS tasks.",
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
    /// ACS profile to use
    #[arg(long, short = 'p', env = "ACSLINK_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "ACSLINK_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// ACS NBI URL (overrides profile)
    #[arg(long, env = "ACSLINK_URL", global = true)]
    pub url: Option<String>,

    /// Basic-auth username (overrides profile)
    #[arg(long, short = 'u', env = "ACSLINK_USERNAME", global = true)]
    pub username: Option<String>,

    /// Output format (falls back to `output` in the config `[defaults]`, then table)
    #[arg(
        long = "output",
        short = 'o',
        env = "ACSLINK_OUTPUT",
        value_name = "FORMAT",
        global = true
    )]
    pub output_arg: Option<OutputFormat>,

    /// Effective format, settled once the config file is read.
    #[arg(skip)]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "ACSLINK_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "ACSLINK_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output Enum ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Read and change a subscriber's Wi-Fi settings
    #[command(alias = "w")]
    Wifi(WifiArgs),

    /// Inspect how a MAC resolves to a managed device
    #[command(alias = "dev", alias = "d")]
    Devices(DevicesArgs),

    /// List the vendor models with known parameter layouts
    Vendors,

    /// Check that the ACS is reachable and count its devices
    Check,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Wi-Fi ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct WifiArgs {
    #[command(subcommand)]
    pub command: WifiCommand,
}

#[derive(Debug, Subcommand)]
pub enum WifiCommand {
    /// Show SSID and passphrase per band
    Show {
        /// Subscriber hardware MAC address
        mac: String,
    },

    /// List stations connected to the subscriber's CPE
    #[command(alias = "clients")]
    Stations {
        /// Subscriber hardware MAC address
        mac: String,
    },

    /// Change the SSID of the primary band
    SetSsid {
        /// Subscriber hardware MAC address
        mac: String,
        /// New network name (1-32 bytes)
        ssid: String,
    },

    /// Change the passphrase of the primary band
    SetPassphrase {
        /// Subscriber hardware MAC address
        mac: String,
        /// New passphrase (8-63 characters); prompted for when omitted
        passphrase: Option<String>,
    },
}

// ── Devices ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DevicesArgs {
    #[command(subcommand)]
    pub command: DevicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// Resolve a MAC to its ACS device id, model, and last inform
    Resolve {
        /// Subscriber hardware MAC address
        mac: String,
    },

    /// Set the CPE's periodic inform interval and wait for it to settle
    InformInterval {
        /// Subscriber hardware MAC address
        mac: String,
        /// Interval in seconds
        seconds: u32,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
