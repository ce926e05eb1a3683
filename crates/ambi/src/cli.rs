//! Clap derive structures for the `ambi` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use ambi_core::{FanSpeedProfile, ReadMode};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// ambi -- bridge Ambi Climate devices to an accessory host
#[derive(Debug, Parser)]
#[command(
    name = "ambi",
    version,
    about = "Bridge Ambi Climate air-conditioner controllers from the command line",
    long_about = "Runs the Ambi Climate device-state bridge and exposes one-shot\n\
        commands for checking and controlling configured devices.",
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
    /// Config file (defaults to the platform config directory)
    #[arg(long, short = 'c', env = "AMBI_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "AMBI_OUTPUT",
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

    /// Request timeout in seconds (overrides the config file)
    #[arg(long, env = "AMBI_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
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

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the bridge until interrupted
    Run(RunArgs),

    /// Show the latest reported state of every online device
    #[command(alias = "st")]
    Status,

    /// Power a device on (comfort mode) or off
    Switch {
        /// Device name, "<location> <room>"
        device: String,

        /// Desired power state
        state: PowerState,
    },

    /// Hold a device at a target temperature
    #[command(alias = "temp")]
    Temperature {
        /// Device name, "<location> <room>"
        device: String,

        /// Target temperature in °C
        value: f64,
    },

    /// Send comfort feedback for a device
    Feedback {
        /// Device name, "<location> <room>"
        device: String,

        /// too_hot, too_warm, bit_warm, comfortable, bit_cold, too_cold or
        /// freezing; anything else is sent as comfortable
        value: String,
    },

    /// Manage the configuration file
    Config(ConfigArgs),
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PowerState {
    On,
    Off,
}

impl PowerState {
    pub fn is_on(self) -> bool {
        matches!(self, Self::On)
    }
}

// ── Run ──────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Read strategy: cached or direct (overrides the config file)
    #[arg(long)]
    pub read_mode: Option<ReadMode>,

    /// Fan speed table: quiet-slowest or low-slowest
    #[arg(long)]
    pub fan_speed_profile: Option<FanSpeedProfile>,

    /// Poll period in seconds; 0 disables polling
    #[arg(long)]
    pub poll_interval: Option<u64>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Write a starter config file
    Init {
        /// Account email
        #[arg(long)]
        email: String,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Display the resolved configuration (password redacted)
    Show,

    /// Print the config file path
    Path,

    /// Set a configuration value
    Set {
        /// Config key, e.g. "account.email" or "bridge.read_mode"
        key: String,

        /// Value to set
        value: String,
    },

    /// Add a device to expose
    AddDevice {
        /// Location name as shown in the Ambi app
        location: String,

        /// Room name as shown in the Ambi app
        room: String,

        /// Also expose a heater/cooler facet
        #[arg(long)]
        heater_cooler: bool,

        /// Also expose the comfort-feedback switches
        #[arg(long)]
        feedback: bool,
    },

    /// Store the account password in the system keyring (read from stdin)
    SetPassword,
}
