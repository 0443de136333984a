use clap::builder::TypedValueParser as _;
use clap::Parser;
use dotenvy::{dotenv, dotenv_override};
use log::LevelFilter;
use std::fmt;
use std::str::FromStr;
use webhook_auth::webhook::DEFAULT_REPLAY_WINDOW_SECS;

/// Header the scheduling service places its `t=<ts>, v1=<hex>` signature in.
pub const DEFAULT_SIGNATURE_HEADER: &str = "x-booking-signature";

/// Upper bound on inbound webhook bodies.
pub const DEFAULT_MAX_BODY_BYTES: usize = 256 * 1024;

#[derive(Clone, Debug, PartialEq)]
pub enum RustEnv {
    Development,
    Production,
    Staging,
}

#[derive(Debug, PartialEq, Eq)]
pub struct RustEnvParseError;

impl FromStr for RustEnv {
    type Err = RustEnvParseError;
    fn from_str(level: &str) -> Result<RustEnv, Self::Err> {
        match level.to_lowercase().as_str() {
            "development" => Ok(RustEnv::Development),
            "production" => Ok(RustEnv::Production),
            "staging" => Ok(RustEnv::Staging),
            _ => Err(RustEnvParseError),
        }
    }
}

impl fmt::Display for RustEnv {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RustEnv::Development => write!(f, "development"),
            RustEnv::Production => write!(f, "production"),
            RustEnv::Staging => write!(f, "staging"),
        }
    }
}

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// The shared secret the scheduling service signs webhook deliveries with.
    #[arg(long, env, hide_env_values = true)]
    signing_secret: Option<String>,

    /// The Slack incoming webhook URL that booking notifications are forwarded to.
    #[arg(long, env, hide_env_values = true)]
    slack_webhook_url: Option<String>,

    /// Name of the request header carrying the webhook signature.
    #[arg(long, env, default_value = DEFAULT_SIGNATURE_HEADER)]
    pub signature_header: String,

    /// Maximum age (or future skew) in seconds of a signature timestamp.
    #[arg(long, env, default_value_t = DEFAULT_REPLAY_WINDOW_SECS)]
    pub replay_window_secs: u64,

    /// Inbound request bodies larger than this many bytes are rejected.
    #[arg(long, env, default_value_t = DEFAULT_MAX_BODY_BYTES)]
    pub max_body_bytes: usize,

    /// The host interface to listen for incoming connections
    #[arg(short, long, env, default_value = "127.0.0.1")]
    pub interface: Option<String>,

    /// The host TCP port to listen for incoming connections
    #[arg(short, long, env, default_value_t = 4000)]
    pub port: u16,

    /// Set the log level verbosity threshold (level) to control what gets displayed on console output
    #[arg(
        short,
        long,
        env,
        default_value_t = LevelFilter::Info,
        value_parser = clap::builder::PossibleValuesParser::new(["OFF", "ERROR", "WARN", "INFO", "DEBUG", "TRACE"])
            .map(|s| s.parse::<LevelFilter>().unwrap()),
        )]
    pub log_level_filter: LevelFilter,

    /// Set the Rust runtime environment to use.
    #[arg(
    short,
    long,
    env,
    default_value_t = RustEnv::Development,
    value_parser = clap::builder::PossibleValuesParser::new([
        "DEVELOPMENT", "PRODUCTION", "STAGING",
        "development", "production", "staging"
    ])
        .map(|s| s.parse::<RustEnv>().unwrap()),
    )]
    pub runtime_env: RustEnv,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        // Load .env file first
        dotenv().ok();
        // Then parse the command line parameters and flags
        Config::parse()
    }

    /// Re-reads `.env` (overriding inherited values) and the process environment
    /// without consulting argv.
    ///
    /// Used when settings are refreshed at runtime, where the original command
    /// line flags are no longer the source of truth.
    pub fn from_env() -> Self {
        dotenv_override().ok();
        Config::parse_from([env!("CARGO_PKG_NAME")])
    }

    pub fn signing_secret(&self) -> Option<String> {
        self.signing_secret.clone()
    }

    pub fn slack_webhook_url(&self) -> Option<String> {
        self.slack_webhook_url.clone()
    }

    pub fn is_production(&self) -> bool {
        self.runtime_env == RustEnv::Production
    }
}
