use anyhow::{Context, Result};
use clap::Parser;
use std::{env, path::PathBuf};

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub seed_file: Option<PathBuf>,
    pub require_if_match: bool,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug, Default)]
#[command(author, version, about = "Collection marketing details API")]
pub struct Args {
    /// Host to bind to (overrides COLLECTION_DETAILS_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides COLLECTION_DETAILS_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Database URL (overrides COLLECTION_DETAILS_DATABASE_URL)
    #[arg(long)]
    pub database_url: Option<String>,

    /// JSON file with collections to insert at start-up (overrides COLLECTION_DETAILS_SEED_FILE)
    #[arg(long)]
    pub seed: Option<PathBuf>,

    /// Reject detail writes without an If-Match version (or set COLLECTION_DETAILS_REQUIRE_IF_MATCH)
    #[arg(long)]
    pub require_if_match: bool,

    /// Run migrations and exit
    #[arg(long)]
    pub migrate: bool,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig and migrate flag.
    pub fn from_env_and_args() -> Result<(Self, bool)> {
        // Parse CLI once
        let args = Args::parse();
        let migrate = args.migrate;
        Ok((Self::merge(args, |key| env::var(key))?, migrate))
    }

    /// CLI wins over environment, environment wins over defaults.
    fn merge(
        args: Args,
        var: impl Fn(&str) -> Result<String, env::VarError>,
    ) -> Result<Self> {
        // --- Environment fallback ---
        let env_host = var("COLLECTION_DETAILS_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let env_port = match var("COLLECTION_DETAILS_PORT") {
            Ok(value) => value
                .parse::<u16>()
                .with_context(|| format!("parsing COLLECTION_DETAILS_PORT value `{}`", value))?,
            Err(env::VarError::NotPresent) => 9000,
            Err(err) => return Err(err).context("reading COLLECTION_DETAILS_PORT"),
        };
        let env_db = var("COLLECTION_DETAILS_DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://./data/collection_details.db".into());
        let env_seed = var("COLLECTION_DETAILS_SEED_FILE").ok().map(PathBuf::from);
        let env_require_if_match = match var("COLLECTION_DETAILS_REQUIRE_IF_MATCH") {
            Ok(value) => parse_flag(&value).with_context(|| {
                format!("parsing COLLECTION_DETAILS_REQUIRE_IF_MATCH value `{}`", value)
            })?,
            Err(_) => false,
        };

        // --- Merge ---
        Ok(Self {
            host: args.host.unwrap_or(env_host),
            port: args.port.unwrap_or(env_port),
            database_url: args.database_url.unwrap_or(env_db),
            seed_file: args.seed.or(env_seed),
            require_if_match: args.require_if_match || env_require_if_match,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => anyhow::bail!("expected a boolean, got `{}`", other),
    }
}
