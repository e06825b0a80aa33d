use clap::{Parser, Subcommand};
use std::path::PathBuf;
use wormhole_core::{ShortCode, DEFAULT_API_BASE_URL, DEFAULT_REDIRECT_BASE_URL};

pub const API_BASE_URL_ENV: &str = "WORMHOLE_API_BASE_URL";
pub const REDIRECT_BASE_URL_ENV: &str = "WORMHOLE_REDIRECT_BASE_URL";
pub const DATA_DIR_ENV: &str = "WORMHOLE_DATA_DIR";
pub const TIMEOUT_SECS_ENV: &str = "WORMHOLE_TIMEOUT_SECS";

pub const DEFAULT_DATA_DIR: &str = ".wormhole";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Parser)]
#[command(name = "wormhole", about = "Create and manage short URLs")]
pub struct CLI {
    #[arg(long, env = API_BASE_URL_ENV, default_value = DEFAULT_API_BASE_URL)]
    pub api_base_url: String,

    #[arg(long, env = REDIRECT_BASE_URL_ENV, default_value = DEFAULT_REDIRECT_BASE_URL)]
    pub redirect_base_url: String,

    /// Directory holding the local cache of created short URLs.
    #[arg(long, env = DATA_DIR_ENV, default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    #[arg(long, env = TIMEOUT_SECS_ENV, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum Command {
    /// Shorten a URL and remember it locally
    Shorten { url: String },
    /// List remembered short URLs
    List {
        /// Only show entries whose code or URL contains this text
        #[arg(long)]
        filter: Option<String>,
    },
    /// Show access statistics for a short code
    Stats {
        #[arg(value_parser = parse_code)]
        code: ShortCode,
    },
    /// Point a remembered short code at a new URL
    Update {
        #[arg(value_parser = parse_code)]
        code: ShortCode,
        url: String,
    },
    /// Delete a short code
    Delete {
        #[arg(value_parser = parse_code)]
        code: ShortCode,
    },
    /// Search remembered entries and look the query up as a short code
    Search { query: String },
    /// Print the redirect URL for a short code
    Open {
        #[arg(value_parser = parse_code)]
        code: ShortCode,
    },
    /// Copy a short code to the clipboard
    Copy {
        #[arg(value_parser = parse_code)]
        code: ShortCode,
        /// Copy the full redirect URL instead of the bare code
        #[arg(long)]
        full: bool,
    },
}

fn parse_code(raw: &str) -> Result<ShortCode, String> {
    ShortCode::new(raw).map_err(|e| e.to_string())
}
