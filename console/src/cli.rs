//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use issuer_types::{IssuerId, LicenseDataField, ProductId};

#[derive(Parser, Debug)]
#[command(name = "issuer-console")]
#[command(about = "Manage license issuers, licenses, sessions and products")]
#[command(version)]
pub struct Cli {
    /// Base URL of the license issuing API
    #[arg(long, env = "ISSUER_API_URL", default_value = "http://localhost:8080", global = true)]
    pub base_url: String,

    /// File holding the saved credential [default: platform data dir]
    #[arg(long, env = "ISSUER_STATE_FILE", global = true)]
    pub state_file: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, default_value = "60", global = true)]
    pub timeout: u64,

    /// Enable verbose debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in and save the credential
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long, env = "ISSUER_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the saved credential
    Logout,
    /// Show who the saved credential belongs to
    Whoami,
    /// License issuers
    Issuers {
        #[command(subcommand)]
        action: IssuerAction,
    },
    /// Licenses of an issuer
    Licenses {
        /// Issuer to act on [default: the logged-in issuer]
        #[arg(long)]
        issuer: Option<IssuerId>,
        #[command(subcommand)]
        action: LicenseAction,
    },
    /// Sessions of a license
    Sessions {
        /// Issuer to act on [default: the logged-in issuer]
        #[arg(long)]
        issuer: Option<IssuerId>,
        #[command(subcommand)]
        action: SessionAction,
    },
    /// Products of an issuer
    Products {
        /// Issuer to act on [default: the logged-in issuer]
        #[arg(long)]
        issuer: Option<IssuerId>,
        #[command(subcommand)]
        action: ProductAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum IssuerAction {
    List,
    Get {
        id: IssuerId,
    },
    Create {
        #[arg(long)]
        username: String,
        #[arg(long, env = "ISSUER_NEW_PASSWORD", hide_env_values = true)]
        password: String,
        /// Repeat of --password [default: same as --password]
        #[arg(long)]
        confirm: Option<String>,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long, default_value = "1")]
        max_licenses: i64,
        /// Create the issuer disabled
        #[arg(long)]
        inactive: bool,
    },
    Update {
        id: IssuerId,
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        max_licenses: Option<i64>,
        #[arg(long)]
        active: Option<bool>,
    },
    Delete {
        id: IssuerId,
    },
}

/// License inputs shared by create and update.
#[derive(Args, Debug, Default)]
pub struct LicenseInput {
    #[arg(long)]
    pub product: Option<ProductId>,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub note: Option<String>,
    /// Tags as `a; b; c`
    #[arg(long)]
    pub tags: Option<String>,
    /// Data field as FIELD=VALUE; repeat for more fields
    #[arg(long = "data", value_parser = parse_data_field)]
    pub data: Vec<LicenseDataField>,
    #[arg(long)]
    pub max_sessions: Option<i64>,
    /// Expiry as YYYY-MM-DDTHH:MM (local time), YYYY-MM-DD or RFC 3339
    #[arg(long, conflicts_with = "no_expiry")]
    pub valid_until: Option<String>,
    /// The license never expires
    #[arg(long)]
    pub no_expiry: bool,
}

#[derive(Subcommand, Debug)]
pub enum LicenseAction {
    List,
    Get {
        id: String,
    },
    Create {
        #[command(flatten)]
        input: LicenseInput,
    },
    Update {
        id: String,
        #[command(flatten)]
        input: LicenseInput,
    },
    Delete {
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum SessionAction {
    List {
        license: String,
    },
    Get {
        license: String,
        session: String,
    },
    /// Revoke an active session
    Revoke {
        license: String,
        session: String,
    },
}

/// Product inputs shared by create and update.
#[derive(Args, Debug, Default)]
pub struct ProductInput {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub contact_email: Option<String>,
    #[arg(long)]
    pub data: Option<String>,
    #[arg(long)]
    pub active: Option<bool>,
}

#[derive(Subcommand, Debug)]
pub enum ProductAction {
    List,
    Get {
        id: ProductId,
    },
    Create {
        #[command(flatten)]
        input: ProductInput,
    },
    Update {
        id: ProductId,
        #[command(flatten)]
        input: ProductInput,
    },
    Delete {
        id: ProductId,
    },
}

/// Parses a `FIELD=VALUE` argument. The value may contain `=`.
pub fn parse_data_field(s: &str) -> Result<LicenseDataField, String> {
    let (field, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got {s:?}"))?;
    Ok(LicenseDataField::new(field.trim(), value))
}
