use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use infludash::export::OutputFormat;

#[derive(Parser)]
#[command(name = "infludash")]
#[command(about = "Command-line admin client for the influencer marketplace API")]
#[command(version)]
pub struct Cli {
    /// Override the API base URL (INFLUDASH_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in as an administrator and store the token
    Login {
        #[arg(short, long)]
        email: String,

        /// Falls back to INFLUDASH_PASSWORD
        #[arg(short, long, env = "INFLUDASH_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Forget the stored token
    Logout,

    /// List one page of a resource
    List {
        /// influencers, clients, brands, projects, client-projects, bids,
        /// payments, kyc, queries, requests
        resource: String,

        /// Parent id for scoped listings (client-projects, bids)
        #[arg(long)]
        parent: Option<String>,

        #[arg(short, long, default_value = "1")]
        page: u32,

        /// Rows per page (defaults to INFLUDASH_PAGE_SIZE)
        #[arg(long)]
        page_size: Option<u32>,

        #[arg(short, long)]
        search: Option<String>,

        /// Filter as key=value, repeatable (e.g. status=pending)
        #[arg(short, long)]
        filter: Vec<String>,

        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show a single record
    Show {
        resource: String,

        id: String,

        #[arg(long)]
        parent: Option<String>,
    },

    /// Run a row action (delete, approve, reject, mark-paid, edit, view)
    Action {
        resource: String,

        action: String,

        id: String,

        #[arg(long)]
        parent: Option<String>,
    },

    /// Platform fee settings
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },

    /// Paid registration configuration
    Registration {
        #[command(subcommand)]
        command: RegistrationCommands,
    },

    /// Deal payments
    Payment {
        #[command(subcommand)]
        command: PaymentCommands,
    },

    /// Create or update a brand
    Brand {
        /// Existing brand id; omit to create a new brand
        #[arg(long)]
        id: Option<String>,

        #[arg(long)]
        name: String,

        #[arg(long, default_value = "")]
        description: String,

        #[arg(long, default_value = "")]
        logo_url: String,

        #[arg(long, default_value = "")]
        website: String,
    },

    /// Reset a user's password
    Password {
        /// User id
        #[arg(long)]
        user: String,

        #[arg(long, env = "INFLUDASH_NEW_PASSWORD", hide_env_values = true)]
        password: String,

        #[arg(long, env = "INFLUDASH_CONFIRM_PASSWORD", hide_env_values = true)]
        confirm: String,
    },

    /// Analytics overview
    Stats,
}

#[derive(Subcommand)]
pub enum SettingsCommands {
    Show,
    Set {
        #[arg(long, default_value = "")]
        vendor_commission: String,

        #[arg(long, default_value = "")]
        platform_fee: String,

        #[arg(long, default_value = "")]
        gst: String,

        #[arg(long, default_value = "")]
        delivery_fee: String,
    },
}

#[derive(Subcommand)]
pub enum RegistrationCommands {
    Show,
    Set {
        #[arg(long)]
        enabled: bool,

        /// Fee in INR
        #[arg(long, default_value = "")]
        amount: String,
    },
}

#[derive(Subcommand)]
pub enum PaymentCommands {
    /// Create a payment for a project
    Create {
        #[arg(long)]
        influencer: String,

        #[arg(long)]
        client: String,

        #[arg(long)]
        project: String,

        #[arg(long)]
        amount: String,

        #[arg(long, default_value = "INR")]
        currency: String,

        #[arg(long, default_value = "")]
        notes: String,
    },

    /// Record a transaction against a payment
    Transaction {
        /// Payment id
        #[arg(long)]
        id: String,

        #[arg(long)]
        amount: String,

        #[arg(long, default_value = "")]
        note: String,

        #[arg(long, default_value = "")]
        reference: String,
    },

    /// Find influencers, clients or projects by name
    Lookup {
        #[arg(value_enum)]
        kind: LookupArg,

        #[arg(default_value = "")]
        term: String,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LookupArg {
    Influencer,
    Client,
    Project,
}

/// Split `key=value` filter arguments
pub fn parse_filters(raw: &[String]) -> anyhow::Result<Vec<(String, String)>> {
    raw.iter()
        .map(|item| {
            item.split_once('=')
                .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
                .filter(|(k, _)| !k.is_empty())
                .ok_or_else(|| anyhow::anyhow!("Invalid filter '{}', expected key=value", item))
        })
        .collect()
}
