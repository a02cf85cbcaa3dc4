// src/cli/mod.rs — CLI definition (clap derive)

pub mod backend;
pub mod login;
pub mod plans;
pub mod status;
pub mod upgrade;
pub mod usage;

use clap::{Parser, Subcommand};

use crate::api::types::{PaymentMethod, Period};

#[derive(Parser)]
#[command(
    name = "proxydash",
    about = "Dashboard for your Claude-relay subscription",
    version
)]
pub struct Cli {
    /// Storage directory override (defaults to ~/.proxydash)
    #[arg(long)]
    pub home: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in with your phone number and an SMS code
    Login {
        /// Phone number — prompted interactively if omitted
        #[arg(long)]
        phone: Option<String>,
    },
    /// Log out and clear the stored session
    Logout,
    /// Show account, subscription, and usage overview
    Status,
    /// List available subscription plans
    Plans,
    /// Show per-model usage for a reporting period
    Usage {
        #[arg(long, value_enum, default_value_t = Period::Daily)]
        period: Period,
    },
    /// Create a payment order for a plan upgrade
    Upgrade {
        /// Plan id (see `proxydash plans`)
        #[arg(long)]
        plan: i64,
        #[arg(long, value_enum, default_value_t = PaymentMethod::Alipay)]
        method: PaymentMethod,
    },
    /// Show or change the backend origin
    Backend {
        /// New origin, e.g. https://relay.example.com — omit to show current
        url: Option<String>,
    },
}
