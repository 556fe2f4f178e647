//! Wellnest CLI - Database migrations and admin account management.
//!
//! # Usage
//!
//! ```bash
//! # Run storefront database migrations
//! wn-cli migrate storefront
//!
//! # Run admin database migrations
//! wn-cli migrate admin
//!
//! # Run all database migrations
//! wn-cli migrate all
//!
//! # Create admin user
//! wn-cli admin create -e admin@wellnest.health -n "Admin Name" -r super_admin
//!
//! # List admin users
//! wn-cli admin list
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "wn-cli")]
#[command(author, version, about = "Wellnest CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate {
        #[command(subcommand)]
        target: MigrateTarget,
    },
    /// Manage admin users
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum MigrateTarget {
    /// Run storefront (`shop` schema) migrations
    Storefront,
    /// Run admin (`admin` schema) migrations
    Admin,
    /// Run all database migrations
    All,
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new admin user
    Create {
        /// Admin email address
        #[arg(short, long)]
        email: String,

        /// Admin display name
        #[arg(short, long)]
        name: String,

        /// Admin role (`super_admin`, `admin`, `operator`)
        #[arg(short, long, default_value = "admin")]
        role: String,

        /// Explicit permission scope; repeat for several. Omit to use the role default.
        #[arg(short, long = "scope")]
        scopes: Vec<String>,
    },
    /// List admin users
    List,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate { target } => match target {
            MigrateTarget::Storefront => commands::migrate::storefront().await?,
            MigrateTarget::Admin => commands::migrate::admin().await?,
            MigrateTarget::All => {
                commands::migrate::storefront().await?;
                commands::migrate::admin().await?;
            }
        },
        Commands::Admin { action } => match action {
            AdminAction::Create {
                email,
                name,
                role,
                scopes,
            } => {
                commands::admin::create_user(&email, &name, &role, &scopes).await?;
            }
            AdminAction::List => commands::admin::list_users().await?,
        },
    }
    Ok(())
}
