//! Football Shop CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations (schema + session table)
//! fs-cli migrate
//!
//! # Load the demo catalog and make sure an admin exists
//! fs-cli seed --file crates/cli/seed/catalog.yaml \
//!     --admin-email admin@footballshop.local --admin-password '...'
//!
//! # Validate a seed file without touching the database
//! fs-cli seed --file catalog.yaml --check
//!
//! # Create an admin user, or promote an existing one
//! fs-cli admin create -e admin@example.com -p '...' -n "Shop Admin"
//! fs-cli admin promote -e user@example.com
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` - `PostgreSQL` connection string (read from `.env` too)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "fs-cli")]
#[command(author, version, about = "Football Shop CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Load categories and products from a YAML file
    Seed {
        /// Path to the catalog file
        #[arg(short, long, default_value = "crates/cli/seed/catalog.yaml")]
        file: PathBuf,

        /// Also create or promote this admin user
        #[arg(long, requires = "admin_password")]
        admin_email: Option<String>,

        /// Password for the seeded admin
        #[arg(long, requires = "admin_email")]
        admin_password: Option<String>,

        /// Only validate the file
        #[arg(long)]
        check: bool,
    },
    /// Manage admin users
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create an admin user (an existing user is promoted and gets the new password)
    Create {
        /// Admin email address
        #[arg(short, long)]
        email: String,

        /// Admin password
        #[arg(short, long)]
        password: String,

        /// Admin display name
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Grant admin rights to an existing user
    Promote {
        /// User email address
        #[arg(short, long)]
        email: String,
    },
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
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed {
            file,
            admin_email,
            admin_password,
            check,
        } => {
            let admin = admin_email
                .zip(admin_password)
                .map(|(email, password)| commands::seed::AdminSeed { email, password });
            commands::seed::catalog(&file, admin.as_ref(), check).await?;
        }
        Commands::Admin { action } => match action {
            AdminAction::Create {
                email,
                password,
                name,
            } => {
                commands::admin::create_user(&email, &password, name.as_deref()).await?;
            }
            AdminAction::Promote { email } => commands::admin::promote(&email).await?,
        },
    }
    Ok(())
}
