//! Pocketbook CLI - contact store and users resource management.
//!
//! # Usage
//!
//! ```bash
//! # List contacts in a store file
//! pocketbook contacts list --store data/contacts.json
//!
//! # Add a contact (validated like the web form)
//! pocketbook contacts add -n "Ada Lovelace" -p 905-555-0199 -e ada@example.com
//!
//! # Check the users resource used for login
//! pocketbook users check
//! ```
//!
//! # Commands
//!
//! - `contacts list|show|add|remove` - Manage stored contacts
//! - `users check` - Validate a users resource

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use pocketbook_core::Contact;

mod commands;

#[derive(Parser)]
#[command(name = "pocketbook")]
#[command(author, version, about = "Pocketbook CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage stored contacts
    Contacts {
        /// JSON store file (defaults to `POCKETBOOK_STORE_PATH`)
        #[arg(short, long, global = true)]
        store: Option<PathBuf>,

        #[command(subcommand)]
        action: ContactsAction,
    },
    /// Inspect the users resource
    Users {
        #[command(subcommand)]
        action: UsersAction,
    },
}

#[derive(Subcommand)]
enum ContactsAction {
    /// List every contact
    List,
    /// Show one contact
    Show {
        /// Contact key, e.g. `contact_1700000000000`
        key: String,
    },
    /// Add a contact
    Add {
        /// Full name
        #[arg(short, long)]
        name: String,

        /// Contact number (###-###-####)
        #[arg(short, long)]
        phone: String,

        /// Email address
        #[arg(short, long)]
        email: String,
    },
    /// Remove a contact
    Remove {
        /// Contact key
        key: String,
    },
}

#[derive(Subcommand)]
enum UsersAction {
    /// Load and validate a users resource
    Check {
        /// File path or http(s) URL (defaults to `POCKETBOOK_USERS`)
        path: Option<String>,
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
        Commands::Contacts { store, action } => {
            let path = commands::contacts::store_path(store)?;
            match action {
                ContactsAction::List => {
                    commands::contacts::list(path)?;
                }
                ContactsAction::Show { key } => {
                    commands::contacts::show(path, &key)?;
                }
                ContactsAction::Add { name, phone, email } => {
                    commands::contacts::add(path, &Contact::new(name, phone, email))?;
                }
                ContactsAction::Remove { key } => commands::contacts::remove(path, &key)?,
            }
        }
        Commands::Users { action } => match action {
            UsersAction::Check { path } => {
                commands::users::check(path).await?;
            }
        },
    }
    Ok(())
}
