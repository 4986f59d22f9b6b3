//! Vivaha CLI - operator front end for the bureau back office.
//!
//! # Usage
//!
//! ```bash
//! # List customers, optionally filtered to a named view
//! vivaha customers list --view payment-approval --search nair
//!
//! # Show one customer's tracks with resolved labels
//! vivaha customers show VB-1041
//!
//! # Edit one track field and save (diff-and-persist)
//! vivaha customers set VB-1041 --track payment --field payment_status --value 2
//!
//! # Attach a receipt (multipart submit)
//! vivaha customers set VB-1041 --track payment --field payment_receipt --file ./receipt.png
//!
//! # Reassign a customer to another employee
//! vivaha assign VB-1041 e-22
//!
//! # Inspect lookup tables
//! vivaha lookups payment-status admin-approval
//! ```
//!
//! # Commands
//!
//! - `customers list|show|set` - roster views and per-track editing
//! - `assign` - reassign a customer to an employee
//! - `lookups` - dump loaded lookup tables

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "vivaha")]
#[command(author, version, about = "Vivaha back-office CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse and edit customers
    Customers {
        #[command(subcommand)]
        action: CustomersAction,
    },
    /// Reassign a customer to a different employee
    Assign {
        /// Customer user id
        customer: String,
        /// Employee user id taking ownership
        employee: String,
    },
    /// Show lookup tables (all of them when no names are given)
    Lookups {
        /// Table names, e.g. `payment-status`
        names: Vec<String>,
    },
}

#[derive(Subcommand)]
enum CustomersAction {
    /// List customers with their composite badges
    List {
        /// Named view: `all`, `mine`, `my-employees-requests`,
        /// `payment-approval`, `no-action`
        #[arg(short, long)]
        view: Option<String>,

        /// Case-insensitive search over id and name
        #[arg(short, long)]
        search: Option<String>,

        /// Page number, starting at 0
        #[arg(short, long, default_value_t = 0)]
        page: usize,

        /// Rows per page
        #[arg(long, default_value_t = 20)]
        per_page: usize,

        /// Persist this view/search as the session filter state
        #[arg(long)]
        remember: bool,
    },
    /// Show one customer's tracks with resolved labels
    Show {
        /// Customer user id
        user_id: String,
    },
    /// Edit one field of one track and save
    Set {
        /// Customer user id
        user_id: String,

        /// Track: `payment`, `agreement`, `settlement`
        #[arg(short, long)]
        track: String,

        /// Field name, e.g. `payment_status`
        #[arg(short, long)]
        field: String,

        /// New value (option id, amount, date, `true`/`false`, or text)
        #[arg(short, long)]
        value: Option<String>,

        /// File to upload for a file field
        #[arg(long)]
        file: Option<PathBuf>,

        /// Clear the field instead of setting a value
        #[arg(long)]
        clear: bool,
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
        Commands::Customers { action } => match action {
            CustomersAction::List {
                view,
                search,
                page,
                per_page,
                remember,
            } => {
                commands::customers::list(view.as_deref(), search, page, per_page, remember)
                    .await?;
            }
            CustomersAction::Show { user_id } => {
                commands::customers::show(&user_id).await?;
            }
            CustomersAction::Set {
                user_id,
                track,
                field,
                value,
                file,
                clear,
            } => {
                let new_value = commands::customers::NewValue {
                    value,
                    file,
                    clear,
                };
                commands::customers::set(&user_id, &track, &field, new_value).await?;
            }
        },
        Commands::Assign { customer, employee } => {
            commands::assign::run(&customer, &employee).await?;
        }
        Commands::Lookups { names } => {
            commands::lookups::run(&names).await?;
        }
    }
    Ok(())
}
