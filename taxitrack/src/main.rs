//! TaxiTrack command-line entry point.

use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use taxitrack::config::TaxitrackConfig;
use taxitrack::models::{PaymentForm, PaymentMethod, ProjectStatus};
use taxitrack::services::catalog::{self, PriceBookFilter};
use taxitrack::services::{
    get_metrics, init_metrics, reports, DataStore, FileSnapshotStore, SheetsClient,
};
use taxitrack_core::observability::init_tracing;

#[derive(Parser)]
#[command(name = "taxitrack")]
#[command(about = "Customers, estimates, invoices and projects for a taxidermy shop")]
#[command(version)]
struct Cli {
    /// Spreadsheet endpoint URL (overrides configuration and the stored URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show connection state, record counts and unsynced records
    Status,

    /// Fetch the full dataset and replace the local snapshot
    Refresh,

    /// Check that the endpoint answers and whether the sheet needs setup
    TestConnection,

    /// Create the sheet tabs and seed lookup tables
    Setup,

    /// Remember an endpoint URL for later runs
    SetUrl { url: String },

    /// Forget the stored endpoint URL
    ClearUrl,

    /// Dashboard figures: active work, balances, stale projects
    Summary,

    /// Search customers by name or phone
    Customers {
        #[arg(default_value = "")]
        query: String,
    },

    /// Active services grouped by species
    PriceBook {
        #[arg(long, default_value = "")]
        search: String,

        #[arg(long)]
        category: Option<String>,
    },

    /// Convert an estimate into an invoice and projects
    Convert { estimate_id: String },

    /// Record a payment against an invoice
    Pay {
        invoice_id: String,

        amount: Decimal,

        #[arg(long, default_value = "Cash")]
        method: PaymentMethod,

        /// Payment date (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<NaiveDate>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Change the status of one project
    ProjectStatus {
        project_id: String,

        /// e.g. "In Progress", "at-tannery", "Ready for Pickup"
        status: ProjectStatus,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Send projects to a tannery
    Tannery {
        #[arg(required = true)]
        project_ids: Vec<String>,

        #[arg(long)]
        tannery: String,

        /// Date sent (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<NaiveDate>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Print Prometheus metrics gathered during this run
    Metrics,
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = TaxitrackConfig::from_env().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;
    if cli.api_url.is_some() {
        config.common.api_url = cli.api_url.clone();
    }

    init_tracing(&config.service_name, &config.log_level, config.log_format);
    init_metrics();

    tracing::debug!(
        version = %config.service_version,
        cache = %config.common.cache_path.display(),
        "Starting taxitrack"
    );

    match &cli.command {
        Commands::SetUrl { url } => {
            config.stored_endpoint().set(url)?;
            println!("Stored endpoint: {}", url.trim());
            return Ok(());
        }
        Commands::ClearUrl => {
            config.stored_endpoint().clear()?;
            println!("Stored endpoint cleared");
            return Ok(());
        }
        Commands::Metrics => {
            print!("{}", get_metrics());
            return Ok(());
        }
        _ => {}
    }

    let client = SheetsClient::new(config.endpoint());
    let configured = client.is_configured();
    if !configured {
        tracing::warn!("No API URL configured, working from the local snapshot only");
    }

    let mut store = DataStore::open(
        Arc::new(client),
        Arc::new(FileSnapshotStore::new(&config.common.cache_path)),
    );

    // Bring local state up to date before reading or writing; a failed
    // refresh leaves the cached snapshot in place.
    let needs_refresh = !matches!(
        cli.command,
        Commands::Status | Commands::Refresh | Commands::TestConnection | Commands::Setup
    );
    if configured && needs_refresh {
        if let Err(e) = store.refresh().await {
            tracing::warn!(error = %e, "Continuing with cached data");
        }
    }

    let today = Utc::now().date_naive();

    match cli.command {
        Commands::Status => {
            let data = store.data();
            print_json(&serde_json::json!({
                "endpoint": config.endpoint(),
                "connected": store.is_connected(),
                "loading": store.is_loading(),
                "customers": data.customers.len(),
                "services": data.services.len(),
                "estimates": data.estimates.len(),
                "invoices": data.invoices.len(),
                "payments": data.payments.len(),
                "projects": data.projects.len(),
                "unsynced": store.failed_records(),
            }))?;
        }
        Commands::Refresh => {
            store.refresh().await?;
            let data = store.data();
            print_json(&serde_json::json!({
                "connected": store.is_connected(),
                "customers": data.customers.len(),
                "estimates": data.estimates.len(),
                "invoices": data.invoices.len(),
                "projects": data.projects.len(),
            }))?;
        }
        Commands::TestConnection => {
            let status = store.test_connection().await?;
            print_json(&status)?;
        }
        Commands::Setup => {
            let setup = store.setup_database().await?;
            print_json(&serde_json::json!({ "setup": setup }))?;
        }
        Commands::Summary => {
            print_json(&reports::summarize(store.data(), Utc::now()))?;
        }
        Commands::Customers { query } => {
            print_json(&store.search_customers(&query))?;
        }
        Commands::PriceBook { search, category } => {
            let filter = PriceBookFilter { search, category };
            print_json(&catalog::price_book(&store.data().services, &filter))?;
        }
        Commands::Convert { estimate_id } => {
            let conversion = store.convert_estimate_to_invoice(&estimate_id).await?;
            print_json(&conversion)?;
        }
        Commands::Pay {
            invoice_id,
            amount,
            method,
            date,
            notes,
        } => {
            let payment = store
                .add_payment(PaymentForm {
                    invoice_id: invoice_id.clone(),
                    amount,
                    method,
                    date: date.unwrap_or(today),
                    notes,
                })
                .await?;
            print_json(&serde_json::json!({
                "payment": payment,
                "invoice": store.invoice(&invoice_id),
            }))?;
        }
        Commands::ProjectStatus {
            project_id,
            status,
            notes,
        } => {
            let project = store
                .update_project_status(&project_id, status, notes.as_deref())
                .await?;
            print_json(&project)?;
        }
        Commands::Tannery {
            project_ids,
            tannery,
            date,
            notes,
        } => {
            let projects = store
                .send_to_tannery(
                    &project_ids,
                    &tannery,
                    date.unwrap_or(today),
                    notes.as_deref(),
                )
                .await?;
            print_json(&projects)?;
        }
        Commands::SetUrl { .. } | Commands::ClearUrl | Commands::Metrics => {}
    }

    let unsynced = store.failed_records();
    if !unsynced.is_empty() {
        tracing::warn!(
            count = unsynced.len(),
            "Some changes were kept locally but not confirmed by the spreadsheet"
        );
    }

    Ok(())
}
