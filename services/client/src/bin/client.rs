//! services/client/src/bin/client.rs

use std::sync::Arc;

use clap::{Parser, Subcommand};
use client_lib::{
    adapters::{FileSessionStorage, ReqwestTransport},
    config::Config,
    error::ClientError,
    ApiClient, RecordQuery, SessionStore, Watchlist,
};
use signal_client_core::domain::{format_timestamp, RecordStatus};
use signal_client_core::pagination::{validate_transition, PageTransition};
use signal_client_core::validation;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "client")]
#[command(about = "Command-line client for the trading-signal backend", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and store the session locally
    Login { email: String, password: String },
    /// Sign out and forget the stored session
    Logout,
    /// Show the signed-in user's details
    Whoami,
    /// Create an account
    Register {
        email: String,
        password: String,
        /// Must match PASSWORD
        confirm_password: String,
        /// The 6-digit code sent by `send-code`
        code: String,
        #[arg(long, default_value = "")]
        invite_code: String,
    },
    /// Email a verification code
    SendCode { email: String },
    /// Manage the symbol watch-list
    Symbols {
        #[command(subcommand)]
        action: SymbolAction,
    },
    /// Browse backtest records
    Records {
        #[command(subcommand)]
        action: RecordAction,
    },
}

#[derive(Subcommand)]
enum SymbolAction {
    List,
    Add { symbol: String },
    Remove { symbol: String },
}

#[derive(Subcommand)]
enum RecordAction {
    List {
        #[arg(long, default_value_t = 1)]
        page: i64,
        #[arg(long)]
        page_size: Option<u32>,
        #[arg(long)]
        symbol: Option<String>,
        /// Status code 0-5
        #[arg(long)]
        status: Option<i64>,
    },
    Detail {
        symbol: String,
        #[arg(long)]
        id: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("{}", e);
        eprintln!("error: {}", e);
        if e.requires_sign_in() {
            eprintln!("hint: run `client login <email> <password>` first");
        }
        std::process::exit(1);
    }
}

async fn run() -> Result<(), ClientError> {
    let cli = Cli::parse();

    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    info!(base_url = %config.api_base_url, "configuration loaded");

    // --- 2. Initialize Adapters ---
    let storage = Arc::new(FileSessionStorage::new(config.session_path.clone()));
    let transport = Arc::new(ReqwestTransport::new(&config.app_name).map_err(ClientError::Transport)?);
    let client = ApiClient::new(
        config.api_base_url.clone(),
        transport,
        SessionStore::new(storage),
    );

    // --- 3. Run the Command ---
    match cli.command {
        Commands::Login { email, password } => {
            let grant = client.login(&email, &password).await?;
            println!("signed in as {} (user {})", email, grant.user_id);
        }
        Commands::Logout => {
            client.logout().await?;
            println!("signed out");
        }
        Commands::Whoami => {
            if !client.session().is_valid() {
                return Err(ClientError::MissingCredentials);
            }
            let details = client.fetch_current_user().await?;
            println!("{}", details.email);
            for (key, value) in &details.extra {
                println!("  {}: {}", key, value);
            }
        }
        Commands::Register {
            email,
            password,
            confirm_password,
            code,
            invite_code,
        } => {
            validation::validate_confirmation(&password, &confirm_password)?;
            client.register(&email, &password, &code, &invite_code).await?;
            println!("account created, you can now sign in");
        }
        Commands::SendCode { email } => {
            client.request_verification_code(&email).await?;
            println!("verification code sent to {}", email);
        }
        Commands::Symbols { action } => run_symbols(&client, action).await?,
        Commands::Records { action } => run_records(&client, &config, action).await?,
    }

    Ok(())
}

async fn run_symbols(client: &ApiClient, action: SymbolAction) -> Result<(), ClientError> {
    let mut watchlist = Watchlist::new(client.clone());
    match action {
        SymbolAction::List => {
            watchlist.refresh().await?;
        }
        SymbolAction::Add { symbol } => {
            watchlist.add(&symbol).await?;
            println!("added {}", symbol.to_lowercase());
        }
        SymbolAction::Remove { symbol } => {
            // Load first so the confirmed removal is applied to the cached list.
            watchlist.refresh().await?;
            let envelope = watchlist.remove(&symbol).await?;
            let raw = serde_json::to_string_pretty(&envelope)
                .map_err(|e| ClientError::MalformedJson(e.to_string()))?;
            println!("{}", raw);
        }
    }

    for entry in watchlist.entries() {
        println!(
            "{:<16} {:<8} {}",
            entry.symbol,
            if entry.is_valid { "valid" } else { "invalid" },
            format_timestamp(entry.created_at)
        );
    }
    Ok(())
}

async fn run_records(
    client: &ApiClient,
    config: &Config,
    action: RecordAction,
) -> Result<(), ClientError> {
    match action {
        RecordAction::List {
            page,
            page_size,
            symbol,
            status,
        } => {
            if page < 1 {
                return Err(ClientError::Validation(
                    validation::ValidationError::Required("a page number of at least 1"),
                ));
            }
            let page_size = page_size.unwrap_or(config.page_size);
            let mut query = RecordQuery::new(u32::try_from(page).unwrap_or(u32::MAX), page_size);
            if let Some(symbol) = symbol {
                query = query.symbol(symbol.to_lowercase());
            }
            if let Some(status) = status {
                query = query.status(RecordStatus::from_code(status));
            }

            let mut result = client.list_backtest_records(&query).await?;
            // Past the last page: show the last one instead.
            if let PageTransition::Rejected =
                validate_transition(page, result.pagination.total_pages)
            {
                if result.pagination.total_pages > 0 {
                    let last = result.pagination.total_pages;
                    result = client.list_backtest_records(&query.at_page(last)).await?;
                }
            }

            for record in &result.records {
                println!(
                    "{:<10} {:<12} buy {:>12} @ {:<23} sell {:>12} @ {:<23} {:>8} {}",
                    record.id,
                    record.symbol,
                    record.buy_price,
                    format_timestamp(record.buy_at),
                    record.sell_price,
                    format_timestamp(record.sell_at),
                    if record.profit_percent.is_empty() {
                        "-"
                    } else {
                        record.profit_percent.as_str()
                    },
                    record.status.label(),
                );
            }

            let pagination = result.pagination;
            let window: Vec<String> = pagination
                .window()
                .into_iter()
                .map(|p| {
                    if p == pagination.current_page {
                        format!("[{}]", p)
                    } else {
                        p.to_string()
                    }
                })
                .collect();
            println!(
                "{} records, page {}/{}  {}",
                pagination.total_count,
                pagination.current_page,
                pagination.total_pages,
                window.join(" ")
            );
        }
        RecordAction::Detail { symbol, id } => {
            let detail = client
                .get_backtest_detail(&symbol.to_lowercase(), id.as_deref())
                .await?;
            if detail.is_empty() {
                println!("no detail available");
                return Ok(());
            }
            let text = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());
            println!("id:      {}", text(&detail.id));
            println!("symbol:  {}", text(&detail.symbol));
            println!(
                "status:  {}",
                detail.status.map(|s| s.label()).unwrap_or("-")
            );
            println!("profit:  {}", text(&detail.profit_percent));
            println!(
                "hold:    {}",
                detail
                    .hold_time
                    .map(|secs| format!("{}s", secs))
                    .unwrap_or_else(|| "-".to_string())
            );
            println!(
                "bid:     {} (market {}) at {}  {}",
                text(&detail.bid_price),
                text(&detail.bid_curr_price),
                format_timestamp(detail.bid_at),
                text(&detail.bid_plot_msg)
            );
            println!(
                "buy:     {} at {}",
                text(&detail.buy_price),
                format_timestamp(detail.buy_at)
            );
            println!(
                "ask:     {} (market {}) at {}  {}",
                text(&detail.ask_price),
                text(&detail.ask_curr_price),
                format_timestamp(detail.ask_at),
                text(&detail.ask_plot_msg)
            );
            println!(
                "sell:    {} at {}",
                text(&detail.sell_price),
                format_timestamp(detail.sell_at)
            );
        }
    }
    Ok(())
}
