//! User Console - Main Application
//!
//! A terminal front-end for a remote user-management API: connectivity
//! testing, user listing, and user creation.

use clap::{Parser, Subcommand};
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use user_console::{
    actions::{Actions, UiEvent},
    client::UserApi,
    config::{AppConfig, SharedConfig},
    render::{UserListView, EMPTY_USERS_PLACEHOLDER},
    stats::create_shared_stats,
    tui::{spawn_offline_watch, TuiApp},
};

/// User Console - Terminal front-end for a user-management API
#[derive(Parser)]
#[command(name = "user-console")]
#[command(about = "Test connectivity to a user-management API, list users, and create users")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// API base URL
    #[arg(long, env = "USER_CONSOLE_API_URL")]
    api_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the TUI dashboard
    Tui,
    /// Test connectivity to the configured API
    Probe,
    /// Fetch and print the current user list
    List,
    /// Create a new user
    Create {
        /// Full name
        #[arg(short, long)]
        name: String,
        /// Email address
        #[arg(short, long)]
        email: String,
    },
    /// Show current configuration
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("user_console={}", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let mut config = if std::path::Path::new(&cli.config).exists() {
        AppConfig::load_from_file(&cli.config).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to load config file, using defaults");
            AppConfig::default()
        })
    } else {
        AppConfig::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to load config, using defaults");
            AppConfig::default()
        })
    };

    // Override with CLI args
    if let Some(api_url) = cli.api_url {
        config.api.url = api_url;
    }

    let shared_config = SharedConfig::new(config.clone());
    let stats = create_shared_stats(1000);
    let client = UserApi::new(stats.clone());
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let actions = Actions::new(
        client,
        shared_config.clone(),
        stats.clone(),
        events_tx.clone(),
    );

    match cli.command {
        Some(Commands::Tui) | None => {
            // Default: start the TUI
            tracing::info!(api_url = %config.api.url, "Starting user console");

            if config.monitor.enabled {
                spawn_offline_watch(shared_config.clone(), events_tx);
            }

            let mut app = TuiApp::new(actions, shared_config, stats, events_rx);
            app.run().await?;
        }
        Some(Commands::Probe) => {
            actions.test_connection().await;
            print_events(events_rx);
        }
        Some(Commands::List) => {
            actions.refresh_users().await;
            print_events(events_rx);
        }
        Some(Commands::Create { name, email }) => {
            actions.submit_user(&name, &email).await;
            print_events(events_rx);
        }
        Some(Commands::Config) => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

/// Print the UI events a one-shot command produced
fn print_events(mut events: mpsc::UnboundedReceiver<UiEvent>) {
    while let Ok(event) = events.try_recv() {
        match event {
            UiEvent::Connection(message) | UiEvent::Create(message) => {
                println!("{} {}", message.severity.glyph(), message.text);
            }
            UiEvent::UsersLoaded(view) => print_users(&view),
            UiEvent::UsersUnconfigured => {
                println!("Please configure the API URL first");
            }
            UiEvent::UsersError => {
                println!("Failed to load users. Check the API URL and connection.");
            }
            UiEvent::UserCreated | UiEvent::UsersLoading | UiEvent::Offline => {}
        }
    }
}

fn print_users(view: &UserListView) {
    match view {
        UserListView::Empty => println!("{}", EMPTY_USERS_PLACEHOLDER),
        UserListView::Cards(cards) => {
            println!("Users ({}):", cards.len());
            for card in cards {
                println!("  {} [{}]", card.name, card.badge);
                println!("    {}", card.email);
                println!("    Created: {}", card.created);
                println!("    ID: {}", card.id);
            }
        }
    }
}
