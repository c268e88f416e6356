use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use server::config::{AppConfig, CONFIG_DIR, CONFIG_FILE};
use server::{create_router, state::AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "prospect-tracker")]
#[command(about = "Track sales prospects, follow-ups and outreach suggestions", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Project directory holding `.prospect-tracker/`; defaults to the current directory
    #[arg(long, global = true)]
    root: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the config file and database
    Init,
    /// Run the HTTP API
    Serve {
        /// Overrides `[server] port`
        #[arg(short, long)]
        port: Option<u16>,

        /// Backfill neutral color codes before accepting requests
        #[arg(long)]
        backfill_colors: bool,
    },
    /// Regenerate color codes still on the neutral fallback
    BackfillColors,
    /// Print gamification counters, accountability and upcoming follow-ups
    Stats {
        /// Accountability window; overrides `[tracker] accountability_window_days`
        #[arg(short, long)]
        days: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let root = match cli.root {
        Some(root) => root,
        None => std::env::current_dir().context("Failed to read current directory")?,
    };

    match cli.command {
        Some(Commands::Init) => init_project(&root).await,
        Some(Commands::Serve {
            port,
            backfill_colors,
        }) => serve(&root, port, backfill_colors).await,
        Some(Commands::BackfillColors) => backfill_colors(&root).await,
        Some(Commands::Stats { days }) => stats(&root, days).await,
        None => serve(&root, None, false).await,
    }
}

fn load_config(root: &Path) -> Result<AppConfig> {
    AppConfig::load(root).with_context(|| {
        format!(
            "Failed to load {}",
            AppConfig::config_path(root).display()
        )
    })
}

async fn init_project(root: &Path) -> Result<()> {
    let config_dir = root.join(CONFIG_DIR);
    let config_path = AppConfig::config_path(root);

    if config_path.exists() {
        println!("Project already initialized at {}", config_dir.display());
        return Ok(());
    }

    println!("Initializing prospect tracker in {}", root.display());

    tokio::fs::create_dir_all(&config_dir)
        .await
        .with_context(|| format!("Failed to create {}", config_dir.display()))?;

    let config = AppConfig::default();
    tokio::fs::write(&config_path, config.to_toml()?)
        .await
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    AppState::open(root, config.clone()).await?;

    println!();
    println!("Created:");
    println!("  {}/", CONFIG_DIR);
    println!("  ├── {}", CONFIG_FILE);
    println!("  └── {}", display_relative(root, &config.database_path(root)));
    println!();
    println!("Next steps:");
    println!(
        "  1. export {}=<your key> to enable suggestions",
        config.ai.api_key_env
    );
    println!("  2. Run 'prospect-tracker serve'");

    Ok(())
}

async fn serve(root: &Path, port: Option<u16>, backfill: bool) -> Result<()> {
    init_tracing();

    let config = load_config(root)?;
    let port = port.unwrap_or(config.server.port);
    let backfill = backfill || config.tracker.backfill_on_startup;

    let state = AppState::open(root, config).await?;

    if backfill {
        let updated = state
            .service
            .backfill_color_codes()
            .await
            .context("Color code backfill failed")?;
        tracing::info!(updated, "Startup color backfill finished");
    }

    let generator = state.service.assistant().generator_name().to_string();
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;

    println!();
    println!("Prospect Tracker");
    println!("════════════════════════════════════════");
    println!();
    println!("  API Server:  http://localhost:{}", port);
    println!("  Swagger UI:  http://localhost:{}/swagger-ui", port);
    println!("  Events:      http://localhost:{}/api/events", port);
    println!("  Generator:   {}", generator);
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

async fn backfill_colors(root: &Path) -> Result<()> {
    init_tracing();

    let config = load_config(root)?;
    let state = AppState::open(root, config).await?;

    let updated = state
        .service
        .backfill_color_codes()
        .await
        .context("Color code backfill failed")?;

    println!("Updated color codes for {} prospect(s)", updated);
    Ok(())
}

async fn stats(root: &Path, days: Option<u32>) -> Result<()> {
    let config = load_config(root)?;
    let window_days = days.unwrap_or(config.tracker.accountability_window_days);
    let upcoming_days = config.tracker.upcoming_window_days;
    if window_days == 0 {
        anyhow::bail!("--days must be at least 1");
    }

    let state = AppState::open(root, config).await?;
    let service = &state.service;

    let gamification = service.gamification_stats().await?;
    let summary = service.accountability_summary(window_days).await?;
    let upcoming = service.list_upcoming_follow_ups(upcoming_days).await?;
    let prospects = service.list_prospects().await?;

    println!();
    println!("{}", "Today".bold());
    println!(
        "  Prospects added:     {}",
        gamification.daily_prospects_added.to_string().green()
    );
    println!(
        "  Follow-up streak:    {}",
        gamification.follow_up_streak.to_string().green()
    );
    println!(
        "  On time / missed:    {} / {}",
        gamification.total_on_time_follow_ups,
        gamification.total_missed_follow_ups.to_string().red()
    );

    println!();
    println!("{}", format!("Last {} days", summary.window_days).bold());
    println!("  Prospects added:     {}", summary.prospects_added);
    println!("  Interactions logged: {}", summary.interactions_logged);
    println!(
        "  Follow-ups:          {} completed, {} missed",
        summary.follow_ups_completed, summary.follow_ups_missed
    );

    println!();
    println!("{}", format!("Next {} days", upcoming_days).bold());
    if upcoming.is_empty() {
        println!("  No pending follow-ups.");
    }
    for follow_up in &upcoming {
        let name = prospects
            .iter()
            .find(|p| p.id == follow_up.prospect_id)
            .map(|p| p.name.as_str())
            .unwrap_or("unknown prospect");
        println!(
            "  {} {}  {:<10} {}",
            follow_up.date,
            follow_up.time.format("%H:%M"),
            follow_up.method.label(),
            name.cyan()
        );
    }
    println!();

    Ok(())
}

fn display_relative(root: &Path, path: &Path) -> String {
    path.strip_prefix(root.join(CONFIG_DIR))
        .unwrap_or(path)
        .display()
        .to_string()
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "prospect_tracker=info,server=info,tracker=info,ai=info,tower_http=info".into()
            }),
        )
        .init();
}
