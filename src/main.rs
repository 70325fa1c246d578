use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use iss_tracker::config::Config;
use iss_tracker::map::{ConsoleView, FootprintScale, SharedScene};
use iss_tracker::position::HttpPositionClient;
use iss_tracker::session::{self, RefreshLoop};
use iss_tracker::web::{run_server, AppState};

#[derive(Parser)]
#[command(name = "iss-tracker")]
#[command(about = "Live satellite position on a world map")]
struct Cli {
    /// YAML configuration file (defaults track the ISS)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Track and serve the map dashboard
    Serve,
    /// Track and log positions to the console
    Watch,
    /// Validate the configuration
    Check,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Serve => serve(config).await,
        Commands::Watch => watch(config).await,
        Commands::Check => check(&config),
    }
}

fn check(config: &Config) -> ExitCode {
    let tracker = &config.tracker;
    let fields: Vec<String> = tracker.fields.iter().map(|f| f.to_string()).collect();
    let states: Vec<&str> = tracker.visibility_icons.states().collect();
    let footprint = match &tracker.footprint {
        FootprintScale::GroundRadius => "ground radius (m)".to_string(),
        FootprintScale::PixelRadius { scale } => format!("pixel radius (x{})", scale),
    };

    println!("Configuration is valid");
    println!("  feed:       {}", tracker.url);
    println!("  label:      {}", tracker.label);
    println!(
        "  poll:       every {}",
        humantime::format_duration(tracker.poll_interval)
    );
    match tracker.request_timeout {
        Some(t) => println!("  timeout:    {}", humantime::format_duration(t)),
        None => println!("  timeout:    none"),
    }
    println!("  footprint:  {}", footprint);
    println!("  fields:     {}", fields.join(", "));
    println!("  icons for:  {}", states.join(", "));
    println!(
        "  terminator: every {}, {}° steps",
        humantime::format_duration(config.terminator.refresh_interval),
        config.terminator.resolution_deg
    );
    println!("  web:        {}", config.web.bind);
    ExitCode::SUCCESS
}

fn position_client(config: &Config) -> Option<HttpPositionClient> {
    match HttpPositionClient::new(config.tracker.url.clone(), config.tracker.request_timeout) {
        Ok(client) => {
            log::info!("Polling {}", client.url());
            Some(client)
        }
        Err(e) => {
            eprintln!("Error creating HTTP client: {}", e);
            None
        }
    }
}

async fn serve(config: Config) -> ExitCode {
    let Some(client) = position_client(&config) else {
        return ExitCode::FAILURE;
    };

    let scene = SharedScene::new(config.tracker.zoom);
    let session = RefreshLoop::new(config.profile(), client, scene.clone());
    let status = session.status_handle();
    let runner = session::spawn(session, config.timers());

    let state = AppState {
        config: Arc::new(config),
        scene,
        status,
    };

    let result = run_server(state, shutdown_signal()).await;
    runner.stop().await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn watch(config: Config) -> ExitCode {
    let Some(client) = position_client(&config) else {
        return ExitCode::FAILURE;
    };

    let session = RefreshLoop::new(config.profile(), client, ConsoleView::new());
    let runner = session::spawn(session, config.timers());

    shutdown_signal().await;
    runner.stop().await;
    ExitCode::SUCCESS
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("Shutting down");
}
