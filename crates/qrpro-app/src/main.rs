use std::future::Future;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use qrpro_config::capture::CaptureSource;
use qrpro_core::JsonFileStore;
use qrpro_io::SystemClipboard;
use tokio::signal;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod controller;
mod events;
mod profile;
mod repl;
mod state;
mod ui;

#[cfg(test)]
mod tests;

use self::cli::{Cli, Commands, ProfileCommand, ScanCommand};
use self::controller::AppController;
use self::state::AppState;
use self::ui::Script;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.json);

    let profiles = profile::profiles_dir()?;
    profile::init_user_config(&profiles)?;

    let command = cli.command.unwrap_or(Commands::Repl);
    match &command {
        Commands::Open { url } => return qrpro_io::open_url(url),
        Commands::Profile(ProfileCommand::Add { name }) => {
            let path = profile::add_profile_from_default(&profiles, name)?;
            println!("Created profile {name} at {}", path.display());
            return Ok(());
        }
        _ => {}
    }

    let mut config = profile::load_user_profile(&profiles, &cli.profile)?;
    config.apply_env();
    if let Commands::Scan(ScanCommand::Camera { frames: Some(dir) }) = &command {
        config.capture.source = CaptureSource::Frames;
        config.capture.frames_dir = Some(dir.display().to_string());
    }

    let data_dir = profile::data_dir(&config)?;
    let store_path = data_dir.join(&config.history.file_name);
    let store = JsonFileStore::open(&store_path)
        .with_context(|| format!("Failed to open {}", store_path.display()))?;
    tracing::debug!("Using store {}", store.path().display());

    let camera = state::camera_from_config(&config, data_dir)?;
    let state = Arc::new(AppState::new(
        config,
        Arc::new(store),
        camera,
        Arc::new(SystemClipboard::new()),
    ));

    let script = match command.events() {
        Some(events) => Script::Batch(events),
        None => Script::Interactive,
    };

    // Shutdown future (Ctrl+C)
    let shutdown = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl+c: {e}");
            std::future::pending::<()>().await;
        }
    };

    run(state, script, shutdown).await
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(atty::is(atty::Stream::Stderr)),
            )
            .init();
    }
}

/// Run the event and UI loops until either finishes or `shutdown` resolves
pub async fn run(
    state: Arc<AppState>,
    script: Script,
    shutdown: impl Future<Output = ()>,
) -> anyhow::Result<()> {
    let controller = AppController::new(state);
    let mut tasks = controller.spawn_tasks(script);
    tokio::pin!(shutdown);

    let mut stopping = false;
    let mut result = Ok(());

    loop {
        tokio::select! {
            _ = &mut shutdown, if !stopping => {
                tracing::info!("Shutdown requested");
                stopping = true;
                controller.shutdown();
            }
            joined = tasks.join_next() => {
                match joined {
                    Some(Ok(Ok(()))) => {}
                    Some(Ok(Err(e))) => {
                        tracing::error!("Task exited with error: {e:#}");
                        if result.is_ok() {
                            result = Err(e);
                        }
                    }
                    Some(Err(e)) => tracing::error!("Task panicked: {e}"),
                    None => break,
                }
                // One loop ending takes the other down with it
                stopping = true;
                controller.shutdown();
            }
        }
    }

    result
}
