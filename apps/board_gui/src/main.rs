use std::{path::PathBuf, sync::Arc};

mod controller;
mod ui;

use anyhow::{anyhow, Context, Result};
use board_core::{
    config::{load_settings_from, DEFAULT_CONFIG_FILE},
    BoardSession, BoardSettings, HttpClaimNotifier,
};
use chrono::Utc;
use clap::Parser;
use eframe::egui;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::ui::FlightBoardApp;

#[derive(Parser, Debug)]
#[command(about = "Flight board with the scripted claim timeline")]
struct Args {
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    #[arg(long)]
    backend_url: Option<String>,
    #[arg(long)]
    claim_delay_ms: Option<u64>,
    #[arg(long)]
    no_probe: bool,
}

impl Args {
    fn apply_overrides(&self, settings: &mut BoardSettings) {
        if let Some(url) = &self.backend_url {
            settings.backend_url = url.clone();
        }
        if let Some(delay) = self.claim_delay_ms {
            settings.claim_delay_ms = delay;
        }
        if self.no_probe {
            settings.probe_enabled = false;
        }
    }
}

fn resolve_settings(args: &Args) -> Result<BoardSettings> {
    let mut settings = load_settings_from(&args.config, |name| std::env::var(name).ok())
        .with_context(|| format!("failed to load settings from {}", args.config.display()))?;
    args.apply_overrides(&mut settings);
    settings.validate().context("invalid command-line override")?;
    Ok(settings)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();
    let settings = resolve_settings(&args)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("board-runtime")
        .enable_all()
        .build()
        .context("failed to build backend runtime")?;

    let notifier = HttpClaimNotifier::new(settings.api_base()?, settings.notify_timeout())
        .context("failed to build notification client")?;
    let session = BoardSession::mount(
        runtime.handle(),
        &settings,
        Arc::new(notifier),
        Utc::now(),
    )?;
    info!(backend_url = %settings.backend_url, "ui: launching flight board");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Claim Command Center")
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([960.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Claim Command Center",
        options,
        Box::new(move |_cc| Ok(Box::new(FlightBoardApp::new(session, runtime)))),
    )
    .map_err(|err| anyhow!("ui loop failed: {err}"))
}
