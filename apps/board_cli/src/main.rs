use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use board_core::{
    config::{load_settings_from, DEFAULT_CONFIG_FILE},
    view::{BoardRow, BoardView},
    BoardSession, BoardSettings, DeliveryStatus, HttpClaimNotifier, SessionUpdate,
};
use chrono::Utc;
use clap::Parser;
use tokio::runtime::Handle;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Runs the scripted claim timeline in a terminal and exits once the
/// claim message has been delivered or has failed.
#[derive(Parser, Debug)]
struct Args {
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    #[arg(long)]
    backend_url: Option<String>,
    #[arg(long)]
    claim_delay_ms: Option<u64>,
    #[arg(long)]
    no_probe: bool,
    /// Print the board clock on every tick.
    #[arg(long)]
    show_clock: bool,
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

const COLUMNS: [&str; 10] = [
    "Policy No.",
    "Travellers",
    "Flight",
    "Route",
    "Status",
    "Expected",
    "Actual",
    "Claim No.",
    "Claim Status",
    "Paid",
];

fn row_cells(row: &BoardRow) -> [String; 10] {
    let flight = if row.highlighted {
        format!("*{}", row.flight_number)
    } else {
        row.flight_number.clone()
    };
    [
        row.policy_number.clone(),
        row.travellers.clone(),
        flight,
        row.route.clone(),
        row.status_label.clone(),
        row.expected_departure.clone(),
        row.actual_departure.clone(),
        row.claim_number.text().to_string(),
        row.claim_status.clone(),
        row.claim_paid_amount.clone(),
    ]
}

/// Fixed-width text rendering of the board. The most recently paid row is
/// marked with `*` before its flight number.
fn render_board(view: &BoardView) -> String {
    let cells: Vec<[String; 10]> = view.rows.iter().map(row_cells).collect();
    let mut widths = COLUMNS.map(|header| header.chars().count());
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = format!(
        "{} {}  {}\n\n",
        view.clock.date, view.clock.time, view.clock.caption
    );
    out.push_str(&pad_line(COLUMNS.iter().copied(), &widths));
    out.push('\n');
    for row in &cells {
        out.push_str(&pad_line(row.iter().map(String::as_str), &widths));
        out.push('\n');
    }
    out
}

fn pad_line<'a>(values: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    values
        .zip(widths)
        .map(|(value, &width)| format!("{value:<width$}"))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

fn resolve_settings(args: &Args) -> Result<BoardSettings> {
    let mut settings = load_settings_from(&args.config, |name| std::env::var(name).ok())
        .with_context(|| format!("failed to load settings from {}", args.config.display()))?;
    args.apply_overrides(&mut settings);
    settings.validate().context("invalid command-line override")?;
    Ok(settings)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();
    let settings = resolve_settings(&args)?;
    let notifier = HttpClaimNotifier::new(settings.api_base()?, settings.notify_timeout())
        .context("failed to build notification client")?;

    let mut session = BoardSession::mount(
        &Handle::current(),
        &settings,
        Arc::new(notifier),
        Utc::now(),
    )?;
    print!("{}", render_board(&session.view()));
    info!(
        claim_delay_ms = settings.claim_delay_ms,
        "cli: waiting for scheduled claim"
    );

    loop {
        let update = tokio::select! {
            update = session.next_update() => update,
            _ = tokio::signal::ctrl_c() => {
                info!("cli: interrupted");
                break;
            }
        };
        let Some(update) = update else {
            break;
        };

        match update {
            SessionUpdate::Tick(_) => {
                if args.show_clock {
                    let clock = session.view().clock;
                    println!("{} {}", clock.date, clock.time);
                }
            }
            SessionUpdate::ClaimPaid(record) => {
                let view = session.view();
                println!();
                print!("{}", render_board(&view));
                if let Some(toast) = view.notification {
                    println!("\n[{}] {}", toast.sender, toast.body);
                }
                info!(flight_number = %record.flight_number, "cli: claim paid");
            }
            SessionUpdate::ClaimSkipped => {
                warn!("cli: scheduled claim skipped, nothing to notify");
                break;
            }
            SessionUpdate::Delivery(DeliveryStatus::Delivered { ack, .. }) => {
                println!("Claim message sent: {}", ack.message);
                break;
            }
            SessionUpdate::Delivery(DeliveryStatus::Failed { reason, .. }) => {
                println!("Claim message failed: {reason}");
                break;
            }
        }
    }

    session.teardown();
    Ok(())
}
