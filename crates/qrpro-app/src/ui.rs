use std::fmt::Write as _;
use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use qrpro_config::Config;
use qrpro_core::history::HistoryLine;
use qrpro_types::{AppEvent, HistoryCategory, HistoryRecord};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use crate::repl::{self, ReplAction};

/// What drives the UI side of the bus
pub enum Script {
    /// Send these requests, exit once each has completed
    Batch(Vec<AppEvent>),
    /// Read commands from stdin until `quit` or EOF
    Interactive,
}

pub async fn ui_loop(
    app_to_ui_rx: AsyncReceiver<AppEvent>,
    ui_to_app_tx: AsyncSender<AppEvent>,
    config: Arc<RwLock<Config>>,
    script: Script,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let truncate = config.read().await.ui.history_truncate;

    match script {
        Script::Batch(requests) => {
            let expected = requests.len();
            tokio::spawn(async move {
                for event in requests {
                    if let Err(e) = ui_to_app_tx.send(event).await {
                        tracing::error!("Failed to send request to app: {e}");
                        break;
                    }
                }
            });

            let mut completed = 0;
            while completed < expected {
                let event = tokio::select! {
                    _ = cancel.cancelled() => return Ok(()),
                    event = app_to_ui_rx.recv() => event?,
                };
                if matches!(event, AppEvent::OperationComplete) {
                    completed += 1;
                } else {
                    print_event(&event, truncate);
                }
            }
            tracing::debug!("All {expected} request(s) completed");
        }
        Script::Interactive => {
            println!("Welcome to QR Code Pro! Type `help` for commands.");
            let mut lines = BufReader::new(tokio::io::stdin()).lines();

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    event = app_to_ui_rx.recv() => {
                        let event = event?;
                        if !matches!(event, AppEvent::OperationComplete) {
                            print_event(&event, truncate);
                        }
                    }
                    line = lines.next_line() => {
                        let action = match line? {
                            Some(line) => repl::parse_line(&line),
                            None => ReplAction::Quit,
                        };
                        match action {
                            ReplAction::Send(events) => {
                                for event in events {
                                    ui_to_app_tx.send(event).await?;
                                }
                            }
                            ReplAction::Print(text) => println!("{text}"),
                            ReplAction::Quit => {
                                ui_to_app_tx.send(AppEvent::Shutdown).await?;
                                break;
                            }
                        }
                    }
                }
            }
        }
    }

    Ok(())
}

fn print_event(event: &AppEvent, truncate: usize) {
    match (event, describe(event, truncate)) {
        (AppEvent::Alert(_), Some(text)) => eprintln!("{text}"),
        (_, Some(text)) => println!("{text}"),
        (_, None) => tracing::debug!("UI event: {:?}", std::mem::discriminant(event)),
    }
}

/// Terminal rendering of an app event, `None` when there is nothing to show
pub fn describe(event: &AppEvent, truncate: usize) -> Option<String> {
    match event {
        AppEvent::ShowCode(code) => {
            let mut out = String::new();
            if !code.preview.is_empty() {
                out.push_str(&code.preview);
                out.push('\n');
            }
            let _ = write!(out, "{} payload: {}", code.preset, code.payload);
            Some(out)
        }
        AppEvent::ShowScanResult { data, openable } => Some(if *openable {
            format!("Scanned link: {data}")
        } else {
            format!("Scanned: {data}")
        }),
        AppEvent::ShowHistory { generated, scanned } => {
            let mut out = history_section(HistoryCategory::Generated, generated, truncate);
            out.push('\n');
            out.push_str(&history_section(HistoryCategory::Scanned, scanned, truncate));
            Some(out)
        }
        AppEvent::ScanStatus { status, .. } if !status.is_empty() => {
            Some(format!("[scanner] {status}"))
        }
        AppEvent::Notify(message) => Some(message.clone()),
        AppEvent::Alert(message) => Some(format!("! {message}")),
        AppEvent::ThemeChanged(theme) => Some(format!("Theme: {theme}")),
        _ => None,
    }
}

fn history_section(
    category: HistoryCategory,
    records: &[HistoryRecord],
    truncate: usize,
) -> String {
    let mut out = format!("{category} ({})", records.len());
    if records.is_empty() {
        let _ = write!(out, "\n  No {category} QR codes yet");
        return out;
    }

    for (index, record) in records.iter().enumerate() {
        let line = HistoryLine::from_record(record, truncate);
        let _ = match line.label {
            Some(label) => write!(out, "\n  [{index}] {label:<5} {}  ({})", line.text, line.date),
            None => write!(out, "\n  [{index}] {}  ({})", line.text, line.date),
        };
        let _ = write!(out, "  id {}", record.id);
    }
    out
}
