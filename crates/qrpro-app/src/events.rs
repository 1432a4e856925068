use std::sync::Arc;
use std::time::Duration;

use kanal::{AsyncReceiver, AsyncSender};
use qrpro_core::state::UiState;
use qrpro_scan::CaptureController;
use qrpro_types::{AppEvent, Page};
use tokio_util::sync::CancellationToken;

use crate::state::AppState;

pub mod generate;
pub mod history;
pub mod scan;
pub mod theme;

/// Whether a request is answered right away or later
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Done,
    /// Completed by whatever ends the capture session
    Deferred,
}

/// Everything the handlers mutate, owned by the event loop
pub struct EventContext {
    pub state: Arc<AppState>,
    pub ui: UiState,
    pub capture: CaptureController,
    pub app_to_ui_tx: AsyncSender<AppEvent>,
    /// A `StartCamera` request is waiting for its session to end
    pub pending_capture: bool,
}

impl EventContext {
    /// `capture_tx` receives decode results from the polling task
    pub async fn new(
        state: Arc<AppState>,
        capture_tx: AsyncSender<AppEvent>,
        app_to_ui_tx: AsyncSender<AppEvent>,
    ) -> Self {
        let (default_theme, facing, tick) = {
            let config = state.config.read().await;
            (
                config.ui.default_theme,
                config.capture.facing,
                Duration::from_millis(config.capture.tick_ms.max(1)),
            )
        };

        let theme = state.themes.load(default_theme).unwrap_or_else(|e| {
            tracing::warn!("Failed to load theme: {e}");
            default_theme
        });

        let capture = CaptureController::new(
            state.camera.clone(),
            state.decoder.clone(),
            facing,
            tick,
            capture_tx,
        );

        Self {
            state,
            ui: UiState::new(theme),
            capture,
            app_to_ui_tx,
            pending_capture: false,
        }
    }

    pub async fn emit(&self, event: AppEvent) -> anyhow::Result<()> {
        self.app_to_ui_tx.send(event).await?;
        Ok(())
    }

    pub async fn notify(&self, message: impl Into<String>) -> anyhow::Result<()> {
        self.emit(AppEvent::Notify(message.into())).await
    }

    pub async fn alert(&self, message: impl Into<String>) -> anyhow::Result<()> {
        self.emit(AppEvent::Alert(message.into())).await
    }

    pub async fn scan_status(&self, status: &str, capturing: bool) -> anyhow::Result<()> {
        self.emit(AppEvent::ScanStatus {
            status: status.to_string(),
            capturing,
        })
        .await
    }

    /// Answer a deferred `StartCamera`, if one is outstanding
    pub async fn finish_capture(&mut self) -> anyhow::Result<()> {
        if std::mem::take(&mut self.pending_capture) {
            self.emit(AppEvent::OperationComplete).await?;
        }
        Ok(())
    }
}

/// App's main loop
pub async fn event_loop(
    state: Arc<AppState>,
    ui_to_app_rx: AsyncReceiver<AppEvent>,
    capture_tx: AsyncSender<AppEvent>,
    app_to_ui_tx: AsyncSender<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let mut ctx = EventContext::new(state, capture_tx, app_to_ui_tx).await;

    tracing::info!("[EVENT_LOOP] Starting main loop, waiting for events");
    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("[EVENT_LOOP] Cancelled");
                break;
            }
            event = ui_to_app_rx.recv() => event?,
        };

        tracing::debug!("[EVENT_LOOP] Event received: {:?}", std::mem::discriminant(&event));

        let request = event.is_request();
        let shutdown = matches!(event, AppEvent::Shutdown);

        let completion = match handle_event(&mut ctx, event).await {
            Ok(completion) => completion,
            Err(e) => {
                tracing::error!("Event handler failed: {e:#}");
                ctx.alert(format!("{e:#}")).await?;
                Completion::Done
            }
        };

        if request && completion == Completion::Done {
            ctx.emit(AppEvent::OperationComplete).await?;
        }

        if shutdown {
            break;
        }
    }

    ctx.capture.stop();
    Ok(())
}

pub async fn handle_event(ctx: &mut EventContext, event: AppEvent) -> anyhow::Result<Completion> {
    match event {
        AppEvent::Generate(form) => generate::handle_generate(ctx, form).await?,
        AppEvent::RegenerateFromHistory(index) => generate::handle_regenerate(ctx, index).await?,
        AppEvent::RecallFromHistory(index) => generate::handle_recall(ctx, index).await?,
        AppEvent::Download => generate::handle_download(ctx).await?,
        AppEvent::Share => generate::handle_share(ctx).await?,

        AppEvent::Navigate(page) => route(ctx, page).await?,

        AppEvent::ToggleTheme => theme::handle_toggle(ctx).await?,
        AppEvent::SetTheme(theme) => theme::apply_theme(ctx, theme).await?,
        AppEvent::ReportTheme => ctx.emit(AppEvent::ThemeChanged(ctx.ui.theme)).await?,

        AppEvent::StartCamera => return scan::handle_start_camera(ctx).await,
        AppEvent::StopCamera => scan::stop_capture(ctx).await?,
        AppEvent::FrameDecoded { epoch, data } => {
            scan::handle_frame_decoded(ctx, epoch, data).await?
        }
        AppEvent::CaptureFailed { epoch, reason } => {
            scan::handle_capture_failed(ctx, epoch, reason).await?
        }
        AppEvent::ScanFile(path) => scan::handle_scan_file(ctx, path).await?,
        AppEvent::ScanClipboard => scan::handle_scan_clipboard(ctx).await?,
        AppEvent::CopyResult => scan::handle_copy_result(ctx).await?,
        AppEvent::OpenResult => scan::handle_open_result(ctx).await?,

        AppEvent::LoadHistory => history::handle_load(ctx).await?,
        AppEvent::DeleteHistory { category, index } => {
            history::handle_delete(ctx, category, index).await?
        }
        AppEvent::DeleteHistoryById { category, id } => {
            history::handle_delete_by_id(ctx, category, id).await?
        }
        AppEvent::ClearHistory(category) => history::handle_clear(ctx, category).await?,
        AppEvent::CopyHistory { category, index } => {
            history::handle_copy(ctx, category, index).await?
        }

        AppEvent::Shutdown => {
            tracing::info!("Shutdown requested");
            scan::stop_capture(ctx).await?;
        }

        // UI-only events, ignore in backend
        AppEvent::ShowCode(_)
        | AppEvent::ShowScanResult { .. }
        | AppEvent::ShowHistory { .. }
        | AppEvent::ScanStatus { .. }
        | AppEvent::Notify(_)
        | AppEvent::Alert(_)
        | AppEvent::PageChanged(_)
        | AppEvent::ThemeChanged(_)
        | AppEvent::OperationComplete => {}
    }

    Ok(Completion::Done)
}

/// Show a page. Leaving the scanner stops the camera, entering history loads it.
pub async fn route(ctx: &mut EventContext, page: Page) -> anyhow::Result<()> {
    let change = ctx.ui.router.show_page(page);
    if change.changed() {
        tracing::debug!("Page {} -> {}", change.previous, change.current);
    }

    if change.stop_capture {
        scan::stop_capture(ctx).await?;
    }

    ctx.emit(AppEvent::PageChanged(change.current)).await?;

    if change.load_history {
        history::handle_load(ctx).await?;
    }

    Ok(())
}
