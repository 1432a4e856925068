use std::path::PathBuf;

use anyhow::Context;
use qrpro_scan::{ScanError, scan_file, scan_frame};
use qrpro_types::AppEvent;

use super::{Completion, EventContext};

pub async fn handle_start_camera(ctx: &mut EventContext) -> anyhow::Result<Completion> {
    ctx.scan_status("Starting camera...", false).await?;

    match ctx.capture.start() {
        Ok(true) => {
            ctx.pending_capture = true;
            ctx.scan_status("Point camera at QR code", true).await?;
            Ok(Completion::Deferred)
        }
        Ok(false) => {
            ctx.scan_status("Point camera at QR code", true).await?;
            ctx.notify("Camera is already running").await?;
            Ok(Completion::Done)
        }
        Err(e) => {
            tracing::error!("Camera error: {e}");
            ctx.scan_status("Camera access denied", false).await?;
            ctx.alert("Unable to access camera. Please check permissions.")
                .await?;
            Ok(Completion::Done)
        }
    }
}

/// Release the camera and answer any outstanding start request
pub async fn stop_capture(ctx: &mut EventContext) -> anyhow::Result<()> {
    let released = ctx.capture.stop();
    if released || ctx.pending_capture {
        ctx.scan_status("", false).await?;
    }
    ctx.finish_capture().await
}

/// Whether an event from session `epoch` belongs to the outstanding start request
fn is_live_session(ctx: &EventContext, epoch: u64) -> bool {
    ctx.pending_capture && ctx.capture.epoch() == epoch
}

pub async fn handle_frame_decoded(
    ctx: &mut EventContext,
    epoch: u64,
    data: String,
) -> anyhow::Result<()> {
    if !is_live_session(ctx, epoch) {
        tracing::debug!("Dropping decode from stopped session {epoch}");
        return Ok(());
    }

    // The session released the camera before reporting
    ctx.capture.stop();
    ctx.scan_status("", false).await?;

    let shown = display_scan_result(ctx, data).await;
    ctx.finish_capture().await?;
    shown
}

pub async fn handle_capture_failed(
    ctx: &mut EventContext,
    epoch: u64,
    reason: String,
) -> anyhow::Result<()> {
    if !is_live_session(ctx, epoch) {
        tracing::debug!("Ignoring failure from stopped session {epoch}: {reason}");
        return Ok(());
    }

    ctx.capture.stop();
    ctx.scan_status("Camera stopped", false).await?;
    ctx.alert(format!("Camera stopped: {reason}")).await?;
    ctx.finish_capture().await
}

pub async fn handle_scan_file(ctx: &mut EventContext, path: PathBuf) -> anyhow::Result<()> {
    tracing::info!("Scanning file {}", path.display());

    let decoder = ctx.state.decoder.clone();
    let result = tokio::task::spawn_blocking(move || scan_file(&path, decoder.as_ref()))
        .await
        .context("Scan task failed")?;

    report_still_scan(ctx, result).await
}

pub async fn handle_scan_clipboard(ctx: &mut EventContext) -> anyhow::Result<()> {
    let clipboard = ctx.state.clipboard.clone();
    let decoder = ctx.state.decoder.clone();

    let result = tokio::task::spawn_blocking(move || {
        let frame = clipboard.get_image()?;
        Ok::<_, anyhow::Error>(scan_frame(&frame, decoder.as_ref()))
    })
    .await
    .context("Scan task failed")??;

    report_still_scan(ctx, result).await
}

async fn report_still_scan(
    ctx: &mut EventContext,
    result: Result<String, ScanError>,
) -> anyhow::Result<()> {
    match result {
        Ok(data) => {
            display_scan_result(ctx, data).await?;
            ctx.notify("QR Code scanned successfully!").await
        }
        Err(e) => {
            tracing::warn!("Scan failed: {e}");
            ctx.alert(e.to_string()).await
        }
    }
}

/// Show a decoded payload and record it
pub async fn display_scan_result(ctx: &mut EventContext, data: String) -> anyhow::Result<()> {
    let openable = qrpro_io::is_openable(&data);
    ctx.ui.last_result = Some(data.clone());

    ctx.emit(AppEvent::ShowScanResult {
        data: data.clone(),
        openable,
    })
    .await?;

    ctx.state.history.record_scanned(&data)?;
    Ok(())
}

pub async fn handle_copy_result(ctx: &mut EventContext) -> anyhow::Result<()> {
    let Some(result) = ctx.ui.last_result.clone() else {
        return ctx.alert("Nothing scanned yet").await;
    };

    ctx.state.clipboard.set_text(&result)?;
    ctx.notify("Copied to clipboard!").await
}

pub async fn handle_open_result(ctx: &mut EventContext) -> anyhow::Result<()> {
    match ctx.ui.last_result.clone() {
        Some(result) if qrpro_io::is_openable(&result) => {
            qrpro_io::open_url(&result)?;
            Ok(())
        }
        Some(_) => ctx.alert("Scan result is not a link").await,
        None => ctx.alert("Nothing scanned yet").await,
    }
}
