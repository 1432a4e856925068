use std::path::PathBuf;

use qrpro_core::history::now_millis;
use qrpro_core::preset::build_payload;
use qrpro_core::state::GeneratedCode;
use qrpro_core::{GenerateError, RenderOptions};
use qrpro_io::ShareError;
use qrpro_types::{AppEvent, HistoryCategory, Page, Preset, PresetForm, ShownCode};

use super::{EventContext, route};

pub async fn handle_generate(ctx: &mut EventContext, form: PresetForm) -> anyhow::Result<()> {
    let preset = form.preset();

    let payload = match build_payload(&form) {
        Ok(payload) => payload,
        Err(GenerateError::MissingRequired(field)) => {
            tracing::debug!("Generation suppressed, {field} is empty");
            return ctx.alert("Please fill in required fields").await;
        }
        Err(e) => return Err(e.into()),
    };

    render_and_record(ctx, preset, payload).await
}

/// Render, then record. Nothing is recorded when rendering fails.
async fn render_and_record(
    ctx: &mut EventContext,
    preset: Preset,
    payload: String,
) -> anyhow::Result<()> {
    show_code(ctx, preset, payload, true).await?;
    ctx.notify("QR Code generated successfully!").await
}

/// Render `payload` and make it the current code
async fn show_code(
    ctx: &mut EventContext,
    preset: Preset,
    payload: String,
    record: bool,
) -> anyhow::Result<()> {
    let (options, show_preview) = {
        let config = ctx.state.config.read().await;
        (
            RenderOptions::for_theme(ctx.ui.theme, &config.render)?,
            config.render.terminal_preview,
        )
    };

    let code = ctx.state.encoder.render(&payload, &options)?;
    tracing::info!(
        "Rendered {preset} code, {} chars, {}x{}",
        payload.chars().count(),
        code.width,
        code.height
    );

    if record {
        ctx.state.history.record_generated(preset, &payload)?;
    }

    let preview = if show_preview {
        code.preview.clone()
    } else {
        String::new()
    };
    ctx.emit(AppEvent::ShowCode(ShownCode {
        preset,
        payload: payload.clone(),
        preview,
    }))
    .await?;

    ctx.ui.last_code = Some(GeneratedCode {
        preset,
        payload,
        code,
    });
    Ok(())
}

/// Generate again from a "generated" history record
pub async fn handle_regenerate(ctx: &mut EventContext, index: usize) -> anyhow::Result<()> {
    let record = ctx.state.history.get(HistoryCategory::Generated, index)?;
    let preset = record.kind.unwrap_or_default();

    route(ctx, Page::Generator).await?;

    match preset {
        Preset::Text => handle_generate(ctx, PresetForm::Text { text: record.data }).await,
        _ if record.data.trim().is_empty() => ctx.alert("Please fill in required fields").await,
        _ => render_and_record(ctx, preset, record.data).await,
    }
}

/// Show a "generated" record again, leaving history untouched
pub async fn handle_recall(ctx: &mut EventContext, index: usize) -> anyhow::Result<()> {
    let record = ctx.state.history.get(HistoryCategory::Generated, index)?;
    if record.data.trim().is_empty() {
        return ctx.alert("Please fill in required fields").await;
    }

    route(ctx, Page::Generator).await?;
    show_code(ctx, record.kind.unwrap_or_default(), record.data, false).await
}

pub async fn handle_download(ctx: &mut EventContext) -> anyhow::Result<()> {
    let Some((preset, png)) = last_png(ctx)? else {
        return ctx.alert("Generate a QR code first").await;
    };

    let dir = {
        let config = ctx.state.config.read().await;
        PathBuf::from(&config.ui.export_dir)
    };

    let path = qrpro_io::download_png(&dir, preset, now_millis(), &png).await?;
    ctx.notify(format!("QR Code downloaded! {}", path.display()))
        .await
}

pub async fn handle_share(ctx: &mut EventContext) -> anyhow::Result<()> {
    let Some((preset, png)) = last_png(ctx)? else {
        return ctx.alert("Generate a QR code first").await;
    };

    match qrpro_io::share_png(preset, &png) {
        Ok(()) => ctx.notify("Shared successfully!").await,
        Err(e @ ShareError::Unsupported) => ctx.alert(e.to_string()).await,
    }
}

fn last_png(ctx: &EventContext) -> anyhow::Result<Option<(Preset, Vec<u8>)>> {
    match &ctx.ui.last_code {
        Some(last) => Ok(Some((last.preset, qrpro_render::encode_png(&last.code)?))),
        None => Ok(None),
    }
}
