use qrpro_types::{AppEvent, HistoryCategory};
use uuid::Uuid;

use super::EventContext;

pub async fn handle_load(ctx: &mut EventContext) -> anyhow::Result<()> {
    let generated = ctx.state.history.list(HistoryCategory::Generated)?;
    let scanned = ctx.state.history.list(HistoryCategory::Scanned)?;
    tracing::debug!(
        "Loaded history: {} generated, {} scanned",
        generated.len(),
        scanned.len()
    );

    ctx.emit(AppEvent::ShowHistory { generated, scanned }).await
}

pub async fn handle_delete(
    ctx: &mut EventContext,
    category: HistoryCategory,
    index: usize,
) -> anyhow::Result<()> {
    let removed = ctx.state.history.delete_at(category, index)?;
    tracing::info!("Deleted {category} record {}", removed.id);

    ctx.notify("Item deleted").await?;
    handle_load(ctx).await
}

pub async fn handle_delete_by_id(
    ctx: &mut EventContext,
    category: HistoryCategory,
    id: Uuid,
) -> anyhow::Result<()> {
    ctx.state.history.delete_by_id(category, id)?;
    tracing::info!("Deleted {category} record {id}");

    ctx.notify("Item deleted").await?;
    handle_load(ctx).await
}

pub async fn handle_clear(ctx: &mut EventContext, category: HistoryCategory) -> anyhow::Result<()> {
    ctx.state.history.clear(category)?;
    tracing::info!("Cleared {category} history");

    ctx.notify("History cleared").await?;
    handle_load(ctx).await
}

pub async fn handle_copy(
    ctx: &mut EventContext,
    category: HistoryCategory,
    index: usize,
) -> anyhow::Result<()> {
    let record = ctx.state.history.get(category, index)?;
    ctx.state.clipboard.set_text(&record.data)?;
    ctx.notify("Copied to clipboard!").await
}
