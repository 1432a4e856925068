use qrpro_types::{AppEvent, Theme};

use super::EventContext;

pub async fn handle_toggle(ctx: &mut EventContext) -> anyhow::Result<()> {
    let next = ctx.ui.theme.toggled();
    apply_theme(ctx, next).await
}

/// Switch and persist. Codes already on screen keep their colors.
pub async fn apply_theme(ctx: &mut EventContext, theme: Theme) -> anyhow::Result<()> {
    ctx.ui.theme = theme;
    ctx.state.themes.save(theme)?;
    tracing::info!("Theme set to {theme}");

    ctx.emit(AppEvent::ThemeChanged(theme)).await
}
