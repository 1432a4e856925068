use std::path::{Path, PathBuf};

use anyhow::Context;
use qrpro_types::Preset;

pub fn export_file_name(preset: Preset, timestamp_ms: i64) -> String {
    format!("qrcode-{preset}-{timestamp_ms}.png")
}

/// Write encoded PNG bytes into `dir`, creating it when missing
pub async fn download_png(
    dir: &Path,
    preset: Preset,
    timestamp_ms: i64,
    png: &[u8],
) -> anyhow::Result<PathBuf> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("Failed to create export directory {}", dir.display()))?;

    let path = dir.join(export_file_name(preset, timestamp_ms));
    tokio::fs::write(&path, png)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    tracing::info!("Saved {} ({} bytes)", path.display(), png.len());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_carries_preset_and_time() {
        assert_eq!(
            export_file_name(Preset::Wifi, 1_700_000_000_123),
            "qrcode-wifi-1700000000123.png"
        );
    }

    #[tokio::test]
    async fn download_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("exports");

        let path = download_png(&target, Preset::Text, 42, b"\x89PNG")
            .await
            .unwrap();

        assert_eq!(path, target.join("qrcode-text-42.png"));
        assert_eq!(std::fs::read(&path).unwrap(), b"\x89PNG");
    }
}
