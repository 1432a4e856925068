use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use directories::ProjectDirs;
use qrpro_config::Config;
use serde::{Deserialize, Serialize};

pub const MAIN_PROFILE: &str = "main";

fn project_dirs() -> anyhow::Result<ProjectDirs> {
    ProjectDirs::from("com", "qrpro", "qrpro").context("Failed to determine user directories")
}

/// `<config dir>/profiles`
pub fn profiles_dir() -> anyhow::Result<PathBuf> {
    Ok(project_dirs()?.config_dir().join("profiles"))
}

/// Where history and theme are persisted for this config
pub fn data_dir(config: &Config) -> anyhow::Result<PathBuf> {
    match &config.history.data_dir {
        Some(dir) => Ok(PathBuf::from(dir)),
        None => Ok(project_dirs()?.data_dir().to_path_buf()),
    }
}

/// Represents a user profile
#[derive(Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub value: Config,
}

fn profile_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}.json"))
}

fn read_profile(path: &Path) -> anyhow::Result<Config> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read profile {}", path.display()))?;
    let profile: Profile = serde_json::from_str(&data)
        .with_context(|| format!("Failed to parse profile {}", path.display()))?;
    Ok(profile.value)
}

fn write_profile(path: &Path, name: &str, value: Config) -> anyhow::Result<()> {
    let profile = Profile {
        name: name.into(),
        value,
    };
    fs::write(path, serde_json::to_string_pretty(&profile)?)
        .with_context(|| format!("Failed to write profile {}", path.display()))?;
    Ok(())
}

/// Create the profiles folder and the main profile if missing
pub fn init_user_config(dir: &Path) -> anyhow::Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;

    let main_profile = profile_path(dir, MAIN_PROFILE);
    if !main_profile.exists() {
        write_profile(&main_profile, MAIN_PROFILE, Config::default())?;
        tracing::info!("Created main profile at {}", main_profile.display());
    }

    Ok(())
}

/// Load a profile by name, falling back to main, then to defaults
pub fn load_user_profile(dir: &Path, name: &str) -> anyhow::Result<Config> {
    let profile_file = profile_path(dir, name);
    if profile_file.exists() {
        return read_profile(&profile_file);
    }

    tracing::warn!("Profile {name} not found, falling back to main profile");
    let main_file = profile_path(dir, MAIN_PROFILE);
    if main_file.exists() {
        read_profile(&main_file)
    } else {
        Ok(Config::default())
    }
}

/// Add a new profile cloned from main
pub fn add_profile_from_default(dir: &Path, new_name: &str) -> anyhow::Result<PathBuf> {
    let base = load_user_profile(dir, MAIN_PROFILE)?;
    let file = profile_path(dir, new_name);
    write_profile(&file, new_name, base)?;
    tracing::info!("Created new profile: {new_name}");
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_writes_main_profile_once() {
        let dir = tempfile::tempdir().unwrap();
        init_user_config(dir.path()).unwrap();

        let main = dir.path().join("main.json");
        assert!(main.exists());

        fs::write(
            &main,
            r#"{"name":"main","value":{"capture":{"tick_ms":33}}}"#,
        )
        .unwrap();
        init_user_config(dir.path()).unwrap();

        let config = load_user_profile(dir.path(), MAIN_PROFILE).unwrap();
        assert_eq!(config.capture.tick_ms, 33);
    }

    #[test]
    fn unknown_profile_falls_back_to_main() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("main.json"),
            r#"{"name":"main","value":{"ui":{"export_dir":"/tmp/codes"}}}"#,
        )
        .unwrap();

        let config = load_user_profile(dir.path(), "work").unwrap();
        assert_eq!(config.ui.export_dir, "/tmp/codes");
    }

    #[test]
    fn missing_everything_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_user_profile(dir.path(), "work").unwrap();
        assert_eq!(config.render.size, 280);
    }

    #[test]
    fn new_profile_clones_main() {
        let dir = tempfile::tempdir().unwrap();
        init_user_config(dir.path()).unwrap();

        let path = add_profile_from_default(dir.path(), "work").unwrap();
        assert_eq!(path, dir.path().join("work.json"));

        let data = fs::read_to_string(path).unwrap();
        assert!(data.contains("\"name\": \"work\""));
    }

    #[test]
    fn explicit_data_dir_wins() {
        let mut config = Config::default();
        config.history.data_dir = Some("/var/lib/qrpro".into());
        assert_eq!(data_dir(&config).unwrap(), PathBuf::from("/var/lib/qrpro"));
    }
}
