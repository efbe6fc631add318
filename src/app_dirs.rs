use directories::ProjectDirs;
use std::path::PathBuf;

const APP_NAME: &str = "timestable";
const SETTINGS_DB: &str = "settings.db";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    pub fn db_path() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            let state_dir = PathBuf::from(home)
                .join(".local")
                .join("state")
                .join(APP_NAME);
            Some(state_dir.join(SETTINGS_DB))
        } else {
            ProjectDirs::from("", "", APP_NAME)
                .map(|proj_dirs| proj_dirs.data_local_dir().join(SETTINGS_DB))
        }
    }
}
