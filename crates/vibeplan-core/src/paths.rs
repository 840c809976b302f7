use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Layout constants
// ---------------------------------------------------------------------------

pub const DATA_DIR_NAME: &str = ".vibeplan";
pub const DB_FILE: &str = "vibeplan.db";
pub const AI_CONFIG_FILE: &str = "ai-config.yaml";
pub const WIZARD_FILE: &str = "wizard.yaml";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn db_path(data_dir: &Path) -> PathBuf {
    data_dir.join(DB_FILE)
}

pub fn ai_config_path(data_dir: &Path) -> PathBuf {
    data_dir.join(AI_CONFIG_FILE)
}

pub fn wizard_path(data_dir: &Path) -> PathBuf {
    data_dir.join(WIZARD_FILE)
}

/// `~/.vibeplan`, or `./.vibeplan` when no home directory can be found.
pub fn default_data_dir() -> PathBuf {
    match home::home_dir() {
        Some(home) => home.join(DATA_DIR_NAME),
        None => PathBuf::from(DATA_DIR_NAME),
    }
}

/// An explicit directory wins; otherwise fall back to [`default_data_dir`].
pub fn resolve_data_dir(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(default_data_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn files_live_directly_in_data_dir() {
        let dir = Path::new("/tmp/vp");
        assert_eq!(db_path(dir), PathBuf::from("/tmp/vp/vibeplan.db"));
        assert_eq!(ai_config_path(dir), PathBuf::from("/tmp/vp/ai-config.yaml"));
        assert_eq!(wizard_path(dir), PathBuf::from("/tmp/vp/wizard.yaml"));
    }

    #[test]
    fn explicit_dir_wins() {
        let dir = Path::new("/srv/plans");
        assert_eq!(resolve_data_dir(Some(dir)), dir);
    }

    #[test]
    fn default_ends_with_dot_vibeplan() {
        assert!(resolve_data_dir(None).ends_with(DATA_DIR_NAME));
    }
}
