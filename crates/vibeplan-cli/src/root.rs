use anyhow::Context;
use std::path::{Path, PathBuf};
use vibeplan_core::{paths, Store};

/// Resolve the data directory.
///
/// Priority:
/// 1. `--data-dir` flag / `VIBEPLAN_HOME` env var (passed in as `explicit`)
/// 2. `~/.vibeplan`
/// 3. `./.vibeplan`
pub fn resolve_data_dir(explicit: Option<&Path>) -> PathBuf {
    paths::resolve_data_dir(explicit)
}

pub fn open_store(data_dir: &Path) -> anyhow::Result<Store> {
    Store::open_in(data_dir)
        .with_context(|| format!("failed to open database in {}", data_dir.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_dir_wins() {
        let dir = TempDir::new().unwrap();
        assert_eq!(resolve_data_dir(Some(dir.path())), dir.path());
    }

    #[test]
    fn open_store_creates_missing_dir() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a/b");
        open_store(&nested).unwrap();
        assert!(paths::db_path(&nested).exists());
    }
}
