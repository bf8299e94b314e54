use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;

/// Synchronous string-keyed storage over per-key files in the data dir.
/// Values are opaque to the store; callers JSON-encode them. Writes go
/// through a tmp file and rename so a crash never leaves a half-written
/// value behind.
pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("shekho");
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn file_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{key}.json"))
    }

    pub fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.file_path(key)).ok()
    }

    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.file_path(key);
        let tmp_path = path.with_extension("tmp");

        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(value.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_test_store() -> (TempDir, JsonStore) {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        (dir, store)
    }

    #[test]
    fn get_on_missing_key_is_none() {
        let (_dir, store) = make_test_store();
        assert_eq!(store.get("completed_units"), None);
    }

    #[test]
    fn set_then_get_round_trips() {
        let (_dir, store) = make_test_store();
        store.set("current_focus", "\"0-1\"").unwrap();
        assert_eq!(store.get("current_focus").as_deref(), Some("\"0-1\""));
    }

    #[test]
    fn set_overwrites_previous_value() {
        let (_dir, store) = make_test_store();
        store.set("current_focus", "\"0-0\"").unwrap();
        store.set("current_focus", "\"1-0\"").unwrap();
        assert_eq!(store.get("current_focus").as_deref(), Some("\"1-0\""));
    }

    #[test]
    fn no_tmp_file_survives_a_write() {
        let (dir, store) = make_test_store();
        store.set("completed_units", "[]").unwrap();
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().and_then(|x| x.to_str()) == Some("tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
