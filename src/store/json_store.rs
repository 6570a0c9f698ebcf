use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;

use crate::store::schema::Progress;

const PROGRESS_FILE: &str = "progress.json";

/// Persistence for the one progress record: one get, one set, whole-record
/// replace. Reads never fail outward — a missing or malformed blob degrades
/// to the zeroed default.
pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("quizdr");
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    #[allow(dead_code)] // Used by integration tests
    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn file_path(&self) -> PathBuf {
        self.base_dir.join(PROGRESS_FILE)
    }

    pub fn load_progress(&self) -> Progress {
        let path = self.file_path();
        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
                Err(_) => Progress::default(),
            }
        } else {
            Progress::default()
        }
    }

    /// Atomic replace: write to a temp file, fsync, rename over the original.
    /// Concurrent writers from other processes are last-writer-wins.
    pub fn save_progress(&self, progress: &Progress) -> Result<()> {
        let path = self.file_path();
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(progress)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }
}
