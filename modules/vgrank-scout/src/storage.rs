// Client-side persistence for the last ranking snapshot, search history and
// filter preferences.
//
// Everything sits behind KeyValueStore (get/set/remove of opaque text by key)
// so callers and tests never depend on a storage medium. Read failures of any
// kind degrade to the empty default; write failures are logged and dropped.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, bail, Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{error, warn};

use vgrank_common::{SearchFilters, SiteRanking};

pub const RANKING_DATA_KEY: &str = "vg_ranking_data";
pub const SEARCH_FILTERS_KEY: &str = "vg_search_filters";
pub const SEARCH_HISTORY_KEY: &str = "vg_search_history";

const ALL_KEYS: [&str; 3] = [RANKING_DATA_KEY, SEARCH_FILTERS_KEY, SEARCH_HISTORY_KEY];

/// Most-recent-first, deduplicated.
pub const MAX_HISTORY: usize = 10;

// ---------------------------------------------------------------------------
// KeyValueStore
// ---------------------------------------------------------------------------

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// In-process map. Used for session data and tests.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().map_err(|_| anyhow!("store lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().map_err(|_| anyhow!("store lock poisoned"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.lock().map_err(|_| anyhow!("store lock poisoned"))?;
        entries.remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per entry under a data directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            bail!("invalid storage key: {key:?}");
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;
        std::fs::write(&path, value)
            .with_context(|| format!("Failed to write {}", path.display()))
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to remove {}", path.display())),
        }
    }
}

// ---------------------------------------------------------------------------
// StateStore
// ---------------------------------------------------------------------------

/// Typed access to persisted UI state. `local` survives restarts, `session`
/// holds throwaway data for the current process.
#[derive(Clone)]
pub struct StateStore {
    local: Arc<dyn KeyValueStore>,
    session: Arc<dyn KeyValueStore>,
}

impl StateStore {
    pub fn new(local: Arc<dyn KeyValueStore>, session: Arc<dyn KeyValueStore>) -> Self {
        Self { local, session }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()), Arc::new(MemoryStore::new()))
    }

    pub fn save_ranking_data(&self, data: &[SiteRanking]) {
        if let Err(e) = write_json(self.local.as_ref(), RANKING_DATA_KEY, &data) {
            error!(error = %e, "Failed to save ranking data");
        }
    }

    /// Last saved snapshot with timestamps restored. Empty on any failure.
    ///
    /// Counts are recomputed from the stored products and empty sites are
    /// dropped, so a hand-edited snapshot cannot disagree with itself.
    pub fn ranking_data(&self) -> Vec<SiteRanking> {
        match read_json::<Vec<SiteRanking>>(self.local.as_ref(), RANKING_DATA_KEY) {
            Ok(data) => {
                let stored = data.unwrap_or_default();
                let stored_len = stored.len();
                let restored: Vec<SiteRanking> = stored
                    .into_iter()
                    .filter(|r| !r.products.is_empty())
                    .map(|r| SiteRanking::new(r.site, r.site_url, r.products, r.last_updated))
                    .collect();
                if restored.len() != stored_len {
                    warn!(
                        dropped = stored_len - restored.len(),
                        "Dropped empty sites from stored ranking data"
                    );
                }
                restored
            }
            Err(e) => {
                warn!(error = %e, "Failed to load ranking data");
                Vec::new()
            }
        }
    }

    pub fn save_search_filters(&self, filters: &SearchFilters) {
        if let Err(e) = write_json(self.local.as_ref(), SEARCH_FILTERS_KEY, filters) {
            error!(error = %e, "Failed to save search filters");
        }
    }

    pub fn search_filters(&self) -> Option<SearchFilters> {
        match read_json(self.local.as_ref(), SEARCH_FILTERS_KEY) {
            Ok(filters) => filters,
            Err(e) => {
                warn!(error = %e, "Failed to load search filters");
                None
            }
        }
    }

    /// Push `query` to the front of the history, dropping older duplicates.
    pub fn save_search_history(&self, query: &str) {
        let mut history = self.search_history();
        history.retain(|q| q != query);
        history.insert(0, query.to_string());
        history.truncate(MAX_HISTORY);

        if let Err(e) = write_json(self.local.as_ref(), SEARCH_HISTORY_KEY, &history) {
            error!(error = %e, "Failed to save search history");
        }
    }

    pub fn search_history(&self) -> Vec<String> {
        match read_json(self.local.as_ref(), SEARCH_HISTORY_KEY) {
            Ok(history) => history.unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "Failed to load search history");
                Vec::new()
            }
        }
    }

    pub fn clear_all(&self) {
        for key in ALL_KEYS {
            if let Err(e) = self.local.remove(key) {
                error!(key, error = %e, "Failed to clear storage data");
            }
        }
    }

    // --- session data ---

    pub fn save_temporary<T: Serialize>(&self, key: &str, data: &T) {
        if let Err(e) = write_json(self.session.as_ref(), key, data) {
            error!(key, error = %e, "Failed to save temporary data");
        }
    }

    pub fn temporary<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match read_json(self.session.as_ref(), key) {
            Ok(data) => data,
            Err(e) => {
                warn!(key, error = %e, "Failed to load temporary data");
                None
            }
        }
    }

    pub fn remove_temporary(&self, key: &str) {
        if let Err(e) = self.session.remove(key) {
            error!(key, error = %e, "Failed to remove temporary data");
        }
    }
}

fn write_json<T: Serialize + ?Sized>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<()> {
    let text = serde_json::to_string(value)?;
    store.set(key, &text)
}

fn read_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Result<Option<T>> {
    let Some(text) = store.get(key)? else {
        return Ok(None);
    };
    let value = serde_json::from_str(&text)
        .with_context(|| format!("Corrupt value under {key}"))?;
    Ok(Some(value))
}
