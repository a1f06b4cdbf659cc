//! # JSON File Cart Store
//!
//! One pretty-printed JSON file per session under a data directory.
//!
//! ## Write Path
//! ```text
//! save(snapshot)
//!     │
//!     ├── validate session id (UUID only, so it cannot escape the directory)
//!     ├── write <dir>/<session>.json.tmp
//!     └── rename → <dir>/<session>.json   (atomic on the same filesystem)
//! ```

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use liyana_core::validation::validate_session_id;
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::snapshot::PersistedCart;
use crate::CartStore;

/// File-backed cart store.
#[derive(Debug, Clone)]
pub struct JsonFileCartStore {
    dir: PathBuf,
}

impl JsonFileCartStore {
    /// Opens (creating if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        info!(?dir, "Cart store ready");
        Ok(JsonFileCartStore { dir })
    }

    /// Opens the store in the platform data directory.
    pub fn open_default() -> StoreResult<Self> {
        Self::open(Self::default_dir().ok_or(StoreError::NoDataDir)?)
    }

    /// `<platform data dir>/carts`, e.g. `~/.local/share/liyana-nour/carts`.
    pub fn default_dir() -> Option<PathBuf> {
        directories::ProjectDirs::from("de", "liyana-nour", "liyana-nour")
            .map(|dirs| dirs.data_dir().join("carts"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, session_id: &str) -> StoreResult<PathBuf> {
        validate_session_id(session_id)?;
        Ok(self.dir.join(format!("{}.json", session_id)))
    }
}

impl CartStore for JsonFileCartStore {
    fn load(&self, session_id: &str) -> StoreResult<Option<PersistedCart>> {
        let path = self.path_for(session_id)?;

        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(?path, "No saved cart");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let snapshot = serde_json::from_str(&contents)?;
        debug!(?path, "Loaded saved cart");
        Ok(Some(snapshot))
    }

    fn save(&self, snapshot: &PersistedCart) -> StoreResult<()> {
        let path = self.path_for(&snapshot.session_id)?;
        let tmp = path.with_extension("json.tmp");

        let contents = serde_json::to_string_pretty(snapshot)?;
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, &path)?;

        debug!(
            ?path,
            items = snapshot.items.len(),
            coupons = snapshot.applied_coupons.len(),
            "Saved cart"
        );
        Ok(())
    }

    fn remove(&self, session_id: &str) -> StoreResult<bool> {
        let path = self.path_for(session_id)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(?path, "Removed saved cart");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
