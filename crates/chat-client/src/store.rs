//! Persistent session store.
//!
//! Remembers one opaque session id between runs. The store mirrors the
//! id held by [`ChatSession`](crate::ChatSession); it is never the source
//! of truth. Storage failures are logged and degrade to no-ops, which
//! leaves the facade working from memory for the rest of the process.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

/// Key under which the session id is stored.
pub const SESSION_KEY: &str = "Health ChatPal_session_id";

/// Durable home for a single session id.
pub trait SessionStore: Send + Sync {
    /// The stored id, or `None` if never set. Empty values read as `None`.
    fn get(&self) -> Option<String>;

    /// Overwrite the stored id.
    fn set(&self, session_id: &str);

    /// Forget the stored id.
    fn clear(&self);
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// In-memory store
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Process-local store. Used for `--ephemeral` runs and as a test fake.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    value: Mutex<Option<String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `session_id`.
    pub fn with_session(session_id: impl Into<String>) -> Self {
        Self {
            value: Mutex::new(Some(session_id.into())),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> Option<String> {
        self.value.lock().clone().filter(|s| !s.is_empty())
    }

    fn set(&self, session_id: &str) {
        *self.value.lock() = Some(session_id.to_owned());
    }

    fn clear(&self) {
        *self.value.lock() = None;
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// File-backed store
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A small JSON key-value file, the desktop stand-in for browser local
/// storage. Other keys in the file are preserved on write.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> BTreeMap<String, String> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return BTreeMap::new(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "session store unreadable");
                return BTreeMap::new();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(path = %self.path.display(), error = %e, "session store corrupt; ignoring");
            BTreeMap::new()
        })
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> std::io::Result<()> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        let json = serde_json::to_vec_pretty(map)?;
        let tmp = self.path.with_extension("json.tmp");
        {
            let mut f = std::fs::File::create(&tmp)?;
            f.write_all(&json)?;
            f.sync_all()?;
        }
        std::fs::rename(&tmp, &self.path)
    }

    /// Read-modify-write. `apply` returns whether it changed the map;
    /// unchanged maps are not written back.
    fn update(&self, op: &str, apply: impl FnOnce(&mut BTreeMap<String, String>) -> bool) {
        let _guard = self.lock.lock();
        let mut map = self.read_map();
        if !apply(&mut map) {
            return;
        }
        if let Err(e) = self.write_map(&map) {
            tracing::warn!(
                path = %self.path.display(),
                op,
                error = %e,
                "session store write failed; continuing in memory"
            );
        }
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self) -> Option<String> {
        let _guard = self.lock.lock();
        self.read_map()
            .remove(SESSION_KEY)
            .filter(|s| !s.is_empty())
    }

    fn set(&self, session_id: &str) {
        self.update("set", |map| {
            map.insert(SESSION_KEY.to_owned(), session_id.to_owned())
                .as_deref()
                != Some(session_id)
        });
    }

    fn clear(&self) {
        self.update("clear", |map| map.remove(SESSION_KEY).is_some());
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
