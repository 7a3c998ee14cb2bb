use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::config::get_config_dir;
use crate::error::{KeechatError, KeechatResult};
use crate::models::{AdminSession, ChatIdentity};

const CHAT_RECORD: &str = "chat_user.json";
const ADMIN_RECORD: &str = "admin_user.json";

/// Persistent store for the two client-side identity records.
///
/// The chat identity and the admin session are independent: clearing one
/// never touches the other. Written on successful registration/login,
/// read at flow activation, cleared on logout or a 401.
pub trait SessionStore: Send + Sync {
    fn load_chat_identity(&self) -> KeechatResult<Option<ChatIdentity>>;
    fn store_chat_identity(&self, identity: &ChatIdentity) -> KeechatResult<()>;
    fn clear_chat_identity(&self) -> KeechatResult<()>;

    fn load_admin_session(&self) -> KeechatResult<Option<AdminSession>>;
    fn store_admin_session(&self, session: &AdminSession) -> KeechatResult<()>;
    fn clear_admin_session(&self) -> KeechatResult<()>;
}

/// JSON records under the per-user config directory.
pub struct FileSessionStore {
    dir: PathBuf,
}

impl FileSessionStore {
    pub fn new() -> KeechatResult<Self> {
        let dir = get_config_dir()
            .ok_or_else(|| KeechatError::Store("no user config directory available".to_string()))?;
        Self::with_dir(dir)
    }

    pub fn with_dir(dir: PathBuf) -> KeechatResult<Self> {
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    // A record that fails to read or parse is treated as absent.
    fn read_record<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
        let path = self.dir.join(name);
        let raw = fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(file = %path.display(), "discarding unreadable session record: {e}");
                None
            }
        }
    }

    fn write_record<T: Serialize>(&self, name: &str, value: &T) -> KeechatResult<()> {
        let raw = serde_json::to_string_pretty(value)?;
        fs::write(self.dir.join(name), raw)?;
        Ok(())
    }

    fn clear_record(&self, name: &str) -> KeechatResult<()> {
        match fs::remove_file(self.dir.join(name)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl SessionStore for FileSessionStore {
    fn load_chat_identity(&self) -> KeechatResult<Option<ChatIdentity>> {
        Ok(self.read_record(CHAT_RECORD))
    }

    fn store_chat_identity(&self, identity: &ChatIdentity) -> KeechatResult<()> {
        self.write_record(CHAT_RECORD, identity)
    }

    fn clear_chat_identity(&self) -> KeechatResult<()> {
        self.clear_record(CHAT_RECORD)
    }

    fn load_admin_session(&self) -> KeechatResult<Option<AdminSession>> {
        Ok(self.read_record(ADMIN_RECORD))
    }

    fn store_admin_session(&self, session: &AdminSession) -> KeechatResult<()> {
        self.write_record(ADMIN_RECORD, session)
    }

    fn clear_admin_session(&self) -> KeechatResult<()> {
        self.clear_record(ADMIN_RECORD)
    }
}

/// In-memory store used by tests and embedders.
#[derive(Default)]
pub struct MemorySessionStore {
    records: Mutex<HashMap<&'static str, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn get<T: DeserializeOwned>(&self, key: &'static str) -> KeechatResult<Option<T>> {
        let records = self
            .records
            .lock()
            .map_err(|_| KeechatError::Store("session store lock poisoned".to_string()))?;
        match records.get(key) {
            Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
            None => Ok(None),
        }
    }

    fn set<T: Serialize>(&self, key: &'static str, value: &T) -> KeechatResult<()> {
        let raw = serde_json::to_string(value)?;
        self.records
            .lock()
            .map_err(|_| KeechatError::Store("session store lock poisoned".to_string()))?
            .insert(key, raw);
        Ok(())
    }

    fn remove(&self, key: &'static str) -> KeechatResult<()> {
        self.records
            .lock()
            .map_err(|_| KeechatError::Store("session store lock poisoned".to_string()))?
            .remove(key);
        Ok(())
    }
}

impl SessionStore for MemorySessionStore {
    fn load_chat_identity(&self) -> KeechatResult<Option<ChatIdentity>> {
        self.get(CHAT_RECORD)
    }

    fn store_chat_identity(&self, identity: &ChatIdentity) -> KeechatResult<()> {
        self.set(CHAT_RECORD, identity)
    }

    fn clear_chat_identity(&self) -> KeechatResult<()> {
        self.remove(CHAT_RECORD)
    }

    fn load_admin_session(&self) -> KeechatResult<Option<AdminSession>> {
        self.get(ADMIN_RECORD)
    }

    fn store_admin_session(&self, session: &AdminSession) -> KeechatResult<()> {
        self.set(ADMIN_RECORD, session)
    }

    fn clear_admin_session(&self) -> KeechatResult<()> {
        self.remove(ADMIN_RECORD)
    }
}
