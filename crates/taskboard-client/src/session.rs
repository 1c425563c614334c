//! Signed-in identity and the key/value store it is persisted in.
//!
//! The session is read once at startup and written on login and logout.
//! It is owned by the composition root and handed to whoever needs it.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use taskboard_core::{TaskboardError, TaskboardResult};
use taskboard_domain::{Role, User};

use crate::jwt;

pub const TOKEN_KEY: &str = "auth_token";
pub const USER_KEY: &str = "auth_user";
pub const ROLE_KEY: &str = "auth_role";
pub const EMAIL_KEY: &str = "auth_email";

const SESSION_KEYS: [&str; 4] = [TOKEN_KEY, USER_KEY, ROLE_KEY, EMAIL_KEY];

/// String key/value storage that survives restarts.
pub trait LocalStorage: Send {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> TaskboardResult<()>;
    fn remove(&mut self, key: &str) -> TaskboardResult<()>;
}

/// JSON object on disk. Every change rewrites the file atomically.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStorage {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl AsRef<Path>) -> TaskboardResult<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = match std::fs::read(&path) {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => BTreeMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                TaskboardError::Serialization(format!("{}: {e}", path.display()))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        tracing::debug!(path = %path.display(), keys = entries.len(), "Opened local storage");
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> TaskboardResult<()> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent)?;

        let data = serde_json::to_vec_pretty(&self.entries)?;
        let mut temp_file = tempfile::NamedTempFile::new_in(parent)?;
        temp_file.write_all(&data)?;
        temp_file
            .persist(&self.path)
            .map_err(|e| TaskboardError::Io(e.error))?;

        tracing::debug!("Atomically wrote {} bytes to {}", data.len(), self.path.display());
        Ok(())
    }
}

impl LocalStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> TaskboardResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> TaskboardResult<()> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: BTreeMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> TaskboardResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> TaskboardResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}

pub struct AuthSession {
    storage: Box<dyn LocalStorage>,
    user: Option<User>,
}

impl AuthSession {
    /// Restore whatever a previous run left in `storage`.
    pub fn rehydrate(storage: Box<dyn LocalStorage>) -> Self {
        let user = match (storage.get(TOKEN_KEY), storage.get(USER_KEY)) {
            (Some(token), Some(username)) if !token.is_empty() => {
                let role = storage
                    .get(ROLE_KEY)
                    .map(|raw| Role::parse_lenient(&raw))
                    .or_else(|| jwt::role_from_token(&token))
                    .unwrap_or_default();
                Some(User {
                    username,
                    role,
                    email: storage.get(EMAIL_KEY).unwrap_or_default(),
                    token,
                })
            }
            _ => None,
        };
        if let Some(user) = &user {
            tracing::debug!(username = %user.username, role = %user.role, "Restored session");
        }
        Self { storage, user }
    }

    pub fn login(&mut self, user: User) -> TaskboardResult<()> {
        self.storage.set(TOKEN_KEY, &user.token)?;
        self.storage.set(USER_KEY, &user.username)?;
        self.storage.set(ROLE_KEY, user.role.as_str())?;
        self.storage.set(EMAIL_KEY, &user.email)?;
        tracing::info!(username = %user.username, role = %user.role, "Signed in");
        self.user = Some(user);
        Ok(())
    }

    /// Forget the user and clear every persisted session key.
    pub fn logout(&mut self) -> TaskboardResult<()> {
        if let Some(user) = self.user.take() {
            tracing::info!(username = %user.username, "Signed out");
        }
        for key in SESSION_KEYS {
            self.storage.remove(key)?;
        }
        Ok(())
    }

    pub fn current(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.user.as_ref().map(|user| user.token.as_str())
    }

    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|user| user.role)
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Adopt the role reported by the profile endpoint.
    pub fn set_role(&mut self, role: Role) -> TaskboardResult<()> {
        let Some(user) = self.user.as_mut() else {
            return Err(TaskboardError::NotAuthenticated);
        };
        if user.role != role {
            user.role = role;
            self.storage.set(ROLE_KEY, role.as_str())?;
        }
        Ok(())
    }

    pub fn require_user(&self) -> TaskboardResult<&User> {
        self.user.as_ref().ok_or(TaskboardError::NotAuthenticated)
    }
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("username", &self.user.as_ref().map(|u| &u.username))
            .field("role", &self.role())
            .finish()
    }
}
