use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::client::ClientError;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:3000";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    pub server_url: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
        }
    }
}

impl CliConfig {
    pub fn load(config_dir: &Path) -> Result<Self, ClientError> {
        let file = config_dir.join("cli.json");
        if !file.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(file)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, config_dir: &Path) -> Result<(), ClientError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_dir.join("cli.json"), content)?;
        Ok(())
    }
}

/// What survives between CLI invocations once a professor has logged in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSession {
    pub token: String,
    pub username: String,
    pub id: i32,
}

/// `session.json` in the CLI config directory
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(config_dir: &Path) -> Self {
        Self {
            path: config_dir.join("session.json"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing or unreadable file means nobody is logged in.
    pub fn load(&self) -> Result<Option<StoredSession>, ClientError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        match serde_json::from_str(&content) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                tracing::warn!("Discarding corrupt session file {}: {}", self.path.display(), e);
                self.clear()?;
                Ok(None)
            }
        }
    }

    pub fn save(&self, session: &StoredSession) -> Result<(), ClientError> {
        fs::write(&self.path, serde_json::to_string_pretty(session)?)?;
        Ok(())
    }

    pub fn clear(&self) -> Result<(), ClientError> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

pub fn get_config_dir() -> Result<PathBuf, ClientError> {
    let config_dir = if let Ok(custom_dir) = std::env::var("ATTENDANCE_CLI_CONFIG_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = std::env::var("HOME").map_err(|_| ClientError::NoHome)?;
        PathBuf::from(home).join(".config").join("attendance").join("cli")
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}
