//! Credential file management
//!
//! The credentials live in a four-line text file:
//!
//! ```text
//! valid
//! <access key>
//! <secret key>
//! <region>
//! ```
//!
//! The file is stored under the user's state directory
//! (`$XDG_STATE_HOME/s3-sync/config.cfg` on Linux) unless `S3_SYNC_CONFIG_DIR`
//! points elsewhere.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Environment variable overriding the configuration directory
pub const CONFIG_DIR_ENV: &str = "S3_SYNC_CONFIG_DIR";

/// File name of the credential file
const CONFIG_FILE_NAME: &str = "config.cfg";

/// Marker expected on the first line
const VALID_MARKER: &str = "valid";

/// Access credentials for the storage service
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Access key ID
    pub access_key: String,

    /// Secret access key
    pub secret_key: String,

    /// Service region
    pub region: String,
}

impl Credentials {
    pub fn new(
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            region: region.into(),
        }
    }

    fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("access key", &self.access_key),
            ("secret key", &self.secret_key),
            ("region", &self.region),
        ] {
            if value.trim().is_empty() {
                return Err(Error::Config(format!("{name} cannot be empty")));
            }
            if value.contains(['\n', '\r']) {
                return Err(Error::Config(format!("{name} cannot contain line breaks")));
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("region", &self.region)
            .finish()
    }
}

/// Configuration manager handles loading and saving the credential file
#[derive(Debug)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new ConfigManager with the default config path
    pub fn new() -> Result<Self> {
        let config_dir = match std::env::var_os(CONFIG_DIR_ENV) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => dirs::state_dir()
                .or_else(dirs::data_local_dir)
                .ok_or_else(|| Error::Config("Could not determine config directory".into()))?
                .join("s3-sync"),
        };
        Ok(Self::with_path(config_dir.join(CONFIG_FILE_NAME)))
    }

    /// Create a ConfigManager with a custom path (useful for testing)
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the configuration file path
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Load credentials from disk
    pub fn load(&self) -> Result<Credentials> {
        if !self.config_path.exists() {
            return Err(Error::ConfigMissing(self.config_path.clone()));
        }

        let content = std::fs::read_to_string(&self.config_path)?;
        parse_credentials(&content)
    }

    /// Save credentials to disk
    ///
    /// Creates parent directories if they don't exist.
    /// Sets file permissions to 600 (owner read/write only).
    pub fn save(&self, credentials: &Credentials) -> Result<()> {
        credentials.validate()?;

        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = format!(
            "{VALID_MARKER}\n{}\n{}\n{}",
            credentials.access_key.trim(),
            credentials.secret_key.trim(),
            credentials.region.trim()
        );
        std::fs::write(&self.config_path, content)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&self.config_path, permissions)?;
        }

        tracing::debug!("Wrote credentials to {}", self.config_path.display());
        Ok(())
    }
}

fn parse_credentials(content: &str) -> Result<Credentials> {
    let lines: Vec<&str> = content.lines().map(|l| l.trim_end_matches('\r')).collect();

    if lines.len() != 4 {
        return Err(Error::ConfigCorrupt(format!(
            "expected 4 lines, found {}",
            lines.len()
        )));
    }

    if lines[0] != VALID_MARKER {
        return Err(Error::ConfigCorrupt(format!(
            "first line must be '{VALID_MARKER}'"
        )));
    }

    let credentials = Credentials::new(lines[1], lines[2], lines[3]);
    if [&credentials.access_key, &credentials.secret_key, &credentials.region]
        .iter()
        .any(|v| v.trim().is_empty())
    {
        return Err(Error::ConfigCorrupt("empty credential field".into()));
    }

    Ok(credentials)
}
