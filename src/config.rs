//! Client configuration and credentials.

use crate::{MusicBrainzError, Result};
use std::env;
use std::time::Duration;

/// Default service address
pub const DEFAULT_BASE_URL: &str = "https://musicbrainz.org";

/// Configuration for a [`MusicBrainzClient`](crate::MusicBrainzClient).
///
/// # Examples
///
/// ```rust
/// use musicbrainz_edit::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::new()
///     .with_base_url("https://test.musicbrainz.org")
///     .with_bot_identity("my-import-bot", "0.4")
///     .with_editor_id(123456)
///     .with_step_delay(Duration::from_secs(3));
/// assert_eq!(config.daily_edit_limit, 1000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Service address, without a trailing slash
    pub base_url: String,
    /// Bot name sent in the identification header
    pub bot_name: String,
    /// Bot version sent in the identification header
    pub bot_version: String,
    /// Pause between the steps of the release editor
    pub step_delay: Duration,
    /// Numeric editor id; the quota queries need it
    pub editor_id: Option<u64>,
    /// Edits the service accepts from one editor per day
    pub daily_edit_limit: u32,
    /// Open edits the service allows one editor at a time
    pub open_edit_limit: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            bot_name: "musicbrainz-bot".to_string(),
            bot_version: "1.0".to_string(),
            step_delay: Duration::from_secs(2),
            editor_id: None,
            daily_edit_limit: 1000,
            open_edit_limit: 2000,
        }
    }
}

impl ClientConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the service address
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Set the bot name and version used in the identification header
    pub fn with_bot_identity(mut self, bot_name: &str, bot_version: &str) -> Self {
        self.bot_name = bot_name.to_string();
        self.bot_version = bot_version.to_string();
        self
    }

    /// Set the pause between release editor steps
    pub fn with_step_delay(mut self, step_delay: Duration) -> Self {
        self.step_delay = step_delay;
        self
    }

    /// Set the numeric editor id
    pub fn with_editor_id(mut self, editor_id: u64) -> Self {
        self.editor_id = Some(editor_id);
        self
    }

    /// Set custom daily and open edit limits
    pub fn with_edit_limits(mut self, daily: u32, open: u32) -> Self {
        self.daily_edit_limit = daily;
        self.open_edit_limit = open;
        self
    }
}

/// Login credentials plus the optional environment overrides.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub server: Option<String>,
    pub editor_id: Option<u64>,
}

impl Credentials {
    /// Read credentials from the environment.
    ///
    /// `MUSICBRAINZ_USERNAME` and `MUSICBRAINZ_PASSWORD` are required;
    /// `MUSICBRAINZ_SERVER` and `MUSICBRAINZ_EDITOR_ID` are optional.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let username = lookup("MUSICBRAINZ_USERNAME").ok_or_else(|| {
            MusicBrainzError::Auth("MUSICBRAINZ_USERNAME is not set".to_string())
        })?;
        let password = lookup("MUSICBRAINZ_PASSWORD").ok_or_else(|| {
            MusicBrainzError::Auth("MUSICBRAINZ_PASSWORD is not set".to_string())
        })?;
        let editor_id = match lookup("MUSICBRAINZ_EDITOR_ID") {
            Some(raw) => Some(raw.trim().parse::<u64>().map_err(|e| {
                MusicBrainzError::Parse(format!("MUSICBRAINZ_EDITOR_ID {raw:?}: {e}"))
            })?),
            None => None,
        };

        Ok(Self {
            username,
            password,
            server: lookup("MUSICBRAINZ_SERVER").filter(|server| !server.is_empty()),
            editor_id,
        })
    }

    /// Apply the environment overrides to a config.
    pub fn apply_to(&self, mut config: ClientConfig) -> ClientConfig {
        if let Some(server) = &self.server {
            config = config.with_base_url(server);
        }
        if let Some(editor_id) = self.editor_id {
            config = config.with_editor_id(editor_id);
        }
        config
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("server", &self.server)
            .field("editor_id", &self.editor_id)
            .finish()
    }
}
