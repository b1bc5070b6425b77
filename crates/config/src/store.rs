use std::{
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use tracing::info;

use crate::types::{BotConfig, BotListTarget, GuildConfig, NluConfig, WebhookTarget};

/// Errors from loading or reloading configuration.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("config parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Shared, externally-mutated configuration store.
///
/// Accessors return owned snapshots: one gateway event sees one consistent
/// view, and nothing caches config across the lifetime of a response. Edits
/// to the file on disk become visible after `reload`.
#[derive(Clone)]
pub struct ConfigStore {
    path: Option<PathBuf>,
    inner: Arc<RwLock<BotConfig>>,
}

impl ConfigStore {
    /// Load the store from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();
        let config = read_file(&path)?;
        info!(path = %path.display(), guilds = config.guilds.len(), "configuration loaded");
        Ok(Self {
            path: Some(path),
            inner: Arc::new(RwLock::new(config)),
        })
    }

    /// Build a store from an already-parsed config (tests, embedding).
    pub fn from_config(config: BotConfig) -> Self {
        Self {
            path: None,
            inner: Arc::new(RwLock::new(config)),
        }
    }

    /// Default config file path (`<config dir>/sigil/sigil.toml`), falling
    /// back to the working directory when no home is available.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("org", "sigil", "sigil")
            .map(|dirs| dirs.config_dir().join("sigil.toml"))
            .unwrap_or_else(|| PathBuf::from("sigil.toml"))
    }

    /// Re-read the backing file. A store built from memory is left as-is.
    pub fn reload(&self) -> Result<(), Error> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let config = read_file(path)?;
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        *inner = config;
        info!(path = %path.display(), "configuration reloaded");
        Ok(())
    }

    /// Snapshot of one guild's settings; unknown guilds get defaults.
    pub fn guild(&self, guild_id: u64) -> GuildConfig {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        inner
            .guilds
            .get(&guild_id.to_string())
            .cloned()
            .unwrap_or_default()
    }

    /// The Discord bot token.
    pub fn token(&self) -> secrecy::Secret<String> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        inner.token.clone()
    }

    pub fn logging_webhook(&self) -> Option<WebhookTarget> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        inner.logging_webhook.clone()
    }

    pub fn bot_lists(&self) -> Vec<BotListTarget> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        inner.bot_lists.clone()
    }

    pub fn nlu(&self) -> NluConfig {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        inner.nlu.clone()
    }

    /// Replace the in-memory config (used by tests and future admin surfaces).
    pub fn replace(&self, config: BotConfig) {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        *inner = config;
    }
}

fn read_file(path: &Path) -> Result<BotConfig, Error> {
    let raw = std::fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&raw).map_err(|source| Error::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use {super::*, std::io::Write};

    fn store_with_guild(guild_id: u64, config: GuildConfig) -> ConfigStore {
        let mut bot = BotConfig::default();
        bot.guilds.insert(guild_id.to_string(), config);
        ConfigStore::from_config(bot)
    }

    #[test]
    fn unknown_guild_gets_defaults() {
        let store = ConfigStore::from_config(BotConfig::default());
        let guild = store.guild(123);
        assert_eq!(guild, GuildConfig::default());
    }

    #[test]
    fn snapshot_is_isolated_from_later_edits() {
        let mut config = GuildConfig::default();
        config.starboard.enabled = true;
        let store = store_with_guild(42, config);

        let snapshot = store.guild(42);
        assert!(snapshot.starboard.enabled);

        store.replace(BotConfig::default());
        // The earlier snapshot is untouched; fresh reads see the new state.
        assert!(snapshot.starboard.enabled);
        assert!(!store.guild(42).starboard.enabled);
    }

    #[test]
    fn load_and_reload_from_file() {
        let mut file =
            tempfile::NamedTempFile::new().unwrap_or_else(|e| panic!("tempfile: {e}"));
        writeln!(file, "token = \"first\"").unwrap_or_else(|e| panic!("write: {e}"));

        let store =
            ConfigStore::load(file.path()).unwrap_or_else(|e| panic!("load failed: {e}"));
        assert!(store.bot_lists().is_empty());

        writeln!(file, "[[bot_lists]]\nname = \"list\"\nendpoint = \"https://l.example\"\ntoken = \"t\"")
            .unwrap_or_else(|e| panic!("write: {e}"));
        store.reload().unwrap_or_else(|e| panic!("reload failed: {e}"));
        assert_eq!(store.bot_lists().len(), 1);
    }

    #[test]
    fn load_missing_file_is_an_error() {
        let result = ConfigStore::load("/nonexistent/sigil.toml");
        assert!(matches!(result, Err(Error::Read { .. })));
    }

    #[test]
    fn load_bad_toml_is_an_error() {
        let mut file =
            tempfile::NamedTempFile::new().unwrap_or_else(|e| panic!("tempfile: {e}"));
        writeln!(file, "token = [not toml").unwrap_or_else(|e| panic!("write: {e}"));
        let result = ConfigStore::load(file.path());
        assert!(matches!(result, Err(Error::Parse { .. })));
    }
}
