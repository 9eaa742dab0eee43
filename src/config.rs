//! Configuration for berthdb
//!
//! Centralized configuration with sensible defaults.

/// Main configuration for a berthdb Store instance
#[derive(Debug, Clone)]
pub struct Config {
    /// Storage location. [`Config::MEMORY_PATH`] selects the pure
    /// in-memory mode; nothing survives process exit.
    ///
    /// Any other value designates an on-disk database, which this
    /// build does not provide; [`Store::open`](crate::Store::open)
    /// rejects it with [`Error::PersistenceUnsupported`](crate::Error).
    pub path: String,
}

impl Config {
    /// Sentinel path selecting the non-persistent, in-memory mode
    pub const MEMORY_PATH: &'static str = ":memory:";

    /// Whether this config selects the in-memory mode
    pub fn is_memory(&self) -> bool {
        self.path == Self::MEMORY_PATH
    }

    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: Self::MEMORY_PATH.to_string(),
        }
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the storage location
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.config.path = path.into();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
