//! Cache policy forwarded verbatim to an external cache provider.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::SqlentError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Eviction {
    #[default]
    Lru,
    Fifo,
    Soft,
    Weak,
}

impl FromStr for Eviction {
    type Err = SqlentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lru" => Ok(Eviction::Lru),
            "fifo" => Ok(Eviction::Fifo),
            "soft" => Ok(Eviction::Soft),
            "weak" => Ok(Eviction::Weak),
            other => Err(SqlentError::Config(format!(
                "unknown eviction '{}', expected lru, fifo, soft or weak",
                other
            ))),
        }
    }
}

impl fmt::Display for Eviction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Eviction::Lru => "LRU",
            Eviction::Fifo => "FIFO",
            Eviction::Soft => "SOFT",
            Eviction::Weak => "WEAK",
        };
        write!(f, "{}", name)
    }
}

/// Cache settings for one entity namespace.
///
/// Non-positive flush intervals and sizes are dropped so the provider falls
/// back to its own defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheConfig {
    pub implementation: String,
    pub eviction: Eviction,
    pub flush_interval_ms: Option<u64>,
    pub size: Option<u32>,
    pub read_write: bool,
    pub blocking: bool,
    pub properties: BTreeMap<String, String>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            implementation: "perpetual".to_string(),
            eviction: Eviction::Lru,
            flush_interval_ms: None,
            size: None,
            read_write: true,
            blocking: false,
            properties: BTreeMap::new(),
        }
    }
}

impl CacheConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn implementation(mut self, implementation: &str) -> Self {
        self.implementation = implementation.to_string();
        self
    }

    pub fn eviction(mut self, eviction: Eviction) -> Self {
        self.eviction = eviction;
        self
    }

    pub fn flush_interval(mut self, millis: i64) -> Self {
        self.flush_interval_ms = u64::try_from(millis).ok().filter(|ms| *ms > 0);
        self
    }

    pub fn size(mut self, size: i64) -> Self {
        self.size = u32::try_from(size).ok().filter(|n| *n > 0);
        self
    }

    pub fn read_write(mut self, read_write: bool) -> Self {
        self.read_write = read_write;
        self
    }

    pub fn blocking(mut self, blocking: bool) -> Self {
        self.blocking = blocking;
        self
    }

    pub fn property(mut self, key: &str, value: &str) -> Self {
        self.properties.insert(key.to_string(), value.to_string());
        self
    }
}

/// What an entity hands to the cache provider: its own cache, or the
/// namespace of another entity whose cache it shares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CachePolicy {
    Own(CacheConfig),
    Shared(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_positive_limits_are_dropped() {
        let c = CacheConfig::new().flush_interval(0).size(-5);
        assert_eq!(c.flush_interval_ms, None);
        assert_eq!(c.size, None);

        let c = CacheConfig::new().flush_interval(60_000).size(512);
        assert_eq!(c.flush_interval_ms, Some(60_000));
        assert_eq!(c.size, Some(512));
    }

    #[test]
    fn test_eviction_parse() {
        assert_eq!("FIFO".parse::<Eviction>().unwrap(), Eviction::Fifo);
        assert!("random".parse::<Eviction>().is_err());
        assert_eq!(Eviction::Soft.to_string(), "SOFT");
    }
}
