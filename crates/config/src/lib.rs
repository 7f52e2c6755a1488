//! Configuration loading and validation.
//!
//! Sources are layered, lowest priority first:
//! 1. Built-in defaults.
//! 2. A configuration file (`.toml`, `.yaml`/`.yml` or `.json`). Either the
//!    path given by the host, or `config.toml` in the platform's config
//!    directory if it exists.
//! 3. Environment variables prefixed with `MARQUEE_`. Nested keys are split
//!    on a double underscore: `MARQUEE_CACHE__TTL_SECS=600`.
//!
//! A missing API key is not a load error. Whether the catalog can be reached
//! without one is decided at the first login.

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Prefix of environment variables that override file values.
pub const ENV_PREFIX: &str = "MARQUEE_";

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Key exchanged for session tokens.
    pub api_key: Option<String>,
    /// Metadata language used when the host does not ask for one.
    pub language: String,
    pub session: SessionConfig,
    pub cache: CacheConfig,
    pub search: SearchConfig,
}
impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            language: "en".to_string(),
            session: SessionConfig::default(),
            cache: CacheConfig::default(),
            search: SearchConfig::default(),
        }
    }
}
impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("language", &self.language)
            .field("session", &self.session)
            .field("cache", &self.cache)
            .field("search", &self.search)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Sessions older than this many seconds are refreshed before use.
    pub refresh_after_secs: u64,
}
impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            refresh_after_secs: 20 * 60 * 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// How long remote call results are reused, in seconds.
    pub ttl_secs: u64,
}
impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl_secs: 60 * 60 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Upper bound on the candidates returned by a series search.
    pub max_candidates: usize,
    /// Allowed distance between a requested year and a candidate's year.
    pub year_tolerance: u32,
}
impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_candidates: 10,
            year_tolerance: 1,
        }
    }
}

impl Config {
    /// Location of the configuration file when the host does not name one.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "marquee").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// The layered sources, without extracting them.
    ///
    /// An explicit `path` must exist; the default path is skipped when absent.
    pub fn figment(path: Option<&Path>) -> Result<Figment> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        let file = match path {
            Some(path) if !path.is_file() => {
                exn::bail!(ErrorKind::Load);
            },
            Some(path) => Some(path.to_path_buf()),
            None => Self::default_path().filter(|path| path.is_file()),
        };
        if let Some(file) = file {
            tracing::debug!(path = %file.display(), "Loading configuration file");
            let extension = file.extension().and_then(|e| e.to_str()).unwrap_or_default().to_lowercase();
            figment = match extension.as_str() {
                "toml" => figment.merge(Toml::file(&file)),
                "yaml" | "yml" => figment.merge(Yaml::file(&file)),
                "json" => figment.merge(Json::file(&file)),
                _ => exn::bail!(ErrorKind::UnsupportedFormat(file.display().to_string())),
            };
        }
        Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    /// Load and validate the configuration.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::from_figment(&Self::figment(path)?)
    }

    pub fn from_figment(figment: &Figment) -> Result<Self> {
        let config: Config = figment.extract().or_raise(|| ErrorKind::Load)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the caches cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.session.refresh_after_secs == 0 {
            exn::bail!(ErrorKind::Invalid("session.refresh_after_secs"));
        }
        if self.cache.ttl_secs == 0 {
            exn::bail!(ErrorKind::Invalid("cache.ttl_secs"));
        }
        if self.search.max_candidates == 0 {
            exn::bail!(ErrorKind::Invalid("search.max_candidates"));
        }
        if self.language.trim().is_empty() {
            exn::bail!(ErrorKind::Invalid("language"));
        }
        Ok(())
    }

    pub fn refresh_after(&self) -> Duration {
        Duration::from_secs(self.session.refresh_after_secs)
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.cache.ttl_secs)
    }

    /// The API key, when one is set and not blank.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().map(str::trim).filter(|key| !key.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use rstest::rstest;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api_key(), None);
        assert_eq!(config.language, "en");
        assert_eq!(config.refresh_after(), Duration::from_secs(72_000));
        assert_eq!(config.ttl(), Duration::from_secs(3_600));
        assert_eq!(config.search.max_candidates, 10);
        assert_eq!(config.search.year_tolerance, 1);
        assert!(config.validate().is_ok());
    }

    #[rstest]
    #[case("config.toml", "api_key = \"secret\"\nlanguage = \"de\"\n[cache]\nttl_secs = 60\n")]
    #[case("config.yaml", "api_key: secret\nlanguage: de\ncache:\n  ttl_secs: 60\n")]
    #[case("config.yml", "api_key: secret\nlanguage: de\ncache:\n  ttl_secs: 60\n")]
    #[case("config.json", r#"{"api_key": "secret", "language": "de", "cache": {"ttl_secs": 60}}"#)]
    fn test_file_formats(#[case] name: &'static str, #[case] contents: &'static str) {
        Jail::expect_with(|jail| {
            jail.create_file(name, contents)?;
            let config = Config::load(Some(Path::new(name))).unwrap();
            assert_eq!(config.api_key(), Some("secret"));
            assert_eq!(config.language, "de");
            assert_eq!(config.cache.ttl_secs, 60);
            // Untouched sections keep their defaults.
            assert_eq!(config.session, SessionConfig::default());
            Ok(())
        });
    }

    #[test]
    fn test_environment_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", "language = \"de\"\n[search]\nmax_candidates = 5\n")?;
            jail.set_env("MARQUEE_LANGUAGE", "fr");
            jail.set_env("MARQUEE_API_KEY", "from-env");
            jail.set_env("MARQUEE_SEARCH__YEAR_TOLERANCE", "3");
            let config = Config::load(Some(Path::new("config.toml"))).unwrap();
            assert_eq!(config.language, "fr");
            assert_eq!(config.api_key(), Some("from-env"));
            assert_eq!(config.search.max_candidates, 5);
            assert_eq!(config.search.year_tolerance, 3);
            Ok(())
        });
    }

    #[test]
    fn test_missing_explicit_file() {
        Jail::expect_with(|_| {
            let err = Config::load(Some(Path::new("nowhere.toml"))).unwrap_err();
            assert_eq!(*err, ErrorKind::Load);
            Ok(())
        });
    }

    #[test]
    fn test_unsupported_format() {
        Jail::expect_with(|jail| {
            jail.create_file("config.ini", "api_key=secret")?;
            let err = Config::load(Some(Path::new("config.ini"))).unwrap_err();
            assert!(matches!(&*err, ErrorKind::UnsupportedFormat(_)));
            Ok(())
        });
    }

    #[test]
    fn test_malformed_file() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", "[cache]\nttl_secs = \"soon\"\n")?;
            let err = Config::load(Some(Path::new("config.toml"))).unwrap_err();
            assert_eq!(*err, ErrorKind::Load);
            Ok(())
        });
    }

    #[test]
    fn test_zero_values_are_rejected_after_loading() {
        Jail::expect_with(|jail| {
            jail.set_env("MARQUEE_CACHE__TTL_SECS", "0");
            let figment = Figment::from(Serialized::defaults(Config::default())).merge(Env::prefixed(ENV_PREFIX).split("__"));
            let err = Config::from_figment(&figment).unwrap_err();
            assert_eq!(*err, ErrorKind::Invalid("cache.ttl_secs"));
            Ok(())
        });
    }

    #[rstest]
    #[case(|c: &mut Config| c.session.refresh_after_secs = 0, "session.refresh_after_secs")]
    #[case(|c: &mut Config| c.cache.ttl_secs = 0, "cache.ttl_secs")]
    #[case(|c: &mut Config| c.search.max_candidates = 0, "search.max_candidates")]
    #[case(|c: &mut Config| c.language = " ".to_string(), "language")]
    fn test_validate(#[case] change: fn(&mut Config), #[case] field: &'static str) {
        let mut config = Config::default();
        change(&mut config);
        let err = config.validate().unwrap_err();
        assert_eq!(*err, ErrorKind::Invalid(field));
    }

    #[test]
    fn test_missing_api_key_is_not_a_load_error() {
        let config = Config {
            api_key: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.api_key(), None);
    }

    #[test]
    fn test_debug_hides_api_key() {
        let config = Config {
            api_key: Some("super-secret".to_string()),
            ..Default::default()
        };
        assert!(!format!("{config:?}").contains("super-secret"));
    }
}
