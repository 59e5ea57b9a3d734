use std::path::{Path, PathBuf};
use std::time::Duration;

use boxcat_fetch::protocol::{DEFAULT_BASE_URL, DEFAULT_CLIENT_TYPE, DEFAULT_TIMEOUT};
use boxcat_fetch::{ContentKind, Endpoint, format_id};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use crate::Result;

/// Host settings for boxcat.
///
/// Layered as built-in defaults, then an optional TOML file, then `BOXCAT_`
/// prefixed environment variables (`BOXCAT_LOCAL_ONLY=true`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxcatConfig {
    /// Never touch the network; use whatever is already on disk.
    pub local_only:   bool,
    pub base_url:     String,
    /// Root of the staging area. Per-title files live under `bcat/<TID>/`.
    pub cache_dir:    PathBuf,
    pub client_type:  String,
    pub timeout_secs: u64,
}

impl Default for BoxcatConfig {
    fn default() -> Self {
        Self {
            local_only:   false,
            base_url:     DEFAULT_BASE_URL.to_string(),
            cache_dir:    default_cache_dir(),
            client_type:  DEFAULT_CLIENT_TYPE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

fn default_cache_dir() -> PathBuf {
    home::home_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(".cache")
        .join("boxcat")
}

impl BoxcatConfig {
    pub const ENV_PREFIX: &'static str = "BOXCAT_";

    pub fn figment(config_file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = config_file {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(Self::ENV_PREFIX))
    }

    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        Ok(Self::figment(config_file).extract()?)
    }

    pub fn endpoint(&self) -> Result<Endpoint> {
        Ok(Endpoint::new(&self.base_url)?
            .client_type(&self.client_type)
            .timeout(Duration::from_secs(self.timeout_secs)))
    }

    pub fn title_cache_dir(&self, title_id: u64) -> PathBuf {
        self.cache_dir.join("bcat").join(format_id(title_id))
    }

    pub fn staging_path(&self, title_id: u64, kind: ContentKind) -> PathBuf {
        self.title_cache_dir(title_id).join(kind.staging_file_name())
    }
}

#[cfg(test)]
mod tests {
    use figment::Jail;

    use super::*;

    #[test]
    fn defaults_point_at_the_public_service() {
        let config = BoxcatConfig::default();
        assert!(!config.local_only);
        assert_eq!(config.timeout_secs, 30);

        let endpoint = config.endpoint().unwrap();
        assert_eq!(endpoint.base_url(), "https://api.yuzu-emu.org");
        assert_eq!(endpoint.client_type, "yuzu");
        assert_eq!(endpoint.timeout, Duration::from_secs(30));
    }

    #[test]
    fn staging_paths_are_keyed_by_title() {
        let config = BoxcatConfig {
            cache_dir: PathBuf::from("/cache"),
            ..BoxcatConfig::default()
        };
        assert_eq!(
            config.staging_path(0x0100_0000_0000_abcd, ContentKind::Archive),
            Path::new("/cache/bcat/010000000000ABCD/data.zip")
        );
        assert_eq!(
            config.staging_path(1, ContentKind::LaunchParameter),
            Path::new("/cache/bcat/0000000000000001/launchparam.bin")
        );
    }

    #[test]
    fn file_then_environment_override_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "boxcat.toml",
                r#"
                base_url = "http://127.0.0.1:8080"
                cache_dir = "/var/cache/boxcat"
                timeout_secs = 5
                "#,
            )?;
            jail.set_env("BOXCAT_LOCAL_ONLY", "true");
            jail.set_env("BOXCAT_TIMEOUT_SECS", "9");

            let config = BoxcatConfig::load(Some(Path::new("boxcat.toml")))
                .map_err(|e| e.to_string())?;
            assert!(config.local_only);
            assert_eq!(config.base_url, "http://127.0.0.1:8080");
            assert_eq!(config.cache_dir, PathBuf::from("/var/cache/boxcat"));
            assert_eq!(config.timeout_secs, 9);
            assert_eq!(config.client_type, "yuzu");
            Ok(())
        });
    }

    #[test]
    fn missing_file_keeps_defaults() {
        Jail::expect_with(|_| {
            let config = BoxcatConfig::load(Some(Path::new("absent.toml")))
                .map_err(|e| e.to_string())?;
            assert_eq!(config.base_url, BoxcatConfig::default().base_url);
            Ok(())
        });
    }

    #[test]
    fn bad_base_url_is_rejected() {
        let config = BoxcatConfig {
            base_url: "ftp://example.com".to_string(),
            ..BoxcatConfig::default()
        };
        assert!(matches!(config.endpoint(), Err(crate::Error::Endpoint(_))));
    }
}
