//! Configuration loader for topicmind.
//!
//! Reads `config.toml` from the data directory (`~/.topicmind/` in production)
//! and deserializes it into [`BotConfig`]. Falls back to defaults when the
//! file is missing or malformed. A few settings can be overridden from the
//! environment; secrets only ever come from the environment.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use secrecy::SecretString;

use topicmind_types::config::BotConfig;
use topicmind_types::error::ConfigError;

pub const ENV_DB_PATH: &str = "TOPICMIND_DB_PATH";
pub const ENV_MODEL: &str = "OPENROUTER_MODEL";
pub const ENV_POLL_INTERVAL: &str = "INDEXING_POLL_INTERVAL";
pub const ENV_BATCH_SIZE: &str = "INDEXING_BATCH_SIZE";

pub const ENV_TELEGRAM_TOKEN: &str = "TELEGRAM_BOT_TOKEN";
pub const ENV_OPENROUTER_KEY: &str = "OPENROUTER_API_KEY";
pub const ENV_FIRECRAWL_KEY: &str = "FIRECRAWL_API_KEY";
pub const ENV_PARALLEL_KEY: &str = "PARALLEL_API_KEY";

/// Load configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`BotConfig::default()`].
/// - If the file exists but fails to read or parse, logs a warning and returns the default.
/// - If the file exists and parses successfully, returns the parsed config.
pub async fn load_config(data_dir: &Path) -> BotConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return BotConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return BotConfig::default();
        }
    };

    match toml::from_str::<BotConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            BotConfig::default()
        }
    }
}

/// Apply environment overrides. `lookup` is usually `std::env::var(..).ok()`.
pub fn apply_env_overrides(
    config: &mut BotConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(), ConfigError> {
    let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    if let Some(path) = get(ENV_DB_PATH) {
        config.database_path = Some(PathBuf::from(path));
    }
    if let Some(model) = get(ENV_MODEL) {
        config.model = model;
    }
    if let Some(value) = get(ENV_POLL_INTERVAL) {
        config.indexing.poll_interval_secs = parse_value(ENV_POLL_INTERVAL, &value)?;
    }
    if let Some(value) = get(ENV_BATCH_SIZE) {
        config.indexing.batch_size = parse_value(ENV_BATCH_SIZE, &value)?;
    }
    Ok(())
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key: key.to_string(),
        message: format!("'{value}': {e}"),
    })
}

/// Load `config.toml` and apply the process environment on top.
pub async fn load_effective_config(data_dir: &Path) -> Result<BotConfig, ConfigError> {
    let mut config = load_config(data_dir).await;
    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    Ok(config)
}

/// Database file: configured path, or `<data_dir>/topicmind.db`.
pub fn resolve_database_path(config: &BotConfig, data_dir: &Path) -> PathBuf {
    config
        .database_path
        .clone()
        .unwrap_or_else(|| data_dir.join("topicmind.db"))
}

/// API credentials from the environment.
///
/// Does NOT derive Debug.
pub struct Secrets {
    pub telegram_bot_token: Option<SecretString>,
    pub openrouter_api_key: Option<SecretString>,
    pub firecrawl_api_key: Option<SecretString>,
    pub parallel_api_key: Option<SecretString>,
}

impl Secrets {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let secret = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .map(SecretString::from)
        };
        Self {
            telegram_bot_token: secret(ENV_TELEGRAM_TOKEN),
            openrouter_api_key: secret(ENV_OPENROUTER_KEY),
            firecrawl_api_key: secret(ENV_FIRECRAWL_KEY),
            parallel_api_key: secret(ENV_PARALLEL_KEY),
        }
    }

    pub fn telegram_bot_token(&self) -> Result<&SecretString, ConfigError> {
        self.telegram_bot_token
            .as_ref()
            .ok_or(ConfigError::MissingEnv(ENV_TELEGRAM_TOKEN))
    }

    pub fn openrouter_api_key(&self) -> Result<&SecretString, ConfigError> {
        self.openrouter_api_key
            .as_ref()
            .ok_or(ConfigError::MissingEnv(ENV_OPENROUTER_KEY))
    }

    /// Log a warning for each optional key that is absent.
    pub fn warn_missing_optional(&self) {
        if self.parallel_api_key.is_none() {
            tracing::warn!("{ENV_PARALLEL_KEY} not set, web_search will be unavailable");
        }
        if self.firecrawl_api_key.is_none() {
            tracing::warn!("{ENV_FIRECRAWL_KEY} not set, scraping will use Jina Reader only");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use secrecy::ExposeSecret;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[tokio::test]
    async fn load_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).await;
        assert_eq!(config.history_limit, 10);
        assert!(config.database_path.is_none());
    }

    #[tokio::test]
    async fn load_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            r#"
model = "openai/gpt-4o-mini"

[scrape]
summary_max_chars = 300
"#,
        )
        .await
        .unwrap();

        let config = load_config(tmp.path()).await;
        assert_eq!(config.model, "openai/gpt-4o-mini");
        assert_eq!(config.scrape.summary_max_chars, 300);
        assert_eq!(config.scrape.max_content_chars, 50_000);
    }

    #[tokio::test]
    async fn load_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_config(tmp.path()).await;
        assert_eq!(config.model, topicmind_types::config::DEFAULT_MODEL);
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = BotConfig::default();
        apply_env_overrides(
            &mut config,
            env(&[
                (ENV_DB_PATH, "/tmp/bot.db"),
                (ENV_MODEL, "x/y"),
                (ENV_POLL_INTERVAL, "30"),
                (ENV_BATCH_SIZE, " 25 "),
            ]),
        )
        .unwrap();
        assert_eq!(config.database_path, Some(PathBuf::from("/tmp/bot.db")));
        assert_eq!(config.model, "x/y");
        assert_eq!(config.indexing.poll_interval_secs, 30);
        assert_eq!(config.indexing.batch_size, 25);
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let mut config = BotConfig::default();
        apply_env_overrides(&mut config, env(&[(ENV_MODEL, "  ")])).unwrap();
        assert_eq!(config.model, topicmind_types::config::DEFAULT_MODEL);
    }

    #[test]
    fn invalid_numeric_override_is_an_error() {
        let mut config = BotConfig::default();
        let err = apply_env_overrides(&mut config, env(&[(ENV_POLL_INTERVAL, "soon")]))
            .unwrap_err();
        assert!(err.to_string().contains(ENV_POLL_INTERVAL));
    }

    #[test]
    fn database_path_resolution() {
        let mut config = BotConfig::default();
        assert_eq!(
            resolve_database_path(&config, Path::new("/data")),
            PathBuf::from("/data/topicmind.db")
        );
        config.database_path = Some(PathBuf::from("/elsewhere/x.db"));
        assert_eq!(
            resolve_database_path(&config, Path::new("/data")),
            PathBuf::from("/elsewhere/x.db")
        );
    }

    #[test]
    fn secrets_from_lookup() {
        let secrets = Secrets::from_lookup(env(&[
            (ENV_TELEGRAM_TOKEN, "123:abc"),
            (ENV_PARALLEL_KEY, ""),
        ]));
        assert_eq!(secrets.telegram_bot_token().unwrap().expose_secret(), "123:abc");
        assert!(matches!(
            secrets.openrouter_api_key(),
            Err(ConfigError::MissingEnv(ENV_OPENROUTER_KEY))
        ));
        assert!(secrets.parallel_api_key.is_none());
    }
}
