use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

const DEFAULT_CONFIG_FILES: &[&str] = &[
    "accounts.toml",
    "config/accounts.toml",
    "crates/config/accounts.toml",
    "../accounts.toml",
    "../config/accounts.toml",
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub accounts: AccountsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://accounts.db".to_string(),
            max_connections: 10,
        }
    }
}

/// Language used for validation messages and role labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ru,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Ru => "ru",
        }
    }
}

/// Field rules for user records that vary per deployment.
///
/// ```
/// use accounts_config::{AccountsConfig, Locale};
///
/// let accounts = AccountsConfig::default();
/// assert_eq!(accounts.locale, Locale::En);
/// assert_eq!(accounts.email_max_length, 254);
/// assert_eq!(accounts.username_max_length, 150);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountsConfig {
    #[serde(default)]
    pub locale: Locale,
    #[serde(default = "AccountsConfig::default_email_max_length")]
    pub email_max_length: usize,
    #[serde(default = "AccountsConfig::default_username_max_length")]
    pub username_max_length: usize,
}

impl AccountsConfig {
    const fn default_email_max_length() -> usize {
        254
    }

    const fn default_username_max_length() -> usize {
        150
    }
}

impl Default for AccountsConfig {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            email_max_length: Self::default_email_max_length(),
            username_max_length: Self::default_username_max_length(),
        }
    }
}

/// Load the application configuration by combining defaults, files, and environment overrides.
///
/// ```
/// use accounts_config::load;
///
/// std::env::remove_var("ACCOUNTS_CONFIG");
///
/// let config = load().expect("configuration should load with defaults");
/// assert!(!config.database.url.is_empty());
/// ```
pub fn load() -> anyhow::Result<AppConfig> {
    let defaults = AppConfig::default();

    let mut builder = config::Config::builder()
        .set_default("database.url", defaults.database.url.clone())?
        .set_default(
            "database.max_connections",
            i64::from(defaults.database.max_connections),
        )?
        .set_default("accounts.locale", defaults.accounts.locale.as_str())?
        .set_default(
            "accounts.email_max_length",
            i64::try_from(defaults.accounts.email_max_length).unwrap_or(i64::MAX),
        )?
        .set_default(
            "accounts.username_max_length",
            i64::try_from(defaults.accounts.username_max_length).unwrap_or(i64::MAX),
        )?;

    let environment_overrides = config::Environment::with_prefix("ACCOUNTS").separator("__");

    let mut config_file_attached = false;

    if let Ok(path) = std::env::var("ACCOUNTS_CONFIG") {
        builder = builder.add_source(config::File::from(PathBuf::from(&path)));
        config_file_attached = true;
        debug!(path, "loading configuration via ACCOUNTS_CONFIG");
    } else if let Ok(cwd) = std::env::current_dir() {
        let fallback = DEFAULT_CONFIG_FILES
            .iter()
            .map(|candidate| cwd.join(candidate))
            .find(|path| path.exists());

        if let Some(path) = fallback {
            debug!(path = %path.display(), "loading configuration file");
            builder = builder.add_source(config::File::from(path));
            config_file_attached = true;
        }
    }

    if !config_file_attached {
        debug!("no configuration file found, relying on defaults and environment overrides");
    }

    builder = builder.add_source(environment_overrides);

    let cfg = builder.build().context("unable to build configuration")?;

    let config = cfg
        .try_deserialize::<AppConfig>()
        .context("invalid configuration")?;

    if config.accounts.email_max_length == 0 {
        bail!("invalid configuration: accounts.email_max_length must be positive");
    }
    if config.accounts.username_max_length == 0 {
        bail!("invalid configuration: accounts.username_max_length must be positive");
    }

    debug!(?config, "loaded accounts configuration");
    Ok(config)
}
