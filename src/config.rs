//! Configuration for Telegram credentials and sender behaviour
//!
//! Sources, highest precedence first:
//! - process environment (after loading `.env` with dotenvy)
//! - `config.yml` (values may be `${VAR}` placeholders)
//! - built-in defaults

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

/// Default constants (fallback if config.yml not found)
pub const SESSION_NAME: &str = "telegram_session";
pub const DEFAULT_CONFIG_FILE: &str = "config.yml";

/// Environment variable overriding the config file path for both binaries.
pub const ENV_CONFIG_FILE: &str = "SENDER_CONFIG";
pub const DEFAULT_LOG_FILE: &str = "telegram_sender.log";
pub const DEFAULT_DELAY_SECS: u64 = 1;
pub const DEFAULT_FLOOD_RETRIES: u32 = 1;

pub const ENV_API_ID: &str = "API_ID";
pub const ENV_API_HASH: &str = "API_HASH";
pub const ENV_PHONE_NUMBER: &str = "PHONE_NUMBER";
pub const ENV_SESSION_NAME: &str = "SESSION_NAME";

/// YAML config structures
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    telegram: TelegramSection,
    #[serde(default)]
    sender: SenderSection,
}

#[derive(Debug, Default, Deserialize)]
pub struct TelegramSection {
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    api_id: Option<String>,
    api_hash: Option<String>,
    #[serde(alias = "phone")]
    phone_number: Option<String>,
    session_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct SenderSection {
    delay_secs: Option<u64>,
    flood_retries: Option<u32>,
    log_file: Option<String>,
}

/// Deserialize a value that can be either a string or a number
fn deserialize_string_or_number<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    let value: Option<serde_yaml::Value> = Option::deserialize(deserializer)?;
    match value {
        None => Ok(None),
        Some(serde_yaml::Value::String(s)) => Ok(Some(s)),
        Some(serde_yaml::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected string or number, got {:?}",
            other
        ))),
    }
}

impl ConfigFile {
    /// Load `path`; a missing file yields an empty config, a malformed one is an error.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn telegram(&self) -> &TelegramSection {
        &self.telegram
    }

    pub fn sender_settings(&self) -> SenderSettings {
        let log_file = match self.sender.log_file.as_deref() {
            None => Some(PathBuf::from(DEFAULT_LOG_FILE)),
            Some(path) if path.trim().is_empty() => None,
            Some(path) => Some(PathBuf::from(path)),
        };

        SenderSettings {
            delay: Duration::from_secs(self.sender.delay_secs.unwrap_or(DEFAULT_DELAY_SECS)),
            flood_retries: self.sender.flood_retries.unwrap_or(DEFAULT_FLOOD_RETRIES),
            log_file,
        }
    }
}

/// Load .env file into environment variables using dotenvy
pub fn load_dotenv() {
    // Try to load from current directory first, then parent
    if dotenvy::dotenv().is_err() {
        let _ = dotenvy::from_filename("../.env");
    }
}

/// Process environment lookup, treating empty values as unset.
pub fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Pacing and output settings for dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SenderSettings {
    pub delay: Duration,
    pub flood_retries: u32,
    pub log_file: Option<PathBuf>,
}

impl Default for SenderSettings {
    fn default() -> Self {
        ConfigFile::default().sender_settings()
    }
}

/// Account credentials; immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_id: i32,
    pub api_hash: String,
    pub phone_number: String,
    pub session_name: String,
}

impl Credentials {
    /// Resolve credentials from the YAML section and an environment lookup.
    ///
    /// Environment wins over YAML. All missing keys are reported together.
    pub fn resolve<F>(yaml: &TelegramSection, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_id = resolve_value(yaml.api_id.as_deref(), ENV_API_ID, &env);
        let api_hash = resolve_value(yaml.api_hash.as_deref(), ENV_API_HASH, &env);
        let phone_number = resolve_value(yaml.phone_number.as_deref(), ENV_PHONE_NUMBER, &env);
        let session_name = resolve_value(yaml.session_name.as_deref(), ENV_SESSION_NAME, &env)
            .unwrap_or_else(|| SESSION_NAME.to_string());

        let missing: Vec<&str> = [
            (ENV_API_ID, api_id.is_none()),
            (ENV_API_HASH, api_hash.is_none()),
            (ENV_PHONE_NUMBER, phone_number.is_none()),
        ]
        .into_iter()
        .filter_map(|(key, absent)| absent.then_some(key))
        .collect();

        let (Some(api_id), Some(api_hash), Some(phone_number)) = (api_id, api_hash, phone_number)
        else {
            return Err(Error::MissingCredentials(format!(
                "{} (set them in the environment, a .env file or {})",
                missing.join(", "),
                DEFAULT_CONFIG_FILE
            )));
        };

        let api_id = api_id.trim().parse::<i32>().map_err(|_| {
            Error::MissingCredentials(format!("{} must be a valid integer", ENV_API_ID))
        })?;

        Ok(Self {
            api_id,
            api_hash,
            phone_number,
            session_name,
        })
    }

    pub fn session_file(&self) -> String {
        format!("{}.session", self.session_name)
    }

    pub fn lock_file(&self) -> String {
        format!("{}.lock", self.session_name)
    }
}

/// Resolve a single value: env var first, then the YAML value with
/// `${VAR}` placeholders expanded. Empty strings count as missing.
fn resolve_value<F>(yaml: Option<&str>, env_key: &str, env: &F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = env(env_key) {
        return Some(value);
    }

    let value = yaml?.trim();
    if let Some(var_name) = value.strip_prefix("${").and_then(|v| v.strip_suffix('}')) {
        return env(var_name);
    }

    (!value.is_empty()).then(|| value.to_string())
}

/// Fully loaded runtime settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub credentials: Credentials,
    pub sender: SenderSettings,
}

impl Settings {
    /// Load `.env`, the YAML file and the environment.
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        load_dotenv();
        let file = ConfigFile::load(config_path)?;
        Ok(Self {
            credentials: Credentials::resolve(file.telegram(), env_lookup)?,
            sender: file.sender_settings(),
        })
    }
}
