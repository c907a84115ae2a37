use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::game::bots::{BotProfile, DEFAULT_BOT};
use crate::oracle::{MctsConfig, MAX_ROLLOUTS_PER_ITERATION};

/// Presentation timing and the opponent selected at startup.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub default_bot: String,
    /// Pause before the bot's reply is requested, so the human sees it "think".
    pub reply_delay_ms: u64,
    /// Pause before the result popup appears.
    pub result_delay_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            default_bot: DEFAULT_BOT.to_string(),
            reply_delay_ms: 1000,
            result_delay_ms: 500,
        }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive, overridden by `RUST_LOG`.
    pub filter: String,
    /// Log file used by the terminal UI.
    pub file: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            filter: "info".to_string(),
            file: PathBuf::from("connect-four.log"),
        }
    }
}

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub session: SessionConfig,
    pub oracle: MctsConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::warn!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if BotProfile::by_name(&self.session.default_bot).is_none() {
            let known: Vec<&str> = BotProfile::all().iter().map(|b| b.name()).collect();
            return Err(ConfigError::Validation(format!(
                "session.default_bot '{}' is not one of {:?}",
                self.session.default_bot, known
            )));
        }
        if self.oracle.rollouts_per_iteration == 0
            || self.oracle.rollouts_per_iteration > MAX_ROLLOUTS_PER_ITERATION
        {
            return Err(ConfigError::Validation(format!(
                "oracle.rollouts_per_iteration must be in 1..={MAX_ROLLOUTS_PER_ITERATION}"
            )));
        }
        if !(self.oracle.exploration > 0.0) {
            return Err(ConfigError::Validation(
                "oracle.exploration must be > 0".into(),
            ));
        }
        if self.logging.filter.trim().is_empty() {
            return Err(ConfigError::Validation(
                "logging.filter must not be empty".into(),
            ));
        }

        Ok(())
    }

    /// The configured starting bot.
    pub fn default_bot(&self) -> BotProfile {
        BotProfile::by_name(&self.session.default_bot).unwrap_or_default()
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(&AppConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        config.validate().expect("default config should be valid");
        assert_eq!(config.default_bot().name(), "arnie");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml_str = r#"
[session]
default_bot = "anna"
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.default_bot().effort(), 3_000);
        assert_eq!(config.session.reply_delay_ms, 1000);
        assert_eq!(config.oracle.rollouts_per_iteration, 1);
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn test_empty_toml_uses_all_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        let default = AppConfig::default();
        assert_eq!(config.session.default_bot, default.session.default_bot);
        assert!((config.oracle.exploration - default.oracle.exploration).abs() < 1e-6);
        assert_eq!(config.oracle.seed, None);
    }

    #[test]
    fn test_validation_rejects_unknown_bot() {
        let mut config = AppConfig::default();
        config.session.default_bot = "hal".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_accepts_bot_name_in_any_case() {
        let mut config = AppConfig::default();
        config.session.default_bot = "Puffy".into();
        config.validate().unwrap();
        assert_eq!(config.default_bot().effort(), 50);
    }

    #[test]
    fn test_validation_rejects_zero_rollouts() {
        let mut config = AppConfig::default();
        config.oracle.rollouts_per_iteration = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_bounds_rollouts() {
        let mut config = AppConfig::default();
        config.oracle.rollouts_per_iteration = MAX_ROLLOUTS_PER_ITERATION;
        config.validate().unwrap();
        config.oracle.rollouts_per_iteration = MAX_ROLLOUTS_PER_ITERATION + 1;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
        config.oracle.rollouts_per_iteration = u32::MAX;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_bad_exploration() {
        let mut config = AppConfig::default();
        config.oracle.exploration = 0.0;
        assert!(config.validate().is_err());
        config.oracle.exploration = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_empty_log_filter() {
        let mut config = AppConfig::default();
        config.logging.filter = "  ".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = AppConfig::load_or_default(Path::new("nonexistent_config.toml")).unwrap();
        assert_eq!(config.session.default_bot, "arnie");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test_config.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(
            f,
            r#"
[session]
reply_delay_ms = 0

[oracle]
seed = 42
"#
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.session.reply_delay_ms, 0);
        assert_eq!(config.oracle.seed, Some(42));
        // Others are defaults
        assert_eq!(config.session.result_delay_ms, 500);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[oracle]\nrollouts_per_iteration = 0\n").unwrap();
        assert!(matches!(AppConfig::load(&path), Err(ConfigError::Validation(_))));

        std::fs::write(&path, "[session\n").unwrap();
        assert!(matches!(AppConfig::load(&path), Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn test_default_toml_roundtrips() {
        let toml_str = AppConfig::default_toml().unwrap();
        let config: AppConfig = toml::from_str(&toml_str).unwrap();
        config.validate().expect("roundtripped config should be valid");
    }
}
