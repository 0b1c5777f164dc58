//! Configuration schema, loading, and environment overrides.

use anyhow::{Context, Result};
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;

// ── Top-level config ──────────────────────────────────────────────

/// Top-level datagen configuration, loaded from `config.toml`.
///
/// Resolution order: `DATAGEN_CONFIG_DIR` env → `~/.datagen/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to config.toml - computed from home, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,
    /// API key for the selected provider. Overridden by `DATAGEN_API_KEY` or
    /// `API_KEY` env vars; `OPENAI_API_KEY` is resolved by the provider
    /// factory and is deliberately NOT validated here — a missing credential
    /// surfaces on the first provider call.
    pub api_key: Option<String>,
    /// Base URL override for the provider API
    pub api_url: Option<String>,
    /// Default provider ID (e.g. `"openai"`). Default: `"openai"`.
    pub default_provider: Option<String>,
    /// Default model routed through the selected provider. Default: `"gpt-4o-mini"`.
    pub default_model: Option<String>,
    /// Default model temperature (0.0–2.0). Default: `0.0`.
    pub default_temperature: f64,

    /// Agent orchestration settings (`[agent]`).
    #[serde(default)]
    pub agent: AgentConfig,
}

/// Agent orchestration configuration (`[agent]` section).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Maximum tool-call loop steps per user message. Default: `50`.
    /// Setting to `0` falls back to the safe default of `50`.
    #[serde(default = "default_agent_max_tool_iterations")]
    pub max_tool_iterations: usize,
}

fn default_agent_max_tool_iterations() -> usize {
    50
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_tool_iterations: default_agent_max_tool_iterations(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let home =
            UserDirs::new().map_or_else(|| PathBuf::from("."), |u| u.home_dir().to_path_buf());
        let datagen_dir = home.join(".datagen");

        Self {
            config_path: datagen_dir.join("config.toml"),
            api_key: None,
            api_url: None,
            default_provider: Some("openai".to_string()),
            default_model: Some("gpt-4o-mini".to_string()),
            default_temperature: 0.0,
            agent: AgentConfig::default(),
        }
    }
}

fn default_config_dir() -> Result<PathBuf> {
    if let Ok(custom_dir) = std::env::var("DATAGEN_CONFIG_DIR") {
        let trimmed = custom_dir.trim();
        if !trimmed.is_empty() {
            return Ok(PathBuf::from(trimmed));
        }
    }

    let home = UserDirs::new()
        .map(|u| u.home_dir().to_path_buf())
        .context("Could not find home directory")?;
    Ok(home.join(".datagen"))
}

impl Config {
    pub async fn load_or_init() -> Result<Self> {
        let datagen_dir = default_config_dir()?;
        let config_path = datagen_dir.join("config.toml");

        fs::create_dir_all(&datagen_dir)
            .await
            .with_context(|| format!("Failed to create config directory: {}", datagen_dir.display()))?;

        if config_path.exists() {
            // Warn if config file is world-readable (may contain API keys)
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                if let Ok(meta) = fs::metadata(&config_path).await {
                    if meta.permissions().mode() & 0o004 != 0 {
                        tracing::warn!(
                            "Config file {:?} is world-readable (mode {:o}). \
                             Consider restricting with: chmod 600 {:?}",
                            config_path,
                            meta.permissions().mode() & 0o777,
                            config_path,
                        );
                    }
                }
            }

            let contents = fs::read_to_string(&config_path)
                .await
                .context("Failed to read config file")?;
            let mut config: Config =
                toml::from_str(&contents).context("Failed to parse config file")?;
            // Set the computed path that is skipped during serialization
            config.config_path = config_path.clone();

            config.apply_env_overrides();
            config.validate()?;
            tracing::info!(
                path = %config.config_path.display(),
                initialized = false,
                "Config loaded"
            );
            Ok(config)
        } else {
            let mut config = Config::default();
            config.config_path = config_path.clone();
            config.save().await?;

            // Restrict permissions on newly created config file (may contain API keys)
            #[cfg(unix)]
            {
                use std::{fs::Permissions, os::unix::fs::PermissionsExt};
                let _ = fs::set_permissions(&config_path, Permissions::from_mode(0o600)).await;
            }

            config.apply_env_overrides();
            config.validate()?;
            tracing::info!(
                path = %config.config_path.display(),
                initialized = true,
                "Config loaded"
            );
            Ok(config)
        }
    }

    /// Serialize the config back to its `config.toml`.
    pub async fn save(&self) -> Result<()> {
        let serialized =
            toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        fs::write(&self.config_path, serialized)
            .await
            .with_context(|| format!("Failed to write config file: {}", self.config_path.display()))
    }

    /// Apply environment variable overrides to config
    pub fn apply_env_overrides(&mut self) {
        // API Key: DATAGEN_API_KEY or API_KEY (generic)
        if let Ok(key) = std::env::var("DATAGEN_API_KEY").or_else(|_| std::env::var("API_KEY")) {
            let key = key.trim();
            if !key.is_empty() {
                self.api_key = Some(key.to_string());
            }
        }

        // Provider: DATAGEN_PROVIDER
        if let Ok(provider) = std::env::var("DATAGEN_PROVIDER") {
            let provider = provider.trim();
            if !provider.is_empty() {
                self.default_provider = Some(provider.to_ascii_lowercase());
            }
        }

        // Model: DATAGEN_MODEL or MODEL
        if let Ok(model) = std::env::var("DATAGEN_MODEL").or_else(|_| std::env::var("MODEL")) {
            let model = model.trim();
            if !model.is_empty() {
                self.default_model = Some(model.to_string());
            }
        }

        // Base URL: DATAGEN_API_URL
        if let Ok(url) = std::env::var("DATAGEN_API_URL") {
            let url = url.trim();
            if !url.is_empty() {
                self.api_url = Some(url.to_string());
            }
        }

        // Temperature: DATAGEN_TEMPERATURE
        if let Ok(temp_str) = std::env::var("DATAGEN_TEMPERATURE") {
            match temp_str.trim().parse::<f64>() {
                Ok(temp) => self.default_temperature = temp,
                Err(_) => {
                    tracing::warn!("Ignoring invalid DATAGEN_TEMPERATURE: {temp_str}");
                }
            }
        }

        // A zero step ceiling would make every turn fail; fall back.
        if self.agent.max_tool_iterations == 0 {
            self.agent.max_tool_iterations = default_agent_max_tool_iterations();
        }
    }

    /// Validate configuration values that would cause runtime failures.
    ///
    /// Called after TOML deserialization and env-override application to
    /// catch obviously invalid values early instead of failing at arbitrary
    /// runtime points. A missing API key is NOT an error here.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.default_temperature) {
            anyhow::bail!(
                "default_temperature must be between 0.0 and 2.0 (got {})",
                self.default_temperature
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        assert_eq!(config.default_provider.as_deref(), Some("openai"));
        assert_eq!(config.default_model.as_deref(), Some("gpt-4o-mini"));
        assert_eq!(config.default_temperature, 0.0);
        assert_eq!(config.agent.max_tool_iterations, 50);
        config.validate().unwrap();
    }

    #[test]
    fn validate_rejects_out_of_range_temperature() {
        let config = Config {
            default_temperature: 3.5,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_step_ceiling_falls_back_to_default() {
        let mut config = Config::default();
        config.agent.max_tool_iterations = 0;
        config.apply_env_overrides();
        assert_eq!(config.agent.max_tool_iterations, 50);
    }

    #[test]
    fn config_round_trips_through_toml() {
        let mut config = Config::default();
        config.api_key = Some("test-key".into());
        config.agent.max_tool_iterations = 7;

        let serialized = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed.api_key.as_deref(), Some("test-key"));
        assert_eq!(parsed.agent.max_tool_iterations, 7);
        assert_eq!(parsed.default_model, config.default_model);
    }

    #[test]
    fn partial_toml_fills_agent_section() {
        let parsed: Config = toml::from_str(
            r#"
            default_provider = "openai"
            default_model = "gpt-4o-mini"
            default_temperature = 0.0
            "#,
        )
        .unwrap();
        assert_eq!(parsed.agent.max_tool_iterations, 50);
        assert!(parsed.api_key.is_none());
    }
}
