use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChatConfig {
    #[serde(default = "default_prompt")]
    pub prompt: String,
    #[serde(default = "default_show_data")]
    pub show_data: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            prompt: default_prompt(),
            show_data: default_show_data(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(content).context("failed to parse config toml")?;

        if cfg.chat.prompt.is_empty() {
            bail!("chat.prompt must not be empty");
        }
        if cfg.logging.filter.trim().is_empty() {
            bail!("logging.filter must not be empty");
        }
        Ok(cfg)
    }
}

fn default_prompt() -> String {
    "> ".to_string()
}

fn default_show_data() -> bool {
    true
}

fn default_log_filter() -> String {
    "warn".to_string()
}
