use crate::error::*;
use serde::Deserialize;
use std::fs;

#[derive(Deserialize, Debug, Default, PartialEq, Eq, Clone)]
pub struct ConfigToml {
  pub resolver: Option<String>,
  pub listen: Option<String>,
  pub path: Option<String>,
  pub upstream_timeout: Option<u64>,
  pub logger: Option<LoggerToml>,
}

#[derive(Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(default)]
pub struct LoggerToml {
  /// log level, overridden by RUST_LOG
  pub level: String,
  /// json log file, disabled when empty
  pub logfile: String,
  /// log to stdout
  pub stdout: bool,
}

impl Default for LoggerToml {
  fn default() -> Self {
    Self {
      level: crate::constants::DEFAULT_LOG_LEVEL.to_string(),
      logfile: String::new(),
      stdout: true,
    }
  }
}

impl ConfigToml {
  pub fn new(config_file: &str) -> anyhow::Result<Self> {
    let config_str =
      fs::read_to_string(config_file).with_context(|| format!("failure reading DoH translator config file: {config_file}"))?;

    toml::from_str(&config_str).map_err(|e| anyhow!(e))
  }

  /// Logger settings, defaulted when the section is missing
  pub fn logger(&self) -> LoggerToml {
    self.logger.clone().unwrap_or_default()
  }
}
