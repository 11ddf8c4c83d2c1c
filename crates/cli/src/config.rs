use std::path::PathBuf;
use std::time::Duration;

use retouch_core::orchestrator::DEFAULT_EDIT_TIMEOUT;
use retouch_gateway::config::ConfigError;

/// Session settings loaded from environment variables, with command-line
/// flags taking precedence.
///
/// | Env var             | Default |
/// |---------------------|---------|
/// | `EDIT_TIMEOUT_SECS` | `60`    |
/// | `EDIT_OUTPUT`       | none    |
///
/// Without an output path, `save` writes next to the input as
/// `<stem>-edited.<ext>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub edit_timeout: Duration,
    pub output: Option<PathBuf>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            edit_timeout: DEFAULT_EDIT_TIMEOUT,
            output: None,
        }
    }
}

impl SessionConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(raw) = lookup("EDIT_TIMEOUT_SECS") {
            config.edit_timeout = parse_timeout(&raw)?;
        }
        if let Some(path) = lookup("EDIT_OUTPUT").filter(|p| !p.trim().is_empty()) {
            config.output = Some(PathBuf::from(path.trim()));
        }

        Ok(config)
    }

    /// Apply command-line overrides. A zero timeout is rejected, same as
    /// for `EDIT_TIMEOUT_SECS`.
    pub fn with_overrides(
        mut self,
        timeout_secs: Option<u64>,
        output: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        if let Some(secs) = timeout_secs {
            if secs == 0 {
                return Err(ConfigError::Invalid {
                    name: "--timeout-secs",
                    expected: "a positive number of seconds",
                    value: secs.to_string(),
                });
            }
            self.edit_timeout = Duration::from_secs(secs);
        }
        if output.is_some() {
            self.output = output;
        }
        Ok(self)
    }
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::Invalid {
            name: "EDIT_TIMEOUT_SECS",
            expected: "a positive number of seconds",
            value: raw.to_string(),
        }),
    }
}
