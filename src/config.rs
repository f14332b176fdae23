use anyhow::{Context, Result};
use std::env;

/// Secrets and toggles read once at startup; immutable afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    pub practicum_token: String,
    pub telegram_token: String,
    pub telegram_chat_id: i64,
    /// Forward cycle failures to the chat in addition to logging them.
    pub notify_on_error: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            practicum_token: env::var("PRACTICUM_TOKEN")
                .context("PRACTICUM_TOKEN environment variable is required")?,
            telegram_token: env::var("TELEGRAM_TOKEN")
                .context("TELEGRAM_TOKEN environment variable is required")?,
            telegram_chat_id: env::var("TELEGRAM_CHAT_ID")
                .context("TELEGRAM_CHAT_ID environment variable is required")?
                .parse()
                .context("TELEGRAM_CHAT_ID must be a numeric chat identifier")?,
            notify_on_error: env::var("NOTIFY_ON_ERROR")
                .map(|v| v != "0" && !v.eq_ignore_ascii_case("false"))
                .unwrap_or(true),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test so the env mutations cannot race another test thread.
    #[test]
    fn missing_chat_id_is_a_configuration_error() {
        env::set_var("PRACTICUM_TOKEN", "p");
        env::set_var("TELEGRAM_TOKEN", "t");
        env::remove_var("TELEGRAM_CHAT_ID");
        assert!(Config::from_env().is_err());

        env::set_var("TELEGRAM_CHAT_ID", "not-a-number");
        assert!(Config::from_env().is_err());

        env::set_var("TELEGRAM_CHAT_ID", "123456");
        let config = Config::from_env().unwrap();
        assert_eq!(config.telegram_chat_id, 123456);
        assert!(config.notify_on_error);
    }
}
