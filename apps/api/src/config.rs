use std::time::Duration;

use anyhow::{anyhow, Context, Result};

use crate::analysis::ScoreScale;
use crate::preferences::Theme;

const DEFAULT_SERVICE_URL: &str = "http://localhost:5000";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the résumé analysis service.
    pub service_url: String,
    pub port: u16,
    pub rust_log: String,
    /// `None` when `JOBINTEL_REQUEST_TIMEOUT_SECS=0`.
    pub request_timeout: Option<Duration>,
    /// How the service's `match_score` is interpreted for display.
    pub score_scale: ScoreScale,
    pub theme: Theme,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let timeout_secs = match lookup("JOBINTEL_REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .context("JOBINTEL_REQUEST_TIMEOUT_SECS must be a whole number of seconds")?,
            None => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        let score_scale = match lookup("JOBINTEL_MATCH_SCORE_SCALE") {
            Some(raw) => raw.parse::<ScoreScale>().map_err(|e| anyhow!(e))?,
            None => ScoreScale::default(),
        };

        let theme = match lookup("JOBINTEL_THEME") {
            Some(raw) => raw.parse::<Theme>().map_err(|e| anyhow!(e))?,
            None => Theme::default(),
        };

        Ok(Config {
            service_url: lookup("JOBINTEL_SERVICE_URL")
                .unwrap_or_else(|| DEFAULT_SERVICE_URL.to_string()),
            port: lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            request_timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
            score_scale,
            theme,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.service_url, "http://localhost:5000");
        assert_eq!(config.port, 8080);
        assert_eq!(config.request_timeout, Some(Duration::from_secs(120)));
        assert_eq!(config.score_scale, ScoreScale::Fraction);
        assert_eq!(config.theme, Theme::Light);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("JOBINTEL_SERVICE_URL", "http://analysis:9000"),
            ("PORT", "3000"),
            ("JOBINTEL_REQUEST_TIMEOUT_SECS", "0"),
            ("JOBINTEL_MATCH_SCORE_SCALE", "percent"),
            ("JOBINTEL_THEME", "dark"),
        ])
        .unwrap();
        assert_eq!(config.service_url, "http://analysis:9000");
        assert_eq!(config.port, 3000);
        assert_eq!(config.request_timeout, None);
        assert_eq!(config.score_scale, ScoreScale::Percent);
        assert_eq!(config.theme, Theme::Dark);
    }

    #[test]
    fn test_bad_values_rejected() {
        assert!(config_from(&[("PORT", "eighty")]).is_err());
        assert!(config_from(&[("JOBINTEL_MATCH_SCORE_SCALE", "ratio")]).is_err());
        assert!(config_from(&[("JOBINTEL_REQUEST_TIMEOUT_SECS", "-1")]).is_err());
    }
}
