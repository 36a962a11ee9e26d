use std::{env, time::Duration};

use secrecy::SecretString;

#[derive(Clone, Debug)]
pub struct Config {
    pub web_server_host: String,
    pub web_server_port: u16,
    pub app_env: String,
    pub openai_api_key: Option<SecretString>,
    pub openai_api_base: String,
    pub openai_model: String,
    pub inference_timeout_secs: u64,
    pub rate_limit_max_requests: u32,
    pub rate_limit_window_secs: u64,
    pub cache_max_items: usize,
    pub cors_allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "127.0.0.1".to_string()),
            web_server_port: env_parse("WEB_SERVER_PORT", 8080),
            app_env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            openai_api_key: env::var("OPENAI_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty())
                .map(SecretString::from),
            openai_api_base: env::var("OPENAI_API_BASE")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            openai_model: env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            inference_timeout_secs: env_parse("INFERENCE_TIMEOUT_SECS", 25),
            rate_limit_max_requests: env_parse("RATE_LIMIT_MAX_REQUESTS", 20),
            rate_limit_window_secs: env_parse("RATE_LIMIT_WINDOW_SECS", 60),
            cache_max_items: env_parse("CACHE_MAX_ITEMS", 500),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "*".to_string())
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect(),
        }
    }

    pub fn is_production(&self) -> bool {
        self.app_env.eq_ignore_ascii_case("production")
    }

    pub fn inference_timeout(&self) -> Duration {
        Duration::from_secs(self.inference_timeout_secs.max(1))
    }

    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit_window_secs.max(1))
    }

    /// Logs configuration problems that only surface per request.
    ///
    /// The server must still start without an API key: every inference call
    /// then fails on its own with a credential error.
    pub fn validate_for_production(&self) {
        if self.openai_api_key.is_none() {
            log::warn!(
                "OPENAI_API_KEY is not set; tutor, quiz and PYQ requests will fail until it is configured"
            );
        }

        if self.is_production() && self.cors_allowed_origins.iter().any(|o| o == "*") {
            log::warn!("CORS_ALLOWED_ORIGINS allows any origin in a production environment");
        }
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            app_env: "test".to_string(),
            openai_api_key: Some(SecretString::from("sk-test".to_string())),
            openai_api_base: "http://localhost:9/v1".to_string(),
            openai_model: "gpt-4o-mini".to_string(),
            inference_timeout_secs: 5,
            rate_limit_max_requests: 20,
            rate_limit_window_secs: 60,
            cache_max_items: 500,
            cors_allowed_origins: vec!["*".to_string()],
        }
    }
}

fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env_with_defaults() {
        let config = Config::from_env();

        // Should use env vars if set, or fall back to defaults
        assert!(!config.web_server_host.is_empty());
        assert!(!config.openai_model.is_empty());
        assert!(config.rate_limit_max_requests > 0);
    }

    #[test]
    fn test_test_config() {
        let config = Config::test_config();

        assert_eq!(config.rate_limit_max_requests, 20);
        assert_eq!(config.rate_limit_window(), Duration::from_secs(60));
        assert_eq!(config.cache_max_items, 500);
        assert!(!config.is_production());
    }

    #[test]
    fn test_zero_timeout_is_raised_to_one_second() {
        let config = Config {
            inference_timeout_secs: 0,
            ..Config::test_config()
        };

        assert_eq!(config.inference_timeout(), Duration::from_secs(1));
    }
}
