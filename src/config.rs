use std::{env, fmt, sync::Arc, time::Duration};

use memoq_util::{HttpTransport, Transport};
use url::Url;

use crate::Error;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

pub const BASE_URL_VAR: &str = "MEMOQ_BASE_URL";
pub const API_KEY_VAR: &str = "MEMOQ_API_KEY";
pub const TIMEOUT_VAR: &str = "MEMOQ_TIMEOUT_SECS";

/// Connection settings shared by every service of one server.
#[derive(Clone, PartialEq)]
pub struct Config {
    base_url: Url,
    api_key: Option<String>,
    timeout: Option<Duration>,
}

impl Config {
    pub fn new(base_url: &str) -> Result<Self, Error> {
        Ok(Self {
            base_url: Url::parse(base_url)?,
            api_key: None,
            timeout: None,
        })
    }

    /// Reads `MEMOQ_BASE_URL`, `MEMOQ_API_KEY` and `MEMOQ_TIMEOUT_SECS`.
    /// The base URL falls back to [`DEFAULT_BASE_URL`].
    pub fn from_env() -> Result<Self, Error> {
        let base_url = env::var(BASE_URL_VAR).unwrap_or_else(|_| DEFAULT_BASE_URL.to_owned());
        let mut config = Self::new(&base_url)?;

        if let Ok(api_key) = env::var(API_KEY_VAR) {
            config = config.with_api_key(api_key);
        }

        if let Ok(timeout) = env::var(TIMEOUT_VAR) {
            let seconds = timeout.parse::<u64>().map_err(|_| {
                Error::Config(format!(
                    "{} must be a number of seconds, got {:?}",
                    TIMEOUT_VAR, timeout
                ))
            })?;
            config = config.with_timeout(Duration::from_secs(seconds));
        }

        Ok(config)
    }

    /// Sent as the `ApiKey` SOAP header on every call.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// The HTTP transport these settings describe.
    pub fn transport(&self) -> Result<Arc<dyn Transport>, Error> {
        Ok(Arc::new(HttpTransport::new(self.timeout)?))
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_base_url() {
        assert!(matches!(Config::new("not a url"), Err(Error::Url(_))));
    }

    #[test]
    fn reads_settings_from_the_environment() {
        env::set_var(BASE_URL_VAR, "https://tms.example.com/");
        env::set_var(API_KEY_VAR, "0123-secret");
        env::set_var(TIMEOUT_VAR, "30");

        let config = Config::from_env().unwrap();
        assert_eq!(config.base_url().as_str(), "https://tms.example.com/");
        assert_eq!(config.api_key(), Some("0123-secret"));
        assert_eq!(config.timeout(), Some(Duration::from_secs(30)));

        env::set_var(TIMEOUT_VAR, "soon");
        match Config::from_env() {
            Err(Error::Config(message)) => {
                assert!(message.contains(TIMEOUT_VAR));
                assert!(message.contains("\"soon\""));
            }
            other => panic!("unexpected result {:?}", other),
        }

        env::remove_var(BASE_URL_VAR);
        env::remove_var(API_KEY_VAR);
        env::remove_var(TIMEOUT_VAR);

        let config = Config::from_env().unwrap();
        assert_eq!(config.base_url().as_str(), "http://localhost:8080/");
        assert_eq!(config.api_key(), None);
        assert_eq!(config.timeout(), None);
    }

    #[test]
    fn debug_output_hides_api_key() {
        let config = Config::new("http://memoq.test:8080")
            .unwrap()
            .with_api_key("0123-secret")
            .with_timeout(Duration::from_secs(30));

        let debug = format!("{:?}", config);

        assert!(debug.contains("http://memoq.test:8080/"));
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("0123-secret"));
        assert_eq!(config.api_key(), Some("0123-secret"));
        assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
    }
}
