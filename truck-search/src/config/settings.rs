//! Service settings read from the environment.

use std::env;
use std::fmt::Display;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::AppError;
use truck_search_ingest::{BootstrapConfig, DocumentIdStrategy, LoaderConfig, DEFAULT_DATASET_URL};

/// Default OpenSearch URL.
const DEFAULT_OPENSEARCH_URL: &str = "http://localhost:9200";

/// Default name of the truck index.
const DEFAULT_INDEX_NAME: &str = "cibusdata";

/// Default HTTP listen address.
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:7000";

/// Settings for a running service.
#[derive(Debug, Clone)]
pub struct Settings {
    pub opensearch_url: String,
    pub index_name: String,
    pub dataset_url: String,
    pub bind_addr: SocketAddr,
    pub bootstrap: BootstrapConfig,
    pub loader: LoaderConfig,
}

impl Settings {
    /// Read settings from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `OPENSEARCH_URL`: OpenSearch server URL (default: http://localhost:9200)
    /// - `INDEX_NAME`: Index holding the truck documents (default: cibusdata)
    /// - `DATASET_URL`: Where the dataset is fetched from on first load
    /// - `BIND_ADDR`: HTTP listen address (default: 127.0.0.1:7000)
    /// - `BOOTSTRAP_MAX_ATTEMPTS`: Index check attempts (default: 3)
    /// - `BOOTSTRAP_RETRY_DELAY_SECS`: Delay between index checks (default: 5)
    /// - `LOAD_BATCH_SIZE`: Documents per bulk request (default: 500)
    /// - `DOCUMENT_ID_STRATEGY`: `positional` or `content-hash` (default: positional)
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read settings through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let bootstrap_defaults = BootstrapConfig::default();
        let loader_defaults = LoaderConfig::default();

        let max_attempts: u32 = parse_var(
            &lookup,
            "BOOTSTRAP_MAX_ATTEMPTS",
            bootstrap_defaults.max_attempts,
        )?;
        if max_attempts == 0 {
            return Err(AppError::config("BOOTSTRAP_MAX_ATTEMPTS must be at least 1"));
        }

        let retry_delay_secs: u64 = parse_var(
            &lookup,
            "BOOTSTRAP_RETRY_DELAY_SECS",
            bootstrap_defaults.retry_delay.as_secs(),
        )?;

        let batch_size: usize = parse_var(&lookup, "LOAD_BATCH_SIZE", loader_defaults.batch_size)?;
        if batch_size == 0 {
            return Err(AppError::config("LOAD_BATCH_SIZE must be at least 1"));
        }

        let id_strategy: DocumentIdStrategy =
            parse_var(&lookup, "DOCUMENT_ID_STRATEGY", loader_defaults.id_strategy)?;

        let bind_addr: SocketAddr = match lookup("BIND_ADDR") {
            Some(raw) => parse_value("BIND_ADDR", &raw)?,
            None => parse_value("BIND_ADDR", DEFAULT_BIND_ADDR)?,
        };

        let index_name = lookup("INDEX_NAME").unwrap_or_else(|| DEFAULT_INDEX_NAME.to_string());
        if index_name.trim().is_empty() {
            return Err(AppError::config("INDEX_NAME must not be empty"));
        }

        Ok(Self {
            opensearch_url: lookup("OPENSEARCH_URL")
                .unwrap_or_else(|| DEFAULT_OPENSEARCH_URL.to_string()),
            index_name,
            dataset_url: lookup("DATASET_URL").unwrap_or_else(|| DEFAULT_DATASET_URL.to_string()),
            bind_addr,
            bootstrap: BootstrapConfig {
                max_attempts,
                retry_delay: Duration::from_secs(retry_delay_secs),
            },
            loader: LoaderConfig {
                batch_size,
                id_strategy,
            },
        })
    }
}

fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => parse_value(key, &raw),
        None => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: Display,
{
    raw.trim()
        .parse()
        .map_err(|e| AppError::config(format!("Invalid {} '{}': {}", key, raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings, AppError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let settings = settings(&[]).unwrap();

        assert_eq!(settings.opensearch_url, "http://localhost:9200");
        assert_eq!(settings.index_name, "cibusdata");
        assert_eq!(settings.dataset_url, DEFAULT_DATASET_URL);
        assert_eq!(settings.bind_addr, "127.0.0.1:7000".parse().unwrap());
        assert_eq!(settings.bootstrap.max_attempts, 3);
        assert_eq!(settings.bootstrap.retry_delay, Duration::from_secs(5));
        assert_eq!(settings.loader.batch_size, 500);
        assert_eq!(settings.loader.id_strategy, DocumentIdStrategy::Positional);
    }

    #[test]
    fn test_overrides() {
        let settings = settings(&[
            ("OPENSEARCH_URL", "http://es:9200"),
            ("INDEX_NAME", "trucks"),
            ("BIND_ADDR", "0.0.0.0:5000"),
            ("BOOTSTRAP_MAX_ATTEMPTS", "5"),
            ("BOOTSTRAP_RETRY_DELAY_SECS", "1"),
            ("LOAD_BATCH_SIZE", "50"),
            ("DOCUMENT_ID_STRATEGY", "content-hash"),
        ])
        .unwrap();

        assert_eq!(settings.opensearch_url, "http://es:9200");
        assert_eq!(settings.index_name, "trucks");
        assert_eq!(settings.bind_addr.port(), 5000);
        assert_eq!(settings.bootstrap.max_attempts, 5);
        assert_eq!(settings.bootstrap.retry_delay, Duration::from_secs(1));
        assert_eq!(settings.loader.batch_size, 50);
        assert_eq!(settings.loader.id_strategy, DocumentIdStrategy::ContentHash);
    }

    #[test]
    fn test_invalid_values() {
        for vars in [
            [("BOOTSTRAP_MAX_ATTEMPTS", "three")],
            [("BOOTSTRAP_MAX_ATTEMPTS", "0")],
            [("LOAD_BATCH_SIZE", "0")],
            [("BIND_ADDR", "localhost")],
            [("DOCUMENT_ID_STRATEGY", "uuid")],
            [("INDEX_NAME", " ")],
        ] {
            let err = settings(&vars).unwrap_err();
            assert!(matches!(err, AppError::ConfigError(_)), "{:?}", vars);
        }
    }
}
