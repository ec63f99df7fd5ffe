use std::str::FromStr;

use anyhow::{Context, Result, anyhow};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Elasticsearch,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "elasticsearch" | "es" => Ok(Self::Elasticsearch),
            "memory" | "in-memory" => Ok(Self::Memory),
            other => Err(anyhow!(
                "unknown STORE_BACKEND '{other}', expecting 'elasticsearch' or 'memory'"
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub http_addr: String,
    pub cors_origins: Vec<String>,
    pub log_level: String,
    pub http_request_body_limit_bytes: usize,
    pub http_concurrency_limit: usize,
    pub http_request_timeout_secs: u64,
    pub store_backend: StoreBackend,
    pub elasticsearch_url: String,
    pub elasticsearch_index: String,
    pub elasticsearch_username: Option<String>,
    pub elasticsearch_password: Option<String>,
    pub elasticsearch_max_results: usize,
    pub auth_username: String,
    pub auth_password: String,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let auth_password = get_required("AUTH_PASSWORD").context("AUTH_PASSWORD is required")?;
        let auth_username = std::env::var("AUTH_USERNAME").unwrap_or_else(|_| "admin".to_string());
        if auth_username.trim().is_empty() {
            return Err(anyhow!("AUTH_USERNAME must not be empty"));
        }

        let http_addr = std::env::var("HTTP_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
        let cors_origins = parse_cors_origins(
            std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:8000,http://127.0.0.1:8000".to_string()),
        );
        let log_level = std::env::var("LOG_LEVEL")
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| "info".to_string());
        let http_request_body_limit_bytes =
            parse_usize_env("HTTP_REQUEST_BODY_LIMIT_BYTES", 1024 * 1024)?;
        let http_concurrency_limit = parse_usize_env("HTTP_CONCURRENCY_LIMIT", 256)?;
        let http_request_timeout_secs = parse_u64_env("HTTP_REQUEST_TIMEOUT_SECS", 10)?;

        let store_backend = std::env::var("STORE_BACKEND")
            .unwrap_or_else(|_| "elasticsearch".to_string())
            .parse::<StoreBackend>()?;
        let elasticsearch_url = std::env::var("ELASTICSEARCH_URL")
            .unwrap_or_else(|_| "http://localhost:9200".to_string());
        let elasticsearch_index =
            std::env::var("ELASTICSEARCH_INDEX").unwrap_or_else(|_| "blog".to_string());
        let elasticsearch_username = get_optional("ELASTICSEARCH_USERNAME");
        let elasticsearch_password = get_optional("ELASTICSEARCH_PASSWORD");
        let elasticsearch_max_results = parse_usize_env("ELASTICSEARCH_MAX_RESULTS", 10_000)?;

        Ok(Self {
            http_addr,
            cors_origins,
            log_level,
            http_request_body_limit_bytes,
            http_concurrency_limit,
            http_request_timeout_secs,
            store_backend,
            elasticsearch_url,
            elasticsearch_index,
            elasticsearch_username,
            elasticsearch_password,
            elasticsearch_max_results,
            auth_username: auth_username.trim().to_string(),
            auth_password,
        })
    }
}

fn get_required(key: &str) -> Result<String> {
    let value = std::env::var(key)?;
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(anyhow!("{key} must not be empty"));
    }
    Ok(value)
}

fn get_optional(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_cors_origins(raw: String) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_usize_env(key: &str, default: usize) -> Result<usize> {
    let value = std::env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse::<usize>()
        .with_context(|| format!("Failed to parse {key}, expecting positive integer"))?;

    if value == 0 {
        return Err(anyhow!("{key} must be > 0"));
    }
    Ok(value)
}

fn parse_u64_env(key: &str, default: u64) -> Result<u64> {
    let value = std::env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse::<u64>()
        .with_context(|| format!("Failed to parse {key}, expecting positive integer"))?;

    if value == 0 {
        return Err(anyhow!("{key} must be > 0"));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::{StoreBackend, parse_cors_origins};

    #[test]
    fn cors_origins_are_trimmed_and_empty_entries_dropped() {
        let origins = parse_cors_origins(" http://a.test , ,http://b.test,".to_string());
        assert_eq!(origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn store_backend_parses_known_names() {
        assert_eq!(
            "Elasticsearch".parse::<StoreBackend>().ok(),
            Some(StoreBackend::Elasticsearch)
        );
        assert_eq!(" memory ".parse::<StoreBackend>().ok(), Some(StoreBackend::Memory));
        assert!("postgres".parse::<StoreBackend>().is_err());
    }
}
