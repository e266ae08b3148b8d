//! Runtime configuration for the document filter.

use std::time::Duration;

use anyhow::Context;

use common::search_const::{DEFAULT_PER_PAGE, MAX_PER_PAGE};

#[derive(Debug, Clone, PartialEq)]
pub struct FilterConfig {
    /// Base URL of the search service; `/advanced_search` is appended.
    pub search_endpoint: String,
    pub search_timeout: Duration,
    pub default_per_page: u64,
    /// Used when a request does not say whether to restrict to content
    /// relevant to local government.
    pub relevant_to_local_government: bool,
    pub clickhouse: ClickhouseConfig,
    pub bind_address: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClickhouseConfig {
    pub url: String,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl Default for ClickhouseConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8123".to_string(),
            user: "whitehall".to_string(),
            password: "whitehall".to_string(),
            database: "whitehall".to_string(),
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            search_endpoint: "http://127.0.0.1:3009".to_string(),
            search_timeout: Duration::from_secs(5),
            default_per_page: DEFAULT_PER_PAGE,
            relevant_to_local_government: false,
            clickhouse: ClickhouseConfig::default(),
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

impl FilterConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads every option through `lookup`, falling back to defaults for
    /// unset keys. Set-but-malformed numeric or boolean values are errors.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = FilterConfig::default();
        let search_timeout = match lookup("SEARCH_TIMEOUT_SECS") {
            Some(v) => Duration::from_secs(v.trim().parse().context("SEARCH_TIMEOUT_SECS is not a number")?),
            None => defaults.search_timeout,
        };
        let default_per_page = match lookup("DEFAULT_PER_PAGE") {
            Some(v) => v.trim().parse::<u64>().context("DEFAULT_PER_PAGE is not a number")?,
            None => defaults.default_per_page,
        };
        if default_per_page == 0 || default_per_page > MAX_PER_PAGE {
            anyhow::bail!("DEFAULT_PER_PAGE must be between 1 and {MAX_PER_PAGE}, got {default_per_page}");
        }
        let relevant_to_local_government = match lookup("RELEVANT_TO_LOCAL_GOVERNMENT") {
            Some(v) => v.trim().parse::<bool>().context("RELEVANT_TO_LOCAL_GOVERNMENT must be true or false")?,
            None => defaults.relevant_to_local_government,
        };
        Ok(Self {
            search_endpoint: lookup("SEARCH_API_URL").unwrap_or(defaults.search_endpoint),
            search_timeout,
            default_per_page,
            relevant_to_local_government,
            clickhouse: ClickhouseConfig {
                url: lookup("CLICKHOUSE_URL").unwrap_or(defaults.clickhouse.url),
                user: lookup("CLICKHOUSE_USER").unwrap_or(defaults.clickhouse.user),
                password: lookup("CLICKHOUSE_PASSWORD").unwrap_or(defaults.clickhouse.password),
                database: lookup("CLICKHOUSE_DATABASE").unwrap_or(defaults.clickhouse.database),
            },
            bind_address: lookup("BIND_ADDRESS").unwrap_or(defaults.bind_address),
        })
    }
}
