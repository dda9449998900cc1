use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub resume_path: String,
    pub chat_log_dir: String,
    pub allowed_origin: String,
    pub scraper: ScraperConfig,
}

/// Search endpoints and timing used by the signal acquirer.
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    pub job_search: SearchEndpoint,
    pub culture_search: SearchEndpoint,
    pub job_settle: Duration,
    pub culture_settle: Duration,
    pub profile_settle: Duration,
    pub navigation_timeout: Duration,
    pub user_agent: String,
}

/// A search page plus the query parameter the company name is appended as.
#[derive(Debug, Clone)]
pub struct SearchEndpoint {
    pub base_url: String,
    pub query_param: String,
}

impl SearchEndpoint {
    pub fn new(base_url: impl Into<String>, query_param: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            query_param: query_param.into(),
        }
    }
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            job_search: SearchEndpoint::new(
                "https://www.saramin.co.kr/zf_user/search/recruit?searchType=search",
                "searchword",
            ),
            culture_search: SearchEndpoint::new("https://www.jobplanet.co.kr/search", "query"),
            job_settle: Duration::from_millis(2000),
            culture_settle: Duration::from_millis(3000),
            profile_settle: Duration::from_millis(2000),
            navigation_timeout: Duration::from_secs(15),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = ScraperConfig::default();

        Ok(Config {
            port: parse_env("PORT", 8000)?,
            rust_log: env_or("RUST_LOG", "info"),
            resume_path: env_or("RESUME_PATH", "data/resume.json"),
            chat_log_dir: env_or("CHAT_LOG_DIR", "logs"),
            allowed_origin: env_or("ALLOWED_ORIGIN", "http://localhost:3000"),
            scraper: ScraperConfig {
                job_search: SearchEndpoint {
                    base_url: env_or("JOB_SEARCH_URL", &defaults.job_search.base_url),
                    ..defaults.job_search
                },
                culture_search: SearchEndpoint {
                    base_url: env_or("CULTURE_SEARCH_URL", &defaults.culture_search.base_url),
                    ..defaults.culture_search
                },
                job_settle: Duration::from_millis(parse_env("JOB_SETTLE_MS", 2000)?),
                culture_settle: Duration::from_millis(parse_env("CULTURE_SETTLE_MS", 3000)?),
                profile_settle: Duration::from_millis(parse_env("PROFILE_SETTLE_MS", 2000)?),
                navigation_timeout: Duration::from_secs(parse_env("SCRAPE_TIMEOUT_SECS", 15)?),
                user_agent: env_or("SCRAPER_USER_AGENT", &defaults.user_agent),
            },
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}
