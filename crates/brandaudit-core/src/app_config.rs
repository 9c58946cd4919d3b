use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub language: String,
    pub apify_api_key: Option<String>,
    pub fixtures_dir: Option<PathBuf>,
    pub discovery_timeout_secs: u64,
    pub profile_timeout_secs: u64,
    pub recent_posts_limit: usize,
    pub max_hashtags: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("language", &self.language)
            .field(
                "apify_api_key",
                &self.apify_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("fixtures_dir", &self.fixtures_dir)
            .field("discovery_timeout_secs", &self.discovery_timeout_secs)
            .field("profile_timeout_secs", &self.profile_timeout_secs)
            .field("recent_posts_limit", &self.recent_posts_limit)
            .field("max_hashtags", &self.max_hashtags)
            .finish()
    }
}
