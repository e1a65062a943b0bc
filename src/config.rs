use log::{info, warn};
use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// 为 true 时公共 API 拒绝匿名访问
    pub require_api_key: bool,
    pub rate_limit_per_minute: u32,
    pub cors_allowed_origins: Vec<String>,
    pub demo_mode: bool,
    pub demo_reset_token: Option<String>,
    pub demo_reset_interval: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite://sizecharts.db?mode=rwc".to_string(),
            host: "0.0.0.0".to_string(),
            port: 3000,
            require_api_key: false,
            rate_limit_per_minute: 100,
            cors_allowed_origins: vec!["*".to_string()],
            demo_mode: false,
            demo_reset_token: None,
            demo_reset_interval: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Config::default();
        Self {
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            host: env::var("HOST").unwrap_or(defaults.host),
            port: try_load("PORT", defaults.port),
            require_api_key: load_flag("REQUIRE_API_KEY", defaults.require_api_key),
            rate_limit_per_minute: try_load("RATE_LIMIT_PER_MINUTE", defaults.rate_limit_per_minute),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .map(|raw| split_list(&raw))
                .unwrap_or(defaults.cors_allowed_origins),
            demo_mode: load_flag("DEMO_MODE", defaults.demo_mode),
            demo_reset_token: env::var("DEMO_RESET_TOKEN")
                .ok()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            demo_reset_interval: env::var("DEMO_RESET_INTERVAL_SECS")
                .ok()
                .and_then(|raw| match raw.trim().parse::<u64>() {
                    Ok(0) => None,
                    Ok(secs) => Some(Duration::from_secs(secs)),
                    Err(e) => {
                        warn!("DEMO_RESET_INTERVAL_SECS 无效 ({}): {}", raw, e);
                        None
                    }
                }),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn try_load<T: FromStr + Display>(key: &str, default: T) -> T
where
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|e| {
            warn!("{} 取值无效 ({}): {}，使用默认值 {}", key, raw, e, default);
            default
        }),
        Err(_) => {
            info!("{} 未设置，使用默认值 {}", key, default);
            default
        }
    }
}

fn load_flag(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(raw) => parse_flag(&raw).unwrap_or_else(|| {
            warn!("{} 取值无效 ({})，使用默认值 {}", key, raw, default);
            default
        }),
        Err(_) => default,
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(|c| c == ',' || c == ';' || c == ' ')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag(" 0 "), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn splits_origin_list() {
        assert_eq!(
            split_list("https://a.example, https://b.example;;"),
            vec!["https://a.example", "https://b.example"]
        );
    }
}
