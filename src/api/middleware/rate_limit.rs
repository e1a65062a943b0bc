use super::auth::presented_key;
use crate::errors::AppError;
use crate::services::parse_api_key;
use crate::state::SharedState;
use axum::extract::{Request, State};
use axum::http::{HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use log::warn;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// 超过这个数量的窗口记录时顺带清理过期项
const CLEANUP_THRESHOLD: usize = 10_000;

#[derive(Debug, Clone, Copy)]
struct Window {
    started_at: i64,
    count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    /// 距离窗口重置的秒数
    pub reset_after_secs: u64,
}

/// 固定窗口计数限流，按 key 独立计数
pub struct RateLimiter {
    limit: u32,
    window_secs: i64,
    windows: Mutex<HashMap<String, Window>>,
}

impl RateLimiter {
    pub fn new(limit: u32, window_secs: u64) -> Self {
        Self {
            limit,
            window_secs: window_secs.max(1) as i64,
            windows: Mutex::new(HashMap::new()),
        }
    }

    pub fn per_minute(limit: u32) -> Self {
        Self::new(limit, 60)
    }

    pub async fn check(&self, key: &str) -> RateDecision {
        self.check_at(key, Utc::now().timestamp()).await
    }

    pub async fn check_at(&self, key: &str, now: i64) -> RateDecision {
        let mut windows = self.windows.lock().await;
        if windows.len() > CLEANUP_THRESHOLD {
            let span = self.window_secs;
            windows.retain(|_, w| now - w.started_at < span);
        }
        let window = windows.entry(key.to_string()).or_insert(Window {
            started_at: now,
            count: 0,
        });
        if now - window.started_at >= self.window_secs {
            *window = Window {
                started_at: now,
                count: 0,
            };
        }
        let reset_after_secs = (window.started_at + self.window_secs - now).max(1) as u64;
        if window.count >= self.limit {
            return RateDecision {
                allowed: false,
                limit: self.limit,
                remaining: 0,
                reset_after_secs,
            };
        }
        window.count += 1;
        RateDecision {
            allowed: true,
            limit: self.limit,
            remaining: self.limit - window.count,
            reset_after_secs,
        }
    }
}

/// 有 API key 按前缀计数，否则按 X-Forwarded-For，最后归入 anonymous
pub fn client_key(headers: &HeaderMap) -> String {
    if let Some(prefix) = presented_key(headers).and_then(parse_api_key) {
        return format!("key:{}", prefix);
    }
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|ip| format!("ip:{}", ip))
        .unwrap_or_else(|| "anonymous".to_string())
}

pub async fn rate_limit(State(state): State<SharedState>, request: Request, next: Next) -> Response {
    let key = client_key(request.headers());
    let decision = state.rate_limiter.check(&key).await;
    let mut response = if decision.allowed {
        next.run(request).await
    } else {
        warn!("⚠ 触发限流: {}", key);
        AppError::RateLimited {
            retry_after_secs: decision.reset_after_secs,
        }
        .into_response()
    };
    let headers = response.headers_mut();
    headers.insert("x-ratelimit-limit", HeaderValue::from(decision.limit));
    headers.insert("x-ratelimit-remaining", HeaderValue::from(decision.remaining));
    response
}
