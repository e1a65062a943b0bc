use crate::errors::{AppError, AppResult};
use crate::services::{parse_api_key, verify_api_key, Scope};
use crate::state::SharedState;
use crate::storage::repository::api_key_repo::parse_scopes;
use crate::storage::repository::ApiKeyRepository;
use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use log::warn;

pub const API_KEY_HEADER: &str = "x-api-key";

/// 当前请求的调用方，由 authenticate 写入 request extensions
#[derive(Debug, Clone, Default)]
pub struct ApiClient {
    pub key_id: Option<i32>,
    pub key_prefix: Option<String>,
    pub scopes: Vec<String>,
}

impl ApiClient {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.key_id.is_some()
    }

    /// 匿名调用只能访问已发布数据，不做 scope 检查
    pub fn authorize(&self, scope: Scope) -> AppResult<()> {
        if self.is_authenticated() && !scope.granted_by(&self.scopes) {
            return Err(AppError::Forbidden(format!(
                "API key lacks the {} scope",
                scope.as_str()
            )));
        }
        Ok(())
    }
}

/// 从 `X-API-Key` 或 `Authorization: Bearer` 读取密钥
pub fn presented_key(headers: &HeaderMap) -> Option<&str> {
    if let Some(v) = headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok()) {
        let v = v.trim();
        if !v.is_empty() {
            return Some(v);
        }
    }
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

pub async fn authenticate(
    State(state): State<SharedState>,
    mut request: Request,
    next: Next,
) -> AppResult<Response> {
    let presented = presented_key(request.headers()).map(str::to_owned);
    let client = match presented {
        None if state.config.require_api_key => {
            return Err(AppError::Unauthorized("API key required".into()));
        }
        None => ApiClient::anonymous(),
        Some(raw) => verify(&state, &raw).await?,
    };
    request.extensions_mut().insert(client);
    Ok(next.run(request).await)
}

async fn verify(state: &SharedState, raw: &str) -> AppResult<ApiClient> {
    let invalid = || AppError::Unauthorized("invalid API key".into());
    let prefix = parse_api_key(raw).ok_or_else(invalid)?;
    let Some(key) = ApiKeyRepository::find_by_prefix(&state.db, prefix).await? else {
        warn!("⚠ 未知的 API key 前缀: {}", prefix);
        return Err(invalid());
    };
    if !verify_api_key(raw, &key.key_hash) {
        warn!("⚠ API key 校验失败: {}", prefix);
        return Err(invalid());
    }
    if !key.is_active {
        warn!("⚠ 已吊销的 API key: {}", prefix);
        return Err(AppError::Unauthorized("API key has been revoked".into()));
    }
    ApiKeyRepository::touch_last_used(&state.db, key.id).await?;
    Ok(ApiClient {
        key_id: Some(key.id),
        key_prefix: Some(key.key_prefix),
        scopes: parse_scopes(&key.scopes),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn key_is_read_from_either_header() {
        let mut headers = HeaderMap::new();
        assert_eq!(presented_key(&headers), None);
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer sc_abc"));
        assert_eq!(presented_key(&headers), Some("sc_abc"));
        headers.insert(API_KEY_HEADER, HeaderValue::from_static("sc_xyz"));
        assert_eq!(presented_key(&headers), Some("sc_xyz"));
    }

    #[test]
    fn scopes_only_apply_to_authenticated_clients() {
        assert!(ApiClient::anonymous().authorize(Scope::ChartsRead).is_ok());
        let client = ApiClient {
            key_id: Some(1),
            key_prefix: Some("abcdefgh".into()),
            scopes: vec!["labels:read".into()],
        };
        assert!(client.authorize(Scope::LabelsRead).is_ok());
        assert!(matches!(
            client.authorize(Scope::ChartsRead),
            Err(AppError::Forbidden(_))
        ));
        let admin = ApiClient {
            scopes: vec!["*".into()],
            ..client
        };
        assert!(admin.authorize(Scope::CategoriesRead).is_ok());
    }
}
