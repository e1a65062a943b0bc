use crate::errors::{AppError, AppResult};
use crate::services::{generate_api_key, Scope};
use crate::state::SharedState;
use crate::storage::repository::{ApiKeyDto, ApiKeyRepository};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use log::info;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreateApiKeyInput {
    pub name: String,
    /// 缺省授予全部只读权限
    #[serde(default)]
    pub scopes: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct CreatedApiKey {
    #[serde(flatten)]
    pub key: ApiKeyDto,
    /// 完整密钥只在创建时返回这一次
    #[serde(rename = "rawKey")]
    pub raw_key: String,
}

pub async fn list(State(state): State<SharedState>) -> AppResult<Json<Vec<ApiKeyDto>>> {
    Ok(Json(ApiKeyRepository::list(&state.db).await?))
}

pub async fn create(
    State(state): State<SharedState>,
    payload: Result<Json<CreateApiKeyInput>, JsonRejection>,
) -> AppResult<(StatusCode, Json<CreatedApiKey>)> {
    let Json(input) = payload?;
    let name = input.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::validation("name is required"));
    }
    let scopes = match input.scopes {
        Some(scopes) if !scopes.is_empty() => scopes,
        _ => Scope::all(),
    };
    if let Some(bad) = scopes.iter().find(|s| !Scope::is_known(s)) {
        return Err(AppError::validation(format!("unknown scope: {}", bad)));
    }
    let generated = generate_api_key();
    let model =
        ApiKeyRepository::insert(&state.db, name, generated.prefix, generated.hash, &scopes).await?;
    info!("✓ 新建 API key [{}]: {}", model.id, model.key_prefix);
    Ok((
        StatusCode::CREATED,
        Json(CreatedApiKey {
            key: model.into(),
            raw_key: generated.raw,
        }),
    ))
}

/// 吊销而非物理删除，保留审计信息
pub async fn revoke(State(state): State<SharedState>, Path(id): Path<i32>) -> AppResult<StatusCode> {
    let updated = ApiKeyRepository::revoke(&state.db, id).await?;
    if updated == 0 {
        return Err(AppError::not_found("API key"));
    }
    info!("已吊销 API key [{}]", id);
    Ok(StatusCode::NO_CONTENT)
}
