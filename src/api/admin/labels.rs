use crate::domain::is_valid_label_key;
use crate::errors::{AppError, AppResult};
use crate::state::SharedState;
use crate::storage::entity::size_label::Model as SizeLabelModel;
use crate::storage::repository::{LabelDefinition, LabelRepository};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use log::info;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct LabelQuery {
    #[serde(default, rename = "type")]
    pub label_type: Option<String>,
}

fn checked(mut def: LabelDefinition) -> AppResult<LabelDefinition> {
    def.key = def.key.trim().to_string();
    def.label_type = def.label_type.trim().to_string();
    def.display_value = def.display_value.trim().to_string();
    if !is_valid_label_key(&def.key) {
        return Err(AppError::validation(format!(
            "invalid label key {:?}: use A-Z, 0-9 and _",
            def.key
        )));
    }
    if !is_valid_label_key(&def.label_type) {
        return Err(AppError::validation(format!("invalid label type: {:?}", def.label_type)));
    }
    if def.display_value.is_empty() {
        return Err(AppError::validation("displayValue is required"));
    }
    Ok(def)
}

pub async fn list(
    State(state): State<SharedState>,
    query: Result<Query<LabelQuery>, QueryRejection>,
) -> AppResult<Json<Vec<SizeLabelModel>>> {
    let Query(query) = query?;
    let labels = LabelRepository::list(&state.db, query.label_type.as_deref()).await?;
    Ok(Json(labels))
}

pub async fn create(
    State(state): State<SharedState>,
    payload: Result<Json<LabelDefinition>, JsonRejection>,
) -> AppResult<(StatusCode, Json<SizeLabelModel>)> {
    let Json(def) = payload?;
    let def = checked(def)?;
    if LabelRepository::key_taken(&state.db, &def.key, None).await? {
        return Err(AppError::conflict(format!("label key already in use: {}", def.key)));
    }
    let label = LabelRepository::insert(&state.db, def).await?;
    info!("✓ 新建尺码标签 [{}]: {}", label.id, label.key);
    Ok((StatusCode::CREATED, Json(label)))
}

pub async fn update(
    State(state): State<SharedState>,
    Path(id): Path<i32>,
    payload: Result<Json<LabelDefinition>, JsonRejection>,
) -> AppResult<Json<SizeLabelModel>> {
    let Json(def) = payload?;
    let model = LabelRepository::find(&state.db, id)
        .await?
        .ok_or_else(|| AppError::not_found("label"))?;
    let def = checked(def)?;
    if LabelRepository::key_taken(&state.db, &def.key, Some(id)).await? {
        return Err(AppError::conflict(format!("label key already in use: {}", def.key)));
    }
    Ok(Json(LabelRepository::update(&state.db, model, def).await?))
}

/// 仍被单元格引用的标签不能删除
pub async fn delete(State(state): State<SharedState>, Path(id): Path<i32>) -> AppResult<StatusCode> {
    if LabelRepository::find(&state.db, id).await?.is_none() {
        return Err(AppError::not_found("label"));
    }
    let used = LabelRepository::usage_count(&state.db, id).await?;
    if used > 0 {
        return Err(AppError::conflict(format!(
            "label is used by {} size chart cell(s)",
            used
        )));
    }
    LabelRepository::delete(&state.db, id).await?;
    info!("已删除尺码标签 [{}]", id);
    Ok(StatusCode::NO_CONTENT)
}
