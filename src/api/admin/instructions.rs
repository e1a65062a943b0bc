use crate::domain::is_valid_label_key;
use crate::errors::{AppError, AppResult};
use crate::state::SharedState;
use crate::storage::entity::measurement_instruction::Model as InstructionModel;
use crate::storage::repository::{InstructionDefinition, InstructionRepository};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use log::info;
use sea_orm::TransactionTrait;

fn checked(mut def: InstructionDefinition) -> AppResult<InstructionDefinition> {
    def.key = def.key.trim().to_string();
    def.name = def.name.trim().to_string();
    if !is_valid_label_key(&def.key) {
        return Err(AppError::validation(format!("invalid instruction key: {:?}", def.key)));
    }
    if def.name.is_empty() {
        return Err(AppError::validation("name is required"));
    }
    Ok(def)
}

pub async fn list(State(state): State<SharedState>) -> AppResult<Json<Vec<InstructionModel>>> {
    Ok(Json(InstructionRepository::list(&state.db).await?))
}

pub async fn create(
    State(state): State<SharedState>,
    payload: Result<Json<InstructionDefinition>, JsonRejection>,
) -> AppResult<(StatusCode, Json<InstructionModel>)> {
    let Json(def) = payload?;
    let def = checked(def)?;
    if InstructionRepository::key_taken(&state.db, &def.key, None).await? {
        return Err(AppError::conflict(format!("instruction key already in use: {}", def.key)));
    }
    let model = InstructionRepository::insert(&state.db, def).await?;
    info!("✓ 新建测量说明 [{}]: {}", model.id, model.key);
    Ok((StatusCode::CREATED, Json(model)))
}

pub async fn update(
    State(state): State<SharedState>,
    Path(id): Path<i32>,
    payload: Result<Json<InstructionDefinition>, JsonRejection>,
) -> AppResult<Json<InstructionModel>> {
    let Json(def) = payload?;
    let model = InstructionRepository::find(&state.db, id)
        .await?
        .ok_or_else(|| AppError::not_found("measurement instruction"))?;
    let def = checked(def)?;
    if InstructionRepository::key_taken(&state.db, &def.key, Some(id)).await? {
        return Err(AppError::conflict(format!("instruction key already in use: {}", def.key)));
    }
    Ok(Json(InstructionRepository::update(&state.db, model, def).await?))
}

pub async fn delete(State(state): State<SharedState>, Path(id): Path<i32>) -> AppResult<StatusCode> {
    let txn = state.db.begin().await?;
    let deleted = InstructionRepository::delete(&txn, id).await?;
    if deleted == 0 {
        return Err(AppError::not_found("measurement instruction"));
    }
    txn.commit().await?;
    info!("已删除测量说明 [{}]", id);
    Ok(StatusCode::NO_CONTENT)
}
