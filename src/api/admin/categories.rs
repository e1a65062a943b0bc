use crate::domain::{is_valid_slug, slugify};
use crate::errors::{AppError, AppResult};
use crate::state::SharedState;
use crate::storage::repository::{CategoryDto, CategoryRepository, SubcategoryDto};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use log::info;
use sea_orm::TransactionTrait;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInput {
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub display_order: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteParams {
    /// 删除前把关联的尺码表迁移到这个子分类
    #[serde(default)]
    pub reassign_to: Option<i32>,
}

/// 名称必填；slug 缺省时由名称生成
fn name_and_slug(input: &CategoryInput) -> AppResult<(String, String)> {
    let name = input.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::validation("name is required"));
    }
    let slug = match input.slug.as_deref().map(str::trim) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => slugify(&name),
    };
    if !is_valid_slug(&slug) {
        return Err(AppError::validation(format!("invalid slug: {:?}", slug)));
    }
    Ok((name, slug))
}

pub async fn list(State(state): State<SharedState>) -> AppResult<Json<Vec<CategoryDto>>> {
    Ok(Json(CategoryRepository::list_tree(&state.db, false).await?))
}

pub async fn get_one(
    State(state): State<SharedState>,
    Path(id): Path<i32>,
) -> AppResult<Json<CategoryDto>> {
    let model = CategoryRepository::find(&state.db, id)
        .await?
        .ok_or_else(|| AppError::not_found("category"))?;
    Ok(Json(CategoryRepository::load_tree(&state.db, model).await?))
}

pub async fn create(
    State(state): State<SharedState>,
    payload: Result<Json<CategoryInput>, JsonRejection>,
) -> AppResult<(StatusCode, Json<CategoryDto>)> {
    let Json(input) = payload?;
    let (name, slug) = name_and_slug(&input)?;
    if CategoryRepository::slug_taken(&state.db, &slug, None).await? {
        return Err(AppError::conflict(format!("category slug already in use: {}", slug)));
    }
    let order = match input.display_order {
        Some(o) => o,
        None => CategoryRepository::next_display_order(&state.db).await?,
    };
    let model = CategoryRepository::insert(&state.db, name, slug, order).await?;
    info!("✓ 新建分类 [{}]: {}", model.id, model.slug);
    let dto = CategoryRepository::load_tree(&state.db, model).await?;
    Ok((StatusCode::CREATED, Json(dto)))
}

pub async fn update(
    State(state): State<SharedState>,
    Path(id): Path<i32>,
    payload: Result<Json<CategoryInput>, JsonRejection>,
) -> AppResult<Json<CategoryDto>> {
    let Json(input) = payload?;
    let model = CategoryRepository::find(&state.db, id)
        .await?
        .ok_or_else(|| AppError::not_found("category"))?;
    let (name, slug) = name_and_slug(&input)?;
    if CategoryRepository::slug_taken(&state.db, &slug, Some(id)).await? {
        return Err(AppError::conflict(format!("category slug already in use: {}", slug)));
    }
    let order = input.display_order.unwrap_or(model.display_order);
    let model = CategoryRepository::update(&state.db, model, name, slug, order).await?;
    Ok(Json(CategoryRepository::load_tree(&state.db, model).await?))
}

/// 仍有尺码表挂在其子分类下时返回 409，除非指定 reassignTo（必须是其他分类下的子分类）
pub async fn delete(
    State(state): State<SharedState>,
    Path(id): Path<i32>,
    params: Result<Query<DeleteParams>, QueryRejection>,
) -> AppResult<StatusCode> {
    let Query(params) = params?;
    let txn = state.db.begin().await?;
    if CategoryRepository::find(&txn, id).await?.is_none() {
        return Err(AppError::not_found("category"));
    }
    let sub_ids: Vec<i32> = CategoryRepository::subcategories_of(&txn, id)
        .await?
        .into_iter()
        .map(|s| s.id)
        .collect();
    let attached = CategoryRepository::count_attached_charts(&txn, sub_ids.clone()).await?;
    if attached > 0 {
        let Some(target) = params.reassign_to else {
            return Err(AppError::conflict(format!(
                "category has {} attached size chart(s); pass reassignTo to move them",
                attached
            )));
        };
        let target = CategoryRepository::find_subcategory(&txn, target)
            .await?
            .ok_or_else(|| AppError::validation("reassignTo subcategory does not exist"))?;
        if target.category_id == id {
            return Err(AppError::validation(
                "reassignTo must belong to a different category",
            ));
        }
        let moved = CategoryRepository::reassign_charts(&txn, sub_ids, target.id).await?;
        info!("分类 [{}] 的 {} 张尺码表迁移到子分类 [{}]", id, moved, target.id);
    }
    CategoryRepository::delete(&txn, id).await?;
    txn.commit().await?;
    info!("已删除分类 [{}]", id);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn create_subcategory(
    State(state): State<SharedState>,
    Path(category_id): Path<i32>,
    payload: Result<Json<CategoryInput>, JsonRejection>,
) -> AppResult<(StatusCode, Json<SubcategoryDto>)> {
    let Json(input) = payload?;
    if CategoryRepository::find(&state.db, category_id).await?.is_none() {
        return Err(AppError::not_found("category"));
    }
    let (name, slug) = name_and_slug(&input)?;
    if CategoryRepository::subcategory_slug_taken(&state.db, category_id, &slug, None).await? {
        return Err(AppError::conflict(format!("subcategory slug already in use: {}", slug)));
    }
    let order = match input.display_order {
        Some(o) => o,
        None => CategoryRepository::subcategories_of(&state.db, category_id)
            .await?
            .iter()
            .map(|s| s.display_order + 1)
            .max()
            .unwrap_or(0),
    };
    let model =
        CategoryRepository::insert_subcategory(&state.db, category_id, name, slug, order).await?;
    info!("✓ 新建子分类 [{}]: {}", model.id, model.slug);
    Ok((
        StatusCode::CREATED,
        Json(SubcategoryDto {
            id: model.id,
            category_id: model.category_id,
            name: model.name,
            slug: model.slug,
            display_order: model.display_order,
            chart_count: 0,
        }),
    ))
}

pub async fn update_subcategory(
    State(state): State<SharedState>,
    Path(id): Path<i32>,
    payload: Result<Json<CategoryInput>, JsonRejection>,
) -> AppResult<Json<SubcategoryDto>> {
    let Json(input) = payload?;
    let model = CategoryRepository::find_subcategory(&state.db, id)
        .await?
        .ok_or_else(|| AppError::not_found("subcategory"))?;
    let (name, slug) = name_and_slug(&input)?;
    if CategoryRepository::subcategory_slug_taken(&state.db, model.category_id, &slug, Some(id))
        .await?
    {
        return Err(AppError::conflict(format!("subcategory slug already in use: {}", slug)));
    }
    let order = input.display_order.unwrap_or(model.display_order);
    let model = CategoryRepository::update_subcategory(&state.db, model, name, slug, order).await?;
    let chart_count = CategoryRepository::count_attached_charts(&state.db, vec![model.id]).await?;
    Ok(Json(SubcategoryDto {
        id: model.id,
        category_id: model.category_id,
        name: model.name,
        slug: model.slug,
        display_order: model.display_order,
        chart_count,
    }))
}

pub async fn delete_subcategory(
    State(state): State<SharedState>,
    Path(id): Path<i32>,
    params: Result<Query<DeleteParams>, QueryRejection>,
) -> AppResult<StatusCode> {
    let Query(params) = params?;
    let txn = state.db.begin().await?;
    if CategoryRepository::find_subcategory(&txn, id).await?.is_none() {
        return Err(AppError::not_found("subcategory"));
    }
    let attached = CategoryRepository::count_attached_charts(&txn, vec![id]).await?;
    if attached > 0 {
        let Some(target) = params.reassign_to else {
            return Err(AppError::conflict(format!(
                "subcategory has {} attached size chart(s); pass reassignTo to move them",
                attached
            )));
        };
        if target == id {
            return Err(AppError::validation("reassignTo must be a different subcategory"));
        }
        if CategoryRepository::find_subcategory(&txn, target).await?.is_none() {
            return Err(AppError::validation("reassignTo subcategory does not exist"));
        }
        let moved = CategoryRepository::reassign_charts(&txn, vec![id], target).await?;
        info!("子分类 [{}] 的 {} 张尺码表迁移到 [{}]", id, moved, target);
    }
    CategoryRepository::delete_subcategory(&txn, id).await?;
    txn.commit().await?;
    info!("已删除子分类 [{}]", id);
    Ok(StatusCode::NO_CONTENT)
}
