use super::Data;
use crate::api::middleware::ApiClient;
use crate::errors::AppResult;
use crate::services::Scope;
use crate::state::SharedState;
use crate::storage::repository::{CategoryDto, CategoryRepository};
use axum::extract::State;
use axum::{Extension, Json};

/// chartCount 只统计已发布的尺码表
pub async fn list(
    State(state): State<SharedState>,
    Extension(client): Extension<ApiClient>,
) -> AppResult<Json<Data<Vec<CategoryDto>>>> {
    client.authorize(Scope::CategoriesRead)?;
    let tree = CategoryRepository::list_tree(&state.db, true).await?;
    Ok(Json(Data::new(tree)))
}
