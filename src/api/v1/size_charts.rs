use super::Data;
use crate::api::middleware::ApiClient;
use crate::errors::{AppError, AppResult};
use crate::services::Scope;
use crate::state::SharedState;
use crate::storage::repository::{ChartFilter, SizeChartDto, SizeChartRepository};
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicChartQuery {
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub subcategory: Option<String>,
    #[serde(default)]
    pub include_unpublished: bool,
}

/// 未发布的尺码表只对持有效 key 且显式要求的调用方可见
fn published_only(client: &ApiClient, include_unpublished: bool) -> bool {
    !(include_unpublished && client.is_authenticated())
}

pub async fn list(
    State(state): State<SharedState>,
    Extension(client): Extension<ApiClient>,
    query: Result<Query<PublicChartQuery>, QueryRejection>,
) -> AppResult<Json<Data<Vec<SizeChartDto>>>> {
    client.authorize(Scope::ChartsRead)?;
    let Query(query) = query?;
    let slug = query.slug.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
    let filter = ChartFilter {
        slug: slug.clone(),
        category: query.category,
        subcategory: query.subcategory,
        published_only: published_only(&client, query.include_unpublished),
        ..Default::default()
    };
    let charts = SizeChartRepository::list(&state.db, &filter).await?;
    if charts.is_empty() {
        if let Some(slug) = slug {
            return Err(AppError::NotFound(format!("size chart not found: {}", slug)));
        }
    }
    let graphs = SizeChartRepository::load_graphs(&state.db, charts).await?;
    Ok(Json(Data::new(graphs)))
}

pub async fn get_by_slug(
    State(state): State<SharedState>,
    Extension(client): Extension<ApiClient>,
    Path(slug): Path<String>,
    query: Result<Query<PublicChartQuery>, QueryRejection>,
) -> AppResult<Json<Data<SizeChartDto>>> {
    client.authorize(Scope::ChartsRead)?;
    let Query(query) = query?;
    let chart = SizeChartRepository::find_by_slug(&state.db, &slug)
        .await?
        .filter(|c| c.is_published || !published_only(&client, query.include_unpublished))
        .ok_or_else(|| AppError::NotFound(format!("size chart not found: {}", slug)))?;
    let graph = SizeChartRepository::load_graph(&state.db, chart).await?;
    Ok(Json(Data::new(graph)))
}
