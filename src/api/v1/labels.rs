use super::Data;
use crate::api::admin::labels::LabelQuery;
use crate::api::middleware::ApiClient;
use crate::errors::AppResult;
use crate::services::Scope;
use crate::state::SharedState;
use crate::storage::entity::size_label::Model as SizeLabelModel;
use crate::storage::repository::LabelRepository;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::{Extension, Json};

pub async fn list(
    State(state): State<SharedState>,
    Extension(client): Extension<ApiClient>,
    query: Result<Query<LabelQuery>, QueryRejection>,
) -> AppResult<Json<Data<Vec<SizeLabelModel>>>> {
    client.authorize(Scope::LabelsRead)?;
    let Query(query) = query?;
    let labels = LabelRepository::list(&state.db, query.label_type.as_deref()).await?;
    Ok(Json(Data::new(labels)))
}
