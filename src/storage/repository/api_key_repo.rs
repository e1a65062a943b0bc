use crate::storage::entity::api_key::{
    self, ActiveModel as ApiKeyActiveModel, Entity as ApiKey, Model as ApiKeyModel,
};
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use serde::Serialize;

/// 对外展示，不包含哈希
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyDto {
    pub id: i32,
    pub name: String,
    pub key_prefix: String,
    pub scopes: Vec<String>,
    pub is_active: bool,
    pub last_used_at: Option<i64>,
    pub created_at: i64,
}

impl From<ApiKeyModel> for ApiKeyDto {
    fn from(model: ApiKeyModel) -> Self {
        Self {
            scopes: parse_scopes(&model.scopes),
            id: model.id,
            name: model.name,
            key_prefix: model.key_prefix,
            is_active: model.is_active,
            last_used_at: model.last_used_at,
            created_at: model.created_at,
        }
    }
}

pub fn parse_scopes(raw: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_default()
}

pub struct ApiKeyRepository;

impl ApiKeyRepository {
    pub async fn list<C: ConnectionTrait>(db: &C) -> Result<Vec<ApiKeyDto>, DbErr> {
        let rows = ApiKey::find()
            .order_by_desc(api_key::Column::CreatedAt)
            .order_by_desc(api_key::Column::Id)
            .all(db)
            .await?;
        Ok(rows.into_iter().map(ApiKeyDto::from).collect())
    }

    pub async fn insert<C: ConnectionTrait>(
        db: &C,
        name: String,
        key_prefix: String,
        key_hash: String,
        scopes: &[String],
    ) -> Result<ApiKeyModel, DbErr> {
        ApiKeyActiveModel {
            name: Set(name),
            key_prefix: Set(key_prefix),
            key_hash: Set(key_hash),
            scopes: Set(serde_json::to_string(scopes).unwrap_or_else(|_| "[]".to_string())),
            is_active: Set(true),
            last_used_at: Set(None),
            created_at: Set(Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    pub async fn find_by_prefix<C: ConnectionTrait>(
        db: &C,
        prefix: &str,
    ) -> Result<Option<ApiKeyModel>, DbErr> {
        ApiKey::find()
            .filter(api_key::Column::KeyPrefix.eq(prefix))
            .one(db)
            .await
    }

    pub async fn touch_last_used<C: ConnectionTrait>(db: &C, id: i32) -> Result<(), DbErr> {
        ApiKey::update_many()
            .col_expr(api_key::Column::LastUsedAt, Expr::value(Utc::now().timestamp()))
            .filter(api_key::Column::Id.eq(id))
            .exec(db)
            .await?;
        Ok(())
    }

    pub async fn revoke<C: ConnectionTrait>(db: &C, id: i32) -> Result<u64, DbErr> {
        let res = ApiKey::update_many()
            .col_expr(api_key::Column::IsActive, Expr::value(false))
            .filter(api_key::Column::Id.eq(id))
            .exec(db)
            .await?;
        Ok(res.rows_affected)
    }
}
