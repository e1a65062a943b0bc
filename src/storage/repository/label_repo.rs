use crate::storage::entity::size_chart_cell::{self, Entity as SizeChartCell};
use crate::storage::entity::size_label::{
    self, ActiveModel as SizeLabelActiveModel, Entity as SizeLabel, Model as SizeLabelModel,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelDefinition {
    pub key: String,
    pub display_value: String,
    pub label_type: String,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default)]
    pub description: Option<String>,
}

pub struct LabelRepository;

impl LabelRepository {
    pub async fn list<C: ConnectionTrait>(
        db: &C,
        label_type: Option<&str>,
    ) -> Result<Vec<SizeLabelModel>, DbErr> {
        let mut query = SizeLabel::find();
        if let Some(t) = label_type {
            query = query.filter(size_label::Column::LabelType.eq(t));
        }
        query
            .order_by_asc(size_label::Column::LabelType)
            .order_by_asc(size_label::Column::SortOrder)
            .order_by_asc(size_label::Column::Key)
            .all(db)
            .await
    }

    pub async fn find<C: ConnectionTrait>(db: &C, id: i32) -> Result<Option<SizeLabelModel>, DbErr> {
        SizeLabel::find_by_id(id).one(db).await
    }

    pub async fn find_by_key<C: ConnectionTrait>(
        db: &C,
        key: &str,
    ) -> Result<Option<SizeLabelModel>, DbErr> {
        SizeLabel::find()
            .filter(size_label::Column::Key.eq(key))
            .one(db)
            .await
    }

    pub async fn find_by_ids<C: ConnectionTrait>(
        db: &C,
        ids: Vec<i32>,
    ) -> Result<HashMap<i32, SizeLabelModel>, DbErr> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = SizeLabel::find()
            .filter(size_label::Column::Id.is_in(ids))
            .all(db)
            .await?;
        Ok(rows.into_iter().map(|m| (m.id, m)).collect())
    }

    pub async fn find_by_keys<C: ConnectionTrait>(
        db: &C,
        keys: Vec<String>,
    ) -> Result<HashMap<String, SizeLabelModel>, DbErr> {
        if keys.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = SizeLabel::find()
            .filter(size_label::Column::Key.is_in(keys))
            .all(db)
            .await?;
        Ok(rows.into_iter().map(|m| (m.key.clone(), m)).collect())
    }

    pub async fn insert<C: ConnectionTrait>(
        db: &C,
        def: LabelDefinition,
    ) -> Result<SizeLabelModel, DbErr> {
        let now = Utc::now().timestamp();
        SizeLabelActiveModel {
            key: Set(def.key),
            display_value: Set(def.display_value),
            label_type: Set(def.label_type),
            sort_order: Set(def.sort_order),
            description: Set(def.description),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    pub async fn update<C: ConnectionTrait>(
        db: &C,
        model: SizeLabelModel,
        def: LabelDefinition,
    ) -> Result<SizeLabelModel, DbErr> {
        let mut am: SizeLabelActiveModel = model.into();
        am.key = Set(def.key);
        am.display_value = Set(def.display_value);
        am.label_type = Set(def.label_type);
        am.sort_order = Set(def.sort_order);
        am.description = Set(def.description);
        am.updated_at = Set(Utc::now().timestamp());
        am.update(db).await
    }

    /// 按 key 存在则返回已有记录（不覆盖），否则插入
    pub async fn ensure<C: ConnectionTrait>(
        db: &C,
        def: LabelDefinition,
    ) -> Result<SizeLabelModel, DbErr> {
        if let Some(existing) = Self::find_by_key(db, &def.key).await? {
            return Ok(existing);
        }
        Self::insert(db, def).await
    }

    pub async fn key_taken<C: ConnectionTrait>(
        db: &C,
        key: &str,
        exclude_id: Option<i32>,
    ) -> Result<bool, DbErr> {
        let mut query = SizeLabel::find().filter(size_label::Column::Key.eq(key));
        if let Some(id) = exclude_id {
            query = query.filter(size_label::Column::Id.ne(id));
        }
        Ok(query.count(db).await? > 0)
    }

    pub async fn usage_count<C: ConnectionTrait>(db: &C, id: i32) -> Result<u64, DbErr> {
        SizeChartCell::find()
            .filter(size_chart_cell::Column::LabelId.eq(id))
            .count(db)
            .await
    }

    pub async fn delete<C: ConnectionTrait>(db: &C, id: i32) -> Result<u64, DbErr> {
        let res = SizeLabel::delete_by_id(id).exec(db).await?;
        Ok(res.rows_affected)
    }

    pub async fn delete_all<C: ConnectionTrait>(db: &C) -> Result<u64, DbErr> {
        let res = SizeLabel::delete_many().exec(db).await?;
        Ok(res.rows_affected)
    }
}
