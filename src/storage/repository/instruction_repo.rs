use crate::storage::entity::measurement_instruction::{
    self, ActiveModel as InstructionActiveModel, Entity as MeasurementInstruction,
    Model as InstructionModel,
};
use crate::storage::entity::size_chart_measurement_instruction::{
    self, Entity as SizeChartMeasurementInstruction,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructionDefinition {
    pub key: String,
    pub name: String,
    pub instruction: String,
    #[serde(default)]
    pub sort_order: i32,
}

pub struct InstructionRepository;

impl InstructionRepository {
    pub async fn list<C: ConnectionTrait>(db: &C) -> Result<Vec<InstructionModel>, DbErr> {
        MeasurementInstruction::find()
            .order_by_asc(measurement_instruction::Column::SortOrder)
            .order_by_asc(measurement_instruction::Column::Key)
            .all(db)
            .await
    }

    pub async fn find<C: ConnectionTrait>(
        db: &C,
        id: i32,
    ) -> Result<Option<InstructionModel>, DbErr> {
        MeasurementInstruction::find_by_id(id).one(db).await
    }

    pub async fn find_by_ids<C: ConnectionTrait>(
        db: &C,
        ids: Vec<i32>,
    ) -> Result<HashMap<i32, InstructionModel>, DbErr> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = MeasurementInstruction::find()
            .filter(measurement_instruction::Column::Id.is_in(ids))
            .all(db)
            .await?;
        Ok(rows.into_iter().map(|m| (m.id, m)).collect())
    }

    pub async fn find_by_keys<C: ConnectionTrait>(
        db: &C,
        keys: Vec<String>,
    ) -> Result<HashMap<String, InstructionModel>, DbErr> {
        if keys.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = MeasurementInstruction::find()
            .filter(measurement_instruction::Column::Key.is_in(keys))
            .all(db)
            .await?;
        Ok(rows.into_iter().map(|m| (m.key.clone(), m)).collect())
    }

    pub async fn key_taken<C: ConnectionTrait>(
        db: &C,
        key: &str,
        exclude_id: Option<i32>,
    ) -> Result<bool, DbErr> {
        let mut query = MeasurementInstruction::find()
            .filter(measurement_instruction::Column::Key.eq(key));
        if let Some(id) = exclude_id {
            query = query.filter(measurement_instruction::Column::Id.ne(id));
        }
        Ok(query.count(db).await? > 0)
    }

    pub async fn insert<C: ConnectionTrait>(
        db: &C,
        def: InstructionDefinition,
    ) -> Result<InstructionModel, DbErr> {
        InstructionActiveModel {
            key: Set(def.key),
            name: Set(def.name),
            instruction: Set(def.instruction),
            sort_order: Set(def.sort_order),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    pub async fn update<C: ConnectionTrait>(
        db: &C,
        model: InstructionModel,
        def: InstructionDefinition,
    ) -> Result<InstructionModel, DbErr> {
        let mut am: InstructionActiveModel = model.into();
        am.key = Set(def.key);
        am.name = Set(def.name);
        am.instruction = Set(def.instruction);
        am.sort_order = Set(def.sort_order);
        am.update(db).await
    }

    pub async fn ensure<C: ConnectionTrait>(
        db: &C,
        def: InstructionDefinition,
    ) -> Result<InstructionModel, DbErr> {
        let existing = MeasurementInstruction::find()
            .filter(measurement_instruction::Column::Key.eq(def.key.as_str()))
            .one(db)
            .await?;
        match existing {
            Some(m) => Ok(m),
            None => Self::insert(db, def).await,
        }
    }

    pub async fn delete<C: ConnectionTrait>(db: &C, id: i32) -> Result<u64, DbErr> {
        SizeChartMeasurementInstruction::delete_many()
            .filter(size_chart_measurement_instruction::Column::InstructionId.eq(id))
            .exec(db)
            .await?;
        let res = MeasurementInstruction::delete_by_id(id).exec(db).await?;
        Ok(res.rows_affected)
    }

    pub async fn delete_all<C: ConnectionTrait>(db: &C) -> Result<u64, DbErr> {
        SizeChartMeasurementInstruction::delete_many().exec(db).await?;
        let res = MeasurementInstruction::delete_many().exec(db).await?;
        Ok(res.rows_affected)
    }
}
