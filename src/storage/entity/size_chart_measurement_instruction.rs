use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "size_chart_measurement_instructions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub size_chart_id: i32,
    pub instruction_id: i32,
    pub display_order: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::size_chart::Entity",
        from = "Column::SizeChartId",
        to = "super::size_chart::Column::Id",
        on_delete = "Cascade"
    )]
    SizeChart,
    #[sea_orm(
        belongs_to = "super::measurement_instruction::Entity",
        from = "Column::InstructionId",
        to = "super::measurement_instruction::Column::Id",
        on_delete = "Cascade"
    )]
    MeasurementInstruction,
}

impl ActiveModelBehavior for ActiveModel {}
