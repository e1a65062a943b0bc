use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "size_chart_columns")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub size_chart_id: i32,
    pub name: String,
    pub column_type: String, // SIZE_LABEL / MEASUREMENT / TEXT / SHOE_SIZE / BAND_SIZE / CUP_SIZE / REGIONAL_SIZE
    pub display_order: i32,
    #[sea_orm(nullable)]
    pub label_type: Option<String>, // 可选：限制该列可引用的 label 类型
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
}

impl Related<super::size_chart::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SizeChart.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
