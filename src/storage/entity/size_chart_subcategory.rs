use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "size_chart_subcategories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub size_chart_id: i32,
    pub subcategory_id: i32,
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
        belongs_to = "super::subcategory::Entity",
        from = "Column::SubcategoryId",
        to = "super::subcategory::Column::Id",
        on_delete = "Cascade"
    )]
    Subcategory,
}

impl Related<super::size_chart::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SizeChart.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
