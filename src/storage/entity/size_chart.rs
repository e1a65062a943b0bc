use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "size_charts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(unique)]
    pub slug: String,
    #[sea_orm(nullable)]
    pub description: Option<String>,
    pub is_published: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::size_chart_column::Entity")]
    SizeChartColumn,
    #[sea_orm(has_many = "super::size_chart_row::Entity")]
    SizeChartRow,
    #[sea_orm(has_many = "super::size_chart_subcategory::Entity")]
    SizeChartSubcategory,
}

impl ActiveModelBehavior for ActiveModel {}
