use crate::domain::cell::{CellColumns, CellValue};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "size_chart_cells")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub row_id: i32,
    pub column_id: i32,

    // 文本
    #[sea_orm(nullable)]
    pub value_text: Option<String>,
    // 单值（英寸为准，厘米为推导值）
    #[sea_orm(nullable)]
    pub value_inches: Option<f64>,
    #[sea_orm(nullable)]
    pub value_cm: Option<f64>,
    // 区间
    #[sea_orm(nullable)]
    pub value_min_inches: Option<f64>,
    #[sea_orm(nullable)]
    pub value_max_inches: Option<f64>,
    #[sea_orm(nullable)]
    pub value_min_cm: Option<f64>,
    #[sea_orm(nullable)]
    pub value_max_cm: Option<f64>,
    // 引用 SizeLabel
    #[sea_orm(nullable)]
    pub label_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::size_chart_row::Entity",
        from = "Column::RowId",
        to = "super::size_chart_row::Column::Id",
        on_delete = "Cascade"
    )]
    SizeChartRow,
    #[sea_orm(
        belongs_to = "super::size_chart_column::Entity",
        from = "Column::ColumnId",
        to = "super::size_chart_column::Column::Id",
        on_delete = "Cascade"
    )]
    SizeChartColumn,
    #[sea_orm(
        belongs_to = "super::size_label::Entity",
        from = "Column::LabelId",
        to = "super::size_label::Column::Id"
    )]
    SizeLabel,
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn value(&self) -> CellValue {
        CellValue::from_columns(&CellColumns {
            value_text: self.value_text.clone(),
            value_inches: self.value_inches,
            value_cm: self.value_cm,
            value_min_inches: self.value_min_inches,
            value_max_inches: self.value_max_inches,
            value_min_cm: self.value_min_cm,
            value_max_cm: self.value_max_cm,
            label_id: self.label_id,
        })
    }
}

impl ActiveModel {
    /// 覆盖全部值字段，保证只存在一种表示
    pub fn set_value(&mut self, value: &CellValue) {
        let cols = value.to_columns();
        self.value_text = sea_orm::Set(cols.value_text);
        self.value_inches = sea_orm::Set(cols.value_inches);
        self.value_cm = sea_orm::Set(cols.value_cm);
        self.value_min_inches = sea_orm::Set(cols.value_min_inches);
        self.value_max_inches = sea_orm::Set(cols.value_max_inches);
        self.value_min_cm = sea_orm::Set(cols.value_min_cm);
        self.value_max_cm = sea_orm::Set(cols.value_max_cm);
        self.label_id = sea_orm::Set(cols.label_id);
    }
}
