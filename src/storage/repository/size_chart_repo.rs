use crate::domain::{CellValue, CellView, ColumnType};
use crate::storage::entity::category::{self, Entity as Category};
use crate::storage::entity::measurement_instruction::Model as InstructionModel;
use crate::storage::entity::size_chart::{
    self, ActiveModel as SizeChartActiveModel, Entity as SizeChart, Model as SizeChartModel,
};
use crate::storage::entity::size_chart_cell::{
    self, ActiveModel as CellActiveModel, Entity as SizeChartCell, Model as CellModel,
};
use crate::storage::entity::size_chart_column::{
    self, ActiveModel as ColumnActiveModel, Entity as SizeChartColumn, Model as ColumnModel,
};
use crate::storage::entity::size_chart_measurement_instruction::{
    self, ActiveModel as InstructionLinkActiveModel, Entity as SizeChartMeasurementInstruction,
};
use crate::storage::entity::size_chart_row::{
    self, ActiveModel as RowActiveModel, Entity as SizeChartRow,
};
use crate::storage::entity::size_chart_subcategory::{
    self, ActiveModel as ChartLinkActiveModel, Entity as SizeChartSubcategory,
};
use crate::storage::entity::subcategory::{self, Entity as Subcategory};
use crate::storage::repository::{InstructionRepository, LabelRepository};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// 一张尺码表的完整写入定义。列/行带 id 表示保留已有记录。
#[derive(Debug, Clone)]
pub struct ChartDefinition {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub is_published: bool,
    pub subcategory_ids: Vec<i32>,
    pub instruction_ids: Vec<i32>,
    pub columns: Vec<ColumnDefinition>,
    pub rows: Vec<RowDefinition>,
}

#[derive(Debug, Clone)]
pub struct ColumnDefinition {
    pub id: Option<i32>,
    pub name: String,
    pub column_type: ColumnType,
    pub label_type: Option<String>,
}

/// cells 与 columns 按位置一一对应
#[derive(Debug, Clone)]
pub struct RowDefinition {
    pub id: Option<i32>,
    pub cells: Vec<CellValue>,
}

#[derive(Debug, Clone, Default)]
pub struct ChartFilter {
    pub ids: Option<Vec<i32>>,
    pub slug: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub published_only: bool,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRefDto {
    pub id: i32,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubcategoryRefDto {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub category: CategoryRefDto,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDto {
    pub id: i32,
    pub name: String,
    pub column_type: String,
    pub label_type: Option<String>,
    pub display_order: i32,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CellDto {
    pub column_id: i32,
    pub value: CellView,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RowDto {
    pub id: i32,
    pub display_order: i32,
    pub cells: Vec<CellDto>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SizeChartDto {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub is_published: bool,
    pub created_at: i64,
    pub updated_at: i64,
    pub subcategories: Vec<SubcategoryRefDto>,
    pub measurement_instructions: Vec<InstructionModel>,
    pub columns: Vec<ColumnDto>,
    pub rows: Vec<RowDto>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SizeChartSummaryDto {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub is_published: bool,
    pub updated_at: i64,
    pub column_count: u64,
    pub row_count: u64,
    pub subcategories: Vec<SubcategoryRefDto>,
}

pub struct SizeChartRepository;

impl SizeChartRepository {
    pub async fn find<C: ConnectionTrait>(db: &C, id: i32) -> Result<Option<SizeChartModel>, DbErr> {
        SizeChart::find_by_id(id).one(db).await
    }

    pub async fn find_by_slug<C: ConnectionTrait>(
        db: &C,
        slug: &str,
    ) -> Result<Option<SizeChartModel>, DbErr> {
        SizeChart::find()
            .filter(size_chart::Column::Slug.eq(slug))
            .one(db)
            .await
    }

    /// 纯数字按 id 查找，否则按 slug
    pub async fn find_by_id_or_slug<C: ConnectionTrait>(
        db: &C,
        id_or_slug: &str,
    ) -> Result<Option<SizeChartModel>, DbErr> {
        match id_or_slug.parse::<i32>() {
            Ok(id) => Self::find(db, id).await,
            Err(_) => Self::find_by_slug(db, id_or_slug).await,
        }
    }

    pub async fn slug_taken<C: ConnectionTrait>(
        db: &C,
        slug: &str,
        exclude_id: Option<i32>,
    ) -> Result<bool, DbErr> {
        let mut query = SizeChart::find().filter(size_chart::Column::Slug.eq(slug));
        if let Some(id) = exclude_id {
            query = query.filter(size_chart::Column::Id.ne(id));
        }
        Ok(query.count(db).await? > 0)
    }

    /// base, base-2, base-3 ... 第一个未被占用的 slug
    pub async fn unique_slug<C: ConnectionTrait>(db: &C, base: &str) -> Result<String, DbErr> {
        if !Self::slug_taken(db, base, None).await? {
            return Ok(base.to_string());
        }
        let mut n = 2;
        loop {
            let candidate = format!("{}-{}", base, n);
            if !Self::slug_taken(db, &candidate, None).await? {
                return Ok(candidate);
            }
            n += 1;
        }
    }

    pub async fn list<C: ConnectionTrait>(
        db: &C,
        filter: &ChartFilter,
    ) -> Result<Vec<SizeChartModel>, DbErr> {
        let mut query = SizeChart::find();
        if let Some(ids) = &filter.ids {
            query = query.filter(size_chart::Column::Id.is_in(ids.clone()));
        }
        if let Some(slug) = &filter.slug {
            query = query.filter(size_chart::Column::Slug.eq(slug.as_str()));
        }
        if filter.published_only {
            query = query.filter(size_chart::Column::IsPublished.eq(true));
        }
        if filter.category.is_some() || filter.subcategory.is_some() {
            let sub_ids = Self::matching_subcategory_ids(
                db,
                filter.category.as_deref(),
                filter.subcategory.as_deref(),
            )
            .await?;
            if sub_ids.is_empty() {
                return Ok(Vec::new());
            }
            let chart_ids: HashSet<i32> = SizeChartSubcategory::find()
                .filter(size_chart_subcategory::Column::SubcategoryId.is_in(sub_ids))
                .all(db)
                .await?
                .into_iter()
                .map(|l| l.size_chart_id)
                .collect();
            if chart_ids.is_empty() {
                return Ok(Vec::new());
            }
            query = query.filter(size_chart::Column::Id.is_in(chart_ids));
        }
        query
            .order_by_asc(size_chart::Column::Name)
            .order_by_asc(size_chart::Column::Id)
            .all(db)
            .await
    }

    async fn matching_subcategory_ids<C: ConnectionTrait>(
        db: &C,
        category_slug: Option<&str>,
        subcategory_slug: Option<&str>,
    ) -> Result<Vec<i32>, DbErr> {
        let mut query = Subcategory::find();
        if let Some(slug) = category_slug {
            let Some(cat) = Category::find()
                .filter(category::Column::Slug.eq(slug))
                .one(db)
                .await?
            else {
                return Ok(Vec::new());
            };
            query = query.filter(subcategory::Column::CategoryId.eq(cat.id));
        }
        if let Some(slug) = subcategory_slug {
            query = query.filter(subcategory::Column::Slug.eq(slug));
        }
        Ok(query.all(db).await?.into_iter().map(|s| s.id).collect())
    }

    pub async fn column_ids<C: ConnectionTrait>(db: &C, chart_id: i32) -> Result<HashSet<i32>, DbErr> {
        Ok(Self::columns_of(db, chart_id)
            .await?
            .into_iter()
            .map(|c| c.id)
            .collect())
    }

    pub async fn row_ids<C: ConnectionTrait>(db: &C, chart_id: i32) -> Result<HashSet<i32>, DbErr> {
        Ok(SizeChartRow::find()
            .filter(size_chart_row::Column::SizeChartId.eq(chart_id))
            .all(db)
            .await?
            .into_iter()
            .map(|r| r.id)
            .collect())
    }

    async fn columns_of<C: ConnectionTrait>(db: &C, chart_id: i32) -> Result<Vec<ColumnModel>, DbErr> {
        SizeChartColumn::find()
            .filter(size_chart_column::Column::SizeChartId.eq(chart_id))
            .order_by_asc(size_chart_column::Column::DisplayOrder)
            .order_by_asc(size_chart_column::Column::Id)
            .all(db)
            .await
    }

    // ---- 写入 ----

    pub async fn insert_graph<C: ConnectionTrait>(
        db: &C,
        def: &ChartDefinition,
    ) -> Result<i32, DbErr> {
        let now = Utc::now().timestamp();
        let chart = SizeChartActiveModel {
            name: Set(def.name.clone()),
            slug: Set(def.slug.clone()),
            description: Set(def.description.clone()),
            is_published: Set(def.is_published),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await?;

        Self::write_links(db, chart.id, def).await?;

        let mut column_ids = Vec::with_capacity(def.columns.len());
        for (idx, col) in def.columns.iter().enumerate() {
            let m = column_active_model(chart.id, idx, col).insert(db).await?;
            column_ids.push(m.id);
        }

        for (idx, row) in def.rows.iter().enumerate() {
            let r = RowActiveModel {
                size_chart_id: Set(chart.id),
                display_order: Set(idx as i32),
                ..Default::default()
            }
            .insert(db)
            .await?;
            for (column_id, value) in column_ids.iter().zip(row.cells.iter()) {
                if !value.is_empty() {
                    insert_cell(db, r.id, *column_id, value).await?;
                }
            }
        }

        Ok(chart.id)
    }

    /// 整体替换：不在定义里的列/行删除，带 id 的更新，不带 id 的新增；单元格按 (row, column) upsert。
    /// 调用方负责校验 id 归属于该尺码表。
    pub async fn replace_graph<C: ConnectionTrait>(
        db: &C,
        chart: SizeChartModel,
        def: &ChartDefinition,
    ) -> Result<(), DbErr> {
        let chart_id = chart.id;
        let mut am: SizeChartActiveModel = chart.into();
        am.name = Set(def.name.clone());
        am.slug = Set(def.slug.clone());
        am.description = Set(def.description.clone());
        am.is_published = Set(def.is_published);
        am.updated_at = Set(Utc::now().timestamp());
        am.update(db).await?;

        Self::write_links(db, chart_id, def).await?;

        // 列
        let keep_cols: HashSet<i32> = def.columns.iter().filter_map(|c| c.id).collect();
        let removed_cols: Vec<i32> = Self::column_ids(db, chart_id)
            .await?
            .into_iter()
            .filter(|id| !keep_cols.contains(id))
            .collect();
        if !removed_cols.is_empty() {
            SizeChartCell::delete_many()
                .filter(size_chart_cell::Column::ColumnId.is_in(removed_cols.clone()))
                .exec(db)
                .await?;
            SizeChartColumn::delete_many()
                .filter(size_chart_column::Column::Id.is_in(removed_cols))
                .exec(db)
                .await?;
        }
        let mut column_ids = Vec::with_capacity(def.columns.len());
        for (idx, col) in def.columns.iter().enumerate() {
            let am = column_active_model(chart_id, idx, col);
            let m = if col.id.is_some() {
                am.update(db).await?
            } else {
                am.insert(db).await?
            };
            column_ids.push(m.id);
        }

        // 行
        let keep_rows: HashSet<i32> = def.rows.iter().filter_map(|r| r.id).collect();
        let removed_rows: Vec<i32> = Self::row_ids(db, chart_id)
            .await?
            .into_iter()
            .filter(|id| !keep_rows.contains(id))
            .collect();
        if !removed_rows.is_empty() {
            SizeChartCell::delete_many()
                .filter(size_chart_cell::Column::RowId.is_in(removed_rows.clone()))
                .exec(db)
                .await?;
            SizeChartRow::delete_many()
                .filter(size_chart_row::Column::Id.is_in(removed_rows))
                .exec(db)
                .await?;
        }
        let mut row_ids = Vec::with_capacity(def.rows.len());
        for (idx, row) in def.rows.iter().enumerate() {
            let am = RowActiveModel {
                id: match row.id {
                    Some(id) => Set(id),
                    None => NotSet,
                },
                size_chart_id: Set(chart_id),
                display_order: Set(idx as i32),
            };
            let m = if row.id.is_some() {
                am.update(db).await?
            } else {
                am.insert(db).await?
            };
            row_ids.push(m.id);
        }

        // 单元格 upsert
        let mut existing: HashMap<(i32, i32), CellModel> = if row_ids.is_empty() {
            HashMap::new()
        } else {
            SizeChartCell::find()
                .filter(size_chart_cell::Column::RowId.is_in(row_ids.clone()))
                .all(db)
                .await?
                .into_iter()
                .map(|c| ((c.row_id, c.column_id), c))
                .collect()
        };

        for (row_id, row) in row_ids.iter().zip(def.rows.iter()) {
            for (column_id, value) in column_ids.iter().zip(row.cells.iter()) {
                match existing.remove(&(*row_id, *column_id)) {
                    Some(cell) if value.is_empty() => {
                        SizeChartCell::delete_by_id(cell.id).exec(db).await?;
                    }
                    Some(cell) => {
                        if cell.value() != *value {
                            let mut am: CellActiveModel = cell.into();
                            am.set_value(value);
                            am.update(db).await?;
                        }
                    }
                    None if value.is_empty() => {}
                    None => {
                        insert_cell(db, *row_id, *column_id, value).await?;
                    }
                }
            }
        }

        // 剩余的都是已不存在的位置
        let stale: Vec<i32> = existing.into_values().map(|c| c.id).collect();
        if !stale.is_empty() {
            SizeChartCell::delete_many()
                .filter(size_chart_cell::Column::Id.is_in(stale))
                .exec(db)
                .await?;
        }

        Ok(())
    }

    /// 子分类 / 测量说明关联：先清空再按顺序写入（去重）
    async fn write_links<C: ConnectionTrait>(
        db: &C,
        chart_id: i32,
        def: &ChartDefinition,
    ) -> Result<(), DbErr> {
        SizeChartSubcategory::delete_many()
            .filter(size_chart_subcategory::Column::SizeChartId.eq(chart_id))
            .exec(db)
            .await?;
        let mut seen = HashSet::new();
        for (idx, sub_id) in def.subcategory_ids.iter().enumerate() {
            if !seen.insert(*sub_id) {
                continue;
            }
            ChartLinkActiveModel {
                size_chart_id: Set(chart_id),
                subcategory_id: Set(*sub_id),
                display_order: Set(idx as i32),
                ..Default::default()
            }
            .insert(db)
            .await?;
        }

        SizeChartMeasurementInstruction::delete_many()
            .filter(size_chart_measurement_instruction::Column::SizeChartId.eq(chart_id))
            .exec(db)
            .await?;
        let mut seen = HashSet::new();
        for (idx, instruction_id) in def.instruction_ids.iter().enumerate() {
            if !seen.insert(*instruction_id) {
                continue;
            }
            InstructionLinkActiveModel {
                size_chart_id: Set(chart_id),
                instruction_id: Set(*instruction_id),
                display_order: Set(idx as i32),
                ..Default::default()
            }
            .insert(db)
            .await?;
        }
        Ok(())
    }

    /// 读出可再次写入的定义（列/行不带 id），用于复制
    pub async fn definition_of<C: ConnectionTrait>(
        db: &C,
        chart: &SizeChartModel,
    ) -> Result<ChartDefinition, DbErr> {
        let columns = Self::columns_of(db, chart.id).await?;
        let rows = SizeChartRow::find()
            .filter(size_chart_row::Column::SizeChartId.eq(chart.id))
            .order_by_asc(size_chart_row::Column::DisplayOrder)
            .order_by_asc(size_chart_row::Column::Id)
            .all(db)
            .await?;
        let mut values: HashMap<(i32, i32), CellValue> = if rows.is_empty() {
            HashMap::new()
        } else {
            SizeChartCell::find()
                .filter(size_chart_cell::Column::RowId.is_in(rows.iter().map(|r| r.id).collect::<Vec<_>>()))
                .all(db)
                .await?
                .into_iter()
                .map(|c| ((c.row_id, c.column_id), c.value()))
                .collect()
        };
        let subcategory_ids = SizeChartSubcategory::find()
            .filter(size_chart_subcategory::Column::SizeChartId.eq(chart.id))
            .order_by_asc(size_chart_subcategory::Column::DisplayOrder)
            .all(db)
            .await?
            .into_iter()
            .map(|l| l.subcategory_id)
            .collect();
        let instruction_ids = SizeChartMeasurementInstruction::find()
            .filter(size_chart_measurement_instruction::Column::SizeChartId.eq(chart.id))
            .order_by_asc(size_chart_measurement_instruction::Column::DisplayOrder)
            .all(db)
            .await?
            .into_iter()
            .map(|l| l.instruction_id)
            .collect();

        Ok(ChartDefinition {
            name: chart.name.clone(),
            slug: chart.slug.clone(),
            description: chart.description.clone(),
            is_published: chart.is_published,
            subcategory_ids,
            instruction_ids,
            rows: rows
                .iter()
                .map(|r| RowDefinition {
                    id: None,
                    cells: columns
                        .iter()
                        .map(|c| values.remove(&(r.id, c.id)).unwrap_or_default())
                        .collect(),
                })
                .collect(),
            columns: columns
                .into_iter()
                .map(|c| ColumnDefinition {
                    id: None,
                    column_type: c.column_type.parse().unwrap_or(ColumnType::Text),
                    name: c.name,
                    label_type: c.label_type,
                })
                .collect(),
        })
    }

    pub async fn delete_graph<C: ConnectionTrait>(db: &C, chart_id: i32) -> Result<u64, DbErr> {
        let row_ids: Vec<i32> = Self::row_ids(db, chart_id).await?.into_iter().collect();
        if !row_ids.is_empty() {
            SizeChartCell::delete_many()
                .filter(size_chart_cell::Column::RowId.is_in(row_ids))
                .exec(db)
                .await?;
        }
        SizeChartRow::delete_many()
            .filter(size_chart_row::Column::SizeChartId.eq(chart_id))
            .exec(db)
            .await?;
        SizeChartColumn::delete_many()
            .filter(size_chart_column::Column::SizeChartId.eq(chart_id))
            .exec(db)
            .await?;
        SizeChartSubcategory::delete_many()
            .filter(size_chart_subcategory::Column::SizeChartId.eq(chart_id))
            .exec(db)
            .await?;
        SizeChartMeasurementInstruction::delete_many()
            .filter(size_chart_measurement_instruction::Column::SizeChartId.eq(chart_id))
            .exec(db)
            .await?;
        let res = SizeChart::delete_by_id(chart_id).exec(db).await?;
        Ok(res.rows_affected)
    }

    pub async fn delete_all<C: ConnectionTrait>(db: &C) -> Result<u64, DbErr> {
        SizeChartCell::delete_many().exec(db).await?;
        SizeChartRow::delete_many().exec(db).await?;
        SizeChartColumn::delete_many().exec(db).await?;
        SizeChartSubcategory::delete_many().exec(db).await?;
        SizeChartMeasurementInstruction::delete_many().exec(db).await?;
        let res = SizeChart::delete_many().exec(db).await?;
        Ok(res.rows_affected)
    }

    // ---- 读取 ----

    async fn subcategory_refs<C: ConnectionTrait>(
        db: &C,
        chart_id: i32,
    ) -> Result<Vec<SubcategoryRefDto>, DbErr> {
        let links = SizeChartSubcategory::find()
            .filter(size_chart_subcategory::Column::SizeChartId.eq(chart_id))
            .order_by_asc(size_chart_subcategory::Column::DisplayOrder)
            .all(db)
            .await?;
        if links.is_empty() {
            return Ok(Vec::new());
        }
        let subs: HashMap<i32, subcategory::Model> = Subcategory::find()
            .filter(
                subcategory::Column::Id.is_in(links.iter().map(|l| l.subcategory_id).collect::<Vec<_>>()),
            )
            .all(db)
            .await?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();
        let cats: HashMap<i32, category::Model> = Category::find()
            .filter(category::Column::Id.is_in(subs.values().map(|s| s.category_id).collect::<Vec<_>>()))
            .all(db)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        Ok(links
            .iter()
            .filter_map(|l| {
                let s = subs.get(&l.subcategory_id)?;
                let c = cats.get(&s.category_id)?;
                Some(SubcategoryRefDto {
                    id: s.id,
                    name: s.name.clone(),
                    slug: s.slug.clone(),
                    category: CategoryRefDto {
                        id: c.id,
                        name: c.name.clone(),
                        slug: c.slug.clone(),
                    },
                })
            })
            .collect())
    }

    async fn instructions_of<C: ConnectionTrait>(
        db: &C,
        chart_id: i32,
    ) -> Result<Vec<InstructionModel>, DbErr> {
        let links = SizeChartMeasurementInstruction::find()
            .filter(size_chart_measurement_instruction::Column::SizeChartId.eq(chart_id))
            .order_by_asc(size_chart_measurement_instruction::Column::DisplayOrder)
            .all(db)
            .await?;
        let mut by_id = InstructionRepository::find_by_ids(
            db,
            links.iter().map(|l| l.instruction_id).collect(),
        )
        .await?;
        Ok(links
            .iter()
            .filter_map(|l| by_id.remove(&l.instruction_id))
            .collect())
    }

    pub async fn load_graph<C: ConnectionTrait>(
        db: &C,
        chart: SizeChartModel,
    ) -> Result<SizeChartDto, DbErr> {
        let subcategories = Self::subcategory_refs(db, chart.id).await?;
        let measurement_instructions = Self::instructions_of(db, chart.id).await?;
        let columns = Self::columns_of(db, chart.id).await?;
        let rows = SizeChartRow::find()
            .filter(size_chart_row::Column::SizeChartId.eq(chart.id))
            .order_by_asc(size_chart_row::Column::DisplayOrder)
            .order_by_asc(size_chart_row::Column::Id)
            .all(db)
            .await?;

        let cells: Vec<CellModel> = if rows.is_empty() {
            Vec::new()
        } else {
            SizeChartCell::find()
                .filter(size_chart_cell::Column::RowId.is_in(rows.iter().map(|r| r.id).collect::<Vec<_>>()))
                .all(db)
                .await?
        };
        let label_ids: Vec<i32> = cells
            .iter()
            .filter_map(|c| c.label_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let labels = LabelRepository::find_by_ids(db, label_ids).await?;
        let mut values: HashMap<(i32, i32), CellValue> = cells
            .iter()
            .map(|c| ((c.row_id, c.column_id), c.value()))
            .collect();

        let row_dtos = rows
            .iter()
            .map(|r| RowDto {
                id: r.id,
                display_order: r.display_order,
                cells: columns
                    .iter()
                    .map(|col| {
                        let value = values.remove(&(r.id, col.id)).unwrap_or_default();
                        let label = value
                            .label_id()
                            .and_then(|id| labels.get(&id))
                            .map(|l| (l.key.as_str(), l.display_value.as_str()));
                        CellDto {
                            column_id: col.id,
                            value: CellView::from_value(&value, label),
                        }
                    })
                    .collect(),
            })
            .collect();

        Ok(SizeChartDto {
            id: chart.id,
            name: chart.name,
            slug: chart.slug,
            description: chart.description,
            is_published: chart.is_published,
            created_at: chart.created_at,
            updated_at: chart.updated_at,
            subcategories,
            measurement_instructions,
            columns: columns
                .into_iter()
                .map(|c| ColumnDto {
                    id: c.id,
                    name: c.name,
                    column_type: c.column_type,
                    label_type: c.label_type,
                    display_order: c.display_order,
                })
                .collect(),
            rows: row_dtos,
        })
    }

    pub async fn load_graphs<C: ConnectionTrait>(
        db: &C,
        charts: Vec<SizeChartModel>,
    ) -> Result<Vec<SizeChartDto>, DbErr> {
        let mut out = Vec::with_capacity(charts.len());
        for chart in charts {
            out.push(Self::load_graph(db, chart).await?);
        }
        Ok(out)
    }

    pub async fn summaries<C: ConnectionTrait>(
        db: &C,
        filter: &ChartFilter,
    ) -> Result<Vec<SizeChartSummaryDto>, DbErr> {
        let charts = Self::list(db, filter).await?;
        let mut out = Vec::with_capacity(charts.len());
        for chart in charts {
            let column_count = SizeChartColumn::find()
                .filter(size_chart_column::Column::SizeChartId.eq(chart.id))
                .count(db)
                .await?;
            let row_count = SizeChartRow::find()
                .filter(size_chart_row::Column::SizeChartId.eq(chart.id))
                .count(db)
                .await?;
            out.push(SizeChartSummaryDto {
                subcategories: Self::subcategory_refs(db, chart.id).await?,
                id: chart.id,
                name: chart.name,
                slug: chart.slug,
                description: chart.description,
                is_published: chart.is_published,
                updated_at: chart.updated_at,
                column_count,
                row_count,
            });
        }
        Ok(out)
    }
}

fn column_active_model(chart_id: i32, idx: usize, col: &ColumnDefinition) -> ColumnActiveModel {
    ColumnActiveModel {
        id: match col.id {
            Some(id) => Set(id),
            None => NotSet,
        },
        size_chart_id: Set(chart_id),
        name: Set(col.name.clone()),
        column_type: Set(col.column_type.as_str().to_string()),
        display_order: Set(idx as i32),
        label_type: Set(col.label_type.clone()),
    }
}

async fn insert_cell<C: ConnectionTrait>(
    db: &C,
    row_id: i32,
    column_id: i32,
    value: &CellValue,
) -> Result<CellModel, DbErr> {
    let mut am = CellActiveModel {
        row_id: Set(row_id),
        column_id: Set(column_id),
        ..Default::default()
    };
    am.set_value(value);
    am.insert(db).await
}
