use crate::domain::{is_valid_label_key, is_valid_slug, slugify, CellInput, CellValue, ColumnType};
use crate::errors::{AppError, AppResult};
use crate::storage::entity::size_chart::Model as SizeChartModel;
use crate::storage::repository::{
    CategoryRepository, ChartDefinition, ColumnDefinition, InstructionRepository,
    LabelRepository, RowDefinition, SizeChartDto, SizeChartRepository,
};
use log::info;
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};
use serde::Deserialize;
use std::collections::HashSet;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartInput {
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub subcategory_ids: Vec<i32>,
    #[serde(default)]
    pub instruction_ids: Vec<i32>,
    #[serde(default)]
    pub columns: Vec<ColumnInput>,
    #[serde(default)]
    pub rows: Vec<RowInput>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnInput {
    #[serde(default)]
    pub id: Option<i32>,
    pub name: String,
    pub column_type: ColumnType,
    #[serde(default)]
    pub label_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowInput {
    #[serde(default)]
    pub id: Option<i32>,
    #[serde(default)]
    pub cells: Vec<CellInput>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
}

pub struct ChartService;

impl ChartService {
    pub async fn create(db: &DatabaseConnection, input: ChartInput) -> AppResult<SizeChartDto> {
        let txn = db.begin().await?;
        let def = resolve_definition(&txn, input, None).await?;
        let id = SizeChartRepository::insert_graph(&txn, &def).await?;
        txn.commit().await?;
        info!("✓ 新建尺码表 [{}]: {}", id, def.slug);
        Self::load(db, id).await
    }

    pub async fn update(
        db: &DatabaseConnection,
        id: i32,
        input: ChartInput,
    ) -> AppResult<SizeChartDto> {
        let txn = db.begin().await?;
        let chart = SizeChartRepository::find(&txn, id)
            .await?
            .ok_or_else(|| AppError::not_found("size chart"))?;
        let def = resolve_definition(&txn, input, Some(&chart)).await?;
        SizeChartRepository::replace_graph(&txn, chart, &def).await?;
        txn.commit().await?;
        info!("✓ 更新尺码表 [{}]: {}", id, def.slug);
        Self::load(db, id).await
    }

    pub async fn delete(db: &DatabaseConnection, id: i32) -> AppResult<()> {
        let txn = db.begin().await?;
        let deleted = SizeChartRepository::delete_graph(&txn, id).await?;
        if deleted == 0 {
            return Err(AppError::not_found("size chart"));
        }
        txn.commit().await?;
        info!("已删除尺码表 [{}]", id);
        Ok(())
    }

    /// 深拷贝，副本默认不发布
    pub async fn duplicate(
        db: &DatabaseConnection,
        id: i32,
        input: DuplicateInput,
    ) -> AppResult<SizeChartDto> {
        let txn = db.begin().await?;
        let chart = SizeChartRepository::find(&txn, id)
            .await?
            .ok_or_else(|| AppError::not_found("size chart"))?;
        let mut def = SizeChartRepository::definition_of(&txn, &chart).await?;
        def.name = match input.name.map(|n| n.trim().to_string()) {
            Some(n) if !n.is_empty() => n,
            _ => format!("{} (copy)", chart.name),
        };
        def.slug = match input.slug {
            Some(slug) => checked_slug(&txn, slug.trim(), None).await?,
            None => SizeChartRepository::unique_slug(&txn, &format!("{}-copy", chart.slug)).await?,
        };
        def.is_published = false;
        let new_id = SizeChartRepository::insert_graph(&txn, &def).await?;
        txn.commit().await?;
        info!("✓ 复制尺码表 [{}] -> [{}]", id, new_id);
        Self::load(db, new_id).await
    }

    pub async fn load<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<SizeChartDto> {
        let chart = SizeChartRepository::find(db, id)
            .await?
            .ok_or_else(|| AppError::not_found("size chart"))?;
        Ok(SizeChartRepository::load_graph(db, chart).await?)
    }
}

/// 校验格式与唯一性，冲突返回 409
pub async fn checked_slug<C: ConnectionTrait>(
    db: &C,
    slug: &str,
    exclude_id: Option<i32>,
) -> AppResult<String> {
    if !is_valid_slug(slug) {
        return Err(AppError::validation(format!("invalid slug: {:?}", slug)));
    }
    if SizeChartRepository::slug_taken(db, slug, exclude_id).await? {
        return Err(AppError::conflict(format!("slug already in use: {}", slug)));
    }
    Ok(slug.to_string())
}

/// 未指定 slug 时由名称生成并自动去重
pub async fn derived_slug<C: ConnectionTrait>(db: &C, name: &str) -> AppResult<String> {
    let base = slugify(name);
    if base.is_empty() {
        return Err(AppError::validation("cannot derive a slug from the name"));
    }
    Ok(SizeChartRepository::unique_slug(db, &base).await?)
}

async fn resolve_definition<C: ConnectionTrait>(
    db: &C,
    input: ChartInput,
    existing: Option<&SizeChartModel>,
) -> AppResult<ChartDefinition> {
    let name = input.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::validation("name is required"));
    }
    let exclude = existing.map(|c| c.id);
    let slug = match (input.slug.as_deref().map(str::trim), existing) {
        (Some(s), _) if !s.is_empty() => checked_slug(db, s, exclude).await?,
        (_, Some(chart)) => chart.slug.clone(),
        (_, None) => derived_slug(db, &name).await?,
    };

    if input.columns.is_empty() {
        return Err(AppError::validation("a size chart needs at least one column"));
    }

    let known_columns = match existing {
        Some(c) => SizeChartRepository::column_ids(db, c.id).await?,
        None => HashSet::new(),
    };
    let known_rows = match existing {
        Some(c) => SizeChartRepository::row_ids(db, c.id).await?,
        None => HashSet::new(),
    };

    let mut names = HashSet::new();
    let mut seen_ids = HashSet::new();
    let mut columns = Vec::with_capacity(input.columns.len());
    for col in input.columns {
        let col_name = col.name.trim().to_string();
        if col_name.is_empty() {
            return Err(AppError::validation("column name is required"));
        }
        if !names.insert(col_name.to_lowercase()) {
            return Err(AppError::validation(format!("duplicate column name: {}", col_name)));
        }
        if let Some(id) = col.id {
            if !known_columns.contains(&id) || !seen_ids.insert(id) {
                return Err(AppError::validation(format!("unknown column id: {}", id)));
            }
        }
        let label_type = col
            .label_type
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        if let Some(t) = &label_type {
            if !is_valid_label_key(t) {
                return Err(AppError::validation(format!("invalid label type: {}", t)));
            }
        }
        columns.push(ColumnDefinition {
            id: col.id,
            name: col_name,
            column_type: col.column_type,
            label_type,
        });
    }

    let mut seen_rows = HashSet::new();
    let mut rows = Vec::with_capacity(input.rows.len());
    for (idx, row) in input.rows.into_iter().enumerate() {
        if row.cells.len() != columns.len() {
            return Err(AppError::validation(format!(
                "row {} has {} cells but the chart has {} columns",
                idx + 1,
                row.cells.len(),
                columns.len()
            )));
        }
        if let Some(id) = row.id {
            if !known_rows.contains(&id) || !seen_rows.insert(id) {
                return Err(AppError::validation(format!("unknown row id: {}", id)));
            }
        }
        let cells = row
            .cells
            .into_iter()
            .map(CellInput::into_value)
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(RowDefinition { id: row.id, cells });
    }

    check_labels(db, &columns, &rows).await?;

    let subcategory_ids = dedup(input.subcategory_ids);
    let found = CategoryRepository::find_subcategories(db, subcategory_ids.clone()).await?;
    if found.len() != subcategory_ids.len() {
        return Err(AppError::validation("unknown subcategory id"));
    }
    let instruction_ids = dedup(input.instruction_ids);
    let found = InstructionRepository::find_by_ids(db, instruction_ids.clone()).await?;
    if found.len() != instruction_ids.len() {
        return Err(AppError::validation("unknown measurement instruction id"));
    }

    Ok(ChartDefinition {
        name,
        slug,
        description: input
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty()),
        is_published: input.is_published,
        subcategory_ids,
        instruction_ids,
        columns,
        rows,
    })
}

/// label 必须存在；列限定了 labelType 时类型必须一致
pub(crate) async fn check_labels<C: ConnectionTrait>(
    db: &C,
    columns: &[ColumnDefinition],
    rows: &[RowDefinition],
) -> AppResult<()> {
    let ids: Vec<i32> = rows
        .iter()
        .flat_map(|r| r.cells.iter().filter_map(CellValue::label_id))
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    let labels = LabelRepository::find_by_ids(db, ids).await?;
    for row in rows {
        for (col, cell) in columns.iter().zip(row.cells.iter()) {
            let Some(id) = cell.label_id() else { continue };
            let label = labels
                .get(&id)
                .ok_or_else(|| AppError::validation(format!("unknown label id: {}", id)))?;
            if let Some(t) = &col.label_type {
                if &label.label_type != t {
                    return Err(AppError::validation(format!(
                        "label {} is {} but column {} accepts {}",
                        label.key, label.label_type, col.name, t
                    )));
                }
            }
        }
    }
    Ok(())
}

pub(crate) fn dedup(ids: Vec<i32>) -> Vec<i32> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}
