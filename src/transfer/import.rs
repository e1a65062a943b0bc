use super::schema::{CellJson, ChartRecord, ExportDocument};
use crate::domain::CellValue;
use crate::errors::{AppError, AppResult};
use crate::services::charts::check_labels;
use crate::storage::repository::{
    CategoryRepository, ChartDefinition, ColumnDefinition, InstructionRepository,
    LabelRepository, RowDefinition, SizeChartRepository,
};
use crate::templates::is_protected;
use log::{info, warn};
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// slug 已存在时的处理方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportMode {
    #[default]
    Skip,
    Overwrite,
    Error,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImportRequest {
    #[serde(default)]
    pub mode: ImportMode,
    pub data: ExportDocument,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Created,
    Replaced,
    Skipped,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemResult {
    pub slug: String,
    pub status: ItemStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportReport {
    pub created: usize,
    pub replaced: usize,
    pub skipped: usize,
    pub failed: usize,
    pub results: Vec<ItemResult>,
}

impl ImportReport {
    fn record(&mut self, slug: String, outcome: AppResult<ItemStatus>) {
        let (status, error) = match outcome {
            Ok(status) => (status, None),
            Err(e) => (ItemStatus::Failed, Some(e.to_string())),
        };
        match status {
            ItemStatus::Created => self.created += 1,
            ItemStatus::Replaced => self.replaced += 1,
            ItemStatus::Skipped => self.skipped += 1,
            ItemStatus::Failed => self.failed += 1,
        }
        self.results.push(ItemResult { slug, status, error });
    }
}

/// 文档整体先校验；之后每张表独立事务，单张失败不影响其他。
/// `demo_mode` 下模板生成的尺码表不允许被覆盖。
pub async fn import_charts(
    db: &DatabaseConnection,
    req: ImportRequest,
    demo_mode: bool,
) -> AppResult<ImportReport> {
    req.data.validate().map_err(AppError::Validation)?;

    let mut report = ImportReport::default();
    for record in req.data.charts {
        let outcome = import_one(db, &record, req.mode, demo_mode).await;
        if let Err(e) = &outcome {
            warn!("⚠ 导入尺码表 {} 失败: {}", record.slug, e);
        }
        report.record(record.slug, outcome);
    }
    info!(
        "导入完成: 新建 {} / 覆盖 {} / 跳过 {} / 失败 {}",
        report.created, report.replaced, report.skipped, report.failed
    );
    Ok(report)
}

async fn import_one(
    db: &DatabaseConnection,
    record: &ChartRecord,
    mode: ImportMode,
    demo_mode: bool,
) -> AppResult<ItemStatus> {
    let txn = db.begin().await?;
    let status = match (SizeChartRepository::find_by_slug(&txn, &record.slug).await?, mode) {
        (None, _) => ItemStatus::Created,
        (Some(_), ImportMode::Skip) => return Ok(ItemStatus::Skipped),
        (Some(_), ImportMode::Error) => {
            return Err(AppError::conflict(format!("slug already exists: {}", record.slug)))
        }
        (Some(_), ImportMode::Overwrite) if demo_mode && is_protected(&record.slug) => {
            return Err(AppError::Forbidden(format!(
                "{} is a protected demo chart and cannot be overwritten",
                record.slug
            )))
        }
        (Some(existing), ImportMode::Overwrite) => {
            SizeChartRepository::delete_graph(&txn, existing.id).await?;
            ItemStatus::Replaced
        }
    };
    let def = record_definition(&txn, record).await?;
    SizeChartRepository::insert_graph(&txn, &def).await?;
    txn.commit().await?;
    Ok(status)
}

/// 把自然键解析成本库 id
async fn record_definition<C: ConnectionTrait>(
    db: &C,
    record: &ChartRecord,
) -> AppResult<ChartDefinition> {
    let mut subcategory_ids = Vec::new();
    for r in &record.categories {
        let sub = CategoryRepository::find_subcategory_by_slugs(db, &r.category, &r.subcategory)
            .await?
            .ok_or_else(|| {
                AppError::validation(format!("unknown subcategory: {}/{}", r.category, r.subcategory))
            })?;
        if !subcategory_ids.contains(&sub.id) {
            subcategory_ids.push(sub.id);
        }
    }

    let instructions =
        InstructionRepository::find_by_keys(db, record.measurement_instructions.clone()).await?;
    let mut instruction_ids = Vec::new();
    for key in &record.measurement_instructions {
        let model = instructions
            .get(key)
            .ok_or_else(|| AppError::validation(format!("unknown measurement instruction: {}", key)))?;
        if !instruction_ids.contains(&model.id) {
            instruction_ids.push(model.id);
        }
    }

    let label_keys: HashSet<String> = record
        .rows
        .iter()
        .flat_map(|row| row.values())
        .filter_map(|v| match v {
            Some(CellJson::Label { label_key }) => Some(label_key.clone()),
            _ => None,
        })
        .collect();
    let labels = LabelRepository::find_by_keys(db, label_keys.into_iter().collect()).await?;

    let columns: Vec<ColumnDefinition> = record
        .columns
        .iter()
        .map(|c| ColumnDefinition {
            id: None,
            name: c.name.trim().to_string(),
            column_type: c.column_type,
            label_type: c.label_type.clone(),
        })
        .collect();

    let mut rows = Vec::with_capacity(record.rows.len());
    for row in &record.rows {
        let mut cells = Vec::with_capacity(record.columns.len());
        for col in &record.columns {
            let value = match row.get(&col.name).and_then(Option::as_ref) {
                None => CellValue::Empty,
                Some(CellJson::Text(text)) => CellValue::text(text.as_str()),
                Some(CellJson::Number(n)) => CellValue::measurement(*n)?,
                Some(CellJson::Range { min, max }) => CellValue::range(*min, *max)?,
                Some(CellJson::Label { label_key }) => CellValue::Label(
                    labels
                        .get(label_key)
                        .map(|l| l.id)
                        .ok_or_else(|| AppError::validation(format!("unknown label: {}", label_key)))?,
                ),
            };
            cells.push(value);
        }
        rows.push(RowDefinition { id: None, cells });
    }
    check_labels(db, &columns, &rows).await?;

    Ok(ChartDefinition {
        name: record.name.trim().to_string(),
        slug: record.slug.clone(),
        description: record.description.clone().filter(|d| !d.trim().is_empty()),
        is_published: record.is_published,
        subcategory_ids,
        instruction_ids,
        columns,
        rows,
    })
}
