use super::catalog::{
    find_instruction_spec, find_label_spec, find_template, ChartTemplate, Rows, TemplateCell,
};
use crate::domain::CellValue;
use crate::errors::{AppError, AppResult};
use crate::services::charts::{checked_slug, dedup, derived_slug};
use crate::services::ChartService;
use crate::storage::repository::{
    CategoryRepository, ChartDefinition, ColumnDefinition, InstructionDefinition,
    InstructionRepository, LabelDefinition, LabelRepository, RowDefinition, SizeChartDto,
    SizeChartRepository,
};
use log::info;
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyTemplateInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    /// 为空时按模板建议位置挂载（找不到的位置跳过）
    #[serde(default)]
    pub subcategory_ids: Option<Vec<i32>>,
    #[serde(default)]
    pub variant: Option<String>,
    #[serde(default)]
    pub is_published: Option<bool>,
}

/// 写库前已确定好的模板实例参数
pub(crate) struct Materialize<'a> {
    pub template: &'a ChartTemplate,
    pub rows: Rows,
    pub name: String,
    pub slug: String,
    pub is_published: bool,
    pub subcategory_ids: Option<Vec<i32>>,
}

pub async fn apply_template(
    db: &DatabaseConnection,
    template_id: &str,
    input: ApplyTemplateInput,
) -> AppResult<SizeChartDto> {
    let template = find_template(template_id).ok_or_else(|| AppError::not_found("template"))?;
    let variant = input.variant.as_deref().map(str::trim).filter(|v| !v.is_empty());
    let rows = template
        .rows_for(variant)
        .ok_or_else(|| AppError::validation(format!("unknown variant: {}", variant.unwrap_or(""))))?;

    let name = match input.name.as_deref().map(str::trim) {
        Some(n) if !n.is_empty() => n.to_string(),
        _ => match variant.and_then(|v| template.variant(v)) {
            Some(v) => format!("{} ({})", template.name, v.name),
            None => template.name.to_string(),
        },
    };

    let txn = db.begin().await?;
    let slug = match input.slug.as_deref().map(str::trim) {
        Some(s) if !s.is_empty() => checked_slug(&txn, s, None).await?,
        _ => derived_slug(&txn, &name).await?,
    };
    let id = materialize(
        &txn,
        Materialize {
            template,
            rows,
            name,
            slug,
            is_published: input.is_published.unwrap_or(false),
            subcategory_ids: input.subcategory_ids,
        },
    )
    .await?;
    txn.commit().await?;
    info!("✓ 应用模板 {} -> 尺码表 [{}]", template.id, id);
    ChartService::load(db, id).await
}

/// 补齐模板用到的 label 与测量说明，然后写入整张表
pub(crate) async fn materialize<C: ConnectionTrait>(db: &C, m: Materialize<'_>) -> AppResult<i32> {
    let template = m.template;

    let mut label_ids: HashMap<&str, i32> = HashMap::new();
    for key in template.label_keys() {
        let spec = find_label_spec(key)
            .ok_or_else(|| AppError::Internal(format!("template label missing: {}", key)))?;
        let label = LabelRepository::ensure(
            db,
            LabelDefinition {
                key: spec.key.to_string(),
                display_value: spec.display_value.to_string(),
                label_type: spec.label_type.to_string(),
                sort_order: spec.sort_order,
                description: None,
            },
        )
        .await?;
        label_ids.insert(key, label.id);
    }

    let mut instruction_ids = Vec::with_capacity(template.instructions.len());
    for key in template.instructions {
        let spec = find_instruction_spec(key)
            .ok_or_else(|| AppError::Internal(format!("template instruction missing: {}", key)))?;
        let model = InstructionRepository::ensure(
            db,
            InstructionDefinition {
                key: spec.key.to_string(),
                name: spec.name.to_string(),
                instruction: spec.instruction.to_string(),
                sort_order: spec.sort_order,
            },
        )
        .await?;
        instruction_ids.push(model.id);
    }

    let subcategory_ids = match m.subcategory_ids {
        Some(ids) => {
            let ids = dedup(ids);
            let found = CategoryRepository::find_subcategories(db, ids.clone()).await?;
            if found.len() != ids.len() {
                return Err(AppError::validation("unknown subcategory id"));
            }
            ids
        }
        None => {
            let mut ids = Vec::new();
            for (category, subcategory) in template.placements {
                if let Some(sub) =
                    CategoryRepository::find_subcategory_by_slugs(db, category, subcategory).await?
                {
                    ids.push(sub.id);
                }
            }
            ids
        }
    };

    let columns = template
        .columns
        .iter()
        .map(|c| ColumnDefinition {
            id: None,
            name: c.name.to_string(),
            column_type: c.column_type,
            label_type: c.label_type.map(str::to_string),
        })
        .collect();

    let mut rows = Vec::with_capacity(m.rows.len());
    for row in m.rows {
        let cells = row
            .iter()
            .map(|cell| template_cell_value(cell, &label_ids))
            .collect::<AppResult<Vec<_>>>()?;
        rows.push(RowDefinition { id: None, cells });
    }

    let def = ChartDefinition {
        name: m.name,
        slug: m.slug,
        description: Some(template.description.to_string()),
        is_published: m.is_published,
        subcategory_ids,
        instruction_ids,
        columns,
        rows,
    };
    Ok(SizeChartRepository::insert_graph(db, &def).await?)
}

fn template_cell_value(cell: &TemplateCell, label_ids: &HashMap<&str, i32>) -> AppResult<CellValue> {
    Ok(match *cell {
        TemplateCell::Empty => CellValue::Empty,
        TemplateCell::Text { text } => CellValue::text(text),
        TemplateCell::Measurement { inches } => CellValue::measurement(inches)?,
        TemplateCell::Range { min, max } => CellValue::range(min, max)?,
        TemplateCell::Label { key } => CellValue::Label(
            *label_ids
                .get(key)
                .ok_or_else(|| AppError::Internal(format!("label not seeded: {}", key)))?,
        ),
    })
}
