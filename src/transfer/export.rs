use super::schema::{CategoryRef, CellJson, ChartRecord, ColumnRecord, ExportDocument, EXPORT_VERSION};
use crate::domain::{CellView, ColumnType};
use crate::errors::{AppError, AppResult};
use crate::storage::repository::{ChartFilter, SizeChartDto, SizeChartRepository};
use chrono::Utc;
use log::info;
use sea_orm::ConnectionTrait;
use std::collections::BTreeMap;

/// ids 为空时导出全部尺码表
pub async fn export_charts<C: ConnectionTrait>(
    db: &C,
    ids: Option<Vec<i32>>,
) -> AppResult<ExportDocument> {
    let filter = ChartFilter {
        ids,
        ..Default::default()
    };
    let charts = SizeChartRepository::list(db, &filter).await?;
    let graphs = SizeChartRepository::load_graphs(db, charts).await?;
    let charts = graphs
        .into_iter()
        .map(chart_record)
        .collect::<AppResult<Vec<_>>>()?;
    info!("导出尺码表 {} 张", charts.len());
    Ok(ExportDocument {
        version: EXPORT_VERSION.to_string(),
        exported_at: Some(Utc::now().to_rfc3339()),
        charts,
    })
}

fn chart_record(chart: SizeChartDto) -> AppResult<ChartRecord> {
    let columns = chart
        .columns
        .iter()
        .map(|c| {
            let column_type: ColumnType = c.column_type.parse().map_err(AppError::Internal)?;
            Ok(ColumnRecord {
                name: c.name.clone(),
                column_type,
                label_type: c.label_type.clone(),
            })
        })
        .collect::<AppResult<Vec<_>>>()?;

    let rows = chart
        .rows
        .iter()
        .map(|row| {
            chart
                .columns
                .iter()
                .zip(row.cells.iter())
                .filter_map(|(col, cell)| cell_json(&cell.value).map(|v| (col.name.clone(), Some(v))))
                .collect::<BTreeMap<_, _>>()
        })
        .collect();

    Ok(ChartRecord {
        name: chart.name,
        slug: chart.slug,
        description: chart.description,
        is_published: chart.is_published,
        categories: chart
            .subcategories
            .into_iter()
            .map(|s| CategoryRef {
                category: s.category.slug,
                subcategory: s.slug,
            })
            .collect(),
        measurement_instructions: chart
            .measurement_instructions
            .into_iter()
            .map(|i| i.key)
            .collect(),
        columns,
        rows,
    })
}

fn cell_json(view: &CellView) -> Option<CellJson> {
    match view {
        CellView::Empty => None,
        CellView::Text { text } => Some(CellJson::Text(text.clone())),
        CellView::Measurement { inches, .. } => Some(CellJson::Number(*inches)),
        CellView::Range { min, max } => Some(CellJson::Range {
            min: min.inches,
            max: max.inches,
        }),
        CellView::Label { key, .. } => Some(CellJson::Label {
            label_key: key.clone(),
        }),
    }
}
