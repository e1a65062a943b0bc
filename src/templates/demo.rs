use super::apply::{materialize, Materialize};
use super::catalog::{DEMO_CATEGORIES, STANDARD_INSTRUCTIONS, STANDARD_LABELS, TEMPLATES};
use crate::errors::AppResult;
use crate::storage::repository::{
    CategoryRepository, InstructionDefinition, InstructionRepository, LabelDefinition,
    LabelRepository, SizeChartRepository,
};
use log::info;
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};
use serde::Serialize;
use tokio::sync::RwLock;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoSummary {
    pub categories: usize,
    pub subcategories: usize,
    pub labels: usize,
    pub instructions: usize,
    pub charts: usize,
}

/// 最近一次重置时间，仅保存在进程内，重启后丢失
#[derive(Debug, Default)]
pub struct DemoClock {
    last_reset_at: RwLock<Option<i64>>,
}

impl DemoClock {
    pub async fn last_reset_at(&self) -> Option<i64> {
        *self.last_reset_at.read().await
    }

    pub async fn record(&self, ts: i64) {
        *self.last_reset_at.write().await = Some(ts);
    }
}

/// 演示模式下，模板目录里的 slug 不允许被修改或删除
pub fn is_protected(slug: &str) -> bool {
    TEMPLATES.iter().any(|t| t.slug == slug)
}

/// 清空尺码表、分类、标签和测量说明（保留 API key），再从模板目录重建。整个过程在一个事务内。
pub async fn reset_demo_data(db: &DatabaseConnection) -> AppResult<DemoSummary> {
    let txn = db.begin().await?;
    let charts = SizeChartRepository::delete_all(&txn).await?;
    CategoryRepository::delete_all(&txn).await?;
    let labels = LabelRepository::delete_all(&txn).await?;
    let instructions = InstructionRepository::delete_all(&txn).await?;
    info!(
        "演示数据已清空: 尺码表 {} / 标签 {} / 测量说明 {}",
        charts, labels, instructions
    );
    let summary = seed(&txn).await?;
    txn.commit().await?;
    info!("✓ 演示数据重建完成: {:?}", summary);
    Ok(summary)
}

/// 空库时写入演示数据；已有分类或尺码表则不动
pub async fn seed_if_empty(db: &DatabaseConnection) -> AppResult<Option<DemoSummary>> {
    let txn = db.begin().await?;
    let has_categories = !CategoryRepository::list_tree(&txn, false).await?.is_empty();
    let has_charts = !SizeChartRepository::list(&txn, &Default::default())
        .await?
        .is_empty();
    if has_categories || has_charts {
        return Ok(None);
    }
    let summary = seed(&txn).await?;
    txn.commit().await?;
    info!("✓ 空库已写入演示数据: {:?}", summary);
    Ok(Some(summary))
}

async fn seed<C: ConnectionTrait>(db: &C) -> AppResult<DemoSummary> {
    let mut summary = DemoSummary::default();

    for (order, spec) in DEMO_CATEGORIES.iter().enumerate() {
        let category = CategoryRepository::insert(
            db,
            spec.name.to_string(),
            spec.slug.to_string(),
            order as i32,
        )
        .await?;
        summary.categories += 1;
        for (sub_order, (name, slug)) in spec.subcategories.iter().enumerate() {
            CategoryRepository::insert_subcategory(
                db,
                category.id,
                name.to_string(),
                slug.to_string(),
                sub_order as i32,
            )
            .await?;
            summary.subcategories += 1;
        }
    }

    for spec in STANDARD_LABELS {
        LabelRepository::insert(
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
        summary.labels += 1;
    }

    for spec in STANDARD_INSTRUCTIONS {
        InstructionRepository::insert(
            db,
            InstructionDefinition {
                key: spec.key.to_string(),
                name: spec.name.to_string(),
                instruction: spec.instruction.to_string(),
                sort_order: spec.sort_order,
            },
        )
        .await?;
        summary.instructions += 1;
    }

    for template in TEMPLATES {
        materialize(
            db,
            Materialize {
                template,
                rows: template.rows,
                name: template.name.to_string(),
                slug: template.slug.to_string(),
                is_published: true,
                subcategory_ids: None,
            },
        )
        .await?;
        summary.charts += 1;
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn template_slugs_are_protected() {
        assert!(is_protected("mens-tops"));
        assert!(is_protected("unisex-shoes"));
        assert!(!is_protected("mens-tops-2"));
    }

    #[tokio::test]
    async fn clock_keeps_last_reset() {
        let clock = DemoClock::default();
        assert_eq!(clock.last_reset_at().await, None);
        let now = Utc::now().timestamp();
        clock.record(now).await;
        assert_eq!(clock.last_reset_at().await, Some(now));
    }
}
