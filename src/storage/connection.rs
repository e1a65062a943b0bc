use crate::storage::entity::{
    ApiKey, Category, MeasurementInstruction, SizeChart, SizeChartCell, SizeChartColumn,
    SizeChartMeasurementInstruction, SizeChartRow, SizeChartSubcategory, SizeLabel, Subcategory,
};
use log::info;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, EntityTrait, Schema,
    Statement,
};
use std::time::Duration;

const UNIQUE_INDEXES: [&str; 4] = [
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_subcategories_category_slug ON subcategories(category_id, slug);",
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_size_chart_cells_row_column ON size_chart_cells(row_id, column_id);",
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_size_chart_subcategories_unique ON size_chart_subcategories(size_chart_id, subcategory_id);",
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_size_chart_instructions_unique ON size_chart_measurement_instructions(size_chart_id, instruction_id);",
];

pub async fn establish_connection(db_url: &str) -> Result<DatabaseConnection, DbErr> {
    let in_memory = db_url.contains(":memory:");
    let mut opt = ConnectOptions::new(db_url.to_owned());
    if in_memory {
        // 内存库每个连接都是独立的数据库，只能用单连接
        opt.max_connections(1).min_connections(1);
    } else {
        opt.max_connections(10)
            .min_connections(2)
            .connect_timeout(Duration::from_secs(8))
            .acquire_timeout(Duration::from_secs(8))
            .idle_timeout(Duration::from_secs(300));
    }
    opt.sqlx_logging(true)
        .sqlx_logging_level(log::LevelFilter::Debug);

    let db = Database::connect(opt).await?;

    if !in_memory {
        // 启用 WAL 模式
        db.execute(Statement::from_string(
            db.get_database_backend(),
            "PRAGMA journal_mode=WAL;".to_string(),
        ))
        .await?;
    }

    // 建表顺序：先父表后子表（外键）
    create_table(&db, Category).await?;
    create_table(&db, Subcategory).await?;
    create_table(&db, SizeLabel).await?;
    create_table(&db, MeasurementInstruction).await?;
    create_table(&db, SizeChart).await?;
    create_table(&db, SizeChartSubcategory).await?;
    create_table(&db, SizeChartColumn).await?;
    create_table(&db, SizeChartRow).await?;
    create_table(&db, SizeChartCell).await?;
    create_table(&db, SizeChartMeasurementInstruction).await?;
    create_table(&db, ApiKey).await?;

    for sql in UNIQUE_INDEXES {
        db.execute(Statement::from_string(
            db.get_database_backend(),
            sql.to_string(),
        ))
        .await?;
    }

    info!("数据库连接已建立，表结构初始化完成 ({})", db_url);

    Ok(db)
}

async fn create_table<E: EntityTrait>(db: &DatabaseConnection, entity: E) -> Result<(), DbErr> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);
    let stmt = builder.build(schema.create_table_from_entity(entity).if_not_exists());
    db.execute(stmt).await?;
    Ok(())
}
