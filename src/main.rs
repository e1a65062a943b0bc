use sizechart::config::Config;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    // .env 不存在时直接使用系统环境变量
    let env_loaded = dotenv::dotenv().is_ok();

    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .filter_module("sizechart", log::LevelFilter::Info)
        .filter_module("sqlx", log::LevelFilter::Error)
        .filter_module("sea_orm", log::LevelFilter::Error)
        .init();

    if env_loaded {
        log::info!("✓ 已加载 .env");
    } else {
        log::info!("⚠ 未找到 .env，从系统环境变量读取配置");
    }

    let config = Config::from_env();
    sizechart::start_server(config).await
}
