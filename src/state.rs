use crate::api::middleware::RateLimiter;
use crate::config::Config;
use crate::templates::DemoClock;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Config,
    pub rate_limiter: RateLimiter,
    pub demo: DemoClock,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(db: DatabaseConnection, config: Config) -> SharedState {
        let rate_limiter = RateLimiter::per_minute(config.rate_limit_per_minute);
        Arc::new(Self {
            db,
            config,
            rate_limiter,
            demo: DemoClock::default(),
        })
    }
}
