use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use carhub_core::cars::{CarService, CarServiceTrait};
use carhub_storage_sqlite::cars::{CarItemRepository, CarRepository};
use carhub_storage_sqlite::db;

use crate::config::Config;

pub struct AppState {
    pub car_service: Arc<dyn CarServiceTrait + Send + Sync>,
    pub db_path: String,
}

pub fn init_tracing() {
    let log_format = std::env::var("CARHUB_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = db::spawn_writer(pool.clone());

    let car_repository = Arc::new(CarRepository::new(pool.clone(), writer.clone()));
    let item_repository = Arc::new(CarItemRepository::new(pool, writer));
    let car_service: Arc<dyn CarServiceTrait + Send + Sync> =
        Arc::new(CarService::new(car_repository, item_repository));

    Ok(Arc::new(AppState {
        car_service,
        db_path,
    }))
}
