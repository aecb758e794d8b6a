//! HTTP server for the attendance engine.
//!
//! Usage: `attendance-engine [CONFIG_PATH]`. The path falls back to
//! `ATTENDANCE_CONFIG`, then `./config/attendance.yaml`.

use std::env;

use attendance_engine::api::{create_router, AppState};
use attendance_engine::config::ConfigLoader;
use tracing::{info, Level};

const DEFAULT_CONFIG_PATH: &str = "./config/attendance.yaml";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = env::args()
        .nth(1)
        .or_else(|| env::var("ATTENDANCE_CONFIG").ok())
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = ConfigLoader::load(&config_path)?;

    let level: Level = config.log_level().parse().unwrap_or(Level::INFO);
    tracing_subscriber::fmt().with_max_level(level).init();

    let perimeter = config.perimeter();
    info!(
        config = %config_path,
        latitude = perimeter.center().latitude,
        longitude = perimeter.center().longitude,
        radius_meters = perimeter.radius_meters(),
        "Configuration loaded"
    );

    let app = create_router(AppState::from_config(&config));
    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    info!(address = %config.bind_address(), "Attendance engine listening");
    axum::serve(listener, app).await?;

    Ok(())
}
