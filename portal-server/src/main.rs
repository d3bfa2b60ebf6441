use portal_server::{Config, ServerState};
use portal_server::utils::logger;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env();

    std::fs::create_dir_all(&config.work_dir)?;
    logger::init_logger_with_file(None, Some(&config.work_dir));

    tracing::info!(environment = %config.environment, "ThreadPoint portal server starting");

    let state = ServerState::initialize(config).await?;
    tracing::info!(
        db = %state.config.database_path,
        uploads = %state.config.upload_dir,
        "Portal core ready"
    );

    // The HTTP transport mounts on this state; keep the process alive
    // until interrupted.
    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down");
    Ok(())
}
