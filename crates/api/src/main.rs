use simplebank_api::app::{AppConfig, build_app, build_services};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    simplebank_observability::init();

    let config = AppConfig::from_env();
    let services = build_services(&config);
    let app = build_app(services);

    let listener = tokio::net::TcpListener::bind(&config.addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
