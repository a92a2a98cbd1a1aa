use actix_web::{web, App, HttpServer};
use anyhow::Context;
use invoicer::config::{AppConfig, Config, LogFormat};
use invoicer::middleware::{route_not_found, RequestId};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Configuration validation failed")?;

    init_tracing(&config.app);

    tracing::info!("Starting invoicer");
    tracing::info!("Environment: {}", config.app.env);
    tracing::info!("Server binding to: {}", config.server.bind_address());

    let invoice_service = invoicer::build_invoice_service(&config.storage)
        .await
        .context("Failed to initialize invoice storage")?;

    // Start HTTP server
    let bind_address = config.server.bind_address();
    let server_config = config.server.clone();
    let server = HttpServer::new(move || {
        App::new()
            .wrap(server_config.cors())
            .wrap(RequestId)
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(invoice_service.clone()))
            .app_data(invoicer::json_config())
            .configure(invoicer::configure_routes)
            .default_service(web::to(route_not_found))
    })
    .workers(config.server.workers)
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .run();

    tracing::info!(
        workers = config.server.workers,
        "Server started at http://{}",
        bind_address
    );

    server.await.context("Server terminated with an error")
}

fn init_tracing(app: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("invoicer={},actix_web=info", app.log_level)));

    let registry = tracing_subscriber::registry().with(filter);

    match app.log_format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}
