use actix_web::{dev::Service, web, App, HttpServer};
use anyhow::Context;
use livestream_service::config::{Config, DatabaseConfig, LogFormat};
use livestream_service::handlers::{self, AppState};
use livestream_service::metrics;
use livestream_service::repository::{InMemoryStreamStore, PgStreamStore, StreamStore};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,actix_web=info".into());

    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_thread_ids(true)
                    .with_line_number(true)
                    .with_file(true)
                    .with_target(true),
            )
            .init(),
        LogFormat::Text => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init(),
    }
}

async fn connect_store(database: &DatabaseConfig) -> anyhow::Result<Arc<dyn StreamStore>> {
    let pool = PgPoolOptions::new()
        .max_connections(database.max_connections)
        .min_connections(database.min_connections)
        .acquire_timeout(Duration::from_secs(database.acquire_timeout_secs))
        .connect(&database.url)
        .await
        .context("Failed to connect to PostgreSQL")?;

    if database.run_migrations {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run database migrations")?;
        tracing::info!("Database migrations applied");
    }

    Ok(Arc::new(PgStreamStore::new(pool)))
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Config is loaded before logging so LOG_FORMAT can pick the formatter
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration loading failed: {:#}", e);
            std::process::exit(1);
        }
    };
    init_tracing(config.app.log_format);

    tracing::info!(
        env = %config.app.env,
        host = %config.app.host,
        port = config.app.http_port,
        "Starting livestream-service"
    );

    let store: Arc<dyn StreamStore> = match &config.database {
        Some(database) => {
            tracing::info!(?database, "Using PostgreSQL stream store");
            connect_store(database).await?
        }
        None => {
            if config.is_production() {
                anyhow::bail!("DATABASE_URL must be set in production");
            }
            tracing::warn!("DATABASE_URL not set; using in-memory stream store");
            Arc::new(InMemoryStreamStore::new())
        }
    };

    let state = web::Data::new(AppState::new(store));
    let bind_addr = (config.app.host.clone(), config.app.http_port);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(TracingLogger::default())
            .wrap_fn(|req, srv| {
                let method = req.method().to_string();
                let path = req
                    .match_pattern()
                    .map(|p| p.to_string())
                    .unwrap_or_else(|| req.path().to_string());
                let start = Instant::now();

                let fut = srv.call(req);
                async move {
                    match fut.await {
                        Ok(res) => {
                            metrics::observe_http_request(
                                &method,
                                &path,
                                res.status().as_u16(),
                                start.elapsed(),
                            );
                            Ok(res)
                        }
                        Err(err) => {
                            metrics::observe_http_request(&method, &path, 500, start.elapsed());
                            Err(err)
                        }
                    }
                }
            })
            .configure(handlers::configure)
    })
    .bind(bind_addr)
    .context("Failed to bind HTTP server")?
    .run()
    .await
    .context("HTTP server error")?;

    tracing::info!("livestream-service stopped");
    Ok(())
}
