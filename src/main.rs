//! Application entry point for the `agriflow` service.
//!
//! Startup sequence:
//! - Load `.env` and configuration from the environment
//! - Initialize structured logging/tracing
//! - Connect the PostgreSQL pool and ensure the reading table exists
//! - Mount the ingest, dashboard and health routes via the `routes` gateway
//! - Bind the Axum HTTP listener and serve
//!
//! # Environment Variables
//! - `DATABASE_URL` (**required**) – PostgreSQL connection string
//! - `LISTEN_PORT` (optional) – HTTP port (default: 8080)
//! - `AXUM_LOG_LEVEL` (optional) – log verbosity (default: `debug`)
//! - `AXUM_SPAN_EVENTS` (optional) – span event mode for tracing
//!
//! See [`agriflow::config`] for the full list.
use std::{env, net::SocketAddr};

use anyhow::Result;
use axum::Router;
use dotenvy::dotenv;
use is_terminal::IsTerminal;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

use agriflow::{config, config::mask_db_url, routes, schema};

// ---

#[tokio::main]
async fn main() -> Result<()> {
    // ---
    dotenv().ok();
    init_tracing();

    let cfg = config::load_from_env()?;
    cfg.log_config();

    let pool = PgPoolOptions::new()
        .max_connections(cfg.db_pool_max)
        .connect(&cfg.db_url)
        .await
        .map_err(|e| {
            anyhow::anyhow!(
                "Failed to connect to database '{}': {}",
                mask_db_url(&cfg.db_url),
                e
            )
        })?;

    tracing::info!("Connected to database");

    schema::create_schema(&pool).await?;

    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.listen_port));
    let app: Router = routes::router(pool, cfg);

    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ---

/// Install the global tracing subscriber.
///
/// - Colour: `FORCE_COLOR=1|true|yes` forces on, `0|false|no` forces off,
///   otherwise follows TTY detection on stdout.
/// - Span events (`AXUM_SPAN_EVENTS`): `full`, `enter_exit`, or CLOSE only.
/// - Level: `RUST_LOG` when set, else `AXUM_LOG_LEVEL` (default `debug`),
///   with sqlx query logging held at `warn`.
///
/// Call once, before any tracing macro fires.
fn init_tracing() {
    // ---
    let span_events = match env::var("AXUM_SPAN_EVENTS").as_deref() {
        Ok("full") => FmtSpan::FULL,
        Ok("enter_exit") => FmtSpan::ENTER | FmtSpan::EXIT,
        _ => FmtSpan::CLOSE,
    };

    let use_color = match env::var("FORCE_COLOR").as_deref() {
        Ok("1") | Ok("true") | Ok("yes") => true,
        Ok("0") | Ok("false") | Ok("no") => false,
        _ => std::io::stdout().is_terminal(),
    };

    let env_filter = if env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let level = match env::var("AXUM_LOG_LEVEL").ok().as_deref() {
            Some(level @ ("trace" | "debug" | "info" | "warn" | "error")) => level.to_string(),
            _ => "debug".to_string(),
        };
        EnvFilter::new(format!("{level},sqlx::query=warn"))
    };

    tracing_subscriber::fmt()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(span_events)
        .with_env_filter(env_filter)
        .with_ansi(use_color)
        .compact()
        .init();
}
