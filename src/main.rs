use actix_web::{web, App, HttpServer};
use clap::Parser;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt, Layer};

mod api;
mod auth;
mod cmd;
mod config;
mod db;
mod shutdown;

use crate::api::{
    auth::handlers::auth_config, auth::AuthService, health::health_config,
    job::handlers::job_config, job::JobService, validation,
};
use crate::auth::{Authentication, RateLimiter, TokenManager};
use crate::cmd::{Cli, Command};
use crate::shutdown::ShutdownCoordinator;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let cli = Cli::parse();

    // Load configuration from environment
    let config::Config {
        database_url,
        bind_addr,
        jwt_secret,
        jwt_lifetime_hours,
        demo_user_email,
        max_db_connections,
        max_payload_size,
        log_dir,
        auth_rate_limit,
        auth_rate_window_secs,
    } = config::Config::from_env().expect("Failed to load configuration");

    // Create logs directory if it doesn't exist
    std::fs::create_dir_all(&log_dir).expect("Failed to create logs directory");

    // Initialize file-based logging with daily rotation and level separation
    // Log files will be created as: logs/info.2024-12-22.log, logs/error.2024-12-22.log, etc.
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());

    // Create daily rotating file appenders for each log level
    let info_file = tracing_appender::rolling::daily(&log_dir, "info.log");
    let warn_file = tracing_appender::rolling::daily(&log_dir, "warn.log");
    let error_file = tracing_appender::rolling::daily(&log_dir, "error.log");
    let debug_file = tracing_appender::rolling::daily(&log_dir, "debug.log");

    // Create layers for each log level
    let info_layer = tracing_subscriber::fmt::layer()
        .with_writer(info_file)
        .with_ansi(false)
        .with_filter(LevelFilter::INFO);

    let warn_layer = tracing_subscriber::fmt::layer()
        .with_writer(warn_file)
        .with_ansi(false)
        .with_filter(LevelFilter::WARN);

    let error_layer = tracing_subscriber::fmt::layer()
        .with_writer(error_file)
        .with_ansi(false)
        .with_filter(LevelFilter::ERROR);

    let debug_layer = tracing_subscriber::fmt::layer()
        .with_writer(debug_file)
        .with_ansi(false)
        .with_filter(LevelFilter::DEBUG);

    // Create console/stdout layer for terminal output
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true);

    // Initialize the subscriber with all layers (including console)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer) // Add console output
        .with(info_layer)
        .with(warn_layer)
        .with(error_layer)
        .with(debug_layer)
        .init();

    // Get database connection pool
    let pool = db::connection::get_connection(&database_url, max_db_connections)
        .await
        .expect("Failed to connect to database");

    // Subcommands run against the migrated schema and exit
    match cli.command {
        Some(Command::Migrate) => {
            db::migrations::run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");
            pool.close().await;
            return Ok(());
        }
        Some(Command::Seed(args)) => {
            db::migrations::run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");
            cmd::seed::run(&pool, &args).await.expect("Seeding failed");
            pool.close().await;
            return Ok(());
        }
        None => {}
    }

    // No command provided - start the server
    info!("Starting job-tracker application");
    info!("Configuration loaded successfully:");
    info!("  - Bind address: {}", bind_addr);
    info!("  - Max payload size: {} bytes", max_payload_size);
    info!("  - Max database connections: {}", max_db_connections);
    info!(
        "  - Auth rate limit: {} requests per {} seconds",
        auth_rate_limit, auth_rate_window_secs
    );
    info!("Database connection pool established");

    // Run migrations on startup (auto-migrate when starting server)
    db::migrations::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    // Token manager and rate limiter are shared by all server workers
    let tokens = TokenManager::new(&jwt_secret, jwt_lifetime_hours);
    let rate_limiter = web::Data::new(RateLimiter::new(
        auth_rate_limit,
        Duration::from_secs(auth_rate_window_secs),
    ));

    // Clone pool for HTTP server (original will be used for shutdown)
    let server_pool = pool.clone();

    let server = HttpServer::new(move || {
        // Create services with the shared database pool
        let job_service = web::Data::new(JobService::new(server_pool.clone()));
        let auth_service = web::Data::new(AuthService::new(
            server_pool.clone(),
            tokens.clone(),
            demo_user_email.clone(),
        ));
        let authentication = Authentication::new(tokens.clone());

        // Configure payload size limits globally
        let payload_config = web::PayloadConfig::default().limit(max_payload_size);

        App::new()
            .app_data(web::Data::new(server_pool.clone())) // Share DB pool across workers
            .app_data(job_service) // Inject JobService
            .app_data(auth_service) // Inject AuthService
            .app_data(rate_limiter.clone()) // One limiter for every worker
            .app_data(payload_config) // Global payload size limit
            .app_data(validation::json_config()) // Global validation config
            .configure(health_config) // Health check endpoints
            .configure(|cfg| job_config(cfg, authentication.clone()))
            .configure(|cfg| auth_config(cfg, authentication))
    });

    info!("Server starting on http://{}", bind_addr);

    // Bind and start the server
    let server = server.bind(bind_addr.as_str())?.run();

    // Get server handle for graceful shutdown
    let server_handle = server.handle();

    // Spawn server in background
    let server_task = tokio::spawn(server);

    // Create shutdown coordinator and wait for shutdown signal
    let coordinator = ShutdownCoordinator::new(server_handle, server_task, pool);

    coordinator.wait_for_shutdown().await
}
