use actix_web::{middleware as actix_middleware, web, App, HttpServer};
use anyhow::Context;
use std::path::Path;
use std::time::Duration;
use tokio::time;

use blog_server::{
    auth_token::AuthTokenService, config::AppConfig, handlers, middleware::RateLimiter,
    store::BlogStore,
};

const DEFAULT_CONFIG_PATH: &str = "server/config/blog.toml";

fn load_config() -> anyhow::Result<AppConfig> {
    let mut config = match std::env::var("CONFIG_PATH") {
        Ok(path) => AppConfig::load_from_file(&path)
            .with_context(|| format!("failed to load configuration from '{}'", path))?,
        Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            AppConfig::load_from_file(DEFAULT_CONFIG_PATH).with_context(|| {
                format!("failed to load configuration from '{}'", DEFAULT_CONFIG_PATH)
            })?
        }
        Err(_) => {
            log::warn!(
                "No configuration file at '{}', using built-in defaults",
                DEFAULT_CONFIG_PATH
            );
            AppConfig::default()
        }
    };

    config
        .apply_env_overrides()
        .context("invalid environment override")?;
    Ok(config)
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if it exists (for development)
    // Try loading from current directory first, then from server/ directory
    if dotenvy::dotenv().is_err() {
        dotenvy::from_filename("server/.env").ok();
    }

    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    log::info!("Starting blog server...");

    let config = load_config()?;

    let auth_tokens = AuthTokenService::new(config.secret_bytes()?, config.auth.token_ttl())
        .context("invalid auth secret")?;
    log::info!("Access tokens expire after {} seconds", config.auth.token_ttl_secs);

    let store = BlogStore::new(config.seed_posts.clone());
    log::info!("Seeded {} posts", store.posts().len()?);

    let rate_limiter = RateLimiter::from_settings(&config.rate_limit);
    if rate_limiter.is_enabled() {
        log::info!(
            "Rate limiting /user routes to {} requests per {} seconds",
            config.rate_limit.max_requests,
            config.rate_limit.window_secs
        );

        let rate_limiter_clone = rate_limiter.clone();
        tokio::spawn(async move {
            let mut interval = time::interval(Duration::from_secs(300)); // Every 5 minutes
            loop {
                interval.tick().await;
                rate_limiter_clone.cleanup_old_entries();
                log::debug!("Background cleanup: cleaned rate limiter entries");
            }
        });
    } else {
        log::warn!("Rate limiting disabled");
    }

    let server_host = config.server.host.clone();
    let server_port = config.server.port;

    log::info!("Starting HTTP server at {}:{}...", server_host, server_port);

    HttpServer::new(move || {
        App::new()
            // Shared state
            .app_data(web::Data::new(store.clone()))
            .app_data(web::Data::new(auth_tokens.clone()))
            .app_data(web::Data::new(rate_limiter.clone()))
            // Middleware
            .wrap(actix_middleware::Logger::default())
            .wrap(actix_middleware::Compress::default())
            .configure(handlers::configure)
    })
    .bind((server_host, server_port))?
    .run()
    .await?;

    Ok(())
}
