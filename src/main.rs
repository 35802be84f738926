//! CosmicHub server binary.
//!
//! Loads configuration, wires the PostgreSQL and Stripe adapters into the
//! HTTP layer, and serves the API.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use cosmichub::adapters::http::{api_router, ApiState};
use cosmichub::adapters::postgres::{
    PostgresCreditLedger, PostgresReferralStore, PostgresSubscriptionRepository,
    PostgresUnlockStore,
};
use cosmichub::adapters::stripe::{StripeConfig, StripePaymentAdapter, UnavailablePaymentProvider};
use cosmichub::config::AppConfig;
use cosmichub::ports::PaymentProvider;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("fatal: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config.server.log_level);

    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .connect(&config.database.url)
        .await?;

    if config.database.run_migrations {
        tracing::info!("running database migrations");
        sqlx::migrate!("./migrations").run(&pool).await?;
    }

    let payment_provider: Arc<dyn PaymentProvider> = match config.payment.validate() {
        Ok(()) => {
            tracing::info!(
                test_mode = config.payment.is_test_mode(),
                "payment provider configured"
            );
            Arc::new(StripePaymentAdapter::new(
                StripeConfig::new(
                    config.payment.stripe_api_key.clone(),
                    config.payment.stripe_webhook_secret.clone(),
                )
                .with_require_livemode(config.payment.require_livemode),
            ))
        }
        Err(err) => {
            // Payment features degrade; everything else keeps working.
            tracing::error!(error = %err, "payment configuration invalid, payments disabled");
            Arc::new(UnavailablePaymentProvider)
        }
    };

    let state = ApiState {
        ledger: Arc::new(PostgresCreditLedger::new(pool.clone())),
        referrals: Arc::new(PostgresReferralStore::new(pool.clone())),
        subscriptions: Arc::new(PostgresSubscriptionRepository::new(pool.clone())),
        unlock_store: Arc::new(PostgresUnlockStore::new(pool)),
        payment_provider,
    };

    let app = Router::new()
        .merge(api_router())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(cors_layer(&config.server.cors_origins_list()));

    let addr = config.server.socket_addr()?;
    tracing::info!(%addr, "starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(directives: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(directives))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let parsed: Vec<http::HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    CorsLayer::new()
        .allow_origin(parsed)
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any)
}
