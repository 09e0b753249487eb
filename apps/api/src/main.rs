use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use jobmatch_api::config::Config;
use jobmatch_api::db::{create_pool, run_migrations};
use jobmatch_api::llm_client::{self, LlmClient};
use jobmatch_api::matching::scorer::KeywordJobMatcher;
use jobmatch_api::matching::JobMatcher;
use jobmatch_api::routes::build_router;
use jobmatch_api::state::AppState;
use jobmatch_api::storage::build_s3_client;

#[tokio::main]
async fn main() -> Result<()> {
    // Configuration first; fails fast on missing required env vars
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "jobmatch_api={},jobmatch_core={},tower_http={}",
                &config.rust_log, &config.rust_log, &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Match Your Job API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    run_migrations(&db).await?;

    // Initialize Redis (sessions)
    let redis = redis::Client::open(config.redis_url.clone())?;
    info!("Redis client initialized");

    // Initialize S3 / MinIO
    let s3 = build_s3_client(&config).await;
    info!("S3 client initialized (bucket: {})", config.s3_bucket);

    // Initialize LLM client
    let llm = LlmClient::new(config.anthropic_api_key.clone())?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let matcher: Arc<dyn JobMatcher> = Arc::new(KeywordJobMatcher);
    info!("Job matcher: {}", matcher.backend());

    if config.admin_token.is_none() {
        info!("ADMIN_TOKEN not set; job import is disabled");
    }

    let state = AppState {
        db,
        redis,
        s3,
        llm,
        config: config.clone(),
        matcher,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
