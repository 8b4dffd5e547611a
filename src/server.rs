//! HTTP server bootstrap for the AdNet gateway.
//!
//! This module wires together:
//! - configuration
//! - database connection pool
//! - the token service, policy table, and ownership resolver
//! - the Axum router

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use chrono::Duration;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

use crate::auth::{
    default_rules, AuthorizationGate, OwnershipResolver, PolicyMode, PolicyRules, PolicyTable,
    TokenService,
};
use crate::domain::ResourceKind;
use crate::infra::{OwnerDirectory, PgOwnerDirectory, PgUserDirectory, UserDirectory};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Server listen address.
    pub listen_addr: SocketAddr,
    /// Maximum database connections.
    pub max_connections: u32,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgres://localhost/adnet".to_string());

        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let listen_addr: SocketAddr = format!("{host}:{port}")
            .parse()
            .expect("Invalid listen address");

        let max_connections: u32 = std::env::var("MAX_DB_CONNECTIONS")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(10);

        Self {
            database_url,
            listen_addr,
            max_connections,
        }
    }
}

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub gate: Arc<AuthorizationGate>,
    pub resolver: Arc<OwnershipResolver>,
    pub users: Arc<dyn UserDirectory>,
    pub owners: Arc<dyn OwnerDirectory>,
}

/// Assemble the authorization gate from environment configuration.
///
/// Startup fails without a signing secret; a gateway that cannot verify
/// tokens has nothing to protect with.
pub fn gate_from_env() -> anyhow::Result<AuthorizationGate> {
    let secret = std::env::var("JWT_SECRET")
        .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set; refusing to start without a signing secret"))?;

    let issuer = std::env::var("JWT_ISSUER").unwrap_or_else(|_| "adnet-gateway".to_string());

    let ttl_secs: i64 = std::env::var("TOKEN_TTL_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(86_400);

    let mode = match std::env::var("AUTH_DEFAULT") {
        Ok(value) => PolicyMode::parse(value.trim()).ok_or_else(|| {
            anyhow::anyhow!("AUTH_DEFAULT must be \"allow\" or \"deny\", got {value:?}")
        })?,
        Err(_) => PolicyMode::default(),
    };

    let rules = match std::env::var("POLICY_FILE") {
        Ok(path) => {
            let raw = std::fs::read_to_string(&path)
                .map_err(|e| anyhow::anyhow!("failed to read POLICY_FILE {path}: {e}"))?;
            let rules: PolicyRules = serde_json::from_str(&raw)
                .map_err(|e| anyhow::anyhow!("failed to parse POLICY_FILE {path}: {e}"))?;
            info!("Policy loaded from {path}");
            rules
        }
        Err(_) => {
            info!("POLICY_FILE not set, using built-in policy");
            default_rules()
        }
    };

    let tokens = TokenService::new(secret.as_bytes(), &issuer, Duration::seconds(ttl_secs));
    let policy = PolicyTable::from_rules(mode, rules);
    info!(
        "Endpoint policy: {} entries, unlisted endpoints {}",
        policy.len(),
        match policy.mode() {
            PolicyMode::AllowUnlisted => "allowed",
            PolicyMode::DenyUnlisted => "denied",
        }
    );

    Ok(AuthorizationGate::new(tokens, policy))
}

/// Start the HTTP server.
pub async fn run() -> anyhow::Result<()> {
    init_tracing();

    info!("Starting AdNet gateway v{}", env!("CARGO_PKG_VERSION"));

    let gate = Arc::new(gate_from_env()?);

    // Load configuration
    let config = Config::from_env();
    info!("Configuration loaded");
    info!("  Listen address: {}", config.listen_addr);
    info!("  Max connections: {}", config.max_connections);

    // Connect to PostgreSQL
    info!("Connecting to PostgreSQL...");
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;
    info!("Connected to PostgreSQL");

    let migrate_on_startup = std::env::var("DB_MIGRATE_ON_STARTUP")
        .ok()
        .map(|v| {
            !matches!(
                v.trim().to_ascii_lowercase().as_str(),
                "0" | "false" | "off"
            )
        })
        .unwrap_or(true);
    if migrate_on_startup {
        info!("Running database migrations...");
        crate::migrations::run_postgres(&pool).await?;
        info!("Database migrations applied");
    } else {
        info!("DB migrations skipped (DB_MIGRATE_ON_STARTUP=0)");
    }

    let owners: Arc<dyn OwnerDirectory> = Arc::new(PgOwnerDirectory::new(pool.clone()));
    let users: Arc<dyn UserDirectory> = Arc::new(PgUserDirectory::new(pool));

    let state = AppState {
        gate,
        resolver: Arc::new(OwnershipResolver::new(owners.clone())),
        users,
        owners,
    };

    // Build router
    let app = build_router()?.with_state(state);

    // Start server
    info!("Starting HTTP server on {}", config.listen_addr);
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;

    info!("AdNet gateway is ready to accept connections");
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(Level::INFO.to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .init();
}

/// Build the full router; state is attached by the caller.
pub fn build_router() -> anyhow::Result<Router<AppState>> {
    let mut router = Router::new()
        .merge(crate::api::router())
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .layer(TraceLayer::new_for_http());

    if let Some(cors_layer) = cors_layer_from_env()? {
        router = router.layer(cors_layer);
    }

    Ok(router)
}

fn cors_layer_from_env() -> anyhow::Result<Option<CorsLayer>> {
    let origins = match std::env::var("CORS_ALLOW_ORIGINS") {
        Ok(v) => v,
        Err(_) => return Ok(None),
    };

    let origins = origins.trim();
    if origins.is_empty() {
        return Ok(None);
    }

    let allow_origin = if origins == "*" {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = origins
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<HeaderValue>()
                    .map_err(|e| anyhow::anyhow!("Invalid CORS origin {s:?}: {e}"))
            })
            .collect::<anyhow::Result<_>>()?;
        AllowOrigin::list(origins)
    };

    Ok(Some(
        CorsLayer::new()
            .allow_origin(allow_origin)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([
                axum::http::header::AUTHORIZATION,
                axum::http::header::CONTENT_TYPE,
            ]),
    ))
}

/// Health check endpoint.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "healthy",
        "service": "adnet-gateway",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Readiness check endpoint.
async fn readiness_check(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Result<axum::Json<serde_json::Value>, (axum::http::StatusCode, String)> {
    // Check database connectivity with a harmless owner lookup.
    match state.owners.lookup_owner(ResourceKind::User, 0).await {
        Ok(_) => Ok(axum::Json(serde_json::json!({
            "status": "ready",
            "database": "connected",
        }))),
        Err(e) => Err((
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            format!("Database unavailable: {}", e),
        )),
    }
}
