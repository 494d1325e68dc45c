use axum::{
    extract::{Query, State},
    http::{header::HeaderValue, request::Parts, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::any::Any;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, Any as AnyHeader, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::api::*;
use crate::config::AppConfig;
use crate::error::ApiResult;
use crate::providers::*;

/// External collaborators shared by every request. None of them hold per-request state.
pub struct AppState {
    pub scanner: Arc<dyn ProfileScanner>,
    pub reputation: Arc<dyn ReputationProvider>,
    pub geolocation: Arc<dyn GeolocationProvider>,
    pub whois: Arc<dyn WhoisProvider>,
    pub resolver: Arc<dyn DnsResolver>,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            scanner: Arc::new(SherlockScanner::new(&config.sherlock)),
            reputation: Arc::new(EmailRepProvider::new(
                config.emailrep_base_url.clone(),
                config.emailrep_api_key.clone(),
                config.http_timeout,
            )),
            geolocation: Arc::new(IpWhoProvider::new(
                config.ipwho_base_url.clone(),
                config.http_timeout,
            )),
            whois: Arc::new(WhoisClient::new(&config.whois)),
            resolver: Arc::new(SystemResolver),
        }
    }
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

pub async fn sherlock_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UsernameQuery>,
) -> ApiResult<Json<UsernameLookup>> {
    let result = lookup_username(state.scanner.as_ref(), query.username.as_deref()).await?;
    Ok(Json(result))
}

pub async fn email_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<EmailQuery>,
) -> ApiResult<Json<EmailLookup>> {
    let result = lookup_email(state.reputation.as_ref(), query.email.as_deref()).await?;
    Ok(Json(result))
}

pub async fn domain_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DomainQuery>,
) -> ApiResult<Json<DomainLookup>> {
    let result = lookup_domain(
        state.resolver.as_ref(),
        state.whois.as_ref(),
        query.domain.as_deref(),
    )
    .await?;
    Ok(Json(result))
}

pub async fn ip_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<IpQuery>,
) -> ApiResult<Json<IpLookup>> {
    let result = lookup_ip(state.geolocation.as_ref(), query.ip.as_deref()).await?;
    Ok(Json(result))
}

async fn not_found_handler() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"error": "Endpoint not found"})),
    )
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    error!(%detail, "Handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"error": "Internal server error"})),
    )
        .into_response()
}

/// Matches an `Origin` header against configured origins. `https://*.example.app`
/// accepts any subdomain of `example.app` over https; `*` accepts everything.
pub fn origin_allowed(patterns: &[String], origin: &str) -> bool {
    patterns.iter().any(|pattern| {
        if pattern == "*" {
            return true;
        }
        match pattern.split_once("://*.") {
            Some((scheme, suffix)) => origin
                .strip_prefix(scheme)
                .and_then(|rest| rest.strip_prefix("://"))
                .map(|host| {
                    host.len() > suffix.len() + 1
                        && host.ends_with(suffix)
                        && host[..host.len() - suffix.len()].ends_with('.')
                })
                .unwrap_or(false),
            None => pattern == origin,
        }
    })
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let patterns = origins.to_vec();

    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _parts: &Parts| {
                origin
                    .to_str()
                    .map(|o| origin_allowed(&patterns, o))
                    .unwrap_or(false)
            },
        ))
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(AnyHeader)
}

pub fn create_router(state: Arc<AppState>, cors_origins: &[String]) -> Router {
    let api = Router::new()
        .route("/health", get(health_handler))
        .route("/sherlock", get(sherlock_handler))
        .route("/email", get(email_handler))
        .route("/domain", get(domain_handler))
        .route("/ip", get(ip_handler));

    Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api)
        .fallback(not_found_handler)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origins))
        .with_state(state)
}

pub async fn run_server(config: AppConfig) -> std::io::Result<()> {
    let state = Arc::new(AppState::from_config(&config));
    let app = create_router(state, &config.cors_origins);

    let addr = format!("{}:{}", config.bind_addr, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(%addr, "OSINT gateway listening");
    if config.emailrep_api_key.is_none() {
        info!("EMAILREP_API_KEY not set, reputation lookups are unauthenticated");
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}
