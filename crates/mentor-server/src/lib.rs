//! Mentor Web Server
//!
//! Axum-based REST API for the Mentor financial guidance app.
//!
//! The app is single-user by design: sessions live in memory and carry all
//! state. Security posture:
//! - Restrictive CORS policy
//! - Input validation with sanitized error responses
//! - Security headers on every response

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::{
    cors::CorsLayer, services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};
use tracing::{error, info, warn};

use mentor_core::advisor::{AdvisorBackend, AdvisorClient};
use mentor_core::session::SessionManager;

mod handlers;

/// Server configuration
#[derive(Clone, Default)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
    /// Directory for legacy progress files (None disables persistence)
    pub progress_dir: Option<PathBuf>,
}

/// Shared application state
pub struct AppState {
    pub sessions: SessionManager,
    /// Optional advisor client; None means metric-only mode
    pub advisor: Option<AdvisorClient>,
    pub config: ServerConfig,
}

/// Success response
#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Create the application router
pub fn create_router(static_dir: Option<&str>, config: ServerConfig) -> Router {
    let advisor = AdvisorClient::from_env();
    match advisor {
        Some(ref client) => {
            info!(model = client.model(), "Advisor backend configured");
        }
        None => {
            info!("Advisor backend not configured (set GOOGLE_API_KEY); running in metric-only mode");
        }
    }
    create_router_with_options(static_dir, config, advisor)
}

/// Create the application router with an explicit advisor (for testing)
pub fn create_router_with_options(
    static_dir: Option<&str>,
    config: ServerConfig,
    advisor: Option<AdvisorClient>,
) -> Router {
    let state = Arc::new(AppState {
        sessions: SessionManager::new(),
        advisor,
        config: config.clone(),
    });

    let api_routes = Router::new()
        // Status
        .route("/status", get(handlers::get_status))
        // Sessions
        .route("/sessions", post(handlers::create_session))
        .route(
            "/sessions/:id",
            get(handlers::get_session).delete(handlers::delete_session),
        )
        // Profile intake
        .route("/sessions/:id/profile/income", post(handlers::set_income))
        .route(
            "/sessions/:id/profile/extra-income",
            post(handlers::add_extra_income),
        )
        .route(
            "/sessions/:id/profile/expenses",
            post(handlers::add_expense).delete(handlers::remove_expense),
        )
        .route("/sessions/:id/profile/debts", post(handlers::add_debt))
        .route(
            "/sessions/:id/profile/debts/:name",
            axum::routing::delete(handlers::remove_debt),
        )
        .route("/sessions/:id/profile/goals", post(handlers::add_goal))
        .route(
            "/sessions/:id/profile/goals/:name",
            axum::routing::delete(handlers::remove_goal),
        )
        // Guided diagnostic
        .route(
            "/sessions/:id/diagnostic/start",
            post(handlers::start_diagnostic),
        )
        .route(
            "/sessions/:id/diagnostic/complete",
            post(handlers::complete_diagnostic),
        )
        // Analysis
        .route("/sessions/:id/dashboard", get(handlers::get_dashboard))
        .route(
            "/sessions/:id/health-snapshot",
            get(handlers::get_health_snapshot),
        )
        .route("/sessions/:id/payoff", get(handlers::get_payoff))
        .route("/sessions/:id/strategy", get(handlers::get_strategy))
        .route(
            "/sessions/:id/expenses/chart",
            get(handlers::get_expense_chart),
        )
        // Advisor
        .route("/sessions/:id/advice", post(handlers::request_advice))
        .route(
            "/sessions/:id/advice/history",
            get(handlers::get_advice_history),
        )
        .route("/sessions/:id/tip", post(handlers::request_tip))
        .route(
            "/sessions/:id/negotiation",
            post(handlers::request_negotiation),
        )
        .route("/sessions/:id/glossary", post(handlers::explain_term))
        // Challenges
        .route(
            "/sessions/:id/challenges",
            get(handlers::list_challenges),
        )
        .route(
            "/sessions/:id/challenges/propose",
            post(handlers::propose_challenge),
        )
        .route(
            "/sessions/:id/challenges/accept",
            post(handlers::accept_challenge),
        )
        .route(
            "/sessions/:id/challenges/:index/complete",
            post(handlers::complete_challenge),
        )
        .route(
            "/sessions/:id/challenges/:index",
            axum::routing::delete(handlers::abandon_challenge),
        )
        // Gamification progress
        .route("/sessions/:id/progress", get(handlers::get_progress))
        // Education
        .route("/education/modules", get(handlers::list_modules))
        .route("/education/tips", get(handlers::list_tips))
        .route(
            "/sessions/:id/education/:index/open",
            post(handlers::open_module),
        )
        .route(
            "/sessions/:id/education/:index/complete",
            post(handlers::complete_module),
        );

    // Build CORS layer
    let cors = if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
    };

    let csp_value = HeaderValue::from_static(
        "default-src 'self'; script-src 'self'; style-src 'self' 'unsafe-inline'; img-src 'self' blob: data:; font-src 'self'; connect-src 'self'; frame-ancestors 'none'",
    );

    let mut app = Router::new()
        .nest("/api", api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            csp_value,
        ));

    // Serve static files if directory provided
    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app
}

/// Start the server
pub async fn serve(
    host: &str,
    port: u16,
    static_dir: Option<&str>,
    config: ServerConfig,
) -> anyhow::Result<()> {
    check_advisor_connection().await;

    let app = create_router(static_dir, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Check and log advisor backend connection status
async fn check_advisor_connection() {
    match AdvisorClient::from_env() {
        Some(client) => {
            if client.health_check().await {
                info!(model = client.model(), "Advisor backend connected");
            } else {
                warn!(
                    model = client.model(),
                    "Advisor backend configured but not responding"
                );
            }
        }
        None => {
            info!("Advisor backend not configured (set GOOGLE_API_KEY); running in metric-only mode");
        }
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn not_found(msg: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn internal(msg: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.to_string(),
            internal: None,
        }
    }
}

impl From<mentor_core::Error> for AppError {
    fn from(err: mentor_core::Error) -> Self {
        match err {
            mentor_core::Error::InvalidData(msg) => Self::bad_request(&msg),
            mentor_core::Error::NotFound(msg) => Self::not_found(&msg),
            mentor_core::Error::Session(msg) => Self::not_found(&msg),
            other => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                // Return generic message to client
                message: "Ocorreu um erro interno".to_string(),
                // Keep full error for logging
                internal: Some(other.into()),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

#[cfg(test)]
mod tests;
