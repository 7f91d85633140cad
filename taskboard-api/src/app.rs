/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                   # Health check (public)
/// └── /api/
///     ├── /tasks                # Task CRUD (session auth + capability guard)
///     │   ├── GET    /          # List tasks (org:tasks:view)
///     │   ├── POST   /          # Create task (org:tasks:create)
///     │   ├── GET    /:id       # Get task (org:tasks:view)
///     │   ├── PUT    /:id       # Update task (org:tasks:edit)
///     │   └── DELETE /:id       # Delete task (org:tasks:delete)
///     └── /webhooks/clerk       # Subscription webhooks (signature-gated)
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Request logging (tower-http TraceLayer)
/// 2. CORS restricted to the configured frontend origin
/// 3. Session authentication (task routes only)

use crate::{config::Config, error::ApiError};
use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{delete, get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use taskboard_shared::auth::{guard::AuthContext, jwt};
use taskboard_shared::billing::policy::EntitlementPolicy;
use taskboard_shared::billing::sync::{LimitSynchronizer, MemberLimits};
use taskboard_shared::webhook::ingress::WebhookIngress;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor; the heavier
/// members sit behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Webhook ingress strategy (Verified or Trusting), fixed at startup
    pub ingress: Arc<WebhookIngress>,

    /// Subscription → member-limit policy
    pub policy: EntitlementPolicy,

    /// Pushes member limits to the identity provider
    pub limits: LimitSynchronizer,
}

impl AppState {
    /// Creates new application state
    ///
    /// The webhook ingress mode follows the configuration: a configured
    /// endpoint secret selects verified mode, absence selects trusting mode
    /// (and is loudly logged, since it must never run in a deployed
    /// environment).
    ///
    /// # Errors
    ///
    /// Returns an error if the configured webhook secret cannot be decoded.
    pub fn new(
        db: PgPool,
        config: Config,
        provider: Arc<dyn MemberLimits>,
    ) -> Result<Self, ApiError> {
        let ingress = WebhookIngress::from_secret(config.clerk.webhook_secret.as_deref())
            .map_err(|e| ApiError::InternalError(format!("Invalid webhook secret: {}", e)))?;

        if !ingress.is_verified() {
            tracing::warn!(
                "Webhook signature verification is DISABLED; do not run this in production"
            );
        }

        let policy = EntitlementPolicy::new(
            config.billing.pro_tier_slug.clone(),
            config.billing.free_tier_limit,
        );

        Ok(Self {
            db,
            config: Arc::new(config),
            ingress: Arc::new(ingress),
            policy,
            limits: LimitSynchronizer::new(provider),
        })
    }

    /// Gets the session token secret
    pub fn session_secret(&self) -> &str {
        &self.config.auth.session_jwt_secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Example
///
/// ```no_run
/// use taskboard_api::app::{build_router, AppState};
/// use taskboard_api::config::Config;
/// use taskboard_shared::clerk::ClerkClient;
/// use sqlx::PgPool;
/// use std::sync::Arc;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let clerk = Arc::new(ClerkClient::new(config.clerk.secret_key.clone())?);
/// let state = AppState::new(pool, config, clerk)?;
///
/// let app = build_router(state);
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Task routes (require session authentication; each handler applies its
    // own capability check)
    let task_routes = Router::new()
        .route("/", get(routes::tasks::list_tasks))
        .route("/", post(routes::tasks::create_task))
        .route("/:id", get(routes::tasks::get_task))
        .route("/:id", put(routes::tasks::update_task))
        .route("/:id", delete(routes::tasks::delete_task))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            session_auth_layer,
        ));

    // Webhook routes (public; authenticity comes from the signature check)
    let webhook_routes = Router::new().route("/clerk", post(routes::webhooks::clerk_webhook));

    let api_routes = Router::new()
        .nest("/tasks", task_routes)
        .nest("/webhooks", webhook_routes);

    // CORS: only the configured frontend origin may call this API from a
    // browser, with credentials allowed
    let cors = match state.config.api.frontend_origin.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true),
        Err(_) => {
            tracing::warn!(
                origin = %state.config.api.frontend_origin,
                "Invalid FRONTEND_ORIGIN; falling back to a same-origin-only CORS policy"
            );
            CorsLayer::new()
        }
    };

    Router::new()
        .merge(health_routes)
        .nest("/api", api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// Session authentication middleware layer
///
/// Extracts and validates the Bearer session token, builds the per-request
/// [`AuthContext`], and injects it into request extensions. Requests without
/// a resolvable identity never reach a handler.
async fn session_auth_layer(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::BadRequest("Expected Bearer token".to_string()))?;

    let claims = jwt::validate_session_token(token, state.session_secret())?;

    // Fails when the token carries no active organization: such callers
    // cannot reach organization-scoped data.
    let auth_context = AuthContext::from_claims(claims)?;

    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}
