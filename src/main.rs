use axum::http::HeaderValue;
use axum::{routing::get, routing::post, Router};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use venture_api::config;
use venture_api::database::manager::DatabaseManager;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "venture_api=info,tower_http=info".into()),
        )
        .init();

    let config = config::config();
    tracing::info!("Starting venture-api in {:?} mode", config.environment);

    if let Err(e) = DatabaseManager::migrate().await {
        panic!("failed to run database migrations: {}", e);
    }

    let app = app();

    let port = std::env::var("PORT").ok().and_then(|s| s.parse::<u16>().ok()).unwrap_or(5000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("venture-api listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app() -> Router {
    let mut router = Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(auth_routes())
        .merge(business_routes())
        .layer(TraceLayer::new_for_http());

    if config::config().security.enable_cors {
        router = router.layer(cors_layer());
    }

    router
}

fn auth_routes() -> Router {
    use venture_api::handlers::protected::auth as protected;
    use venture_api::handlers::public::auth as public;

    Router::new()
        // Token acquisition (public)
        .route("/api/auth/register", post(public::register_post))
        .route("/api/auth/login", post(public::login_post))
        // Account management (token required, via extractors)
        .route("/api/auth/me", get(protected::me_get).put(protected::me_put))
        .route("/api/auth/change-password", post(protected::change_password_post))
        .route("/api/auth/logout", post(protected::logout_post))
}

fn business_routes() -> Router {
    use venture_api::handlers::business;

    Router::new()
        // Public directory; creation requires a token
        .route("/api/business", get(business::list::list_get).post(business::create::business_post))
        .route("/api/business/stats/overview", get(business::stats::stats_get))
        // Owner-only shortcut to the caller's profile
        .route("/api/business/me", get(business::me::me_get))
        // Single profile: read honors visibility, writes require ownership
        .route(
            "/api/business/:id",
            get(business::show::show_get)
                .put(business::update::business_put)
                .delete(business::delete::business_delete),
        )
        .route("/api/business/:id/income", post(business::income::income_post))
        .route("/api/business/:id/funders", post(business::funders::funders_post))
}

fn cors_layer() -> CorsLayer {
    let origins: Vec<HeaderValue> = config::config()
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new().allow_origin(origins).allow_methods(Any).allow_headers(Any)
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Venture API",
            "version": version,
            "description": "Entrepreneur support platform - business profiles, income tracking and funder records",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "auth": "/api/auth/register, /api/auth/login (public - token acquisition)",
                "account": "/api/auth/me, /api/auth/change-password, /api/auth/logout (protected)",
                "directory": "/api/business (public listing), /api/business/stats/overview (public)",
                "business": "/api/business/me, /api/business/:id[/income|/funders] (protected)",
            }
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
