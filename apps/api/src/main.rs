//! Velora API composition root.

#![forbid(unsafe_code)]

mod auth;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::sync::Arc;

use axum::Router;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{delete, get, post};
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tower_sessions::cookie::SameSite;
use tower_sessions::cookie::time::Duration;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;
use tracing::info;
use tracing_subscriber::EnvFilter;

use velora_application::{AuthorizationService, MediaService, RoleService, UserService};
use velora_core::AppError;
use velora_domain::RolePermissionMap;
use velora_infrastructure::{
    Argon2PasswordHasher, CloudinaryConfig, CloudinaryMediaHost, PostgresMediaRepository,
    PostgresRoleAdminRepository, PostgresUserRepository,
};

use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

    let database_url = required_env("DATABASE_URL")?;
    let frontend_url =
        env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned());

    let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
    let api_port = env::var("API_PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(3001);
    let cookie_secure = env::var("SESSION_COOKIE_SECURE")
        .unwrap_or_else(|_| "false".to_owned())
        .eq_ignore_ascii_case("true");

    let cloudinary_config = CloudinaryConfig {
        cloud_name: required_env("CLOUDINARY_CLOUD_NAME")?,
        api_key: required_env("CLOUDINARY_API_KEY")?,
        api_secret: required_env("CLOUDINARY_API_SECRET")?,
    };

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))?;

    sqlx::migrate!("../../crates/infrastructure/migrations")
        .run(&pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))?;

    if migrate_only {
        info!("database migrations applied successfully");
        return Ok(());
    }

    let session_store = PostgresStore::new(pool.clone())
        .with_table_name("tower_sessions")
        .map_err(|error| {
            AppError::Validation(format!("invalid session table name configuration: {error}"))
        })?;
    session_store.migrate().await.map_err(|error| {
        AppError::Internal(format!("failed to initialize session store: {error}"))
    })?;

    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(cookie_secure)
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_expiry(Expiry::OnInactivity(Duration::minutes(30)));

    let authorization_service =
        AuthorizationService::new(Arc::new(RolePermissionMap::builtin()));

    let role_repository = Arc::new(PostgresRoleAdminRepository::new(pool.clone()));
    let role_service = RoleService::new(role_repository, authorization_service.clone());

    let media_repository = Arc::new(PostgresMediaRepository::new(pool.clone()));
    let media_host = Arc::new(CloudinaryMediaHost::new(cloudinary_config)?);
    let media_service = MediaService::new(media_repository, media_host);

    let user_repository = Arc::new(PostgresUserRepository::new(pool.clone()));
    let password_hasher = Arc::new(Argon2PasswordHasher::new());
    let user_service = UserService::new(user_repository, password_hasher);

    let app_state = AppState {
        authorization_service,
        role_service,
        media_service,
        user_service,
        frontend_url: frontend_url.clone(),
    };

    let protected_routes = Router::new()
        .route("/auth/me", get(auth::me_handler))
        .route("/api/admin/users", get(handlers::admin::list_users_handler))
        .route(
            "/api/admin/{user_id}/role",
            get(handlers::admin::get_user_role_handler)
                .post(handlers::admin::assign_role_handler),
        )
        .route(
            "/api/admin/{user_id}/role-history",
            get(handlers::admin::role_history_handler),
        )
        .route(
            "/api/admin/{user_id}/validate-permission/{permission}",
            get(handlers::admin::validate_permission_handler),
        )
        .route(
            "/api/admin/bulk/assign-role",
            post(handlers::admin::bulk_assign_role_handler),
        )
        .route("/api/admin/search", get(handlers::admin::search_users_handler))
        .route(
            "/api/media-gallery",
            get(handlers::media::list_media_handler)
                .post(handlers::media::create_media_handler),
        )
        .route(
            "/api/media-gallery/bulk/delete",
            delete(handlers::media::bulk_delete_media_handler),
        )
        .route(
            "/api/media-gallery/{media_id}",
            get(handlers::media::get_media_handler)
                .put(handlers::media::update_media_handler)
                .delete(handlers::media::delete_media_handler),
        )
        .route_layer(from_fn(middleware::require_auth));

    let cors_layer = CorsLayer::new()
        .allow_origin(
            HeaderValue::from_str(&frontend_url)
                .map_err(|error| AppError::Internal(format!("invalid FRONTEND_URL: {error}")))?,
        )
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE]);

    let app = Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route("/api/roles", get(handlers::roles::list_roles_handler))
        .route("/auth/register", post(auth::register_handler))
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/logout", post(auth::logout_handler))
        .merge(protected_routes)
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_same_origin_for_mutations,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .layer(session_layer)
        .with_state(app_state);

    let host = IpAddr::from_str(&api_host)
        .map_err(|error| AppError::Internal(format!("invalid API_HOST '{api_host}': {error}")))?;
    let address = SocketAddr::from((host, api_port));

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "velora-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| AppError::Validation(format!("{name} must be set")))
}
