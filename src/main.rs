use std::sync::{Arc, Mutex};

use axum::routing::{delete, get, patch, post, put};
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use fleetdesk::config::AppConfig;
use fleetdesk::db::{self, queries};
use fleetdesk::handlers;
use fleetdesk::models::{default_menu, Role, User};
use fleetdesk::services::credentials;
use fleetdesk::session::SessionStore;
use fleetdesk::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;

    // First boot: provision the admin account the front-end signs in with.
    if queries::count_users(&conn)? == 0 {
        let admin = User {
            id: uuid::Uuid::new_v4().to_string(),
            name: "Administrator".to_string(),
            email: config.bootstrap_admin_email.clone(),
            password_digest: credentials::password_digest(
                &config.auth_secret,
                &config.bootstrap_admin_password,
            ),
            role: Role::Admin,
            active: true,
        };
        queries::create_user(&conn, &admin)?;
        tracing::info!(email = %admin.email, "bootstrapped admin user");
    }

    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config: config.clone(),
        sessions: SessionStore::new(),
        menu: default_menu(),
    });

    let app = router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/logout", post(handlers::auth::logout))
        .route("/api/auth/me", get(handlers::auth::me))
        .route(
            "/api/auth/forgot-password",
            post(handlers::auth::forgot_password),
        )
        .route(
            "/api/auth/reset-password/:token",
            patch(handlers::auth::reset_password),
        )
        .route("/api/menu", get(handlers::menu::filtered_menu))
        .route("/api/appointments", get(handlers::appointments::list))
        .route("/api/appointments", post(handlers::appointments::create))
        .route("/api/appointments/:id", put(handlers::appointments::update))
        .route(
            "/api/appointments/:id",
            delete(handlers::appointments::delete),
        )
        .route(
            "/api/appointments/:id/start",
            post(handlers::appointments::start),
        )
        .route(
            "/api/appointments/:id/finish",
            post(handlers::appointments::finish),
        )
        .route(
            "/api/appointments/:id/cancel",
            post(handlers::appointments::cancel),
        )
        .route("/api/calendar/month", get(handlers::calendar::month))
        .route("/api/calendar/week", get(handlers::calendar::week))
        .route("/api/calendar/day", get(handlers::calendar::day))
        .route("/api/vehicles", get(handlers::vehicles::list))
        .route("/api/vehicles", post(handlers::vehicles::create))
        .route("/api/vehicles/:id", put(handlers::vehicles::update))
        .route("/api/vehicles/:id", delete(handlers::vehicles::delete))
        .route("/api/users", get(handlers::users::list))
        .route("/api/users", post(handlers::users::create))
        .route("/api/users/:id", put(handlers::users::update))
        .route("/api/users/:id", delete(handlers::users::delete))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
