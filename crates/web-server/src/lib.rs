use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use configuration::settings::Settings;
use core_types::AuthSession;
use datastore::ResultsRepository;
use grading_client::WebhookClient;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer, ExposeHeaders},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;

/// The shared application state that all handlers can access.
///
/// The operator session is a single explicit `AuthSession` value: created at
/// login, cleared at logout, and consulted by every gated handler. There is
/// deliberately no multi-user session table here.
pub struct AppState {
    pub repo: ResultsRepository,
    pub grader: WebhookClient,
    pub session: RwLock<AuthSession>,
    pub settings: Settings,
}

/// The main function to configure and run the web server.
pub async fn run_server(addr: SocketAddr, settings: Settings) -> anyhow::Result<()> {
    // Note: Tracing is already initialized in main.rs, so we don't need to
    // initialize it again here.

    dotenvy::dotenv().ok();
    let db_pool = datastore::connect().await?;
    let repo = ResultsRepository::new(db_pool);
    let grader = WebhookClient::new(&settings.grading)?;

    let app_state = Arc::new(AppState {
        repo,
        grader,
        session: RwLock::new(AuthSession::logged_out()),
        settings,
    });

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any())
        .expose_headers(ExposeHeaders::any());

    // --- DEFINE THE APPLICATION ROUTES ---
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route(
            "/api/session",
            post(handlers::login).delete(handlers::logout),
        )
        .route("/api/exams", get(handlers::get_exams))
        .route("/api/results", get(handlers::get_results))
        .route("/api/results/export/:format", get(handlers::export_results))
        .route("/api/gradings", post(handlers::submit_grading))
        .with_state(app_state)
        .layer(cors)
        // This middleware will automatically log information about every incoming request.
        .layer(TraceLayer::new_for_http())
        // Submitted exam photographs arrive base64-encoded in the JSON body.
        .layer(DefaultBodyLimit::max(1024 * 1024 * 50));

    tracing::info!("Web server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
