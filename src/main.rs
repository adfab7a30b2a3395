use axum::{
    routing::{get, patch, post},
    Router,
};
use roster_backend::{
    config::{get_config, init_config},
    database::pool::create_pool,
    routes, AppState,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    init_config()?;
    let config = get_config();

    let pool = create_pool().await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let app_state = AppState::new(pool);

    let base_routes = Router::new().route("/health", get(routes::health::health));

    let roster_api = Router::new()
        .route(
            "/api/roster/sessions",
            post(routes::roster_routes::create_session),
        )
        .route(
            "/api/roster/sessions/:id",
            get(routes::roster_routes::get_view).delete(routes::roster_routes::delete_session),
        )
        .route(
            "/api/roster/sessions/:id/filters",
            post(routes::roster_routes::apply_filters),
        )
        .route(
            "/api/roster/sessions/:id/refresh",
            post(routes::roster_routes::refresh_session),
        )
        .route(
            "/api/roster/sessions/:id/scroll",
            post(routes::roster_routes::scroll),
        )
        .route(
            "/api/roster/sessions/:id/candidates/:candidate_id/status",
            patch(routes::roster_routes::update_status),
        )
        .route(
            "/api/assignments",
            get(routes::assignment_routes::list_assignments)
                .post(routes::assignment_routes::create_assignment),
        )
        .layer(axum::middleware::from_fn_with_state(
            roster_backend::middleware::rate_limit::new_rps_state(config.roster_rps),
            roster_backend::middleware::rate_limit::rps_middleware,
        ));

    let app = base_routes
        .merge(roster_api)
        .with_state(app_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
