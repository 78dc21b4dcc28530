use axum::routing::get;
use axum_prometheus::PrometheusMetricLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use stellar_viewer::config::Config;
use stellar_viewer::{build_state, cors_layer, create_router};

#[tokio::main]
async fn main() {
    // Initialize tracing — JSON in production, human-readable in dev.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("stellar_viewer=info,tower_http=info"));

    if std::env::var("APP_ENV").as_deref() == Ok("production") {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    info!("🔭 Stellar Viewer starting...");

    let config = Config::from_env().expect("Failed to load configuration");
    info!(profile = ?config.profile, "📝 Configuration loaded");

    if config.profile.api_key.as_deref() == Some(stellar_viewer::upstream::profile::NASA_DEMO_KEY) {
        tracing::warn!("Using NASA's DEMO_KEY; set PICTURE_API_KEY for higher rate limits");
    }

    if config.is_dev {
        info!("🔓 CORS: permissive (dev mode)");
    } else if config.allowed_origins.is_empty() {
        tracing::warn!(
            "🔒 CORS: restrictive (production mode). \
             Cross-origin requests will be denied. \
             Set ALLOWED_ORIGINS to allow the viewer page's origin."
        );
    } else {
        info!(origins = ?config.allowed_origins, "🔒 CORS: restricted to ALLOWED_ORIGINS");
    }
    let cors = cors_layer(&config);

    let addr = config.server_addr();
    let state = build_state(&config).expect("Failed to build HTTP client");

    let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();

    let app = create_router(state)
        .route(
            "/metrics",
            get(move || async move { metric_handle.render() }),
        )
        .layer(prometheus_layer)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    info!("🎧 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .await
        .expect("Server failed to start");
}
