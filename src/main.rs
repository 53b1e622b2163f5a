use std::sync::Arc;

use anyhow::Context;
use axum::http::{header::CONTENT_TYPE, HeaderValue, Method};
use axum::response::IntoResponse;
use tokio::net::TcpListener;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

use tradeportal_backend::{
    config::Config,
    db::{in_memory_user_repository::InMemoryUserRepository, user_repository::UserRepository},
    responses::JsonResponse,
    routes,
    utils::session_token::{SessionCodec, SessionKeys},
    AppState,
};

#[cfg(feature = "tls")]
use axum_server::tls_rustls::RustlsConfig;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("invalid configuration")?;
    init_tracing();

    let keys = SessionKeys::from_env().context("session secret rejected")?;
    let sessions = Arc::new(SessionCodec::new(keys));

    let user_repo = if config.seed_demo_users {
        InMemoryUserRepository::with_demo_users()
            .map_err(|e| anyhow::anyhow!("failed to seed demo users: {e}"))?
    } else {
        InMemoryUserRepository::new()
    };
    let user_repo = Arc::new(user_repo) as Arc<dyn UserRepository>;

    // Stricter limiter for /api/auth/*
    let auth_governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(config.auth_rate_limit_seconds)
            .burst_size(config.auth_rate_limit_burst)
            .use_headers()
            .error_handler(|_err| {
                JsonResponse::too_many_requests(
                    "Too many requests. Please wait a moment and try again.",
                )
                .into_response()
            })
            .finish()
            .context("invalid rate limiter settings")?,
    );

    let governor_limiter = auth_governor_conf.limiter().clone();
    std::thread::spawn(move || {
        let interval = std::time::Duration::from_secs(60);
        loop {
            std::thread::sleep(interval);
            governor_limiter.retain_recent();
        }
    });

    let cors = CorsLayer::new()
        .allow_origin(
            config
                .frontend_origin
                .parse::<HeaderValue>()
                .context("FRONTEND_ORIGIN is not a valid header value")?,
        )
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE])
        .allow_credentials(true);

    let addr = config.bind_addr;
    let state = AppState {
        db: user_repo,
        sessions,
        config: Arc::new(config),
    };

    let auth_routes = routes::auth_routes().layer(GovernorLayer {
        config: auth_governor_conf,
    });
    let app = routes::app(state, auth_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let make_service = app.into_make_service_with_connect_info::<std::net::SocketAddr>();

    #[cfg(feature = "tls")]
    {
        let tls_config = RustlsConfig::from_pem_file(
            std::env::var("DEV_CERT_LOCATION").context("DEV_CERT_LOCATION must be set")?,
            std::env::var("DEV_KEY_LOCATION").context("DEV_KEY_LOCATION must be set")?,
        )
        .await
        .context("failed to load TLS certs")?;

        info!(%addr, "Running with TLS");
        axum_server::bind_rustls(addr, tls_config)
            .serve(make_service)
            .await?;
        return Ok(()); // Skip the plain listener when TLS was used
    }

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "Running without TLS");
    axum::serve(listener, make_service).await?;
    Ok(())
}
