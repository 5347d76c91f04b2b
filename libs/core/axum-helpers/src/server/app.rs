use super::shutdown::ShutdownCoordinator;
use crate::errors::handlers::{method_not_allowed, not_found};
use crate::http::{cors_layer, security_headers};
use axum::{Router, middleware};
use core_config::server::ServerConfig;
use std::future::{Future, IntoFuture};
use std::io;
use std::time::Duration;
use tower_http::compression::CompressionLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info, warn};
use utoipa::OpenApi;

/// Wraps the API routes with documentation, fallbacks and middleware.
///
/// - `apis` is nested under `/api`
/// - Swagger UI at `/swagger-ui` (spec at `/api-docs/openapi.json`) and Scalar at `/scalar`
/// - JSON 404/405 fallbacks
/// - request tracing, security headers, CORS (only when origins are configured), compression
///
/// Health routes are not included; merge [`health_router`](super::health_router) and the
/// app's own readiness route afterwards.
pub fn create_router<T>(apis: Router, server_config: &ServerConfig) -> io::Result<Router>
where
    T: OpenApi + 'static,
{
    use utoipa_scalar::{Scalar, Servable};
    use utoipa_swagger_ui::SwaggerUi;

    let router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", T::openapi()))
        .merge(Scalar::with_url("/scalar", T::openapi()))
        .nest("/api", apis)
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(middleware::from_fn(security_headers));

    let router = match cors_layer(&server_config.cors_allowed_origins)? {
        Some(cors) => {
            info!(origins = ?server_config.cors_allowed_origins, "CORS enabled");
            router.layer(cors)
        }
        None => router,
    };

    Ok(router.layer(CompressionLayer::new()))
}

/// Serves `router` until SIGINT/SIGTERM, then drains in-flight requests and runs `cleanup`.
///
/// Draining and cleanup each get at most `shutdown_timeout`.
///
/// ```ignore
/// create_production_app(app, &config.server, Duration::from_secs(30), async move {
///     db.close().await.ok();
/// })
/// .await?;
/// ```
pub async fn create_production_app<F>(
    router: Router,
    server_config: &ServerConfig,
    shutdown_timeout: Duration,
    cleanup: F,
) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind(server_config.address()).await?;
    info!("Server listening on {}", listener.local_addr()?);

    serve_until_shutdown(listener, router, ShutdownCoordinator::default(), shutdown_timeout, cleanup)
        .await
}

pub(crate) async fn serve_until_shutdown<F>(
    listener: tokio::net::TcpListener,
    router: Router,
    coordinator: ShutdownCoordinator,
    shutdown_timeout: Duration,
    cleanup: F,
) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let graceful = coordinator.clone();
    let server = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(async move { graceful.wait().await })
        .into_future();

    let drain_deadline = async {
        coordinator.wait().await;
        tokio::time::sleep(shutdown_timeout).await;
    };

    let serve_result = tokio::select! {
        result = server => result,
        _ = drain_deadline => {
            warn!(?shutdown_timeout, "In-flight requests did not finish in time, forcing shutdown");
            Ok(())
        }
    };

    if let Err(e) = &serve_result {
        tracing::error!("Server encountered an error: {:?}", e);
    }

    info!("Running cleanup (timeout: {:?})", shutdown_timeout);
    match tokio::time::timeout(shutdown_timeout, cleanup).await {
        Ok(()) => info!("Cleanup completed"),
        Err(_) => warn!("Cleanup exceeded {:?}, abandoning it", shutdown_timeout),
    }

    serve_result
}
