//! Quiz Live Back binary entrypoint wiring REST, WebSocket, SSE and the generative backend.

use std::{env, net::SocketAddr};

use anyhow::Context;
use axum::Router;
use quiz_live_back::{
    config::AppConfig,
    routes,
    state::{AppState, SharedState},
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let app_state = AppState::new(AppConfig::load());
    install_question_source(&app_state).await;

    // Build the HTTP router once the shared state is ready.
    let app = build_router(app_state);

    let port = env::var("PORT")
        .or_else(|_| env::var("SERVER_PORT"))
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    let service = app.into_make_service();
    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

/// Install the Gemini backend when it is configured; otherwise stay degraded.
#[cfg(feature = "gemini")]
async fn install_question_source(state: &SharedState) {
    use std::sync::Arc;

    use quiz_live_back::dao::question_source::gemini::{GeminiConfig, GeminiQuestionSource};
    use tracing::warn;

    let source = GeminiConfig::from_env().and_then(GeminiQuestionSource::new);
    match source {
        Ok(source) => {
            info!("Gemini question source ready; leaving degraded mode");
            state.install_question_source(Arc::new(source)).await;
        }
        Err(err) => {
            warn!(error = %err, "Gemini unavailable; quiz generation disabled (degraded mode)");
        }
    }
}

#[cfg(not(feature = "gemini"))]
async fn install_question_source(_state: &SharedState) {
    tracing::warn!("built without a generative backend; quiz generation disabled (degraded mode)");
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: SharedState) -> Router<()> {
    routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut term = signal(SignalKind::terminate()).expect("install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = term.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
