use std::path::Path;
use std::sync::{Arc, RwLock};

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use super::routes;
use crate::api::state::AppState;
use crate::core::AppConfig;
use crate::r#gen::Gateway;
use crate::openai::OpenAiBackend;
use crate::story::{Orchestrator, SessionRegistry};

pub fn app(shared_state: Arc<AppState>) -> Router {
    let cors = CorsLayer::permissive();
    let audio_dir = shared_state.config.audio_dir.clone();

    Router::new()
        // API routes
        .nest("/api", routes::router())
        // Generated narration artifacts are plain files under the
        // audio directory, served by the static layer
        .nest_service("/audio", ServeDir::new(audio_dir))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(Arc::clone(&shared_state))
}

// Run the server
pub async fn serve(host: String, port: String, config: AppConfig) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                // axum logs rejections from built-in extractors with the `axum::rejection`
                // target, at `TRACE` level. `axum::rejection=trace` enables showing those events
                format! {
                    "{}=debug,tower_http=debug,axum::rejection=trace",
                    env!("CARGO_CRATE_NAME")
                }
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    std::fs::create_dir_all(&config.audio_dir).expect("Failed to create audio directory");

    let backend = if config.openai_api_key.is_empty() {
        tracing::warn!(
            "OPENAI_API_KEY is not set. Generation requests will fail until it is configured."
        );
        None
    } else {
        Some(OpenAiBackend::new(
            &config.openai_api_hostname,
            &config.openai_api_key,
        ))
    };
    let gateway = Gateway::new(
        backend,
        config.models(),
        config.max_attempts,
        Path::new(&config.audio_dir),
    );
    let registry = Arc::new(RwLock::new(SessionRegistry::new()));
    let orchestrator = Orchestrator::new(Arc::clone(&registry), gateway, &config.system_prompt);

    let app_state = AppState::new(orchestrator, registry, config);
    let app = app(Arc::new(app_state));

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", host, port))
        .await
        .unwrap();

    tracing::debug!(
        "Server started. Listening on {}",
        listener.local_addr().unwrap()
    );

    axum::serve(listener, app).await.unwrap();
}
