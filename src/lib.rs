pub mod analysis; // Analysis client: Gemini transport, prompt, response parsing
pub mod api; // HTTP surface: form pages + JSON API
pub mod checker; // Form controller and request state machine
pub mod collector; // Symptom collector
pub mod config;
pub mod models;
pub mod render; // Result renderer
pub mod session; // In-memory form sessions

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::analysis::{AnalysisError, GeminiClient, SymptomAnalyzer};
use crate::api::{ApiContext, ServerError};
use crate::config::Settings;

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
    #[error(transparent)]
    Server(#[from] ServerError),
    #[error("Failed to listen for shutdown signal: {0}")]
    Signal(std::io::Error),
}

/// Start the symptom checker and serve until Ctrl-C.
pub async fn run() -> Result<(), StartupError> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let settings = Settings::from_env();
    tracing::debug!(?settings, "Loaded settings");
    if !settings.credential_configured() {
        tracing::warn!(
            "No analysis service credential set (SYMPTOM_CHECKER_API_KEY); every check will return the fallback result"
        );
    }

    let client = GeminiClient::from_settings(&settings)?;
    tracing::info!(model = %settings.model, endpoint = client.endpoint(), "Analysis client ready");

    let bind_addr = settings.bind_addr;
    let ctx = ApiContext::new(settings, Arc::new(SymptomAnalyzer::new(client)));
    let mut server = api::start_server(ctx, bind_addr).await?;
    tracing::info!("Open http://{} in a browser", server.addr());

    let signal = tokio::signal::ctrl_c().await;
    server.shutdown();
    server.wait().await;

    signal.map_err(StartupError::Signal)
}
