pub mod api; // HTTP API
pub mod config;
pub mod core_state; // Transport-agnostic state
pub mod features; // LLM-backed feature handlers
pub mod llm;
pub mod llm_service;
pub mod metrics; // Synthetic report data
pub mod models;
pub mod prompts;
pub mod sections; // Section router + views
pub mod session;
pub mod session_cache;

use std::process::ExitCode;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::core_state::CoreState;
use crate::llm::WatsonxClient;

pub fn run() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Configuration error: {e}");
            eprintln!("{}: {e}", config::APP_NAME);
            return ExitCode::FAILURE;
        }
    };

    // The blocking client must be built outside the async runtime.
    let client = match WatsonxClient::connect(&config.watsonx) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!(url = %config.watsonx.url, "Cannot initialise Watsonx client: {e}");
            eprintln!("{}: cannot initialise Watsonx client: {e}", config::APP_NAME);
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(model_id = %config.watsonx.model_id, "Watsonx client ready");

    let core = Arc::new(
        CoreState::new(Arc::new(client)).with_session_timeout(config.session_timeout),
    );

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Cannot start async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    runtime.block_on(serve(core, config))
}

async fn serve(core: Arc<CoreState>, config: AppConfig) -> ExitCode {
    let mut server = match api::start_api_server(core, config.bind_addr).await {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(addr = %server.info.server_addr, "Listening");

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Cannot listen for shutdown signal: {e}");
    }

    server.shutdown();
    server.stopped().await;
    ExitCode::SUCCESS
}
