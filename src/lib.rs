pub mod api;
pub mod config;
pub mod explain;
pub mod report;
pub mod scoring;
pub mod session_store;

use std::sync::Arc;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, ConfigError, OllamaSettings};
use crate::explain::{ExplainError, ExplanationGenerator, OllamaExplainer};
use crate::scoring::{KnowledgeBase, KnowledgeBaseError, ScoringEngine};
use crate::session_store::InMemorySessionStore;

pub use scoring::{DiagnosisResult, PatientProfile, Severity};

#[derive(Error, Debug)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    KnowledgeBase(#[from] KnowledgeBaseError),

    #[error("Explanation client setup failed: {0}")]
    Explainer(#[from] ExplainError),

    #[error(transparent)]
    Server(#[from] api::ServerError),
}

/// Load configuration and the knowledge base, then serve until Ctrl-C.
/// Any invalid configuration or knowledge-base defect stops startup.
pub async fn run() -> Result<(), StartupError> {
    // A missing .env file is normal.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let cfg = AppConfig::from_env()?;
    let knowledge = load_knowledge(&cfg)?;
    tracing::info!(
        conditions = knowledge.len(),
        aliases = knowledge.aliases().len(),
        "Knowledge base ready"
    );

    let engine = ScoringEngine::new(Arc::new(knowledge));
    let sessions = Arc::new(InMemorySessionStore::with_ttl(cfg.session_ttl));
    let mut ctx = api::ApiContext::new(engine, sessions);

    // The blocking HTTP client must be created and dropped off the async runtime.
    let explainer = match cfg.ollama.clone() {
        Some(settings) => Some(build_explainer(settings).await?),
        None => {
            tracing::info!("OLLAMA_URL not set, explanations disabled");
            None
        }
    };
    if let Some(explainer) = &explainer {
        ctx = ctx.with_explainer(explainer.clone() as Arc<dyn ExplanationGenerator>);
    }

    let result = api::serve(cfg.bind_addr(), ctx).await;

    if let Some(explainer) = explainer {
        let _ = tokio::task::spawn_blocking(move || drop(explainer)).await;
    }

    result.map_err(StartupError::from)
}

fn load_knowledge(cfg: &AppConfig) -> Result<KnowledgeBase, KnowledgeBaseError> {
    match &cfg.knowledge_dir {
        Some(dir) => {
            tracing::info!(dir = %dir.display(), "Loading knowledge base");
            KnowledgeBase::load(dir)
        }
        None => KnowledgeBase::builtin(),
    }
}

async fn build_explainer(settings: OllamaSettings) -> Result<Arc<OllamaExplainer>, StartupError> {
    tracing::info!(url = %settings.base_url, model = %settings.model, "Explanations enabled");
    let explainer = tokio::task::spawn_blocking(move || {
        OllamaExplainer::new(&settings.base_url, &settings.model, settings.timeout_secs)
    })
    .await
    .map_err(|e| ExplainError::HttpClient(e.to_string()))??;
    Ok(Arc::new(explainer))
}
