use std::path::PathBuf;
use std::sync::Arc;

use stellarpost::app::{context::AppContext, runner::Runner};
use stellarpost::domain::model::{AppConfig, RunOutcome, StateBackend};
use stellarpost::infra::{
    config::ConfigLoader,
    file_state::FileStateStore,
    logging::{init_logging, BootError},
    random::MutexRng,
    reqwest_http::{build_client, ReqwestHttp},
    sqlite_state::SqliteStateStore,
    telegram::TelegramPublisher,
};
use stellarpost::ports::{source::ImageSource, state::StateStore};
use stellarpost::sources::{ApodSource, EpicSource};
use tracing::{error, info};

/// Binary entrypoint:
/// - loads `.env`, then the optional TOML config (`CONFIG_PATH` arg or `./config.toml`)
/// - initializes logging
/// - opens the configured state store, wires HTTP/rng/publisher adapters
/// - runs a single fetch-and-post pass; meant to be invoked by an external timer
#[tokio::main]
async fn main() -> Result<(), BootError> {
    let _ = dotenvy::dotenv();

    let cfg_path = pick_config_path(std::env::args().nth(1));
    let cfg = match ConfigLoader::load(cfg_path.as_deref()).await {
        Ok(cfg) => cfg,
        Err(e) => {
            // Logging is configured from this file, so it is not up yet.
            eprintln!("stellarpost: fatal config error: {e}");
            return Err(BootError::Fatal(e.to_string()));
        }
    };
    init_logging(&cfg.log_level);

    info!(
        config = %cfg_path.as_ref().map(|p| p.display().to_string()).unwrap_or_else(|| "<env only>".into()),
        state_backend = ?cfg.state.backend,
        state_path = %cfg.state.path.display(),
        dry_run = cfg.dry_run,
        "Loaded config"
    );

    let result = start(cfg).await;
    if let Err(e) = &result {
        error!(error = %e, "Fatal error");
    }
    result
}

async fn start(cfg: AppConfig) -> Result<(), BootError> {
    match cfg.state.backend {
        StateBackend::File => {
            let state = FileStateStore::new(cfg.state.path.clone());
            run(cfg, state).await
        }
        StateBackend::Sqlite => {
            let state = SqliteStateStore::open(&cfg.state.path)
                .await
                .map_err(|e| BootError::Fatal(e.to_string()))?;
            run(cfg, state).await
        }
    }
}

async fn run<S>(cfg: AppConfig, state: S) -> Result<(), BootError>
where
    S: StateStore,
{
    let client = build_client(&cfg.user_agent, cfg.timeout_seconds)
        .map_err(|e| BootError::Fatal(e.to_string()))?;
    let http = Arc::new(ReqwestHttp::from_client(client.clone()));
    let publisher = TelegramPublisher::new(client, &cfg.telegram);
    let rng = Arc::new(MutexRng::new());

    let sources: Vec<Box<dyn ImageSource>> = vec![
        Box::new(ApodSource::new(http.clone(), &cfg.nasa)),
        Box::new(EpicSource::new(http, rng.clone(), &cfg.nasa)),
    ];

    let ctx = AppContext {
        cfg: Arc::new(cfg),
        state,
        publisher,
        sources,
        rng,
    };

    let outcome = Runner::run_once(&ctx)
        .await
        .map_err(|e| BootError::Fatal(e.to_string()))?;
    match outcome {
        RunOutcome::Posted { id } => info!(%id, "Run finished: posted"),
        RunOutcome::DryRun { id } => info!(%id, "Run finished: dry run"),
        RunOutcome::Duplicate { id } => info!(%id, "Run finished: duplicate"),
        RunOutcome::NothingFetched => info!("Run finished: nothing fetched"),
    }
    Ok(())
}

fn pick_config_path(arg1: Option<String>) -> Option<PathBuf> {
    if let Some(p) = arg1 {
        return Some(PathBuf::from(p));
    }
    let candidate = PathBuf::from("config.toml");
    candidate.exists().then_some(candidate)
}
