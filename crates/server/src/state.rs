use std::path::Path;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use ai::openrouter::OpenRouterClient;
use ai::{Assistant, OpenRouterGenerator, TextGenerator, UnconfiguredGenerator};
use anyhow::Context;
use db::{FollowUpRepository, ProspectRepository};
use events::EventBus;
use sqlx::SqlitePool;
use tracker::{
    Clock, GamificationTracker, JsonFileGamificationStore, ProspectService, SystemClock,
};

use crate::config::{AiConfig, AppConfig};
use crate::routes::sse::{spawn_event_recorder, EventBuffer, SharedEventBuffer, DEFAULT_EVENT_BUFFER_SIZE};

#[derive(Clone)]
pub struct AppState {
    pub service: ProspectService,
    pub event_bus: EventBus,
    pub event_buffer: SharedEventBuffer,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Must be called inside a tokio runtime: starts the task that feeds the
    /// replay buffer from the service's event bus.
    pub fn new(service: ProspectService, config: AppConfig) -> Self {
        let event_bus = service.events().clone();
        let event_buffer = Arc::new(RwLock::new(EventBuffer::new(DEFAULT_EVENT_BUFFER_SIZE)));
        spawn_event_recorder(&event_bus, Arc::clone(&event_buffer));

        Self {
            service,
            event_bus,
            event_buffer,
            config: Arc::new(config),
        }
    }

    /// Wires SQLite repositories from `pool` into a service.
    pub fn from_pool(
        pool: SqlitePool,
        assistant: Assistant,
        gamification: GamificationTracker,
        clock: Arc<dyn Clock>,
        config: AppConfig,
    ) -> Self {
        let service = ProspectService::new(
            Arc::new(ProspectRepository::new(pool.clone())),
            Arc::new(FollowUpRepository::new(pool)),
            assistant,
            gamification,
            clock,
            EventBus::new(),
        );
        Self::new(service, config)
    }

    /// Opens the project's database and gamification file as configured.
    pub async fn open(project_root: &Path, config: AppConfig) -> anyhow::Result<Self> {
        let database_path = config.database_path(project_root);
        if let Some(parent) = database_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let pool = db::create_pool(&config.database_url(project_root))
            .await
            .context("Failed to open database")?;
        db::run_migrations(&pool)
            .await
            .context("Failed to run migrations")?;

        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let gamification = GamificationTracker::new(
            Arc::new(JsonFileGamificationStore::new(config.stats_path(project_root))),
            Arc::clone(&clock),
        );
        let assistant = build_assistant(&config.ai);

        tracing::info!(
            database = %database_path.display(),
            generator = assistant.generator_name(),
            "Opened prospect store"
        );

        Ok(Self::from_pool(pool, assistant, gamification, clock, config))
    }
}

/// OpenRouter-backed assistant when the key variable is set; otherwise every
/// generation falls back.
pub fn build_assistant(config: &AiConfig) -> Assistant {
    let generator: Arc<dyn TextGenerator> = match config.api_key() {
        Some(api_key) => {
            let client = OpenRouterClient::new(api_key, config.base_url.clone());
            Arc::new(OpenRouterGenerator::new(client, config.model.clone()))
        }
        None => {
            tracing::warn!(
                env = %config.api_key_env,
                "No OpenRouter API key set, suggestions will use fallbacks"
            );
            Arc::new(UnconfiguredGenerator)
        }
    };

    Assistant::new(generator).with_timeout(Duration::from_secs(config.timeout_secs))
}
