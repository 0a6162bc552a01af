//! Application state wiring all services together.
//!
//! `AppState` holds what every command needs: configuration, the database
//! pool and the registry. The Telegram runtime (LLM, web tools, agents,
//! pipeline, indexer) is only built for `run`, because it needs secrets the
//! read-only commands do not.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;

use topicmind_core::agent::{AgentRouter, AgentRunner};
use topicmind_core::dedup::DedupService;
use topicmind_core::inbound::InboundPipeline;
use topicmind_core::indexing::IndexingWorker;
use topicmind_core::llm::BoxLlmProvider;
use topicmind_core::memory::ConversationMemory;
use topicmind_core::tools::WebToolkit;
use topicmind_core::topic::TopicService;
use topicmind_infra::config::{Secrets, load_effective_config, resolve_database_path};
use topicmind_infra::llm::create_provider;
use topicmind_infra::sqlite::indexed_url::SqliteIndexedUrlRepository;
use topicmind_infra::sqlite::message::SqliteMessageRepository;
use topicmind_infra::sqlite::pool::{DatabasePool, default_data_dir};
use topicmind_infra::sqlite::scrape_cache::SqliteScrapeCacheRepository;
use topicmind_infra::sqlite::topic::SqliteTopicRepository;
use topicmind_infra::web::{ParallelSearch, ReaderFetcher};
use topicmind_types::config::BotConfig;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteDedupService = DedupService<SqliteIndexedUrlRepository>;

pub type ConcreteToolkit = WebToolkit<
    ParallelSearch,
    ReaderFetcher,
    SqliteScrapeCacheRepository,
    BoxLlmProvider,
>;

pub type ConcreteRouter = AgentRouter<BoxLlmProvider, ConcreteToolkit>;

pub type ConcreteTopicService = TopicService<SqliteTopicRepository, SqliteMessageRepository>;

pub type ConcretePipeline = InboundPipeline<
    SqliteTopicRepository,
    SqliteMessageRepository,
    SqliteIndexedUrlRepository,
    SqliteScrapeCacheRepository,
    ConcreteRouter,
>;

pub type ConcreteWorker = IndexingWorker<SqliteMessageRepository, SqliteIndexedUrlRepository>;

/// Shared application state used by every CLI command.
#[derive(Clone)]
pub struct AppState {
    pub config: BotConfig,
    pub data_dir: PathBuf,
    pub database_path: PathBuf,
    pub db_pool: DatabasePool,
    pub dedup: Arc<ConcreteDedupService>,
    pub topics: SqliteTopicRepository,
}

impl AppState {
    /// Initialize the application state: load config, connect to DB.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = default_data_dir();
        tokio::fs::create_dir_all(&data_dir)
            .await
            .with_context(|| format!("creating data directory {}", data_dir.display()))?;

        let config = load_effective_config(&data_dir).await?;
        let database_path = resolve_database_path(&config, &data_dir);
        let db_pool = DatabasePool::open(&database_path)
            .await
            .with_context(|| format!("opening database {}", database_path.display()))?;
        tracing::debug!(path = %database_path.display(), "database ready");

        let dedup = DedupService::new(SqliteIndexedUrlRepository::new(db_pool.clone()));
        let topics = SqliteTopicRepository::new(db_pool.clone());

        Ok(Self {
            config,
            data_dir,
            database_path,
            db_pool,
            dedup: Arc::new(dedup),
            topics,
        })
    }
}

/// Everything the long-running bot needs.
pub struct BotRuntime {
    pub pipeline: Arc<ConcretePipeline>,
    pub worker: ConcreteWorker,
}

impl BotRuntime {
    /// Wire LLM, web tools, agents, the inbound pipeline and the indexer.
    pub fn build(state: &AppState, secrets: &Secrets) -> anyhow::Result<Self> {
        let config = &state.config;
        let pool = &state.db_pool;

        let llm = Arc::new(create_provider(
            secrets.openrouter_api_key()?.clone(),
            &config.llm_base_url,
        )?);

        let toolkit = WebToolkit::new(
            ParallelSearch::new(secrets.parallel_api_key.clone())?,
            ReaderFetcher::new(secrets.firecrawl_api_key.clone())?,
            SqliteScrapeCacheRepository::new(pool.clone()),
            llm.clone(),
            config,
        );

        let runner = AgentRunner::new(
            llm,
            Arc::new(toolkit),
            ConversationMemory::new(config.history_limit),
            config,
        );
        let router = AgentRouter::new(Arc::new(runner));

        let messages = SqliteMessageRepository::new(pool.clone());
        let pipeline = InboundPipeline::new(
            TopicService::new(SqliteTopicRepository::new(pool.clone()), messages.clone()),
            messages.clone(),
            DedupService::new(SqliteIndexedUrlRepository::new(pool.clone())),
            SqliteScrapeCacheRepository::new(pool.clone()),
            router,
            config.scrape.summary_max_chars,
        );

        let worker = IndexingWorker::new(
            messages,
            DedupService::new(SqliteIndexedUrlRepository::new(pool.clone())),
            config.indexing.clone(),
        );

        tracing::info!(model = %config.model, "bot runtime ready");
        Ok(Self {
            pipeline: Arc::new(pipeline),
            worker,
        })
    }
}
