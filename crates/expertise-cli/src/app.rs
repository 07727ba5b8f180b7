//! Wires configuration, storage, service clients and caches into the engine.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use expertise_core::models::ScoringPlan;
use expertise_core::traits::{IEntityAnnotator, IRelatednessProvider};
use expertise_core::ExpertiseConfig;
use expertise_ingest::{Aggregator, CorpusBuilder};
use expertise_retrieval::ExpertFinder;
use expertise_services::{CachedAnnotator, CachedRelatedness, ServiceCaches, TagmeClient};
use expertise_storage::StorageEngine;

pub struct App {
    pub config: ExpertiseConfig,
    pub store: Arc<StorageEngine>,
    caches: ServiceCaches,
    annotator: Arc<dyn IEntityAnnotator>,
    relatedness: Arc<dyn IRelatednessProvider>,
}

impl App {
    pub fn open(config_path: Option<&Path>) -> Result<Self> {
        let config = ExpertiseConfig::load(config_path).context("loading configuration")?;
        expertise_observability::init_from_config(&config.observability);

        let store = Arc::new(
            StorageEngine::open_with_config(&config.storage)
                .with_context(|| format!("opening {}", config.storage.db_path))?,
        );
        let caches = ServiceCaches::open(&config.services).context("opening service caches")?;
        let client = Arc::new(TagmeClient::new(&config.services)?);
        let annotator: Arc<dyn IEntityAnnotator> =
            Arc::new(CachedAnnotator::new(client.clone(), caches.annotations()));
        let relatedness: Arc<dyn IRelatednessProvider> =
            Arc::new(CachedRelatedness::new(client, caches.relatedness()));
        info!(db_path = %config.storage.db_path, "engine ready");

        Ok(Self {
            config,
            store,
            caches,
            annotator,
            relatedness,
        })
    }

    pub fn builder(&self) -> CorpusBuilder {
        let aggregator = Arc::new(Aggregator::new(
            self.store.clone(),
            self.config.ingestion.clone(),
        ));
        CorpusBuilder::new(aggregator, self.annotator.clone())
    }

    pub fn finder(&self) -> ExpertFinder {
        ExpertFinder::from_config(
            self.store.clone(),
            self.store.clone(),
            self.annotator.clone(),
            self.relatedness.clone(),
            &self.config,
        )
    }

    /// Parse `--plan`, falling back to the configured plan.
    pub fn plan(&self, json: Option<&str>) -> Result<ScoringPlan> {
        match json {
            Some(json) => ScoringPlan::from_json(json).context("parsing --plan"),
            None => Ok(self.config.retrieval.default_plan()),
        }
    }

    /// Flush the service caches.
    pub fn close(self) -> Result<()> {
        self.caches.close().context("flushing service caches")?;
        Ok(())
    }
}
