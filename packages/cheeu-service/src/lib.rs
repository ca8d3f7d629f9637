pub mod capsule;
pub mod confidence;
pub mod fusion;
pub mod info;
pub mod query;
pub mod retrieval;
pub mod time_serde;

mod cache;
mod error;
mod prompt;

pub use capsule::{BatchItem, BatchResponse, CapsuleRequest, HealingCapsule};
pub use error::{Error, Result};
pub use fusion::{Fusion, FusionParams, QuerySet, RankFusion, RetrievalMode, ScoredCandidate};
pub use info::{StressTypeSummary, SystemInfo};
pub use retrieval::{HealthReport, RetrievalReport, SearchRequest};

use std::{future::Future, pin::Pin, sync::Arc};

use color_eyre::eyre::WrapErr;

use cheeu_config::{Config, LlmProviderConfig, SearchProviderConfig};
use cheeu_domain::{Catalog, ScoredDocument};
use cheeu_providers::{chat, search};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Nearest-neighbour search over the therapy research corpus.
///
/// Implementations return hits ordered from closest to farthest, with non-negative distances.
pub trait SimilaritySearch
where
	Self: Send + Sync,
{
	fn search<'a>(
		&'a self,
		query: &'a str,
		k: usize,
	) -> BoxFuture<'a, color_eyre::Result<Vec<ScoredDocument>>>;
}

pub trait TextGenerator
where
	Self: Send + Sync,
{
	fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, color_eyre::Result<String>>;
}

#[derive(Clone)]
pub struct Providers {
	pub search: Arc<dyn SimilaritySearch>,
	pub generator: Arc<dyn TextGenerator>,
}

pub struct HttpSearch {
	cfg: SearchProviderConfig,
}

pub struct HttpTextGenerator {
	cfg: LlmProviderConfig,
}

pub struct CheeuService {
	pub cfg: Config,
	pub catalog: Arc<Catalog>,
	pub providers: Providers,
	pub fusion: RankFusion,
}

impl HttpSearch {
	pub fn new(cfg: SearchProviderConfig) -> Self {
		Self { cfg }
	}
}

impl SimilaritySearch for HttpSearch {
	fn search<'a>(
		&'a self,
		query: &'a str,
		k: usize,
	) -> BoxFuture<'a, color_eyre::Result<Vec<ScoredDocument>>> {
		Box::pin(async move {
			search::search(&self.cfg, query, k).await.wrap_err_with(|| {
				format!("Search provider {} request failed.", self.cfg.provider_id)
			})
		})
	}
}

impl HttpTextGenerator {
	pub fn new(cfg: LlmProviderConfig) -> Self {
		Self { cfg }
	}
}

impl TextGenerator for HttpTextGenerator {
	fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, color_eyre::Result<String>> {
		Box::pin(async move {
			chat::complete(&self.cfg, prompt).await.wrap_err_with(|| {
				format!("Generator provider {} request failed.", self.cfg.provider_id)
			})
		})
	}
}

impl Providers {
	pub fn new(search: Arc<dyn SimilaritySearch>, generator: Arc<dyn TextGenerator>) -> Self {
		Self { search, generator }
	}

	pub fn from_config(cfg: &Config) -> Self {
		Self {
			search: Arc::new(HttpSearch::new(cfg.providers.search.clone())),
			generator: Arc::new(HttpTextGenerator::new(cfg.providers.llm.clone())),
		}
	}
}

impl CheeuService {
	pub fn new(cfg: Config) -> Self {
		let providers = Providers::from_config(&cfg);

		Self::with_providers(cfg, providers)
	}

	pub fn with_providers(cfg: Config, providers: Providers) -> Self {
		Self::with_catalog(cfg, providers, Arc::new(Catalog::builtin()))
	}

	pub fn with_catalog(cfg: Config, providers: Providers, catalog: Arc<Catalog>) -> Self {
		let fusion = if cfg.retrieval.cache.enabled {
			RankFusion::with_cache(
				providers.search.clone(),
				cfg.retrieval.cache.max_entries as usize,
			)
		} else {
			RankFusion::new(providers.search.clone())
		};

		Self { cfg, catalog, providers, fusion }
	}

	pub fn fusion_params(&self) -> FusionParams {
		FusionParams::from_config(&self.cfg.retrieval)
	}
}
