use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{CheeuService, Error, QuerySet, Result, RetrievalMode, ScoredCandidate, confidence};
use cheeu_config::MAX_TOP_K;
use cheeu_domain::RetrievedDocument;

const HEALTH_CHECK_QUERY: &str = "스트레스";
const HEALTH_CHECK_PROMPT: &str = "안녕하세요";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchRequest {
	pub main_query: String,
	#[serde(default)]
	pub sub_queries: Vec<String>,
	/// Keywords used only for the confidence estimate.
	#[serde(default)]
	pub keywords: Vec<String>,
	#[serde(default)]
	pub k: Option<u32>,
}

#[derive(Clone, Debug, Serialize)]
pub struct RetrievalReport {
	pub mode: RetrievalMode,
	pub k: u32,
	pub documents: Vec<ScoredCandidate>,
	pub confidence: f32,
}

/// Both provider checks must pass for the service to be healthy.
#[derive(Clone, Debug, Serialize)]
pub struct HealthReport {
	pub healthy: bool,
	pub search_healthy: bool,
	pub generator_healthy: bool,
	pub search_provider: String,
	pub generator_provider: String,
	pub search_documents: usize,
	pub cache_entries: usize,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub search_error: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub generator_error: Option<String>,
	#[serde(with = "crate::time_serde")]
	pub checked_at: OffsetDateTime,
}

impl CheeuService {
	/// Priority-weighted search with per-document score diagnostics.
	pub async fn search(&self, req: SearchRequest) -> Result<RetrievalReport> {
		let k = self.resolve_k(req.k)?;
		let queries = QuerySet::new(req.main_query, req.sub_queries);
		let params = self.fusion_params().with_k(k as usize);
		let fusion = self.fusion.fuse_scored(&queries, params).await;
		let documents = fusion.documents();
		let confidence = confidence::score(&documents, &req.keywords);

		Ok(RetrievalReport { mode: fusion.mode, k, documents: fusion.candidates, confidence })
	}

	/// Single-query search without weighting.
	pub async fn plain_search(
		&self,
		query: &str,
		k: Option<u32>,
	) -> Result<Vec<RetrievedDocument>> {
		let k = self.resolve_k(k)?;

		Ok(self.fusion.search_plain(query, k as usize).await)
	}

	/// Drops every cached fused ranking and returns how many were removed.
	pub fn clear_cache(&self) -> usize {
		let cleared = self.fusion.cache_len();

		self.fusion.clear_cache();

		tracing::info!(cleared, "Fusion cache cleared.");

		cleared
	}

	/// Queries search with a one-document query and the generator with a short greeting. An empty
	/// index counts as a search failure.
	pub async fn health_check(&self) -> HealthReport {
		let search_provider = self.cfg.providers.search.provider_id.clone();
		let generator_provider = self.cfg.providers.llm.provider_id.clone();
		let (search_documents, search_error) =
			match self.providers.search.search(HEALTH_CHECK_QUERY, 1).await {
				Ok(hits) if hits.is_empty() => {
					(0, Some("Search index returned no documents.".to_string()))
				},
				Ok(hits) => (hits.len(), None),
				Err(err) => (0, Some(err.to_string())),
			};
		let generator_error = match self.providers.generator.generate(HEALTH_CHECK_PROMPT).await
		{
			Ok(text) if text.trim().is_empty() => {
				Some("Generator returned an empty response.".to_string())
			},
			Ok(_) => None,
			Err(err) => Some(err.to_string()),
		};
		let search_healthy = search_error.is_none();
		let generator_healthy = generator_error.is_none();

		if let Some(error) = search_error.as_deref() {
			tracing::warn!(provider_id = %search_provider, error, "Search health check failed.");
		}
		if let Some(error) = generator_error.as_deref() {
			tracing::warn!(
				provider_id = %generator_provider,
				error,
				"Generator health check failed."
			);
		}

		HealthReport {
			healthy: search_healthy && generator_healthy,
			search_healthy,
			generator_healthy,
			search_provider,
			generator_provider,
			search_documents,
			cache_entries: self.fusion.cache_len(),
			search_error,
			generator_error,
			checked_at: OffsetDateTime::now_utc(),
		}
	}

	fn resolve_k(&self, requested: Option<u32>) -> Result<u32> {
		let k = requested.unwrap_or(self.cfg.retrieval.top_k);

		if k == 0 || k > MAX_TOP_K {
			return Err(Error::InvalidRequest {
				message: format!("k must be between 1 and {MAX_TOP_K}."),
			});
		}

		Ok(k)
	}
}
