//! Priority-weighted fusion of one dominant query with several secondary queries.
//!
//! Every hit is converted from distance to similarity (`max(0, 1 - distance)`), weighted by the
//! query that produced it, and merged by document prefix. Dominant-query hits carry
//! `main_weight`; secondary hits share `sub_weight` evenly across the non-blank secondary
//! queries, so their combined influence stays below the dominant query's.

use std::{cmp::Ordering, collections::HashMap, sync::Arc};

use serde::{Deserialize, Serialize};

use cheeu_config::Retrieval;
use cheeu_domain::{RetrievedDocument, ScoredDocument};

use crate::{
	SimilaritySearch,
	cache::{self, ResultCache},
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FusionParams {
	pub main_weight: f32,
	pub sub_weight: f32,
	/// Number of documents to return.
	pub k: usize,
	pub main_overfetch: usize,
	pub sub_overfetch: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuerySet {
	pub main_query: String,
	#[serde(default)]
	pub sub_queries: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
	pub document: RetrievedDocument,
	pub fused_score: f32,
	/// Unweighted similarity from the dominant query, zero when only secondary queries hit.
	pub main_component: f32,
	/// Sum of weighted similarities from secondary queries.
	pub sub_component: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetrievalMode {
	Fused,
	/// The dominant query failed and a plain `k`-sized search was used instead.
	Fallback,
	/// Blank dominant query, or every search attempt failed.
	Empty,
}

#[derive(Debug, Clone, Serialize)]
pub struct Fusion {
	pub mode: RetrievalMode,
	pub candidates: Vec<ScoredCandidate>,
}

pub struct RankFusion {
	search: Arc<dyn SimilaritySearch>,
	cache: Option<ResultCache>,
}

impl FusionParams {
	pub fn from_config(cfg: &Retrieval) -> Self {
		Self {
			main_weight: cfg.main_weight,
			sub_weight: cfg.sub_weight,
			k: cfg.top_k as usize,
			main_overfetch: cfg.main_overfetch as usize,
			sub_overfetch: cfg.sub_overfetch as usize,
		}
	}

	pub fn with_k(self, k: usize) -> Self {
		Self { k, ..self }
	}

	pub fn with_weights(self, main_weight: f32, sub_weight: f32) -> Self {
		Self { main_weight, sub_weight, ..self }
	}
}

impl Default for FusionParams {
	fn default() -> Self {
		Self { main_weight: 0.7, sub_weight: 0.3, k: 3, main_overfetch: 3, sub_overfetch: 2 }
	}
}

impl QuerySet {
	pub fn new(main_query: impl Into<String>, sub_queries: Vec<String>) -> Self {
		Self { main_query: main_query.into(), sub_queries }
	}

	/// Trimmed, non-blank secondary queries in their original order.
	pub fn active_sub_queries(&self) -> Vec<&str> {
		self.sub_queries.iter().map(|query| query.trim()).filter(|query| !query.is_empty()).collect()
	}
}

impl Fusion {
	pub fn empty() -> Self {
		Self { mode: RetrievalMode::Empty, candidates: Vec::new() }
	}

	pub fn documents(&self) -> Vec<RetrievedDocument> {
		self.candidates.iter().map(|candidate| candidate.document.clone()).collect()
	}

	pub fn into_documents(self) -> Vec<RetrievedDocument> {
		self.candidates.into_iter().map(|candidate| candidate.document).collect()
	}
}

impl RankFusion {
	pub fn new(search: Arc<dyn SimilaritySearch>) -> Self {
		Self { search, cache: None }
	}

	pub fn with_cache(search: Arc<dyn SimilaritySearch>, max_entries: usize) -> Self {
		Self { search, cache: Some(ResultCache::new(max_entries)) }
	}

	pub async fn fuse(&self, queries: &QuerySet, params: FusionParams) -> Vec<RetrievedDocument> {
		self.fuse_scored(queries, params).await.into_documents()
	}

	/// Runs the fused retrieval and keeps the per-document scores.
	///
	/// Never fails: a failed dominant query degrades to a plain search, and a failed plain search
	/// degrades to an empty result.
	pub async fn fuse_scored(&self, queries: &QuerySet, params: FusionParams) -> Fusion {
		let main_query = queries.main_query.trim();

		if main_query.is_empty() || params.k == 0 {
			return Fusion::empty();
		}

		let sub_queries = queries.active_sub_queries();
		let cache_key = self
			.cache
			.as_ref()
			.map(|_| cache::build_fusion_cache_key(main_query, &sub_queries, &params));

		if let (Some(cache), Some(key)) = (self.cache.as_ref(), cache_key.as_deref())
			&& let Some(candidates) = cache.get(key)
		{
			tracing::debug!(cache_key = cache_key_prefix(key), "Fusion cache hit.");

			return Fusion { mode: RetrievalMode::Fused, candidates };
		}

		let main_k = params.k.saturating_mul(params.main_overfetch.max(1));
		let main_hits = match self.search.search(main_query, main_k).await {
			Ok(hits) => hits,
			Err(err) => {
				tracing::warn!(error = %err, "Dominant query search failed; using plain search.");

				return self.fallback(main_query, params).await;
			},
		};
		let sub_k = params.k.saturating_mul(params.sub_overfetch.max(1));
		let mut sub_hits = Vec::with_capacity(sub_queries.len());

		for sub_query in &sub_queries {
			match self.search.search(sub_query, sub_k).await {
				Ok(hits) => sub_hits.push(hits),
				Err(err) => {
					tracing::warn!(error = %err, sub_query, "Sub-query search failed; skipping.");
				},
			}
		}

		let mut candidates = merge_candidates(main_hits, sub_hits, sub_queries.len(), &params);

		candidates.truncate(params.k);

		let avg_score = if candidates.is_empty() {
			0.0
		} else {
			candidates.iter().map(|candidate| candidate.fused_score).sum::<f32>()
				/ candidates.len() as f32
		};

		tracing::info!(
			documents = candidates.len(),
			sub_queries = sub_queries.len(),
			avg_score,
			"Priority-weighted retrieval completed."
		);

		if let (Some(cache), Some(key)) = (self.cache.as_ref(), cache_key) {
			cache.insert(key, candidates.clone());
		}

		Fusion { mode: RetrievalMode::Fused, candidates }
	}

	/// Single-query search without fusion. Failures yield an empty list.
	pub async fn search_plain(&self, query: &str, k: usize) -> Vec<RetrievedDocument> {
		let query = query.trim();

		if query.is_empty() || k == 0 {
			return Vec::new();
		}

		match self.search.search(query, k).await {
			Ok(mut hits) => {
				hits.truncate(k);

				hits.into_iter().map(|hit| hit.document).collect()
			},
			Err(err) => {
				tracing::warn!(error = %err, "Plain search failed.");

				Vec::new()
			},
		}
	}

	pub fn clear_cache(&self) {
		if let Some(cache) = self.cache.as_ref() {
			cache.clear();
		}
	}

	pub fn cache_len(&self) -> usize {
		self.cache.as_ref().map(ResultCache::len).unwrap_or(0)
	}

	async fn fallback(&self, main_query: &str, params: FusionParams) -> Fusion {
		match self.search.search(main_query, params.k).await {
			Ok(hits) => {
				let candidates = hits
					.into_iter()
					.take(params.k)
					.map(|hit| {
						let similarity = similarity(hit.distance);

						ScoredCandidate {
							document: hit.document,
							fused_score: similarity * params.main_weight,
							main_component: similarity,
							sub_component: 0.0,
						}
					})
					.collect();

				Fusion { mode: RetrievalMode::Fallback, candidates }
			},
			Err(err) => {
				tracing::warn!(error = %err, "Plain search fallback failed; returning no documents.");

				Fusion::empty()
			},
		}
	}
}

/// Converts a cosine-like distance into a similarity in 0.0-1.0.
pub fn similarity(distance: f32) -> f32 {
	(1.0 - distance).max(0.0)
}

/// Merges dominant and secondary hits by document prefix and orders them by fused score.
///
/// `sub_query_count` is the number of non-blank secondary queries issued, including failed ones,
/// so a failed query still takes its share of `sub_weight`. Ties keep insertion order, which puts
/// dominant-query hits first.
pub fn merge_candidates(
	main_hits: Vec<ScoredDocument>,
	sub_hits: Vec<Vec<ScoredDocument>>,
	sub_query_count: usize,
	params: &FusionParams,
) -> Vec<ScoredCandidate> {
	let mut merged: Vec<ScoredCandidate> = Vec::new();
	let mut by_key: HashMap<String, usize> = HashMap::new();

	for hit in main_hits {
		let key = hit.document.dedup_key();
		let similarity = similarity(hit.distance);

		match by_key.get(&key).copied() {
			Some(idx) => {
				let existing = &mut merged[idx];

				if similarity > existing.main_component {
					existing.main_component = similarity;
					existing.fused_score = similarity * params.main_weight;
				}
			},
			None => {
				by_key.insert(key, merged.len());
				merged.push(ScoredCandidate {
					document: hit.document,
					fused_score: similarity * params.main_weight,
					main_component: similarity,
					sub_component: 0.0,
				});
			},
		}
	}

	let per_query_weight = params.sub_weight / sub_query_count.max(1) as f32;

	for hit in sub_hits.into_iter().flatten() {
		let key = hit.document.dedup_key();
		let weighted = similarity(hit.distance) * per_query_weight;

		match by_key.get(&key).copied() {
			Some(idx) => {
				let existing = &mut merged[idx];

				existing.fused_score += weighted;
				existing.sub_component += weighted;
			},
			None => {
				by_key.insert(key, merged.len());
				merged.push(ScoredCandidate {
					document: hit.document,
					fused_score: weighted,
					main_component: 0.0,
					sub_component: weighted,
				});
			},
		}
	}

	merged.sort_by(|left, right| cmp_f32_desc(left.fused_score, right.fused_score));

	merged
}

pub fn cmp_f32_desc(a: f32, b: f32) -> Ordering {
	match (a.is_nan(), b.is_nan()) {
		(true, true) => Ordering::Equal,
		(true, false) => Ordering::Greater,
		(false, true) => Ordering::Less,
		(false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
	}
}

fn cache_key_prefix(key: &str) -> &str {
	let len = key.len().min(12);

	&key[..len]
}
