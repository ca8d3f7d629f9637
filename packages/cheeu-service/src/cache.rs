use std::{
	collections::{HashMap, VecDeque},
	sync::{Mutex, PoisonError},
};

use serde_json::Value;

use crate::fusion::{FusionParams, ScoredCandidate};

const FUSION_CACHE_SCHEMA_VERSION: i32 = 1;

/// Bounded in-memory store of fused rankings. The oldest entry is evicted once the bound is
/// reached.
pub struct ResultCache {
	max_entries: usize,
	state: Mutex<CacheState>,
}

#[derive(Default)]
struct CacheState {
	entries: HashMap<String, Vec<ScoredCandidate>>,
	order: VecDeque<String>,
}

impl ResultCache {
	pub fn new(max_entries: usize) -> Self {
		Self { max_entries: max_entries.max(1), state: Mutex::new(CacheState::default()) }
	}

	pub fn get(&self, key: &str) -> Option<Vec<ScoredCandidate>> {
		let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

		state.entries.get(key).cloned()
	}

	pub fn insert(&self, key: String, candidates: Vec<ScoredCandidate>) {
		let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

		if state.entries.contains_key(&key) {
			state.entries.insert(key, candidates);

			return;
		}

		while state.order.len() >= self.max_entries {
			let Some(oldest) = state.order.pop_front() else { break };

			state.entries.remove(&oldest);
		}

		state.order.push_back(key.clone());
		state.entries.insert(key, candidates);
	}

	pub fn len(&self) -> usize {
		self.state.lock().unwrap_or_else(PoisonError::into_inner).entries.len()
	}

	pub fn clear(&self) {
		let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

		state.entries.clear();
		state.order.clear();
	}
}

pub fn build_fusion_cache_key(
	main_query: &str,
	sub_queries: &[&str],
	params: &FusionParams,
) -> String {
	let payload = serde_json::json!({
		"kind": "fusion",
		"schema_version": FUSION_CACHE_SCHEMA_VERSION,
		"main_query": main_query.trim(),
		"sub_queries": sub_queries,
		"main_weight": params.main_weight,
		"sub_weight": params.sub_weight,
		"k": params.k,
		"main_overfetch": params.main_overfetch,
		"sub_overfetch": params.sub_overfetch,
	});

	hash_cache_key(&payload)
}

fn hash_cache_key(payload: &Value) -> String {
	blake3::hash(payload.to_string().as_bytes()).to_hex().to_string()
}
