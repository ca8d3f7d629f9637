use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub providers: Providers,
	#[serde(default)]
	pub retrieval: Retrieval,
	#[serde(default)]
	pub generation: Generation,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub http_bind: String,
	/// Listener for admin routes. Must be a loopback address.
	pub admin_bind: String,
	pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Providers {
	pub search: SearchProviderConfig,
	pub llm: LlmProviderConfig,
}

/// Nearest-neighbour search endpoint. Distances are expected to be cosine-like, roughly bounded
/// in 0.0-1.0, because fusion converts them with `1 - distance`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: Option<String>,
	pub path: String,
	pub collection: String,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: Option<String>,
	pub path: String,
	pub model: String,
	pub temperature: f32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Retrieval {
	#[serde(default = "default_main_weight")]
	pub main_weight: f32,
	#[serde(default = "default_sub_weight")]
	pub sub_weight: f32,
	#[serde(default = "default_top_k")]
	pub top_k: u32,
	/// Multiplier applied to `top_k` for the dominant query.
	#[serde(default = "default_main_overfetch")]
	pub main_overfetch: u32,
	/// Multiplier applied to `top_k` for each secondary query.
	#[serde(default = "default_sub_overfetch")]
	pub sub_overfetch: u32,
	#[serde(default)]
	pub cache: RetrievalCache,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RetrievalCache {
	#[serde(default = "default_true")]
	pub enabled: bool,
	#[serde(default = "default_cache_entries")]
	pub max_entries: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Generation {
	#[serde(default = "default_max_retries")]
	pub max_retries: u32,
	/// Confidence reported for capsules built from the fallback template.
	#[serde(default = "default_fallback_confidence")]
	pub fallback_confidence: f32,
	/// Per-document character budget for the research context in the prompt.
	#[serde(default = "default_context_max_chars")]
	pub context_max_chars: u32,
}

impl Default for Retrieval {
	fn default() -> Self {
		Self {
			main_weight: default_main_weight(),
			sub_weight: default_sub_weight(),
			top_k: default_top_k(),
			main_overfetch: default_main_overfetch(),
			sub_overfetch: default_sub_overfetch(),
			cache: RetrievalCache::default(),
		}
	}
}

impl Default for RetrievalCache {
	fn default() -> Self {
		Self { enabled: true, max_entries: default_cache_entries() }
	}
}

impl Default for Generation {
	fn default() -> Self {
		Self {
			max_retries: default_max_retries(),
			fallback_confidence: default_fallback_confidence(),
			context_max_chars: default_context_max_chars(),
		}
	}
}

fn default_main_weight() -> f32 {
	0.7
}

fn default_sub_weight() -> f32 {
	0.3
}

fn default_top_k() -> u32 {
	3
}

fn default_main_overfetch() -> u32 {
	3
}

fn default_sub_overfetch() -> u32 {
	2
}

fn default_true() -> bool {
	true
}

fn default_cache_entries() -> u32 {
	100
}

fn default_max_retries() -> u32 {
	3
}

fn default_fallback_confidence() -> f32 {
	0.3
}

fn default_context_max_chars() -> u32 {
	500
}
