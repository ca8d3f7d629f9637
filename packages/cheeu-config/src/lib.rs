mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Config, Generation, LlmProviderConfig, Providers, Retrieval, RetrievalCache,
	SearchProviderConfig, Service,
};

use std::{fs, net::SocketAddr, path::Path};

/// Largest result count a single retrieval may request.
pub const MAX_TOP_K: u32 = 50;

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	for (label, value) in [
		("service.http_bind", &cfg.service.http_bind),
		("service.admin_bind", &cfg.service.admin_bind),
		("service.log_level", &cfg.service.log_level),
		("providers.search.api_base", &cfg.providers.search.api_base),
		("providers.search.collection", &cfg.providers.search.collection),
		("providers.llm.api_base", &cfg.providers.llm.api_base),
		("providers.llm.model", &cfg.providers.llm.model),
	] {
		if value.trim().is_empty() {
			return Err(Error::Validation { message: format!("{label} must be non-empty.") });
		}
	}

	let admin_addr: SocketAddr = cfg.service.admin_bind.parse().map_err(|_| Error::Validation {
		message: "service.admin_bind must be a socket address.".to_string(),
	})?;

	if !admin_addr.ip().is_loopback() {
		return Err(Error::Validation {
			message: "service.admin_bind must be a loopback address.".to_string(),
		});
	}

	for (label, timeout_ms) in [
		("providers.search.timeout_ms", cfg.providers.search.timeout_ms),
		("providers.llm.timeout_ms", cfg.providers.llm.timeout_ms),
	] {
		if timeout_ms == 0 {
			return Err(Error::Validation {
				message: format!("{label} must be greater than zero."),
			});
		}
	}

	for (label, headers) in [
		("providers.search.default_headers", &cfg.providers.search.default_headers),
		("providers.llm.default_headers", &cfg.providers.llm.default_headers),
	] {
		if headers.values().any(|value| !value.is_string()) {
			return Err(Error::Validation {
				message: format!("{label} values must be strings."),
			});
		}
	}

	let temperature = cfg.providers.llm.temperature;

	if !temperature.is_finite() {
		return Err(Error::Validation {
			message: "providers.llm.temperature must be a finite number.".to_string(),
		});
	}
	if !(0.0..=2.0).contains(&temperature) {
		return Err(Error::Validation {
			message: "providers.llm.temperature must be in the range 0.0-2.0.".to_string(),
		});
	}

	let retrieval = &cfg.retrieval;

	for (label, weight) in [
		("retrieval.main_weight", retrieval.main_weight),
		("retrieval.sub_weight", retrieval.sub_weight),
	] {
		if !weight.is_finite() {
			return Err(Error::Validation {
				message: format!("{label} must be a finite number."),
			});
		}
		if weight < 0.0 {
			return Err(Error::Validation { message: format!("{label} must be zero or greater.") });
		}
	}

	if retrieval.main_weight + retrieval.sub_weight <= 0.0 {
		return Err(Error::Validation {
			message: "retrieval.main_weight and retrieval.sub_weight must not both be zero."
				.to_string(),
		});
	}
	if retrieval.top_k == 0 {
		return Err(Error::Validation {
			message: "retrieval.top_k must be greater than zero.".to_string(),
		});
	}
	if retrieval.top_k > MAX_TOP_K {
		return Err(Error::Validation {
			message: format!("retrieval.top_k must be at most {MAX_TOP_K}."),
		});
	}
	if retrieval.main_overfetch < 2 {
		return Err(Error::Validation {
			message: "retrieval.main_overfetch must be at least 2.".to_string(),
		});
	}
	if retrieval.sub_overfetch == 0 {
		return Err(Error::Validation {
			message: "retrieval.sub_overfetch must be greater than zero.".to_string(),
		});
	}
	if retrieval.cache.enabled && retrieval.cache.max_entries == 0 {
		return Err(Error::Validation {
			message: "retrieval.cache.max_entries must be greater than zero when enabled."
				.to_string(),
		});
	}

	let generation = &cfg.generation;

	if generation.max_retries == 0 {
		return Err(Error::Validation {
			message: "generation.max_retries must be greater than zero.".to_string(),
		});
	}
	if !generation.fallback_confidence.is_finite()
		|| !(0.0..=1.0).contains(&generation.fallback_confidence)
	{
		return Err(Error::Validation {
			message: "generation.fallback_confidence must be in the range 0.0-1.0.".to_string(),
		});
	}
	if generation.context_max_chars == 0 {
		return Err(Error::Validation {
			message: "generation.context_max_chars must be greater than zero.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg.providers.search.api_key.as_deref().map(|key| key.trim().is_empty()).unwrap_or(false) {
		cfg.providers.search.api_key = None;
	}
	if cfg.providers.llm.api_key.as_deref().map(|key| key.trim().is_empty()).unwrap_or(false) {
		cfg.providers.llm.api_key = None;
	}
}
