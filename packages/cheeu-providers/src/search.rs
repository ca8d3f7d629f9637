use std::time::Duration;

use color_eyre::{Result, eyre};
use reqwest::Client;
use serde_json::{Map, Value};

use cheeu_domain::{RetrievedDocument, ScoredDocument};

pub async fn search(
	cfg: &cheeu_config::SearchProviderConfig,
	query: &str,
	k: usize,
) -> Result<Vec<ScoredDocument>> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({
		"collection": cfg.collection,
		"query": query,
		"k": k,
	});
	let res = client
		.post(url)
		.headers(crate::auth_headers(cfg.api_key.as_deref(), &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_search_response(json)
}

fn parse_search_response(json: Value) -> Result<Vec<ScoredDocument>> {
	let results = json
		.get("results")
		.or_else(|| json.get("documents"))
		.and_then(|v| v.as_array())
		.ok_or_else(|| eyre::eyre!("Search response is missing results array."))?;
	let mut out = Vec::with_capacity(results.len());

	for item in results {
		let content = item
			.get("content")
			.or_else(|| item.get("page_content"))
			.and_then(|v| v.as_str())
			.ok_or_else(|| eyre::eyre!("Search result missing content."))?;
		let metadata = match item.get("metadata") {
			Some(Value::Object(map)) => map.clone(),
			Some(Value::Null) | None => Map::new(),
			Some(_) => return Err(eyre::eyre!("Search result metadata must be an object.")),
		};
		let distance = item
			.get("distance")
			.and_then(|v| v.as_f64())
			.ok_or_else(|| eyre::eyre!("Search result missing distance."))? as f32;

		if !distance.is_finite() || distance < 0.0 {
			return Err(eyre::eyre!("Search result distance must be a non-negative number."));
		}

		out.push(ScoredDocument { document: RetrievedDocument::new(content, metadata), distance });
	}

	Ok(out)
}
