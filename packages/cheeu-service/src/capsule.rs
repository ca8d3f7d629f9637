//! Healing capsule generation: retrieval, prompt assembly, and LLM generation with a templated
//! fallback.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{CheeuService, Error, Result, confidence, prompt, query};
use cheeu_domain::{RetrievedDocument, UserProfile, catalog::CHARACTER_NAME};

const UNKNOWN_SOURCE: &str = "Unknown";
const ERROR_MESSAGE: &str =
	"시스템 오류로 인해 치유 캡슐을 생성할 수 없습니다. 잠시 후 다시 시도해주세요.";
const ERROR_STRESS_TYPE: &str = "오류";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CapsuleRequest {
	pub user_input: String,
	pub profile: UserProfile,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HealingCapsule {
	pub capsule_id: Uuid,
	pub success: bool,
	pub healing_message: String,
	/// Display name of the character delivering the capsule.
	pub character: String,
	/// Korean stress classification label.
	pub stress_type: String,
	pub therapy_methods_used: Vec<String>,
	pub sources: Vec<String>,
	pub keywords_used: Vec<String>,
	pub confidence_score: f32,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
	/// Set when the message came from the stress-type template instead of the generator.
	pub fallback: bool,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct BatchItem {
	pub index: usize,
	pub success: bool,
	pub capsule: HealingCapsule,
}

#[derive(Clone, Debug, Serialize)]
pub struct BatchResponse {
	pub total: usize,
	pub succeeded: usize,
	pub failed: usize,
	pub items: Vec<BatchItem>,
}

impl CheeuService {
	/// Always yields a capsule: unusable requests get an error capsule, and retrieval or
	/// generation failures get the stress-type fallback capsule.
	pub async fn generate_capsule(&self, req: CapsuleRequest) -> HealingCapsule {
		let user_input = req.user_input.trim();
		let profile = &req.profile;

		if user_input.is_empty() {
			tracing::warn!("Capsule request has blank user_input.");

			return error_capsule("user_input must be non-empty.");
		}
		if profile.nickname.trim().is_empty() {
			tracing::warn!("Capsule request has blank nickname.");

			return error_capsule("profile.nickname must be non-empty.");
		}

		let queries = query::build_query_set(user_input, profile, &self.catalog);

		tracing::info!(
			stress_type = profile.stress_type.code(),
			sub_queries = queries.sub_queries.len(),
			"Capsule retrieval started."
		);

		let documents = self.fusion.fuse(&queries, self.fusion_params()).await;

		if documents.is_empty() {
			tracing::warn!(
				stress_type = profile.stress_type.code(),
				"No research documents found; using fallback capsule."
			);

			return self.fallback_capsule(profile, None);
		}

		let context = prompt::format_research_context(
			&documents,
			self.cfg.generation.context_max_chars as usize,
		);
		let capsule_prompt = prompt::build_capsule_prompt(profile, user_input, &context);
		let message = match self.generate_with_retries(&capsule_prompt).await {
			Ok(message) => message,
			Err(err) => {
				tracing::warn!(error = %err, "Capsule generation failed; using fallback capsule.");

				return self.fallback_capsule(profile, Some(err.to_string()));
			},
		};
		let confidence_score = confidence::score(&documents, &profile.personal_keywords);
		let character = self.catalog.character(profile.stress_type);

		tracing::info!(
			stress_type = profile.stress_type.code(),
			documents = documents.len(),
			confidence_score,
			"Healing capsule generated."
		);

		HealingCapsule {
			capsule_id: Uuid::new_v4(),
			success: true,
			healing_message: message,
			character: character.name,
			stress_type: character.stress_type,
			therapy_methods_used: character.therapy_methods,
			sources: document_sources(&documents),
			keywords_used: profile.personal_keywords.clone(),
			confidence_score,
			created_at: OffsetDateTime::now_utc(),
			fallback: false,
			error: None,
		}
	}

	/// Processes each request independently; one failure does not affect the others.
	pub async fn generate_batch(&self, requests: Vec<CapsuleRequest>) -> BatchResponse {
		let total = requests.len();
		let mut items = Vec::with_capacity(total);

		for (index, req) in requests.into_iter().enumerate() {
			let capsule = self.generate_capsule(req).await;

			items.push(BatchItem { index, success: capsule.success, capsule });
		}

		let succeeded = items.iter().filter(|item| item.success).count();

		BatchResponse { total, succeeded, failed: total - succeeded, items }
	}

	/// Template capsule for the profile's stress type, carrying the configured fixed confidence.
	pub fn fallback_capsule(&self, profile: &UserProfile, error: Option<String>) -> HealingCapsule {
		let character = self.catalog.character(profile.stress_type);

		HealingCapsule {
			capsule_id: Uuid::new_v4(),
			success: true,
			healing_message: self.catalog.fallback_message(profile.stress_type),
			character: character.name,
			stress_type: character.stress_type,
			therapy_methods_used: character.therapy_methods,
			sources: Vec::new(),
			keywords_used: profile.personal_keywords.clone(),
			confidence_score: self.cfg.generation.fallback_confidence,
			created_at: OffsetDateTime::now_utc(),
			fallback: true,
			error,
		}
	}

	async fn generate_with_retries(&self, prompt: &str) -> Result<String> {
		let attempts = self.cfg.generation.max_retries.max(1);
		let mut last_error = String::new();

		for attempt in 1..=attempts {
			match self.providers.generator.generate(prompt).await {
				Ok(text) if !text.trim().is_empty() => return Ok(text.trim().to_string()),
				Ok(_) => {
					last_error = "Generator returned an empty response.".to_string();

					tracing::warn!(attempt, attempts, "Generator returned an empty response.");
				},
				Err(err) => {
					tracing::warn!(error = %err, attempt, attempts, "Generator call failed.");

					last_error = err.to_string();
				},
			}
		}

		Err(Error::Provider { message: last_error })
	}
}

/// Capsule returned for requests that cannot be processed at all.
pub fn error_capsule(error: impl Into<String>) -> HealingCapsule {
	HealingCapsule {
		capsule_id: Uuid::new_v4(),
		success: false,
		healing_message: ERROR_MESSAGE.to_string(),
		character: CHARACTER_NAME.to_string(),
		stress_type: ERROR_STRESS_TYPE.to_string(),
		therapy_methods_used: Vec::new(),
		sources: Vec::new(),
		keywords_used: Vec::new(),
		confidence_score: 0.0,
		created_at: OffsetDateTime::now_utc(),
		fallback: true,
		error: Some(error.into()),
	}
}

fn document_sources(documents: &[RetrievedDocument]) -> Vec<String> {
	documents
		.iter()
		.map(|doc| doc.filename().unwrap_or(UNKNOWN_SOURCE).to_string())
		.collect()
}
