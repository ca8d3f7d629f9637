use std::sync::Arc;

use cheeu_domain::Catalog;
use cheeu_service::CapsuleRequest;

use super::{StubGenerator, StubSearch, hit, named_hit, profile, service};

fn request(user_input: &str) -> CapsuleRequest {
	CapsuleRequest { user_input: user_input.to_string(), profile: profile() }
}

fn research_hits() -> Vec<cheeu_domain::ScoredDocument> {
	vec![
		named_hit(
			"번아웃을 겪는 간호사에게 마음챙김 훈련을 적용했다. 정서적 소진이 줄었다. 수면의 질이 개선되었다.",
			"mbsr_nurses.pdf",
			0.1,
		),
		hit("행동활성화는 우울 증상을 완화한다.", 0.3),
	]
}

#[tokio::test]
async fn grounded_capsule_reports_sources_and_confidence() {
	let search = Arc::new(StubSearch::new().with_default(research_hits()));
	let generator = Arc::new(StubGenerator::replying("  💙 오늘은 잠시 쉬어가요.  "));
	let svc = service(search, generator.clone());
	let capsule = svc.generate_capsule(request("야간 근무 후 너무 지쳐요")).await;
	let character = Catalog::builtin().character(profile().stress_type);

	assert!(capsule.success);
	assert!(!capsule.fallback);
	assert_eq!(capsule.error, None);
	assert_eq!(capsule.healing_message, "💙 오늘은 잠시 쉬어가요.");
	assert_eq!(capsule.character, character.name);
	assert_eq!(capsule.stress_type, character.stress_type);
	assert_eq!(capsule.therapy_methods_used, character.therapy_methods);
	assert_eq!(capsule.sources, vec!["mbsr_nurses.pdf", "Unknown"]);
	assert_eq!(capsule.keywords_used, vec!["번아웃", "수면"]);
	assert!(capsule.confidence_score > 0.0 && capsule.confidence_score <= 1.0);
	assert_eq!(generator.calls(), 1);
}

#[tokio::test]
async fn failed_generation_is_retried() {
	let search = Arc::new(StubSearch::new().with_default(research_hits()));
	let generator = Arc::new(StubGenerator::scripted(
		vec![Err("timeout".to_string()), Ok("   ".to_string())],
		Ok("세 번째 시도".to_string()),
	));
	let svc = service(search, generator.clone());
	let capsule = svc.generate_capsule(request("불안해요")).await;

	assert!(!capsule.fallback);
	assert_eq!(capsule.healing_message, "세 번째 시도");
	assert_eq!(generator.calls(), 3);
}

#[tokio::test]
async fn exhausted_retries_degrade_to_fallback_capsule() {
	let search = Arc::new(StubSearch::new().with_default(research_hits()));
	let generator = Arc::new(StubGenerator::failing("model overloaded"));
	let svc = service(search, generator.clone());
	let capsule = svc.generate_capsule(request("불안해요")).await;

	assert!(capsule.success);
	assert!(capsule.fallback);
	assert!(capsule.error.as_deref().is_some_and(|err| err.contains("model overloaded")));
	assert_eq!(capsule.confidence_score, 0.3);
	assert!(capsule.sources.is_empty());
	assert_eq!(capsule.healing_message, Catalog::builtin().fallback_message(profile().stress_type));
	assert_eq!(generator.calls(), 3);
}

#[tokio::test]
async fn empty_retrieval_uses_fallback_without_generation() {
	let search = Arc::new(StubSearch::new());
	let generator = Arc::new(StubGenerator::replying("unused"));
	let svc = service(search, generator.clone());
	let capsule = svc.generate_capsule(request("잠이 안 와요")).await;

	assert!(capsule.fallback);
	assert_eq!(capsule.error, None);
	assert!(capsule.healing_message.contains("🔧 실천 방법:"));
	assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn blank_input_or_nickname_yields_error_capsule() {
	let search = Arc::new(StubSearch::new().with_default(research_hits()));
	let generator = Arc::new(StubGenerator::replying("x"));
	let svc = service(search.clone(), generator.clone());
	let blank_input = svc.generate_capsule(request("  ")).await;

	assert!(!blank_input.success);
	assert!(blank_input.fallback);
	assert_eq!(blank_input.confidence_score, 0.0);
	assert_eq!(blank_input.stress_type, "오류");
	assert!(blank_input.error.as_deref().is_some_and(|err| err.contains("user_input")));
	assert!(!blank_input.healing_message.is_empty());
	assert!(blank_input.sources.is_empty());

	let mut req = request("힘들어요");

	req.profile.nickname = " ".to_string();

	let blank_nickname = svc.generate_capsule(req).await;

	assert!(!blank_nickname.success);
	assert!(blank_nickname.error.as_deref().is_some_and(|err| err.contains("nickname")));
	assert!(search.calls().is_empty());
	assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn batch_reports_each_item_independently() {
	let search = Arc::new(StubSearch::new().with_default(research_hits()));
	let svc = service(search, Arc::new(StubGenerator::replying("괜찮아요")));
	let report = svc.generate_batch(vec![request("지쳐요"), request(""), request("불안해요")]).await;

	assert_eq!(report.total, 3);
	assert_eq!(report.succeeded, 2);
	assert_eq!(report.failed, 1);
	assert!(!report.items[1].success);
	assert!(report.items[1].capsule.error.is_some());
	assert!(report.items[2].success);
	assert!(report.items[2].capsule.success);
}
