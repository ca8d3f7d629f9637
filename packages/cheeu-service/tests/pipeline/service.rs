use std::sync::Arc;

use cheeu_service::{
	Error, HttpSearch, HttpTextGenerator, RetrievalMode, SearchRequest, SimilaritySearch,
	TextGenerator,
};

use super::{StubGenerator, StubSearch, hit, service, test_config};

fn search_request(main_query: &str, k: Option<u32>) -> SearchRequest {
	SearchRequest {
		main_query: main_query.to_string(),
		sub_queries: vec!["20대".to_string()],
		keywords: vec!["호흡".to_string()],
		k,
	}
}

#[tokio::test]
async fn search_report_includes_scores_and_confidence() {
	let search = Arc::new(
		StubSearch::new()
			.with("불안", vec![hit("호흡 명상은 불안을 줄인다.", 0.2)])
			.with("20대", vec![hit("청년 스트레스", 0.0)]),
	);
	let svc = service(search, Arc::new(StubGenerator::replying("x")));
	let report = svc.search(search_request("불안", None)).await.expect("report");

	assert_eq!(report.mode, RetrievalMode::Fused);
	assert_eq!(report.k, 3);
	assert_eq!(report.documents.len(), 2);
	assert_eq!(report.documents[0].document.content, "호흡 명상은 불안을 줄인다.");
	assert!(report.confidence > 0.0);
}

#[tokio::test]
async fn blank_main_query_reports_empty_with_zero_confidence() {
	let search = Arc::new(StubSearch::new().with_default(vec![hit("a", 0.1)]));
	let svc = service(search.clone(), Arc::new(StubGenerator::replying("x")));
	let report = svc.search(search_request(" ", Some(2))).await.expect("report");

	assert_eq!(report.mode, RetrievalMode::Empty);
	assert!(report.documents.is_empty());
	assert_eq!(report.confidence, 0.0);
	assert!(search.calls().is_empty());
}

#[tokio::test]
async fn out_of_range_k_is_rejected() {
	let svc = service(Arc::new(StubSearch::new()), Arc::new(StubGenerator::replying("x")));

	assert!(matches!(
		svc.search(search_request("불안", Some(0))).await,
		Err(Error::InvalidRequest { .. })
	));
	assert!(matches!(svc.plain_search("불안", Some(51)).await, Err(Error::InvalidRequest { .. })));
}

#[tokio::test]
async fn plain_search_returns_documents_in_service_order() {
	let search = Arc::new(StubSearch::new().with("불면", vec![hit("a", 0.4), hit("b", 0.1)]));
	let svc = service(search.clone(), Arc::new(StubGenerator::replying("x")));
	let docs = svc.plain_search("불면", Some(5)).await.expect("docs");

	assert_eq!(docs.iter().map(|doc| doc.content.as_str()).collect::<Vec<_>>(), vec!["a", "b"]);
	assert_eq!(search.calls(), vec![("불면".to_string(), 5)]);
}

#[tokio::test]
async fn clear_cache_reports_removed_entries() {
	let search = Arc::new(StubSearch::new().with_default(vec![hit("a", 0.1)]));
	let svc = service(search, Arc::new(StubGenerator::replying("x")));

	svc.search(search_request("불안", None)).await.expect("report");
	svc.search(search_request("우울", None)).await.expect("report");

	assert_eq!(svc.clear_cache(), 2);
	assert_eq!(svc.clear_cache(), 0);
}

#[tokio::test]
async fn health_check_covers_search() {
	let healthy = service(
		Arc::new(StubSearch::new().with_default(vec![hit("a", 0.1), hit("b", 0.2)])),
		Arc::new(StubGenerator::replying("x")),
	)
	.health_check()
	.await;

	assert!(healthy.healthy);
	assert!(healthy.search_healthy);
	assert!(healthy.generator_healthy);
	assert_eq!(healthy.search_documents, 1);
	assert_eq!(healthy.search_provider, "stub");
	assert_eq!(healthy.generator_provider, "stub");

	let unhealthy = service(
		Arc::new(StubSearch::new().failing("스트레스")),
		Arc::new(StubGenerator::replying("x")),
	)
	.health_check()
	.await;

	assert!(!unhealthy.healthy);
	assert!(!unhealthy.search_healthy);
	assert!(unhealthy.generator_healthy);
	assert!(unhealthy.search_error.is_some());
}

#[tokio::test]
async fn health_check_treats_empty_index_as_unhealthy() {
	let report = service(Arc::new(StubSearch::new()), Arc::new(StubGenerator::replying("x")))
		.health_check()
		.await;

	assert!(!report.healthy);
	assert!(!report.search_healthy);
	assert_eq!(report.search_documents, 0);
	assert_eq!(report.search_error.as_deref(), Some("Search index returned no documents."));
}

#[tokio::test]
async fn health_check_covers_generator() {
	let generator = Arc::new(StubGenerator::failing("model offline"));
	let report = service(
		Arc::new(StubSearch::new().with_default(vec![hit("a", 0.1)])),
		generator.clone(),
	)
	.health_check()
	.await;

	assert!(!report.healthy);
	assert!(report.search_healthy);
	assert!(!report.generator_healthy);
	assert!(report.generator_error.as_deref().is_some_and(|err| err.contains("model offline")));
	assert_eq!(generator.calls(), 1);

	let silent = service(
		Arc::new(StubSearch::new().with_default(vec![hit("a", 0.1)])),
		Arc::new(StubGenerator::replying("   ")),
	)
	.health_check()
	.await;

	assert!(!silent.generator_healthy);
}

#[tokio::test]
async fn system_info_reflects_catalog_and_weights() {
	let info =
		service(Arc::new(StubSearch::new()), Arc::new(StubGenerator::replying("x"))).system_info();

	assert_eq!(info.stress_types_count, 8);
	assert_eq!(info.stress_types.len(), 8);
	assert_eq!(info.occupations_count, 31);
	assert_eq!(info.features[0], "우선순위 가중치 검색 (70/30)");
	assert_eq!(info.features[1], "8가지 스트레스 유형 지원");
	assert!(info.stress_types.iter().all(|entry| !entry.description.is_empty()));
}

#[tokio::test]
async fn http_provider_errors_name_the_provider() {
	let providers = test_config().providers;
	let search_err = HttpSearch::new(providers.search)
		.search("불안", 1)
		.await
		.expect_err("unreachable search backend");

	assert_eq!(search_err.to_string(), "Search provider stub request failed.");

	let generator_err = HttpTextGenerator::new(providers.llm)
		.generate("안녕하세요")
		.await
		.expect_err("unreachable generator backend");

	assert_eq!(generator_err.to_string(), "Generator provider stub request failed.");
}
