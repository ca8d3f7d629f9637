use std::sync::Arc;

use cheeu_service::{FusionParams, QuerySet, RankFusion, RetrievalMode};

use super::{StubSearch, hit};

fn queries(main: &str, subs: &[&str]) -> QuerySet {
	QuerySet::new(main, subs.iter().map(|sub| sub.to_string()).collect())
}

fn contents(fusion: &cheeu_service::Fusion) -> Vec<String> {
	fusion.candidates.iter().map(|candidate| candidate.document.content.clone()).collect()
}

fn assert_close(actual: f32, expected: f32) {
	assert!((actual - expected).abs() < 1e-5, "expected {expected}, got {actual}");
}

#[tokio::test]
async fn burnout_scenario_ranks_by_weighted_evidence() {
	let main_hits = (1..=9).map(|i| hit(&format!("D{i} 연구 요약"), i as f32 / 10.0)).collect();
	let search = Arc::new(
		StubSearch::new()
			.with("번아웃 무기력 우울형", main_hits)
			.with("20대", vec![hit("D5 연구 요약", 0.0), hit("D3 연구 요약", 0.5)])
			.with("여성", vec![hit("D5 연구 요약", 0.2), hit("D9 연구 요약", 0.0)])
			.with("보건·의료", vec![hit("D5 연구 요약", 0.1), hit("D2 연구 요약", 0.0)]),
	);
	let fusion = RankFusion::new(search.clone());
	let result = fusion
		.fuse_scored(
			&queries("번아웃 무기력 우울형", &["20대", "여성", "보건·의료"]),
			FusionParams::default(),
		)
		.await;

	assert_eq!(result.mode, RetrievalMode::Fused);
	assert_eq!(contents(&result), vec!["D2 연구 요약", "D1 연구 요약", "D5 연구 요약"]);
	assert_close(result.candidates[0].fused_score, 0.66);
	assert_close(result.candidates[1].fused_score, 0.63);
	assert_close(result.candidates[2].fused_score, 0.62);
	assert_close(result.candidates[2].main_component, 0.5);
	assert_close(result.candidates[2].sub_component, 0.27);
	assert_eq!(
		search.calls(),
		vec![
			("번아웃 무기력 우울형".to_string(), 9),
			("20대".to_string(), 6),
			("여성".to_string(), 6),
			("보건·의료".to_string(), 6),
		]
	);
}

#[tokio::test]
async fn document_found_by_both_queries_sums_contributions() {
	let search = Arc::new(
		StubSearch::new()
			.with("불안 불안형", vec![hit("호흡 훈련", 0.2)])
			.with("20대", vec![hit("호흡 훈련", 0.4)]),
	);
	let fusion = RankFusion::new(search);
	let result =
		fusion.fuse_scored(&queries("불안 불안형", &["20대"]), FusionParams::default()).await;

	assert_eq!(result.candidates.len(), 1);
	assert_close(result.candidates[0].fused_score, 0.74);
}

#[tokio::test]
async fn without_sub_queries_order_matches_similarity() {
	let search = Arc::new(StubSearch::new().with(
		"우울",
		vec![hit("a", 0.05), hit("b", 0.3), hit("c", 0.31), hit("d", 0.9)],
	));
	let fusion = RankFusion::new(search.clone());
	let result = fusion.fuse_scored(&queries("우울", &[" ", ""]), FusionParams::default()).await;

	assert_eq!(contents(&result), vec!["a", "b", "c"]);
	assert_eq!(search.calls().len(), 1);
}

#[tokio::test]
async fn result_size_is_bounded_by_k_and_unique_documents() {
	let search = Arc::new(
		StubSearch::new()
			.with("q", vec![hit("a", 0.1), hit("a", 0.2)])
			.with("s", vec![hit("b", 0.1), hit("a", 0.3)]),
	);
	let fusion = RankFusion::new(search);
	let few = fusion.fuse_scored(&queries("q", &["s"]), FusionParams::default()).await;

	assert_eq!(few.candidates.len(), 2);

	let one = fusion.fuse_scored(&queries("q", &["s"]), FusionParams::default().with_k(1)).await;

	assert_eq!(contents(&one), vec!["a"]);
}

#[tokio::test]
async fn failed_dominant_query_falls_back_to_plain_search() {
	let search = Arc::new(
		StubSearch::new()
			.with("불면 위기형", vec![hit("x", 0.1), hit("y", 0.2), hit("z", 0.3), hit("w", 0.4)])
			.max_k(3),
	);
	let fusion = RankFusion::new(search.clone());
	let result = fusion.fuse_scored(&queries("불면 위기형", &["20대"]), FusionParams::default()).await;

	assert_eq!(result.mode, RetrievalMode::Fallback);
	assert_eq!(contents(&result), vec!["x", "y", "z"]);
	assert_close(result.candidates[0].fused_score, 0.9 * 0.7);
	assert_eq!(
		search.calls(),
		vec![("불면 위기형".to_string(), 9), ("불면 위기형".to_string(), 3)]
	);
}

#[tokio::test]
async fn failed_fallback_returns_nothing() {
	let search = Arc::new(StubSearch::new().failing("불면"));
	let fusion = RankFusion::new(search.clone());
	let result = fusion.fuse_scored(&queries("불면", &["20대"]), FusionParams::default()).await;

	assert_eq!(result.mode, RetrievalMode::Empty);
	assert!(result.candidates.is_empty());
	assert_eq!(search.calls().len(), 2);
}

#[tokio::test]
async fn failed_sub_query_is_skipped_but_keeps_its_share() {
	let search = Arc::new(
		StubSearch::new()
			.with("main", vec![hit("m", 0.5)])
			.with("ok", vec![hit("s", 0.0)])
			.failing("broken"),
	);
	let fusion = RankFusion::new(search);
	let result = fusion.fuse_scored(&queries("main", &["ok", "broken"]), FusionParams::default()).await;

	assert_eq!(result.mode, RetrievalMode::Fused);
	assert_eq!(contents(&result), vec!["m", "s"]);
	assert_close(result.candidates[1].fused_score, 0.15);
}

#[tokio::test]
async fn blank_dominant_query_skips_search() {
	let search = Arc::new(StubSearch::new().with_default(vec![hit("a", 0.1)]));
	let fusion = RankFusion::new(search.clone());
	let result = fusion.fuse(&queries("   ", &["20대"]), FusionParams::default()).await;

	assert!(result.is_empty());
	assert!(search.calls().is_empty());
}

#[tokio::test]
async fn cached_rankings_skip_search_until_cleared() {
	let search = Arc::new(StubSearch::new().with_default(vec![hit("a", 0.1)]));
	let fusion = RankFusion::with_cache(search.clone(), 8);
	let set = queries("불안", &["20대"]);
	let first = fusion.fuse(&set, FusionParams::default()).await;
	let second = fusion.fuse(&set, FusionParams::default()).await;

	assert_eq!(first, second);
	assert_eq!(search.calls().len(), 2);
	assert_eq!(fusion.cache_len(), 1);

	fusion.clear_cache();
	fusion.fuse(&set, FusionParams::default()).await;

	assert_eq!(search.calls().len(), 4);
}

#[tokio::test]
async fn fallback_results_are_not_cached() {
	let search = Arc::new(StubSearch::new().with_default(vec![hit("a", 0.1)]).max_k(3));
	let fusion = RankFusion::with_cache(search, 8);

	fusion.fuse(&queries("불안", &[]), FusionParams::default()).await;

	assert_eq!(fusion.cache_len(), 0);
}
