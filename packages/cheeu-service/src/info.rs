use serde::Serialize;

use crate::CheeuService;
use cheeu_domain::StressType;

#[derive(Clone, Debug, Serialize)]
pub struct StressTypeSummary {
	pub code: &'static str,
	pub label: &'static str,
	pub description: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct SystemInfo {
	pub version: &'static str,
	pub stress_types: Vec<StressTypeSummary>,
	pub stress_types_count: usize,
	pub occupations_count: usize,
	pub features: Vec<String>,
}

impl CheeuService {
	/// Static description of what this deployment supports. Makes no provider calls.
	pub fn system_info(&self) -> SystemInfo {
		let stress_types: Vec<StressTypeSummary> = StressType::ALL
			.into_iter()
			.map(|stress_type| StressTypeSummary {
				code: stress_type.code(),
				label: stress_type.label(),
				description: self.catalog.profile(stress_type).description.clone(),
			})
			.collect();
		let retrieval = &self.cfg.retrieval;
		let features = vec![
			format!(
				"우선순위 가중치 검색 ({}/{})",
				percent(retrieval.main_weight),
				percent(retrieval.sub_weight)
			),
			format!("{}가지 스트레스 유형 지원", stress_types.len()),
			"25개 직군별 키워드 매핑".to_string(),
			"폴백 시스템".to_string(),
			"신뢰도 점수 계산".to_string(),
			"배치 처리 지원".to_string(),
		];

		SystemInfo {
			version: env!("CARGO_PKG_VERSION"),
			stress_types_count: stress_types.len(),
			stress_types,
			occupations_count: self.catalog.occupations().len(),
			features,
		}
	}
}

fn percent(weight: f32) -> u32 {
	(weight * 100.0).round().max(0.0) as u32
}
