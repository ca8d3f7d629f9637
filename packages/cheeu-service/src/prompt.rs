use cheeu_domain::{RetrievedDocument, UserProfile};

const NO_RESEARCH_CONTEXT: &str = "관련 연구 자료를 찾을 수 없습니다.";
const NO_SURVEY_FEATURES: &str = "없음";
const TRUNCATION_MARKER: &str = "...";

/// Renders retrieved documents as a numbered research digest for the capsule prompt.
pub fn format_research_context(documents: &[RetrievedDocument], max_chars: usize) -> String {
	if documents.is_empty() {
		return NO_RESEARCH_CONTEXT.to_string();
	}

	documents
		.iter()
		.enumerate()
		.map(|(idx, doc)| {
			let source = match doc.filename() {
				Some(name) => name.to_string(),
				None => format!("연구자료{}", idx + 1),
			};
			let content = truncate_chars(doc.content.trim(), max_chars);

			format!("[{source}] {content}")
		})
		.collect::<Vec<_>>()
		.join("\n\n")
}

pub fn build_capsule_prompt(
	profile: &UserProfile,
	user_input: &str,
	research_context: &str,
) -> String {
	let nickname = profile.nickname.trim();
	let survey_features = if profile.personal_keywords.is_empty() {
		NO_SURVEY_FEATURES.to_string()
	} else {
		profile.personal_keywords.join(", ")
	};

	format!(
		"CheeU 톡톡이 {nickname}님을 위한 맞춤 CheeU 캡슐을 준비했습니다.

💊 사용자 프로필 분석
- {age}세 {gender} {occupation}
- 스트레스 유형: {stress_type}
- 현재 상황: {user_input}
- 설문지 기반 특징: {survey_features}

📚 전문 연구 자료 분석
{research_context}

🎯 CheeU 캡슐 생성 지침
위 정보를 바탕으로 {nickname}님에게 적합한 개인화된 CheeU 캡슐을 생성해주세요.

💝 CheeU 캡슐 구성 요소:
1. 💊 캡슐 색상: 적용되는 치료기법에 따른 색상 지정
   - 인지행동치료(CBT): 파란색 💙
   - 마음챙김(MBSR): 초록색 💚
   - 긍정심리치료(PPT): 노란색 💛
   - 수용전념치료(ACT): 주황색 🧡
   - 변증법적행동치료(DBT): 보라색 💜

2. 🎯 핵심 메시지: {nickname}님의 상황에 구체적으로 공감하며 희망을 주는 메시지

3. 🔧 실천 방법: 연구 자료 기반의 구체적이고 실행 가능한 방법 (3가지)

4. ⭐ 격려 문구: 따뜻하고 희망적인 마무리

💬 치유캡슐 내용:",
		age = profile.age,
		gender = profile.gender,
		occupation = profile.occupation,
		stress_type = profile.stress_type.label(),
		user_input = user_input.trim(),
	)
}

fn truncate_chars(content: &str, max_chars: usize) -> String {
	match content.char_indices().nth(max_chars) {
		Some((cut, _)) => format!("{}{TRUNCATION_MARKER}", &content[..cut]),
		None => content.to_string(),
	}
}

#[cfg(test)]
mod tests {
	use serde_json::{Map, Value};

	use cheeu_domain::StressType;

	use super::*;

	fn profile() -> UserProfile {
		UserProfile {
			nickname: "이대리".to_string(),
			age: 29,
			gender: "여성".to_string(),
			occupation: "IT개발자".to_string(),
			stress_type: StressType::WorkStress,
			survey_features: Vec::new(),
			personal_keywords: Vec::new(),
			msi: None,
			psi: None,
			phq9_score: None,
			gad7_score: None,
			koss24_score: None,
		}
	}

	#[test]
	fn context_labels_unnamed_documents_by_position() {
		let mut metadata = Map::new();

		metadata.insert("filename".to_string(), Value::String("mbsr.pdf".to_string()));

		let docs = vec![
			RetrievedDocument::new("마음챙김 호흡", metadata),
			RetrievedDocument::new(" 인지 재구성 ", Map::new()),
		];

		assert_eq!(
			format_research_context(&docs, 500),
			"[mbsr.pdf] 마음챙김 호흡\n\n[연구자료2] 인지 재구성"
		);
	}

	#[test]
	fn context_truncates_long_content_by_characters() {
		let docs = vec![RetrievedDocument::new("가".repeat(12), Map::new())];

		assert_eq!(format_research_context(&docs, 10), format!("[연구자료1] {}...", "가".repeat(10)));
	}

	#[test]
	fn empty_context_has_placeholder() {
		assert_eq!(format_research_context(&[], 500), NO_RESEARCH_CONTEXT);
	}

	#[test]
	fn prompt_embeds_profile_and_context() {
		let prompt = build_capsule_prompt(&profile(), "  야근이 너무 많아요 ", "[a] b");

		assert!(prompt.starts_with("CheeU 톡톡이 이대리님을"));
		assert!(prompt.contains("- 29세 여성 IT개발자"));
		assert!(prompt.contains("- 현재 상황: 야근이 너무 많아요\n"));
		assert!(prompt.contains("- 설문지 기반 특징: 없음"));
		assert!(prompt.contains(StressType::WorkStress.label()));
		assert!(prompt.contains("[a] b"));
	}
}
