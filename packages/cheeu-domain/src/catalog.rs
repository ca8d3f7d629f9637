//! Static lookup tables: therapy metadata, per-stress-type character profiles, occupation
//! keywords, and persona keyword profiles.
//!
//! A [`Catalog`] is built once at start-up and shared read-only.

use std::collections::HashMap;

use serde::Serialize;

use crate::stress::StressType;

pub const CHARACTER_NAME: &str = "CheeU 톡톡";

const DEFAULT_FALLBACK_PRACTICES: [&str; 3] =
	["현재 감정을 인정하고 받아들이기", "깊은 호흡으로 마음 진정하기", "작은 성취 경험하기"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceLevel {
	Rct,
	MetaAnalysis,
	Clinical,
}

#[derive(Debug, Clone, Serialize)]
pub struct TherapyMethod {
	pub name: String,
	pub korean_name: String,
	pub target_symptoms: Vec<String>,
	pub core_techniques: Vec<String>,
	pub evidence_level: EvidenceLevel,
	pub reference: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StressTypeProfile {
	pub emoji: String,
	/// Therapy method names, most relevant first.
	pub therapy_methods: Vec<String>,
	pub tone: String,
	/// One-line summary of the state and the therapies that help.
	pub description: String,
	pub fallback_message: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PersonaKeywords {
	pub stress_keywords: Vec<String>,
	pub lifestyle_keywords: Vec<String>,
	pub personality_keywords: Vec<String>,
	pub therapy_focus: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CharacterInfo {
	pub emoji: String,
	pub name: String,
	pub tone: String,
	pub stress_type: String,
	pub description: String,
	pub therapy_methods: Vec<String>,
	pub method_count: usize,
}

#[derive(Debug, Clone)]
pub struct Catalog {
	therapies: Vec<TherapyMethod>,
	profiles: [StressTypeProfile; 8],
	occupations: Vec<(String, Vec<String>)>,
	personas: HashMap<String, PersonaKeywords>,
}
impl Catalog {
	pub fn builtin() -> Self {
		Self {
			therapies: builtin_therapies(),
			profiles: StressType::ALL.map(builtin_profile),
			occupations: BUILTIN_OCCUPATIONS
				.iter()
				.map(|(label, keywords)| (label.to_string(), strings(keywords)))
				.collect(),
			personas: builtin_personas(),
		}
	}

	pub fn therapy(&self, name: &str) -> Option<&TherapyMethod> {
		self.therapies.iter().find(|method| method.name == name)
	}

	pub fn therapies(&self) -> &[TherapyMethod] {
		&self.therapies
	}

	pub fn profile(&self, stress_type: StressType) -> &StressTypeProfile {
		&self.profiles[stress_type.ordinal()]
	}

	pub fn therapy_methods_for(&self, stress_type: StressType) -> Vec<&TherapyMethod> {
		self.profile(stress_type)
			.therapy_methods
			.iter()
			.filter_map(|name| self.therapy(name))
			.collect()
	}

	/// Unknown labels yield an empty slice.
	pub fn occupation_keywords(&self, occupation: &str) -> &[String] {
		self.occupations
			.iter()
			.find(|(label, _)| label == occupation)
			.map(|(_, keywords)| keywords.as_slice())
			.unwrap_or(&[])
	}

	pub fn occupations(&self) -> Vec<&str> {
		self.occupations.iter().map(|(label, _)| label.as_str()).collect()
	}

	pub fn persona(&self, nickname: &str, occupation: &str) -> Option<&PersonaKeywords> {
		self.personas.get(&persona_key(nickname, occupation))
	}

	pub fn character(&self, stress_type: StressType) -> CharacterInfo {
		let profile = self.profile(stress_type);
		let therapy_methods: Vec<String> = self
			.therapy_methods_for(stress_type)
			.into_iter()
			.map(|method| method.korean_name.clone())
			.collect();

		CharacterInfo {
			emoji: profile.emoji.clone(),
			name: character_name(&profile.emoji),
			tone: profile.tone.clone(),
			stress_type: stress_type.label().to_string(),
			description: profile.description.clone(),
			method_count: therapy_methods.len(),
			therapy_methods,
		}
	}

	/// Template message used when no grounded capsule can be generated.
	pub fn fallback_message(&self, stress_type: StressType) -> String {
		let profile = self.profile(stress_type);
		let mut out = format!("{} {}\n\n🔧 실천 방법:", profile.emoji, profile.fallback_message);

		for practice in DEFAULT_FALLBACK_PRACTICES {
			out.push_str("\n• ");
			out.push_str(practice);
		}

		out
	}
}

impl Default for Catalog {
	fn default() -> Self {
		Self::builtin()
	}
}

pub fn character_name(emoji: &str) -> String {
	format!("{emoji} {CHARACTER_NAME}")
}

pub fn persona_key(nickname: &str, occupation: &str) -> String {
	format!("{}_{}", nickname.trim(), occupation.trim())
}

fn strings(items: &[&str]) -> Vec<String> {
	items.iter().map(|item| item.to_string()).collect()
}

fn therapy(
	name: &str,
	korean_name: &str,
	target_symptoms: &[&str],
	core_techniques: &[&str],
	evidence_level: EvidenceLevel,
	reference: &str,
) -> TherapyMethod {
	TherapyMethod {
		name: name.to_string(),
		korean_name: korean_name.to_string(),
		target_symptoms: strings(target_symptoms),
		core_techniques: strings(core_techniques),
		evidence_level,
		reference: reference.to_string(),
	}
}

fn builtin_therapies() -> Vec<TherapyMethod> {
	vec![
		therapy(
			"MBSR",
			"마음챙김 기반 스트레스 감소",
			&["스트레스", "불안", "우울"],
			&["마음챙김 명상", "자기돌봄", "스트레스 조기 신호 인식"],
			EvidenceLevel::MetaAnalysis,
			"Hayes, 1994; K-MBSR 연구, 2023",
		),
		therapy(
			"PPT",
			"긍정심리치료",
			&["우울", "무기력", "자존감"],
			&["성격강점 활용", "긍정경험 향유", "감사 일기"],
			EvidenceLevel::Rct,
			"Seligman, 2005; 긍정심리 논문, 2023",
		),
		therapy(
			"ACT",
			"수용전념치료",
			&["불안", "우울", "직무스트레스"],
			&["현재순간 인식", "수용", "가치기반 행동"],
			EvidenceLevel::MetaAnalysis,
			"Hayes, 2006; ACT 효과성 연구, 2023",
		),
		therapy(
			"CBT",
			"인지행동치료",
			&["우울", "불안", "부정적 사고"],
			&["인지 재구조화", "행동 활성화", "노출 치료"],
			EvidenceLevel::MetaAnalysis,
			"Beck, 1976; CBT 효과성 연구, 2023",
		),
		therapy(
			"DBT",
			"변증법적 행동치료",
			&["감정조절", "대인관계", "위기상황"],
			&["마음챙김", "고통 견디기", "감정 조절", "대인관계 효율성"],
			EvidenceLevel::Rct,
			"Linehan, 1993; DBT 효과성 연구, 2023",
		),
	]
}

/// Emoji, therapy names, tone, description, fallback message.
type ProfileRow = (&'static str, &'static [&'static str], &'static str, &'static str, &'static str);

fn builtin_profile(stress_type: StressType) -> StressTypeProfile {
	let (emoji, methods, tone, description, fallback_message): ProfileRow = match stress_type {
		StressType::Calm => (
			"🦥",
			&["MBSR"],
			"차분하고 평온한",
			"평온한 상태로, 마음챙김을 통한 현재 상태 유지가 도움됩니다.",
			"💚 평온 치유캡슐을 전달합니다. 지금 이 순간의 평온함을 느껴보세요. 당신은 충분히 잘하고 있어요.",
		),
		StressType::Depressed => (
			"🐻",
			&["PPT", "MBSR"],
			"따뜻하고 희망적인",
			"우울감을 경험하고 있으며, 긍정심리치료와 마음챙김이 효과적입니다.",
			"💛 희망 치유캡슐을 전달합니다. 힘든 마음이 느껴집니다. 작은 것부터 시작해보세요. 당신은 혼자가 아니에요.",
		),
		StressType::Anxious => (
			"🐰",
			&["ACT", "MBSR"],
			"안정적이고 차분한",
			"불안감을 느끼고 있으며, 수용전념치료와 마음챙김이 도움됩니다.",
			"💙 안정 치유캡슐을 전달합니다. 불안한 마음을 이해해요. 깊게 숨을 쉬고 현재에 집중해보세요.",
		),
		StressType::WorkStress => (
			"🦔",
			&["ACT", "CBT"],
			"균형잡히고 실용적인",
			"직무 관련 스트레스를 경험하고 있으며, 수용전념치료와 인지행동치료가 효과적입니다.",
			"🧡 균형 치유캡슐을 전달합니다. 일이 버겁게 느껴지시는군요. 우선순위를 정하고 하나씩 해결해보세요.",
		),
		StressType::DepressedAnxious => (
			"🦌",
			&["PPT", "ACT", "CBT"],
			"공감적이고 위로하는",
			"우울과 불안을 동시에 경험하고 있으며, 긍정심리치료와 수용전념치료가 필요합니다.",
			"💜 정리 치유캡슐을 전달합니다. 복잡한 감정들이 얽혀있는 것 같아요. 천천히 정리해나가봐요.",
		),
		StressType::DepressedWorkStress => (
			"🦫",
			&["PPT", "ACT"],
			"회복에 초점을 둔",
			"우울과 직무스트레스를 겪고 있으며, 긍정심리치료와 수용전념치료가 도움됩니다.",
			"🤍 회복 치유캡슐을 전달합니다. 많이 지치셨을 것 같아요. 잠깐 쉬어가도 괜찮습니다.",
		),
		StressType::AnxiousWorkStress => (
			"🐿️",
			&["ACT", "CBT"],
			"중심을 잡아주는",
			"불안과 직무스트레스를 경험하고 있으며, 수용전념치료와 인지행동치료가 효과적입니다.",
			"💚 중심 치유캡슐을 전달합니다. 바쁘고 걱정이 많으시군요. 마음챙김으로 중심을 잡아보세요.",
		),
		StressType::Crisis => (
			"🦊",
			&["PPT", "ACT", "DBT"],
			"응급하고 즉각적인",
			"복합적인 스트레스 상황으로, 긍정심리치료, 수용전념치료, 변증법적행동치료가 모두 필요합니다.",
			"❤️ 응급 치유캡슐을 전달합니다. 지금 당장 안전이 우선입니다. 주변 도움을 받는 것이 용기입니다.",
		),
	};

	StressTypeProfile {
		emoji: emoji.to_string(),
		therapy_methods: strings(methods),
		tone: tone.to_string(),
		description: description.to_string(),
		fallback_message: fallback_message.to_string(),
	}
}

fn builtin_personas() -> HashMap<String, PersonaKeywords> {
	let mut personas = HashMap::new();

	personas.insert(
		persona_key("이대리", "IT개발자"),
		PersonaKeywords {
			stress_keywords: strings(&[
				"불안",
				"직무스트레스",
				"수면부족",
				"주의력결핍",
				"멀티태스킹",
				"업무과부하",
			]),
			lifestyle_keywords: strings(&["야근", "불규칙생활", "커피의존", "기술학습압박"]),
			personality_keywords: strings(&["열정", "책임감", "성장욕구", "완벽주의"]),
			therapy_focus: strings(&[
				"현재순간인식",
				"수용",
				"가치기반행동",
				"인지재구조화",
				"행동활성화",
			]),
		},
	);

	personas
}

/// NCS occupation groups followed by shorthand labels kept for older clients.
const BUILTIN_OCCUPATIONS: &[(&str, &[&str])] = &[
	(
		"01. 경영·회계·사무",
		&["업무과부하", "회계처리", "사무업무", "관리스트레스", "보고서작성", "회의"],
	),
	("02. 금융·보험", &["리스크관리", "고객상담", "실적압박", "규제준수", "금융상품", "투자압박"]),
	(
		"03. 교육·자연과학·사회과학",
		&["학습부진", "학부모갈등", "업무과부하", "평가스트레스", "행정업무", "학생지도", "연구"],
	),
	(
		"04. 법률·경찰·소방·교도·국방",
		&["치안유지", "법률해석", "공공안전", "위험상황", "순찰", "사법업무"],
	),
	(
		"05. 보건·의료",
		&["번아웃", "감정노동", "환자안전", "야근", "의료사고", "업무과부하", "응급상황"],
	),
	(
		"06. 사회복지·종교",
		&["감정노동", "상담업무", "복지서비스", "봉사활동", "사례관리", "클라이언트"],
	),
	(
		"07. 문화·예술·디자인·방송",
		&["창작스트레스", "작품활동", "경제적불안", "작품평가", "창작슬럼프", "시청률"],
	),
	("08. 운동", &["체력관리", "경기스트레스", "부상위험", "성과압박", "훈련", "시합"]),
	("09. 여행·레저", &["고객서비스", "성수기", "관광안내", "레저활동", "계절업무", "서비스"]),
	("10. 숙박·음식", &["고객응대", "서비스", "주방업무", "위생관리", "주말근무", "감정노동"]),
	("11. 미용·예식", &["고객만족", "서비스업", "미용기술", "예식준비", "감정노동", "트렌드"]),
	(
		"12. 비서·사무보조",
		&["업무지원", "스케줄관리", "사무업무", "업무보조", "문서작업", "일정관리"],
	),
	("13. 농림어업", &["날씨영향", "계절성", "농작물관리", "어업활동", "환경변화", "수확"]),
	("14. 식품가공", &["위생관리", "품질관리", "생산라인", "식품안전", "제조업무", "공정관리"]),
	("15. 섬유·의복", &["패션트렌드", "제조업무", "품질관리", "의복제작", "소재관리", "디자인"]),
	("16. 재료", &["품질관리", "소재개발", "재료과학", "제조공정", "기술개발", "연구개발"]),
	("17. 화학", &["화학물질", "안전관리", "실험", "연구개발", "품질관리", "환경관리"]),
	("18. 전기·전자", &["회로설계", "전자기기", "기술개발", "품질관리", "전기안전", "유지보수"]),
	(
		"19. 정보통신",
		&[
			"야근",
			"데드라인",
			"기술변화",
			"프로젝트",
			"버그",
			"개발스트레스",
			"코딩",
			"IT",
			"스타트업",
			"멀티태스킹",
			"불규칙수면",
			"주의력결핍",
			"업무과부하",
			"기술습득압박",
			"책임감과부하",
		],
	),
	("20. 기계", &["기계설계", "제조업", "유지보수", "기술개발", "안전관리", "생산성"]),
	("21. 금속·재료", &["금속가공", "용접", "안전관리", "품질관리", "재료공학", "제조"]),
	("22. 건설", &["건설현장", "안전사고", "프로젝트", "공기단축", "건설관리", "현장작업"]),
	(
		"23. 환경·에너지·안전",
		&["환경보호", "안전관리", "에너지", "환경정책", "안전점검", "위험관리"],
	),
	(
		"24. 인쇄·목재·가구·공예",
		&["제작기술", "품질관리", "디자인", "수공예", "생산관리", "창작활동"],
	),
	("25. 기타", &["직무스트레스", "업무", "스트레스"]),
	("경영", &["업무과부하", "관리스트레스", "회의"]),
	("의료", &["번아웃", "감정노동", "환자안전", "야근"]),
	("교육", &["학습부진", "학부모갈등", "평가스트레스"]),
	("IT", &["야근", "데드라인", "기술변화", "프로젝트", "버그"]),
	("서비스", &["고객응대", "감정노동", "서비스"]),
	("기타", &["직무스트레스", "업무", "스트레스"]),
];
