use serde::{Deserialize, Serialize};

use crate::stress::StressType;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
	pub nickname: String,
	pub age: u32,
	/// Free-form label such as "남성", "여성", or "기타".
	pub gender: String,
	pub occupation: String,
	pub stress_type: StressType,
	#[serde(default)]
	pub survey_features: Vec<String>,
	#[serde(default)]
	pub personal_keywords: Vec<String>,
	/// Mental stress index from HRV measurement.
	#[serde(default)]
	pub msi: Option<f32>,
	/// Physical stress index from HRV measurement.
	#[serde(default)]
	pub psi: Option<f32>,
	#[serde(default)]
	pub phq9_score: Option<u32>,
	#[serde(default)]
	pub gad7_score: Option<u32>,
	#[serde(default)]
	pub koss24_score: Option<u32>,
}
impl UserProfile {
	pub fn age_group(&self) -> &'static str {
		age_group(self.age)
	}
}

pub fn age_group(age: u32) -> &'static str {
	match age {
		0..=19 => "10대",
		20..=29 => "20대",
		30..=39 => "30대",
		40..=49 => "40대",
		50..=59 => "50대",
		_ => "60대 이상",
	}
}
