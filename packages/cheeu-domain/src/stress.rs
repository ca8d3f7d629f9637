use serde::{Deserialize, Serialize};

/// Stress classification derived from three survey flags: depression, anxiety, work stress.
///
/// Serialized as its three-letter code, `O` for a present flag and `X` for an absent one, in the
/// order depression, anxiety, work stress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StressType {
	#[serde(rename = "XXX")]
	Calm,
	#[serde(rename = "OXX")]
	Depressed,
	#[serde(rename = "XOX")]
	Anxious,
	#[serde(rename = "XXO")]
	WorkStress,
	#[serde(rename = "OOX")]
	DepressedAnxious,
	#[serde(rename = "OXO")]
	DepressedWorkStress,
	#[serde(rename = "XOO")]
	AnxiousWorkStress,
	#[serde(rename = "OOO")]
	Crisis,
}
impl StressType {
	pub const ALL: [Self; 8] = [
		Self::Calm,
		Self::Depressed,
		Self::Anxious,
		Self::WorkStress,
		Self::DepressedAnxious,
		Self::DepressedWorkStress,
		Self::AnxiousWorkStress,
		Self::Crisis,
	];

	pub fn code(self) -> &'static str {
		match self {
			Self::Calm => "XXX",
			Self::Depressed => "OXX",
			Self::Anxious => "XOX",
			Self::WorkStress => "XXO",
			Self::DepressedAnxious => "OOX",
			Self::DepressedWorkStress => "OXO",
			Self::AnxiousWorkStress => "XOO",
			Self::Crisis => "OOO",
		}
	}

	/// Label appended to the dominant retrieval query.
	pub fn label(self) -> &'static str {
		match self {
			Self::Calm => "평온형",
			Self::Depressed => "우울형",
			Self::Anxious => "불안형",
			Self::WorkStress => "직무스트레스형",
			Self::DepressedAnxious => "우울+불안형",
			Self::DepressedWorkStress => "우울+직무스트레스형",
			Self::AnxiousWorkStress => "불안+직무스트레스형",
			Self::Crisis => "위기형",
		}
	}

	/// Position in [`StressType::ALL`].
	pub fn ordinal(self) -> usize {
		match self {
			Self::Calm => 0,
			Self::Depressed => 1,
			Self::Anxious => 2,
			Self::WorkStress => 3,
			Self::DepressedAnxious => 4,
			Self::DepressedWorkStress => 5,
			Self::AnxiousWorkStress => 6,
			Self::Crisis => 7,
		}
	}

	pub fn from_code(code: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|stress_type| stress_type.code() == code.trim())
	}
}

pub fn classify(depression: bool, anxiety: bool, work_stress: bool) -> StressType {
	match (depression, anxiety, work_stress) {
		(false, false, false) => StressType::Calm,
		(true, false, false) => StressType::Depressed,
		(false, true, false) => StressType::Anxious,
		(false, false, true) => StressType::WorkStress,
		(true, true, false) => StressType::DepressedAnxious,
		(true, false, true) => StressType::DepressedWorkStress,
		(false, true, true) => StressType::AnxiousWorkStress,
		(true, true, true) => StressType::Crisis,
	}
}
