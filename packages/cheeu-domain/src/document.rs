use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Number of leading characters used as a document's deduplication identity.
pub const DEDUP_PREFIX_CHARS: usize = 100;

pub const RESEARCH_PAPER_SOURCE: &str = "research_paper";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedDocument {
	pub content: String,
	#[serde(default)]
	pub metadata: Map<String, Value>,
}
impl RetrievedDocument {
	pub fn new(content: impl Into<String>, metadata: Map<String, Value>) -> Self {
		Self { content: content.into(), metadata }
	}

	/// Identity used to merge hits across queries. The search service gives no stable IDs, so two
	/// documents sharing this prefix are treated as one result.
	pub fn dedup_key(&self) -> String {
		self.content.chars().take(DEDUP_PREFIX_CHARS).collect()
	}

	pub fn filename(&self) -> Option<&str> {
		self.metadata_str("filename").filter(|name| !name.trim().is_empty())
	}

	pub fn is_research_paper(&self) -> bool {
		self.metadata_str("source") == Some(RESEARCH_PAPER_SOURCE)
	}

	fn metadata_str(&self, key: &str) -> Option<&str> {
		self.metadata.get(key).and_then(Value::as_str)
	}
}

/// One nearest-neighbour hit. Smaller distances mean closer matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredDocument {
	pub document: RetrievedDocument,
	pub distance: f32,
}
