//! Heuristic confidence for a ranked document set.
//!
//! The score is advisory. It rewards keyword coverage, reasonable document length, useful
//! metadata, and sentence-rich content, plus a small bonus for returning a full result set.

use serde::Serialize;

use cheeu_domain::RetrievedDocument;

const KEYWORD_WEIGHT: f32 = 0.5;
const LENGTH_IDEAL: f32 = 0.2;
const LENGTH_ACCEPTABLE: f32 = 0.1;
const FILENAME_BONUS: f32 = 0.1;
const RESEARCH_PAPER_BONUS: f32 = 0.05;
const RICH_CONTENT: f32 = 0.15;
const SOME_CONTENT: f32 = 0.08;
const DOC_COUNT_WEIGHT: f32 = 0.1;
const DOC_COUNT_TARGET: f32 = 3.0;

const SENTENCE_TERMINALS: [char; 4] = ['.', '!', '?', '。'];

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DocumentConfidence {
	pub keyword_coverage: f32,
	pub length: f32,
	pub metadata: f32,
	pub richness: f32,
}
impl DocumentConfidence {
	pub fn total(&self) -> f32 {
		self.keyword_coverage + self.length + self.metadata + self.richness
	}
}

/// Scores `documents` against `keywords`, returning a value in 0.0-1.0.
pub fn score(documents: &[RetrievedDocument], keywords: &[String]) -> f32 {
	if documents.is_empty() {
		return 0.0;
	}

	let keywords = normalize_keywords(keywords);
	let total: f32 = documents.iter().map(|doc| score_with(doc, &keywords).total()).sum();
	let average = total / documents.len() as f32;
	let doc_count_bonus = (documents.len() as f32 / DOC_COUNT_TARGET).min(1.0) * DOC_COUNT_WEIGHT;

	(average + doc_count_bonus).clamp(0.0, 1.0)
}

pub fn score_document(document: &RetrievedDocument, keywords: &[String]) -> DocumentConfidence {
	score_with(document, &normalize_keywords(keywords))
}

fn score_with(document: &RetrievedDocument, keywords: &[String]) -> DocumentConfidence {
	let content = document.content.to_lowercase();

	DocumentConfidence {
		keyword_coverage: keyword_coverage(&content, keywords) * KEYWORD_WEIGHT,
		length: length_score(content.chars().count()),
		metadata: metadata_score(document),
		richness: richness_score(&content),
	}
}

// Blank keywords stay in the list so they still count toward the coverage denominator.
fn normalize_keywords(keywords: &[String]) -> Vec<String> {
	keywords.iter().map(|keyword| keyword.trim().to_lowercase()).collect()
}

fn keyword_coverage(content: &str, keywords: &[String]) -> f32 {
	if keywords.is_empty() {
		return 0.0;
	}

	let matched = keywords
		.iter()
		.filter(|keyword| !keyword.is_empty() && content.contains(keyword.as_str()))
		.count();

	matched as f32 / keywords.len() as f32
}

fn length_score(chars: usize) -> f32 {
	match chars {
		100..=1_000 => LENGTH_IDEAL,
		50..=1_500 => LENGTH_ACCEPTABLE,
		_ => 0.0,
	}
}

fn metadata_score(document: &RetrievedDocument) -> f32 {
	let mut out = 0.0;

	if document.filename().is_some() {
		out += FILENAME_BONUS;
	}
	if document.is_research_paper() {
		out += RESEARCH_PAPER_BONUS;
	}

	out
}

fn richness_score(content: &str) -> f32 {
	match content.chars().filter(|ch| SENTENCE_TERMINALS.contains(ch)).count() {
		0 => 0.0,
		1..=2 => SOME_CONTENT,
		_ => RICH_CONTENT,
	}
}
