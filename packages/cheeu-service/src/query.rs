use cheeu_domain::{Catalog, UserProfile};

use crate::fusion::QuerySet;

const OCCUPATION_KEYWORD_LIMIT: usize = 3;
const PERSONA_KEYWORD_LIMIT: usize = 2;

/// Builds the dominant query from the user's words and stress label, and the secondary queries
/// from demographic, occupational, and persona context.
pub fn build_query_set(user_input: &str, profile: &UserProfile, catalog: &Catalog) -> QuerySet {
	let main_query = format!("{} {}", user_input.trim(), profile.stress_type.label());
	let mut subs = vec![
		profile.age_group().to_string(),
		profile.gender.clone(),
		profile.occupation.clone(),
		profile.personal_keywords.join(" "),
	];

	subs.extend(
		catalog
			.occupation_keywords(&profile.occupation)
			.iter()
			.take(OCCUPATION_KEYWORD_LIMIT)
			.cloned(),
	);

	if let Some(persona) = catalog.persona(&profile.nickname, &profile.occupation) {
		for keywords in
			[&persona.stress_keywords, &persona.lifestyle_keywords, &persona.therapy_focus]
		{
			subs.extend(keywords.iter().take(PERSONA_KEYWORD_LIMIT).cloned());
		}
	}

	let sub_queries = subs
		.into_iter()
		.map(|query| query.trim().to_string())
		.filter(|query| !query.is_empty())
		.collect();

	QuerySet { main_query: main_query.trim().to_string(), sub_queries }
}
