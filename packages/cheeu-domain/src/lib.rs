pub mod catalog;
pub mod document;
pub mod profile;
pub mod stress;

pub use catalog::{
	Catalog, CharacterInfo, EvidenceLevel, PersonaKeywords, StressTypeProfile, TherapyMethod,
};
pub use document::{RetrievedDocument, ScoredDocument};
pub use profile::UserProfile;
pub use stress::{StressType, classify};
