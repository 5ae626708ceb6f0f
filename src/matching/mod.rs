//! Deterministic scoring and matching module

pub mod similarity;
pub mod tiers;
pub mod keywords;
pub mod engine;
pub mod confidence;

pub use engine::{MatchOutcome, MatchingEngine};
pub use similarity::SkillSimilarityResolver;
pub use tiers::SimilarityTierNormalizer;
