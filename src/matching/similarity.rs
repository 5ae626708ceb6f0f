//! Skill-to-skill similarity resolution with strict partial credit
//!
//! Similarity comes only from a fixed adjacency dictionary plus a
//! normalization pass. No fuzzy string matching: the partial-credit policy
//! must not be inflatable by near-miss spellings.

use crate::model::{MatchKind, SkillMatch};
use std::collections::HashMap;

/// Resolves similarity between skill names using a fixed, possibly
/// asymmetric adjacency dictionary.
pub struct SkillSimilarityResolver {
    adjacency: HashMap<String, HashMap<String, f64>>,
    abbreviations: HashMap<&'static str, &'static str>,
    aliases: HashMap<&'static str, &'static str>,
}

/// Suffixes stripped during name normalization.
const STRIP_SUFFIXES: &[&str] = &[
    " development",
    " framework",
    " language",
    " programming",
    " stack",
];

impl Default for SkillSimilarityResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SkillSimilarityResolver {
    pub fn new() -> Self {
        Self {
            adjacency: Self::default_adjacency(),
            abbreviations: Self::default_abbreviations(),
            aliases: Self::default_aliases(),
        }
    }

    /// Resolve similarity between two skill names in [0,1].
    ///
    /// Exact case-insensitive equality (after trim) is 1.0 and bypasses the
    /// dictionary. Dictionary lookup is bidirectional: a→b, then b→a. As a
    /// last resort both names go through the normalization pass and compare
    /// for equality (1.0). Anything else is 0.
    pub fn resolve(&self, a: &str, b: &str) -> f64 {
        let a_key = a.trim().to_lowercase();
        let b_key = b.trim().to_lowercase();

        if a_key == b_key {
            return 1.0;
        }

        if let Some(related) = self.adjacency.get(&a_key) {
            if let Some(&sim) = related.get(&b_key) {
                return sim;
            }
        }
        if let Some(related) = self.adjacency.get(&b_key) {
            if let Some(&sim) = related.get(&a_key) {
                return sim;
            }
        }

        if self.normalize(&a_key) == self.normalize(&b_key) {
            return 1.0;
        }

        0.0
    }

    /// Best-match credit for one required skill against the candidate's
    /// declared skills.
    ///
    /// Picks the candidate with the strictly greatest similarity (ties keep
    /// the first seen). Credit: 1.0 only on an exact match; a partial match
    /// is hard-capped at similarity × 0.5; no match is 0.
    pub fn calculate_skill_credit(&self, required: &str, candidates: &[String]) -> SkillMatch {
        let mut best_similarity = 0.0_f64;
        let mut best_candidate: Option<&String> = None;

        for candidate in candidates {
            let similarity = self.resolve(required, candidate);
            if similarity > best_similarity {
                best_similarity = similarity;
                best_candidate = Some(candidate);
            }
        }

        let (credit, kind) = if best_similarity == 1.0 {
            (1.0, MatchKind::Exact)
        } else if best_similarity > 0.0 {
            (best_similarity * 0.5, MatchKind::Partial)
        } else {
            (0.0, MatchKind::None)
        };

        SkillMatch {
            required_skill: required.to_string(),
            matched_skill: best_candidate.cloned(),
            similarity: best_similarity,
            credit,
            kind,
        }
    }

    /// Normalization pass: abbreviation expansion, suffix stripping, alias
    /// collapse, then punctuation/hyphen/whitespace removal.
    fn normalize(&self, name: &str) -> String {
        let mut current = name.trim().to_lowercase();

        if let Some(&expanded) = self.abbreviations.get(current.as_str()) {
            current = expanded.to_string();
        }

        for suffix in STRIP_SUFFIXES {
            if let Some(stripped) = current.strip_suffix(suffix) {
                current = stripped.trim_end().to_string();
                break;
            }
        }

        if let Some(&canonical) = self.aliases.get(current.as_str()) {
            current = canonical.to_string();
        }

        current
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect()
    }

    fn default_abbreviations() -> HashMap<&'static str, &'static str> {
        [
            ("js", "javascript"),
            ("ts", "typescript"),
            ("aws", "amazon web services"),
            ("gcp", "google cloud platform"),
            ("k8s", "kubernetes"),
            ("py", "python"),
            ("pg", "postgresql"),
            ("ml", "machine learning"),
        ]
        .into_iter()
        .collect()
    }

    fn default_aliases() -> HashMap<&'static str, &'static str> {
        [
            ("reactjs", "react"),
            ("react.js", "react"),
            ("nodejs", "node.js"),
            ("node", "node.js"),
            ("vuejs", "vue"),
            ("vue.js", "vue"),
            ("angularjs", "angular"),
            ("postgres", "postgresql"),
            ("golang", "go"),
            ("nextjs", "next.js"),
            ("expressjs", "express"),
            ("mongo", "mongodb"),
        ]
        .into_iter()
        .collect()
    }

    /// Fixed adjacency dictionary. Entries are directional; `resolve` falls
    /// back to the reverse direction when the forward lookup misses.
    fn default_adjacency() -> HashMap<String, HashMap<String, f64>> {
        let entries: &[(&str, &[(&str, f64)])] = &[
            (
                "react",
                &[
                    ("next.js", 0.6),
                    ("vue", 0.55),
                    ("angular", 0.5),
                    ("svelte", 0.5),
                    ("react native", 0.7),
                ],
            ),
            (
                "node.js",
                &[("express", 0.6), ("deno", 0.6), ("nestjs", 0.55)],
            ),
            (
                "postgresql",
                &[
                    ("mysql", 0.5),
                    ("mariadb", 0.5),
                    ("sqlite", 0.4),
                    ("oracle", 0.4),
                    ("mongodb", 0.3),
                ],
            ),
            (
                "docker",
                &[("kubernetes", 0.5), ("podman", 0.7), ("containerd", 0.6)],
            ),
            (
                "javascript",
                &[("typescript", 0.8), ("coffeescript", 0.5)],
            ),
            ("python", &[("ruby", 0.4), ("r", 0.3)]),
            ("django", &[("flask", 0.6), ("fastapi", 0.55), ("python", 0.4)]),
            ("java", &[("kotlin", 0.7), ("scala", 0.5), ("c#", 0.4)]),
            (
                "amazon web services",
                &[("azure", 0.6), ("google cloud platform", 0.6)],
            ),
            ("azure", &[("google cloud platform", 0.6)]),
            ("redis", &[("memcached", 0.7)]),
            ("kafka", &[("rabbitmq", 0.6), ("sqs", 0.5)]),
            ("elasticsearch", &[("opensearch", 0.9), ("solr", 0.6)]),
            ("terraform", &[("pulumi", 0.7), ("cloudformation", 0.6)]),
            ("jenkins", &[("github actions", 0.6), ("gitlab ci", 0.6)]),
            ("graphql", &[("rest", 0.4), ("grpc", 0.4)]),
            ("tensorflow", &[("pytorch", 0.7), ("keras", 0.7)]),
            ("vue", &[("angular", 0.5), ("svelte", 0.55)]),
            ("mysql", &[("mariadb", 0.9), ("sqlite", 0.4)]),
            ("swift", &[("objective-c", 0.6), ("kotlin", 0.4)]),
            ("sass", &[("less", 0.8), ("css", 0.6)]),
            ("jest", &[("mocha", 0.7), ("vitest", 0.8)]),
            ("pytest", &[("unittest", 0.7)]),
            ("spring", &[("spring boot", 0.9), ("java", 0.4)]),
            ("rails", &[("ruby", 0.5), ("django", 0.5)]),
        ];

        entries
            .iter()
            .map(|(skill, related)| {
                (
                    skill.to_string(),
                    related
                        .iter()
                        .map(|(name, sim)| (name.to_string(), *sim))
                        .collect(),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match_bypasses_dictionary() {
        let resolver = SkillSimilarityResolver::new();
        assert_eq!(resolver.resolve("React", "react"), 1.0);
        assert_eq!(resolver.resolve("  Python ", "python"), 1.0);
    }

    #[test]
    fn test_dictionary_lookup() {
        let resolver = SkillSimilarityResolver::new();
        assert_eq!(resolver.resolve("react", "next.js"), 0.6);
        assert_eq!(resolver.resolve("node.js", "express"), 0.6);
        assert_eq!(resolver.resolve("postgresql", "mysql"), 0.5);
        assert_eq!(resolver.resolve("docker", "kubernetes"), 0.5);
    }

    #[test]
    fn test_bidirectional_fallback() {
        let resolver = SkillSimilarityResolver::new();
        // Only react → next.js is present in the dictionary; the reverse
        // direction must resolve through the fallback lookup.
        assert_eq!(
            resolver.resolve("next.js", "react"),
            resolver.resolve("react", "next.js")
        );
        assert_eq!(
            resolver.resolve("kubernetes", "docker"),
            resolver.resolve("docker", "kubernetes")
        );
    }

    #[test]
    fn test_normalization_equality() {
        let resolver = SkillSimilarityResolver::new();
        assert_eq!(resolver.resolve("ReactJS", "react"), 1.0);
        assert_eq!(resolver.resolve("react development", "react"), 1.0);
        assert_eq!(resolver.resolve("js", "JavaScript"), 1.0);
        assert_eq!(resolver.resolve("NodeJS", "node.js"), 1.0);
        assert_eq!(resolver.resolve("k8s", "Kubernetes"), 1.0);
        assert_eq!(resolver.resolve("Postgres", "PostgreSQL"), 1.0);
    }

    #[test]
    fn test_unrelated_skills_score_zero() {
        let resolver = SkillSimilarityResolver::new();
        assert_eq!(resolver.resolve("react", "cobol"), 0.0);
        assert_eq!(resolver.resolve("haskell", "photoshop"), 0.0);
    }

    #[test]
    fn test_credit_formula() {
        let resolver = SkillSimilarityResolver::new();

        // Exact: full credit.
        let exact = resolver.calculate_skill_credit("react", &["React".to_string()]);
        assert_eq!(exact.credit, 1.0);
        assert_eq!(exact.kind, MatchKind::Exact);

        // Partial: hard-capped at similarity × 0.5.
        let partial = resolver.calculate_skill_credit("react", &["Next.js".to_string()]);
        assert_eq!(partial.similarity, 0.6);
        assert_eq!(partial.credit, 0.3);
        assert_eq!(partial.kind, MatchKind::Partial);
        assert!(partial.credit <= 0.5);

        // None.
        let none = resolver.calculate_skill_credit("react", &["cobol".to_string()]);
        assert_eq!(none.credit, 0.0);
        assert_eq!(none.kind, MatchKind::None);
        assert!(none.matched_skill.is_none());
    }

    #[test]
    fn test_partial_credit_never_exceeds_half() {
        let resolver = SkillSimilarityResolver::new();
        // Highest non-exact similarity in the dictionary is 0.9.
        let m = resolver.calculate_skill_credit("elasticsearch", &["opensearch".to_string()]);
        assert_eq!(m.similarity, 0.9);
        assert_eq!(m.credit, 0.45);
        assert!(m.credit <= 0.5);
    }

    #[test]
    fn test_tie_keeps_first_seen() {
        let resolver = SkillSimilarityResolver::new();
        // docker→kubernetes and docker→? both 0.5: use two 0.5 candidates.
        let m = resolver.calculate_skill_credit(
            "react",
            &["angular".to_string(), "svelte".to_string()],
        );
        assert_eq!(m.similarity, 0.5);
        assert_eq!(m.matched_skill.as_deref(), Some("angular"));
    }

    #[test]
    fn test_best_candidate_wins() {
        let resolver = SkillSimilarityResolver::new();
        let m = resolver.calculate_skill_credit(
            "react",
            &["angular".to_string(), "next.js".to_string(), "react".to_string()],
        );
        assert_eq!(m.similarity, 1.0);
        assert_eq!(m.matched_skill.as_deref(), Some("react"));
    }
}
