//! Deterministic rule-based requirement extraction from job text
//!
//! The fallback path when AI extraction fails or comes back unreliable.
//! Everything here is a pure function of the input text: ordered regex
//! rules for experience, priority-ordered education patterns, section
//! slicing for skills, and frequency-ranked keywords.

use crate::error::{Result, ResumeScorerError};
use crate::model::EducationLevel;
use aho_corasick::AhoCorasick;
use log::debug;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use unicode_segmentation::UnicodeSegmentation;

/// Headers that open a required-skills section.
const REQUIRED_HEADERS: &[&str] = &[
    "requirements",
    "required",
    "must have",
    "essential",
    "mandatory",
    "qualifications",
];

/// Headers that open a preferred-skills section.
const PREFERRED_HEADERS: &[&str] = &[
    "preferred",
    "nice to have",
    "bonus",
    "plus",
    "desirable",
];

/// Headers that terminate a sliced section.
const SECTION_TERMINATORS: &[&str] = &[
    "responsibilities",
    "about",
    "benefits",
    "education",
    "experience",
    "compensation",
];

/// Experience years outside this range are treated as noise.
const MAX_PLAUSIBLE_YEARS: u32 = 30;

/// Keywords returned per extraction.
const KEYWORD_LIMIT: usize = 30;

/// Requirement set produced by deterministic extraction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FallbackExtraction {
    pub experience_years: u32,
    pub education: Option<EducationLevel>,
    pub required_skills: Vec<String>,
    pub preferred_skills: Vec<String>,
    pub keywords: Vec<String>,
}

/// One experience rule: a pattern plus the capture-to-years interpretation.
struct ExperienceRule {
    pattern: Regex,
    extract: fn(&regex::Captures) -> Option<u32>,
}

pub struct FallbackExtractor {
    vocabulary: Vec<&'static str>,
    vocab_matcher: AhoCorasick,
    experience_rules: Vec<ExperienceRule>,
    education_rules: Vec<(Regex, EducationLevel)>,
    inline_required: Regex,
    inline_preferred: Regex,
    stop_words: HashSet<&'static str>,
}

impl FallbackExtractor {
    pub fn new() -> Result<Self> {
        let vocabulary = technology_vocabulary();
        let vocab_matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(aho_corasick::MatchKind::LeftmostLongest)
            .build(&vocabulary)
            .map_err(|e| {
                ResumeScorerError::Extraction(format!("Failed to build vocabulary matcher: {}", e))
            })?;

        Ok(Self {
            vocabulary,
            vocab_matcher,
            experience_rules: experience_rules(),
            education_rules: education_rules(),
            inline_required: Regex::new(r"(?i)^\s*(?:is|are)\s+(?:required|mandatory|essential)\b")
                .expect("Invalid inline-required regex"),
            inline_preferred: Regex::new(r"(?i)^\s*(?:is|are)\s+(?:preferred|nice|a\s+plus|bonus)\b")
                .expect("Invalid inline-preferred regex"),
            stop_words: stop_words(),
        })
    }

    pub fn extract(&self, text: &str) -> FallbackExtraction {
        let experience_years = self.extract_experience_years(text);
        let education = self.extract_education(text);
        let (required_skills, preferred_skills) = self.extract_skills(text);
        let keywords = self.extract_keywords(text);

        debug!(
            "fallback extraction: {} required, {} preferred, {} keywords, {}y, education {:?}",
            required_skills.len(),
            preferred_skills.len(),
            keywords.len(),
            experience_years,
            education,
        );

        FallbackExtraction {
            experience_years,
            education,
            required_skills,
            preferred_skills,
            keywords,
        }
    }

    /// Ordered rule evaluation; the first plausible hit wins.
    fn extract_experience_years(&self, text: &str) -> u32 {
        for rule in &self.experience_rules {
            if let Some(caps) = rule.pattern.captures(text) {
                if let Some(years) = (rule.extract)(&caps) {
                    if years <= MAX_PLAUSIBLE_YEARS {
                        return years;
                    }
                }
            }
        }
        0
    }

    /// Priority-ordered: the highest degree pattern that matches wins.
    fn extract_education(&self, text: &str) -> Option<EducationLevel> {
        self.education_rules
            .iter()
            .find(|(pattern, _)| pattern.is_match(text))
            .map(|(_, level)| *level)
    }

    /// Section-sliced vocabulary extraction, plus two out-of-section
    /// promotions: repeated mention (≥2) counts as required, and
    /// "X is required/preferred" classifies X regardless of section.
    fn extract_skills(&self, text: &str) -> (Vec<String>, Vec<String>) {
        let mut required: Vec<String> = Vec::new();
        let mut preferred: Vec<String> = Vec::new();

        if let Some(section) = slice_section(text, REQUIRED_HEADERS) {
            for term in self.vocabulary_terms_in(section) {
                push_unique(&mut required, term);
            }
        }
        if let Some(section) = slice_section(text, PREFERRED_HEADERS) {
            for term in self.vocabulary_terms_in(section) {
                push_unique(&mut preferred, term);
            }
        }

        for (term, occurrences) in self.vocabulary_occurrences(text) {
            if occurrences.len() >= 2 {
                push_unique(&mut required, term.clone());
            }
            for end in occurrences {
                let tail = &text[end..];
                if self.inline_required.is_match(tail) {
                    push_unique(&mut required, term.clone());
                } else if self.inline_preferred.is_match(tail) {
                    push_unique(&mut preferred, term.clone());
                }
            }
        }

        // A skill classified as required drops out of preferred.
        preferred.retain(|p| !required.iter().any(|r| r.eq_ignore_ascii_case(p)));

        (required, preferred)
    }

    /// Frequency-ranked keywords after stop-word and short-token filtering.
    fn extract_keywords(&self, text: &str) -> Vec<String> {
        let mut frequencies: HashMap<String, usize> = HashMap::new();
        let mut order: Vec<String> = Vec::new();

        for word in text.unicode_words() {
            let token = word.to_lowercase();
            if token.len() <= 3 || self.stop_words.contains(token.as_str()) {
                continue;
            }
            if !frequencies.contains_key(&token) {
                order.push(token.clone());
            }
            *frequencies.entry(token).or_insert(0) += 1;
        }

        // Rank by count descending; first-seen order breaks ties so the
        // output is deterministic.
        let mut ranked: Vec<(usize, String)> = order
            .into_iter()
            .map(|token| (frequencies[&token], token))
            .collect();
        ranked.sort_by(|a, b| b.0.cmp(&a.0));

        ranked
            .into_iter()
            .take(KEYWORD_LIMIT)
            .map(|(_, token)| token)
            .collect()
    }

    /// Distinct vocabulary terms present in a slice, in match order.
    fn vocabulary_terms_in(&self, text: &str) -> Vec<String> {
        let mut terms = Vec::new();
        for mat in self.vocab_matcher.find_iter(text) {
            if !is_word_bounded(text, mat.start(), mat.end()) {
                continue;
            }
            let term = self.vocabulary[mat.pattern()].to_string();
            push_unique(&mut terms, term);
        }
        terms
    }

    /// Match-end offsets per vocabulary term across the whole text.
    fn vocabulary_occurrences(&self, text: &str) -> Vec<(String, Vec<usize>)> {
        let mut occurrences: HashMap<usize, Vec<usize>> = HashMap::new();
        for mat in self.vocab_matcher.find_iter(text) {
            if !is_word_bounded(text, mat.start(), mat.end()) {
                continue;
            }
            occurrences
                .entry(mat.pattern().as_usize())
                .or_default()
                .push(mat.end());
        }

        let mut result: Vec<(String, Vec<usize>)> = occurrences
            .into_iter()
            .map(|(idx, ends)| (self.vocabulary[idx].to_string(), ends))
            .collect();
        result.sort_by(|a, b| a.1[0].cmp(&b.1[0]));
        result
    }
}

/// Stable sort by match count needs a deterministic secondary order; a
/// vocabulary term can't appear twice so uniqueness is enough here.
fn push_unique(list: &mut Vec<String>, term: String) {
    if !list.iter().any(|existing| existing.eq_ignore_ascii_case(&term)) {
        list.push(term);
    }
}

/// True when the match is not embedded inside a larger alphanumeric token.
pub(crate) fn is_word_bounded(text: &str, start: usize, end: usize) -> bool {
    let before_ok = text[..start]
        .chars()
        .next_back()
        .map_or(true, |c| !c.is_alphanumeric());
    let after_ok = text[end..]
        .chars()
        .next()
        .map_or(true, |c| !c.is_alphanumeric() && c != '+' && c != '#');
    before_ok && after_ok
}

/// Byte offset of the first ASCII-case-insensitive occurrence of `needle`
/// at or after `from`. Offsets refer to `haystack` itself, so they stay
/// valid for slicing regardless of what case folding would do to lengths;
/// only character-boundary positions are returned.
pub(crate) fn find_ascii_ci(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    let h = haystack.as_bytes();
    let n = needle.as_bytes();
    if n.is_empty() || from > h.len() || h.len() - from < n.len() {
        return None;
    }
    (from..=h.len() - n.len()).find(|&i| {
        haystack.is_char_boundary(i)
            && haystack.is_char_boundary(i + n.len())
            && h[i..i + n.len()].eq_ignore_ascii_case(n)
    })
}

/// Slice of `text` from the first matching header to the next recognized
/// section header or end of text. Case-insensitive header search.
fn slice_section<'a>(text: &'a str, headers: &[&str]) -> Option<&'a str> {
    let start = headers
        .iter()
        .filter_map(|h| find_ascii_ci(text, h, 0).map(|idx| idx + h.len()))
        .min()?;

    let end = REQUIRED_HEADERS
        .iter()
        .chain(PREFERRED_HEADERS.iter())
        .chain(SECTION_TERMINATORS.iter())
        .filter_map(|h| find_ascii_ci(text, h, start))
        .min()
        .unwrap_or(text.len());

    Some(&text[start..end])
}

fn experience_rules() -> Vec<ExperienceRule> {
    fn first_group(caps: &regex::Captures) -> Option<u32> {
        caps.get(1)?.as_str().parse().ok()
    }

    vec![
        ExperienceRule {
            pattern: Regex::new(r"(?i)\b(\d{1,2})\s*\+\s*years?").expect("Invalid years regex"),
            extract: first_group,
        },
        ExperienceRule {
            pattern: Regex::new(r"(?i)\b(?:minimum|at least)\s+(?:of\s+)?(\d{1,2})\s+years?")
                .expect("Invalid minimum-years regex"),
            extract: first_group,
        },
        // Range: take the lower bound.
        ExperienceRule {
            pattern: Regex::new(r"(?i)\b(\d{1,2})\s*(?:to|-|–)\s*(\d{1,2})\s+years?")
                .expect("Invalid range-years regex"),
            extract: first_group,
        },
        ExperienceRule {
            pattern: Regex::new(r"(?i)\bexperience\s*:\s*(\d{1,2})\s+years?")
                .expect("Invalid labeled-years regex"),
            extract: first_group,
        },
        ExperienceRule {
            pattern: Regex::new(r"(?i)\b(\d{1,2})\s+years?(?:\s+of)?(?:\s+\w+)?\s+experience")
                .expect("Invalid years-experience regex"),
            extract: first_group,
        },
    ]
}

fn education_rules() -> Vec<(Regex, EducationLevel)> {
    vec![
        (
            Regex::new(r"(?i)\b(?:ph\.?\s?d|doctorate|doctoral)\b").expect("Invalid PhD regex"),
            EducationLevel::Phd,
        ),
        (
            Regex::new(r"(?i)\b(?:master'?s?\s+degree|master'?s|m\.?sc|mba)\b")
                .expect("Invalid master's regex"),
            EducationLevel::Masters,
        ),
        (
            Regex::new(r"(?i)\b(?:bachelor'?s?\s+degree|bachelor'?s|b\.?sc|b\.?a\.?\b|undergraduate\s+degree)")
                .expect("Invalid bachelor's regex"),
            EducationLevel::Bachelors,
        ),
        (
            Regex::new(r"(?i)\bassociate'?s?\s+degree|\bassociate'?s\b")
                .expect("Invalid associate's regex"),
            EducationLevel::Associates,
        ),
        (
            Regex::new(r"(?i)\bdiploma\b").expect("Invalid diploma regex"),
            EducationLevel::Diploma,
        ),
    ]
}

/// Fixed technology vocabulary recognized inside requirement sections.
pub(crate) fn technology_vocabulary() -> Vec<&'static str> {
    vec![
        // Languages
        "javascript", "typescript", "python", "java", "c++", "c#", "go", "rust", "ruby", "php",
        "swift", "kotlin", "scala", "elixir",
        // Frontend
        "react", "angular", "vue", "svelte", "next.js", "html", "css", "sass", "tailwind",
        "webpack",
        // Backend
        "node.js", "express", "django", "flask", "fastapi", "spring", "rails", "laravel",
        "graphql", "rest", "grpc", "microservices",
        // Infrastructure
        "docker", "kubernetes", "terraform", "ansible", "jenkins", "aws", "azure", "gcp",
        "linux", "git", "ci/cd", "nginx", "serverless",
        // Data stores
        "postgresql", "mysql", "mongodb", "redis", "elasticsearch", "cassandra", "dynamodb",
        "sqlite", "oracle",
        // Data & ML
        "kafka", "rabbitmq", "spark", "hadoop", "airflow", "tensorflow", "pytorch", "pandas",
        "numpy", "machine learning", "deep learning", "nlp", "sql",
        // Testing & process
        "jest", "pytest", "selenium", "cypress", "junit", "agile", "scrum",
    ]
}

fn stop_words() -> HashSet<&'static str> {
    [
        "about", "above", "after", "again", "against", "along", "also", "among", "around",
        "because", "been", "before", "being", "below", "between", "both", "business", "candidate",
        "candidates", "company", "could", "does", "doing", "down", "during", "each", "either",
        "every", "from", "further", "have", "having", "here", "hiring", "ideal", "into", "join",
        "looking", "member", "more", "most", "must", "only", "opportunity", "other", "ours",
        "over", "please", "position", "role", "same", "seeking", "should", "some", "somebody",
        "strong", "such", "team", "than", "that", "their", "theirs", "them", "then", "there",
        "these", "they", "this", "those", "through", "under", "until", "very", "well", "were",
        "what", "when", "where", "which", "while", "will", "with", "within", "without", "work",
        "would", "years", "your", "yours",
    ]
    .into_iter()
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> FallbackExtractor {
        FallbackExtractor::new().unwrap()
    }

    #[test]
    fn test_experience_plus_years() {
        assert_eq!(extractor().extract_experience_years("We need 5+ years with React."), 5);
    }

    #[test]
    fn test_experience_minimum_phrasing() {
        let e = extractor();
        assert_eq!(e.extract_experience_years("Minimum 3 years in backend work."), 3);
        assert_eq!(e.extract_experience_years("At least 7 years building services."), 7);
    }

    #[test]
    fn test_experience_range_takes_lower_bound() {
        let e = extractor();
        assert_eq!(e.extract_experience_years("Looking for 3 to 5 years of work."), 3);
        assert_eq!(e.extract_experience_years("Between 4-6 years preferred."), 4);
    }

    #[test]
    fn test_experience_labeled_and_trailing_forms() {
        let e = extractor();
        assert_eq!(e.extract_experience_years("Experience: 6 years required."), 6);
        assert_eq!(e.extract_experience_years("8 years of experience with Java."), 8);
        assert_eq!(e.extract_experience_years("2 years experience needed."), 2);
    }

    #[test]
    fn test_experience_implausible_values_rejected() {
        let e = extractor();
        assert_eq!(e.extract_experience_years("We want 50+ years of experience."), 0);
        assert_eq!(e.extract_experience_years("No numbers here at all."), 0);
    }

    #[test]
    fn test_education_priority_order() {
        let e = extractor();
        assert_eq!(
            e.extract_education("PhD preferred, Bachelor's degree required."),
            Some(EducationLevel::Phd)
        );
        assert_eq!(
            e.extract_education("Master's degree or equivalent."),
            Some(EducationLevel::Masters)
        );
        assert_eq!(
            e.extract_education("Bachelor's degree in Computer Science."),
            Some(EducationLevel::Bachelors)
        );
        assert_eq!(
            e.extract_education("Associate's degree accepted."),
            Some(EducationLevel::Associates)
        );
        assert_eq!(e.extract_education("High school diploma."), Some(EducationLevel::Diploma));
        assert_eq!(e.extract_education("No credentials mentioned."), None);
    }

    #[test]
    fn test_section_based_skill_classification() {
        let e = extractor();
        let text = "Requirements:\nReact and PostgreSQL in production.\n\n\
                    Nice to have:\nDocker and Terraform.";
        let extraction = e.extract(text);

        assert!(extraction.required_skills.iter().any(|s| s == "react"));
        assert!(extraction.required_skills.iter().any(|s| s == "postgresql"));
        assert!(extraction.preferred_skills.iter().any(|s| s == "docker"));
        assert!(extraction.preferred_skills.iter().any(|s| s == "terraform"));
    }

    #[test]
    fn test_repeated_mention_promotes_to_required() {
        let e = extractor();
        let text = "We build with Kafka every day. Kafka powers our event backbone.";
        let extraction = e.extract(text);
        assert!(extraction.required_skills.iter().any(|s| s == "kafka"));
    }

    #[test]
    fn test_inline_classification_outside_sections() {
        let e = extractor();
        let required = e.extract("Python is required for this role.");
        assert!(required.required_skills.iter().any(|s| s == "python"));

        let preferred = e.extract("Redis is a plus.");
        assert!(preferred.preferred_skills.iter().any(|s| s == "redis"));
    }

    #[test]
    fn test_required_wins_over_preferred() {
        let e = extractor();
        // Mentioned twice (required) and also "a plus": required wins.
        let text = "Go is a plus. We ship Go services daily.";
        let extraction = e.extract(text);
        assert!(extraction.required_skills.iter().any(|s| s == "go"));
        assert!(!extraction.preferred_skills.iter().any(|s| s == "go"));
    }

    #[test]
    fn test_vocabulary_word_boundaries() {
        let e = extractor();
        // "go" inside "google" must not count.
        let extraction = e.extract("We use Google Workspace for calendars and documents.");
        assert!(!extraction.required_skills.iter().any(|s| s == "go"));
        assert!(!extraction.preferred_skills.iter().any(|s| s == "go"));
    }

    #[test]
    fn test_non_ascii_text_keeps_section_offsets() {
        let e = extractor();
        // Case folding 'İ' grows it from two bytes to three; header offsets
        // must still line up with the original text.
        let extraction = e.extract("İİİİ Requirements: React and PostgreSQL.");
        assert!(extraction.required_skills.iter().any(|s| s == "react"));
        assert!(extraction.required_skills.iter().any(|s| s == "postgresql"));
    }

    #[test]
    fn test_keyword_ranking_and_limit() {
        let e = extractor();
        let text = "kubernetes kubernetes kubernetes deployment deployment observability";
        let keywords = e.extract_keywords(text);
        assert_eq!(keywords[0], "kubernetes");
        assert_eq!(keywords[1], "deployment");
        assert!(keywords.len() <= KEYWORD_LIMIT);
    }

    #[test]
    fn test_keywords_drop_stop_words_and_short_tokens() {
        let e = extractor();
        let keywords = e.extract_keywords("We are looking for the ideal candidate with api chops");
        assert!(!keywords.contains(&"looking".to_string()));
        assert!(!keywords.contains(&"ideal".to_string()));
        // "api" is only 3 characters.
        assert!(!keywords.contains(&"api".to_string()));
        assert!(keywords.contains(&"chops".to_string()));
    }

    #[test]
    fn test_empty_text_yields_empty_extraction() {
        let e = extractor();
        let extraction = e.extract("");
        assert_eq!(extraction, FallbackExtraction::default());
    }
}
