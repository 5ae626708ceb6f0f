//! Context-aware keyword density scoring with anti-stuffing penalties
//!
//! A keyword only earns full credit when it appears in a sentence together
//! with an action verb; bare mentions in a skills list earn half credit.
//! Repetition patterns that look like deliberate stuffing are penalized
//! before the density maps to points.

use crate::extraction::fallback::{find_ascii_ci, is_word_bounded};
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Headers that open an experience-like section.
const EXPERIENCE_HEADERS: &[&str] = &[
    "experience",
    "work history",
    "employment",
    "professional background",
];

/// Headers that open a skills-like section.
const SKILLS_HEADERS: &[&str] = &[
    "technical skills",
    "skills",
    "technologies",
    "competencies",
];

/// Action verbs that mark contextual (non-list) keyword usage.
const ACTION_VERBS: &[&str] = &[
    "developed",
    "built",
    "designed",
    "implemented",
    "led",
    "managed",
    "created",
    "architected",
    "deployed",
    "maintained",
    "optimized",
    "improved",
    "automated",
    "integrated",
    "migrated",
    "delivered",
    "launched",
    "scaled",
    "reduced",
    "increased",
    "mentored",
    "collaborated",
    "owned",
    "shipped",
    "refactored",
    "tested",
    "debugged",
    "configured",
    "administered",
    "analyzed",
    "engineered",
    "established",
    "streamlined",
    "spearheaded",
    "drove",
    "coordinated",
    "directed",
    "modernized",
    "monitored",
    "supported",
];

/// Max contextual uses credited per keyword.
const CONTEXTUAL_USE_CAP: usize = 3;

/// Summed stuffing penalties are capped here, not per rule.
const PENALTY_CAP: f64 = 0.5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordDensityScore {
    pub base_density: f64,
    pub stuffing_penalty: f64,
    pub adjusted_density: f64,
    /// Fraction of the category's max points earned.
    pub points_fraction: f64,
    pub usages: Vec<KeywordUsage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordUsage {
    pub keyword: String,
    pub contextual_uses: usize,
    pub skills_list_uses: usize,
    pub total_occurrences: usize,
    pub credit: f64,
}

/// Scores how substantively a resume uses the job description's keywords.
pub struct KeywordDensityScorer;

impl Default for KeywordDensityScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl KeywordDensityScorer {
    pub fn new() -> Self {
        Self
    }

    pub fn score(&self, resume_text: &str, keywords: &[String]) -> KeywordDensityScore {
        if keywords.is_empty() {
            return KeywordDensityScore {
                base_density: 0.0,
                stuffing_penalty: 0.0,
                adjusted_density: 0.0,
                points_fraction: 0.0,
                usages: Vec::new(),
            };
        }

        let skills_section = find_section(resume_text, SKILLS_HEADERS);
        let sentences: Vec<&str> = resume_text
            .split(['.', '!', '?'])
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();

        let mut usages = Vec::with_capacity(keywords.len());
        let mut credit_sum = 0.0;
        let mut penalty: f64 = 0.0;

        for keyword in keywords {
            let term = keyword.trim();
            if term.is_empty() {
                continue;
            }

            let contextual_uses = sentences
                .iter()
                .filter(|sentence| {
                    bounded_count(sentence, term) > 0 && contains_action_verb(sentence)
                })
                .count()
                .min(CONTEXTUAL_USE_CAP);

            let skills_list_uses = skills_section
                .map(|section| bounded_count(section, term))
                .unwrap_or(0);

            let total_occurrences = bounded_count(resume_text, term);

            let credit = if contextual_uses > 0 {
                1.0
            } else if skills_list_uses > 0 {
                0.5
            } else {
                0.0
            };
            credit_sum += credit;

            // Stuffing rules. These can flag the same keyword more than
            // once; only the summed total is capped.
            if total_occurrences >= 6 {
                penalty += 0.10;
            }
            if total_occurrences >= 3 && skills_list_uses == total_occurrences {
                penalty += 0.05;
            }

            usages.push(KeywordUsage {
                keyword: keyword.clone(),
                contextual_uses,
                skills_list_uses,
                total_occurrences,
                credit,
            });
        }

        if has_comma_dump(resume_text, keywords) {
            penalty += 0.15;
        }

        let stuffing_penalty = penalty.min(PENALTY_CAP);
        let base_density = credit_sum / keywords.len() as f64;
        let adjusted_density = (base_density - stuffing_penalty).max(0.0);
        let points_fraction = density_to_fraction(adjusted_density);

        debug!(
            "keyword density: base={:.3} penalty={:.3} adjusted={:.3} fraction={:.2}",
            base_density, stuffing_penalty, adjusted_density, points_fraction
        );

        KeywordDensityScore {
            base_density,
            stuffing_penalty,
            adjusted_density,
            points_fraction,
            usages,
        }
    }
}

/// Map adjusted density onto the fraction of max points earned.
fn density_to_fraction(density: f64) -> f64 {
    if density >= 0.70 {
        1.0
    } else if density >= 0.50 {
        0.7
    } else if density >= 0.30 {
        0.4
    } else if density >= 0.15 {
        0.2
    } else {
        0.0
    }
}

fn contains_action_verb(sentence: &str) -> bool {
    let lower = sentence.to_lowercase();
    ACTION_VERBS
        .iter()
        .any(|verb| lower.split_whitespace().any(|w| w.trim_matches(|c: char| !c.is_alphanumeric()) == *verb))
}

/// Case-insensitive whole-word occurrence count. Boundary checks tolerate
/// keywords ending in symbols ("c++", "c#"), which `\b` cannot.
fn bounded_count(text: &str, keyword: &str) -> usize {
    let mut count = 0;
    let mut from = 0;
    while let Some(start) = find_ascii_ci(text, keyword, from) {
        let end = start + keyword.len();
        if is_word_bounded(text, start, end) {
            count += 1;
        }
        from = end;
    }
    count
}

/// Detects a literal comma-dump: three or more of the JD keywords in a row
/// separated only by commas and whitespace.
fn has_comma_dump(text: &str, keywords: &[String]) -> bool {
    if keywords.len() < 3 {
        return false;
    }
    let alternation = keywords
        .iter()
        .map(|k| regex::escape(k.trim()))
        .filter(|k| !k.is_empty())
        .collect::<Vec<_>>()
        .join("|");
    if alternation.is_empty() {
        return false;
    }
    let pattern = format!(r"(?i)\b({a})\b(\s*,\s*\b({a})\b){{2,}}", a = alternation);
    match Regex::new(&pattern) {
        Ok(re) => re.is_match(text),
        Err(_) => false,
    }
}

/// Slice of `text` from a recognized header to the next recognized header
/// or end of text. Header search is case-insensitive; offsets come from
/// the original text so multi-byte characters cannot shift the slice.
fn find_section<'a>(text: &'a str, headers: &[&str]) -> Option<&'a str> {
    let start = headers
        .iter()
        .filter_map(|h| find_ascii_ci(text, h, 0).map(|idx| idx + h.len()))
        .min()?;

    let all_headers: Vec<&str> = EXPERIENCE_HEADERS
        .iter()
        .chain(SKILLS_HEADERS.iter())
        .chain(["education", "summary", "projects", "certifications"].iter())
        .copied()
        .collect();

    let end = all_headers
        .iter()
        .filter_map(|h| find_ascii_ci(text, h, start))
        .min()
        .unwrap_or(text.len());

    Some(&text[start..end])
}
