//! Six-category scoring engine aggregating into a MatchResult
//!
//! Stateless per request: holds only immutable configuration. Absent
//! requirements never yield free full credit; the anti-inflation rule is
//! applied uniformly to required skills, experience, and education.

use crate::config::CategoryWeights;
use crate::matching::keywords::KeywordDensityScorer;
use crate::matching::similarity::SkillSimilarityResolver;
use crate::model::{
    Category, CategoryScoreResult, EducationLevel, JobRequirements, MatchKind, MatchResult,
    ResumeProfile, ScoreLabel, SkillMatch,
};
use log::debug;

/// Skill credit at or above this counts as fully matched (no deduction).
const FULL_MATCH_CREDIT: f64 = 0.9;

/// Preferred skills count as matched at this credit or better.
const PREFERRED_MATCH_CREDIT: f64 = 0.7;

/// Matches counted toward the preferred-skills category are capped here.
const PREFERRED_MATCH_CAP: usize = 5;

/// Experience penalties as fractions of the category weight.
const OVERQUALIFIED_PENALTY: f64 = 0.15;
const SMALL_GAP_PENALTY: f64 = 0.25;
const MEDIUM_GAP_PENALTY: f64 = 0.5;

pub struct MatchOutcome {
    pub result: MatchResult,
    /// Per-required-skill resolution detail, kept for confidence estimation.
    pub skill_matches: Vec<SkillMatch>,
}

/// Scores a resume profile against a reconciled requirement set.
pub struct MatchingEngine {
    weights: CategoryWeights,
    resolver: SkillSimilarityResolver,
    keyword_scorer: KeywordDensityScorer,
}

impl MatchingEngine {
    pub fn new(weights: CategoryWeights) -> Self {
        Self {
            weights,
            resolver: SkillSimilarityResolver::new(),
            keyword_scorer: KeywordDensityScorer::new(),
        }
    }

    /// Run all six category scorers and aggregate. Pure function of its
    /// inputs; scoring the same pair twice yields bit-identical totals.
    pub fn evaluate(&self, requirements: &JobRequirements, profile: &ResumeProfile) -> MatchOutcome {
        let (required_result, skill_matches) = self.score_required_skills(
            &requirements.required_skills,
            &profile.skills,
            self.weights.required_skills,
        );
        let experience_result = self.score_experience(
            requirements.required_experience_years,
            profile.total_years_experience,
            self.weights.experience,
        );
        let education_result = self.score_education(
            requirements.education_requirement,
            profile,
            self.weights.education,
        );
        let preferred_result = self.score_preferred_skills(
            &requirements.preferred_skills,
            &profile.skills,
            self.weights.preferred_skills,
        );
        let keyword_result = self.score_keyword_density(
            &profile.raw_text,
            &requirements.keywords,
            self.weights.keyword_density,
        );
        let format_result = self.score_format_clarity(profile.parse_quality, self.weights.format_clarity);

        let breakdown = vec![
            required_result,
            experience_result,
            education_result,
            preferred_result,
            keyword_result,
            format_result,
        ];

        let total: f64 = breakdown.iter().map(|c| c.points_earned).sum();
        let total_score = total.round().clamp(0.0, 100.0) as u32;
        let label = ScoreLabel::for_score(total_score);

        debug!("match total {} ({})", total_score, label);

        MatchOutcome {
            result: MatchResult {
                total_score,
                label,
                breakdown,
            },
            skill_matches,
        }
    }

    /// Required skills: start at full weight, deduct per unmatched skill.
    /// An empty requirement list scores exactly 0, never the max.
    fn score_required_skills(
        &self,
        required: &[String],
        candidate_skills: &[String],
        max_points: f64,
    ) -> (CategoryScoreResult, Vec<SkillMatch>) {
        if required.is_empty() {
            let result = CategoryScoreResult {
                category: Category::RequiredSkills,
                points_earned: 0.0,
                max_points,
                verdict: "No required skills stated in the job description".to_string(),
                matched: Vec::new(),
                missing: Vec::new(),
            };
            return (result, Vec::new());
        }

        let points_per_skill = max_points / required.len() as f64;
        let mut points = max_points;
        let mut matched = Vec::new();
        let mut missing = Vec::new();
        let mut skill_matches = Vec::with_capacity(required.len());

        for skill in required {
            let m = self.resolver.calculate_skill_credit(skill, candidate_skills);
            match m.kind {
                _ if m.credit >= FULL_MATCH_CREDIT => matched.push(skill.clone()),
                MatchKind::Partial => {
                    points -= points_per_skill * (1.0 - m.credit);
                    missing.push(skill.clone());
                }
                _ => {
                    points -= points_per_skill;
                    missing.push(skill.clone());
                }
            }
            skill_matches.push(m);
        }

        let points_earned = points.max(0.0);
        let verdict = format!(
            "{} of {} required skills matched",
            matched.len(),
            required.len()
        );

        let result = CategoryScoreResult {
            category: Category::RequiredSkills,
            points_earned,
            max_points,
            verdict,
            matched,
            missing,
        };
        (result, skill_matches)
    }

    /// Experience: tiered credit from tenure alone when no requirement is
    /// declared, otherwise penalty bands around the declared requirement.
    fn score_experience(&self, required_years: u32, actual_years: u32, max_points: f64) -> CategoryScoreResult {
        let (points, verdict) = if required_years == 0 {
            let fraction = match actual_years {
                0 => 0.0,
                1..=2 => 0.4,
                3..=4 => 0.6,
                5..=9 => 0.8,
                _ => 1.0,
            };
            (
                max_points * fraction,
                format!(
                    "No experience requirement stated; credited for {} years of tenure",
                    actual_years
                ),
            )
        } else {
            let diff = actual_years as i64 - required_years as i64;
            let (points, verdict) = if diff >= 5 {
                (
                    max_points * (1.0 - OVERQUALIFIED_PENALTY),
                    format!("{} years exceeds the requirement by {}", actual_years, diff),
                )
            } else if diff >= 0 {
                (max_points, format!("Meets the {}-year requirement", required_years))
            } else if diff >= -2 {
                (
                    max_points * (1.0 - SMALL_GAP_PENALTY),
                    format!("Slightly below the {}-year requirement", required_years),
                )
            } else if diff >= -4 {
                (
                    max_points * (1.0 - MEDIUM_GAP_PENALTY),
                    format!("Below the {}-year requirement", required_years),
                )
            } else {
                (
                    0.0,
                    format!("Far below the {}-year requirement", required_years),
                )
            };
            (points, verdict)
        };

        CategoryScoreResult {
            category: Category::Experience,
            points_earned: points.max(0.0),
            max_points,
            verdict,
            matched: Vec::new(),
            missing: Vec::new(),
        }
    }

    /// Education: meets-or-exceeds earns full weight, exactly one level
    /// below earns half, anything lower earns nothing. With no requirement,
    /// a tiered fraction rewards the highest degree held.
    fn score_education(
        &self,
        requirement: Option<EducationLevel>,
        profile: &ResumeProfile,
        max_points: f64,
    ) -> CategoryScoreResult {
        let highest = profile
            .education_entries
            .iter()
            .map(|e| e.level)
            .max();

        let (points, verdict) = match requirement {
            None => {
                let fraction = match highest {
                    Some(EducationLevel::Phd) => 1.0,
                    Some(EducationLevel::Masters) => 0.8,
                    Some(EducationLevel::Bachelors) => 0.6,
                    Some(EducationLevel::Associates) => 0.4,
                    Some(EducationLevel::Diploma) => 0.2,
                    None => 0.0,
                };
                let verdict = match highest {
                    Some(level) => format!("No education requirement stated; holds {}", level),
                    None => "No education requirement stated; no degree found".to_string(),
                };
                (max_points * fraction, verdict)
            }
            Some(required) => match highest {
                Some(held) if held.rank() >= required.rank() => (
                    max_points,
                    format!("{} meets the {} requirement", held, required),
                ),
                Some(held) if held.rank() + 1 == required.rank() => (
                    max_points * 0.5,
                    format!("{} is one level below the {} requirement", held, required),
                ),
                Some(held) => (
                    0.0,
                    format!("{} falls short of the {} requirement", held, required),
                ),
                None => (0.0, format!("No degree found; {} required", required)),
            },
        };

        CategoryScoreResult {
            category: Category::Education,
            points_earned: points,
            max_points,
            verdict,
            matched: highest.map(|h| h.label().to_string()).into_iter().collect(),
            missing: Vec::new(),
        }
    }

    /// Preferred skills: fixed value per skill matched at high confidence,
    /// counted matches capped.
    fn score_preferred_skills(
        &self,
        preferred: &[String],
        candidate_skills: &[String],
        max_points: f64,
    ) -> CategoryScoreResult {
        let per_skill = max_points / PREFERRED_MATCH_CAP as f64;
        let mut matched = Vec::new();
        let mut missing = Vec::new();

        for skill in preferred {
            let m = self.resolver.calculate_skill_credit(skill, candidate_skills);
            if m.credit >= PREFERRED_MATCH_CREDIT {
                matched.push(skill.clone());
            } else {
                missing.push(skill.clone());
            }
        }

        let counted = matched.len().min(PREFERRED_MATCH_CAP);
        let points = (counted as f64 * per_skill).min(max_points);
        let verdict = if preferred.is_empty() {
            "No preferred skills stated".to_string()
        } else {
            format!("{} of {} preferred skills matched", matched.len(), preferred.len())
        };

        CategoryScoreResult {
            category: Category::PreferredSkills,
            points_earned: points,
            max_points,
            verdict,
            matched,
            missing,
        }
    }

    fn score_keyword_density(
        &self,
        resume_text: &str,
        keywords: &[String],
        max_points: f64,
    ) -> CategoryScoreResult {
        let density = self.keyword_scorer.score(resume_text, keywords);
        let points = max_points * density.points_fraction;

        let matched: Vec<String> = density
            .usages
            .iter()
            .filter(|u| u.credit > 0.0)
            .map(|u| u.keyword.clone())
            .collect();
        let missing: Vec<String> = density
            .usages
            .iter()
            .filter(|u| u.credit == 0.0)
            .map(|u| u.keyword.clone())
            .collect();

        let verdict = if density.stuffing_penalty > 0.0 {
            format!(
                "Keyword density {:.2} after a {:.2} stuffing penalty",
                density.adjusted_density, density.stuffing_penalty
            )
        } else {
            format!("Keyword density {:.2}", density.adjusted_density)
        };

        CategoryScoreResult {
            category: Category::KeywordDensity,
            points_earned: points,
            max_points,
            verdict,
            matched,
            missing,
        }
    }

    /// Format and clarity: the externally supplied 0–5 parse quality
    /// ordinal passes through unchanged (already bounded by the weight).
    fn score_format_clarity(&self, parse_quality: u8, max_points: f64) -> CategoryScoreResult {
        let points = (parse_quality as f64).min(max_points);
        CategoryScoreResult {
            category: Category::FormatClarity,
            points_earned: points,
            max_points,
            verdict: format!("Parse quality {} of 5", parse_quality),
            matched: Vec::new(),
            missing: Vec::new(),
        }
    }
}
