//! Multi-factor confidence estimation for a reported match score
//!
//! Five weighted factors produce an overall 0–100 confidence, which maps to
//! a ± band displayed around the score. Degraded certainty is communicated
//! here, never as an error to the caller.

use crate::model::{
    ConfidenceAssessment, ConfidenceBandTier, ConfidenceFactors, ConfidenceTier, JobRequirements,
    MatchKind, ResumeProfile, SkillMatch,
};

/// Factor weights; must sum to 1.0.
const JD_PARSING_WEIGHT: f64 = 0.30;
const RESUME_PARSING_WEIGHT: f64 = 0.20;
const SKILL_MATCHING_WEIGHT: f64 = 0.25;
const DATA_COMPLETENESS_WEIGHT: f64 = 0.15;
const AI_RELIABILITY_WEIGHT: f64 = 0.10;

pub struct ConfidenceEstimator;

impl Default for ConfidenceEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfidenceEstimator {
    pub fn new() -> Self {
        Self
    }

    pub fn estimate(
        &self,
        requirements: &JobRequirements,
        profile: &ResumeProfile,
        skill_matches: &[SkillMatch],
        total_score: u32,
    ) -> ConfidenceAssessment {
        let factors = ConfidenceFactors {
            jd_parsing_quality: jd_parsing_quality(requirements),
            resume_parsing_quality: resume_parsing_quality(profile.parse_quality),
            skill_matching_quality: skill_matching_quality(skill_matches),
            data_completeness: data_completeness(requirements, profile),
            ai_reliability: ai_reliability(requirements.provenance.confidence_tier),
        };

        let weighted_shortfall = JD_PARSING_WEIGHT * (100.0 - factors.jd_parsing_quality)
            + RESUME_PARSING_WEIGHT * (100.0 - factors.resume_parsing_quality)
            + SKILL_MATCHING_WEIGHT * (100.0 - factors.skill_matching_quality)
            + DATA_COMPLETENESS_WEIGHT * (100.0 - factors.data_completeness)
            + AI_RELIABILITY_WEIGHT * (100.0 - factors.ai_reliability);

        let overall = (100.0 - weighted_shortfall).max(0.0).round() as u32;

        let (band, tier) = if overall >= 85 {
            (3, ConfidenceBandTier::High)
        } else if overall >= 65 {
            (5, ConfidenceBandTier::Medium)
        } else {
            (8, ConfidenceBandTier::Low)
        };

        let score_range = (
            total_score.saturating_sub(band),
            (total_score + band).min(100),
        );

        ConfidenceAssessment {
            overall_confidence: overall,
            band,
            tier,
            factors,
            score_range,
        }
    }
}

/// Requirement-set quality from provenance: pure high-confidence AI output
/// scores best, merged output lower, fallback-only lowest.
fn jd_parsing_quality(requirements: &JobRequirements) -> f64 {
    let provenance = &requirements.provenance;
    if provenance.used_ai && !provenance.used_fallback {
        95.0
    } else if provenance.used_ai {
        75.0
    } else {
        65.0
    }
}

/// Fixed thresholds over the 0–5 parse quality ordinal.
fn resume_parsing_quality(parse_quality: u8) -> f64 {
    match parse_quality {
        5 => 100.0,
        4 => 85.0,
        3 => 70.0,
        2 => 55.0,
        _ => 40.0,
    }
}

/// Exact-match rate over the required skills, with a mostly-partial rescue
/// band below the fixed thresholds.
fn skill_matching_quality(skill_matches: &[SkillMatch]) -> f64 {
    if skill_matches.is_empty() {
        return 65.0;
    }

    let exact = skill_matches.iter().filter(|m| m.kind == MatchKind::Exact).count();
    let partial = skill_matches.iter().filter(|m| m.kind == MatchKind::Partial).count();
    let missing = skill_matches.iter().filter(|m| m.kind == MatchKind::None).count();
    let rate = exact as f64 / skill_matches.len() as f64;

    if rate >= 0.8 {
        95.0
    } else if rate >= 0.6 {
        85.0
    } else if rate >= 0.4 {
        75.0
    } else if partial >= missing {
        65.0
    } else {
        50.0
    }
}

/// 100 minus fixed deductions per missing field, floored at 0.
fn data_completeness(requirements: &JobRequirements, profile: &ResumeProfile) -> f64 {
    let mut score: f64 = 100.0;
    if requirements.required_skills.is_empty() {
        score -= 20.0;
    }
    if requirements.keywords.is_empty() {
        score -= 10.0;
    }
    if requirements.required_experience_years == 0 {
        score -= 10.0;
    }
    if profile.raw_text.trim().is_empty() {
        score -= 20.0;
    }
    score.max(0.0)
}

fn ai_reliability(tier: ConfidenceTier) -> f64 {
    match tier {
        ConfidenceTier::Excellent => 100.0,
        ConfidenceTier::Good => 85.0,
        ConfidenceTier::Acceptable => 70.0,
        ConfidenceTier::Poor => 55.0,
        ConfidenceTier::Unreliable => 40.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ContactInfo, Provenance};

    fn requirements(tier: ConfidenceTier, used_ai: bool, used_fallback: bool) -> JobRequirements {
        JobRequirements {
            required_skills: vec!["react".to_string()],
            preferred_skills: Vec::new(),
            required_experience_years: 3,
            education_requirement: None,
            keywords: vec!["react".to_string()],
            responsibilities: Vec::new(),
            provenance: Provenance {
                used_ai,
                used_fallback,
                confidence_tier: tier,
            },
        }
    }

    fn profile(parse_quality: u8) -> ResumeProfile {
        ResumeProfile {
            raw_text: "resume text".to_string(),
            contact: ContactInfo::default(),
            experience_entries: Vec::new(),
            education_entries: Vec::new(),
            skills: vec!["react".to_string()],
            total_years_experience: 3,
            parse_quality,
        }
    }

    fn exact_match() -> SkillMatch {
        SkillMatch {
            required_skill: "react".to_string(),
            matched_skill: Some("react".to_string()),
            similarity: 1.0,
            credit: 1.0,
            kind: MatchKind::Exact,
        }
    }

    fn missing_match() -> SkillMatch {
        SkillMatch {
            required_skill: "cobol".to_string(),
            matched_skill: None,
            similarity: 0.0,
            credit: 0.0,
            kind: MatchKind::None,
        }
    }

    #[test]
    fn test_best_case_is_high_confidence() {
        let estimator = ConfidenceEstimator::new();
        let reqs = requirements(ConfidenceTier::Excellent, true, false);
        let assessment = estimator.estimate(&reqs, &profile(5), &[exact_match()], 80);

        assert!(assessment.overall_confidence >= 85);
        assert_eq!(assessment.band, 3);
        assert_eq!(assessment.tier, ConfidenceBandTier::High);
        assert_eq!(assessment.score_range, (77, 83));
    }

    #[test]
    fn test_fallback_only_is_lower_confidence() {
        let estimator = ConfidenceEstimator::new();
        let ai = requirements(ConfidenceTier::Excellent, true, false);
        let fallback = requirements(ConfidenceTier::Poor, false, true);

        let with_ai = estimator.estimate(&ai, &profile(5), &[exact_match()], 80);
        let with_fallback = estimator.estimate(&fallback, &profile(5), &[exact_match()], 80);

        assert!(with_fallback.overall_confidence < with_ai.overall_confidence);
    }

    #[test]
    fn test_confidence_is_monotonic_in_each_factor() {
        let estimator = ConfidenceEstimator::new();
        let base_reqs = requirements(ConfidenceTier::Acceptable, true, true);
        let base = estimator.estimate(&base_reqs, &profile(3), &[exact_match(), missing_match()], 50);

        // Raise the resume parsing factor only.
        let better_resume = estimator.estimate(&base_reqs, &profile(5), &[exact_match(), missing_match()], 50);
        assert!(better_resume.overall_confidence >= base.overall_confidence);

        // Raise the AI reliability factor only.
        let better_tier = requirements(ConfidenceTier::Excellent, true, true);
        let better_ai = estimator.estimate(&better_tier, &profile(3), &[exact_match(), missing_match()], 50);
        assert!(better_ai.overall_confidence >= base.overall_confidence);

        // Raise the skill matching factor only.
        let better_skills = estimator.estimate(&base_reqs, &profile(3), &[exact_match(), exact_match()], 50);
        assert!(better_skills.overall_confidence >= base.overall_confidence);
    }

    #[test]
    fn test_skill_matching_thresholds() {
        assert_eq!(skill_matching_quality(&[exact_match()]), 95.0);

        let half_exact = vec![exact_match(), missing_match()];
        // 50% exact with as many partials as misses is below every
        // threshold; one exact + one miss lands in the 0.4 band.
        assert_eq!(skill_matching_quality(&half_exact), 75.0);

        let mostly_partial = vec![
            SkillMatch {
                required_skill: "react".to_string(),
                matched_skill: Some("next.js".to_string()),
                similarity: 0.6,
                credit: 0.3,
                kind: MatchKind::Partial,
            },
            missing_match(),
        ];
        assert_eq!(skill_matching_quality(&mostly_partial), 65.0);

        let all_missing = vec![missing_match(), missing_match(), missing_match()];
        assert_eq!(skill_matching_quality(&all_missing), 50.0);
    }

    #[test]
    fn test_data_completeness_deductions() {
        let full = requirements(ConfidenceTier::Good, true, true);
        assert_eq!(data_completeness(&full, &profile(5)), 100.0);

        let mut sparse = requirements(ConfidenceTier::Good, true, true);
        sparse.required_skills.clear();
        sparse.keywords.clear();
        sparse.required_experience_years = 0;
        let mut empty_profile = profile(0);
        empty_profile.raw_text = String::new();
        // 100 − 20 − 10 − 10 − 20 = 40.
        assert_eq!(data_completeness(&sparse, &empty_profile), 40.0);
    }

    #[test]
    fn test_band_boundaries() {
        let estimator = ConfidenceEstimator::new();
        // Worst case everywhere still produces a usable low-confidence band.
        let mut reqs = requirements(ConfidenceTier::Unreliable, false, true);
        reqs.required_skills.clear();
        reqs.keywords.clear();
        reqs.required_experience_years = 0;
        let mut p = profile(0);
        p.raw_text = String::new();

        let assessment = estimator.estimate(&reqs, &p, &[missing_match(), missing_match()], 10);
        assert!(assessment.overall_confidence < 65);
        assert_eq!(assessment.band, 8);
        assert_eq!(assessment.tier, ConfidenceBandTier::Low);
        assert_eq!(assessment.score_range, (2, 18));
    }

    #[test]
    fn test_score_range_clamped() {
        let estimator = ConfidenceEstimator::new();
        let reqs = requirements(ConfidenceTier::Unreliable, false, true);
        let low = estimator.estimate(&reqs, &profile(0), &[missing_match()], 3);
        assert_eq!(low.score_range.0, 0);
        let high = estimator.estimate(&reqs, &profile(0), &[missing_match()], 99);
        assert_eq!(high.score_range.1, 100);
    }
}
