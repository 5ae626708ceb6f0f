//! Shared data model: job requirements, resume profiles, and score results

use serde::{Deserialize, Serialize};

/// Requirement set for one job description, reconciled from AI and
/// fallback extraction. Created once per analysis, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRequirements {
    pub required_skills: Vec<String>,
    pub preferred_skills: Vec<String>,
    pub required_experience_years: u32,
    pub education_requirement: Option<EducationLevel>,
    pub keywords: Vec<String>,
    pub responsibilities: Vec<String>,
    pub provenance: Provenance,
}

impl JobRequirements {
    /// Fully-zeroed requirement set used when every extraction path came
    /// back empty. Still scoreable: the engine treats absent requirements
    /// with its documented anti-inflation defaults.
    pub fn empty(provenance: Provenance) -> Self {
        Self {
            required_skills: Vec::new(),
            preferred_skills: Vec::new(),
            required_experience_years: 0,
            education_requirement: None,
            keywords: Vec::new(),
            responsibilities: Vec::new(),
            provenance,
        }
    }
}

/// Where a requirement set came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provenance {
    pub used_ai: bool,
    pub used_fallback: bool,
    pub confidence_tier: ConfidenceTier,
}

/// Reliability tier assigned by the AI response validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceTier {
    Excellent,
    Good,
    Acceptable,
    Poor,
    Unreliable,
}

/// Five-level education hierarchy, highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EducationLevel {
    Diploma,
    Associates,
    Bachelors,
    Masters,
    Phd,
}

impl EducationLevel {
    /// Ordinal rank within the hierarchy (Diploma 1 .. PhD 5).
    pub fn rank(self) -> u8 {
        match self {
            EducationLevel::Diploma => 1,
            EducationLevel::Associates => 2,
            EducationLevel::Bachelors => 3,
            EducationLevel::Masters => 4,
            EducationLevel::Phd => 5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EducationLevel::Diploma => "Diploma",
            EducationLevel::Associates => "Associate's",
            EducationLevel::Bachelors => "Bachelor's",
            EducationLevel::Masters => "Master's",
            EducationLevel::Phd => "PhD",
        }
    }
}

impl std::fmt::Display for EducationLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Candidate profile supplied by the resume-structure collaborator.
/// Read-only to the scoring core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeProfile {
    pub raw_text: String,
    pub contact: ContactInfo,
    pub experience_entries: Vec<ExperienceEntry>,
    pub education_entries: Vec<EducationEntry>,
    pub skills: Vec<String>,
    pub total_years_experience: u32,
    /// Ordinal parse quality in [0,5] assigned by the structure collaborator.
    pub parse_quality: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub title: String,
    pub organization: Option<String>,
    pub years: Option<u32>,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub level: EducationLevel,
    pub field: Option<String>,
    pub institution: Option<String>,
}

/// Outcome of resolving one required skill against the candidate's skills.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillMatch {
    pub required_skill: String,
    pub matched_skill: Option<String>,
    pub similarity: f64,
    pub credit: f64,
    pub kind: MatchKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchKind {
    Exact,
    Partial,
    None,
}

/// Points earned for one of the six scoring categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScoreResult {
    pub category: Category,
    pub points_earned: f64,
    pub max_points: f64,
    pub verdict: String,
    pub matched: Vec<String>,
    pub missing: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    RequiredSkills,
    Experience,
    Education,
    PreferredSkills,
    KeywordDensity,
    FormatClarity,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Category::RequiredSkills => "Required Skills",
            Category::Experience => "Experience",
            Category::Education => "Education",
            Category::PreferredSkills => "Preferred Skills",
            Category::KeywordDensity => "Keyword Density",
            Category::FormatClarity => "Format & Clarity",
        };
        write!(f, "{}", name)
    }
}

/// Aggregated match score. Computed once per request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub total_score: u32,
    pub label: ScoreLabel,
    pub breakdown: Vec<CategoryScoreResult>,
}

/// Fixed score-range buckets covering [0,100].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreLabel {
    ExcellentMatch,
    StrongMatch,
    GoodMatch,
    FairMatch,
    WeakMatch,
}

impl ScoreLabel {
    /// Bucket containing a total score. Bands: 85–100, 70–84, 55–69,
    /// 40–54, 0–39.
    pub fn for_score(score: u32) -> Self {
        match score {
            85..=u32::MAX => ScoreLabel::ExcellentMatch,
            70..=84 => ScoreLabel::StrongMatch,
            55..=69 => ScoreLabel::GoodMatch,
            40..=54 => ScoreLabel::FairMatch,
            _ => ScoreLabel::WeakMatch,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoreLabel::ExcellentMatch => "Excellent Match",
            ScoreLabel::StrongMatch => "Strong Match",
            ScoreLabel::GoodMatch => "Good Match",
            ScoreLabel::FairMatch => "Fair Match",
            ScoreLabel::WeakMatch => "Weak Match",
        }
    }
}

impl std::fmt::Display for ScoreLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Multi-factor confidence estimate for a reported score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceAssessment {
    pub overall_confidence: u32,
    pub band: u32,
    pub tier: ConfidenceBandTier,
    pub factors: ConfidenceFactors,
    /// Display range [score - band, score + band] clamped to [0,100].
    pub score_range: (u32, u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceBandTier {
    High,
    Medium,
    Low,
}

/// Per-factor sub-scores feeding the weighted confidence formula.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceFactors {
    pub jd_parsing_quality: f64,
    pub resume_parsing_quality: f64,
    pub skill_matching_quality: f64,
    pub data_completeness: f64,
    pub ai_reliability: f64,
}
