//! Alignment report assembly and rendering
//!
//! Combines the match result and confidence assessment into one report with
//! per-category explanations and improvement insights. Insight generation is
//! auxiliary: if it fails the report ships without insights and the failure
//! is only logged.

use crate::error::{Result, ResumeScorerError};
use crate::model::{
    Category, ConfidenceAssessment, ConfidenceBandTier, JobRequirements, MatchResult, Provenance,
    ResumeProfile, ScoreLabel,
};
use colored::{Color, Colorize};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Full analysis payload for one resume/job pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlignmentReport {
    pub generated_at: String,
    pub match_result: MatchResult,
    pub confidence: ConfidenceAssessment,
    pub requirement_provenance: Provenance,
    pub insights: Vec<String>,
}

impl AlignmentReport {
    pub fn assemble(
        match_result: MatchResult,
        confidence: ConfidenceAssessment,
        requirements: &JobRequirements,
        profile: &ResumeProfile,
    ) -> Self {
        let insights = match generate_insights(&match_result, requirements, profile) {
            Ok(insights) => insights,
            Err(e) => {
                warn!("insight generation failed, reporting without insights: {}", e);
                Vec::new()
            }
        };

        Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            match_result,
            confidence,
            requirement_provenance: requirements.provenance.clone(),
            insights,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(ResumeScorerError::from)
    }
}

/// Suggestions derived from the weakest categories. Auxiliary by design.
fn generate_insights(
    result: &MatchResult,
    requirements: &JobRequirements,
    profile: &ResumeProfile,
) -> Result<Vec<String>> {
    let mut insights = Vec::new();

    for category in &result.breakdown {
        if category.missing.is_empty() {
            continue;
        }
        let mut line = String::new();
        match category.category {
            Category::RequiredSkills => {
                write!(line, "Add evidence of required skills: {}", category.missing.join(", "))
            }
            Category::PreferredSkills => {
                write!(line, "Preferred skills worth adding: {}", category.missing.join(", "))
            }
            Category::KeywordDensity => write!(
                line,
                "Work these terms into accomplishment bullets: {}",
                category.missing.join(", ")
            ),
            _ => continue,
        }
        .map_err(|e| ResumeScorerError::Computation(format!("insight formatting: {}", e)))?;
        insights.push(line);
    }

    if requirements.required_experience_years > profile.total_years_experience {
        insights.push(format!(
            "The role asks for {} years of experience; the resume shows {}. \
             Make tenure explicit if more applies.",
            requirements.required_experience_years, profile.total_years_experience
        ));
    }

    if profile.parse_quality <= 2 {
        insights.push(
            "The resume structure is hard to parse. Use clear section headers \
             (Skills, Experience, Education) and one role per line."
                .to_string(),
        );
    }

    Ok(insights)
}

/// Console renderer in the style of the rest of the CLI output.
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn score_color(label: ScoreLabel) -> Color {
        match label {
            ScoreLabel::ExcellentMatch => Color::Green,
            ScoreLabel::StrongMatch => Color::BrightGreen,
            ScoreLabel::GoodMatch => Color::Yellow,
            ScoreLabel::FairMatch => Color::BrightYellow,
            ScoreLabel::WeakMatch => Color::Red,
        }
    }

    pub fn format_report(&self, report: &AlignmentReport) -> String {
        let mut output = String::new();
        let result = &report.match_result;

        output.push_str(&format!(
            "\n{}\n",
            self.colorize("RESUME MATCH REPORT", Color::Blue)
        ));
        output.push_str(&format!(
            "Overall: {}/100 [{}]\n",
            result.total_score,
            self.colorize(result.label.label(), Self::score_color(result.label))
        ));

        let confidence = &report.confidence;
        let band_name = match confidence.tier {
            ConfidenceBandTier::High => "HIGH",
            ConfidenceBandTier::Medium => "MEDIUM",
            ConfidenceBandTier::Low => "LOW",
        };
        output.push_str(&format!(
            "Confidence: {}/100 ({}) | Likely range: {}-{}\n",
            confidence.overall_confidence,
            band_name,
            confidence.score_range.0,
            confidence.score_range.1
        ));

        output.push_str("\nBreakdown:\n");
        for category in &result.breakdown {
            output.push_str(&format!(
                "  {:<18} {:>6.2} / {:<5.1} {}\n",
                category.category.to_string(),
                category.points_earned,
                category.max_points,
                category.verdict
            ));
            if self.detailed {
                if !category.matched.is_empty() {
                    output.push_str(&format!(
                        "    {} {}\n",
                        self.colorize("matched:", Color::Green),
                        category.matched.join(", ")
                    ));
                }
                if !category.missing.is_empty() {
                    output.push_str(&format!(
                        "    {} {}\n",
                        self.colorize("missing:", Color::Red),
                        category.missing.join(", ")
                    ));
                }
            }
        }

        if !report.insights.is_empty() {
            output.push_str("\nSuggestions:\n");
            for insight in &report.insights {
                output.push_str(&format!("  - {}\n", insight));
            }
        }

        let provenance = &report.requirement_provenance;
        if provenance.used_fallback {
            let note = if provenance.used_ai {
                "Requirements were AI-extracted and supplemented by rule-based extraction."
            } else {
                "Requirements came from rule-based extraction only; AI was unavailable or rejected."
            };
            output.push_str(&format!("\n{}\n", self.colorize(note, Color::Cyan)));
        }

        output
    }
}
