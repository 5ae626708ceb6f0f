//! Requirement extraction orchestration: AI attempt, validation, fallback
//!
//! The coordinator owns the full reconciliation story: it asks the AI
//! collaborator for a structured extraction, gates it through the
//! validator, and always runs the deterministic fallback extractor to
//! supplement even a successful AI result. Whatever happens upstream,
//! this always produces a JobRequirements.

use crate::config::AiConfig;
use crate::error::{Result, ResumeScorerError};
use crate::extraction::faillog::FailureLog;
use crate::extraction::fallback::{FallbackExtraction, FallbackExtractor};
use crate::extraction::prompts::{PromptParams, PromptTemplates};
use crate::extraction::provider::{AiProvider, AiRequest};
use crate::extraction::reliability::{reliable_call, CallSource, ReliableCallConfig, ReliableOutcome};
use crate::extraction::validator::AiResponseValidator;
use crate::model::{ConfidenceTier, EducationLevel, JobRequirements, Provenance};
use log::{debug, info, warn};
use serde_json::{json, Value};
use std::path::PathBuf;

/// AI extraction response after type normalization: wrong-typed fields
/// collapse to their documented defaults instead of failing the request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AiExtraction {
    pub required_skills: Vec<String>,
    pub preferred_skills: Vec<String>,
    pub required_experience_years: u32,
    pub education_requirement: Option<EducationLevel>,
    pub responsibilities: Vec<String>,
    pub keywords: Vec<String>,
}

impl AiExtraction {
    /// Normalize a raw JSON object: non-arrays become empty lists,
    /// non-numbers become 0, unrecognized education strings become None.
    pub fn from_value(value: &Value) -> Self {
        Self {
            required_skills: string_array(value, "requiredSkills"),
            preferred_skills: string_array(value, "preferredSkills"),
            required_experience_years: value
                .get("requiredExperience")
                .and_then(Value::as_f64)
                .filter(|y| (0.0..=30.0).contains(y))
                .map(|y| y as u32)
                .unwrap_or(0),
            education_requirement: value
                .get("educationRequirement")
                .and_then(Value::as_str)
                .and_then(parse_education),
            responsibilities: string_array(value, "responsibilities"),
            keywords: string_array(value, "keywords"),
        }
    }

    /// AI output is considered high quality when it names required skills
    /// and at least one supporting field.
    pub fn is_high_quality(&self) -> bool {
        !self.required_skills.is_empty()
            && (!self.preferred_skills.is_empty()
                || !self.keywords.is_empty()
                || self.education_requirement.is_some())
    }
}

/// Orchestrates AI extraction plus deterministic fallback into one
/// JobRequirements per job description.
pub struct RequirementCoordinator<P: AiProvider> {
    provider: P,
    validator: AiResponseValidator,
    fallback: FallbackExtractor,
    prompts: PromptTemplates,
    ai_config: AiConfig,
    failure_log: FailureLog,
}

impl<P: AiProvider> RequirementCoordinator<P> {
    pub fn new(provider: P, ai_config: AiConfig, failure_log_dir: PathBuf) -> Result<Self> {
        Ok(Self {
            provider,
            validator: AiResponseValidator::new(),
            fallback: FallbackExtractor::new()?,
            prompts: PromptTemplates::default(),
            ai_config,
            failure_log: FailureLog::new(failure_log_dir),
        })
    }

    /// Extract requirements from job text. Never fails: with the fallback
    /// extractor always available, even total AI failure over empty text
    /// yields a valid (zeroed) requirement set.
    pub async fn extract(&self, job_text: &str) -> JobRequirements {
        let fallback_extraction = self.fallback.extract(job_text);

        let prompt = self.prompts.render_requirement_extraction(&PromptParams {
            job_content: job_text.to_string(),
        });
        let request = AiRequest {
            prompt,
            temperature: self.ai_config.temperature,
            max_output_tokens: self.ai_config.max_output_tokens,
        };
        let call_config = ReliableCallConfig {
            timeout: self.ai_config.timeout(),
            retries: self.ai_config.retries,
        };

        let outcome = match reliable_call(
            || async {
                let text = self.provider.complete(&request).await?;
                first_json_object(&text)
            },
            |value| self.validator.validate(value, job_text),
            Some(|| fallback_to_value(&fallback_extraction)),
            &call_config,
            &self.failure_log,
            "requirement extraction",
            job_text,
        )
        .await
        {
            Ok(outcome) => outcome,
            // Unreachable with a fallback configured, but stay total.
            Err(error) => {
                warn!("requirement extraction failed outright: {}", error);
                ReliableOutcome {
                    value: fallback_to_value(&fallback_extraction),
                    confidence: 0.3,
                    tier: ConfidenceTier::Poor,
                    source: CallSource::FallbackAfterExhaustion,
                }
            }
        };

        let used_ai = outcome.source == CallSource::Ai;
        let ai_extraction = AiExtraction::from_value(&outcome.value);

        if used_ai && !ai_extraction.is_high_quality() {
            debug!("AI extraction is low quality; fallback will supplement heavily");
        }

        let (requirements, fallback_contributed) =
            merge(ai_extraction, &fallback_extraction);

        let provenance = Provenance {
            used_ai,
            used_fallback: !used_ai || fallback_contributed,
            confidence_tier: outcome.tier,
        };

        info!(
            "extracted {} required / {} preferred skills ({} keywords), ai={} fallback={}",
            requirements.required_skills.len(),
            requirements.preferred_skills.len(),
            requirements.keywords.len(),
            provenance.used_ai,
            provenance.used_fallback,
        );

        JobRequirements {
            provenance,
            ..requirements
        }
    }
}

/// Merge AI and fallback extractions. Skills use AI-preferred merge (AI
/// order kept, fallback appended when new); keywords use a case-insensitive
/// union; scalar fields prefer truthy AI values; responsibilities come from
/// AI only. Returns whether the fallback contributed anything.
fn merge(ai: AiExtraction, fallback: &FallbackExtraction) -> (JobRequirements, bool) {
    let mut contributed = false;

    let (required_skills, added) = append_missing(ai.required_skills, &fallback.required_skills);
    contributed |= added;
    let (preferred_skills, added) = append_missing(ai.preferred_skills, &fallback.preferred_skills);
    contributed |= added;
    let (keywords, added) = append_missing(ai.keywords, &fallback.keywords);
    contributed |= added;

    let required_experience_years = if ai.required_experience_years > 0 {
        ai.required_experience_years
    } else {
        if fallback.experience_years > 0 {
            contributed = true;
        }
        fallback.experience_years
    };

    let education_requirement = match ai.education_requirement {
        Some(level) => Some(level),
        None => {
            if fallback.education.is_some() {
                contributed = true;
            }
            fallback.education
        }
    };

    let requirements = JobRequirements {
        required_skills,
        preferred_skills,
        required_experience_years,
        education_requirement,
        keywords,
        responsibilities: ai.responsibilities,
        provenance: Provenance {
            used_ai: false,
            used_fallback: false,
            confidence_tier: ConfidenceTier::Acceptable,
        },
    };
    (requirements, contributed)
}

/// Keep `base` order and append items from `extra` not already present
/// case-insensitively. Returns whether anything was appended.
fn append_missing(base: Vec<String>, extra: &[String]) -> (Vec<String>, bool) {
    let mut merged = base;
    let mut added = false;
    for item in extra {
        if !merged.iter().any(|existing| existing.eq_ignore_ascii_case(item)) {
            merged.push(item.clone());
            added = true;
        }
    }
    (merged, added)
}

/// Locate and parse the first balanced JSON object in free text.
pub fn first_json_object(text: &str) -> Result<Value> {
    let start = text.find('{').ok_or_else(|| {
        ResumeScorerError::AiMalformedResponse("no JSON object found".to_string())
    })?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (offset, c) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    let candidate = &text[start..start + offset + c.len_utf8()];
                    return serde_json::from_str(candidate).map_err(|e| {
                        ResumeScorerError::AiMalformedResponse(format!(
                            "object does not parse: {}",
                            e
                        ))
                    });
                }
            }
            _ => {}
        }
    }

    Err(ResumeScorerError::AiMalformedResponse(
        "unbalanced JSON object".to_string(),
    ))
}

fn fallback_to_value(extraction: &FallbackExtraction) -> Value {
    json!({
        "requiredSkills": extraction.required_skills,
        "preferredSkills": extraction.preferred_skills,
        "requiredExperience": extraction.experience_years,
        "educationRequirement": extraction.education.map(|e| e.label()),
        "responsibilities": [],
        "keywords": extraction.keywords,
    })
}

fn string_array(value: &Value, field: &str) -> Vec<String> {
    value
        .get(field)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

fn parse_education(name: &str) -> Option<EducationLevel> {
    let lower = name.to_lowercase();
    if lower.contains("phd") || lower.contains("doctor") {
        Some(EducationLevel::Phd)
    } else if lower.contains("master") {
        Some(EducationLevel::Masters)
    } else if lower.contains("bachelor") {
        Some(EducationLevel::Bachelors)
    } else if lower.contains("associate") {
        Some(EducationLevel::Associates)
    } else if lower.contains("diploma") {
        Some(EducationLevel::Diploma)
    } else {
        None
    }
}
