//! Schema and hallucination validation for AI extraction responses
//!
//! The AI collaborator may return garbage: missing fields, wrong types, or
//! skills invented out of thin air. Validation starts from full confidence
//! and deducts per defect; below 0.5 the response is rejected in favor of
//! the deterministic fallback.

use crate::model::ConfidenceTier;
use serde_json::Value;

/// Fields a well-formed extraction response must carry.
const REQUIRED_FIELDS: &[&str] = &[
    "requiredSkills",
    "preferredSkills",
    "requiredExperience",
    "educationRequirement",
    "keywords",
];

/// Flagged-skill share above which hallucination deductions apply.
const HALLUCINATION_THRESHOLD: f64 = 0.30;

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub confidence: f64,
    pub issues: Vec<String>,
    pub should_use_fallback: bool,
    pub tier: ConfidenceTier,
}

pub struct AiResponseValidator;

impl Default for AiResponseValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl AiResponseValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(&self, response: &Value, original_text: &str) -> ValidationReport {
        let mut confidence = 1.0_f64;
        let mut issues = Vec::new();

        for field in REQUIRED_FIELDS {
            if response.get(field).is_none() {
                confidence -= 0.2;
                issues.push(format!("missing field '{}'", field));
            }
        }

        match response.get("requiredSkills") {
            Some(Value::Array(skills)) => {
                if skills.is_empty() {
                    confidence -= 0.2;
                    issues.push("requiredSkills is empty".to_string());
                }
            }
            Some(_) => {
                confidence -= 0.3;
                issues.push("requiredSkills is not an array".to_string());
            }
            None => {}
        }

        if let Some(preferred) = response.get("preferredSkills") {
            if !preferred.is_array() {
                confidence -= 0.2;
                issues.push("preferredSkills is not an array".to_string());
            }
        }

        match response.get("requiredExperience") {
            Some(Value::Number(years)) => {
                let value = years.as_f64().unwrap_or(-1.0);
                if !(0.0..=30.0).contains(&value) {
                    confidence -= 0.3;
                    issues.push(format!("requiredExperience {} outside [0,30]", value));
                }
            }
            Some(_) => {
                confidence -= 0.2;
                issues.push("requiredExperience is not a number".to_string());
            }
            None => {}
        }

        match response.get("keywords") {
            Some(Value::Array(keywords)) => {
                if keywords.is_empty() {
                    confidence -= 0.1;
                    issues.push("keywords is empty".to_string());
                }
            }
            Some(_) => {
                confidence -= 0.1;
                issues.push("keywords is not an array".to_string());
            }
            None => {}
        }

        // Hallucination check: required skills the source text never
        // mentions verbatim.
        if let Some(Value::Array(skills)) = response.get("requiredSkills") {
            let names: Vec<&str> = skills.iter().filter_map(|s| s.as_str()).collect();
            if !names.is_empty() {
                let source = original_text.to_lowercase();
                let flagged: Vec<&&str> = names
                    .iter()
                    .filter(|name| !source.contains(&name.to_lowercase()))
                    .collect();
                let flagged_share = flagged.len() as f64 / names.len() as f64;
                if flagged_share > HALLUCINATION_THRESHOLD {
                    confidence -= 0.1 * flagged.len() as f64;
                    issues.push(format!(
                        "{} of {} required skills not found in the source text",
                        flagged.len(),
                        names.len()
                    ));
                }
            }
        }

        let total_items = array_len(response, "requiredSkills")
            + array_len(response, "preferredSkills")
            + array_len(response, "keywords");
        if total_items < 3 {
            confidence -= 0.2;
            issues.push(format!("only {} items extracted in total", total_items));
        }

        let confidence = confidence.max(0.0);
        ValidationReport {
            is_valid: confidence >= 0.5,
            confidence,
            issues,
            should_use_fallback: confidence < 0.5,
            tier: tier_for(confidence),
        }
    }
}

pub fn tier_for(confidence: f64) -> ConfidenceTier {
    if confidence >= 0.9 {
        ConfidenceTier::Excellent
    } else if confidence >= 0.7 {
        ConfidenceTier::Good
    } else if confidence >= 0.5 {
        ConfidenceTier::Acceptable
    } else if confidence >= 0.3 {
        ConfidenceTier::Poor
    } else {
        ConfidenceTier::Unreliable
    }
}

fn array_len(response: &Value, field: &str) -> usize {
    response
        .get(field)
        .and_then(Value::as_array)
        .map(Vec::len)
        .unwrap_or(0)
}
