//! Prompt template for AI requirement extraction

/// Parameters for prompt template substitution
#[derive(Debug, Clone)]
pub struct PromptParams {
    pub job_content: String,
}

#[derive(Debug, Clone)]
pub struct PromptTemplates {
    pub requirement_extraction: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            requirement_extraction: REQUIREMENT_EXTRACTION_TEMPLATE.to_string(),
        }
    }
}

impl PromptTemplates {
    pub fn render_requirement_extraction(&self, params: &PromptParams) -> String {
        self.requirement_extraction
            .replace("{job}", &params.job_content)
    }
}

const REQUIREMENT_EXTRACTION_TEMPLATE: &str = r#"TASK: Extract the stated requirements from the job description below.

<JOB POSTING>
{job}
</JOB POSTING>

Respond with exactly one JSON object and nothing else, shaped:

{
  "requiredSkills": ["..."],
  "preferredSkills": ["..."],
  "requiredExperience": 0,
  "educationRequirement": "Bachelor's" | null,
  "responsibilities": ["..."],
  "keywords": ["..."]
}

Rules:
- Only include skills and requirements actually stated in the posting.
- requiredExperience is the minimum number of years as an integer, 0 if unstated.
- educationRequirement is one of "PhD", "Master's", "Bachelor's", "Associate's", "Diploma", or null.
- keywords are the terms a screening system should look for in a resume."#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_rendering() {
        let templates = PromptTemplates::default();
        let params = PromptParams {
            job_content: "Senior engineer role requiring React and Python.".to_string(),
        };

        let prompt = templates.render_requirement_extraction(&params);

        assert!(prompt.contains("Senior engineer role requiring React and Python."));
        assert!(prompt.contains("<JOB POSTING>"));
        assert!(prompt.contains("requiredSkills"));
        assert!(!prompt.contains("{job}"));
    }
}
