//! Integration tests for the resume scorer

use resume_scorer::config::Config;
use resume_scorer::error::Result;
use resume_scorer::extraction::{AiProvider, AiRequest, NullAiProvider};
use resume_scorer::input::ProfileBuilder;
use resume_scorer::model::{
    Category, ConfidenceBandTier, ConfidenceTier, ScoreLabel,
};
use resume_scorer::output::AlignmentReport;
use resume_scorer::pipeline::ScoringPipeline;

fn fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

fn test_config(dir: &tempfile::TempDir) -> Config {
    let mut config = Config::default();
    config.failure_log.dir = dir.path().to_path_buf();
    config.ai.timeout_secs = 1;
    config.ai.retries = 0;
    config
}

async fn score_fixtures<P: AiProvider>(provider: P, dir: &tempfile::TempDir) -> AlignmentReport {
    let resume_text = fixture("sample_resume.txt");
    let job_text = fixture("sample_job.txt");

    let profile = ProfileBuilder::new().unwrap().build(&resume_text);
    let pipeline = ScoringPipeline::new(provider, &test_config(dir)).unwrap();
    pipeline.score(&profile, &job_text).await.unwrap()
}

fn category_points(report: &AlignmentReport, category: Category) -> f64 {
    report
        .match_result
        .breakdown
        .iter()
        .find(|c| c.category == category)
        .map(|c| c.points_earned)
        .unwrap()
}

#[tokio::test]
async fn test_fallback_pipeline_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let report = score_fixtures(NullAiProvider, &dir).await;

    // No AI backend: everything comes from rule-based extraction.
    assert!(!report.requirement_provenance.used_ai);
    assert!(report.requirement_provenance.used_fallback);
    assert_eq!(report.requirement_provenance.confidence_tier, ConfidenceTier::Poor);

    assert_eq!(report.match_result.breakdown.len(), 6);

    // The resume covers all three required skills exactly.
    assert_eq!(category_points(&report, Category::RequiredSkills), 30.0);
    // 6 years against a 5-year requirement is a full match.
    assert_eq!(category_points(&report, Category::Experience), 20.0);
    // Bachelor's requirement met exactly.
    assert_eq!(category_points(&report, Category::Education), 15.0);
    // Docker matches; Kubernetes is only adjacent to Docker, below the
    // preferred-match threshold.
    assert_eq!(category_points(&report, Category::PreferredSkills), 2.0);
    // Clean resume structure passes through.
    assert_eq!(category_points(&report, Category::FormatClarity), 5.0);

    let total = report.match_result.total_score;
    assert!((72..=92).contains(&total), "unexpected total {}", total);
    assert_eq!(report.match_result.label, ScoreLabel::for_score(total));

    // Fallback-only JD parsing plus a perfect resume parse and exact skill
    // coverage lands at 84 with a MEDIUM band.
    assert_eq!(report.confidence.overall_confidence, 84);
    assert_eq!(report.confidence.tier, ConfidenceBandTier::Medium);
    assert_eq!(report.confidence.band, 5);
}

#[tokio::test]
async fn test_same_inputs_produce_identical_reports() {
    let dir = tempfile::tempdir().unwrap();
    let first = score_fixtures(NullAiProvider, &dir).await;
    let second = score_fixtures(NullAiProvider, &dir).await;

    assert_eq!(first.match_result, second.match_result);
    assert_eq!(first.confidence, second.confidence);
    assert_eq!(first.insights, second.insights);
}

/// Provider returning a canned extraction wrapped in chatter, the way real
/// completions arrive.
struct ScriptedProvider;

impl AiProvider for ScriptedProvider {
    async fn complete(&self, _request: &AiRequest) -> Result<String> {
        Ok(r#"Here is the extraction you asked for:
{
    "requiredSkills": ["React", "Rust"],
    "preferredSkills": ["GraphQL"],
    "requiredExperience": 4,
    "educationRequirement": "Master's",
    "responsibilities": ["Build and operate web services"],
    "keywords": ["react", "rust", "graphql"]
}
Let me know if you need anything else."#
            .to_string())
    }
}

#[tokio::test]
async fn test_ai_extraction_drives_requirements() {
    let dir = tempfile::tempdir().unwrap();
    let report = score_fixtures(ScriptedProvider, &dir).await;

    assert!(report.requirement_provenance.used_ai);
    // The fallback still supplements skills found in the job text.
    assert!(report.requirement_provenance.used_fallback);
    // One of two required skills is absent from the job text, which costs
    // one hallucination deduction and nothing more.
    assert_eq!(
        report.requirement_provenance.confidence_tier,
        ConfidenceTier::Excellent
    );

    let required = report
        .match_result
        .breakdown
        .iter()
        .find(|c| c.category == Category::RequiredSkills)
        .unwrap();
    assert!(required.missing.iter().any(|s| s == "Rust"));
    assert!(required.points_earned < required.max_points);
}

#[tokio::test]
async fn test_empty_job_text_scores_conservatively() {
    let dir = tempfile::tempdir().unwrap();
    let resume_text = fixture("sample_resume.txt");

    let profile = ProfileBuilder::new().unwrap().build(&resume_text);
    let pipeline = ScoringPipeline::new(NullAiProvider, &test_config(&dir)).unwrap();
    let report = pipeline.score(&profile, "").await.unwrap();

    // No requirements extracted anywhere: required skills earn nothing,
    // tenure and education fall back to their no-requirement tiers.
    assert_eq!(category_points(&report, Category::RequiredSkills), 0.0);
    assert_eq!(category_points(&report, Category::Experience), 16.0);
    assert_eq!(category_points(&report, Category::Education), 9.0);
    assert_eq!(category_points(&report, Category::KeywordDensity), 0.0);
    assert_eq!(report.match_result.total_score, 30);
    assert_eq!(report.match_result.label, ScoreLabel::WeakMatch);
}

#[tokio::test]
async fn test_json_payload_is_complete() {
    let dir = tempfile::tempdir().unwrap();
    let report = score_fixtures(NullAiProvider, &dir).await;

    let json = report.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert!(value["match_result"]["total_score"].is_u64());
    assert_eq!(value["match_result"]["breakdown"].as_array().unwrap().len(), 6);
    assert!(value["confidence"]["overall_confidence"].is_u64());
    assert!(value["requirement_provenance"]["used_fallback"].as_bool().unwrap());
}

#[tokio::test]
async fn test_ai_failures_append_to_failure_log() {
    let dir = tempfile::tempdir().unwrap();
    let _ = score_fixtures(NullAiProvider, &dir).await;

    let filename = format!("ai-failures-{}.jsonl", chrono::Utc::now().format("%Y-%m-%d"));
    let content = std::fs::read_to_string(dir.path().join(filename)).unwrap();
    assert!(content.lines().count() >= 1);
    assert!(content.contains("ai_transport"));
}
