//! Per-request scoring pipeline
//!
//! Wires requirement extraction, match scoring, confidence estimation, and
//! report assembly. Stateless across requests; the only suspension point is
//! the AI call inside the coordinator.

use crate::config::Config;
use crate::error::Result;
use crate::extraction::{AiProvider, RequirementCoordinator};
use crate::matching::confidence::ConfidenceEstimator;
use crate::matching::MatchingEngine;
use crate::model::ResumeProfile;
use crate::output::AlignmentReport;
use log::info;

pub struct ScoringPipeline<P: AiProvider> {
    coordinator: RequirementCoordinator<P>,
    engine: MatchingEngine,
    estimator: ConfidenceEstimator,
}

impl<P: AiProvider> ScoringPipeline<P> {
    pub fn new(provider: P, config: &Config) -> Result<Self> {
        config.scoring.weights.validate()?;
        Ok(Self {
            coordinator: RequirementCoordinator::new(
                provider,
                config.ai.clone(),
                config.failure_log.dir.clone(),
            )?,
            engine: MatchingEngine::new(config.scoring.weights),
            estimator: ConfidenceEstimator::new(),
        })
    }

    /// Score one resume against one job description. Same inputs always
    /// produce the same report apart from the generation timestamp.
    pub async fn score(&self, profile: &ResumeProfile, job_text: &str) -> Result<AlignmentReport> {
        let requirements = self.coordinator.extract(job_text).await;
        let outcome = self.engine.evaluate(&requirements, profile);
        let confidence = self.estimator.estimate(
            &requirements,
            profile,
            &outcome.skill_matches,
            outcome.result.total_score,
        );

        info!(
            "scored {}/100 ({}) with confidence {} ({:?})",
            outcome.result.total_score,
            outcome.result.label,
            confidence.overall_confidence,
            confidence.tier
        );

        Ok(AlignmentReport::assemble(
            outcome.result,
            confidence,
            &requirements,
            profile,
        ))
    }
}
