//! Deterministic credit assessment: a pluggable strategy seam with the
//! rubric-driven engine as the default implementation. Real bureau or
//! underwriting integrations substitute through `DecisionStrategy` without
//! touching the approval workflow.

mod config;
mod policy;
mod rules;

pub use config::AssessmentConfig;
pub use policy::{CreditDecision, DeclineReason};

use policy::decide_outcome;
use serde::{Deserialize, Serialize};

use crate::workflows::credit::intake::ApplicationProfile;

/// Strategy seam for credit decisions.
pub trait DecisionStrategy: Send + Sync {
    fn assess(&self, profile: &ApplicationProfile) -> AssessmentOutcome;
}

/// Stateless evaluator that applies the rubric configuration to a profile.
pub struct AssessmentEngine {
    config: AssessmentConfig,
}

impl AssessmentEngine {
    pub fn new(config: AssessmentConfig) -> Self {
        Self { config }
    }

    pub fn score(&self, profile: &ApplicationProfile) -> AssessmentOutcome {
        let (components, total_score, signals) = rules::score_profile(profile, &self.config);
        let decision = decide_outcome(profile, &self.config, &signals);

        AssessmentOutcome {
            decision,
            total_score,
            components,
        }
    }
}

impl DecisionStrategy for AssessmentEngine {
    fn assess(&self, profile: &ApplicationProfile) -> AssessmentOutcome {
        self.score(profile)
    }
}

/// Factors permitted in the assessment rubric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentFactor {
    DebtServiceCover,
    PrincipalToRevenue,
    TradingHistory,
    GreenPortfolio,
}

/// Discrete contribution to an assessment, allowing transparent audits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub factor: AssessmentFactor,
    pub score: i16,
    pub notes: String,
}

/// Assessment output describing the composite score and decision trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentOutcome {
    pub decision: CreditDecision,
    pub total_score: i16,
    pub components: Vec<ScoreComponent>,
}
