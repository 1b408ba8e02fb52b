//! Evidence-coverage assessment, multi-tier LLM adjudication, and
//! WhatsApp-ready rebuttal assembly for a single claim cluster.

mod adjudicator;
mod coverage;
mod orchestrator;
mod parser;
mod rebuttal;
mod types;

pub use adjudicator::{
    AdjudicationRequest, AdjudicatorError, AdjudicatorTier, ChatCompletionAdjudicator, LocalInferenceAdjudicator, ModelKind,
    RuleBasedAdjudicator,
};
pub use coverage::{assess_evidence_coverage, Coverage};
pub use orchestrator::VerificationOrchestrator;
pub use parser::{parse_response, ParsedFields};
pub use rebuttal::{extract_sources, generate_long_reply, generate_short_reply};
pub use types::VerdictResult;
