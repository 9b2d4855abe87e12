//! Audit envelope wrapped around every summary the binary emits.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Section, StrategyUsed, SummaryResult, SummaryStrategy, Warning};
use crate::reference::RULE_ENGINE_VERSION;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryBody {
    pub sections: Vec<Section>,
    pub full_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryMetadata {
    pub request_id: Uuid,
    pub strategy_used: StrategyUsed,
    pub strategy_requested: Option<SummaryStrategy>,
    pub rule_engine_version: String,
    pub processed_at: DateTime<Utc>,
    pub processing_time_ms: u64,
    pub llm_model: Option<String>,
    pub fallback_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryEnvelope {
    pub summary: SummaryBody,
    pub warnings: Vec<Warning>,
    pub metadata: SummaryMetadata,
}

/// Identity of one request, taken before any work starts.
#[derive(Debug, Clone, Copy)]
pub struct RequestStamp {
    pub request_id: Uuid,
    pub processed_at: DateTime<Utc>,
}

impl RequestStamp {
    pub fn start() -> Self {
        Self {
            request_id: Uuid::new_v4(),
            processed_at: Utc::now(),
        }
    }
}

/// What the engine learned while producing a result.
#[derive(Debug, Clone, Default)]
pub struct RunDetails {
    pub strategy_requested: Option<SummaryStrategy>,
    pub elapsed: Duration,
    pub llm_model: Option<String>,
    pub fallback_reason: Option<String>,
}

impl SummaryEnvelope {
    pub fn new(result: SummaryResult, stamp: RequestStamp, details: RunDetails) -> Self {
        let metadata = SummaryMetadata {
            request_id: stamp.request_id,
            strategy_used: result.strategy_used,
            strategy_requested: details.strategy_requested,
            rule_engine_version: RULE_ENGINE_VERSION.to_string(),
            processed_at: stamp.processed_at,
            processing_time_ms: u64::try_from(details.elapsed.as_millis()).unwrap_or(u64::MAX),
            llm_model: details.llm_model,
            fallback_reason: details.fallback_reason,
        };
        Self {
            summary: SummaryBody {
                sections: result.sections,
                full_text: result.full_text,
            },
            warnings: result.warnings,
            metadata,
        }
    }
}
