use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use spendcast_core::{CommitmentId, CurrencyCode, TenantId};
use spendcast_forecast::{Projection, Summary};

use crate::completion::{ChatMessage, CompletionClient, CompletionRequest};
use crate::job::AiJob;
use crate::result::{AiError, AiResult};

const SYSTEM_PROMPT: &str = "You are a cloud commitment advisor. Explain the forecast below to \
an executive in three short paragraphs: where consumption stands, whether the commitment will \
be met, and what to do next. Use only the figures provided.";

/// Job kind recorded in result metadata.
pub const NARRATIVE_JOB_KIND: &str = "commitment.summary_narrative";

pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 800;

/// Snapshot of a finished forecast, as handed to the narrative job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeInput {
    pub tenant_id: TenantId,
    pub commitment_id: CommitmentId,
    pub currency: CurrencyCode,
    pub summary: Summary,
    /// Recommendation titles in priority order.
    pub actions: Vec<String>,
}

impl NarrativeInput {
    pub fn from_projection(projection: &Projection) -> Self {
        let commitment = projection.commitment();
        Self {
            tenant_id: commitment.tenant_id(),
            commitment_id: commitment.id_typed(),
            currency: commitment.currency().clone(),
            summary: projection.summary().clone(),
            actions: projection
                .recommendations()
                .iter()
                .map(|r| r.title.clone())
                .collect(),
        }
    }
}

/// Build the completion request for a forecast snapshot.
pub fn narrative_request(input: &NarrativeInput, temperature: f32, max_tokens: u32) -> CompletionRequest {
    let s = &input.summary;
    let cur = &input.currency;
    let mut facts = format!(
        "Commitment: {total:.0} {cur}\n\
         Consumed to date: {consumed:.0} {cur} ({pct:.1}%)\n\
         Remaining: {remaining:.0} {cur}\n\
         Months elapsed / remaining: {elapsed} / {left}\n\
         Current monthly run rate: {rate:.0} {cur}\n\
         Projected end-of-term consumption: {end:.0} {cur}\n\
         Shortfall: {shortfall:.0} {cur}\n\
         Overage: {overage:.0} {cur}\n\
         Risk level: {risk:?}\n\
         On track: {on_track}\n",
        total = s.commitment_total,
        consumed = s.total_consumed,
        pct = s.percent_consumed,
        remaining = s.total_remaining,
        elapsed = s.months_elapsed,
        left = s.months_remaining,
        rate = s.current_run_rate,
        end = s.projected_end_of_term,
        shortfall = s.shortfall,
        overage = s.overage,
        risk = s.risk_level,
        on_track = s.on_track,
    );
    if !input.actions.is_empty() {
        facts.push_str("Recommended actions:\n");
        for action in &input.actions {
            facts.push_str("- ");
            facts.push_str(action);
            facts.push('\n');
        }
    }

    CompletionRequest {
        messages: vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(facts)],
        temperature,
        max_tokens,
    }
}

/// Turns a forecast summary into prose via a completion service.
pub struct SummaryNarrativeJob<C: CompletionClient> {
    tenant_id: TenantId,
    input: NarrativeInput,
    client: Arc<C>,
    temperature: f32,
    max_tokens: u32,
}

impl<C: CompletionClient> SummaryNarrativeJob<C> {
    pub fn new(tenant_id: TenantId, input: NarrativeInput, client: Arc<C>) -> Self {
        Self {
            tenant_id,
            input,
            client,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

impl<C: CompletionClient> AiJob for SummaryNarrativeJob<C> {
    fn kind(&self) -> &'static str {
        NARRATIVE_JOB_KIND
    }

    fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    fn run(&self) -> Result<AiResult, AiError> {
        if self.input.tenant_id != self.tenant_id {
            return Err(AiError::InvalidInput(
                "tenant_id mismatch between job and forecast snapshot".to_string(),
            ));
        }

        let request = narrative_request(&self.input, self.temperature, self.max_tokens);
        request.validate()?;

        let text = self.client.complete(&request)?;
        let text = text.trim();
        if text.is_empty() {
            return Err(AiError::InferenceFailed("completion returned no text".to_string()));
        }
        debug!(commitment = %self.input.commitment_id, chars = text.len(), "narrative generated");

        let s = &self.input.summary;
        Ok(AiResult::new(s.pace_ratio, 1.0)
            .with_explanation(text)
            .with_metadata(json!({
                "kind": NARRATIVE_JOB_KIND,
                "tenant_id": self.tenant_id.to_string(),
                "commitment_id": self.input.commitment_id.to_string(),
                "risk_level": s.risk_level,
                "shortfall": s.shortfall,
                "overage": s.overage,
                "temperature": self.temperature,
                "max_tokens": self.max_tokens,
            })))
    }
}
