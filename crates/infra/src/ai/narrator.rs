use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use spendcast_ai::{
    AiResult, AiScheduler, CompletionClient, LocalAiScheduler, NarrativeInput, SummaryNarrativeJob,
    TenantScope,
};
use spendcast_core::TenantId;
use spendcast_forecast::Projection;

/// Destination for generated narratives.
pub trait NarrativeSink: Send + Sync + 'static {
    fn emit(&self, tenant_id: TenantId, result: AiResult);
}

/// In-memory sink for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryNarrativeSink {
    inner: Mutex<Vec<(TenantId, AiResult)>>,
}

impl InMemoryNarrativeSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<(TenantId, AiResult)> {
        self.inner.lock().map(|v| v.clone()).unwrap_or_default()
    }
}

impl NarrativeSink for InMemoryNarrativeSink {
    fn emit(&self, tenant_id: TenantId, result: AiResult) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.push((tenant_id, result));
        }
    }
}

/// Generates a prose narrative for each finished projection.
///
/// Projections whose commitment falls outside `scope` are skipped.
#[derive(Debug, Clone)]
pub struct Narrator<C, S> {
    client: Arc<C>,
    sink: Arc<S>,
    scope: TenantScope,
    temperature: f32,
    max_tokens: u32,
}

impl<C, S> Narrator<C, S>
where
    C: CompletionClient,
    S: NarrativeSink,
{
    pub fn new(client: Arc<C>, sink: Arc<S>) -> Self {
        Self {
            client,
            sink,
            scope: TenantScope::Any,
            temperature: spendcast_ai::narrative::DEFAULT_TEMPERATURE,
            max_tokens: spendcast_ai::narrative::DEFAULT_MAX_TOKENS,
        }
    }

    /// Restrict narration to one tenant's commitments.
    pub fn with_scope(mut self, scope: TenantScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Narrate `projection`; returns whether a narrative reached the sink.
    ///
    /// Errors are logged, never propagated.
    pub fn narrate(&self, projection: &Projection) -> bool {
        let commitment = projection.commitment();
        let tenant_id = commitment.tenant_id();
        if !self.scope.allows_entity(commitment) {
            warn!(tenant = %tenant_id, commitment = %commitment.id_typed(), "skipping narrative outside narrator scope");
            return false;
        }
        let job = SummaryNarrativeJob::new(
            tenant_id,
            NarrativeInput::from_projection(projection),
            self.client.clone(),
        )
        .with_temperature(self.temperature)
        .with_max_tokens(self.max_tokens);

        match LocalAiScheduler::new(self.scope).run(job) {
            Ok(result) => {
                info!(tenant = %tenant_id, commitment = %commitment.id_typed(), "narrative ready");
                self.sink.emit(tenant_id, result);
                true
            }
            Err(e) => {
                warn!(tenant = %tenant_id, error = ?e, "narrative generation failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use spendcast_ai::ScriptedCompletionClient;
    use spendcast_core::CurrencyCode;
    use spendcast_forecast::{Commitment, ProjectionRequest, project};

    fn projection() -> Projection {
        let commitment = Commitment::new(
            TenantId::new(),
            500_000.0,
            12,
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            CurrencyCode::new("USD").unwrap(),
        )
        .unwrap();
        project(&ProjectionRequest {
            commitment,
            as_of: NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
            current_run_rate: 30_000.0,
            annual_growth_percent: 5.0,
            planned_workloads: Vec::new(),
            variance: None,
        })
        .unwrap()
    }

    #[test]
    fn successful_narrative_reaches_sink() {
        let sink = Arc::new(InMemoryNarrativeSink::new());
        let narrator = Narrator::new(Arc::new(ScriptedCompletionClient::new(["On pace."])), sink.clone());
        let p = projection();

        assert!(narrator.narrate(&p));
        let all = sink.all();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].0, p.commitment().tenant_id());
        assert_eq!(all[0].1.explanation.as_deref(), Some("On pace."));
    }

    #[test]
    fn completion_failure_is_isolated() {
        let sink = Arc::new(InMemoryNarrativeSink::new());
        let client = Arc::new(ScriptedCompletionClient::new(Vec::<String>::new()));
        let narrator = Narrator::new(client, sink.clone());

        assert!(!narrator.narrate(&projection()));
        assert!(sink.all().is_empty());
    }

    #[test]
    fn foreign_tenant_projection_is_skipped() {
        let sink = Arc::new(InMemoryNarrativeSink::new());
        let client = Arc::new(ScriptedCompletionClient::new(["unused"]));
        let narrator = Narrator::new(client.clone(), sink.clone())
            .with_scope(TenantScope::Tenant(TenantId::new()));

        assert!(!narrator.narrate(&projection()));
        assert!(sink.all().is_empty());
        assert!(client.requests().is_empty());
    }

    #[test]
    fn own_tenant_projection_is_narrated() {
        let p = projection();
        let sink = Arc::new(InMemoryNarrativeSink::new());
        let narrator = Narrator::new(Arc::new(ScriptedCompletionClient::new(["ok"])), sink.clone())
            .with_scope(TenantScope::Tenant(p.commitment().tenant_id()));

        assert!(narrator.narrate(&p));
        assert_eq!(sink.all().len(), 1);
    }
}
