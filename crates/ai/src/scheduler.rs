use std::time::Instant;

use tracing::{debug, warn};

use spendcast_core::{Entity, TenantId};

use crate::job::AiJob;
use crate::result::{AiError, AiResult};

/// Which tenants a scheduler accepts jobs for.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TenantScope {
    /// Shared worker.
    Any,
    /// Single-tenant worker; jobs for other tenants are refused.
    Tenant(TenantId),
}

impl TenantScope {
    pub fn allows(&self, tenant_id: TenantId) -> bool {
        match self {
            TenantScope::Any => true,
            TenantScope::Tenant(t) => *t == tenant_id,
        }
    }

    pub fn allows_entity<E: Entity>(&self, entity: &E) -> bool {
        match self {
            TenantScope::Any => true,
            TenantScope::Tenant(t) => entity.is_visible_to(*t),
        }
    }
}

/// Executor for AI jobs.
///
/// Refuses jobs outside its scope and logs every outcome; the error is still
/// returned so callers decide whether a failure matters.
pub trait AiScheduler: Send + Sync + 'static {
    fn scope(&self) -> TenantScope;

    fn run<J: AiJob>(&self, job: J) -> Result<AiResult, AiError> {
        let tenant_id = job.tenant_id();
        let kind = job.kind();
        if !self.scope().allows(tenant_id) {
            warn!(tenant = %tenant_id, kind, "refusing AI job outside scheduler tenant scope");
            return Err(AiError::InvalidInput(format!(
                "tenant {tenant_id} is outside the scheduler scope"
            )));
        }

        let started = Instant::now();
        let outcome = job.run();
        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &outcome {
            Ok(_) => debug!(tenant = %tenant_id, kind, elapsed_ms, "AI job finished"),
            Err(e) => warn!(tenant = %tenant_id, kind, elapsed_ms, error = %e, "AI job failed"),
        }
        outcome
    }
}

/// Runs jobs immediately on the calling thread.
#[derive(Debug, Copy, Clone)]
pub struct LocalAiScheduler {
    scope: TenantScope,
}

impl LocalAiScheduler {
    pub fn new(scope: TenantScope) -> Self {
        Self { scope }
    }

    pub fn for_tenant(tenant_id: TenantId) -> Self {
        Self::new(TenantScope::Tenant(tenant_id))
    }
}

impl AiScheduler for LocalAiScheduler {
    fn scope(&self) -> TenantScope {
        self.scope
    }
}
