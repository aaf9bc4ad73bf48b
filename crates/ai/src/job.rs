use spendcast_core::TenantId;

use crate::result::{AiError, AiResult};

/// A tenant-scoped unit of text generation over a finished forecast.
///
/// Inputs are snapshots handed over by the caller; jobs never reach back into
/// the forecast engine.
pub trait AiJob: Send + Sync + 'static {
    /// Stable job identifier, also written into result metadata.
    fn kind(&self) -> &'static str;

    fn tenant_id(&self) -> TenantId;

    fn run(&self) -> Result<AiResult, AiError>;
}
