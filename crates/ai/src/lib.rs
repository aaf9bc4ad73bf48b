//! `spendcast-ai`
//!
//! **Responsibility:** text-generation boundary for forecast narratives.
//!
//! This crate never feeds numbers back into the forecast:
//! - It consumes a finished forecast `Summary`, read-only.
//! - Talking to an actual completion service is the caller's business, through
//!   the [`CompletionClient`] trait.
//! - It emits **AI results** (prose plus the figures it was given), nothing else.

pub mod completion;
pub mod job;
pub mod narrative;
pub mod result;
pub mod scheduler;

pub use completion::{ChatMessage, CompletionClient, CompletionRequest, Role, ScriptedCompletionClient};
pub use job::AiJob;
pub use narrative::{NarrativeInput, SummaryNarrativeJob, narrative_request};
pub use result::{AiError, AiResult};
pub use scheduler::{AiScheduler, LocalAiScheduler, TenantScope};
