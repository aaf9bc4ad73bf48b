//! Identity of tenant-owned domain objects.

use crate::id::TenantId;

/// A domain object that keeps its identity while its figures change, and
/// always belongs to exactly one tenant.
pub trait Entity {
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug + core::fmt::Display;

    fn id(&self) -> &Self::Id;

    fn owner(&self) -> TenantId;

    /// Whether `tenant_id` may see this entity.
    fn is_visible_to(&self, tenant_id: TenantId) -> bool {
        self.owner() == tenant_id
    }
}
