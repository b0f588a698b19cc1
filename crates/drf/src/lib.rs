//! Dominant resource fairness ordering for multi-tenant cluster scheduling.
//!
//! [`FairManager`] decides which user's application gets the next scheduling
//! attempt. Users are ranked by their dominant share of the cluster capacity,
//! applications of one user are offered in submission order.

#[macro_use]
pub(crate) mod internal;

pub use crate::internal::application::{Application, Completion};
pub use crate::internal::common::ids::{ApplicationId, UserId};
pub use crate::internal::common::{Map, Set};
pub use crate::internal::ledger::{CompletionStats, UserLedger};
pub use crate::internal::manager::{FairManager, FairStats, Selection};
pub use crate::internal::priority::{Share, UserPriorityIndex};
pub use crate::internal::queue::{ApplicationQueue, QueueKey, QueuedApp};
pub use crate::internal::registry::TenantRegistry;

pub type Error = internal::common::error::DrfError;
pub type Result<T> = std::result::Result<T, Error>;

pub mod resources {
    pub use crate::internal::resources::{
        CPU_RESOURCE_NAME, MEM_RESOURCE_NAME, Quantity, ResourceVector, dominant_ratio,
    };
}
