use crate::internal::resources::ResourceVector;
use crate::{ApplicationId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Application submitted to the cluster, as seen by the fairness ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub user: UserId,
    pub submission_time: DateTime<Utc>,
    /// Requested resources; consulted by the allocator, not by the ordering.
    pub ask: ResourceVector,
}

impl Application {
    pub fn new(
        id: ApplicationId,
        user: UserId,
        submission_time: DateTime<Utc>,
        ask: ResourceVector,
    ) -> Self {
        Application {
            id,
            user,
            submission_time,
            ask,
        }
    }
}

/// Notice that an application left the cluster (finished or otherwise terminated).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    pub application_id: ApplicationId,
    pub user: UserId,
    /// Final resource usage reported by the allocator.
    #[serde(default)]
    pub usage: ResourceVector,
    #[serde(default)]
    pub duration: Duration,
}

impl Completion {
    pub fn new(application_id: ApplicationId, user: UserId) -> Self {
        Completion {
            application_id,
            user,
            usage: ResourceVector::new(),
            duration: Duration::ZERO,
        }
    }

    pub fn with_usage(mut self, usage: ResourceVector, duration: Duration) -> Self {
        self.usage = usage;
        self.duration = duration;
        self
    }
}

impl From<&Application> for Completion {
    fn from(app: &Application) -> Self {
        Completion::new(app.id.clone(), app.user.clone())
    }
}
