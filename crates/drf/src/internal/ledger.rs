use crate::internal::common::Map;
use crate::internal::resources::{ResourceVector, dominant_ratio};
use crate::ApplicationId;
use serde::Serialize;
use std::time::Duration;

/// Summary of applications that already left the fairness system.
#[derive(Default, Debug, Clone, PartialEq, Serialize)]
pub struct CompletionStats {
    pub count: u64,
    pub total_duration: Duration,
    pub total_usage: ResourceVector,
}

/// Per-user bookkeeping of consumed resources.
#[derive(Debug)]
pub struct UserLedger {
    /// Position of the user in enrollment order, used to break share ties.
    enrollment: u64,
    running: Map<ApplicationId, ResourceVector>,
    running_total: ResourceVector,
    completed: CompletionStats,
}

impl UserLedger {
    pub(crate) fn new(enrollment: u64) -> Self {
        UserLedger {
            enrollment,
            running: Default::default(),
            running_total: ResourceVector::new(),
            completed: Default::default(),
        }
    }

    #[inline]
    pub fn enrollment(&self) -> u64 {
        self.enrollment
    }

    /// Starts accounting `ask` to this user.
    ///
    /// Repeated calls for the same application accumulate; all of it is released
    /// by a single [`UserLedger::complete_app`].
    pub fn run_app(&mut self, app_id: ApplicationId, ask: ResourceVector) {
        self.running_total = self.running_total.add(&ask);
        let consumption = self.running.entry(app_id).or_default();
        *consumption = consumption.add(&ask);
    }

    /// Stops accounting the application. Returns the released consumption,
    /// `None` for an unknown application.
    pub fn complete_app(&mut self, app_id: &ApplicationId) -> Option<ResourceVector> {
        let ask = self.running.remove(app_id)?;
        self.running_total = self.running_total.subtract(&ask);
        Some(ask)
    }

    /// Adds the final usage of a finished application to the completion summary.
    pub fn record_completion(&mut self, usage: &ResourceVector, duration: Duration) {
        self.completed.count += 1;
        self.completed.total_duration += duration;
        self.completed.total_usage = self.completed.total_usage.add(usage);
    }

    pub fn compute_dominant_share(&self, cluster_capacity: &ResourceVector) -> crate::Result<f64> {
        dominant_ratio(&self.running_total, cluster_capacity)
    }

    #[inline]
    pub fn running_total(&self) -> &ResourceVector {
        &self.running_total
    }

    #[inline]
    pub fn running_count(&self) -> usize {
        self.running.len()
    }

    #[inline]
    pub fn is_running(&self, app_id: &ApplicationId) -> bool {
        self.running.contains_key(app_id)
    }

    #[inline]
    pub fn completed(&self) -> &CompletionStats {
        &self.completed
    }
}
