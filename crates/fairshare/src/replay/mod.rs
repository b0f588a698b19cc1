pub mod output;
pub mod trace;

use crate::config::PartitionConfig;
use crate::replay::trace::{Trace, TraceEvent};
use chrono::{DateTime, Utc};
use drf::resources::ResourceVector;
use drf::{
    Application, ApplicationId, Completion, FairManager, FairStats, Map, Selection, UserId,
};
use serde::Serialize;
use std::time::Duration;

/// Result of one `select` event.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CycleOutcome {
    pub cycle: usize,
    pub selection: Option<Selection>,
    /// Resources placed for the selected application in this cycle
    pub allocated: Option<ResourceVector>,
    pub error: Option<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct UserShare {
    pub user: UserId,
    /// `None` when the share cannot be computed against the final capacity
    pub dominant_share: Option<f64>,
    pub error: Option<String>,
    pub running: ResourceVector,
    pub pending: usize,
    pub completed: u64,
}

#[derive(Serialize, Debug)]
pub struct ReplayReport {
    pub partition: String,
    pub cycles: Vec<CycleOutcome>,
    pub shares: Vec<UserShare>,
    pub stats: FairStats,
}

/// Feeds a recorded event history through a [`FairManager`] of one partition.
pub struct Replay {
    partition: String,
    manager: FairManager,
    asks: Map<ApplicationId, ResourceVector>,
    cycles: Vec<CycleOutcome>,
}

fn logical_time(secs: i64) -> crate::Result<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| format!("Submission time {secs} is out of range").into())
}

impl Replay {
    pub fn new(partition: &PartitionConfig) -> Self {
        let mut manager = FairManager::new(partition.capacity.clone());
        let users = partition.users();
        log::info!(
            "Partition '{}': {} configured user(s), capacity {}",
            partition.name,
            users.len(),
            partition.capacity
        );
        manager.enroll_partition_users(&users);
        Replay {
            partition: partition.name.clone(),
            manager,
            asks: Default::default(),
            cycles: Vec::new(),
        }
    }

    #[inline]
    pub fn manager(&self) -> &FairManager {
        &self.manager
    }

    pub fn run(&mut self, trace: &Trace) -> crate::Result<()> {
        for event in &trace.events {
            self.apply(event)?;
        }
        Ok(())
    }

    /// Applies a single event. Errors reported by the fairness core are logged and
    /// the replay continues; only malformed events stop it.
    pub fn apply(&mut self, event: &TraceEvent) -> crate::Result<()> {
        match event {
            TraceEvent::Submit { id, user, time, ask } => {
                let app = Application::new(
                    id.as_str().into(),
                    user.as_str().into(),
                    logical_time(*time)?,
                    ask.clone(),
                );
                self.asks.insert(app.id.clone(), app.ask.clone());
                self.manager.enroll_and_enqueue(&app);
            }
            TraceEvent::Select { auto_allocate } => self.select(*auto_allocate),
            TraceEvent::Allocate {
                user,
                id,
                resources,
            } => {
                if let Err(e) =
                    self.manager
                        .allocate(&user.as_str().into(), &id.as_str().into(), resources.clone())
                {
                    log::warn!("Allocation of application {id} failed: {e}");
                }
            }
            TraceEvent::Complete {
                user,
                id,
                usage,
                duration,
            } => {
                let completion = Completion::new(id.as_str().into(), user.as_str().into())
                    .with_usage(usage.clone(), Duration::from_secs(*duration));
                self.manager.acknowledge_completion(&completion);
            }
            TraceEvent::Capacity { resources } => {
                self.manager.set_cluster_capacity(resources.clone());
            }
        }
        Ok(())
    }

    fn select(&mut self, auto_allocate: bool) {
        let cycle = self.cycles.len();
        let mut outcome = CycleOutcome {
            cycle,
            selection: None,
            allocated: None,
            error: None,
        };
        match self.manager.select_next() {
            Ok(Some(selection)) => {
                if auto_allocate {
                    match self.asks.get(&selection.application_id) {
                        Some(ask) => match self.manager.allocate(
                            &selection.user,
                            &selection.application_id,
                            ask.clone(),
                        ) {
                            Ok(()) => outcome.allocated = Some(ask.clone()),
                            Err(e) => outcome.error = Some(e.to_string()),
                        },
                        None => {
                            log::warn!(
                                "Cycle {cycle}: no ask recorded for application {}, nothing allocated",
                                selection.application_id
                            );
                            outcome.error = Some(format!(
                                "No ask recorded for application {}",
                                selection.application_id
                            ));
                        }
                    }
                }
                outcome.selection = Some(selection);
            }
            Ok(None) => log::debug!("Cycle {cycle}: nothing to schedule"),
            Err(e) => {
                log::warn!("Cycle {cycle}: selection failed: {e}");
                outcome.error = Some(e.to_string());
            }
        }
        self.cycles.push(outcome);
    }

    /// Builds the report. A share that cannot be computed against the final capacity
    /// is reported per user; the recorded cycles are always kept.
    pub fn finish(self) -> ReplayReport {
        let tenants = self.manager.tenants();
        let shares = tenants
            .users()
            .into_iter()
            .map(|(user, ledger)| {
                let (dominant_share, error) =
                    match ledger.compute_dominant_share(self.manager.cluster_capacity()) {
                        Ok(share) => (Some(share), None),
                        Err(e) => {
                            log::warn!("Cannot compute dominant share of user {user}: {e}");
                            (None, Some(e.to_string()))
                        }
                    };
                UserShare {
                    user: user.clone(),
                    dominant_share,
                    error,
                    running: ledger.running_total().clone(),
                    pending: self.manager.pending_count(user),
                    completed: ledger.completed().count,
                }
            })
            .collect();
        ReplayReport {
            partition: self.partition,
            cycles: self.cycles,
            shares,
            stats: self.manager.stats().clone(),
        }
    }
}
