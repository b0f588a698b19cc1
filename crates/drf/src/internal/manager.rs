use crate::internal::application::{Application, Completion};
use crate::internal::common::{Map, Set};
use crate::internal::queue::ApplicationQueue;
use crate::internal::registry::TenantRegistry;
use crate::internal::resources::ResourceVector;
use crate::{ApplicationId, UserId};
use serde::Serialize;

/// Application offered for a scheduling attempt.
///
/// The application stays in its queue; it is offered again in later cycles until its
/// completion is acknowledged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub user: UserId,
    pub application_id: ApplicationId,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FairStats {
    /// Successful selections
    pub selections: u64,
    /// Selection cycles that found nothing to offer
    pub empty_selections: u64,
    /// Completed applications discarded from a queue head during selection
    pub stale_discarded: u64,
    /// Tombstones consumed by a queue sweep, a selection or a resubmission
    pub tombstones_cleared: u64,
    /// Completions dropped because their user has no queue
    pub unknown_completions: u64,
}

/// Orders applications of all users of one partition.
///
/// Users are ranked by dominant resource share, applications of a single user
/// by submission time. Completed applications are removed lazily: the completion
/// marks the application in the tombstone set and the queue of its user is swept.
///
/// One instance per partition; the instance is driven from a single scheduling loop.
#[derive(Default, Debug)]
pub struct FairManager {
    tenants: TenantRegistry,
    queues: Map<UserId, ApplicationQueue>,
    tombstones: Set<ApplicationId>,
    cluster_capacity: ResourceVector,
    stats: FairStats,
}

impl FairManager {
    pub fn new(cluster_capacity: ResourceVector) -> Self {
        FairManager {
            cluster_capacity,
            ..Default::default()
        }
    }

    #[inline]
    pub fn tenants(&self) -> &TenantRegistry {
        &self.tenants
    }

    #[inline]
    pub fn cluster_capacity(&self) -> &ResourceVector {
        &self.cluster_capacity
    }

    pub fn set_cluster_capacity(&mut self, cluster_capacity: ResourceVector) {
        log::debug!("Cluster capacity set to {cluster_capacity}");
        self.cluster_capacity = cluster_capacity;
    }

    #[inline]
    pub fn stats(&self) -> &FairStats {
        &self.stats
    }

    pub fn enroll_user(&mut self, user: &UserId) {
        self.tenants.add_user(user);
    }

    /// Pre-enrolls users declared by the partition configuration.
    pub fn enroll_partition_users<'a>(&mut self, users: impl IntoIterator<Item = &'a UserId>) {
        for user in users {
            self.tenants.add_user(user);
        }
    }

    /// Enrolls the owner of the application and puts the application into its queue.
    pub fn enroll_and_enqueue(&mut self, app: &Application) {
        self.tenants.add_user(&app.user);
        if self.tombstones.remove(&app.id) {
            log::debug!("Clearing stale tombstone of resubmitted application {}", app.id);
            self.stats.tombstones_cleared += 1;
        }
        let queue = self.queues.entry(app.user.clone()).or_default();
        if queue.push(app.id.clone(), app.submission_time) {
            log::debug!(
                "Application {} of user {} enqueued, pending={}",
                app.id,
                app.user,
                queue.len()
            );
        } else {
            log::warn!(
                "Application {} of user {} is already queued, ignoring",
                app.id,
                app.user
            );
        }
    }

    /// Returns `true` if any user has a pending application.
    pub fn has_schedulable_work(&self) -> bool {
        self.queues.values().any(|queue| !queue.is_empty())
    }

    /// Picks the application that should get the next scheduling attempt.
    ///
    /// The oldest application of the user with the smallest dominant share among users
    /// with pending applications. Returns `Ok(None)` when there is nothing to offer.
    pub fn select_next(&mut self) -> crate::Result<Option<Selection>> {
        let selection = trace_time!("fair", "select_next", self.select_next_helper())?;
        match &selection {
            Some(s) => {
                self.stats.selections += 1;
                log::debug!(
                    "Selected application {} of user {}",
                    s.application_id,
                    s.user
                );
            }
            None => self.stats.empty_selections += 1,
        }
        Ok(selection)
    }

    fn select_next_helper(&mut self) -> crate::Result<Option<Selection>> {
        let Some(user) = self
            .tenants
            .get_min_resource_user(&self.queues, &self.cluster_capacity)?
        else {
            return Ok(None);
        };
        let Some(queue) = self.queues.get_mut(&user) else {
            return Ok(None);
        };

        // A stale head is purged and the next entry is tried once, never more.
        let mut retried = false;
        while let Some(candidate) = queue.peek_and_rotate() {
            if !self.tombstones.remove(&candidate) {
                return Ok(Some(Selection {
                    user,
                    application_id: candidate,
                }));
            }
            log::debug!("Discarding completed application {candidate} of user {user}");
            let removed = queue.pop_for_removal();
            debug_assert_eq!(removed.map(|app| app.id).as_ref(), Some(&candidate));
            self.stats.stale_discarded += 1;
            self.stats.tombstones_cleared += 1;
            if retried {
                break;
            }
            retried = true;
        }
        Ok(None)
    }

    /// Reports a successful placement: the ask is accounted to the user.
    pub fn allocate(
        &mut self,
        user: &UserId,
        app_id: &ApplicationId,
        ask: ResourceVector,
    ) -> crate::Result<()> {
        self.tenants.allocate(user, app_id.clone(), ask)
    }

    /// Removes a finished application from the fairness system.
    ///
    /// The application is tombstoned, the queue of its user is swept and the user's
    /// consumption is released. A completion for a user without a queue is dropped.
    pub fn acknowledge_completion(&mut self, completion: &Completion) {
        let Some(queue) = self.queues.get_mut(&completion.user) else {
            log::warn!(
                "Completion of application {} for user {} that has no queue, dropping it",
                completion.application_id,
                completion.user
            );
            self.stats.unknown_completions += 1;
            return;
        };
        self.tombstones.insert(completion.application_id.clone());

        let mut retained = Vec::with_capacity(queue.len());
        while let Some(app) = queue.pop_for_removal() {
            if self.tombstones.remove(&app.id) {
                log::debug!("Purging application {} of user {}", app.id, completion.user);
                self.stats.tombstones_cleared += 1;
            } else {
                retained.push(app);
            }
        }
        for app in retained {
            queue.restore(app);
        }

        self.tenants
            .release(&completion.user, &completion.application_id);
        if let Some(ledger) = self.tenants.get_mut(&completion.user) {
            ledger.record_completion(&completion.usage, completion.duration);
        }
    }

    /// Current dominant share of every enrolled user, in enrollment order.
    pub fn dominant_shares(&self) -> crate::Result<Vec<(UserId, f64)>> {
        self.tenants
            .users()
            .into_iter()
            .map(|(user, ledger)| {
                Ok((
                    user.clone(),
                    ledger.compute_dominant_share(&self.cluster_capacity)?,
                ))
            })
            .collect()
    }

    /// Number of pending applications of the user.
    pub fn pending_count(&self, user: &UserId) -> usize {
        self.queues.get(user).map(|q| q.len()).unwrap_or(0)
    }

    #[inline]
    pub fn is_tombstoned(&self, app_id: &ApplicationId) -> bool {
        self.tombstones.contains(app_id)
    }

    #[inline]
    pub fn tombstone_count(&self) -> usize {
        self.tombstones.len()
    }
}
