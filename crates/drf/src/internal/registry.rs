use crate::internal::common::Map;
use crate::internal::common::error::DrfError;
use crate::internal::ledger::UserLedger;
use crate::internal::priority::UserPriorityIndex;
use crate::internal::queue::ApplicationQueue;
use crate::internal::resources::ResourceVector;
use crate::{ApplicationId, UserId};

/// Owns the ledgers of all enrolled users and ranks them by dominant share.
#[derive(Default, Debug)]
pub struct TenantRegistry {
    users: Map<UserId, UserLedger>,
    priority: UserPriorityIndex,
    enrollment_counter: u64,
}

impl TenantRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enrolls the user; enrolling an already known user changes nothing.
    /// Returns `true` if the user was newly enrolled.
    pub fn add_user(&mut self, name: &UserId) -> bool {
        if self.users.contains_key(name) {
            return false;
        }
        log::debug!("Enrolling user {name}");
        let ledger = UserLedger::new(self.enrollment_counter);
        self.enrollment_counter += 1;
        self.users.insert(name.clone(), ledger);
        true
    }

    /// Finds the user with the smallest dominant share among users with pending applications.
    ///
    /// Users whose queue is missing or empty are skipped. Returns `None` when no such
    /// user exists.
    pub fn get_min_resource_user(
        &mut self,
        queues: &Map<UserId, ApplicationQueue>,
        cluster_capacity: &ResourceVector,
    ) -> crate::Result<Option<UserId>> {
        let capacity = cluster_capacity.clone();
        let scores = self
            .users
            .iter()
            .map(|(name, ledger)| {
                Ok((
                    name.clone(),
                    ledger.compute_dominant_share(&capacity)?,
                    ledger.enrollment(),
                ))
            })
            .collect::<crate::Result<Vec<_>>>()?;
        self.priority.rebuild(scores);

        if self.priority.is_empty() {
            log::debug!("No enrolled users");
            return Ok(None);
        }

        while let Some((user, share)) = self.priority.pop_min() {
            if queues.get(&user).is_some_and(|queue| !queue.is_empty()) {
                log::debug!("User {user} has minimal share {share}");
                return Ok(Some(user));
            }
        }
        Ok(None)
    }

    pub fn allocate(
        &mut self,
        user: &UserId,
        app_id: ApplicationId,
        ask: ResourceVector,
    ) -> crate::Result<()> {
        let ledger = self
            .users
            .get_mut(user)
            .ok_or_else(|| DrfError::UnknownUser(user.clone()))?;
        log::debug!("Allocating {ask} to application {app_id} of user {user}");
        ledger.run_app(app_id, ask);
        Ok(())
    }

    /// Stops accounting the application to the user. Unknown users and applications are ignored.
    pub fn release(&mut self, user: &UserId, app_id: &ApplicationId) -> Option<ResourceVector> {
        let Some(ledger) = self.users.get_mut(user) else {
            log::debug!("Release of application {app_id} for unknown user {user}");
            return None;
        };
        let released = ledger.complete_app(app_id);
        if released.is_none() {
            log::debug!("Release of application {app_id} that is not running for user {user}");
        }
        released
    }

    pub fn dominant_share(
        &self,
        user: &UserId,
        cluster_capacity: &ResourceVector,
    ) -> Option<crate::Result<f64>> {
        self.users
            .get(user)
            .map(|ledger| ledger.compute_dominant_share(cluster_capacity))
    }

    /// Users in enrollment order.
    pub fn users(&self) -> Vec<(&UserId, &UserLedger)> {
        let mut users: Vec<_> = self.users.iter().collect();
        users.sort_unstable_by_key(|(_, ledger)| ledger.enrollment());
        users
    }

    #[inline]
    pub fn get(&self, user: &UserId) -> Option<&UserLedger> {
        self.users.get(user)
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, user: &UserId) -> Option<&mut UserLedger> {
        self.users.get_mut(user)
    }

    #[inline]
    pub fn contains(&self, user: &UserId) -> bool {
        self.users.contains_key(user)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::internal::tests::utils::{res, time};

    fn queues(pending: &[(&str, usize)]) -> Map<UserId, ApplicationQueue> {
        let mut queues = Map::default();
        for (user, count) in pending {
            let mut queue = ApplicationQueue::new();
            for i in 0..*count {
                queue.push(format!("{user}-{i}").into(), time(i as i64));
            }
            queues.insert(UserId::from(*user), queue);
        }
        queues
    }

    #[test]
    fn test_add_user_idempotent() {
        let mut registry = TenantRegistry::new();
        assert!(!registry.contains(&"a".into()));
        assert!(registry.add_user(&"a".into()));
        assert!(registry.contains(&"a".into()));
        registry
            .allocate(&"a".into(), "a1".into(), res(&[("cpu", 5)]))
            .unwrap();
        assert!(!registry.add_user(&"a".into()));
        assert_eq!(registry.len(), 1);
        let ledger = registry.get(&"a".into()).unwrap();
        assert_eq!(ledger.running_total(), &res(&[("cpu", 5)]));
        assert_eq!(ledger.enrollment(), 0);
    }

    #[test]
    fn test_min_user_without_users() {
        let mut registry = TenantRegistry::new();
        let capacity = res(&[("cpu", 100)]);
        assert_eq!(
            registry
                .get_min_resource_user(&queues(&[("a", 1)]), &capacity)
                .unwrap(),
            None
        );
    }

    #[test]
    fn test_min_user_skips_users_without_pending_apps() {
        let mut registry = TenantRegistry::new();
        let capacity = res(&[("cpu", 100)]);
        for user in ["a", "b", "c"] {
            registry.add_user(&user.into());
        }
        registry
            .allocate(&"b".into(), "b0".into(), res(&[("cpu", 10)]))
            .unwrap();
        registry
            .allocate(&"c".into(), "c0".into(), res(&[("cpu", 20)]))
            .unwrap();

        // "a" has the smallest share but nothing to schedule
        let q = queues(&[("a", 0), ("b", 2), ("c", 1)]);
        assert_eq!(
            registry.get_min_resource_user(&q, &capacity).unwrap(),
            Some("b".into())
        );

        let q = queues(&[("c", 1)]);
        assert_eq!(
            registry.get_min_resource_user(&q, &capacity).unwrap(),
            Some("c".into())
        );

        let q = queues(&[("a", 0)]);
        assert_eq!(registry.get_min_resource_user(&q, &capacity).unwrap(), None);
    }

    #[test]
    fn test_min_user_tie_by_enrollment() {
        let mut registry = TenantRegistry::new();
        let capacity = res(&[("cpu", 100)]);
        for user in ["d", "b", "c", "a"] {
            registry.add_user(&user.into());
        }
        let q = queues(&[("a", 1), ("b", 1), ("c", 1), ("d", 1)]);
        for _ in 0..5 {
            assert_eq!(
                registry.get_min_resource_user(&q, &capacity).unwrap(),
                Some("d".into())
            );
        }
    }

    #[test]
    fn test_min_user_invalid_capacity() {
        let mut registry = TenantRegistry::new();
        registry.add_user(&"a".into());
        registry
            .allocate(&"a".into(), "a1".into(), res(&[("gpu", 1)]))
            .unwrap();
        let result = registry.get_min_resource_user(&queues(&[("a", 1)]), &res(&[("cpu", 10)]));
        assert!(matches!(result, Err(DrfError::InvalidCapacity { .. })));
    }

    #[test]
    fn test_allocate_unknown_user() {
        let mut registry = TenantRegistry::new();
        assert_eq!(
            registry.allocate(&"x".into(), "x1".into(), res(&[("cpu", 1)])),
            Err(DrfError::UnknownUser("x".into()))
        );
    }

    #[test]
    fn test_release() {
        let mut registry = TenantRegistry::new();
        registry.add_user(&"a".into());
        registry
            .allocate(&"a".into(), "a1".into(), res(&[("cpu", 40)]))
            .unwrap();
        let capacity = res(&[("cpu", 100)]);
        assert_eq!(
            registry.dominant_share(&"a".into(), &capacity),
            Some(Ok(0.4))
        );
        assert_eq!(
            registry.release(&"a".into(), &"a1".into()),
            Some(res(&[("cpu", 40)]))
        );
        assert_eq!(registry.release(&"a".into(), &"a1".into()), None);
        assert_eq!(registry.release(&"zz".into(), &"a1".into()), None);
        assert_eq!(
            registry.dominant_share(&"a".into(), &capacity),
            Some(Ok(0.0))
        );
        assert_eq!(registry.dominant_share(&"zz".into(), &capacity), None);
    }
}
