use crate::internal::manager::FairManager;
use crate::internal::tests::utils::{
    AppBuilder, completion, init_test_logging, res, select, selection,
};
use crate::{Map, UserId};

#[test]
fn test_two_users_cycle() {
    init_test_logging();
    let mut m = FairManager::new(res(&[("cpu", 100)]));
    m.enroll_user(&"A".into());
    m.enroll_user(&"B".into());
    m.enroll_and_enqueue(&AppBuilder::new("a1", "A").time(1).cpus(10).build());
    m.enroll_and_enqueue(&AppBuilder::new("b1", "B").time(2).cpus(10).build());

    // Equal shares, "A" was enrolled first
    assert_eq!(select(&mut m), selection("A", "a1"));

    m.allocate(&"A".into(), &"a1".into(), res(&[("cpu", 50)]))
        .unwrap();
    assert_eq!(select(&mut m), selection("B", "b1"));

    m.acknowledge_completion(&completion("a1", "A"));
    assert_eq!(m.pending_count(&"A".into()), 0);
    assert!(!m.is_tombstoned(&"a1".into()));
    assert_eq!(select(&mut m), selection("B", "b1"));

    m.acknowledge_completion(&completion("b1", "B"));
    assert_eq!(select(&mut m), None);
    assert!(!m.has_schedulable_work());
}

/// Drives the manager the way an allocator would: each selection places one more task
/// of the selected application until the next task does not fit into the cluster.
#[test]
fn test_allocations_converge_to_dominant_fairness() {
    init_test_logging();
    let capacity = res(&[("cpu", 9), ("memory", 18)]);
    let mut m = FairManager::new(capacity.clone());
    m.enroll_and_enqueue(&AppBuilder::new("a-job", "A").time(1).build());
    m.enroll_and_enqueue(&AppBuilder::new("b-job", "B").time(2).build());

    let task_ask = |user: &UserId| {
        if user.as_str() == "A" {
            res(&[("cpu", 1), ("memory", 4)])
        } else {
            res(&[("cpu", 3), ("memory", 1)])
        }
    };

    let mut used = res(&[]);
    let mut placed: Map<UserId, u32> = Map::default();
    while let Some(s) = select(&mut m) {
        let ask = task_ask(&s.user);
        let next = used.add(&ask);
        if next.iter().any(|(name, amount)| amount > capacity.get(name)) {
            break;
        }
        used = next;
        m.allocate(&s.user, &s.application_id, ask).unwrap();
        *placed.entry(s.user).or_default() += 1;
    }

    assert_eq!(placed[&UserId::from("A")], 3);
    assert_eq!(placed[&UserId::from("B")], 2);
    assert_eq!(
        m.dominant_shares().unwrap(),
        vec![(UserId::from("A"), 2.0 / 3.0), (UserId::from("B"), 2.0 / 3.0)]
    );

    // Finished jobs give their share back
    m.acknowledge_completion(&completion("a-job", "A"));
    assert_eq!(m.dominant_shares().unwrap()[0].1, 0.0);
    assert_eq!(select(&mut m), selection("B", "b-job"));
}
