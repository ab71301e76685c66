//! Unit tests for the ReleaseUpgrade reconciler

#[cfg(test)]
mod tests {
    use crate::builder::{daemonset_for_release_upgrade, selector_labels};
    use crate::error::ControllerError;
    use crate::reconciler::ReconcileOutcome;
    use crate::test_utils::*;
    use cluster_store::StoreError;
    use std::time::Duration;

    fn already_exists(name: &str) -> StoreError {
        StoreError::AlreadyExists {
            kind: "DaemonSet".to_string(),
            namespace: "default".to_string(),
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn test_first_reconcile_creates_daemonset_and_requeues() {
        let harness = TestHarness::with_upgrade(relup_a());

        let outcome = harness.reconciler.reconcile("default", "relup-a").await.unwrap();

        assert_eq!(outcome, ReconcileOutcome::requeue_now());
        assert_eq!(outcome.requeue_after, Some(Duration::ZERO));
        assert_eq!(harness.daemonsets.create_calls(), 1);

        let ds = harness.daemonsets.stored("default", "relup-a").unwrap();
        assert_eq!(ds.metadata.name.as_deref(), Some("relup-a"));
        assert_eq!(ds.metadata.namespace.as_deref(), Some("default"));

        let spec = ds.spec.unwrap();
        assert_eq!(spec.selector.match_labels, Some(selector_labels("relup-a")));

        let pod = spec.template.spec.unwrap();
        let container = &pod.containers[0];
        assert_eq!(
            container.args,
            Some(vec!["cp /opt/relup.tar.gz /tmp/relup-a; sleep 3600".to_string()])
        );
        assert_eq!(
            container.volume_mounts.as_ref().unwrap()[0].mount_path,
            "/tmp/relup-a"
        );
        assert_eq!(
            pod.volumes.unwrap()[0].host_path.as_ref().unwrap().path,
            "/var/lib/relup"
        );
    }

    #[tokio::test]
    async fn test_second_reconcile_is_idempotent() {
        let harness = TestHarness::with_upgrade(relup_a());

        harness.reconciler.reconcile("default", "relup-a").await.unwrap();
        let outcome = harness.reconciler.reconcile("default", "relup-a").await.unwrap();

        assert_eq!(outcome, ReconcileOutcome::done());
        assert_eq!(harness.daemonsets.create_calls(), 1);
        assert_eq!(harness.daemonsets.len(), 1);
    }

    #[tokio::test]
    async fn test_deleted_upgrade_is_a_noop() {
        let harness = TestHarness::new();

        let outcome = harness.reconciler.reconcile("default", "gone").await.unwrap();

        assert_eq!(outcome, ReconcileOutcome::done());
        assert_eq!(harness.upgrades.get_calls(), 1);
        assert_eq!(harness.daemonsets.get_calls(), 0);
        assert_eq!(harness.daemonsets.create_calls(), 0);
    }

    #[tokio::test]
    async fn test_upgrade_deleted_between_reconciles() {
        let harness = TestHarness::with_upgrade(relup_a());
        harness.reconciler.reconcile("default", "relup-a").await.unwrap();

        harness.upgrades.remove("default", "relup-a");
        let outcome = harness.reconciler.reconcile("default", "relup-a").await.unwrap();

        // The DaemonSet is left for owner-reference garbage collection
        assert_eq!(outcome, ReconcileOutcome::done());
        assert!(harness.daemonsets.stored("default", "relup-a").is_some());
    }

    #[tokio::test]
    async fn test_lost_create_race_is_success() {
        let harness = TestHarness::with_upgrade(relup_a());
        harness.daemonsets.fail_next_create(already_exists("relup-a"));

        let outcome = harness.reconciler.reconcile("default", "relup-a").await.unwrap();

        assert_eq!(outcome, ReconcileOutcome::done());
        assert_eq!(harness.daemonsets.create_calls(), 1);
    }

    #[tokio::test]
    async fn test_spec_change_does_not_update_existing_daemonset() {
        let harness = TestHarness::with_upgrade(relup_a());
        harness.reconciler.reconcile("default", "relup-a").await.unwrap();
        let before = harness.daemonsets.stored("default", "relup-a").unwrap();

        let mut changed = relup_a();
        changed.spec.relup.image = Some("registry/relup:2.0".to_string());
        changed.spec.volume.host_path = Some("/srv/other".to_string());
        harness.upgrades.insert(changed);

        let outcome = harness.reconciler.reconcile("default", "relup-a").await.unwrap();

        assert_eq!(outcome, ReconcileOutcome::done());
        assert_eq!(harness.daemonsets.stored("default", "relup-a").unwrap(), before);
        assert_eq!(harness.daemonsets.create_calls(), 1);
    }

    #[tokio::test]
    async fn test_colliding_daemonset_counts_as_converged() {
        let harness = TestHarness::with_upgrade(relup_a());
        let mut foreign = daemonset_for_release_upgrade(&relup_a());
        foreign.metadata.owner_references = None;
        harness.daemonsets.insert(foreign.clone());

        let outcome = harness.reconciler.reconcile("default", "relup-a").await.unwrap();

        assert_eq!(outcome, ReconcileOutcome::done());
        assert_eq!(harness.daemonsets.create_calls(), 0);
        assert_eq!(harness.daemonsets.stored("default", "relup-a").unwrap(), foreign);
    }

    #[tokio::test]
    async fn test_upgrade_fetch_failure_is_returned() {
        let harness = TestHarness::with_upgrade(relup_a());
        harness
            .upgrades
            .fail_next_get(StoreError::Unavailable("connection refused".to_string()));

        let err = harness.reconciler.reconcile("default", "relup-a").await.unwrap_err();

        assert!(matches!(err, ControllerError::Store(StoreError::Unavailable(_))));
        assert_eq!(harness.daemonsets.get_calls(), 0);
    }

    #[tokio::test]
    async fn test_daemonset_fetch_failure_is_returned() {
        let harness = TestHarness::with_upgrade(relup_a());
        harness
            .daemonsets
            .fail_next_get(StoreError::Unavailable("timeout".to_string()));

        let err = harness.reconciler.reconcile("default", "relup-a").await.unwrap_err();

        assert!(matches!(err, ControllerError::Store(StoreError::Unavailable(_))));
        assert_eq!(harness.daemonsets.create_calls(), 0);
    }

    #[tokio::test]
    async fn test_create_failure_is_returned_then_retry_succeeds() {
        let harness = TestHarness::with_upgrade(relup_a());
        harness
            .daemonsets
            .fail_next_create(StoreError::Unavailable("etcd leader changed".to_string()));

        let err = harness.reconciler.reconcile("default", "relup-a").await.unwrap_err();
        assert!(matches!(err, ControllerError::Store(StoreError::Unavailable(_))));
        assert!(harness.daemonsets.is_empty());

        let outcome = harness.reconciler.reconcile("default", "relup-a").await.unwrap();
        assert_eq!(outcome, ReconcileOutcome::requeue_now());
        assert_eq!(harness.daemonsets.len(), 1);
    }

    #[tokio::test]
    async fn test_upgrades_in_other_namespaces_are_independent() {
        let harness = TestHarness::with_upgrade(relup_a());
        harness.upgrades.insert(create_test_release_upgrade(
            "relup-a",
            "staging",
            "registry/relup:1.3",
            "/opt/relup.tar.gz",
            "/var/lib/relup",
        ));

        harness.reconciler.reconcile("default", "relup-a").await.unwrap();
        harness.reconciler.reconcile("staging", "relup-a").await.unwrap();

        assert_eq!(harness.daemonsets.len(), 2);
        assert!(harness.daemonsets.stored("staging", "relup-a").is_some());
    }

    #[tokio::test]
    async fn test_concurrent_reconciles_of_distinct_keys() {
        let harness = TestHarness::with_upgrade(relup_a());
        harness.upgrades.insert(create_test_release_upgrade(
            "relup-b",
            "default",
            "registry/relup:1.2",
            "/opt/relup.tar.gz",
            "/var/lib/relup",
        ));

        let (a, b) = tokio::join!(
            harness.reconciler.reconcile("default", "relup-a"),
            harness.reconciler.reconcile("default", "relup-b"),
        );

        assert_eq!(a.unwrap(), ReconcileOutcome::requeue_now());
        assert_eq!(b.unwrap(), ReconcileOutcome::requeue_now());
        assert_eq!(harness.daemonsets.len(), 2);
    }
}
