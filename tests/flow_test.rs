mod common;

use access_flow::domain::{CommitOutcome, MiddlewareType, Navigator, Notice, StepKey};
use access_flow::error::{BackendError, CommitError, FlowError, INCOMPLETE_FORM_MESSAGE};
use access_flow::flow::{Transition, SUBMITTED_MESSAGE};
use common::{group, FakeBackend, GatedCommit, Harness, ScriptedCommit, StalledCommit};
use std::time::Duration;

#[tokio::test]
async fn test_create_mode_hides_audit_and_submits_from_last_step() {
    let h = Harness::at("/access/create/abc?step=3");
    let storage = ScriptedCommit::ok();
    h.flow.register_commit(StepKey::DataStorage, storage.clone());

    let keys: Vec<_> = h.flow.visible_steps().iter().map(|s| s.key).collect();
    assert_eq!(
        keys,
        vec![
            StepKey::Info,
            StepKey::DataStream,
            StepKey::DataSources,
            StepKey::DataStorage
        ]
    );

    let transition = h.flow.advance(3).await.unwrap();
    assert_eq!(transition, Transition::Submitted);
    assert_eq!(storage.calls(), 0);
    assert_eq!(h.backend.starts(), 1);
    assert_eq!(h.history.current().to_href(), "/access");
    assert_eq!(
        h.listener.notices(),
        vec![Notice::Success(SUBMITTED_MESSAGE.to_string())]
    );
    assert!(!h.flow.is_busy());
}

#[tokio::test]
async fn test_first_commit_captures_group_id() {
    let h = Harness::at("/access/create");
    h.flow.register_commit(
        StepKey::Info,
        ScriptedCommit::new(vec![Ok(CommitOutcome::created(
            "abc",
            Some(MiddlewareType::Kafka),
        ))]),
    );

    let transition = h.flow.advance(0).await.unwrap();
    match transition {
        Transition::Advanced { to, route } => {
            assert_eq!(to, 1);
            assert_eq!(route.to_href(), "/access/create/abc?step=1");
        }
        other => panic!("unexpected transition {:?}", other),
    }

    let ctx = h.flow.context();
    assert_eq!(ctx.group_id.as_deref(), Some("abc"));
    assert_eq!(ctx.middleware_type, Some(MiddlewareType::Kafka));
    assert_eq!(h.history.current().to_href(), "/access/create/abc?step=1");
    assert_eq!(h.flow.current(), 1);
    assert_eq!(h.flow.opened(), vec![0, 1]);
}

#[tokio::test]
async fn test_group_id_is_set_exactly_once() {
    let h = Harness::at("/access/create");
    h.flow.register_commit(
        StepKey::Info,
        ScriptedCommit::new(vec![
            Ok(CommitOutcome::created("abc", Some(MiddlewareType::Pulsar))),
            Ok(CommitOutcome::created("xyz", None)),
        ]),
    );
    h.flow.register_commit(
        StepKey::DataStream,
        ScriptedCommit::new(vec![Ok(CommitOutcome::created("zzz", None))]),
    );

    h.flow.advance(0).await.unwrap();
    h.flow.back(1).unwrap();
    assert_eq!(h.flow.current(), 0);

    h.flow.advance(0).await.unwrap();
    assert_eq!(h.flow.context().group_id.as_deref(), Some("abc"));

    h.flow.advance(1).await.unwrap();
    assert_eq!(h.flow.context().group_id.as_deref(), Some("abc"));
    assert_eq!(h.history.current().to_href(), "/access/create/abc?step=2");
}

#[tokio::test]
async fn test_invalid_fields_abort_without_state_change() {
    let h = Harness::at("/access/create");
    h.flow.register_commit(
        StepKey::Info,
        ScriptedCommit::new(vec![Err(CommitError::invalid(["inlongGroupId"]))]),
    );
    let before = h.flow.context();

    let err = h.flow.advance(0).await.unwrap_err();
    assert_eq!(
        err,
        FlowError::Incomplete {
            fields: vec!["inlongGroupId".to_string()]
        }
    );
    assert_eq!(h.flow.current(), 0);
    assert_eq!(h.flow.opened(), vec![0]);
    assert_eq!(h.flow.context(), before);
    assert!(!h.flow.is_busy());
    assert_eq!(h.history.entries().len(), 1);
    assert_eq!(
        h.listener.notices(),
        vec![Notice::Error(INCOMPLETE_FORM_MESSAGE.to_string())]
    );

    // Retry succeeds once the form is fixed
    h.flow.advance(0).await.unwrap();
    assert_eq!(h.flow.current(), 1);
}

#[tokio::test]
async fn test_operation_failure_is_surfaced_verbatim() {
    let h = Harness::at("/access/create");
    h.flow.register_commit(
        StepKey::Info,
        ScriptedCommit::new(vec![Err(CommitError::failed("group already exists"))]),
    );

    let err = h.flow.advance(0).await.unwrap_err();
    assert_eq!(err, FlowError::Operation("group already exists".to_string()));
    assert_eq!(
        h.listener.notices(),
        vec![Notice::Error("group already exists".to_string())]
    );
    assert_eq!(h.flow.context().group_id, None);
    assert!(!h.flow.is_busy());
}

#[tokio::test]
async fn test_steps_without_commit_advance_unconditionally() {
    let h = Harness::at("/access/create/abc?step=1");
    let transition = h.flow.advance(1).await.unwrap();
    assert!(matches!(transition, Transition::Advanced { to: 2, .. }));
    assert_eq!(h.flow.current(), 2);
}

#[tokio::test]
async fn test_tab_view_selects_audit_without_commit() {
    let h = Harness::at("/access/detail/g1");
    let audit = ScriptedCommit::ok();
    h.flow.register_commit(StepKey::Audit, audit.clone());

    assert_eq!(h.flow.visible_steps().len(), 5);
    h.flow.select(4).unwrap();

    assert_eq!(h.flow.current(), 4);
    assert!(h.flow.opened().contains(&4));
    assert_eq!(audit.calls(), 0);

    let panes = h.flow.panes();
    assert_eq!(panes[4].key, StepKey::Audit);
    assert!(panes[4].mounted);
    assert!(panes[4].active);
    // The tab view keeps its cursor in memory
    assert_eq!(h.history.entries().len(), 1);
}

#[tokio::test]
async fn test_tab_view_advance_keeps_detail_route() {
    let h = Harness::at("/access/detail/g1");
    let transition = h.flow.advance(0).await.unwrap();
    assert_eq!(
        transition,
        Transition::Advanced {
            to: 1,
            route: access_flow::domain::Route::new("/access/detail/g1", Some(1)),
        }
    );
    assert_eq!(h.flow.current(), 1);
}

#[tokio::test]
async fn test_select_out_of_range() {
    let h = Harness::at("/access/create");
    assert_eq!(
        h.flow.select(4),
        Err(FlowError::StepOutOfRange { index: 4, len: 4 })
    );
}

#[tokio::test]
async fn test_wizard_jumps_only_to_opened_steps() {
    let h = Harness::at("/access/create/abc");
    assert_eq!(h.flow.select(1), Err(FlowError::StepNotOpened(1)));

    h.flow.advance(0).await.unwrap();
    h.flow.advance(1).await.unwrap();
    h.flow.select(0).unwrap();
    assert_eq!(h.flow.current(), 0);

    h.flow.select(2).unwrap();
    assert_eq!(h.flow.current(), 2);
    assert_eq!(h.flow.select(3), Err(FlowError::StepNotOpened(3)));
}

#[tokio::test]
async fn test_enrichment_sets_middleware_and_readonly() {
    let backend = FakeBackend::with_group(101, Some(MiddlewareType::TubeMq));
    let h = Harness::with_backend("/access/detail/g1?step=4", backend);
    assert_eq!(h.flow.current(), 4);

    assert!(h.flow.needs_enrichment());
    assert!(h.flow.enrich().await.unwrap());

    let ctx = h.flow.context();
    assert!(ctx.readonly);
    assert_eq!(ctx.middleware_type, Some(MiddlewareType::TubeMq));
    // Audit disappears and the cursor stays inside the visible steps
    assert_eq!(h.flow.visible_steps().len(), 4);
    assert_eq!(h.flow.current(), 3);
}

#[tokio::test]
async fn test_enrichment_runs_once() {
    let h = Harness::at("/access/detail/g1");
    assert!(h.flow.enrich().await.unwrap());
    assert!(!h.flow.enrich().await.unwrap());
    assert!(!h.flow.needs_enrichment());
    assert_eq!(h.backend.fetches(), 1);
}

#[tokio::test]
async fn test_enrichment_runs_once_without_middleware_type() {
    let backend = FakeBackend::with_group(130, None);
    let h = Harness::with_backend("/access/detail/g1", backend);
    assert!(h.flow.enrich().await.unwrap());
    assert!(!h.flow.enrich().await.unwrap());
    assert_eq!(h.backend.fetches(), 1);
}

#[tokio::test]
async fn test_enrichment_skipped_after_create_commit() {
    let h = Harness::at("/access/create");
    assert!(!h.flow.needs_enrichment());

    h.flow.register_commit(
        StepKey::Info,
        ScriptedCommit::new(vec![Ok(CommitOutcome::created(
            "abc",
            Some(MiddlewareType::Kafka),
        ))]),
    );
    h.flow.advance(0).await.unwrap();

    assert!(!h.flow.enrich().await.unwrap());
    assert_eq!(h.backend.fetches(), 0);
}

#[tokio::test]
async fn test_enrichment_failure_can_be_retried() {
    let backend = FakeBackend::new();
    backend.push_fetch(Err(BackendError::Transport("connection refused".to_string())));
    let h = Harness::with_backend("/access/detail/g1", backend);

    let err = h.flow.enrich().await.unwrap_err();
    assert!(matches!(err, FlowError::Operation(_)));
    assert_eq!(h.flow.context().middleware_type, None);
    assert!(h.flow.needs_enrichment());

    assert!(h.flow.enrich().await.unwrap());
    assert_eq!(h.backend.fetches(), 2);
}

#[tokio::test]
async fn test_busy_blocks_overlapping_transitions() {
    let h = Harness::at("/access/create");
    let gated = GatedCommit::new(CommitOutcome::created("abc", None));
    h.flow.register_commit(StepKey::Info, gated.clone());

    let first = h.flow.advance(0);
    let second = async {
        tokio::task::yield_now().await;
        assert!(h.flow.is_busy());
        let overlapping = h.flow.advance(0).await;
        let back = h.flow.back(1);
        gated.gate.notify_one();
        (overlapping, back)
    };
    let (first, (overlapping, back)) = tokio::join!(first, second);

    assert_eq!(overlapping, Err(FlowError::Busy));
    assert_eq!(back, Err(FlowError::Busy));
    assert!(first.is_ok());
    assert!(!h.flow.is_busy());
    assert_eq!(h.flow.opened(), vec![0, 1]);
    // A rejected overlap raises no notice
    assert!(h.listener.notices().is_empty());
}

#[tokio::test]
async fn test_footer_reflects_busy() {
    let h = Harness::at("/access/create/abc?step=1");
    let gated = GatedCommit::new(CommitOutcome::default());
    h.flow.register_commit(StepKey::DataStream, gated.clone());

    let advance = h.flow.advance(1);
    let observe = async {
        tokio::task::yield_now().await;
        let footer = h.flow.footer().unwrap();
        gated.gate.notify_one();
        footer
    };
    let (result, footer) = tokio::join!(advance, observe);

    assert!(result.is_ok());
    assert!(footer.next_loading);
    assert!(footer.previous_disabled);
    assert!(!h.flow.footer().unwrap().next_loading);
}

#[tokio::test]
async fn test_dropped_advance_releases_busy() {
    let h = Harness::at("/access/create");
    h.flow.register_commit(StepKey::Info, std::sync::Arc::new(StalledCommit));

    let timed_out = tokio::time::timeout(Duration::from_millis(20), h.flow.advance(0)).await;
    assert!(timed_out.is_err());
    assert!(!h.flow.is_busy());
    assert_eq!(h.flow.current(), 0);
    assert_eq!(h.flow.opened(), vec![0]);

    h.flow.register_commit(StepKey::Info, ScriptedCommit::ok());
    assert!(h.flow.advance(0).await.is_ok());
}

#[tokio::test]
async fn test_teardown_discards_late_commit() {
    let h = Harness::at("/access/create");
    let gated = GatedCommit::new(CommitOutcome::created("abc", Some(MiddlewareType::Kafka)));
    h.flow.register_commit(StepKey::Info, gated.clone());

    let advance = h.flow.advance(0);
    let close = async {
        tokio::task::yield_now().await;
        h.flow.teardown();
        gated.gate.notify_one();
    };
    let (result, ()) = tokio::join!(advance, close);

    assert_eq!(result, Err(FlowError::Detached));
    assert_eq!(h.flow.context().group_id, None);
    assert_eq!(h.flow.opened(), vec![0]);
    assert_eq!(h.history.entries().len(), 1);
    assert!(h.listener.notices().is_empty());

    // Nothing new starts after teardown
    assert_eq!(h.flow.advance(0).await, Err(FlowError::Detached));
    assert!(!h.flow.enrich().await.unwrap());
}

#[tokio::test]
async fn test_submit_failure_stays_on_final_step() {
    let backend = FakeBackend::new();
    backend.push_start(Err(BackendError::Rejected("approval flow missing".to_string())));
    let h = Harness::with_backend("/access/create/abc?step=3", backend);

    let err = h.flow.advance(3).await.unwrap_err();
    assert_eq!(err, FlowError::Operation("approval flow missing".to_string()));
    assert_eq!(h.flow.current(), 3);
    assert_eq!(h.history.current().to_href(), "/access/create/abc?step=3");
    assert_eq!(
        h.listener.notices(),
        vec![Notice::Error("approval flow missing".to_string())]
    );
    assert!(!h.flow.is_busy());

    // Retry goes through
    h.flow.submit().await.unwrap();
    assert_eq!(h.history.current().to_href(), "/access");
}

#[tokio::test]
async fn test_submit_requires_group_id() {
    let h = Harness::at("/access/create?step=3");
    assert_eq!(h.flow.submit().await, Err(FlowError::MissingGroupId));
    assert_eq!(h.backend.starts(), 0);
    assert!(!h.flow.is_busy());
}

#[tokio::test]
async fn test_submit_only_from_last_step() {
    let h = Harness::at("/access/create/abc?step=1");
    assert_eq!(h.flow.submit().await, Err(FlowError::NotOnFinalStep));
    assert_eq!(h.backend.starts(), 0);
}

#[tokio::test]
async fn test_listener_sees_changes() {
    let h = Harness::at("/access/create/abc");
    let before = h.listener.changes();
    h.flow.advance(0).await.unwrap();
    assert!(h.listener.changes() > before);
}

#[tokio::test]
async fn test_resumed_wizard_enriches_with_known_id() {
    let backend = FakeBackend::new();
    backend.push_fetch(Ok(group("abc", 100, Some(MiddlewareType::Pulsar))));
    let h = Harness::with_backend("/access/create/abc?step=2", backend);

    assert!(h.flow.context().is_create);
    assert!(h.flow.enrich().await.unwrap());
    assert_eq!(h.flow.context().middleware_type, Some(MiddlewareType::Pulsar));
    assert_eq!(h.flow.visible_steps().len(), 4);
}

#[tokio::test]
async fn test_transitions_only_start_from_current_step() {
    let h = Harness::at("/access/create/abc");
    let info = ScriptedCommit::new(vec![Err(CommitError::invalid(["name"]))]);
    h.flow.register_commit(StepKey::Info, info.clone());

    // Skipping the failing first step is refused
    assert_eq!(
        h.flow.advance(2).await,
        Err(FlowError::NotCurrentStep { index: 2, current: 0 })
    );
    // So is submitting from the first step
    assert_eq!(
        h.flow.advance(3).await,
        Err(FlowError::NotCurrentStep { index: 3, current: 0 })
    );
    // Previous from a step ahead of the cursor must not open it
    assert_eq!(
        h.flow.back(3),
        Err(FlowError::NotCurrentStep { index: 3, current: 0 })
    );

    assert_eq!(h.flow.current(), 0);
    assert_eq!(h.flow.opened(), vec![0]);
    assert_eq!(info.calls(), 0);
    assert_eq!(h.backend.starts(), 0);
    assert_eq!(h.history.entries().len(), 1);
    assert!(h.listener.notices().is_empty());
    assert!(!h.flow.is_busy());

    // The gate still applies from the right step
    assert!(matches!(
        h.flow.advance(0).await,
        Err(FlowError::Incomplete { .. })
    ));
    assert_eq!(h.flow.current(), 0);
}

#[tokio::test]
async fn test_tab_view_advance_requires_current_tab() {
    let h = Harness::at("/access/detail/g1?step=1");
    assert_eq!(
        h.flow.advance(0).await,
        Err(FlowError::NotCurrentStep { index: 0, current: 1 })
    );
    assert_eq!(h.flow.current(), 1);
}

#[tokio::test]
async fn test_teardown_discards_late_enrichment() {
    let backend = FakeBackend::gated();
    backend.push_fetch(Ok(group("g1", 101, Some(MiddlewareType::Kafka))));
    let h = Harness::with_backend("/access/detail/g1", backend);

    let enrich = h.flow.enrich();
    let close = async {
        tokio::task::yield_now().await;
        h.flow.teardown();
        h.backend.open_gate();
    };
    let (result, ()) = tokio::join!(enrich, close);

    assert_eq!(result, Err(FlowError::Detached));
    assert_eq!(h.backend.fetches(), 1);
    let ctx = h.flow.context();
    assert_eq!(ctx.middleware_type, None);
    assert!(!ctx.readonly);
    assert_eq!(h.flow.visible_steps().len(), 5);
    assert_eq!(h.history.entries().len(), 1);
    assert!(h.listener.notices().is_empty());
}

#[tokio::test]
async fn test_teardown_discards_late_submit() {
    let h = Harness::with_backend("/access/create/abc?step=3", FakeBackend::gated());

    let submit = h.flow.advance(3);
    let close = async {
        tokio::task::yield_now().await;
        h.flow.teardown();
        h.backend.open_gate();
    };
    let (result, ()) = tokio::join!(submit, close);

    assert_eq!(result, Err(FlowError::Detached));
    assert_eq!(h.backend.starts(), 1);
    assert_eq!(h.flow.current(), 3);
    assert_eq!(h.history.current().to_href(), "/access/create/abc?step=3");
    assert_eq!(h.history.entries().len(), 1);
    assert!(h.listener.notices().is_empty());
    assert!(!h.flow.is_busy());
}
