//! End-to-end handover workflow tests.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use ipass_handover_core::db::Database;
use ipass_handover_core::models::{
    DailySetup, PlanStatus, Presence, PresenceRole, Priority, SessionState, Severity, Shift,
    TaskStatus,
};
use ipass_handover_core::workflow::{
    ActionListManager, ContingencyPlanManager, SessionController, SeverityTracker, WorkflowError,
};
use proptest::prelude::*;

fn johnson_setup(patients: &[&str]) -> DailySetup {
    let mut setup = DailySetup::new("Dr. Johnson".to_string(), "picu".to_string(), Shift::Day);
    setup.patient_ids = patients.iter().map(|p| p.to_string()).collect();
    setup
}

fn pending_texts(actions: &ActionListManager<'_>, patient_id: &str) -> Vec<String> {
    actions
        .list_pending(patient_id)
        .unwrap()
        .into_iter()
        .map(|i| i.text)
        .collect()
}

// =========================================================================
// Action list
// =========================================================================

#[test]
fn test_carried_over_items_are_never_mutated() {
    let db = Database::open_in_memory().unwrap();
    let actions = ActionListManager::new(&db);

    let pending = actions
        .carry_over(
            "1",
            "Follow up culture",
            Priority::Medium,
            "Dr. Night",
            None,
            TaskStatus::Pending,
        )
        .unwrap();
    let done = actions
        .carry_over("1", "Page ortho", Priority::Low, "Dr. Night", None, TaskStatus::Done)
        .unwrap();

    for item in [&pending, &done] {
        assert!(!actions.delete_item(&item.id, "Dr. Johnson").unwrap());
        let after = actions.toggle_status(&item.id, "Dr. Johnson").unwrap();
        assert_eq!(after.status, item.status);
        assert_eq!(after.version, item.version);
    }

    assert_eq!(pending_texts(&actions, "1"), vec!["Follow up culture"]);
    let done_list = actions.list_done("1").unwrap();
    assert_eq!(done_list.len(), 1);
    assert_eq!(done_list[0].id, done.id);
}

#[test]
fn test_pending_list_is_newest_first() {
    let db = Database::open_in_memory().unwrap();
    let actions = ActionListManager::new(&db);

    actions.add_item("1", "A", Priority::Medium, "Dr. Johnson").unwrap();
    actions.add_item("1", "B", Priority::Medium, "Dr. Johnson").unwrap();
    actions.add_item("2", "other patient", Priority::Medium, "Dr. Johnson").unwrap();

    assert_eq!(pending_texts(&actions, "1"), vec!["B", "A"]);
}

#[test]
fn test_done_list_keeps_completion_order() {
    let db = Database::open_in_memory().unwrap();
    let actions = ActionListManager::new(&db);

    let a = actions.add_item("1", "A", Priority::Medium, "Dr. Johnson").unwrap();
    let b = actions.add_item("1", "B", Priority::Medium, "Dr. Johnson").unwrap();
    actions.toggle_status(&b.id, "Dr. Johnson").unwrap();
    actions.toggle_status(&a.id, "Dr. Johnson").unwrap();

    let done: Vec<String> = actions.list_done("1").unwrap().into_iter().map(|i| i.text).collect();
    assert_eq!(done, vec!["B", "A"]);
}

// =========================================================================
// Contingency plans
// =========================================================================

#[test]
fn test_plan_requires_both_clauses() {
    let db = Database::open_in_memory().unwrap();
    let plans = ContingencyPlanManager::new(&db);

    let no_condition = plans.add_plan(
        "p",
        "",
        "do X",
        Priority::Medium,
        PlanStatus::Planned,
        "Dr. X",
    );
    assert!(matches!(no_condition, Err(WorkflowError::IncompleteCondition { .. })));

    let no_action = plans.add_plan("p", "if Y", "", Priority::Medium, PlanStatus::Planned, "Dr. X");
    assert!(matches!(no_action, Err(WorkflowError::IncompleteCondition { .. })));

    let plan = plans
        .add_plan("p", "if Y", "do X", Priority::Medium, PlanStatus::Planned, "Dr. X")
        .unwrap();
    let listed = plans.list_by_status("p", plan.status).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, plan.id);
    assert!(plans.list_by_status("p", PlanStatus::Active).unwrap().is_empty());
}

#[test]
fn test_plan_status_change_moves_bucket() {
    let db = Database::open_in_memory().unwrap();
    let plans = ContingencyPlanManager::new(&db);

    let plan = plans
        .add_plan("7", "if febrile", "send cultures", Priority::High, PlanStatus::Planned, "Dr. X")
        .unwrap();
    plans.change_status(&plan.id, PlanStatus::Active).unwrap();

    assert!(plans.list_by_status("7", PlanStatus::Planned).unwrap().is_empty());
    assert_eq!(plans.list_by_status("7", PlanStatus::Active).unwrap()[0].id, plan.id);
}

// =========================================================================
// Severity
// =========================================================================

#[test]
fn test_severity_history_appends_in_call_order() {
    let db = Database::open_in_memory().unwrap();
    let severity = SeverityTracker::new(&db);

    severity.set_severity_str("p", "stable", "Dr. Johnson").unwrap();
    severity.set_severity_str("p", "watcher", "Dr. Johnson").unwrap();

    assert_eq!(severity.get_current("p").unwrap().unwrap().value, Severity::Watcher);
    let history = severity.get_history("p").unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].value, Severity::Stable);
    assert_eq!(history[1].value, Severity::Watcher);
    assert!(severity.verify_history("p").unwrap());
}

#[test]
fn test_invalid_severity_leaves_history_untouched() {
    let db = Database::open_in_memory().unwrap();
    let severity = SeverityTracker::new(&db);

    severity.set_severity_str("p", "unstable", "Dr. Johnson").unwrap();
    let result = severity.set_severity_str("p", "moribund", "Dr. Johnson");
    assert!(matches!(result, Err(WorkflowError::InvalidSeverityValue(_))));

    assert_eq!(severity.get_history("p").unwrap().len(), 1);
    assert_eq!(severity.get_current("p").unwrap().unwrap().value, Severity::Unstable);
}

#[test]
fn test_unassessed_patient_has_no_severity() {
    let db = Database::open_in_memory().unwrap();
    let severity = SeverityTracker::new(&db);

    assert!(severity.get_current("never-seen").unwrap().is_none());
    assert!(severity.get_history("never-seen").unwrap().is_empty());
    assert!(severity.verify_history("never-seen").unwrap());
}

// =========================================================================
// Sessions
// =========================================================================

#[test]
fn test_synthesis_without_receiver_keeps_handover_open() {
    let db = Database::open_in_memory().unwrap();
    let controller = SessionController::new(&db);

    let mut session = controller.open_session("dr-johnson", Shift::Day).unwrap();
    controller.begin(&mut session).unwrap();
    controller.complete_setup(&mut session, johnson_setup(&["1"])).unwrap();
    controller.start_handover(&mut session, None).unwrap();

    let nobody: Vec<Presence> = Vec::new();
    let result = controller.confirm_synthesis(
        &mut session,
        "dr-lee",
        &nobody,
        Duration::from_secs(1),
    );
    assert!(matches!(result, Err(WorkflowError::NoReceiver { .. })));
    assert_eq!(session.state, SessionState::HandoverInProgress);
    assert_eq!(
        controller.load_session(&session.id).unwrap().state,
        SessionState::HandoverInProgress
    );
}

#[test]
fn test_self_handover_rejected() {
    let db = Database::open_in_memory().unwrap();
    let controller = SessionController::new(&db);

    let mut session = controller.open_session("dr-johnson", Shift::Day).unwrap();
    controller.begin(&mut session).unwrap();
    controller.complete_setup(&mut session, johnson_setup(&[])).unwrap();
    controller.start_handover(&mut session, None).unwrap();

    let only_me = vec![Presence::now(
        session.id.clone(),
        "dr-johnson".into(),
        PresenceRole::Receiving,
    )];
    let result = controller.confirm_synthesis(
        &mut session,
        "dr-johnson",
        &only_me,
        Duration::from_secs(1),
    );
    assert!(matches!(result, Err(WorkflowError::NoReceiver { .. })));
}

#[test]
fn test_full_shift_lifecycle() {
    let db = Database::open_in_memory().unwrap();
    let controller = SessionController::new(&db);

    let mut session = controller.open_session("dr-johnson", Shift::Day).unwrap();
    assert_eq!(session.state, SessionState::NotStarted);

    controller.begin(&mut session).unwrap();
    controller.complete_setup(&mut session, johnson_setup(&["1", "2"])).unwrap();
    controller.start_handover(&mut session, None).unwrap();
    controller.close_handover(&mut session).unwrap();
    controller.start_handover(&mut session, None).unwrap();

    let present = vec![Presence::now(session.id.clone(), "dr-lee".into(), PresenceRole::Receiving)];
    controller
        .confirm_synthesis(&mut session, "dr-lee", &present, Duration::from_secs(1))
        .unwrap();

    assert_eq!(session.state, SessionState::Completed);
    let stored = controller.load_session(&session.id).unwrap();
    assert_eq!(stored, session);

    // Completed sessions accept no further transitions
    assert!(controller.cancel(&mut session).is_err());
    assert!(controller.close_handover(&mut session).is_err());
}

// =========================================================================
// Cross-manager workflows
// =========================================================================

#[test]
fn test_user_item_add_toggle_delete() {
    let db = Database::open_in_memory().unwrap();
    let controller = SessionController::new(&db);
    let actions = ActionListManager::new(&db);

    let mut session = controller.open_session("dr-johnson", Shift::Day).unwrap();
    controller.begin(&mut session).unwrap();
    controller.complete_setup(&mut session, johnson_setup(&["1"])).unwrap();
    assert_eq!(session.state, SessionState::Active);

    actions.add_item("1", "Earlier task", Priority::Low, "Dr. Johnson").unwrap();
    let item = actions.add_item("1", "Check O2 sat", Priority::High, "Dr. Johnson").unwrap();
    assert_eq!(actions.list_pending("1").unwrap()[0].id, item.id);

    actions.toggle_status(&item.id, "Dr. Johnson").unwrap();
    assert!(actions.list_pending("1").unwrap().iter().all(|i| i.id != item.id));
    assert!(actions.list_done("1").unwrap().iter().any(|i| i.id == item.id));

    assert!(actions.delete_item(&item.id, "Dr. Johnson").unwrap());
    assert!(actions.list_all("1").unwrap().iter().all(|i| i.id != item.id));
}

#[test]
fn test_carried_over_item_survives_delete() {
    let db = Database::open_in_memory().unwrap();
    let actions = ActionListManager::new(&db);

    let item = actions
        .carry_over(
            "1",
            "Follow up culture",
            Priority::Medium,
            "Dr. Night",
            None,
            TaskStatus::Pending,
        )
        .unwrap();

    assert!(!actions.delete_item(&item.id, "Dr. Johnson").unwrap());
    assert!(pending_texts(&actions, "1").contains(&"Follow up culture".to_string()));
}

#[test]
fn test_new_active_plan_listed_first() {
    let db = Database::open_in_memory().unwrap();
    let plans = ContingencyPlanManager::new(&db);

    plans
        .add_plan("7", "if HR > 180", "call fellow", Priority::Medium, PlanStatus::Active, "Dr. X")
        .unwrap();
    let plan = plans
        .add_plan(
            "7",
            "if SpO2 < 92%",
            "increase O2 to 4L",
            Priority::High,
            PlanStatus::Active,
            "Dr. X",
        )
        .unwrap();

    let active = plans.list_by_status("7", PlanStatus::Active).unwrap();
    assert_eq!(active[0].id, plan.id);
    assert_eq!(active[0].rule_text(), "IF if SpO2 < 92% THEN increase O2 to 4L");
}

// =========================================================================
// Partition totality
// =========================================================================

#[derive(Debug, Clone)]
enum Op {
    Add,
    CarryOver(bool),
    Toggle(usize),
    Delete(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => Just(Op::Add),
        1 => any::<bool>().prop_map(Op::CarryOver),
        3 => any::<usize>().prop_map(Op::Toggle),
        2 => any::<usize>().prop_map(Op::Delete),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn test_pending_done_partition_is_total(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let db = Database::open_in_memory().unwrap();
        let actions = ActionListManager::new(&db);
        // id -> (status, carried over)
        let mut model: HashMap<String, (TaskStatus, bool)> = HashMap::new();
        // every id ever created, so deletes can target removed items too
        let mut ids: Vec<String> = Vec::new();

        for (n, op) in ops.into_iter().enumerate() {
            match op {
                Op::Add => {
                    let item = actions.add_item(
                        "p",
                        &format!("task {}", n),
                        Priority::Medium,
                        "Dr. A",
                    )
                    .unwrap();
                    model.insert(item.id.clone(), (TaskStatus::Pending, false));
                    ids.push(item.id);
                }
                Op::CarryOver(done) => {
                    let status = if done { TaskStatus::Done } else { TaskStatus::Pending };
                    let item = actions
                        .carry_over(
                            "p",
                            &format!("prior {}", n),
                            Priority::Low,
                            "Dr. B",
                            None,
                            status,
                        )
                        .unwrap();
                    model.insert(item.id.clone(), (status, true));
                    ids.push(item.id);
                }
                Op::Toggle(pick) => {
                    if ids.is_empty() {
                        continue;
                    }
                    let id = &ids[pick % ids.len()];
                    match model.get_mut(id) {
                        Some((status, carried)) => {
                            let item = actions.toggle_status(id, "Dr. A").unwrap();
                            if !*carried {
                                *status = status.flipped();
                            }
                            prop_assert_eq!(item.status, *status);
                        }
                        None => {
                            let is_not_found = matches!(
                                actions.toggle_status(id, "Dr. A"),
                                Err(WorkflowError::NotFound { .. })
                            );
                            prop_assert!(is_not_found);
                        }
                    }
                }
                Op::Delete(pick) => {
                    if ids.is_empty() {
                        continue;
                    }
                    let id = ids[pick % ids.len()].clone();
                    let removed = actions.delete_item(&id, "Dr. A").unwrap();
                    let expected = matches!(model.get(&id), Some((_, false)));
                    prop_assert_eq!(removed, expected);
                    if removed {
                        model.remove(&id);
                    }
                }
            }

            let pending = actions.list_pending("p").unwrap();
            let done = actions.list_done("p").unwrap();
            let pending_ids: HashSet<&str> = pending.iter().map(|i| i.id.as_str()).collect();
            let done_ids: HashSet<&str> = done.iter().map(|i| i.id.as_str()).collect();

            prop_assert!(pending_ids.is_disjoint(&done_ids));
            prop_assert_eq!(pending_ids.len() + done_ids.len(), model.len());
            for (id, (status, _)) in &model {
                let in_pending = pending_ids.contains(id.as_str());
                prop_assert_eq!(in_pending, *status == TaskStatus::Pending);
                prop_assert!(in_pending || done_ids.contains(id.as_str()));
            }
        }
    }
}
