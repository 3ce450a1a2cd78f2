//! Tests for the host-facing `HandoverCore` API.

use ipass_handover_core::{
    open_database, open_database_in_memory, open_with_config, FfiDailySetup, FfiPatient,
    HandoverError,
};

fn patient(id: &str, name: &str) -> FfiPatient {
    FfiPatient {
        id: id.to_string(),
        name: name.to_string(),
        age: Some(7),
        room: Some("12B".to_string()),
        mrn: format!("MRN-{}", id),
        unit: "picu".to_string(),
        assigned_physician: Some("dr-johnson".to_string()),
        receiving_physician: None,
    }
}

fn day_setup(patient_ids: &[&str]) -> FfiDailySetup {
    FfiDailySetup {
        doctor_name: "Dr. Johnson".to_string(),
        unit: "picu".to_string(),
        shift: "day".to_string(),
        patient_ids: patient_ids.iter().map(|p| p.to_string()).collect(),
    }
}

#[test]
fn test_action_items_through_api() {
    let core = open_database_in_memory().unwrap();

    let item = core
        .add_action_item(
            "1".into(),
            "Check O2 sat".into(),
            "high".into(),
            "Dr. Johnson".into(),
            None,
        )
        .unwrap();
    assert!(!item.done);
    assert!(!item.read_only);

    let toggled = core
        .toggle_action_item(item.id.clone(), "Dr. Johnson".into(), Some(item.version))
        .unwrap();
    assert!(toggled.done);
    assert_eq!(core.list_done_actions("1".into()).unwrap().len(), 1);

    // Replaying the same version is a stale write
    let stale = core.toggle_action_item(item.id.clone(), "Dr. Lee".into(), Some(item.version));
    assert!(matches!(stale, Err(HandoverError::Conflict { .. })));

    assert!(core.delete_action_item(item.id, "Dr. Johnson".into()).unwrap());
    assert!(core.list_done_actions("1".into()).unwrap().is_empty());
}

#[test]
fn test_carried_over_item_read_only_through_api() {
    let core = open_database_in_memory().unwrap();

    let item = core
        .carry_over_action_item(
            "1".into(),
            "Follow up culture".into(),
            "medium".into(),
            "Dr. Night".into(),
            Some("AM".into()),
            false,
        )
        .unwrap();
    assert!(item.read_only);

    assert!(!core.delete_action_item(item.id.clone(), "Dr. Johnson".into()).unwrap());
    let after = core.toggle_action_item(item.id, "Dr. Johnson".into(), None).unwrap();
    assert!(!after.done);
    assert_eq!(core.list_pending_actions("1".into()).unwrap().len(), 1);
}

#[test]
fn test_bad_enum_strings_rejected() {
    let core = open_database_in_memory().unwrap();

    let result = core.add_action_item(
        "1".into(),
        "A".into(),
        "urgent".into(),
        "Dr. Johnson".into(),
        None,
    );
    assert!(matches!(
        result,
        Err(HandoverError::Validation { ref field, .. }) if field == "priority"
    ));

    let result = core.set_severity("1".into(), "moribund".into(), "Dr. Johnson".into());
    assert!(matches!(
        result,
        Err(HandoverError::Validation { ref kind, .. }) if kind == "invalid_severity_value"
    ));

    let result = core.open_session("dr-johnson".into(), "graveyard".into());
    assert!(matches!(result, Err(HandoverError::Validation { ref field, .. }) if field == "shift"));
}

#[test]
fn test_plans_through_api() {
    let core = open_database_in_memory().unwrap();

    let result = core.add_contingency_plan(
        "7".into(),
        "".into(),
        "do X".into(),
        "high".into(),
        "active".into(),
        "Dr. X".into(),
    );
    assert!(matches!(
        result,
        Err(HandoverError::Validation { ref kind, .. }) if kind == "incomplete_condition"
    ));

    let plan = core
        .add_contingency_plan(
            "7".into(),
            "if SpO2 < 92%".into(),
            "increase O2 to 4L".into(),
            "high".into(),
            "active".into(),
            "Dr. X".into(),
        )
        .unwrap();
    let active = core.list_plans_by_status("7".into(), "active".into()).unwrap();
    assert_eq!(active[0].id, plan.id);

    let planned = core.change_plan_status(plan.id.clone(), "planned".into(), None).unwrap();
    assert_eq!(planned.status, "planned");
    assert!(core.delete_contingency_plan(plan.id).unwrap());
}

#[test]
fn test_severity_through_api() {
    let core = open_database_in_memory().unwrap();

    assert!(core.current_severity("1".into()).unwrap().is_none());
    core.set_severity("1".into(), "stable".into(), "Dr. Johnson".into()).unwrap();
    core.set_severity("1".into(), "guarded".into(), "Dr. Johnson".into()).unwrap();

    let current = core.current_severity("1".into()).unwrap().unwrap();
    assert_eq!(current.value, "watcher");
    assert_eq!(core.severity_history("1".into()).unwrap().len(), 2);
    assert!(core.verify_severity_history("1".into()).unwrap());
}

#[test]
fn test_session_lifecycle_through_api() {
    let core = open_database_in_memory().unwrap();
    core.register_patient(patient("1", "Ana Lima")).unwrap();
    core.register_patient(patient("2", "Ben Ortiz")).unwrap();

    let session = core.open_session("dr-johnson".into(), "day".into()).unwrap();
    assert_eq!(session.state, "not_started");

    let session = core.begin_session(session.id).unwrap();
    assert_eq!(session.state, "daily_setup_pending");

    let session = core.complete_setup(session.id, day_setup(&["1", "2"])).unwrap();
    assert_eq!(session.state, "active");
    assert_eq!(session.patient_ids, vec!["1", "2"]);

    let baseline = core.change_setup(session.id.clone()).unwrap().unwrap();
    assert_eq!(baseline.patient_ids, vec!["1", "2"]);
    let session = core.complete_setup(session.id, baseline).unwrap();

    let session = core.start_handover(session.id, Some("1".into())).unwrap();
    assert_eq!(session.handover_patient_id.as_deref(), Some("1"));

    // Receiver has not joined yet
    let result = core.confirm_synthesis(session.id.clone(), "dr-lee".into());
    assert!(matches!(
        result,
        Err(HandoverError::InvalidState { ref kind, session_id: Some(ref sid), .. })
            if kind == "no_receiver" && *sid == session.id
    ));

    core.record_presence(session.id.clone(), "dr-lee".into(), "receiving".into())
        .unwrap();
    let session = core.confirm_synthesis(session.id, "dr-lee".into()).unwrap();
    assert!(session.completed);
    assert_eq!(session.receiving_clinician.as_deref(), Some("dr-lee"));

    let result = core.cancel_session(session.id.clone());
    assert!(matches!(
        result,
        Err(HandoverError::InvalidState { ref kind, session_id: Some(_), .. })
            if kind == "invalid_transition"
    ));
}

#[test]
fn test_unknown_session_not_found() {
    let core = open_database_in_memory().unwrap();
    let result = core.begin_session("missing".into());
    assert!(matches!(
        result,
        Err(HandoverError::NotFound { ref entity, .. }) if entity == "handover_session"
    ));
}

#[test]
fn test_report_json_scoped_to_handover_patient() {
    let core = open_database_in_memory().unwrap();
    core.register_patient(patient("1", "Ana Lima")).unwrap();
    core.register_patient(patient("2", "Ben Ortiz")).unwrap();
    core.add_action_item(
        "1".into(),
        "Check O2 sat".into(),
        "high".into(),
        "Dr. Johnson".into(),
        None,
    )
    .unwrap();
    core.set_severity("2".into(), "critical".into(), "Dr. Johnson".into()).unwrap();

    let session = core.open_session("dr-johnson".into(), "day".into()).unwrap();
    let session = core.begin_session(session.id).unwrap();
    let session = core.complete_setup(session.id, day_setup(&["1", "2"])).unwrap();

    let json = core.export_handover_report_json(session.id.clone()).unwrap();
    let report: serde_json::Value = serde_json::from_str(&json).unwrap();
    let unscoped = report["patients"].as_array().unwrap();
    assert_eq!(unscoped.len(), 2);
    // Critical patient first, unassessed one after
    assert_eq!(unscoped[0]["patient_id"], "2");
    assert_eq!(unscoped[1]["patient_id"], "1");
    assert_eq!(unscoped[1]["open_high_priority"], 1);

    let session = core.start_handover(session.id, Some("1".into())).unwrap();
    let json = core.export_handover_report_json(session.id).unwrap();
    let report: serde_json::Value = serde_json::from_str(&json).unwrap();
    let patients = report["patients"].as_array().unwrap();
    assert_eq!(patients.len(), 1);
    assert_eq!(patients[0]["patient_id"], "1");
    assert_eq!(patients[0]["pending_actions"][0]["text"], "Check O2 sat");
}

#[test]
fn test_records_persist_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("handover.db").to_string_lossy().to_string();

    {
        let core = open_database(path.clone()).unwrap();
        core.add_action_item(
            "1".into(),
            "Recheck lytes".into(),
            "low".into(),
            "Dr. Johnson".into(),
            None,
        )
        .unwrap();
    }

    let core = open_database(path).unwrap();
    let pending = core.list_pending_actions("1".into()).unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].text, "Recheck lytes");
}

#[test]
fn test_open_with_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("configured.db");
    let config_path = dir.path().join("handover.toml");
    std::fs::write(
        &config_path,
        format!(
            "[database]\npath = {:?}\n\n[presence]\ntimeout_ms = 1000\n",
            db_path.to_string_lossy()
        ),
    )
    .unwrap();

    let core = open_with_config(config_path.to_string_lossy().to_string()).unwrap();
    core.open_session("dr-johnson".into(), "night".into()).unwrap();
    assert!(db_path.exists());

    std::fs::write(&config_path, "[presence]\ntimeout_ms = 0\n").unwrap();
    let result = open_with_config(config_path.to_string_lossy().to_string());
    assert!(matches!(result, Err(HandoverError::ConfigError(_))));
}
