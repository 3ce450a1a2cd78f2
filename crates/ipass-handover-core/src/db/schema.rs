//! SQLite schema definition.

/// Complete database schema for the handover engine.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Patient Directory (populated by the host; read-only to the engine)
-- ============================================================================

CREATE TABLE IF NOT EXISTS patients (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    age INTEGER,
    room TEXT,
    mrn TEXT NOT NULL,
    unit TEXT NOT NULL,
    assigned_physician TEXT,
    receiving_physician TEXT
);

CREATE INDEX IF NOT EXISTS idx_patients_unit ON patients(unit);

-- ============================================================================
-- Action Items (Upsert-oriented)
-- ============================================================================

-- order_seq is bumped whenever an item enters a partition:
-- pending lists order_seq DESC (newest first), done lists order_seq ASC.
CREATE TABLE IF NOT EXISTS action_items (
    id TEXT PRIMARY KEY,
    patient_id TEXT NOT NULL,
    text TEXT NOT NULL CHECK (length(trim(text)) > 0),
    priority TEXT NOT NULL CHECK (priority IN ('high', 'medium', 'low')),
    status TEXT NOT NULL CHECK (status IN ('pending', 'done')),
    author TEXT NOT NULL,
    due_hint TEXT,
    provenance TEXT NOT NULL CHECK (provenance IN ('system_of_record', 'user_authored')),
    version INTEGER NOT NULL DEFAULT 1,
    order_seq INTEGER NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_action_items_patient ON action_items(patient_id, status, order_seq);

-- Provenance is write-once
CREATE TRIGGER IF NOT EXISTS action_items_provenance_immutable
BEFORE UPDATE OF provenance ON action_items
WHEN new.provenance != old.provenance
BEGIN
    SELECT RAISE(ABORT, 'Provenance cannot change');
END;

-- Carried-over items keep their content and status, and are never deleted
CREATE TRIGGER IF NOT EXISTS action_items_carried_over_fixed
BEFORE UPDATE OF text, priority, status, due_hint ON action_items
WHEN old.provenance = 'system_of_record'
BEGIN
    SELECT RAISE(ABORT, 'Carried-over action items are read-only');
END;

CREATE TRIGGER IF NOT EXISTS action_items_carried_over_no_delete BEFORE DELETE ON action_items
WHEN old.provenance = 'system_of_record'
BEGIN
    SELECT RAISE(ABORT, 'Carried-over action items cannot be deleted');
END;

-- ============================================================================
-- Contingency Plans (Upsert-oriented)
-- ============================================================================

CREATE TABLE IF NOT EXISTS contingency_plans (
    id TEXT PRIMARY KEY,
    patient_id TEXT NOT NULL,
    condition TEXT NOT NULL CHECK (length(trim(condition)) > 0),
    action TEXT NOT NULL CHECK (length(trim(action)) > 0),
    priority TEXT NOT NULL CHECK (priority IN ('high', 'medium', 'low')),
    status TEXT NOT NULL CHECK (status IN ('planned', 'active')),
    author TEXT NOT NULL,
    provenance TEXT NOT NULL CHECK (provenance IN ('system_of_record', 'user_authored')),
    version INTEGER NOT NULL DEFAULT 1,
    order_seq INTEGER NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_contingency_patient
    ON contingency_plans(patient_id, status, order_seq);

CREATE TRIGGER IF NOT EXISTS contingency_plans_provenance_immutable
BEFORE UPDATE OF provenance ON contingency_plans
WHEN new.provenance != old.provenance
BEGIN
    SELECT RAISE(ABORT, 'Provenance cannot change');
END;

-- Carried-over plans may change status but not content
CREATE TRIGGER IF NOT EXISTS contingency_plans_carried_over_fixed
BEFORE UPDATE OF condition, action, priority ON contingency_plans
WHEN old.provenance = 'system_of_record'
BEGIN
    SELECT RAISE(ABORT, 'Carried-over contingency plans are read-only');
END;

CREATE TRIGGER IF NOT EXISTS contingency_plans_carried_over_no_delete
BEFORE DELETE ON contingency_plans
WHEN old.provenance = 'system_of_record'
BEGIN
    SELECT RAISE(ABORT, 'Carried-over contingency plans cannot be deleted');
END;

-- ============================================================================
-- Severity Assessments (Append-Only - Immutable after creation)
-- ============================================================================

CREATE TABLE IF NOT EXISTS severity_assessments (
    id TEXT PRIMARY KEY,
    patient_id TEXT NOT NULL,
    value TEXT NOT NULL CHECK (value IN ('stable', 'watcher', 'unstable', 'critical')),
    set_by TEXT NOT NULL,
    recorded_at TEXT NOT NULL,
    seq INTEGER NOT NULL,
    prev_hash TEXT NOT NULL,
    hash TEXT NOT NULL,
    UNIQUE (patient_id, seq)
);

CREATE TRIGGER IF NOT EXISTS severity_assessments_no_update BEFORE UPDATE ON severity_assessments
BEGIN
    SELECT RAISE(ABORT, 'Severity assessments are append-only');
END;

CREATE TRIGGER IF NOT EXISTS severity_assessments_no_delete BEFORE DELETE ON severity_assessments
BEGIN
    SELECT RAISE(ABORT, 'Severity assessments are append-only');
END;

-- ============================================================================
-- Daily Setup (one per clinician per shift, replaced wholesale)
-- ============================================================================

CREATE TABLE IF NOT EXISTS daily_setups (
    clinician TEXT NOT NULL,
    shift TEXT NOT NULL CHECK (shift IN ('day', 'evening', 'night')),
    doctor_name TEXT NOT NULL,
    unit TEXT NOT NULL,
    patient_ids TEXT NOT NULL DEFAULT '[]',       -- JSON array of patient IDs
    updated_at TEXT NOT NULL,
    PRIMARY KEY (clinician, shift)
);

-- ============================================================================
-- Handover Sessions
-- ============================================================================

CREATE TABLE IF NOT EXISTS handover_sessions (
    id TEXT PRIMARY KEY,
    assigned_clinician TEXT NOT NULL,
    shift TEXT NOT NULL CHECK (shift IN ('day', 'evening', 'night')),
    state TEXT NOT NULL,
    patient_ids TEXT NOT NULL DEFAULT '[]',       -- JSON array of patient IDs
    receiving_clinician TEXT,
    handover_patient_id TEXT,
    version INTEGER NOT NULL DEFAULT 1,
    started_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_sessions_clinician ON handover_sessions(assigned_clinician, state);

-- ============================================================================
-- Collaboration Presence (heartbeats from the transport layer)
-- ============================================================================

CREATE TABLE IF NOT EXISTS presence (
    session_id TEXT NOT NULL,
    clinician_id TEXT NOT NULL,
    role TEXT NOT NULL CHECK (role IN ('assigned', 'receiving', 'observer')),
    last_seen TEXT NOT NULL,
    PRIMARY KEY (session_id, clinician_id)
);
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_schema_valid() {
        let conn = Connection::open_in_memory().unwrap();
        let result = conn.execute_batch(SCHEMA);
        assert!(result.is_ok(), "Schema should be valid SQL: {:?}", result);
    }

    #[test]
    fn test_schema_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        assert!(conn.execute_batch(SCHEMA).is_ok());
    }

    #[test]
    fn test_provenance_write_once() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();

        conn.execute(
            r#"INSERT INTO action_items (id, patient_id, text, priority, status, author,
               provenance, order_seq, created_at, updated_at)
               VALUES ('a1', 'p1', 'Follow up culture', 'medium', 'pending', 'Dr. Prior',
               'system_of_record', 1, 'now', 'now')"#,
            [],
        )
        .unwrap();

        let result = conn.execute(
            "UPDATE action_items SET provenance = 'user_authored' WHERE id = 'a1'",
            [],
        );
        assert!(result.is_err());

        // Other columns stay writable
        let result = conn.execute("UPDATE action_items SET version = 2 WHERE id = 'a1'", []);
        assert!(result.is_ok());
    }

    #[test]
    fn test_blank_text_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();

        let result = conn.execute(
            r#"INSERT INTO contingency_plans (id, patient_id, condition, action, priority, status,
               author, provenance, order_seq, created_at, updated_at)
               VALUES ('c1', 'p1', '   ', 'do X', 'high', 'planned', 'Dr. X',
               'user_authored', 1, 'now', 'now')"#,
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_severity_append_only() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();

        conn.execute(
            r#"INSERT INTO severity_assessments (id, patient_id, value, set_by, recorded_at,
               seq, prev_hash, hash) VALUES ('s1', 'p1', 'stable', 'Dr. A', 'now', 1, 'g', 'h')"#,
            [],
        )
        .unwrap();

        let update = conn.execute(
            "UPDATE severity_assessments SET value = 'critical' WHERE id = 's1'",
            [],
        );
        assert!(update.is_err());

        let delete = conn.execute("DELETE FROM severity_assessments WHERE id = 's1'", []);
        assert!(delete.is_err());
    }
}
