//! Integration tests for the access layer
//!
//! These tests drive the public API end to end:
//! - Transaction scopes committing, rolling back and unwinding
//! - Reusing a prepared statement across bind/step/reset cycles
//! - Row mapping and typed column extraction
//! - Named parameter policies
//! - File-backed databases and JSON configuration

use rust_sqlite_access::facade::{DbConnect, QueryResults};
use rust_sqlite_access::prelude::*;

fn count(conn: &Connection, table: &str) -> i64 {
    let mut stmt = conn
        .prepare(&format!("SELECT COUNT(*) FROM {}", table))
        .expect("Failed to prepare count");
    stmt.column::<i64>(0).expect("Count failed")[0]
}

fn players() -> Connection {
    let conn = Connection::open_in_memory().expect("Failed to open");
    conn.execute("CREATE TABLE players (id INTEGER PRIMARY KEY, name TEXT)")
        .expect("Failed to create table");
    conn
}

#[derive(Debug, PartialEq)]
struct Player {
    id: i64,
    name: String,
}

// ============================================================================
// Transactions
// ============================================================================

#[test]
fn test_transaction_rollback_discards_inserts() {
    let conn = players();

    let tx = TransactionGuard::begin(&conn).expect("Failed to begin");
    conn.execute("INSERT INTO players (name) VALUES ('a')").unwrap();
    conn.execute("INSERT INTO players (name) VALUES ('b')").unwrap();
    tx.rollback().expect("Rollback failed");

    assert_eq!(count(&conn, "players"), 0);
}

#[test]
fn test_unresolved_scope_leaves_database_unchanged() {
    let conn = players();
    conn.execute("INSERT INTO players (name) VALUES ('kept')").unwrap();

    {
        let _tx = TransactionGuard::begin(&conn).unwrap();
        let mut insert = conn.prepare("INSERT INTO players (name) VALUES (?)").unwrap();
        for name in ["x", "y", "z"] {
            insert.bind(1, name).unwrap();
            insert.execute().unwrap();
        }
        conn.execute("DELETE FROM players WHERE name = 'kept'").unwrap();
        assert_eq!(count(&conn, "players"), 3);
    }

    assert!(conn.is_autocommit());
    let mut names = conn.prepare("SELECT name FROM players").unwrap();
    assert_eq!(names.column::<String>(0).unwrap(), vec!["kept"]);
}

#[test]
fn test_scope_rolls_back_during_unwind() {
    let conn = players();

    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let _tx = TransactionGuard::begin(&conn).unwrap();
        conn.execute("INSERT INTO players (name) VALUES ('lost')").unwrap();
        panic!("boom");
    }));

    assert!(outcome.is_err());
    assert!(conn.is_autocommit());
    assert_eq!(count(&conn, "players"), 0);
}

#[test]
fn test_commit_persists_and_closure_helper() {
    let conn = players();

    let tx = TransactionGuard::begin_with(&conn, TransactionBehavior::Immediate).unwrap();
    tx.execute("INSERT INTO players (name) VALUES ('a')").unwrap();
    tx.commit().unwrap();
    assert_eq!(count(&conn, "players"), 1);

    let result: Result<()> = conn.transaction(|c| {
        c.execute("INSERT INTO players (name) VALUES ('b')")?;
        c.execute("INSERT INTO players (id, name) VALUES (1, 'duplicate')")
    });
    let err = result.unwrap_err();
    assert!(err.is_constraint_violation());
    assert_eq!(count(&conn, "players"), 1);
}

// ============================================================================
// Statement reuse
// ============================================================================

#[test]
fn test_rebind_after_reset_inserts_in_order() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute("CREATE TABLE t (v TEXT)").unwrap();

    let mut insert = conn.prepare("INSERT INTO t VALUES (:v)").unwrap();
    insert.bind_named(":v", "a").unwrap();
    assert!(!insert.step().unwrap());
    assert_eq!(insert.state(), CursorState::Exhausted);
    insert.reset();
    insert.bind_named(":v", "b").unwrap();
    assert!(!insert.step().unwrap());
    insert.reset();

    let mut select = conn.prepare("SELECT v FROM t ORDER BY rowid").unwrap();
    assert_eq!(select.column::<String>(0).unwrap(), vec!["a", "b"]);
}

#[test]
fn test_exhausted_cursor_stays_exhausted_until_reset() {
    let conn = players();
    conn.execute("INSERT INTO players (name) VALUES ('a')").unwrap();

    let mut stmt = conn.prepare("SELECT name FROM players").unwrap();
    assert!(stmt.step().unwrap());
    assert_eq!(stmt.state(), CursorState::HasRow);
    assert!(!stmt.step().unwrap());
    assert!(!stmt.step().unwrap());
    assert_eq!(stmt.state(), CursorState::Exhausted);

    stmt.reset();
    stmt.reset();
    assert_eq!(stmt.state(), CursorState::Ready);
    assert!(stmt.step().unwrap());
    assert_eq!(stmt.get_text(0), "a");
}

#[test]
fn test_bind_rejected_mid_iteration() {
    let conn = players();
    conn.execute("INSERT INTO players (name) VALUES ('a'), ('b')").unwrap();

    let mut stmt = conn.prepare("SELECT name FROM players WHERE id > ?").unwrap();
    stmt.bind(1, 0).unwrap();
    assert!(stmt.step().unwrap());
    let err = stmt.bind(1, 1).unwrap_err();
    assert!(matches!(err, DatabaseError::BindError { .. }));

    stmt.reset();
    stmt.bind(1, 1).unwrap();
    assert_eq!(stmt.column::<String>(0).unwrap(), vec!["b"]);
}

// ============================================================================
// Row mapping
// ============================================================================

#[test]
fn test_column_extracts_in_cursor_order() {
    let conn = players();
    conn.execute("INSERT INTO players (id, name) VALUES (1, 'a'), (2, 'b'), (3, 'c')")
        .unwrap();

    let mut stmt = conn.prepare("SELECT id FROM players ORDER BY id").unwrap();
    assert_eq!(stmt.column::<i64>(0).unwrap(), vec![1, 2, 3]);
    assert_eq!(stmt.state(), CursorState::Ready);
    assert_eq!(stmt.column::<i64>(0).unwrap(), vec![1, 2, 3]);
}

#[test]
fn test_for_each_row_visits_every_row_then_ready() {
    let conn = players();
    let mut insert = conn.prepare("INSERT INTO players (name) VALUES (?)").unwrap();
    for i in 0..25 {
        insert.bind(1, format!("p{}", i)).unwrap();
        insert.execute().unwrap();
    }

    let mut stmt = conn.prepare("SELECT name FROM players").unwrap();
    let mut calls = 0;
    let visited = stmt
        .for_each_row(|_| {
            calls += 1;
            Ok(())
        })
        .unwrap();

    assert_eq!(calls, 25);
    assert_eq!(visited, 25);
    assert_eq!(stmt.state(), CursorState::Ready);
}

#[test]
fn test_map_rows_matches_manual_iteration() {
    let conn = players();
    conn.execute("INSERT INTO players (name) VALUES ('Alice'), ('Bob'), (NULL)")
        .unwrap();

    let mut stmt = conn.prepare("SELECT id, name FROM players ORDER BY id").unwrap();
    let mapped = stmt
        .map_rows(|row| {
            Ok(Player {
                id: row.get_int(0),
                name: row.get_text(1),
            })
        })
        .unwrap();

    let mut manual = Vec::new();
    while stmt.step().unwrap() {
        manual.push(Player {
            id: stmt.get_int(0),
            name: stmt.get_text(1),
        });
    }
    stmt.reset();

    assert_eq!(mapped, manual);
    assert_eq!(mapped[2].name, "");
}

#[test]
fn test_mapper_error_stops_and_resets() {
    let conn = players();
    conn.execute("INSERT INTO players (name) VALUES ('a'), ('b'), ('c')")
        .unwrap();

    let mut stmt = conn.prepare("SELECT name FROM players ORDER BY id").unwrap();
    let mut seen = Vec::new();
    let err = stmt
        .for_each_row(|row| {
            let name = row.get_text(0);
            if name == "b" {
                return Err(DatabaseError::config("stop at b"));
            }
            seen.push(name);
            Ok(())
        })
        .unwrap_err();

    assert_eq!(err.message(), "stop at b");
    assert_eq!(seen, vec!["a"]);
    assert_eq!(stmt.state(), CursorState::Ready);
}

#[test]
fn test_query_map_is_lazy() {
    let conn = players();
    conn.execute("INSERT INTO players (name) VALUES ('a'), ('b'), ('c')")
        .unwrap();

    let mut stmt = conn.prepare("SELECT name FROM players ORDER BY id").unwrap();
    let first_two: Vec<String> = stmt
        .query_map(|row| Ok(row.get_text(0)))
        .take(2)
        .collect::<Result<_>>()
        .unwrap();

    assert_eq!(first_two, vec!["a", "b"]);
    assert_eq!(stmt.state(), CursorState::Ready);
}

// ============================================================================
// Named parameters
// ============================================================================

#[test]
fn test_unknown_named_parameter_policies() {
    let conn = players();

    let mut stmt = conn.prepare("SELECT * FROM players WHERE name = :name").unwrap();
    let err = stmt.bind_named(":nope", "x").unwrap_err();
    assert!(matches!(err, DatabaseError::UnknownParameter(_)));

    stmt.set_unknown_parameter_policy(UnknownParameterPolicy::Ignore);
    assert!(stmt.bind_named(":nope", "x").is_ok());
    assert_eq!(stmt.execute().unwrap(), 0);
}

#[test]
fn test_named_and_positional_share_indices() {
    let conn = Connection::open_in_memory().unwrap();
    let mut stmt = conn.prepare("SELECT :a + :b, :a").unwrap();

    assert_eq!(stmt.parameter_count(), 2);
    assert_eq!(stmt.parameter_index(":a"), Some(1));
    assert_eq!(stmt.parameter_index(":b"), Some(2));

    stmt.bind(1, 10).unwrap();
    stmt.bind_named(":b", 5).unwrap();
    let sums = stmt.map_rows(|row| Ok((row.get_int(0), row.get_int(1)))).unwrap();
    assert_eq!(sums, vec![(15, 10)]);
}

// ============================================================================
// Files and configuration
// ============================================================================

#[test]
fn test_file_database_persists_across_connections() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("fleet.db");

    {
        let conn = Connection::open(&path).unwrap();
        conn.execute("CREATE TABLE ships (id INTEGER PRIMARY KEY, type TEXT, speed REAL)")
            .unwrap();
        let tx = TransactionGuard::begin(&conn).unwrap();
        let mut insert = conn.prepare("INSERT INTO ships (type, speed) VALUES (?1, ?2)").unwrap();
        insert.bind_values([DatabaseValue::from("frigate"), DatabaseValue::from(12.5)]).unwrap();
        insert.execute().unwrap();
        drop(insert);
        tx.commit().unwrap();
        conn.close().unwrap();
    }

    let conn = Connection::open(&path).unwrap();
    let mut stmt = conn.prepare("SELECT speed FROM ships").unwrap();
    assert_eq!(stmt.column::<f64>(0).unwrap(), vec![12.5]);
}

#[test]
fn test_read_only_connection_rejects_writes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ro.db");
    Connection::open(&path)
        .unwrap()
        .execute("CREATE TABLE t (x INTEGER)")
        .unwrap();

    let config = ConnectionBuilder::new()
        .path(path.to_string_lossy())
        .read_only(true)
        .build()
        .unwrap();
    let conn = Connection::open_with_config(&config).unwrap();

    assert!(conn.table_exists("t").unwrap());
    let err = conn.execute("INSERT INTO t VALUES (1)").unwrap_err();
    assert!(matches!(err, DatabaseError::ExecutionError { .. }));
}

#[test]
fn test_config_from_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("configured.db");
    let config_path = dir.path().join("db.json");
    let json = serde_json::json!({
        "path": db_path.to_string_lossy(),
        "busy_timeout_ms": 250,
        "unknown_parameter": "ignore",
    });
    std::fs::write(&config_path, json.to_string()).unwrap();

    let config = ConnectionConfig::from_json_file(&config_path).unwrap();
    assert_eq!(config.unknown_parameter, UnknownParameterPolicy::Ignore);
    assert!(config.foreign_keys);

    let conn = Connection::open_with_config(&config).unwrap();
    let mut stmt = conn.prepare("SELECT :x").unwrap();
    assert!(stmt.bind_named(":y", 1).is_ok());
}

#[test]
fn test_facade_over_file_database() {
    let dir = tempfile::tempdir().unwrap();
    let db = DbConnect::open(dir.path().join("users.db")).unwrap();
    db.query("CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT, age INTEGER)")
        .unwrap();
    db.query("INSERT INTO users (name, age) VALUES ('Alice', 30), ('Bob', 25)")
        .unwrap();

    let mut results = QueryResults::new();
    assert!(db.query_into(&mut results, "SELECT name FROM users WHERE age > 25"));
    assert_eq!(results.num_rows, 1);
    let row = db.fetch_array(&mut results).unwrap();
    assert_eq!(row["name"], DatabaseValue::Text("Alice".into()));
}
