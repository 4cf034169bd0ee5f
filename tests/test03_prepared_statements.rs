mod common;

use common::{recording_db, users_result};
use mysquirrel::prelude::*;

#[test]
fn prepare_sends_escaped_template() {
    let (db, rec) = recording_db();
    let stmt = db
        .prepare("SELECT * FROM users WHERE name = ? AND note <> 'x'")
        .unwrap();
    assert_eq!(stmt.num_args(), 1);
    assert_eq!(stmt.sql(), "SELECT * FROM users WHERE name = ? AND note <> 'x'");
    assert_eq!(
        rec.last(),
        Some(format!(
            r"PREPARE {} FROM 'SELECT * FROM users WHERE name = ? AND note <> \'x\''",
            stmt.name()
        ))
    );
}

#[test]
fn execute_binds_session_variables_in_order() {
    let (db, rec) = recording_db();
    let stmt = db
        .prepare("INSERT INTO users (name, password, age) VALUES (?, ?, ?)")
        .unwrap();
    let name = stmt.name().to_string();
    stmt.execute(&params!["ann", "it's", 31]).unwrap();

    let statements = rec.statements();
    assert_eq!(
        &statements[1..],
        &[
            format!("SET @{name}_v0 = 'ann'"),
            format!(r"SET @{name}_v1 = 'it\'s'"),
            format!("SET @{name}_v2 = 31"),
            format!("EXECUTE {name} USING @{name}_v0, @{name}_v1, @{name}_v2"),
        ]
    );
}

#[test]
fn execute_without_placeholders_has_no_using_clause() {
    let (db, rec) = recording_db();
    let stmt = db.prepare("SELECT NOW()").unwrap();
    stmt.execute(&[]).unwrap();
    assert_eq!(rec.last(), Some(format!("EXECUTE {}", stmt.name())));
}

#[test]
fn statement_can_run_many_times() {
    let (db, rec) = recording_db();
    let stmt = db.prepare("INSERT INTO users (name) VALUES (?)").unwrap();
    for name in ["ann", "bob", "cy"] {
        stmt.execute(&params![name]).unwrap();
    }
    assert_eq!(rec.count_starting_with("EXECUTE"), 3);
    assert_eq!(rec.count_starting_with("PREPARE"), 1);
}

#[test]
fn argument_mismatch_sends_nothing() {
    let (db, rec) = recording_db();
    let stmt = db.prepare("SELECT ? + ?").unwrap();
    let before = rec.statements().len();
    let err = stmt.execute(&params![1]).unwrap_err();
    assert!(matches!(
        err,
        SquirrelError::ParameterMismatchError { expected: 2, given: 1 }
    ));
    assert_eq!(rec.statements().len(), before);
}

#[test]
fn drop_deallocates_exactly_once_without_execute() {
    let (db, rec) = recording_db();
    let name = {
        let stmt = db.prepare("SELECT ?").unwrap();
        stmt.name().to_string()
    };
    assert_eq!(rec.count_starting_with("DEALLOCATE"), 1);
    assert_eq!(rec.last(), Some(format!("DEALLOCATE PREPARE {name}")));
}

#[test]
fn close_deallocates_and_drop_does_not_repeat_it() {
    let (db, rec) = recording_db();
    let stmt = db.prepare("SELECT ?").unwrap();
    stmt.execute(&params![1]).unwrap();
    stmt.close().unwrap();
    assert_eq!(rec.count_starting_with("DEALLOCATE"), 1);
}

#[test]
fn deallocates_after_a_failed_execute() {
    let (db, rec) = recording_db();
    let result = (|| -> Result<(), SquirrelError> {
        let stmt = db.prepare("UPDATE users SET name = ? WHERE id = ?")?;
        rec.fail_on("EXECUTE");
        stmt.execute(&params!["ann", 1])?;
        Ok(())
    })();
    rec.clear_failure();

    assert!(matches!(result, Err(SquirrelError::DriverError { .. })));
    assert_eq!(rec.count_starting_with("DEALLOCATE"), 1);
}

#[test]
fn failing_deallocate_is_reported_by_close_and_swallowed_by_drop() {
    let (db, rec) = recording_db();
    rec.fail_on("DEALLOCATE");
    let stmt = db.prepare("SELECT 1").unwrap();
    assert!(stmt.close().is_err());
    drop(db.prepare("SELECT 2").unwrap());
    assert_eq!(rec.count_starting_with("DEALLOCATE"), 2);
}

#[test]
fn failed_prepare_yields_no_handle() {
    let (db, rec) = recording_db();
    rec.fail_on("PREPARE");
    assert!(db.prepare("SELECT ?").is_err());
    assert_eq!(rec.count_starting_with("DEALLOCATE"), 0);
}

#[test]
fn separator_is_rejected() {
    let (db, rec) = recording_db();
    assert!(matches!(
        db.prepare("SELECT 1; SELECT 2").err(),
        Some(SquirrelError::MultipleStatementsError(_))
    ));
    assert!(rec.statements().is_empty());
}

#[test]
fn handles_get_distinct_names_and_interleave() {
    let (db, rec) = recording_db();
    rec.serve_rows(users_result());
    let insert = db.prepare("INSERT INTO users (name) VALUES (?)").unwrap();
    let select = db.prepare("SELECT * FROM users WHERE id = ?").unwrap();
    assert_ne!(insert.name(), select.name());

    insert.execute(&params!["ann"]).unwrap();
    let rows = select.execute(&params![1]).unwrap().into_rows().unwrap();
    assert_eq!(rows.num_rows(), 2);
    db.query("SELECT ?", &params![1]).unwrap();
}

#[test]
fn unmagic_applies_to_bound_text() {
    let (db, rec) = recording_db();
    db.set_unmagic(true);
    let stmt = db.prepare("SELECT ?").unwrap();
    stmt.execute(&params![r#"say \"hi\""#]).unwrap();
    assert!(
        rec.statements()
            .iter()
            .any(|s| s == &format!(r#"SET @{}_v0 = 'say \"hi\"'"#, stmt.name()))
    );
}
