#![cfg(feature = "sqlite")]

use sql_dataset::prelude::*;
use sql_dataset::run_scoped;

fn seeded_conn() -> Result<SqliteConnection, DataSetError> {
    let mut conn = SqliteConnection::open_in_memory()?;
    conn.execute_batch(
        "ATTACH DATABASE ':memory:' AS public;
         CREATE TABLE public.test (card_number INTEGER PRIMARY KEY, last_name TEXT);",
    )?;
    Ok(conn)
}

fn options(scope: TxScope) -> TransactionOptions {
    TransactionOptions {
        scope,
        ..TransactionOptions::default()
    }
}

fn insert_card(conn: &mut SqliteConnection, card: i64) -> Result<usize, DataSetError> {
    conn.execute(
        "insert into public.test (card_number) values (:card_p)",
        &[SqlParam::new("card_p", SqlType::Integer, SqlValue::Int(card))],
    )
}

fn count(conn: &mut SqliteConnection) -> Result<i64, DataSetError> {
    let raw = conn.query("select count(*) as cnt from public.test", &[])?;
    Ok(*raw.rows[0][0].as_int().unwrap())
}

#[test]
fn scope_commits_on_success() -> Result<(), DataSetError> {
    let mut conn = seeded_conn()?;
    run_scoped(&mut conn, &options(TxScope::Required), |conn| {
        insert_card(conn, 1)
    })?;
    assert!(!conn.in_transaction());
    assert_eq!(count(&mut conn)?, 1);
    Ok(())
}

#[test]
fn scope_rolls_back_on_error_and_propagates_it() -> Result<(), DataSetError> {
    let mut conn = seeded_conn()?;
    let result = run_scoped(&mut conn, &options(TxScope::Required), |conn| {
        insert_card(conn, 1)?;
        // Duplicate primary key; the first insert must not survive.
        insert_card(conn, 1)
    });
    assert!(matches!(result, Err(DataSetError::SqliteError(_))));
    assert!(!conn.in_transaction());
    assert_eq!(count(&mut conn)?, 0);
    Ok(())
}

#[test]
fn required_joins_an_ambient_transaction() -> Result<(), DataSetError> {
    let mut conn = seeded_conn()?;
    conn.begin(&TransactionOptions::default())?;

    // Joined scope: the error propagates, but settling the outer transaction
    // stays with its owner.
    let result = run_scoped(&mut conn, &options(TxScope::Required), |conn| {
        insert_card(conn, 1)?;
        Err::<usize, _>(DataSetError::ExecutionError("boom".into()))
    });
    assert!(result.is_err());
    assert!(conn.in_transaction());

    conn.commit()?;
    // The joined body's work committed with the ambient transaction.
    assert_eq!(count(&mut conn)?, 1);
    Ok(())
}

#[test]
fn requires_new_nests_and_rolls_back_independently() -> Result<(), DataSetError> {
    let mut conn = seeded_conn()?;
    conn.begin(&TransactionOptions::default())?;
    insert_card(&mut conn, 1)?;

    let result = run_scoped(&mut conn, &options(TxScope::RequiresNew), |conn| {
        insert_card(conn, 2)?;
        Err::<usize, _>(DataSetError::ExecutionError("inner failure".into()))
    });
    assert!(result.is_err());
    // Only the nested scope rolled back.
    assert!(conn.in_transaction());
    conn.commit()?;

    assert_eq!(count(&mut conn)?, 1);
    Ok(())
}

#[test]
fn suppress_runs_without_a_scope() -> Result<(), DataSetError> {
    let mut conn = seeded_conn()?;
    run_scoped(&mut conn, &options(TxScope::Suppress), |conn| {
        assert!(!conn.in_transaction());
        insert_card(conn, 1)
    })?;
    assert_eq!(count(&mut conn)?, 1);
    Ok(())
}

#[test]
fn settling_without_a_transaction_fails_cleanly() -> Result<(), DataSetError> {
    let mut conn = seeded_conn()?;
    assert!(matches!(
        conn.commit(),
        Err(DataSetError::ExecutionError(_))
    ));
    assert!(matches!(
        conn.rollback(),
        Err(DataSetError::ExecutionError(_))
    ));
    Ok(())
}

#[test]
fn builder_dml_honors_the_transaction_flag() -> Result<(), DataSetError> {
    let mut ds = DataSet::with_open(seeded_conn()?);

    ds.table("test")?
        .column("card_number").set(1)
        .column("last_name").set("Ivanov")
        .with_transaction(IsolationLevel::ReadCommitted, 10, TxScope::Required)
        .insert()?;

    let rs = ds
        .clear_metadata()
        .table("test")?
        .with_keys("card_number").set(1)
        .select()?;
    assert_eq!(rs.records.len(), 1);

    // A failing wrapped statement propagates the driver error verbatim.
    let err = ds
        .clear_metadata()
        .table("test")?
        .column("card_number").set(1)
        .with_transaction(IsolationLevel::Serializable, 10, TxScope::RequiresNew)
        .insert()
        .unwrap_err();
    assert!(matches!(err, DataSetError::SqliteError(_)));

    let rs = ds
        .clear_metadata()
        .table("test")?
        .select_query("select count(*) as cnt from public.test")?;
    assert_eq!(*rs.records[0].get("cnt").unwrap().as_int().unwrap(), 1);
    Ok(())
}
