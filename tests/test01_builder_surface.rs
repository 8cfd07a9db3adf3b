#![cfg(feature = "sqlite")]

use sql_dataset::prelude::*;

fn dataset() -> DataSet<SqliteConnection> {
    // No statement is executed in these tests; an unopened handle is enough.
    DataSet::with_open(SqliteConnection::memory())
}

#[test]
fn table_defaults_schema_to_public() -> Result<(), DataSetError> {
    let mut ds = dataset();
    ds.table("test")?;
    assert_eq!(ds.metadata().schema(), Some("public"));
    assert_eq!(ds.metadata().table(), Some("test"));
    Ok(())
}

#[test]
fn second_table_fails_despite_intervening_declarations() -> Result<(), DataSetError> {
    let mut ds = dataset();
    ds.table("test")?
        .column("first_name").set("Ivanov")
        .with_keys("card_number").set(1);
    let err = ds.table_in("public", "other").unwrap_err();
    assert!(matches!(err, DataSetError::ConfigError(_)));
    // Declarations made before the failed call are untouched.
    assert_eq!(ds.metadata().columns.len(), 1);
    assert_eq!(ds.metadata().keys.len(), 1);
    Ok(())
}

#[test]
fn binders_append_in_declaration_order() -> Result<(), DataSetError> {
    let mut ds = dataset();
    ds.table("test")?
        .column("a").set(1)
        .column_typed("b", SqlType::Text).set("two")
        .column("c").with_alias("C").get()
        .with_keys("a").set(1)
        .with_keys_typed("b", SqlType::Text).set("two");

    let meta = ds.metadata();
    let col_names: Vec<_> = meta.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(col_names, ["a", "b", "c"]);
    assert_eq!(meta.columns[1].ty, SqlType::Text);
    // `get` declares a projection column with no bound value.
    assert_eq!(meta.columns[2].value, SqlValue::Null);
    assert_eq!(meta.columns[2].alias.as_deref(), Some("C"));

    let key_names: Vec<_> = meta.keys.iter().map(|k| k.name.as_str()).collect();
    assert_eq!(key_names, ["a", "b"]);
    assert_eq!(meta.keys[1].ty, SqlType::Text);
    Ok(())
}

#[test]
fn duplicate_declarations_are_preserved() -> Result<(), DataSetError> {
    let mut ds = dataset();
    ds.table("test")?
        .column("n").set(1)
        .column("n").set(2);
    assert_eq!(ds.metadata().columns.len(), 2);
    Ok(())
}

#[test]
fn with_transaction_overwrites_configuration() -> Result<(), DataSetError> {
    let mut ds = dataset();
    ds.table("test")?;
    assert!(!ds.metadata().transaction_enabled);

    ds.with_transaction(IsolationLevel::Serializable, 10, TxScope::RequiresNew);
    let meta = ds.metadata();
    assert!(meta.transaction_enabled);
    assert_eq!(meta.transaction.isolation, IsolationLevel::Serializable);
    assert_eq!(meta.transaction.timeout.as_secs(), 10);
    assert_eq!(meta.transaction.scope, TxScope::RequiresNew);
    Ok(())
}

#[test]
fn clear_metadata_allows_a_fresh_table() -> Result<(), DataSetError> {
    let mut ds = dataset();
    ds.table("first")?.column("a").set(1);
    ds.clear_metadata().table("second")?;
    assert_eq!(ds.metadata().table(), Some("second"));
    assert!(ds.metadata().columns.is_empty());
    Ok(())
}

#[test]
fn display_renders_metadata_as_json() -> Result<(), DataSetError> {
    let mut ds = dataset();
    ds.table("test")?.column("last_name").set("Ivanov");
    let dump = ds.to_string();
    assert!(dump.contains("\"table\": \"test\""));
    assert!(dump.contains("last_name"));
    Ok(())
}

#[test]
fn terminal_without_table_is_a_config_error() {
    let mut ds = dataset();
    ds.column("n").set(1);
    assert!(matches!(ds.insert(), Err(DataSetError::ConfigError(_))));
    assert!(matches!(ds.select(), Err(DataSetError::ConfigError(_))));
    assert!(matches!(
        ds.select_query("select 1"),
        Err(DataSetError::ConfigError(_))
    ));
}
